//! Radar volume data model.
//!
//! One [`RadarVolume`] normalizes a decoded radar volume, whatever its source format,
//! into a single layout: an ordered sequence of [`Sweep`]s indexing into one shared,
//! volume-owned sequence of [`Ray`]s. The external volume reader populates the model
//! once; every core algorithm then borrows it read-only.

mod ray;
mod sweep;

pub use ray::Ray;
pub use sweep::Sweep;

use hifitime::Epoch;

use crate::constants::{
    Degree, Kilometer, DEFAULT_MAX_UNAMBIGUOUS_RANGE_KM, MISSING_F64,
};
use crate::geometry;

/// A full radar volume: site metadata plus the sweep and ray sequences.
///
/// The volume exclusively owns its sweeps and rays. Sweeps reference rays by index
/// span rather than ownership, so a ray sequence is stored exactly once per volume.
#[derive(Debug, Clone)]
pub struct RadarVolume {
    pub radar_name: String,
    pub radar_lat: Degree,
    pub radar_lon: Degree,
    /// Radar tower height above sea level, in kilometers.
    pub altitude_km: Kilometer,
    /// Acquisition time of the volume, conventionally taken from its first ray.
    pub volume_time: Option<Epoch>,
    /// Volume coverage pattern identifier, carried through but not interpreted.
    pub vcp: i32,
    /// Whether a dealiasing pass has been applied to the velocity fields.
    pub dealiased: bool,
    /// Pre-gridded sources carry no per-sweep range metadata; see
    /// [`RadarVolume::max_unambiguous_range`].
    pub pre_gridded: bool,
    /// Fallback maximum unambiguous range for pre-gridded sources, in kilometers.
    pub fallback_max_range_km: Kilometer,
    sweeps: Vec<Sweep>,
    rays: Vec<Ray>,
}

impl RadarVolume {
    /// Create an empty volume for the given site, ready to be populated by a reader.
    pub fn new(radar_name: &str, radar_lat: Degree, radar_lon: Degree) -> Self {
        RadarVolume {
            radar_name: radar_name.to_string(),
            radar_lat,
            radar_lon,
            altitude_km: 0.0,
            volume_time: None,
            vcp: -999,
            dealiased: false,
            pre_gridded: false,
            fallback_max_range_km: DEFAULT_MAX_UNAMBIGUOUS_RANGE_KM,
            sweeps: Vec::new(),
            rays: Vec::new(),
        }
    }

    /// Append a sweep. Population surface for the external volume reader.
    pub fn push_sweep(&mut self, sweep: Sweep) {
        self.sweeps.push(sweep);
    }

    /// Append a ray. Population surface for the external volume reader.
    pub fn push_ray(&mut self, ray: Ray) {
        self.rays.push(ray);
    }

    /// The sweep at `index`, or `None` when the index is out of `[0, sweep_count)`.
    pub fn sweep(&self, index: usize) -> Option<&Sweep> {
        self.sweeps.get(index)
    }

    /// The ray at `index`, or `None` when the index is out of `[0, ray_count)`.
    pub fn ray(&self, index: usize) -> Option<&Ray> {
        self.rays.get(index)
    }

    pub fn sweep_count(&self) -> usize {
        self.sweeps.len()
    }

    pub fn ray_count(&self) -> usize {
        self.rays.len()
    }

    /// The largest unambiguous range carried by this volume, in kilometers.
    ///
    /// Pre-gridded volumes return the stored fallback regardless of sweep contents.
    /// Otherwise, the maximum unambiguous range among sweeps that actually carry
    /// velocity gates is returned, or the missing sentinel when no sweep qualifies.
    pub fn max_unambiguous_range(&self) -> Kilometer {
        if self.pre_gridded {
            return self.fallback_max_range_km;
        }

        let mut max_range = MISSING_F64;
        for sweep in &self.sweeps {
            if sweep.vel_gate_count > 0 && sweep.unambiguous_range_km > max_range {
                max_range = sweep.unambiguous_range_km;
            }
        }
        max_range
    }

    /// Beam height above sea level at a slant range and elevation, using this
    /// site's altitude. See [`geometry::absolute_beam_height_km`].
    pub fn absolute_beam_height_km(
        &self,
        distance_km: Kilometer,
        elevation_deg: Degree,
    ) -> Kilometer {
        geometry::absolute_beam_height_km(distance_km, elevation_deg, self.altitude_km)
    }
}
