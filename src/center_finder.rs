//! Vortex-center estimation from a single sweep's Doppler velocity field.
//!
//! The estimator needs no a-priori center guess: the rotation couplet of a vortex
//! dominates the velocity field, so the leading right-singular vector of the
//! (de-trended) gate matrix along each axis localizes the couplet's extremes, and
//! the center falls midway between them. Both decompositions use nalgebra's dense
//! SVD; the field sizes involved (a few hundred rays by a few hundred gates) keep
//! this well inside interactive run times.

use itertools::Itertools;
use itertools::MinMaxResult::MinMax;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::constants::{Degree, Kilometer, M_TO_KM, MISSING_F64, RADEG};
use crate::cyclotrace_errors::CyclotraceError;
use crate::volume::RadarVolume;

/// Peak tangential wind of the synthetic vortex, in speed units of the grid.
const SYNTHETIC_PEAK_WIND: f64 = 50.0;

/// A candidate vortex center relative to the radar: plain values, no identity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CenterEstimate {
    pub azimuth: Degree,
    pub range: Kilometer,
}

/// The estimator's working set: one sweep's velocity gate matrix (rows = rays in
/// ray-index order, columns = range gates) with its parallel azimuth and range axes.
#[derive(Debug, Clone)]
pub struct CenterFinder {
    vr: DMatrix<f64>,
    az: DVector<f64>,
    rg: DVector<f64>,
}

impl CenterFinder {
    /// Build the working set from the lowest sweep of `vol` that carries velocity
    /// gates.
    ///
    /// Return
    /// ------
    /// * The finder, or [`CyclotraceError::NoVelocitySweep`] when no sweep in the
    ///   volume has a positive velocity gate count.
    pub fn from_volume(vol: &RadarVolume) -> Result<Self, CyclotraceError> {
        let sweep_index = (0..vol.sweep_count())
            .find(|&i| vol.sweep(i).is_some_and(|s| s.vel_gate_count > 0))
            .ok_or(CyclotraceError::NoVelocitySweep)?;
        Self::from_sweep(vol, sweep_index)
    }

    /// Build the working set from one sweep of `vol`.
    ///
    /// The matrix is shaped by the sweep's declared velocity gate count (which by
    /// the model's invariant equals its first ray's); a ray with fewer gates than
    /// declared contributes the missing sentinel for the absent tail. Gate ranges
    /// are `first_vel_gate + gate · gate_spacing`, converted to kilometers.
    pub fn from_sweep(vol: &RadarVolume, sweep_index: usize) -> Result<Self, CyclotraceError> {
        let sweep = vol
            .sweep(sweep_index)
            .ok_or(CyclotraceError::SweepIndexOutOfBounds(sweep_index))?;
        let num_rays = sweep.ray_count();
        let num_gates = sweep.vel_gate_count;

        let mut vr = DMatrix::from_element(num_rays, num_gates, MISSING_F64);
        let mut az = DVector::zeros(num_rays);
        for (row, ray_index) in (sweep.first_ray..=sweep.last_ray).enumerate() {
            let ray = vol
                .ray(ray_index)
                .ok_or(CyclotraceError::RayIndexOutOfBounds(ray_index))?;
            az[row] = ray.azimuth;
            for gate in 0..num_gates {
                vr[(row, gate)] = ray
                    .vel_gates
                    .get(gate)
                    .copied()
                    .map_or(MISSING_F64, f64::from);
            }
        }

        let rg = DVector::from_fn(num_gates, |gate, _| {
            (sweep.first_vel_gate_m + gate as f64 * sweep.vel_gate_spacing_m) * M_TO_KM
        });

        Ok(CenterFinder { vr, az, rg })
    }

    /// Build a synthetic Rankine-vortex Doppler field with a known ground truth,
    /// for validating [`CenterFinder::find_center`].
    ///
    /// The field lives on a fixed 360×400 polar grid (azimuth 0–359°, range 0–399
    /// grid units, so `center.range` and `radius_max_wind` are in grid units here).
    /// Tangential wind rises linearly to 50 speed units at `radius_max_wind` and
    /// decays as `50·sqrt(rmw/r)` outside; each grid point stores its projection
    /// onto the radar line of sight.
    pub fn synthetic_vortex(center: CenterEstimate, radius_max_wind: f64) -> Self {
        let x0 = (center.azimuth * RADEG).sin() * center.range;
        let y0 = (center.azimuth * RADEG).cos() * center.range;

        let mut vr = DMatrix::zeros(360, 400);
        for gate in 0..vr.ncols() {
            for row in 0..vr.nrows() {
                let x = (row as f64 * RADEG).sin() * gate as f64;
                let y = (row as f64 * RADEG).cos() * gate as f64;
                let r = ((x - x0).powi(2) + (y - y0).powi(2)).sqrt() + 1e-20;
                let vt = if r < radius_max_wind {
                    r * SYNTHETIC_PEAK_WIND / radius_max_wind
                } else {
                    SYNTHETIC_PEAK_WIND * (radius_max_wind / r).sqrt()
                };
                let u = -(y - y0) / r * vt;
                let v = (x - x0) / r * vt;
                vr[(row, gate)] = (u * x + v * y) / (x * x + y * y + 1e-20).sqrt();
            }
        }

        let az = DVector::from_fn(360, |i, _| i as f64);
        let rg = DVector::from_fn(400, |i, _| i as f64);
        CenterFinder { vr, az, rg }
    }

    /// Number of rays (matrix rows) in the working set.
    pub fn ray_count(&self) -> usize {
        self.vr.nrows()
    }

    /// Number of range gates (matrix columns) in the working set.
    pub fn gate_count(&self) -> usize {
        self.vr.ncols()
    }

    /// Locate the vortex center in this field.
    ///
    /// Steps:
    /// 1. De-trend each ray: subtract the ray's mean over non-missing gates, then
    ///    zero-fill the missing gates. Zero-filling biases the decomposition toward
    ///    rays with many missing gates; that is a known limitation of the method,
    ///    kept as-is.
    /// 2. Azimuthal axis: SVD of `vrᵀ/√(gates−1)`; the min and max entries of the
    ///    leading right-singular vector mark the couplet's azimuths, whose midpoint
    ///    (with a >180° circular-wrap correction) is the center azimuth.
    /// 3. Radial axis: SVD of `vr/√(rays−1)`; the forward difference of the leading
    ///    right-singular vector is scanned for its extremes, whose range midpoint is
    ///    the center range. The difference array is zero-filled, its first entry is
    ///    forced to zero, and its final entry (which has no forward neighbor) stays
    ///    zero and participates in the scan as such.
    ///
    /// Return
    /// ------
    /// * The center candidate, or a typed error: [`CyclotraceError::DegenerateSweep`]
    ///   for fields smaller than 2×2, [`CyclotraceError::EmptyVelocityField`] when
    ///   every gate is the missing sentinel, [`CyclotraceError::SvdFailed`] when a
    ///   decomposition does not converge. A valid but near-constant field yields an
    ///   ill-defined leading singular vector and therefore an arbitrary (but
    ///   well-formed) estimate; detecting that case is left to the caller.
    pub fn find_center(&self) -> Result<CenterEstimate, CyclotraceError> {
        let num_rays = self.vr.nrows();
        let num_gates = self.vr.ncols();
        if num_rays < 2 || num_gates < 2 {
            return Err(CyclotraceError::DegenerateSweep {
                rays: num_rays,
                gates: num_gates,
            });
        }

        let mut vr_a = self.vr.clone();
        let mut valid_total = 0;
        for row in 0..num_rays {
            let mut sum = 0.0;
            let mut count = 0;
            for gate in 0..num_gates {
                let v = vr_a[(row, gate)];
                if v != MISSING_F64 {
                    sum += v;
                    count += 1;
                }
            }
            // An all-missing ray has no mean to remove; it de-trends to all zeros.
            let mean = if count > 0 { sum / f64::from(count) } else { 0.0 };
            for gate in 0..num_gates {
                let v = vr_a[(row, gate)];
                vr_a[(row, gate)] = if v != MISSING_F64 { v - mean } else { 0.0 };
            }
            valid_total += count;
        }
        if valid_total == 0 {
            return Err(CyclotraceError::EmptyVelocityField);
        }

        let degenerate = || CyclotraceError::DegenerateSweep {
            rays: num_rays,
            gates: num_gates,
        };

        // Azimuthal couplet
        let ya = vr_a.transpose() / ((num_gates - 1) as f64).sqrt();
        let e1 = leading_right_singular_vector(ya)?;
        let (imin, imax) = extrema(&e1).ok_or_else(degenerate)?;
        let (az_min, az_max) = (self.az[imin], self.az[imax]);
        let az_center = if (az_max - az_min).abs() > 180.0 {
            (az_max + az_min + 360.0) / 2.0
        } else {
            (az_max + az_min) / 2.0
        };

        // Radial couplet
        let yr = vr_a / ((num_rays - 1) as f64).sqrt();
        let f1 = leading_right_singular_vector(yr)?;
        let mut gf = vec![0.0; f1.len()];
        for gate in 0..f1.len() - 1 {
            gf[gate] = f1[gate + 1] - f1[gate];
        }
        gf[0] = 0.0;
        let (imin, imax) = extrema(&gf).ok_or_else(degenerate)?;
        let rg_center = (self.rg[imin] + self.rg[imax]) / 2.0;

        Ok(CenterEstimate {
            azimuth: az_center,
            range: rg_center,
        })
    }
}

/// First right-singular vector of `m`, via nalgebra's sorted dense SVD.
fn leading_right_singular_vector(m: DMatrix<f64>) -> Result<Vec<f64>, CyclotraceError> {
    let svd = m
        .try_svd(false, true, f64::EPSILON, 1000)
        .ok_or(CyclotraceError::SvdFailed)?;
    let v_t = svd.v_t.ok_or(CyclotraceError::SvdFailed)?;
    Ok(v_t.row(0).iter().copied().collect())
}

/// Indices of the minimum and maximum entries, or `None` for fewer than 2 entries.
fn extrema(values: &[f64]) -> Option<(usize, usize)> {
    match values.iter().position_minmax_by(|a, b| a.total_cmp(b)) {
        MinMax(imin, imax) => Some((imin, imax)),
        _ => None,
    }
}
