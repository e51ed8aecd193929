use crate::constants::{Degree, Kilometer, EFFECTIVE_EARTH_RADIUS_KM, RADEG};

/// Compute the height of the radar beam above the radar, accounting for atmospheric refraction.
///
/// Uses the standard 4/3-effective-Earth-radius model: with `R = 4·Re/3` and
/// `s = sin(elevation)`, the beam height after traveling a slant distance `d` is
///
/// ```text
/// h = (d² + 2·d·R·s) / (sqrt(d² + R² + 2·d·R·s) + R)
/// ```
///
/// Arguments
/// ---------
/// * `distance_km`: slant range along the beam, in kilometers.
/// * `elevation_deg`: antenna elevation angle, in degrees.
///
/// Return
/// ------
/// * Beam height above the radar, in kilometers. A zero distance yields a zero
///   height for any elevation; the function is monotonically non-decreasing in
///   distance for non-negative elevations.
pub fn beam_height_km(distance_km: Kilometer, elevation_deg: Degree) -> Kilometer {
    let re = EFFECTIVE_EARTH_RADIUS_KM;
    let sin_elev = (elevation_deg * RADEG).sin();
    let dsq = distance_km * distance_km;

    let top = dsq + 2.0 * distance_km * re * sin_elev;
    let bottom = (dsq + re * re + 2.0 * distance_km * re * sin_elev).sqrt() + re;
    top / bottom
}

/// Beam height above sea level: [`beam_height_km`] plus the site altitude.
///
/// Arguments
/// ---------
/// * `distance_km`: slant range along the beam, in kilometers.
/// * `elevation_deg`: antenna elevation angle, in degrees.
/// * `site_altitude_km`: radar tower height above sea level, in kilometers.
pub fn absolute_beam_height_km(
    distance_km: Kilometer,
    elevation_deg: Degree,
    site_altitude_km: Kilometer,
) -> Kilometer {
    beam_height_km(distance_km, elevation_deg) + site_altitude_km
}

#[cfg(test)]
mod geometry_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_distance_is_zero_height() {
        for elev in 0..=90 {
            assert_eq!(beam_height_km(0.0, f64::from(elev)), 0.0);
        }
    }

    #[test]
    fn test_monotonic_in_distance() {
        for elev in [0.0, 0.5, 2.4, 19.5, 45.0, 90.0] {
            let mut previous = 0.0;
            for d in 1..=300 {
                let h = beam_height_km(f64::from(d), elev);
                assert!(
                    h >= previous,
                    "height decreased at d={d} km, elev={elev}: {h} < {previous}"
                );
                previous = h;
            }
        }
    }

    #[test]
    fn test_vertical_beam_height_equals_distance() {
        // Pointing straight up, the slant range is the height.
        assert_relative_eq!(beam_height_km(10.0, 90.0), 10.0, epsilon = 1e-6);
    }

    #[test]
    fn test_known_height_at_low_elevation() {
        // At 100 km and 0.5 deg, the beam sits near 1.46 km above the radar.
        let h = beam_height_km(100.0, 0.5);
        assert_relative_eq!(h, 1.46, epsilon = 0.02);
    }

    #[test]
    fn test_absolute_height_adds_site_altitude() {
        let h = beam_height_km(50.0, 1.0);
        assert_relative_eq!(
            absolute_beam_height_km(50.0, 1.0, 0.35),
            h + 0.35,
            epsilon = 1e-12
        );
    }
}
