//! Orbital phase geometry.
//!
//! The phase angle places the body within one orbital cycle from a single
//! (latitude, latitude-velocity) snapshot. Arcsine alone cannot tell an
//! ascending crossing of a latitude from a descending one, so the velocity
//! sign selects the quadrant.

use std::f64::consts::{PI, TAU};

/// Wrap a longitude into [-180, 180].
pub fn normalize_longitude(mut lon: f64) -> f64 {
    while lon > 180.0 {
        lon -= 360.0;
    }
    while lon < -180.0 {
        lon += 360.0;
    }
    lon
}

/// Orbital phase in [0, 2π) from latitude and its rate of change.
///
/// `lat_velocity` is degrees per minute, positive northward.
pub fn compute_phase(lat: f64, lat_velocity: f64, inclination: f64) -> f64 {
    let normalized = (lat / inclination).clamp(-1.0, 1.0);
    let principal = normalized.asin();

    let phase = if lat_velocity >= 0.0 {
        // Ascending branch: [0, π/2] north of the equator, [3π/2, 2π) south.
        if lat >= 0.0 {
            principal
        } else {
            TAU + principal
        }
    } else {
        // Descending branch: [π/2, 3π/2].
        PI - principal
    };

    phase.rem_euclid(TAU)
}

/// Longitude of the ascending node, in degrees [-180, 180], given the
/// current longitude and phase.
pub fn ascending_node_longitude(lon: f64, phase: f64, inclination: f64) -> f64 {
    let inc_rad = inclination.to_radians();
    let offset = (phase.sin() * inc_rad.cos()).atan2(phase.cos());
    normalize_longitude(lon - offset.to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INCLINATION: f64 = 51.6;
    const EPS: f64 = 1e-9;

    #[test]
    fn equator_ascending_is_phase_zero() {
        assert!(compute_phase(0.0, 0.1, INCLINATION).abs() < EPS);
    }

    #[test]
    fn equator_descending_is_phase_pi() {
        assert!((compute_phase(0.0, -0.1, INCLINATION) - PI).abs() < EPS);
    }

    #[test]
    fn northernmost_point_is_quarter_orbit() {
        let phase = compute_phase(INCLINATION, 0.0, INCLINATION);
        assert!((phase - PI / 2.0).abs() < EPS);
    }

    #[test]
    fn southern_ascending_lands_in_fourth_quadrant() {
        let phase = compute_phase(-30.0, 0.2, INCLINATION);
        assert!(phase > 1.5 * PI && phase < TAU);
    }

    #[test]
    fn southern_descending_lands_in_third_quadrant() {
        let phase = compute_phase(-30.0, -0.2, INCLINATION);
        assert!(phase > PI && phase < 1.5 * PI);
    }

    #[test]
    fn same_latitude_opposite_branches_differ() {
        let ascending = compute_phase(20.0, 0.3, INCLINATION);
        let descending = compute_phase(20.0, -0.3, INCLINATION);
        assert!((ascending - descending).abs() > 0.1);
    }

    #[test]
    fn latitude_beyond_inclination_is_clamped() {
        let phase = compute_phase(60.0, 0.1, INCLINATION);
        assert!((phase - PI / 2.0).abs() < EPS);
    }

    #[test]
    fn normalize_wraps_both_directions() {
        assert!((normalize_longitude(185.0) - (-175.0)).abs() < EPS);
        assert!((normalize_longitude(-185.0) - 175.0).abs() < EPS);
        assert!((normalize_longitude(540.0) - 180.0).abs() < EPS);
        assert!((normalize_longitude(42.0) - 42.0).abs() < EPS);
    }

    #[test]
    fn node_longitude_at_phase_zero_is_current_longitude() {
        let node = ascending_node_longitude(-122.6, 0.0, INCLINATION);
        assert!((node - (-122.6)).abs() < EPS);
    }

    #[test]
    fn node_longitude_stays_in_range() {
        for lon in [-179.9, -90.0, 0.0, 90.0, 179.9] {
            for phase in [0.0, 1.0, PI, 4.0, 6.0] {
                let node = ascending_node_longitude(lon, phase, INCLINATION);
                assert!((-180.0..=180.0).contains(&node));
            }
        }
    }
}
