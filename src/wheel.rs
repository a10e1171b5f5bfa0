//! Wheel geometry.
//!
//! Sectors are laid out clockwise starting at 12 o'clock, which is where the
//! pointer sits. A positive rotation turns the wheel clockwise, so the sector
//! under the pointer after rotating by `r` degrees is the one containing
//! `(360 - r) mod 360`.

/// Angular width in degrees of one sector when `count` sectors are drawn.
pub fn sector_angle(count: usize) -> f64 {
    360.0 / count.max(1) as f64
}

/// Clockwise rotation (in `[0, 360)`) that brings the center of sector
/// `target_index` under the pointer.
pub fn angle_to_target(target_index: usize, count: usize) -> f64 {
    let sa = sector_angle(count);
    (360.0 - (target_index as f64 * sa + sa / 2.0)).rem_euclid(360.0)
}

/// Angle of the wheel that sits under the pointer after rotating by
/// `rotation_deg`.
pub fn pointer_angle(rotation_deg: f64) -> f64 {
    (360.0 - rotation_deg.rem_euclid(360.0)).rem_euclid(360.0)
}

/// Index of the sector under the pointer for a wheel rotated by
/// `rotation_deg`. Inverse of [`angle_to_target`].
pub fn sector_at_pointer(rotation_deg: f64, count: usize) -> usize {
    let count = count.max(1);
    let idx = (pointer_angle(rotation_deg) / sector_angle(count)).floor() as usize;
    idx % count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sector_angle_for_default_wheel() {
        assert_eq!(sector_angle(16), 22.5);
        assert_eq!(sector_angle(0), 360.0);
    }

    #[test]
    fn target_three_of_sixteen() {
        assert_eq!(angle_to_target(3, 16), 281.25);
        assert_eq!(sector_at_pointer(281.25, 16), 3);
        // Anywhere inside the sector resolves the same way
        assert_eq!(sector_at_pointer(280.5, 16), 3);
        assert_eq!(sector_at_pointer(360.0 * 7.0 + 280.5, 16), 3);
    }

    #[test]
    fn round_trip_every_sector() {
        for count in 1..=64 {
            for target in 0..count {
                let angle = angle_to_target(target, count);
                assert!((0.0..360.0).contains(&angle));
                for turns in 5..=8 {
                    let final_deg = turns as f64 * 360.0 + angle;
                    assert_eq!(
                        sector_at_pointer(final_deg, count),
                        target,
                        "count={count} target={target} turns={turns}"
                    );
                }
            }
        }
    }

    #[test]
    fn unrotated_wheel_shows_first_sector() {
        assert_eq!(sector_at_pointer(0.0, 16), 0);
        // A hair of clockwise rotation brings the last sector under the pointer
        assert_eq!(sector_at_pointer(0.1, 16), 15);
    }

    #[test]
    fn pointer_angle_normalizes_negative_rotation() {
        assert_eq!(pointer_angle(-90.0), 90.0);
        assert_eq!(pointer_angle(720.0), 0.0);
    }
}
