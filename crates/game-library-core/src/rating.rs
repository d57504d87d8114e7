// Rating normalization between the stored scale and the 0-10 display scale

use game_library_models::ScaledRating;

/// Convert a stored rating of unknown scale to the 0-10 display scale.
///
/// Values above 5 are taken as already on the 0-10 scale; everything else is
/// read as a legacy 0-5 value and doubled. The result always lies in [0, 10]
/// and non-finite input yields 0.
pub fn to_ten_scale(value: f64) -> f64 {
    ScaledRating::infer(value).to_ten()
}

/// Convert a 0-10 display rating to the value written back to the backend.
///
/// Values up to 5 are stored unchanged (they are indistinguishable from legacy
/// 0-5 scores); larger values are halved and rounded to two decimals.
pub fn to_storage_scale(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let clamped = value.clamp(0.0, 10.0);
    if clamped <= 5.0 {
        clamped
    } else {
        round_to_hundredths(clamped / 2.0)
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_ten_scale_legacy_values_double() {
        assert_eq!(to_ten_scale(0.0), 0.0);
        assert_eq!(to_ten_scale(2.5), 5.0);
        assert_eq!(to_ten_scale(4.0), 8.0);
        assert_eq!(to_ten_scale(5.0), 10.0);
    }

    #[test]
    fn test_to_ten_scale_modern_values_pass_through() {
        assert_eq!(to_ten_scale(5.5), 5.5);
        assert_eq!(to_ten_scale(8.4), 8.4);
        assert_eq!(to_ten_scale(10.0), 10.0);
    }

    #[test]
    fn test_to_ten_scale_saturates() {
        assert_eq!(to_ten_scale(42.0), 10.0);
        assert_eq!(to_ten_scale(-3.0), 0.0);
        assert_eq!(to_ten_scale(f64::NAN), 0.0);
        assert_eq!(to_ten_scale(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_to_ten_scale_idempotent_above_five() {
        for x in [5.1, 6.0, 7.25, 9.99, 10.0, 15.0] {
            let once = to_ten_scale(x);
            assert_eq!(to_ten_scale(once), once, "x = {}", x);
        }
    }

    #[test]
    fn test_to_ten_scale_range() {
        let mut x = -20.0;
        while x <= 20.0 {
            let y = to_ten_scale(x);
            assert!((0.0..=10.0).contains(&y), "x = {} gave {}", x, y);
            x += 0.25;
        }
    }

    #[test]
    fn test_to_storage_scale() {
        assert_eq!(to_storage_scale(8.4), 4.2);
        assert_eq!(to_storage_scale(10.0), 5.0);
        assert_eq!(to_storage_scale(7.0), 3.5);
        assert_eq!(to_storage_scale(4.0), 4.0);
        assert_eq!(to_storage_scale(12.0), 5.0);
        assert_eq!(to_storage_scale(-1.0), 0.0);
        assert_eq!(to_storage_scale(f64::NAN), 0.0);
    }

    #[test]
    fn test_stored_legacy_score_round_trips() {
        // A form showing 8.4 stores 4.2, which displays as 8.4 again.
        assert_eq!(to_ten_scale(8.4), 8.4);
        assert_eq!(to_storage_scale(to_ten_scale(8.4)), 4.2);
        assert_eq!(to_ten_scale(4.2), 8.4);

        for x in [3.0, 3.5, 4.2, 4.75, 5.0] {
            assert_eq!(to_storage_scale(to_ten_scale(x)), x, "x = {}", x);
        }
    }
}
