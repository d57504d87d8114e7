use serde::{Deserialize, Serialize};

/// Scale a stored rating was entered on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RatingScale {
    Five, // legacy reviews, 0-5
    Ten,  // current UI and game scores, 0-10
}

impl RatingScale {
    pub fn max(&self) -> f64 {
        match self {
            RatingScale::Five => 5.0,
            RatingScale::Ten => 10.0,
        }
    }
}

/// A rating tagged with the scale it was entered on.
///
/// With the scale explicit, conversion to the 0-10 display scale is total and
/// unambiguous. Untagged legacy values go through [`ScaledRating::infer`],
/// which can only guess: a stored `5` may be a perfect legacy score or a
/// middling modern one, and it is read as the former.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScaledRating {
    pub scale: RatingScale,
    pub value: f64,
}

impl ScaledRating {
    pub fn five(value: f64) -> Self {
        Self { scale: RatingScale::Five, value }
    }

    pub fn ten(value: f64) -> Self {
        Self { scale: RatingScale::Ten, value }
    }

    /// Best-effort scale detection for untagged records: anything above 5 is
    /// already on the 0-10 scale, everything else is a 0-5 value.
    pub fn infer(raw: f64) -> Self {
        if raw > RatingScale::Five.max() {
            Self::ten(raw)
        } else {
            Self::five(raw)
        }
    }

    /// Value on the 0-10 scale, saturated at both bounds. Non-finite input is 0.
    pub fn to_ten(&self) -> f64 {
        if !self.value.is_finite() {
            return 0.0;
        }
        let scaled = match self.scale {
            RatingScale::Five => self.value * 2.0,
            RatingScale::Ten => self.value,
        };
        scaled.clamp(0.0, 10.0)
    }
}
