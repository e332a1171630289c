//! Absolute CSS lengths and their conversion to pixels.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Font size used for `em`/`rem` when no cascade is available.
pub const DEFAULT_FONT_SIZE_PX: f32 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    Px,
    Pt,
    Em,
    Rem,
    In,
    Cm,
    Mm,
}

impl LengthUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            LengthUnit::Px => "px",
            LengthUnit::Pt => "pt",
            LengthUnit::Em => "em",
            LengthUnit::Rem => "rem",
            LengthUnit::In => "in",
            LengthUnit::Cm => "cm",
            LengthUnit::Mm => "mm",
        }
    }

    fn px_per_unit(self) -> f32 {
        match self {
            LengthUnit::Px => 1.0,
            LengthUnit::Pt => 96.0 / 72.0,
            LengthUnit::Em | LengthUnit::Rem => DEFAULT_FONT_SIZE_PX,
            LengthUnit::In => 96.0,
            LengthUnit::Cm => 96.0 / 2.54,
            LengthUnit::Mm => 96.0 / 25.4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Length {
    pub value: f32,
    pub unit: LengthUnit,
}

impl Length {
    pub fn new(value: f32, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    pub fn px(value: f32) -> Self {
        Self::new(value, LengthUnit::Px)
    }

    pub fn to_px(self) -> f32 {
        self.value * self.unit.px_per_unit()
    }

    /// Serializes the length the way a computed style reports it.
    pub fn to_computed_string(self) -> String {
        format_px(self.to_px())
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.as_str())
    }
}

/// Formats a pixel value without a trailing `.0` for whole numbers.
pub fn format_px(px: f32) -> String {
    if px.fract() == 0.0 {
        format!("{}px", px as i64)
    } else {
        format!("{}px", px)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_px() {
        assert_eq!(Length::px(80.0).to_px(), 80.0);
        assert_eq!(Length::new(5.0, LengthUnit::Rem).to_px(), 80.0);
        assert_eq!(Length::new(1.0, LengthUnit::In).to_px(), 96.0);
        assert_eq!(Length::new(72.0, LengthUnit::Pt).to_px(), 96.0);
    }

    #[test]
    fn test_computed_string() {
        assert_eq!(Length::px(80.0).to_computed_string(), "80px");
        assert_eq!(Length::px(12.5).to_computed_string(), "12.5px");
        assert_eq!(format_px(0.0), "0px");
    }
}
