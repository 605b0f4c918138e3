//! The unit-tagged value algebra math expressions evaluate over.

use tinct_core::fmt::serialize_number;

/// Canonical unit categories. Lengths are carried in px, angles in degrees;
/// other units are scaled into these at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcUnit {
    Number,
    Percent,
    Length,
    Angle,
}

/// A numeric value tagged with its unit category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalcValue {
    pub value: f64,
    pub unit: CalcUnit,
}

impl CalcValue {
    pub fn number(value: f64) -> Self {
        Self { value, unit: CalcUnit::Number }
    }

    pub fn percent(value: f64) -> Self {
        Self { value, unit: CalcUnit::Percent }
    }

    pub fn length(value: f64) -> Self {
        Self { value, unit: CalcUnit::Length }
    }

    pub fn angle(value: f64) -> Self {
        Self { value, unit: CalcUnit::Angle }
    }

    /// A copy with the same unit and a new number.
    pub fn with_value(self, value: f64) -> Self {
        Self { value, unit: self.unit }
    }

    /// Serialize in the canonical unit for the category.
    pub fn serialize(&self) -> String {
        let n = serialize_number(self.value);
        match self.unit {
            CalcUnit::Number => n,
            CalcUnit::Percent => format!("{n}%"),
            CalcUnit::Length => format!("{n}px"),
            CalcUnit::Angle => format!("{n}deg"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_units() {
        assert_eq!(CalcValue::number(12.0).serialize(), "12");
        assert_eq!(CalcValue::percent(60.0).serialize(), "60%");
        assert_eq!(CalcValue::length(1599.0).serialize(), "1599px");
        assert_eq!(CalcValue::angle(-90.5).serialize(), "-90.5deg");
    }
}
