use crate::domain::pto::Hours;
use crate::error::ToolError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Years-of-service range (inclusive) and the hours it earns per pay period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccrualBand {
    pub min_years: u32,
    /// `None` means no upper bound.
    pub max_years: Option<u32>,
    pub accrual_rate: Decimal,
}

impl AccrualBand {
    pub fn contains(&self, years: u32) -> bool {
        self.min_years <= years && self.max_years.is_none_or(|max| years <= max)
    }
}

const STAFF_BANDS: &[AccrualBand] = &[
    AccrualBand {
        min_years: 0,
        max_years: Some(3),
        accrual_rate: dec!(7.69),
    },
    AccrualBand {
        min_years: 4,
        max_years: None,
        accrual_rate: dec!(9.23),
    },
];

const PHYSICIAN_BANDS: &[AccrualBand] = &[AccrualBand {
    min_years: 0,
    max_years: None,
    accrual_rate: dec!(9.23),
}];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Classification {
    #[default]
    Staff,
    #[serde(rename = "Physicians, Department Heads, and Above")]
    Physician,
}

impl Classification {
    pub const ALL: [Classification; 2] = [Classification::Staff, Classification::Physician];

    pub fn bands(&self) -> &'static [AccrualBand] {
        match self {
            Classification::Staff => STAFF_BANDS,
            Classification::Physician => PHYSICIAN_BANDS,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Classification::Staff => "Staff",
            Classification::Physician => "Physicians, Department Heads, and Above",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Classification {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "staff" => Ok(Classification::Staff),
            "physician" | "physicians, department heads, and above" => {
                Ok(Classification::Physician)
            }
            _ => Err(ToolError::UnknownClassification(s.to_string())),
        }
    }
}

/// Hours accrued per pay period. Falls back to zero when no band matches.
pub fn accrual_rate(classification: Classification, years_of_service: u32) -> Hours {
    classification
        .bands()
        .iter()
        .find(|band| band.contains(years_of_service))
        .map(|band| Hours::new(band.accrual_rate))
        .unwrap_or(Hours::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_rates() {
        assert_eq!(accrual_rate(Classification::Staff, 0), Hours::new(dec!(7.69)));
        assert_eq!(accrual_rate(Classification::Staff, 3), Hours::new(dec!(7.69)));
        assert_eq!(accrual_rate(Classification::Staff, 4), Hours::new(dec!(9.23)));
        assert_eq!(accrual_rate(Classification::Staff, 40), Hours::new(dec!(9.23)));
    }

    #[test]
    fn test_physician_rate() {
        assert_eq!(
            accrual_rate(Classification::Physician, 0),
            Hours::new(dec!(9.23))
        );
    }

    #[test]
    fn test_bands_partition_years() {
        for classification in Classification::ALL {
            for years in 0..100 {
                let matches = classification
                    .bands()
                    .iter()
                    .filter(|band| band.contains(years))
                    .count();
                assert_eq!(matches, 1, "{classification} at {years} years");
            }
        }
    }

    #[test]
    fn test_parse_classification() {
        assert_eq!("Staff".parse::<Classification>().unwrap(), Classification::Staff);
        assert_eq!(
            "physician".parse::<Classification>().unwrap(),
            Classification::Physician
        );
        assert!(matches!(
            "intern".parse::<Classification>(),
            Err(ToolError::UnknownClassification(_))
        ));
    }

    #[test]
    fn test_classification_serializes_as_label() {
        let json = serde_json::to_string(&Classification::Physician).unwrap();
        assert_eq!(json, "\"Physicians, Department Heads, and Above\"");
    }
}
