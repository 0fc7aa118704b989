use crate::domain::accrual::{Classification, accrual_rate};
use crate::domain::pto::{Hours, ProjectionParams};
use crate::domain::snapshot::timestamp_ms;
use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_PAY_PERIOD_COUNT: u32 = 26;
pub const DEFAULT_YEARS_OF_SERVICE: u32 = 1;
pub const MAX_PAY_PERIOD_COUNT: u32 = 100;

/// User-editable inputs of the PTO calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormValues {
    #[serde(with = "timestamp_ms")]
    pub initial_start_date: NaiveDate,
    #[serde(rename = "initialPTO")]
    pub initial_pto: Hours,
    pub pay_period_count: u32,
    pub classification: Classification,
    pub years_of_service: u32,
}

impl FormValues {
    /// First-run values: the year's first Sunday, no balance, a year of periods.
    pub fn defaults_for(today: NaiveDate) -> Self {
        Self {
            initial_start_date: first_sunday_of_year(today.year()),
            initial_pto: Hours::ZERO,
            pay_period_count: DEFAULT_PAY_PERIOD_COUNT,
            classification: Classification::default(),
            years_of_service: DEFAULT_YEARS_OF_SERVICE,
        }
    }

    pub fn accrual_rate(&self) -> Hours {
        accrual_rate(self.classification, self.years_of_service)
    }

    pub fn projection_params(&self) -> ProjectionParams {
        ProjectionParams {
            start_date: self.initial_start_date,
            starting_balance: self.initial_pto,
            period_count: self.pay_period_count,
            accrual_rate: self.accrual_rate(),
        }
    }
}

/// The first Sunday on or after January 1st of `year`.
pub fn first_sunday_of_year(year: i32) -> NaiveDate {
    let jan_first = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or_default();
    let offset = (7 - jan_first.weekday().num_days_from_sunday()) % 7;
    jan_first + Days::new(u64::from(offset))
}

/// Reads a number typed into a field. Empty or malformed input yields `None`.
pub fn parse_hours(input: &str) -> Option<Hours> {
    Decimal::from_str(input.trim()).ok().map(Hours::new)
}

/// Spend field losing focus: an empty field becomes zero.
pub fn blur_spend(input: &str) -> Option<Hours> {
    if input.trim().is_empty() {
        Some(Hours::ZERO)
    } else {
        parse_hours(input)
    }
}

pub fn blur_initial_pto(input: &str) -> Hours {
    parse_hours(input).unwrap_or(Hours::ZERO)
}

pub fn blur_pay_period_count(input: &str) -> u32 {
    input
        .trim()
        .parse::<u32>()
        .map(|count| count.min(MAX_PAY_PERIOD_COUNT))
        .unwrap_or(DEFAULT_PAY_PERIOD_COUNT)
}

pub fn blur_years_of_service(input: &str) -> u32 {
    input.trim().parse().unwrap_or(DEFAULT_YEARS_OF_SERVICE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_first_sunday_of_year() {
        // 2023 starts on a Sunday, 2024 on a Monday.
        assert_eq!(first_sunday_of_year(2023), NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(first_sunday_of_year(2024), NaiveDate::from_ymd_opt(2024, 1, 7).unwrap());
        assert_eq!(first_sunday_of_year(2026), NaiveDate::from_ymd_opt(2026, 1, 4).unwrap());
    }

    #[test]
    fn test_defaults() {
        let form = FormValues::defaults_for(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
        assert_eq!(form.initial_start_date, NaiveDate::from_ymd_opt(2024, 1, 7).unwrap());
        assert_eq!(form.pay_period_count, 26);
        assert_eq!(form.years_of_service, 1);
        assert_eq!(form.accrual_rate(), Hours::new(dec!(7.69)));
    }

    #[test]
    fn test_parse_hours() {
        assert_eq!(parse_hours(" 8.5 "), Some(Hours::new(dec!(8.5))));
        assert_eq!(parse_hours(""), None);
        assert_eq!(parse_hours("eight"), None);
    }

    #[test]
    fn test_blur_defaults() {
        assert_eq!(blur_spend(""), Some(Hours::ZERO));
        assert_eq!(blur_spend("4"), Some(Hours::new(dec!(4))));
        assert_eq!(blur_initial_pto(""), Hours::ZERO);
        assert_eq!(blur_pay_period_count(""), 26);
        assert_eq!(blur_pay_period_count("500"), 100);
        assert_eq!(blur_years_of_service("x"), 1);
        assert_eq!(blur_years_of_service("6"), 6);
    }
}
