use crate::domain::snapshot::timestamp_ms;
use chrono::{Days, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

pub const PAY_PERIOD_DAYS: u64 = 14;

/// An amount of paid time off, in hours.
///
/// Wraps `rust_decimal::Decimal` so accrual rates such as 7.69 add up
/// exactly across a year of pay periods. Serialized as a plain JSON number.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Hours(#[serde(with = "rust_decimal::serde::float")] pub Decimal);

impl Hours {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Rounded to two decimals for display, midpoints toward positive
    /// infinity: 1.005 becomes 1.01 and -1.005 becomes -1.
    pub fn rounded(&self) -> Self {
        let strategy = if self.0.is_sign_negative() {
            RoundingStrategy::MidpointTowardZero
        } else {
            RoundingStrategy::MidpointAwayFromZero
        };
        Self(self.0.round_dp_with_strategy(2, strategy).normalize())
    }
}

impl From<Decimal> for Hours {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Saturating, so a projection never panics on out-of-range balances.
impl Add for Hours {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Hours {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl AddAssign for Hours {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Hours {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

/// One 14-day pay period and the balance left at its end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayPeriod {
    #[serde(with = "timestamp_ms")]
    pub start: NaiveDate,
    #[serde(with = "timestamp_ms")]
    pub end: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spend: Option<Hours>,
    pub balance: Hours,
}

impl PayPeriod {
    /// Last day of the period that starts on `start`, if the calendar has one.
    pub fn end_for(start: NaiveDate) -> Option<NaiveDate> {
        start.checked_add_days(Days::new(PAY_PERIOD_DAYS - 1))
    }

    /// First day of the period `index` periods after the one starting on `start`.
    pub fn start_for(start: NaiveDate, index: u32) -> Option<NaiveDate> {
        start.checked_add_days(Days::new(PAY_PERIOD_DAYS * u64::from(index)))
    }
}

/// Upstream inputs every period's balance depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionParams {
    pub start_date: NaiveDate,
    pub starting_balance: Hours,
    pub period_count: u32,
    pub accrual_rate: Hours,
}

impl ProjectionParams {
    /// Whether the last window of the projection ends on a representable date.
    pub fn fits_calendar(&self) -> bool {
        match self.period_count.checked_sub(1) {
            None => true,
            Some(last) => PayPeriod::start_for(self.start_date, last)
                .and_then(PayPeriod::end_for)
                .is_some(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    /// Missing first-period spend becomes zero, so the first row is editable.
    Initialize,
    /// Spends are carried over by index unchanged.
    Carry,
}

/// Rebuilds the whole pay-period sequence from `params`.
///
/// Spends are taken from `prior` by index; periods beyond its length have
/// none. The first balance is the starting balance minus its spend, every
/// later one adds the accrual rate to the previous balance before
/// subtracting its own spend. Stops early at the first window that would
/// run past the end of the calendar.
pub fn project_pay_periods(
    params: &ProjectionParams,
    prior: &[PayPeriod],
    mode: ProjectionMode,
) -> Vec<PayPeriod> {
    let mut periods: Vec<PayPeriod> = Vec::new();

    for index in 0..params.period_count {
        let Some((start, end)) = PayPeriod::start_for(params.start_date, index)
            .and_then(|start| Some((start, PayPeriod::end_for(start)?)))
        else {
            tracing::warn!(periods = periods.len(), "pay periods run past the calendar");
            break;
        };
        let i = index as usize;
        let mut spend = prior.get(i).and_then(|p| p.spend);
        if mode == ProjectionMode::Initialize && i == 0 && spend.is_none() {
            spend = Some(Hours::ZERO);
        }

        let opening = match periods.last() {
            None => params.starting_balance,
            Some(previous) => previous.balance + params.accrual_rate,
        };

        periods.push(PayPeriod {
            start,
            end,
            spend,
            balance: opening - spend.unwrap_or(Hours::ZERO),
        });
    }

    tracing::debug!(periods = periods.len(), "projected pay periods");
    periods
}

/// Copies `periods` with the spend at `index` replaced. Out-of-range indices
/// leave the copy unchanged.
pub fn with_spend(periods: &[PayPeriod], index: usize, spend: Option<Hours>) -> Vec<PayPeriod> {
    periods
        .iter()
        .enumerate()
        .map(|(i, period)| {
            if i == index {
                PayPeriod {
                    spend,
                    ..period.clone()
                }
            } else {
                period.clone()
            }
        })
        .collect()
}
