use crate::domain::form::{FormValues, MAX_PAY_PERIOD_COUNT};
use crate::domain::pto::{PAY_PERIOD_DAYS, PayPeriod};
use crate::error::{Result, ToolError};
use serde::{Deserialize, Serialize};

/// Key the calculator state is stored under.
pub const STORAGE_KEY: &str = "sralab-tools-pto-calculator";
pub const SNAPSHOT_VERSION: u32 = 1;

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

/// Persisted calculator state: the form inputs and the last computed periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PtoSnapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    pub form_values: FormValues,
    pub pay_period_array: Vec<PayPeriod>,
}

impl PtoSnapshot {
    pub fn new(form_values: FormValues, pay_period_array: Vec<PayPeriod>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            form_values,
            pay_period_array,
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Parses and validates a stored payload. Anything that does not describe
    /// at most 100 consecutive 14-day periods is rejected rather than
    /// partially loaded.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let snapshot: PtoSnapshot = serde_json::from_slice(bytes)
            .map_err(|e| ToolError::CorruptSnapshot(e.to_string()))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(ToolError::UnsupportedVersion(snapshot.version));
        }
        snapshot.validate()?;
        Ok(snapshot)
    }

    fn validate(&self) -> Result<()> {
        let form = &self.form_values;
        if form.pay_period_count > MAX_PAY_PERIOD_COUNT {
            return Err(ToolError::CorruptSnapshot(format!(
                "pay period count {} exceeds {MAX_PAY_PERIOD_COUNT}",
                form.pay_period_count
            )));
        }
        if !form.projection_params().fits_calendar() {
            return Err(ToolError::CorruptSnapshot(format!(
                "pay periods starting {} run past the calendar",
                form.initial_start_date
            )));
        }

        for (i, period) in self.pay_period_array.iter().enumerate() {
            if Some(period.end) != PayPeriod::end_for(period.start) {
                return Err(ToolError::CorruptSnapshot(format!(
                    "period {} does not span {PAY_PERIOD_DAYS} days",
                    i + 1
                )));
            }
            if let Some(next) = self.pay_period_array.get(i + 1)
                && Some(next.start) != PayPeriod::start_for(period.start, 1)
            {
                return Err(ToolError::CorruptSnapshot(format!(
                    "period {} does not follow period {}",
                    i + 2,
                    i + 1
                )));
            }
        }
        Ok(())
    }
}

/// Serializes a `NaiveDate` as milliseconds since the epoch at UTC midnight.
/// Reading also accepts RFC 3339 strings and plain `YYYY-MM-DD` dates.
pub(crate) mod timestamp_ms {
    use chrono::{DateTime, NaiveDate, NaiveTime};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDate {
        Millis(i64),
        Text(String),
    }

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(date.and_time(NaiveTime::MIN).and_utc().timestamp_millis())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawDate::deserialize(deserializer)? {
            RawDate::Millis(ms) => DateTime::from_timestamp_millis(ms)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {ms}"))),
            RawDate::Text(text) => DateTime::parse_from_rfc3339(&text)
                .map(|dt| dt.date_naive())
                .or_else(|_| NaiveDate::parse_from_str(&text, "%Y-%m-%d"))
                .map_err(|_| D::Error::custom(format!("invalid date: {text}"))),
        }
    }
}
