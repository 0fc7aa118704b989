use crate::domain::pto::PayPeriod;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

const DATE_FORMAT: &str = "%m/%d/%Y";

#[derive(Serialize)]
struct PayPeriodRow {
    start: String,
    end: String,
    spend: Option<Decimal>,
    balance: Decimal,
}

impl From<&PayPeriod> for PayPeriodRow {
    fn from(period: &PayPeriod) -> Self {
        Self {
            start: period.start.format(DATE_FORMAT).to_string(),
            end: period.end.format(DATE_FORMAT).to_string(),
            spend: period.spend.map(|spend| spend.value()),
            balance: period.balance.rounded().value(),
        }
    }
}

/// Writes the pay-period table as CSV, balances rounded to two decimals.
pub struct PayPeriodWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> PayPeriodWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_periods(&mut self, periods: &[PayPeriod]) -> Result<()> {
        if periods.is_empty() {
            self.writer
                .write_record(["start", "end", "spend", "balance"])?;
        }
        for period in periods {
            self.writer.serialize(PayPeriodRow::from(period))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pto::{Hours, ProjectionMode, ProjectionParams, project_pay_periods};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn render(periods: &[PayPeriod]) -> String {
        let mut buf = Vec::new();
        PayPeriodWriter::new(&mut buf).write_periods(periods).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_writes_table() {
        let params = ProjectionParams {
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            starting_balance: Hours::new(dec!(1.005)),
            period_count: 2,
            accrual_rate: Hours::new(dec!(7.69)),
        };
        let periods = project_pay_periods(&params, &[], ProjectionMode::Initialize);

        let output = render(&periods);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "start,end,spend,balance");
        assert_eq!(lines[1], "01/01/2023,01/14/2023,0,1.01");
        assert_eq!(lines[2], "01/15/2023,01/28/2023,,8.7");
    }

    #[test]
    fn test_empty_table_has_header() {
        assert_eq!(render(&[]), "start,end,spend,balance\n");
    }
}
