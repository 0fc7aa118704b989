use crate::application::debounce::Debouncer;
use crate::domain::accrual::Classification;
use crate::domain::form::{FormValues, MAX_PAY_PERIOD_COUNT, parse_hours};
use crate::domain::ports::SnapshotStoreBox;
use crate::domain::pto::{
    Hours, PayPeriod, ProjectionMode, ProjectionParams, project_pay_periods, with_spend,
};
use crate::domain::snapshot::PtoSnapshot;
use crate::error::{Result, ToolError};
use chrono::NaiveDate;
use std::time::Duration;

/// How long edits must settle before state is written to the store.
pub const SAVE_DEBOUNCE: Duration = Duration::from_millis(500);

/// The PTO calculator behind the form.
///
/// Every input change re-runs the full projection, carrying entered spends
/// over by index, then schedules a debounced save of the new state.
pub struct PtoCalculator {
    store: SnapshotStoreBox,
    defaults: FormValues,
    form: FormValues,
    periods: Vec<PayPeriod>,
    saver: Debouncer,
}

impl PtoCalculator {
    /// Creates a calculator with first-run values for the year of `today`.
    ///
    /// # Arguments
    ///
    /// * `store` - Where state is restored from and saved to.
    /// * `today` - Used to pick the default first pay period.
    pub fn new(store: SnapshotStoreBox, today: NaiveDate) -> Self {
        let defaults = FormValues::defaults_for(today);
        let periods = project_pay_periods(
            &defaults.projection_params(),
            &[],
            ProjectionMode::Initialize,
        );
        Self {
            store,
            defaults,
            form: defaults,
            periods,
            saver: Debouncer::new(SAVE_DEBOUNCE),
        }
    }

    /// Loads saved state, if any. Returns whether anything was restored.
    ///
    /// A corrupt or unsupported snapshot is discarded with a warning and the
    /// current state is kept.
    pub async fn restore(&mut self) -> Result<bool> {
        match self.store.load().await {
            Ok(Some(snapshot)) => {
                self.form = snapshot.form_values;
                self.periods = project_pay_periods(
                    &self.form.projection_params(),
                    &snapshot.pay_period_array,
                    ProjectionMode::Carry,
                );
                tracing::info!(periods = self.periods.len(), "restored saved state");
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(e @ (ToolError::CorruptSnapshot(_) | ToolError::UnsupportedVersion(_))) => {
                tracing::warn!("Discarding saved state: {}", e);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    pub fn form(&self) -> &FormValues {
        &self.form
    }

    pub fn periods(&self) -> &[PayPeriod] {
        &self.periods
    }

    pub fn accrual_rate(&self) -> Hours {
        self.form.accrual_rate()
    }

    pub fn snapshot(&self) -> PtoSnapshot {
        PtoSnapshot::new(self.form, self.periods.clone())
    }

    /// Moves the first pay period. Rejects dates whose periods would run
    /// past the last day the calendar can represent.
    pub fn set_start_date(&mut self, date: NaiveDate) -> Result<()> {
        let params = ProjectionParams {
            start_date: date,
            ..self.form.projection_params()
        };
        if !params.fits_calendar() {
            return Err(ToolError::DateOutOfRange(date));
        }
        self.form.initial_start_date = date;
        self.recalculate();
        Ok(())
    }

    pub fn set_initial_pto(&mut self, hours: Hours) {
        self.form.initial_pto = hours;
        self.recalculate();
    }

    pub fn set_pay_period_count(&mut self, count: u32) {
        self.form.pay_period_count = count.min(MAX_PAY_PERIOD_COUNT);
        self.recalculate();
    }

    pub fn set_classification(&mut self, classification: Classification) {
        self.form.classification = classification;
        self.recalculate();
    }

    pub fn set_years_of_service(&mut self, years: u32) {
        self.form.years_of_service = years;
        self.recalculate();
    }

    /// Replaces the spend of the period at `index` and re-derives balances.
    pub fn set_spend(&mut self, index: usize, spend: Option<Hours>) {
        self.periods = with_spend(&self.periods, index, spend);
        self.recalculate();
    }

    /// Spend field edited: unparseable input clears the spend.
    pub fn edit_spend(&mut self, index: usize, input: &str) {
        self.set_spend(index, parse_hours(input));
    }

    /// Spend field lost focus: an empty field becomes zero.
    pub fn blur_spend(&mut self, index: usize, input: &str) {
        if input.trim().is_empty() {
            self.set_spend(index, Some(Hours::ZERO));
        }
    }

    /// Back to first-run values, dropping every entered spend.
    pub fn reset(&mut self) {
        self.form = self.defaults;
        self.periods = project_pay_periods(
            &self.form.projection_params(),
            &[],
            ProjectionMode::Initialize,
        );
        self.schedule_save();
    }

    /// Writes the current state now, cancelling any pending debounced save.
    pub async fn flush(&mut self) -> Result<()> {
        self.saver.cancel();
        self.store.save(&self.snapshot()).await
    }

    fn recalculate(&mut self) {
        self.periods = project_pay_periods(
            &self.form.projection_params(),
            &self.periods,
            ProjectionMode::Carry,
        );
        self.schedule_save();
    }

    fn schedule_save(&mut self) {
        let store = self.store.clone();
        let snapshot = self.snapshot();
        self.saver.schedule(async move {
            if let Err(e) = store.save(&snapshot).await {
                tracing::warn!("Failed to save state: {}", e);
            }
        });
    }
}
