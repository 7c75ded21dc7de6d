// SPDX-License-Identifier: MIT

//!
//! The calendar state holder
//!
//! A [`Calendar`] owns the current snapshot and at most one outstanding
//! background generation.  Every change is an explicit method call that
//! either returns the new snapshot's changes straight away or starts a
//! background generation whose result is collected with
//! [`Calendar::check_generation_response`] or
//! [`Calendar::wait_for_generation`].  Starting a new request cancels the
//! previous one and drops its channel, so a superseded result can never be
//! delivered.
//!

use crate::{
    CancellationToken, DayPosition, EditScript, Locator, MonthScrollTracker, Snapshot,
    ViewportBounds, VisibleItems, diff,
};
use calendar_grid_core::{
    CalendarDay, CalendarMonth, ConfigError, MonthConfig, MonthPolicies, NaiveDate, Weekday,
    YearMonth,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc::Receiver;
use tokio::sync::mpsc::error::TryRecvError;

/// Errors that can arise when using a [`Calendar`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// The operation needs a range but `setup` hasn't been called
    #[error("`{0}` is not set. Has `setup` been called?")]
    NotConfigured(&'static str),

    /// The requested configuration is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Background generation needs a tokio runtime
    #[error("Background generation must be started from within a tokio runtime")]
    NoRuntime,
}

/// Where the calendar is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CalendarState {
    /// No snapshot yet
    Unconfigured,

    /// A snapshot and nothing outstanding
    Configured,

    /// A snapshot plus an outstanding background generation
    Reconfiguring,
}

/// What the rendering layer has to do for a new snapshot
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SnapshotUpdate {
    /// The range changed: apply the edit script to the previous months
    Edited(EditScript),

    /// Rebind everything (the first snapshot, or the layout policies changed)
    Reloaded,

    /// Nothing was generated because no range is set yet.  The policies are
    /// kept for the next `setup`.
    Deferred,
}

/// The range and first day of the week last asked for (which may not have
/// been generated yet)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct MonthRange {
    start_month: YearMonth,
    end_month: YearMonth,
    first_day_of_week: Weekday,
}

/// A finished background generation
#[derive(Debug)]
struct GenerationResult {
    snapshot: Snapshot,
    update: SnapshotUpdate,
}

/// The outstanding background generation
#[derive(Debug)]
struct PendingGeneration {
    token: CancellationToken,
    rx: Receiver<Option<GenerationResult>>,
}

/// Holds a calendar's configuration and its current snapshot
#[derive(Debug, Default)]
pub struct Calendar {
    /// The layout policies last asked for
    policies: MonthPolicies,

    /// The range last asked for
    range: Option<MonthRange>,

    /// The snapshot the rendering layer is showing
    snapshot: Option<Arc<Snapshot>>,

    /// At most one generation running in the background
    pending: Option<PendingGeneration>,

    /// Reports the first visible month when it changes
    scroll_tracker: MonthScrollTracker,
}

impl Calendar {
    /// Create an unconfigured calendar with the given layout policies
    pub fn new(policies: MonthPolicies) -> Self {
        let mut calendar = Calendar::default();
        calendar.policies = policies;
        calendar
    }

    pub fn state(&self) -> CalendarState {
        match (&self.snapshot, &self.pending) {
            (None, _) => CalendarState::Unconfigured,
            (Some(_), None) => CalendarState::Configured,
            (Some(_), Some(_)) => CalendarState::Reconfiguring,
        }
    }

    pub fn policies(&self) -> MonthPolicies {
        self.policies
    }

    /// The start month last asked for
    pub fn start_month(&self) -> Result<YearMonth, CalendarError> {
        Ok(self.require_range("start_month")?.start_month)
    }

    /// The end month last asked for
    pub fn end_month(&self) -> Result<YearMonth, CalendarError> {
        Ok(self.require_range("end_month")?.end_month)
    }

    /// The first day of the week last asked for
    pub fn first_day_of_week(&self) -> Result<Weekday, CalendarError> {
        Ok(self.require_range("first_day_of_week")?.first_day_of_week)
    }

    fn require_range(&self, field: &'static str) -> Result<MonthRange, CalendarError> {
        self.range.ok_or(CalendarError::NotConfigured(field))
    }

    /// The current snapshot (not including any outstanding generation)
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_deref()
    }

    /// The current snapshot's configuration
    pub fn config(&self) -> Option<&MonthConfig> {
        self.snapshot().map(|snapshot| snapshot.config())
    }

    /// The current snapshot's months (empty until configured)
    pub fn months(&self) -> &[CalendarMonth] {
        self.snapshot().map_or(&[], |snapshot| snapshot.months())
    }

    //--------------------------------------------------------------------------
    // Synchronous (re)configuration
    //--------------------------------------------------------------------------

    /// Set the range and first day of the week, and generate the months
    pub fn setup(
        &mut self,
        start_month: YearMonth,
        end_month: YearMonth,
        first_day_of_week: Weekday,
    ) -> Result<&[CalendarMonth], CalendarError> {
        self.cancel_pending();
        let config = MonthConfig::new(start_month, end_month, first_day_of_week, self.policies)?;
        self.range = Some(MonthRange {
            start_month,
            end_month,
            first_day_of_week,
        });
        self.replace_snapshot(Snapshot::generate(config));
        Ok(self.months())
    }

    /// Change the range (unset bounds keep their current value).  Returns the
    /// edits from the previous months, or `Reloaded` if the previous months
    /// were laid out under other policies or another first day of the week.
    pub fn update_month_range(
        &mut self,
        start_month: Option<YearMonth>,
        end_month: Option<YearMonth>,
    ) -> Result<SnapshotUpdate, CalendarError> {
        self.cancel_pending();
        let config = self.set_range(start_month, end_month)?;
        let snapshot = Snapshot::generate(config);
        let update = snapshot_update(self.snapshot(), &snapshot);
        self.replace_snapshot(snapshot);
        Ok(update)
    }

    /// Change the layout policies.  Without a range the policies are only
    /// stored.
    pub fn update_month_configuration(
        &mut self,
        policies: MonthPolicies,
    ) -> Result<SnapshotUpdate, CalendarError> {
        self.cancel_pending();
        self.policies = policies;
        let Some(config) = self.requested_config()? else {
            return Ok(SnapshotUpdate::Deferred);
        };
        self.replace_snapshot(Snapshot::generate(config));
        Ok(SnapshotUpdate::Reloaded)
    }

    //--------------------------------------------------------------------------
    // Background (re)configuration
    //--------------------------------------------------------------------------

    /// Like [`Calendar::setup`], generating in the background.  Configuration
    /// errors are still returned straight away.
    pub fn setup_async(
        &mut self,
        start_month: YearMonth,
        end_month: YearMonth,
        first_day_of_week: Weekday,
    ) -> Result<(), CalendarError> {
        self.cancel_pending();
        let config = MonthConfig::new(start_month, end_month, first_day_of_week, self.policies)?;
        self.range = Some(MonthRange {
            start_month,
            end_month,
            first_day_of_week,
        });
        self.spawn_generation(config, None)
    }

    /// Like [`Calendar::update_month_range`], generating and diffing in the
    /// background
    pub fn update_month_range_async(
        &mut self,
        start_month: Option<YearMonth>,
        end_month: Option<YearMonth>,
    ) -> Result<(), CalendarError> {
        self.cancel_pending();
        let config = self.set_range(start_month, end_month)?;
        let previous = self.snapshot.clone();
        self.spawn_generation(config, previous)
    }

    /// Like [`Calendar::update_month_configuration`], generating in the
    /// background.  Without a range the policies are only stored and nothing
    /// is started.
    pub fn update_month_configuration_async(
        &mut self,
        policies: MonthPolicies,
    ) -> Result<(), CalendarError> {
        self.cancel_pending();
        self.policies = policies;
        match self.requested_config()? {
            Some(config) => self.spawn_generation(config, None),
            None => Ok(()),
        }
    }

    /// Collect the outstanding generation's result if it is ready (never
    /// blocks).  Returns `None` while waiting, when nothing is outstanding and
    /// when the generation was cancelled.
    pub fn check_generation_response(&mut self) -> Option<SnapshotUpdate> {
        let pending = self.pending.as_mut()?;
        match pending.rx.try_recv() {
            Ok(result) => {
                debug!("Recv generation response");
                self.pending = None;
                self.apply_generation_result(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                warn!("Generation task ended without a response");
                self.pending = None;
                None
            }
        }
    }

    /// Wait for the outstanding generation and apply its result.  Returns
    /// `None` when nothing is outstanding or the generation was cancelled.
    pub async fn wait_for_generation(&mut self) -> Option<SnapshotUpdate> {
        let pending = self.pending.as_mut()?;
        let result = pending.rx.recv().await;
        self.pending = None;
        match result {
            Some(result) => self.apply_generation_result(result),
            None => {
                warn!("Generation task ended without a response");
                None
            }
        }
    }

    /// Cancel the outstanding generation (if any).  Its result, even if
    /// already computed, is never applied.
    pub fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!("Cancelling outstanding generation");
            pending.token.cancel();
        }
    }

    //--------------------------------------------------------------------------
    // Lookups
    //--------------------------------------------------------------------------

    /// Look up visible items and scroll positions in the current snapshot
    pub fn locator(&self) -> Option<Locator<'_>> {
        self.snapshot().map(|snapshot| snapshot.locator())
    }

    /// The first/last visible month and day for the viewport
    pub fn locate_visible(&self, bounds: ViewportBounds) -> Option<VisibleItems<'_>> {
        self.locator()?.visible(bounds)
    }

    /// The position to scroll to for a month
    pub fn month_position(&self, year_month: YearMonth) -> Option<usize> {
        self.locator()?.month_position(year_month)
    }

    /// The position to scroll to for a day
    pub fn day_position(&self, day: &CalendarDay) -> Option<DayPosition> {
        self.locator()?.day_position(day)
    }

    /// The month the rendering layer must rebind after the month's data changed
    pub fn notify_month_changed(&self, year_month: YearMonth) -> Option<usize> {
        self.month_position(year_month)
    }

    /// The month the rendering layer must rebind after a day's data changed
    pub fn notify_day_changed(&self, day: &CalendarDay) -> Option<usize> {
        self.day_position(day).map(|position| position.month_index)
    }

    /// Every month the rendering layer must rebind after a date's data
    /// changed, whichever month owns the cell
    pub fn notify_date_changed(&self, date: NaiveDate) -> Vec<usize> {
        self.locator()
            .map(|locator| locator.months_containing_date(date))
            .unwrap_or_default()
    }

    /// The first visible month, if it changed since the last call
    pub fn observe_scroll(&mut self, bounds: ViewportBounds) -> Option<&CalendarMonth> {
        let snapshot = self.snapshot.as_deref()?;
        self.scroll_tracker.observe(&snapshot.locator(), bounds)
    }

    //--------------------------------------------------------------------------
    // Internals
    //--------------------------------------------------------------------------

    /// Store a new range (unset bounds keep their current value) and return
    /// the config to generate
    fn set_range(
        &mut self,
        start_month: Option<YearMonth>,
        end_month: Option<YearMonth>,
    ) -> Result<MonthConfig, CalendarError> {
        let range = self.require_range("start_month")?;
        let range = MonthRange {
            start_month: start_month.unwrap_or(range.start_month),
            end_month: end_month.unwrap_or(range.end_month),
            first_day_of_week: range.first_day_of_week,
        };
        let config = MonthConfig::new(
            range.start_month,
            range.end_month,
            range.first_day_of_week,
            self.policies,
        )?;
        self.range = Some(range);
        Ok(config)
    }

    /// The config for the range and policies last asked for (`None` without a
    /// range)
    fn requested_config(&self) -> Result<Option<MonthConfig>, ConfigError> {
        self.range
            .map(|range| {
                MonthConfig::new(
                    range.start_month,
                    range.end_month,
                    range.first_day_of_week,
                    self.policies,
                )
            })
            .transpose()
    }

    fn replace_snapshot(&mut self, snapshot: Snapshot) {
        debug!(
            "Replacing snapshot with {} to {}",
            snapshot.config().start_month(),
            snapshot.config().end_month()
        );
        self.snapshot = Some(Arc::new(snapshot));
        self.scroll_tracker.reset();
    }

    fn apply_generation_result(
        &mut self,
        result: Option<GenerationResult>,
    ) -> Option<SnapshotUpdate> {
        let Some(GenerationResult { snapshot, update }) = result else {
            debug!("Generation was cancelled; keeping the current snapshot");
            return None;
        };
        self.replace_snapshot(snapshot);
        Some(update)
    }

    /// Generate `config` on tokio's blocking pool.  The result is diffed
    /// against `previous` when both share a layout, otherwise it is a reload.
    fn spawn_generation(
        &mut self,
        config: MonthConfig,
        previous: Option<Arc<Snapshot>>,
    ) -> Result<(), CalendarError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| CalendarError::NoRuntime)?;

        let token = CancellationToken::new();
        let (tx, rx) = tokio::sync::mpsc::channel(1);
        let task_token = token.clone();
        runtime.spawn_blocking(move || {
            let result = Snapshot::generate_cancellable(config, &task_token).map(|snapshot| {
                let update = snapshot_update(previous.as_deref(), &snapshot);
                GenerationResult { snapshot, update }
            });
            // Fails only if the request was superseded (receiver dropped)
            let _ = tx.blocking_send(result);
        });

        debug!(
            "Started background generation for {} to {}",
            config.start_month(),
            config.end_month()
        );
        self.pending = Some(PendingGeneration { token, rx });
        Ok(())
    }
}

/// What the rendering layer must do to go from `previous` to `snapshot`.
///
/// An edit script only touches months entering or leaving the range, so it
/// is returned only when every month kept from `previous` has the same grid
/// in `snapshot`.  That fails when the layout changed, and also when moving a
/// range edge changes a kept month's padding (no boundaries, or in-dates for
/// the first month only).
fn snapshot_update(previous: Option<&Snapshot>, snapshot: &Snapshot) -> SnapshotUpdate {
    let Some(previous) = previous else {
        return SnapshotUpdate::Reloaded;
    };
    if !previous.config().has_same_layout(snapshot.config()) {
        debug!("Layout changed; reloading every month");
        return SnapshotUpdate::Reloaded;
    }
    let locator = previous.locator();
    let regridded = snapshot.months().iter().any(|month| {
        locator
            .month_position(month.year_month())
            .and_then(|index| previous.months().get(index))
            .is_some_and(|kept| kept.week_days() != month.week_days())
    });
    if regridded {
        debug!("Kept months were regridded; reloading every month");
        return SnapshotUpdate::Reloaded;
    }
    SnapshotUpdate::Edited(diff(previous.months(), snapshot.months()))
}

impl Drop for Calendar {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
