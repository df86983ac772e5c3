//! Live "current time" indicator.
//!
//! The indicator is active only while one of the viewed days is the calendar
//! day of "now". Its position is always derived from a fresh clock sample,
//! never advanced incrementally.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::clock::Clock;

/// How often the "now" sample is refreshed. The indicator moves at minute granularity.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum IndicatorState {
    Inactive,
    Active {
        date: NaiveDate,
        hour: u32,
        top_fraction: f64,
    },
}

impl IndicatorState {
    pub fn is_active(&self) -> bool {
        matches!(self, IndicatorState::Active { .. })
    }

    /// Hour slot and offset of the indicator if it sits on `date`.
    pub fn position_on(&self, date: NaiveDate) -> Option<(u32, f64)> {
        match *self {
            IndicatorState::Active {
                date: active,
                hour,
                top_fraction,
            } if active == date => Some((hour, top_fraction)),
            _ => None,
        }
    }
}

/// Indicator state for a view showing `days` at instant `now`.
pub fn evaluate(days: &[NaiveDate], now: NaiveDateTime) -> IndicatorState {
    let today = now.date();
    if !days.contains(&today) {
        return IndicatorState::Inactive;
    }

    let minutes = f64::from(now.minute()) + f64::from(now.second()) / 60.0;
    IndicatorState::Active {
        date: today,
        hour: now.hour(),
        top_fraction: minutes / 60.0,
    }
}

/// Handle to the periodic indicator task.
///
/// The task is aborted when the handle is dropped, so holding the handle for
/// the lifetime of a view is all the cleanup a caller needs.
pub struct IndicatorTicker {
    days: watch::Sender<Vec<NaiveDate>>,
    task: JoinHandle<()>,
}

impl IndicatorTicker {
    /// Start re-evaluating the indicator every `period` and whenever the viewed
    /// days change. Must be called from within a Tokio runtime.
    pub fn spawn(
        clock: Arc<dyn Clock>,
        days: Vec<NaiveDate>,
        period: Duration,
    ) -> (Self, watch::Receiver<IndicatorState>) {
        let (state_tx, state_rx) = watch::channel(evaluate(&days, clock.now()));
        let (days_tx, mut days_rx) = watch::channel(days);
        let period = period.max(Duration::from_millis(1));

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => {}
                    changed = days_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }

                let state = evaluate(&days_rx.borrow_and_update(), clock.now());
                if state_tx.send(state).is_err() {
                    break;
                }
            }

            debug!("indicator ticker stopped");
        });

        (IndicatorTicker { days: days_tx, task }, state_rx)
    }

    /// Point the indicator at a new set of viewed days (after navigation).
    pub fn retarget(&self, days: Vec<NaiveDate>) {
        self.days.send_replace(days);
    }

    pub fn cancel(self) {
        drop(self);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for IndicatorTicker {
    fn drop(&mut self) {
        self.task.abort();
    }
}
