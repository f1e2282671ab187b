//! Daily completion streak.
//!
//! A streak counts consecutive calendar days with at least one completed
//! task. Dates are passed in by the caller so the logic stays clock-free.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    /// Consecutive days ending at `last_completed_on`
    pub current: u32,
    /// Longest streak ever recorded
    pub best: u32,
    pub last_completed_on: Option<NaiveDate>,
}

impl Streak {
    /// Record a completion on `today`. Returns `true` when the streak grew.
    ///
    /// A date before the last completion (clock moved backwards) counts as
    /// the same day and never moves `last_completed_on` back.
    pub fn record(&mut self, today: NaiveDate) -> bool {
        let before = self.current;
        let (current, last_completed_on) = match self.last_completed_on {
            Some(last) if today <= last => (self.current.max(1), last),
            Some(last) if last.succ_opt() == Some(today) => {
                (self.current.saturating_add(1), today)
            }
            _ => (1, today),
        };
        self.current = current;
        self.last_completed_on = Some(last_completed_on);
        self.best = self.best.max(self.current);
        self.current > before
    }

    /// The streak as seen on `today`: zero once a full day has been missed.
    pub fn current_on(&self, today: NaiveDate) -> u32 {
        match self.last_completed_on {
            Some(last) if last == today || last.succ_opt() == Some(today) => self.current,
            _ => 0,
        }
    }
}
