//! XP award policies.
//!
//! The progress engine only sees an amount; these functions decide how much
//! a completed task is worth.

use serde::{Deserialize, Serialize};

use crate::task::{Priority, Task};

/// How a completed task is converted into XP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardPolicy {
    /// One XP per whole minute of the task's duration (timed menu tasks)
    PerMinute,
    /// Flat amount per priority tier (subcommand tasks)
    PerPriority,
}

impl RewardPolicy {
    /// Policy for a task started from the menu timer. Tasks added without a
    /// duration have nothing to time, so they earn their priority tier.
    pub fn for_timed(task: &Task) -> Self {
        if task.duration_secs.is_some() {
            Self::PerMinute
        } else {
            Self::PerPriority
        }
    }

    pub fn xp_for(&self, task: &Task) -> u64 {
        match self {
            Self::PerMinute => xp_for_duration(task.duration_secs.unwrap_or(0)),
            Self::PerPriority => xp_for_priority(task.priority),
        }
    }
}

pub fn xp_for_priority(priority: Priority) -> u64 {
    match priority {
        Priority::Low => 5,
        Priority::Medium => 10,
        Priority::High => 20,
    }
}

/// One XP per whole minute; partial minutes are dropped.
pub fn xp_for_duration(secs: u64) -> u64 {
    secs / 60
}
