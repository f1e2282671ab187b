//! Experience and leveling engine.
//!
//! A user's progress is a plain value ([`UserProgress`]) that callers load
//! from storage, hand to a [`ProgressEngine`] for mutation, and persist again.
//! The engine keeps the invariant `0 <= xp < level * 100` after every award.
//!
//! ```
//! use taskquest::progress::{ProgressEngine, UserProgress};
//!
//! let mut engine = ProgressEngine::new(UserProgress::new(95, 1));
//! let award = engine.award(10);
//! assert_eq!(award.level_ups.len(), 1);
//! assert_eq!(engine.progress(), UserProgress::new(5, 2));
//! ```

pub mod streak;

use serde::{Deserialize, Serialize};

pub use streak::Streak;

/// XP needed per level: reaching level `n + 1` costs `n * XP_PER_LEVEL`.
pub const XP_PER_LEVEL: u64 = 100;

/// XP accumulated within the current level, and the level itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProgress {
    pub xp: u64,
    pub level: u32,
}

impl Default for UserProgress {
    fn default() -> Self {
        Self { xp: 0, level: 1 }
    }
}

impl UserProgress {
    /// Build a progress value without normalization. Use
    /// [`UserProgress::from_parts`] for values read from storage.
    pub const fn new(xp: u64, level: u32) -> Self {
        Self { xp, level }
    }

    /// Build a progress value from raw stored columns, restoring the
    /// invariant if the row was edited by hand.
    pub fn from_parts(xp: u64, level: u32) -> Self {
        let mut engine = ProgressEngine::new(Self {
            xp: 0,
            level: level.max(1),
        });
        engine.award(xp);
        engine.progress()
    }

    /// XP required to leave the current level.
    pub fn threshold(&self) -> u64 {
        u64::from(self.level) * XP_PER_LEVEL
    }

    pub fn xp_to_next(&self) -> u64 {
        self.threshold().saturating_sub(self.xp)
    }

    /// Fraction of the current level completed, in `[0, 1)`.
    pub fn progress_fraction(&self) -> f64 {
        self.xp as f64 / self.threshold() as f64
    }
}

/// A single level increment produced by an award.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelUp {
    /// The level just reached.
    pub level: u32,
}

/// Result of one [`ProgressEngine::award`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Award {
    pub amount: u64,
    /// One entry per level gained, ascending.
    pub level_ups: Vec<LevelUp>,
}

impl Award {
    pub fn leveled_up(&self) -> bool {
        !self.level_ups.is_empty()
    }
}

/// Applies XP awards to a [`UserProgress`].
#[derive(Debug, Clone)]
pub struct ProgressEngine {
    progress: UserProgress,
}

impl ProgressEngine {
    pub fn new(progress: UserProgress) -> Self {
        Self { progress }
    }

    pub fn progress(&self) -> UserProgress {
        self.progress
    }

    /// Add `amount` XP, carrying any surplus through as many level-ups as it
    /// covers. A zero award is a no-op. At `u32::MAX` the level stops rising
    /// and xp is held just below the threshold.
    pub fn award(&mut self, amount: u64) -> Award {
        let p = &mut self.progress;
        p.xp = p.xp.saturating_add(amount);

        let mut level_ups = Vec::new();
        while p.xp >= p.threshold() {
            let threshold = p.threshold();
            let Some(next) = p.level.checked_add(1) else {
                p.xp = threshold - 1;
                break;
            };
            p.xp -= threshold;
            p.level = next;
            level_ups.push(LevelUp { level: p.level });
        }

        Award { amount, level_ups }
    }

    pub fn progress_fraction(&self) -> f64 {
        self.progress.progress_fraction()
    }
}

/// Everything persisted in the singleton progress row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Profile {
    #[serde(flatten)]
    pub progress: UserProgress,
    pub streak: Streak,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invariant_holds(p: UserProgress) -> bool {
        p.level >= 1 && p.xp < p.threshold()
    }

    #[test]
    fn default_progress_starts_at_level_one() {
        let p = UserProgress::default();
        assert_eq!(p, UserProgress::new(0, 1));
        assert_eq!(p.threshold(), 100);
        assert_eq!(p.xp_to_next(), 100);
    }

    #[test]
    fn award_below_threshold_only_adds_xp() {
        let mut engine = ProgressEngine::new(UserProgress::default());
        let award = engine.award(40);
        assert!(!award.leveled_up());
        assert_eq!(engine.progress(), UserProgress::new(40, 1));
    }

    #[test]
    fn award_carries_surplus_into_next_level() {
        let mut engine = ProgressEngine::new(UserProgress::new(95, 1));
        let award = engine.award(10);
        assert_eq!(award.level_ups, vec![LevelUp { level: 2 }]);
        assert_eq!(engine.progress(), UserProgress::new(5, 2));
    }

    #[test]
    fn exact_remaining_xp_levels_once_and_resets() {
        for (xp, level) in [(0, 1), (37, 1), (150, 2), (299, 3)] {
            let start = UserProgress::new(xp, level);
            let mut engine = ProgressEngine::new(start);
            let award = engine.award(start.xp_to_next());
            assert_eq!(award.level_ups.len(), 1);
            assert_eq!(engine.progress(), UserProgress::new(0, level + 1));
            assert_eq!(engine.progress_fraction(), 0.0);
        }
    }

    #[test]
    fn double_threshold_from_zero_levels_exactly_twice() {
        for level in 1..=6u32 {
            let mut engine = ProgressEngine::new(UserProgress::new(0, level));
            let award = engine.award(2 * u64::from(level) * XP_PER_LEVEL);
            assert_eq!(award.level_ups.len(), 2, "from level {}", level);
            assert_eq!(engine.progress().level, level + 2);
        }
    }

    #[test]
    fn large_award_reports_each_level_in_order() {
        let mut engine = ProgressEngine::new(UserProgress::default());
        // 100 + 200 + 300 = 600 reaches level 4 with 50 left over
        let award = engine.award(650);
        let levels: Vec<u32> = award.level_ups.iter().map(|l| l.level).collect();
        assert_eq!(levels, vec![2, 3, 4]);
        assert_eq!(engine.progress(), UserProgress::new(50, 4));
    }

    #[test]
    fn zero_award_is_noop() {
        let start = UserProgress::new(12, 3);
        let mut engine = ProgressEngine::new(start);
        let award = engine.award(0);
        assert_eq!(award.amount, 0);
        assert!(award.level_ups.is_empty());
        assert_eq!(engine.progress(), start);
    }

    #[test]
    fn invariant_holds_across_award_grid() {
        for level in 1..=8u32 {
            let threshold = u64::from(level) * XP_PER_LEVEL;
            for xp in [0, 1, threshold / 2, threshold - 1] {
                for amount in [0, 1, 5, 99, 100, 101, 1_000, 12_345] {
                    let mut engine = ProgressEngine::new(UserProgress::new(xp, level));
                    engine.award(amount);
                    let p = engine.progress();
                    assert!(invariant_holds(p), "{:?} + {} -> {:?}", (xp, level), amount, p);
                    let f = engine.progress_fraction();
                    assert!((0.0..1.0).contains(&f));
                }
            }
        }
    }

    #[test]
    fn from_parts_normalizes_bad_rows() {
        assert_eq!(UserProgress::from_parts(0, 0), UserProgress::new(0, 1));
        assert_eq!(UserProgress::from_parts(250, 1), UserProgress::new(150, 2));
        assert_eq!(UserProgress::from_parts(350, 1), UserProgress::new(50, 3));
        assert_eq!(UserProgress::from_parts(42, 3), UserProgress::new(42, 3));
    }

    #[test]
    fn level_saturates_at_u32_max() {
        let top = UserProgress::from_parts(u64::MAX, u32::MAX);
        assert_eq!(top.level, u32::MAX);
        assert!(invariant_holds(top));

        let mut engine = ProgressEngine::new(UserProgress::new(0, u32::MAX - 1));
        let award = engine.award(u64::MAX);
        assert_eq!(award.level_ups, vec![LevelUp { level: u32::MAX }]);
        assert_eq!(engine.progress().level, u32::MAX);
        assert!(invariant_holds(engine.progress()));
    }

    #[test]
    fn progress_fraction_matches_ratio() {
        let p = UserProgress::new(50, 2);
        assert!((p.progress_fraction() - 0.25).abs() < f64::EPSILON);
    }
}
