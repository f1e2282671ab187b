//! Task lifecycle service shared by the menu and the subcommands.
//!
//! [`Tracker`] owns the store and threads the user's [`Profile`] through the
//! [`ProgressEngine`] on every completion: load, award, persist.

use chrono::{DateTime, Local};

use crate::audio::{self, Chime, Cue};
use crate::duration;
use crate::errors::TaskError;
use crate::progress::{Award, Profile, ProgressEngine};
use crate::reward::RewardPolicy;
use crate::store::TaskStore;
use crate::task::{NewTask, Task};

/// Everything that changed when a task was completed.
#[derive(Debug, Clone)]
pub struct Completion {
    pub task: Task,
    /// The next occurrence, for recurring tasks
    pub successor: Option<Task>,
    pub award: Award,
    /// Progress after the award was applied and saved
    pub profile: Profile,
    pub streak_extended: bool,
    /// Non-fatal problems, e.g. an audio cue that could not play
    pub warnings: Vec<String>,
}

pub struct Tracker<'c> {
    store: TaskStore,
    chime: &'c dyn Chime,
}

impl<'c> Tracker<'c> {
    pub fn new(store: TaskStore, chime: &'c dyn Chime) -> Self {
        Self { store, chime }
    }

    /// Store a new task. The name is trimmed and must not be empty, and a
    /// duration must lie within the range `parse_hms` accepts.
    pub fn add(&self, mut task: NewTask, now: DateTime<Local>) -> Result<Task, TaskError> {
        task.name = task.name.trim().to_string();
        if task.name.is_empty() {
            return Err(TaskError::EmptyName);
        }
        if let Some(secs) = task.duration_secs {
            duration::validate_secs(secs)?;
        }
        let created = self
            .store
            .create_task(&task, now)
            .map_err(TaskError::Storage)?;
        tracing::info!(id = created.id, name = %created.name, "task added");
        Ok(created)
    }

    pub fn pending(&self) -> Result<Vec<Task>, TaskError> {
        self.store.list_pending().map_err(TaskError::Storage)
    }

    pub fn all(&self) -> Result<Vec<Task>, TaskError> {
        self.store.list_tasks().map_err(TaskError::Storage)
    }

    pub fn profile(&self) -> Result<Profile, TaskError> {
        self.store.load_profile().map_err(TaskError::Storage)
    }

    /// Complete a pending task and award XP for it.
    ///
    /// Unknown ids and already-completed tasks yield
    /// [`TaskError::TaskNotFound`] without touching the database. The task
    /// flag, a recurring successor, and the updated progress commit in one
    /// transaction. Audio cues fire after the commit.
    pub fn complete(
        &self,
        id: i64,
        policy: RewardPolicy,
        now: DateTime<Local>,
    ) -> Result<Completion, TaskError> {
        let outcome = self
            .store
            .with_transaction(|store| {
                let Some(task) = store.get_pending_task(id)? else {
                    return Ok(None);
                };
                if !store.mark_completed(id, now)? {
                    return Ok(None);
                }

                let successor = match task.successor() {
                    Some(next) => Some(store.create_task(&next, now)?),
                    None => None,
                };

                let mut profile = store.load_profile()?;
                let mut engine = ProgressEngine::new(profile.progress);
                let award = engine.award(policy.xp_for(&task));
                profile.progress = engine.progress();
                let streak_extended = profile.streak.record(now.date_naive());
                store.save_profile(&profile)?;

                let task = store.get_task(id)?.unwrap_or(task);
                Ok(Some((task, successor, award, profile, streak_extended)))
            })
            .map_err(TaskError::Storage)?;

        let Some((task, successor, award, profile, streak_extended)) = outcome else {
            tracing::debug!(id, "no pending task to complete");
            return Err(TaskError::TaskNotFound { id });
        };

        tracing::info!(
            id,
            xp = award.amount,
            level = profile.progress.level,
            "task completed"
        );
        if let Some(next) = &successor {
            tracing::info!(id = next.id, "scheduled next occurrence");
        }

        let mut warnings = Vec::new();
        warnings.extend(audio::play_or_warn(self.chime, Cue::Complete));
        for level_up in &award.level_ups {
            tracing::info!(level = level_up.level, "level up");
            warnings.extend(audio::play_or_warn(self.chime, Cue::LevelUp));
        }

        Ok(Completion {
            task,
            successor,
            award,
            profile,
            streak_extended,
            warnings,
        })
    }
}
