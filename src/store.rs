use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, TimeDelta};
use rusqlite::{Connection, OptionalExtension, params};

use crate::progress::{Profile, Streak, UserProgress};
use crate::task::{NewTask, Priority, Recurrence, Task, TaskStatus};

const DATE_FORMAT: &str = "%Y-%m-%d";

const TASK_COLUMNS: &str =
    "id, name, priority, duration_secs, due_date, recurrence, status, created_at, completed_at";

/// SQLite-backed storage for tasks and the singleton progress row.
pub struct TaskStore {
    conn: Connection,
}

impl TaskStore {
    /// Open (or create) the database at `path` and make sure the schema exists.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory {}", parent.display())
            })?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open SQLite database {}", path.display()))?;
        tracing::debug!(path = %path.display(), "opened task database");
        let store = Self { conn };
        store.run_migrations()?;
        Ok(store)
    }

    /// Create an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().context("Failed to open in-memory SQLite database")?;
        let store = Self { conn };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "
                CREATE TABLE IF NOT EXISTS tasks (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    priority TEXT NOT NULL DEFAULT 'Medium',
                    duration_secs INTEGER,
                    due_date TEXT,
                    recurrence TEXT,
                    status TEXT NOT NULL DEFAULT 'pending',
                    created_at TEXT NOT NULL,
                    completed_at TEXT
                );

                CREATE TABLE IF NOT EXISTS user_progress (
                    id INTEGER PRIMARY KEY CHECK (id = 1),
                    xp INTEGER NOT NULL DEFAULT 0,
                    level INTEGER NOT NULL DEFAULT 1,
                    streak INTEGER NOT NULL DEFAULT 0,
                    best_streak INTEGER NOT NULL DEFAULT 0,
                    last_completed_on TEXT
                );

                INSERT OR IGNORE INTO user_progress (id, xp, level, streak, best_streak)
                VALUES (1, 0, 1, 0, 0);

                CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status);
                ",
            )
            .context("Failed to create tables")?;
        Ok(())
    }

    /// Run `f` inside a transaction. Everything `f` writes through this store
    /// commits together, or not at all if `f` fails.
    pub fn with_transaction<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&TaskStore) -> Result<R>,
    {
        let tx = self
            .conn
            .unchecked_transaction()
            .context("Failed to begin transaction")?;
        let value = f(self)?;
        tx.commit().context("Failed to commit transaction")?;
        Ok(value)
    }

    // ── Tasks ─────────────────────────────────────────────────────────

    pub fn create_task(&self, task: &NewTask, now: DateTime<Local>) -> Result<Task> {
        let due_date = task
            .duration_secs
            .map(|secs| due_after(now, secs))
            .transpose()?;
        let duration_secs = task
            .duration_secs
            .map(i64::try_from)
            .transpose()
            .context("Task duration does not fit in the database")?;
        self.conn
            .execute(
                "INSERT INTO tasks
                     (name, priority, duration_secs, due_date, recurrence, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    task.name,
                    task.priority.as_str(),
                    duration_secs,
                    due_date.map(|d| d.to_rfc3339()),
                    task.recurrence.map(|r| r.as_str()),
                    TaskStatus::Pending.as_str(),
                    now.to_rfc3339(),
                ],
            )
            .context("Failed to insert task")?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, name = %task.name, "created task");
        self.get_task(id)?.context("Task not found after insert")
    }

    pub fn get_task(&self, id: i64) -> Result<Option<Task>> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1");
        let row = self
            .conn
            .query_row(&sql, params![id], TaskRow::from_row)
            .optional()
            .context("Failed to query task")?;
        row.map(TaskRow::into_task).transpose()
    }

    /// A task that exists and is still pending.
    pub fn get_pending_task(&self, id: i64) -> Result<Option<Task>> {
        Ok(self.get_task(id)?.filter(Task::is_pending))
    }

    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        self.query_tasks(&format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY id"))
    }

    pub fn list_pending(&self) -> Result<Vec<Task>> {
        self.query_tasks(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE status = 'pending' ORDER BY id"
        ))
    }

    fn query_tasks(&self, sql: &str) -> Result<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .context("Failed to prepare task query")?;
        let rows = stmt
            .query_map([], TaskRow::from_row)
            .context("Failed to query tasks")?;
        let mut tasks = Vec::new();
        for row in rows {
            let r = row.context("Failed to read task row")?;
            tasks.push(r.into_task()?);
        }
        Ok(tasks)
    }

    /// Flip a pending task to completed. Returns `false` when no pending task
    /// has that id.
    pub fn mark_completed(&self, id: i64, now: DateTime<Local>) -> Result<bool> {
        let changed = self
            .conn
            .execute(
                "UPDATE tasks SET status = 'completed', completed_at = ?1
                 WHERE id = ?2 AND status = 'pending'",
                params![now.to_rfc3339(), id],
            )
            .context("Failed to mark task completed")?;
        Ok(changed == 1)
    }

    // ── Progress ──────────────────────────────────────────────────────

    pub fn load_profile(&self) -> Result<Profile> {
        let (xp, level, current, best, last): (i64, i64, i64, i64, Option<String>) = self
            .conn
            .query_row(
                "SELECT xp, level, streak, best_streak, last_completed_on
                 FROM user_progress WHERE id = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)),
            )
            .context("Failed to load user progress")?;

        let last_completed_on = last
            .map(|s| {
                NaiveDate::parse_from_str(&s, DATE_FORMAT)
                    .with_context(|| format!("Invalid last_completed_on '{}'", s))
            })
            .transpose()?;

        Ok(Profile {
            progress: UserProgress::from_parts(
                xp.max(0) as u64,
                level.clamp(0, i64::from(u32::MAX)) as u32,
            ),
            streak: Streak {
                current: current.max(0) as u32,
                best: best.max(0) as u32,
                last_completed_on,
            },
        })
    }

    pub fn save_profile(&self, profile: &Profile) -> Result<()> {
        self.conn
            .execute(
                "UPDATE user_progress
                 SET xp = ?1, level = ?2, streak = ?3, best_streak = ?4, last_completed_on = ?5
                 WHERE id = 1",
                params![
                    profile.progress.xp as i64,
                    profile.progress.level,
                    profile.streak.current,
                    profile.streak.best,
                    profile
                        .streak
                        .last_completed_on
                        .map(|d| d.format(DATE_FORMAT).to_string()),
                ],
            )
            .context("Failed to save user progress")?;
        tracing::debug!(
            xp = profile.progress.xp,
            level = profile.progress.level,
            streak = profile.streak.current,
            "saved progress"
        );
        Ok(())
    }
}

// ── Row conversion ────────────────────────────────────────────────────

struct TaskRow {
    id: i64,
    name: String,
    priority: String,
    duration_secs: Option<i64>,
    due_date: Option<String>,
    recurrence: Option<String>,
    status: String,
    created_at: String,
    completed_at: Option<String>,
}

impl TaskRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            priority: row.get(2)?,
            duration_secs: row.get(3)?,
            due_date: row.get(4)?,
            recurrence: row.get(5)?,
            status: row.get(6)?,
            created_at: row.get(7)?,
            completed_at: row.get(8)?,
        })
    }

    fn into_task(self) -> Result<Task> {
        let status = self
            .status
            .parse::<TaskStatus>()
            .map_err(|e| anyhow::anyhow!(e))?;
        // An unknown recurrence tag is dropped rather than failing the listing.
        let recurrence = self
            .recurrence
            .as_deref()
            .and_then(|r| r.parse::<Recurrence>().ok());
        Ok(Task {
            id: self.id,
            name: self.name,
            priority: Priority::from_stored(&self.priority),
            duration_secs: self.duration_secs.map(|s| s.max(0) as u64),
            due_date: self.due_date.as_deref().map(parse_timestamp).transpose()?,
            recurrence,
            status,
            created_at: parse_timestamp(&self.created_at)?,
            completed_at: self.completed_at.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}

/// `now` plus `secs`, failing instead of overflowing the calendar.
fn due_after(now: DateTime<Local>, secs: u64) -> Result<DateTime<Local>> {
    i64::try_from(secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|delta| now.checked_add_signed(delta))
        .with_context(|| format!("Due date {} seconds from now is out of range", secs))
}

fn parse_timestamp(s: &str) -> Result<DateTime<Local>> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Local))
        .with_context(|| format!("Invalid timestamp '{}'", s))
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_created_with_singleton_progress() -> Result<()> {
        let store = TaskStore::open_in_memory()?;

        let table_count: i32 = store.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master
             WHERE type='table' AND name IN ('tasks', 'user_progress')",
            [],
            |row| row.get(0),
        )?;
        assert_eq!(table_count, 2, "Expected 2 tables to exist");

        let profile = store.load_profile()?;
        assert_eq!(profile.progress, UserProgress::default());
        assert_eq!(profile.streak, Streak::default());
        Ok(())
    }

    #[test]
    fn test_open_is_idempotent() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested/tasks.db");

        {
            let store = TaskStore::open(&path)?;
            store.create_task(&NewTask::new("Write report"), Local::now())?;
            store.save_profile(&Profile {
                progress: UserProgress::new(30, 2),
                streak: Streak::default(),
            })?;
        }

        let store = TaskStore::open(&path)?;
        assert_eq!(store.list_tasks()?.len(), 1);
        assert_eq!(store.load_profile()?.progress, UserProgress::new(30, 2));
        Ok(())
    }

    #[test]
    fn test_create_task_sets_due_date_from_duration() -> Result<()> {
        let store = TaskStore::open_in_memory()?;
        let now = Local::now();

        let timed = store.create_task(
            &NewTask::new("Deep work")
                .with_duration(1500)
                .with_recurrence(Some(Recurrence::Daily)),
            now,
        )?;
        assert!(timed.id > 0);
        assert_eq!(timed.name, "Deep work");
        assert_eq!(timed.priority, Priority::Medium);
        assert_eq!(timed.duration_secs, Some(1500));
        assert_eq!(timed.recurrence, Some(Recurrence::Daily));
        assert_eq!(timed.status, TaskStatus::Pending);
        let due = timed.due_date.expect("timed task has a due date");
        assert_eq!((due - now).num_seconds(), 1500);

        let untimed = store.create_task(&NewTask::new("Call bank"), now)?;
        assert!(untimed.due_date.is_none());
        Ok(())
    }

    #[test]
    fn test_list_pending_excludes_completed() -> Result<()> {
        let store = TaskStore::open_in_memory()?;
        let now = Local::now();
        let a = store.create_task(&NewTask::new("alpha"), now)?;
        store.create_task(&NewTask::new("beta"), now)?;
        store.create_task(&NewTask::new("gamma"), now)?;

        assert!(store.mark_completed(a.id, now)?);

        let pending = store.list_pending()?;
        let names: Vec<&str> = pending.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["beta", "gamma"]);
        assert_eq!(store.list_tasks()?.len(), 3);
        Ok(())
    }

    #[test]
    fn test_mark_completed_only_affects_pending() -> Result<()> {
        let store = TaskStore::open_in_memory()?;
        let now = Local::now();
        let task = store.create_task(&NewTask::new("once"), now)?;

        assert!(store.mark_completed(task.id, now)?);
        assert!(!store.mark_completed(task.id, now)?);
        assert!(!store.mark_completed(999, now)?);

        let stored = store.get_task(task.id)?.expect("task exists");
        assert_eq!(stored.status, TaskStatus::Completed);
        assert!(stored.completed_at.is_some());
        assert!(store.get_pending_task(task.id)?.is_none());
        Ok(())
    }

    #[test]
    fn test_unknown_priority_label_reads_as_low() -> Result<()> {
        let store = TaskStore::open_in_memory()?;
        store.conn.execute(
            "INSERT INTO tasks (name, priority, status, created_at)
             VALUES ('legacy', 'Urgent', 'pending', ?1)",
            params![Local::now().to_rfc3339()],
        )?;
        let tasks = store.list_tasks()?;
        assert_eq!(tasks[0].priority, Priority::Low);
        Ok(())
    }

    #[test]
    fn test_profile_round_trips_streak() -> Result<()> {
        let store = TaskStore::open_in_memory()?;
        let profile = Profile {
            progress: UserProgress::new(75, 4),
            streak: Streak {
                current: 3,
                best: 9,
                last_completed_on: NaiveDate::from_ymd_opt(2026, 5, 17),
            },
        };
        store.save_profile(&profile)?;
        assert_eq!(store.load_profile()?, profile);
        Ok(())
    }

    #[test]
    fn test_load_profile_normalizes_hand_edited_row() -> Result<()> {
        let store = TaskStore::open_in_memory()?;
        store
            .conn
            .execute("UPDATE user_progress SET xp = 250, level = 0 WHERE id = 1", [])?;
        assert_eq!(store.load_profile()?.progress, UserProgress::new(150, 2));
        Ok(())
    }

    #[test]
    fn test_failed_transaction_rolls_back() -> Result<()> {
        let store = TaskStore::open_in_memory()?;
        let now = Local::now();
        let result: Result<()> = store.with_transaction(|s| {
            s.create_task(&NewTask::new("doomed"), now)?;
            anyhow::bail!("abort");
        });
        assert!(result.is_err());
        assert!(store.list_tasks()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_create_task_rejects_due_date_overflow() -> Result<()> {
        let store = TaskStore::open_in_memory()?;
        let now = Local::now();
        for secs in [9_999_999_999 * 3600, i64::MAX as u64, u64::MAX] {
            let err = store
                .create_task(&NewTask::new("forever").with_duration(secs), now)
                .unwrap_err();
            assert!(err.to_string().contains("out of range"), "{secs}: {err}");
        }
        assert!(store.list_tasks()?.is_empty());
        Ok(())
    }
}
