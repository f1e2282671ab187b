//! Text rendering for progress, task lists, and completion summaries.
//!
//! Functions here build strings instead of printing so both the menu and
//! the subcommands can share them.

use chrono::NaiveDate;
use console::style;

use super::icons::{CHECK, CLOCK, FIRE, REPEAT, SPARKLE, STAR, TROPHY, WARN};
use crate::duration::format_hms;
use crate::progress::{Profile, UserProgress};
use crate::task::{Task, TaskStatus};
use crate::tracker::Completion;

/// Width of the XP bar in segments.
pub const BAR_WIDTH: usize = 20;

const FILLED: char = '█';
const EMPTY: char = '░';

/// Number of filled segments for `progress` on a bar of `width` segments.
pub fn filled_segments(progress: &UserProgress, width: usize) -> usize {
    ((progress.progress_fraction() * width as f64).floor() as usize).min(width)
}

/// Unstyled XP bar, e.g. `█████░░░░░░░░░░░░░░░` for a quarter level.
pub fn xp_bar(progress: &UserProgress, width: usize) -> String {
    let filled = filled_segments(progress, width);
    let mut bar = String::with_capacity(width * 3);
    bar.extend(std::iter::repeat_n(FILLED, filled));
    bar.extend(std::iter::repeat_n(EMPTY, width - filled));
    bar
}

/// Colored XP bar: filled segments green, the rest dim.
pub fn styled_xp_bar(progress: &UserProgress, width: usize) -> String {
    let filled = filled_segments(progress, width);
    format!(
        "{}{}",
        style(FILLED.to_string().repeat(filled)).green(),
        style(EMPTY.to_string().repeat(width - filled)).dim()
    )
}

/// One-line summary shown above the menu: `Level 2 | XP: 30/200`.
pub fn status_line(progress: &UserProgress) -> String {
    format!(
        "{} | {}",
        style(format!("Level {}", progress.level)).bold(),
        style(format!("XP: {}/{}", progress.xp, progress.threshold())).green()
    )
}

/// Full progress block for `show-progress` and the menu's progress view.
pub fn progress_lines(profile: &Profile, today: NaiveDate) -> Vec<String> {
    let p = &profile.progress;
    let streak = profile.streak.current_on(today);
    let mut lines = vec![
        format!("{}", style(format!("Level {}", p.level)).bold()),
        format!("{}XP: {}/{}", STAR, p.xp, p.threshold()),
        styled_xp_bar(p, BAR_WIDTH),
        format!(
            "{} XP to level {}",
            style(p.xp_to_next()).cyan(),
            p.level + 1
        ),
    ];
    if streak > 0 || profile.streak.best > 0 {
        lines.push(format!(
            "{}Streak: {} day{} (best {})",
            FIRE,
            style(streak).yellow().bold(),
            if streak == 1 { "" } else { "s" },
            profile.streak.best
        ));
    }
    lines
}

fn due_label(task: &Task) -> String {
    task.due_date
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn duration_label(task: &Task) -> String {
    task.duration_secs
        .map(format_hms)
        .unwrap_or_else(|| "-".to_string())
}

/// Fixed-width task table.
pub fn task_table(tasks: &[Task]) -> Vec<String> {
    let mut lines = vec![
        format!(
            "{:<5} {:<28} {:<8} {:<9} {:<17} {}",
            "ID", "Task Name", "Priority", "Duration", "Due", "Status"
        ),
        format!(
            "{:<5} {:<28} {:<8} {:<9} {:<17} {}",
            "-----",
            "----------------------------",
            "--------",
            "---------",
            "-----------------",
            "---------"
        ),
    ];
    for task in tasks {
        let label = match task.recurrence {
            Some(r) => format!("{} ({})", task.name, r),
            None => task.name.clone(),
        };
        let name = truncate(&label, 28);
        let status = match task.status {
            TaskStatus::Pending => style("Pending").yellow().to_string(),
            TaskStatus::Completed => style("Completed").green().to_string(),
        };
        lines.push(format!(
            "{:<5} {:<28} {:<8} {:<9} {:<17} {}",
            task.id,
            name,
            task.priority.as_str(),
            duration_label(task),
            due_label(task),
            status
        ));
    }
    lines
}

/// Numbered list used when picking a task to start.
pub fn numbered_tasks(tasks: &[Task]) -> Vec<String> {
    tasks
        .iter()
        .enumerate()
        .map(|(idx, task)| format!("{}. {} ({})", idx + 1, task.name, duration_label(task)))
        .collect()
}

/// Bulleted list of active tasks with due dates.
pub fn active_task_lines(tasks: &[Task]) -> Vec<String> {
    tasks
        .iter()
        .map(|task| format!("• {} (Due: {})", task.name, due_label(task)))
        .collect()
}

/// Lines printed after a completion: result, XP, level-ups, streak.
pub fn completion_lines(completion: &Completion) -> Vec<String> {
    let mut lines = vec![format!(
        "{}Task {} '{}' completed! You earned {} XP.",
        CHECK,
        completion.task.id,
        style(&completion.task.name).bold(),
        style(completion.award.amount).cyan().bold()
    )];
    for level_up in &completion.award.level_ups {
        lines.push(format!(
            "{}{}",
            TROPHY,
            style(format!("Level Up! You're now Level {}", level_up.level))
                .green()
                .bold()
        ));
    }
    if completion.streak_extended {
        lines.push(format!(
            "{}Streak: {} day{}",
            FIRE,
            completion.profile.streak.current,
            if completion.profile.streak.current == 1 { "" } else { "s" }
        ));
    }
    if let Some(next) = &completion.successor {
        lines.push(format!(
            "{}Next '{}' scheduled as task {} (due {})",
            REPEAT,
            next.name,
            next.id,
            due_label(next)
        ));
    }
    for warning in &completion.warnings {
        lines.push(format!("{}{}", WARN, style(warning).yellow()));
    }
    lines
}

pub fn added_line(task: &Task) -> String {
    let mut line = format!(
        "{}Task '{}' added with priority {} (id {}).",
        SPARKLE,
        style(&task.name).green(),
        task.priority,
        task.id
    );
    if let Some(secs) = task.duration_secs {
        line.push_str(&format!(" {}{}", CLOCK, format_hms(secs)));
    }
    line
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}
