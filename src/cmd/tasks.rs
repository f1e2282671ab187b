//! Task subcommands — `add-task`, `show-tasks`, `complete-task`.

use anyhow::{Context, Result};
use chrono::Local;

use taskquest::duration::parse_hms;
use taskquest::reward::RewardPolicy;
use taskquest::task::{NewTask, Priority, Recurrence};
use taskquest::tracker::Tracker;
use taskquest::ui::render;

pub fn cmd_add_task(
    tracker: &Tracker<'_>,
    name: &str,
    priority: Priority,
    duration: Option<&str>,
    recurring: Option<Recurrence>,
) -> Result<()> {
    let mut new_task = NewTask::new(name)
        .with_priority(priority)
        .with_recurrence(recurring);
    if let Some(d) = duration {
        new_task = new_task.with_duration(parse_hms(d)?);
    }

    let task = tracker.add(new_task, Local::now())?;
    println!("{}", render::added_line(&task));
    Ok(())
}

pub fn cmd_show_tasks(tracker: &Tracker<'_>, pending_only: bool, json: bool) -> Result<()> {
    let tasks = if pending_only {
        tracker.pending()?
    } else {
        tracker.all()?
    };

    if json {
        let out = serde_json::to_string_pretty(&tasks).context("Failed to serialize tasks")?;
        println!("{}", out);
        return Ok(());
    }

    println!();
    println!("Task List");
    println!("=========");
    println!();
    if tasks.is_empty() {
        println!("No tasks yet. Add one with 'taskquest add-task <name>'.");
        println!();
        return Ok(());
    }
    for line in render::task_table(&tasks) {
        println!("{}", line);
    }
    println!();
    Ok(())
}

pub fn cmd_complete_task(tracker: &Tracker<'_>, id: i64) -> Result<()> {
    let completion = tracker.complete(id, RewardPolicy::PerPriority, Local::now())?;
    for line in render::completion_lines(&completion) {
        println!("{}", line);
    }
    Ok(())
}
