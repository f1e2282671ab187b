//! Progress view — `show-progress`.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::Serialize;

use taskquest::progress::Profile;
use taskquest::tracker::Tracker;
use taskquest::ui::render;

/// Machine-readable progress for `--json`.
#[derive(Debug, Serialize)]
struct ProgressView {
    level: u32,
    xp: u64,
    threshold: u64,
    xp_to_next: u64,
    progress: f64,
    streak: u32,
    best_streak: u32,
    last_completed_on: Option<NaiveDate>,
}

impl ProgressView {
    fn new(profile: &Profile, today: NaiveDate) -> Self {
        let p = &profile.progress;
        Self {
            level: p.level,
            xp: p.xp,
            threshold: p.threshold(),
            xp_to_next: p.xp_to_next(),
            progress: p.progress_fraction(),
            streak: profile.streak.current_on(today),
            best_streak: profile.streak.best,
            last_completed_on: profile.streak.last_completed_on,
        }
    }
}

pub fn cmd_show_progress(tracker: &Tracker<'_>, json: bool) -> Result<()> {
    let profile = tracker.profile()?;
    let today = Local::now().date_naive();

    if json {
        let view = ProgressView::new(&profile, today);
        let out = serde_json::to_string_pretty(&view).context("Failed to serialize progress")?;
        println!("{}", out);
        return Ok(());
    }

    println!();
    for line in render::progress_lines(&profile, today) {
        println!("{}", line);
    }
    println!();
    Ok(())
}
