use std::time::{Duration, Instant};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::duration::format_hms;

/// Blocking countdown for a started task, rendered as an `indicatif` bar
/// whose position is elapsed seconds out of the task's duration.
pub struct Countdown {
    bar: ProgressBar,
    total: Duration,
    tick: Duration,
}

impl Countdown {
    /// # Arguments
    /// * `label` — task name shown as the bar prefix
    /// * `total_secs` — task duration; the countdown ends when it elapses
    /// * `tick` — redraw interval
    pub fn new(label: &str, total_secs: u64, tick: Duration) -> Self {
        let bar = ProgressBar::new(total_secs);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {msg}")
                .expect("progress bar template is a valid static string")
                .progress_chars("█▓▒░"),
        );
        bar.set_prefix(label.to_string());
        bar.set_message(format!("{} / {}", format_hms(0), format_hms(total_secs)));
        Self {
            bar,
            total: Duration::from_secs(total_secs),
            tick,
        }
    }

    /// Same countdown with drawing disabled.
    #[cfg(test)]
    pub(crate) fn hidden(label: &str, total_secs: u64, tick: Duration) -> Self {
        let countdown = Self::new(label, total_secs, tick);
        countdown
            .bar
            .set_draw_target(indicatif::ProgressDrawTarget::hidden());
        countdown
    }

    /// Block the current thread until the full duration has elapsed.
    pub fn run(&self) -> Duration {
        let start = Instant::now();
        self.run_with(|| start.elapsed(), std::thread::sleep)
    }

    /// Drive the countdown with an injected clock and sleeper. Returns the
    /// elapsed time reported by `elapsed` when the countdown finished.
    pub fn run_with(
        &self,
        mut elapsed: impl FnMut() -> Duration,
        mut sleep: impl FnMut(Duration),
    ) -> Duration {
        loop {
            let now = elapsed();
            let secs = now.as_secs().min(self.total.as_secs());
            self.bar.set_position(secs);
            self.bar.set_message(format!(
                "{} / {}",
                format_hms(secs),
                format_hms(self.total.as_secs())
            ));
            if now >= self.total {
                self.bar
                    .finish_with_message(format!("{}", style("time's up!").green().bold()));
                return now;
            }
            sleep(self.tick.min(self.total - now));
        }
    }

    #[cfg(test)]
    pub(crate) fn position(&self) -> u64 {
        self.bar.position()
    }
}
