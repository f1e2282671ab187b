//! Audio cues for completions and level-ups.
//!
//! Cues are best-effort: [`play_or_warn`] turns any failure into a logged
//! warning and a one-line notice so the triggering operation always finishes.

use std::io::Write;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use console::{Term, style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Complete,
    LevelUp,
}

impl Cue {
    /// Number of bell rings for this cue.
    fn rings(&self) -> usize {
        match self {
            Cue::Complete => 1,
            Cue::LevelUp => 2,
        }
    }
}

pub trait Chime {
    fn play(&self, cue: Cue) -> Result<()>;
}

/// Rings the terminal bell on stderr.
pub struct TerminalBell {
    term: Term,
    gap: Duration,
}

impl TerminalBell {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
            gap: Duration::from_millis(150),
        }
    }
}

impl Default for TerminalBell {
    fn default() -> Self {
        Self::new()
    }
}

impl Chime for TerminalBell {
    fn play(&self, cue: Cue) -> Result<()> {
        let mut term = self.term.clone();
        for i in 0..cue.rings() {
            if i > 0 {
                thread::sleep(self.gap);
            }
            term.write_all(b"\x07").context("Failed to ring terminal bell")?;
            term.flush().context("Failed to flush terminal")?;
        }
        Ok(())
    }
}

pub struct Silent;

impl Chime for Silent {
    fn play(&self, _cue: Cue) -> Result<()> {
        Ok(())
    }
}

/// Pick the chime for the current settings.
pub fn chime(sound: bool) -> Box<dyn Chime> {
    if sound {
        Box::new(TerminalBell::new())
    } else {
        Box::new(Silent)
    }
}

/// Play `cue`, downgrading any failure to a warning. Returns the warning
/// text when the cue failed.
pub fn play_or_warn(chime: &dyn Chime, cue: Cue) -> Option<String> {
    match chime.play(cue) {
        Ok(()) => None,
        Err(e) => {
            tracing::warn!(?cue, error = %e, "audio cue failed");
            let msg = format!("Couldn't play sound: {:#}", e);
            eprintln!("{}", style(&msg).yellow());
            Some(msg)
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingChime;
    use super::*;

    #[test]
    fn level_up_rings_twice() {
        assert_eq!(Cue::Complete.rings(), 1);
        assert_eq!(Cue::LevelUp.rings(), 2);
    }

    #[test]
    fn successful_cue_has_no_warning() {
        let chime = RecordingChime::default();
        assert!(play_or_warn(&chime, Cue::Complete).is_none());
        assert_eq!(*chime.played.borrow(), vec![Cue::Complete]);
    }

    #[test]
    fn failed_cue_becomes_warning() {
        let chime = RecordingChime {
            fail: true,
            ..Default::default()
        };
        let warning = play_or_warn(&chime, Cue::LevelUp).expect("failure is reported");
        assert!(warning.contains("no audio device"));
    }

    #[test]
    fn silent_never_fails() {
        assert!(Silent.play(Cue::LevelUp).is_ok());
        assert!(chime(false).play(Cue::Complete).is_ok());
    }
}
