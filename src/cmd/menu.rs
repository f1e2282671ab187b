//! Interactive menu — `menu`, or no subcommand at all.

use anyhow::{Result, bail};
use console::Term;

use taskquest::config::Settings;
use taskquest::menu::Menu;
use taskquest::tracker::Tracker;

pub fn cmd_menu(tracker: &Tracker<'_>, settings: &Settings) -> Result<()> {
    if !Term::stdout().is_term() {
        bail!("The interactive menu needs a terminal. Use the subcommands instead (see --help).");
    }
    Menu::new(tracker, settings.tick).run()
}
