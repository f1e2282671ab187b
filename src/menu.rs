//! Interactive menu: add, start (timed), list, and review progress.
//!
//! Input parsing lives in plain functions so it can be tested without a
//! terminal; [`Menu::run`] only wires them to `dialoguer` prompts.

use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use console::{Term, style};
use dialoguer::{Input, Select, theme::ColorfulTheme};

use crate::duration::parse_hms;
use crate::errors::TaskError;
use crate::reward::RewardPolicy;
use crate::task::{NewTask, Recurrence, Task};
use crate::tracker::Tracker;
use crate::ui::Countdown;
use crate::ui::icons::{CROSS, ROCKET};
use crate::ui::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddTask,
    StartTask,
    ViewActive,
    ViewProgress,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 5] = [
        MenuChoice::AddTask,
        MenuChoice::StartTask,
        MenuChoice::ViewActive,
        MenuChoice::ViewProgress,
        MenuChoice::Exit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuChoice::AddTask => "1. Add New Task",
            MenuChoice::StartTask => "2. Start Task",
            MenuChoice::ViewActive => "3. View Active Tasks",
            MenuChoice::ViewProgress => "4. View Progress",
            MenuChoice::Exit => "5. Exit",
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Build a timed task from the three free-text answers. A bad duration
/// aborts the whole add; an unrecognized recurrence answer means one-off.
pub fn parse_new_task(name: &str, duration: &str, recurring: &str) -> Result<NewTask, TaskError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TaskError::EmptyName);
    }
    let secs = parse_hms(duration)?;
    Ok(NewTask::new(name)
        .with_duration(secs)
        .with_recurrence(Recurrence::from_answer(recurring)))
}

/// Resolve a 1-based list position typed by the user.
pub fn pick_task<'t>(tasks: &'t [Task], input: &str) -> Result<&'t Task, TaskError> {
    let invalid = || TaskError::InvalidSelection(input.trim().to_string());
    let position: usize = input.trim().parse().map_err(|_| invalid())?;
    position
        .checked_sub(1)
        .and_then(|idx| tasks.get(idx))
        .ok_or_else(invalid)
}

pub struct Menu<'a, 'c> {
    tracker: &'a Tracker<'c>,
    tick: Duration,
    term: Term,
    theme: ColorfulTheme,
}

impl<'a, 'c> Menu<'a, 'c> {
    pub fn new(tracker: &'a Tracker<'c>, tick: Duration) -> Self {
        Self {
            tracker,
            tick,
            term: Term::stdout(),
            theme: ColorfulTheme::default(),
        }
    }

    /// Loop until the user exits. Failures of a single action are reported
    /// and the menu comes back; only terminal I/O errors end the loop.
    pub fn run(&self) -> Result<()> {
        loop {
            let choice = self.prompt_choice()?;
            let outcome = match choice {
                MenuChoice::AddTask => self.add_task(),
                MenuChoice::StartTask => self.start_task(),
                MenuChoice::ViewActive => self.view_active(),
                MenuChoice::ViewProgress => self.view_progress(),
                MenuChoice::Exit => {
                    println!();
                    println!(
                        "{}{}",
                        ROCKET,
                        style("Goodbye! Keep being productive!").bold()
                    );
                    return Ok(());
                }
            };
            match outcome {
                Ok(()) => {}
                Err(MenuError::Task(e)) => {
                    tracing::debug!(error = %e, ?choice, "menu action failed");
                    println!("{}{}", CROSS, style(e).red());
                    self.pause()?;
                }
                Err(MenuError::Terminal(e)) => return Err(e),
            }
        }
    }

    fn header(&self, title: &str) -> Result<()> {
        self.term.clear_screen()?;
        println!("{}", style("═".repeat(50)).cyan());
        println!("{}", style(title).bold().blue());
        println!("{}", style("═".repeat(50)).cyan());
        Ok(())
    }

    fn prompt_choice(&self) -> Result<MenuChoice> {
        self.header("Gamified Task Manager")?;
        let profile = self.tracker.profile()?;
        println!();
        println!("{}", render::status_line(&profile.progress));
        println!();

        let labels: Vec<&str> = MenuChoice::ALL.iter().map(MenuChoice::label).collect();
        let selection = Select::with_theme(&self.theme)
            .with_prompt("Enter your choice")
            .items(&labels)
            .default(0)
            .interact_on(&self.term)?;
        MenuChoice::from_index(selection)
            .ok_or_else(|| TaskError::InvalidSelection(selection.to_string()).into())
    }

    fn pause(&self) -> Result<()> {
        println!();
        println!("{}", style("Press Enter to return...").dim());
        self.term.read_line()?;
        Ok(())
    }

    fn text(&self, prompt: &str, default: Option<&str>) -> Result<String, MenuError> {
        let mut input = Input::<String>::with_theme(&self.theme).with_prompt(prompt);
        if let Some(d) = default {
            input = input.default(d.to_string());
        }
        Ok(input.interact_text_on(&self.term).map_err(anyhow::Error::from)?)
    }

    fn add_task(&self) -> Result<(), MenuError> {
        self.header("Add New Task")?;
        let name = self.text("Task name", None)?;
        let duration = self.text("Duration (HH:MM:SS)", None)?;
        let recurring = self.text("Recurring? (daily/weekly/n)", Some("n"))?;

        let new_task = parse_new_task(&name, &duration, &recurring)?;
        let task = self.tracker.add(new_task, Local::now())?;
        println!();
        println!("{}", render::added_line(&task));
        self.pause()?;
        Ok(())
    }

    fn start_task(&self) -> Result<(), MenuError> {
        let tasks = self.tracker.pending()?;
        if tasks.is_empty() {
            println!();
            println!("{}", style("No active tasks!").yellow());
            self.pause()?;
            return Ok(());
        }

        self.header("Start a Task")?;
        for line in render::numbered_tasks(&tasks) {
            println!("{}", line);
        }
        println!();
        let answer = self.text("Select task to start", None)?;
        let task = pick_task(&tasks, &answer)?;

        self.term.clear_screen()?;
        match task.duration_secs {
            Some(total) => {
                tracing::info!(id = task.id, secs = total, "starting task timer");
                Countdown::new(&task.name, total, self.tick).run();
            }
            None => println!(
                "{}",
                style(format!(
                    "'{}' has no duration; completing it now for {} priority XP.",
                    task.name, task.priority
                ))
                .yellow()
            ),
        }

        let completion = self.tracker.complete(
            task.id,
            RewardPolicy::for_timed(task),
            Local::now(),
        )?;
        println!();
        for line in render::completion_lines(&completion) {
            println!("{}", line);
        }
        self.pause()?;
        Ok(())
    }

    fn view_active(&self) -> Result<(), MenuError> {
        self.header("Active Tasks")?;
        let tasks = self.tracker.pending()?;
        println!();
        if tasks.is_empty() {
            println!("{}", style("No active tasks!").yellow());
        } else {
            for line in render::task_table(&tasks) {
                println!("{}", line);
            }
        }
        self.pause()?;
        Ok(())
    }

    fn view_progress(&self) -> Result<(), MenuError> {
        self.header("Your Progress")?;
        let profile = self.tracker.profile()?;
        println!();
        for line in render::progress_lines(&profile, Local::now().date_naive()) {
            println!("{}", line);
        }

        let tasks = self.tracker.pending()?;
        println!();
        println!("{}", style("Active Tasks:").bold());
        for line in render::active_task_lines(&tasks) {
            println!("{}", line);
        }
        self.pause()?;
        Ok(())
    }
}

/// Splits recoverable task failures from terminal failures inside the menu.
#[derive(Debug)]
enum MenuError {
    Task(TaskError),
    Terminal(anyhow::Error),
}

impl From<TaskError> for MenuError {
    fn from(e: TaskError) -> Self {
        MenuError::Task(e)
    }
}

impl From<anyhow::Error> for MenuError {
    fn from(e: anyhow::Error) -> Self {
        MenuError::Terminal(e)
    }
}

impl From<std::io::Error> for MenuError {
    fn from(e: std::io::Error) -> Self {
        MenuError::Terminal(e.into())
    }
}
