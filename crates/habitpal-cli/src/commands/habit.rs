//! Habit management commands for CLI.

use clap::Subcommand;
use habitpal_core::model::parse_day;
use habitpal_core::{Frequency, Habit, Priority, Tracker};

use super::{day_or_today, open, short_id, CmdResult};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a new habit
    Add {
        /// Habit title
        title: String,
        /// Free-form category
        #[arg(long, default_value = "")]
        category: String,
        /// daily, weekly, monthly, or any custom label
        #[arg(long, default_value = "daily")]
        frequency: Frequency,
        /// high, medium or low
        #[arg(long)]
        priority: Option<Priority>,
        /// Longer description
        #[arg(long)]
        description: Option<String>,
        /// Daily reminder time (HH:MM)
        #[arg(long)]
        reminder: Option<String>,
        /// First tracked day (YYYY-MM-DD, default: today)
        #[arg(long)]
        start: Option<String>,
    },
    /// List habits
    List {
        /// Include archived habits
        #[arg(long)]
        all: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one habit
    Show {
        /// Habit id, id prefix, or title
        habit: String,
    },
    /// Mark a habit complete
    Complete {
        /// Habit id, id prefix, or title
        habit: String,
        /// Day to record (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Archive a habit, keeping its history
    Archive {
        /// Habit id, id prefix, or title
        habit: String,
    },
}

pub fn run(action: HabitAction) -> CmdResult {
    let (store, config) = open()?;
    let tracker = Tracker::new(&store, &config);

    match action {
        HabitAction::Add {
            title,
            category,
            frequency,
            priority,
            description,
            reminder,
            start,
        } => {
            let start = match start {
                Some(raw) => parse_day(&raw)?,
                None => day_or_today(None)?,
            };
            let mut habit = Habit::new(title, category, frequency, start);
            habit.priority = priority;
            habit.reminder_time = reminder;
            if let Some(d) = description {
                habit = habit.with_description(d);
            }
            let habit = tracker.add_habit(habit)?;
            println!("Habit created: {}", habit.id);
        }
        HabitAction::List { all, json } => {
            let habits: Vec<Habit> = tracker
                .habits()?
                .into_iter()
                .filter(|h| all || h.active)
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&habits)?);
            } else if habits.is_empty() {
                println!("No habits yet. Add one with `habitpal habit add <title>`.");
            } else {
                let today = day_or_today(None)?;
                for h in &habits {
                    let mark = if h.is_completed_on(today) { "x" } else { " " };
                    let archived = if h.active { "" } else { " (archived)" };
                    println!(
                        "[{mark}] {}  {}  {}  streak {} (best {}){archived}",
                        short_id(&h.id),
                        h.title,
                        h.frequency,
                        h.streak_count,
                        h.longest_streak
                    );
                }
            }
        }
        HabitAction::Show { habit } => {
            let habit = tracker.find_habit(&habit)?;
            println!("{}", serde_json::to_string_pretty(&habit)?);
        }
        HabitAction::Complete { habit, date } => {
            let today = day_or_today(date.as_deref())?;
            let report = tracker.complete(&habit, today)?;
            println!(
                "Completed {} for {today}: streak {}, +{} points",
                report.habit.title,
                report.habit.streak_count,
                report.points.total()
            );
            if report.points.milestone > 0 {
                println!(
                    "Milestone! {} days in a row (+{} bonus)",
                    report.habit.streak_count, report.points.milestone
                );
            }
            if let Some(bonus) = report.daily_bonus {
                println!("All habits done for today (+{bonus} consistency bonus)");
            }
            if let Some(balance) = report.balance {
                println!("Balance: {balance}");
            }
        }
        HabitAction::Archive { habit } => {
            let habit = tracker.archive(&habit)?;
            println!("Habit archived: {}", habit.id);
        }
    }
    Ok(())
}
