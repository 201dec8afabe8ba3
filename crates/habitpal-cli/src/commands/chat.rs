//! Accountability partner commands for CLI.

use clap::Subcommand;
use habitpal_core::{ChatMessage, Tracker};

use super::{day_or_today, open, rng, CmdResult};

#[derive(Subcommand)]
pub enum ChatAction {
    /// Send a message and print the reply
    Send {
        /// Message text
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
        /// Day the message is sent (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Show the conversation and mark it read
    History {
        /// Number of most recent messages to show
        #[arg(long, default_value = "20")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Post a weekly progress review
    Review {
        /// Last day of the review window (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Get a challenge for one of today's open habits
    Challenge {
        #[arg(long)]
        date: Option<String>,
    },
    /// Post a reminder for a habit and schedule it daily
    Remind {
        /// Habit id, id prefix, or title
        habit: String,
    },
    /// Completion-rate feedback for a habit
    Feedback {
        /// Habit id, id prefix, or title
        habit: String,
    },
}

fn print_message(message: &ChatMessage) {
    let who = if message.is_user() { "you" } else { "partner" };
    println!("{who}: {}", message.content);
}

pub fn run(action: ChatAction) -> CmdResult {
    let (store, config) = open()?;
    let tracker = Tracker::new(&store, &config);
    let mut rng = rng(&config);

    match action {
        ChatAction::Send { message, date } => {
            let today = day_or_today(date.as_deref())?;
            let reply = tracker.send_message(&message.join(" "), today, &mut rng)?;
            print_message(&reply);
        }
        ChatAction::History { limit, json } => {
            let mut conversation = tracker.open_chat(&mut rng)?;
            if json {
                println!("{}", serde_json::to_string_pretty(conversation.tail(limit))?);
            } else {
                for message in conversation.tail(limit) {
                    print_message(message);
                }
            }
            if conversation.unread_count() > 0 {
                conversation.mark_all_read();
                store.save_conversation(&conversation)?;
            }
        }
        ChatAction::Review { date } => {
            let today = day_or_today(date.as_deref())?;
            let review = tracker.weekly_review(today)?;
            println!("{}", review.render());
        }
        ChatAction::Challenge { date } => {
            let today = day_or_today(date.as_deref())?;
            print_message(&tracker.challenge(today, &mut rng)?);
        }
        ChatAction::Remind { habit } => {
            print_message(&tracker.remind(&habit, &mut rng)?);
        }
        ChatAction::Feedback { habit } => {
            print_message(&tracker.feedback(&habit)?);
        }
    }
    Ok(())
}
