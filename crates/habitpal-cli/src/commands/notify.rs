//! Notification inbox commands for CLI.

use clap::Subcommand;
use habitpal_core::Store;

use super::{short_id, CmdResult};

#[derive(Subcommand)]
pub enum NotifyAction {
    /// List notifications, newest first
    List {
        /// Only unread notifications
        #[arg(long)]
        unread: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a notification read
    Read {
        /// Notification id or id prefix; omit to mark all
        id: Option<String>,
    },
    /// Delete every notification
    Clear,
}

pub fn run(action: NotifyAction) -> CmdResult {
    let store = Store::open()?;
    let mut inbox = store.notifications()?;

    match action {
        NotifyAction::List { unread, json } => {
            let items: Vec<_> = inbox
                .items()
                .iter()
                .filter(|n| !unread || !n.read)
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else if items.is_empty() {
                println!("No notifications.");
            } else {
                for n in items {
                    let mark = if n.read { " " } else { "*" };
                    println!("{mark} {}  {}: {}", short_id(&n.id), n.title, n.body);
                }
            }
        }
        NotifyAction::Read { id: Some(id) } => {
            let full_id = inbox.resolve_id(&id)?;
            inbox.mark_read(&full_id);
            store.save_notifications(&inbox)?;
            println!("ok");
        }
        NotifyAction::Read { id: None } => {
            let ids: Vec<String> = inbox.items().iter().map(|n| n.id.clone()).collect();
            for id in &ids {
                inbox.mark_read(id);
            }
            store.save_notifications(&inbox)?;
            println!("{} notifications marked read", ids.len());
        }
        NotifyAction::Clear => {
            inbox.clear();
            store.save_notifications(&inbox)?;
            println!("notifications cleared");
        }
    }
    Ok(())
}
