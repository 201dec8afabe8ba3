use clap::Subcommand;
use habitpal_core::model::Theme;
use habitpal_core::{Store, Tracker};
use serde_json::json;

use super::CmdResult;

#[derive(Subcommand)]
pub enum UserAction {
    /// Create your profile
    Init {
        /// Display name
        name: String,
    },
    /// Show profile, balance and settings
    Show,
    /// Switch between light and dark theme
    Theme {
        /// light or dark
        #[arg(value_parser = ["light", "dark"])]
        theme: String,
    },
}

pub fn run(action: UserAction) -> CmdResult {
    let store = Store::open()?;
    let tracker = Tracker::with_defaults(&store);

    match action {
        UserAction::Init { name } => {
            let user = tracker.init_user(&name)?;
            println!("Welcome, {}! Your profile id is {}", user.name, user.id);
        }
        UserAction::Show => {
            let user = tracker.user()?;
            let out = json!({
                "user": user,
                "settings": store.settings()?,
                "isDarkMode": store.is_dark_mode()?,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        UserAction::Theme { theme } => {
            let dark = theme == "dark";
            let mut settings = store.settings()?;
            settings.theme = if dark { Theme::Dark } else { Theme::Light };
            store.save_settings(&settings)?;
            store.set_dark_mode(dark)?;
            println!("theme set to {theme}");
        }
    }
    Ok(())
}
