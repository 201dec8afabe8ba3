use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "habitpal", version, about = "Habitpal CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Habit management
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Talk to your accountability partner
    Chat {
        #[command(subcommand)]
        action: commands::chat::ChatAction,
    },
    /// Dashboard statistics
    Stats {
        /// Day to report on (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Notification inbox
    Notify {
        #[command(subcommand)]
        action: commands::notify::NotifyAction,
    },
    /// User profile
    User {
        #[command(subcommand)]
        action: commands::user::UserAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Habit { action } => commands::habit::run(action),
        Commands::Chat { action } => commands::chat::run(action),
        Commands::Stats { date } => commands::stats::run(date.as_deref()),
        Commands::Notify { action } => commands::notify::run(action),
        Commands::User { action } => commands::user::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
