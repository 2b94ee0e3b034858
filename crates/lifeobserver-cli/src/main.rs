use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "lifeobserver-cli", version, about = "LifeObserver CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mood journal
    Mood {
        #[command(subcommand)]
        action: commands::mood::MoodAction,
    },
    /// Habit tracking
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Quadrant planner tasks
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Punch clock
    Punch {
        #[command(subcommand)]
        action: commands::punch::PunchAction,
    },
    /// Derived statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// AI chat companion
    Chat {
        #[command(subcommand)]
        action: commands::chat::ChatAction,
    },
    /// Backup, restore and wipe
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Mood { action } => commands::mood::run(action).await,
        Commands::Habit { action } => commands::habit::run(action).await,
        Commands::Task { action } => commands::task::run(action).await,
        Commands::Punch { action } => commands::punch::run(action).await,
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Chat { action } => commands::chat::run(action).await,
        Commands::Data { action } => commands::data::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
