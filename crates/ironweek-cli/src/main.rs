use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

mod commands;

#[derive(Parser)]
#[command(name = "ironweek-cli", version, about = "Ironweek challenge CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Roster management
    Participant {
        #[command(subcommand)]
        action: commands::participant::ParticipantAction,
    },
    /// Workout logging
    Workout {
        #[command(subcommand)]
        action: commands::workout::WorkoutAction,
    },
    /// Personal goals
    Goal {
        #[command(subcommand)]
        action: commands::goal::GoalAction,
    },
    /// Challenge state and admin actions
    Challenge {
        #[command(subcommand)]
        action: commands::challenge::ChallengeAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Participant { action } => commands::participant::run(action),
        Commands::Workout { action } => commands::workout::run(action),
        Commands::Goal { action } => commands::goal::run(action),
        Commands::Challenge { action } => commands::challenge::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "ironweek-cli", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
