use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::eyre;
use commands::library::FilterArgs;
use commands::records::{parse_score, GameChanges, NewGame, NewReview, ReviewChanges};
use commands::{config, library, records, Session};
use game_library_config::{Config, PathManager};

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "axiom")]
#[command(about = "Axiom - Your game library, reviews and stats from the terminal")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Read from the last saved snapshot instead of the backend
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch games and reviews and save them as the offline snapshot
    Fetch,

    /// List games, optionally filtered
    Games {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// List reviews with their game details, optionally filtered
    Reviews {
        #[command(flatten)]
        filters: FilterArgs,

        /// Whitespace-separated keywords; every one must match
        #[arg(long, short = 'k')]
        keywords: Option<String>,
    },

    /// Show library and review statistics
    Stats,

    /// Show the values available for filtering
    Facets,

    /// Create, edit or delete reviews
    Review {
        #[command(subcommand)]
        cmd: ReviewCommands,
    },

    /// Add, edit, inspect or delete games
    Game {
        #[command(subcommand)]
        cmd: GameCommands,
    },

    /// Show or create the configuration file
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ReviewCommands {
    /// Review a game from the library, picked by title
    #[command(long_about = "Write a review for a game in the library. The game is matched by title, ignoring case. The score is entered on the 0-10 scale.")]
    Add {
        /// Title of the reviewed game
        #[arg(long)]
        game: String,

        /// Review headline
        #[arg(long)]
        title: String,

        /// Review text
        #[arg(long, default_value = "")]
        content: String,

        /// Score from 0 to 10
        #[arg(long, value_parser = parse_score, default_value = "8")]
        score: f64,
    },

    /// Change an existing review
    Edit {
        /// Review identifier
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        content: Option<String>,

        /// New score from 0 to 10
        #[arg(long, value_parser = parse_score)]
        score: Option<f64>,
    },

    /// Delete a review
    Rm {
        /// Review identifier
        id: String,
    },
}

#[derive(Subcommand)]
enum GameCommands {
    /// Add a game to the library
    Add {
        #[arg(long)]
        title: String,

        /// Comma-separated platforms (e.g. "PC, PS5")
        #[arg(long)]
        platform: Option<String>,

        /// Comma-separated genres
        #[arg(long)]
        genre: Option<String>,

        #[arg(long)]
        year: Option<i32>,

        #[arg(long)]
        developer: Option<String>,

        /// Hours played
        #[arg(long)]
        hours: Option<f64>,

        /// Score from 0 to 10
        #[arg(long, value_parser = parse_score)]
        score: Option<f64>,

        /// Mark the game as completed
        #[arg(long, action = ArgAction::SetTrue)]
        completed: bool,

        /// Cover image URL
        #[arg(long)]
        cover: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Change an existing game; only the given fields are updated
    Edit {
        /// Game identifier
        id: String,

        #[arg(long)]
        title: Option<String>,

        /// Comma-separated platforms, replacing the current ones
        #[arg(long)]
        platform: Option<String>,

        /// Comma-separated genres, replacing the current ones
        #[arg(long)]
        genre: Option<String>,

        #[arg(long)]
        year: Option<i32>,

        #[arg(long)]
        developer: Option<String>,

        /// Hours played
        #[arg(long)]
        hours: Option<f64>,

        /// Score from 0 to 10
        #[arg(long, value_parser = parse_score)]
        score: Option<f64>,

        /// Completed flag (true or false)
        #[arg(long)]
        completed: Option<bool>,

        /// Cover image URL
        #[arg(long)]
        cover: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Show a game together with its reviews
    Reviews {
        /// Game identifier
        id: String,
    },

    /// Delete a game
    Rm {
        /// Game identifier
        id: String,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigCommands {
    /// Show the current configuration and where files live
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,

        /// Backend base URL to store instead of the default
        #[arg(long)]
        api_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let paths = PathManager::default();
    let config_file = paths.config_file();
    let config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

    logging::init_logging(cli.verbose, cli.quiet, &config.logging).map_err(|e| eyre!("{}", e))?;
    tracing::debug!("Using config file {}", config_file.display());

    let output = output::Output::new(cli.output, cli.quiet);

    // Config commands work with an invalid file, so validation waits for a session.
    let offline = cli.offline;
    let session_paths = paths.clone();
    let open_session = move || -> color_eyre::Result<Session> {
        config
            .validate()
            .map_err(|e| eyre!("Invalid configuration in {}: {}", config_file.display(), e))?;
        Ok(Session::new(config, session_paths, offline))
    };

    match cli.command {
        Commands::Config { cmd } => config::run_config(cmd.unwrap_or(ConfigCommands::Show), &paths, &output),
        Commands::Fetch => library::run_fetch(&open_session()?, &output).await,
        Commands::Games { filters } => library::run_games(filters, &open_session()?, &output).await,
        Commands::Reviews { filters, keywords } => {
            library::run_reviews(filters, keywords, &open_session()?, &output).await
        }
        Commands::Stats => library::run_stats(&open_session()?, &output).await,
        Commands::Facets => library::run_facets(&open_session()?, &output).await,
        Commands::Review { cmd } => {
            let session = open_session()?;
            match cmd {
                ReviewCommands::Add { game, title, content, score } => {
                    records::run_review_add(NewReview { game, title, content, score }, &session, &output).await
                }
                ReviewCommands::Edit { id, title, content, score } => {
                    records::run_review_edit(id, ReviewChanges { title, content, score }, &session, &output).await
                }
                ReviewCommands::Rm { id } => records::run_review_rm(id, &session, &output).await,
            }
        }
        Commands::Game { cmd } => {
            let session = open_session()?;
            match cmd {
                GameCommands::Add {
                    title,
                    platform,
                    genre,
                    year,
                    developer,
                    hours,
                    score,
                    completed,
                    cover,
                    description,
                } => {
                    let new = NewGame {
                        title,
                        platform,
                        genre,
                        year,
                        developer,
                        hours,
                        score,
                        completed,
                        cover_url: cover,
                        description,
                    };
                    records::run_game_add(new, &session, &output).await
                }
                GameCommands::Edit {
                    id,
                    title,
                    platform,
                    genre,
                    year,
                    developer,
                    hours,
                    score,
                    completed,
                    cover,
                    description,
                } => {
                    let changes = GameChanges {
                        title,
                        platform,
                        genre,
                        year,
                        developer,
                        hours,
                        score,
                        completed,
                        cover_url: cover,
                        description,
                    };
                    records::run_game_edit(id, changes, &session, &output).await
                }
                GameCommands::Reviews { id } => library::run_game_reviews(id, &session, &output).await,
                GameCommands::Rm { id } => records::run_game_rm(id, &session, &output).await,
            }
        }
    }
}
