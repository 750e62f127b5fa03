use clap::{Parser, Subcommand};
use dealflow::config::Settings;
use dealflow::core::{MatchController, UserAction};
use dealflow::models::{
    InterestDecision, IntroductionDecision, IntroductionOutcome, ListId, Momentum,
    SearchFilters, SearchPreset, WatchIntent,
};
use dealflow::{HttpGateway, InteractionError};
use serde::Serialize;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dealflow")]
#[command(about = "Drive curated matches, discovery search and introductions from the terminal")]
struct Args {
    /// Path to a configuration file (defaults to config/default + config/local)
    #[arg(long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show curated matches
    Curated,
    /// Run a discovery search
    Search {
        #[arg(long)]
        keyword: Option<String>,
        #[arg(long)]
        sector: Option<String>,
        #[arg(long)]
        stage: Option<String>,
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        momentum: Option<Momentum>,
        /// Impact tag, repeatable
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Named preset; replaces every other filter
        #[arg(long)]
        preset: Option<SearchPreset>,
    },
    /// Pass on a startup
    Pass { startup_id: String },
    /// Watch a startup with an intent
    Watch {
        startup_id: String,
        #[arg(long)]
        intent: WatchIntent,
    },
    /// Show the detail record of a startup
    Detail { startup_id: String },
    /// List the watchlist
    Watchlist,
    /// List introductions for the current role
    Intros,
    /// Request an introduction to a startup
    RequestIntro {
        startup_id: String,
        #[arg(long)]
        message: Option<String>,
    },
    /// Accept or decline an introduction
    Respond {
        introduction_id: String,
        decision: IntroductionDecision,
    },
    /// Record the outcome of an accepted introduction
    Outcome {
        introduction_id: String,
        outcome: IntroductionOutcome,
        #[arg(long)]
        notes: Option<String>,
    },
}

/// JSON error body printed on failure
#[derive(Debug, Serialize)]
struct CliError {
    error: dealflow::ErrorKind,
    message: String,
    retryable: bool,
}

impl From<&InteractionError> for CliError {
    fn from(err: &InteractionError) -> Self {
        Self {
            error: err.kind(),
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Failed to render output: {}", e),
    }
}

fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

async fn run(controller: &MatchController, command: Command) -> Result<(), InteractionError> {
    match command {
        Command::Curated => {
            controller.refresh_curated().await?;
            print_json(&controller.list(ListId::Curated).await);
        }
        Command::Search {
            keyword,
            sector,
            stage,
            region,
            momentum,
            tags,
            preset,
        } => {
            let outcome = match preset {
                Some(preset) => controller.apply_preset(preset).await?,
                None => {
                    let filters = SearchFilters {
                        keyword,
                        sector,
                        stage,
                        region,
                        momentum,
                        impact_tags: tags,
                    };
                    controller.search(filters).await?
                }
            };
            info!("Search finished: {:?}", outcome);
            print_json(&controller.list(ListId::Search).await);
        }
        Command::Pass { startup_id } => {
            let outcome = controller
                .decide_on_curated(InterestDecision::pass(startup_id))
                .await?;
            print_json(&outcome);
        }
        Command::Watch { startup_id, intent } => {
            let outcome = controller
                .decide_on_curated(InterestDecision::watch(startup_id, Some(intent)))
                .await?;
            print_json(&outcome);
        }
        Command::Detail { startup_id } => {
            print_json(&controller.startup_detail(&startup_id).await?);
        }
        Command::Watchlist => {
            print_json(&controller.watchlist().await?);
        }
        Command::Intros => {
            controller.refresh_introductions().await?;
            print_json(&controller.introductions().introductions().await);
        }
        Command::RequestIntro {
            startup_id,
            message,
        } => {
            controller.refresh_introductions().await?;
            let outcome = controller
                .dispatch(UserAction::RequestIntroduction { startup_id, message })
                .await?;
            print_json(&outcome);
        }
        Command::Respond {
            introduction_id,
            decision,
        } => {
            controller.refresh_introductions().await?;
            let outcome = controller
                .dispatch(UserAction::Respond {
                    introduction_id,
                    decision,
                })
                .await?;
            print_json(&outcome);
        }
        Command::Outcome {
            introduction_id,
            outcome,
            notes,
        } => {
            controller.refresh_introductions().await?;
            let result = controller
                .dispatch(UserAction::RecordOutcome {
                    introduction_id,
                    outcome,
                    notes,
                })
                .await?;
            print_json(&result);
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenv::dotenv().ok();

    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&settings.logging.level, &settings.logging.format);
    info!("Using backend at {} as {:?}", settings.api.base_url, settings.session.role);

    let gateway = match HttpGateway::from_settings(&settings.api) {
        Ok(gateway) => Arc::new(gateway),
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let controller = MatchController::new(gateway, settings.session.role);

    match run(&controller, args.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            print_json(&CliError::from(&e));
            ExitCode::FAILURE
        }
    }
}
