mod app;
mod commands;
#[cfg(feature = "tui")]
mod tui;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use certprep_lib::models::ExamType;

#[derive(Parser)]
#[command(name = "certprep", about = "NHA certification exam study aid", version)]
struct Cli {
    /// Use a specific data directory (default: the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum ExamArg {
    Ccma,
    Phlebotomy,
    Ekg,
}

impl From<ExamArg> for ExamType {
    fn from(arg: ExamArg) -> Self {
        match arg {
            ExamArg::Ccma => ExamType::Ccma,
            ExamArg::Phlebotomy => ExamType::Phlebotomy,
            ExamArg::Ekg => ExamType::Ekg,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Print a flashcard deck for a topic (cached unless --refresh)
    Deck {
        /// Topic name (e.g. shorthand, vitals, tube-draw, ekg-rhythms)
        topic: String,
        /// Certification track (selects the general deck's content)
        #[arg(long, value_enum, default_value = "ccma")]
        exam: ExamArg,
        /// Bypass the cache and regenerate the deck
        #[arg(long)]
        refresh: bool,
    },

    /// Show stored exam results, newest first
    History,

    /// Launch interactive TUI
    #[cfg(feature = "tui")]
    Tui,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let runtime = tokio::runtime::Runtime::new()?;

    match cli.command {
        None => {
            // No subcommand → launch TUI
            #[cfg(feature = "tui")]
            {
                let app = app::App::new(cli.data_dir)?;
                tui::run(app, &runtime)?;
            }
            #[cfg(not(feature = "tui"))]
            {
                eprintln!("TUI not available (built without 'tui' feature). Use a subcommand.");
                eprintln!("Run with --help for usage.");
                std::process::exit(1);
            }
        }
        Some(Command::Deck { topic, exam, refresh }) => {
            let app = app::App::new(cli.data_dir)?;
            commands::deck::run(&app, &runtime, &topic, exam.into(), refresh, &cli.format)?;
        }
        Some(Command::History) => {
            let app = app::App::new(cli.data_dir)?;
            commands::history::run(&app, &cli.format)?;
        }
        #[cfg(feature = "tui")]
        Some(Command::Tui) => {
            let app = app::App::new(cli.data_dir)?;
            tui::run(app, &runtime)?;
        }
    }

    Ok(())
}
