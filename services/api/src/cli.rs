use crate::demo::{run_demo, run_notes_score, run_review, DemoArgs, NotesScoreArgs, ReviewArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use review_insights::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Review Insights",
    about = "Score ticket notes and draft performance reviews from practice-management exports",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score and browse ticket notes
    Notes {
        #[command(subcommand)]
        command: NotesCommand,
    },
    /// Draft a performance review from a member snapshot
    Review(ReviewArgs),
    /// Run an end-to-end demo on built-in sample data
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum NotesCommand {
    /// Score every note in a JSON file and list them best first
    Score(NotesScoreArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Notes {
            command: NotesCommand::Score(args),
        } => run_notes_score(args),
        Command::Review(args) => run_review(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}
