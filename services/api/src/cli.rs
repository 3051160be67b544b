use crate::console::{render_board, render_positions};
use crate::server;
use clap::{Args, Parser, Subcommand};
use hirepath::board::DropTarget;
use hirepath::client::{BoardSession, HiringClient, MoveOutcome, DEFAULT_BASE_URL};
use hirepath::error::AppError;
use hirepath::hiring::{CandidateId, PositionId};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "HirePath",
    about = "Serve the hiring pipeline API or work a position's board from the command line",
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
    /// List every position known to a running server
    Positions(RemoteArgs),
    /// Print the kanban board of one position
    Board(BoardArgs),
    /// Move a candidate to another column and persist the stage change
    Move(MoveArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// JSON snapshot to seed positions, flows, candidates, and applications
    #[arg(long)]
    pub(crate) seed: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct RemoteArgs {
    /// Base URL of the hiring API
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub(crate) server: String,
}

#[derive(Args, Debug)]
pub(crate) struct BoardArgs {
    /// Position whose board should be shown
    #[arg(long)]
    pub(crate) position: i64,
    #[command(flatten)]
    pub(crate) remote: RemoteArgs,
}

#[derive(Args, Debug)]
pub(crate) struct MoveArgs {
    #[arg(long)]
    pub(crate) position: i64,
    #[arg(long)]
    pub(crate) candidate: i64,
    /// Name of the destination column (interview step)
    #[arg(long)]
    pub(crate) step: String,
    /// Position inside the destination column
    #[arg(long, default_value_t = 0)]
    pub(crate) index: usize,
    #[command(flatten)]
    pub(crate) remote: RemoteArgs,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Positions(args) => list_positions(args).await,
        Command::Board(args) => show_board(args).await,
        Command::Move(args) => move_candidate(args).await,
    }
}

async fn list_positions(args: RemoteArgs) -> Result<(), AppError> {
    let client = HiringClient::new(args.server)?;
    let positions = client.positions().await?;
    print!("{}", render_positions(&positions));
    Ok(())
}

async fn show_board(args: BoardArgs) -> Result<(), AppError> {
    let client = HiringClient::new(args.remote.server)?;
    let board = client.load_board(PositionId(args.position)).await?;
    print!("{}", render_board(&board));
    Ok(())
}

async fn move_candidate(args: MoveArgs) -> Result<(), AppError> {
    let client = HiringClient::new(args.remote.server)?;
    let mut session = BoardSession::open(client, PositionId(args.position)).await?;

    let outcome = session
        .move_candidate(
            CandidateId(args.candidate),
            DropTarget::new(args.step, args.index),
        )
        .await?;

    match outcome {
        MoveOutcome::Unchanged => println!("Candidate is already there; nothing to do."),
        MoveOutcome::Reordered => println!("Reordered within the column (not persisted)."),
        MoveOutcome::Persisted(application) => println!(
            "Application {} moved to step {}.",
            application.id, application.current_interview_step
        ),
    }
    print!("\n{}", render_board(session.board()));
    Ok(())
}
