//! Command-line interface for `pag_off`.
//!
//! This module provides the CLI parsing and command routing using clap.

pub mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use pag_off_lib::{Git, Interrupt, TicketStore, VersionControl};

use crate::config::Config;
use crate::logging;

/// `pag-off` - work with a pagure project's tickets offline.
#[derive(Parser, Debug)]
#[command(name = "pag-off")]
#[command(
    author,
    version,
    about = "Interact with your pagure project's tickets offline",
    long_about = None,
    after_help = "Tickets are read from <repos_dir>/tickets/<project>; every change is one git commit."
)]
pub struct Cli {
    /// Increase the verbosity of the information displayed
    #[arg(long, global = true)]
    pub debug: bool,

    /// Do not run `git pull --rebase` before the command
    #[arg(long, global = true)]
    pub no_pull: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the tickets of a project
    List(ListArgs),

    /// Show one ticket with its comments
    Show(TicketArgs),

    /// Add a comment to a ticket
    Comment(CommentArgs),

    /// Assign a ticket to yourself
    Take(TicketArgs),

    /// Close a ticket
    Close(CloseArgs),

    /// List the close statuses already in use in a project
    #[command(name = "close-statuses")]
    CloseStatuses(ProjectArgs),
}

/// Project name as given on pagure.
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Name of the project, can be: <project>, <namespace>/<project>,
    /// fork/<user>/<project> or fork/<user>/<namespace>/<project>
    pub project: String,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Status of the tickets to list: open, closed or all
    #[arg(long, default_value = "open")]
    pub status: String,

    /// Comma-separated tags; tickets must carry all of them
    #[arg(long)]
    pub tags: Option<String>,

    /// Only tickets assigned to this user
    #[arg(long, conflicts_with = "mine")]
    pub assignee: Option<String>,

    /// Only tickets opened by this user
    #[arg(long)]
    pub author: Option<String>,

    /// Only tickets in this milestone
    #[arg(long)]
    pub milestone: Option<String>,

    /// Only tickets assigned to you
    #[arg(long)]
    pub mine: bool,

    /// Order of the listing: newer or older
    #[arg(long, default_value = "newer")]
    pub order: String,
}

#[derive(Args, Debug, Clone)]
pub struct TicketArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Ticket id
    pub id: String,
}

#[derive(Args, Debug, Clone)]
pub struct CommentArgs {
    #[command(flatten)]
    pub ticket: TicketArgs,

    /// Text of the comment
    pub text: String,
}

#[derive(Args, Debug, Clone)]
pub struct CloseArgs {
    #[command(flatten)]
    pub ticket: TicketArgs,

    /// Close status to record, one of those already in use in the project
    #[arg(short = 's', long)]
    pub close_status: Option<String>,
}

/// State shared by every command.
pub struct Context {
    pub config: Config,
    pub interrupt: Interrupt,
    pub pull: bool,
}

impl Context {
    /// Open the ticket store of `project`, pulling first unless disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the project directory is unusable or the pull
    /// fails.
    pub fn open_store(&self, project: &str, pull: bool) -> Result<TicketStore> {
        let dir = self.config.project_dir(project);
        tracing::debug!(project, dir = %dir.display(), "Opening ticket store");
        let store = TicketStore::open(&dir)?;
        if pull && self.pull {
            tracing::info!(dir = %dir.display(), "Pulling latest tickets");
            Git.pull_rebase(store.dir())?;
        }
        Ok(store)
    }
}

/// Run the CLI.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the command fails.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.debug)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    let config = Config::load()?;
    let interrupt = install_interrupt_handler();
    let ctx = Context {
        config,
        interrupt,
        pull: !cli.no_pull,
    };

    tracing::debug!(command = cli.command.name(), "Running command");
    match &cli.command {
        Commands::List(args) => commands::list::execute(args, &ctx),
        Commands::Show(args) => commands::show::execute(args, &ctx),
        Commands::Comment(args) => commands::comment::execute(args, &ctx),
        Commands::Take(args) => commands::take::execute(args, &ctx),
        Commands::Close(args) => commands::close::execute(args, &ctx),
        Commands::CloseStatuses(args) => commands::close_statuses::execute(args, &ctx),
    }
}

/// Exit right away on Ctrl-C, unless a ticket write is in progress; the
/// write then completes and reports the interrupt itself.
fn install_interrupt_handler() -> Interrupt {
    let interrupt = Interrupt::new();
    let handle = interrupt.clone();
    let installed = ctrlc::set_handler(move || {
        if handle.trigger() {
            println!("\nInterrupted by user.");
            std::process::exit(1);
        }
        tracing::warn!("Interrupt received during a write, finishing it first");
    });
    if let Err(e) = installed {
        tracing::warn!(error = %e, "Could not install the interrupt handler");
    }
    interrupt
}

impl Commands {
    const fn name(&self) -> &'static str {
        match self {
            Self::List(_) => "list",
            Self::Show(_) => "show",
            Self::Comment(_) => "comment",
            Self::Take(_) => "take",
            Self::Close(_) => "close",
            Self::CloseStatuses(_) => "close-statuses",
        }
    }
}
