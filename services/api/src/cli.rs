use crate::entries::{run_add, run_list, AddArgs, ListArgs};
use crate::server;
use applications_form::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Applications Form",
    about = "Serve the application intake form or work with the applications list from the command line",
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
    /// Read or add entries in the applications list
    Entries {
        #[command(subcommand)]
        command: EntriesCommand,
    },
}

#[derive(Subcommand, Debug)]
enum EntriesCommand {
    /// Print every entry currently stored in the list
    List(ListArgs),
    /// Validate and save a new entry, then print the refreshed list
    Add(AddArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) store: StoreArgs,
}

#[derive(Args, Debug, Default, Clone, Copy)]
pub(crate) struct StoreArgs {
    /// Keep entries in process memory instead of the SharePoint list
    #[arg(long)]
    pub(crate) in_memory: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Entries {
            command: EntriesCommand::List(args),
        } => run_list(args).await,
        Command::Entries {
            command: EntriesCommand::Add(args),
        } => run_add(args).await,
    }
}
