use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "rollback", version, about = "CircleCI deployment-rollback MCP server")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the MCP server.
    Serve(commands::serve::ServeArgs),

    /// Print the tool definitions as JSON.
    Tools,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the stdio transport keeps stdout for JSON-RPC.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Serve(args) => commands::serve::run(args).await,
        Command::Tools => commands::tools::run(),
    }
}
