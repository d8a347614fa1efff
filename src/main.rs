use clap::Parser;
use key_authorization_gateway::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::CreateKey(args) => cli::create_key::run(args).await,
    }
}
