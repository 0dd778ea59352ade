use anyhow::Error;
use clap::Parser;

use tink_cli::cli::{command, Cli, Commands};
use tink_cli::configuration::get_configuration;
use tink_cli::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let subscriber = get_subscriber("tink-cli".into(), "info".into(), std::io::stderr);
    init_subscriber(subscriber)?;

    let cli = Cli::parse();
    let settings = get_configuration()?;

    match &cli.command {
        Commands::Serve {} => {
            command::serve(settings).await?;
        }

        Commands::Connect {} => {
            command::connect(settings).await?;
        }
    }

    Ok(())
}
