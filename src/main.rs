use booking_rs::cli::{self, Cli, Outcome};
use booking_rs::server::Server;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = cli::load_and_merge_config(&cli)?;
    cli::init_logger_from_settings(&settings)?;

    match cli::execute_command(&cli, settings.clone()).await? {
        Outcome::Serve => Server::new(settings).run().await,
        Outcome::Done => Ok(()),
    }
}
