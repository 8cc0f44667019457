use clap::Parser;
use log::error;
use service::logging::Logger;

mod cli;
mod commands;

use cli::Cli;

#[tokio::main]
async fn main() {
    service::config::load_dotenv();
    let cli = Cli::parse();

    if let Err(e) = Logger::init_logger(&cli.config) {
        eprintln!("Failed to start logger: {e}");
    }

    let app_state = match service::init_client(&cli.config) {
        Ok(app_state) => app_state,
        Err(e) => {
            error!("Failed to set up the API client: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = commands::run(cli.command, app_state.gateway_ref()).await {
        if let commands::CliError::Domain(err) = &e {
            if err.is_unauthenticated() {
                error!("Run `catalogai login` to sign in");
            }
        }
        error!("{e}");
        std::process::exit(1);
    }
}
