use clap::Parser;

use ipcountry::cli::{Cli, Commands};
use ipcountry::config;
use ipcountry::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    config::init_config(&cli.config);
    let app_config = config::get_config();

    let _guard = match init_logging(&app_config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {:#}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        None | Some(Commands::Serve) => ipcountry::runtime::modes::run_server().await,
        Some(cmd) => {
            if let Err(e) = ipcountry::runtime::modes::run_cli(cmd).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
