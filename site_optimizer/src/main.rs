use std::process::ExitCode;

use clap::Parser;
use site_optimizer::cli::{self, Cli};
use site_optimizer::logger;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init_logging(cli.log_format);

    match cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_port_in_use() => {
            println!("{}", e);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("❌ Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
