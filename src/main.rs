use anyhow::Result;
use lang_catalog::cli::{self, Command};
use lang_catalog::config::Config;
use tracing::debug;

fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lang_catalog=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;

    let config = Config::from_env()?;
    debug!("Using project directory {}", config.project_dir.display());

    cli::run(command, &config)
}
