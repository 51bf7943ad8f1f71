use anyhow::Result;
use clap::Parser;
use fxconvert::config::AppConfig;
use fxconvert::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long)]
    config_path: Option<String>,

    /// Address to bind, overrides HOST
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overrides PORT
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match AppConfig::load(cli.config_path.as_deref()) {
        Ok(mut config) => {
            if let Some(host) = cli.host {
                config.server.host = host;
            }
            if let Some(port) = cli.port {
                config.server.port = port;
            }
            fxconvert::run(config).await
        }
        Err(e) => Err(e),
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
