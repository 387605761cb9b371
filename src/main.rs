use std::io;

use clap::Parser;
use clap::error::ErrorKind;
use imgsearch::cli::Cli;
use imgsearch::config::Config;
use imgsearch::error::LookupError;
use imgsearch::pipeline::{ImageSearch, write_error_document};
use tracing::Level;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            // Argument errors still go out as a document.
            let err = LookupError::Arguments(e.render().to_string().trim().to_string());
            write_error_document(io::stdout().lock(), &err)?;
            return Ok(());
        }
    };

    match run(&cli).await {
        Ok(()) => Ok(()),
        Err(LookupError::Io(e)) => {
            tracing::error!("failed to write output: {e}");
            Err(e.into())
        }
        Err(e) if cli.exit_codes => std::process::exit(e.exit_code()),
        Err(e) => {
            tracing::debug!("lookup ended with error: {e}");
            Ok(())
        }
    }
}

async fn run(cli: &Cli) -> Result<(), LookupError> {
    let config = Config::from_env().and_then(|config| cli.apply(config));

    // Initialize tracing subscriber on stderr; stdout carries the document.
    let level = match &config {
        Ok(config) => config.log_level,
        Err(_) => cli.log_level(Level::WARN),
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let search = cli
        .query()
        .and_then(|query| Ok((query, ImageSearch::new(config?)?)));

    match search {
        Ok((query, search)) => {
            tracing::debug!("searching for {query:?}");
            search.run(query, io::stdout().lock()).await
        }
        Err(e) => {
            write_error_document(io::stdout().lock(), &e)?;
            Err(e)
        }
    }
}
