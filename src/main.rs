mod cli;

use clap::{CommandFactory, Parser};
use clap::error::ErrorKind;
use rawget::{CancellationToken, Config, ConsoleProgress, Downloader, OutputOptions};

use cli::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.print()?;
            return Ok(());
        }
        Err(_) => {
            eprintln!("Try '{} --help' for more information.", program_name());
            return Ok(());
        }
    };

    let Some(url) = args.url else {
        Args::command().print_help()?;
        return Ok(());
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cfg = Config::load()?;
    tracing::debug!(?cfg, "Configuration loaded");

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Interrupt received, canceling");
                on_signal.cancel();
            }
            Err(e) => tracing::error!(error = %e, "Unable to listen for interrupt"),
        }
    });

    let output = OutputOptions {
        directory: args.directory,
        file_name: args.output,
        rewrite: args.rewrite,
    };

    let downloader = Downloader::new(cfg, cancel.clone());
    let mut progress = ConsoleProgress::new(cancel);

    // Download failures are reported but do not change the exit status
    if let Err(e) = downloader.download(&url, &output, &mut progress).await {
        tracing::debug!(kind = ?e.kind(), "Download failed");
        eprintln!("{e}");
    }

    Ok(())
}

fn program_name() -> String {
    std::env::args()
        .next()
        .as_deref()
        .and_then(|arg0| std::path::Path::new(arg0).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "rawget".to_string())
}
