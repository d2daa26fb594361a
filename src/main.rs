use clap::Parser;
use segdl::cli::Cli;
use segdl::logging;
use segdl::Error;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::warn;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let request = match cli.request() {
        Ok(request) => request,
        Err(err) => {
            eprintln!("downloader error: {err}");
            return ExitCode::from(2);
        }
    };
    let downloader = cli.downloader();

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, stopping");
            on_interrupt.cancel();
        }
    });

    match downloader.download_with_cancel(&request, cancel).await {
        Ok(result) => {
            println!(
                "{} ({} bytes, {})",
                result.path().display(),
                result.size(),
                result.mode()
            );
            ExitCode::SUCCESS
        }
        Err(Error::Cancelled) => {
            eprintln!("downloader error: {}", Error::Cancelled);
            ExitCode::from(130)
        }
        Err(err) => {
            eprintln!("downloader error: {err}");
            ExitCode::FAILURE
        }
    }
}
