use std::process::ExitCode;
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> ExitCode {
    grenade_flag::init_runtime();

    // Script from the first argument, or stdin when none is given.
    let result = match std::env::args().nth(1) {
        Some(path) => match tokio::fs::File::open(&path).await {
            Ok(file) => grenade_flag::run_with_config(BufReader::new(file), tokio::io::stdout()).await,
            Err(e) => {
                tracing::error!(path = %path, error = %e, "failed to open script");
                return ExitCode::FAILURE;
            }
        },
        None => {
            grenade_flag::run_with_config(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
                .await
        }
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "replay failed");
            ExitCode::FAILURE
        }
    }
}
