use std::process::ExitCode;

use bee::{BeeError, SessionConfig};

async fn launch() -> Result<(), BeeError> {
    let config = SessionConfig::from_env()?;
    bee::run(config).await
}

#[tokio::main]
async fn main() -> ExitCode {
    bee::logging::init("info");

    match launch().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(fatal = true, error = %e, "launcher failed to start");
            ExitCode::FAILURE
        }
    }
}
