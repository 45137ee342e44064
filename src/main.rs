use std::{
    io::{self, Write},
    process,
    sync::Arc,
};

use postboard::{
    application::{api::PostsApi, error::AppError},
    commands::{self, OutputMode},
    config,
    infra::{error::InfraError, http::HttpPostsClient, telemetry},
    presentation::prompt::StdinConfirm,
};
use tracing::{Dispatch, Level, dispatcher, error};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "command failed");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "command failed");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    telemetry::init(&settings.logging)?;

    let client = HttpPostsClient::from_settings(&settings.api)?;
    let api: Arc<dyn PostsApi> = Arc::new(client);
    let mode = OutputMode::from_flag(cli_args.json);

    let mut out = String::new();
    let result = commands::execute(api, cli_args.command, mode, &StdinConfirm, &mut out).await;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(out.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(InfraError::from)?;

    result
}
