use {
    crate::{api::Api, cli::Arguments},
    clap::Parser,
};

pub async fn start(args: impl Iterator<Item = String>) -> anyhow::Result<()> {
    let args = Arguments::parse_from(args);
    observe::tracing::initialize(&args.logging.log_filter, args.logging.log_stderr_threshold);
    tracing::info!("running artifact server with validated arguments:\n{}", args);
    run(args).await
}

pub async fn run(args: Arguments) -> anyhow::Result<()> {
    Api {
        addr: args.bind_address,
        public_dir: args.public_dir,
    }
    .serve(None, shutdown_signal())
    .await?;
    tracing::info!("artifact server stopped");
    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let (Ok(mut interrupt), Ok(mut terminate)) = (
        signal(SignalKind::interrupt()),
        signal(SignalKind::terminate()),
    ) else {
        tracing::error!("failed to install signal handlers");
        return std::future::pending().await;
    };

    tokio::select! {
        _ = interrupt.recv() => tracing::info!("Received SIGINT"),
        _ = terminate.recv() => tracing::info!("Received SIGTERM"),
    };
}

#[cfg(windows)]
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
