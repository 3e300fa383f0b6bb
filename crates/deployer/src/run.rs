use {
    crate::{
        cli::{Arguments, Command},
        config::Configuration,
        friendbot::Friendbot,
        plan::{self, Deployment, TokenNames},
        tooling::Tooling,
    },
    anyhow::Context,
    clap::Parser,
    std::sync::Arc,
    submitter::{JsonRpcClient, Signer, Submitter, http_client::HttpClientFactory},
    tokio::sync::watch,
};

/// Parses `args`, sets up logging and runs the selected command.
pub async fn start(args: impl Iterator<Item = String>) -> anyhow::Result<()> {
    let args = Arguments::parse_from(args);
    observe::tracing::initialize(&args.logging.log_filter, args.logging.log_stderr_threshold);
    tracing::info!("running deployer with validated arguments:\n{}", args);
    run(args).await
}

pub async fn run(args: Arguments) -> anyhow::Result<()> {
    match &args.command {
        Command::Deploy { .. } => plan::deploy(&deployment(&args).await?).await,
        Command::Tokens { count, random, .. } => {
            let names = if *random {
                TokenNames::Random
            } else {
                TokenNames::Curated
            };
            plan::tokens(&deployment(&args).await?, *count, names).await
        }
        Command::Mint { token, amount, to, .. } => {
            plan::mint(&deployment(&args).await?, token, *amount, to.as_deref()).await
        }
        Command::AddLiquidity { paths, .. } => {
            plan::liquidity(&deployment(&args).await?, *paths).await
        }
        Command::Swap {
            token_in,
            token_out,
            amount_in,
            min_out,
            via,
            ..
        } => {
            let path: Vec<String> = std::iter::once(token_in)
                .chain(via)
                .chain([token_out])
                .cloned()
                .collect();
            plan::swap(&deployment(&args).await?, &path, *amount_in, *min_out).await
        }
        Command::Trustlines { random, .. } => {
            let holder = signer(args.trustline_secret.as_deref(), "--trustline-secret")?;
            let names = if *random {
                TokenNames::Random
            } else {
                TokenNames::Curated
            };
            plan::trustlines(&deployment(&args).await?, &holder, names).await?;
            Ok(())
        }
        Command::Publish { network, folder } => {
            plan::publish(&args.registry_dir, folder, network.as_str()).await?;
            Ok(())
        }
    }
}

/// Connects to the network of the selected command. Cancels pending
/// transactions on shutdown signals.
async fn deployment(args: &Arguments) -> anyhow::Result<Deployment> {
    let config = match &args.config {
        Some(path) => Configuration::from_path(path).await?,
        None => Configuration::default(),
    };
    let network = config.network(args.command.network(), args.rpc_url.as_ref())?;
    let admin = signer(args.admin_secret.as_deref(), "--admin-secret")?;

    let http = HttpClientFactory::new(&args.http_client);
    let client = http.create()?;
    let ledger = Arc::new(JsonRpcClient::new(client.clone(), network.rpc_url.clone()));

    let (cancel_sender, cancel) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::warn!("cancelling pending transactions");
        let _ = cancel_sender.send(true);
    });

    let submitter = Submitter::new(
        ledger,
        args.submission.config(network.passphrase.clone()),
        cancel,
    );
    Ok(Deployment {
        friendbot: network
            .friendbot_url
            .clone()
            .map(|url| Friendbot::new(client, url)),
        tooling: Tooling::new(submitter, admin),
        registry_dir: args.registry_dir.clone(),
        wasm_dir: args.wasm_dir.clone(),
        policy: args.error_policy,
        test_tokens: args.test_tokens,
        liquidity_paths: args.liquidity_paths,
        classic_tokens: args.classic_tokens,
        random_tokens: args.random_tokens,
        network,
    })
}

fn signer(secret: Option<&str>, flag: &str) -> anyhow::Result<Signer> {
    let secret = secret.with_context(|| format!("{flag} is required for this command"))?;
    Signer::from_secret(secret).with_context(|| format!("invalid {flag}"))
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

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_needs_no_admin_secret() {
        let dir = tempfile::tempdir().unwrap();
        let registry = dir.path().join("registry");
        std::fs::create_dir(&registry).unwrap();
        std::fs::write(registry.join("testnet.contracts.json"), "{}").unwrap();
        let public = dir.path().join("public");
        let args = Arguments::try_parse_from([
            "deployer",
            "--registry-dir",
            registry.to_str().unwrap(),
            "publish",
            "testnet",
            public.to_str().unwrap(),
        ])
        .unwrap();

        run(args).await.unwrap();

        let published = std::fs::read_to_string(public.join("testnet.contracts.json")).unwrap();
        assert_eq!(published, "{}");
    }

    #[tokio::test]
    async fn ledger_commands_need_admin_secret() {
        let dir = tempfile::tempdir().unwrap();
        let args = Arguments::try_parse_from([
            "deployer",
            "--registry-dir",
            dir.path().to_str().unwrap(),
            "mint",
            "testnet",
            "AAA",
            "5",
        ])
        .unwrap();

        let err = run(args).await.unwrap_err();

        assert_eq!(err.to_string(), "--admin-secret is required for this command");
    }
}
