use {
    crate::{config::NetworkName, policy::ErrorPolicy},
    std::{
        fmt::{self, Display, Formatter},
        path::PathBuf,
    },
    url::Url,
};

observe::logging_args_with_default_filter!(
    LoggingArguments,
    "info,deployer=debug,submitter=debug,registry=debug"
);

#[derive(clap::Parser)]
#[command(version, about = "Deploys the Soroswap contracts and test tokens")]
pub struct Arguments {
    #[clap(flatten)]
    pub logging: LoggingArguments,

    #[clap(flatten)]
    pub http_client: submitter::http_client::Arguments,

    #[clap(flatten)]
    pub submission: submitter::arguments::Arguments,

    /// Path to a TOML file overriding the built-in network settings.
    #[clap(long, env)]
    pub config: Option<PathBuf>,

    /// Ledger RPC endpoint, overrides the configured one.
    #[clap(long, env)]
    pub rpc_url: Option<Url>,

    /// Hex encoded ed25519 seed of the admin account. Required by every
    /// command that submits transactions.
    #[clap(long, env)]
    pub admin_secret: Option<String>,

    /// Directory with the address and token books.
    #[clap(long, env, default_value = registry::DEFAULT_DIR)]
    pub registry_dir: PathBuf,

    /// Directory with the compiled contracts.
    #[clap(
        long,
        env,
        default_value = "contracts/target/wasm32-unknown-unknown/release"
    )]
    pub wasm_dir: PathBuf,

    /// Whether a failed step aborts the run or is logged and skipped.
    #[clap(long, env, value_enum, default_value = "fail-fast")]
    pub error_policy: ErrorPolicy,

    /// Hex encoded ed25519 seed of the account `trustlines` sets trustlines
    /// for.
    #[clap(long, env)]
    pub trustline_secret: Option<String>,

    /// Number of Soroban test tokens `deploy` lists on test networks.
    #[clap(long, env, default_value = "8")]
    pub test_tokens: usize,

    /// Number of liquidity paths `deploy` seeds between the test tokens.
    #[clap(long, env, default_value = "3")]
    pub liquidity_paths: usize,

    /// Number of classic assets `deploy` appends to the test tokens.
    #[clap(long, env, default_value = "4")]
    pub classic_tokens: usize,

    /// Number of tokens `deploy` lists in `random_tokens.json`.
    #[clap(long, env, default_value = "8")]
    pub random_tokens: usize,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Install and initialize the factory and router, then list test tokens.
    Deploy { network: NetworkName },
    /// Deploy test tokens and list them in the token book.
    Tokens {
        network: NetworkName,
        count: usize,
        /// Use generated names and list them in `random_tokens.json`.
        #[clap(long)]
        random: bool,
    },
    /// Mint a listed token, to the admin unless `--to` is given.
    Mint {
        network: NetworkName,
        /// Code or contract id of the token.
        token: String,
        amount: i128,
        #[clap(long)]
        to: Option<String>,
    },
    /// Mint the test tokens and add liquidity along several paths between
    /// the first two of them.
    AddLiquidity {
        network: NetworkName,
        #[clap(long, default_value = "3")]
        paths: usize,
    },
    /// Swap an exact amount of one listed token for another.
    Swap {
        network: NetworkName,
        token_in: String,
        token_out: String,
        amount_in: i128,
        #[clap(long, default_value = "0")]
        min_out: i128,
        /// Tokens to route through, in order.
        #[clap(long)]
        via: Vec<String>,
    },
    /// Set trustlines for the listed classic assets.
    Trustlines {
        network: NetworkName,
        /// Use the assets listed in `random_tokens.json`.
        #[clap(long)]
        random: bool,
    },
    /// Copy the registry files to the folder served by the artifact server.
    Publish {
        network: NetworkName,
        #[clap(default_value = "public")]
        folder: PathBuf,
    },
}

impl Command {
    pub fn network(&self) -> NetworkName {
        match self {
            Self::Deploy { network }
            | Self::Tokens { network, .. }
            | Self::Mint { network, .. }
            | Self::AddLiquidity { network, .. }
            | Self::Swap { network, .. }
            | Self::Trustlines { network, .. }
            | Self::Publish { network, .. } => *network,
        }
    }
}

impl Display for Arguments {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let Self {
            logging,
            http_client,
            submission,
            config,
            rpc_url,
            admin_secret,
            trustline_secret,
            registry_dir,
            wasm_dir,
            error_policy,
            test_tokens,
            liquidity_paths,
            classic_tokens,
            random_tokens,
            command,
        } = self;

        write!(f, "{logging}")?;
        write!(f, "{http_client}")?;
        write!(f, "{submission}")?;
        writeln!(f, "config: {config:?}")?;
        writeln!(f, "rpc_url: {:?}", rpc_url.as_ref().map(Url::as_str))?;
        writeln!(
            f,
            "admin_secret: {}",
            if admin_secret.is_some() { "SECRET" } else { "None" }
        )?;
        writeln!(
            f,
            "trustline_secret: {}",
            if trustline_secret.is_some() { "SECRET" } else { "None" }
        )?;
        writeln!(f, "registry_dir: {}", registry_dir.display())?;
        writeln!(f, "wasm_dir: {}", wasm_dir.display())?;
        writeln!(f, "error_policy: {error_policy:?}")?;
        writeln!(f, "test_tokens: {test_tokens}")?;
        writeln!(f, "liquidity_paths: {liquidity_paths}")?;
        writeln!(f, "classic_tokens: {classic_tokens}")?;
        writeln!(f, "random_tokens: {random_tokens}")?;
        writeln!(f, "command: {command:?}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, clap::Parser};

    #[test]
    fn parses_commands() {
        let args = Arguments::try_parse_from(["deployer", "tokens", "testnet", "4", "--random"])
            .unwrap();
        assert_eq!(
            args.command,
            Command::Tokens {
                network: NetworkName::Testnet,
                count: 4,
                random: true,
            }
        );

        let args = Arguments::try_parse_from(["deployer", "publish", "futurenet"]).unwrap();
        assert_eq!(
            args.command,
            Command::Publish {
                network: NetworkName::Futurenet,
                folder: "public".into(),
            }
        );
        assert_eq!(args.command.network(), NetworkName::Futurenet);
    }

    #[test]
    fn parses_trading_commands() {
        let args = Arguments::try_parse_from([
            "deployer", "swap", "testnet", "AAA", "BBB", "2500000", "--via", "CCC", "--via", "DDD",
        ])
        .unwrap();
        assert_eq!(
            args.command,
            Command::Swap {
                network: NetworkName::Testnet,
                token_in: "AAA".to_string(),
                token_out: "BBB".to_string(),
                amount_in: 2_500_000,
                min_out: 0,
                via: vec!["CCC".to_string(), "DDD".to_string()],
            }
        );

        let args =
            Arguments::try_parse_from(["deployer", "mint", "standalone", "AAA", "25000000000000"])
                .unwrap();
        assert_eq!(
            args.command,
            Command::Mint {
                network: NetworkName::Standalone,
                token: "AAA".to_string(),
                amount: 25_000_000_000_000,
                to: None,
            }
        );

        let args = Arguments::try_parse_from(["deployer", "add-liquidity", "testnet"]).unwrap();
        assert_eq!(
            args.command,
            Command::AddLiquidity {
                network: NetworkName::Testnet,
                paths: 3,
            }
        );
        assert_eq!(args.liquidity_paths, 3);
        assert_eq!(args.classic_tokens, 4);
        assert_eq!(args.random_tokens, 8);
    }

    #[test]
    fn network_is_required() {
        assert!(Arguments::try_parse_from(["deployer", "deploy"]).is_err());
        assert!(Arguments::try_parse_from(["deployer", "deploy", "devnet"]).is_err());
    }

    #[test]
    fn display_redacts_secret() {
        let args = Arguments::try_parse_from([
            "deployer",
            "--admin-secret",
            "deadbeef",
            "--error-policy",
            "continue",
            "deploy",
            "standalone",
        ])
        .unwrap();

        let shown = args.to_string();
        assert!(!shown.contains("deadbeef"));
        assert!(shown.contains("trustline_secret: None"));
        assert!(shown.contains("admin_secret: SECRET"));
        assert_eq!(args.error_policy, ErrorPolicy::Continue);
    }
}
