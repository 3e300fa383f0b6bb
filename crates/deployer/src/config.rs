//! Network configuration.
//!
//! Every supported network has built-in defaults. A TOML file can override
//! them per network, e.g.
//!
//! ```toml
//! [networks.mainnet]
//! rpc-url = "https://rpc.example.org"
//! native-contract = "CAS3J7GYLGXMF6TDJBBYYSE3HQ6BBSMLNUQ34T6TZMYMW2EVH34XOWMA"
//! ```

use {
    anyhow::{Context, anyhow},
    serde::{Deserialize, Serialize},
    std::{collections::BTreeMap, path::Path},
    url::Url,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
#[clap(rename_all = "lowercase")]
pub enum NetworkName {
    Mainnet,
    Testnet,
    Standalone,
    Futurenet,
}

impl NetworkName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Standalone => "standalone",
            Self::Futurenet => "futurenet",
        }
    }

    pub fn is_mainnet(self) -> bool {
        self == Self::Mainnet
    }
}

impl std::fmt::Display for NetworkName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to talk to one network.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Network {
    pub name: NetworkName,
    pub rpc_url: Url,
    pub passphrase: String,
    /// Funds fresh accounts on test networks.
    pub friendbot_url: Option<Url>,
    /// Contract id of the wrapped native asset. When unset it is deployed
    /// (test networks) or skipped (mainnet).
    pub native_contract: Option<String>,
}

/// Per-network overrides as read from the configuration file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct NetworkOverride {
    pub rpc_url: Option<Url>,
    pub passphrase: Option<String>,
    pub friendbot_url: Option<Url>,
    pub native_contract: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Configuration {
    /// Keyed by network name.
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkOverride>,
}

impl Configuration {
    pub async fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        toml::from_str(&content)
            .map_err(|err| anyhow!("failed to parse TOML config at {}: {err}", path.display()))
    }

    /// Resolves the settings for `name`, applying overrides on top of the
    /// built-in defaults and the command line RPC url.
    pub fn network(&self, name: NetworkName, rpc_url: Option<&Url>) -> anyhow::Result<Network> {
        let preset = preset(name);
        let overrides = self.networks.get(name.as_str()).cloned().unwrap_or_default();
        let rpc_url = rpc_url
            .cloned()
            .or(overrides.rpc_url)
            .or(preset.rpc_url)
            .ok_or_else(|| anyhow!("no rpc url configured for {name}"))?;
        Ok(Network {
            name,
            rpc_url,
            passphrase: overrides.passphrase.unwrap_or(preset.passphrase),
            friendbot_url: overrides.friendbot_url.or(preset.friendbot_url),
            native_contract: overrides.native_contract,
        })
    }
}

struct Preset {
    rpc_url: Option<Url>,
    passphrase: String,
    friendbot_url: Option<Url>,
}

fn preset(name: NetworkName) -> Preset {
    let url = |s: &str| Url::parse(s).ok();
    match name {
        NetworkName::Mainnet => Preset {
            rpc_url: None,
            passphrase: "Public Global Stellar Network ; September 2015".to_string(),
            friendbot_url: None,
        },
        NetworkName::Testnet => Preset {
            rpc_url: url("https://soroban-testnet.stellar.org"),
            passphrase: "Test SDF Network ; September 2015".to_string(),
            friendbot_url: url("https://friendbot.stellar.org"),
        },
        NetworkName::Standalone => Preset {
            rpc_url: url("http://localhost:8000/soroban/rpc"),
            passphrase: "Standalone Network ; February 2017".to_string(),
            friendbot_url: url("http://localhost:8000/friendbot"),
        },
        NetworkName::Futurenet => Preset {
            rpc_url: url("https://rpc-futurenet.stellar.org"),
            passphrase: "Test SDF Future Network ; October 2022".to_string(),
            friendbot_url: url("https://friendbot-futurenet.stellar.org"),
        },
    }
}
