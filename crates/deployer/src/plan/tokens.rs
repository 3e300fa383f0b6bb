use {
    super::Deployment,
    rand::{Rng, seq::SliceRandom},
    registry::{
        AddressBook,
        Token,
        TokenBook,
        token_book::{RANDOM_TOKENS_FILE, TOKENS_FILE},
    },
    submitter::{Asset, ScVal},
};

const DECIMALS: u32 = 7;

/// Names, symbols and icons of the curated test tokens.
const CURATED: [(&str, &str, &str); 8] = [
    ("Dogstar", "DOGSTAR", "https://cryptologos.cc/logos/dogecoin-doge-logo.png"),
    ("Tesseract", "TSS", "https://cryptologos.cc/logos/tesseract-tsr-logo.png"),
    ("Nebula Coin", "NBC", "https://cryptologos.cc/logos/nebulas-nas-logo.png"),
    ("Orbit Dollar", "ORBD", "https://cryptologos.cc/logos/usd-coin-usdc-logo.png"),
    ("Comet Gold", "CGLD", "https://cryptologos.cc/logos/pax-gold-paxg-logo.png"),
    ("Quasar", "QSR", "https://cryptologos.cc/logos/quant-qnt-logo.png"),
    ("Pulsar", "PLS", "https://cryptologos.cc/logos/polkadot-new-dot-logo.png"),
    ("Aurora", "AUR", "https://cryptologos.cc/logos/aurora-aoa-logo.png"),
];

/// Syllables random token names are built from.
const NAME_PARTS: [&str; 40] = [
    "ram", "che", "vok", "rim", "rem", "poe", "vol", "tek", "jir", "fox", "pet", "qwa", "yie",
    "muy", "asd", "das", "fel", "ony", "pil", "szx", "dox", "web", "flo", "rie", "rai", "est",
    "jun", "kiv", "ulk", "jaz", "zxa", "vbs", "tro", "tra", "lup", "lep", "wek", "pie", "fer",
    "hel",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenNames {
    /// Well known names from a fixed list, listed in `tokens.json`.
    Curated,
    /// Generated names, listed in `random_tokens.json`. Half of them are
    /// classic assets issued by the admin.
    Random,
}

impl TokenNames {
    /// Token book the tokens are listed in.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Curated => TOKENS_FILE,
            Self::Random => RANDOM_TOKENS_FILE,
        }
    }
}

/// Deploys `count` test tokens and lists them in the matching token book.
pub async fn tokens(ctx: &Deployment, count: usize, names: TokenNames) -> anyhow::Result<()> {
    let mut addresses = AddressBook::load(ctx.network.name.as_str(), &ctx.registry_dir);
    let mut book = TokenBook::load(&ctx.registry_dir, names.file_name());
    deploy_test_tokens(ctx, &mut addresses, &mut book, count, names).await?;
    book.persist()?;
    addresses.persist()?;
    Ok(())
}

/// Replaces the network's token list with `count` freshly deployed tokens.
/// Returns how many were listed.
pub async fn deploy_test_tokens(
    ctx: &Deployment,
    addresses: &mut AddressBook,
    book: &mut TokenBook,
    count: usize,
    names: TokenNames,
) -> anyhow::Result<usize> {
    let network = ctx.network.name.as_str();
    book.reset_network(network);

    // At least one token is always a Soroban token.
    if count > 0 {
        let result = ctx
            .tooling
            .install_code(addresses, "token", &ctx.wasm_path("token"))
            .await;
        ctx.policy
            .handle("install token", result.map_err(Into::into))?;
    }

    let mut listed = 0;
    for (index, (name, code, icon)) in token_names(names, count).into_iter().enumerate() {
        let result = match names {
            TokenNames::Random if index >= count.div_ceil(2) => {
                deploy_classic_token(ctx, name, code).await
            }
            _ => deploy_soroban_token(ctx, addresses, name, code, icon).await,
        };
        let step = format!("deploy token {index}");
        if let Some(token) = ctx.policy.handle(&step, result)? {
            tracing::info!(code = %token.code, contract = %token.contract, "listed test token");
            if book.add_token(network, token) {
                listed += 1;
            }
        }
    }
    Ok(listed)
}

/// Appends `count` classic assets issued by the admin to the network's list.
/// Returns how many were listed.
pub async fn deploy_classic_tokens(
    ctx: &Deployment,
    book: &mut TokenBook,
    count: usize,
) -> anyhow::Result<usize> {
    let network = ctx.network.name.as_str();
    let mut listed = 0;
    for (index, (name, code, _)) in token_names(TokenNames::Random, count)
        .into_iter()
        .enumerate()
    {
        let result = deploy_classic_token(ctx, name, code).await;
        let step = format!("deploy classic token {index}");
        if let Some(token) = ctx.policy.handle(&step, result)? {
            tracing::info!(code = %token.code, contract = %token.contract, "listed classic token");
            if book.add_token(network, token) {
                listed += 1;
            }
        }
    }
    Ok(listed)
}

async fn deploy_soroban_token(
    ctx: &Deployment,
    addresses: &AddressBook,
    name: String,
    code: String,
    icon: Option<String>,
) -> anyhow::Result<Token> {
    let hash = addresses.wasm_hash("token")?;
    let contract = ctx.tooling.create_contract(hash).await?;
    ctx.tooling
        .invoke(
            &contract,
            "initialize",
            vec![
                ScVal::Address(ctx.tooling.admin().account_id()),
                DECIMALS.into(),
                ScVal::String(name.clone()),
                ScVal::String(code.clone()),
            ],
        )
        .await?;
    Ok(Token {
        name,
        code,
        issuer: None,
        contract,
        org: None,
        domain: None,
        icon,
        decimals: DECIMALS,
    })
}

async fn deploy_classic_token(
    ctx: &Deployment,
    name: String,
    code: String,
) -> anyhow::Result<Token> {
    let issuer = ctx.tooling.admin().account_id();
    let asset = Asset::Credit {
        code: code.clone(),
        issuer: issuer.clone(),
    };
    let contract = ctx.tooling.deploy_asset_contract(&asset).await?;
    tracing::debug!(%name, %code, "deployed classic asset contract");
    Ok(Token {
        name: format!("{code}:{issuer}"),
        code,
        issuer: Some(issuer),
        contract,
        org: None,
        domain: None,
        icon: None,
        decimals: DECIMALS,
    })
}

/// `(name, code, icon)` for each token to deploy.
fn token_names(names: TokenNames, count: usize) -> Vec<(String, String, Option<String>)> {
    match names {
        TokenNames::Curated => (0..count)
            .map(|i| {
                let (name, code, icon) = CURATED[i % CURATED.len()];
                // Wrap around with a numeric suffix once the list runs out.
                match i / CURATED.len() {
                    0 => (name.to_string(), code.to_string(), Some(icon.to_string())),
                    round => (format!("{name} {round}"), format!("{code}{round}"), None),
                }
            })
            .collect(),
        TokenNames::Random => {
            let mut rng = rand::thread_rng();
            (0..count)
                .map(|_| {
                    let name = random_name(&mut rng);
                    let code = name[..4].to_uppercase();
                    (name, code, None)
                })
                .collect()
        }
    }
}

fn random_name(rng: &mut impl Rng) -> String {
    let mut parts = NAME_PARTS.choose_multiple(rng, 2);
    let first = parts.next().copied().unwrap_or("ram");
    let second = parts.next().copied().unwrap_or("che");
    format!("{first}{second}")
}
