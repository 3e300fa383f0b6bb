use {
    super::{
        Deployment,
        TokenNames,
        add_liquidity,
        deploy_classic_tokens,
        deploy_test_tokens,
        liquidity::NATIVE_CODE,
    },
    anyhow::Context,
    registry::{
        AddressBook,
        Token,
        TokenBook,
        token_book::{RANDOM_TOKENS_FILE, TOKENS_FILE},
    },
    submitter::{Asset, ScVal},
};

/// Contracts installed by every deployment, in installation order.
const CORE_CONTRACTS: [&str; 3] = ["pair", "factory", "router"];

const XLM_ICON: &str =
    "https://assets.coingecko.com/coins/images/100/standard/Stellar_symbol_black_RGB.png";

/// Installs and initializes the factory and router. On test networks also
/// lists freshly deployed test tokens and seeds liquidity between them. The
/// native asset is always listed first.
pub async fn deploy(ctx: &Deployment) -> anyhow::Result<()> {
    let network = ctx.network.name;
    let mut addresses = AddressBook::load(network.as_str(), &ctx.registry_dir);
    let mut tokens = TokenBook::load(&ctx.registry_dir, TOKENS_FILE);
    let admin = ctx.tooling.admin().account_id();
    tracing::info!(%network, %admin, "starting deployment");

    if let (false, Some(friendbot)) = (network.is_mainnet(), &ctx.friendbot) {
        ctx.policy
            .handle("fund admin", friendbot.fund(&admin).await)?;
    }

    for contract in CORE_CONTRACTS {
        let result = ctx
            .tooling
            .install_code(&mut addresses, contract, &ctx.wasm_path(contract))
            .await;
        ctx.policy
            .handle(&format!("install {contract}"), result.map_err(Into::into))?;
    }
    addresses.persist()?;

    let result = deploy_factory(ctx, &mut addresses, &admin).await;
    ctx.policy.handle("deploy factory", result)?;
    addresses.persist()?;

    let result = deploy_router(ctx, &mut addresses).await;
    ctx.policy.handle("deploy router", result)?;
    addresses.persist()?;

    if !network.is_mainnet() {
        deploy_test_tokens(
            ctx,
            &mut addresses,
            &mut tokens,
            ctx.test_tokens,
            TokenNames::Curated,
        )
        .await?;
        tokens.persist()?;
        addresses.persist()?;

        seed_liquidity(ctx, &addresses, &tokens).await?;
        deploy_classic_tokens(ctx, &mut tokens, ctx.classic_tokens).await?;

        let mut random = TokenBook::load(&ctx.registry_dir, RANDOM_TOKENS_FILE);
        deploy_test_tokens(
            ctx,
            &mut addresses,
            &mut random,
            ctx.random_tokens,
            TokenNames::Random,
        )
        .await?;
        random.persist()?;
    }

    list_native_token(ctx, &mut tokens).await?;

    tokens.persist()?;
    addresses.persist()?;
    tracing::info!(%network, "deployment finished");
    Ok(())
}

async fn deploy_factory(
    ctx: &Deployment,
    addresses: &mut AddressBook,
    admin: &str,
) -> anyhow::Result<()> {
    let factory = ctx
        .tooling
        .create_instance(addresses, "factory", "factory")
        .await?;
    let pair_hash = hex::decode(addresses.wasm_hash("pair")?).context("invalid pair wasm hash")?;
    ctx.tooling
        .invoke(
            &factory,
            "initialize",
            vec![ScVal::Address(admin.to_string()), ScVal::Bytes(pair_hash)],
        )
        .await?;
    Ok(())
}

async fn deploy_router(ctx: &Deployment, addresses: &mut AddressBook) -> anyhow::Result<()> {
    let factory = addresses.contract_id("factory")?.to_string();
    let router = ctx
        .tooling
        .create_instance(addresses, "router", "router")
        .await?;
    ctx.tooling
        .invoke(&router, "initialize", vec![ScVal::Address(factory)])
        .await?;
    Ok(())
}

/// Adds liquidity between the freshly listed test tokens.
async fn seed_liquidity(
    ctx: &Deployment,
    addresses: &AddressBook,
    tokens: &TokenBook,
) -> anyhow::Result<()> {
    if ctx.liquidity_paths == 0 {
        return Ok(());
    }
    let listed = tokens.tokens(ctx.network.name.as_str());
    if listed.len() < 2 {
        tracing::warn!(tokens = listed.len(), "not enough test tokens to add liquidity");
        return Ok(());
    }
    let result = add_liquidity(ctx, addresses, listed, ctx.liquidity_paths).await;
    if let Some(funded) = ctx.policy.handle("add liquidity", result)? {
        tracing::info!(%funded, "seeded liquidity");
    }
    Ok(())
}

/// Puts XLM at the top of the token list. Without a configured contract id
/// the wrapper is deployed on test networks and skipped on mainnet.
async fn list_native_token(ctx: &Deployment, tokens: &mut TokenBook) -> anyhow::Result<()> {
    let network = ctx.network.name;
    let contract = match (&ctx.network.native_contract, network.is_mainnet()) {
        (Some(contract), _) => Some(contract.clone()),
        (None, false) => {
            let result = ctx.tooling.deploy_asset_contract(&Asset::Native).await;
            ctx.policy
                .handle("deploy native asset contract", result.map_err(Into::into))?
        }
        (None, true) => None,
    };
    let Some(contract) = contract else {
        tracing::warn!(%network, "no native asset contract configured, not listing XLM");
        return Ok(());
    };

    tokens.prepend_token(
        network.as_str(),
        Token {
            name: "Stellar Lumens".to_string(),
            code: NATIVE_CODE.to_string(),
            issuer: None,
            contract,
            org: None,
            domain: None,
            icon: Some(XLM_ICON.to_string()),
            decimals: 7,
        },
    );
    Ok(())
}
