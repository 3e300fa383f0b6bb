//! Minting, liquidity provisioning and swaps against the deployed router.

use {
    super::Deployment,
    anyhow::{Context, anyhow, ensure},
    registry::{
        AddressBook,
        Token,
        TokenBook,
        token_book::{RANDOM_TOKENS_FILE, TOKENS_FILE},
    },
    submitter::ScVal,
    time::OffsetDateTime,
};

/// Minted of each token before every `add_liquidity` call.
pub const MINT_AMOUNT: i128 = 25_000_000_000_000;
/// Amounts deposited into every seeded pair.
pub const LIQUIDITY_A: i128 = 2_000_000_000_000;
pub const LIQUIDITY_B: i128 = 1_250_000_000_000;

/// Code of the native asset in the token lists. It cannot be minted.
pub(crate) const NATIVE_CODE: &str = "XLM";

/// Mints `amount` of `token` to `to`, or to the admin when not given.
/// `token` is a listed code or contract id.
pub async fn mint(
    ctx: &Deployment,
    token: &str,
    amount: i128,
    to: Option<&str>,
) -> anyhow::Result<()> {
    ensure!(amount > 0, "mint amount must be positive, got {amount}");
    let contract = resolve_token(ctx, token)?;
    let to = to.map_or_else(|| ctx.tooling.admin().account_id(), str::to_string);
    mint_to(ctx, &contract, amount, &to).await?;
    tracing::info!(%token, %contract, %amount, %to, "minted");
    Ok(())
}

/// Seeds `paths` routes between the first two listed tokens of the network.
pub async fn liquidity(ctx: &Deployment, paths: usize) -> anyhow::Result<()> {
    let network = ctx.network.name.as_str();
    let addresses = AddressBook::load(network, &ctx.registry_dir);
    let book = TokenBook::load(&ctx.registry_dir, TOKENS_FILE);
    let seeded = add_liquidity(ctx, &addresses, book.tokens(network), paths).await?;
    tracing::info!(%network, %seeded, "added liquidity");
    Ok(())
}

/// Mints both sides and adds liquidity for every hop of the generated paths.
/// The native asset is skipped. Returns how many hops were funded.
pub async fn add_liquidity(
    ctx: &Deployment,
    addresses: &AddressBook,
    tokens: &[Token],
    paths: usize,
) -> anyhow::Result<usize> {
    let contracts: Vec<&str> = tokens
        .iter()
        .filter(|token| token.code != NATIVE_CODE)
        .map(|token| token.contract.as_str())
        .collect();
    ensure!(
        contracts.len() >= 2,
        "need at least two mintable tokens to add liquidity, found {}",
        contracts.len()
    );
    let router = addresses.contract_id("router")?;
    let admin = ctx.tooling.admin().account_id();

    let mut funded = 0;
    for path in generate_paths(&contracts, paths) {
        tracing::debug!(?path, "adding liquidity along path");
        for hop in path.windows(2) {
            let [token_a, token_b] = hop else { continue };
            let result = add_pair_liquidity(ctx, router, token_a, token_b, &admin).await;
            let step = format!("add liquidity {token_a}/{token_b}");
            if ctx.policy.handle(&step, result)?.is_some() {
                funded += 1;
            }
        }
    }
    Ok(funded)
}

async fn add_pair_liquidity(
    ctx: &Deployment,
    router: &str,
    token_a: &str,
    token_b: &str,
    admin: &str,
) -> anyhow::Result<()> {
    mint_to(ctx, token_a, MINT_AMOUNT, admin).await?;
    mint_to(ctx, token_b, MINT_AMOUNT, admin).await?;
    ctx.tooling
        .invoke(
            router,
            "add_liquidity",
            vec![
                ScVal::Address(token_a.to_string()),
                ScVal::Address(token_b.to_string()),
                LIQUIDITY_A.into(),
                LIQUIDITY_B.into(),
                0_i128.into(),
                0_i128.into(),
                ScVal::Address(admin.to_string()),
                ScVal::U64(deadline()),
            ],
        )
        .await?;
    Ok(())
}

/// Swaps exactly `amount_in` of the first token of `path` for at least
/// `min_out` of the last one, routing through the tokens in between.
pub async fn swap(
    ctx: &Deployment,
    path: &[String],
    amount_in: i128,
    min_out: i128,
) -> anyhow::Result<()> {
    ensure!(path.len() >= 2, "a swap path needs at least two tokens");
    ensure!(amount_in > 0, "swap amount must be positive, got {amount_in}");
    ensure!(min_out >= 0, "minimum output must not be negative, got {min_out}");
    let route = path
        .iter()
        .map(|token| resolve_token(ctx, token).map(ScVal::Address))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let addresses = AddressBook::load(ctx.network.name.as_str(), &ctx.registry_dir);
    let router = addresses.contract_id("router")?;
    let admin = ctx.tooling.admin().account_id();

    ctx.tooling
        .invoke(
            router,
            "swap_exact_tokens_for_tokens",
            vec![
                amount_in.into(),
                min_out.into(),
                ScVal::Vec(route),
                ScVal::Address(admin),
                ScVal::U64(deadline()),
            ],
        )
        .await
        .context("swap failed")?;
    tracing::info!(?path, %amount_in, "swapped");
    Ok(())
}

async fn mint_to(ctx: &Deployment, contract: &str, amount: i128, to: &str) -> anyhow::Result<()> {
    ctx.tooling
        .invoke(contract, "mint", vec![ScVal::Address(to.to_string()), amount.into()])
        .await?;
    Ok(())
}

/// Routes from the first to the second contract. Route `i` goes through `i`
/// of the remaining contracts, picked round robin starting at offset `i`.
pub fn generate_paths<'a>(contracts: &[&'a str], count: usize) -> Vec<Vec<&'a str>> {
    let (start, end) = match contracts {
        [start, end, ..] => (*start, *end),
        _ => return Vec::new(),
    };
    let intermediates: Vec<&str> = contracts
        .iter()
        .copied()
        .filter(|contract| *contract != start && *contract != end)
        .collect();

    (0..count)
        .map(|i| {
            let hops = i.min(intermediates.len());
            let mut path = Vec::with_capacity(hops + 2);
            path.push(start);
            path.extend((0..hops).map(|j| intermediates[(i + j) % intermediates.len()]));
            path.push(end);
            path
        })
        .collect()
}

/// Looks `key` up by code or contract id in the network's token lists.
fn resolve_token(ctx: &Deployment, key: &str) -> anyhow::Result<String> {
    let network = ctx.network.name.as_str();
    [TOKENS_FILE, RANDOM_TOKENS_FILE]
        .into_iter()
        .find_map(|file| {
            TokenBook::load(&ctx.registry_dir, file)
                .tokens(network)
                .iter()
                .find(|token| token.contract == key || token.code.eq_ignore_ascii_case(key))
                .map(|token| token.contract.clone())
        })
        .ok_or_else(|| anyhow!("token {key} is not listed on {network}"))
}

/// Unix time one hour from now.
fn deadline() -> u64 {
    let deadline = OffsetDateTime::now_utc() + time::Duration::HOUR;
    u64::try_from(deadline.unix_timestamp()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            config::{Configuration, NetworkName},
            policy::ErrorPolicy,
            testing::{FakeLedger, tooling},
        },
        std::{path::Path, sync::Arc},
    };

    fn deployment(ledger: Arc<FakeLedger>, dir: &Path, policy: ErrorPolicy) -> Deployment {
        let rpc = "http://localhost:8000".parse().unwrap();
        Deployment {
            network: Configuration::default()
                .network(NetworkName::Testnet, Some(&rpc))
                .unwrap(),
            tooling: tooling(ledger),
            friendbot: None,
            registry_dir: dir.join(".soroban"),
            wasm_dir: dir.to_path_buf(),
            policy,
            test_tokens: 0,
            liquidity_paths: 0,
            classic_tokens: 0,
            random_tokens: 0,
        }
    }

    fn token(code: &str, contract: &str) -> Token {
        Token {
            name: code.to_string(),
            code: code.to_string(),
            issuer: None,
            contract: contract.to_string(),
            org: None,
            domain: None,
            icon: None,
            decimals: 7,
        }
    }

    /// Lists `tokens` on testnet and records a router.
    fn seed_registry(ctx: &Deployment, tokens: &[Token]) -> AddressBook {
        let mut book = TokenBook::load(&ctx.registry_dir, TOKENS_FILE);
        for token in tokens {
            book.add_token("testnet", token.clone());
        }
        book.persist().unwrap();
        let mut addresses = AddressBook::load("testnet", &ctx.registry_dir);
        addresses.set_contract_id("router", "CROUTER");
        addresses.persist().unwrap();
        addresses
    }

    #[test]
    fn paths_grow_through_intermediates() {
        let paths = generate_paths(&["A", "B", "C", "D", "E"], 4);

        assert_eq!(
            paths,
            [
                vec!["A", "B"],
                vec!["A", "D", "B"],
                vec!["A", "E", "C", "B"],
                vec!["A", "C", "D", "E", "B"],
            ]
        );
    }

    #[test]
    fn paths_without_intermediates_are_direct() {
        assert_eq!(generate_paths(&["A", "B"], 3), vec![vec!["A", "B"]; 3]);
        assert!(generate_paths(&["A"], 3).is_empty());
        assert!(generate_paths(&["A", "B", "C"], 0).is_empty());
    }

    #[tokio::test]
    async fn adds_liquidity_along_paths() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Arc::new(FakeLedger::default());
        let ctx = deployment(ledger.clone(), dir.path(), ErrorPolicy::FailFast);
        let tokens = [
            token(NATIVE_CODE, "CXLM"),
            token("AAA", "CA"),
            token("BBB", "CB"),
            token("CCC", "CC"),
        ];
        let addresses = seed_registry(&ctx, &tokens);

        let funded = add_liquidity(&ctx, &addresses, &tokens, 2).await.unwrap();

        // [CA, CB] then [CA, CC, CB].
        assert_eq!(funded, 3);
        let calls = ledger.invocations("add_liquidity");
        let pairs: Vec<_> = calls
            .iter()
            .map(|(router, args)| {
                assert_eq!(router, "CROUTER");
                (args[0].clone(), args[1].clone())
            })
            .collect();
        let address = |a: &str| ScVal::Address(a.to_string());
        assert_eq!(
            pairs,
            [
                (address("CA"), address("CB")),
                (address("CA"), address("CC")),
                (address("CC"), address("CB")),
            ]
        );
        let admin = ctx.tooling.admin().account_id();
        let args = &calls[0].1;
        assert_eq!(args[2], ScVal::I128(LIQUIDITY_A));
        assert_eq!(args[3], ScVal::I128(LIQUIDITY_B));
        assert_eq!(args[4], ScVal::I128(0));
        assert_eq!(args[5], ScVal::I128(0));
        assert_eq!(args[6], ScVal::Address(admin.clone()));
        let now = OffsetDateTime::now_utc().unix_timestamp();
        assert!(matches!(args[7], ScVal::U64(at) if i64::try_from(at).unwrap() > now));

        let mints = ledger.invocations("mint");
        assert_eq!(mints.len(), 6);
        assert!(mints.iter().all(|(contract, _)| contract != "CXLM"));
        assert_eq!(mints[0].1, [ScVal::Address(admin), ScVal::I128(MINT_AMOUNT)]);
    }

    #[tokio::test]
    async fn failed_pair_is_skipped_when_continuing() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Arc::new(FakeLedger::failing("add_liquidity"));
        let ctx = deployment(ledger.clone(), dir.path(), ErrorPolicy::Continue);
        let tokens = [token("AAA", "CA"), token("BBB", "CB"), token("CCC", "CC")];
        let addresses = seed_registry(&ctx, &tokens);

        let funded = add_liquidity(&ctx, &addresses, &tokens, 2).await.unwrap();

        assert_eq!(funded, 0);
        assert_eq!(ledger.invocations("add_liquidity").len(), 3);
    }

    #[tokio::test]
    async fn failed_pair_aborts_when_failing_fast() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Arc::new(FakeLedger::failing("add_liquidity"));
        let ctx = deployment(ledger.clone(), dir.path(), ErrorPolicy::FailFast);
        let tokens = [token("AAA", "CA"), token("BBB", "CB")];
        let addresses = seed_registry(&ctx, &tokens);

        let err = add_liquidity(&ctx, &addresses, &tokens, 3)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "add liquidity CA/CB failed");
        assert_eq!(ledger.invocations("add_liquidity").len(), 1);
    }

    #[tokio::test]
    async fn liquidity_needs_two_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Arc::new(FakeLedger::default());
        let ctx = deployment(ledger.clone(), dir.path(), ErrorPolicy::FailFast);
        seed_registry(&ctx, &[token(NATIVE_CODE, "CXLM"), token("AAA", "CA")]);

        assert!(liquidity(&ctx, 3).await.is_err());
        assert!(ledger.operations().is_empty());
    }

    #[tokio::test]
    async fn mints_listed_token_by_code() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Arc::new(FakeLedger::default());
        let ctx = deployment(ledger.clone(), dir.path(), ErrorPolicy::FailFast);
        seed_registry(&ctx, &[token("AAA", "CA")]);

        mint(&ctx, "aaa", 500, Some("GUSER")).await.unwrap();

        assert_eq!(
            ledger.invocations("mint"),
            [(
                "CA".to_string(),
                vec![ScVal::Address("GUSER".to_string()), ScVal::I128(500)]
            )]
        );
    }

    #[tokio::test]
    async fn mint_rejects_unknown_token_and_bad_amount() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Arc::new(FakeLedger::default());
        let ctx = deployment(ledger.clone(), dir.path(), ErrorPolicy::FailFast);
        seed_registry(&ctx, &[token("AAA", "CA")]);

        let err = mint(&ctx, "ZZZ", 500, None).await.unwrap_err();
        assert_eq!(err.to_string(), "token ZZZ is not listed on testnet");
        assert!(mint(&ctx, "AAA", 0, None).await.is_err());
        assert!(ledger.operations().is_empty());
    }

    #[tokio::test]
    async fn swaps_through_router() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Arc::new(FakeLedger::default());
        let ctx = deployment(ledger.clone(), dir.path(), ErrorPolicy::FailFast);
        seed_registry(&ctx, &[token("AAA", "CA"), token("BBB", "CB"), token("CCC", "CC")]);

        let path = ["AAA".to_string(), "CC".to_string(), "BBB".to_string()];
        swap(&ctx, &path, 2_500_000, 1).await.unwrap();

        let calls = ledger.invocations("swap_exact_tokens_for_tokens");
        assert_eq!(calls.len(), 1);
        let (router, args) = &calls[0];
        assert_eq!(router, "CROUTER");
        assert_eq!(args[0], ScVal::I128(2_500_000));
        assert_eq!(args[1], ScVal::I128(1));
        assert_eq!(
            args[2],
            ScVal::Vec(vec![
                ScVal::Address("CA".to_string()),
                ScVal::Address("CC".to_string()),
                ScVal::Address("CB".to_string()),
            ])
        );
        assert_eq!(args[3], ScVal::Address(ctx.tooling.admin().account_id()));
    }

    #[tokio::test]
    async fn swap_needs_a_router() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Arc::new(FakeLedger::default());
        let ctx = deployment(ledger.clone(), dir.path(), ErrorPolicy::FailFast);
        let mut book = TokenBook::load(&ctx.registry_dir, TOKENS_FILE);
        book.add_token("testnet", token("AAA", "CA"));
        book.add_token("testnet", token("BBB", "CB"));
        book.persist().unwrap();

        let path = ["AAA".to_string(), "BBB".to_string()];
        assert!(swap(&ctx, &path, 10, 0).await.is_err());
        assert!(swap(&ctx, &path[..1], 10, 0).await.is_err());
        assert!(ledger.operations().is_empty());
    }
}
