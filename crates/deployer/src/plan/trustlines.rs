use {
    super::{Deployment, TokenNames},
    registry::TokenBook,
    submitter::{Asset, Signer},
};

/// Lets `holder` hold every classic asset listed for the network. Tokens
/// without an issuer are Soroban tokens and need no trustline. Returns how
/// many trustlines were set.
pub async fn trustlines(
    ctx: &Deployment,
    holder: &Signer,
    names: TokenNames,
) -> anyhow::Result<usize> {
    let network = ctx.network.name.as_str();
    let book = TokenBook::load(&ctx.registry_dir, names.file_name());

    let mut set = 0;
    for token in book.tokens(network) {
        let Some(issuer) = &token.issuer else {
            tracing::debug!(code = %token.code, "no issuer, skipping trustline");
            continue;
        };
        let asset = Asset::Credit {
            code: token.code.clone(),
            issuer: issuer.clone(),
        };
        let result = ctx.tooling.change_trust(holder, &asset).await;
        let step = format!("trustline {}", token.code);
        let outcome = ctx.policy.handle(&step, result.map_err(Into::into))?;
        if outcome.is_some() {
            set += 1;
        }
    }
    tracing::info!(%network, %set, holder = %holder.account_id(), "trustlines set");
    Ok(set)
}
