use {anyhow::Context, reqwest::StatusCode, url::Url};

/// Funds accounts on test networks.
pub struct Friendbot {
    client: reqwest::Client,
    url: Url,
}

impl Friendbot {
    pub fn new(client: reqwest::Client, url: Url) -> Self {
        Self { client, url }
    }

    pub async fn fund(&self, account: &str) -> anyhow::Result<()> {
        let mut url = self.url.clone();
        url.query_pairs_mut().append_pair("addr", account);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("friendbot request failed")?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match status {
            status if status.is_success() => {
                tracing::info!(%account, "funded account");
                Ok(())
            }
            StatusCode::BAD_REQUEST if body.contains("createAccountAlreadyExist") => {
                tracing::debug!(%account, "account already funded");
                Ok(())
            }
            status => anyhow::bail!("friendbot returned {status}: {body}"),
        }
    }
}
