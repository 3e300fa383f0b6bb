#[tokio::main]
async fn main() -> anyhow::Result<()> {
    artifact_server::start(std::env::args()).await
}
