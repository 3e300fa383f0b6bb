use {
    anyhow::Context,
    registry::{
        AddressBook,
        token_book::{RANDOM_TOKENS_FILE, TOKENS_FILE},
    },
    std::path::{Path, PathBuf},
};

/// Copies the registry files of `network` into `public_dir`, where the
/// artifact server picks them up. Files that do not exist are skipped.
/// Returns the paths written.
pub async fn publish(
    registry_dir: &Path,
    public_dir: &Path,
    network: &str,
) -> anyhow::Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(public_dir)
        .await
        .with_context(|| format!("failed to create {}", public_dir.display()))?;

    let mut copied = Vec::new();
    for file in [
        AddressBook::file_name(network),
        TOKENS_FILE.to_string(),
        RANDOM_TOKENS_FILE.to_string(),
    ] {
        let source = registry_dir.join(&file);
        if !tokio::fs::try_exists(&source).await.unwrap_or(false) {
            tracing::warn!(path = %source.display(), "file does not exist, not publishing it");
            continue;
        }
        let destination = public_dir.join(&file);
        tokio::fs::copy(&source, &destination)
            .await
            .with_context(|| format!("failed to copy {file}"))?;
        tracing::info!(%file, destination = %destination.display(), "published");
        copied.push(destination);
    }
    Ok(copied)
}
