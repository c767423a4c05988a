use anyhow::{Context, Result};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// Saves archive data to a local file, creating parent directories if they
/// don't exist. An existing file at `path` is overwritten.
pub async fn save_file_async<S>(path: &Path, stream: &mut S) -> Result<()>
where
    S: Stream<Item = Result<Bytes>> + Unpin,
{
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating output directory {parent:?}"))?;
        }
    }

    let mut f = File::create(path)
        .await
        .with_context(|| format!("creating archive {path:?}"))?;

    while let Some(chunk_result) = stream.next().await {
        f.write_all(&chunk_result?).await?;
    }

    f.flush().await?;
    Ok(())
}
