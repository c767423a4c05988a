use anyhow::{Context, Result};
use async_stream::try_stream;
use async_zip::tokio::write::ZipFileWriter;
use async_zip::{Compression, ZipEntryBuilder};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio::io::DuplexStream;
use tokio_util::io::ReaderStream;

use super::{Compressor, FileEntry};

/// Buffer between the writer task and the consuming sink. Small enough to
/// keep backpressure, large enough to amortize wakeups.
const PIPE_BUFFER: usize = 64 * 1024;

impl From<Compressor> for Compression {
    fn from(compressor: Compressor) -> Self {
        match compressor {
            Compressor::Deflate => Compression::Deflate,
            Compressor::Stored => Compression::Stored,
        }
    }
}

/// Creates an async streaming ZIP archive.
///
/// The writer half runs as its own task and pushes archive bytes through an
/// in-memory pipe; the consumer sees chunks as soon as they are produced and
/// the pipe blocks the writer when the consumer falls behind. Errors from
/// either half terminate the stream with an `Err` item.
pub fn package_zip_streaming(
    compressor: Compressor,
    files: Vec<FileEntry>,
) -> impl Stream<Item = Result<Bytes>> {
    try_stream! {
        let (tx, rx) = tokio::io::duplex(PIPE_BUFFER);
        let writer = tokio::spawn(write_entries(tx, compressor, files));

        let mut chunks = ReaderStream::new(rx);
        while let Some(chunk) = chunks.next().await {
            let bytes = chunk.context("reading archive pipe")?;
            yield bytes;
        }

        // The pipe hit EOF, so the writer is done; surface its result.
        writer.await.context("archive writer task panicked")??;
    }
}

async fn write_entries(
    pipe: DuplexStream,
    compressor: Compressor,
    files: Vec<FileEntry>,
) -> Result<()> {
    let mut archive = ZipFileWriter::with_tokio(pipe);

    for fe in files {
        let data = tokio::fs::read(&fe.path)
            .await
            .with_context(|| format!("reading {:?}", fe.path))?;

        let entry = ZipEntryBuilder::new(fe.name_in_archive.clone().into(), compressor.into());
        archive
            .write_entry_whole(entry, &data)
            .await
            .with_context(|| format!("writing archive entry {}", fe.name_in_archive))?;
    }

    // Writes the central directory; a zero-entry archive is still valid.
    archive.close().await.context("finishing archive")?;
    Ok(())
}
