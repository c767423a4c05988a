use anyhow::Result;
use std::path::PathBuf;

pub mod save_file;
pub mod send_net;

use crate::packaging::{Compressor, FileEntry, zip::package_zip_streaming};

/// Defines the destination for a built archive.
#[derive(Debug)]
pub enum OutSink {
    /// Save the archive to a local file at the given path.
    SaveToFile(PathBuf),
    /// Upload the archive to a remote URL via HTTP POST.
    UploadToUrl(String),
}

/// Packages `files` into a ZIP stream and pipes it into the sink.
pub async fn stream_zip_to_sink(
    compressor: Compressor,
    files: Vec<FileEntry>,
    sink: OutSink,
) -> Result<()> {
    let zip_stream = package_zip_streaming(compressor, files);

    match sink {
        OutSink::SaveToFile(path) => {
            // Pin so the sink can call `stream.next()` on it.
            let mut pinned = Box::pin(zip_stream);
            save_file::save_file_async(&path, &mut pinned).await
        }
        OutSink::UploadToUrl(url) => send_net::send_http_async(&url, zip_stream).await,
    }
}
