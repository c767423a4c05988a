use anyhow::Result;
use bytes::Bytes;
use futures::Stream;

/// Uploads archive data to a remote URL via HTTP POST, streaming the body.
pub async fn send_http_async<S>(url: &str, stream: S) -> Result<()>
where
    S: Stream<Item = Result<Bytes, anyhow::Error>> + Send + 'static,
{
    let body = reqwest::Body::wrap_stream(stream);
    let client = reqwest::Client::new();
    let resp = client.post(url).body(body).send().await?;
    println!("      Upload response: {}", resp.status());
    resp.error_for_status()?;
    Ok(())
}
