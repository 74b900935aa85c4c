//! Upload progress reporting

use super::request::ProgressCallback;
use bytes::Bytes;
use futures::stream::{self, StreamExt};

/// Size of the slices a body is streamed in
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Percentage of `total` covered by `sent`, or `None` when the total is unknown
pub fn percent_complete(sent: u64, total: u64) -> Option<f64> {
    if total == 0 {
        return None;
    }
    Some(sent as f64 / total as f64 * 100.0)
}

/// Wrap `data` in a streaming body that reports progress per chunk
pub fn progress_body(data: Bytes, callback: ProgressCallback) -> reqwest::Body {
    let total = data.len() as u64;
    let mut sent = 0u64;

    let body = stream::iter(chunks(data, CHUNK_SIZE)).map(move |chunk| {
        sent += chunk.len() as u64;
        if let Some(percent) = percent_complete(sent, total) {
            callback(percent);
        }
        Ok::<_, std::io::Error>(chunk)
    });

    reqwest::Body::wrap_stream(body)
}

/// Split `data` into zero-copy slices of at most `size` bytes
fn chunks(data: Bytes, size: usize) -> Vec<Bytes> {
    let mut out = Vec::with_capacity(data.len().div_ceil(size));
    let mut offset = 0;
    while offset < data.len() {
        let end = (offset + size).min(data.len());
        out.push(data.slice(offset..end));
        offset = end;
    }
    out
}
