//! File API operations
//!
//! Thin wrappers that turn a file-system style call into a request under the
//! files root. They only look at success or failure of the response.

use crate::error::{Error, Result};
use crate::http::{AuthenticatedClient, RequestOptions};
use bytes::Bytes;
use reqwest::{Method, Response};
use tracing::info;

/// Action header understood by the file server
pub const ACTION_HEADER: &str = "X-FZ-Action";

/// Recursive-delete header understood by the file server
pub const RECURSIVE_HEADER: &str = "X-FZ-Recursive";

/// Create a directory
pub async fn mkdir(client: &AuthenticatedClient, path: &str) -> Result<()> {
    let options = RequestOptions::with_method(Method::PUT).header(ACTION_HEADER, "mkdir");
    let response = client.fetch(&files_path(client, path), &options).await?;
    ensure_success(response)?;
    info!("Created directory {}", path);
    Ok(())
}

/// Delete a file or directory
pub async fn remove(client: &AuthenticatedClient, path: &str, recursive: bool) -> Result<()> {
    let mut options = RequestOptions::with_method(Method::DELETE);
    if recursive {
        options = options.header(RECURSIVE_HEADER, "true");
    }
    let response = client.fetch(&files_path(client, path), &options).await?;
    ensure_success(response)?;
    info!("Removed {}", path);
    Ok(())
}

/// Move `from` to `to`
///
/// The request goes to the directory containing `from`; `to` is resolved
/// by the server against that directory.
pub async fn rename(client: &AuthenticatedClient, from: &str, to: &str) -> Result<()> {
    let (parent, name) = split_parent(from);
    let options = RequestOptions::with_method(Method::POST).header(ACTION_HEADER, move_action(name, to));
    let response = client.fetch(&files_path(client, parent), &options).await?;
    ensure_success(response)?;
    info!("Moved {} to {}", from, to);
    Ok(())
}

/// Fetch the contents of a file (or a directory listing)
pub async fn download(client: &AuthenticatedClient, path: &str) -> Result<Bytes> {
    let response = ensure_success(client.get(&files_path(client, path)).await?)?;
    Ok(response.bytes().await?)
}

/// Store `data` at `path`, reporting progress and refreshing once on 401
pub async fn upload<F>(
    client: &AuthenticatedClient,
    path: &str,
    data: Bytes,
    progress: Option<F>,
) -> Result<()>
where
    F: Fn(f64) + Send + Sync + 'static,
{
    let mut options = RequestOptions::with_method(Method::PUT)
        .body(data)
        .unauthorized_callback(client.refresh_callback());
    if let Some(progress) = progress {
        options = options.on_progress(progress);
    }
    client.transfer(&files_path(client, path), &options).await?;
    info!("Uploaded {}", path);
    Ok(())
}

/// Join a user path onto the configured files root
fn files_path(client: &AuthenticatedClient, path: &str) -> String {
    let root = client.config().files_root.trim_end_matches('/');
    if path.is_empty() || path.starts_with('/') {
        format!("{root}{path}")
    } else {
        format!("{root}/{path}")
    }
}

/// Split `/a/b/c` into (`/a/b`, `c`)
fn split_parent(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => ("", path),
    }
}

/// Build the `X-FZ-Action` value for a move
///
/// Names are fully percent-encoded: only `A-Za-z0-9-_.~` pass through, so
/// `!'()*` are escaped too. The server percent-decodes either form.
fn move_action(from: &str, to: &str) -> String {
    format!(
        "move-from; path={}, move-to; path={}",
        urlencoding::encode(from),
        urlencoding::encode(to)
    )
}

fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(Error::http_status(
        status.as_u16(),
        status.canonical_reason().unwrap_or_default(),
    ))
}
