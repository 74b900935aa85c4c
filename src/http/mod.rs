//! HTTP request layer
//!
//! Provides the authenticated request executor and its request descriptor.
//!
//! # Features
//!
//! - **Credential attachment**: Bearer header on protected paths only
//! - **One-shot recovery**: Refresh and resend once on 401
//! - **Basic challenges**: Surfaced as a distinct error on public paths
//! - **Upload progress**: Percent-complete callbacks for streamed bodies
//! - **Cancellation**: Abortable transfers

mod client;
mod progress;
mod request;

pub use client::AuthenticatedClient;
pub use progress::{percent_complete, CHUNK_SIZE};
pub use request::{ProgressCallback, RequestBody, RequestOptions, UnauthorizedCallback};
