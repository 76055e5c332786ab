//! Error types for the HTTP sender.
//!
//! # Design
//! The public `build_*` / `send_*` methods collapse every failure into `None`.
//! `SenderError` is the secondary channel behind them: the `try_*` methods
//! return it directly so callers that care can tell a bad URL from a refused
//! connection.

use ureq::http::uri::InvalidUri;

/// Reasons a build or send can fail.
#[derive(Debug, thiserror::Error)]
pub enum SenderError {
    /// No URL was set on the sender or passed to the build call.
    #[error("no url set")]
    MissingUrl,

    /// The URL string is not a syntactically valid URI.
    #[error("invalid url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: InvalidUri,
    },

    /// The URL parsed but is not an absolute `http` or `https` URL.
    #[error("unsupported url {url:?}: expected an absolute http or https url")]
    UnsupportedScheme { url: String },

    /// A stored header name or value cannot be written on the wire.
    #[error("invalid header {name:?}")]
    InvalidHeader { name: String },

    /// Send was called before any request was built.
    #[error("no request has been built")]
    NotBuilt,

    /// The network call failed (refused connection, DNS, I/O, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] ureq::Error),
}
