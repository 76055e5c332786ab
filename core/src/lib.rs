//! Fluent, blocking HTTP request sender.
//!
//! # Overview
//! `HttpSender` accumulates a URL and an ordered list of headers, freezes
//! them into an `HttpRequest` on each build call, and sends that request with
//! a single blocking GET or POST through a reusable `ureq::Agent`. Response
//! bodies come back either as text or as raw bytes.
//!
//! # Design
//! - Build and send never panic or propagate errors through the fluent API;
//!   failures become `None`. The `try_*` methods expose the same operations
//!   with a typed `SenderError` for callers that need the reason.
//! - No network I/O happens during build. Each send is one request: no
//!   retries and no timeout overrides beyond the agent's defaults.
//! - A built `HttpRequest` owns its data, so it can be sent repeatedly and is
//!   unaffected by later changes to the sender.

pub mod error;
pub mod http;
pub mod sender;
pub mod types;

pub use error::SenderError;
pub use http::{HttpRequest, HttpResponse, Method};
pub use sender::HttpSender;
pub use types::Header;
