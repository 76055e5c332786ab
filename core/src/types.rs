//! Header pair carried by the sender and its built requests.
//!
//! # Design
//! Headers are kept as an ordered `Vec<Header>` rather than a map: insertion
//! order is preserved on the wire and duplicate names are allowed. Names are
//! compared case-sensitively by the builder; the response lookup in
//! `HttpResponse::header` is the only case-insensitive comparison.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single `name: value` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl<N: Into<String>, V: Into<String>> From<(N, V)> for Header {
    fn from((name, value): (N, V)) -> Self {
        Header::new(name, value)
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}
