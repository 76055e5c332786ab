use axum::{
    body::Bytes,
    extract::Path,
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tokio::net::TcpListener;

/// Body served by `GET /text`.
pub const FIXED_TEXT: &str = "hello from mock-server";

/// Body served by `GET /bytes`. Deliberately not valid UTF-8.
pub const FIXED_BYTES: &[u8] = &[0x00, 0x9f, 0x92, 0x96, 0xff, b'o', b'k'];

/// Body of the `302` served by `GET /redirect`.
pub const REDIRECT_BODY: &str = "moved";

/// Largest body `GET /size/{len}` will produce.
pub const MAX_SIZED_BODY: usize = 64 * 1024 * 1024;

pub fn app() -> Router {
    Router::new()
        .route("/text", get(text))
        .route("/bytes", get(bytes))
        .route("/echo", post(echo))
        .route("/headers", get(headers))
        .route("/status/{code}", get(status))
        .route("/redirect", get(redirect))
        .route("/size/{len}", get(sized))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::debug!(%addr, "mock server accepting connections");
    }
    axum::serve(listener, app()).await
}

async fn text() -> &'static str {
    FIXED_TEXT
}

async fn bytes() -> ([(header::HeaderName, &'static str); 1], &'static [u8]) {
    ([(header::CONTENT_TYPE, "application/octet-stream")], FIXED_BYTES)
}

/// Echo the request body back, mirroring its content type when present.
async fn echo(headers: HeaderMap, body: Bytes) -> (HeaderMap, Bytes) {
    let mut out = HeaderMap::new();
    if let Some(content_type) = headers.get(header::CONTENT_TYPE) {
        out.insert(header::CONTENT_TYPE, content_type.clone());
    }
    (out, body)
}

/// Request headers as `[name, value]` pairs in the order received.
async fn headers(headers: HeaderMap) -> Json<Vec<(String, String)>> {
    Json(header_pairs(&headers))
}

async fn status(Path(code): Path<u16>) -> Result<StatusCode, StatusCode> {
    StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)
}

/// `302` to `/text`, with a body of its own.
async fn redirect() -> (StatusCode, [(header::HeaderName, &'static str); 1], &'static str) {
    (StatusCode::FOUND, [(header::LOCATION, "/text")], REDIRECT_BODY)
}

/// `len` bytes of `a`.
async fn sized(Path(len): Path<usize>) -> Result<Vec<u8>, StatusCode> {
    if len > MAX_SIZED_BODY {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(vec![b'a'; len])
}

fn header_pairs(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn fixed_bytes_are_not_utf8() {
        assert!(std::str::from_utf8(FIXED_BYTES).is_err());
    }

    #[test]
    fn header_pairs_keep_duplicates() {
        let mut headers = HeaderMap::new();
        headers.append("x-a", HeaderValue::from_static("1"));
        headers.append("x-a", HeaderValue::from_static("2"));
        headers.append("x-b", HeaderValue::from_static("3"));

        let pairs = header_pairs(&headers);
        assert_eq!(
            pairs,
            vec![
                ("x-a".to_string(), "1".to_string()),
                ("x-a".to_string(), "2".to_string()),
                ("x-b".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn header_pairs_serialize_as_arrays() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("text/plain"));
        let json = serde_json::to_string(&header_pairs(&headers)).unwrap();
        assert_eq!(json, r#"[["accept","text/plain"]]"#);
    }
}
