//! Fetch a URL with a GET and print the response body.
//!
//! Usage: `http-sender [URL] [NAME:VALUE ...]`. The URL falls back to the
//! `HTTP_SENDER_URL` environment variable, then to the local mock server.

use http_sender::{Header, HttpSender};
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:3000/text";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let url = args
        .next()
        .or_else(|| std::env::var("HTTP_SENDER_URL").ok())
        .unwrap_or_else(|| DEFAULT_URL.to_string());

    let mut sender = HttpSender::new();
    sender.set_url(url);
    for arg in args {
        sender.add_header_pair(parse_header(&arg)?);
    }

    let response = sender
        .build_request()
        .ok_or("could not build request")?
        .send_and_receive_string()
        .ok_or("request failed")?;

    tracing::info!(status = response.status(), "received response");
    println!("{}", response.body());
    Ok(())
}

fn parse_header(arg: &str) -> Result<Header, String> {
    let (name, value) = arg
        .split_once(':')
        .ok_or_else(|| format!("expected NAME:VALUE header, got {arg:?}"))?;
    Ok(Header::new(name.trim(), value.trim()))
}
