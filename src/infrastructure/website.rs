//! # Website Probe
//!
//! Implements `WebsiteProbe` with a plain `reqwest` GET. No custom timeout and
//! no retries: one request, one classification.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::error::Error as _;

use crate::domain::traits::WebsiteProbe;
use crate::domain::types::ProbeOutcome;

#[derive(Clone, Default)]
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new() -> Self {
        Self::default()
    }
}

/// `reqwest` errors hide the root cause (DNS, refused, ...) in their source chain.
fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[async_trait]
impl WebsiteProbe for HttpProbe {
    async fn check(&self, url: &str) -> ProbeOutcome {
        tracing::info!("Check website command received: {}", url);
        match self.client.get(url).send().await {
            Ok(response) if response.status() == StatusCode::OK => ProbeOutcome::Up,
            Ok(response) => ProbeOutcome::UnexpectedStatus(response.status().as_u16()),
            Err(e) => ProbeOutcome::Unreachable(error_chain(&e)),
        }
    }
}
