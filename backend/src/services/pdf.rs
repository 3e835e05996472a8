//! HTML to PDF rendering
//!
//! Reports are rasterized by a headless Chromium service exposing the
//! Gotenberg `forms/chromium/convert/html` endpoint.

use crate::config::PdfConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;

/// A4 in inches
const PAPER_WIDTH: &str = "8.27";
const PAPER_HEIGHT: &str = "11.7";
/// 20mm
const MARGIN_VERTICAL: &str = "0.79";
/// 15mm
const MARGIN_HORIZONTAL: &str = "0.59";

/// Turns a complete HTML document into PDF bytes
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, html: String) -> Result<Vec<u8>>;
}

/// Renderer backed by a Chromium conversion service
#[derive(Debug, Clone)]
pub struct ChromiumRenderer {
    client: reqwest::Client,
    endpoint: String,
}

impl ChromiumRenderer {
    pub fn new(config: &PdfConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("building PDF renderer HTTP client")?;

        let endpoint = format!(
            "{}/forms/chromium/convert/html",
            config.renderer_url.trim_end_matches('/')
        );

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl PdfRenderer for ChromiumRenderer {
    async fn render(&self, html: String) -> Result<Vec<u8>> {
        let index = Part::text(html)
            .file_name("index.html")
            .mime_str("text/html")?;

        let form = Form::new()
            .part("files", index)
            .text("paperWidth", PAPER_WIDTH)
            .text("paperHeight", PAPER_HEIGHT)
            .text("marginTop", MARGIN_VERTICAL)
            .text("marginBottom", MARGIN_VERTICAL)
            .text("marginLeft", MARGIN_HORIZONTAL)
            .text("marginRight", MARGIN_HORIZONTAL)
            .text("printBackground", "true");

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .context("PDF renderer request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("PDF renderer returned {}: {}", status, body);
        }

        let bytes = response
            .bytes()
            .await
            .context("reading PDF renderer response")?;

        tracing::debug!(size = bytes.len(), "PDF rendered");

        Ok(bytes.to_vec())
    }
}
