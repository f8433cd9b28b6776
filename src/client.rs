//! CLI client for a running docdrop server.
//!
//! `docdrop ingest` plays the role of an upload form: a local file is
//! sent as a `data:application/pdf;base64,...` URL, a remote URL is sent
//! as-is, and text is sent verbatim. `docdrop list` prints the stored
//! records the way a listing page would show them.

use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Local;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use docdrop_core::models::{IngestedRecord, PDF_SOURCE};

use crate::ingest::IngestRequest;
use crate::transport::{HttpClient, TransportError};

/// What `docdrop ingest` should send.
#[derive(Debug, Clone)]
pub enum IngestInput {
    File(PathBuf),
    Url(String),
    Text(String),
}

impl IngestInput {
    /// Picks the input from the `--file`, `--url`, `--text` flags, in that
    /// order of precedence. `None` when no flag was given.
    pub fn from_flags(
        file: Option<PathBuf>,
        url: Option<String>,
        text: Option<String>,
    ) -> Option<Self> {
        file.map(IngestInput::File)
            .or_else(|| url.map(IngestInput::Url))
            .or_else(|| text.map(IngestInput::Text))
    }
}

#[derive(Debug, Deserialize)]
struct IngestResponse {
    message: String,
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    data: Vec<IngestedRecord>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Encodes a file as a PDF data URL.
pub fn file_to_data_url(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(format!("data:application/pdf;base64,{}", STANDARD.encode(bytes)))
}

/// Builds the request body for an input. `source` overrides the default tag.
pub fn build_request(input: &IngestInput, source: Option<&str>) -> Result<IngestRequest> {
    let (default_source, data) = match input {
        IngestInput::File(path) => (PDF_SOURCE, file_to_data_url(path)?),
        IngestInput::Url(url) => (PDF_SOURCE, url.clone()),
        IngestInput::Text(text) => ("text", text.clone()),
    };
    Ok(IngestRequest::new(source.unwrap_or(default_source), data))
}

/// Extracts the server's `error` message from a failed response.
fn describe(err: TransportError) -> anyhow::Error {
    match err {
        TransportError::Status { status, body } => {
            match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(parsed) => anyhow::anyhow!("{} ({})", parsed.error, status),
                Err(_) => anyhow::anyhow!("server returned {}: {}", status, body),
            }
        }
        other => other.into(),
    }
}

/// Formats one record for display.
pub fn render_record(record: &IngestedRecord) -> String {
    let body = if record.is_pdf() {
        "PDF content stored as Base64"
    } else {
        record.data.as_str()
    };
    format!(
        "[{}] {}  {}\n{}",
        record.source.to_uppercase(),
        record.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
        record.id,
        body
    )
}

/// CLI entry point for `docdrop ingest`.
pub async fn run_ingest(server: &str, input: IngestInput, source: Option<&str>) -> Result<()> {
    let request = build_request(&input, source)?;
    if request.source.as_deref().unwrap_or_default().is_empty() {
        bail!("--source must not be empty");
    }

    let client = HttpClient::with_base_url(server);
    let response: IngestResponse = client
        .post("/api/ingest", &request)
        .await
        .map_err(describe)?;

    println!("{}", response.message);
    if let Some(id) = response.id {
        println!("id: {}", id);
    }
    Ok(())
}

/// CLI entry point for `docdrop list`.
pub async fn run_list(server: &str) -> Result<()> {
    let client = HttpClient::with_base_url(server);
    let response: ListResponse = client.get("/api/data").await.map_err(describe)?;

    if response.data.is_empty() {
        println!("No data yet. Use `docdrop ingest` to add some.");
        return Ok(());
    }

    println!("{} records", response.data.len());
    for record in &response.data {
        println!();
        println!("{}", render_record(record));
    }
    Ok(())
}
