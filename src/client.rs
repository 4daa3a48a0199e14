use crate::models::{ClientConfig, Embedding};
use crate::{Error, Result};

use reqwest::Client;
use serde::Serialize;
use tracing::{info, instrument, warn};

#[derive(Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a str,
    options: EmbedOptions,
}

#[derive(Serialize)]
struct EmbedOptions {
    wait_for_model: bool,
}

pub struct EmbedClient {
    http: Client,
    config: ClientConfig,
}

impl EmbedClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    /// Resolve one text to its embedding. Exactly one outbound request per
    /// call; no caching, no retry.
    #[instrument(skip(self), name = "Fetch Embedding", level = "debug")]
    pub async fn fetch(&self, text: &str) -> Result<Embedding> {
        if text.trim().is_empty() {
            return Err(Error::InvalidInput(
                "text is empty after trimming".to_string(),
            ));
        }

        let body = EmbedRequest {
            inputs: text,
            options: EmbedOptions {
                wait_for_model: self.config.wait_for_model,
            },
        };

        let mut request = self.http.post(&self.config.url).json(&body);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        parse_embedding(status.as_u16(), &body)
    }

    /// Resolve each text in order, one request at a time. A failed text is
    /// recorded and the remaining texts still fetch.
    pub async fn fetch_all<S>(&self, texts: &[S]) -> Vec<Result<Embedding>>
    where
        S: AsRef<str>,
    {
        let mut results = Vec::with_capacity(texts.len());
        for (index, text) in texts.iter().enumerate() {
            let text = text.as_ref();
            info!(index, text = %preview(text), "fetching embedding");
            let result = self.fetch(text).await;
            match &result {
                Ok(embedding) => {
                    info!(index, dimension = embedding.dimension(), "received embedding");
                }
                Err(err) => warn!(index, %err, "embedding fetch failed"),
            }
            results.push(result);
        }
        results
    }
}

fn parse_embedding(status: u16, body: &str) -> Result<Embedding> {
    let values: Vec<f32> = serde_json::from_str(body).map_err(|_| Error::Provider {
        status,
        body: format!("expected a JSON array of numbers, got: {}", preview(body)),
    })?;

    if values.is_empty() {
        return Err(Error::Provider {
            status,
            body: "empty embedding array".to_string(),
        });
    }

    Ok(Embedding::from(values))
}

fn preview(text: &str) -> String {
    const MAX_CHARS: usize = 50;
    match text.char_indices().nth(MAX_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
