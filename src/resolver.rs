use std::sync::Arc;
use thiserror::Error;

use crate::config::Config;
use crate::gemini::{GeminiClient, GenerationConfig, TextGenerator};
use crate::normalizer::{self, NormalizeError, SourceLinks};

const SYSTEM_PROMPT: &str = r#"Return ONLY valid JSON with this exact schema:
{
  "redditUrl": "string",
  "youtubeUrl": "string",
  "instagramUrl": "string",
  "linkedinUrl": "string"
}

Rules:
- Use fully qualified URLs
- Prefer official or most widely recognized accounts
- No markdown, no explanations, JSON only"#;

pub const GENERATION_CONFIG: GenerationConfig = GenerationConfig {
    temperature: 0.1,
    max_output_tokens: 256,
};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("{0}")]
    Configuration(String),

    #[error("generation request failed: {0:#}")]
    Upstream(anyhow::Error),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

pub fn build_prompt(query: &str) -> String {
    format!("{SYSTEM_PROMPT}\nEntity: {query}")
}

/// Asks the generation service for an entity's platform URLs.
#[derive(Clone)]
pub struct SourceResolver {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl SourceResolver {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator: Some(generator),
        }
    }

    /// A resolver with no credential; every call fails with a configuration error.
    pub fn unconfigured() -> Self {
        Self { generator: None }
    }

    pub fn from_config(config: &Config) -> Self {
        match &config.gemini_api_key {
            Some(key) => Self::new(Arc::new(GeminiClient::new(key, &config.gemini_model))),
            None => Self::unconfigured(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    pub async fn resolve_sources(&self, query: &str) -> Result<SourceLinks, ResolveError> {
        let generator = self.generator.as_ref().ok_or_else(|| {
            ResolveError::Configuration("GEMINI_API_KEY is missing in environment".to_string())
        })?;

        let raw = generator
            .generate(&build_prompt(query), GENERATION_CONFIG)
            .await
            .map_err(ResolveError::Upstream)?;

        let links = normalizer::normalize(&raw)?;
        tracing::info!(query, "resolved sources");
        Ok(links)
    }
}
