//! Analysis client for the Gemini generateContent API.
//!
//! Two operations, each one request/response round trip with a declared JSON
//! output schema: competitor discovery and the deep dual-metric audit. No
//! retry, no caching; each call either succeeds once or is reported to the
//! session as a failure.

use std::fmt;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::debug_log;
use crate::model::{Competitor, SchemaError, SeoAnalysisResults};

/// Default model used for competitor discovery.
pub const DEFAULT_DISCOVERY_MODEL: &str = "gemini-3-flash-preview";
/// Default model used for the deep audit.
pub const DEFAULT_AUDIT_MODEL: &str = "gemini-3-pro-preview";
/// Default API endpoint base.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Trait implemented by concrete analysis backends.
///
/// The session is generic over this seam so the workflow can be exercised
/// end to end with a scripted provider in tests.
pub trait AnalysisProvider {
    /// Asks for up to 3 organic competitors of the brand site. Transport
    /// failures propagate; an unparseable response degrades to an empty list.
    fn discover_competitors(&self, brand_url: &str) -> Result<Vec<Competitor>>;

    /// Runs the seven-task comparative audit against the brand and its
    /// confirmed competitors.
    fn perform_deep_audit(
        &self,
        brand_url: &str,
        competitors: &[Competitor],
    ) -> Result<SeoAnalysisResults, AuditError>;
}

/// Failures surfaced by the deep audit.
#[derive(Debug)]
pub enum AuditError {
    /// Network-level or remote failure; the response never decoded.
    Transport(anyhow::Error),
    /// The response body was not the JSON the schema declared.
    Parse(serde_json::Error),
    /// The JSON decoded but violated the declared shape.
    Schema(SchemaError),
}

impl fmt::Display for AuditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "audit request failed: {err}"),
            Self::Parse(err) => write!(f, "analysis data parse error: {err}"),
            Self::Schema(err) => write!(f, "analysis data parse error: {err}"),
        }
    }
}

impl std::error::Error for AuditError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(err) => err.source(),
            Self::Parse(err) => Some(err),
            Self::Schema(err) => Some(err),
        }
    }
}

/// Blocking client for the Gemini generateContent endpoint.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    discovery_model: String,
    audit_model: String,
}

impl GeminiClient {
    /// Builds a new client with the API key installed as a default header.
    pub fn new(
        api_key: &str,
        base_url: String,
        discovery_model: String,
        audit_model: String,
        timeout: Duration,
    ) -> Result<Self> {
        anyhow::ensure!(!api_key.trim().is_empty(), "missing Gemini API key");
        anyhow::ensure!(!discovery_model.trim().is_empty(), "missing discovery model name");
        anyhow::ensure!(!audit_model.trim().is_empty(), "missing audit model name");
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(api_key.trim()).context("invalid Gemini API key")?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .context("failed to build Gemini HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            discovery_model,
            audit_model,
        })
    }

    fn generate(&self, model: &str, prompt: &str, schema: Value) -> Result<String> {
        let endpoint = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            },
        };
        let resp = self
            .client
            .post(&endpoint)
            .json(&body)
            .send()
            .with_context(|| format!("failed to call Gemini model {model}"))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp
                .text()
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            bail!("Gemini returned {}: {}", status, text);
        }
        let parsed: GenerateResponse = resp.json().context("failed to parse Gemini response")?;
        let text = parsed
            .candidates
            .into_iter()
            .flat_map(|candidate| candidate.content.parts)
            .map(|part| part.text)
            .collect::<Vec<_>>()
            .join("");
        if text.is_empty() {
            bail!("Gemini response missing text content");
        }
        Ok(text)
    }
}

impl AnalysisProvider for GeminiClient {
    fn discover_competitors(&self, brand_url: &str) -> Result<Vec<Competitor>> {
        let prompt = discovery_prompt(brand_url);
        let text = self.generate(&self.discovery_model, &prompt, discovery_schema())?;
        Ok(parse_competitor_list(&text))
    }

    fn perform_deep_audit(
        &self,
        brand_url: &str,
        competitors: &[Competitor],
    ) -> Result<SeoAnalysisResults, AuditError> {
        let prompt = audit_prompt(brand_url, competitors);
        let text = self
            .generate(&self.audit_model, &prompt, audit_schema())
            .map_err(AuditError::Transport)?;
        decode_audit(&text)
    }
}

/// Prompt asking for the top organic competitors of the brand site.
pub fn discovery_prompt(brand_url: &str) -> String {
    format!(
        "Identify the top 3 direct organic search competitors for the website: {brand_url}. \
         Return their names and primary URLs."
    )
}

/// Prompt enumerating the seven analytical tasks of the deep audit.
pub fn audit_prompt(brand_url: &str, competitors: &[Competitor]) -> String {
    let competitor_urls = competitors
        .iter()
        .map(|c| c.url.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let mut prompt = String::new();
    prompt.push_str("Act as a Senior SEO Strategist. Perform a deep comparative analysis between ");
    prompt.push_str(&format!(
        "the brand site \"{brand_url}\" and its competitors: {competitor_urls}.\n\nTasks:\n"
    ));
    prompt.push_str(&format!(
        "1. Calculate Market Alignment Score (0-100) for each: semantic overlap with {brand_url}.\n"
    ));
    prompt.push_str(
        "2. Calculate SEO Authority Power (0-100) for each: composite of estimated domain \
         authority, backlinks, and technical health.\n",
    );
    prompt.push_str("3. Identify Content Gaps: topics competitors cover that the brand doesn't.\n");
    prompt.push_str(
        "4. Generate 10-15 high-value Keyword Suggestions. Filter: only suggest keywords where \
         Keyword Difficulty (KD) is lower than the brand's Authority Power.\n",
    );
    prompt.push_str(
        "5. Rank keywords by \"Likelihood to Rank\" (the sweet spot where volume is high but KD \
         is manageable).\n",
    );
    prompt.push_str(&format!("6. Provide 3 technical quick-wins for {brand_url}.\n"));
    prompt.push_str("7. Provide Content Briefs (H1, 3 H2s) for the top 3 gap keywords.\n");
    prompt
}

/// Declared response schema for the discovery call: an array of {name, url}.
pub fn discovery_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": { "type": "STRING" },
                "url": { "type": "STRING" }
            },
            "required": ["name", "url"]
        }
    })
}

/// Declared response schema for the deep audit, mirroring `SeoAnalysisResults`.
pub fn audit_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "metrics": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "url": { "type": "STRING" },
                        "name": { "type": "STRING" },
                        "marketAlignment": { "type": "NUMBER" },
                        "seoAuthority": { "type": "NUMBER" },
                        "strengths": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "weaknesses": { "type": "ARRAY", "items": { "type": "STRING" } }
                    },
                    "required": ["url", "name", "marketAlignment", "seoAuthority"]
                }
            },
            "contentGaps": { "type": "ARRAY", "items": { "type": "STRING" } },
            "keywordSuggestions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "keyword": { "type": "STRING" },
                        "difficulty": { "type": "NUMBER" },
                        "volume": { "type": "STRING" },
                        "likelihoodToRank": { "type": "NUMBER" },
                        "relevance": { "type": "STRING" }
                    },
                    "required": ["keyword", "difficulty", "volume", "likelihoodToRank"]
                }
            },
            "technicalWins": { "type": "ARRAY", "items": { "type": "STRING" } },
            "contentBriefs": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "keyword": { "type": "STRING" },
                        "h1": { "type": "STRING" },
                        "h2s": { "type": "ARRAY", "items": { "type": "STRING" } }
                    }
                }
            }
        },
        "required": ["metrics", "contentGaps", "keywordSuggestions", "technicalWins", "contentBriefs"]
    })
}

/// Lenient decode for the discovery response: an unparseable body degrades to
/// an empty list rather than failing the workflow.
pub fn parse_competitor_list(text: &str) -> Vec<Competitor> {
    match serde_json::from_str::<Vec<Competitor>>(text) {
        Ok(list) => list,
        Err(err) => {
            debug_log!("failed to parse competitor list: {err}");
            let _ = err;
            Vec::new()
        }
    }
}

/// Strict decode for the audit response: parse, then validate field by field.
pub fn decode_audit(text: &str) -> Result<SeoAnalysisResults, AuditError> {
    let results: SeoAnalysisResults = serde_json::from_str(text).map_err(AuditError::Parse)?;
    results.validate().map_err(AuditError::Schema)?;
    Ok(results)
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig<'a> {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'a str,
    #[serde(rename = "responseSchema")]
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}
