//! Data shapes shared between the workflow, the analysis client, and the view.
//!
//! Everything the external model returns is decoded into these structs and then
//! validated field by field before the rest of the system sees it. The model
//! API is an untrusted boundary: a syntactically valid response can still carry
//! out-of-range scores or empty required strings.

use std::fmt;

use serde::Deserialize;

/// Upper bound for every score the model reports.
pub const SCORE_MAX: f64 = 100.0;

/// A rival site, either model-discovered or manually added by the user.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Competitor {
    /// Primary URL of the competitor site.
    pub url: String,
    /// Display name, typically the site or company name.
    pub name: String,
    /// True when the entry was typed in by the user rather than discovered.
    #[serde(default)]
    pub is_custom: bool,
}

/// Dual-metric audit scores and qualitative notes for one site.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteMetrics {
    /// URL of the audited site.
    pub url: String,
    /// Display name of the audited site.
    pub name: String,
    /// Semantic topical overlap with the brand, 0-100.
    pub market_alignment: f64,
    /// Composite authority/health score, 0-100.
    pub seo_authority: f64,
    /// Notable strengths; may be absent on the wire.
    #[serde(default)]
    pub strengths: Vec<String>,
    /// Notable weaknesses; may be absent on the wire.
    #[serde(default)]
    pub weaknesses: Vec<String>,
}

/// One keyword opportunity surfaced by the deep audit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordSuggestion {
    /// The suggested keyword phrase.
    pub keyword: String,
    /// Keyword difficulty, 0-100. Intended to sit below the brand's authority.
    pub difficulty: f64,
    /// Free-text search volume magnitude, e.g. "12K/mo".
    pub volume: String,
    /// Composite sweet-spot score balancing volume against difficulty, 0-100.
    pub likelihood_to_rank: f64,
    /// Short rationale for why the keyword is relevant.
    #[serde(default)]
    pub relevance: String,
}

/// Suggested headline structure for a target keyword.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContentBrief {
    /// Keyword the brief targets.
    pub keyword: String,
    /// Recommended H1 headline.
    pub h1: String,
    /// Recommended H2 subheadings.
    #[serde(default)]
    pub h2s: Vec<String>,
}

/// Atomic snapshot of one deep-audit run. Immutable once received.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoAnalysisResults {
    /// Per-site dual-metric scores, brand first by convention.
    pub metrics: Vec<SiteMetrics>,
    /// Topics competitors cover that the brand does not.
    pub content_gaps: Vec<String>,
    /// 10-15 keyword opportunities ranked by likelihood to rank.
    pub keyword_suggestions: Vec<KeywordSuggestion>,
    /// Three technical quick wins for the brand site.
    pub technical_wins: Vec<String>,
    /// Content briefs for the top gap keywords.
    pub content_briefs: Vec<ContentBrief>,
}

/// Violations found while checking a decoded response against the declared shape.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// A score fell outside the 0-100 range.
    ScoreOutOfRange {
        /// Path to the offending field, e.g. `metrics[1].seoAuthority`.
        field: String,
        /// The value the model reported.
        value: f64,
    },
    /// A required string arrived empty.
    EmptyField {
        /// Path to the offending field.
        field: String,
    },
    /// The metrics array arrived empty; an audit without sites is unusable.
    NoMetrics,
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScoreOutOfRange { field, value } => {
                write!(f, "score {field} = {value} outside 0-100")
            }
            Self::EmptyField { field } => write!(f, "required field {field} is empty"),
            Self::NoMetrics => write!(f, "audit response contains no site metrics"),
        }
    }
}

impl std::error::Error for SchemaError {}

fn check_score(field: String, value: f64) -> Result<(), SchemaError> {
    if value.is_finite() && (0.0..=SCORE_MAX).contains(&value) {
        Ok(())
    } else {
        Err(SchemaError::ScoreOutOfRange { field, value })
    }
}

fn check_nonempty(field: String, value: &str) -> Result<(), SchemaError> {
    if value.trim().is_empty() {
        Err(SchemaError::EmptyField { field })
    } else {
        Ok(())
    }
}

impl SeoAnalysisResults {
    /// Validates the decoded snapshot field by field against the declared shape.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.metrics.is_empty() {
            return Err(SchemaError::NoMetrics);
        }
        for (i, site) in self.metrics.iter().enumerate() {
            check_nonempty(format!("metrics[{i}].url"), &site.url)?;
            check_nonempty(format!("metrics[{i}].name"), &site.name)?;
            check_score(format!("metrics[{i}].marketAlignment"), site.market_alignment)?;
            check_score(format!("metrics[{i}].seoAuthority"), site.seo_authority)?;
        }
        for (i, kw) in self.keyword_suggestions.iter().enumerate() {
            check_nonempty(format!("keywordSuggestions[{i}].keyword"), &kw.keyword)?;
            check_score(format!("keywordSuggestions[{i}].difficulty"), kw.difficulty)?;
            check_score(
                format!("keywordSuggestions[{i}].likelihoodToRank"),
                kw.likelihood_to_rank,
            )?;
        }
        for (i, brief) in self.content_briefs.iter().enumerate() {
            check_nonempty(format!("contentBriefs[{i}].keyword"), &brief.keyword)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_metrics(url: &str, alignment: f64, authority: f64) -> SiteMetrics {
        SiteMetrics {
            url: url.to_string(),
            name: url.trim_start_matches("https://").to_string(),
            market_alignment: alignment,
            seo_authority: authority,
            strengths: vec!["strong backlink profile".to_string()],
            weaknesses: Vec::new(),
        }
    }

    fn sample_results() -> SeoAnalysisResults {
        SeoAnalysisResults {
            metrics: vec![sample_metrics("https://brand.test", 100.0, 62.0)],
            content_gaps: vec!["pricing comparisons".to_string()],
            keyword_suggestions: vec![KeywordSuggestion {
                keyword: "best widget alternatives".to_string(),
                difficulty: 35.0,
                volume: "4.2K".to_string(),
                likelihood_to_rank: 78.0,
                relevance: "direct commercial intent".to_string(),
            }],
            technical_wins: vec!["compress hero images".to_string()],
            content_briefs: vec![ContentBrief {
                keyword: "best widget alternatives".to_string(),
                h1: "The 7 Best Widget Alternatives".to_string(),
                h2s: vec!["Why switch?".to_string()],
            }],
        }
    }

    #[test]
    fn valid_snapshot_passes() {
        sample_results().validate().expect("valid snapshot");
    }

    #[test]
    fn out_of_range_score_names_the_field() {
        let mut results = sample_results();
        results.metrics[0].seo_authority = 120.0;
        match results.validate().expect_err("rejected") {
            SchemaError::ScoreOutOfRange { field, value } => {
                assert_eq!(field, "metrics[0].seoAuthority");
                assert_eq!(value, 120.0);
            }
            other => panic!("expected score error, got {other:?}"),
        }
    }

    #[test]
    fn nan_score_rejected() {
        let mut results = sample_results();
        results.keyword_suggestions[0].difficulty = f64::NAN;
        assert!(matches!(
            results.validate(),
            Err(SchemaError::ScoreOutOfRange { .. })
        ));
    }

    #[test]
    fn empty_metrics_rejected() {
        let mut results = sample_results();
        results.metrics.clear();
        assert_eq!(results.validate(), Err(SchemaError::NoMetrics));
    }

    #[test]
    fn blank_keyword_rejected() {
        let mut results = sample_results();
        results.keyword_suggestions[0].keyword = "  ".to_string();
        match results.validate().expect_err("rejected") {
            SchemaError::EmptyField { field } => {
                assert_eq!(field, "keywordSuggestions[0].keyword");
            }
            other => panic!("expected empty-field error, got {other:?}"),
        }
    }

    #[test]
    fn wire_decode_fills_optional_fields() {
        let raw = r#"{
            "metrics": [{
                "url": "https://brand.test",
                "name": "Brand",
                "marketAlignment": 90,
                "seoAuthority": 55
            }],
            "contentGaps": [],
            "keywordSuggestions": [{
                "keyword": "widget faq",
                "difficulty": 20,
                "volume": "900",
                "likelihoodToRank": 81
            }],
            "technicalWins": [],
            "contentBriefs": []
        }"#;
        let decoded: SeoAnalysisResults = serde_json::from_str(raw).expect("decodes");
        assert!(decoded.metrics[0].strengths.is_empty());
        assert!(decoded.keyword_suggestions[0].relevance.is_empty());
        decoded.validate().expect("valid");
    }

    #[test]
    fn missing_required_field_fails_decode() {
        let raw = r#"{"metrics": [], "contentGaps": []}"#;
        assert!(serde_json::from_str::<SeoAnalysisResults>(raw).is_err());
    }
}
