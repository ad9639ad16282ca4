//! Text rendering for the workflow's presentational pieces.
//!
//! Every function here is a pure function of its inputs writing into a
//! `String`; missing or empty collections render nothing.

use crate::model::{Competitor, SeoAnalysisResults, SiteMetrics};
use crate::workflow::MAX_COMPETITORS;

/// Glyph width of a rendered progress bar.
pub const BAR_WIDTH: usize = 20;

/// Renders a labeled percentage bar. Values are clamped to 0-100.
pub fn progress_bar(label: &str, value: f64) -> String {
    let clamped = value.clamp(0.0, 100.0);
    let percent = clamped.round() as u32;
    let filled = (clamped / 100.0 * BAR_WIDTH as f64).round() as usize;
    let mut bar = String::with_capacity(BAR_WIDTH);
    for i in 0..BAR_WIDTH {
        bar.push(if i < filled { '█' } else { '░' });
    }
    format!("{label:<18} [{bar}] {percent:>3}%")
}

/// Renders one site's metric card: header, two bars, strengths and weaknesses.
pub fn metric_card(metrics: &SiteMetrics, is_main_brand: bool) -> String {
    let mut out = String::new();
    if is_main_brand {
        out.push_str(&format!("{} [TARGET]\n", metrics.name));
    } else {
        out.push_str(&format!("{}\n", metrics.name));
    }
    out.push_str(&format!("  {}\n", metrics.url));
    out.push_str(&format!(
        "  {}\n",
        progress_bar("Market Alignment", metrics.market_alignment)
    ));
    out.push_str(&format!(
        "  {}\n",
        progress_bar("SEO Authority", metrics.seo_authority)
    ));
    for strength in metrics.strengths.iter().take(2) {
        out.push_str(&format!("  + {strength}\n"));
    }
    for weakness in metrics.weaknesses.iter().take(2) {
        out.push_str(&format!("  - {weakness}\n"));
    }
    out
}

/// Renders the working competitor list for the selection phase.
pub fn competitor_list(competitors: &[Competitor]) -> String {
    let mut out = String::new();
    for competitor in competitors {
        let marker = if competitor.is_custom { "*" } else { " " };
        out.push_str(&format!(
            "{marker} {:<24} {}\n",
            competitor.name, competitor.url
        ));
    }
    out.push_str(&format!(
        "({} of {MAX_COMPETITORS} slots used)\n",
        competitors.len()
    ));
    out
}

fn is_main_brand(site_url: &str, brand_url: &str) -> bool {
    site_url.contains(brand_url) || brand_url.contains(site_url)
}

/// Renders the full results dashboard.
pub fn dashboard(results: &SeoAnalysisResults, brand_url: &str) -> String {
    let mut out = String::new();

    out.push_str("== Comparative Audit Framework ==\n\n");
    for site in &results.metrics {
        out.push_str(&metric_card(site, is_main_brand(&site.url, brand_url)));
        out.push('\n');
    }

    if !results.keyword_suggestions.is_empty() {
        out.push_str("== Opportunity Gap Analysis ==\n\n");
        out.push_str(&format!(
            "{:<32} {:>8} {:>11} {:>16}\n",
            "KEYWORD", "VOL", "DIFFICULTY", "RANK LIKELIHOOD"
        ));
        for kw in &results.keyword_suggestions {
            out.push_str(&format!(
                "{:<32} {:>8} {:>10.0} {:>15.0}%\n",
                kw.keyword,
                kw.volume,
                kw.difficulty.clamp(0.0, 100.0),
                kw.likelihood_to_rank.clamp(0.0, 100.0)
            ));
        }
        out.push('\n');
    }

    if !results.content_gaps.is_empty() {
        out.push_str("== Missing Content Clusters ==\n\n");
        for gap in &results.content_gaps {
            out.push_str(&format!("  - {gap}\n"));
        }
        out.push('\n');
    }

    if !results.technical_wins.is_empty() {
        out.push_str("== Roadmap: Technical Wins ==\n\n");
        for (i, win) in results.technical_wins.iter().enumerate() {
            out.push_str(&format!("  {}. {win}\n", i + 1));
        }
        out.push('\n');
    }

    if !results.content_briefs.is_empty() {
        out.push_str("== Priority Content Briefs ==\n\n");
        for brief in &results.content_briefs {
            out.push_str(&format!("Keyword: {}\n", brief.keyword));
            out.push_str(&format!("  H1: \"{}\"\n", brief.h1));
            for h2 in &brief.h2s {
                out.push_str(&format!("    H2: {h2}\n"));
            }
            out.push('\n');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentBrief, KeywordSuggestion};

    fn site(url: &str, alignment: f64, authority: f64) -> SiteMetrics {
        SiteMetrics {
            url: url.to_string(),
            name: url.trim_start_matches("https://").to_string(),
            market_alignment: alignment,
            seo_authority: authority,
            strengths: Vec::new(),
            weaknesses: Vec::new(),
        }
    }

    #[test]
    fn bar_is_fixed_width_and_clamped() {
        for value in [-20.0, 0.0, 42.0, 100.0, 350.0] {
            let rendered = progress_bar("SEO Authority", value);
            let glyphs = rendered
                .chars()
                .filter(|c| *c == '█' || *c == '░')
                .count();
            assert_eq!(glyphs, BAR_WIDTH, "bar for {value}: {rendered}");
        }
        assert!(progress_bar("X", 350.0).contains("100%"));
        assert!(progress_bar("X", -20.0).contains("0%"));
    }

    #[test]
    fn metric_card_flags_the_target_brand() {
        let card = metric_card(&site("https://brand.test", 90.0, 55.0), true);
        assert!(card.contains("[TARGET]"));
        let card = metric_card(&site("https://rival.test", 70.0, 80.0), false);
        assert!(!card.contains("[TARGET]"));
    }

    #[test]
    fn metric_card_caps_list_items_at_two() {
        let mut metrics = site("https://rival.test", 70.0, 80.0);
        metrics.strengths = vec!["a".into(), "b".into(), "c".into()];
        let card = metric_card(&metrics, false);
        assert_eq!(card.matches("  + ").count(), 2);
    }

    #[test]
    fn empty_lists_render_nothing() {
        let card = metric_card(&site("https://rival.test", 70.0, 80.0), false);
        assert!(!card.contains("+ "));
        assert!(!card.contains("- "));

        let results = SeoAnalysisResults {
            metrics: vec![site("https://brand.test", 90.0, 55.0)],
            content_gaps: Vec::new(),
            keyword_suggestions: Vec::new(),
            technical_wins: Vec::new(),
            content_briefs: Vec::new(),
        };
        let rendered = dashboard(&results, "https://brand.test");
        assert!(!rendered.contains("Opportunity Gap"));
        assert!(!rendered.contains("Technical Wins"));
        assert!(!rendered.contains("Content Briefs"));
    }

    #[test]
    fn dashboard_lists_every_keyword_row() {
        let keywords: Vec<_> = (0..12)
            .map(|i| KeywordSuggestion {
                keyword: format!("keyword {i}"),
                difficulty: 30.0,
                volume: "1K".to_string(),
                likelihood_to_rank: 75.0,
                relevance: String::new(),
            })
            .collect();
        let results = SeoAnalysisResults {
            metrics: vec![site("https://brand.test", 90.0, 55.0)],
            content_gaps: vec!["gap".to_string()],
            keyword_suggestions: keywords,
            technical_wins: vec!["win".to_string()],
            content_briefs: vec![ContentBrief {
                keyword: "keyword 0".to_string(),
                h1: "Headline".to_string(),
                h2s: vec!["Sub".to_string()],
            }],
        };
        let rendered = dashboard(&results, "https://brand.test");
        assert_eq!(rendered.matches("keyword ").count() - 1, 12); // one match is the brief
    }
}
