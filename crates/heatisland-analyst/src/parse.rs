//! LLM response parsing into an [`AnalysisResult`].
//!
//! The backends return raw text that should be a JSON object with the
//! four analysis fields. Models occasionally wrap it in a markdown fence,
//! surround it with prose, or leave trailing commas, so several recovery
//! strategies are tried before giving up. Unlike a missing field default,
//! an unusable response is always an error: the dashboard shows one
//! failure state rather than an empty analysis.

use heatisland_types::AnalysisResult;
use tracing::{debug, warn};

use crate::error::AnalystError;

/// Parse an LLM response into a validated [`AnalysisResult`].
///
/// Strategies, in order:
/// 1. Direct `serde_json` deserialization
/// 2. JSON inside a markdown code block
/// 3. Trailing commas stripped
/// 4. Code block contents with trailing commas stripped
/// 5. The outermost `{ ... }` span, with trailing commas stripped
///
/// # Errors
///
/// Returns [`AnalystError::Parse`] for blank text, for text no strategy can
/// decode, and for an analysis whose summary is blank.
pub fn parse_analysis(raw: &str) -> Result<AnalysisResult, AnalystError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AnalystError::Parse("empty response".to_owned()));
    }

    let parsed = try_strategies(trimmed).ok_or_else(|| {
        warn!(raw_response = trimmed, "all parse strategies failed");
        AnalystError::Parse(format!("no JSON analysis found in: {}", preview(trimmed)))
    })?;

    validate(parsed)
}

fn try_strategies(text: &str) -> Option<AnalysisResult> {
    let from_str = |s: &str| serde_json::from_str::<AnalysisResult>(s).ok();
    let fenced = extract_json_from_codeblock(text);

    let candidates = [
        ("direct", Some(text.to_owned())),
        ("codeblock", fenced.map(ToOwned::to_owned)),
        ("trailing-commas", Some(strip_trailing_commas(text))),
        ("codeblock+trailing-commas", fenced.map(strip_trailing_commas)),
        ("object-span", outer_object(text).map(strip_trailing_commas)),
    ];

    candidates.into_iter().find_map(|(strategy, candidate)| {
        let parsed = from_str(candidate.as_deref()?)?;
        debug!(strategy, "parsed analysis response");
        Some(parsed)
    })
}

/// Trim every field and drop blank list entries; reject a blank summary.
fn validate(result: AnalysisResult) -> Result<AnalysisResult, AnalystError> {
    let clean_list = |items: Vec<String>| -> Vec<String> {
        items
            .into_iter()
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    };

    let summary = result.summary.trim().to_owned();
    if summary.is_empty() {
        return Err(AnalystError::Parse("analysis summary is blank".to_owned()));
    }

    Ok(AnalysisResult {
        scenario_context: result.scenario_context.trim().to_owned(),
        summary,
        key_factors: clean_list(result.key_factors),
        recommendations: clean_list(result.recommendations),
    })
}

/// Contents of the first fenced block, with or without a language tag.
fn extract_json_from_codeblock(text: &str) -> Option<&str> {
    let (_, after_open) = text.split_once("```")?;
    // Skip the info string (`json`, `JSON`, or nothing) up to the newline.
    let body = after_open
        .split_once('\n')
        .map_or(after_open, |(_, rest)| rest);
    let (inner, _) = body.split_once("```")?;
    Some(inner.trim())
}

/// The span from the first `{` to the last `}`, inclusive.
fn outer_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| text.get(start..=end)).flatten()
}

/// Remove commas that directly precede `}` or `]`, outside string literals.
fn strip_trailing_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    // A comma plus the whitespace after it, held until the next token.
    let mut pending: Option<String> = None;
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if in_string {
            out.push(c);
            match (escaped, c) {
                (true, _) => escaped = false,
                (false, '\\') => escaped = true,
                (false, '"') => in_string = false,
                _ => {}
            }
            continue;
        }

        if let Some(held) = pending.as_mut() {
            if c.is_whitespace() {
                held.push(c);
                continue;
            }
            if c == '}' || c == ']' {
                out.push_str(held.trim_start_matches(','));
            } else {
                out.push_str(held);
            }
            pending = None;
        }

        match c {
            ',' => pending = Some(String::from(',')),
            '"' => {
                in_string = true;
                out.push(c);
            }
            _ => out.push(c),
        }
    }

    if let Some(held) = pending {
        out.push_str(&held);
    }
    out
}

/// First 120 characters of a response, for error messages.
fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(120).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const CLEAN: &str = r#"{
        "scenarioContext": "2050 Business As Usual Projection",
        "summary": "Taipei warms faster than the globe.",
        "keyFactors": ["basin topography", "weak ventilation", "concrete density"],
        "recommendations": ["green corridors", "cool roofs", "heat action plans"]
    }"#;

    #[test]
    fn parses_clean_json() {
        let result = parse_analysis(CLEAN);
        assert!(result.is_ok());
        let analysis = result.unwrap();
        assert_eq!(analysis.scenario_context, "2050 Business As Usual Projection");
        assert_eq!(analysis.key_factors.len(), 3);
        assert_eq!(analysis.recommendations.len(), 3);
    }

    #[test]
    fn parses_fenced_json() {
        let raw = format!("Here is the analysis:\n```json\n{CLEAN}\n```\nLet me know.");
        assert!(parse_analysis(&raw).is_ok());

        let untagged = format!("```\n{CLEAN}\n```");
        assert!(parse_analysis(&untagged).is_ok());
    }

    #[test]
    fn repairs_trailing_commas() {
        let raw = r#"{"scenarioContext": "Historical", "summary": "Warming.",
            "keyFactors": ["a", "b",], "recommendations": ["c",],}"#;
        let result = parse_analysis(raw);
        assert!(result.is_ok(), "trailing commas should be repaired");
        let analysis = result.unwrap();
        assert_eq!(analysis.key_factors, vec!["a", "b"]);
    }

    #[test]
    fn recovers_object_surrounded_by_prose() {
        let raw = format!("Sure! {CLEAN} Hope this helps.");
        assert!(parse_analysis(&raw).is_ok());
    }

    #[test]
    fn empty_and_garbage_are_errors() {
        assert!(matches!(parse_analysis(""), Err(AnalystError::Parse(_))));
        assert!(matches!(parse_analysis("   \n"), Err(AnalystError::Parse(_))));
        assert!(matches!(
            parse_analysis("the model is overloaded"),
            Err(AnalystError::Parse(_))
        ));
    }

    #[test]
    fn missing_fields_are_errors() {
        let raw = r#"{"summary": "only a summary"}"#;
        assert!(matches!(parse_analysis(raw), Err(AnalystError::Parse(_))));
    }

    #[test]
    fn blank_summary_is_rejected() {
        let raw = r#"{"scenarioContext": "x", "summary": "  ", "keyFactors": [], "recommendations": []}"#;
        assert!(matches!(parse_analysis(raw), Err(AnalystError::Parse(_))));
    }

    #[test]
    fn fields_are_trimmed() {
        let raw = r#"{"scenarioContext": " BAU ", "summary": " hot ",
            "keyFactors": [" a ", ""], "recommendations": ["b"]}"#;
        let analysis = parse_analysis(raw).unwrap();
        assert_eq!(analysis.scenario_context, "BAU");
        assert_eq!(analysis.summary, "hot");
        assert_eq!(analysis.key_factors, vec!["a"]);
    }

    #[test]
    fn strip_trailing_commas_leaves_strings_alone() {
        assert_eq!(strip_trailing_commas(r#"{"a": "x,}",}"#), r#"{"a": "x,}"}"#);
        assert_eq!(strip_trailing_commas("[1, 2]"), "[1, 2]");
        assert_eq!(strip_trailing_commas("[1, 2 , ]"), "[1, 2  ]");
    }

    #[test]
    fn extract_codeblock_variants() {
        assert_eq!(extract_json_from_codeblock("```json\n{}\n```"), Some("{}"));
        assert_eq!(extract_json_from_codeblock("no fences"), None);
        assert_eq!(extract_json_from_codeblock("```json\n{} unterminated"), None);
    }
}
