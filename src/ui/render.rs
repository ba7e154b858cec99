// NerView - ui/render.rs
//
// Text renderings of analysis results and history for the terminal.
// Every function returns a String so the CLI decides where it goes; with
// `colour` off the output is plain text suitable for pipes and tests.

use crate::core::colour::ColourCache;
use crate::core::labels::{canonical_type, distinct_types, is_outside, label_at};
use crate::core::model::{AnalysisResult, HistoryRecord, Statistics};
use crate::ui::theme;
use crossterm::style::Stylize;
use std::fmt::Write;

/// The analysed tokens, space separated, with entity tokens highlighted.
///
/// Coloured output paints each entity token with its type's swatch. Plain
/// output appends the type in brackets instead: `Paris[LOC] est belle`.
pub fn render_tokens(result: &AnalysisResult, cache: &mut ColourCache, colour: bool) -> String {
    let mut out = String::new();
    for (idx, token) in result.tokens.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        let label = label_at(&result.labels, idx);
        if is_outside(label) {
            out.push_str(token);
            continue;
        }
        let entity_type = canonical_type(label);
        if colour {
            let (fg, bg) = theme::chip_colours(&cache.get(entity_type));
            let _ = write!(out, "{}", token.as_str().with(fg).on(bg));
        } else {
            let _ = write!(out, "{token}[{entity_type}]");
        }
    }
    out
}

/// One line per entity type present in the labels, with its colours.
pub fn render_legend(result: &AnalysisResult, cache: &mut ColourCache, colour: bool) -> String {
    let visible = result.tokens.len().min(result.labels.len());
    let types = distinct_types(&result.labels[..visible]);
    if types.is_empty() {
        return "No entities detected.\n".to_string();
    }

    let mut out = String::new();
    for entity_type in &types {
        let triple = cache.get(entity_type);
        if colour {
            let (fg, bg) = theme::chip_colours(&triple);
            let chip = format!(" {entity_type} ");
            let _ = writeln!(out, "{}  {}", chip.as_str().with(fg).on(bg), triple.background);
        } else {
            let _ = writeln!(
                out,
                "{entity_type}: background {}, text {}, border {}",
                triple.background,
                triple.foreground,
                triple.border_css()
            );
        }
    }
    out
}

/// Summary block for service statistics.
pub fn render_statistics(stats: Option<&Statistics>) -> String {
    let Some(stats) = stats else {
        return "No statistics returned by the service.\n".to_string();
    };

    let mut out = String::new();
    let _ = writeln!(out, "Tokens analysed: {}", stats.total_tokens);
    let _ = writeln!(out, "Entities: {}", stats.total_entities);
    let _ = writeln!(out, "Density: {}%", stats.entity_density);
    let _ = writeln!(out, "Types: {}", stats.by_type.len());
    for entry in &stats.by_type {
        let _ = writeln!(
            out,
            "  {}: {} ({}%)",
            entry.label, entry.count, entry.percentage
        );
    }
    out
}

/// One line per history record: id, date, entity count, text preview.
pub fn render_history(records: &[HistoryRecord], colour: bool) -> String {
    if records.is_empty() {
        return "History is empty.\n".to_string();
    }

    let mut out = String::new();
    for record in records {
        let preview = record.preview().replace(['\n', '\r'], " ");
        let meta = format!("{}  {}", record.id, record.date);
        let count = record.results.entity_count();
        if colour {
            let _ = writeln!(out, "{}  {count} entities  {preview}", meta.as_str().with(theme::MUTED));
        } else {
            let _ = writeln!(out, "{meta}  {count} entities  {preview}");
        }
    }
    out
}

/// Section heading.
pub fn heading(title: &str, colour: bool) -> String {
    if colour {
        format!("{}\n", title.with(theme::HEADING).bold())
    } else {
        format!("{title}\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::TypeCount;
    use serde_json::Map;

    fn paris() -> AnalysisResult {
        AnalysisResult::from_tagged(
            vec!["Paris".into(), "est".into(), "belle".into()],
            vec!["B-LOC".into(), "O".into(), "O".into()],
        )
    }

    #[test]
    fn test_plain_tokens() {
        let mut cache = ColourCache::new();
        assert_eq!(render_tokens(&paris(), &mut cache, false), "Paris[LOC] est belle");
    }

    #[test]
    fn test_short_label_sequence_renders_outside() {
        let mut cache = ColourCache::new();
        let result = AnalysisResult::from_tagged(
            vec!["Victor".into(), "Hugo".into()],
            vec!["B-PER".into()],
        );
        assert_eq!(render_tokens(&result, &mut cache, false), "Victor[PER] Hugo");
    }

    #[test]
    fn test_coloured_tokens_use_escape_codes() {
        // NO_COLOR in the environment would otherwise strip the styling.
        crossterm::style::force_color_output(true);
        let mut cache = ColourCache::new();
        let out = render_tokens(&paris(), &mut cache, true);
        assert!(out.contains("\u{1b}["));
        assert!(out.contains("Paris"));
        assert!(out.ends_with("est belle"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_plain_legend() {
        let mut cache = ColourCache::new();
        let out = render_legend(&paris(), &mut cache, false);
        assert_eq!(
            out,
            "LOC: background hsl(312, 55%, 22%), text hsl(312, 85%, 80%), border 1px solid hsl(312, 60%, 35%)\n"
        );
    }

    #[test]
    fn test_legend_without_entities() {
        let mut cache = ColourCache::new();
        let result = AnalysisResult::from_tagged(vec!["est".into()], vec!["O".into()]);
        assert_eq!(render_legend(&result, &mut cache, false), "No entities detected.\n");
    }

    #[test]
    fn test_statistics_block() {
        let stats = Statistics {
            total_entities: 1,
            total_tokens: 3,
            entity_density: 33.33,
            by_type: vec![TypeCount {
                label: "LOC".into(),
                count: 1,
                percentage: 100.0,
            }],
            extra: Map::new(),
        };
        let out = render_statistics(Some(&stats));
        assert!(out.contains("Tokens analysed: 3\n"));
        assert!(out.contains("Density: 33.33%\n"));
        assert!(out.contains("  LOC: 1 (100%)\n"));
        assert!(render_statistics(None).starts_with("No statistics"));
    }

    #[test]
    fn test_history_lines() {
        let record = HistoryRecord {
            id: "42".into(),
            text: "Paris\nest belle".into(),
            results: paris(),
            date: "2025-06-01T08:00:00.000Z".into(),
        };
        assert_eq!(
            render_history(&[record], false),
            "42  2025-06-01T08:00:00.000Z  0 entities  Paris est belle\n"
        );
        assert_eq!(render_history(&[], false), "History is empty.\n");
    }
}
