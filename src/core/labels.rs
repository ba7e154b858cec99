// NerView - core/labels.rs
//
// BIO label normalisation. Pure functions, total over all strings: an
// unexpected tag from the model degrades to pass-through, never an error.

use crate::util::constants::{BEGIN_PREFIX, INSIDE_PREFIX, OUTSIDE_LABEL};
use std::collections::BTreeSet;

/// Strip the BIO prefix from a label, yielding its entity type.
///
/// `"B-PER"` and `"I-PER"` both map to `"PER"`. At most one prefix is
/// removed and `"B-"` is checked first. `"O"` and anything without a
/// recognised prefix are returned unchanged.
pub fn canonical_type(label: &str) -> &str {
    if label == OUTSIDE_LABEL {
        return label;
    }
    label
        .strip_prefix(BEGIN_PREFIX)
        .or_else(|| label.strip_prefix(INSIDE_PREFIX))
        .unwrap_or(label)
}

/// True if the label marks a token outside any entity.
pub fn is_outside(label: &str) -> bool {
    label == OUTSIDE_LABEL
}

/// Label at `index`, or `"O"` when the label sequence is shorter than the
/// token sequence or the label is blank.
pub fn label_at(labels: &[String], index: usize) -> &str {
    match labels.get(index) {
        Some(label) if !label.is_empty() => label.as_str(),
        _ => OUTSIDE_LABEL,
    }
}

/// Sorted, deduplicated entity types present in `labels`, excluding `"O"`.
pub fn distinct_types<S: AsRef<str>>(labels: &[S]) -> Vec<String> {
    labels
        .iter()
        .map(|l| canonical_type(l.as_ref()))
        .filter(|t| !is_outside(t))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}
