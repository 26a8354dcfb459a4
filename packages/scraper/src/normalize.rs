//! Cell text normalization.
//!
//! The portal formats numbers the pt-BR way: `.` groups thousands, `,`
//! separates decimals and a lone `-` means "no data". Labels arrive in
//! whatever case the page author typed them.

use unicode_normalization::UnicodeNormalization as _;
use unicode_normalization::char::is_combining_mark;

/// Labels the portal uses for a processing table without cultivar
/// breakdown.
const UNCLASSIFIED_LABELS: &[&str] = &["sem classificação", "sem classificacao"];

/// How a quantity cell may be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberStyle {
    /// Whole numbers with `.` thousands separators only.
    Integer,
    /// Pages that may print a `,` decimal part. The comma is read as a
    /// decimal point, so any fraction fails to parse as a whole quantity.
    DecimalComma,
}

/// Error returned when a cell does not hold a whole quantity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid quantity '{raw}'")]
pub struct ParseQuantityError {
    /// The cell text as found in the table.
    pub raw: String,
}

/// Converts a pt-BR formatted cell into an integer.
///
/// Surrounding whitespace and every `.` are removed, `,` becomes a decimal
/// point for [`NumberStyle::DecimalComma`], and `-` becomes `0`.
///
/// # Errors
///
/// Returns [`ParseQuantityError`] if the cleaned text is not an integer.
/// Inner whitespace and decimal fractions (`1.234,00`) are not integers.
pub fn normalize_quantity(raw: &str, style: NumberStyle) -> Result<i64, ParseQuantityError> {
    let mut cleaned = raw.trim().replace('.', "");

    if style == NumberStyle::DecimalComma {
        cleaned = cleaned.replace(',', ".");
    }

    cleaned
        .replace('-', "0")
        .parse()
        .map_err(|_| ParseQuantityError {
            raw: raw.to_string(),
        })
}

/// Like [`normalize_quantity`], but non-numeric cells count as zero.
#[must_use]
pub fn quantity_or_zero(raw: &str, style: NumberStyle) -> i64 {
    normalize_quantity(raw, style).unwrap_or_else(|e| {
        log::debug!("{e}, using 0");
        0
    })
}

/// Upper-cases the first letter of every run of letters and lower-cases the
/// rest: `"VINHO DE MESA"` becomes `"Vinho De Mesa"`.
#[must_use]
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}

/// Folds text for loose comparison: lower case, no diacritics, single
/// spaces.
#[must_use]
pub fn fold(text: &str) -> String {
    let stripped: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether `label` is the portal's "no classification" marker.
#[must_use]
pub fn is_unclassified_label(label: &str) -> bool {
    let folded = fold(label);
    UNCLASSIFIED_LABELS
        .iter()
        .any(|candidate| fold(candidate) == folded)
}
