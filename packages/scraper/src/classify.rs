//! Row classifier.
//!
//! Report tables nest line items under bold group rows:
//!
//! ```text
//! | VINHO DE MESA  | 169.762.429 |   <- tb_item (group)
//! |   Tinto        | 139.320.884 |   <- tb_subitem (detail)
//! |   Branco       |  27.910.299 |   <- tb_subitem (detail)
//! | VINHO FINO ... |  46.268.556 |   <- tb_item (group)
//! ```
//!
//! [`classify_rows`] walks the rows with an [`ExtractionContext`] holding
//! the label of the latest group row, and pairs each detail row with it.

use scraper::ElementRef;

use crate::html_table::{CellMarker, RawTableRow, read_rows};
use crate::normalize::is_unclassified_label;

/// How "Sem classificação" group rows are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnclassifiedRule {
    /// Treat it like any other group row.
    Group,
    /// When the table's first group row is unclassified, the table has no
    /// cultivar breakdown: emit each unclassified group row itself, grouped
    /// under its own label, and nothing else. Otherwise classify normally.
    EmitSelf,
}

/// A detail row together with the group it was found under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedRow {
    /// Label of the enclosing group row.
    pub group: String,
    /// The detail row.
    pub row: RawTableRow,
}

/// Classification state for one table scan.
#[derive(Debug, Default)]
pub struct ExtractionContext {
    group: Option<String>,
}

impl ExtractionContext {
    /// Label of the most recent group row, if one has been seen.
    #[must_use]
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Feeds one row through the state machine, returning the detail row it
    /// yields, if any. Group rows only update the current label.
    pub fn accept(&mut self, row: RawTableRow) -> Option<ClassifiedRow> {
        match row.marker() {
            CellMarker::Group => {
                self.group = Some(row.text(0).to_string());
                None
            }
            CellMarker::Detail => self
                .group
                .as_ref()
                .filter(|group| !group.is_empty())
                .map(|group| ClassifiedRow {
                    group: group.clone(),
                    row,
                }),
            CellMarker::None => None,
        }
    }
}

/// Classifies rows in order, dropping group rows (after recording their
/// label), orphan detail rows and unmarked rows.
///
/// With [`UnclassifiedRule::EmitSelf`], a table whose first group row is
/// "Sem classificação" yields only its unclassified group rows.
#[must_use]
pub fn classify_rows<I>(rows: I, rule: UnclassifiedRule) -> Vec<ClassifiedRow>
where
    I: IntoIterator<Item = RawTableRow>,
{
    let rows: Vec<RawTableRow> = rows.into_iter().collect();

    if rule == UnclassifiedRule::EmitSelf && leads_with_unclassified(&rows) {
        return rows
            .into_iter()
            .filter(|row| {
                row.marker() == CellMarker::Group && is_unclassified_label(row.text(0))
            })
            .map(|row| ClassifiedRow {
                group: row.text(0).to_string(),
                row,
            })
            .collect();
    }

    let mut context = ExtractionContext::default();
    let mut classified = Vec::new();

    for row in rows {
        if let Some(detail) = context.accept(row) {
            classified.push(detail);
        }
    }

    classified
}

fn leads_with_unclassified(rows: &[RawTableRow]) -> bool {
    rows.iter()
        .find(|row| row.marker() == CellMarker::Group)
        .is_some_and(|row| is_unclassified_label(row.text(0)))
}

/// Reads and classifies the rows of `table` in one pass.
///
/// Rows whose cell count differs from `expected_cell_count` never reach
/// the classifier, so they neither yield output nor change the current
/// group.
#[must_use]
pub fn classify_table(
    table: ElementRef<'_>,
    expected_cell_count: usize,
    skip_header: bool,
    rule: UnclassifiedRule,
) -> Vec<ClassifiedRow> {
    classify_rows(read_rows(table, expected_cell_count, skip_header), rule)
}
