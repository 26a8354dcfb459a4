//! Per-category extractors.
//!
//! Every report page is read the same way; the categories only differ in
//! the parameters collected in [`TableLayout`]. Grouped categories
//! (production, processing, commercialization) go through
//! [`extract_grouped`], import and export through [`extract_trade`].

use scraper::Html;
use vitibrasil_report_models::{
    CommercializationRecord, ProcessingRecord, ProductionRecord, Report, ReportCategory,
    TradeRecord,
};

use crate::ScrapeError;
use crate::classify::{UnclassifiedRule, classify_table};
use crate::html_table::{DATA_TABLE_CLASS, find_table, read_rows};
use crate::normalize::{
    NumberStyle, ParseQuantityError, normalize_quantity, quantity_or_zero, title_case,
};

/// Case transform applied to a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseRule {
    /// Keep the text as published.
    Preserve,
    /// See [`title_case`].
    Title,
    /// All lower case.
    Lower,
}

impl CaseRule {
    /// Applies the transform.
    #[must_use]
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::Preserve => text.to_string(),
            Self::Title => title_case(text),
            Self::Lower => text.to_lowercase(),
        }
    }
}

/// What a non-numeric quantity cell turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidQuantity {
    /// Fail the whole extraction.
    Fail,
    /// Count it as zero.
    Zero,
}

/// Extraction parameters of one report category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    /// Class list of the data table.
    pub marker_class: &'static str,
    /// Number of `<td>` cells in a data row.
    pub cell_count: usize,
    /// Drop the first row unconditionally.
    pub skip_header: bool,
    /// Transform for group labels.
    pub group_case: CaseRule,
    /// Transform for detail labels.
    pub detail_case: CaseRule,
    /// Number format of the quantity cells.
    pub number_style: NumberStyle,
    /// Handling of non-numeric quantity cells.
    pub invalid_quantity: InvalidQuantity,
    /// Handling of "Sem classificação" group rows.
    pub unclassified: UnclassifiedRule,
}

impl TableLayout {
    /// Returns the layout of the given category's report page.
    #[must_use]
    pub const fn for_category(category: ReportCategory) -> Self {
        match category {
            ReportCategory::Production => Self {
                marker_class: DATA_TABLE_CLASS,
                cell_count: 2,
                skip_header: false,
                group_case: CaseRule::Title,
                detail_case: CaseRule::Preserve,
                number_style: NumberStyle::DecimalComma,
                invalid_quantity: InvalidQuantity::Fail,
                unclassified: UnclassifiedRule::Group,
            },
            ReportCategory::Processing => Self {
                marker_class: DATA_TABLE_CLASS,
                cell_count: 2,
                skip_header: false,
                group_case: CaseRule::Preserve,
                detail_case: CaseRule::Preserve,
                number_style: NumberStyle::Integer,
                invalid_quantity: InvalidQuantity::Zero,
                unclassified: UnclassifiedRule::EmitSelf,
            },
            ReportCategory::Commercialization => Self {
                marker_class: DATA_TABLE_CLASS,
                cell_count: 2,
                skip_header: false,
                group_case: CaseRule::Title,
                detail_case: CaseRule::Lower,
                number_style: NumberStyle::DecimalComma,
                invalid_quantity: InvalidQuantity::Fail,
                unclassified: UnclassifiedRule::Group,
            },
            ReportCategory::Import | ReportCategory::Export => Self {
                marker_class: DATA_TABLE_CLASS,
                cell_count: 3,
                skip_header: false,
                group_case: CaseRule::Preserve,
                detail_case: CaseRule::Preserve,
                number_style: NumberStyle::Integer,
                invalid_quantity: InvalidQuantity::Zero,
                unclassified: UnclassifiedRule::Group,
            },
        }
    }

    /// Parses a quantity cell according to this layout.
    ///
    /// # Errors
    ///
    /// Returns [`ParseQuantityError`] for a non-numeric cell when the layout
    /// says [`InvalidQuantity::Fail`].
    pub fn quantity(&self, raw: &str) -> Result<i64, ParseQuantityError> {
        match (normalize_quantity(raw, self.number_style), self.invalid_quantity) {
            (Ok(value), _) => Ok(value),
            (Err(e), InvalidQuantity::Fail) => Err(e),
            (Err(e), InvalidQuantity::Zero) => {
                log::debug!("{e}, using 0");
                Ok(0)
            }
        }
    }
}

/// A detail row of a grouped table, with the layout's transforms applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedLine {
    /// Group label.
    pub group: String,
    /// Detail label (first cell).
    pub label: String,
    /// Quantity (second cell).
    pub quantity: i64,
}

/// Extracts the detail rows of a grouped report page and maps each to a
/// record with `build`.
///
/// A page without the data table, or without qualifying rows, yields an
/// empty list.
///
/// # Errors
///
/// Returns [`ScrapeError::Quantity`] if a quantity cell is not numeric and
/// the layout does not allow substituting zero.
pub fn extract_grouped<T, F>(
    html: &str,
    layout: &TableLayout,
    build: F,
) -> Result<Vec<T>, ScrapeError>
where
    F: Fn(GroupedLine) -> T,
{
    let document = Html::parse_document(html);
    let Some(table) = find_table(&document, layout.marker_class) else {
        log::debug!("No table matching '{}' found", layout.marker_class);
        return Ok(Vec::new());
    };

    classify_table(table, layout.cell_count, layout.skip_header, layout.unclassified)
        .into_iter()
        .map(|classified| -> Result<T, ScrapeError> {
            let label = classified.row.text(0);
            let quantity =
                layout
                    .quantity(classified.row.text(1))
                    .map_err(|source| ScrapeError::Quantity {
                        row: label.to_string(),
                        source,
                    })?;

            Ok(build(GroupedLine {
                group: layout.group_case.apply(&classified.group),
                label: layout.detail_case.apply(label),
                quantity,
            }))
        })
        .collect()
}

/// Extracts the production report (`opcao=opt_02`).
///
/// # Errors
///
/// Returns [`ScrapeError::Quantity`] if a volume cell is not numeric.
pub fn extract_production(html: &str) -> Result<Vec<ProductionRecord>, ScrapeError> {
    let layout = TableLayout::for_category(ReportCategory::Production);
    extract_grouped(html, &layout, |line| ProductionRecord {
        product_type: line.group,
        product: line.label,
        quantity_liters: line.quantity,
    })
}

/// Extracts the processing report (`opcao=opt_03`), including the
/// single-row "Sem classificação" tables.
///
/// # Errors
///
/// Never fails in practice, since non-numeric masses count as zero. The
/// signature matches the other grouped extractors.
pub fn extract_processing(html: &str) -> Result<Vec<ProcessingRecord>, ScrapeError> {
    let layout = TableLayout::for_category(ReportCategory::Processing);
    extract_grouped(html, &layout, |line| ProcessingRecord {
        grape_type: line.group,
        cultivar: line.label,
        quantity_kg: line.quantity,
    })
}

/// Extracts the commercialization report (`opcao=opt_04`).
///
/// # Errors
///
/// Returns [`ScrapeError::Quantity`] if a volume cell is not numeric.
pub fn extract_commercialization(
    html: &str,
) -> Result<Vec<CommercializationRecord>, ScrapeError> {
    let layout = TableLayout::for_category(ReportCategory::Commercialization);
    extract_grouped(html, &layout, |line| CommercializationRecord {
        product_type: line.group,
        product: line.label,
        quantity_liters: line.quantity,
    })
}

/// Extracts an import or export report (`opcao=opt_05`/`opt_06`).
///
/// Trade tables are flat: every three-cell row is a country. Non-numeric
/// mass or value cells count as zero.
#[must_use]
pub fn extract_trade(html: &str) -> Vec<TradeRecord> {
    let layout = TableLayout::for_category(ReportCategory::Import);
    let document = Html::parse_document(html);
    let Some(table) = find_table(&document, layout.marker_class) else {
        log::debug!("No table matching '{}' found", layout.marker_class);
        return Vec::new();
    };

    read_rows(table, layout.cell_count, layout.skip_header)
        .into_iter()
        .map(|row| TradeRecord {
            country: row.text(0).to_string(),
            quantity_kg: quantity_or_zero(row.text(1), layout.number_style),
            value_usd: quantity_or_zero(row.text(2), layout.number_style),
        })
        .collect()
}

/// Extracts the report page of `category`.
///
/// # Errors
///
/// Returns [`ScrapeError::Quantity`] if a production or commercialization
/// quantity cell is not numeric.
pub fn extract(category: ReportCategory, html: &str) -> Result<Report, ScrapeError> {
    let report = match category {
        ReportCategory::Production => Report::Production(extract_production(html)?),
        ReportCategory::Processing => Report::Processing(extract_processing(html)?),
        ReportCategory::Commercialization => {
            Report::Commercialization(extract_commercialization(html)?)
        }
        ReportCategory::Import => Report::Import(extract_trade(html)),
        ReportCategory::Export => Report::Export(extract_trade(html)),
    };

    log::debug!("Extracted {} {category} records", report.len());
    Ok(report)
}
