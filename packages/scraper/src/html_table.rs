//! Table locator.
//!
//! Finds the data table of a report page by its CSS classes and reads its
//! rows into [`RawTableRow`]s. Report tables carry no `<thead>` the
//! extractors can rely on; rows are told apart by the class of their cells
//! instead (`tb_item` for group rows, `tb_subitem` for detail rows).

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

/// Class list of the data table on every report page.
pub const DATA_TABLE_CLASS: &str = "tb_base tb_dados";

/// Cell class of a group row.
pub const GROUP_CELL_CLASS: &str = "tb_item";

/// Cell class of a detail row.
pub const DETAIL_CELL_CLASS: &str = "tb_subitem";

static TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").unwrap_or_else(|_| unreachable!()));
static ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").unwrap_or_else(|_| unreachable!()));
static CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").unwrap_or_else(|_| unreachable!()));

/// Structural role of a cell, taken from its class attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellMarker {
    /// No recognised class.
    None,
    /// `tb_item`: the cell opens a group.
    Group,
    /// `tb_subitem`: the cell is a line item within the current group.
    Detail,
}

impl CellMarker {
    fn of(cell: ElementRef<'_>) -> Self {
        let mut marker = Self::None;
        for class in cell.value().classes() {
            if class == GROUP_CELL_CLASS {
                return Self::Group;
            }
            if class == DETAIL_CELL_CLASS {
                marker = Self::Detail;
            }
        }
        marker
    }
}

/// A table cell's text and marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCell {
    /// Text content, trimmed with inner whitespace collapsed.
    pub text: String,
    /// Structural marker.
    pub marker: CellMarker,
}

/// One `<tr>` of the data table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTableRow {
    /// Cells in document order.
    pub cells: Vec<RawCell>,
}

impl RawTableRow {
    /// Marker of the first cell, which decides the row's role.
    #[must_use]
    pub fn marker(&self) -> CellMarker {
        self.cells
            .first()
            .map_or(CellMarker::None, |cell| cell.marker)
    }

    /// Text of the cell at `index`, or `""` past the end.
    #[must_use]
    pub fn text(&self, index: usize) -> &str {
        self.cells.get(index).map_or("", |cell| cell.text.as_str())
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Finds the first `<table>` carrying every class in `marker_class`.
///
/// Class tokens are compared case-sensitively. Returns `None` when no
/// table matches, which is the normal outcome for a year the portal has no
/// data for.
#[must_use]
pub fn find_table<'a>(document: &'a Html, marker_class: &str) -> Option<ElementRef<'a>> {
    let wanted: Vec<&str> = marker_class.split_whitespace().collect();
    if wanted.is_empty() {
        return None;
    }

    document.select(&TABLE).find(|table| {
        let classes: Vec<&str> = table.value().classes().collect();
        wanted.iter().all(|class| classes.contains(class))
    })
}

/// Reads the rows of `table` that have exactly `expected_cell_count`
/// `<td>` cells.
///
/// When `skip_header` is set the first `<tr>` is dropped before counting,
/// whatever it contains.
#[must_use]
pub fn read_rows(
    table: ElementRef<'_>,
    expected_cell_count: usize,
    skip_header: bool,
) -> Vec<RawTableRow> {
    table
        .select(&ROW)
        .skip(usize::from(skip_header))
        .filter_map(|row| {
            let cells: Vec<RawCell> = row
                .select(&CELL)
                .map(|cell| RawCell {
                    text: cell_text(cell),
                    marker: CellMarker::of(cell),
                })
                .collect();

            if cells.len() == expected_cell_count {
                Some(RawTableRow { cells })
            } else {
                log::trace!(
                    "Skipping row with {} cells (expected {expected_cell_count})",
                    cells.len()
                );
                None
            }
        })
        .collect()
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
