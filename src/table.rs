//! Sortable table presenter
//!
//! Turns a merged candidate list into a displayable table: optional column
//! sort, truncation to the idea limit, data-driven columns and cell
//! formatting. The presenter never mutates the rows it is given; the only
//! state it touches is the caller-owned [`SortState`].

use itertools::Itertools;
use ordered_float::OrderedFloat;
use rust_decimal::{Decimal, RoundingStrategy};
use std::cmp::Ordering;

use crate::types::{CandidateRow, CellValue};

/// Field formatted as a whole number of days
pub const DTE_FIELD: &str = "dte";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Header marker for the active column
    pub fn marker(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Per-table sort selection: at most one active column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    column: Option<String>,
    direction: SortDirection,
}

impl SortState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sort on `column`: the active column flips direction, any other column
    /// becomes active in ascending order.
    pub fn activate(&mut self, column: &str) {
        if self.column.as_deref() == Some(column) {
            self.direction = self.direction.toggled();
        } else {
            self.column = Some(column.to_string());
            self.direction = SortDirection::Ascending;
        }
    }

    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    pub fn is_ascending(&self) -> bool {
        self.direction == SortDirection::Ascending
    }

    pub fn is_active(&self, column: &str) -> bool {
        self.column.as_deref() == Some(column)
    }
}

/// Locale-style text ordering: case-insensitive first, lowercase before
/// uppercase on ties.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// How the active column compares its cells.
///
/// Chosen once per sort so every pair of rows is compared the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Every non-empty cell is a number
    Numeric,
    Text,
}

impl ColumnKind {
    pub fn of(rows: &[CandidateRow], column: &str) -> Self {
        let all_numbers = rows
            .iter()
            .filter_map(|row| row.get(column))
            .filter(|cell| !matches!(cell, CellValue::Empty))
            .all(|cell| matches!(cell, CellValue::Number(_)));
        if all_numbers {
            ColumnKind::Numeric
        } else {
            ColumnKind::Text
        }
    }

    /// Numeric columns put missing and empty cells first; text columns
    /// compare string forms, missing cells as empty text.
    pub fn compare(self, a: Option<&CellValue>, b: Option<&CellValue>) -> Ordering {
        match self {
            ColumnKind::Numeric => {
                let key = |cell: Option<&CellValue>| cell.and_then(CellValue::as_number).map(OrderedFloat);
                key(a).cmp(&key(b))
            }
            ColumnKind::Text => {
                let x = a.map(CellValue::as_text).unwrap_or_default();
                let y = b.map(CellValue::as_text).unwrap_or_default();
                locale_compare(&x, &y)
            }
        }
    }
}

/// Stable-sort a view of `rows` by the active column, if any
pub fn sort_rows<'a>(rows: &'a [CandidateRow], sort: &SortState) -> Vec<&'a CandidateRow> {
    let mut view: Vec<&CandidateRow> = rows.iter().collect();
    if let Some(column) = sort.column() {
        let kind = ColumnKind::of(rows, column);
        view.sort_by(|a, b| {
            let (a, b) = (a.get(column), b.get(column));
            match sort.direction() {
                SortDirection::Ascending => kind.compare(a, b),
                SortDirection::Descending => kind.compare(b, a),
            }
        });
    }
    view
}

/// Column names across all rows, in first-seen order.
///
/// For rows sharing one field set this is exactly the first row's fields.
pub fn columns(rows: &[CandidateRow]) -> Vec<String> {
    rows.iter()
        .flat_map(|row| row.field_names())
        .unique()
        .map(str::to_string)
        .collect()
}

/// Fixed-point formatting, rounding half away from zero on the exact value.
///
/// Negative values keep their sign even when they round to zero.
pub fn format_fixed(value: f64, decimals: u32) -> String {
    let places = decimals as usize;
    let text = match Decimal::from_f64_retain(value) {
        Some(d) => {
            let rounded = d.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
            format!("{:.*}", places, rounded)
        }
        None => format!("{:.*}", places, value),
    };
    let magnitude = text.trim_start_matches('-');
    if value < 0.0 {
        format!("-{}", magnitude)
    } else {
        magnitude.to_string()
    }
}

/// Display text for one cell
pub fn format_cell(column: &str, value: &CellValue) -> String {
    match value {
        CellValue::Number(n) if column == DTE_FIELD => format_fixed(*n, 0),
        CellValue::Number(n) => format_fixed(*n, 2),
        CellValue::Text(s) => s.clone(),
        CellValue::Empty => String::new(),
    }
}

/// A sorted, truncated table ready for display
#[derive(Debug, Clone)]
pub struct TableView<'a> {
    pub title: &'a str,
    pub columns: Vec<String>,
    pub rows: Vec<&'a CandidateRow>,
    pub sort: &'a SortState,
}

impl<'a> TableView<'a> {
    /// Header text, with a direction marker on the active column
    pub fn header_label(&self, column: &str) -> String {
        if self.sort.is_active(column) {
            format!("{} {}", column, self.sort.direction().marker())
        } else {
            column.to_string()
        }
    }

    pub fn header_labels(&self) -> Vec<String> {
        self.columns.iter().map(|c| self.header_label(c)).collect()
    }

    /// Formatted cells of every visible row, aligned to `columns`
    pub fn formatted_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|column| {
                        row.get(column)
                            .map(|value| format_cell(column, value))
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect()
    }

    /// Display width of each column over header and visible cells
    pub fn column_widths(&self) -> Vec<usize> {
        let cells = self.formatted_rows();
        self.header_labels()
            .iter()
            .enumerate()
            .map(|(i, header)| {
                cells
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Plain-text rendering for terminal output
    pub fn render_text(&self) -> String {
        let widths = self.column_widths();
        let pad = |text: &str, width: usize| {
            let fill = width.saturating_sub(text.chars().count());
            format!("{}{}", text, " ".repeat(fill))
        };

        let header = self
            .header_labels()
            .iter()
            .zip(&widths)
            .map(|(h, w)| pad(h, *w))
            .join("  ");
        let rule = widths.iter().map(|w| "-".repeat(*w)).join("  ");
        let body = self
            .formatted_rows()
            .iter()
            .map(|cells| {
                cells
                    .iter()
                    .zip(&widths)
                    .map(|(c, w)| pad(c, *w))
                    .join("  ")
                    .trim_end()
                    .to_string()
            })
            .join("\n");

        let banner = "=".repeat(header.chars().count().max(self.title.len()));
        format!(
            "{banner}\n{}\n{banner}\n{}\n{}\n{}",
            self.title,
            header.trim_end(),
            rule,
            body
        )
    }
}

/// Result of presenting one result list
#[derive(Debug, Clone)]
pub enum Presentation<'a> {
    /// Placeholder shown when the list is empty
    NoData { title: &'a str },
    Table(TableView<'a>),
}

impl<'a> Presentation<'a> {
    pub fn placeholder(title: &str) -> String {
        format!("No {} data available.", title)
    }

    pub fn render_text(&self) -> String {
        match self {
            Presentation::NoData { title } => Self::placeholder(title),
            Presentation::Table(view) => view.render_text(),
        }
    }
}

/// Present `rows` under `title`: sort, then keep the first `max_ideas`.
pub fn present<'a>(
    title: &'a str,
    rows: &'a [CandidateRow],
    sort: &'a SortState,
    max_ideas: usize,
) -> Presentation<'a> {
    if rows.is_empty() {
        return Presentation::NoData { title };
    }

    let mut visible = sort_rows(rows, sort);
    visible.truncate(max_ideas);

    Presentation::Table(TableView {
        title,
        columns: columns(rows),
        rows: visible,
        sort,
    })
}
