//! Line charts anchored on a worksheet.
//!
//! A chart refers to worksheet ranges through formulas and carries a cached
//! copy of the referenced values, so viewers that do not recalculate on load
//! still draw the series.

use crate::workbook::{col_to_letters, sheet_ref};

pub mod writer;

const EMU_PER_CM: f64 = 360_000.0;

/// A rectangular block of cells on a named sheet, 1-based and inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRange {
    pub sheet: String,
    pub first_row: u32,
    pub first_col: u32,
    pub last_row: u32,
    pub last_col: u32,
}

impl CellRange {
    pub fn new(sheet: &str, first_row: u32, first_col: u32, last_row: u32, last_col: u32) -> Self {
        CellRange {
            sheet: sheet.to_string(),
            first_row,
            first_col,
            last_row,
            last_col,
        }
    }

    /// A single-row range, the shape every series here uses.
    pub fn row(sheet: &str, row: u32, first_col: u32, last_col: u32) -> Self {
        Self::new(sheet, row, first_col, row, last_col)
    }

    pub fn cell(sheet: &str, row: u32, col: u32) -> Self {
        Self::new(sheet, row, col, row, col)
    }

    pub fn len(&self) -> usize {
        let rows = self.last_row.saturating_add(1).saturating_sub(self.first_row) as usize;
        let cols = self.last_col.saturating_add(1).saturating_sub(self.first_col) as usize;
        rows * cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Absolute reference such as `'일간 데이터'!$B$1:$BI$1`.
    pub fn to_formula(&self) -> String {
        let sheet = sheet_ref(&self.sheet);
        let first = format!("${}${}", col_to_letters(self.first_col), self.first_row);
        if self.first_row == self.last_row && self.first_col == self.last_col {
            return format!("{sheet}!{first}");
        }
        let last = format!("${}${}", col_to_letters(self.last_col), self.last_row);
        format!("{sheet}!{first}:{last}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    /// Cell holding the series name, with its cached text.
    pub name: Option<(CellRange, String)>,
    pub categories: CellRange,
    pub category_cache: Vec<String>,
    pub values: CellRange,
    pub value_cache: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: Option<String>,
    /// Built-in chart style number (1..48).
    pub style: u8,
    pub x_axis_title: Option<String>,
    pub y_axis_title: Option<String>,
    pub width_cm: f64,
    pub height_cm: f64,
    pub series: Vec<ChartSeries>,
}

impl Default for LineChart {
    fn default() -> Self {
        LineChart {
            title: None,
            style: 2,
            x_axis_title: None,
            y_axis_title: None,
            width_cm: 15.0,
            height_cm: 7.5,
            series: Vec::new(),
        }
    }
}

impl LineChart {
    pub fn new() -> Self {
        LineChart::default()
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn style(mut self, style: u8) -> Self {
        self.style = style;
        self
    }

    pub fn x_axis_title(mut self, title: &str) -> Self {
        self.x_axis_title = Some(title.to_string());
        self
    }

    pub fn y_axis_title(mut self, title: &str) -> Self {
        self.y_axis_title = Some(title.to_string());
        self
    }

    pub fn size_cm(mut self, width: f64, height: f64) -> Self {
        self.width_cm = width;
        self.height_cm = height;
        self
    }

    pub fn add_series(&mut self, series: ChartSeries) {
        self.series.push(series);
    }

    pub(crate) fn extent_emu(&self) -> (u64, u64) {
        (
            (self.width_cm * EMU_PER_CM).round() as u64,
            (self.height_cm * EMU_PER_CM).round() as u64,
        )
    }
}

/// A chart placed with its top-left corner on a cell (1-based).
#[derive(Debug, Clone, PartialEq)]
pub struct AnchoredChart {
    pub row: u32,
    pub col: u32,
    pub chart: LineChart,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_formulas_are_absolute_and_quoted() {
        let cats = CellRange::row("일간 데이터", 1, 2, 61);
        assert_eq!(cats.to_formula(), "'일간 데이터'!$B$1:$BI$1");
        assert_eq!(cats.len(), 60);
        assert_eq!(CellRange::cell("일간 데이터", 2, 1).to_formula(), "'일간 데이터'!$A$2");
    }

    #[test]
    fn quotes_in_sheet_names_are_doubled() {
        let r = CellRange::cell("Bob's", 1, 1);
        assert_eq!(r.to_formula(), "'Bob''s'!$A$1");
    }

    #[test]
    fn reversed_range_is_empty() {
        assert!(CellRange::new("s", 2, 5, 2, 3).is_empty());
        assert!(CellRange::new("s", 4, 1, 2, 1).is_empty());
        assert_eq!(CellRange::row("s", 2, 2, 61).len(), 60);
    }

    #[test]
    fn size_converts_to_emu() {
        let chart = LineChart::new().size_cm(25.0, 15.0);
        assert_eq!(chart.extent_emu(), (9_000_000, 5_400_000));
    }
}
