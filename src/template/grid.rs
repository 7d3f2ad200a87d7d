//! In-memory sheet model: a grid of styled cells that is written to a
//! [`SheetWriter`] in one pass.

use crate::{
    Result,
    workbook::{
        cell::CellValue,
        sheet::SheetWriter,
        style::{Style, border::BorderStyle},
    },
};

pub const HEADER_FILL: &str = "D3D3D3";

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    fn as_cell(&self) -> CellValue<'_> {
        match self {
            Value::Text(s) => CellValue::text(s),
            Value::Number(n) => CellValue::num(*n),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub value: Value,
    pub style: Style,
}

impl GridCell {
    pub fn text(s: impl Into<String>) -> Self {
        GridCell {
            value: Value::Text(s.into()),
            style: Style::default(),
        }
    }

    pub fn number(n: f64) -> Self {
        GridCell {
            value: Value::Number(n),
            style: Style::default(),
        }
    }
}

pub fn header_style() -> Style {
    Style::new()
        .bold()
        .bg(HEADER_FILL)
        .center()
        .border_all(BorderStyle::Thin)
}

pub fn data_style() -> Style {
    Style::new().center().border_all(BorderStyle::Thin)
}

/// Bold, gray fill, centered, thin box border.
pub fn apply_header_style(cell: &mut GridCell) {
    cell.style = header_style();
}

/// Centered with a thin box border; no fill, regular weight.
pub fn apply_data_style(cell: &mut GridCell) {
    cell.style = data_style();
}

/// A named sheet held in memory. Row 1 is the header row.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub name: String,
    pub rows: Vec<Vec<GridCell>>,
    /// `(first, last, width)` column ranges, 1-based.
    pub column_widths: Vec<(u32, u32, f64)>,
}

impl Grid {
    pub fn new(name: &str) -> Self {
        Grid {
            name: name.to_string(),
            rows: Vec::new(),
            column_widths: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<GridCell>) {
        self.rows.push(row);
    }

    pub fn set_column_width(&mut self, first: u32, last: u32, width: f64) {
        self.column_widths.push((first, last, width));
    }

    pub fn header(&self) -> &[GridCell] {
        self.rows.first().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn data_rows(&self) -> &[Vec<GridCell>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Cell at (`row`, `col`), both 1-based.
    pub fn cell(&self, row: u32, col: u32) -> Option<&GridCell> {
        let r = self.rows.get(row.checked_sub(1)? as usize)?;
        r.get(col.checked_sub(1)? as usize)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn write_to(&self, sheet: &mut SheetWriter) -> Result<()> {
        for &(first, last, width) in &self.column_widths {
            sheet.set_column_width(first, last, width);
        }
        for row in &self.rows {
            let cells: Vec<(CellValue, &Style)> =
                row.iter().map(|c| (c.value.as_cell(), &c.style)).collect();
            sheet.write_styled_row(&cells)?;
        }
        Ok(())
    }
}
