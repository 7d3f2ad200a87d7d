use std::{
    cell::RefCell,
    io::{self, BufWriter, Seek, SeekFrom, Write},
    rc::Rc,
};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::{
    Result,
    workbook::{
        cell::CellValue,
        chart::{AnchoredChart, LineChart},
        make_cell_ref, write_cell,
        style::{Style, StyleRegistry},
    },
};

#[derive(Debug, Clone, Copy, PartialEq)]
struct ColumnWidth {
    first: u32,
    last: u32,
    width: f64,
}

/// Streams rows of one worksheet into a spool file until the workbook is
/// packaged. Rows are numbered from 1 in the order they are written.
pub struct SheetWriter {
    name: String,
    rows: BufWriter<NamedTempFile>,
    styles: Rc<RefCell<StyleRegistry>>,
    current_row: u32,
    max_col: u32,
    columns: Vec<ColumnWidth>,
    pub(crate) charts: Vec<AnchoredChart>,
}

impl SheetWriter {
    pub(crate) fn new(name: &str, styles: Rc<RefCell<StyleRegistry>>) -> Result<Self> {
        let temp_file = NamedTempFile::new()?;

        Ok(SheetWriter {
            name: name.to_string(),
            rows: BufWriter::new(temp_file),
            styles,
            current_row: 0,
            max_col: 0,
            columns: Vec::new(),
            charts: Vec::new(),
        })
    }

    /// Number of rows written so far, including empty ones.
    pub fn row_count(&self) -> u32 {
        self.current_row
    }

    /// Writes a row with a style per cell.
    pub fn write_styled_row(&mut self, cells: &[(CellValue, &Style)]) -> Result<()> {
        let row = self.next_row(cells.len());
        if cells.is_empty() {
            return Ok(());
        }

        write!(self.rows, "<row r=\"{row}\">")?;
        for (i, (cell, style)) in cells.iter().enumerate() {
            let idx = self.styles.borrow_mut().register(style);
            let cell_ref = make_cell_ref(row, i as u32 + 1);
            write_cell(&mut self.rows, &cell_ref, cell, Some(idx))?;
        }
        writeln!(self.rows, "</row>")?;

        Ok(())
    }

    /// Sets the width (in characters) of columns `first..=last`, 1-based.
    /// Must be set before the workbook is finished; a later call covering
    /// the same column wins.
    pub fn set_column_width(&mut self, first: u32, last: u32, width: f64) {
        let (first, last) = (first.min(last).max(1), first.max(last).max(1));
        for col in &mut self.columns {
            if col.first >= first && col.last <= last {
                col.last = 0;
            }
        }
        self.columns.retain(|c| c.last != 0);
        self.columns.push(ColumnWidth { first, last, width });
    }

    /// Anchors `chart` with its top-left corner on cell (`row`, `col`), 1-based.
    pub fn insert_chart(&mut self, row: u32, col: u32, chart: LineChart) {
        self.charts.push(AnchoredChart {
            row: row.max(1),
            col: col.max(1),
            chart,
        });
    }

    fn next_row(&mut self, width: usize) -> u32 {
        self.current_row += 1;
        if width as u32 > self.max_col {
            self.max_col = width as u32;
        }
        self.current_row
    }

    pub(crate) fn finalize(&mut self) -> Result<()> {
        self.rows.flush()?;
        Ok(())
    }

    /// Writes the complete worksheet part. `drawing_rel` is the relationship
    /// id of the sheet's drawing, if it has one.
    pub(crate) fn write_xml<W: Write>(&mut self, out: &mut W, drawing_rel: Option<&str>) -> Result<()> {
        debug!(sheet = %self.name, rows = self.current_row, cols = self.max_col, "writing worksheet");
        write!(
            out,
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
                r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
            )
        )?;

        if self.current_row > 0 && self.max_col > 0 {
            write!(
                out,
                "<dimension ref=\"A1:{}\"/>",
                make_cell_ref(self.current_row, self.max_col)
            )?;
        }
        write!(
            out,
            r#"<sheetViews><sheetView workbookViewId="0"/></sheetViews><sheetFormatPr defaultRowHeight="15"/>"#
        )?;

        if !self.columns.is_empty() {
            let mut columns = self.columns.clone();
            columns.sort_by_key(|c| c.first);
            write!(out, "<cols>")?;
            for c in &columns {
                write!(
                    out,
                    "<col min=\"{}\" max=\"{}\" width=\"{}\" customWidth=\"1\"/>",
                    c.first, c.last, c.width
                )?;
            }
            write!(out, "</cols>")?;
        }

        write!(out, "<sheetData>")?;
        self.finalize()?;
        let spool = self.rows.get_mut();
        spool.seek(SeekFrom::Start(0))?;
        io::copy(spool, out)?;
        write!(out, "</sheetData>")?;

        write!(
            out,
            r#"<pageMargins left="0.75" right="0.75" top="1" bottom="1" header="0.5" footer="0.5"/>"#
        )?;
        if let Some(rid) = drawing_rel {
            write!(out, r#"<drawing r:id="{rid}"/>"#)?;
        }
        write!(out, "</worksheet>")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::style::border::BorderStyle;

    fn sheet() -> SheetWriter {
        SheetWriter::new("test", Rc::new(RefCell::new(StyleRegistry::new()))).unwrap()
    }

    fn plain(sheet: &mut SheetWriter, cells: &[CellValue]) {
        let style = Style::default();
        let row: Vec<_> = cells.iter().map(|c| (*c, &style)).collect();
        sheet.write_styled_row(&row).unwrap();
    }

    fn xml(sheet: &mut SheetWriter, drawing: Option<&str>) -> String {
        let mut buf = Vec::new();
        sheet.write_xml(&mut buf, drawing).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn rows_are_numbered_in_write_order() {
        let mut s = sheet();
        plain(&mut s, &[CellValue::text("a"), CellValue::num(1.5)]);
        plain(&mut s, &[]);
        plain(&mut s, &[CellValue::num(2.0)]);

        let xml = xml(&mut s, None);
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains(r#"<c r="A1" t="inlineStr"><is><t>a</t></is></c>"#));
        assert!(xml.contains(r#"<c r="B1"><v>1.5</v></c>"#));
        assert!(!xml.contains("<row r=\"2\">"));
        assert!(xml.contains(r#"<c r="A3"><v>2</v></c>"#));
        assert!(xml.contains(r#"<dimension ref="A1:B3"/>"#));
        assert_eq!(s.row_count(), 3);
    }

    #[test]
    fn styled_cells_reference_registered_formats() {
        let mut s = sheet();
        let header = Style::new().bold().bg("D3D3D3").center().border_all(BorderStyle::Thin);
        let data = Style::new().center().border_all(BorderStyle::Thin);
        s.write_styled_row(&[(CellValue::text("h"), &header), (CellValue::num(1.0), &data)])
            .unwrap();
        s.write_styled_row(&[(CellValue::num(2.0), &data)]).unwrap();

        let xml = xml(&mut s, None);
        assert!(xml.contains(r#"<c r="A1" s="1" t="inlineStr">"#));
        assert!(xml.contains(r#"<c r="B1" s="2"><v>1</v></c>"#));
        assert!(xml.contains(r#"<c r="A2" s="2"><v>2</v></c>"#));
    }

    #[test]
    fn columns_are_sorted_and_overrides_replace() {
        let mut s = sheet();
        s.set_column_width(2, 61, 6.0);
        s.set_column_width(1, 1, 10.0);
        s.set_column_width(1, 1, 12.0);
        plain(&mut s, &[CellValue::num(0.0)]);

        let xml = xml(&mut s, None);
        let a = xml.find(r#"<col min="1" max="1" width="12" customWidth="1"/>"#).unwrap();
        let b = xml.find(r#"<col min="2" max="61" width="6" customWidth="1"/>"#).unwrap();
        assert!(a < b);
        assert!(!xml.contains(r#"width="10""#));
        assert!(xml.find("<cols>").unwrap() < xml.find("<sheetData>").unwrap());
    }

    #[test]
    fn drawing_reference_follows_page_margins() {
        let mut s = sheet();
        plain(&mut s, &[CellValue::num(1.0)]);
        let xml = xml(&mut s, Some("rId1"));
        assert!(xml.ends_with(r#"footer="0.5"/><drawing r:id="rId1"/></worksheet>"#));
    }
}
