/// Value of a single cell as handed to a [`SheetWriter`](super::sheet::SheetWriter).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    /// Excel stores every number as f64.
    Number(f64),
    /// Written as an inline string, no sharedStrings part needed while streaming.
    Text(&'a str),
}

impl<'a> CellValue<'a> {
    pub fn num(v: f64) -> Self { CellValue::Number(v) }
    pub fn text(v: &'a str) -> Self { CellValue::Text(v) }
}
