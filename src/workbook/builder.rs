use std::path::PathBuf;

use crate::{Result, workbook::Workbook};

pub struct WorkbookBuilder<T: Into<String>> {
    path: PathBuf,
    sheets: Vec<T>,
}

impl<T> WorkbookBuilder<T>
where
    T: Into<String>,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sheets: vec![],
        }
    }

    /// Sheets created up front, in tab order.
    pub fn set_sheets(mut self, sheets: Vec<T>) -> Self {
        self.sheets = sheets;
        self
    }

    pub fn build(self) -> Result<Workbook> {
        Workbook::new_with_builder(
            self.path,
            self.sheets.into_iter().map(|s| s.into()).collect(),
        )
    }
}
