//! Reads back the parts of an xlsx package this crate writes: sheet order,
//! cell values and the style index of every cell.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use quick_xml::Reader as XmlReader;
use quick_xml::events::Event;
use zip::ZipArchive;

use crate::Result;
use crate::error::TemplateError;

#[derive(Debug, Clone, PartialEq)]
pub struct CellRecord {
    pub value: String,
    /// Index into `cellXfs`; 0 when the cell carries no `s` attribute.
    pub style: usize,
}

#[derive(Debug)]
pub struct Row {
    /// 1-based row number from the `r` attribute.
    pub number: u32,
    pub cells: Vec<CellRecord>,
}

impl Row {
    pub fn values(&self) -> Vec<&str> {
        self.cells.iter().map(|c| c.value.as_str()).collect()
    }
}

#[inline]
fn attr_val(attr: &quick_xml::events::attributes::Attribute) -> String {
    let raw = std::str::from_utf8(attr.value.as_ref()).unwrap_or("");
    quick_xml::escape::unescape(raw)
        .unwrap_or_default()
        .into_owned()
}

#[inline]
fn text_val(e: &quick_xml::events::BytesText) -> String {
    let raw = std::str::from_utf8(e.as_ref()).unwrap_or("");
    quick_xml::escape::unescape(raw)
        .unwrap_or_default()
        .into_owned()
}

pub struct XlsxReader {
    path: PathBuf,
    sheet_paths: HashMap<String, String>,
    sheet_order: Vec<String>,
    part_names: Vec<String>,
    shared_strings: Arc<Vec<String>>,
}

impl XlsxReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut archive = ZipArchive::new(File::open(&path)?)?;

        let part_names = archive.file_names().map(str::to_string).collect();
        let (sheet_order, rid_to_name) = parse_workbook(&mut archive)?;
        let rid_to_path = parse_workbook_rels(&mut archive)?;

        let sheet_paths: HashMap<String, String> = rid_to_name
            .into_iter()
            .filter_map(|(rid, name)| rid_to_path.get(&rid).map(|p| (name, p.clone())))
            .collect();

        let shared_strings = Arc::new(parse_shared_strings(&mut archive)?);

        Ok(XlsxReader {
            path,
            sheet_paths,
            sheet_order,
            part_names,
            shared_strings,
        })
    }

    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_order
    }

    pub fn has_part(&self, name: &str) -> bool {
        self.part_names.iter().any(|p| p == name)
    }

    /// Raw text of a package part, e.g. `xl/styles.xml`.
    pub fn part_text(&self, name: &str) -> Result<String> {
        let mut archive = ZipArchive::new(File::open(&self.path)?)?;
        let bytes = slurp_entry(&mut archive, name)?;
        String::from_utf8(bytes)
            .map_err(|e| TemplateError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
    }

    pub fn stream_rows(&self, sheet_name: &str) -> Result<RowIter> {
        let zip_path = self
            .sheet_paths
            .get(sheet_name)
            .ok_or_else(|| TemplateError::NotFound(format!("sheet '{sheet_name}' not found")))?;

        let mut archive = ZipArchive::new(File::open(&self.path)?)?;
        let xml = slurp_entry(&mut archive, zip_path)?;

        let mut reader = XmlReader::from_reader(Cursor::new(xml));
        reader.config_mut().trim_text(true);

        Ok(RowIter {
            xml: reader,
            shared_strings: Arc::clone(&self.shared_strings),
            state: ParseState::new(),
            buf: Vec::with_capacity(256),
            done: false,
        })
    }

    /// Collects every row of a sheet.
    pub fn rows(&self, sheet_name: &str) -> Result<Vec<Row>> {
        self.stream_rows(sheet_name)?.collect()
    }
}

pub struct RowIter {
    xml: XmlReader<Cursor<Vec<u8>>>,
    shared_strings: Arc<Vec<String>>,
    state: ParseState,
    buf: Vec<u8>,
    done: bool,
}

struct ParseState {
    row: Vec<CellRecord>,
    row_number: u32,
    col: u32,
    next_col: u32,
    cell_type: CellType,
    cell_style: usize,
    in_v: bool,
    in_t: bool,
    value_buf: String,
}

#[derive(Clone, Copy)]
enum CellType {
    Number,
    SharedStr,
    Inline,
    Bool,
    Str,
    Error,
}

impl ParseState {
    fn new() -> Self {
        ParseState {
            row: Vec::new(),
            row_number: 0,
            col: 0,
            next_col: 0,
            cell_type: CellType::Number,
            cell_style: 0,
            in_v: false,
            in_t: false,
            value_buf: String::new(),
        }
    }
}

impl Iterator for RowIter {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            self.buf.clear();

            match self.xml.read_event_into(&mut self.buf) {
                Ok(Event::Start(ref e)) if e.name().as_ref() == b"row" => {
                    self.state.row.clear();
                    self.state.next_col = 0;
                    self.state.row_number = e
                        .attributes()
                        .flatten()
                        .find(|a| a.key.as_ref() == b"r")
                        .and_then(|a| attr_val(&a).parse().ok())
                        .unwrap_or(self.state.row_number + 1);
                }

                Ok(Event::Start(ref e)) if e.name().as_ref() == b"c" => {
                    self.state.begin_cell(e);
                }

                Ok(Event::Empty(ref e)) if e.name().as_ref() == b"c" => {
                    self.state.begin_cell(e);
                    self.state.push_cell(&self.shared_strings);
                }

                Ok(Event::Start(ref e)) => match e.name().as_ref() {
                    b"v" => self.state.in_v = true,
                    b"t" => self.state.in_t = true,
                    _ => {}
                },

                Ok(Event::Text(ref e)) => {
                    if self.state.in_v || self.state.in_t {
                        self.state.value_buf.push_str(&text_val(e));
                    }
                }

                Ok(Event::End(ref e)) => match e.name().as_ref() {
                    b"v" => self.state.in_v = false,
                    b"t" => self.state.in_t = false,
                    b"c" => self.state.push_cell(&self.shared_strings),
                    b"row" => {
                        return Some(Ok(Row {
                            number: self.state.row_number,
                            cells: std::mem::take(&mut self.state.row),
                        }));
                    }
                    b"sheetData" => {
                        self.done = true;
                        return None;
                    }
                    _ => {}
                },

                Ok(Event::Eof) => {
                    self.done = true;
                    return None;
                }

                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }

                _ => {}
            }
        }
    }
}

impl ParseState {
    fn begin_cell(&mut self, e: &quick_xml::events::BytesStart) {
        let mut col_ref = String::new();
        let mut cell_type = CellType::Number;
        let mut style = 0;

        for attr in e.attributes().flatten() {
            match attr.key.as_ref() {
                b"r" => col_ref = attr_val(&attr),
                b"s" => style = attr_val(&attr).parse().unwrap_or(0),
                b"t" => {
                    cell_type = match attr_val(&attr).as_str() {
                        "s" => CellType::SharedStr,
                        "inlineStr" => CellType::Inline,
                        "b" => CellType::Bool,
                        "str" => CellType::Str,
                        "e" => CellType::Error,
                        _ => CellType::Number,
                    }
                }
                _ => {}
            }
        }

        // cells without a reference follow the previous one
        let col = if col_ref.is_empty() {
            self.next_col
        } else {
            col_ref_to_index(&col_ref).unwrap_or(self.next_col)
        };
        while self.next_col < col {
            self.row.push(CellRecord {
                value: String::new(),
                style: 0,
            });
            self.next_col += 1;
        }

        self.col = col;
        self.cell_type = cell_type;
        self.cell_style = style;
        self.value_buf.clear();
        self.in_v = false;
        self.in_t = false;
    }

    fn push_cell(&mut self, shared_strings: &[String]) {
        let raw = self.value_buf.trim().to_string();
        let value = match self.cell_type {
            CellType::SharedStr => {
                let idx: usize = raw.parse().unwrap_or(0);
                shared_strings.get(idx).cloned().unwrap_or_default()
            }
            CellType::Bool => {
                if raw == "1" {
                    "TRUE".into()
                } else {
                    "FALSE".into()
                }
            }
            CellType::Number | CellType::Inline | CellType::Str | CellType::Error => raw,
        };
        self.row.push(CellRecord {
            value,
            style: self.cell_style,
        });
        self.next_col = self.col + 1;
    }
}

fn parse_workbook(
    archive: &mut ZipArchive<File>,
) -> Result<(Vec<String>, HashMap<String, String>)> {
    let bytes = slurp_entry(archive, "xl/workbook.xml")?;
    let mut xml = XmlReader::from_reader(bytes.as_slice());
    xml.config_mut().trim_text(true);

    let mut order = Vec::new();
    let mut rid_map = HashMap::new();
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Empty(ref e) | Event::Start(ref e) if e.name().as_ref() == b"sheet" => {
                let (mut name, mut rid) = (String::new(), String::new());
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"name" => name = attr_val(&attr),
                        b"r:id" | b"id" => rid = attr_val(&attr),
                        _ => {}
                    }
                }
                if !name.is_empty() && !rid.is_empty() {
                    order.push(name.clone());
                    rid_map.insert(rid, name);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok((order, rid_map))
}

fn parse_workbook_rels(archive: &mut ZipArchive<File>) -> Result<HashMap<String, String>> {
    let bytes = slurp_entry(archive, "xl/_rels/workbook.xml.rels")?;
    let mut xml = XmlReader::from_reader(bytes.as_slice());
    xml.config_mut().trim_text(true);

    let mut map = HashMap::new();
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Empty(ref e) | Event::Start(ref e) if e.name().as_ref() == b"Relationship" => {
                let (mut id, mut target, mut is_sheet) = (String::new(), String::new(), false);
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Id" => id = attr_val(&attr),
                        b"Target" => target = attr_val(&attr),
                        b"Type" => is_sheet = attr_val(&attr).ends_with("/worksheet"),
                        _ => {}
                    }
                }
                if is_sheet && !id.is_empty() {
                    map.insert(id, normalize_path(&target));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(map)
}

fn parse_shared_strings(archive: &mut ZipArchive<File>) -> Result<Vec<String>> {
    if archive.by_name("xl/sharedStrings.xml").is_err() {
        return Ok(Vec::new());
    }

    let bytes = slurp_entry(archive, "xl/sharedStrings.xml")?;
    let mut xml = XmlReader::from_reader(bytes.as_slice());
    xml.config_mut().trim_text(false);

    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_t = false;
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.name().as_ref() {
                b"si" => current.clear(),
                b"t" => in_t = true,
                _ => {}
            },
            Event::End(ref e) => match e.name().as_ref() {
                b"si" => strings.push(std::mem::take(&mut current)),
                b"t" => in_t = false,
                _ => {}
            },
            Event::Text(ref e) if in_t => current.push_str(&text_val(e)),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(strings)
}

fn slurp_entry(archive: &mut ZipArchive<File>, path: &str) -> Result<Vec<u8>> {
    let mut entry = archive
        .by_name(path)
        .map_err(|e| TemplateError::NotFound(format!("'{path}': {e}")))?;
    let mut buf = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut buf)?;
    Ok(buf)
}

fn normalize_path(target: &str) -> String {
    let t = target.trim_start_matches('/');
    if t.starts_with("xl/") {
        t.to_string()
    } else {
        format!("xl/{t}")
    }
}

/// 0-based column index of a cell reference such as `BI1`. Letters are
/// case-insensitive; anything else before the row number yields `None`.
fn col_ref_to_index(cell_ref: &str) -> Option<u32> {
    let letters = cell_ref.trim_end_matches(|c: char| c.is_ascii_digit());
    if letters.is_empty() {
        return None;
    }
    letters
        .bytes()
        .try_fold(0u32, |acc, b| {
            let digit = b.to_ascii_uppercase().checked_sub(b'A').filter(|d| *d < 26)?;
            acc.checked_mul(26)?.checked_add(digit as u32 + 1)
        })
        .map(|n| n - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_refs_are_zero_based() {
        assert_eq!(col_ref_to_index("A1"), Some(0));
        assert_eq!(col_ref_to_index("BI1"), Some(60));
        assert_eq!(col_ref_to_index("BCK10"), Some(1440));
    }

    #[test]
    fn malformed_column_refs_do_not_panic() {
        assert_eq!(col_ref_to_index("bi1"), Some(60));
        assert_eq!(col_ref_to_index("12"), None);
        assert_eq!(col_ref_to_index("A-1"), None);
        assert_eq!(col_ref_to_index("@1"), None);
        assert_eq!(col_ref_to_index("ZZZZZZZZ1"), None);
    }

    #[test]
    fn relationship_targets_are_rooted_in_xl() {
        assert_eq!(normalize_path("worksheets/sheet1.xml"), "xl/worksheets/sheet1.xml");
        assert_eq!(normalize_path("/xl/worksheets/sheet1.xml"), "xl/worksheets/sheet1.xml");
    }
}
