use std::{
    cell::RefCell,
    collections::HashMap,
    fs::{File, Permissions},
    io::{BufWriter, Seek, Write},
    path::{Path, PathBuf},
    rc::Rc,
};

use tempfile::NamedTempFile;
use tracing::debug;
use zip::{ZipWriter, result::ZipError, write::SimpleFileOptions};

use crate::{
    Result,
    error::TemplateError,
    workbook::{cell::CellValue, sheet::SheetWriter, style::StyleRegistry},
};
pub mod builder;
pub mod cell;
pub mod chart;
pub mod sheet;
pub mod style;

const REL_WORKSHEET: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const REL_DRAWING: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/drawing";
const REL_CHART: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/chart";

const RELS_DOT_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#,
    r#"</Relationships>"#,
);

fn workbook_xml(order: &[String]) -> String {
    let mut sheets = String::new();
    for (i, name) in order.iter().enumerate() {
        let sheet_id = i + 1;
        let escaped_name = xml_escape(name);
        sheets.push_str(&format!(
            r#"<sheet name="{escaped_name}" sheetId="{sheet_id}" r:id="rId{sheet_id}"/>"#
        ));
    }

    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
            r#"<bookViews><workbookView activeTab="0"/></bookViews>"#,
            r#"<sheets>{}</sheets>"#,
            r#"<calcPr fullCalcOnLoad="1"/>"#,
            r#"</workbook>"#,
        ),
        sheets
    )
}

/// Relationships part listing `(type, target)` pairs as `rId1..`.
fn relationships_xml(targets: &[(&str, String)]) -> String {
    let mut rels = String::new();
    for (i, (kind, target)) in targets.iter().enumerate() {
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="{kind}" Target="{target}"/>"#,
            i + 1
        ));
    }

    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
            r#"{}"#,
            r#"</Relationships>"#,
        ),
        rels
    )
}

fn content_types_xml(sheet_count: usize, drawing_count: usize, chart_count: usize) -> String {
    let mut overrides = String::new();

    for i in 1..=sheet_count {
        overrides.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
        ));
    }
    for i in 1..=drawing_count {
        overrides.push_str(&format!(
            r#"<Override PartName="/xl/drawings/drawing{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.drawing+xml"/>"#
        ));
    }
    for i in 1..=chart_count {
        overrides.push_str(&format!(
            r#"<Override PartName="/xl/charts/chart{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.drawingml.chart+xml"/>"#
        ));
    }

    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
            r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
            r#"<Default Extension="xml" ContentType="application/xml"/>"#,
            r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
            r#"<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
            r#"{}"#,
            r#"</Types>"#,
        ),
        overrides
    )
}

pub struct Workbook {
    output_path: PathBuf,
    sheets: HashMap<String, SheetWriter>,
    insertion_order: Vec<String>,
    styles: Rc<RefCell<StyleRegistry>>,
}

impl Workbook {
    pub(crate) fn new_with_builder(path: PathBuf, sheets: Vec<String>) -> Result<Self> {
        let mut wb = Workbook {
            output_path: path,
            sheets: HashMap::new(),
            insertion_order: vec![],
            styles: Rc::new(RefCell::new(StyleRegistry::new())),
        };

        for name in sheets {
            wb.add_sheet(&name)?;
        }
        Ok(wb)
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn sheet_names(&self) -> &[String] {
        &self.insertion_order
    }

    pub fn get_sheet(&mut self, name: &str) -> Option<&mut SheetWriter> {
        self.sheets.get_mut(name)
    }

    pub fn add_sheet(&mut self, name: &str) -> Result<&mut SheetWriter> {
        if self.sheets.contains_key(name) {
            return Err(TemplateError::AlreadyExists(format!(
                "Sheet '{name}' already exists"
            )));
        }
        let writer = SheetWriter::new(name, Rc::clone(&self.styles))?;
        self.insertion_order.push(name.to_string());
        Ok(self.sheets.entry(name.to_string()).or_insert(writer))
    }

    /// Packages every sheet and replaces the output file in one step.
    ///
    /// The package is assembled in a temporary file next to the target and
    /// renamed over it only once complete, so a failed save leaves either no
    /// file or the previous version.
    pub fn finish(mut self) -> Result<PathBuf> {
        for name in &self.insertion_order {
            match self.sheets.get_mut(name) {
                Some(s) => s.finalize()?,
                None => {
                    return Err(TemplateError::NotFound(format!("Sheet name : {name}!!")));
                }
            }
        }

        let path = self.output_path.clone();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| TemplateError::from_save(path.clone(), e))?;

        // an overwritten file keeps its mode
        let existing = std::fs::metadata(&path)
            .ok()
            .filter(|m| m.is_file())
            .map(|m| m.permissions());
        let mut temp = package_tempfile(&dir, existing)
            .map_err(|e| TemplateError::from_save(path.clone(), e))?;
        debug!(temp = %temp.path().display(), "writing package");

        self.write_package(temp.as_file_mut()).map_err(|e| match e {
            TemplateError::Io(io) | TemplateError::Zip(ZipError::Io(io)) => {
                TemplateError::from_save(path.clone(), io)
            }
            other => other,
        })?;

        temp.persist(&path)
            .map_err(|e| TemplateError::from_save(path.clone(), e.error))?;
        Ok(path)
    }

    fn write_package(&mut self, file: &mut File) -> Result<()> {
        let mut zip = ZipWriter::new(BufWriter::new(file));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        // drawing and chart parts are numbered across the whole workbook
        let mut drawing_count = 0;
        let mut chart_count = 0;
        let mut layout = Vec::with_capacity(self.insertion_order.len());
        for name in &self.insertion_order {
            let charts = self.sheets.get(name).map_or(0, |s| s.charts.len());
            if charts == 0 {
                layout.push(None);
            } else {
                drawing_count += 1;
                layout.push(Some((drawing_count, chart_count + 1)));
                chart_count += charts;
            }
        }

        zip_write_str(
            &mut zip,
            "[Content_Types].xml",
            &content_types_xml(self.insertion_order.len(), drawing_count, chart_count),
            options,
        )?;
        zip_write_str(&mut zip, "_rels/.rels", RELS_DOT_RELS, options)?;
        zip_write_str(
            &mut zip,
            "xl/workbook.xml",
            &workbook_xml(&self.insertion_order),
            options,
        )?;

        let mut workbook_rels: Vec<(&str, String)> = (1..=self.insertion_order.len())
            .map(|i| (REL_WORKSHEET, format!("worksheets/sheet{i}.xml")))
            .collect();
        workbook_rels.push((REL_STYLES, "styles.xml".to_string()));
        zip_write_str(
            &mut zip,
            "xl/_rels/workbook.xml.rels",
            &relationships_xml(&workbook_rels),
            options,
        )?;

        let styles_xml = self.styles.borrow().to_xml();
        zip_write_str(&mut zip, "xl/styles.xml", &styles_xml, options)?;

        for (i, name) in self.insertion_order.iter().enumerate() {
            let sheet = self
                .sheets
                .get_mut(name)
                .ok_or_else(|| TemplateError::NotFound(format!("Sheet name : {name}!!")))?;
            let sheet_no = i + 1;

            zip.start_file(format!("xl/worksheets/sheet{sheet_no}.xml"), options)?;
            let drawing_rel = layout[i].map(|_| "rId1");
            sheet.write_xml(&mut zip, drawing_rel)?;

            let Some((drawing_no, first_chart)) = layout[i] else {
                continue;
            };
            debug!(sheet = %name, drawing_no, charts = sheet.charts.len(), "writing drawing");

            zip_write_str(
                &mut zip,
                &format!("xl/worksheets/_rels/sheet{sheet_no}.xml.rels"),
                &relationships_xml(&[(REL_DRAWING, format!("../drawings/drawing{drawing_no}.xml"))]),
                options,
            )?;

            zip.start_file(format!("xl/drawings/drawing{drawing_no}.xml"), options)?;
            chart::writer::write_drawing(&mut zip, &sheet.charts)?;

            let chart_rels: Vec<(&str, String)> = (0..sheet.charts.len())
                .map(|k| (REL_CHART, format!("../charts/chart{}.xml", first_chart + k)))
                .collect();
            zip_write_str(
                &mut zip,
                &format!("xl/drawings/_rels/drawing{drawing_no}.xml.rels"),
                &relationships_xml(&chart_rels),
                options,
            )?;

            for (k, anchored) in sheet.charts.iter().enumerate() {
                zip.start_file(format!("xl/charts/chart{}.xml", first_chart + k), options)?;
                chart::writer::write_chart(&mut zip, &anchored.chart)?;
            }
        }

        let mut out = zip.finish()?;
        out.flush()?;
        Ok(())
    }
}

/// Temp file for the package, created with the mode a plain `fs::write`
/// would give the target (0666 minus the umask on Unix) unless `keep`
/// carries the permissions of the file being replaced.
fn package_tempfile(dir: &Path, keep: Option<Permissions>) -> std::io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(Permissions::from_mode(0o666));
    }
    let temp = builder.tempfile_in(dir)?;
    if let Some(perms) = keep {
        temp.as_file().set_permissions(perms)?;
    }
    Ok(temp)
}

pub(crate) fn make_cell_ref(row: u32, col: u32) -> String {
    format!("{}{}", col_to_letters(col), row)
}

/// Column letters for a 1-based column index: 1 -> `A`, 27 -> `AA`.
pub(crate) fn col_to_letters(mut col: u32) -> String {
    let mut result = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        result.push(char::from(b'A' + rem as u8));
        col = (col - 1) / 26;
    }
    result.iter().rev().collect()
}

/// Sheet name as it appears in a formula, always quoted.
pub(crate) fn sheet_ref(name: &str) -> String {
    format!("'{}'", name.replace('\'', "''"))
}

/// Escapes text for element content and double-quoted attributes.
pub(crate) fn xml_escape(s: &str) -> String {
    if !s.contains(['&', '<', '>', '"']) {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

pub(crate) fn write_cell<W: Write>(
    w: &mut W,
    cell_ref: &str,
    value: &CellValue,
    style_idx: Option<usize>,
) -> Result<()> {
    let s = match style_idx {
        Some(0) | None => String::new(),
        Some(n) => format!(" s=\"{n}\""),
    };

    match value {
        CellValue::Number(n) => {
            write!(w, "<c r=\"{cell_ref}\"{s}><v>{n}</v></c>")?;
        }
        CellValue::Text(text) => {
            let escaped = xml_escape(text);
            write!(
                w,
                "<c r=\"{cell_ref}\"{s} t=\"inlineStr\"><is><t>{escaped}</t></is></c>"
            )?;
        }
    }
    Ok(())
}

pub(crate) fn zip_write_str<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    path: &str,
    content: &str,
    options: SimpleFileOptions,
) -> Result<()> {
    zip.start_file(path, options)?;
    zip.write_all(content.as_bytes())?;
    Ok(())
}
