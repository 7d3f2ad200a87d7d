use std::collections::HashMap;

use crate::workbook::style::{
    alignment::Alignment,
    border::{Border, BorderStyle},
    color::Color,
    fill::Fill,
    font::Font,
};
pub mod alignment;
pub mod border;
pub mod color;
pub mod fill;
pub mod font;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub font: Font,
    pub fill: Fill,
    pub border: Border,
    pub alignment: Alignment,
}

impl Style {
    pub fn new() -> Self {
        Style::default()
    }

    pub fn bold(mut self) -> Self {
        self.font.bold = true;
        self
    }

    pub fn bg(mut self, hex: &str) -> Self {
        self.fill = Fill::Solid(Color::new(hex));
        self
    }

    pub fn border_all(mut self, style: BorderStyle) -> Self {
        self.border = Border::all(style);
        self
    }
    /// Centered both horizontally and vertically.
    pub fn center(mut self) -> Self {
        self.alignment = Alignment::centered();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct XfKey {
    font_id: usize,
    fill_id: usize,
    border_id: usize,
    alignment: Alignment,
}

/// Interns fonts, fills, borders and cell formats so that every distinct
/// [`Style`] maps to one `cellXfs` index.
pub struct StyleRegistry {
    fonts: Vec<Font>,
    fills: Vec<Fill>,
    borders: Vec<Border>,
    font_index: HashMap<Font, usize>,
    fill_index: HashMap<Fill, usize>,
    border_index: HashMap<Border, usize>,
    xfs: Vec<XfKey>,
    xf_index: HashMap<XfKey, usize>,
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleRegistry {
    pub fn new() -> Self {
        let mut reg = StyleRegistry {
            fonts: Vec::new(),
            fills: Vec::new(),
            borders: Vec::new(),
            font_index: HashMap::new(),
            fill_index: HashMap::new(),
            border_index: HashMap::new(),
            xfs: Vec::new(),
            xf_index: HashMap::new(),
        };

        // fills 0 and 1 are fixed by the format
        reg.intern_font(Font::default());
        reg.intern_fill(Fill::None);
        reg.intern_fill(Fill::Gray125);
        reg.intern_border(Border::default());
        reg.intern_xf(XfKey {
            font_id: 0,
            fill_id: 0,
            border_id: 0,
            alignment: Alignment::default(),
        });

        reg
    }

    pub fn register(&mut self, style: &Style) -> usize {
        let key = XfKey {
            font_id: self.intern_font(style.font.clone()),
            fill_id: self.intern_fill(style.fill.clone()),
            border_id: self.intern_border(style.border.clone()),
            alignment: style.alignment,
        };
        self.intern_xf(key)
    }

    pub fn len(&self) -> usize {
        self.xfs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xfs.is_empty()
    }

    fn intern_font(&mut self, font: Font) -> usize {
        if let Some(&i) = self.font_index.get(&font) {
            return i;
        }
        let i = self.fonts.len();
        self.font_index.insert(font.clone(), i);
        self.fonts.push(font);
        i
    }

    fn intern_fill(&mut self, fill: Fill) -> usize {
        if let Some(&i) = self.fill_index.get(&fill) {
            return i;
        }
        let i = self.fills.len();
        self.fill_index.insert(fill.clone(), i);
        self.fills.push(fill);
        i
    }

    fn intern_border(&mut self, border: Border) -> usize {
        if let Some(&i) = self.border_index.get(&border) {
            return i;
        }
        let i = self.borders.len();
        self.border_index.insert(border.clone(), i);
        self.borders.push(border);
        i
    }

    fn intern_xf(&mut self, key: XfKey) -> usize {
        if let Some(&i) = self.xf_index.get(&key) {
            return i;
        }
        let i = self.xfs.len();
        self.xf_index.insert(key, i);
        self.xfs.push(key);
        i
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n");
        out.push_str(
            "<styleSheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">\n",
        );

        out.push_str(&format!("<fonts count=\"{}\">\n", self.fonts.len()));
        for font in &self.fonts {
            out.push_str(&format!("{}\n", font.to_xml()));
        }
        out.push_str("</fonts>\n");

        out.push_str(&format!("<fills count=\"{}\">\n", self.fills.len()));
        for fill in &self.fills {
            out.push_str(&format!("{}\n", fill.to_xml()));
        }
        out.push_str("</fills>\n");

        out.push_str(&format!("<borders count=\"{}\">\n", self.borders.len()));
        for border in &self.borders {
            out.push_str(&format!("{}\n", border.to_xml()));
        }
        out.push_str("</borders>\n");

        out.push_str("<cellStyleXfs count=\"1\">\n");
        out.push_str("<xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\"/>\n");
        out.push_str("</cellStyleXfs>\n");

        out.push_str(&format!("<cellXfs count=\"{}\">\n", self.xfs.len()));
        for xf in &self.xfs {
            out.push_str(&format!(
                "<xf numFmtId=\"0\" fontId=\"{}\" fillId=\"{}\" borderId=\"{}\" xfId=\"0\"",
                xf.font_id, xf.fill_id, xf.border_id
            ));
            if xf.font_id != 0 {
                out.push_str(" applyFont=\"1\"");
            }
            if xf.fill_id != 0 {
                out.push_str(" applyFill=\"1\"");
            }
            if xf.border_id != 0 {
                out.push_str(" applyBorder=\"1\"");
            }
            if xf.alignment.has_settings() {
                out.push_str(&format!(" applyAlignment=\"1\">{}</xf>\n", xf.alignment.to_xml()));
            } else {
                out.push_str("/>\n");
            }
        }
        out.push_str("</cellXfs>\n");

        out.push_str("<cellStyles count=\"1\">\n");
        out.push_str("<cellStyle name=\"Normal\" xfId=\"0\" builtinId=\"0\"/>\n");
        out.push_str("</cellStyles>\n");

        out.push_str("</styleSheet>");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_style_is_index_zero() {
        let mut reg = StyleRegistry::new();
        assert_eq!(reg.register(&Style::new()), 0);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn equal_styles_share_an_index() {
        let mut reg = StyleRegistry::new();
        let a = reg.register(&Style::new().bold().bg("D3D3D3").center());
        let b = reg.register(&Style::new().bold().bg("D3D3D3").center());
        let c = reg.register(&Style::new().center());
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn reserved_fills_come_first() {
        let mut reg = StyleRegistry::new();
        reg.register(&Style::new().bg("D3D3D3"));
        let xml = reg.to_xml();
        let none = xml.find(r#"patternType="none""#).unwrap();
        let gray = xml.find(r#"patternType="gray125""#).unwrap();
        let solid = xml.find(r#"patternType="solid""#).unwrap();
        assert!(none < gray && gray < solid);
        assert!(xml.contains("<fills count=\"3\">"));
    }

    #[test]
    fn alignment_is_written_inside_xf() {
        let mut reg = StyleRegistry::new();
        let idx = reg.register(&Style::new().center().border_all(BorderStyle::Thin));
        assert_eq!(idx, 1);
        let xml = reg.to_xml();
        assert!(xml.contains(
            r#"<xf numFmtId="0" fontId="0" fillId="0" borderId="1" xfId="0" applyBorder="1" applyAlignment="1"><alignment horizontal="center" vertical="center"/></xf>"#
        ));
    }
}
