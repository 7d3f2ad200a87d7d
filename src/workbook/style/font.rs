use crate::workbook::xml_escape;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Font {
    pub bold: bool,
    /// Size in twentieths of a point.
    pub size: u32,
    pub name: String,
}

impl Default for Font {
    fn default() -> Self {
        Font {
            bold: false,
            size: 220,
            name: "Calibri".into(),
        }
    }
}

impl Font {
    pub fn to_xml(&self) -> String {
        let mut xml = String::from("<font>");
        if self.bold {
            xml.push_str("<b/>");
        }
        xml.push_str(&format!("<sz val=\"{}\"/>", self.size as f64 / 20.0));
        xml.push_str(&format!("<name val=\"{}\"/>", xml_escape(&self.name)));
        xml.push_str("<family val=\"2\"/></font>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_precedes_size() {
        let font = Font {
            bold: true,
            ..Font::default()
        };
        assert_eq!(
            font.to_xml(),
            r#"<font><b/><sz val="11"/><name val="Calibri"/><family val="2"/></font>"#
        );
    }
}
