//! Cell alignment.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerticalAlign {
    Top,
    Center,
    Bottom,
}

/// Horizontal and vertical placement of cell content. `None` leaves the
/// spreadsheet default in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Alignment {
    pub horizontal: Option<HorizontalAlign>,
    pub vertical: Option<VerticalAlign>,
}

impl Alignment {
    pub fn centered() -> Self {
        Alignment {
            horizontal: Some(HorizontalAlign::Center),
            vertical: Some(VerticalAlign::Center),
        }
    }

    pub fn has_settings(&self) -> bool {
        self.horizontal.is_some() || self.vertical.is_some()
    }

    /// The `<alignment>` child of an `<xf>` record, or an empty string.
    pub fn to_xml(&self) -> String {
        if !self.has_settings() {
            return String::new();
        }
        let mut xml = String::from("<alignment");
        if let Some(h) = self.horizontal {
            let v = match h {
                HorizontalAlign::Left => "left",
                HorizontalAlign::Center => "center",
                HorizontalAlign::Right => "right",
            };
            xml.push_str(&format!(" horizontal=\"{v}\""));
        }
        if let Some(v) = self.vertical {
            let v = match v {
                VerticalAlign::Top => "top",
                VerticalAlign::Center => "center",
                VerticalAlign::Bottom => "bottom",
            };
            xml.push_str(&format!(" vertical=\"{v}\""));
        }
        xml.push_str("/>");
        xml
    }
}
