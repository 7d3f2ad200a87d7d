#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderStyle {
    #[default]
    None,
    Thin,
    Medium,
    Thick,
}

impl BorderStyle {
    fn as_xml_attr(&self) -> Option<&'static str> {
        match self {
            BorderStyle::None => None,
            BorderStyle::Thin => Some("thin"),
            BorderStyle::Medium => Some("medium"),
            BorderStyle::Thick => Some("thick"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Border {
    pub left: BorderStyle,
    pub right: BorderStyle,
    pub top: BorderStyle,
    pub bottom: BorderStyle,
}

impl Border {
    /// Same style on all four sides.
    pub fn all(style: BorderStyle) -> Self {
        Border {
            left: style,
            right: style,
            top: style,
            bottom: style,
        }
    }

    fn side_xml(tag: &str, style: BorderStyle) -> String {
        match style.as_xml_attr() {
            None => format!("<{tag}/>"),
            // automatic color renders black
            Some(s) => format!("<{tag} style=\"{s}\"><color auto=\"1\"/></{tag}>"),
        }
    }

    pub fn to_xml(&self) -> String {
        format!(
            "<border>{}{}{}{}<diagonal/></border>",
            Self::side_xml("left", self.left),
            Self::side_xml("right", self.right),
            Self::side_xml("top", self.top),
            Self::side_xml("bottom", self.bottom),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thin_box_writes_all_sides() {
        let xml = Border::all(BorderStyle::Thin).to_xml();
        for side in ["left", "right", "top", "bottom"] {
            assert!(xml.contains(&format!("<{side} style=\"thin\">")), "{side} missing in {xml}");
        }
    }

    #[test]
    fn default_border_is_empty() {
        assert_eq!(
            Border::default().to_xml(),
            "<border><left/><right/><top/><bottom/><diagonal/></border>"
        );
    }
}
