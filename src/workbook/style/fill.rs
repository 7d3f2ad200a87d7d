use crate::workbook::style::color::Color;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Fill {
    #[default]
    None,
    /// Reserved second slot every `styles.xml` must carry.
    Gray125,
    Solid(Color),
}

impl Fill {
    pub fn to_xml(&self) -> String {
        match self {
            Fill::None => r#"<fill><patternFill patternType="none"/></fill>"#.into(),
            Fill::Gray125 => r#"<fill><patternFill patternType="gray125"/></fill>"#.into(),
            Fill::Solid(c) => format!(
                r#"<fill><patternFill patternType="solid"><fgColor rgb="{argb}"/><bgColor rgb="{argb}"/></patternFill></fill>"#,
                argb = c.as_argb()
            ),
        }
    }
}
