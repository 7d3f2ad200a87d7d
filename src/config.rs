use std::path::PathBuf;

/// Which template to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Both data sheets, no chart.
    Base,
    /// Both data sheets plus a line chart on the daily sheet.
    Chart,
}

impl Variant {
    pub fn default_output(self) -> &'static str {
        match self {
            Variant::Base => "chart-template-base.xlsx",
            Variant::Chart => "src/main/resources/excel-templates/chart-template.xlsx",
        }
    }

    pub fn with_chart(self) -> bool {
        matches!(self, Variant::Chart)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateConfig {
    pub variant: Variant,
    pub output: PathBuf,
    /// Fixed RNG seed; `None` draws from the OS.
    pub seed: Option<u64>,
    pub show_progress: bool,
}

impl TemplateConfig {
    pub fn new(variant: Variant) -> Self {
        TemplateConfig {
            variant,
            output: PathBuf::from(variant.default_output()),
            seed: None,
            show_progress: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_variant() {
        let base = TemplateConfig::new(Variant::Base);
        assert_eq!(base.output, PathBuf::from("chart-template-base.xlsx"));
        assert!(!base.variant.with_chart());
        assert!(base.seed.is_none());

        let chart = TemplateConfig::new(Variant::Chart);
        assert!(chart.output.ends_with("excel-templates/chart-template.xlsx"));
        assert!(chart.variant.with_chart());
        assert!(chart.show_progress);
    }
}
