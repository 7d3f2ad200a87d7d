//! Command-line front end shared by both binaries.

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;

use crate::{
    config::{TemplateConfig, Variant},
    error::TemplateError,
    logging::init_logging,
    template::{Report, generate},
};

#[derive(Parser, Debug)]
#[command(version, about = "Generate the temperature chart template workbook")]
pub struct Args {
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(PathBuf),
        help = "Output file (defaults to the variant's template path)"
    )]
    pub output: Option<PathBuf>,

    #[arg(long, help = "Seed the sample values for a reproducible file")]
    pub seed: Option<u64>,

    #[arg(short, long, help = "Hide the progress bar")]
    pub quiet: bool,
}

impl Args {
    pub fn into_config(self, variant: Variant) -> TemplateConfig {
        let mut config = TemplateConfig::new(variant);
        if let Some(output) = self.output {
            config.output = output;
        }
        config.seed = self.seed;
        config.show_progress = !self.quiet;
        config
    }
}

fn banner(variant: Variant) -> &'static str {
    match variant {
        Variant::Base => "Creating base Excel template",
        Variant::Chart => "Creating Excel chart template",
    }
}

fn print_summary(report: &Report) {
    println!("Template created: {}", report.path.display());
    for sheet in &report.sheets {
        println!("  - {}: {} rows x {} columns", sheet.name, sheet.rows, sheet.cols);
    }
    if report.chart {
        println!("  - line chart attached to the daily sheet");
    }
    println!();
    println!("Next steps:");
    println!("  1. Open the file in your spreadsheet application and check the layout.");
    if report.chart {
        println!("  2. Adjust the chart style if needed and save.");
    } else {
        println!("  2. Add a line chart over the daily data (B1:BI10) and save.");
    }
    println!("  3. Replace the sample values with real data when filling the template.");
}

fn print_failure(e: &TemplateError) {
    eprintln!("Failed to create template: {e}");
    if e.is_permission_denied() {
        eprintln!("The file may be open in another program. Close it and try again.");
    }
}

/// Parses the command line, generates `variant` and reports the outcome.
pub fn run(variant: Variant) -> ExitCode {
    let config = Args::parse().into_config(variant);
    init_logging("info");

    println!("{}", banner(variant));
    println!("{}", "=".repeat(50));

    match generate(&config) {
        Ok(report) => {
            print_summary(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "template generation failed");
            print_failure(&e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from(["create-template", "-o", "x.xlsx", "--seed", "5", "-q"])
            .unwrap();
        let config = args.into_config(Variant::Chart);
        assert_eq!(config.output, PathBuf::from("x.xlsx"));
        assert_eq!(config.seed, Some(5));
        assert!(!config.show_progress);
        assert_eq!(config.variant, Variant::Chart);
    }

    #[test]
    fn no_flags_keeps_variant_defaults() {
        let args = Args::try_parse_from(["create-template-simple"]).unwrap();
        assert_eq!(args.into_config(Variant::Base), TemplateConfig::new(Variant::Base));
    }
}
