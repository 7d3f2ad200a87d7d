//! Builds the sample-temperature template workbook.

use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info};

use crate::{
    Result,
    config::TemplateConfig,
    error::TemplateError,
    reader::XlsxReader,
    workbook::builder::WorkbookBuilder,
};

pub mod chart;
pub mod grid;
pub mod labels;
pub mod sample;
pub mod sheets;

pub use chart::daily_chart;
pub use grid::{Grid, GridCell, apply_data_style, apply_header_style};
pub use labels::{day_label, time_label};
pub use sample::random_sample_value;
pub use sheets::{
    DAILY_SHEET, MONTHLY_SHEET, build_daily_sheet, build_daily_sheet_with_progress,
    build_monthly_sheet,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSummary {
    pub name: String,
    /// Rows including the header.
    pub rows: usize,
    /// Columns including the label column.
    pub cols: usize,
}

/// What [`generate`] wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub path: PathBuf,
    pub sheets: Vec<SheetSummary>,
    pub chart: bool,
}

fn summarize(grid: &Grid) -> SheetSummary {
    SheetSummary {
        name: grid.name.clone(),
        rows: grid.row_count(),
        cols: grid.header().len(),
    }
}

fn progress_bar(config: &TemplateConfig, rows: u64) -> ProgressBar {
    if !config.show_progress {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(rows);
    if let Ok(style) =
        ProgressStyle::with_template("{msg} [{bar:30.cyan/blue}] {pos}/{len} rows")
    {
        pb.set_style(style.progress_chars("=> "));
    }
    pb.set_message(DAILY_SHEET);
    pb
}

/// Builds both sheets, saves the workbook and checks the saved file.
pub fn generate(config: &TemplateConfig) -> Result<Report> {
    let mut rng = match config.seed {
        Some(seed) => {
            debug!(seed, "using fixed seed");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    };

    info!("building daily sheet");
    let pb = progress_bar(config, labels::SAMPLE_DATES.len() as u64);
    let daily = build_daily_sheet_with_progress(&mut rng, || pb.inc(1));
    pb.finish_and_clear();

    info!("building monthly sheet");
    let monthly = build_monthly_sheet(&mut rng);

    let mut workbook = WorkbookBuilder::new(config.output.clone())
        .set_sheets(vec![DAILY_SHEET, MONTHLY_SHEET])
        .build()?;

    for grid in [&daily, &monthly] {
        let sheet = workbook
            .get_sheet(&grid.name)
            .ok_or_else(|| TemplateError::NotFound(format!("Sheet name : {}!!", grid.name)))?;
        grid.write_to(sheet)?;
    }

    let with_chart = config.variant.with_chart();
    if with_chart {
        info!("attaching chart to {DAILY_SHEET}");
        let chart = daily_chart(&daily);
        debug!(series = chart.series.len(), "chart built");
        let sheet = workbook
            .get_sheet(DAILY_SHEET)
            .ok_or_else(|| TemplateError::NotFound(format!("Sheet name : {DAILY_SHEET}!!")))?;
        sheet.insert_chart(chart::CHART_ANCHOR_ROW, chart::CHART_ANCHOR_COL, chart);
    }

    info!(path = %workbook.output_path().display(), "saving workbook");
    let path = workbook.finish()?;

    let report = Report {
        path,
        sheets: vec![summarize(&daily), summarize(&monthly)],
        chart: with_chart,
    };
    verify(&report)?;
    info!(path = %report.path.display(), "template verified");
    Ok(report)
}

/// Reopens the saved file and checks it against `report`.
pub fn verify(report: &Report) -> Result<()> {
    let reader = XlsxReader::open(&report.path)?;

    let expected: Vec<&str> = report.sheets.iter().map(|s| s.name.as_str()).collect();
    if reader.sheet_names() != expected.as_slice() {
        return Err(TemplateError::Verification(format!(
            "expected sheets {expected:?}, found {:?}",
            reader.sheet_names()
        )));
    }

    for summary in &report.sheets {
        let rows = reader.rows(&summary.name)?;
        if rows.len() != summary.rows {
            return Err(TemplateError::Verification(format!(
                "sheet '{}' has {} rows, expected {}",
                summary.name,
                rows.len(),
                summary.rows
            )));
        }
        if let Some(row) = rows.iter().find(|r| r.cells.len() != summary.cols) {
            return Err(TemplateError::Verification(format!(
                "sheet '{}' row {} has {} cells, expected {}",
                summary.name,
                row.number,
                row.cells.len(),
                summary.cols
            )));
        }
        let label = rows
            .first()
            .and_then(|r| r.cells.first())
            .map(|c| c.value.as_str());
        if label != Some(labels::ROW_LABEL_HEADER) {
            return Err(TemplateError::Verification(format!(
                "sheet '{}' header starts with {label:?}",
                summary.name
            )));
        }
    }

    let has_chart = reader.has_part("xl/charts/chart1.xml");
    if has_chart != report.chart {
        return Err(TemplateError::Verification(format!(
            "chart part present: {has_chart}, expected: {}",
            report.chart
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;

    fn config(dir: &tempfile::TempDir, variant: Variant) -> TemplateConfig {
        let mut config = TemplateConfig::new(variant);
        config.output = dir.path().join("out.xlsx");
        config.seed = Some(7);
        config.show_progress = false;
        config
    }

    #[test]
    fn report_describes_both_sheets() {
        let dir = tempfile::tempdir().unwrap();
        let report = generate(&config(&dir, Variant::Base)).unwrap();

        assert_eq!(report.path, dir.path().join("out.xlsx"));
        assert!(!report.chart);
        assert_eq!(
            report.sheets,
            vec![
                SheetSummary { name: DAILY_SHEET.into(), rows: 10, cols: 1441 },
                SheetSummary { name: MONTHLY_SHEET.into(), rows: 10, cols: 32 },
            ]
        );
    }

    #[test]
    fn verify_rejects_a_report_that_does_not_match() {
        let dir = tempfile::tempdir().unwrap();
        let mut report = generate(&config(&dir, Variant::Chart)).unwrap();
        assert!(report.chart);
        verify(&report).unwrap();

        report.sheets[1].rows = 11;
        let err = verify(&report).unwrap_err();
        assert!(matches!(err, TemplateError::Verification(_)));

        report.sheets[1].rows = 10;
        report.chart = false;
        assert!(matches!(verify(&report), Err(TemplateError::Verification(_))));
    }

    #[test]
    fn same_seed_same_values() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let ra = generate(&config(&a, Variant::Base)).unwrap();
        let rb = generate(&config(&b, Variant::Base)).unwrap();

        let values = |path: &std::path::Path| {
            let reader = XlsxReader::open(path).unwrap();
            reader
                .rows(MONTHLY_SHEET)
                .unwrap()
                .iter()
                .map(|r| r.values().join(","))
                .collect::<Vec<_>>()
        };
        assert_eq!(values(&ra.path), values(&rb.path));
    }
}
