//! The two sheets of the template.

use rand::Rng;
use tracing::debug;

use crate::template::{
    grid::{Grid, GridCell, apply_data_style, apply_header_style},
    labels::{
        DAYS_PER_MONTH, MINUTES_PER_DAY, ROW_LABEL_HEADER, SAMPLE_DATES, SAMPLE_MONTHS, day_label,
        time_label,
    },
    sample::random_sample_value,
};

pub const DAILY_SHEET: &str = "일간 데이터";
pub const MONTHLY_SHEET: &str = "월간 데이터";

const LABEL_COLUMN_WIDTH: f64 = 12.0;
const VALUE_COLUMN_WIDTH: f64 = 6.0;
/// Only the first hour of the daily sheet gets narrow columns.
const DAILY_NARROW_COLUMNS: u32 = 60;

fn header_row<I: IntoIterator<Item = String>>(labels: I) -> Vec<GridCell> {
    std::iter::once(ROW_LABEL_HEADER.to_string())
        .chain(labels)
        .map(|label| {
            let mut cell = GridCell::text(label);
            apply_header_style(&mut cell);
            cell
        })
        .collect()
}

fn data_row<R: Rng + ?Sized>(rng: &mut R, label: &str, width: u32) -> Vec<GridCell> {
    let mut row = Vec::with_capacity(width as usize + 1);
    row.push(GridCell::text(label));
    row.extend((0..width).map(|_| GridCell::number(random_sample_value(rng))));
    for cell in &mut row {
        apply_data_style(cell);
    }
    row
}

pub fn build_daily_sheet<R: Rng + ?Sized>(rng: &mut R) -> Grid {
    build_daily_sheet_with_progress(rng, || {})
}

/// Builds the daily sheet, calling `on_row` after each sample row.
pub fn build_daily_sheet_with_progress<R, F>(rng: &mut R, mut on_row: F) -> Grid
where
    R: Rng + ?Sized,
    F: FnMut(),
{
    let mut grid = Grid::new(DAILY_SHEET);
    grid.push_row(header_row((0..MINUTES_PER_DAY).map(time_label)));
    debug!(labels = MINUTES_PER_DAY, "daily header built");

    for date in SAMPLE_DATES {
        grid.push_row(data_row(rng, date, MINUTES_PER_DAY));
        debug!(%date, "daily row built");
        on_row();
    }

    grid.set_column_width(1, 1, LABEL_COLUMN_WIDTH);
    grid.set_column_width(2, DAILY_NARROW_COLUMNS + 1, VALUE_COLUMN_WIDTH);
    grid
}

pub fn build_monthly_sheet<R: Rng + ?Sized>(rng: &mut R) -> Grid {
    let mut grid = Grid::new(MONTHLY_SHEET);
    grid.push_row(header_row((1..=DAYS_PER_MONTH).map(day_label)));

    for month in SAMPLE_MONTHS {
        grid.push_row(data_row(rng, month, DAYS_PER_MONTH));
    }

    grid.set_column_width(1, 1, LABEL_COLUMN_WIDTH);
    grid.set_column_width(2, DAYS_PER_MONTH + 1, VALUE_COLUMN_WIDTH);
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::grid::{data_style, header_style};
    use rand::{SeedableRng, rngs::StdRng};

    fn assert_shape(grid: &Grid, columns: usize, labels: &[&str]) {
        assert_eq!(grid.header().len(), columns + 1);
        assert_eq!(grid.data_rows().len(), 9);
        for (row, label) in grid.data_rows().iter().zip(labels) {
            assert_eq!(row.len(), columns + 1);
            assert_eq!(row[0].value.as_text(), Some(*label));
            for cell in &row[1..] {
                let v = cell.value.as_number().unwrap();
                assert!((24.0..=25.0).contains(&v));
            }
        }
    }

    fn assert_styles(grid: &Grid) {
        let header = header_style();
        let data = data_style();
        assert!(grid.header().iter().all(|c| c.style == header));
        assert!(grid.data_rows().iter().flatten().all(|c| c.style == data));
    }

    #[test]
    fn daily_sheet_shape() {
        let mut rng = StdRng::seed_from_u64(1);
        let grid = build_daily_sheet(&mut rng);
        assert_eq!(grid.name, DAILY_SHEET);
        assert_shape(&grid, 1440, &SAMPLE_DATES);
        assert_styles(&grid);

        let header = grid.header();
        assert_eq!(header[0].value.as_text(), Some("날짜명"));
        assert_eq!(header[1].value.as_text(), Some("0:00"));
        assert_eq!(header[126].value.as_text(), Some("2:05"));
        assert_eq!(header[1440].value.as_text(), Some("23:59"));
        assert_eq!(grid.column_widths, vec![(1, 1, 12.0), (2, 61, 6.0)]);
    }

    #[test]
    fn monthly_sheet_shape() {
        let mut rng = StdRng::seed_from_u64(2);
        let grid = build_monthly_sheet(&mut rng);
        assert_eq!(grid.name, MONTHLY_SHEET);
        assert_shape(&grid, 31, &SAMPLE_MONTHS);
        assert_styles(&grid);

        let labels: Vec<_> = grid.header()[1..]
            .iter()
            .filter_map(|c| c.value.as_text())
            .collect();
        let expected: Vec<String> = (1..=31).map(|d| format!("{d}일")).collect();
        assert_eq!(labels, expected);
        assert_eq!(grid.column_widths, vec![(1, 1, 12.0), (2, 32, 6.0)]);
    }

    #[test]
    fn progress_callback_runs_once_per_row() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut calls = 0;
        build_daily_sheet_with_progress(&mut rng, || calls += 1);
        assert_eq!(calls, 9);
    }
}
