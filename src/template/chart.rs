use crate::template::grid::Grid;
use crate::workbook::chart::{CellRange, ChartSeries, LineChart};

/// Number of time columns the chart plots, i.e. the first hour.
pub const CHART_WINDOW: u32 = 60;
/// The chart's top-left corner sits on `A12`, below the data table.
pub const CHART_ANCHOR_ROW: u32 = 12;
pub const CHART_ANCHOR_COL: u32 = 1;

/// Line chart of the daily sheet: one series per sample row over the first
/// [`CHART_WINDOW`] minutes. Every series shares the header row as categories.
pub fn daily_chart(grid: &Grid) -> LineChart {
    let last_col = CHART_WINDOW + 1;
    let categories = CellRange::row(&grid.name, 1, 2, last_col);
    let category_cache: Vec<String> = (2..=last_col)
        .filter_map(|col| grid.cell(1, col))
        .filter_map(|c| c.value.as_text().map(str::to_string))
        .collect();

    let mut chart = LineChart::new()
        .title("일간 온도 추이")
        .style(2)
        .x_axis_title("시간")
        .y_axis_title("온도 (°C)")
        .size_cm(25.0, 15.0);

    for row in 2..=grid.row_count() as u32 {
        let name = grid
            .cell(row, 1)
            .and_then(|c| c.value.as_text())
            .map(|label| (CellRange::cell(&grid.name, row, 1), label.to_string()));
        let value_cache = (2..=last_col)
            .filter_map(|col| grid.cell(row, col))
            .filter_map(|c| c.value.as_number())
            .collect();

        chart.add_series(ChartSeries {
            name,
            categories: categories.clone(),
            category_cache: category_cache.clone(),
            values: CellRange::row(&grid.name, row, 2, last_col),
            value_cache,
        });
    }
    chart
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::sheets::build_daily_sheet;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn one_series_per_sample_row_over_first_hour() {
        let mut rng = StdRng::seed_from_u64(9);
        let grid = build_daily_sheet(&mut rng);
        let chart = daily_chart(&grid);

        assert_eq!(chart.series.len(), 9);
        for (i, series) in chart.series.iter().enumerate() {
            let row = i as u32 + 2;
            assert_eq!(series.categories.to_formula(), "'일간 데이터'!$B$1:$BI$1");
            assert_eq!(series.values, CellRange::row("일간 데이터", row, 2, 61));
            assert_eq!(series.category_cache.len(), 60);
            assert_eq!(series.category_cache.first().map(String::as_str), Some("0:00"));
            assert_eq!(series.category_cache.last().map(String::as_str), Some("0:59"));
            assert_eq!(series.value_cache.len(), 60);
            assert_eq!(
                series.value_cache[0],
                grid.cell(row, 2).and_then(|c| c.value.as_number()).unwrap()
            );
        }
        let (_, first_name) = chart.series[0].name.as_ref().unwrap();
        assert_eq!(first_name, "2025-10-16");
    }
}
