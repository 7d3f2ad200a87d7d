//! Header labels and the fixed row labels of the sample data.

pub const MINUTES_PER_DAY: u32 = 1440;
pub const DAYS_PER_MONTH: u32 = 31;

/// Label of column 1 in both header rows.
pub const ROW_LABEL_HEADER: &str = "날짜명";

pub const SAMPLE_DATES: [&str; 9] = [
    "2025-10-16",
    "2025-10-15",
    "2025-10-14",
    "2025-10-13",
    "2025-10-12",
    "2025-10-11",
    "2025-10-10",
    "2025-10-09",
    "2025-10-08",
];

pub const SAMPLE_MONTHS: [&str; 9] = [
    "2025-09", "2025-08", "2025-07", "2025-06", "2025-05", "2025-04", "2025-03", "2025-02",
    "2025-01",
];

/// `H:MM` for a minute offset into the day, e.g. 125 -> `2:05`.
pub fn time_label(minute: u32) -> String {
    format!("{}:{:02}", minute / 60, minute % 60)
}

/// `D일` for a day of the month.
pub fn day_label(day: u32) -> String {
    format!("{day}일")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_labels() {
        assert_eq!(time_label(0), "0:00");
        assert_eq!(time_label(59), "0:59");
        assert_eq!(time_label(60), "1:00");
        assert_eq!(time_label(125), "2:05");
        assert_eq!(time_label(1439), "23:59");
    }

    #[test]
    fn every_minute_has_a_distinct_label() {
        let labels: std::collections::HashSet<_> = (0..MINUTES_PER_DAY).map(time_label).collect();
        assert_eq!(labels.len(), MINUTES_PER_DAY as usize);
        for m in 0..MINUTES_PER_DAY {
            let label = time_label(m);
            let (h, mm) = label.split_once(':').unwrap();
            assert_eq!(h.parse::<u32>().unwrap(), m / 60);
            assert_eq!(mm.len(), 2);
            assert_eq!(mm.parse::<u32>().unwrap(), m % 60);
        }
    }

    #[test]
    fn day_labels() {
        assert_eq!(day_label(1), "1일");
        assert_eq!(day_label(31), "31일");
    }

    #[test]
    fn sample_rows_descend() {
        assert!(SAMPLE_DATES.windows(2).all(|w| w[0] > w[1]));
        assert!(SAMPLE_MONTHS.windows(2).all(|w| w[0] > w[1]));
    }
}
