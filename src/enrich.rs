use chrono::{Datelike, NaiveDate};

use crate::error::LoadError;
use crate::models::{Column, DailyRecord, EnrichedRecord, WEEKDAY_NAMES};

/// Monday = 0 ... Sunday = 6.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_monday() as u8
}

pub fn weekday_name(index: u8) -> &'static str {
    WEEKDAY_NAMES[usize::from(index) % WEEKDAY_NAMES.len()]
}

/// Derives weekday labels, daily tests/lag and the running totals.
///
/// Cumulative fields at row `i` include row `i` itself. Row order is kept
/// as given; a negative lag is carried through unchanged. Any derived value
/// that leaves the `i64` range fails the whole table.
pub fn enrich(records: &[DailyRecord]) -> Result<Vec<EnrichedRecord>, LoadError> {
    let mut collected = 0i64;
    let mut tested = 0i64;
    let mut positive = 0i64;
    let mut lag_total = 0i64;

    let mut enriched = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let overflow = |column: Column| LoadError::Overflow {
            row: index + 1,
            column: column.name(),
        };

        let tests = record
            .negative
            .checked_add(record.positive)
            .ok_or_else(|| overflow(Column::DailyTests))?;
        let lag = record
            .collected_samples
            .checked_sub(tests)
            .ok_or_else(|| overflow(Column::DailyLag))?;

        collected = collected
            .checked_add(record.collected_samples)
            .ok_or_else(|| overflow(Column::CumulativeCollectedSamples))?;
        tested = tested
            .checked_add(tests)
            .ok_or_else(|| overflow(Column::SamplesTestedTillToday))?;
        positive = positive
            .checked_add(record.positive)
            .ok_or_else(|| overflow(Column::CumulativePositive))?;
        lag_total = lag_total
            .checked_add(lag)
            .ok_or_else(|| overflow(Column::CumulativeLag))?;

        let weekday_index = weekday_index(record.date);
        enriched.push(EnrichedRecord {
            date: record.date,
            weekday_index,
            weekday: weekday_name(weekday_index),
            collected_samples: record.collected_samples,
            negative: record.negative,
            positive: record.positive,
            in_observation: record.in_observation,
            discharge: record.discharge,
            cumulative_collected: collected,
            tests,
            cumulative_tests: tested,
            cumulative_positive: positive,
            lag,
            cumulative_lag: lag_total,
        });
    }

    Ok(enriched)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32, counts: [i64; 5]) -> DailyRecord {
        DailyRecord {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            collected_samples: counts[0],
            negative: counts[1],
            positive: counts[2],
            in_observation: counts[3],
            discharge: counts[4],
        }
    }

    #[test]
    fn two_day_scenario_matches_expected_totals() {
        let input = vec![
            day(2020, 9, 1, [100, 90, 5, 20, 3]),
            day(2020, 9, 2, [110, 95, 8, 25, 4]),
        ];
        let out = enrich(&input).unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].tests, 95);
        assert_eq!(out[0].lag, 5);
        assert_eq!(out[0].cumulative_collected, 100);
        assert_eq!(out[0].cumulative_tests, 95);
        assert_eq!(out[0].cumulative_positive, 5);
        assert_eq!(out[0].cumulative_lag, 5);

        assert_eq!(out[1].tests, 103);
        assert_eq!(out[1].lag, 7);
        assert_eq!(out[1].cumulative_collected, 210);
        assert_eq!(out[1].cumulative_tests, 198);
        assert_eq!(out[1].cumulative_positive, 13);
        assert_eq!(out[1].cumulative_lag, 12);
    }

    #[test]
    fn weekday_follows_the_calendar() {
        let monday = NaiveDate::from_ymd_opt(2020, 9, 7).unwrap();
        let saturday = NaiveDate::from_ymd_opt(2020, 9, 12).unwrap();
        assert_eq!(weekday_index(monday), 0);
        assert_eq!(weekday_name(0), "Mon");
        assert_eq!(weekday_index(saturday), 5);
        assert_eq!(weekday_name(5), "Sat");

        let out = enrich(&[day(2020, 9, 13, [1, 1, 0, 0, 0])]).unwrap();
        assert_eq!(out[0].weekday_index, 6);
        assert_eq!(out[0].weekday, "Sun");
    }

    #[test]
    fn prefix_sums_hold_for_every_row_and_order_is_kept() {
        let input: Vec<DailyRecord> = (0..20)
            .map(|i| {
                let i = i as i64;
                day(
                    2020,
                    10,
                    20 - i as u32,
                    [50 + i * 7, 30 + i, (i * 3) % 11, i, i % 4],
                )
            })
            .collect();
        let out = enrich(&input).unwrap();

        assert_eq!(out.len(), input.len());
        for (i, row) in out.iter().enumerate() {
            assert_eq!(row.date, input[i].date);
            assert_eq!(row.tests, input[i].negative + input[i].positive);
            assert_eq!(row.lag, input[i].collected_samples - row.tests);

            let upto = &out[..=i];
            assert_eq!(row.cumulative_collected, upto.iter().map(|r| r.collected_samples).sum::<i64>());
            assert_eq!(row.cumulative_tests, upto.iter().map(|r| r.tests).sum::<i64>());
            assert_eq!(row.cumulative_positive, upto.iter().map(|r| r.positive).sum::<i64>());
            assert_eq!(row.cumulative_lag, upto.iter().map(|r| r.lag).sum::<i64>());
        }
    }

    #[test]
    fn tests_above_collection_give_negative_lag() {
        let out = enrich(&[
            day(2020, 9, 1, [10, 12, 3, 0, 0]),
            day(2020, 9, 2, [20, 10, 2, 0, 0]),
        ])
        .unwrap();
        assert_eq!(out[0].lag, -5);
        assert_eq!(out[0].cumulative_lag, -5);
        assert_eq!(out[1].cumulative_lag, 3);
    }

    #[test]
    fn rerunning_on_own_source_fields_is_identical() {
        let input = vec![
            day(2020, 9, 5, [40, 30, 2, 9, 1]),
            day(2020, 9, 6, [35, 33, 1, 8, 2]),
            day(2020, 9, 7, [60, 41, 4, 12, 0]),
        ];
        let first = enrich(&input).unwrap();
        let replay: Vec<DailyRecord> = first.iter().map(EnrichedRecord::daily).collect();
        assert_eq!(enrich(&replay).unwrap(), first);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(enrich(&[]).unwrap().is_empty());
    }

    #[test]
    fn daily_tests_beyond_i64_is_an_overflow_error() {
        let err = enrich(&[day(2020, 9, 1, [1, i64::MAX, 1, 0, 0])]).unwrap_err();
        assert!(matches!(err, LoadError::Overflow { row: 1, column: "Daily_Tests" }));
    }

    #[test]
    fn running_total_beyond_i64_is_an_overflow_error() {
        let big = i64::MAX / 2 + 1;
        let err = enrich(&[
            day(2020, 9, 1, [big, 0, 0, 0, 0]),
            day(2020, 9, 2, [big, 0, 0, 0, 0]),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            LoadError::Overflow { row: 2, column: "Cumulative_Collected_Samples" }
        ));
    }

    #[test]
    fn lag_below_i64_is_an_overflow_error() {
        let err = enrich(&[day(2020, 9, 1, [i64::MIN, 0, 1, 0, 0])]).unwrap_err();
        assert!(matches!(err, LoadError::Overflow { row: 1, column: "Daily_Lag" }));
    }
}
