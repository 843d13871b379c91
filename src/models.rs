use chrono::NaiveDate;
use serde::Serialize;

/// Short weekday names indexed by days-from-Monday.
pub const WEEKDAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// One row of the source file, mapped by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub collected_samples: i64,
    pub negative: i64,
    pub positive: i64,
    pub in_observation: i64,
    pub discharge: i64,
}

/// A daily record plus the weekday and derived counters.
///
/// Field order is the export column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedRecord {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Weekday_Index")]
    pub weekday_index: u8,
    #[serde(rename = "Weekday")]
    pub weekday: &'static str,
    #[serde(rename = "Daily_Collected_Samples")]
    pub collected_samples: i64,
    #[serde(rename = "Daily_Negative")]
    pub negative: i64,
    #[serde(rename = "Daily_Positive")]
    pub positive: i64,
    #[serde(rename = "People_In_Observation")]
    pub in_observation: i64,
    #[serde(rename = "Daily_Discharge")]
    pub discharge: i64,
    #[serde(rename = "Cumulative_Collected_Samples")]
    pub cumulative_collected: i64,
    #[serde(rename = "Daily_Tests")]
    pub tests: i64,
    #[serde(rename = "Samples_Tested_Till_Today")]
    pub cumulative_tests: i64,
    #[serde(rename = "Cumulative_Positive")]
    pub cumulative_positive: i64,
    #[serde(rename = "Daily_Lag")]
    pub lag: i64,
    #[serde(rename = "Cumulative_Lag")]
    pub cumulative_lag: i64,
}

impl EnrichedRecord {
    /// The six source fields this row was derived from.
    #[cfg(test)]
    pub fn daily(&self) -> DailyRecord {
        DailyRecord {
            date: self.date,
            collected_samples: self.collected_samples,
            negative: self.negative,
            positive: self.positive,
            in_observation: self.in_observation,
            discharge: self.discharge,
        }
    }

    pub fn value(&self, column: Column) -> i64 {
        match column {
            Column::DailyCollectedSamples => self.collected_samples,
            Column::DailyNegative => self.negative,
            Column::DailyPositive => self.positive,
            Column::PeopleInObservation => self.in_observation,
            Column::DailyDischarge => self.discharge,
            Column::CumulativeCollectedSamples => self.cumulative_collected,
            Column::DailyTests => self.tests,
            Column::SamplesTestedTillToday => self.cumulative_tests,
            Column::CumulativePositive => self.cumulative_positive,
            Column::DailyLag => self.lag,
            Column::CumulativeLag => self.cumulative_lag,
        }
    }
}

/// Numeric columns that can be plotted against the date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    DailyCollectedSamples,
    DailyNegative,
    DailyPositive,
    PeopleInObservation,
    DailyDischarge,
    CumulativeCollectedSamples,
    DailyTests,
    SamplesTestedTillToday,
    CumulativePositive,
    DailyLag,
    CumulativeLag,
}

impl Column {
    /// Dropdown order.
    pub const ALL: [Column; 11] = [
        Column::DailyCollectedSamples,
        Column::DailyNegative,
        Column::DailyPositive,
        Column::PeopleInObservation,
        Column::DailyDischarge,
        Column::CumulativeCollectedSamples,
        Column::DailyTests,
        Column::SamplesTestedTillToday,
        Column::CumulativePositive,
        Column::DailyLag,
        Column::CumulativeLag,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::DailyCollectedSamples => "Daily_Collected_Samples",
            Column::DailyNegative => "Daily_Negative",
            Column::DailyPositive => "Daily_Positive",
            Column::PeopleInObservation => "People_In_Observation",
            Column::DailyDischarge => "Daily_Discharge",
            Column::CumulativeCollectedSamples => "Cumulative_Collected_Samples",
            Column::DailyTests => "Daily_Tests",
            Column::SamplesTestedTillToday => "Samples_Tested_Till_Today",
            Column::CumulativePositive => "Cumulative_Positive",
            Column::DailyLag => "Daily_Lag",
            Column::CumulativeLag => "Cumulative_Lag",
        }
    }

    pub fn from_name(name: &str) -> Option<Column> {
        Column::ALL.into_iter().find(|column| column.name() == name)
    }
}

/// Immutable enriched table shared by every request.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<EnrichedRecord>,
}

impl Dataset {
    pub fn new(records: Vec<EnrichedRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[EnrichedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.records.iter().map(|record| record.date).collect()
    }

    pub fn series(&self, column: Column) -> Vec<i64> {
        self.records.iter().map(|record| record.value(column)).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekdaySummary {
    pub weekday_index: u8,
    pub weekday: &'static str,
    pub days: usize,
    pub collected_samples: i128,
    pub tests: i128,
}

impl WeekdaySummary {
    pub fn mean_tests(&self) -> f64 {
        mean(self.tests, self.days)
    }

    pub fn mean_collected(&self) -> f64 {
        mean(self.collected_samples, self.days)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LagSummary {
    pub final_cumulative_lag: i64,
    pub days_with_backlog: usize,
    pub growing: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insights {
    pub days: usize,
    pub positivity_rate: Option<f64>,
    pub weekdays: Vec<WeekdaySummary>,
    pub weekend_mean_tests: f64,
    pub workweek_mean_tests: f64,
    pub weekend_mean_collected: f64,
    pub workweek_mean_collected: f64,
    pub busiest_testing_days: Vec<&'static str>,
    pub lag: LagSummary,
}

pub(crate) fn mean(total: i128, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_names_round_trip_through_lookup() {
        for column in Column::ALL {
            assert_eq!(Column::from_name(column.name()), Some(column));
        }
    }

    #[test]
    fn unknown_or_empty_column_is_rejected() {
        assert_eq!(Column::from_name(""), None);
        assert_eq!(Column::from_name("daily_positive"), None);
        assert_eq!(Column::from_name("Weekday"), None);
        assert_eq!(Column::from_name("Date"), None);
    }

    #[test]
    fn mean_of_nothing_is_zero() {
        assert_eq!(mean(10, 0), 0.0);
        assert_eq!(mean(10, 4), 2.5);
    }
}
