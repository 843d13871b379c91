//! Chart descriptions serialized in the shape Plotly.js expects
//! (`{"data": [...], "layout": {...}}`).

use serde::Serialize;
use tracing::debug;

use crate::models::{Column, Dataset};

const AXIS_VALUE_TITLE: &str = "Number of people";

pub const DAILY_COLUMNS: [Column; 6] = [
    Column::DailyCollectedSamples,
    Column::DailyNegative,
    Column::DailyPositive,
    Column::PeopleInObservation,
    Column::DailyDischarge,
    Column::DailyTests,
];

pub const CUMULATIVE_COLUMNS: [Column; 4] = [
    Column::CumulativeCollectedSamples,
    Column::SamplesTestedTillToday,
    Column::CumulativePositive,
    Column::CumulativeLag,
];

pub const BAR_COLUMNS: [Column; 4] = [
    Column::DailyCollectedSamples,
    Column::DailyNegative,
    Column::DailyPositive,
    Column::DailyTests,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    Scatter,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: TraceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub x: Vec<String>,
    pub y: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Text {
    pub text: String,
}

impl Text {
    fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Text>,
    pub showgrid: bool,
    pub showline: bool,
    pub ticks: &'static str,
}

impl Axis {
    /// Plain axis with an outside tick line, as in the "simple_white" look.
    fn simple_white(title: Option<&str>) -> Self {
        Self {
            title: title.map(Text::new),
            showgrid: false,
            showline: true,
            ticks: "outside",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub title: Text,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Text,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_bgcolor: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

fn date_axis(dataset: &Dataset) -> Vec<String> {
    dataset
        .dates()
        .iter()
        .map(|date| date.format("%Y-%m-%d").to_string())
        .collect()
}

/// One trace per column against the date, styled like the static dashboard charts.
pub fn multi_series(
    dataset: &Dataset,
    title: &str,
    legend_title: &str,
    columns: &[Column],
    kind: TraceKind,
) -> Figure {
    let x = date_axis(dataset);
    let data = columns
        .iter()
        .map(|column| Trace {
            kind,
            mode: (kind == TraceKind::Scatter).then_some("lines"),
            name: Some(column.name().to_string()),
            x: x.clone(),
            y: dataset.series(*column),
        })
        .collect();

    Figure {
        data,
        layout: Layout {
            title: Text::new(title),
            xaxis: Some(Axis::simple_white(Some("Date"))),
            yaxis: Some(Axis::simple_white(Some(AXIS_VALUE_TITLE))),
            legend: Some(Legend {
                title: Text::new(legend_title),
            }),
            barmode: (kind == TraceKind::Bar).then_some("group"),
            plot_bgcolor: Some("white"),
        },
    }
}

pub fn daily_figure(dataset: &Dataset) -> Figure {
    multi_series(dataset, "Covid-19 - Daily Plots", "Label", &DAILY_COLUMNS, TraceKind::Scatter)
}

pub fn cumulative_figure(dataset: &Dataset) -> Figure {
    multi_series(
        dataset,
        "Covid-19 - Cumulative Plots",
        "Patient type",
        &CUMULATIVE_COLUMNS,
        TraceKind::Scatter,
    )
}

pub fn bar_figure(dataset: &Dataset) -> Figure {
    multi_series(
        dataset,
        "COVID-19 CARE CENTRES Daily Plots - Bar Representation",
        "Patient type",
        &BAR_COLUMNS,
        TraceKind::Bar,
    )
}

/// Chart for whichever column the dropdown currently names.
///
/// An empty or unknown name gives a single empty trace; the title keeps the
/// selection text either way.
pub fn selection_figure(dataset: &Dataset, selection: &str) -> Figure {
    let (x, y) = match Column::from_name(selection) {
        Some(column) => (date_axis(dataset), dataset.series(column)),
        None => {
            debug!(selection, "no such column, rendering empty chart");
            (Vec::new(), Vec::new())
        }
    };

    Figure {
        data: vec![Trace {
            kind: TraceKind::Scatter,
            mode: None,
            name: None,
            x,
            y,
        }],
        layout: Layout {
            title: Text::new(format!("Covid care centre report for  {selection}")),
            xaxis: None,
            yaxis: None,
            legend: None,
            barmode: None,
            plot_bgcolor: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::enrich;
    use crate::models::DailyRecord;
    use chrono::NaiveDate;

    fn dataset() -> Dataset {
        let rows = [
            (1, [100, 90, 5, 20, 3]),
            (2, [110, 95, 8, 25, 4]),
            (3, [90, 70, 2, 22, 6]),
        ];
        let records: Vec<DailyRecord> = rows
            .iter()
            .map(|(day, c)| DailyRecord {
                date: NaiveDate::from_ymd_opt(2020, 9, *day).unwrap(),
                collected_samples: c[0],
                negative: c[1],
                positive: c[2],
                in_observation: c[3],
                discharge: c[4],
            })
            .collect();
        Dataset::new(enrich(&records).unwrap())
    }

    #[test]
    fn selected_column_is_plotted_against_dates() {
        let figure = selection_figure(&dataset(), "Cumulative_Positive");
        assert_eq!(figure.data.len(), 1);
        assert_eq!(figure.data[0].x, vec!["2020-09-01", "2020-09-02", "2020-09-03"]);
        assert_eq!(figure.data[0].y, vec![5, 13, 15]);
        assert_eq!(figure.layout.title.text, "Covid care centre report for  Cumulative_Positive");
    }

    #[test]
    fn unknown_or_empty_selection_plots_nothing() {
        for selection in ["", "Weekday", "no_such_column"] {
            let figure = selection_figure(&dataset(), selection);
            assert_eq!(figure.data.len(), 1);
            assert!(figure.data[0].y.is_empty());
            assert!(figure.data[0].x.is_empty());
            assert_eq!(figure.layout.title.text, format!("Covid care centre report for  {selection}"));
        }
    }

    #[test]
    fn fixed_charts_cover_their_columns() {
        let data = dataset();

        let daily = daily_figure(&data);
        let names: Vec<_> = daily.data.iter().filter_map(|trace| trace.name.as_deref()).collect();
        assert_eq!(
            names,
            vec![
                "Daily_Collected_Samples",
                "Daily_Negative",
                "Daily_Positive",
                "People_In_Observation",
                "Daily_Discharge",
                "Daily_Tests"
            ]
        );
        assert!(daily.data.iter().all(|trace| trace.x.len() == 3));

        let cumulative = cumulative_figure(&data);
        assert_eq!(cumulative.data.len(), 4);
        assert_eq!(cumulative.data[3].y, vec![5, 12, 30]);

        let bars = bar_figure(&data);
        assert!(bars.data.iter().all(|trace| trace.kind == TraceKind::Bar && trace.mode.is_none()));
        assert_eq!(bars.layout.barmode, Some("group"));
    }

    #[test]
    fn figure_serializes_in_plotly_shape() {
        let json = serde_json::to_value(selection_figure(&dataset(), "Daily_Lag")).unwrap();
        assert_eq!(json["data"][0]["type"], "scatter");
        assert_eq!(json["data"][0]["y"], serde_json::json!([5, 7, 18]));
        assert_eq!(json["layout"]["title"]["text"], "Covid care centre report for  Daily_Lag");
        assert!(json["layout"].get("barmode").is_none());

        let json = serde_json::to_value(bar_figure(&dataset())).unwrap();
        assert_eq!(json["data"][0]["type"], "bar");
        assert_eq!(json["layout"]["legend"]["title"]["text"], "Patient type");
    }
}
