use std::fmt::Write;

use crate::models::{mean, Dataset, EnrichedRecord, Insights, LagSummary, WeekdaySummary, WEEKDAY_NAMES};

const WEEKEND: [u8; 2] = [5, 6];

/// Totals per weekday, Monday first. Weekdays never observed have `days == 0`.
pub fn summarize_by_weekday(records: &[EnrichedRecord]) -> Vec<WeekdaySummary> {
    let mut summaries: Vec<WeekdaySummary> = WEEKDAY_NAMES
        .into_iter()
        .enumerate()
        .map(|(index, name)| WeekdaySummary {
            weekday_index: index as u8,
            weekday: name,
            days: 0,
            collected_samples: 0,
            tests: 0,
        })
        .collect();

    for record in records {
        let entry = &mut summaries[usize::from(record.weekday_index)];
        entry.days += 1;
        entry.collected_samples += i128::from(record.collected_samples);
        entry.tests += i128::from(record.tests);
    }

    summaries
}

/// Share of tests that came back positive, from the final running totals.
pub fn positivity_rate(records: &[EnrichedRecord]) -> Option<f64> {
    let last = records.last()?;
    if last.cumulative_tests == 0 {
        None
    } else {
        Some(last.cumulative_positive as f64 / last.cumulative_tests as f64 * 100.0)
    }
}

pub fn lag_summary(records: &[EnrichedRecord]) -> LagSummary {
    let final_cumulative_lag = records.last().map(|record| record.cumulative_lag).unwrap_or(0);
    let first_cumulative_lag = records.first().map(|record| record.cumulative_lag).unwrap_or(0);

    LagSummary {
        final_cumulative_lag,
        days_with_backlog: records.iter().filter(|record| record.lag > 0).count(),
        growing: records.len() > 1 && final_cumulative_lag > first_cumulative_lag,
    }
}

pub fn insights(dataset: &Dataset) -> Insights {
    let records = dataset.records();
    let weekdays = summarize_by_weekday(records);

    let (weekend, workweek): (Vec<&WeekdaySummary>, Vec<&WeekdaySummary>) = weekdays
        .iter()
        .partition(|summary| WEEKEND.contains(&summary.weekday_index));
    let observed: Vec<&WeekdaySummary> = weekdays.iter().filter(|summary| summary.days > 0).collect();
    let top = observed
        .iter()
        .map(|summary| summary.mean_tests())
        .fold(f64::NEG_INFINITY, f64::max);
    let busiest_testing_days = observed
        .iter()
        .filter(|summary| summary.mean_tests() == top)
        .map(|summary| summary.weekday)
        .collect();

    Insights {
        days: records.len(),
        positivity_rate: positivity_rate(records),
        weekend_mean_tests: pooled_mean(&weekend, |summary| summary.tests),
        workweek_mean_tests: pooled_mean(&workweek, |summary| summary.tests),
        weekend_mean_collected: pooled_mean(&weekend, |summary| summary.collected_samples),
        workweek_mean_collected: pooled_mean(&workweek, |summary| summary.collected_samples),
        busiest_testing_days,
        lag: lag_summary(records),
        weekdays,
    }
}

fn pooled_mean(group: &[&WeekdaySummary], pick: fn(&WeekdaySummary) -> i128) -> f64 {
    let days = group.iter().map(|summary| summary.days).sum();
    mean(group.iter().map(|summary| pick(summary)).sum(), days)
}

/// Weekdays ordered by mean tests, lowest first.
pub fn ranked_by_tests(insights: &Insights) -> Vec<&WeekdaySummary> {
    let mut ranked: Vec<&WeekdaySummary> = insights
        .weekdays
        .iter()
        .filter(|summary| summary.days > 0)
        .collect();
    ranked.sort_by(|a, b| {
        a.mean_tests()
            .partial_cmp(&b.mean_tests())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

/// The five questions with answers derived from the loaded data.
pub fn answers(insights: &Insights) -> Vec<(&'static str, String)> {
    let q1 = match insights.positivity_rate {
        Some(rate) => format!(
            "There is a {rate:.2}% chance of testing positive if you are tested (from past data)."
        ),
        None => "No tests have been recorded yet, so the positivity rate is unknown.".to_string(),
    };

    let quietest: Vec<&str> = ranked_by_tests(insights)
        .into_iter()
        .take(2)
        .map(|summary| summary.weekday)
        .collect();
    let q2 = if insights.weekend_mean_tests < insights.workweek_mean_tests {
        format!(
            "Yes. Weekends average {:.0} tests a day against {:.0} on weekdays; the quietest days are {}.",
            insights.weekend_mean_tests,
            insights.workweek_mean_tests,
            quietest.join(" and ")
        )
    } else {
        format!(
            "No. Weekends average {:.0} tests a day against {:.0} on weekdays.",
            insights.weekend_mean_tests, insights.workweek_mean_tests
        )
    };

    let busiest = insights.busiest_testing_days.join(" and ");
    let q3 = if insights.busiest_testing_days.is_empty() {
        "There is not enough data to tell.".to_string()
    } else if insights.busiest_testing_days.contains(&"Mon") {
        format!("Yes, the most testing happens on {busiest}.")
    } else {
        format!("No, most of the testing is not done on Monday, but rather on {busiest}.")
    };

    let q4 = if insights.weekend_mean_collected < insights.workweek_mean_collected {
        format!(
            "The numbers validate the rumour: {:.0} samples a day are collected on weekends against {:.0} on weekdays.",
            insights.weekend_mean_collected, insights.workweek_mean_collected
        )
    } else {
        format!(
            "The numbers do not support the rumour: {:.0} samples a day are collected on weekends against {:.0} on weekdays.",
            insights.weekend_mean_collected, insights.workweek_mean_collected
        )
    };

    let lag = &insights.lag;
    let q5 = if lag.growing {
        format!(
            "The backlog of samples collected but not tested is increasing day by day, reaching {} \
             with a same-day shortfall on {} of {} days. Care centres are struggling to keep up with testing.",
            lag.final_cumulative_lag, lag.days_with_backlog, insights.days
        )
    } else {
        format!(
            "The backlog is under control: it stands at {} with a same-day shortfall on {} of {} days.",
            lag.final_cumulative_lag, lag.days_with_backlog, insights.days
        )
    };

    QUESTIONS.into_iter().zip([q1, q2, q3, q4, q5]).collect()
}

pub const QUESTIONS: [&str; 5] = [
    "How likely you are tested positive if you are getting tested?",
    "There has been rumours that the testing is quite low during weekends. Is it true?",
    "Is it true that Monday is the day in which the most testing happens (Especially due to the claim \
     that there is low testing during the weekend and it get postponed to monday)?",
    "There is also rumours that the sample collection is quite less during the weekends, validate?",
    "Clearly not all the samples collected are tested in the same day. Is this lag manageable? How severe is it?",
];

pub fn build_report(source: &str, dataset: &Dataset) -> String {
    let insights = insights(dataset);
    let mut output = String::new();

    let _ = writeln!(output, "# Covid Care Centre Report");
    match (dataset.records().first(), dataset.records().last()) {
        (Some(first), Some(last)) => {
            let _ = writeln!(
                output,
                "Generated from {} ({} days, {} to {})",
                source, insights.days, first.date, last.date
            );
        }
        _ => {
            let _ = writeln!(output, "Generated from {} (no data rows)", source);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Weekday Breakdown");
    let _ = writeln!(output, "| Weekday | Days | Collected | Tests | Mean collected | Mean tests |");
    let _ = writeln!(output, "|---|---|---|---|---|---|");
    for summary in &insights.weekdays {
        let _ = writeln!(
            output,
            "| {} | {} | {} | {} | {:.1} | {:.1} |",
            summary.weekday,
            summary.days,
            summary.collected_samples,
            summary.tests,
            summary.mean_collected(),
            summary.mean_tests()
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Answers");
    for (index, (question, answer)) in answers(&insights).iter().enumerate() {
        let _ = writeln!(output, "{}) {}", index + 1, question);
        let _ = writeln!(output, "   A) {}", answer);
    }

    output
}
