//! HTML views for the three dashboard pages.

use std::fmt::Write;

use crate::charts::{self, Figure};
use crate::models::{Column, Dataset};
use crate::report;

const STYLESHEET: &str = "https://cdn.jsdelivr.net/npm/bootswatch@4.5.2/dist/united/bootstrap.min.css";
const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";
const PORTFOLIO_URL: &str = "https://github.com/FahidLatheef";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Plots,
    Answers,
}

impl Page {
    /// Unrecognised paths fall back to the home page.
    pub fn from_path(path: &str) -> Page {
        match path {
            "/plots" => Page::Plots,
            "/answers" => Page::Answers,
            _ => Page::Home,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Covid Care Centre Dashboard",
            Page::Plots => "Covid Care Centre Dashboard - Plots",
            Page::Answers => "Covid Care Centre Dashboard - Answers",
        }
    }
}

pub fn render(page: Page, dataset: &Dataset) -> Result<String, serde_json::Error> {
    let body = match page {
        Page::Home => home(),
        Page::Plots => plots(dataset)?,
        Page::Answers => answers(dataset),
    };
    Ok(document(page.title(), &body))
}

fn document(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="{STYLESHEET}">
    <script src="{PLOTLY_JS}"></script>
</head>
<body>
{navbar}
{body}
</body>
</html>
"#,
        title = escape(title),
        navbar = navbar(),
    )
}

fn navbar() -> String {
    format!(
        r#"<nav class="navbar navbar-expand-md navbar-dark bg-primary sticky-top">
    <div class="container">
        <a class="navbar-brand" href="/home">Home</a>
        <ul class="navbar-nav ml-auto">
            <li class="nav-item"><a class="nav-link" href="{PORTFOLIO_URL}" target="_blank">My Portfolio</a></li>
        </ul>
    </div>
</nav>"#
    )
}

fn home() -> String {
    let mut questions = String::new();
    for (index, question) in report::QUESTIONS.iter().enumerate() {
        let _ = write!(questions, "{}) {}<br>", index + 1, escape(question));
    }

    format!(
        r#"<div class="container">
    <h2>Background</h2>
    <p>Due to the current COVID-19 pandemic worldwide, the Government of India (GOI) set up few Covid Care Centres
    all over India with the following objectives:</p>
    <ul>
        <li>It will function as an isolation centre for mild and asymptomatic Covid-19 positive patients.</li>
        <li>They have basic facilities and services to support testing, treatment and monitor the patients.</li>
        <li>They provide the analytics and case data database with designated authorities in secure manner.</li>
    </ul>
    <h2>Objective</h2>
    <p>Build an analytics dashboard for Covid Care Centres in Karnataka and answer the analytical
    questions that a person may face if hired as a Data Scientist for a COVID CARE CENTRE.</p>
    <h2>A few analytical questions to ponder...</h2>
    <p>{questions}</p>
    <br>
    <div class="row no-gutters">
        <div class="col"><a class="btn btn-secondary" href="/answers">View Answers</a></div>
        <div class="col"></div>
        <div class="col"><a class="btn btn-secondary" href="/plots">View Dashboards and Plots</a></div>
    </div>
</div>"#
    )
}

fn plots(dataset: &Dataset) -> Result<String, serde_json::Error> {
    let mut options = String::from(r#"<option value="" selected></option>"#);
    for column in Column::ALL {
        let _ = write!(options, r#"<option value="{0}">{0}</option>"#, column.name());
    }

    let fixed = [
        ("g2", charts::daily_figure(dataset)),
        ("g3", charts::cumulative_figure(dataset)),
        ("g4", charts::bar_figure(dataset)),
    ];
    let mut containers = String::new();
    let mut scripts = String::new();
    for (id, figure) in &fixed {
        let _ = writeln!(containers, r#"    <div><div id="{id}"></div></div>"#);
        let _ = writeln!(scripts, "    draw({:?}, {});", id, script_json(figure)?);
    }

    Ok(format!(
        r#"<div class="container-fluid">
    <h2>COVID-19 CARE CENTRES DASHBOARD AND OTHER RELEVANT PLOTS</h2>
    <div style="width: 25%; display: inline-block">
        <select id="Select_data" class="form-control">{options}</select>
    </div>
    <div id="c3-graph"></div>
{containers}</div>
<script>
    function draw(id, figure) {{
        Plotly.react(id, figure.data, figure.layout);
    }}
{scripts}
    const select = document.getElementById("Select_data");
    async function updateGraph() {{
        const response = await fetch("/api/graph?column=" + encodeURIComponent(select.value));
        draw("c3-graph", await response.json());
    }}
    select.addEventListener("change", updateGraph);
    updateGraph();
</script>"#
    ))
}

fn answers(dataset: &Dataset) -> String {
    let insights = report::insights(dataset);
    let mut items = String::new();
    for (index, (question, answer)) in report::answers(&insights).iter().enumerate() {
        let _ = write!(
            items,
            "{}) {}<br>A) {}<br><br>",
            index + 1,
            escape(question),
            escape(answer)
        );
    }

    format!(
        r#"<div class="container">
    <h2>Answers</h2>
    <p>{items}</p>
    <a class="btn btn-secondary" href="/home">View Questions</a>
</div>"#
    )
}

/// JSON safe to inline inside a `<script>` element.
fn script_json(figure: &Figure) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(figure)?.replace("</", "<\\/"))
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
