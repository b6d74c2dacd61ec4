//! Renders a [`Report`] to a standalone HTML page.
//!
//! Charts are embedded with [`plotly::Plot::to_inline_html`] and drawn
//! client-side by plotly.js, loaded from its CDN.

use gas_incidents_report_models::{Block, Narrative, Prose, Report, Span, Table};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use plotly::Plot;
use plotly::layout::ControlBuilderError;

use crate::figure;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const STYLE: &str = "
body {
    font-family: Arial, sans-serif;
    max-width: 960px;
    margin: 0 auto;
    padding: 0 16px 48px;
    color: #222;
    line-height: 1.5;
}
.chart {
    width: 100%;
    min-height: 480px;
    margin: 16px 0;
}
.table-frame {
    margin: 16px 0;
}
.table-frame.scroll {
    max-height: 400px;
    overflow: auto;
}
table {
    border-collapse: collapse;
    font-size: 13px;
}
th, td {
    border: 1px solid #ddd;
    padding: 4px 8px;
    text-align: right;
    white-space: nowrap;
}
thead th {
    position: sticky;
    top: 0;
    background: #f4f4f4;
}
footer {
    margin-top: 32px;
    font-size: 12px;
    color: #777;
}
";

fn spans(spans: &[Span]) -> Markup {
    html! {
        @for span in spans {
            @match span {
                Span::Text { text } => { (text) }
                Span::Strong { text } => { strong { (text) } }
                Span::Emphasis { text } => { em { (text) } }
                Span::Link { text, href } => { a href=(href) target="_blank" rel="noopener" { (text) } }
            }
        }
    }
}

fn narrative(narrative: &Narrative) -> Markup {
    html! {
        section.narrative {
            @for element in &narrative.elements {
                @match element {
                    Prose::Heading { level: 1, text } => { h1 { (text) } }
                    Prose::Heading { level: 2, text } => { h2 { (text) } }
                    Prose::Heading { text, .. } => { h3 { (text) } }
                    Prose::Paragraph(content) => { p { (spans(content)) } }
                    Prose::Bullets(items) => {
                        ul {
                            @for item in items {
                                li { (spans(item)) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn table(table: &Table) -> Markup {
    let labelled = table.rows.iter().any(|row| row.label.is_some());
    html! {
        div.table-frame.scroll[table.scrollable] {
            table {
                thead {
                    tr {
                        @if labelled { th {} }
                        @for column in &table.columns {
                            th { (column) }
                        }
                    }
                }
                tbody {
                    @for row in &table.rows {
                        tr {
                            @if labelled {
                                th { (row.label.as_deref().unwrap_or_default()) }
                            }
                            @for cell in &row.cells {
                                td { (cell) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn chart(id: &str, plot: &Plot) -> Markup {
    html! {
        div.chart {
            (PreEscaped(plot.to_inline_html(Some(id))))
        }
    }
}

/// Renders the report as a complete HTML document.
///
/// # Errors
///
/// Returns an error if the animation controls of a chart cannot be built.
pub fn render(report: &Report) -> Result<String, ControlBuilderError> {
    let mut body = Vec::with_capacity(report.blocks.len());
    let mut charts = 0_usize;

    for block in &report.blocks {
        let markup = match block {
            Block::Narrative(content) => narrative(content),
            Block::Table(content) => table(content),
            Block::Chart(content) => {
                charts += 1;
                chart(&format!("chart-{charts}"), &figure::plot(content)?)
            }
        };
        body.push(markup);
    }

    log::debug!(
        "Rendered {} blocks ({charts} charts) to HTML",
        report.blocks.len()
    );

    let page = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (report.title) }
                script src=(PLOTLY_CDN) charset="utf-8" {}
                style { (PreEscaped(STYLE)) }
            }
            body {
                @for markup in &body {
                    (markup)
                }
                footer {
                    "Generated on " (report.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                }
            }
        }
    };

    Ok(page.into_string())
}
