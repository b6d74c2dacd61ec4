//! Report prose.
//!
//! Most sections are fixed text. Figures quoted in the text (incident
//! counts, casualty totals, leading causes and states) are passed in so
//! they always agree with the data the charts are drawn from.

use gas_incidents_analytics_models::IncidentSummary;
use gas_incidents_report_models::{Narrative, Span};

const NCSL_URL: &str = "https://www.ncsl.org/research/energy/state-gas-pipelines.aspx";
const PHMSA_URL: &str = "https://www.phmsa.dot.gov/data-and-statistics/pipeline/distribution-transmission-gathering-lng-and-liquid-accident-and-incident-data";
const PLOTLY_URL: &str = "https://plotly.com/";
const CHOROPLETH_URL: &str = "https://towardsdatascience.com/simplest-way-of-creating-a-choropleth-map-by-u-s-states-in-python-f359ada7735e";

/// Formats a list as `"a"`, `"a and b"`, or `"a, b and c"`.
fn join_names(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [only] => (*only).to_string(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

/// Labels of the `n` cause groups with the most incidents, largest first.
fn leading_causes(summary: &IncidentSummary, n: usize) -> Vec<String> {
    let mut totals: Vec<_> = summary.cause_totals.iter().collect();
    totals.sort_by(|a, b| b.incidents.cmp(&a.incidents));
    totals
        .into_iter()
        .take(n)
        .map(|t| t.cause.to_lowercase())
        .collect()
}

/// Introduction: what the pipeline system is and where the data comes from.
#[must_use]
pub fn introduction(title: &str) -> Narrative {
    Narrative::default()
        .heading(1, title)
        .paragraph(vec![
            Span::text(
                "The United States maintains over 3.2 million kilometres of natural gas \
                 distribution mains and pipelines, over 500,000 kilometres of gas transmission \
                 and gathering pipelines, over 180,000 kilometres of hazardous liquid pipelines, \
                 and 114 active liquid natural gas plants connected to natural gas transmission \
                 and distribution systems ",
            ),
            Span::link("[1]", NCSL_URL),
            Span::text("."),
        ])
        .paragraph(vec![Span::text("The pipeline system includes:")])
        .bullets(vec![
            vec![
                Span::strong("Transmission lines"),
                Span::text(
                    " to transport large quantities of natural gas or hazardous liquids over \
                     long distances from gathering lines or storage facilities to distribution \
                     centers, storage facilities, power plants, industrial customers and \
                     municipalities. Most transmission pipelines are located underground.",
                ),
            ],
            vec![
                Span::strong("Distribution lines"),
                Span::text(
                    " to move gas to industrial customers. Smaller distribution lines connect \
                     businesses and homes, usually through underground utility easements along \
                     streets. Gas pipeline ",
                ),
                Span::emphasis("commodities"),
                Span::text(
                    " include natural gas, hydrogen gas, propane gas and synthetic gas. Almost \
                     all gas gathering lines carry natural gas; distribution and transmission \
                     lines mostly carry natural gas but include some propane and hydrogen.",
                ),
            ],
        ])
        .paragraph(vec![
            Span::text("This report explores the incident data published by the "),
            Span::strong("Pipeline and Hazardous Materials Safety Administration"),
            Span::text(" "),
            Span::link("(PHMSA)", PHMSA_URL),
            Span::text(
                " to examine the locations, causes and associated casualties of gas pipeline \
                 incidents in the United States over the last 10 years. Charts are drawn with ",
            ),
            Span::link("plotly", PLOTLY_URL),
            Span::text(" and can be explored interactively."),
        ])
}

/// Lead-in to the pipeline map.
#[must_use]
pub fn pipeline_locations() -> Narrative {
    Narrative::default()
        .heading(1, "Pipeline Geographical Locations")
        .paragraph(vec![
            Span::text(
                "The map below shows the geographical locations of the gas pipelines. Hover \
                 over an individual line to see its details. The pipelines are drawn in three \
                 layers: the ",
            ),
            Span::strong("Transmission lines"),
            Span::text(", the "),
            Span::strong("Distribution lines"),
            Span::text(" and the "),
            Span::strong("Gulf of Mexico lines"),
            Span::text("."),
        ])
}

/// Observations on the pipeline map and lead-in to the transmission data.
#[must_use]
pub fn transmission_loading() -> Narrative {
    Narrative::default()
        .paragraph(vec![Span::text(
            "The highest concentration of pipelines is in the state of Texas, followed by \
             the Gulf of Mexico region and Oklahoma.",
        )])
        .heading(1, "Loading and Filtering the Gas Transmission Lines Incident Data")
        .paragraph(vec![Span::text(
            "With the pipeline locations in mind, we take a closer look at the incident data \
             associated with them, starting with the gas transmission pipelines. Here is the \
             available data:",
        )])
}

/// Number of transmission incidents.
#[must_use]
pub fn transmission_count(summary: &IncidentSummary) -> Narrative {
    Narrative::default().paragraph(vec![Span::text(format!(
        "Over the last 10 years, {} incidents have been recorded in the gas transmission \
         pipelines.",
        summary.incidents
    ))])
}

/// Heading for the transmission casualty section.
#[must_use]
pub fn transmission_casualties_heading() -> Narrative {
    Narrative::default()
        .heading(
            2,
            "Exploring the Injuries, Fatalities and Causes of Gas Transmission Line Incidents",
        )
        .heading(3, "Fatalities and Injuries")
}

/// Transmission casualty totals and lead-in to the cause breakdown.
#[must_use]
pub fn transmission_causes(summary: &IncidentSummary) -> Narrative {
    let totals = &summary.casualty_totals;
    Narrative::default()
        .paragraph(vec![Span::text(format!(
            "Over the last 10 years, a total of {} deaths and {} injuries have occurred. \
             Transmission lines are generally not in populated areas and are not very \
             widespread, so a low count is expected. We will compare this with the far more \
             extensive and widespread distribution network.",
            totals.deaths, totals.injuries
        ))])
        .heading(3, "Causes of the Gas Transmission Line Incidents")
        .paragraph(vec![Span::text(format!(
            "PHMSA categorises gas transmission line incidents into {} major cause groups, \
             each divided into sub-causes. The figure below presents the causes of the gas \
             transmission pipeline incidents in the last 10 years. Hover over a segment to see \
             its cause detail and number of incidents.",
            summary.cause_totals.len()
        ))])
}

/// Leading transmission causes and lead-in to the pie chart.
#[must_use]
pub fn cause_share(summary: &IncidentSummary) -> Narrative {
    let causes = leading_causes(summary, 2);
    let lead = match causes.as_slice() {
        [first, second, ..] => {
            format!("The main cause of the incidents is {first}, followed by {second}. ")
        }
        [first] => format!("The main cause of the incidents is {first}. "),
        [] => String::new(),
    };
    Narrative::default().paragraph(vec![Span::text(format!(
        "{lead}A pie chart gives a better sense of the share of each incident cause:"
    ))])
}

/// Distribution section introduction with its incident count.
#[must_use]
pub fn distribution_intro(summary: &IncidentSummary) -> Narrative {
    Narrative::default()
        .heading(1, "Incidents in the Gas Distribution Network")
        .paragraph(vec![Span::text(
            "We now explore the incidents in the gas distribution network, which is far more \
             extensive than the transmission network and reaches areas with high population \
             density. We first look at the locations of the gas distribution incidents in the \
             last 10 years.",
        )])
        .paragraph(vec![Span::text(format!(
            "Over the last 10 years, {} incidents have been recorded in the gas distribution \
             pipelines.",
            summary.incidents
        ))])
}

/// Observations on the distribution incident map.
#[must_use]
pub fn distribution_locations() -> Narrative {
    Narrative::default().paragraph(vec![Span::text(
        "Most gas distribution line incidents happen in the major population centres of the \
         USA. A more detailed view of the number of incidents in each state over the span of \
         10 years follows.",
    )])
}

/// Lead-in to the animated choropleth.
#[must_use]
pub fn yearly_map_lead() -> Narrative {
    Narrative::default().paragraph(vec![
        Span::text(
            "The bar chart above is difficult to interpret even with the hover text. An \
             animated choropleth map shows the number of incidents per year in each state \
             more clearly ",
        ),
        Span::link("[2]", CHOROPLETH_URL),
        Span::text("."),
    ])
}

/// Heading for the distribution casualty section.
#[must_use]
pub fn distribution_casualties_heading() -> Narrative {
    Narrative::default()
        .heading(
            2,
            "Exploring the Injuries, Fatalities and Causes of Gas Distribution Network Incidents",
        )
        .heading(3, "Fatalities and Injuries")
}

/// Comparison of distribution and transmission casualties.
#[must_use]
pub fn casualty_comparison(
    transmission: &IncidentSummary,
    distribution: &IncidentSummary,
) -> Narrative {
    let casualties = |s: &IncidentSummary| s.casualty_totals.deaths + s.casualty_totals.injuries;
    let comparison = if casualties(distribution) > casualties(transmission) {
        "larger than"
    } else {
        "no larger than"
    };

    let mut narrative = Narrative::default().paragraph(vec![Span::text(format!(
        "The distribution network's fatality and injury count is {comparison} that of the \
         transmission lines. Fatalities and injuries are combined into a single \"Casualties\" \
         figure below. The distribution network has a considerable presence in areas with \
         higher population density, so an incident is more likely to cause casualties."
    ))]);

    if let Some(top) = distribution
        .casualties_by_state_cause
        .iter()
        .max_by_key(|row| row.casualties)
        && top.casualties > 0
    {
        narrative = narrative.paragraph(vec![Span::text(format!(
            "By cause, {} ({}) contributes the most casualties in a single state over the \
             last 10 years.",
            top.cause.to_lowercase(),
            top.details.to_lowercase()
        ))]);
    }

    narrative
}

/// States with the most casualties and lead-in to the casualty map.
#[must_use]
pub fn casualty_states(distribution: &IncidentSummary) -> Narrative {
    let worst = distribution
        .casualties_by_state
        .iter()
        .max_by_key(|row| row.casualties);
    let busiest = distribution
        .yearly_by_state
        .iter()
        .fold(Vec::<(&str, u64)>::new(), |mut acc, row| {
            if let Some(entry) = acc.iter_mut().find(|(s, _)| *s == row.state) {
                entry.1 += row.incidents;
            } else {
                acc.push((row.state.as_str(), row.incidents));
            }
            acc
        })
        .into_iter()
        .max_by_key(|(_, incidents)| *incidents);

    let mut text = String::new();
    if let Some(worst) = worst {
        text.push_str(&format!(
            "The state of {} has the highest number of casualties from gas distribution \
             pipeline incidents in the last 10 years. ",
            worst.state
        ));
        if let Some((state, _)) = busiest
            && state != worst.state
        {
            text.push_str(&format!(
                "By number of incidents, {state} had the highest count instead. "
            ));
        }
    }
    text.push_str("A map shows the states with the most casualties over the last 10 years:");

    Narrative::default().paragraph(vec![Span::text(text)])
}

/// Closing summary.
#[must_use]
pub fn conclusions(transmission: &IncidentSummary, distribution: &IncidentSummary) -> Narrative {
    let causes = leading_causes(transmission, 2);
    let causes: Vec<&str> = causes.iter().map(String::as_str).collect();

    Narrative::default()
        .heading(1, "Conclusions")
        .paragraph(vec![
            Span::text(
                "This report explored the incident data published by the Pipeline and \
                 Hazardous Materials Safety Administration ",
            ),
            Span::link("(PHMSA)", PHMSA_URL),
            Span::text(
                " and found insights into the locations, causes and associated casualties of \
                 gas pipeline incidents in the United States over the last 10 years, using ",
            ),
            Span::link("plotly", PLOTLY_URL),
            Span::text(" for interactive visualisations."),
        ])
        .paragraph(vec![Span::text(
            "Causes, casualties and incident locations differ between gas transmission and \
             gas distribution pipelines.",
        )])
        .paragraph(vec![Span::text(format!(
            "Transmission lines recorded {} incidents with {} casualties. They run mostly \
             outside densely populated areas, and incidents concentrate where the lines are \
             most prevalent: Texas, Oklahoma and the Gulf of Mexico. The leading causes are {}.",
            transmission.incidents,
            transmission.casualty_totals.deaths + transmission.casualty_totals.injuries,
            if causes.is_empty() {
                "not available".to_string()
            } else {
                join_names(&causes)
            }
        ))])
        .paragraph(vec![Span::text(format!(
            "Distribution lines recorded {} incidents with {} casualties. The network is far \
             more widespread and reaches areas of much higher population density, which \
             drives both the incident and the casualty rate.",
            distribution.incidents,
            distribution.casualty_totals.deaths + distribution.casualty_totals.injuries,
        ))])
}
