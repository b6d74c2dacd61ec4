//! Assembles the ordered block list of the report.

use chrono::{DateTime, Utc};
use gas_incidents_analytics::{frames_by_year, sort_year_state};
use gas_incidents_analytics_models::{IncidentSummary, YearStateOrder};
use gas_incidents_incident_models::{IncidentTable, PipelineNetwork, Segment};
use gas_incidents_report_models::{
    BarChart, BarColoring, BarRow, Block, Chart, ChartSpec, ChoroplethChart, ChoroplethFrame,
    ColorScale, GeoPoint, GeoStyle, LineGeoChart, LineLayer, LineSegment, MarkerStyle,
    Orientation, Palette, PieChart, PieSlice, Report, ScatterGeoChart, Table, TableRow,
};

use crate::{ReportInputs, narrative};

/// Lowest year on the distribution incident color scale.
const FIRST_YEAR: i32 = 2010;

/// Distribution incident marker outline.
const MARKER_OUTLINE: &str = "rgb(219,15,15)";

/// Builds the full report from loaded inputs and their summaries.
#[must_use]
pub fn build_report(
    title: &str,
    inputs: &ReportInputs,
    transmission: &IncidentSummary,
    distribution: &IncidentSummary,
    generated_at: DateTime<Utc>,
) -> Report {
    let blocks = vec![
        Block::Narrative(narrative::introduction(title)),
        Block::Narrative(narrative::pipeline_locations()),
        pipeline_map(inputs),
        Block::Narrative(narrative::transmission_loading()),
        incident_table(&inputs.transmission),
        Block::Narrative(narrative::transmission_count(transmission)),
        transmission_year_bar(transmission),
        Block::Narrative(narrative::transmission_casualties_heading()),
        casualty_table(transmission),
        Block::Narrative(narrative::transmission_causes(transmission)),
        cause_bar(transmission),
        Block::Narrative(narrative::cause_share(transmission)),
        cause_pie(transmission),
        Block::Narrative(narrative::distribution_intro(distribution)),
        incident_map(&inputs.distribution),
        Block::Narrative(narrative::distribution_locations()),
        distribution_year_bar(distribution),
        Block::Narrative(narrative::yearly_map_lead()),
        yearly_choropleth(distribution),
        Block::Narrative(narrative::distribution_casualties_heading()),
        casualty_table(distribution),
        Block::Narrative(narrative::casualty_comparison(transmission, distribution)),
        casualty_bar(distribution),
        Block::Narrative(narrative::casualty_states(distribution)),
        casualty_choropleth(distribution),
        Block::Narrative(narrative::conclusions(transmission, distribution)),
    ];

    log::debug!("Built report with {} blocks", blocks.len());

    Report {
        title: title.to_string(),
        generated_at,
        blocks,
    }
}

const fn chart(title: Option<String>, show_legend: bool, spec: ChartSpec) -> Block {
    Block::Chart(Chart {
        title,
        show_legend,
        spec,
    })
}

fn line_layer(network: PipelineNetwork, segments: &[Segment]) -> LineLayer {
    let (color, width) = match network {
        PipelineNetwork::Distribution => ("#293d6e", 0.25),
        PipelineNetwork::Transmission => ("#000000", 0.75),
        PipelineNetwork::GulfOfMexico => ("#8723e3", 0.25),
    };

    let segments = segments
        .iter()
        .map(|segment| LineSegment {
            lats: segment.lats,
            lons: segment.lons,
            hover: match (network, &segment.pipe_name) {
                (PipelineNetwork::Transmission, Some(pipe)) => {
                    format!("{pipe}<br>Operator: {}", segment.operator_name)
                }
                _ => segment.operator_name.clone(),
            },
        })
        .collect();

    LineLayer {
        name: network.to_string(),
        color: color.to_string(),
        width,
        segments,
    }
}

fn pipeline_map(inputs: &ReportInputs) -> Block {
    let layers = PipelineNetwork::all()
        .iter()
        .map(|network| line_layer(*network, inputs.segments(*network)))
        .collect();

    chart(
        Some("USA Gas Pipelines".to_string()),
        false,
        ChartSpec::LineGeo(LineGeoChart {
            layers,
            geo: GeoStyle::default(),
        }),
    )
}

fn incident_table(table: &IncidentTable) -> Block {
    Block::Table(Table {
        columns: table.columns.clone(),
        rows: table
            .records
            .iter()
            .map(|record| TableRow {
                label: Some(record.row.to_string()),
                cells: record.values.clone(),
            })
            .collect(),
        scrollable: true,
    })
}

fn casualty_table(summary: &IncidentSummary) -> Block {
    Block::Table(Table {
        columns: vec!["Death".to_string(), "Injury".to_string()],
        rows: vec![TableRow {
            label: Some("Number of Casualties".to_string()),
            cells: vec![
                summary.casualty_totals.deaths.to_string(),
                summary.casualty_totals.injuries.to_string(),
            ],
        }],
        scrollable: false,
    })
}

fn transmission_year_bar(summary: &IncidentSummary) -> Block {
    let mut rows = summary.yearly_by_state.clone();
    sort_year_state(&mut rows, YearStateOrder::CountDescending);

    chart(
        Some(format!(
            "Number of {} Line Incidents in Past 10 Years by State",
            summary.kind.label()
        )),
        true,
        ChartSpec::Bar(BarChart {
            orientation: Orientation::Horizontal,
            category_label: "Incident Year".to_string(),
            value_label: "No of Incidents".to_string(),
            color_label: "Incident State".to_string(),
            coloring: BarColoring::Discrete {
                scale: ColorScale::reversed(Palette::Deep),
            },
            detail_label: None,
            category_in_hover: true,
            rows: rows
                .into_iter()
                .map(|row| BarRow {
                    category: row.year.to_string(),
                    value: row.incidents,
                    group: row.state,
                    color_value: f64::from(row.year),
                    detail: None,
                })
                .collect(),
        }),
    )
}

fn cause_bar(summary: &IncidentSummary) -> Block {
    chart(
        Some(format!(
            "Causes of {} Line Incidents in Past 10 Years",
            summary.kind.label()
        )),
        false,
        ChartSpec::Bar(BarChart {
            orientation: Orientation::Horizontal,
            category_label: "Accident Cause".to_string(),
            value_label: "Number of Incidents".to_string(),
            color_label: "Details".to_string(),
            coloring: BarColoring::Discrete {
                scale: ColorScale::reversed(Palette::Bluyl),
            },
            detail_label: None,
            category_in_hover: false,
            rows: summary
                .causes
                .iter()
                .map(|row| BarRow {
                    category: row.cause.clone(),
                    value: row.incidents,
                    group: row.details.clone(),
                    color_value: 0.0,
                    detail: None,
                })
                .collect(),
        }),
    )
}

fn cause_pie(summary: &IncidentSummary) -> Block {
    chart(
        Some(format!(
            "{} Incident Cause Breakdown",
            summary.kind.label()
        )),
        true,
        ChartSpec::Pie(PieChart {
            label_title: "Accident Cause".to_string(),
            value_title: "Number of Incidents".to_string(),
            scale: ColorScale::new(Palette::Bluyl),
            slices: summary
                .cause_totals
                .iter()
                .map(|total| PieSlice {
                    label: total.cause.clone(),
                    value: total.incidents,
                })
                .collect(),
        }),
    )
}

fn incident_map(table: &IncidentTable) -> Block {
    let max_year = table.max_year().unwrap_or(FIRST_YEAR);

    chart(
        Some(format!(
            "{} line incidents in the last 10 years",
            table.kind.label()
        )),
        true,
        ChartSpec::ScatterGeo(ScatterGeoChart {
            points: table
                .records
                .iter()
                .map(|record| GeoPoint {
                    lat: record.latitude,
                    lon: record.longitude,
                    text: record
                        .hover_text
                        .clone()
                        .unwrap_or_else(|| format!("{}, {}", record.state, record.year)),
                    value: f64::from(record.year),
                })
                .collect(),
            marker: MarkerStyle {
                size: 4,
                opacity: 0.8,
                line_color: MARKER_OUTLINE.to_string(),
                line_width: 1.0,
            },
            color_scale: ColorScale::new(Palette::Hot),
            color_min: f64::from(FIRST_YEAR),
            color_max: f64::from(max_year),
            colorbar_title: "Incident Year".to_string(),
            geo: GeoStyle::default(),
        }),
    )
}

fn distribution_year_bar(summary: &IncidentSummary) -> Block {
    let mut rows = summary.yearly_by_state.clone();
    sort_year_state(&mut rows, YearStateOrder::CountDescending);
    sort_year_state(&mut rows, YearStateOrder::YearAscending);

    chart(
        Some(format!(
            "Number of {} Incidents in Past 10 Years by State",
            summary.kind.label()
        )),
        true,
        ChartSpec::Bar(BarChart {
            orientation: Orientation::Vertical,
            category_label: "Incident State".to_string(),
            value_label: "No of Incidents".to_string(),
            color_label: "Incident Year".to_string(),
            coloring: BarColoring::Continuous {
                scale: ColorScale::reversed(Palette::OrRd),
            },
            detail_label: None,
            category_in_hover: true,
            rows: rows
                .into_iter()
                .map(|row| BarRow {
                    category: row.state,
                    value: row.incidents,
                    group: row.year.to_string(),
                    color_value: f64::from(row.year),
                    detail: None,
                })
                .collect(),
        }),
    )
}

fn yearly_choropleth(summary: &IncidentSummary) -> Block {
    let frames = frames_by_year(&summary.yearly_by_state)
        .into_iter()
        .map(|(year, rows)| ChoroplethFrame {
            name: year.to_string(),
            locations: rows.iter().map(|row| row.state.clone()).collect(),
            values: rows.iter().map(|row| row.incidents).collect(),
        })
        .collect();

    chart(
        None,
        false,
        ChartSpec::Choropleth(ChoroplethChart {
            location_label: "Incident State".to_string(),
            value_label: "No of Incidents".to_string(),
            frame_label: Some("Incident Year".to_string()),
            scale: ColorScale::reversed(Palette::Agsunset),
            frames,
        }),
    )
}

fn casualty_bar(summary: &IncidentSummary) -> Block {
    chart(
        Some(format!(
            "Casualties of {} Line Incidents in Past 10 Years",
            summary.kind.label()
        )),
        true,
        ChartSpec::Bar(BarChart {
            orientation: Orientation::Vertical,
            category_label: "State".to_string(),
            value_label: "Casualties".to_string(),
            color_label: "Cause".to_string(),
            coloring: BarColoring::Discrete {
                scale: ColorScale::new(Palette::Jet),
            },
            detail_label: Some("Cause Details".to_string()),
            category_in_hover: true,
            rows: summary
                .casualties_by_state_cause
                .iter()
                .map(|row| BarRow {
                    category: row.state.clone(),
                    value: row.casualties,
                    group: row.cause.clone(),
                    color_value: 0.0,
                    detail: Some(row.details.clone()),
                })
                .collect(),
        }),
    )
}

fn casualty_choropleth(summary: &IncidentSummary) -> Block {
    let states = &summary.casualties_by_state;
    let frames = if states.is_empty() {
        Vec::new()
    } else {
        vec![ChoroplethFrame {
            name: String::new(),
            locations: states.iter().map(|row| row.state.clone()).collect(),
            values: states.iter().map(|row| row.casualties).collect(),
        }]
    };

    chart(
        None,
        false,
        ChartSpec::Choropleth(ChoroplethChart {
            location_label: "State".to_string(),
            value_label: "Casualties".to_string(),
            frame_label: None,
            scale: ColorScale::new(Palette::Speed),
            frames,
        }),
    )
}

#[cfg(test)]
mod tests {
    use gas_incidents_analytics::summarize;
    use gas_incidents_incident_models::{DatasetKind, IncidentRecord};

    use super::*;

    fn record(year: i32, state: &str, cause: &str, fatalities: u32, injuries: u32) -> IncidentRecord {
        IncidentRecord {
            row: 0,
            report_key: format!("{year}{state}"),
            year,
            state: state.to_string(),
            location_state: Some(state.to_string()),
            city: Some("AUSTIN".to_string()),
            latitude: 30.3,
            longitude: -97.7,
            fatalities,
            injuries,
            fatality_ind: fatalities > 0,
            injury_ind: injuries > 0,
            cause: cause.to_string(),
            cause_details: "DETAIL".to_string(),
            hover_text: Some(format!("Austin, {state}, Cause: Detail, {year}")),
            values: vec![year.to_string(), state.to_string()],
        }
    }

    fn table(kind: DatasetKind, records: Vec<IncidentRecord>) -> IncidentTable {
        IncidentTable {
            kind,
            columns: vec!["IYEAR".to_string(), "STATE".to_string()],
            records,
            dropped: 0,
        }
    }

    fn segment(pipe_name: Option<&str>) -> Segment {
        Segment {
            lats: [29.0, 29.5],
            lons: [-95.0, -94.5],
            operator_name: "Kinder Morgan".to_string(),
            pipe_name: pipe_name.map(str::to_string),
            category: "Interstate".to_string(),
        }
    }

    fn inputs() -> ReportInputs {
        ReportInputs {
            distribution_lines: vec![segment(None)],
            transmission_lines: vec![segment(Some("Tennessee Gas")), segment(None)],
            gulf_of_mexico_lines: Vec::new(),
            transmission: table(
                DatasetKind::Transmission,
                vec![
                    record(2015, "TX", "EQUIPMENT FAILURE", 0, 1),
                    record(2016, "OK", "CORROSION FAILURE", 1, 0),
                ],
            ),
            distribution: table(
                DatasetKind::Distribution,
                vec![
                    record(2012, "CA", "EXCAVATION DAMAGE", 0, 2),
                    record(2018, "NY", "NATURAL FORCE DAMAGE", 3, 1),
                    record(2018, "CA", "EXCAVATION DAMAGE", 0, 0),
                ],
            ),
        }
    }

    fn build(inputs: &ReportInputs) -> Report {
        let transmission = summarize(&inputs.transmission);
        let distribution = summarize(&inputs.distribution);
        build_report(
            "Report",
            inputs,
            &transmission,
            &distribution,
            DateTime::<Utc>::UNIX_EPOCH,
        )
    }

    fn spec(block: &Block) -> &ChartSpec {
        match block {
            Block::Chart(chart) => &chart.spec,
            other => panic!("expected chart, got {}", other.kind()),
        }
    }

    #[test]
    fn blocks_follow_report_order() {
        let report = build(&inputs());
        let kinds: Vec<&str> = report.blocks.iter().map(Block::kind).collect();
        assert_eq!(
            kinds,
            [
                "narrative",
                "narrative",
                "line_geo",
                "narrative",
                "table",
                "narrative",
                "bar",
                "narrative",
                "table",
                "narrative",
                "bar",
                "narrative",
                "pie",
                "narrative",
                "scatter_geo",
                "narrative",
                "bar",
                "narrative",
                "choropleth",
                "narrative",
                "table",
                "narrative",
                "bar",
                "narrative",
                "choropleth",
                "narrative",
            ]
        );
    }

    #[test]
    fn pipeline_layers_are_styled_per_network() {
        let report = build(&inputs());
        let ChartSpec::LineGeo(map) = spec(&report.blocks[2]) else {
            panic!("expected line map");
        };

        let styles: Vec<(&str, f64, usize)> = map
            .layers
            .iter()
            .map(|l| (l.color.as_str(), l.width, l.segments.len()))
            .collect();
        assert_eq!(
            styles,
            [("#293d6e", 0.25, 1), ("#000000", 0.75, 2), ("#8723e3", 0.25, 0)]
        );
        assert_eq!(
            map.layers[1].segments[0].hover,
            "Tennessee Gas<br>Operator: Kinder Morgan"
        );
        assert_eq!(map.layers[1].segments[1].hover, "Kinder Morgan");
    }

    #[test]
    fn casualty_table_reports_totals() {
        let report = build(&inputs());
        let Block::Table(table) = &report.blocks[20] else {
            panic!("expected table");
        };
        assert_eq!(table.columns, ["Death", "Injury"]);
        assert_eq!(table.rows[0].label.as_deref(), Some("Number of Casualties"));
        assert_eq!(table.rows[0].cells, ["3", "3"]);
    }

    #[test]
    fn scatter_map_scale_ends_at_latest_year() {
        let report = build(&inputs());
        let ChartSpec::ScatterGeo(map) = spec(&report.blocks[14]) else {
            panic!("expected scatter map");
        };
        assert_eq!(map.points.len(), 3);
        assert!((map.color_min - 2010.0).abs() < f64::EPSILON);
        assert!((map.color_max - 2018.0).abs() < f64::EPSILON);
        assert_eq!(map.color_scale, ColorScale::new(Palette::Hot));
        assert_eq!(map.color_scale.stops()[0], (0.0, "rgb(0,0,0)"));
        assert_eq!(map.points[0].text, "Austin, CA, Cause: Detail, 2012");
    }

    #[test]
    fn incident_table_labels_rows_by_source_index() {
        let mut inputs = inputs();
        inputs.transmission.records[0].row = 0;
        inputs.transmission.records[1].row = 4;
        let report = build(&inputs);
        let Block::Table(table) = &report.blocks[4] else {
            panic!("expected table");
        };

        let labels: Vec<Option<&str>> = table.rows.iter().map(|r| r.label.as_deref()).collect();
        assert_eq!(labels, [Some("0"), Some("4")]);
        assert_eq!(table.rows[1].cells, ["2016", "OK"]);
    }

    #[test]
    fn transmission_bar_sorted_by_count() {
        let mut inputs = inputs();
        inputs
            .transmission
            .records
            .push(record(2016, "OK", "EQUIPMENT FAILURE", 0, 0));
        let report = build(&inputs);
        let ChartSpec::Bar(bar) = spec(&report.blocks[6]) else {
            panic!("expected bar");
        };
        assert_eq!(bar.rows[0].value, 2);
        assert_eq!((bar.rows[0].category.as_str(), bar.rows[0].group.as_str()), ("2016", "OK"));
    }

    #[test]
    fn yearly_choropleth_frames_ascend() {
        let report = build(&inputs());
        let ChartSpec::Choropleth(map) = spec(&report.blocks[18]) else {
            panic!("expected choropleth");
        };
        let names: Vec<&str> = map.frames.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["2012", "2018"]);
        assert_eq!(map.frames[1].locations, ["CA", "NY"]);
    }

    #[test]
    fn unflagged_incidents_stay_off_casualty_charts() {
        let report = build(&inputs());
        let ChartSpec::Bar(bar) = spec(&report.blocks[22]) else {
            panic!("expected bar");
        };
        let total: u64 = bar.rows.iter().map(|r| r.value).sum();
        assert_eq!(total, 6);
        assert!(bar.rows.iter().all(|r| r.detail.as_deref() == Some("Detail")));
    }

    #[test]
    fn empty_tables_build_empty_charts() {
        let mut inputs = inputs();
        inputs.transmission.records.clear();
        inputs.distribution.records.clear();
        let report = build(&inputs);

        assert_eq!(report.blocks.len(), 26);
        let ChartSpec::Choropleth(map) = spec(&report.blocks[24]) else {
            panic!("expected choropleth");
        };
        assert!(map.frames.is_empty());
        let ChartSpec::ScatterGeo(points) = spec(&report.blocks[14]) else {
            panic!("expected scatter map");
        };
        assert!((points.color_max - 2010.0).abs() < f64::EPSILON);
    }
}
