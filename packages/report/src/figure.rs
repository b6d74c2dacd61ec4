//! Conversion of chart specifications into [`plotly::Plot`]s.
//!
//! Maps use the `albers usa` projection, which plotly.js pins to the USA
//! scope. The plotly crate has no choropleth trace, so choropleths are
//! drawn with the local [`Choropleth`] type.

use gas_incidents_report_models::{
    BarChart, BarColoring, BarRow, Chart, ChartSpec, ChoroplethChart, ColorScale, GeoStyle,
    LineGeoChart, LineLayer, Orientation, PieChart, ScatterGeoChart,
};
use plotly::common::{
    Anchor, ColorBar, ColorScale as PlotScale, ColorScaleElement, HoverInfo, Line, Marker,
    MarkerSymbol, Mode, Orientation as BarOrientation,
};
use plotly::layout::update_menu::{ButtonBuilder, UpdateMenu, UpdateMenuDirection, UpdateMenuType};
use plotly::layout::{
    Animation, AnimationMode, AnimationOptions, Axis, BarMode, ColorAxis, ControlBuilderError,
    Frame, FrameSettings, HoverMode, LayoutGeo, Legend, Margin, Projection, ProjectionType,
    Slider, SliderCurrentValue, SliderStepBuilder, TraceOrder, TransitionSettings,
};
use plotly::{Bar, Configuration, Layout, Pie, Plot, ScatterGeo, Trace, Traces};
use serde::Serialize;

/// Milliseconds each animation frame stays on screen.
const FRAME_DURATION_MS: usize = 500;

/// Converts a chart into a Plotly plot.
///
/// # Errors
///
/// Returns an error if the animation controls of a choropleth cannot be
/// built.
pub fn plot(chart: &Chart) -> Result<Plot, ControlBuilderError> {
    let mut plot = Plot::new();
    plot.set_configuration(Configuration::new().responsive(true));

    let layout = match &chart.spec {
        ChartSpec::LineGeo(spec) => {
            for trace in line_geo_traces(spec) {
                plot.add_trace(trace);
            }
            geo_layout(&spec.geo)
        }
        ChartSpec::ScatterGeo(spec) => {
            plot.add_trace(scatter_geo_trace(spec));
            geo_layout(&spec.geo)
        }
        ChartSpec::Bar(spec) => {
            plot.add_traces(bar_traces(spec));
            bar_layout(spec)
        }
        ChartSpec::Pie(spec) => {
            plot.add_trace(pie_trace(spec));
            pie_layout(spec)
        }
        ChartSpec::Choropleth(spec) => choropleth(&mut plot, spec)?,
    };

    let layout = match &chart.title {
        Some(title) => layout.title(title.as_str()),
        None => layout,
    };
    plot.set_layout(layout.show_legend(chart.show_legend));

    Ok(plot)
}

fn plot_scale(scale: ColorScale) -> PlotScale {
    PlotScale::Vector(
        scale
            .stops()
            .into_iter()
            .map(|(position, color)| ColorScaleElement(position, color.to_string()))
            .collect(),
    )
}

fn usa_geo() -> LayoutGeo {
    LayoutGeo::new().projection(Projection::new().projection_type(ProjectionType::AlbersUsa))
}

fn zero_margin() -> Margin {
    Margin::new().left(0).right(0).top(0).bottom(0)
}

fn geo_layout(geo: &GeoStyle) -> Layout {
    Layout::new()
        .hover_mode(HoverMode::Closest)
        .margin(zero_margin())
        .geo(
            usa_geo()
                .showland(true)
                .landcolor(geo.land_color.clone())
                .showlakes(true)
                .lakecolor(geo.lake_color.clone()),
        )
}

// Line maps

/// Flattens segments into one coordinate run per axis, with a gap between
/// consecutive segments so plotly.js lifts the pen.
fn segment_runs(layer: &LineLayer) -> (Vec<Option<f64>>, Vec<Option<f64>>, Vec<String>) {
    let capacity = layer.segments.len() * 3;
    let mut lats = Vec::with_capacity(capacity);
    let mut lons = Vec::with_capacity(capacity);
    let mut text = Vec::with_capacity(capacity);

    for (i, segment) in layer.segments.iter().enumerate() {
        if i > 0 {
            lats.push(None);
            lons.push(None);
            text.push(String::new());
        }
        for point in 0..2 {
            lats.push(Some(segment.lats[point]));
            lons.push(Some(segment.lons[point]));
            text.push(segment.hover.clone());
        }
    }

    (lats, lons, text)
}

fn line_geo_traces(spec: &LineGeoChart) -> Vec<Box<dyn Trace>> {
    spec.layers
        .iter()
        .map(|layer| {
            let (lat, lon, text) = segment_runs(layer);
            ScatterGeo::new(lat, lon)
                .mode(Mode::Lines)
                .name(&layer.name)
                .text_array(text)
                .hover_info(HoverInfo::Text)
                .line(Line::new().color(layer.color.clone()).width(layer.width))
                as Box<dyn Trace>
        })
        .collect()
}

// Point maps

fn scatter_geo_trace(spec: &ScatterGeoChart) -> Box<dyn Trace> {
    let lat: Vec<f64> = spec.points.iter().map(|p| p.lat).collect();
    let lon: Vec<f64> = spec.points.iter().map(|p| p.lon).collect();
    let text: Vec<&str> = spec.points.iter().map(|p| p.text.as_str()).collect();
    let color: Vec<f64> = spec.points.iter().map(|p| p.value).collect();

    ScatterGeo::new(lat, lon)
        .mode(Mode::Markers)
        .text_array(text)
        .hover_info(HoverInfo::Text)
        .marker(
            Marker::new()
                .size(spec.marker.size)
                .opacity(spec.marker.opacity)
                .symbol(MarkerSymbol::Circle)
                .auto_color_scale(false)
                .line(
                    Line::new()
                        .width(spec.marker.line_width)
                        .color(spec.marker.line_color.clone()),
                )
                .color_scale(plot_scale(spec.color_scale))
                .cmin(spec.color_min)
                .cmax(spec.color_max)
                .color_array(color)
                .color_bar(ColorBar::new().title(spec.colorbar_title.as_str())),
        )
}

// Bars

/// Splits bar rows into color groups in order of first appearance.
fn bar_groups(rows: &[BarRow]) -> Vec<(&str, Vec<&BarRow>)> {
    let mut groups: Vec<(&str, Vec<&BarRow>)> = Vec::new();
    for row in rows {
        if let Some((_, members)) = groups.iter_mut().find(|(g, _)| *g == row.group) {
            members.push(row);
        } else {
            groups.push((row.group.as_str(), vec![row]));
        }
    }
    groups
}

fn bar_hovertemplate(spec: &BarChart, group: Option<&str>) -> String {
    let (category_axis, value_axis) = match spec.orientation {
        Orientation::Horizontal => ("y", "x"),
        Orientation::Vertical => ("x", "y"),
    };

    let mut lines = Vec::new();
    if spec.category_in_hover {
        lines.push(format!("{}=%{{{category_axis}}}", spec.category_label));
    }
    match group {
        Some(group) => lines.push(format!("{}={group}", spec.color_label)),
        None => lines.push(format!("{}=%{{marker.color}}", spec.color_label)),
    }
    lines.push(format!("{}=%{{{value_axis}}}", spec.value_label));
    if let Some(label) = &spec.detail_label {
        lines.push(format!("{label}=%{{hovertext}}"));
    }

    format!("{}<extra></extra>", lines.join("<br>"))
}

/// Applies everything orientation-independent to a bar trace.
fn styled_bar<X, Y>(
    bar: Box<Bar<X, Y>>,
    spec: &BarChart,
    rows: &[&BarRow],
    group: Option<&str>,
    marker: Marker,
) -> Box<dyn Trace>
where
    X: Serialize + Clone + 'static,
    Y: Serialize + Clone + 'static,
{
    let mut bar = bar
        .marker(marker)
        .hover_template(bar_hovertemplate(spec, group));
    if let Some(group) = group {
        bar = bar.name(group).legend_group(group);
    }
    if spec.detail_label.is_some() {
        let details: Vec<&str> = rows
            .iter()
            .map(|r| r.detail.as_deref().unwrap_or_default())
            .collect();
        bar = bar.hover_text_array(details);
    }
    bar
}

fn bar_trace(
    spec: &BarChart,
    rows: &[&BarRow],
    group: Option<&str>,
    marker: Marker,
) -> Box<dyn Trace> {
    let categories: Vec<String> = rows.iter().map(|r| r.category.clone()).collect();
    let values: Vec<u64> = rows.iter().map(|r| r.value).collect();
    match spec.orientation {
        Orientation::Horizontal => styled_bar(
            Bar::new(values, categories).orientation(BarOrientation::Horizontal),
            spec,
            rows,
            group,
            marker,
        ),
        Orientation::Vertical => styled_bar(
            Bar::new(categories, values).orientation(BarOrientation::Vertical),
            spec,
            rows,
            group,
            marker,
        ),
    }
}

fn bar_traces(spec: &BarChart) -> Vec<Box<dyn Trace>> {
    match spec.coloring {
        BarColoring::Discrete { scale } => bar_groups(&spec.rows)
            .into_iter()
            .enumerate()
            .map(|(i, (group, rows))| {
                let marker = Marker::new().color(scale.discrete(i));
                bar_trace(spec, &rows, Some(group), marker)
            })
            .collect(),
        BarColoring::Continuous { scale } => {
            let rows: Vec<&BarRow> = spec.rows.iter().collect();
            let colors: Vec<f64> = rows.iter().map(|r| r.color_value).collect();
            let min = colors.iter().copied().fold(f64::INFINITY, f64::min);
            let max = colors.iter().copied().fold(f64::NEG_INFINITY, f64::max);

            let mut marker = Marker::new()
                .color_scale(plot_scale(scale))
                .color_bar(ColorBar::new().title(spec.color_label.as_str()));
            if min.is_finite() && max.is_finite() {
                marker = marker.cmin(min).cmax(max);
            }
            vec![bar_trace(spec, &rows, None, marker.color_array(colors))]
        }
    }
}

fn bar_layout(spec: &BarChart) -> Layout {
    let (x_title, y_title) = match spec.orientation {
        Orientation::Horizontal => (&spec.value_label, &spec.category_label),
        Orientation::Vertical => (&spec.category_label, &spec.value_label),
    };

    Layout::new()
        .bar_mode(BarMode::Relative)
        .x_axis(Axis::new().title(x_title.as_str()))
        .y_axis(Axis::new().title(y_title.as_str()))
        .legend(
            Legend::new()
                .title(spec.color_label.as_str())
                .trace_order(TraceOrder::Reversed),
        )
}

// Pies

fn pie_trace(spec: &PieChart) -> Box<dyn Trace> {
    let labels: Vec<&str> = spec.slices.iter().map(|s| s.label.as_str()).collect();
    let values: Vec<u64> = spec.slices.iter().map(|s| s.value).collect();

    Pie::new(values)
        .labels(labels)
        .hover_template(format!(
            "{}=%{{label}}<br>{}=%{{value}}<extra></extra>",
            spec.label_title, spec.value_title
        ))
}

/// Slice colors in the order plotly.js hands them out: largest slice first,
/// ties in input order. Each slice keeps the color of its input position.
fn pie_colorway(spec: &PieChart) -> Vec<&'static str> {
    let mut order: Vec<usize> = (0..spec.slices.len()).collect();
    order.sort_by(|&a, &b| spec.slices[b].value.cmp(&spec.slices[a].value));
    order.into_iter().map(|i| spec.scale.discrete(i)).collect()
}

fn pie_layout(spec: &PieChart) -> Layout {
    Layout::new()
        .legend(Legend::new().title(spec.label_title.as_str()))
        .pie_colorway(pie_colorway(spec))
}

// Choropleths

/// A plotly.js `choropleth` trace over USA state codes.
#[derive(Debug, Clone, Serialize)]
struct Choropleth {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(rename = "locationmode")]
    location_mode: &'static str,
    locations: Vec<String>,
    z: Vec<u64>,
    #[serde(rename = "coloraxis")]
    color_axis: &'static str,
    #[serde(rename = "hovertemplate")]
    hover_template: String,
}

impl Choropleth {
    fn new(spec: &ChoroplethChart, frame: usize) -> Box<Self> {
        let (locations, z) = spec
            .frames
            .get(frame)
            .map(|f| (f.locations.clone(), f.values.clone()))
            .unwrap_or_default();

        Box::new(Self {
            kind: "choropleth",
            location_mode: "USA-states",
            locations,
            z,
            color_axis: "coloraxis",
            hover_template: format!(
                "{}=%{{location}}<br>{}=%{{z}}<extra></extra>",
                spec.location_label, spec.value_label
            ),
        })
    }
}

impl Trace for Choropleth {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

fn animation_options() -> AnimationOptions {
    AnimationOptions::new()
        .mode(AnimationMode::Immediate)
        .fromcurrent(true)
        .frame(
            FrameSettings::new()
                .duration(FRAME_DURATION_MS)
                .redraw(true),
        )
        .transition(TransitionSettings::new().duration(0))
}

fn animation_controls(
    spec: &ChoroplethChart,
) -> Result<(Slider, UpdateMenu), ControlBuilderError> {
    let steps = spec
        .frames
        .iter()
        .map(|frame| {
            SliderStepBuilder::new()
                .label(&frame.name)
                .animation(
                    Animation::frames(vec![frame.name.clone()]).options(animation_options()),
                )
                .build()
        })
        .collect::<Result<Vec<_>, _>>()?;

    let prefix = spec
        .frame_label
        .as_ref()
        .map(|label| format!("{label}="))
        .unwrap_or_default();

    let slider = Slider::new()
        .active(0)
        .current_value(SliderCurrentValue::new().prefix(prefix))
        .length(0.9)
        .x(0.1)
        .y(0.0)
        .steps(steps);

    let play = ButtonBuilder::new()
        .label("&#9654;")
        .animation(Animation::all_frames().options(animation_options()))
        .build()?;
    let pause = ButtonBuilder::new()
        .label("&#9724;")
        .animation(Animation::pause())
        .build()?;

    let menu = UpdateMenu::new()
        .ty(UpdateMenuType::Buttons)
        .direction(UpdateMenuDirection::Left)
        .show_active(false)
        .x(0.1)
        .y(0.0)
        .x_anchor(Anchor::Right)
        .y_anchor(Anchor::Top)
        .buttons(vec![play, pause]);

    Ok((slider, menu))
}

#[allow(clippy::cast_precision_loss)]
fn choropleth(plot: &mut Plot, spec: &ChoroplethChart) -> Result<Layout, ControlBuilderError> {
    if !spec.frames.is_empty() {
        plot.add_trace(Choropleth::new(spec, 0));
    }

    let mut color_axis = ColorAxis::new()
        .color_scale(plot_scale(spec.scale))
        .color_bar(ColorBar::new().title(spec.value_label.as_str()));
    if let Some((min, max)) = spec.value_range() {
        color_axis = color_axis.cmin(min as f64).cmax(max as f64);
    }

    let mut layout = Layout::new()
        .margin(zero_margin())
        .geo(usa_geo())
        .color_axis(color_axis);

    if spec.frames.len() > 1 {
        for (i, frame) in spec.frames.iter().enumerate() {
            let mut data = Traces::new();
            data.push(Choropleth::new(spec, i));
            plot.add_frame(Frame::new().name(&frame.name).data(data));
        }
        let (slider, menu) = animation_controls(spec)?;
        layout = layout.sliders(vec![slider]).update_menus(vec![menu]);
    }

    Ok(layout)
}
