#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The report as data.
//!
//! A [`Report`] is an ordered list of [`Block`]s: prose, charts, and small
//! tables. Building the list and rendering it are separate steps, so the
//! order and content of a report can be inspected without producing any
//! HTML.

pub mod palette;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use palette::{ColorScale, Palette};

/// A fully built report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Page title.
    pub title: String,
    /// When the report was built.
    pub generated_at: DateTime<Utc>,
    /// Content, in display order.
    pub blocks: Vec<Block>,
}

/// One top-level unit of report content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Block {
    /// Static or computed prose.
    Narrative(Narrative),
    /// An interactive chart.
    Chart(Chart),
    /// A table of values.
    Table(Table),
}

impl Block {
    /// Short kind name, used in logs and tests.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Narrative(_) => "narrative",
            Self::Chart(chart) => chart.spec.kind(),
            Self::Table(_) => "table",
        }
    }
}

// Prose

/// A run of prose elements shown together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Narrative {
    /// Elements, in display order.
    pub elements: Vec<Prose>,
}

impl Narrative {
    /// Appends a heading.
    #[must_use]
    pub fn heading(mut self, level: u8, text: impl Into<String>) -> Self {
        self.elements.push(Prose::Heading {
            level,
            text: text.into(),
        });
        self
    }

    /// Appends a paragraph.
    #[must_use]
    pub fn paragraph(mut self, spans: Vec<Span>) -> Self {
        self.elements.push(Prose::Paragraph(spans));
        self
    }

    /// Appends a bullet list.
    #[must_use]
    pub fn bullets(mut self, items: Vec<Vec<Span>>) -> Self {
        self.elements.push(Prose::Bullets(items));
        self
    }

    /// All text in the narrative, without markup.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for element in &self.elements {
            match element {
                Prose::Heading { text, .. } => out.push_str(text),
                Prose::Paragraph(spans) => spans.iter().for_each(|s| out.push_str(s.as_str())),
                Prose::Bullets(items) => {
                    for spans in items {
                        spans.iter().for_each(|s| out.push_str(s.as_str()));
                        out.push('\n');
                    }
                }
            }
            out.push('\n');
        }
        out
    }
}

/// A structural prose element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "camelCase")]
pub enum Prose {
    /// Section heading, level 1 to 3.
    Heading {
        /// Heading depth.
        level: u8,
        /// Heading text.
        text: String,
    },
    /// Inline spans forming one paragraph.
    Paragraph(Vec<Span>),
    /// Unordered list; each item is a run of spans.
    Bullets(Vec<Vec<Span>>),
}

/// Inline text with optional emphasis or a hyperlink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Span {
    /// Plain text.
    Text {
        /// Content.
        text: String,
    },
    /// Bold text.
    Strong {
        /// Content.
        text: String,
    },
    /// Italic text.
    Emphasis {
        /// Content.
        text: String,
    },
    /// Hyperlink.
    Link {
        /// Link label.
        text: String,
        /// Target URL.
        href: String,
    },
}

impl Span {
    /// Plain text span.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Bold span.
    #[must_use]
    pub fn strong(text: impl Into<String>) -> Self {
        Self::Strong { text: text.into() }
    }

    /// Italic span.
    #[must_use]
    pub fn emphasis(text: impl Into<String>) -> Self {
        Self::Emphasis { text: text.into() }
    }

    /// Hyperlink span.
    #[must_use]
    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self::Link {
            text: text.into(),
            href: href.into(),
        }
    }

    /// The visible text of the span.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text { text }
            | Self::Strong { text }
            | Self::Emphasis { text }
            | Self::Link { text, .. } => text,
        }
    }
}

// Tables

/// A table with an optional row-label column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Column headers, excluding the row-label column.
    pub columns: Vec<String>,
    /// Rows, in display order.
    pub rows: Vec<TableRow>,
    /// Whether the table scrolls inside a fixed-height frame.
    pub scrollable: bool,
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    /// Row label shown before the cells.
    pub label: Option<String>,
    /// Cell values, one per column.
    pub cells: Vec<String>,
}

// Charts

/// A chart with its common layout settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chart {
    /// Chart title.
    pub title: Option<String>,
    /// Whether the legend is shown.
    pub show_legend: bool,
    /// What to draw.
    pub spec: ChartSpec,
}

/// The chart types a report can contain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ChartSpec {
    /// Layers of line segments on a map.
    LineGeo(LineGeoChart),
    /// Colored points on a map.
    ScatterGeo(ScatterGeoChart),
    /// Categorical bars.
    Bar(BarChart),
    /// Pie slices.
    Pie(PieChart),
    /// States shaded by value, optionally animated over frames.
    Choropleth(ChoroplethChart),
}

impl ChartSpec {
    /// Short kind name.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::LineGeo(_) => "line_geo",
            Self::ScatterGeo(_) => "scatter_geo",
            Self::Bar(_) => "bar",
            Self::Pie(_) => "pie",
            Self::Choropleth(_) => "choropleth",
        }
    }
}

/// Base-map appearance for point and line maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoStyle {
    /// Land fill color.
    pub land_color: String,
    /// Lake fill color.
    pub lake_color: String,
}

impl Default for GeoStyle {
    fn default() -> Self {
        Self {
            land_color: "#b1f699".to_string(),
            lake_color: "LightBlue".to_string(),
        }
    }
}

/// A line map drawn from several layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineGeoChart {
    /// Layers in drawing order.
    pub layers: Vec<LineLayer>,
    /// Base-map appearance.
    pub geo: GeoStyle,
}

/// One uniformly styled set of segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineLayer {
    /// Layer name.
    pub name: String,
    /// Line color.
    pub color: String,
    /// Line width in pixels.
    pub width: f64,
    /// Segments in the layer.
    pub segments: Vec<LineSegment>,
}

/// A segment with its hover text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSegment {
    /// Start and end latitudes.
    pub lats: [f64; 2],
    /// Start and end longitudes.
    pub lons: [f64; 2],
    /// Hover text.
    pub hover: String,
}

/// A point map colored on a continuous scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterGeoChart {
    /// Points to draw.
    pub points: Vec<GeoPoint>,
    /// Marker appearance.
    pub marker: MarkerStyle,
    /// Scale the point values are mapped onto.
    pub color_scale: ColorScale,
    /// Value mapped to the low end of the scale.
    pub color_min: f64,
    /// Value mapped to the high end of the scale.
    pub color_max: f64,
    /// Colorbar title.
    pub colorbar_title: String,
    /// Base-map appearance.
    pub geo: GeoStyle,
}

/// One map point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
    /// Hover text.
    pub text: String,
    /// Value mapped onto the color scale.
    pub value: f64,
}

/// Marker appearance for point maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerStyle {
    /// Marker diameter in pixels.
    pub size: usize,
    /// Marker opacity.
    pub opacity: f64,
    /// Outline color.
    pub line_color: String,
    /// Outline width in pixels.
    pub line_width: f64,
}

/// Bar direction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Orientation {
    /// Categories on the y axis.
    Horizontal,
    /// Categories on the x axis.
    Vertical,
}

/// How bars are colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum BarColoring {
    /// One trace per group, colors taken in order from the scale.
    Discrete {
        /// Palette cycled over groups.
        scale: ColorScale,
    },
    /// A single trace colored by each row's numeric value.
    Continuous {
        /// Scale the values are mapped onto.
        scale: ColorScale,
    },
}

/// A bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarChart {
    /// Bar direction.
    pub orientation: Orientation,
    /// Category axis title.
    pub category_label: String,
    /// Value axis title.
    pub value_label: String,
    /// Color legend or colorbar title.
    pub color_label: String,
    /// Color mapping.
    pub coloring: BarColoring,
    /// Title for [`BarRow::detail`] in hover text.
    pub detail_label: Option<String>,
    /// Whether the category is listed in hover text.
    pub category_in_hover: bool,
    /// Rows, in display order.
    pub rows: Vec<BarRow>,
}

/// One bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarRow {
    /// Category axis value.
    pub category: String,
    /// Bar length.
    pub value: u64,
    /// Color group (discrete coloring) or value label (continuous).
    pub group: String,
    /// Color value for continuous coloring.
    pub color_value: f64,
    /// Extra hover value.
    pub detail: Option<String>,
}

/// A pie chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieChart {
    /// Slice label title.
    pub label_title: String,
    /// Slice value title.
    pub value_title: String,
    /// Slice colors, in slice order.
    pub scale: ColorScale,
    /// Slices, in display order.
    pub slices: Vec<PieSlice>,
}

/// One pie slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieSlice {
    /// Slice label.
    pub label: String,
    /// Slice value.
    pub value: u64,
}

/// A US-states choropleth.
///
/// A single frame draws a static map; more than one frame draws an animation
/// whose frames share one color range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoroplethChart {
    /// Location column title.
    pub location_label: String,
    /// Value column title and colorbar title.
    pub value_label: String,
    /// Animation slider title.
    pub frame_label: Option<String>,
    /// Color scale.
    pub scale: ColorScale,
    /// Frames in playback order.
    pub frames: Vec<ChoroplethFrame>,
}

impl ChoroplethChart {
    /// Smallest and largest value over every frame.
    #[must_use]
    pub fn value_range(&self) -> Option<(u64, u64)> {
        let values = self.frames.iter().flat_map(|f| f.values.iter().copied());
        let min = values.clone().min()?;
        let max = values.max()?;
        Some((min, max))
    }
}

/// One choropleth frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoroplethFrame {
    /// Frame name (the animation key).
    pub name: String,
    /// State abbreviations.
    pub locations: Vec<String>,
    /// Value for each location.
    pub values: Vec<u64>,
}
