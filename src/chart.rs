//! Renderer-agnostic chart description of a histogram with σ annotations.
//!
//! The x axis is categorical by bucket index, so annotation positions are
//! expressed in bucket units: `value / bucket_width`.

use palette::Srgba;
use serde::{Serialize, Serializer};

use crate::data::LiftType;
use crate::stats::{Bucket, Summary};

pub const X_AXIS_TITLE: &str = "weight in kg";
pub const Y_AXIS_TITLE: &str = "count people";

/// Offsets (in standard deviations) of the annotation lines; 0 is the mean.
pub const SIGMA_OFFSETS: [i32; 5] = [-2, -1, 0, 1, 2];

// ---------------------------------------------------------------------------
// Styling hints
// ---------------------------------------------------------------------------

/// An sRGB colour with alpha, serialized as a CSS `rgba(...)` string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorHint(pub Srgba<u8>);

impl ColorHint {
    pub fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        ColorHint(Srgba::new(red, green, blue, alpha))
    }

    pub fn to_css(&self) -> String {
        let c = self.0;
        let alpha = (c.alpha as f32 / 255.0 * 100.0).round() / 100.0;
        format!("rgba({}, {}, {}, {alpha})", c.red, c.green, c.blue)
    }
}

impl Serialize for ColorHint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_css())
    }
}

fn bar_fill() -> ColorHint {
    ColorHint::rgba(54, 162, 235, 51)
}

fn bar_border() -> ColorHint {
    ColorHint::rgba(54, 162, 235, 255)
}

fn sigma_line() -> ColorHint {
    ColorHint::rgba(255, 99, 132, 204)
}

fn mean_line() -> ColorHint {
    ColorHint::rgba(255, 250, 132, 204)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPosition {
    Start,
    Middle,
    End,
}

/// A vertical reference line at `mean + sigma * std_dev`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationLine {
    pub sigma: i32,
    /// Position in kg.
    pub value: f64,
    /// Position in bucket-index units.
    pub position: f64,
    pub color: ColorHint,
    pub width: f32,
    /// Dash and gap lengths.
    pub dash: [f32; 2],
    pub label: String,
    pub label_position: LabelPosition,
}

// ---------------------------------------------------------------------------
// Chart descriptor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDescriptor {
    pub dataset_label: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    /// Uniform bucket width, absent when there are no buckets.
    pub bucket_width: Option<f64>,
    /// One label per bucket: its lower edge in kg.
    pub labels: Vec<String>,
    /// One bar height (member count) per bucket.
    pub bars: Vec<usize>,
    pub bar_fill: ColorHint,
    pub bar_border: ColorHint,
    pub annotations: Vec<AnnotationLine>,
}

impl ChartDescriptor {
    /// Chart for a summary of one lift.
    pub fn from_summary(summary: &Summary, lift: LiftType) -> Self {
        build(&summary.buckets, summary.mean, summary.std_dev, lift.name())
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Map buckets and summary statistics to a chart description.
///
/// With no buckets the descriptor has no labels, bars or annotations.
pub fn build(buckets: &[Bucket], mean: f64, std_dev: f64, field_label: &str) -> ChartDescriptor {
    let bucket_width = buckets.first().map(|b| b.width).filter(|w| *w > 0.0);

    let labels = buckets
        .iter()
        .enumerate()
        .map(|(i, b)| format!("{}", i as f64 * b.width))
        .collect();
    let bars = buckets.iter().map(|b| b.count).collect();

    let annotations = match bucket_width {
        Some(width) => SIGMA_OFFSETS
            .iter()
            .map(|&sigma| annotation(sigma, mean, std_dev, width))
            .collect(),
        None => Vec::new(),
    };

    ChartDescriptor {
        dataset_label: field_label.to_string(),
        x_axis_title: X_AXIS_TITLE.to_string(),
        y_axis_title: Y_AXIS_TITLE.to_string(),
        bucket_width,
        labels,
        bars,
        bar_fill: bar_fill(),
        bar_border: bar_border(),
        annotations,
    }
}

fn annotation(sigma: i32, mean: f64, std_dev: f64, width: f64) -> AnnotationLine {
    let value = mean + sigma as f64 * std_dev;
    let (color, label, label_position) = if sigma == 0 {
        (mean_line(), "mean".to_string(), LabelPosition::Middle)
    } else {
        (sigma_line(), format!("{sigma:+}σ"), LabelPosition::End)
    };
    AnnotationLine {
        sigma,
        value,
        position: value / width,
        color,
        width: 2.0,
        dash: [5.0, 2.0],
        label,
        label_position,
    }
}

/// `123.456` → `"123.5kg"`.
pub fn format_kg(value: f64) -> String {
    format!("{value:.1}kg")
}
