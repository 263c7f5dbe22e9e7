//! Six-panel SVG rendering of a processed run
//!
//! Layout is two rows of three panels: distance, linear velocity and linear
//! acceleration on top, angle, angular velocity and angular acceleration
//! below. Every panel is plotted against time.

use crate::api::formatting::write_artifact;
use crate::core::DerivedSeries;
use crate::validation::error::{ProcessingError, ProcessingResult};
use std::fmt::Write;
use std::path::Path;

const LINEAR_COLOR: &str = "#1f77b4";
const ANGULAR_COLOR: &str = "#ff7f0e";

/// (title, y axis label, legend label) per panel, in `DerivedSeries::panels` order
const PANEL_LABELS: [(&str, &str, &str); 6] = [
    ("Distance vs Time", "Distance (r)", "Distance (r)"),
    ("Linear Velocity vs Time", "Velocity (dr/dt)", "Linear Velocity (dr/dt)"),
    ("Linear Acceleration vs Time", "Acceleration (d²r/dt²)", "Linear Acceleration (d²r/dt²)"),
    ("Angle vs Time", "Angle (θ)", "Angle (θ)"),
    ("Angular Velocity vs Time", "Velocity (dθ/dt)", "Angular Velocity (dθ/dt)"),
    ("Angular Acceleration vs Time", "Acceleration (d²θ/dt²)", "Angular Acceleration (d²θ/dt²)"),
];

/// Pixel geometry of the rendered figure
#[derive(Debug, Clone)]
pub struct PlotRenderer {
    pub width: f64,
    pub height: f64,
    /// Number of labelled ticks per axis
    pub ticks: usize,
}

impl Default for PlotRenderer {
    fn default() -> Self {
        Self {
            width: 1500.0,
            height: 1000.0,
            ticks: 5,
        }
    }
}

/// Closed value interval mapped onto a pixel span
#[derive(Debug, Clone, Copy, PartialEq)]
struct Range {
    min: f64,
    max: f64,
}

impl Range {
    /// Range of the finite values, padded when flat. `None` if nothing is finite.
    fn of(values: &[f64]) -> Option<Self> {
        let mut finite = values.iter().copied().filter(|v| v.is_finite());
        let first = finite.next()?;
        let (min, max) = finite.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if max > min {
            Some(Self { min, max })
        } else {
            let pad = if min == 0.0 { 1.0 } else { min.abs() * 0.05 };
            Some(Self {
                min: min - pad,
                max: max + pad,
            })
        }
    }

    fn ticks(&self, count: usize) -> Vec<f64> {
        if count < 2 {
            return vec![self.min];
        }
        let step = (self.max - self.min) / (count - 1) as f64;
        (0..count).map(|i| self.min + step * i as f64).collect()
    }

    /// Fraction of the way from `min` to `max`
    fn fraction(&self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min)
    }
}

/// Plot area of one panel in figure pixels
#[derive(Debug, Clone, Copy)]
struct Frame {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl Frame {
    fn x(&self, range: &Range, value: f64) -> f64 {
        self.left + range.fraction(value) * self.width
    }

    fn y(&self, range: &Range, value: f64) -> f64 {
        self.top + (1.0 - range.fraction(value)) * self.height
    }
}

impl PlotRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the SVG document for a processed run
    pub fn render(&self, series: &DerivedSeries) -> ProcessingResult<String> {
        if series.is_empty() {
            return Err(ProcessingError::Render {
                message: "no samples to plot".to_string(),
            });
        }
        let time_range = Range::of(&series.time).ok_or_else(|| ProcessingError::Render {
            message: "time axis has no finite values".to_string(),
        })?;

        let mut svg = String::new();
        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
            w = self.width,
            h = self.height
        )?;
        writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#)?;

        let cell_width = self.width / 3.0;
        let cell_height = self.height / 2.0;

        for (index, (_, values)) in series.panels().iter().enumerate() {
            let (title, y_label, legend) = PANEL_LABELS[index];
            let row = index / 3;
            let column = index % 3;
            let color = if row == 0 { LINEAR_COLOR } else { ANGULAR_COLOR };

            let frame = Frame {
                left: column as f64 * cell_width + 90.0,
                top: row as f64 * cell_height + 45.0,
                width: cell_width - 120.0,
                height: cell_height - 105.0,
            };

            writeln!(svg, r#"<g class="panel">"#)?;
            self.render_axes(&mut svg, &frame, &time_range, Range::of(values), title, y_label)?;
            if let Some(value_range) = Range::of(values) {
                self.render_line(&mut svg, &frame, &time_range, &value_range, &series.time, values, color)?;
            } else {
                writeln!(
                    svg,
                    r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" fill="gray">no finite data</text>"#,
                    frame.left + frame.width / 2.0,
                    frame.top + frame.height / 2.0
                )?;
            }
            self.render_legend(&mut svg, &frame, legend, color)?;
            writeln!(svg, "</g>")?;
        }

        writeln!(svg, "</svg>")?;
        Ok(svg)
    }

    /// Render and write to `path`, creating parent directories
    pub fn write_to<P: AsRef<Path>>(&self, series: &DerivedSeries, path: P) -> ProcessingResult<()> {
        let svg = self.render(series)?;
        write_artifact(path.as_ref(), &svg)
    }

    fn render_axes(
        &self,
        svg: &mut String,
        frame: &Frame,
        time_range: &Range,
        value_range: Option<Range>,
        title: &str,
        y_label: &str,
    ) -> ProcessingResult<()> {
        writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="15">{}</text>"#,
            frame.left + frame.width / 2.0,
            frame.top - 15.0,
            escape(title)
        )?;
        writeln!(
            svg,
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="black"/>"#,
            frame.left, frame.top, frame.width, frame.height
        )?;

        let bottom = frame.top + frame.height;
        for tick in time_range.ticks(self.ticks) {
            let x = frame.x(time_range, tick);
            writeln!(
                svg,
                r#"<line x1="{x:.1}" y1="{y1:.1}" x2="{x:.1}" y2="{y2:.1}" stroke="black"/><text x="{x:.1}" y="{ty:.1}" text-anchor="middle" font-size="11">{label}</text>"#,
                x = x,
                y1 = bottom,
                y2 = bottom + 5.0,
                ty = bottom + 18.0,
                label = format_tick(tick)
            )?;
        }
        writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12">Time (s)</text>"#,
            frame.left + frame.width / 2.0,
            bottom + 38.0
        )?;

        if let Some(range) = value_range {
            for tick in range.ticks(self.ticks) {
                let y = frame.y(&range, tick);
                writeln!(
                    svg,
                    r#"<line x1="{x1:.1}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="black"/><text x="{tx:.1}" y="{ty:.1}" text-anchor="end" font-size="11">{label}</text>"#,
                    x1 = frame.left - 5.0,
                    x2 = frame.left,
                    y = y,
                    tx = frame.left - 8.0,
                    ty = y + 4.0,
                    label = format_tick(tick)
                )?;
            }
        }

        let label_x = frame.left - 70.0;
        let label_y = frame.top + frame.height / 2.0;
        writeln!(
            svg,
            r#"<text x="{x:.1}" y="{y:.1}" text-anchor="middle" font-size="12" transform="rotate(-90 {x:.1} {y:.1})">{label}</text>"#,
            x = label_x,
            y = label_y,
            label = escape(y_label)
        )?;
        Ok(())
    }

    /// Polylines through the finite samples; a non-finite sample ends a segment
    #[allow(clippy::too_many_arguments)]
    fn render_line(
        &self,
        svg: &mut String,
        frame: &Frame,
        time_range: &Range,
        value_range: &Range,
        time: &[f64],
        values: &[f64],
        color: &str,
    ) -> ProcessingResult<()> {
        for segment in segments(time, values) {
            if let [(t, v)] = segment.as_slice() {
                writeln!(
                    svg,
                    r#"<circle cx="{:.2}" cy="{:.2}" r="1.5" fill="{}"/>"#,
                    frame.x(time_range, *t),
                    frame.y(value_range, *v),
                    color
                )?;
                continue;
            }
            let mut points = String::new();
            for (t, v) in &segment {
                write!(points, "{:.2},{:.2} ", frame.x(time_range, *t), frame.y(value_range, *v))?;
            }
            writeln!(
                svg,
                r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="1.5"/>"#,
                points.trim_end(),
                color
            )?;
        }
        Ok(())
    }

    fn render_legend(&self, svg: &mut String, frame: &Frame, legend: &str, color: &str) -> ProcessingResult<()> {
        let right = frame.left + frame.width;
        writeln!(
            svg,
            r#"<line x1="{:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="{c}" stroke-width="2"/><text x="{:.1}" y="{ty:.1}" text-anchor="end" font-size="11">{}</text>"#,
            right - 30.0,
            right - 10.0,
            right - 36.0,
            escape(legend),
            y = frame.top + 15.0,
            ty = frame.top + 19.0,
            c = color
        )?;
        Ok(())
    }
}

/// Runs of consecutive samples where both time and value are finite
fn segments(time: &[f64], values: &[f64]) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (&t, &v) in time.iter().zip(values) {
        if t.is_finite() && v.is_finite() {
            current.push((t, v));
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

fn format_tick(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-2..1e4).contains(&magnitude) {
        format!("{:.2e}", value)
    } else {
        format!("{:.2}", value)
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
