//! Plotting infrastructure for the assumption checks
//!
//! Charts are drawn with the [`plotters`] bitmap backend and saved as PNG
//! files with a fixed 1200x800 resolution. A [`PlotSink`] owns the output
//! directory and numbers every file in the order the plots were requested,
//! so a run's plots read in the same sequence as its console output.

use crate::common::data_structures::Group;
use crate::statistics::descriptive::HistogramBin;
use crate::statistics::regression::LinearRegression;
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to save plot to file: {0}")]
    FileSave(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

type Result<T> = core::result::Result<T, PlotError>;

const RESOLUTION: (u32, u32) = (1200, 800);

/// Caption font size used for titles that fit the chart width.
const CAPTION_FONT_SIZE: u32 = 40;

/// Smallest caption font size long titles are shrunk to.
const MIN_CAPTION_FONT_SIZE: u32 = 20;

/// Approximate width of a sans-serif glyph relative to the font size.
const GLYPH_WIDTH_RATIO: f64 = 0.55;

/// Destination for the plots of a run
#[derive(Debug, Clone)]
pub struct PlotSink {
    output_dir: PathBuf,
    enabled: bool,
    counter: usize,
}

impl PlotSink {
    /// Plots are written to `output_dir`, created on first use.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            enabled: true,
            counter: 0,
        }
    }

    /// A sink that accepts every request and renders nothing.
    pub fn disabled() -> Self {
        Self {
            output_dir: PathBuf::new(),
            enabled: false,
            counter: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of plots written so far.
    pub fn count(&self) -> usize {
        self.counter
    }

    /// Reserves the next numbered file name for a plot titled `title`.
    fn next_path(&mut self, title: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        self.counter += 1;
        Ok(self
            .output_dir
            .join(format!("{:02}_{}.png", self.counter, file_stem(title))))
    }

    /// Scatter plot of `points` with the fitted line and the per-group means.
    pub fn regression(
        &mut self,
        points: &[(f64, f64)],
        fit: &LinearRegression,
        group_means: &[(f64, f64)],
        x_label: &str,
        y_label: &str,
    ) -> Result<Option<PathBuf>> {
        if !self.enabled {
            return Ok(None);
        }

        let title = format!("Scatter Plot and Regression Line: {y_label} vs. {x_label}");
        let path = self.next_path(&format!("linearity {y_label} vs {x_label}"))?;
        create_regression_plot(points, fit, group_means, &title, x_label, y_label, &path)?;
        tracing::debug!(path = %path.display(), "Saved regression plot");
        Ok(Some(path))
    }

    /// Vertical box plot of each group's values.
    pub fn box_plot(
        &mut self,
        groups: &[Group],
        title: &str,
        x_label: &str,
        y_label: &str,
    ) -> Result<Option<PathBuf>> {
        if !self.enabled {
            return Ok(None);
        }

        let path = self.next_path(&format!("{title} {y_label} by {x_label}"))?;
        create_box_plot(groups, title, x_label, y_label, &path)?;
        tracing::debug!(path = %path.display(), "Saved box plot");
        Ok(Some(path))
    }

    /// Histogram of already binned values.
    pub fn histogram(
        &mut self,
        bins: &[HistogramBin],
        title: &str,
        x_label: &str,
    ) -> Result<Option<PathBuf>> {
        if !self.enabled {
            return Ok(None);
        }

        let path = self.next_path(&format!("histogram {title}"))?;
        create_histogram(bins, title, x_label, &path)?;
        tracing::debug!(path = %path.display(), "Saved histogram");
        Ok(Some(path))
    }
}

/// Lowercase file stem with every run of non-alphanumeric characters collapsed to `_`.
fn file_stem(title: &str) -> String {
    let mut stem = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            stem.push(c.to_ascii_lowercase());
        } else if !stem.is_empty() && !stem.ends_with('_') {
            stem.push('_');
        }
    }
    stem.trim_end_matches('_').to_string()
}

/// Extends a degenerate `(min, max)` range and adds 5% padding on both sides.
fn padded_range(min: f64, max: f64) -> (f64, f64) {
    if min == max {
        return (min - 1.0, max + 1.0);
    }
    let padding = (max - min) * 0.05;
    (min - padding, max + padding)
}

/// Picks a caption font size so that `title` fits within the chart width.
///
/// # Arguments
/// * `title` - Caption text drawn above the chart
///
/// # Returns
/// [`CAPTION_FONT_SIZE`] for short titles, otherwise a smaller size no lower
/// than [`MIN_CAPTION_FONT_SIZE`]
fn caption_font_size(title: &str) -> u32 {
    // Usable width is the image width minus both 20px margins
    let available = f64::from(RESOLUTION.0 - 40);
    let glyphs = title.chars().count().max(1) as f64;
    let fitted = (available / (glyphs * GLYPH_WIDTH_RATIO)).floor() as u32;
    fitted.clamp(MIN_CAPTION_FONT_SIZE, CAPTION_FONT_SIZE)
}

/// Stroke shared by the regression line and its legend swatch.
fn regression_line_style() -> ShapeStyle {
    RED.stroke_width(2)
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |range, value| match range {
        None => Some((value, value)),
        Some((min, max)) => Some((min.min(value), max.max(value))),
    })
}

/// Creates a scatter plot with a regression line and per-group means, saved as PNG.
///
/// # Arguments
/// * `points` - Individual `(x, y)` observations
/// * `fit` - Least-squares fit drawn across the x range of `points`
/// * `group_means` - `(x, mean of y)` for each distinct x
/// * `output_path` - Path where the PNG file should be saved
pub fn create_regression_plot(
    points: &[(f64, f64)],
    fit: &LinearRegression,
    group_means: &[(f64, f64)],
    title: &str,
    x_label: &str,
    y_label: &str,
    output_path: &Path,
) -> Result<()> {
    // Validate input data
    if points.is_empty() {
        return Err(PlotError::InvalidData("Points cannot be empty".to_string()));
    }
    if points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
        return Err(PlotError::InvalidData(
            "Points must be finite".to_string(),
        ));
    }

    // The fitted line spans the observed x range; the y range must cover it too
    let (x_min, x_max) = bounds(points.iter().map(|(x, _)| *x))
        .ok_or_else(|| PlotError::InvalidData("Points cannot be empty".to_string()))?;
    let line = [(x_min, fit.predict(x_min)), (x_max, fit.predict(x_max))];
    let (y_min, y_max) = bounds(
        points
            .iter()
            .chain(group_means)
            .chain(&line)
            .map(|(_, y)| *y),
    )
    .ok_or_else(|| PlotError::InvalidData("Points cannot be empty".to_string()))?;

    let (x_lo, x_hi) = padded_range(x_min, x_max);
    let (y_lo, y_hi) = padded_range(y_min, y_max);

    let drawing_area = BitMapBackend::new(output_path, RESOLUTION).into_drawing_area();
    drawing_area
        .fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&drawing_area)
        .caption(title, ("sans-serif", caption_font_size(title)))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .label_style(("sans-serif", 25))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart
        .draw_series(
            points
                .iter()
                .map(|&point| Circle::new(point, 4, BLUE.mix(0.6).filled())),
        )
        .map_err(|e| PlotError::Drawing(e.to_string()))?
        .label("Individual Data Points")
        .legend(|(x, y)| Circle::new((x + 10, y), 4, BLUE.filled()));

    chart
        .draw_series(LineSeries::new(line, regression_line_style()))
        .map_err(|e| PlotError::Drawing(e.to_string()))?
        .label("Regression Line")
        .legend(|(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], regression_line_style())
        });

    chart
        .draw_series(
            group_means
                .iter()
                .map(|&mean| Circle::new(mean, 9, GREEN.filled())),
        )
        .map_err(|e| PlotError::Drawing(e.to_string()))?
        .label("Mean of Y for each X")
        .legend(|(x, y)| Circle::new((x + 10, y), 6, GREEN.filled()));

    // Legend in the lower right, clear of the rising regression line
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 22))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    drawing_area
        .present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

/// Creates one vertical box plot per group, in the order given, saved as PNG.
///
/// # Arguments
/// * `groups` - Groups to draw, each labelled with its key
/// * `title` - Chart title displayed at the top of the plot
/// * `x_label` - Label for the X-axis (the grouping column)
/// * `y_label` - Label for the Y-axis (the measured column)
/// * `output_path` - Path where the PNG file should be saved
///
/// # Returns
/// * `Ok(())` - If the chart was successfully created and saved
/// * `Err(PlotError)` - If a group is empty or drawing failed
pub fn create_box_plot(
    groups: &[Group],
    title: &str,
    x_label: &str,
    y_label: &str,
    output_path: &Path,
) -> Result<()> {
    if groups.is_empty() {
        return Err(PlotError::InvalidData("Groups cannot be empty".to_string()));
    }
    if let Some(group) = groups.iter().find(|group| group.values.is_empty()) {
        return Err(PlotError::InvalidData(format!(
            "Group {} has no values",
            group.label()
        )));
    }

    // One segment per group on the X-axis
    let labels: Vec<String> = groups.iter().map(Group::label).collect();
    let quartiles: Vec<Quartiles> = groups
        .iter()
        .map(|group| Quartiles::new(&group.values))
        .collect();

    let (y_min, y_max) = bounds(groups.iter().flat_map(|group| group.values.iter().copied()))
        .ok_or_else(|| PlotError::InvalidData("Groups cannot be empty".to_string()))?;
    let (y_lo, y_hi) = padded_range(y_min, y_max);

    // Create the drawing area (1200x800 PNG)
    let drawing_area = BitMapBackend::new(output_path, RESOLUTION).into_drawing_area();
    drawing_area
        .fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&drawing_area)
        .caption(title, ("sans-serif", caption_font_size(title)))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(labels[..].into_segmented(), y_lo as f32..y_hi as f32)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .label_style(("sans-serif", 25))
        // Segment boundaries carry no label
        .x_label_formatter(&|value| match value {
            SegmentValue::Exact(label) | SegmentValue::CenterOf(label) => label.to_string(),
            SegmentValue::Last => String::new(),
        })
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart
        .draw_series(labels.iter().zip(&quartiles).map(|(label, quartiles)| {
            Boxplot::new_vertical(SegmentValue::CenterOf(label), quartiles)
                .width(40)
                .whisker_width(0.5)
                .style(&BLUE)
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    drawing_area
        .present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

/// Creates a frequency histogram from precomputed bins, saved as PNG.
///
/// # Arguments
/// * `bins` - Contiguous equal-width bins, in ascending order
/// * `title` - Chart title displayed at the top of the plot
/// * `x_label` - Label for the X-axis
/// * `output_path` - Path where the PNG file should be saved
///
/// # Returns
/// * `Ok(())` - If the chart was successfully created and saved
/// * `Err(PlotError)` - If there are no bins or drawing failed
pub fn create_histogram(
    bins: &[HistogramBin],
    title: &str,
    x_label: &str,
    output_path: &Path,
) -> Result<()> {
    let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
        return Err(PlotError::InvalidData("Bins cannot be empty".to_string()));
    };

    // Leave 10% headroom above the tallest bar
    let max_count = bins.iter().map(|bin| bin.count).max().unwrap_or(0);
    let y_max = (max_count as f64 * 1.1).max(1.0);

    let drawing_area = BitMapBackend::new(output_path, RESOLUTION).into_drawing_area();
    drawing_area
        .fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&drawing_area)
        .caption(title, ("sans-serif", caption_font_size(title)))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(first.start..last.end, 0.0..y_max)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc("Frequency")
        .label_style(("sans-serif", 25))
        .y_label_formatter(&|count| format!("{:.0}", count))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart
        .draw_series(bins.iter().map(|bin| {
            Rectangle::new(
                [(bin.start, 0.0), (bin.end, bin.count as f64)],
                BLUE.mix(0.6).filled(),
            )
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    // Bar outlines
    chart
        .draw_series(bins.iter().map(|bin| {
            Rectangle::new([(bin.start, 0.0), (bin.end, bin.count as f64)], &BLACK)
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    drawing_area
        .present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}
