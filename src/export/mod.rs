//! Export adapter: serialize a constructed figure to static image bytes.
//!
//! PNG is attempted first; when the raster pipeline fails the figure is
//! re-rendered as SVG so the user still gets a file. The exported image is
//! the plotted geometry only; axes and legends live in the interactive
//! frontend.

use std::collections::BTreeMap;
use std::io::Cursor;

use log::warn;
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};

use crate::services::dispatch::{ChartError, Figure};

/// Default export width in pixels.
pub const DEFAULT_WIDTH: u32 = 1200;
/// Default export height in pixels.
pub const DEFAULT_HEIGHT: u32 = 700;
/// Largest accepted dimension per axis. Caps the raster buffer at a few
/// hundred MB; requests above it are rejected, not clamped.
pub const MAX_DIMENSION: u32 = 8192;

// Color ramp endpoints for value-encoded fills.
const RAMP_LOW: (u8, u8, u8) = (0x1f, 0x77, 0xb4);
const RAMP_HIGH: (u8, u8, u8) = (0xd6, 0x28, 0x28);

// View box used when a figure carries no drawable geometry, roughly the
// India bounding box.
const FALLBACK_LON_RANGE: (f64, f64) = (68.0, 98.0);
const FALLBACK_LAT_RANGE: (f64, f64) = (6.0, 37.0);

/// Image format of an exported figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Svg => "image/svg+xml",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

/// The bytes of a serialized figure, with the format they ended up in.
#[derive(Debug, Clone)]
pub struct ExportedImage {
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
}

/// Export a figure at the default size.
pub fn export_figure(figure: &Figure) -> Result<ExportedImage, ChartError> {
    export_with_size(figure, DEFAULT_WIDTH, DEFAULT_HEIGHT)
}

/// Export a figure as PNG, falling back to SVG when rasterization fails.
///
/// Dimensions above [`MAX_DIMENSION`] are rejected up front; they come from
/// user-controlled query parameters and would otherwise drive unbounded
/// allocations.
pub fn export_with_size(
    figure: &Figure,
    width: u32,
    height: u32,
) -> Result<ExportedImage, ChartError> {
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(ChartError::Render(format!(
            "image dimensions must be at most {} per axis, got {}x{}",
            MAX_DIMENSION, width, height
        )));
    }

    match render_png(figure, width, height) {
        Ok(bytes) => Ok(ExportedImage {
            format: ImageFormat::Png,
            bytes,
        }),
        Err(err) => {
            warn!("PNG export failed ({}), falling back to SVG", err);
            let bytes = render_svg(figure, width.max(1), height.max(1))?;
            Ok(ExportedImage {
                format: ImageFormat::Svg,
                bytes,
            })
        }
    }
}

/// Rasterize the figure into PNG bytes.
fn render_png(figure: &Figure, width: u32, height: u32) -> Result<Vec<u8>, ChartError> {
    if width == 0 || height == 0 {
        return Err(ChartError::Render(format!(
            "image dimensions must be non-zero, got {}x{}",
            width, height
        )));
    }

    // usize arithmetic: u32 * u32 * 3 can overflow in 32 bits.
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| ChartError::Render(e.to_string()))?;
        draw_figure(figure, &root)?;
        root.present()
            .map_err(|e| ChartError::Render(e.to_string()))?;
    }

    let image = image::RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| ChartError::Render("raster buffer size mismatch".to_string()))?;
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
        .map_err(|e| ChartError::Render(format!("PNG encoding failed: {}", e)))?;
    Ok(bytes)
}

/// Render the figure as an SVG document.
fn render_svg(figure: &Figure, width: u32, height: u32) -> Result<Vec<u8>, ChartError> {
    let mut document = String::new();
    {
        let root = SVGBackend::with_string(&mut document, (width, height)).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| ChartError::Render(e.to_string()))?;
        draw_figure(figure, &root)?;
        root.present()
            .map_err(|e| ChartError::Render(e.to_string()))?;
    }
    Ok(document.into_bytes())
}

fn draw_figure<DB>(figure: &Figure, root: &DrawingArea<DB, Shift>) -> Result<(), ChartError>
where
    DB: DrawingBackend,
{
    match figure {
        Figure::GeoScatter(data) => {
            let (lon_min, lon_max) = pad_range(data.lon_min, data.lon_max);
            let (lat_min, lat_max) = pad_range(data.lat_min, data.lat_max);
            let mut chart = ChartBuilder::on(root)
                .margin(12)
                .build_cartesian_2d(lon_min..lon_max, lat_min..lat_max)
                .map_err(|e| ChartError::Render(e.to_string()))?;

            let (size_min, size_max) = value_range(data.points.iter().map(|p| p.size));
            let (color_min, color_max) = value_range(data.points.iter().map(|p| p.color));
            chart
                .draw_series(data.points.iter().map(|p| {
                    let radius = 3.0 + 9.0 * unit(p.size, size_min, size_max);
                    Circle::new(
                        (p.longitude, p.latitude),
                        radius as i32,
                        ramp(unit(p.color, color_min, color_max)).filled(),
                    )
                }))
                .map_err(|e| ChartError::Render(e.to_string()))?;
        }
        Figure::Bar(data) => {
            let values = data.bars.iter().filter_map(|b| b.value);
            let (value_min, value_max) = value_range(values);
            let y_min = value_min.min(0.0);
            let (y_min, y_max) = pad_range(y_min, value_max.max(0.0));
            let x_max = data.bars.len().max(1) as f64;
            let mut chart = ChartBuilder::on(root)
                .margin(12)
                .build_cartesian_2d(0.0..x_max, y_min..y_max)
                .map_err(|e| ChartError::Render(e.to_string()))?;

            let colors = data.bars.iter().filter_map(|b| b.color_value);
            let (color_min, color_max) = value_range(colors);
            chart
                .draw_series(data.bars.iter().enumerate().filter_map(|(i, bar)| {
                    let value = bar.value?;
                    let t = bar
                        .color_value
                        .map(|c| unit(c, color_min, color_max))
                        .unwrap_or(0.0);
                    Some(Rectangle::new(
                        [(i as f64 + 0.15, 0.0), (i as f64 + 0.85, value)],
                        ramp(t).filled(),
                    ))
                }))
                .map_err(|e| ChartError::Render(e.to_string()))?;
        }
        Figure::Scatter(data) => {
            let (x_min, x_max) = pad_range_of(data.points.iter().map(|p| p.x));
            let (y_min, y_max) = pad_range_of(data.points.iter().map(|p| p.y));
            let mut chart = ChartBuilder::on(root)
                .margin(12)
                .build_cartesian_2d(x_min..x_max, y_min..y_max)
                .map_err(|e| ChartError::Render(e.to_string()))?;

            // Stable color assignment: groups in ascending name order.
            let groups: BTreeMap<&str, usize> = {
                let mut names: Vec<&str> =
                    data.points.iter().map(|p| p.group.as_str()).collect();
                names.sort_unstable();
                names.dedup();
                names.into_iter().enumerate().map(|(i, n)| (n, i)).collect()
            };
            chart
                .draw_series(data.points.iter().map(|p| {
                    let idx = groups.get(p.group.as_str()).copied().unwrap_or(0);
                    Circle::new((p.x, p.y), 4, Palette99::pick(idx).filled())
                }))
                .map_err(|e| ChartError::Render(e.to_string()))?;
        }
        Figure::Choropleth(data) => {
            let coords = data
                .regions
                .iter()
                .flat_map(|r| r.rings.iter())
                .flat_map(|ring| ring.iter());
            let (mut lon_min, mut lon_max) = (f64::INFINITY, f64::NEG_INFINITY);
            let (mut lat_min, mut lat_max) = (f64::INFINITY, f64::NEG_INFINITY);
            for pos in coords {
                lon_min = lon_min.min(pos[0]);
                lon_max = lon_max.max(pos[0]);
                lat_min = lat_min.min(pos[1]);
                lat_max = lat_max.max(pos[1]);
            }
            if lon_min > lon_max {
                (lon_min, lon_max) = FALLBACK_LON_RANGE;
                (lat_min, lat_max) = FALLBACK_LAT_RANGE;
            }
            let (lon_min, lon_max) = pad_range(lon_min, lon_max);
            let (lat_min, lat_max) = pad_range(lat_min, lat_max);
            let mut chart = ChartBuilder::on(root)
                .margin(12)
                .build_cartesian_2d(lon_min..lon_max, lat_min..lat_max)
                .map_err(|e| ChartError::Render(e.to_string()))?;

            let value_min = data.value_min.unwrap_or(0.0);
            let value_max = data.value_max.unwrap_or(1.0);
            for region in &data.regions {
                for ring in &region.rings {
                    let points: Vec<(f64, f64)> =
                        ring.iter().map(|pos| (pos[0], pos[1])).collect();
                    match region.value {
                        Some(value) => {
                            let fill = ramp(unit(value, value_min, value_max));
                            chart
                                .draw_series(std::iter::once(Polygon::new(
                                    points,
                                    fill.filled(),
                                )))
                                .map_err(|e| ChartError::Render(e.to_string()))?;
                        }
                        // No data for this region: outline only.
                        None => {
                            chart
                                .draw_series(std::iter::once(PathElement::new(
                                    points, &BLACK,
                                )))
                                .map_err(|e| ChartError::Render(e.to_string()))?;
                        }
                    }
                }
            }
        }
        Figure::Trend(data) => {
            let xs = data.points.iter().map(|p| p.x).chain(data.line.iter().map(|p| p.x));
            let ys = data.points.iter().map(|p| p.y).chain(data.line.iter().map(|p| p.y));
            let (x_min, x_max) = pad_range_of(xs);
            let (y_min, y_max) = pad_range_of(ys);
            let mut chart = ChartBuilder::on(root)
                .margin(12)
                .build_cartesian_2d(x_min..x_max, y_min..y_max)
                .map_err(|e| ChartError::Render(e.to_string()))?;

            let accent = RGBColor(RAMP_LOW.0, RAMP_LOW.1, RAMP_LOW.2);
            chart
                .draw_series(
                    data.points
                        .iter()
                        .map(|p| Circle::new((p.x, p.y), 4, accent.filled())),
                )
                .map_err(|e| ChartError::Render(e.to_string()))?;
            let fit = RGBColor(RAMP_HIGH.0, RAMP_HIGH.1, RAMP_HIGH.2);
            chart
                .draw_series(LineSeries::new(
                    data.line.iter().map(|p| (p.x, p.y)),
                    fit.stroke_width(2),
                ))
                .map_err(|e| ChartError::Render(e.to_string()))?;
        }
    }
    Ok(())
}

/// Widen a degenerate range so plotters always gets a non-empty axis.
fn pad_range(min: f64, max: f64) -> (f64, f64) {
    if min < max {
        (min, max)
    } else {
        (min - 1.0, max + 1.0)
    }
}

fn pad_range_of(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = value_range(values);
    pad_range(min, max)
}

/// (min, max) over the values; (0.0, 0.0) when empty.
fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut any = false;
    for v in values {
        min = min.min(v);
        max = max.max(v);
        any = true;
    }
    if any {
        (min, max)
    } else {
        (0.0, 0.0)
    }
}

/// Position of `value` in `[min, max]`, clamped to `[0, 1]`.
fn unit(value: f64, min: f64, max: f64) -> f64 {
    if max > min {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        0.5
    }
}

/// Linear interpolation between the ramp endpoints.
fn ramp(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    RGBColor(
        lerp(RAMP_LOW.0, RAMP_HIGH.0),
        lerp(RAMP_LOW.1, RAMP_HIGH.1),
        lerp(RAMP_LOW.2, RAMP_HIGH.2),
    )
}
