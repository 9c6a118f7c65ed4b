/*
 * SPDX-FileCopyrightText: 2026 The sparse-heatmap developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Heatmap rendering.
//!
//! A dense matrix is drawn as a grid of square, flat-colored cells, row 0 at
//! the top, with no axes. A vertical color scale with tick labels is drawn
//! to the right of the grid. The output format is chosen from the extension
//! of the destination path: `.svg` is rendered to a string by the SVG
//! backend, anything else is drawn into a pixel buffer and encoded with the
//! [`image`] crate. Either way the file is created only once drawing has
//! succeeded.

use crate::colormap::{Hot, ValueRange};
use anyhow::{Context, Result};
use ndarray::{ArrayBase, Data, Ix2};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::{Path, PathBuf};

/// Number of tick labels on the color scale of a non-degenerate range.
const NUM_TICKS: usize = 5;

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("Unsupported output format for {path:?}")]
    UnsupportedFormat { path: PathBuf },
    #[error("Invalid image size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("Could not encode image")]
    Encode(#[from] image::ImageError),
}

fn drawing_error<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> RenderError {
    RenderError::Drawing(err.to_string())
}

/// The format of the output image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Raster(image::ImageFormat),
}

impl OutputFormat {
    /// Picks the format from the extension of `path`.
    ///
    /// A path without extension is written as PNG.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let Some(ext) = path.extension() else {
            return Ok(OutputFormat::Raster(image::ImageFormat::Png));
        };
        if ext.eq_ignore_ascii_case("svg") {
            return Ok(OutputFormat::Svg);
        }
        match image::ImageFormat::from_extension(ext) {
            Some(
                format @ (image::ImageFormat::Png
                | image::ImageFormat::Jpeg
                | image::ImageFormat::Bmp
                | image::ImageFormat::Gif
                | image::ImageFormat::Tiff
                | image::ImageFormat::Tga
                | image::ImageFormat::Ico
                | image::ImageFormat::Pnm),
            ) => Ok(OutputFormat::Raster(format)),
            _ => Err(RenderError::UnsupportedFormat {
                path: path.to_owned(),
            }),
        }
    }
}

/// Options for [`save_heatmap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

/// Pixel rectangle, inclusive of both corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PixelRect {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

/// The placement of the grid and of the color scale within the image.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Layout {
    /// Left and top corner of the grid.
    origin: (f64, f64),
    /// Side of a cell in pixels (possibly fractional).
    cell: f64,
    /// The color scale.
    bar: PixelRect,
    font_size: f64,
}

impl Layout {
    fn new((width, height): (u32, u32), (rows, cols): (usize, usize)) -> Self {
        let (w, h) = (width as f64, height as f64);
        let pad = (w.min(h) / 20.0).max(1.0);
        let gap = (w / 40.0).max(1.0);
        let bar_width = (w / 32.0).max(2.0);
        let label_width = (w / 8.0).max(1.0);

        // Room for the grid, once the color scale and its labels are placed
        let panel_w = (w - 2.0 * pad - gap - bar_width - label_width).max(1.0);
        let panel_h = (h - 2.0 * pad).max(1.0);
        let cell = (panel_w / cols as f64).min(panel_h / rows as f64);
        let grid_w = cell * cols as f64;
        let grid_h = cell * rows as f64;
        let origin = (pad + (panel_w - grid_w) / 2.0, pad + (panel_h - grid_h) / 2.0);

        let bar_left = origin.0 + grid_w + gap;
        let bar = PixelRect {
            left: bar_left.round() as i32,
            top: origin.1.round() as i32,
            right: (bar_left + bar_width).round() as i32,
            bottom: (origin.1 + grid_h).round() as i32,
        };

        Self {
            origin,
            cell,
            bar,
            font_size: (h / 40.0).max(10.0),
        }
    }

    /// Returns the pixels covered by the given cell.
    fn cell_rect(&self, row: usize, col: usize) -> PixelRect {
        let x0 = (self.origin.0 + col as f64 * self.cell).round() as i32;
        let y0 = (self.origin.1 + row as f64 * self.cell).round() as i32;
        let x1 = (self.origin.0 + (col + 1) as f64 * self.cell).round() as i32;
        let y1 = (self.origin.1 + (row + 1) as f64 * self.cell).round() as i32;
        PixelRect {
            left: x0,
            top: y0,
            right: (x1 - 1).max(x0),
            bottom: (y1 - 1).max(y0),
        }
    }
}

/// Values at which the color scale is labeled, from the bottom up.
fn ticks(range: ValueRange) -> Vec<f64> {
    if range.is_degenerate() {
        return vec![range.min];
    }
    (0..NUM_TICKS)
        .map(|i| range.min + (range.max - range.min) * i as f64 / (NUM_TICKS - 1) as f64)
        .collect()
}

fn format_tick(value: f64) -> String {
    let abs = value.abs();
    if abs != 0.0 && !(1E-3..1E4).contains(&abs) {
        return format!("{:.2e}", value);
    }
    let s = format!("{:.3}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" => "0".to_owned(),
        s => s.to_owned(),
    }
}

/// Draws the heatmap on `root`.
///
/// Labels of the color scale are drawn only if `labels` is true, as drawing
/// text on a raster backend requires a font implementation.
fn draw_heatmap<DB, S>(
    root: &DrawingArea<DB, Shift>,
    matrix: &ArrayBase<S, Ix2>,
    mut labels: bool,
) -> Result<(), RenderError>
where
    DB: DrawingBackend,
    S: Data<Elem = f64>,
{
    let layout = Layout::new(root.dim_in_pixel(), matrix.dim());
    let range = ValueRange::of(matrix);
    log::debug!("Color range: [{}, {}]", range.min, range.max);

    root.fill(&WHITE).map_err(drawing_error)?;

    for ((row, col), &value) in matrix.indexed_iter() {
        let rect = layout.cell_rect(row, col);
        root.draw(&Rectangle::new(
            [(rect.left, rect.top), (rect.right, rect.bottom)],
            Hot.color_of(value, range).filled(),
        ))
        .map_err(drawing_error)?;
    }

    // The color scale, one stripe per pixel row, top is the maximum
    let bar = layout.bar;
    let span = (bar.bottom - bar.top).max(1) as f64;
    for y in bar.top..=bar.bottom {
        let t = 1.0 - (y - bar.top) as f64 / span;
        let color = if range.is_degenerate() {
            Hot.color(0.0)
        } else {
            Hot.color(t)
        };
        root.draw(&Rectangle::new(
            [(bar.left, y), (bar.right, y)],
            color.filled(),
        ))
        .map_err(drawing_error)?;
    }
    root.draw(&Rectangle::new(
        [(bar.left, bar.top), (bar.right, bar.bottom)],
        ShapeStyle::from(&BLACK),
    ))
    .map_err(drawing_error)?;

    let tick_len = (bar.right - bar.left) / 3 + 1;
    let style = ("sans-serif", layout.font_size)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));
    for value in ticks(range) {
        let y = if range.is_degenerate() {
            (bar.top + bar.bottom) / 2
        } else {
            let t = (value - range.min) / (range.max - range.min);
            bar.bottom - (t * span).round() as i32
        };
        root.draw(&PathElement::new(
            vec![(bar.right, y), (bar.right + tick_len, y)],
            &BLACK,
        ))
        .map_err(drawing_error)?;

        if labels {
            let text = Text::new(
                format_tick(value),
                (bar.right + 2 * tick_len, y),
                style.clone(),
            );
            if let Err(err) = root.draw(&text) {
                // Typically no usable font on the system
                log::warn!("Could not draw color scale labels, skipping them: {}", err);
                labels = false;
            }
        }
    }
    Ok(())
}

/// Renders `matrix` as an SVG document, in memory so that a failed drawing
/// leaves no partial file behind.
fn render_svg<S>(matrix: &ArrayBase<S, Ix2>, size: (u32, u32)) -> Result<String, RenderError>
where
    S: Data<Elem = f64>,
{
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        draw_heatmap(&root, matrix, true)?;
        root.present().map_err(drawing_error)?;
    }
    Ok(svg)
}

/// Renders `matrix` as a heatmap and writes it to `path`.
///
/// The format is chosen by [`OutputFormat::from_path`].
pub fn save_heatmap<S>(
    matrix: &ArrayBase<S, Ix2>,
    path: impl AsRef<Path>,
    options: &RenderOptions,
) -> Result<()>
where
    S: Data<Elem = f64>,
{
    let path = path.as_ref();
    let (width, height) = (options.width, options.height);
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidSize { width, height }.into());
    }
    let format = OutputFormat::from_path(path)?;
    log::info!(
        "Rendering a {}x{} matrix to {} ({}x{} pixels, {:?})",
        matrix.nrows(),
        matrix.ncols(),
        path.display(),
        width,
        height,
        format
    );

    match format {
        OutputFormat::Svg => {
            let svg = render_svg(matrix, (width, height))?;
            std::fs::write(path, svg)
                .with_context(|| format!("Could not write {}", path.display()))?;
        }
        OutputFormat::Raster(format) => {
            let mut buffer = vec![0_u8; width as usize * height as usize * 3];
            {
                let root =
                    BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
                draw_heatmap(&root, matrix, cfg!(feature = "fonts"))?;
                root.present().map_err(drawing_error)?;
            }
            let image = image::RgbImage::from_raw(width, height, buffer)
                .ok_or(RenderError::InvalidSize { width, height })?;
            image
                .save_with_format(path, format)
                .map_err(RenderError::from)
                .with_context(|| format!("Could not write {}", path.display()))?;
        }
    }
    Ok(())
}
