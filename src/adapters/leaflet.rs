//! Leaflet rendering: pollution text laid out over a background image.
//!
//! Positions and font sizes are in pixels of the background, which is a
//! 300dpi A4 template.

use crate::domain::model::{Pollutant, PollutionLevels};
use crate::utils::error::{PrintoutError, Result};
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::io::Cursor;
use std::path::Path;

pub const DEFAULT_BACKGROUND: &str = "assets/images/page-1-background.png";
pub const DEFAULT_FONT_FAMILY: &str = "sans-serif";

const LINE_SPACING: f64 = 1.5;
const BLACK_TEXT: [u8; 3] = [0, 0, 0];
const RED_TEXT: [u8; 3] = [255, 0, 0];
const DIAL_MARGIN: i32 = 380;
const DIAL_VALUE_Y: i32 = 2350;
const DIAL_COMMENT_Y: i32 = 3030;

/// A paragraph of text centred on (`x`, `y`).
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub font_size: f64,
    pub color: [u8; 3],
    pub max_width: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeafletLayout {
    blocks: Vec<TextBlock>,
}

impl LeafletLayout {
    pub fn compose(levels: &PollutionLevels, width: u32) -> Self {
        let w = width as i32;
        let mut blocks = vec![
            TextBlock {
                text: levels.pollution_description().to_uppercase(),
                x: w / 2,
                y: 500,
                font_size: 192.0,
                color: BLACK_TEXT,
                max_width: 2000,
            },
            TextBlock {
                text: levels.formatted_address().to_string(),
                x: w / 2,
                y: 1400,
                font_size: 96.0,
                color: BLACK_TEXT,
                max_width: width.saturating_sub(100),
            },
            TextBlock {
                text: levels.exceeds_count().to_string(),
                x: 1125,
                y: 1858,
                font_size: 92.0,
                color: BLACK_TEXT,
                max_width: width.saturating_sub(100),
            },
        ];

        let dials = [
            (Pollutant::Pm2_5, DIAL_MARGIN),
            (Pollutant::Pm10, w / 2),
            (Pollutant::No2, w - DIAL_MARGIN),
        ];

        for (pollutant, x) in dials {
            blocks.push(TextBlock {
                text: format!("{:.1}", levels.reading(pollutant)),
                x,
                y: DIAL_VALUE_Y,
                font_size: 104.0,
                color: BLACK_TEXT,
                max_width: 500,
            });
        }

        for (pollutant, x) in dials {
            blocks.push(TextBlock {
                text: format!("{} safe level", levels.safe_level_description(pollutant)),
                x,
                y: DIAL_COMMENT_Y,
                font_size: 104.0,
                color: RED_TEXT,
                max_width: 1000,
            });
        }

        Self { blocks }
    }

    pub fn blocks(&self) -> &[TextBlock] {
        &self.blocks
    }
}

/// Greedy word wrap. `measure` returns the rendered width of a candidate line.
/// A single word wider than `max_width` gets a line to itself.
pub fn wrap_words<F>(text: &str, max_width: u32, mut measure: F) -> Result<Vec<String>>
where
    F: FnMut(&str) -> Result<u32>,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate = format!("{} {}", current, word);
        if measure(&candidate)? <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    Ok(lines)
}

/// File name for the `index`th leaflet, e.g. `003-48-lindley-street-york.png`.
pub fn leaflet_file_name(index: usize, formatted_address: &str) -> String {
    format!("{:03}-{}.png", index, slugify(formatted_address))
}

pub fn slugify(address: &str) -> String {
    address.to_lowercase().replace(' ', "-").replace(',', "")
}

/// Owns the decoded background for as long as leaflets are being rendered.
pub struct LeafletRenderer {
    background: RgbImage,
    font_family: String,
}

impl LeafletRenderer {
    pub fn load(background_path: impl AsRef<Path>, font_family: &str) -> Result<Self> {
        let path = background_path.as_ref();
        tracing::debug!("Loading leaflet background from {}", path.display());
        let background = image::open(path)?.to_rgb8();
        Ok(Self::from_image(background, font_family))
    }

    pub fn from_image(background: RgbImage, font_family: &str) -> Self {
        Self {
            background,
            font_family: font_family.to_string(),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.background.dimensions()
    }

    /// Draws the leaflet for `levels` and returns the PNG bytes.
    pub fn render_png(&self, levels: &PollutionLevels) -> Result<Vec<u8>> {
        let (width, height) = self.background.dimensions();
        let layout = LeafletLayout::compose(levels, width);
        let mut buffer = self.background.as_raw().clone();

        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            for block in layout.blocks() {
                draw_block(&root, block, &self.font_family)?;
            }
            root.present().map_err(render_error)?;
        }

        let canvas = RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
            PrintoutError::RenderError {
                message: "canvas buffer does not match background size".to_string(),
            }
        })?;

        let mut png = Cursor::new(Vec::new());
        canvas.write_to(&mut png, ImageFormat::Png)?;
        Ok(png.into_inner())
    }
}

fn draw_block<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    block: &TextBlock,
    font_family: &str,
) -> Result<()> {
    let color = RGBColor(block.color[0], block.color[1], block.color[2]);
    let style = TextStyle::from((font_family, block.font_size, FontStyle::Bold).into_font())
        .color(&color)
        .pos(Pos::new(HPos::Center, VPos::Center));

    let lines = wrap_words(&block.text, block.max_width, |candidate| {
        root.estimate_text_size(candidate, &style)
            .map(|(w, _)| w)
            .map_err(render_error)
    })?;

    let line_height = block.font_size * LINE_SPACING;
    let top = block.y as f64 - line_height * (lines.len().saturating_sub(1)) as f64 / 2.0;

    for (i, line) in lines.into_iter().enumerate() {
        let y = (top + line_height * i as f64).round() as i32;
        root.draw(&Text::new(line, (block.x, y), style.clone()))
            .map_err(render_error)?;
    }
    Ok(())
}

fn render_error<E: std::fmt::Debug>(e: E) -> PrintoutError {
    PrintoutError::RenderError {
        message: format!("{:?}", e),
    }
}
