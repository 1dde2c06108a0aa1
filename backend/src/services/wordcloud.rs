//! Word-cloud rendering.
//!
//! Words are laid out on an Archimedean spiral around the canvas center,
//! biggest first, then drawn as SVG text and rasterized to PNG. The layout
//! only depends on the bag, so the same bag always gives the same image.

use crate::utils::{escape_xml, strip_non_xml_chars};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use lazy_static::lazy_static;
use log::debug;
use resvg::tiny_skia::{Color, Pixmap, Transform};
use resvg::usvg::{self, fontdb};
use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::Arc;
use thiserror::Error;

pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 300;

const MAX_WORDS: usize = 200;
const MAX_FONT_SIZE: f32 = 96.0;
const MIN_FONT_SIZE: f32 = 8.0;
const FONT_STEP: f32 = 4.0;
/// Share of the size that follows word frequency; the rest is a floor.
const RELATIVE_SCALING: f32 = 0.5;
const SPIRAL_STEP: f32 = 0.1;
const SPIRAL_STEPS: usize = 4000;
const CHAR_WIDTH_RATIO: f32 = 0.6;

/// Bundled so the output does not depend on which fonts the host has.
const BUNDLED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
const FONT_FAMILY: &str = "DejaVu Sans";

const PALETTE: [&str; 6] = [
    "#440154", "#3b528b", "#21918c", "#5ec962", "#2c728e", "#472d7b",
];

lazy_static! {
    static ref FONT_DB: Arc<fontdb::Database> = {
        let mut db = fontdb::Database::new();
        db.load_font_data(BUNDLED_FONT.to_vec());
        db.set_sans_serif_family(FONT_FAMILY);
        debug!("Loaded {} font faces for word clouds", db.len());
        Arc::new(db)
    };
}

#[derive(Debug, Error)]
pub enum WordCloudError {
    #[error("no words to draw")]
    EmptyBag,
    #[error("failed to build word-cloud svg: {0}")]
    Svg(#[from] usvg::Error),
    #[error("failed to allocate {WIDTH}x{HEIGHT} canvas")]
    Canvas,
    #[error("failed to encode png: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub text: String,
    pub font_size: f32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub color: &'static str,
}

impl PlacedWord {
    fn overlaps(&self, other: &PlacedWord) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.font_size
            && other.y < self.y + self.font_size
    }
}

fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * CHAR_WIDTH_RATIO
}

fn fits_canvas(x: f32, y: f32, width: f32, height: f32) -> bool {
    x >= 0.0 && y >= 0.0 && x + width <= WIDTH as f32 && y + height <= HEIGHT as f32
}

/// Walk the spiral from the center until a box of the given size fits.
fn find_spot(placed: &[PlacedWord], text: &str, font_size: f32) -> Option<(f32, f32, f32)> {
    let width = text_width(text, font_size);
    let (cx, cy) = (WIDTH as f32 / 2.0, HEIGHT as f32 / 2.0);

    (0..SPIRAL_STEPS).find_map(|step| {
        let t = step as f32 * SPIRAL_STEP;
        // Stretched horizontally to follow the canvas aspect ratio.
        let x = cx + 2.0 * t * t.cos() - width / 2.0;
        let y = cy + t * t.sin() - font_size / 2.0;
        if !fits_canvas(x, y, width, font_size) {
            return None;
        }
        let candidate = PlacedWord {
            text: String::new(),
            font_size,
            x,
            y,
            width,
            color: PALETTE[0],
        };
        (!placed.iter().any(|w| w.overlaps(&candidate))).then_some((x, y, width))
    })
}

/// Shorten `word` so it spans at most the canvas width at `font_size`.
fn truncate_to_canvas(word: &str, font_size: f32) -> String {
    let max_chars = (WIDTH as f32 / (font_size * CHAR_WIDTH_RATIO)).floor() as usize;
    let mut truncated: String = word.chars().take(max_chars.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}

/// Try `word` from `font_size` down to the smallest size.
fn place_word(
    placed: &[PlacedWord],
    word: &str,
    mut font_size: f32,
) -> Option<(String, f32, f32, f32, f32)> {
    while font_size >= MIN_FONT_SIZE {
        if let Some((x, y, width)) = find_spot(placed, word, font_size) {
            return Some((word.to_string(), font_size, x, y, width));
        }
        font_size -= FONT_STEP;
    }

    // Wider than the canvas even at the smallest size: cut it down.
    if text_width(word, MIN_FONT_SIZE) > WIDTH as f32 {
        let truncated = truncate_to_canvas(word, MIN_FONT_SIZE);
        return find_spot(placed, &truncated, MIN_FONT_SIZE)
            .map(|(x, y, width)| (truncated, MIN_FONT_SIZE, x, y, width));
    }
    None
}

/// Place the words of `bag`, most frequent first and ties alphabetically.
/// Characters XML cannot carry are dropped from each word first. Words
/// crowded out at the smallest size are dropped.
pub fn layout(bag: &BTreeMap<String, usize>) -> Vec<PlacedWord> {
    let mut words: Vec<(String, usize)> = bag
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(word, count)| (strip_non_xml_chars(word), *count))
        .filter(|(word, _)| !word.trim().is_empty())
        .collect();
    words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    words.truncate(MAX_WORDS);

    let Some(&(_, top)) = words.first() else {
        return Vec::new();
    };

    let mut placed: Vec<PlacedWord> = Vec::with_capacity(words.len());
    for (i, (word, count)) in words.into_iter().enumerate() {
        let share = count as f32 / top as f32;
        let font_size = MAX_FONT_SIZE * (RELATIVE_SCALING * share + (1.0 - RELATIVE_SCALING));

        if let Some((text, font_size, x, y, width)) = place_word(&placed, &word, font_size) {
            placed.push(PlacedWord {
                text,
                font_size,
                x,
                y,
                width,
                color: PALETTE[i % PALETTE.len()],
            });
        }
    }
    placed
}

pub fn to_svg(words: &[PlacedWord]) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}"><rect width="100%" height="100%" fill="white"/>"#
    );
    for word in words {
        // Baseline sits at ~80% of the em box.
        let _ = write!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-family="{FONT_FAMILY}, sans-serif" font-size="{:.1}" fill="{}">{}</text>"#,
            word.x,
            word.y + word.font_size * 0.8,
            word.font_size,
            word.color,
            escape_xml(&word.text)
        );
    }
    svg.push_str("</svg>");
    svg
}

pub fn render_png(bag: &BTreeMap<String, usize>) -> Result<Vec<u8>, WordCloudError> {
    let words = layout(bag);
    if words.is_empty() {
        return Err(WordCloudError::EmptyBag);
    }

    let mut options = usvg::Options::default();
    options.fontdb = FONT_DB.clone();
    options.font_family = FONT_FAMILY.to_string();
    let tree = usvg::Tree::from_str(&to_svg(&words), &options)?;

    let mut pixmap = Pixmap::new(WIDTH, HEIGHT).ok_or(WordCloudError::Canvas)?;
    pixmap.fill(Color::WHITE);
    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| WordCloudError::Encode(e.to_string()))
}

/// Render `bag` and wrap the PNG in a `data:` URL an `<img>` can show.
pub fn render_data_url(bag: &BTreeMap<String, usize>) -> Result<String, WordCloudError> {
    let png = render_png(bag)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}
