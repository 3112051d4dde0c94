//! Font discovery and glyph outline layout
//!
//! Faces are found with fontdb and outlined with ttf-parser. Text is laid out
//! as a single line: no shaping, kerning or bidi. Each glyph outline is
//! appended to one tiny-skia path positioned on the baseline at x = 0.

use std::path::Path;

use drawboard_graphics::{Font, Rect, TextAlignment};
use drawboard_view::TextConfig;
use fontdb::{Database, Family, Query, Stretch, Style, Weight, ID};
use tracing::{debug, trace};

/// Fonts loaded directly, without a full system scan
#[cfg(target_os = "android")]
const KNOWN_FONT_PATHS: &[&str] = &[
    "/system/fonts/Roboto-Regular.ttf",
    "/system/fonts/RobotoMono-Regular.ttf",
    "/system/fonts/DroidSans.ttf",
    "/system/fonts/DroidSansMono.ttf",
    "/system/fonts/DroidSerif-Regular.ttf",
];

#[cfg(not(target_os = "android"))]
const KNOWN_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
];

/// One laid-out line of text
pub struct TextRun {
    /// Glyph outlines in view units, baseline at y = 0; `None` when every
    /// glyph is blank
    pub path: Option<tiny_skia::Path>,
    /// Advance width of the line
    pub width: f32,
    /// Distance from baseline to the top of the line box
    pub ascent: f32,
    /// Distance from baseline to the bottom of the line box (positive)
    pub descent: f32,
    /// Number of space characters
    pub spaces: usize,
}

impl TextRun {
    /// Baseline origin of this run inside `frame`, vertically centred
    pub fn origin(&self, frame: Rect, alignment: TextAlignment) -> (f32, f32) {
        let x = alignment.line_start(frame, self.width);
        let line_height = self.ascent + self.descent;
        let y = frame.y + (frame.height - line_height) / 2.0 + self.ascent;
        (x, y)
    }
}

/// Font database shared by raster canvases
pub struct FontSystem {
    db: Database,
    default_family: String,
}

impl FontSystem {
    /// An empty font system; add faces with [`FontSystem::load_font_data`]
    pub fn new() -> Self {
        Self {
            db: Database::new(),
            default_family: "sans-serif".to_string(),
        }
    }

    /// Build from text settings, loading well-known fonts and optionally
    /// scanning system font directories
    pub fn from_config(config: &TextConfig) -> Self {
        let mut fonts = Self::new();
        fonts.default_family = config.default_family.clone();
        fonts.load_known_fonts();
        if config.load_system_fonts {
            fonts.db.load_system_fonts();
        }
        debug!("Font system ready with {} faces", fonts.face_count());
        fonts
    }

    /// Load the platform's well-known font files that exist
    pub fn load_known_fonts(&mut self) {
        for path in KNOWN_FONT_PATHS {
            if Path::new(path).exists() {
                if let Err(e) = self.db.load_font_file(path) {
                    debug!("Failed to load {}: {}", path, e);
                }
            }
        }
    }

    pub fn load_font_data(&mut self, data: Vec<u8>) {
        self.db.load_font_data(data);
    }

    pub fn load_font_file(&mut self, path: impl AsRef<Path>) -> std::io::Result<()> {
        self.db.load_font_file(path)
    }

    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Find a face for `font`, falling back to the default family and then to
    /// any loaded face
    fn resolve(&self, font: &Font) -> Option<ID> {
        self.query_family(&font.family)
            .or_else(|| self.query_family(&self.default_family))
            .or_else(|| self.db.faces().next().map(|face| face.id))
    }

    fn query_family(&self, name: &str) -> Option<ID> {
        let family = match name.to_ascii_lowercase().as_str() {
            "sans-serif" | "sans" | "system" => Family::SansSerif,
            "serif" => Family::Serif,
            "monospace" | "mono" => Family::Monospace,
            "cursive" => Family::Cursive,
            "fantasy" => Family::Fantasy,
            _ => Family::Name(name),
        };
        self.db.query(&Query {
            families: &[family],
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        })
    }

    /// Lay out `text` on one line
    ///
    /// `word_spacing` is added after each space. Returns `None` when no face
    /// resolves for `font`.
    pub fn layout(&self, text: &str, font: &Font, word_spacing: f32) -> Option<TextRun> {
        let id = self.resolve(font)?;
        let run = self
            .db
            .with_face_data(id, |data, index| {
                let face = ttf_parser::Face::parse(data, index).ok()?;
                Some(outline_line(&face, text, font.size, word_spacing))
            })
            .flatten();
        if run.is_none() {
            debug!("Font face for {:?} could not be parsed", font.family);
        }
        run
    }
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::new()
    }
}

fn outline_line(face: &ttf_parser::Face<'_>, text: &str, size: f32, word_spacing: f32) -> TextRun {
    let units_per_em = face.units_per_em().max(1) as f32;
    let scale = size / units_per_em;

    let mut builder = tiny_skia::PathBuilder::new();
    let mut pen_x = 0.0;
    let mut spaces = 0;

    for ch in text.chars() {
        let glyph = face.glyph_index(ch).unwrap_or(ttf_parser::GlyphId(0));
        let mut sink = GlyphSink {
            builder: &mut builder,
            scale,
            x: pen_x,
        };
        face.outline_glyph(glyph, &mut sink);

        pen_x += face.glyph_hor_advance(glyph).unwrap_or(0) as f32 * scale;
        if ch == ' ' {
            pen_x += word_spacing;
            spaces += 1;
        }
    }

    trace!(chars = text.chars().count(), width = pen_x, "laid out text");
    TextRun {
        path: builder.finish(),
        width: pen_x,
        ascent: face.ascender() as f32 * scale,
        descent: -(face.descender() as f32) * scale,
        spaces,
    }
}

/// Receives glyph outlines in font units, flips y and scales into view units
struct GlyphSink<'a> {
    builder: &'a mut tiny_skia::PathBuilder,
    scale: f32,
    x: f32,
}

impl GlyphSink<'_> {
    fn map(&self, x: f32, y: f32) -> (f32, f32) {
        (self.x + x * self.scale, -y * self.scale)
    }
}

impl ttf_parser::OutlineBuilder for GlyphSink<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x, y) = self.map(x, y);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x2, y2) = self.map(x2, y2);
        let (x, y) = self.map(x, y);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
