// Font-backed text width measurement.
//
// System fonts are loaded once on first use. Each CSS-style family list is
// resolved to a single face whose horizontal advances are cached.

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

/// Extra advance when bold text is drawn from a lighter face, which renderers
/// embolden synthetically.
const SYNTHETIC_BOLD_WIDENING: f32 = 1.06;

static FONT_MEASURER: Lazy<Mutex<FontMeasurer>> = Lazy::new(|| Mutex::new(FontMeasurer::new()));

/// Width of `text` in pixels, or `None` when no usable font was found.
///
/// `font_weight` takes CSS values (`normal`, `bold`, `100`..`900`).
pub fn measure_text_width(
    text: &str,
    font_size: f32,
    font_family: &str,
    font_weight: &str,
) -> Option<f32> {
    if text.is_empty() || font_size <= 0.0 {
        return Some(0.0);
    }
    let weight = parse_font_weight(font_weight);
    let mut guard = FONT_MEASURER.lock().ok()?;
    guard.measure(text, font_size, font_family, weight)
}

/// Width multiplier for drawing `requested` weight with a face of `available`
/// weight.
pub fn synthetic_bold_factor(requested: u16, available: u16) -> f32 {
    if requested >= 600 && available < 600 {
        SYNTHETIC_BOLD_WIDENING
    } else {
        1.0
    }
}

/// Numeric CSS weight; unknown values read as normal (400).
pub fn parse_font_weight(font_weight: &str) -> u16 {
    match font_weight.trim().to_ascii_lowercase().as_str() {
        "" | "normal" => 400,
        "bold" => 700,
        "bolder" => 800,
        "lighter" => 300,
        other => other
            .parse::<u16>()
            .ok()
            .filter(|w| (1..=1000).contains(w))
            .unwrap_or(400),
    }
}

struct FontMeasurer {
    db: Database,
    system_fonts_loaded: bool,
    faces: HashMap<(String, u16), Option<FaceMetrics>>,
}

impl FontMeasurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            system_fonts_loaded: false,
            faces: HashMap::new(),
        }
    }

    fn measure(
        &mut self,
        text: &str,
        font_size: f32,
        font_family: &str,
        weight: u16,
    ) -> Option<f32> {
        let key = (family_key(font_family), weight);
        if !self.faces.contains_key(&key) {
            let loaded = self.load(font_family, weight);
            if loaded.is_none() {
                tracing::debug!(
                    family = %key.0,
                    weight,
                    "no font face found; using estimated widths"
                );
            }
            self.faces.insert(key.clone(), loaded);
        }
        let metrics = self.faces.get_mut(&key)?.as_mut()?;
        Some(metrics.width(text, font_size))
    }

    fn load(&mut self, font_family: &str, weight: u16) -> Option<FaceMetrics> {
        if !self.system_fonts_loaded {
            self.db.load_system_fonts();
            self.system_fonts_loaded = true;
        }

        let names: Vec<&str> = font_family
            .split(',')
            .map(|part| part.trim().trim_matches('"').trim_matches('\''))
            .filter(|part| !part.is_empty())
            .collect();
        let mut families: Vec<Family<'_>> = names.iter().map(|name| to_family(name)).collect();
        if families.is_empty() {
            families.push(Family::SansSerif);
        }

        let query = Query {
            families: &families,
            weight: Weight(weight),
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        let face_weight = self.db.face(id).map(|info| info.weight.0).unwrap_or(400);
        let widening = synthetic_bold_factor(weight, face_weight);
        self.db
            .with_face_data(id, |data, index| {
                FaceMetrics::parse(data.to_vec(), index, widening)
            })
            .flatten()
    }
}

fn to_family(name: &str) -> Family<'_> {
    match name.to_ascii_lowercase().as_str() {
        "serif" => Family::Serif,
        "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => Family::SansSerif,
        "monospace" | "ui-monospace" => Family::Monospace,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        _ => Family::Name(name),
    }
}

fn family_key(font_family: &str) -> String {
    let trimmed = font_family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_string()
    }
}

struct FaceMetrics {
    data: Vec<u8>,
    index: u32,
    units_per_em: f32,
    widening: f32,
    ascii: [u16; 128],
    advances: HashMap<char, Option<u16>>,
}

impl FaceMetrics {
    fn parse(data: Vec<u8>, index: u32, widening: f32) -> Option<Self> {
        let (units_per_em, ascii) = {
            let face = Face::parse(&data, index).ok()?;
            let mut ascii = [0u16; 128];
            for byte in 0u8..128 {
                if let Some(glyph) = face.glyph_index(byte as char) {
                    ascii[byte as usize] = face.glyph_hor_advance(glyph).unwrap_or(0);
                }
            }
            (face.units_per_em().max(1) as f32, ascii)
        };
        Some(Self {
            data,
            index,
            units_per_em,
            widening,
            ascii,
            advances: HashMap::new(),
        })
    }

    fn width(&mut self, text: &str, font_size: f32) -> f32 {
        let scale = font_size / self.units_per_em;
        let missing = font_size * 0.56;
        let mut width = 0.0f32;
        let mut pending: Vec<char> = Vec::new();

        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            if ch.is_ascii() {
                match self.ascii[ch as usize] {
                    0 => width += missing,
                    advance => width += advance as f32 * scale,
                }
                continue;
            }
            match self.advances.get(&ch) {
                Some(Some(advance)) => width += *advance as f32 * scale,
                Some(None) => width += missing,
                None => pending.push(ch),
            }
        }

        if !pending.is_empty() {
            let face = Face::parse(&self.data, self.index).ok();
            for ch in pending {
                let advance = face.as_ref().and_then(|face| {
                    face.glyph_index(ch)
                        .and_then(|glyph| face.glyph_hor_advance(glyph))
                });
                self.advances.insert(ch, advance);
                width += advance.map(|a| a as f32 * scale).unwrap_or(missing);
            }
        }

        (width * self.widening).max(0.0)
    }
}
