//! Person colors and continuous palettes.
//!
//! [`ColorRegistry`] hands out one color per person and remembers it for the rest of the
//! run, so the same person looks the same on every page. Well-known people come from a
//! fixed table; anyone else gets the next free hue on a golden-angle walk around the
//! color wheel.

use crate::config::ReportConfig;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Parse `#RRGGBB` (leading `#` optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.trim().trim_start_matches('#');
        if s.len() != 6 || !s.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok();
        Some(Self::new(byte(0)?, byte(2)?, byte(4)?))
    }

    /// Blend towards `other`; `t = 0` keeps `self`, `t = 1` gives `other`.
    pub fn mix(self, other: Rgb8, t: f64) -> Rgb8 {
        let t = clamp01(t);
        let ch = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb8::new(ch(self.r, other.r), ch(self.g, other.g), ch(self.b, other.b))
    }

    /// Washed-out grey-ish variant used for background layers.
    pub fn muted(self) -> Rgb8 {
        self.mix(MUTED_GREY, 0.65)
    }
}

pub const BLACK: Rgb8 = Rgb8::new(0, 0, 0);
pub const RED: Rgb8 = Rgb8::new(255, 0, 0);
pub const FOREST_GREEN: Rgb8 = Rgb8::new(34, 139, 34);
const MUTED_GREY: Rgb8 = Rgb8::new(170, 170, 170);

/// Default fixed person colors, in the report's bar accent color.
/// [`ReportConfig::known_colors`] entries take precedence and may replace them.
const KNOWN_COLORS: [(&str, Rgb8); 1] = [("Henry", FOREST_GREEN)];

const GOLDEN_ANGLE_DEG: f64 = 137.507_764;

#[derive(Clone, Copy, Debug)]
struct Hsl {
    h_deg: f64, // 0..360
    s: f64,     // 0..1
    l: f64,     // 0..1
}

/// Run-scoped person -> color memo. Entries are never evicted.
#[derive(Debug, Clone)]
pub struct ColorRegistry {
    known: AHashMap<String, Rgb8>,
    assigned: AHashMap<String, Rgb8>,
    generated: usize,
}

impl Default for ColorRegistry {
    fn default() -> Self {
        Self::with_known(KNOWN_COLORS.iter().map(|(p, c)| (p.to_string(), *c)))
    }
}

impl ColorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with exactly `known` as its fixed table.
    pub fn with_known<I: IntoIterator<Item = (String, Rgb8)>>(known: I) -> Self {
        Self {
            known: known.into_iter().collect(),
            assigned: AHashMap::new(),
            generated: 0,
        }
    }

    /// Built-in table plus the config's `known_colors`. Unparseable entries are skipped.
    pub fn from_config(config: &ReportConfig) -> Self {
        let mut reg = Self::default();
        for (person, hex) in &config.known_colors {
            match Rgb8::from_hex(hex) {
                Some(c) => {
                    reg.known.insert(person.clone(), c);
                }
                None => log::warn!("ignoring color {hex:?} for {person}: expected #RRGGBB"),
            }
        }
        reg
    }

    /// Color for `person`, assigning and remembering a new one on first sight.
    pub fn color_for(&mut self, person: &str) -> Rgb8 {
        if let Some(c) = self.known.get(person) {
            return *c;
        }
        if let Some(c) = self.assigned.get(person) {
            return *c;
        }
        let color = self.next_free_color();
        log::debug!("assigned {} to {person}", color.to_hex());
        self.assigned.insert(person.to_string(), color);
        color
    }

    /// Number of persons with a lazily assigned color.
    pub fn assigned_len(&self) -> usize {
        self.assigned.len()
    }

    fn next_free_color(&mut self) -> Rgb8 {
        loop {
            let k = self.generated;
            self.generated += 1;
            let candidate = hsl_to_rgb8(Hsl {
                h_deg: (k as f64 * GOLDEN_ANGLE_DEG) % 360.0,
                s: 0.65,
                // Alternate lightness every third hue.
                l: if (k / 3) % 2 == 0 { 0.45 } else { 0.60 },
            });
            let taken = self.known.values().any(|c| *c == candidate)
                || self.assigned.values().any(|c| *c == candidate);
            if !taken {
                return candidate;
            }
        }
    }
}

/// Continuous palette for bars that are not persons: position `idx` of `n` along a
/// dark-blue -> teal -> yellow ramp.
pub fn gradient_color(idx: usize, n: usize) -> Rgb8 {
    const STOPS: [Rgb8; 5] = [
        Rgb8::new(68, 1, 84),
        Rgb8::new(59, 82, 139),
        Rgb8::new(33, 145, 140),
        Rgb8::new(94, 201, 98),
        Rgb8::new(253, 231, 37),
    ];
    let t = if n <= 1 {
        0.0
    } else {
        idx.min(n - 1) as f64 / (n - 1) as f64
    };
    let scaled = t * (STOPS.len() - 1) as f64;
    let lo = (scaled.floor() as usize).min(STOPS.len() - 2);
    STOPS[lo].mix(STOPS[lo + 1], scaled - lo as f64)
}

fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

// HSL -> RGB conversion (linear; sufficient for chart colors)
fn hsl_to_rgb8(hsl: Hsl) -> Rgb8 {
    let h = (hsl.h_deg % 360.0) / 360.0;
    let s = clamp01(hsl.s);
    let l = clamp01(hsl.l);

    if s == 0.0 {
        let v = (l * 255.0).round() as u8;
        return Rgb8::new(v, v, v);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 1.0 / 2.0 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    }

    let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
    let g = hue_to_rgb(p, q, h);
    let b = hue_to_rgb(p, q, h - 1.0 / 3.0);

    Rgb8::new(
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
    )
}
