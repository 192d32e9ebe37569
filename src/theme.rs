use std::path::Path;

use palette::Lab;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::pipeline::select::Palette;

/// Property names a template may reference, in serialization order.
pub const PROPERTIES: [&str; 7] = ["hex", "strip", "rgb", "rgba", "hsl", "hsv", "lab"];

/// Every textual representation of one palette entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorRecord {
    pub hex: String,
    pub strip: String,
    pub rgb: String,
    pub rgba: String,
    pub hsl: String,
    pub hsv: String,
    pub lab: String,
}

/// Round for display; a hue that rounds to 360 wraps to 0.
fn round_hue(degrees: f32) -> i32 {
    (degrees.round() as i32).rem_euclid(360)
}

fn pct(x: f32) -> i32 {
    (x * 100.0).round() as i32
}

impl ColorRecord {
    pub fn from_lab(lab: Lab) -> Self {
        let c = Color::from_lab(lab);
        let hsl = c.to_hsl();
        let hsv = c.to_hsv();
        Self {
            hex: c.to_hex(),
            strip: c.to_hex_stripped(),
            rgb: format!("rgb({}, {}, {})", c.r, c.g, c.b),
            rgba: format!("rgba({}, {}, {}, 1.0)", c.r, c.g, c.b),
            hsl: format!(
                "hsl({}, {}%, {}%)",
                round_hue(hsl.hue.into_positive_degrees()),
                pct(hsl.saturation),
                pct(hsl.lightness)
            ),
            hsv: format!(
                "hsv({}, {}%, {}%)",
                round_hue(hsv.hue.into_positive_degrees()),
                pct(hsv.saturation),
                pct(hsv.value)
            ),
            lab: format!(
                "lab({}, {}, {})",
                lab.l.round() as i32,
                lab.a.round() as i32,
                lab.b.round() as i32
            ),
        }
    }

    /// Look up a property by its template name.
    pub fn get(&self, property: &str) -> Option<&str> {
        let value = match property {
            "hex" => &self.hex,
            "strip" => &self.strip,
            "rgb" => &self.rgb,
            "rgba" => &self.rgba,
            "hsl" => &self.hsl,
            "hsv" => &self.hsv,
            "lab" => &self.lab,
            _ => return None,
        };
        Some(value)
    }
}

/// Ordered `color{i} -> ColorRecord` mapping consumed by templates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColorDocument {
    records: Vec<ColorRecord>,
}

impl ColorDocument {
    /// Build one record per palette entry, in palette order.
    pub fn from_palette(palette: &Palette) -> Self {
        Self {
            records: palette.iter().map(|lab| ColorRecord::from_lab(*lab)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by key (`color0`, `color1`, ...).
    pub fn get(&self, key: &str) -> Option<&ColorRecord> {
        let index = key.strip_prefix("color")?;
        // "color01" is not a key
        if !index.bytes().all(|b| b.is_ascii_digit()) || (index.len() > 1 && index.starts_with('0'))
        {
            return None;
        }
        self.records.get(index.parse::<usize>().ok()?)
    }

    /// `(key, record)` pairs in palette order.
    pub fn iter(&self) -> impl Iterator<Item = (String, &ColorRecord)> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, record)| (format!("color{i}"), record))
    }

    /// CSS variable block, one `--color<i>` per entry.
    pub fn css_block(&self) -> String {
        let mut out = String::from("* {\n");
        for (key, record) in self.iter() {
            out.push_str(&format!("  --{key}: {};\n", record.hex));
        }
        out.push_str("}\n");
        out
    }

    /// Pretty-printed JSON with keys in palette order.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the JSON document to `path`.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let mut content = self.to_json()?;
        content.push('\n');
        std::fs::write(path, content).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Serialize for ColorDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for (key, record) in self.iter() {
            map.serialize_entry(&key, record)?;
        }
        map.end()
    }
}
