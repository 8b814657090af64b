//! Colors and canvas themes.
//!
//! Theme colors travel as hex strings (`"#1e1e1e"`) in JSON and are parsed
//! once into RGBA so every render backend receives the same values.

use crate::error::SceneError;
use serde::{Deserialize, Serialize};
use winnow::combinator::opt;
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take_while;

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

fn hex_val(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        _ => c - b'A' + 10,
    }
}

fn parse_hex_color(input: &mut &str) -> ModalResult<Color> {
    let _ = opt('#').parse_next(input)?;
    let digits: &str = take_while(1..=8, |c: char| c.is_ascii_hexdigit()).parse_next(input)?;
    let d: Vec<u8> = digits.bytes().map(hex_val).collect();
    let color = match d.len() {
        3 => Color::rgba(d[0] * 17, d[1] * 17, d[2] * 17, 255),
        4 => Color::rgba(d[0] * 17, d[1] * 17, d[2] * 17, d[3] * 17),
        6 => Color::rgba(d[0] << 4 | d[1], d[2] << 4 | d[3], d[4] << 4 | d[5], 255),
        8 => Color::rgba(d[0] << 4 | d[1], d[2] << 4 | d[3], d[4] << 4 | d[5], d[6] << 4 | d[7]),
        _ => return Err(ErrMode::Backtrack(ContextError::new())),
    };
    Ok(color)
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Parse `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA` (the `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let mut input = hex.trim();
        let color = parse_hex_color(&mut input).ok()?;
        input.is_empty().then_some(color)
    }

    /// Shortest lossless hex form: `#rrggbb`, or `#rrggbbaa` when translucent.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// CSS color string accepted by SVG and Canvas2D.
    pub fn to_css(&self) -> String {
        if self.a == 255 {
            self.to_hex()
        } else {
            format!("rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, self.a as f32 / 255.0)
        }
    }
}

impl TryFrom<String> for Color {
    type Error = SceneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or(SceneError::InvalidColor(value))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

// ─── Themes ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeColors {
    pub fill: Color,
    pub stroke: Color,
    pub selected_stroke: Color,
    pub text: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortColors {
    pub fill: Color,
    pub stroke: Color,
    /// Fill of the port an in-progress connection would snap to.
    pub hover_fill: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeColors {
    pub stroke: Color,
    pub selected_stroke: Color,
    pub text: Color,
}

/// Named colors for every canvas element. Any record of this shape is a
/// valid theme; `dark()` and `light()` are the built-in presets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub background: Color,
    pub grid: Color,
    pub node: NodeColors,
    pub port: PortColors,
    pub edge: EdgeColors,
}

const ACCENT: Color = Color::rgb(0x00, 0x78, 0xd7);

impl Theme {
    pub const fn dark() -> Self {
        Self {
            background: Color::rgb(0x1e, 0x1e, 0x1e),
            grid: Color::rgb(0x33, 0x33, 0x33),
            node: NodeColors {
                fill: Color::rgb(0x25, 0x25, 0x26),
                stroke: Color::rgb(0x44, 0x44, 0x44),
                selected_stroke: ACCENT,
                text: Color::rgb(0xe0, 0xe0, 0xe0),
            },
            port: PortColors {
                fill: Color::rgb(0x33, 0x33, 0x33),
                stroke: Color::rgb(0x66, 0x66, 0x66),
                hover_fill: ACCENT,
            },
            edge: EdgeColors {
                stroke: Color::rgb(0x66, 0x66, 0x66),
                selected_stroke: ACCENT,
                text: Color::rgb(0xcc, 0xcc, 0xcc),
            },
        }
    }

    pub const fn light() -> Self {
        Self {
            background: Color::rgb(0xff, 0xff, 0xff),
            grid: Color::rgb(0xe0, 0xe0, 0xe0),
            node: NodeColors {
                fill: Color::rgb(0xf5, 0xf5, 0xf5),
                stroke: Color::rgb(0xcc, 0xcc, 0xcc),
                selected_stroke: ACCENT,
                text: Color::rgb(0x33, 0x33, 0x33),
            },
            port: PortColors {
                fill: Color::rgb(0xff, 0xff, 0xff),
                stroke: Color::rgb(0x99, 0x99, 0x99),
                hover_fill: ACCENT,
            },
            edge: EdgeColors {
                stroke: Color::rgb(0x99, 0x99, 0x99),
                selected_stroke: ACCENT,
                text: Color::rgb(0x66, 0x66, 0x66),
            },
        }
    }

    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
