//! Static font-metric tables for worksheet type faces.
//!
//! Character widths are in em units. One base table covers a humanist sans;
//! the other families are expressed as a width scale over it, which is close
//! enough for line-count purposes (a word either fits the line or it doesn't).
//! The table covers ASCII 0x20..=0x7E; index = (char as usize) - 32.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFamily {
    /// Humanist sans, the default body face.
    #[default]
    Sans,
    /// Rounded early-reader face with single-storey letters.
    Rounded,
    /// Book serif for older readers.
    Serif,
    /// Wide, heavily weighted face for dyslexic readers.
    Dyslexic,
}

impl FontFamily {
    /// Average advance relative to `Sans`.
    pub fn width_scale(self) -> f32 {
        match self {
            FontFamily::Sans => 1.0,
            FontFamily::Rounded => 1.06,
            FontFamily::Serif => 0.88,
            FontFamily::Dyslexic => 1.18,
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown font family '{0}' (expected sans, rounded, serif or dyslexic)")]
pub struct UnknownFontFamily(String);

impl FromStr for FontFamily {
    type Err = UnknownFontFamily;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sans" => Ok(FontFamily::Sans),
            "rounded" => Ok(FontFamily::Rounded),
            "serif" => Ok(FontFamily::Serif),
            "dyslexic" => Ok(FontFamily::Dyslexic),
            other => Err(UnknownFontFamily(other.to_string())),
        }
    }
}

pub struct FontMetricTable {
    widths: [f32; 95],
    /// Fallback width for non-ASCII characters.
    pub average_char_width: f32,
    pub space_width: f32,
}

#[rustfmt::skip]
static SANS_TABLE: FontMetricTable = FontMetricTable {
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.25, 0.30, 0.38, 0.56, 0.56, 0.89, 0.67, 0.22, 0.33, 0.33, 0.39, 0.59, 0.28, 0.33, 0.28, 0.31,
        // 0-9
        0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56,
        // :     ;     <     =     >     ?     @
        0.28, 0.28, 0.59, 0.59, 0.59, 0.50, 1.02,
        // A-M
        0.67, 0.61, 0.61, 0.67, 0.56, 0.50, 0.67, 0.67, 0.25, 0.39, 0.61, 0.53, 0.78,
        // N-Z
        0.67, 0.72, 0.56, 0.72, 0.61, 0.50, 0.56, 0.67, 0.67, 0.89, 0.61, 0.61, 0.56,
        // [     \     ]     ^     _     `
        0.28, 0.31, 0.28, 0.47, 0.56, 0.34,
        // a-m
        0.56, 0.56, 0.50, 0.56, 0.56, 0.31, 0.56, 0.56, 0.22, 0.22, 0.53, 0.22, 0.83,
        // n-z
        0.56, 0.56, 0.56, 0.56, 0.33, 0.44, 0.39, 0.56, 0.50, 0.72, 0.50, 0.50, 0.44,
        // {     |     }     ~
        0.33, 0.26, 0.33, 0.59,
    ],
    average_char_width: 0.52,
    space_width: 0.25,
};

/// Width-in-pixels measurer for one family at one font size.
#[derive(Debug, Clone, Copy)]
pub struct TextMeasurer {
    family: FontFamily,
    font_size: f32,
}

impl TextMeasurer {
    pub fn new(family: FontFamily, font_size: f32) -> Self {
        Self { family, font_size }
    }

    fn em_to_px(&self, em: f32) -> f32 {
        em * self.font_size * self.family.width_scale()
    }

    /// Rendered width of `s` in pixels on a single line.
    pub fn measure_str(&self, s: &str) -> f32 {
        let em: f32 = s
            .chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    SANS_TABLE.widths[code - 32]
                } else {
                    SANS_TABLE.average_char_width
                }
            })
            .sum();
        self.em_to_px(em)
    }

    pub fn space_width(&self) -> f32 {
        self.em_to_px(SANS_TABLE.space_width)
    }

    /// Printed line count for `text` greedily word-wrapped at `max_width` pixels.
    ///
    /// Explicit newlines start a new line; blank lines still take a line. Empty
    /// text takes none. A word wider than the line occupies a line of its own.
    pub fn line_count(&self, text: &str, max_width: f32) -> usize {
        if text.trim().is_empty() {
            return 0;
        }
        text.split('\n')
            .map(|paragraph| self.wrap_paragraph(paragraph, max_width))
            .sum()
    }

    fn wrap_paragraph(&self, paragraph: &str, max_width: f32) -> usize {
        let space_w = self.space_width();
        let mut lines = 1usize;
        let mut current_width = 0.0_f32;
        let mut first_on_line = true;

        for word in paragraph.split_whitespace() {
            let word_w = self.measure_str(word);
            if !first_on_line && current_width + space_w + word_w > max_width {
                lines += 1;
                current_width = word_w;
            } else {
                let gap = if first_on_line { 0.0 } else { space_w };
                current_width += gap + word_w;
                first_on_line = false;
            }
        }
        lines
    }
}
