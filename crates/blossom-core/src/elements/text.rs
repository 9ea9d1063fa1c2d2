//! Text element configuration.

use serde::{Deserialize, Serialize};

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Palette presets for new text blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextPreset {
    Heading,
    #[default]
    Paragraph,
    List,
}

impl TextPreset {
    /// Default height for this preset (all presets are 400 wide).
    pub fn height(&self) -> u32 {
        match self {
            TextPreset::Heading => 80,
            TextPreset::Paragraph | TextPreset::List => 150,
        }
    }
}

/// Configuration for a text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextConfig {
    pub content: String,
    /// CSS font size, e.g. "16px".
    pub font_size: String,
    pub font_weight: String,
    pub font_style: String,
    pub text_align: TextAlign,
    pub color: String,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self::preset(TextPreset::Paragraph)
    }
}

impl TextConfig {
    /// Starting configuration for a palette preset.
    pub fn preset(preset: TextPreset) -> Self {
        let (content, font_size, font_weight) = match preset {
            TextPreset::Heading => ("Heading", "32px", "bold"),
            TextPreset::Paragraph => ("Paragraph text...", "16px", "normal"),
            TextPreset::List => ("• Item 1\n• Item 2\n• Item 3", "16px", "normal"),
        };
        Self {
            content: content.to_string(),
            font_size: font_size.to_string(),
            font_weight: font_weight.to_string(),
            font_style: "normal".to_string(),
            text_align: TextAlign::Left,
            color: "#000000".to_string(),
        }
    }
}
