//! Color profiles for diagram glyphs and analysis overlays.

use std::path::Path;

use serde::Deserialize;

use crate::error::{ExportError, Result};
use crate::model::{read_json, RenderableKind};

const STANDARD_DIAGRAM_PROFILE: &str = include_str!("../profiles/diagram_standard.json");
const STANDARD_ANALYSIS_PROFILE: &str = include_str!("../profiles/analysis_standard.json");

/// RGBA color with components in `[0, 1]`, ready for cairo.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: 1.0,
        }
    }

    /// Parse `#RRGGBB`, `#RRGGBBAA`, `rgb(r,g,b)` or `rgba(r,g,b,a)`.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || ExportError::InvalidColor(text.to_string());
        let trimmed = text.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            let channel = |range: std::ops::Range<usize>| {
                hex.get(range)
                    .and_then(|digits| u8::from_str_radix(digits, 16).ok())
                    .ok_or_else(invalid)
            };
            return match hex.len() {
                6 => Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
                8 => {
                    let mut color = Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?);
                    color.a = channel(6..8)? as f64 / 255.0;
                    Ok(color)
                }
                _ => Err(invalid()),
            };
        }
        let lower = trimmed.to_ascii_lowercase();
        let body = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(invalid)?;
        let parts: Vec<f64> = body
            .split(',')
            .map(|part| part.trim().parse::<f64>().map_err(|_| invalid()))
            .collect::<Result<_>>()?;
        match parts.as_slice() {
            [r, g, b] => Ok(Self::from_components(*r, *g, *b, 1.0)),
            [r, g, b, a] => Ok(Self::from_components(*r, *g, *b, *a)),
            _ => Err(invalid()),
        }
    }

    fn from_components(r: f64, g: f64, b: f64, a: f64) -> Self {
        let unit = |value: f64| (value / 255.0).clamp(0.0, 1.0);
        Self {
            r: unit(r),
            g: unit(g),
            b: unit(b),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Linear blend, `t = 0` is `self` and `t = 1` is `other`.
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |from: f64, to: f64| from + (to - from) * t;
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// `#rrggbb` form, alpha dropped.
    pub fn to_hex(self) -> String {
        let byte = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }

    pub fn set_source(self, ctx: &cairo::Context) {
        ctx.set_source_rgba(self.r, self.g, self.b, self.a);
    }
}

impl TryFrom<String> for Color {
    type Error = ExportError;

    fn try_from(value: String) -> Result<Self> {
        Color::parse(&value)
    }
}

/// Two or three color ramp used by analysis overlays.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Gradient {
    pub min: Color,
    #[serde(default)]
    pub stop: Option<Color>,
    pub max: Color,
}

impl Gradient {
    /// Scale 0 maps to `max`, scale 1 maps to `min`.
    pub fn interpolate(&self, scale: f64) -> Color {
        let scale = if scale.is_nan() { 1.0 } else { scale.clamp(0.0, 1.0) };
        match self.stop {
            None => self.max.lerp(self.min, scale),
            Some(stop) if scale < 0.5 => self.max.lerp(stop, scale * 2.0),
            Some(stop) => stop.lerp(self.min, (scale - 0.5) * 2.0),
        }
    }
}

/// Colors of one glyph family. Missing variants fall back to the base color.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlyphProfile {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub text: Option<Color>,
    pub lighter_fill: Option<Color>,
    pub lighter_stroke: Option<Color>,
    pub lighter_text: Option<Color>,
    pub fade_out_fill: Option<Color>,
    pub fade_out_stroke: Option<Color>,
    pub fade_out_text: Option<Color>,
}

impl GlyphProfile {
    pub fn fill(&self) -> Color {
        self.fill.unwrap_or(Color::WHITE)
    }

    pub fn stroke(&self) -> Color {
        self.stroke.unwrap_or(Color::BLACK)
    }

    pub fn text(&self) -> Color {
        self.text.unwrap_or(Color::BLACK)
    }

    pub fn lighter_fill(&self) -> Color {
        self.lighter_fill.unwrap_or_else(|| self.fill())
    }

    pub fn lighter_stroke(&self) -> Color {
        self.lighter_stroke.unwrap_or_else(|| self.stroke())
    }

    pub fn lighter_text(&self) -> Color {
        self.lighter_text.unwrap_or_else(|| self.text())
    }

    pub fn fade_out_fill(&self) -> Color {
        self.fade_out_fill.unwrap_or_else(|| self.fill())
    }

    pub fn fade_out_stroke(&self) -> Color {
        self.fade_out_stroke.unwrap_or_else(|| self.stroke())
    }

    pub fn fade_out_text(&self) -> Color {
        self.fade_out_text.unwrap_or_else(|| self.text())
    }
}

/// Colors shared by every glyph: decoration outlines and the disease marker.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProfileProperties {
    pub selection: Color,
    pub halo: Color,
    pub flag: Color,
    pub disease: Color,
    pub text: Color,
}

impl Default for ProfileProperties {
    fn default() -> Self {
        Self {
            selection: Color::rgb(0x00, 0x00, 0xFF),
            halo: Color::rgb(0xE0, 0xE0, 0xFF),
            flag: Color::rgb(0xFF, 0x00, 0xFF),
            disease: Color::rgb(0xFF, 0x00, 0x00),
            text: Color::BLACK,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DiagramProfile {
    pub name: String,
    pub properties: ProfileProperties,
    pub protein: GlyphProfile,
    pub chemical: GlyphProfile,
    pub complex: GlyphProfile,
    pub entity: GlyphProfile,
    pub entityset: GlyphProfile,
    pub gene: GlyphProfile,
    pub rna: GlyphProfile,
    pub processnode: GlyphProfile,
    pub reaction: GlyphProfile,
    pub compartment: GlyphProfile,
    pub note: GlyphProfile,
}

impl DiagramProfile {
    pub fn glyph(&self, kind: RenderableKind) -> &GlyphProfile {
        match kind {
            RenderableKind::Protein | RenderableKind::ProteinDrug => &self.protein,
            RenderableKind::Chemical | RenderableKind::ChemicalDrug => &self.chemical,
            RenderableKind::Complex | RenderableKind::ComplexDrug => &self.complex,
            RenderableKind::EntitySet | RenderableKind::EntitySetDrug => &self.entityset,
            RenderableKind::Gene => &self.gene,
            RenderableKind::Rna | RenderableKind::RnaDrug => &self.rna,
            RenderableKind::ProcessNode | RenderableKind::EncapsulatedNode => &self.processnode,
            RenderableKind::Entity | RenderableKind::Other => &self.entity,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GradientSheet {
    pub gradient: Gradient,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AnalysisProfile {
    #[serde(default)]
    pub name: String,
    pub enrichment: GradientSheet,
    pub expression: GradientSheet,
    /// Label color drawn over analysis strips.
    #[serde(default = "default_ribbon")]
    pub ribbon: Color,
}

fn default_ribbon() -> Color {
    Color::WHITE
}

/// Diagram and analysis profiles used by one export.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorProfiles {
    pub diagram: DiagramProfile,
    pub analysis: AnalysisProfile,
}

impl ColorProfiles {
    /// The profiles bundled with the binary.
    pub fn standard() -> Result<Self> {
        Ok(Self {
            diagram: serde_json::from_str(STANDARD_DIAGRAM_PROFILE)
                .map_err(ExportError::EmbeddedProfile)?,
            analysis: serde_json::from_str(STANDARD_ANALYSIS_PROFILE)
                .map_err(ExportError::EmbeddedProfile)?,
        })
    }

    /// Load profile files, falling back to the bundled profile for any not given.
    pub fn load(diagram: Option<&Path>, analysis: Option<&Path>) -> Result<Self> {
        let standard = Self::standard()?;
        Ok(Self {
            diagram: match diagram {
                Some(path) => read_json(path)?,
                None => standard.diagram,
            },
            analysis: match analysis {
                Some(path) => read_json(path)?,
                None => standard.analysis,
            },
        })
    }
}

/// Same as [`ColorProfiles::load`].
pub fn load_profiles(diagram: Option<&Path>, analysis: Option<&Path>) -> Result<ColorProfiles> {
    ColorProfiles::load(diagram, analysis)
}
