use super::decorate::DecoratedState;
use crate::model::DiagramObject;
use crate::profiles::{Color, GlyphProfile, ProfileProperties};

/// The per-object facts that color precedence depends on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ObjectLook {
    pub selected: bool,
    pub disease: bool,
    pub fade_out: bool,
    pub analysis_active: bool,
}

impl ObjectLook {
    pub fn of(object: &impl DiagramObject, state: DecoratedState, analysis_active: bool) -> Self {
        Self {
            selected: state.selected,
            disease: object.is_disease(),
            fade_out: object.is_fade_out(),
            analysis_active,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrokeSource {
    Selection,
    Disease,
    FadeOut,
    Lighter,
    Normal,
}

impl StrokeSource {
    pub fn pick(look: ObjectLook) -> Self {
        match look {
            ObjectLook { selected: true, .. } => Self::Selection,
            ObjectLook { disease: true, .. } => Self::Disease,
            ObjectLook { fade_out: true, .. } => Self::FadeOut,
            ObjectLook {
                analysis_active: true,
                ..
            } => Self::Lighter,
            _ => Self::Normal,
        }
    }

    pub fn color(self, glyph: &GlyphProfile, properties: &ProfileProperties) -> Color {
        match self {
            Self::Selection => properties.selection,
            Self::Disease => properties.disease,
            Self::FadeOut => glyph.fade_out_stroke(),
            Self::Lighter => glyph.lighter_stroke(),
            Self::Normal => glyph.stroke(),
        }
    }
}

/// Fill and text share one chain: fade-out, then lighter, then normal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShadeSource {
    FadeOut,
    Lighter,
    Normal,
}

impl ShadeSource {
    pub fn pick(look: ObjectLook) -> Self {
        match look {
            ObjectLook { fade_out: true, .. } => Self::FadeOut,
            ObjectLook {
                analysis_active: true,
                ..
            } => Self::Lighter,
            _ => Self::Normal,
        }
    }

    pub fn fill(self, glyph: &GlyphProfile) -> Color {
        match self {
            Self::FadeOut => glyph.fade_out_fill(),
            Self::Lighter => glyph.lighter_fill(),
            Self::Normal => glyph.fill(),
        }
    }

    pub fn text(self, glyph: &GlyphProfile) -> Color {
        match self {
            Self::FadeOut => glyph.fade_out_text(),
            Self::Lighter => glyph.lighter_text(),
            Self::Normal => glyph.text(),
        }
    }
}

pub fn stroke_color(look: ObjectLook, glyph: &GlyphProfile, properties: &ProfileProperties) -> Color {
    StrokeSource::pick(look).color(glyph, properties)
}

pub fn fill_color(look: ObjectLook, glyph: &GlyphProfile) -> Color {
    ShadeSource::pick(look).fill(glyph)
}

pub fn text_color(look: ObjectLook, glyph: &GlyphProfile) -> Color {
    ShadeSource::pick(look).text(glyph)
}
