use super::binder::AnalysisBinding;
use crate::model::{AnalysisKind, DiagramObject, Node, NodeProperties};
use crate::profiles::{AnalysisProfile, Color, Gradient};

/// One equal-width slice of an expression strip.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlaySegment {
    pub area: NodeProperties,
    /// Gradient position of the member's value; unmeasured members have none.
    pub scale: Option<f64>,
    pub color: Option<Color>,
}

/// Analysis paint for one node and one expression column.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Overlay {
    #[default]
    None,
    Enrichment {
        area: NodeProperties,
        color: Color,
        fraction: f64,
    },
    Expression {
        segments: Vec<OverlaySegment>,
        /// Share of the label that sits over the colored part of the strip.
        text_split: f64,
    },
}

impl Overlay {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Painted rectangles with their colors, left to right.
    pub fn painted(&self) -> Vec<(NodeProperties, Color)> {
        match self {
            Self::None => Vec::new(),
            Self::Enrichment { area, color, .. } => vec![(*area, *color)],
            Self::Expression { segments, .. } => segments
                .iter()
                .filter_map(|segment| segment.color.map(|color| (segment.area, color)))
                .collect(),
        }
    }

    /// Share of the label drawn in the ribbon color.
    pub fn text_split(&self) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Enrichment { fraction, .. } => *fraction,
            Self::Expression { text_split, .. } => *text_split,
        }
    }
}

/// Overlay of a node for one expression column. Faded nodes never get one.
pub fn overlay(
    node: &Node,
    binding: &AnalysisBinding<'_>,
    profile: &AnalysisProfile,
    column: usize,
) -> Overlay {
    if node.is_fade_out() {
        return Overlay::None;
    }
    let Some(hits) = binding.hits(node.id) else {
        return Overlay::None;
    };
    match binding.kind() {
        AnalysisKind::None => Overlay::None,
        AnalysisKind::Overrepresentation | AnalysisKind::SpeciesComparison => {
            enrichment_overlay(node.prop, hits.enrichment(), &profile.enrichment.gradient)
        }
        AnalysisKind::Expression => expression_overlay(
            node.prop,
            &hits.values(column),
            hits.total(),
            binding.range(),
            &profile.expression.gradient,
        ),
    }
}

/// Left `fraction` of the bounds, painted with the gradient's max color.
pub fn enrichment_overlay(bounds: NodeProperties, fraction: f64, gradient: &Gradient) -> Overlay {
    if fraction.is_nan() || fraction <= 0.0 {
        return Overlay::None;
    }
    let fraction = fraction.min(1.0);
    Overlay::Enrichment {
        area: NodeProperties {
            width: bounds.width * fraction,
            ..bounds
        },
        color: gradient.max,
        fraction,
    }
}

/// Split the bounds into `total` segments and color the first ones by value.
pub fn expression_overlay(
    bounds: NodeProperties,
    values: &[Option<f64>],
    total: usize,
    (min, max): (f64, f64),
    gradient: &Gradient,
) -> Overlay {
    let total = total.max(values.len());
    if total == 0 {
        return Overlay::None;
    }
    let width = bounds.width / total as f64;
    let segments = (0..total)
        .map(|i| {
            let scale = values
                .get(i)
                .copied()
                .flatten()
                .map(|value| expression_scale(value, min, max));
            OverlaySegment {
                area: NodeProperties {
                    x: bounds.x + width * i as f64,
                    width,
                    ..bounds
                },
                scale,
                color: scale.map(|scale| gradient.interpolate(scale)),
            }
        })
        .collect();
    Overlay::Expression {
        segments,
        text_split: values.len() as f64 / total as f64,
    }
}

/// `1 - (value - min) / (max - min)`, clamped; a flat range maps to 1.
pub fn expression_scale(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span.abs() <= f64::EPSILON {
        return 1.0;
    }
    (1.0 - (value - min) / span).clamp(0.0, 1.0)
}
