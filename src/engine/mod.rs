//! Decoration and analysis overlay engine.
//!
//! One request builds a [`GraphIndex`], decorates it, binds the analysis
//! result and then asks for overlays and colors per object while drawing.
//! Nothing here is shared between requests.

mod binder;
mod color;
mod decorate;
mod index;
mod legend;
mod membership;
mod overlay;
mod resolve;

#[cfg(test)]
mod test_support;

pub use binder::{bind, AnalysisBinding, NodeHits};
pub use color::{fill_color, stroke_color, text_color, ObjectLook, ShadeSource, StrokeSource};
pub use decorate::{decorate, DecoratedState, Decoration};
pub use index::{GraphIndex, ObjectRef};
pub use legend::{legend_ticks, LegendTick};
pub use membership::Containment;
pub use overlay::{
    enrichment_overlay, expression_overlay, expression_scale, overlay, Overlay, OverlaySegment,
};
