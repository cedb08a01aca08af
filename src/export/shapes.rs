use std::f64::consts::{FRAC_PI_2, PI, TAU};

use cairo::Context as CairoContext;

use super::geometry::{PixelRect, Point};
use crate::error::Result;
use crate::model::RenderableKind;
use crate::profiles::Color;

const ROUND_RECT_RADIUS: f64 = 8.0;
const CUT_CORNER: f64 = 8.0;
const GENE_NOTCH: f64 = 10.0;
const RNA_RADIUS: f64 = 10.0;
const SET_INSET: f64 = 3.0;
/// Half the arrow head base, relative to its length.
const ARROW_SPREAD: f64 = 0.6;

/// Outline of a glyph of the given kind. `scale` converts the shape
/// constants from diagram units to pixels.
pub fn path_glyph(
    ctx: &CairoContext,
    kind: RenderableKind,
    rect: PixelRect,
    scale: f64,
) -> Result<()> {
    match kind {
        RenderableKind::Protein
        | RenderableKind::ProteinDrug
        | RenderableKind::EntitySet
        | RenderableKind::EntitySetDrug => path_round_rect(ctx, rect, ROUND_RECT_RADIUS * scale),
        RenderableKind::Chemical | RenderableKind::ChemicalDrug => path_ellipse(ctx, rect),
        RenderableKind::Complex | RenderableKind::ComplexDrug => {
            path_polygon(ctx, &cut_rect_points(rect, CUT_CORNER * scale))
        }
        RenderableKind::Rna | RenderableKind::RnaDrug => {
            path_rounded(ctx, rect, Corners::bottom(RNA_RADIUS * scale))
        }
        RenderableKind::Gene => path_polygon(ctx, &tag_points(rect, GENE_NOTCH * scale)),
        RenderableKind::ProcessNode
        | RenderableKind::EncapsulatedNode
        | RenderableKind::Entity
        | RenderableKind::Other => path_rect(ctx, rect),
    }
}

/// Second outline that sets draw inside their border.
pub fn inner_outline(
    ctx: &CairoContext,
    kind: RenderableKind,
    rect: PixelRect,
    scale: f64,
) -> Result<bool> {
    if !matches!(kind, RenderableKind::EntitySet | RenderableKind::EntitySetDrug) {
        return Ok(false);
    }
    let inner = rect.inset(SET_INSET * scale);
    path_round_rect(ctx, inner, (ROUND_RECT_RADIUS - SET_INSET).max(1.0) * scale)?;
    Ok(true)
}

pub fn path_rect(ctx: &CairoContext, rect: PixelRect) -> Result<()> {
    path_polygon(ctx, &rect.corners())
}

pub fn path_ellipse(ctx: &CairoContext, rect: PixelRect) -> Result<()> {
    let radius_x = (rect.width / 2.0).max(1.0);
    let radius_y = (rect.height / 2.0).max(1.0);
    ctx.save()?;
    ctx.new_path();
    ctx.translate(rect.center.x, rect.center.y);
    ctx.scale(radius_x, radius_y);
    ctx.arc(0.0, 0.0, 1.0, 0.0, TAU);
    ctx.restore()?;
    Ok(())
}

pub fn path_round_rect(ctx: &CairoContext, rect: PixelRect, radius: f64) -> Result<()> {
    path_rounded(ctx, rect, Corners::all(radius))
}

/// Corner radii of a rounded outline.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Corners {
    top_left: f64,
    top_right: f64,
    bottom_right: f64,
    bottom_left: f64,
}

impl Corners {
    fn all(radius: f64) -> Self {
        Self {
            top_left: radius,
            top_right: radius,
            bottom_right: radius,
            bottom_left: radius,
        }
    }

    fn bottom(radius: f64) -> Self {
        Self {
            top_left: 0.0,
            top_right: 0.0,
            ..Self::all(radius)
        }
    }

    /// No corner may take more than half of the shorter side.
    fn fit(self, rect: PixelRect) -> Self {
        let limit = (rect.width / 2.0).min(rect.height / 2.0).max(0.0);
        let fit = |radius: f64| radius.max(0.0).min(limit);
        Self {
            top_left: fit(self.top_left),
            top_right: fit(self.top_right),
            bottom_right: fit(self.bottom_right),
            bottom_left: fit(self.bottom_left),
        }
    }
}

fn path_rounded(ctx: &CairoContext, rect: PixelRect, corners: Corners) -> Result<()> {
    let Corners {
        top_left,
        top_right,
        bottom_right,
        bottom_left,
    } = corners.fit(rect);
    let [nw, ne, se, sw] = rect.corners();
    ctx.new_path();
    ctx.move_to(nw.x + top_left, nw.y);
    ctx.line_to(ne.x - top_right, ne.y);
    quarter_arc(ctx, (ne.x - top_right, ne.y + top_right), top_right, -FRAC_PI_2);
    ctx.line_to(se.x, se.y - bottom_right);
    quarter_arc(ctx, (se.x - bottom_right, se.y - bottom_right), bottom_right, 0.0);
    ctx.line_to(sw.x + bottom_left, sw.y);
    quarter_arc(ctx, (sw.x + bottom_left, sw.y - bottom_left), bottom_left, FRAC_PI_2);
    ctx.line_to(nw.x, nw.y + top_left);
    quarter_arc(ctx, (nw.x + top_left, nw.y + top_left), top_left, PI);
    ctx.close_path();
    Ok(())
}

/// Clockwise quarter circle starting at angle `from`; square corners add nothing.
fn quarter_arc(ctx: &CairoContext, (x, y): (f64, f64), radius: f64, from: f64) {
    if radius > 0.0 {
        ctx.arc(x, y, radius, from, from + FRAC_PI_2);
    }
}

fn path_polygon(ctx: &CairoContext, points: &[Point]) -> Result<()> {
    ctx.new_path();
    let mut points = points.iter();
    if let Some(first) = points.next() {
        ctx.move_to(first.x, first.y);
    }
    for point in points {
        ctx.line_to(point.x, point.y);
    }
    ctx.close_path();
    Ok(())
}

/// Octagon left by cutting `corner` off every corner of `rect`.
fn cut_rect_points(rect: PixelRect, corner: f64) -> [Point; 8] {
    let corner = corner.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
    let [nw, ne, se, sw] = rect.corners();
    [
        Point { x: nw.x, y: nw.y + corner },
        Point { x: nw.x + corner, y: nw.y },
        Point { x: ne.x - corner, y: ne.y },
        Point { x: ne.x, y: ne.y + corner },
        Point { x: se.x, y: se.y - corner },
        Point { x: se.x - corner, y: se.y },
        Point { x: sw.x + corner, y: sw.y },
        Point { x: sw.x, y: sw.y - corner },
    ]
}

/// Rectangle whose left side is folded into a point, like a luggage tag.
fn tag_points(rect: PixelRect, notch: f64) -> [Point; 5] {
    let notch = notch.min(rect.width / 2.0).max(0.0);
    let [nw, ne, se, sw] = rect.corners();
    [
        Point { x: nw.x + notch, y: nw.y },
        ne,
        se,
        Point { x: sw.x + notch, y: sw.y },
        Point { x: nw.x, y: rect.center.y },
    ]
}

pub fn draw_open_circle(ctx: &CairoContext, center: Point, radius: f64, fill: Color) -> Result<()> {
    ctx.new_path();
    ctx.arc(center.x, center.y, radius.max(1.0), 0.0, TAU);
    ctx.save()?;
    fill.set_source(ctx);
    ctx.fill_preserve()?;
    ctx.restore()?;
    ctx.stroke()?;
    Ok(())
}

/// Circle that touches the end of the segment from `prev` to `end`.
pub fn draw_open_circle_tangent(
    ctx: &CairoContext,
    end: Point,
    prev: Point,
    radius: f64,
    fill: Color,
) -> Result<()> {
    let center = match Heading::between(prev, end) {
        Some(heading) => step(end, heading.along, -radius),
        None => end,
    };
    draw_open_circle(ctx, center, radius, fill)
}

pub fn draw_open_triangle_opaque(
    ctx: &CairoContext,
    end: Point,
    prev: Point,
    size: f64,
    fill: Color,
) -> Result<()> {
    let Some((left, right, tip)) = triangle_points(end, prev, size) else {
        return Ok(());
    };
    path_polygon(ctx, &[left, right, tip])?;
    ctx.save()?;
    fill.set_source(ctx);
    ctx.fill_preserve()?;
    ctx.restore()?;
    ctx.stroke()?;
    Ok(())
}

pub fn draw_filled_triangle(ctx: &CairoContext, end: Point, prev: Point, size: f64) -> Result<()> {
    match triangle_points(end, prev, size) {
        Some((left, right, tip)) => path_polygon(ctx, &[left, right, tip]),
        None => Ok(()),
    }
}

/// Direction of a segment: its unit vector and the normal to its left.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Heading {
    along: Point,
    normal: Point,
}

impl Heading {
    fn between(from: Point, to: Point) -> Option<Self> {
        let (dx, dy) = (to.x - from.x, to.y - from.y);
        let length = dx.hypot(dy);
        if length == 0.0 {
            return None;
        }
        let along = Point {
            x: dx / length,
            y: dy / length,
        };
        Some(Self {
            along,
            normal: Point {
                x: -along.y,
                y: along.x,
            },
        })
    }
}

fn step(from: Point, direction: Point, distance: f64) -> Point {
    Point {
        x: from.x + direction.x * distance,
        y: from.y + direction.y * distance,
    }
}

/// Base corners and tip of an arrow head of length `size` ending at `end`.
pub fn triangle_points(end: Point, prev: Point, size: f64) -> Option<(Point, Point, Point)> {
    let heading = Heading::between(prev, end)?;
    let base = step(end, heading.along, -size);
    let spread = size * ARROW_SPREAD;
    Some((
        step(base, heading.normal, spread),
        step(base, heading.normal, -spread),
        end,
    ))
}

/// Bar of `length` across the end of the segment from `prev` to `end`.
pub fn draw_inhibition_bar(ctx: &CairoContext, end: Point, prev: Point, length: f64) -> Result<()> {
    let Some(heading) = Heading::between(prev, end) else {
        return Ok(());
    };
    let from = step(end, heading.normal, -length / 2.0);
    let to = step(end, heading.normal, length / 2.0);
    ctx.new_path();
    ctx.move_to(from.x, from.y);
    ctx.line_to(to.x, to.y);
    ctx.stroke()?;
    Ok(())
}

/// Two diagonals across the box, used for crossed (loss of function) glyphs.
pub fn draw_cross(ctx: &CairoContext, rect: PixelRect) -> Result<()> {
    let [nw, ne, se, sw] = rect.corners();
    ctx.new_path();
    ctx.move_to(nw.x, nw.y);
    ctx.line_to(se.x, se.y);
    ctx.move_to(ne.x, ne.y);
    ctx.line_to(sw.x, sw.y);
    ctx.stroke()?;
    Ok(())
}
