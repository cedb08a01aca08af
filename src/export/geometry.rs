use log::warn;

use crate::model::{Coordinate, Diagram, NodeProperties, Segment};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelRect {
    pub x0: f64,
    pub y0: f64,
    pub width: f64,
    pub height: f64,
    pub center: Point,
}

impl PixelRect {
    pub fn new(x0: f64, y0: f64, width: f64, height: f64) -> Self {
        Self {
            x0,
            y0,
            width,
            height,
            center: Point {
                x: x0 + width / 2.0,
                y: y0 + height / 2.0,
            },
        }
    }

    pub fn right(&self) -> f64 {
        self.x0 + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y0 + self.height
    }

    /// Corners clockwise from the top left.
    pub fn corners(&self) -> [Point; 4] {
        let (left, top, right, bottom) = (self.x0, self.y0, self.right(), self.bottom());
        [
            Point { x: left, y: top },
            Point { x: right, y: top },
            Point { x: right, y: bottom },
            Point { x: left, y: bottom },
        ]
    }

    pub fn inset(self, amount: f64) -> Self {
        Self::new(
            self.x0 + amount,
            self.y0 + amount,
            (self.width - 2.0 * amount).max(1.0),
            (self.height - 2.0 * amount).max(1.0),
        )
    }
}

/// Extent of everything drawn, in diagram units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Bounds of the diagram's glyphs, reactions and connectors. A diagram with
/// nothing to draw gets a unit box at the origin.
pub fn diagram_bounds(diagram: &Diagram) -> Bounds {
    let mut x_values = Vec::new();
    let mut y_values = Vec::new();
    let mut push_rect = |prop: &NodeProperties| {
        x_values.push(prop.x);
        x_values.push(prop.right());
        y_values.push(prop.y);
        y_values.push(prop.bottom());
    };
    for node in &diagram.nodes {
        push_rect(&node.prop);
    }
    for compartment in &diagram.compartments {
        push_rect(&compartment.prop);
    }
    for note in &diagram.notes {
        push_rect(&note.prop);
    }

    let segments = diagram
        .edges
        .iter()
        .flat_map(|edge| edge.segments.iter())
        .chain(
            diagram
                .nodes
                .iter()
                .flat_map(|node| node.connectors.iter())
                .flat_map(|connector| connector.segments.iter()),
        );
    let mut points: Vec<Coordinate> = diagram.edges.iter().map(|edge| edge.position).collect();
    points.extend(segments.flat_map(|segment: &Segment| [segment.from, segment.to]));
    for point in points {
        x_values.push(point.x);
        y_values.push(point.y);
    }

    if x_values.is_empty() || y_values.is_empty() {
        warn!("diagram {} has nothing to draw", diagram.stable_id);
        return Bounds {
            min_x: 0.0,
            max_x: 1.0,
            min_y: 0.0,
            max_y: 1.0,
        };
    }

    Bounds {
        min_x: x_values.iter().copied().fold(f64::INFINITY, f64::min),
        max_x: x_values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        min_y: y_values.iter().copied().fold(f64::INFINITY, f64::min),
        max_y: y_values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    }
}

/// Shrink `factor` so the padded image stays within `max_size` pixels.
pub fn limit_factor(bounds: Bounds, margin: f64, factor: f64, max_size: f64, name: &str) -> f64 {
    let width = margin + bounds.width();
    let height = margin + bounds.height();
    if factor * width * factor * height <= max_size {
        return factor;
    }
    let reduced = (max_size / (width * height)).sqrt();
    warn!(
        "diagram {name} is too large; quality reduced from {factor:.2} to {reduced:.2} ({} x {})",
        (bounds.width() * reduced) as i64,
        (bounds.height() * reduced) as i64
    );
    reduced
}

/// Maps diagram units to canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    min_x: f64,
    min_y: f64,
    scale: f64,
}

impl Transform {
    /// Transform plus canvas size for `bounds` padded by `margin` on every side.
    pub fn fit(bounds: Bounds, margin: f64, scale: f64) -> (Self, i32, i32) {
        let width = ((2.0 * margin + bounds.width()) * scale + 0.5) as i32;
        let height = ((2.0 * margin + bounds.height()) * scale + 0.5) as i32;
        (
            Self {
                min_x: bounds.min_x - margin,
                min_y: bounds.min_y - margin,
                scale,
            },
            width.max(1),
            height.max(1),
        )
    }

    pub fn map_point(&self, x: f64, y: f64) -> Point {
        Point {
            x: (x - self.min_x) * self.scale,
            y: (y - self.min_y) * self.scale,
        }
    }

    pub fn map_coordinate(&self, coordinate: Coordinate) -> Point {
        self.map_point(coordinate.x, coordinate.y)
    }

    pub fn map_rect(&self, prop: &NodeProperties) -> PixelRect {
        let origin = self.map_point(prop.x, prop.y);
        PixelRect::new(
            origin.x,
            origin.y,
            prop.width * self.scale,
            prop.height * self.scale,
        )
    }

    pub fn scale_scalar(&self, value: f64) -> f64 {
        value * self.scale
    }
}
