//! Expression legend: a gradient bar to the right of the diagram with the
//! value range, the shown column and a mark per selected value.

use cairo::Context as CairoContext;

use super::geometry::{Bounds, Transform};
use super::text::{draw_label, FONT_LABEL_PX};
use crate::engine::LegendTick;
use crate::error::Result;
use crate::model::NodeProperties;
use crate::profiles::{Color, Gradient};

const LEGEND_GAP: f64 = 20.0;
const LEGEND_WIDTH: f64 = 50.0;
const LEGEND_BAR_WIDTH: f64 = 16.0;
const LEGEND_ROW: f64 = 14.0;
const LEGEND_MIN_HEIGHT: f64 = 160.0;
const GRADIENT_BANDS: usize = 64;
const TICK_OVERHANG: f64 = 4.0;
const TICK_WIDTH: f64 = 2.0;

/// Diagram bounds grown to make room for the legend column.
pub fn with_legend(bounds: Bounds) -> Bounds {
    Bounds {
        max_x: bounds.max_x + LEGEND_GAP + LEGEND_WIDTH,
        max_y: bounds.max_y.max(bounds.min_y + LEGEND_MIN_HEIGHT),
        ..bounds
    }
}

/// Legend boxes in diagram units, stacked top to bottom in the last
/// `LEGEND_WIDTH` units of bounds returned by [`with_legend`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LegendLayout {
    pub max_label: NodeProperties,
    pub bar: NodeProperties,
    pub min_label: NodeProperties,
    pub column_label: NodeProperties,
}

impl LegendLayout {
    pub fn new(bounds: Bounds) -> Self {
        let x = bounds.max_x - LEGEND_WIDTH;
        let row = |y: f64| NodeProperties {
            x,
            y,
            width: LEGEND_WIDTH,
            height: LEGEND_ROW,
        };
        let height = bounds.height();
        Self {
            max_label: row(bounds.min_y),
            bar: NodeProperties {
                x: x + (LEGEND_WIDTH - LEGEND_BAR_WIDTH) / 2.0,
                y: bounds.min_y + LEGEND_ROW,
                width: LEGEND_BAR_WIDTH,
                height: (height - 3.0 * LEGEND_ROW).max(LEGEND_ROW),
            },
            min_label: row(bounds.min_y + height - 2.0 * LEGEND_ROW),
            column_label: row(bounds.min_y + height - LEGEND_ROW),
        }
    }

    /// Height of a gradient position inside the bar; 0 is the top (max) end.
    pub fn tick_y(&self, scale: f64) -> f64 {
        self.bar.y + scale.clamp(0.0, 1.0) * self.bar.height
    }
}

/// What the legend shows for one frame.
pub struct LegendContent<'a> {
    pub gradient: &'a Gradient,
    pub range: (f64, f64),
    pub column: Option<&'a str>,
    pub ticks: &'a [LegendTick],
    pub tick_color: Color,
    pub text_color: Color,
}

pub fn draw_legend(
    ctx: &CairoContext,
    transform: &Transform,
    layout: &LegendLayout,
    content: &LegendContent<'_>,
) -> Result<()> {
    let scale = transform.scale_scalar(1.0);
    let bar = layout.bar;
    let band = bar.height / GRADIENT_BANDS as f64;

    ctx.save()?;
    for i in 0..GRADIENT_BANDS {
        let rect = transform.map_rect(&NodeProperties {
            y: bar.y + band * i as f64,
            height: band,
            ..bar
        });
        // Overlap bands by a pixel so no seams show between them.
        ctx.rectangle(rect.x0, rect.y0, rect.width, rect.height + 1.0);
        let position = (i as f64 + 0.5) / GRADIENT_BANDS as f64;
        content.gradient.interpolate(position).set_source(ctx);
        ctx.fill()?;
    }
    let outline = transform.map_rect(&bar);
    ctx.rectangle(outline.x0, outline.y0, outline.width, outline.height);
    content.text_color.set_source(ctx);
    ctx.set_line_width(scale);
    ctx.stroke()?;

    content.tick_color.set_source(ctx);
    ctx.set_line_width(TICK_WIDTH * scale);
    for tick in content.ticks {
        let y = transform.map_point(bar.x, layout.tick_y(tick.scale)).y;
        ctx.move_to(outline.x0 - TICK_OVERHANG * scale, y);
        ctx.line_to(outline.x0 + outline.width + TICK_OVERHANG * scale, y);
        ctx.stroke()?;
    }
    ctx.restore()?;

    let (min, max) = content.range;
    let font_px = FONT_LABEL_PX * scale;
    let label = |rect: &NodeProperties, text: &str| {
        draw_label(ctx, transform.map_rect(rect), text, font_px, content.text_color, None)
    };
    label(&layout.max_label, &format_value(max))?;
    label(&layout.min_label, &format_value(min))?;
    if let Some(column) = content.column {
        label(&layout.column_label, column)?;
    }
    Ok(())
}

/// Two decimals at most, without trailing zeros.
fn format_value(value: f64) -> String {
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn bounds() -> Bounds {
        Bounds {
            min_x: 0.0,
            max_x: 100.0,
            min_y: 0.0,
            max_y: 50.0,
        }
    }

    #[test]
    fn legend_widens_and_heightens_the_canvas() {
        let grown = with_legend(bounds());
        assert_eq!(grown.max_x, 170.0);
        assert_eq!(grown.max_y, 160.0);
        assert_eq!(grown.min_x, 0.0);
    }

    #[test]
    fn layout_stacks_labels_around_the_bar() {
        let layout = LegendLayout::new(with_legend(bounds()));
        assert_eq!(layout.max_label.x, 120.0);
        assert_eq!(layout.bar.x, 137.0);
        assert_eq!(layout.bar.y, 14.0);
        assert_eq!(layout.bar.height, 118.0);
        assert_eq!(layout.min_label.y, 132.0);
        assert_eq!(layout.column_label.y, 146.0);
        assert_eq!(layout.tick_y(0.0), 14.0);
        assert_eq!(layout.tick_y(0.5), 73.0);
        assert_eq!(layout.tick_y(2.0), 132.0);
    }

    #[rstest]
    #[case(10.0, "10")]
    #[case(0.0, "0")]
    #[case(-0.5, "-0.5")]
    #[case(2.346, "2.35")]
    #[case(100.0, "100")]
    fn values_are_printed_compactly(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_value(value), expected);
    }
}
