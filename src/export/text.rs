use cairo::Context as CairoContext;
use pango::{Alignment, FontDescription, WrapMode};
use pangocairo::functions as pangocairo;

use super::geometry::{PixelRect, Point};
use crate::error::Result;
use crate::profiles::Color;

pub const FONT_FAMILY: &str = "Liberation Sans";
pub const FONT_LABEL_PX: f64 = 8.0;
pub const FONT_TITLE_PX: f64 = 12.0;
const TEXT_OUTLINE_WIDTH: f64 = 0.75;
const LABEL_PADDING_PX: f64 = 2.0;

fn layout(ctx: &CairoContext, text: &str, font_px: f64, wrap_width: Option<f64>) -> pango::Layout {
    let layout = pangocairo::create_layout(ctx);
    let mut font_desc = FontDescription::from_string(FONT_FAMILY);
    font_desc.set_absolute_size(font_px * pango::SCALE as f64);
    layout.set_font_description(Some(&font_desc));
    layout.set_alignment(Alignment::Center);
    if let Some(width) = wrap_width {
        layout.set_width((width * pango::SCALE as f64) as i32);
        layout.set_wrap(WrapMode::WordChar);
    }
    layout.set_text(text);
    layout
}

/// Glyph label centered in `rect`. With a split, the part of the label left
/// of `rect.x0 + split * rect.width` is drawn in the split color instead.
pub fn draw_label(
    ctx: &CairoContext,
    rect: PixelRect,
    text: &str,
    font_px: f64,
    color: Color,
    split: Option<(f64, Color)>,
) -> Result<()> {
    if text.trim().is_empty() {
        return Ok(());
    }
    let wrap = (rect.width - 2.0 * LABEL_PADDING_PX).max(1.0);
    let layout = layout(ctx, text, font_px, Some(wrap));
    let (width, height) = layout.pixel_size();
    let x = rect.center.x - width as f64 / 2.0;
    let y = rect.center.y - height as f64 / 2.0;

    let Some((split, split_color)) = split.filter(|(split, _)| *split > 0.0) else {
        return draw_text_at(ctx, x, y, &layout, color, false);
    };
    let boundary = rect.x0 + rect.width * split.min(1.0);

    ctx.save()?;
    ctx.rectangle(rect.x0 - width as f64, y, boundary - rect.x0 + width as f64, height as f64);
    ctx.clip();
    draw_text_at(ctx, x, y, &layout, split_color, false)?;
    ctx.restore()?;

    ctx.save()?;
    ctx.rectangle(boundary, y, rect.x0 + rect.width + width as f64 - boundary, height as f64);
    ctx.clip();
    draw_text_at(ctx, x, y, &layout, color, false)?;
    ctx.restore()?;
    Ok(())
}

/// Draw text at the given top-left position, optionally with a light outline.
pub fn draw_text_at(
    ctx: &CairoContext,
    x: f64,
    y: f64,
    layout: &pango::Layout,
    color: Color,
    outline: bool,
) -> Result<()> {
    ctx.save()?;
    ctx.new_path();
    ctx.move_to(x, y);
    pangocairo::layout_path(ctx, layout);
    if outline {
        Color::WHITE.set_source(ctx);
        ctx.set_line_width(TEXT_OUTLINE_WIDTH);
        ctx.stroke_preserve()?;
    }
    color.set_source(ctx);
    ctx.fill()?;
    ctx.restore()?;
    Ok(())
}

/// Draw text aligned to the bottom-center of a bounding rectangle.
pub fn draw_text_bottom_centered(
    ctx: &CairoContext,
    rect: PixelRect,
    text: &str,
    font_px: f64,
    color: Color,
) -> Result<()> {
    if text.trim().is_empty() {
        return Ok(());
    }
    let layout = layout(ctx, text, font_px, None);
    let (width, height) = layout.pixel_size();
    let x = rect.center.x - width as f64 / 2.0;
    let y = rect.y0 + rect.height - height as f64 - LABEL_PADDING_PX;
    draw_text_at(ctx, x, y, &layout, color, true)
}

/// Left aligned text with its top-left corner at `origin`.
pub fn draw_text_left(
    ctx: &CairoContext,
    origin: Point,
    text: &str,
    font_px: f64,
    color: Color,
) -> Result<()> {
    if text.trim().is_empty() {
        return Ok(());
    }
    let layout = layout(ctx, text, font_px, None);
    layout.set_alignment(Alignment::Left);
    draw_text_at(ctx, origin.x, origin.y, &layout, color, true)
}
