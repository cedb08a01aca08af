use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use cairo::{Context as CairoContext, Format, ImageSurface, SvgSurface};
use image::codecs::gif::{GifEncoder, Repeat};
use image::codecs::jpeg::JpegEncoder;
use image::{Delay, ExtendedColorType, Frame, Rgba, RgbaImage};
use log::{debug, info};

use super::args::{ExportArgs, OutputFormat, MARGIN, MAX_GIF_SIZE, MAX_IMAGE_SIZE};
use super::canvas::Scene;
use super::geometry::{limit_factor, Bounds, Transform};
use crate::error::{ExportError, Result};
use crate::model::AnalysisKind;
use crate::profiles::Color;

const JPEG_QUALITY: u8 = 90;
const FRAME_DELAY_MS: u32 = 1000;

/// Draw the scene into `output` in the requested format.
pub fn export_image(scene: &Scene<'_>, args: &ExportArgs, output: &Path) -> Result<()> {
    check_column(scene, args.column)?;
    let bounds = scene.bounds();
    if args.format == OutputFormat::Svg {
        return write_svg(scene, args, bounds, output);
    }

    let factor = limit_factor(
        bounds,
        MARGIN,
        args.factor(),
        MAX_IMAGE_SIZE,
        &scene.diagram().stable_id,
    );
    let (transform, width, height) = Transform::fit(bounds, MARGIN, factor);
    let background = (!args.format.is_transparent()).then_some(args.background);
    let surface = draw_surface(scene, &transform, width, height, args.column, args.write_title, background)?;

    let mut writer = create_output(output)?;
    match args.format {
        OutputFormat::Png => surface.write_to_png(&mut writer)?,
        OutputFormat::Jpeg => {
            let image = surface_to_rgba(surface)?;
            let rgb = rgba_to_rgb(&image);
            JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY).encode(
                &rgb,
                image.width(),
                image.height(),
                ExtendedColorType::Rgb8,
            )?;
        }
        OutputFormat::Gif => {
            let image = surface_to_rgba(surface)?;
            GifEncoder::new(&mut writer).encode_frame(Frame::new(image))?;
        }
        OutputFormat::Svg => return Err(ExportError::UnsupportedFormat(args.format.to_string())),
    }
    writer.flush()?;
    info!("wrote {width}x{height} {} to {output:?}", args.format);
    Ok(())
}

/// One frame per expression column, one second each, looping forever.
pub fn export_animated_gif(scene: &Scene<'_>, args: &ExportArgs, output: &Path) -> Result<()> {
    if scene.binding().kind() != AnalysisKind::Expression {
        return Err(ExportError::NotExpression);
    }
    let bounds = scene.bounds();
    let factor = limit_factor(
        bounds,
        MARGIN,
        args.factor(),
        MAX_GIF_SIZE,
        &scene.diagram().stable_id,
    );
    let (transform, width, height) = Transform::fit(bounds, MARGIN, factor);
    let columns = scene.binding().column_count();

    let mut writer = create_output(output)?;
    {
        let mut encoder = GifEncoder::new(&mut writer);
        encoder.set_repeat(Repeat::Infinite)?;
        for column in 0..columns {
            let surface = draw_surface(
                scene,
                &transform,
                width,
                height,
                column,
                args.write_title,
                Some(args.background),
            )?;
            let delay = Delay::from_numer_denom_ms(FRAME_DELAY_MS, 1);
            encoder.encode_frame(Frame::from_parts(surface_to_rgba(surface)?, 0, 0, delay))?;
            debug!("encoded frame {} of {columns}", column + 1);
        }
    }
    writer.flush()?;
    info!("wrote {columns} frame animated gif ({width}x{height}) to {output:?}");
    Ok(())
}

fn check_column(scene: &Scene<'_>, column: usize) -> Result<()> {
    let binding = scene.binding();
    let columns = binding.column_count();
    if binding.kind() == AnalysisKind::Expression && columns > 0 && column >= columns {
        return Err(ExportError::ColumnOutOfRange { column, columns });
    }
    Ok(())
}

fn create_output(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufWriter::new(file))
}

fn draw_surface(
    scene: &Scene<'_>,
    transform: &Transform,
    width: i32,
    height: i32,
    column: usize,
    write_title: bool,
    background: Option<Color>,
) -> Result<ImageSurface> {
    let surface = ImageSurface::create(Format::ARgb32, width, height)?;
    {
        let ctx = CairoContext::new(&surface)?;
        if let Some(background) = background {
            background.set_source(&ctx);
            ctx.paint()?;
        }
        scene.draw(&ctx, transform, column, write_title)?;
    }
    Ok(surface)
}

/// SVG keeps diagram units, so it is drawn at scale 1 whatever the quality.
fn write_svg(scene: &Scene<'_>, args: &ExportArgs, bounds: Bounds, output: &Path) -> Result<()> {
    let (transform, width, height) = Transform::fit(bounds, MARGIN, 1.0);
    let surface = SvgSurface::new(f64::from(width), f64::from(height), Some(output))?;
    {
        let ctx = CairoContext::new(&surface)?;
        scene.draw(&ctx, &transform, args.column, args.write_title)?;
    }
    surface.finish();
    info!("wrote {width}x{height} svg to {output:?}");
    Ok(())
}

fn surface_to_rgba(mut surface: ImageSurface) -> Result<RgbaImage> {
    surface.flush();
    let width = surface.width().max(0) as u32;
    let height = surface.height().max(0) as u32;
    let stride = surface.stride().max(0) as usize;
    let data = surface.data().map_err(|_| ExportError::SurfaceBorrow)?;
    Ok(argb_to_rgba(&data, width, height, stride))
}

/// Convert cairo's premultiplied native-endian ARGB32 rows to straight RGBA.
fn argb_to_rgba(data: &[u8], width: u32, height: u32, stride: usize) -> RgbaImage {
    let mut image = RgbaImage::new(width, height);
    if stride == 0 {
        return image;
    }
    for (y, row) in data.chunks(stride).take(height as usize).enumerate() {
        for x in 0..width as usize {
            let Some(&[b0, b1, b2, b3]) = row.get(4 * x..4 * x + 4) else {
                continue;
            };
            let pixel = u32::from_ne_bytes([b0, b1, b2, b3]);
            let alpha = (pixel >> 24) & 0xFF;
            let channel = |shift: u32| {
                let value = (pixel >> shift) & 0xFF;
                if alpha == 0 {
                    0
                } else {
                    ((value * 255 + alpha / 2) / alpha).min(255) as u8
                }
            };
            image.put_pixel(
                x as u32,
                y as u32,
                Rgba([channel(16), channel(8), channel(0), alpha as u8]),
            );
        }
    }
    image
}

fn rgba_to_rgb(image: &RgbaImage) -> Vec<u8> {
    let mut rgb = vec![0u8; image.width() as usize * image.height() as usize * 3];
    for (src, dst) in image.as_raw().chunks_exact(4).zip(rgb.chunks_exact_mut(3)) {
        dst.copy_from_slice(&src[..3]);
    }
    rgb
}
