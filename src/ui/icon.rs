use anyhow::{Result, anyhow};
use png::Decoder;
use tray_icon::Icon;

use crate::model::TrayMode;

// Ring = break, ring with a dot = focus, ring with bars = paused.
static ICON_FOCUS: &[u8] = include_bytes!("../../assets/icon-focus@2x.png");
static ICON_BREAK: &[u8] = include_bytes!("../../assets/icon-break@2x.png");
static ICON_PAUSED: &[u8] = include_bytes!("../../assets/icon-paused@2x.png");

/// Template icon for the given mode. macOS tints template icons to match the
/// menu bar appearance.
pub fn create_mode_icon(mode: TrayMode) -> Result<Icon> {
    let png_data = match mode {
        TrayMode::Focus => ICON_FOCUS,
        TrayMode::Break => ICON_BREAK,
        TrayMode::Paused => ICON_PAUSED,
    };
    let (rgba, width, height) = decode_rgba(png_data)?;
    Icon::from_rgba(rgba, width, height).map_err(|e| anyhow!("failed to create icon: {e}"))
}

fn decode_rgba(png_data: &[u8]) -> Result<(Vec<u8>, u32, u32)> {
    let decoder = Decoder::new(png_data);
    let mut reader = decoder
        .read_info()
        .map_err(|e| anyhow!("failed to read PNG header: {e}"))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| anyhow!("failed to decode PNG: {e}"))?;
    let pixels = &buf[..info.buffer_size()];

    let rgba = match info.color_type {
        png::ColorType::Rgba => pixels.to_vec(),
        png::ColorType::Rgb => pixels
            .chunks(3)
            .flat_map(|c| [c[0], c[1], c[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => pixels
            .chunks(2)
            .flat_map(|c| [c[0], c[0], c[0], c[1]])
            .collect(),
        png::ColorType::Grayscale => pixels.iter().flat_map(|&g| [g, g, g, 255]).collect(),
        png::ColorType::Indexed => {
            return Err(anyhow!("indexed PNG not supported for tray icon"));
        }
    };
    Ok((rgba, info.width, info.height))
}
