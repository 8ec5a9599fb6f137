//! Background color resolution.
//!
//! Accepts the same textual forms a color picker or settings file produces:
//! `#RGB`, `#RRGGBB`, `#RRGGBBAA`, CSS color keywords and `rgb(r, g, b)`.
//! The resolved color is always fully opaque.

use image::Rgba;
use palette::Srgb;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Resolve a color spec to an opaque RGBA value, falling back to white.
pub fn resolve_color(spec: &str) -> Rgba<u8> {
    match parse_color(spec) {
        Some((r, g, b)) => Rgba([r, g, b, 255]),
        None => {
            log::debug!("Unrecognized color {:?}, using white", spec);
            WHITE
        }
    }
}

fn parse_color(spec: &str) -> Option<(u8, u8, u8)> {
    let spec = spec.trim();

    if let Some(hex) = spec.strip_prefix('#') {
        return parse_hex(hex);
    }

    let lower = spec.to_ascii_lowercase();
    if let Some(args) = lower
        .strip_prefix("rgb(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_rgb_function(args);
    }

    palette::named::from_str(&lower).map(|c| (c.red, c.green, c.blue))
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    // Alpha digits are accepted but dropped.
    let rgb = match hex.len() {
        3 | 6 => hex,
        8 => &hex[..6],
        _ => return None,
    };

    let color: Srgb<u8> = rgb.parse().ok()?;
    Some((color.red, color.green, color.blue))
}

fn parse_rgb_function(args: &str) -> Option<(u8, u8, u8)> {
    let channels: Vec<u8> = args
        .split(',')
        .map(|part| part.trim().parse::<u8>().ok())
        .collect::<Option<_>>()?;

    match channels.as_slice() {
        [r, g, b] => Some((*r, *g, *b)),
        _ => None,
    }
}
