use serde::{Deserialize, Serialize};

use crate::foundation::{
    core::Rgba8,
    error::{ForgeError, ForgeResult},
};

/// One color stop; `offset` is in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// Position along the gradient axis.
    pub offset: f32,
    /// Stop color.
    pub color: Rgba8,
}

impl ColorStop {
    /// Build a stop, clamping `offset` into range.
    pub fn new(offset: f32, color: Rgba8) -> Self {
        Self {
            offset: offset.clamp(0.0, 1.0),
            color,
        }
    }
}

/// Parse a CSS `linear-gradient(...)` string into color stops.
///
/// The direction argument (`135deg`, `to right`, ...) is accepted and ignored: canvases always
/// run the gradient from the top-left to the bottom-right corner. Colors may be hex, `rgb()` or
/// `rgba()`. Stops without a position are spread evenly between their neighbours.
pub fn parse_css_linear_gradient(css: &str) -> ForgeResult<Vec<ColorStop>> {
    let css = css.trim().trim_end_matches(';').trim();
    let inner = css
        .strip_prefix("linear-gradient(")
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| ForgeError::validation(format!("not a linear-gradient: \"{css}\"")))?;

    let mut raw: Vec<(Rgba8, Option<f32>)> = Vec::new();
    for (idx, arg) in split_top_level(inner).into_iter().enumerate() {
        let arg = arg.trim();
        if idx == 0 && is_direction(arg) {
            continue;
        }
        raw.push(parse_stop(arg)?);
    }

    if raw.len() < 2 {
        return Err(ForgeError::validation(format!(
            "gradient needs at least two color stops: \"{css}\""
        )));
    }
    Ok(resolve_offsets(raw))
}

fn is_direction(arg: &str) -> bool {
    arg.starts_with("to ")
        || ["deg", "rad", "turn", "grad"]
            .iter()
            .any(|unit| arg.ends_with(unit) && !arg.starts_with('#'))
}

fn split_top_level(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                out.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(&s[start..]);
    out
}

fn parse_stop(arg: &str) -> ForgeResult<(Rgba8, Option<f32>)> {
    let (color_part, pos_part) = match arg.rfind(')') {
        Some(close) => (&arg[..=close], arg[close + 1..].trim()),
        None => match arg.split_once(char::is_whitespace) {
            Some((c, p)) => (c, p.trim()),
            None => (arg, ""),
        },
    };

    let color = parse_color(color_part.trim())?;
    let offset = if pos_part.is_empty() {
        None
    } else {
        let pct = pos_part
            .strip_suffix('%')
            .ok_or_else(|| ForgeError::validation(format!("stop position must be a percentage: \"{pos_part}\"")))?;
        let v: f32 = pct
            .trim()
            .parse()
            .map_err(|_| ForgeError::validation(format!("invalid stop position \"{pos_part}\"")))?;
        Some(v / 100.0)
    };
    Ok((color, offset))
}

/// Parse `#hex`, `rgb(r, g, b)` or `rgba(r, g, b, a)`.
pub fn parse_color(s: &str) -> ForgeResult<Rgba8> {
    let s = s.trim();
    if s.starts_with('#') {
        return Rgba8::parse_hex(s);
    }
    let body = s
        .strip_prefix("rgba(")
        .or_else(|| s.strip_prefix("rgb("))
        .and_then(|b| b.strip_suffix(')'))
        .ok_or_else(|| ForgeError::validation(format!("unsupported color \"{s}\"")))?;

    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    let channel = |p: &str| -> ForgeResult<u8> {
        p.parse::<f32>()
            .map(|v| v.clamp(0.0, 255.0).round() as u8)
            .map_err(|_| ForgeError::validation(format!("invalid color channel \"{p}\"")))
    };
    match parts.as_slice() {
        [r, g, b] => Ok(Rgba8::new(channel(r)?, channel(g)?, channel(b)?, 255)),
        [r, g, b, a] => {
            let a: f32 = a
                .parse()
                .map_err(|_| ForgeError::validation(format!("invalid alpha \"{a}\"")))?;
            Ok(Rgba8::new(
                channel(r)?,
                channel(g)?,
                channel(b)?,
                crate::foundation::core::alpha_to_u8(a),
            ))
        }
        _ => Err(ForgeError::validation(format!("unsupported color \"{s}\""))),
    }
}

fn resolve_offsets(raw: Vec<(Rgba8, Option<f32>)>) -> Vec<ColorStop> {
    let n = raw.len();
    let mut offsets: Vec<Option<f32>> = raw.iter().map(|(_, o)| *o).collect();
    if offsets[0].is_none() {
        offsets[0] = Some(0.0);
    }
    if offsets[n - 1].is_none() {
        offsets[n - 1] = Some(1.0);
    }

    let mut i = 0;
    while i < n {
        if offsets[i].is_some() {
            i += 1;
            continue;
        }
        let prev = i - 1;
        let mut next = i;
        while offsets[next].is_none() {
            next += 1;
        }
        let (a, b) = (offsets[prev].unwrap_or(0.0), offsets[next].unwrap_or(1.0));
        let span = (next - prev) as f32;
        for (k, slot) in offsets.iter_mut().enumerate().take(next).skip(i) {
            *slot = Some(a + (b - a) * ((k - prev) as f32 / span));
        }
        i = next;
    }

    // Positions never go backwards.
    let mut last = 0.0f32;
    raw.into_iter()
        .zip(offsets)
        .map(|((color, _), off)| {
            let off = off.unwrap_or(last).max(last);
            last = off;
            ColorStop::new(off, color)
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/compose/gradient.rs"]
mod tests;
