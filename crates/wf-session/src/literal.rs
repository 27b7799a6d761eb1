//! Textual coordinate literals, e.g. `-122.1280000, 37.3613000`.
//!
//! Used by outer layers that persist a bare start or destination point as a
//! short string and need to read it back.

use wf_core::{Coordinate, WfError, WfResult};

/// Parse `lon, lat` with optional surrounding brackets.
///
/// Both components are plain decimals with an optional leading `-`
/// (no exponents, no `inf`/`NaN`).  Whitespace around either component is
/// ignored.
///
/// # Errors
///
/// [`WfError::Parse`] for malformed text, [`WfError::InvalidCoordinate`] for
/// a well-formed literal outside WGS-84 ranges.
pub fn parse_coordinate_literal(text: &str) -> WfResult<Coordinate> {
    let trimmed = text.trim();
    let body = match (trimmed.strip_prefix('['), trimmed.ends_with(']')) {
        (Some(rest), true) => &rest[..rest.len() - 1],
        (None, false) => trimmed,
        _ => return Err(WfError::Parse(format!("unbalanced brackets in {text:?}"))),
    };

    let (lon, lat) = body
        .split_once(',')
        .ok_or_else(|| WfError::Parse(format!("expected \"lon, lat\", got {text:?}")))?;

    let coord = Coordinate::new(decimal(lon.trim(), text)?, decimal(lat.trim(), text)?);
    if !coord.is_valid() {
        return Err(WfError::InvalidCoordinate(format!("{text:?} is out of range")));
    }
    Ok(coord)
}

/// Format as `lon, lat` with 7 decimals, the inverse of
/// [`parse_coordinate_literal`].
pub fn format_coordinate_literal(coord: Coordinate) -> String {
    format!("{:.7}, {:.7}", coord.lon, coord.lat)
}

fn decimal(part: &str, whole: &str) -> WfResult<f64> {
    let digits = part.strip_prefix('-').unwrap_or(part);
    let (int, frac) = digits.split_once('.').unwrap_or((digits, ""));
    let well_formed = !int.is_empty()
        && int.bytes().all(|b| b.is_ascii_digit())
        && frac.bytes().all(|b| b.is_ascii_digit());
    if !well_formed {
        return Err(WfError::Parse(format!("bad number {part:?} in {whole:?}")));
    }
    part.parse()
        .map_err(|_| WfError::Parse(format!("bad number {part:?} in {whole:?}")))
}
