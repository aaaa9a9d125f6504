use crate::error::DateError;
use crate::exiftool::Metadata;
use chrono::NaiveDateTime;

/// Date tags in order of preference. The first one present wins.
pub const DATE_FIELDS: [&str; 5] = [
    "EXIF:DateTimeOriginal",
    "EXIF:CreateDate",
    "XMP:CreateDate",
    "XMP:DateCreated",
    "QuickTime:CreateDate",
];

const TIMESTAMP_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDate {
    pub field: &'static str,
    pub datetime: NaiveDateTime,
}

pub fn resolve_date(metadata: &Metadata) -> Result<ResolvedDate, DateError> {
    let (field, value) = DATE_FIELDS
        .iter()
        .find_map(|field| metadata.get(*field).map(|value| (*field, value)))
        .ok_or(DateError::NotFound)?;

    let Some(text) = value.as_str() else {
        return Err(DateError::Invalid {
            field,
            value: value.to_string(),
        });
    };
    log::debug!("Field {} found. Value: {}", field, text);

    let datetime = parse_timestamp(text).ok_or_else(|| DateError::Invalid {
        field,
        value: text.to_string(),
    })?;

    Ok(ResolvedDate { field, datetime })
}

/// Parses "YYYY:MM:DD HH:MM:SS", ignoring fractional seconds and a timezone
/// suffix if present.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let (datetime, rest) = NaiveDateTime::parse_and_remainder(value.trim(), TIMESTAMP_FORMAT).ok()?;
    let rest = match rest.strip_prefix('.') {
        Some(fraction) => fraction.trim_start_matches(|c: char| c.is_ascii_digit()),
        None => rest,
    };
    if rest.is_empty() || rest == "Z" || is_utc_offset(rest) {
        Some(datetime)
    } else {
        None
    }
}

/// Matches "+hh:mm" / "-hh:mm".
fn is_utc_offset(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 6
        && matches!(bytes[0], b'+' | b'-')
        && bytes[3] == b':'
        && [1, 2, 4, 5].iter().all(|&i| bytes[i].is_ascii_digit())
}
