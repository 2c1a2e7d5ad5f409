//! Extract the segment naming scheme from an MPD document.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use super::duration::parse_iso8601_duration;
use super::{ManifestInfo, NUMBER_PLACEHOLDER};
use crate::error::FootageError;
use crate::model::TrackKind;

/// Attributes of one `SegmentTemplate` element and the kind of the
/// `AdaptationSet` it was found in.
#[derive(Debug, Default)]
struct Candidate {
    kind: Option<TrackKind>,
    initialization: Option<String>,
    media: Option<String>,
    start_number: Option<String>,
}

/// Parses the first `SegmentTemplate` in the document.
pub fn parse(body: &str) -> Result<ManifestInfo, FootageError> {
    let (candidates, duration) = scan(body)?;
    let first = candidates.into_iter().next().ok_or_else(missing_template)?;
    build(first, duration)
}

/// Parses the `SegmentTemplate` belonging to the adaptation set for `kind`,
/// falling back to the first template when no set declares a content type.
pub fn parse_for_track(body: &str, kind: TrackKind) -> Result<ManifestInfo, FootageError> {
    let (candidates, duration) = scan(body)?;
    let idx = candidates
        .iter()
        .position(|c| c.kind == Some(kind))
        .or_else(|| candidates.iter().position(|c| c.kind.is_none()))
        .or(if candidates.is_empty() { None } else { Some(0) })
        .ok_or_else(missing_template)?;
    let chosen = candidates.into_iter().nth(idx).ok_or_else(missing_template)?;
    build(chosen, duration)
}

fn missing_template() -> FootageError {
    FootageError::ManifestParse("no SegmentTemplate element".to_string())
}

fn xml_error(e: impl std::fmt::Display) -> FootageError {
    FootageError::ManifestParse(format!("malformed XML: {}", e))
}

fn scan(body: &str) -> Result<(Vec<Candidate>, Option<f64>), FootageError> {
    if body.trim().is_empty() {
        return Err(FootageError::ManifestParse("empty manifest body".to_string()));
    }

    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut candidates = Vec::new();
    let mut duration = None;
    let mut current_kind: Option<TrackKind> = None;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"MPD" => duration = presentation_duration(&e)?,
                b"AdaptationSet" => current_kind = adaptation_kind(&e)?,
                b"SegmentTemplate" => candidates.push(segment_template(&e, current_kind)?),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"MPD" => duration = presentation_duration(&e)?,
                b"SegmentTemplate" => candidates.push(segment_template(&e, current_kind)?),
                _ => {}
            },
            Event::End(e) => {
                if e.local_name().as_ref() == b"AdaptationSet" {
                    current_kind = None;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok((candidates, duration))
}

fn attr_value(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, FootageError> {
    for attr in e.attributes() {
        let attr = attr.map_err(xml_error)?;
        if attr.key.local_name().as_ref() == name {
            let value = attr.unescape_value().map_err(xml_error)?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn presentation_duration(e: &BytesStart<'_>) -> Result<Option<f64>, FootageError> {
    // An unparseable duration only disables the short-manifest check.
    Ok(attr_value(e, b"mediaPresentationDuration")?
        .as_deref()
        .and_then(parse_iso8601_duration))
}

fn adaptation_kind(e: &BytesStart<'_>) -> Result<Option<TrackKind>, FootageError> {
    let declared = match attr_value(e, b"contentType")? {
        Some(ct) => Some(ct),
        None => attr_value(e, b"mimeType")?,
    };
    Ok(declared.and_then(|v| {
        if v.starts_with("video") {
            Some(TrackKind::Video)
        } else if v.starts_with("audio") {
            Some(TrackKind::Audio)
        } else {
            None
        }
    }))
}

fn segment_template(e: &BytesStart<'_>, kind: Option<TrackKind>) -> Result<Candidate, FootageError> {
    Ok(Candidate {
        kind,
        initialization: attr_value(e, b"initialization")?,
        media: attr_value(e, b"media")?,
        start_number: attr_value(e, b"startNumber")?,
    })
}

fn build(c: Candidate, duration: Option<f64>) -> Result<ManifestInfo, FootageError> {
    let init_segment_name = c
        .initialization
        .filter(|s| !s.is_empty())
        .ok_or_else(|| FootageError::ManifestParse("SegmentTemplate has no initialization".to_string()))?;
    let segment_name_pattern = c
        .media
        .ok_or_else(|| FootageError::ManifestParse("SegmentTemplate has no media pattern".to_string()))?;
    if segment_name_pattern.matches(NUMBER_PLACEHOLDER).count() != 1 {
        return Err(FootageError::ManifestParse(format!(
            "media pattern {:?} must contain exactly one {}",
            segment_name_pattern, NUMBER_PLACEHOLDER
        )));
    }
    let raw_start = c
        .start_number
        .ok_or_else(|| FootageError::ManifestParse("SegmentTemplate has no startNumber".to_string()))?;
    let start_index = raw_start.trim().parse::<u64>().map_err(|_| {
        FootageError::ManifestParse(format!("startNumber {:?} is not a non-negative integer", raw_start))
    })?;

    Ok(ManifestInfo {
        init_segment_name,
        segment_name_pattern,
        start_index,
        presentation_duration_secs: duration,
    })
}
