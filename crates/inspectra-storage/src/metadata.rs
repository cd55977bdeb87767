//! Capture metadata extraction from ingested image bytes.
//!
//! Extraction is best effort: bytes without EXIF data (or without any
//! parsable container at all) yield an empty result instead of failing
//! the upload.

use std::io::Cursor;

use exif::{In, Reader, Tag, Value};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// EXIF-derived capture details attached to inference uploads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps_latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps_longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl CaptureMetadata {
    pub fn is_empty(&self) -> bool {
        *self == CaptureMetadata::default()
    }

    /// JSON form for the image record, `None` when nothing was found.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        if self.is_empty() {
            return None;
        }
        serde_json::to_value(self).ok()
    }
}

fn ascii_str(value: &Value) -> Option<String> {
    let parts = match value {
        Value::Ascii(parts) => parts,
        _ => return None,
    };
    parts
        .first()
        .map(|bytes| {
            String::from_utf8_lossy(bytes)
                .trim_matches('\0')
                .trim()
                .to_string()
        })
        .filter(|s| !s.is_empty())
}

/// Degrees/minutes/seconds rational triple to signed decimal degrees.
fn gps_decimal(value: &Value, reference: Option<&str>) -> Option<f64> {
    let rationals = match value {
        Value::Rational(r) if r.len() >= 3 => r,
        _ => return None,
    };
    let degrees =
        rationals[0].to_f64() + rationals[1].to_f64() / 60.0 + rationals[2].to_f64() / 3600.0;
    match reference {
        Some("S") | Some("W") => Some(-degrees),
        _ => Some(degrees),
    }
}

/// Pull capture metadata out of raw image bytes, empty on any failure.
pub fn extract_capture_metadata(bytes: &[u8]) -> CaptureMetadata {
    let exif = match Reader::new().read_from_container(&mut Cursor::new(bytes)) {
        Ok(exif) => exif,
        Err(err) => {
            warn!(error = %err, "EXIF parse failed, storing empty capture metadata");
            return CaptureMetadata::default();
        }
    };

    let field_str = |tag: Tag| {
        exif.get_field(tag, In::PRIMARY)
            .and_then(|f| ascii_str(&f.value))
    };
    let field_uint = |tag: Tag| {
        exif.get_field(tag, In::PRIMARY)
            .and_then(|f| f.value.get_uint(0))
    };

    let captured_at = exif
        .get_field(Tag::DateTimeOriginal, In::PRIMARY)
        .map(|f| f.display_value().to_string());

    let gps_latitude = exif.get_field(Tag::GPSLatitude, In::PRIMARY).and_then(|f| {
        gps_decimal(&f.value, field_str(Tag::GPSLatitudeRef).as_deref())
    });
    let gps_longitude = exif
        .get_field(Tag::GPSLongitude, In::PRIMARY)
        .and_then(|f| gps_decimal(&f.value, field_str(Tag::GPSLongitudeRef).as_deref()));

    CaptureMetadata {
        captured_at,
        camera_make: field_str(Tag::Make),
        camera_model: field_str(Tag::Model),
        gps_latitude,
        gps_longitude,
        width: field_uint(Tag::PixelXDimension),
        height: field_uint(Tag::PixelYDimension),
    }
}
