//! Decoding of exiftool GPS tag dumps into [`GpsRecord`]s.

use crate::model::{Coordinate, GpsRecord, MapLink};
use regex::Regex;
use std::sync::LazyLock;

static LATITUDE: LazyLock<Regex> = LazyLock::new(|| field_pattern("GPS Latitude"));
static LONGITUDE: LazyLock<Regex> = LazyLock::new(|| field_pattern("GPS Longitude"));
static LATITUDE_REF: LazyLock<Regex> = LazyLock::new(|| field_pattern("GPS Latitude Ref"));
static LONGITUDE_REF: LazyLock<Regex> = LazyLock::new(|| field_pattern("GPS Longitude Ref"));

// 40 deg 26' 46.00" N
static DMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\d+)\s*deg\s*(\d+)'?\s*(\d+\.?\d*)"?\s*([NSEW])"#).unwrap()
});

// `GPS Latitude` must not match the `GPS Latitude Ref` line, so the label is
// followed directly by padding and the colon.
fn field_pattern(label: &str) -> Regex {
    Regex::new(&format!(r"{}[ \t]+:[ \t]+([^\r\n]+)", regex::escape(label))).unwrap()
}

fn field(pattern: &Regex, raw: &str) -> Option<String> {
    pattern
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Convert `<deg> deg <min>' <sec>" <hemisphere>` to signed decimal degrees.
///
/// Southern and western hemispheres are negative. Text that does not match
/// yields [`Coordinate::ConversionFailed`].
pub fn dms_to_decimal(dms: &str) -> Coordinate {
    let Some(caps) = DMS.captures(dms) else {
        return Coordinate::ConversionFailed;
    };

    let parts = (
        caps[1].parse::<f64>(),
        caps[2].parse::<f64>(),
        caps[3].parse::<f64>(),
    );
    let (Ok(degrees), Ok(minutes), Ok(seconds)) = parts else {
        return Coordinate::ConversionFailed;
    };

    let decimal = degrees + minutes / 60.0 + seconds / 3600.0;
    match &caps[4] {
        // the equator and the prime meridian stay 0, never -0
        "S" | "W" if decimal != 0.0 => Coordinate::Decimal(-decimal),
        _ => Coordinate::Decimal(decimal),
    }
}

/// Build the record for one image from the reader's raw output.
///
/// All four labelled fields must be present, otherwise the absent record is
/// returned. Once they are, the record always carries `host`, even when a
/// coordinate fails to convert.
pub fn decode_gps_tags(raw: &str, host: &str) -> GpsRecord {
    let fields = (
        field(&LATITUDE, raw),
        field(&LONGITUDE, raw),
        field(&LATITUDE_REF, raw),
        field(&LONGITUDE_REF, raw),
    );
    let (Some(raw_latitude), Some(raw_longitude), Some(raw_latitude_ref), Some(raw_longitude_ref)) =
        fields
    else {
        return GpsRecord::absent();
    };

    let latitude = dms_to_decimal(&raw_latitude);
    let longitude = dms_to_decimal(&raw_longitude);

    let map_link = match (latitude, longitude) {
        (Coordinate::Decimal(lat), Coordinate::Decimal(lon)) => MapLink::for_coordinates(lat, lon),
        _ => MapLink::NoValidCoordinates,
    };

    GpsRecord {
        raw_latitude: Some(raw_latitude),
        raw_longitude: Some(raw_longitude),
        raw_latitude_ref: Some(raw_latitude_ref),
        raw_longitude_ref: Some(raw_longitude_ref),
        latitude: Some(latitude),
        longitude: Some(longitude),
        map_link,
        host: Some(host.to_string()),
    }
}
