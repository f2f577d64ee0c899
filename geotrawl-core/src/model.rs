use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::PathBuf;

pub const NO_METADATA_FOUND: &str = "No metadata found";
pub const NO_VALID_COORDINATES: &str = "No valid coordinates available";
pub const CONVERSION_FAILED: &str = "Conversion failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlKind {
    ExternalPage,
    ExternalImage,
    LocalPage,
    LocalImage,
    LocalFile,
}

impl UrlKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrlKind::ExternalPage => "external_page",
            UrlKind::ExternalImage => "external_image",
            UrlKind::LocalPage => "local_page",
            UrlKind::LocalImage => "local_image",
            UrlKind::LocalFile => "local_file",
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, UrlKind::ExternalImage | UrlKind::LocalImage)
    }
}

/// A candidate that survived classification.
///
/// `resolved` is true when the value was rewritten against the host; external
/// URLs are absolute already and keep it false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedUrl {
    pub value: String,
    pub kind: UrlKind,
    pub resolved: bool,
}

/// Classification output for one page, one bucket per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedUrls {
    pub external_pages: Vec<ClassifiedUrl>,
    pub external_images: Vec<ClassifiedUrl>,
    pub local_pages: Vec<ClassifiedUrl>,
    pub local_images: Vec<ClassifiedUrl>,
    pub local_files: Vec<ClassifiedUrl>,
}

impl ClassifiedUrls {
    pub fn push(&mut self, url: ClassifiedUrl) {
        let bucket = match url.kind {
            UrlKind::ExternalPage => &mut self.external_pages,
            UrlKind::ExternalImage => &mut self.external_images,
            UrlKind::LocalPage => &mut self.local_pages,
            UrlKind::LocalImage => &mut self.local_images,
            UrlKind::LocalFile => &mut self.local_files,
        };
        bucket.push(url);
    }

    /// Images in download order: local ones first, then external ones.
    pub fn images(&self) -> impl Iterator<Item = &ClassifiedUrl> {
        self.local_images.iter().chain(self.external_images.iter())
    }

    pub fn len(&self) -> usize {
        self.external_pages.len()
            + self.external_images.len()
            + self.local_pages.len()
            + self.local_images.len()
            + self.local_files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedImage {
    pub source_url: String,
    pub local_path: PathBuf,
    pub host_index: usize,
}

/// One decoded axis. Serialised as a bare number, or as the
/// `"Conversion failed"` marker when the DMS text could not be read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coordinate {
    Decimal(f64),
    ConversionFailed,
}

impl Coordinate {
    pub fn value(&self) -> Option<f64> {
        match self {
            Coordinate::Decimal(v) => Some(*v),
            Coordinate::ConversionFailed => None,
        }
    }
}

impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Coordinate::Decimal(v) => serializer.serialize_f64(*v),
            Coordinate::ConversionFailed => serializer.serialize_str(CONVERSION_FAILED),
        }
    }
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Stored {
            Number(f64),
            Text(serde::de::IgnoredAny),
        }

        Ok(match Stored::deserialize(deserializer)? {
            Stored::Number(v) => Coordinate::Decimal(v),
            Stored::Text(_) => Coordinate::ConversionFailed,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MapLink {
    Url(String),
    /// Tags were present but at least one axis failed to convert.
    NoValidCoordinates,
    /// The image carried no GPS tags at all.
    NoMetadata,
}

impl MapLink {
    pub fn for_coordinates(latitude: f64, longitude: f64) -> Self {
        MapLink::Url(format!(
            "https://www.google.com/maps?q={},{}",
            latitude, longitude
        ))
    }

    pub fn as_str(&self) -> &str {
        match self {
            MapLink::Url(url) => url,
            MapLink::NoValidCoordinates => NO_VALID_COORDINATES,
            MapLink::NoMetadata => NO_METADATA_FOUND,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            MapLink::Url(url) => Some(url),
            _ => None,
        }
    }
}

impl From<String> for MapLink {
    fn from(value: String) -> Self {
        match value.as_str() {
            NO_METADATA_FOUND => MapLink::NoMetadata,
            NO_VALID_COORDINATES => MapLink::NoValidCoordinates,
            _ => MapLink::Url(value),
        }
    }
}

impl From<MapLink> for String {
    fn from(value: MapLink) -> Self {
        match value {
            MapLink::Url(url) => url,
            other => other.as_str().to_string(),
        }
    }
}

/// A geolocation result for one image, in the store's JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpsRecord {
    #[serde(rename = "GPSLatitude", default, skip_serializing_if = "Option::is_none")]
    pub raw_latitude: Option<String>,
    #[serde(rename = "GPSLongitude", default, skip_serializing_if = "Option::is_none")]
    pub raw_longitude: Option<String>,
    #[serde(rename = "GPSLatitudeRef", default, skip_serializing_if = "Option::is_none")]
    pub raw_latitude_ref: Option<String>,
    #[serde(rename = "GPSLongitudeRef", default, skip_serializing_if = "Option::is_none")]
    pub raw_longitude_ref: Option<String>,
    #[serde(rename = "Latitude", default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<Coordinate>,
    #[serde(rename = "Longitude", default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<Coordinate>,
    #[serde(rename = "GoogleMapsLink")]
    pub map_link: MapLink,
    #[serde(rename = "subDomain", default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

impl GpsRecord {
    /// The record produced when an image has no GPS tags.
    pub fn absent() -> Self {
        Self {
            raw_latitude: None,
            raw_longitude: None,
            raw_latitude_ref: None,
            raw_longitude_ref: None,
            latitude: None,
            longitude: None,
            map_link: MapLink::NoMetadata,
            host: None,
        }
    }

    pub fn is_absent(&self) -> bool {
        self.map_link == MapLink::NoMetadata
    }
}
