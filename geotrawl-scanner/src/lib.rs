#[cfg(feature = "chrome")]
pub mod chrome;
pub mod error;
pub mod exif;
pub mod http;
pub mod ports;

#[cfg(feature = "chrome")]
pub use chrome::ChromeRenderer;
pub use error::ScanError;
pub use exif::ExifToolReader;
pub use http::{HttpDownloader, HttpRenderer};
pub use ports::{Downloader, MetadataReader, PageRenderer};
