//! Capabilities the pipeline needs from the outside world.
//!
//! Each trait is a single blocking-from-the-caller's-view operation: the
//! pipeline awaits it and gets either a value or a [`ScanError`].

use crate::error::Result;
use std::future::Future;
use std::path::Path;

/// Turns a URL into page markup.
pub trait PageRenderer {
    fn render(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Writes the body behind `url` to `dest`.
pub trait Downloader {
    fn download(&self, url: &str, dest: &Path) -> impl Future<Output = Result<()>> + Send;
}

/// Returns the raw tag dump for an image file.
pub trait MetadataReader {
    fn read_tags(&self, path: &Path) -> impl Future<Output = Result<String>> + Send;
}
