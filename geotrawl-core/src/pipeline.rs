use crate::classify::classify_candidates;
use crate::error::{PipelineError, Result};
use crate::extract::extract_candidates;
use crate::gps::decode_gps_tags;
use crate::model::{ClassifiedUrls, DownloadedImage, GpsRecord};
use crate::store::{DEFAULT_STORE_PATH, RecordStore};
use geotrawl_scanner::{Downloader, MetadataReader, PageRenderer};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const DEFAULT_IMAGE_ROOT: &str = "localImage";
pub const DEFAULT_IMAGE_DIR_PREFIX: &str = "localImage";

/// Where a run keeps its files.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub store_path: PathBuf,
    pub image_root: PathBuf,
    pub image_dir_prefix: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            image_root: PathBuf::from(DEFAULT_IMAGE_ROOT),
            image_dir_prefix: DEFAULT_IMAGE_DIR_PREFIX.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Directory for the host processed with run index `index`.
    pub fn image_dir(&self, index: usize) -> PathBuf {
        self.image_root
            .join(format!("{}{}", self.image_dir_prefix, index))
    }
}

/// Callback for reporting pipeline progress
pub type PipelineProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// What happened to one host whose page rendered.
#[derive(Debug, Clone)]
pub struct HostSummary {
    pub host: String,
    pub index: usize,
    pub candidates: usize,
    pub classified: ClassifiedUrls,
    pub downloaded: Vec<DownloadedImage>,
    pub download_failures: usize,
    pub metadata_failures: usize,
    /// Every decoded record, absent ones included.
    pub records: Vec<GpsRecord>,
    pub persisted: usize,
}

#[derive(Debug, Clone)]
pub enum HostOutcome {
    Processed(HostSummary),
    /// The page could not be rendered; nothing else was attempted.
    Skipped { host: String, reason: String },
    /// The page rendered but the image directory or the store could not be
    /// written.
    Failed { host: String, reason: String },
}

impl HostOutcome {
    pub fn host(&self) -> &str {
        match self {
            HostOutcome::Processed(summary) => &summary.host,
            HostOutcome::Skipped { host, .. } | HostOutcome::Failed { host, .. } => host,
        }
    }
}

/// File name an image is saved under: the last path segment of its URL.
pub fn image_file_name(url: &str) -> &str {
    match url.rsplit('/').next() {
        Some(name) if !name.is_empty() => name,
        _ => "image",
    }
}

/// `dir/name`, or `dir/<stem>-<n>.<ext>` with the smallest `n` not already
/// in `taken`.
pub fn unique_path(dir: &Path, name: &str, taken: &HashSet<PathBuf>) -> PathBuf {
    let candidate = dir.join(name);
    if !taken.contains(&candidate) {
        return candidate;
    }

    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };
    (1..)
        .map(|n| match ext {
            Some(ext) => dir.join(format!("{}-{}.{}", stem, n, ext)),
            None => dir.join(format!("{}-{}", stem, n)),
        })
        .find(|path| !taken.contains(path))
        .unwrap_or(candidate)
}

/// Sequential extract, classify, download, decode and store pipeline.
pub struct Pipeline<R, D, M> {
    renderer: R,
    downloader: D,
    reader: M,
    config: PipelineConfig,
    store: RecordStore,
    progress_callback: Option<PipelineProgressCallback>,
}

impl<R, D, M> Pipeline<R, D, M>
where
    R: PageRenderer,
    D: Downloader,
    M: MetadataReader,
{
    pub fn new(renderer: R, downloader: D, reader: M, config: PipelineConfig) -> Self {
        let store = RecordStore::new(config.store_path.clone());
        Self {
            renderer,
            downloader,
            reader,
            config,
            store,
            progress_callback: None,
        }
    }

    pub fn with_progress_callback(mut self, callback: PipelineProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    fn report(&self, msg: String) {
        if let Some(ref callback) = self.progress_callback {
            callback(msg);
        }
    }

    /// Render `host` over https, falling back to http.
    pub async fn render_host(&self, host: &str) -> Result<String> {
        let secure = format!("https://{}", host);
        match self.renderer.render(&secure).await {
            Ok(html) => return Ok(html),
            Err(e) => warn!("Rendering {} failed: {}", secure, e),
        }

        let plain = format!("http://{}", host);
        match self.renderer.render(&plain).await {
            Ok(html) => Ok(html),
            Err(e) => {
                warn!("Rendering {} failed: {}", plain, e);
                Err(PipelineError::RenderError {
                    host: host.to_string(),
                })
            }
        }
    }

    /// Download every image bucket entry into `dir`, one at a time.
    /// Returns the successful downloads and the number of failures.
    ///
    /// A URL listed more than once is fetched once. URLs that share a file
    /// name get distinct paths, so each downloaded file belongs to exactly
    /// one source URL.
    pub async fn download_images(
        &self,
        classified: &ClassifiedUrls,
        index: usize,
        dir: &Path,
    ) -> (Vec<DownloadedImage>, usize) {
        let mut downloaded = Vec::new();
        let mut failures = 0;
        let mut seen: HashSet<&str> = HashSet::new();
        let mut taken: HashSet<PathBuf> = HashSet::new();

        for image in classified.images() {
            if !seen.insert(image.value.as_str()) {
                debug!("Already fetched {}", image.value);
                continue;
            }

            let local_path = unique_path(dir, image_file_name(&image.value), &taken);
            self.report(format!("Downloading {}", image.value));
            match self.downloader.download(&image.value, &local_path).await {
                Ok(()) => {
                    taken.insert(local_path.clone());
                    downloaded.push(DownloadedImage {
                        source_url: image.value.clone(),
                        local_path,
                        host_index: index,
                    });
                }
                Err(e) => {
                    warn!("Failed to download image from {}: {}", image.value, e);
                    failures += 1;
                }
            }
        }

        (downloaded, failures)
    }

    /// Read and decode the tags of each downloaded file, once per path.
    /// Returns the decoded records and the number of unreadable files.
    pub async fn decode_images(
        &self,
        images: &[DownloadedImage],
        host: &str,
    ) -> (Vec<GpsRecord>, usize) {
        let mut records = Vec::with_capacity(images.len());
        let mut failures = 0;
        let mut decoded: HashSet<&Path> = HashSet::new();

        for image in images {
            if !decoded.insert(image.local_path.as_path()) {
                continue;
            }
            match self.reader.read_tags(&image.local_path).await {
                Ok(raw) => {
                    let record = decode_gps_tags(&raw, host);
                    debug!(
                        "{} -> {}",
                        image.local_path.display(),
                        record.map_link.as_str()
                    );
                    records.push(record);
                }
                Err(e) => {
                    warn!(
                        "Failed to process file {}: {}",
                        image.local_path.display(),
                        e
                    );
                    failures += 1;
                }
            }
        }

        (records, failures)
    }

    /// Everything after rendering, for a page that has already been fetched.
    pub async fn process_page(&self, host: &str, index: usize, html: &str) -> Result<HostSummary> {
        let candidates = extract_candidates(html);
        let classified = classify_candidates(&candidates, host);
        debug!(
            "{}: {} candidate(s), {} classified",
            host,
            candidates.len(),
            classified.len()
        );

        let dir = self.config.image_dir(index);
        tokio::fs::create_dir_all(&dir).await?;

        let (downloaded, download_failures) =
            self.download_images(&classified, index, &dir).await;
        info!(
            "{}: downloaded {} image(s) into {}",
            host,
            downloaded.len(),
            dir.display()
        );

        let (records, metadata_failures) = self.decode_images(&downloaded, host).await;
        let persisted = self.store.append(&records)?;

        Ok(HostSummary {
            host: host.to_string(),
            index,
            candidates: candidates.len(),
            classified,
            downloaded,
            download_failures,
            metadata_failures,
            records,
            persisted,
        })
    }

    pub async fn process_host(&self, host: &str, index: usize) -> Result<HostSummary> {
        let html = self.render_host(host).await?;
        self.process_page(host, index, &html).await
    }

    /// Process `hosts` in order. Failures are logged and recorded per host;
    /// the run itself always completes.
    ///
    /// The image directory index only advances for hosts whose page rendered.
    pub async fn run<S: AsRef<str>>(&self, hosts: &[S]) -> Vec<HostOutcome> {
        let mut outcomes = Vec::with_capacity(hosts.len());
        let mut index = 0;

        for (position, host) in hosts.iter().enumerate() {
            let host = host.as_ref();
            self.report(format!(
                "Processing host {}/{}: {}",
                position + 1,
                hosts.len(),
                host
            ));

            match self.process_host(host, index).await {
                Ok(summary) => {
                    info!(
                        "{}: {} record(s) stored out of {} decoded",
                        host,
                        summary.persisted,
                        summary.records.len()
                    );
                    outcomes.push(HostOutcome::Processed(summary));
                    index += 1;
                }
                Err(e @ PipelineError::RenderError { .. }) => {
                    warn!("No HTML content found for {}: {}", host, e);
                    outcomes.push(HostOutcome::Skipped {
                        host: host.to_string(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    error!("Processing {} failed: {}", host, e);
                    outcomes.push(HostOutcome::Failed {
                        host: host.to_string(),
                        reason: e.to_string(),
                    });
                    index += 1;
                }
            }
        }

        outcomes
    }
}
