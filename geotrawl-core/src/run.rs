use crate::error::Result;
use crate::pipeline::{HostOutcome, Pipeline, PipelineConfig, PipelineProgressCallback};
#[cfg(feature = "chrome")]
use geotrawl_scanner::ChromeRenderer;
use geotrawl_scanner::{ExifToolReader, HttpDownloader, HttpRenderer, PageRenderer};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;

/// How pages are turned into markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RendererKind {
    /// Plain GET, no script execution.
    #[default]
    Http,
    /// Headless Chrome; needs the `chrome` feature.
    Chrome,
}

impl RendererKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RendererKind::Http => "http",
            RendererKind::Chrome => "chrome",
        }
    }
}

/// Options for configuring a run
pub struct RunOptions {
    pub hosts: Vec<String>,
    pub store_path: PathBuf,
    pub image_root: PathBuf,
    pub timeout_secs: u64,
    pub exiftool: String,
    pub renderer: RendererKind,
    pub show_progress_bars: bool,
}

/// Run the pipeline over `options.hosts` with the selected renderer, the HTTP
/// downloader and exiftool.
pub async fn execute_run(
    options: RunOptions,
    progress_callback: Option<PipelineProgressCallback>,
) -> Result<Vec<HostOutcome>> {
    let RunOptions {
        hosts,
        store_path,
        image_root,
        timeout_secs,
        exiftool,
        renderer,
        show_progress_bars,
    } = options;

    let config = PipelineConfig {
        store_path,
        image_root,
        ..PipelineConfig::default()
    };

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message("Starting run...");
        Some(Arc::new(pb))
    } else {
        None
    };

    // Progress goes to the spinner when there is one, otherwise to the caller
    let internal_callback: Option<PipelineProgressCallback> = match (&progress_bar, progress_callback) {
        (Some(pb), _) => {
            let pb = pb.clone();
            let callback: PipelineProgressCallback = Arc::new(move |msg: String| {
                pb.set_message(msg);
                pb.tick();
            });
            Some(callback)
        }
        (None, callback) => callback,
    };

    let downloader = HttpDownloader::with_timeout(timeout_secs)?;
    let reader = ExifToolReader::with_program(exiftool);

    let outcomes = match renderer {
        RendererKind::Http => {
            let renderer = HttpRenderer::with_timeout(timeout_secs)?;
            drive(renderer, downloader, reader, config, internal_callback, &hosts).await
        }
        #[cfg(feature = "chrome")]
        RendererKind::Chrome => {
            if let Some(ref pb) = progress_bar {
                pb.set_message("Launching headless Chrome...");
            }
            let renderer = ChromeRenderer::launch_with_timeout(timeout_secs).await?;
            drive(renderer, downloader, reader, config, internal_callback, &hosts).await
        }
        #[cfg(not(feature = "chrome"))]
        RendererKind::Chrome => {
            if let Some(ref pb) = progress_bar {
                pb.finish_and_clear();
            }
            return Err(crate::error::PipelineError::RendererUnavailable(
                "this build has no `chrome` feature".to_string(),
            ));
        }
    };

    if let Some(ref pb) = progress_bar {
        pb.finish_with_message(format!("Run complete! {} host(s) processed", outcomes.len()));
    }

    Ok(outcomes)
}

async fn drive<R: PageRenderer>(
    renderer: R,
    downloader: HttpDownloader,
    reader: ExifToolReader,
    config: PipelineConfig,
    callback: Option<PipelineProgressCallback>,
    hosts: &[String],
) -> Vec<HostOutcome> {
    let mut pipeline = Pipeline::new(renderer, downloader, reader, config);
    if let Some(callback) = callback {
        pipeline = pipeline.with_progress_callback(callback);
    }
    pipeline.run(hosts).await
}

/// Generate a run report from host outcomes
pub fn generate_run_report(outcomes: &[HostOutcome]) -> String {
    let summaries: Vec<_> = outcomes
        .iter()
        .filter_map(|o| match o {
            HostOutcome::Processed(summary) => Some(summary),
            _ => None,
        })
        .collect();

    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Hosts processed: {}/{}\n", summaries.len(), outcomes.len()));

    let total_images: usize = summaries.iter().map(|s| s.classified.images().count()).sum();
    report.push_str(&format!("  Images found: {}\n", total_images));

    let total_downloaded: usize = summaries.iter().map(|s| s.downloaded.len()).sum();
    report.push_str(&format!("  Images downloaded: {}\n", total_downloaded));

    let total_stored: usize = summaries.iter().map(|s| s.persisted).sum();
    report.push_str(&format!("  Records stored: {}\n", total_stored));

    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    for outcome in outcomes {
        report.push_str(&format!("## {}\n", outcome.host()));
        match outcome {
            HostOutcome::Processed(summary) => {
                let classified = &summary.classified;
                report.push_str(&format!(
                    "  pages: {} external, {} local\n",
                    classified.external_pages.len(),
                    classified.local_pages.len()
                ));
                report.push_str(&format!(
                    "  images: {} external, {} local\n",
                    classified.external_images.len(),
                    classified.local_images.len()
                ));
                report.push_str(&format!("  files: {}\n", classified.local_files.len()));
                report.push_str(&format!(
                    "  downloaded: {} ({} failed)\n",
                    summary.downloaded.len(),
                    summary.download_failures
                ));
                report.push_str(&format!("  records stored: {}\n", summary.persisted));
                for record in &summary.records {
                    if let Some(link) = record.map_link.url() {
                        report.push_str(&format!("    \x1b[32m{}\x1b[0m\n", link));
                    }
                }
            }
            HostOutcome::Skipped { reason, .. } => {
                report.push_str(&format!("  \x1b[33mskipped\x1b[0m: {}\n", reason));
            }
            HostOutcome::Failed { reason, .. } => {
                report.push_str(&format!("  \x1b[31mfailed\x1b[0m: {}\n", reason));
            }
        }
        report.push('\n');
    }

    report
}
