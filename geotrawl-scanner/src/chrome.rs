//! Headless Chrome page rendering, for pages that build their markup with
//! scripts. Only compiled with the `chrome` feature.

use crate::error::{Result, ScanError};
use crate::http::DEFAULT_TIMEOUT_SECS;
use crate::ports::PageRenderer;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

fn browser_error(e: impl std::fmt::Display) -> ScanError {
    ScanError::BrowserError(e.to_string())
}

/// Renders pages in a headless Chrome and returns the DOM after load.
///
/// One browser process serves every page; each render opens and closes its
/// own tab.
pub struct ChromeRenderer {
    browser: Browser,
    handler: JoinHandle<()>,
    timeout: Duration,
}

impl ChromeRenderer {
    pub async fn launch() -> Result<Self> {
        Self::launch_with_timeout(DEFAULT_TIMEOUT_SECS).await
    }

    pub async fn launch_with_timeout(timeout_secs: u64) -> Result<Self> {
        let config = BrowserConfig::builder().build().map_err(browser_error)?;
        let (browser, mut handler) = Browser::launch(config).await.map_err(browser_error)?;

        // The CDP handler has to be polled for the browser to make progress
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler stopped: {}", e);
                    break;
                }
            }
        });

        Ok(Self {
            browser,
            handler,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    async fn load(&self, url: &str) -> Result<String> {
        let page = self.browser.new_page(url).await.map_err(browser_error)?;

        let content = async {
            page.wait_for_navigation().await?;
            page.content().await
        }
        .await
        .map_err(browser_error);

        if let Err(e) = page.close().await {
            warn!("Failed to close tab for {}: {}", url, e);
        }
        content
    }
}

impl PageRenderer for ChromeRenderer {
    async fn render(&self, url: &str) -> Result<String> {
        debug!("Rendering {} in Chrome", url);
        match tokio::time::timeout(self.timeout, self.load(url)).await {
            Ok(content) => content,
            Err(_) => Err(browser_error(format!(
                "timed out after {}s loading {}",
                self.timeout.as_secs(),
                url
            ))),
        }
    }
}

impl Drop for ChromeRenderer {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
