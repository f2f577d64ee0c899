use crate::error::{Result, ScanError};
use crate::ports::{Downloader, PageRenderer};
use futures::StreamExt;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use url::Url;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn build_client(timeout_secs: u64) -> Result<Client> {
    let client = Client::builder()
        .user_agent("Geotrawl/0.1 (https://github.com/trapdoorsec/geotrawl)")
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()?;
    Ok(client)
}

/// Parse `raw` as a URL, assuming `https` when it carries no scheme.
///
/// Host-relative candidates are normalised to `host/path` without a scheme,
/// so the downloader has to pick one before the request can be made.
pub fn with_scheme(raw: &str) -> Result<Url> {
    let candidate = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };
    Url::parse(&candidate).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", raw, e)))
}

/// Fetches page markup with a plain GET. No script execution happens here.
#[derive(Clone)]
pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout_secs)?,
        })
    }
}

impl PageRenderer for HttpRenderer {
    async fn render(&self, url: &str) -> Result<String> {
        debug!("Rendering {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::StatusError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

/// Streams response bodies straight to disk.
#[derive(Clone)]
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout_secs)?,
        })
    }
}

impl Downloader for HttpDownloader {
    async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let target = with_scheme(url)?;
        debug!("Downloading {} to {}", target, dest.display());

        let response = self.client.get(target.as_str()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::StatusError {
                url: target.to_string(),
                status: status.as_u16(),
            });
        }

        let mut file = File::create(dest).await?;
        let mut body = response.bytes_stream();
        let written = async {
            while let Some(chunk) = body.next().await {
                file.write_all(&chunk?).await?;
            }
            file.flush().await?;
            Ok::<(), ScanError>(())
        }
        .await;

        if written.is_err() {
            drop(file);
            let _ = tokio::fs::remove_file(dest).await;
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    #[test]
    fn test_with_scheme_adds_https() {
        let url = with_scheme("site.example/page/img/photo.jpg").unwrap();
        assert_eq!(url.as_str(), "https://site.example/page/img/photo.jpg");
    }

    #[test]
    fn test_with_scheme_keeps_existing_scheme() {
        let url = with_scheme("http://site.example/a.png").unwrap();
        assert_eq!(url.scheme(), "http");
    }

    #[tokio::test]
    async fn test_render_returns_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_string(r#"<img src="/img/a.jpg">"#),
            )
            .mount(&mock_server)
            .await;

        let renderer = HttpRenderer::new().unwrap();
        let html = renderer.render(&mock_server.uri()).await.unwrap();
        assert!(html.contains("/img/a.jpg"));
    }

    #[tokio::test]
    async fn test_render_rejects_error_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let renderer = HttpRenderer::new().unwrap();
        let result = renderer
            .render(&format!("{}/missing", mock_server.uri()))
            .await;
        assert!(matches!(
            result,
            Err(ScanError::StatusError { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_download_writes_file() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/img/photo.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\xff\xd8\xff\xe0fake".to_vec()))
            .mount(&mock_server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("photo.jpg");

        let downloader = HttpDownloader::new().unwrap();
        downloader
            .download(&format!("{}/img/photo.jpg", mock_server.uri()), &dest)
            .await
            .unwrap();

        let bytes = std::fs::read(&dest).unwrap();
        assert_eq!(bytes, b"\xff\xd8\xff\xe0fake");
    }

    #[tokio::test]
    async fn test_download_failure_leaves_no_file() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/broken.png"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("broken.png");

        let downloader = HttpDownloader::new().unwrap();
        let result = downloader
            .download(&format!("{}/broken.png", mock_server.uri()), &dest)
            .await;

        assert!(result.is_err());
        assert!(!dest.exists());
    }
}
