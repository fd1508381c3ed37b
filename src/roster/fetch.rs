//! Where roster listings and roster images come from
//!
//! Everything is addressed by a relative path such as
//! `default-rosters/genshin/amber.png`. `LocalFetch` answers from a directory
//! the way a static file server would; `HttpFetch` asks a real one.

use std::future::Future;
use std::path::{Component, Path, PathBuf};

use crate::config::{GameConfig, REQUEST_TIMEOUT};
use crate::error::FetchError;

/// A completed request. Non-2xx statuses are responses, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn ok(content_type: Option<&str>, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: content_type.map(str::to_string),
            body,
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: 404,
            content_type: None,
            body: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Capability to GET a relative path
pub trait Fetch: Send + Sync + 'static {
    fn get(&self, path: &str) -> impl Future<Output = Result<FetchResponse, FetchError>> + Send;
}

/// Serves files under a local asset root
#[derive(Debug, Clone)]
pub struct LocalFetch {
    root: PathBuf,
}

impl LocalFetch {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a request path onto the asset root, refusing anything that escapes it
    fn resolve(&self, path: &str) -> Result<PathBuf, FetchError> {
        let decoded = percent_decode(path.split(['?', '#']).next().unwrap_or_default());
        let relative = Path::new(decoded.trim_start_matches('/'));

        let mut resolved = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                _ => return Err(FetchError::InvalidPath(path.to_string())),
            }
        }
        Ok(resolved)
    }
}

impl Fetch for LocalFetch {
    fn get(&self, path: &str) -> impl Future<Output = Result<FetchResponse, FetchError>> + Send {
        let resolved = self.resolve(path);
        let path = path.to_string();

        async move {
            let resolved = resolved?;
            let io_err = |source| FetchError::Io {
                path: path.clone(),
                source,
            };

            let metadata = match tokio::fs::metadata(&resolved).await {
                Ok(metadata) => metadata,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    return Ok(FetchResponse::not_found())
                }
                Err(err) => return Err(io_err(err)),
            };

            if metadata.is_dir() {
                let mut names = Vec::new();
                let mut dir = tokio::fs::read_dir(&resolved).await.map_err(io_err)?;
                while let Some(entry) = dir.next_entry().await.map_err(io_err)? {
                    names.push(entry.file_name().to_string_lossy().to_string());
                }
                names.sort();
                let html = index_page(&path, &names);
                return Ok(FetchResponse::ok(Some("text/html; charset=utf-8"), html.into_bytes()));
            }

            let body = tokio::fs::read(&resolved).await.map_err(io_err)?;
            Ok(FetchResponse::ok(content_type_for(&resolved), body))
        }
    }
}

/// Fetches from a remote base URL.
///
/// Relative paths resolve under the base URL; root-relative ones (a leading
/// `/`, as some listings emit) resolve against its origin.
#[derive(Debug, Clone)]
pub struct HttpFetch {
    client: reqwest::Client,
    base_url: reqwest::Url,
}

impl HttpFetch {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        // Without the trailing slash, joining would replace the last segment
        let base = format!("{}/", base_url.trim_end_matches('/'));
        let base_url =
            reqwest::Url::parse(&base).map_err(|_| FetchError::InvalidPath(base_url.to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| FetchError::Transport {
                url: base.clone(),
                source,
            })?;

        Ok(Self { client, base_url })
    }

    fn url_for(&self, path: &str) -> Result<reqwest::Url, FetchError> {
        self.base_url
            .join(path)
            .map_err(|_| FetchError::InvalidPath(path.to_string()))
    }
}

impl Fetch for HttpFetch {
    fn get(&self, path: &str) -> impl Future<Output = Result<FetchResponse, FetchError>> + Send {
        let client = self.client.clone();
        let url = self.url_for(path);

        async move {
            let url = url?;
            let transport = |source| FetchError::Transport {
                url: url.to_string(),
                source,
            };

            let response = client.get(url.clone()).send().await.map_err(transport)?;
            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);
            let body = response.bytes().await.map_err(transport)?.to_vec();

            Ok(FetchResponse {
                status,
                content_type,
                body,
            })
        }
    }
}

/// The configured source of roster data
#[derive(Debug, Clone)]
pub enum RosterSource {
    Local(LocalFetch),
    Remote(HttpFetch),
}

impl RosterSource {
    pub fn from_config(config: &GameConfig) -> Result<Self, FetchError> {
        match &config.remote_base_url {
            Some(url) => Ok(Self::Remote(HttpFetch::new(url)?)),
            None => Ok(Self::Local(LocalFetch::new(config.asset_root.clone()))),
        }
    }
}

impl Fetch for RosterSource {
    async fn get(&self, path: &str) -> Result<FetchResponse, FetchError> {
        match self {
            Self::Local(local) => local.get(path).await,
            Self::Remote(remote) => remote.get(path).await,
        }
    }
}

/// Autoindex-style page linking every entry of a directory
fn index_page(path: &str, names: &[String]) -> String {
    let title = escape_html(path);
    let mut html = format!("<!DOCTYPE html>\n<html>\n<head><title>Index of {title}</title></head>\n<body>\n<h1>Index of {title}</h1>\n<ul>\n");
    for name in names {
        let name = escape_html(name);
        html.push_str(&format!("<li><a href=\"{name}\">{name}</a></li>\n"));
    }
    html.push_str("</ul>\n</body>\n</html>\n");
    html
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    if ext == "svg" {
        return Some("image/svg+xml");
    }
    if ext == "json" {
        return Some("application/json");
    }
    image::ImageFormat::from_extension(&ext).map(|format| format.to_mime_type())
}

/// Decode `%XX` escapes; malformed escapes are kept as-is
pub fn percent_decode(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes
                .get(i + 1..i + 3)
                .filter(|h| h.iter().all(u8::is_ascii_hexdigit))
                .and_then(|h| std::str::from_utf8(h).ok());
            if let Some(byte) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}
