use crate::error::{Error, Result};
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;

/// Raw `{base_url}/{name}/json` document. Immutable once fetched.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub info: Info,
    #[serde(default)]
    pub releases: HashMap<String, Vec<ReleaseFile>>,
}

/// Descriptive fields of the document's `info` mapping. Everything is
/// optional at the wire level; accessors that the index contract treats as
/// required enforce presence at read time so a hole surfaces as a
/// `MissingField` error instead of a deserialization failure.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Info {
    pub author: Option<String>,
    pub author_email: Option<String>,
    pub maintainer: Option<String>,
    pub maintainer_email: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub license: Option<String>,
    pub home_page: Option<String>,
    pub docs_url: Option<String>,
    pub package_url: Option<String>,
    pub downloads: Option<RecentDownloads>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct RecentDownloads {
    pub last_day: i64,
    pub last_week: i64,
    pub last_month: i64,
}

/// One uploaded artifact of a release. `upload_time` is kept as the raw
/// ISO-8601 string; lexicographic order on it is chronological order.
#[derive(Clone, Debug, Deserialize)]
pub struct ReleaseFile {
    #[serde(default)]
    pub downloads: i64,
    pub upload_time: String,
}

pub(crate) fn endpoint(base_url: &str, name: &str) -> String {
    format!("{}/{}/json", base_url.trim_end_matches('/'), name)
}

#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
}

impl Client {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("pypistat"));

        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self { http })
    }

    /// Fetch the JSON metadata document for one package. A 404 from the
    /// index maps to `PackageNotFound`; any other transport failure
    /// propagates unmodified. No retries.
    pub async fn fetch_metadata(&self, base_url: &str, name: &str) -> Result<Metadata> {
        let url = endpoint(base_url, name);
        debug!("GET {}", url);

        let resp = self.http.get(&url).send().await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(Error::PackageNotFound(name.to_string()));
        }

        Ok(resp.error_for_status()?.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "info": {
            "author": "Kenneth Reitz",
            "summary": "Python HTTP for Humans.",
            "license": "Apache 2.0",
            "package_url": "https://pypi.org/project/requests/",
            "downloads": {"last_day": 10, "last_week": 70, "last_month": 300}
        },
        "releases": {
            "2.0.0": [{"downloads": 42, "upload_time": "2013-09-24T17:31:17"}],
            "0.2.0": []
        }
    }"#;

    #[test]
    fn endpoint_layout() {
        assert_eq!(
            endpoint("https://pypi.python.org/pypi", "requests"),
            "https://pypi.python.org/pypi/requests/json"
        );
        // a trailing slash on the base must not double up
        assert_eq!(
            endpoint("http://mirror.local/pypi/", "foo"),
            "http://mirror.local/pypi/foo/json"
        );
    }

    #[test]
    fn deserializes_document() {
        let meta: Metadata = serde_json::from_str(FIXTURE).unwrap();
        assert_eq!(meta.info.author.as_deref(), Some("Kenneth Reitz"));
        assert_eq!(meta.info.maintainer, None);
        assert_eq!(meta.info.downloads.unwrap().last_week, 70);
        assert_eq!(meta.releases["2.0.0"][0].downloads, 42);
        assert!(meta.releases["0.2.0"].is_empty());
    }

    #[test]
    fn tolerates_minimal_document() {
        let meta: Metadata = serde_json::from_str(r#"{"releases": {}}"#).unwrap();
        assert!(meta.releases.is_empty());
        assert_eq!(meta.info.package_url, None);
    }

    // Serves one connection with a canned response, returns the base URL.
    async fn index_stub(response: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn missing_package_maps_to_not_found() {
        let base = index_stub(
            "HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        )
        .await;

        match Client::new().unwrap().fetch_metadata(&base, "ghost").await {
            Err(Error::PackageNotFound(name)) => assert_eq!(name, "ghost"),
            other => panic!("expected PackageNotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn other_error_statuses_propagate_as_transport_errors() {
        let base = index_stub(
            "HTTP/1.1 500 Internal Server Error\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        )
        .await;

        match Client::new().unwrap().fetch_metadata(&base, "flaky").await {
            Err(Error::Http(err)) => {
                assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR))
            }
            other => panic!("expected Http, got {:?}", other.map(|_| ())),
        }
    }
}
