use std::time::Duration;

use reqwest::{
    header::{self, HeaderMap, HeaderName, HeaderValue},
    Client, ClientBuilder, StatusCode, Url,
};
use serde::Serialize;
use spdlog::prelude::*;

use crate::config;
use crate::error::{AllowlistError, Result};

pub fn client(timeout: Duration) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));

    let client = ClientBuilder::new()
        .user_agent(config::USER_AGENT)
        .default_headers(headers)
        .timeout(timeout)
        .tcp_keepalive(config::TCP_KEEPALIVE)
        .build()?;
    Ok(client)
}

#[derive(Debug, Serialize)]
pub struct Page {
    #[serde(with = "serde_url")]
    url: Url,

    #[serde(with = "serde_status_code")]
    status: StatusCode,
    content_type: Option<String>,
    etag: Option<String>,
    last_modified: Option<String>,

    len: usize,
    #[serde(skip)]
    content: String,
}

mod serde_url {
    use reqwest::Url;
    use serde::Serializer;

    pub fn serialize<S>(url: &Url, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(url.as_str())
    }
}

mod serde_status_code {
    use reqwest::StatusCode;
    use serde::Serializer;

    pub fn serialize<S>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u16(status.as_u16())
    }
}

impl Page {
    pub async fn fetch(client: &Client, url: Url) -> Result<Self> {
        let resp = client.get(url.clone()).send().await?;
        let status = resp.status();

        let get_header = |key: HeaderName| {
            resp.headers()
                .get(key)
                .and_then(|s| s.to_str().ok())
                .map(|s| s.to_string())
        };
        let content_type = get_header(header::CONTENT_TYPE);
        let etag = get_header(header::ETAG);
        let last_modified = get_header(header::LAST_MODIFIED);

        info!(
            "request: url={} status={} content_type={} etag={} last_modified={}",
            url,
            status.as_str(),
            &content_type.as_ref().map_or("", |s| s.as_str()),
            &etag.as_ref().map_or("", |s| s.as_str()),
            &last_modified.as_ref().map_or("", |s| s.as_str()),
        );

        if !status.is_success() {
            return Err(AllowlistError::Status { url, status });
        }

        let final_url = resp.url().clone();
        let content = resp.text().await?;

        Ok(Page {
            url: final_url,
            status,
            content_type,
            etag,
            last_modified,
            len: content.len(),
            content,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    #[cfg(test)]
    pub fn from_html(url: Url, content: &str) -> Self {
        Page {
            url,
            status: StatusCode::OK,
            content_type: Some("text/html; charset=utf-8".to_string()),
            etag: None,
            last_modified: None,
            len: content.len(),
            content: content.to_string(),
        }
    }
}
