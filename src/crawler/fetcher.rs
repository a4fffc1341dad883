//! HTTP fetching
//!
//! Builds the shared reqwest client and performs the per-page GET requests.
//! Transport failures (timeout, refused connection) are hard errors for the
//! whole crawl; HTTP statuses come back untouched because the driver owns
//! the 400-599 stop rule.

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::Client;
use url::Url;

use crate::config::CrawlConfig;
use crate::CrawlError;

/// One fetched page: status, raw body bytes and the charset the server
/// declared, if any.
#[derive(Debug)]
pub struct FetchedPage {
    /// HTTP status code
    pub status: u16,

    /// Raw response body, undecoded
    pub body: Vec<u8>,

    /// Charset label from the Content-Type header
    pub encoding: Option<String>,
}

/// Builds the HTTP client every request of a crawler instance goes through.
///
/// # Arguments
///
/// * `config` - The crawl configuration providing user agent and timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &CrawlConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.request_timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one page and returns its status, body and declared charset.
///
/// Statuses are not interpreted here. Transport errors are classified into
/// the connectivity-class variants of [`CrawlError`].
pub async fn fetch_page(client: &Client, url: &Url) -> Result<FetchedPage, CrawlError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status().as_u16();
    let encoding = declared_charset(response.headers());
    let body = response
        .bytes()
        .await
        .map_err(|e| classify_error(url, e))?
        .to_vec();

    Ok(FetchedPage {
        status,
        body,
        encoding,
    })
}

/// Maps a reqwest transport error onto the crawl error taxonomy.
fn classify_error(url: &Url, error: reqwest::Error) -> CrawlError {
    if error.is_timeout() {
        CrawlError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        CrawlError::Connect {
            url: url.to_string(),
        }
    } else {
        CrawlError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

/// Charset parameter of the Content-Type header, if declared.
fn declared_charset(headers: &HeaderMap) -> Option<String> {
    let content_type = headers.get(CONTENT_TYPE)?.to_str().ok()?;
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"').to_string())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers_with_content_type(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_build_http_client() {
        let config = CrawlConfig::default();
        assert!(build_http_client(&config).is_ok());
    }

    #[test]
    fn test_declared_charset_present() {
        let headers = headers_with_content_type("text/html; charset=ISO-8859-1");
        assert_eq!(declared_charset(&headers).as_deref(), Some("ISO-8859-1"));
    }

    #[test]
    fn test_declared_charset_quoted_and_spaced() {
        let headers = headers_with_content_type(r#"text/html; charset = "utf-8" "#);
        assert_eq!(declared_charset(&headers).as_deref(), Some("utf-8"));
    }

    #[test]
    fn test_declared_charset_absent() {
        let headers = headers_with_content_type("text/html");
        assert!(declared_charset(&headers).is_none());

        let empty = HeaderMap::new();
        assert!(declared_charset(&empty).is_none());
    }
}
