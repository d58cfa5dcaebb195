// src/utils/http.rs

//! HTTP client utilities.

use std::sync::Arc;

use reqwest::cookie::Jar;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{ApiConfig, ProxyConfig, SessionConfig};

/// Create the shared asynchronous HTTP client.
///
/// Carries the session cookies, browser-like default headers, the request
/// timeout and the optional proxy.
pub fn create_client(
    api: &ApiConfig,
    session: &SessionConfig,
    proxy: &ProxyConfig,
) -> Result<reqwest::Client> {
    let base = Url::parse(&api.base_url)?;

    let jar = Jar::default();
    for (name, value) in &session.cookies {
        jar.add_cookie_str(&format!("{name}={value}"), &base);
    }

    let mut builder = reqwest::Client::builder()
        .user_agent(&session.user_agent)
        .default_headers(default_headers(&base)?)
        .cookie_provider(Arc::new(jar))
        .timeout(api.timeout())
        .danger_accept_invalid_certs(api.accept_invalid_certs || proxy.intercepts_tls());

    if let Some(proxy_url) = proxy.url() {
        log::info!("Routing requests through proxy {}", proxy_url);
        builder = builder.proxy(reqwest::Proxy::all(&proxy_url)?);
    }

    Ok(builder.build()?)
}

/// Headers the booking site's own front end sends with its XHR calls.
pub fn default_headers(base: &Url) -> Result<HeaderMap> {
    let origin = base.origin().ascii_serialization();
    let referer = base.join("Boka/")?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static("application/json, text/javascript, */*; q=0.01"),
    );
    headers.insert(
        HeaderName::from_static("x-requested-with"),
        HeaderValue::from_static("XMLHttpRequest"),
    );
    headers.insert(header::ORIGIN, header_value(&origin)?);
    headers.insert(header::REFERER, header_value(referer.as_str())?);
    headers.insert(
        HeaderName::from_static("sec-fetch-site"),
        HeaderValue::from_static("same-origin"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-mode"),
        HeaderValue::from_static("cors"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-dest"),
        HeaderValue::from_static("empty"),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| AppError::config(format!("Invalid header value '{value}': {e}")))
}
