//! One-shot GET used to harvest `Set-Cookie` headers.
//!
//! The exchange runs on the tokio runtime and suspends only its caller. There
//! is no timeout beyond what the transport itself imposes, and redirects are not
//! followed: the cookies come from the first response.

use crate::base::context::FetchResultExt;
use crate::base::error::CookieError;
use crate::socket::connectjob::ConnectJob;
use crate::socket::tls::TlsConfig;
use async_trait::async_trait;
use bytes::Bytes;
use http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode};
use http_body_util::Empty;
use hyper_util::rt::TokioIo;
use url::{Position, Url};

pub const DEFAULT_USER_AGENT: &str = concat!("keet/", env!("CARGO_PKG_VERSION"));

/// Status line and headers of a response. The body is discarded.
#[derive(Debug, Clone)]
pub struct ResponseHead {
    /// URL the response was served for; `None` when the transport could not tell.
    pub url: Option<Url>,
    pub status: StatusCode,
    pub headers: HeaderMap,
}

impl ResponseHead {
    /// Every `Set-Cookie` value that is valid UTF-8.
    pub fn set_cookie_values(&self) -> impl Iterator<Item = &str> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
    }
}

/// Performs the network round-trip for `getFromResponse`.
#[async_trait]
pub trait ResponseFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<ResponseHead, CookieError>;
}

/// HTTP/1.1 fetcher over [`ConnectJob`] sockets.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    tls: TlsConfig,
    user_agent: String,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(TlsConfig::default(), DEFAULT_USER_AGENT)
    }
}

impl HttpFetcher {
    pub fn new(tls: TlsConfig, user_agent: impl Into<String>) -> Self {
        Self {
            tls,
            user_agent: user_agent.into(),
        }
    }

    fn build_request(&self, url: &Url) -> Result<Request<Empty<Bytes>>, CookieError> {
        let host = url.host_str().ok_or(CookieError::InvalidUrl)?;
        let authority = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        let path = &url[Position::BeforePath..Position::AfterQuery];

        let mut req = Request::builder()
            .method(Method::GET)
            .uri(if path.is_empty() { "/" } else { path })
            .body(Empty::<Bytes>::new())
            .map_err(|_| CookieError::InvalidUrl)?;

        let headers = req.headers_mut();
        headers.insert(
            header::HOST,
            HeaderValue::from_str(&authority).map_err(|_| CookieError::InvalidUrl)?,
        );
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_str(&self.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
        Ok(req)
    }
}

#[async_trait]
impl ResponseFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<ResponseHead, CookieError> {
        let req = self.build_request(url)?;
        let socket = ConnectJob::connect(url, &self.tls).await?;

        let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(socket))
            .await
            .request_context()?;
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::debug!(error = %e, "connection closed with error");
            }
        });

        let resp = sender.send_request(req).await.request_context()?;
        let (parts, _body) = resp.into_parts();
        tracing::debug!(url = %url, status = %parts.status, "response received");

        Ok(ResponseHead {
            url: Some(url.clone()),
            status: parts.status,
            headers: parts.headers,
        })
    }
}
