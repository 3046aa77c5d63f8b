use crate::base::context::FetchResultExt;
use crate::base::error::CookieError;
use crate::socket::stream::BoxedSocket;
use crate::socket::tls::TlsConfig;
use boring::ssl::{SslConnector, SslMethod};
use tokio::net::TcpStream;
use url::Url;

/// Manages the connection process: DNS -> TCP -> SSL.
pub struct ConnectJob;

impl ConnectJob {
    pub async fn connect(url: &Url, tls: &TlsConfig) -> Result<BoxedSocket, CookieError> {
        let host = url.host_str().ok_or(CookieError::InvalidUrl)?;
        let port = url.port_or_known_default().ok_or(CookieError::InvalidUrl)?;

        // 1. DNS Resolution
        let bare_host = host.trim_start_matches('[').trim_end_matches(']');
        let addrs = tokio::net::lookup_host((bare_host, port))
            .await
            .request_context()?;

        // 2. TCP Connect, first address that answers wins
        let mut last_err = None;
        let mut stream = None;
        for addr in addrs {
            match TcpStream::connect(addr).await {
                Ok(s) => {
                    stream = Some(s);
                    break;
                }
                Err(e) => {
                    tracing::debug!(addr = %addr, error = %e, "connect attempt failed");
                    last_err = Some(e);
                }
            }
        }
        let stream = match (stream, last_err) {
            (Some(s), _) => s,
            (None, Some(e)) => return Err(CookieError::request_failed(e.to_string())),
            (None, None) => {
                return Err(CookieError::request_failed(format!(
                    "no addresses found for {host}"
                )))
            }
        };

        // 3. SSL Handshake (if https)
        if url.scheme() != "https" {
            return Ok(BoxedSocket::plain(stream));
        }

        let mut builder = SslConnector::builder(SslMethod::tls()).request_context()?;
        tls.apply_to_builder(&mut builder)?;

        let connector = builder.build();
        let mut config = connector.configure().request_context()?;
        if !TlsConfig::should_set_sni(host) {
            config.set_use_server_name_indication(false);
        }

        let tls_stream = tokio_boring::connect(config, bare_host, stream)
            .await
            .map_err(|e| {
                tracing::debug!(host = %host, error = %e, "TLS handshake failed");
                CookieError::request_failed(e.to_string())
            })?;

        Ok(BoxedSocket::tls(tls_stream))
    }
}
