use crate::base::context::FetchResultExt;
use crate::base::error::CookieError;
use boring::ssl::{SslConnectorBuilder, SslVerifyMode, SslVersion};

/// TLS settings for the response-cookie fetch.
#[derive(Debug, Clone)]
pub struct TlsConfig {
    pub min_version: Option<SslVersion>,
    pub max_version: Option<SslVersion>,
    pub alpn_protos: Vec<String>,
    pub verify_peer: bool,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            min_version: Some(SslVersion::TLS1_2),
            max_version: Some(SslVersion::TLS1_3),
            // The fetch speaks HTTP/1.1 only.
            alpn_protos: vec!["http/1.1".to_string()],
            verify_peer: true,
        }
    }
}

impl TlsConfig {
    /// Apply this configuration to an SSL connector builder.
    pub fn apply_to_builder(&self, builder: &mut SslConnectorBuilder) -> Result<(), CookieError> {
        if let Some(min) = self.min_version {
            builder.set_min_proto_version(Some(min)).request_context()?;
        }
        if let Some(max) = self.max_version {
            builder.set_max_proto_version(Some(max)).request_context()?;
        }

        if !self.alpn_protos.is_empty() {
            builder
                .set_alpn_protos(&Self::alpn_wire(&self.alpn_protos)?)
                .request_context()?;
        }

        builder.set_verify(if self.verify_peer {
            SslVerifyMode::PEER
        } else {
            SslVerifyMode::NONE
        });

        Ok(())
    }

    /// Length-prefixed ALPN list as sent on the wire.
    fn alpn_wire(protos: &[String]) -> Result<Vec<u8>, CookieError> {
        let mut wire = Vec::new();
        for proto in protos {
            let len = u8::try_from(proto.len())
                .map_err(|_| CookieError::request_failed(format!("ALPN id too long: {proto}")))?;
            wire.push(len);
            wire.extend_from_slice(proto.as_bytes());
        }
        Ok(wire)
    }

    /// Check if SNI (Server Name Indication) should be set for this host.
    /// Per RFC 6066, SNI MUST NOT be set for raw IP addresses.
    pub fn should_set_sni(host: &str) -> bool {
        host.trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<std::net::IpAddr>()
            .is_err()
    }
}
