// src/config/target.rs
use super::ConfigError;
use std::fmt;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Tcp,
    Http,
    Https,
}

impl Protocol {
    fn from_scheme(scheme: &str) -> Option<Self> {
        match scheme {
            "tcp" => Some(Protocol::Tcp),
            "http" => Some(Protocol::Http),
            "https" => Some(Protocol::Https),
            _ => None,
        }
    }

    /// Verb used when logging an attempt.
    pub fn verb(&self) -> &'static str {
        match self {
            Protocol::Tcp => "dial",
            Protocol::Http | Protocol::Https => "GET",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scheme = match self {
            Protocol::Tcp => "tcp",
            Protocol::Http => "http",
            Protocol::Https => "https",
        };
        f.write_str(scheme)
    }
}

/// One endpoint to wait for.
///
/// The endpoint string doubles as the target's identity: `host:port` for
/// TCP and the normalized URL for HTTP(S). Two inputs that normalize to
/// the same endpoint are the same target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceTarget {
    protocol: Protocol,
    endpoint: String,
}

impl ServiceTarget {
    /// Parse a `tcp://`, `http://` or `https://` URL.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(input).map_err(|source| ConfigError::InvalidUrl {
            input: input.to_string(),
            source,
        })?;

        let protocol = Protocol::from_scheme(url.scheme())
            .ok_or_else(|| ConfigError::UnsupportedScheme(url.scheme().to_string()))?;

        let host = match url.host_str() {
            Some(host) if !host.is_empty() => host,
            _ => return Err(ConfigError::MissingHost(input.to_string())),
        };

        let endpoint = match protocol {
            Protocol::Tcp => {
                let port = url
                    .port()
                    .ok_or_else(|| ConfigError::MissingPort(input.to_string()))?;
                format!("{}:{}", host, port)
            }
            Protocol::Http | Protocol::Https => url.to_string(),
        };

        Ok(Self { protocol, endpoint })
    }

    /// Build a TCP target from a bare host and port.
    pub fn tcp(host: &str, port: u16) -> Result<Self, ConfigError> {
        if host.is_empty() {
            return Err(ConfigError::MissingHost(format!(":{}", port)));
        }
        // Round-trip through the URL parser so IPv6 literals and
        // uppercase hostnames normalize the same way as `tcp://` input.
        let host = if host.contains(':') && !host.starts_with('[') {
            format!("[{}]", host)
        } else {
            host.to_string()
        };
        Self::parse(&format!("tcp://{}:{}", host, port))
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Key used by the readiness tally.
    pub fn identity(&self) -> &str {
        &self.endpoint
    }
}

impl fmt::Display for ServiceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.protocol {
            Protocol::Tcp => write!(f, "{}://{}", self.protocol, self.endpoint),
            Protocol::Http | Protocol::Https => f.write_str(&self.endpoint),
        }
    }
}
