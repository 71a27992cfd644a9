//! Projector address resolution.
//!
//! A host specifier is one of:
//!
//! ```text
//! projector.local          DNS name or IP, default port
//! 192.168.1.50:20554       explicit port
//! [fe80::1]:20554          bracketed IPv6 with port
//! tcp://projector.local    same as above, explicit scheme
//! sddp://                  discover the first projector on the LAN
//! sddp://<hint>            discover the projector whose SDDP host is <hint>
//! ```
//!
//! An empty specifier means `sddp://`. Discovery itself is pluggable through
//! [`Discovery`]; this crate ships no SDDP implementation.

use std::fmt;
use std::net::{IpAddr, SocketAddr};

use futures::future::BoxFuture;
use jvc_core::{Error, Result};
use tracing::debug;

const TCP_SCHEME: &str = "tcp://";
const SDDP_SCHEME: &str = "sddp://";

/// Parsed host specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostSpec {
    Tcp { host: String, port: u16 },
    Sddp { hint: Option<String> },
}

impl HostSpec {
    /// Parse a host specifier, filling in `default_port` where none is given.
    ///
    /// # Errors
    /// Returns `Error::InvalidHost` for unknown schemes, empty hosts and
    /// unparseable ports.
    ///
    /// # Example
    ///
    /// ```
    /// use jvc_network::HostSpec;
    ///
    /// let spec = HostSpec::parse("tcp://projector.local:7000", 20554).unwrap();
    /// assert_eq!(spec, HostSpec::Tcp { host: "projector.local".into(), port: 7000 });
    ///
    /// let spec = HostSpec::parse("", 20554).unwrap();
    /// assert_eq!(spec, HostSpec::Sddp { hint: None });
    /// ```
    pub fn parse(spec: &str, default_port: u16) -> Result<Self> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Ok(HostSpec::Sddp { hint: None });
        }

        if let Some(hint) = spec.strip_prefix(SDDP_SCHEME) {
            let hint = (!hint.is_empty()).then(|| hint.to_string());
            return Ok(HostSpec::Sddp { hint });
        }

        let rest = spec.strip_prefix(TCP_SCHEME).unwrap_or(spec);
        if rest.contains("://") {
            return Err(Error::InvalidHost(format!("unsupported scheme in {spec:?}")));
        }

        let (host, port) = split_host_port(rest, default_port)
            .ok_or_else(|| Error::InvalidHost(spec.to_string()))?;
        if host.is_empty() {
            return Err(Error::InvalidHost(format!("missing host in {spec:?}")));
        }
        Ok(HostSpec::Tcp {
            host: host.to_string(),
            port,
        })
    }
}

impl fmt::Display for HostSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostSpec::Tcp { host, port } if host.contains(':') => {
                write!(f, "{TCP_SCHEME}[{host}]:{port}")
            }
            HostSpec::Tcp { host, port } => write!(f, "{TCP_SCHEME}{host}:{port}"),
            HostSpec::Sddp { hint: Some(hint) } => write!(f, "{SDDP_SCHEME}{hint}"),
            HostSpec::Sddp { hint: None } => f.write_str(SDDP_SCHEME),
        }
    }
}

fn split_host_port(s: &str, default_port: u16) -> Option<(&str, u16)> {
    if let Some(bracketed) = s.strip_prefix('[') {
        let (host, after) = bracketed.split_once(']')?;
        return match after {
            "" => Some((host, default_port)),
            _ => Some((host, after.strip_prefix(':')?.parse().ok()?)),
        };
    }
    // A bare IPv6 address has several colons and no port.
    if s.parse::<IpAddr>().is_ok() {
        return Some((s, default_port));
    }
    match s.rsplit_once(':') {
        Some((host, port)) => Some((host, port.parse().ok()?)),
        None => Some((s, default_port)),
    }
}

/// Network discovery of projectors (SDDP or similar).
pub trait Discovery: Send + Sync {
    /// Find a projector, optionally the one announcing `hint` as its host
    /// name. Uses `default_port` if the announcement carries no port.
    fn discover<'a>(
        &'a self,
        hint: Option<&'a str>,
        default_port: u16,
    ) -> BoxFuture<'a, Result<SocketAddr>>;
}

/// Discovery that never finds anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDiscovery;

impl Discovery for NoDiscovery {
    fn discover<'a>(
        &'a self,
        hint: Option<&'a str>,
        _default_port: u16,
    ) -> BoxFuture<'a, Result<SocketAddr>> {
        let target = hint.unwrap_or("any projector").to_string();
        Box::pin(async move {
            Err(Error::DiscoveryFailed(format!(
                "no discovery mechanism configured to find {target}"
            )))
        })
    }
}

/// Resolve a host specifier to a socket address.
///
/// # Errors
/// - `Error::Connect` if DNS resolution fails or yields nothing
/// - `Error::DiscoveryFailed` from `discovery` for `sddp://` specifiers
pub async fn resolve_host(spec: &HostSpec, discovery: &dyn Discovery, default_port: u16) -> Result<SocketAddr> {
    let addr = match spec {
        HostSpec::Tcp { host, port } => {
            let mut addrs = tokio::net::lookup_host((host.as_str(), *port))
                .await
                .map_err(|e| Error::Connect {
                    addr: format!("{host}:{port}"),
                    reason: format!("name resolution failed: {e}"),
                })?;
            addrs.next().ok_or_else(|| Error::Connect {
                addr: format!("{host}:{port}"),
                reason: "name resolved to no addresses".to_string(),
            })?
        }
        HostSpec::Sddp { hint } => discovery.discover(hint.as_deref(), default_port).await?,
    };
    debug!(%spec, %addr, "Resolved projector address");
    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("projector.local", "projector.local", 20554)]
    #[case("projector.local:7000", "projector.local", 7000)]
    #[case("tcp://10.0.0.5", "10.0.0.5", 20554)]
    #[case("tcp://10.0.0.5:1234", "10.0.0.5", 1234)]
    #[case("  10.0.0.5  ", "10.0.0.5", 20554)]
    #[case("[fe80::1]:99", "fe80::1", 99)]
    #[case("[fe80::1]", "fe80::1", 20554)]
    #[case("fe80::1", "fe80::1", 20554)]
    fn test_parse_tcp(#[case] spec: &str, #[case] host: &str, #[case] port: u16) {
        assert_eq!(
            HostSpec::parse(spec, 20554).unwrap(),
            HostSpec::Tcp {
                host: host.to_string(),
                port
            }
        );
    }

    #[rstest]
    #[case("", None)]
    #[case("sddp://", None)]
    #[case("sddp://living-room", Some("living-room"))]
    fn test_parse_sddp(#[case] spec: &str, #[case] hint: Option<&str>) {
        assert_eq!(
            HostSpec::parse(spec, 20554).unwrap(),
            HostSpec::Sddp {
                hint: hint.map(str::to_string)
            }
        );
    }

    #[rstest]
    #[case("http://projector")]
    #[case("projector:notaport")]
    #[case("projector:99999")]
    #[case(":20554")]
    #[case("tcp://")]
    #[case("[fe80::1")]
    #[case("[fe80::1]x")]
    fn test_parse_invalid(#[case] spec: &str) {
        assert!(matches!(
            HostSpec::parse(spec, 20554),
            Err(Error::InvalidHost(_))
        ));
    }

    #[test]
    fn test_display() {
        let spec = HostSpec::parse("[fe80::1]:99", 20554).unwrap();
        assert_eq!(spec.to_string(), "tcp://[fe80::1]:99");
        assert_eq!(HostSpec::Sddp { hint: None }.to_string(), "sddp://");
    }

    #[tokio::test]
    async fn test_resolve_ip_literal() {
        let spec = HostSpec::parse("127.0.0.1:4000", 20554).unwrap();
        let addr = resolve_host(&spec, &NoDiscovery, 20554).await.unwrap();
        assert_eq!(addr, "127.0.0.1:4000".parse().unwrap());
    }

    #[tokio::test]
    async fn test_resolve_sddp_without_discovery() {
        let spec = HostSpec::parse("sddp://", 20554).unwrap();
        let err = resolve_host(&spec, &NoDiscovery, 20554).await.unwrap_err();
        assert!(matches!(err, Error::DiscoveryFailed(_)));
    }

    struct FixedDiscovery(SocketAddr);

    impl Discovery for FixedDiscovery {
        fn discover<'a>(
            &'a self,
            _hint: Option<&'a str>,
            _default_port: u16,
        ) -> BoxFuture<'a, Result<SocketAddr>> {
            Box::pin(async move { Ok(self.0) })
        }
    }

    #[tokio::test]
    async fn test_resolve_sddp_with_discovery() {
        let found: SocketAddr = "10.1.2.3:20554".parse().unwrap();
        let spec = HostSpec::parse("sddp://projector", 20554).unwrap();
        let addr = resolve_host(&spec, &FixedDiscovery(found), 20554).await.unwrap();
        assert_eq!(addr, found);
    }
}
