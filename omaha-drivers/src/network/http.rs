//! Blocking HTTP client
//!
//! Holds two prebuilt clients: one that honours the proxy settings and one
//! that never uses a proxy, so the fetch policy can fall back to a direct
//! connection without rebuilding anything.

use std::time::Duration;

use omaha_core::traits::{NetworkClient, NetworkError, NetworkErrorKind};
use reqwest::blocking::{Client, ClientBuilder};
use thiserror::Error;
use tracing::{debug, trace};

/// User-Agent sent with every request
const USER_AGENT: &str = concat!("omaha-watch/", env!("CARGO_PKG_VERSION"));

/// Failure to construct the HTTP clients
#[derive(Debug, Error)]
pub enum HttpSetupError {
    /// Configured proxy URL could not be parsed
    #[error("invalid proxy url {url:?}")]
    InvalidProxy {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// TLS backend or client builder failed
    #[error("failed to build http client")]
    Client(#[source] reqwest::Error),
}

/// [`NetworkClient`] backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpNetworkClient {
    proxied: Client,
    direct: Client,
}

impl HttpNetworkClient {
    /// Create a client pair
    ///
    /// With `proxy` set, proxied requests go through that URL; otherwise
    /// they use the `HTTP_PROXY` / `HTTPS_PROXY` environment.
    pub fn new(proxy: Option<&str>) -> Result<Self, HttpSetupError> {
        let mut proxied = ClientBuilder::new().user_agent(USER_AGENT);
        if let Some(url) = proxy {
            let proxy = reqwest::Proxy::all(url).map_err(|source| HttpSetupError::InvalidProxy {
                url: url.to_string(),
                source,
            })?;
            proxied = proxied.proxy(proxy);
        }
        let proxied = proxied.build().map_err(HttpSetupError::Client)?;

        let direct = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .no_proxy()
            .build()
            .map_err(HttpSetupError::Client)?;

        Ok(Self { proxied, direct })
    }

    fn fetch(&self, url: &str, timeout: Duration, use_proxy: bool) -> Result<Vec<u8>, NetworkError> {
        let client = if use_proxy { &self.proxied } else { &self.direct };

        let response = client
            .get(url)
            .timeout(timeout)
            .send()
            .map_err(|err| classify(&err, use_proxy))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkErrorKind::Http(status.as_u16()).into());
        }

        response
            .bytes()
            .map(|body| body.to_vec())
            .map_err(|err| {
                if err.is_timeout() {
                    NetworkErrorKind::Timeout.into()
                } else {
                    NetworkErrorKind::Body.into()
                }
            })
    }
}

impl NetworkClient for HttpNetworkClient {
    fn get(&mut self, url: &str, timeout_s: u32, use_proxy: bool) -> Result<Vec<u8>, NetworkError> {
        debug!(use_proxy, timeout_s, "GET {}", redact(url));
        let result = self.fetch(url, Duration::from_secs(u64::from(timeout_s)), use_proxy);
        if let Err(err) = &result {
            trace!(?err, "request failed");
        }
        result
    }
}

/// Map a transport error onto the kind the fetch policy acts on
fn classify(err: &reqwest::Error, use_proxy: bool) -> NetworkError {
    let kind = if err.is_timeout() {
        NetworkErrorKind::Timeout
    } else if err.is_connect() && use_proxy {
        NetworkErrorKind::Proxy
    } else if let Some(status) = err.status() {
        NetworkErrorKind::Http(status.as_u16())
    } else if err.is_body() || err.is_decode() {
        NetworkErrorKind::Body
    } else {
        NetworkErrorKind::Connection
    };
    NetworkError::new(kind)
}

/// Hide the API credential in logged URLs
fn redact(url: &str) -> &str {
    match url.find("APPID=") {
        Some(index) => &url[..index + "APPID=".len()],
        None => url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve exactly one connection with `reply`, or hold it open if `None`
    fn serve_once(reply: Option<&'static str>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
            match reply {
                Some(reply) => {
                    let _ = stream.write_all(reply.as_bytes());
                }
                None => thread::sleep(Duration::from_secs(3)),
            }
        });
        format!("http://{}/weather?APPID=KEY", addr)
    }

    #[test]
    fn test_success_returns_body() {
        let url = serve_once(Some(
            "HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok",
        ));
        let mut client = HttpNetworkClient::new(None).unwrap();
        assert_eq!(client.get(&url, 5, false).unwrap(), b"ok");
    }

    #[test]
    fn test_error_status_classified() {
        let url = serve_once(Some(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        ));
        let mut client = HttpNetworkClient::new(None).unwrap();
        let err = client.get(&url, 5, false).unwrap_err();
        assert_eq!(err.kind, NetworkErrorKind::Http(503));
    }

    #[test]
    fn test_silent_server_times_out() {
        let url = serve_once(None);
        let mut client = HttpNetworkClient::new(None).unwrap();
        let err = client.get(&url, 1, false).unwrap_err();
        assert!(err.is_timeout());
    }

    #[test]
    fn test_refused_connection_classified() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut client = HttpNetworkClient::new(None).unwrap();
        let err = client.get(&format!("http://{}/", addr), 2, false).unwrap_err();
        assert_eq!(err.kind, NetworkErrorKind::Connection);
    }

    #[test]
    fn test_unreachable_proxy_classified() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut client = HttpNetworkClient::new(Some(&format!("http://{}", addr))).unwrap();
        let err = client.get("http://weather.invalid/", 2, true).unwrap_err();
        assert_eq!(err.kind, NetworkErrorKind::Proxy);
    }

    #[test]
    fn test_invalid_proxy_rejected() {
        let err = HttpNetworkClient::new(Some("not a url")).unwrap_err();
        assert!(matches!(err, HttpSetupError::InvalidProxy { .. }));
    }

    #[test]
    fn test_redact_hides_key() {
        assert_eq!(
            redact("http://w.test/now?lat=1.000&lon=2.000&APPID=secret"),
            "http://w.test/now?lat=1.000&lon=2.000&APPID="
        );
        assert_eq!(redact("http://w.test/"), "http://w.test/");
    }
}
