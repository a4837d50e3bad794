//! Weather fetch orchestration
//!
//! One logical fetch per enable cycle: build the URL from the fix, try
//! through the proxy, and fall back to a direct connection exactly once if
//! (and only if) the proxied attempt timed out. Anything beyond that waits
//! for the next periodic wake.

use alloc::format;
use alloc::string::String;

use super::report::WeatherReport;
use crate::config::StationConfig;
use crate::diag::ErrorLog;
use crate::error::WatchError;
use crate::traits::{Fix, NetworkClient, WallTime, WeatherDecoder};

/// State of one logical fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchAttempt {
    /// Request URL
    pub url: String,
    /// Route through the system proxy
    pub use_proxy: bool,
    /// Set once the direct fallback has been taken
    pub retried: bool,
}

impl FetchAttempt {
    /// First attempt for `url`, proxied
    pub fn new(url: String) -> Self {
        Self {
            url,
            use_proxy: true,
            retried: false,
        }
    }

    /// Switch to the direct fallback
    ///
    /// Returns `false` if the fallback was already taken or the attempt was
    /// not proxied, in which case nothing changes.
    pub fn fall_back(&mut self) -> bool {
        if self.retried || !self.use_proxy {
            return false;
        }
        self.use_proxy = false;
        self.retried = true;
        true
    }

    fn route(&self) -> &'static str {
        match (self.use_proxy, self.retried) {
            (true, _) => "proxy",
            (false, true) => "direct retry",
            (false, false) => "direct",
        }
    }
}

/// Performs the network round trip for a position fix
#[derive(Debug, Clone)]
pub struct FetchOrchestrator {
    endpoint: String,
    api_key: String,
    timeout_s: u32,
}

impl FetchOrchestrator {
    /// Create an orchestrator for an endpoint and credential
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, timeout_s: u32) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            timeout_s,
        }
    }

    /// Create an orchestrator from station settings
    pub fn from_config(config: &StationConfig) -> Self {
        Self::new(
            config.endpoint.as_str(),
            config.api_key.as_str(),
            config.fetch_timeout_s,
        )
    }

    /// Request URL for a position
    pub fn url(&self, latitude: f64, longitude: f64) -> String {
        format!(
            "{}?lat={:.3}&lon={:.3}&APPID={}",
            self.endpoint, latitude, longitude, self.api_key
        )
    }

    /// Fetch and decode weather for `fix`
    ///
    /// Blocks for up to two network timeouts. The terminal failure of the
    /// cycle, if any, is appended to `log` and returned; the caller must
    /// leave previously shown weather untouched in that case.
    pub fn run<N, D>(
        &self,
        network: &mut N,
        decoder: &D,
        fix: Fix,
        log: &mut ErrorLog,
        at: WallTime,
    ) -> Result<WeatherReport, WatchError>
    where
        N: NetworkClient,
        D: WeatherDecoder,
    {
        let mut attempt = FetchAttempt::new(self.url(fix.latitude, fix.longitude));

        let body = loop {
            debug!(
                "weather fetch: proxy {:?}, retried {:?}",
                attempt.use_proxy, attempt.retried
            );
            match network.get(&attempt.url, self.timeout_s, attempt.use_proxy) {
                Ok(body) => break body,
                Err(err) if err.is_timeout() && attempt.fall_back() => {
                    warn!("proxied weather fetch timed out, retrying direct");
                }
                Err(err) => {
                    warn!("weather fetch failed: {:?}", err.kind);
                    let err = WatchError::Network(err);
                    log.append(at, err, attempt.route());
                    return Err(err);
                }
            }
        };

        match decoder.decode(&body) {
            Ok(report) => {
                info!("weather updated ({} bytes)", body.len());
                Ok(report)
            }
            Err(err) => {
                warn!("weather payload rejected: {:?}", err);
                let err = WatchError::Decode(err);
                log.append(at, err, "");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{DecodeError, NetworkError, NetworkErrorKind};
    use alloc::collections::VecDeque;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    /// Network client that replays scripted responses
    struct ScriptedNetwork {
        responses: VecDeque<Result<Vec<u8>, NetworkError>>,
        calls: Vec<(String, u32, bool)>,
    }

    impl ScriptedNetwork {
        fn new(responses: impl IntoIterator<Item = Result<Vec<u8>, NetworkError>>) -> Self {
            Self {
                responses: responses.into_iter().collect(),
                calls: Vec::new(),
            }
        }
    }

    impl NetworkClient for ScriptedNetwork {
        fn get(
            &mut self,
            url: &str,
            timeout_s: u32,
            use_proxy: bool,
        ) -> Result<Vec<u8>, NetworkError> {
            self.calls.push((url.to_string(), timeout_s, use_proxy));
            self.responses
                .pop_front()
                .unwrap_or(Err(NetworkError::new(NetworkErrorKind::Connection)))
        }
    }

    /// Decoder that accepts `b"ok"` only
    struct FakeDecoder;

    impl WeatherDecoder for FakeDecoder {
        fn decode(&self, body: &[u8]) -> Result<WeatherReport, DecodeError> {
            if body != b"ok" {
                return Err(DecodeError::Syntax);
            }
            Ok(WeatherReport {
                place_name: String::from("Omaha"),
                icon_code: String::from("01d"),
                temperature_kelvin: 290.0,
                sunset: 2,
                sunrise: 1,
            })
        }
    }

    const FIX: Fix = Fix {
        latitude: 41.2586,
        longitude: -95.9378,
        timestamp: 0,
    };

    fn timeout() -> Result<Vec<u8>, NetworkError> {
        Err(NetworkError::new(NetworkErrorKind::Timeout))
    }

    fn orchestrator() -> FetchOrchestrator {
        FetchOrchestrator::new("http://weather.test/now", "KEY", 5)
    }

    #[test]
    fn test_url_format() {
        assert_eq!(
            orchestrator().url(41.2586, -95.9378),
            "http://weather.test/now?lat=41.259&lon=-95.938&APPID=KEY"
        );
    }

    #[test]
    fn test_first_attempt_uses_proxy_and_timeout() {
        let mut network = ScriptedNetwork::new([Ok(b"ok".to_vec())]);
        let mut log = ErrorLog::new();
        let report = orchestrator()
            .run(&mut network, &FakeDecoder, FIX, &mut log, WallTime::default())
            .unwrap();

        assert_eq!(report.place_name, "Omaha");
        assert_eq!(network.calls.len(), 1);
        assert_eq!(network.calls[0].1, 5);
        assert!(network.calls[0].2);
        assert!(log.is_empty());
    }

    #[test]
    fn test_proxy_timeout_retries_direct_once() {
        let mut network = ScriptedNetwork::new([timeout(), Ok(b"ok".to_vec())]);
        let mut log = ErrorLog::new();
        let result = orchestrator().run(&mut network, &FakeDecoder, FIX, &mut log, WallTime::default());

        assert!(result.is_ok());
        let proxies: Vec<bool> = network.calls.iter().map(|call| call.2).collect();
        assert_eq!(proxies, [true, false]);
        assert!(log.is_empty());
    }

    #[test]
    fn test_second_timeout_is_terminal() {
        let mut network = ScriptedNetwork::new([timeout(), timeout(), Ok(b"ok".to_vec())]);
        let mut log = ErrorLog::new();
        let result = orchestrator().run(&mut network, &FakeDecoder, FIX, &mut log, WallTime::new(7, 0));

        assert_eq!(
            result,
            Err(WatchError::Network(NetworkError::new(NetworkErrorKind::Timeout)))
        );
        assert_eq!(network.calls.len(), 2);
        assert_eq!(log.iter().next(), Some("07:00 net:timeout direct retry"));
    }

    #[test]
    fn test_non_timeout_failure_is_not_retried() {
        for kind in [
            NetworkErrorKind::Connection,
            NetworkErrorKind::Proxy,
            NetworkErrorKind::Http(500),
            NetworkErrorKind::Body,
        ] {
            let mut network = ScriptedNetwork::new([Err(NetworkError::new(kind)), Ok(b"ok".to_vec())]);
            let mut log = ErrorLog::new();
            let result = orchestrator().run(&mut network, &FakeDecoder, FIX, &mut log, WallTime::default());

            assert!(result.is_err());
            assert_eq!(network.calls.len(), 1);
            assert_eq!(log.len(), 1);
        }
    }

    #[test]
    fn test_decode_failure_logged() {
        let mut network = ScriptedNetwork::new([Ok(b"{".to_vec())]);
        let mut log = ErrorLog::new();
        let result = orchestrator().run(&mut network, &FakeDecoder, FIX, &mut log, WallTime::new(1, 1));

        assert_eq!(result, Err(WatchError::Decode(DecodeError::Syntax)));
        assert_eq!(log.iter().next(), Some("01:01 json:syntax"));
    }

    #[test]
    fn test_fall_back_only_once() {
        let mut attempt = FetchAttempt::new(String::from("u"));
        assert!(attempt.fall_back());
        assert!(!attempt.use_proxy);
        assert!(attempt.retried);
        assert!(!attempt.fall_back());
    }
}
