//! Protocol probe implementations.
//!
//! One module per protocol. Every probe performs exactly one
//! connect-send-receive cycle against one endpoint and classifies the
//! response. Probes never return errors: refused connections, timeouts, and
//! malformed replies all resolve to an unconfirmed outcome carrying a
//! diagnostic string. Packet construction and response classification are
//! pure functions so they can be tested without a network.

pub mod bacnet;
pub mod http;
pub mod modbus;
pub mod mqtt;
pub mod rtsp;
pub mod telnet;

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

// ─────────────────────────────────────────────────────────────────────────────
// Outcome
// ─────────────────────────────────────────────────────────────────────────────

/// Verdict from a single probe attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// True when the endpoint answered its protocol check without
    /// presenting credentials.
    pub confirmed: bool,
    /// Human-readable diagnostic, included verbatim in reports.
    pub detail: String,
}

impl ProbeOutcome {
    /// Endpoint answered without credentials.
    pub fn confirmed(detail: impl Into<String>) -> Self {
        Self {
            confirmed: true,
            detail: detail.into(),
        }
    }

    /// Endpoint did not answer, refused, or requires authentication.
    pub fn unconfirmed(detail: impl Into<String>) -> Self {
        Self {
            confirmed: false,
            detail: detail.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Protocol dispatch
// ─────────────────────────────────────────────────────────────────────────────

/// The closed set of protocols the engine can speak.
///
/// A fixed enumeration rather than open dynamic dispatch: the registry maps
/// each category onto exactly one of these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Mqtt,
    Rtsp,
    Modbus,
    Bacnet,
    Telnet,
    Http,
}

impl Protocol {
    /// Short protocol label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Mqtt => "MQTT",
            Self::Rtsp => "RTSP",
            Self::Modbus => "Modbus",
            Self::Bacnet => "BACnet",
            Self::Telnet => "Telnet",
            Self::Http => "HTTP",
        }
    }

    /// Run this protocol's handshake against `ip:port`.
    ///
    /// Total wall-clock time is bounded by `timeout` on every path; the
    /// socket is dropped on every exit path, including timeout.
    pub async fn probe(self, ip: &str, port: u16, timeout: Duration) -> ProbeOutcome {
        let attempt = async {
            match self {
                Self::Mqtt => mqtt::probe(ip, port).await,
                Self::Rtsp => rtsp::probe(ip, port).await,
                Self::Modbus => modbus::probe(ip, port).await,
                Self::Bacnet => bacnet::probe(ip, port).await,
                Self::Telnet => telnet::probe(ip, port).await,
                Self::Http => http::probe(ip, port).await,
            }
        };
        match tokio::time::timeout(timeout, attempt).await {
            Ok(outcome) => outcome,
            Err(_) => ProbeOutcome::unconfirmed(format!(
                "no response within {}ms (timeout)",
                timeout.as_millis()
            )),
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared socket helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Open a TCP connection to `ip:port`, mapping failures to a diagnostic.
pub(crate) async fn connect(ip: &str, port: u16) -> Result<TcpStream, String> {
    TcpStream::connect((ip, port))
        .await
        .map_err(|e| format!("connect failed: {e}"))
}

/// Write `request`, then take a single read of up to `max` bytes.
///
/// One read is deliberate: classification only needs the leading bytes of
/// the reply, and the outer probe timeout bounds the wait.
pub(crate) async fn send_recv<S>(
    stream: &mut S,
    request: &[u8],
    max: usize,
) -> Result<Vec<u8>, String>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    stream
        .write_all(request)
        .await
        .map_err(|e| format!("send failed: {e}"))?;
    let mut buf = vec![0u8; max];
    let n = stream
        .read(&mut buf)
        .await
        .map_err(|e| format!("read failed: {e}"))?;
    buf.truncate(n);
    Ok(buf)
}

/// First CRLF-terminated line of a raw reply, lossily decoded.
pub(crate) fn first_line(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    text.split("\r\n").next().unwrap_or("").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_labels() {
        assert_eq!(Protocol::Mqtt.label(), "MQTT");
        assert_eq!(Protocol::Rtsp.label(), "RTSP");
        assert_eq!(Protocol::Modbus.label(), "Modbus");
        assert_eq!(Protocol::Bacnet.label(), "BACnet");
        assert_eq!(Protocol::Telnet.label(), "Telnet");
        assert_eq!(Protocol::Http.label(), "HTTP");
    }

    #[test]
    fn test_first_line_splits_on_crlf() {
        assert_eq!(first_line(b"RTSP/1.0 200 OK\r\nCSeq: 1\r\n"), "RTSP/1.0 200 OK");
        assert_eq!(first_line(b""), "");
        assert_eq!(first_line(b"no terminator"), "no terminator");
    }

    #[tokio::test]
    async fn test_probe_refused_connection_is_unconfirmed() {
        // Bind then drop a listener so the port is known-closed.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let outcome = Protocol::Mqtt
            .probe("127.0.0.1", port, Duration::from_secs(2))
            .await;
        assert!(!outcome.confirmed);
        assert!(outcome.detail.contains("connect failed"), "{}", outcome.detail);
    }

    #[tokio::test]
    async fn test_probe_bounds_wall_clock_to_timeout() {
        // Server accepts but never replies; the probe must give up at the
        // timeout, not hang on the read.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            if let Ok((sock, _)) = listener.accept().await {
                tokio::time::sleep(Duration::from_secs(30)).await;
                drop(sock);
            }
        });

        let started = std::time::Instant::now();
        let outcome = Protocol::Mqtt
            .probe("127.0.0.1", port, Duration::from_millis(300))
            .await;
        assert!(!outcome.confirmed);
        assert!(outcome.detail.contains("timeout"), "{}", outcome.detail);
        assert!(
            started.elapsed() < Duration::from_secs(2),
            "probe exceeded its timeout bound"
        );
    }
}
