//! Telnet banner probe.
//!
//! Connects, waits briefly for the service to volunteer its login banner,
//! and reads up to 256 bytes. Any banner at all confirms the service is
//! alive and presenting itself; per design intent this is weaker evidence
//! than the status-code checks used for RTSP/HTTP.

use std::time::Duration;

use tokio::io::AsyncReadExt;

use super::{connect, ProbeOutcome};

/// Settle time before the banner read; most telnet daemons push their
/// banner immediately after accept.
const BANNER_SETTLE: Duration = Duration::from_millis(500);

const BANNER_LIMIT: usize = 256;

/// Render raw banner bytes printable: lossy decode, non-graphic characters
/// become dots, capped at 80 characters.
pub(crate) fn sanitize_banner(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .trim()
        .chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '.' })
        .take(80)
        .collect()
}

pub(crate) async fn probe(ip: &str, port: u16) -> ProbeOutcome {
    match exchange(ip, port).await {
        Ok(outcome) => outcome,
        Err(detail) => ProbeOutcome::unconfirmed(detail),
    }
}

async fn exchange(ip: &str, port: u16) -> Result<ProbeOutcome, String> {
    let mut stream = connect(ip, port).await?;
    tokio::time::sleep(BANNER_SETTLE).await;
    let mut buf = [0u8; BANNER_LIMIT];
    let n = stream
        .read(&mut buf)
        .await
        .map_err(|e| format!("read failed: {e}"))?;
    if n > 0 {
        Ok(ProbeOutcome::confirmed(format!(
            "Telnet banner: \"{}\"",
            sanitize_banner(&buf[..n])
        )))
    } else {
        Ok(ProbeOutcome::unconfirmed("connected but no banner received"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::io::AsyncWriteExt;

    use crate::probe::Protocol;

    #[test]
    fn test_sanitize_banner_masks_control_bytes() {
        // Telnet IAC negotiation bytes and CRLF become dots.
        let banner = b"\xff\xfb\x01login: ";
        let text = sanitize_banner(banner);
        assert!(text.contains("login:"), "{text}");
        assert!(!text.contains('\u{fffd}'));
        assert!(text.chars().all(|c| c.is_ascii_graphic() || c == ' ' || c == '.'));
    }

    #[test]
    fn test_sanitize_banner_caps_at_80_chars() {
        let banner = vec![b'a'; 200];
        assert_eq!(sanitize_banner(&banner).chars().count(), 80);
    }

    #[test]
    fn test_sanitize_banner_trims_whitespace() {
        assert_eq!(sanitize_banner(b"\r\n  BusyBox v1.19.4  \r\n"), "BusyBox v1.19.4");
    }

    #[tokio::test]
    async fn test_probe_against_stub_daemon() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            if let Ok((mut sock, _)) = listener.accept().await {
                let _ = sock.write_all(b"router1 login: ").await;
                // Hold the connection open past the settle window.
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        });

        let outcome = Protocol::Telnet
            .probe("127.0.0.1", port, Duration::from_secs(3))
            .await;
        assert!(outcome.confirmed, "{}", outcome.detail);
        assert!(outcome.detail.contains("router1 login:"), "{}", outcome.detail);
    }

    #[tokio::test]
    async fn test_probe_silent_daemon_is_unconfirmed() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            if let Ok((sock, _)) = listener.accept().await {
                // Close without sending anything; the read sees EOF.
                drop(sock);
            }
        });

        let outcome = Protocol::Telnet
            .probe("127.0.0.1", port, Duration::from_secs(3))
            .await;
        assert!(!outcome.confirmed);
        assert!(outcome.detail.contains("no banner"), "{}", outcome.detail);
    }
}
