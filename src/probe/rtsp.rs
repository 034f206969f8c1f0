//! RTSP camera stream probe.
//!
//! Sends `OPTIONS *` and inspects the status code of the first response
//! line. 200 means the stream endpoint answers without credentials; 401 and
//! 403 mean it is protected.

use super::{connect, first_line, send_recv, ProbeOutcome};

const OPTIONS_REQUEST: &[u8] = b"OPTIONS * RTSP/1.0\r\nCSeq: 1\r\n\r\n";

/// Classify the first RTSP response line.
pub(crate) fn classify_response(line: &str) -> ProbeOutcome {
    if line.contains("200") {
        ProbeOutcome::confirmed("RTSP 200 OK — stream accessible without credentials")
    } else if line.contains("401") {
        ProbeOutcome::unconfirmed("RTSP 401 — authentication required")
    } else if line.contains("403") {
        ProbeOutcome::unconfirmed("RTSP 403 — forbidden")
    } else {
        let trimmed: String = line.trim().chars().take(70).collect();
        if trimmed.is_empty() {
            ProbeOutcome::unconfirmed("no response")
        } else {
            ProbeOutcome::unconfirmed(trimmed)
        }
    }
}

pub(crate) async fn probe(ip: &str, port: u16) -> ProbeOutcome {
    match exchange(ip, port).await {
        Ok(outcome) => outcome,
        Err(detail) => ProbeOutcome::unconfirmed(detail),
    }
}

async fn exchange(ip: &str, port: u16) -> Result<ProbeOutcome, String> {
    let mut stream = connect(ip, port).await?;
    let reply = send_recv(&mut stream, OPTIONS_REQUEST, 512).await?;
    Ok(classify_response(&first_line(&reply)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    use crate::probe::Protocol;

    #[test]
    fn test_classify_200_is_confirmed() {
        let outcome = classify_response("RTSP/1.0 200 OK");
        assert!(outcome.confirmed);
    }

    #[test]
    fn test_classify_401_is_protected() {
        let outcome = classify_response("RTSP/1.0 401 Unauthorized");
        assert!(!outcome.confirmed);
        assert!(outcome.detail.contains("401"));
    }

    #[test]
    fn test_classify_403_is_protected() {
        let outcome = classify_response("RTSP/1.0 403 Forbidden");
        assert!(!outcome.confirmed);
        assert!(outcome.detail.contains("403"));
    }

    #[test]
    fn test_classify_other_line_is_truncated_to_70_chars() {
        let long = "RTSP/1.0 454 Session Not Found ".repeat(5);
        let outcome = classify_response(&long);
        assert!(!outcome.confirmed);
        assert_eq!(outcome.detail.chars().count(), 70);
    }

    #[test]
    fn test_classify_empty_line() {
        let outcome = classify_response("");
        assert!(!outcome.confirmed);
        assert_eq!(outcome.detail, "no response");
    }

    #[tokio::test]
    async fn test_probe_against_stub_camera() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            if let Ok((mut sock, _)) = listener.accept().await {
                let mut buf = [0u8; 128];
                let _ = sock.read(&mut buf).await;
                let _ = sock
                    .write_all(b"RTSP/1.0 200 OK\r\nCSeq: 1\r\nPublic: OPTIONS, DESCRIBE\r\n\r\n")
                    .await;
            }
        });

        let outcome = Protocol::Rtsp
            .probe("127.0.0.1", port, Duration::from_secs(2))
            .await;
        assert!(outcome.confirmed, "{}", outcome.detail);
    }
}
