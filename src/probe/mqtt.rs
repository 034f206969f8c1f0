//! MQTT broker probe.
//!
//! Sends an anonymous MQTT 3.1.1 CONNECT and inspects the CONNACK return
//! code. rc=0 means the broker accepted the session without credentials.

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use super::{connect, ProbeOutcome};

/// Fixed client identifier sent in the CONNECT payload.
const CLIENT_ID: &[u8] = b"remoravf1";

/// Build the MQTT CONNECT packet.
///
/// Fixed header (type 0x10 + remaining length), variable header (protocol
/// name "MQTT", level 4, connect flags 0x00, keepalive 60s), payload
/// (2-byte length-prefixed client id).
pub(crate) fn build_connect_packet() -> Vec<u8> {
    let remaining = 10 + 2 + CLIENT_ID.len();
    let mut packet = Vec::with_capacity(2 + remaining);
    packet.push(0x10);
    packet.push(remaining as u8);
    packet.extend_from_slice(&[0x00, 0x04]);
    packet.extend_from_slice(b"MQTT");
    packet.push(0x04); // protocol level 4 (3.1.1)
    packet.push(0x00); // connect flags: anonymous, no will, no clean session
    packet.extend_from_slice(&60u16.to_be_bytes()); // keepalive
    packet.extend_from_slice(&(CLIENT_ID.len() as u16).to_be_bytes());
    packet.extend_from_slice(CLIENT_ID);
    packet
}

/// Classify a CONNACK reply. Anything that is not a well-formed CONNACK
/// with return code 0 is unconfirmed.
pub(crate) fn classify_connack(reply: &[u8]) -> ProbeOutcome {
    if reply.len() >= 4 && reply[0] == 0x20 {
        let rc = reply[3];
        if rc == 0 {
            ProbeOutcome::confirmed("CONNACK rc=0 — anonymous access accepted")
        } else {
            ProbeOutcome::unconfirmed(format!("CONNACK rc={rc} — broker refused (auth required)"))
        }
    } else {
        ProbeOutcome::unconfirmed("no valid CONNACK received")
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
    stream
        .write_all(&build_connect_packet())
        .await
        .map_err(|e| format!("send failed: {e}"))?;
    let mut reply = [0u8; 4];
    let n = stream
        .read(&mut reply)
        .await
        .map_err(|e| format!("read failed: {e}"))?;
    Ok(classify_connack(&reply[..n]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::probe::Protocol;

    #[test]
    fn test_connect_packet_layout() {
        let packet = build_connect_packet();
        assert_eq!(packet[0], 0x10, "CONNECT packet type");
        assert_eq!(packet[1] as usize, packet.len() - 2, "remaining length");
        assert_eq!(&packet[2..4], &[0x00, 0x04]);
        assert_eq!(&packet[4..8], b"MQTT");
        assert_eq!(packet[8], 0x04, "protocol level");
        assert_eq!(packet[9], 0x00, "connect flags");
        assert_eq!(&packet[10..12], &[0x00, 0x3c], "keepalive 60s");
        assert_eq!(&packet[12..14], &[0x00, CLIENT_ID.len() as u8]);
        assert_eq!(&packet[14..], CLIENT_ID);
    }

    #[test]
    fn test_classify_connack_accepted() {
        let outcome = classify_connack(&[0x20, 0x02, 0x00, 0x00]);
        assert!(outcome.confirmed);
        assert!(outcome.detail.contains("rc=0"));
    }

    #[test]
    fn test_classify_connack_refused_carries_return_code() {
        let outcome = classify_connack(&[0x20, 0x02, 0x00, 0x05]);
        assert!(!outcome.confirmed);
        assert!(outcome.detail.contains("rc=5"), "{}", outcome.detail);
    }

    #[test]
    fn test_classify_connack_short_reply() {
        let outcome = classify_connack(&[0x20, 0x02]);
        assert!(!outcome.confirmed);
        assert!(outcome.detail.contains("no valid CONNACK"));
    }

    #[test]
    fn test_classify_connack_wrong_packet_type() {
        let outcome = classify_connack(&[0x30, 0x02, 0x00, 0x00]);
        assert!(!outcome.confirmed);
    }

    #[tokio::test]
    async fn test_probe_against_stub_broker() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            if let Ok((mut sock, _)) = listener.accept().await {
                let mut buf = [0u8; 64];
                let _ = sock.read(&mut buf).await;
                let _ = sock.write_all(&[0x20, 0x02, 0x00, 0x00]).await;
            }
        });

        let outcome = Protocol::Mqtt
            .probe("127.0.0.1", port, Duration::from_secs(2))
            .await;
        assert!(outcome.confirmed, "{}", outcome.detail);
    }

    #[tokio::test]
    async fn test_probe_against_auth_required_broker() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            if let Ok((mut sock, _)) = listener.accept().await {
                let mut buf = [0u8; 64];
                let _ = sock.read(&mut buf).await;
                // rc=5: not authorised
                let _ = sock.write_all(&[0x20, 0x02, 0x00, 0x05]).await;
            }
        });

        let outcome = Protocol::Mqtt
            .probe("127.0.0.1", port, Duration::from_secs(2))
            .await;
        assert!(!outcome.confirmed);
        assert!(outcome.detail.contains("rc=5"), "{}", outcome.detail);
    }
}
