//! BACnet/IP building automation probe.
//!
//! Sends an Original-Unicast-NPDU Who-Is over UDP and waits for any reply.
//! BACnet devices answer Who-Is with I-Am unconditionally; any non-empty
//! datagram within the timeout counts as confirmed.

use tokio::net::UdpSocket;

use super::ProbeOutcome;

/// BVLC header (type 0x81, function 0x0a, length 0x0008), NPDU (version 1,
/// control 0), APDU (unconfirmed request 0x10, service Who-Is 0x08).
pub(crate) const WHO_IS: [u8; 8] = [0x81, 0x0a, 0x00, 0x08, 0x01, 0x00, 0x10, 0x08];

pub(crate) async fn probe(ip: &str, port: u16) -> ProbeOutcome {
    match exchange(ip, port).await {
        Ok(outcome) => outcome,
        Err(detail) => ProbeOutcome::unconfirmed(detail),
    }
}

async fn exchange(ip: &str, port: u16) -> Result<ProbeOutcome, String> {
    let socket = UdpSocket::bind("0.0.0.0:0")
        .await
        .map_err(|e| format!("socket bind failed: {e}"))?;
    socket
        .send_to(&WHO_IS, (ip, port))
        .await
        .map_err(|e| format!("send failed: {e}"))?;
    let mut buf = [0u8; 1024];
    let (n, _) = socket
        .recv_from(&mut buf)
        .await
        .map_err(|e| format!("read failed: {e}"))?;
    if n > 0 {
        Ok(ProbeOutcome::confirmed(format!(
            "BACnet reply received ({n} bytes) — device responding"
        )))
    } else {
        Ok(ProbeOutcome::unconfirmed("empty UDP reply"))
    }
}
