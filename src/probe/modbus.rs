//! Modbus TCP probe.
//!
//! Sends a Read Coils request (function 0x01) for a single coil. Modbus has
//! no authentication layer, so both a normal reply and an exception reply
//! prove the device is reachable and answers unauthenticated traffic; an
//! unexpected function code or a short reply does not.

use super::{connect, send_recv, ProbeOutcome};

/// MBAP header (transaction=1, protocol=0, length=6, unit=1) followed by
/// PDU (function 0x01 Read Coils, start=0, count=1).
pub(crate) const READ_COILS_REQUEST: [u8; 12] = [
    0x00, 0x01, // transaction id
    0x00, 0x00, // protocol id
    0x00, 0x06, // length
    0x01, // unit id
    0x01, // function: read coils
    0x00, 0x00, // start address
    0x00, 0x01, // coil count
];

/// Classify a Modbus reply by the function code at offset 7.
pub(crate) fn classify_response(reply: &[u8]) -> ProbeOutcome {
    if reply.len() < 8 {
        return ProbeOutcome::unconfirmed("no valid Modbus response");
    }
    match reply[7] {
        0x01 => ProbeOutcome::confirmed("Modbus fc=0x01 response — device answers reads without auth"),
        0x81 => {
            let code = match reply.get(8) {
                Some(c) => c.to_string(),
                None => "?".to_string(),
            };
            ProbeOutcome::confirmed(format!(
                "Modbus exception fc=0x81 code={code} — device reachable, no transport auth"
            ))
        }
        fc => ProbeOutcome::unconfirmed(format!("unexpected Modbus function code 0x{fc:02x}")),
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
    let reply = send_recv(&mut stream, &READ_COILS_REQUEST, 256).await?;
    Ok(classify_response(&reply))
}
