//! HTTP/HTTPS web interface probe.
//!
//! Sends a bare `GET /` and classifies the status line. TLS is used on the
//! conventional HTTPS ports with certificate verification disabled: the
//! question is whether the interface answers, not whether its self-signed
//! cert chains.

use std::sync::{Arc, OnceLock};

use tokio_rustls::rustls::client::{ServerCertVerified, ServerCertVerifier};
use tokio_rustls::rustls::{Certificate, ClientConfig, Error as TlsError, ServerName};
use tokio_rustls::TlsConnector;

use super::{connect, first_line, send_recv, ProbeOutcome};

const USER_AGENT: &str = concat!("remora/", env!("CARGO_PKG_VERSION"));

/// Ports probed over TLS.
const TLS_PORTS: [u16; 2] = [443, 8443];

/// Build the HTTP/1.0 request line and headers.
pub(crate) fn build_request(ip: &str) -> String {
    format!(
        "GET / HTTP/1.0\r\nHost: {ip}\r\nUser-Agent: {USER_AGENT}\r\nConnection: close\r\n\r\n"
    )
}

/// Classify the first response line. `scheme` is "HTTP" or "HTTPS" and is
/// carried into the diagnostic.
pub(crate) fn classify_status_line(scheme: &str, line: &str) -> ProbeOutcome {
    if line.contains("200") {
        ProbeOutcome::confirmed(format!("{scheme} 200 — web interface accessible without auth"))
    } else if line.contains("401") {
        ProbeOutcome::unconfirmed(format!("{scheme} 401 — auth required"))
    } else if line.contains("403") {
        ProbeOutcome::unconfirmed(format!("{scheme} 403 — forbidden"))
    } else if line.contains("301") || line.contains("302") {
        ProbeOutcome::unconfirmed(format!("{scheme} redirect — likely redirect to auth"))
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
    let stream = connect(ip, port).await?;
    let request = build_request(ip);

    if TLS_PORTS.contains(&port) {
        let name = ServerName::try_from(ip).map_err(|_| format!("invalid TLS server name '{ip}'"))?;
        let mut tls = tls_connector()
            .connect(name, stream)
            .await
            .map_err(|e| format!("TLS handshake failed: {e}"))?;
        let reply = send_recv(&mut tls, request.as_bytes(), 512).await?;
        Ok(classify_status_line("HTTPS", &first_line(&reply)))
    } else {
        let mut stream = stream;
        let reply = send_recv(&mut stream, request.as_bytes(), 512).await?;
        Ok(classify_status_line("HTTP", &first_line(&reply)))
    }
}

/// TLS connector that accepts any server certificate. Built once and
/// shared; embedded devices almost universally present self-signed certs.
fn tls_connector() -> TlsConnector {
    static CONFIG: OnceLock<Arc<ClientConfig>> = OnceLock::new();
    let config = CONFIG.get_or_init(|| {
        let config = ClientConfig::builder()
            .with_safe_defaults()
            .with_custom_certificate_verifier(Arc::new(AcceptAnyCert))
            .with_no_client_auth();
        Arc::new(config)
    });
    TlsConnector::from(config.clone())
}

struct AcceptAnyCert;

impl ServerCertVerifier for AcceptAnyCert {
    fn verify_server_cert(
        &self,
        _end_entity: &Certificate,
        _intermediates: &[Certificate],
        _server_name: &ServerName,
        _scts: &mut dyn Iterator<Item = &[u8]>,
        _ocsp_response: &[u8],
        _now: std::time::SystemTime,
    ) -> Result<ServerCertVerified, TlsError> {
        Ok(ServerCertVerified::assertion())
    }
}
