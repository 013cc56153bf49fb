//! # TLS Configuration
//!
//! TLS certificate and private key loading for HTTPS serving.

use std::io;

use rustls::pki_types::pem::PemObject as _;

/// Load certificates from a PEM file.
pub fn load_certs(path: &str) -> io::Result<Vec<rustls::pki_types::CertificateDer<'static>>> {
    let cert_pem = std::fs::read(path)?;
    let mut certs = Vec::new();
    for cert in rustls::pki_types::CertificateDer::pem_slice_iter(&cert_pem) {
        certs.push(cert.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?);
    }
    if certs.is_empty() {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "No certificates found in file"));
    }
    Ok(certs)
}

/// Load a private key from a PEM file.
pub fn load_private_key(path: &str) -> io::Result<rustls::pki_types::PrivateKeyDer<'static>> {
    let key_pem = std::fs::read(path)?;
    rustls::pki_types::PrivateKeyDer::from_pem_slice(&key_pem)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
