// Copyright 2025 Adobe. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.

// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

//! Key material accepted by the signature providers.

use std::{fmt, sync::Arc};

use asn1_rs::FromDer;
use rsa::{
    pkcs1::ALGORITHM_OID as RSA_OID,
    pkcs8::{
        der::{pem::PemLabel, SecretDocument},
        DecodePrivateKey, PrivateKeyInfo,
    },
    traits::{PrivateKeyParts, PublicKeyParts},
    BigUint, RsaPrivateKey, RsaPublicKey,
};
use thiserror::Error;
use x509_parser::{
    pem::Pem, prelude::X509Certificate, public_key::PublicKey, x509::SubjectPublicKeyInfo,
};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Largest RSA modulus, in bits, accepted when importing a public key.
pub const MAX_RSA_KEY_SIZE_BITS: usize = 16384;

/// An asymmetric key that a signature provider can be bound to.
#[derive(Clone, Debug)]
pub enum AsymmetricKey {
    /// Raw RSA parameters.
    Rsa(RsaKey),

    /// Key material embedded in an X.509 certificate.
    Certificate(CertificateKey),
}

impl AsymmetricKey {
    /// Return the size of the key's modulus (or curve) in bits.
    pub fn key_size_bits(&self) -> usize {
        match self {
            Self::Rsa(key) => key.key_size_bits(),
            Self::Certificate(key) => key.key_size_bits(),
        }
    }

    /// Return a short name for the kind of key, for diagnostics.
    pub fn key_type(&self) -> &'static str {
        match self {
            Self::Rsa(_) => "RsaKey",
            Self::Certificate(_) => "CertificateKey",
        }
    }

    /// Return `true` if private key material is available.
    pub fn has_private_key(&self) -> bool {
        match self {
            Self::Rsa(key) => key.has_private_key(),
            Self::Certificate(key) => key.private_key().is_some(),
        }
    }
}

impl From<RsaKey> for AsymmetricKey {
    fn from(key: RsaKey) -> Self {
        Self::Rsa(key)
    }
}

impl From<CertificateKey> for AsymmetricKey {
    fn from(key: CertificateKey) -> Self {
        Self::Certificate(key)
    }
}

/// Public RSA parameters, optionally with the private half.
///
/// All integers are unsigned big-endian byte strings.
#[derive(Clone, Debug, Default)]
pub struct RsaParameters {
    /// Modulus (`n`).
    pub modulus: Vec<u8>,

    /// Public exponent (`e`).
    pub exponent: Vec<u8>,

    /// Private exponent and prime factors, if this is a private key.
    pub private: Option<RsaPrivateParameters>,
}

/// Private RSA parameters. Cleared from memory when dropped.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct RsaPrivateParameters {
    /// Private exponent (`d`).
    pub private_exponent: Vec<u8>,

    /// Prime factors of the modulus. The CRT values are derived from these
    /// when the key is imported.
    pub primes: Vec<Vec<u8>>,
}

impl fmt::Debug for RsaPrivateParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPrivateParameters")
            .field("primes", &self.primes.len())
            .finish_non_exhaustive()
    }
}

/// An RSA key described by its raw parameters.
///
/// The parameters are copied into a fresh RSA context each time a provider is
/// constructed from this key.
#[derive(Clone, Debug)]
pub struct RsaKey {
    parameters: RsaParameters,
    key_size_bits: usize,
}

impl RsaKey {
    /// Create a key from raw parameters.
    pub fn from_parameters(parameters: RsaParameters) -> Result<Self, KeyError> {
        if parameters.modulus.is_empty() {
            return Err(KeyError::InvalidPublicKey("modulus is empty".to_string()));
        }

        if parameters.exponent.is_empty() {
            return Err(KeyError::InvalidPublicKey("exponent is empty".to_string()));
        }

        if let Some(private) = &parameters.private {
            if private.private_exponent.is_empty() {
                return Err(KeyError::InvalidPrivateKey(
                    "private exponent is empty".to_string(),
                ));
            }
        }

        let key_size_bits = BigUint::from_bytes_be(&parameters.modulus).bits();

        Ok(Self {
            parameters,
            key_size_bits,
        })
    }

    /// Read a PKCS#8 DER-encoded RSA private key.
    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self, KeyError> {
        let key = RsaPrivateKey::from_pkcs8_der(der)
            .map_err(|e| KeyError::InvalidPrivateKey(e.to_string()))?;

        Self::from_parameters(private_parameters(&key))
    }

    /// Read a PKCS#8 PEM-encoded RSA private key.
    pub fn from_pkcs8_pem(pem: &str) -> Result<Self, KeyError> {
        let key = RsaPrivateKey::from_pkcs8_pem(pem)
            .map_err(|e| KeyError::InvalidPrivateKey(e.to_string()))?;

        Self::from_parameters(private_parameters(&key))
    }

    /// Read a DER-encoded `SubjectPublicKeyInfo` holding an RSA public key.
    pub fn from_public_key_der(der: &[u8]) -> Result<Self, KeyError> {
        let (_, spki) = SubjectPublicKeyInfo::from_der(der)
            .map_err(|e| KeyError::InvalidPublicKey(e.to_string()))?;

        let key = rsa_public_key_from_spki(&spki)?;
        Self::from_parameters(public_parameters(&key))
    }

    /// Read a PEM-encoded `SubjectPublicKeyInfo` holding an RSA public key.
    pub fn from_public_key_pem(pem: &str) -> Result<Self, KeyError> {
        let pem = Pem::iter_from_buffer(pem.as_bytes())
            .next()
            .ok_or_else(|| KeyError::InvalidPublicKey("no PEM block found".to_string()))?
            .map_err(|e| KeyError::InvalidPublicKey(e.to_string()))?;

        if pem.label != "PUBLIC KEY" {
            return Err(KeyError::InvalidPublicKey(format!(
                "unexpected PEM label ({})",
                pem.label
            )));
        }

        Self::from_public_key_der(&pem.contents)
    }

    /// Return the raw parameters of this key.
    pub fn parameters(&self) -> &RsaParameters {
        &self.parameters
    }

    /// Return the bit length of the modulus.
    pub fn key_size_bits(&self) -> usize {
        self.key_size_bits
    }

    /// Return `true` if the private parameters are present.
    pub fn has_private_key(&self) -> bool {
        self.parameters.private.is_some()
    }

    pub(crate) fn import_public_key(&self) -> rsa::Result<RsaPublicKey> {
        new_rsa_public_key(
            BigUint::from_bytes_be(&self.parameters.modulus),
            BigUint::from_bytes_be(&self.parameters.exponent),
        )
    }

    pub(crate) fn import_private_key(&self) -> rsa::Result<Option<RsaPrivateKey>> {
        let Some(private) = &self.parameters.private else {
            return Ok(None);
        };

        let primes = private
            .primes
            .iter()
            .map(|p| BigUint::from_bytes_be(p))
            .collect();

        RsaPrivateKey::from_components(
            BigUint::from_bytes_be(&self.parameters.modulus),
            BigUint::from_bytes_be(&self.parameters.exponent),
            BigUint::from_bytes_be(&private.private_exponent),
            primes,
        )
        .map(Some)
    }
}

// `RsaPublicKey::new` caps the modulus at 4096 bits; larger keys are valid.
fn new_rsa_public_key(n: BigUint, e: BigUint) -> rsa::Result<RsaPublicKey> {
    RsaPublicKey::new_with_max_size(n, e, MAX_RSA_KEY_SIZE_BITS)
}

fn rsa_public_key_from_spki(spki: &SubjectPublicKeyInfo<'_>) -> Result<RsaPublicKey, KeyError> {
    let parsed = spki
        .parsed()
        .map_err(|e| KeyError::InvalidPublicKey(e.to_string()))?;

    let PublicKey::RSA(rsa_key) = parsed else {
        return Err(KeyError::InvalidPublicKey(
            "not an RSA public key".to_string(),
        ));
    };

    new_rsa_public_key(
        BigUint::from_bytes_be(rsa_key.modulus),
        BigUint::from_bytes_be(rsa_key.exponent),
    )
    .map_err(|e| KeyError::InvalidPublicKey(e.to_string()))
}

fn public_parameters(key: &RsaPublicKey) -> RsaParameters {
    RsaParameters {
        modulus: key.n().to_bytes_be(),
        exponent: key.e().to_bytes_be(),
        private: None,
    }
}

fn private_parameters(key: &RsaPrivateKey) -> RsaParameters {
    RsaParameters {
        modulus: key.n().to_bytes_be(),
        exponent: key.e().to_bytes_be(),
        private: Some(RsaPrivateParameters {
            private_exponent: key.d().to_bytes_be(),
            primes: key.primes().iter().map(|p| p.to_bytes_be()).collect(),
        }),
    }
}

/// Private key material loaded alongside a certificate.
#[derive(Clone)]
pub enum CertificatePrivateKey {
    /// An RSA private key. Providers share this key rather than copying it.
    Rsa(Arc<RsaPrivateKey>),

    /// A private key of some other algorithm, identified by OID.
    Unsupported {
        /// Dotted OID of the key algorithm.
        algorithm: String,
    },
}

impl fmt::Debug for CertificatePrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rsa(key) => f
                .debug_tuple("Rsa")
                .field(&format_args!("{} bits", key.n().bits()))
                .finish(),
            Self::Unsupported { algorithm } => f
                .debug_struct("Unsupported")
                .field("algorithm", algorithm)
                .finish(),
        }
    }
}

/// Key material taken from an X.509 certificate.
///
/// The public key is always present. A private key is present only if one was
/// attached with [`with_private_key_der`] or [`with_private_key_pem`].
///
/// [`with_private_key_der`]: Self::with_private_key_der
/// [`with_private_key_pem`]: Self::with_private_key_pem
#[derive(Clone, Debug)]
pub struct CertificateKey {
    certificate: Vec<u8>,
    public_key_algorithm: String,
    rsa_public_key: Option<RsaPublicKey>,
    key_size_bits: usize,
    private_key: Option<CertificatePrivateKey>,
}

impl CertificateKey {
    /// Read a DER-encoded X.509 certificate.
    pub fn from_der(der: &[u8]) -> Result<Self, KeyError> {
        let (_, cert) = X509Certificate::from_der(der)
            .map_err(|e| KeyError::InvalidCertificate(e.to_string()))?;

        let spki = cert.public_key();
        let public_key_algorithm = spki.algorithm.algorithm.to_id_string();

        let (rsa_public_key, key_size_bits) = if public_key_algorithm == RSA_OID.to_string() {
            let key = rsa_public_key_from_spki(spki)?;
            let bits = key.n().bits();
            (Some(key), bits)
        } else {
            let parsed = spki
                .parsed()
                .map_err(|e| KeyError::InvalidPublicKey(e.to_string()))?;
            (None, parsed.key_size())
        };

        Ok(Self {
            certificate: der.to_vec(),
            public_key_algorithm,
            rsa_public_key,
            key_size_bits,
            private_key: None,
        })
    }

    /// Read the first certificate from a PEM buffer.
    pub fn from_pem(pem: &[u8]) -> Result<Self, KeyError> {
        let pem = Pem::iter_from_buffer(pem)
            .next()
            .ok_or_else(|| KeyError::InvalidCertificate("no PEM block found".to_string()))?
            .map_err(|e| KeyError::InvalidCertificate(e.to_string()))?;

        Self::from_der(&pem.contents)
    }

    /// Attach a PKCS#8 DER-encoded private key.
    ///
    /// RSA keys must correspond to the certificate's public key. Keys of other
    /// algorithms are retained but cannot be used for RSA signing.
    pub fn with_private_key_der(mut self, der: &[u8]) -> Result<Self, KeyError> {
        let pki = PrivateKeyInfo::try_from(der)
            .map_err(|e| KeyError::InvalidPrivateKey(e.to_string()))?;

        if pki.algorithm.oid != RSA_OID {
            self.private_key = Some(CertificatePrivateKey::Unsupported {
                algorithm: pki.algorithm.oid.to_string(),
            });
            return Ok(self);
        }

        let private_key = RsaPrivateKey::from_pkcs8_der(der)
            .map_err(|e| KeyError::InvalidPrivateKey(e.to_string()))?;

        if self.rsa_public_key.as_ref() != Some(&private_key.to_public_key()) {
            return Err(KeyError::KeyMismatch);
        }

        self.private_key = Some(CertificatePrivateKey::Rsa(Arc::new(private_key)));
        Ok(self)
    }

    /// Attach a PKCS#8 PEM-encoded private key.
    pub fn with_private_key_pem(self, pem: &str) -> Result<Self, KeyError> {
        let (label, der) = SecretDocument::from_pem(pem)
            .map_err(|e| KeyError::InvalidPrivateKey(e.to_string()))?;

        PrivateKeyInfo::validate_pem_label(label)
            .map_err(|e| KeyError::InvalidPrivateKey(e.to_string()))?;

        self.with_private_key_der(der.as_bytes())
    }

    /// Return the DER encoding of the certificate.
    pub fn certificate_der(&self) -> &[u8] {
        &self.certificate
    }

    /// Return the dotted OID of the certificate's public key algorithm.
    pub fn public_key_algorithm(&self) -> &str {
        &self.public_key_algorithm
    }

    /// Return `true` if the certificate carries an RSA public key.
    pub fn is_rsa(&self) -> bool {
        self.rsa_public_key.is_some()
    }

    /// Return the size of the certificate's public key in bits.
    pub fn key_size_bits(&self) -> usize {
        self.key_size_bits
    }

    /// Return the attached private key, if any.
    pub fn private_key(&self) -> Option<&CertificatePrivateKey> {
        self.private_key.as_ref()
    }

    pub(crate) fn rsa_public_key(&self) -> Option<&RsaPublicKey> {
        self.rsa_public_key.as_ref()
    }
}

/// Describes errors that can be identified when loading key material.
#[derive(Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum KeyError {
    /// The certificate could not be parsed.
    #[error("invalid certificate ({0})")]
    InvalidCertificate(String),

    /// The private key could not be parsed.
    #[error("invalid private key ({0})")]
    InvalidPrivateKey(String),

    /// The public key could not be parsed.
    #[error("invalid public key ({0})")]
    InvalidPublicKey(String),

    /// The private key does not belong to the certificate's public key.
    #[error("private key does not match the certificate's public key")]
    KeyMismatch,
}
