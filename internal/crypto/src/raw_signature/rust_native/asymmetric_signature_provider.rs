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

use std::{
    fmt,
    str::FromStr,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard},
};

use log::{debug, warn};
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::{
    hash::HashAlgorithm,
    raw_signature::{
        AsymmetricKey, CertificatePrivateKey, KeySizePolicy, SignatureAlgorithm,
        SignatureProvider, SignatureProviderError,
    },
};

/// Describes who is responsible for releasing a provider's private key.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Ownership {
    /// The provider imported its own copy of the key and releases it on
    /// disposal.
    Owned,

    /// The key is shared with the [`CertificateKey`] it came from. Disposing
    /// the provider releases only the provider's reference.
    ///
    /// [`CertificateKey`]: crate::raw_signature::CertificateKey
    Borrowed,
}

struct PrivateKeyHandle {
    key: Arc<RsaPrivateKey>,
    ownership: Ownership,
}

// Everything resolved at construction. Dropped as a unit on disposal.
struct ResolvedContext {
    public_key: RsaPublicKey,
    private_key: Option<PrivateKeyHandle>,
    hash: HashAlgorithm,
}

/// Implements [`SignatureProvider`] for RSA keys using the `rsa` crate's
/// implementation of RSASSA-PKCS1-v1_5.
///
/// The provider is bound to one key, one algorithm, and one intent. Signing
/// providers hold private key material; verifying providers hold only a copy
/// of the public key.
pub struct AsymmetricSignatureProvider {
    alg: SignatureAlgorithm,
    key_type: &'static str,
    key_size_bits: usize,
    will_create_signatures: bool,

    // `None` once disposed. Operations hold the read lock for their duration
    // so disposal waits for them to finish.
    context: RwLock<Option<ResolvedContext>>,
}

impl AsymmetricSignatureProvider {
    /// Bind a provider to `key` and `alg`.
    ///
    /// If `will_create_signatures` is `true` the key must meet the signing
    /// floor of `policy`. Every key must meet the verifying floor. A policy
    /// that fails [`KeySizePolicy::validate`] is rejected.
    pub fn new(
        key: &AsymmetricKey,
        alg: SignatureAlgorithm,
        will_create_signatures: bool,
        policy: &KeySizePolicy,
    ) -> Result<Self, SignatureProviderError> {
        check_key_size(key, will_create_signatures, policy)?;
        Self::resolve(key, alg, will_create_signatures)
    }

    /// Bind a provider to `key` and the algorithm named by `uri`.
    ///
    /// Key size is checked before the identifier, so a weak key is reported
    /// as such even when the identifier is also wrong.
    pub fn from_algorithm_uri(
        key: &AsymmetricKey,
        uri: &str,
        will_create_signatures: bool,
        policy: &KeySizePolicy,
    ) -> Result<Self, SignatureProviderError> {
        check_key_size(key, will_create_signatures, policy)?;

        let alg = SignatureAlgorithm::from_str(uri)
            .map_err(|e| SignatureProviderError::UnsupportedAlgorithm(e.0))?;

        Self::resolve(key, alg, will_create_signatures)
    }

    /// Bind a signing provider using the default [`KeySizePolicy`].
    pub fn for_signing(
        key: &AsymmetricKey,
        alg: SignatureAlgorithm,
    ) -> Result<Self, SignatureProviderError> {
        Self::new(key, alg, true, &KeySizePolicy::default())
    }

    /// Bind a verify-only provider using the default [`KeySizePolicy`].
    pub fn for_verifying(
        key: &AsymmetricKey,
        alg: SignatureAlgorithm,
    ) -> Result<Self, SignatureProviderError> {
        Self::new(key, alg, false, &KeySizePolicy::default())
    }

    fn resolve(
        key: &AsymmetricKey,
        alg: SignatureAlgorithm,
        will_create_signatures: bool,
    ) -> Result<Self, SignatureProviderError> {
        let context = match key {
            AsymmetricKey::Rsa(rsa_key) => {
                let public_key = rsa_key
                    .import_public_key()
                    .map_err(|e| SignatureProviderError::InvalidKey(e.to_string()))?;

                let private_key = if will_create_signatures {
                    rsa_key
                        .import_private_key()
                        .map_err(|e| SignatureProviderError::InvalidKey(e.to_string()))?
                        .map(|key| PrivateKeyHandle {
                            key: Arc::new(key),
                            ownership: Ownership::Owned,
                        })
                } else {
                    None
                };

                ResolvedContext {
                    public_key,
                    private_key,
                    hash: alg.hash_alg(),
                }
            }

            AsymmetricKey::Certificate(cert) => {
                let Some(public_key) = cert.rsa_public_key() else {
                    return Err(SignatureProviderError::UnsupportedKeyType {
                        algorithm: alg.to_string(),
                        key_type: format!(
                            "{} with public key algorithm {}",
                            key.key_type(),
                            cert.public_key_algorithm()
                        ),
                    });
                };

                let private_key = if will_create_signatures {
                    match cert.private_key() {
                        Some(CertificatePrivateKey::Rsa(private_key)) => Some(PrivateKeyHandle {
                            key: Arc::clone(private_key),
                            ownership: Ownership::Borrowed,
                        }),

                        Some(CertificatePrivateKey::Unsupported { algorithm }) => {
                            return Err(SignatureProviderError::UnsupportedKeyType {
                                algorithm: alg.to_string(),
                                key_type: format!(
                                    "{} with private key algorithm {algorithm}",
                                    key.key_type()
                                ),
                            });
                        }

                        None => {
                            return Err(SignatureProviderError::PrivateKeyUnavailable {
                                key_type: key.key_type(),
                            });
                        }
                    }
                } else {
                    None
                };

                ResolvedContext {
                    public_key: public_key.clone(),
                    private_key,
                    hash: alg.hash_alg(),
                }
            }
        };

        debug!(
            "resolved {alg} provider for {} bit {} (hash {}, private key {:?})",
            key.key_size_bits(),
            key.key_type(),
            context.hash,
            context.private_key.as_ref().map(|handle| handle.ownership)
        );

        Ok(Self {
            alg,
            key_type: key.key_type(),
            key_size_bits: key.key_size_bits(),
            will_create_signatures,
            context: RwLock::new(Some(context)),
        })
    }

    /// Return `true` if `algorithm` can be used with an [`RsaKey`].
    ///
    /// [`RsaKey`]: crate::raw_signature::RsaKey
    pub fn is_supported_rsa_algorithm(algorithm: &str) -> bool {
        is_supported(algorithm)
    }

    /// Return `true` if `algorithm` can be used with a [`CertificateKey`]
    /// that carries an RSA key.
    ///
    /// [`CertificateKey`]: crate::raw_signature::CertificateKey
    pub fn is_supported_certificate_algorithm(algorithm: &str) -> bool {
        is_supported(algorithm)
    }

    /// Return the size in bits of the key this provider was bound to.
    pub fn key_size_bits(&self) -> usize {
        self.key_size_bits
    }

    /// Return `true` if this provider was constructed to create signatures.
    pub fn will_create_signatures(&self) -> bool {
        self.will_create_signatures
    }

    /// Return who releases the private key, or `None` if the provider holds
    /// no private key (verify-only, public key only, or disposed).
    pub fn private_key_ownership(&self) -> Option<Ownership> {
        let guard = self.context.read().unwrap_or_else(PoisonError::into_inner);
        guard
            .as_ref()
            .and_then(|context| context.private_key.as_ref())
            .map(|handle| handle.ownership)
    }

    /// Return `true` once [`dispose`] has been called.
    ///
    /// [`dispose`]: SignatureProvider::dispose
    pub fn is_disposed(&self) -> bool {
        self.context
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    fn read_context(
        &self,
    ) -> Result<RwLockReadGuard<'_, Option<ResolvedContext>>, SignatureProviderError> {
        self.context.read().map_err(|_| {
            SignatureProviderError::InternalError("signature provider lock poisoned".to_string())
        })
    }
}

impl SignatureProvider for AsymmetricSignatureProvider {
    fn sign(&self, input: &[u8]) -> Result<Vec<u8>, SignatureProviderError> {
        if input.is_empty() {
            return Err(SignatureProviderError::EmptyInput);
        }

        let guard = self.read_context()?;
        let context = guard
            .as_ref()
            .ok_or(SignatureProviderError::AlreadyDisposed)?;

        let private_key = context.private_key.as_ref().ok_or(
            SignatureProviderError::PrivateKeyUnavailable {
                key_type: self.key_type,
            },
        )?;

        let digest = context.hash.hash(input);
        let mut rng = rand::thread_rng();

        Ok(private_key
            .key
            .sign_with_rng(&mut rng, context.hash.pkcs1v15_scheme(), &digest)?)
    }

    fn verify(&self, input: &[u8], signature: &[u8]) -> Result<bool, SignatureProviderError> {
        if input.is_empty() {
            return Err(SignatureProviderError::EmptyInput);
        }

        if signature.is_empty() {
            return Err(SignatureProviderError::EmptySignature);
        }

        let guard = self.read_context()?;
        let context = guard
            .as_ref()
            .ok_or(SignatureProviderError::AlreadyDisposed)?;

        let digest = context.hash.hash(input);

        match context
            .public_key
            .verify(context.hash.pkcs1v15_scheme(), &digest, signature)
        {
            Ok(()) => Ok(true),
            Err(rsa::Error::Verification) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn is_supported_algorithm(&self, key: &AsymmetricKey, algorithm: &str) -> bool {
        match key {
            AsymmetricKey::Rsa(_) => Self::is_supported_rsa_algorithm(algorithm),
            AsymmetricKey::Certificate(cert) => {
                cert.is_rsa() && Self::is_supported_certificate_algorithm(algorithm)
            }
        }
    }

    fn alg(&self) -> SignatureAlgorithm {
        self.alg
    }

    fn dispose(&self) {
        // A poisoned lock still guards valid state; release it regardless.
        let mut guard = self.context.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(context) = guard.take() {
            debug!(
                "disposed {} provider (private key {:?})",
                self.alg,
                context.private_key.as_ref().map(|handle| handle.ownership)
            );
        }
    }
}

impl fmt::Debug for AsymmetricSignatureProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsymmetricSignatureProvider")
            .field("alg", &self.alg)
            .field("key_type", &self.key_type)
            .field("key_size_bits", &self.key_size_bits)
            .field("will_create_signatures", &self.will_create_signatures)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

fn is_supported(algorithm: &str) -> bool {
    !algorithm.is_empty() && SignatureAlgorithm::from_str(algorithm).is_ok()
}

fn check_key_size(
    key: &AsymmetricKey,
    will_create_signatures: bool,
    policy: &KeySizePolicy,
) -> Result<(), SignatureProviderError> {
    policy.validate()?;

    let key_size = key.key_size_bits();

    if will_create_signatures && key_size < policy.minimum_key_size_for_signing {
        warn!(
            "rejecting {key_size} bit {} for signing (minimum {})",
            key.key_type(),
            policy.minimum_key_size_for_signing
        );

        return Err(SignatureProviderError::KeyTooWeakForSigning {
            key_size,
            key_type: key.key_type(),
            minimum: policy.minimum_key_size_for_signing,
        });
    }

    if key_size < policy.minimum_key_size_for_verifying {
        warn!(
            "rejecting {key_size} bit {} for verifying (minimum {})",
            key.key_type(),
            policy.minimum_key_size_for_verifying
        );

        return Err(SignatureProviderError::KeyTooWeakForVerifying {
            key_size,
            key_type: key.key_type(),
            minimum: policy.minimum_key_size_for_verifying,
        });
    }

    Ok(())
}
