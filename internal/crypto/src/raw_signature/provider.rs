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

use thiserror::Error;

use crate::raw_signature::{AsymmetricKey, KeySizePolicyError, SignatureAlgorithm};

/// Implementations of the `SignatureProvider` trait create and check
/// cryptographic signatures over arbitrary byte arrays using one key, one
/// algorithm, and one intent (signing or verification only).
///
/// A provider may be shared between threads. Once [`dispose`] has been called
/// every further [`sign`] or [`verify`] call fails with
/// [`SignatureProviderError::AlreadyDisposed`].
///
/// [`dispose`]: Self::dispose
/// [`sign`]: Self::sign
/// [`verify`]: Self::verify
pub trait SignatureProvider: Send + Sync {
    /// Return a signature over the input byte slice.
    fn sign(&self, input: &[u8]) -> Result<Vec<u8>, SignatureProviderError>;

    /// Return `Ok(true)` if `signature` is a valid signature of `input`.
    ///
    /// A well-formed request whose signature does not match returns
    /// `Ok(false)`. Errors are reserved for invalid requests and
    /// configuration problems.
    fn verify(&self, input: &[u8], signature: &[u8]) -> Result<bool, SignatureProviderError>;

    /// Return `true` if this kind of provider can use `algorithm` with `key`.
    fn is_supported_algorithm(&self, key: &AsymmetricKey, algorithm: &str) -> bool;

    /// Return the algorithm implemented by this provider.
    fn alg(&self) -> SignatureAlgorithm;

    /// Release the key material and hash binding held by this provider.
    ///
    /// Calling this more than once has no further effect.
    fn dispose(&self);
}

/// Describes errors that can be identified when constructing or using a
/// signature provider.
#[derive(Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum SignatureProviderError {
    /// The key is too small to create signatures.
    #[error("{key_type} of {key_size} bits is below the minimum of {minimum} bits for creating signatures")]
    KeyTooWeakForSigning {
        /// Size of the rejected key in bits.
        key_size: usize,

        /// Kind of the rejected key.
        key_type: &'static str,

        /// Configured minimum in bits.
        minimum: usize,
    },

    /// The key is too small to verify signatures.
    #[error("{key_type} of {key_size} bits is below the minimum of {minimum} bits for verifying signatures")]
    KeyTooWeakForVerifying {
        /// Size of the rejected key in bits.
        key_size: usize,

        /// Kind of the rejected key.
        key_type: &'static str,

        /// Configured minimum in bits.
        minimum: usize,
    },

    /// The key size policy is contradictory.
    #[error(transparent)]
    InvalidKeySizePolicy(#[from] KeySizePolicyError),

    /// The key does not hold RSA key material usable with the algorithm.
    #[error("algorithm {algorithm} is not supported for key type {key_type}")]
    UnsupportedKeyType {
        /// The requested algorithm.
        algorithm: String,

        /// Description of the key that was supplied.
        key_type: String,
    },

    /// The algorithm identifier is not recognized.
    #[error("unsupported signature algorithm ({0})")]
    UnsupportedAlgorithm(String),

    /// The input to sign or verify is empty.
    #[error("input is empty")]
    EmptyInput,

    /// The signature to verify is empty.
    #[error("signature is empty")]
    EmptySignature,

    /// The provider has already been disposed.
    #[error("signature provider has been disposed")]
    AlreadyDisposed,

    /// Signing requires private key material that is not available.
    #[error("{key_type} does not provide an RSA private key")]
    PrivateKeyUnavailable {
        /// Kind of the key that was supplied.
        key_type: &'static str,
    },

    /// The key material could not be imported.
    #[error("invalid key ({0})")]
    InvalidKey(String),

    /// An error was reported by the underlying cryptography implementation.
    #[error("an error was reported by the cryptography library: {0}")]
    CryptoLibraryError(String),

    /// An unexpected internal error occured.
    #[error("internal error ({0})")]
    InternalError(String),
}

impl From<rsa::Error> for SignatureProviderError {
    fn from(err: rsa::Error) -> Self {
        Self::CryptoLibraryError(err.to_string())
    }
}
