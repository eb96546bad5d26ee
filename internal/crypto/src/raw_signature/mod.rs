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

//! Tools for creating and checking raw RSA signatures.

mod key;
pub use key::{
    AsymmetricKey, CertificateKey, CertificatePrivateKey, KeyError, RsaKey, RsaParameters,
    RsaPrivateParameters, MAX_RSA_KEY_SIZE_BITS,
};

mod key_size_policy;
pub use key_size_policy::{
    KeySizePolicy, KeySizePolicyError, DEFAULT_MINIMUM_KEY_SIZE_FOR_SIGNING,
    DEFAULT_MINIMUM_KEY_SIZE_FOR_VERIFYING,
};

mod provider;
pub use provider::{SignatureProvider, SignatureProviderError};

pub mod rust_native;
pub use rust_native::{AsymmetricSignatureProvider, Ownership};

mod signing_alg;
pub use signing_alg::{SignatureAlgorithm, UnknownAlgorithmError};
