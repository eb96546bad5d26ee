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

#[cfg(feature = "json_schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum key size, in bits, for a key used to create signatures.
pub const DEFAULT_MINIMUM_KEY_SIZE_FOR_SIGNING: usize = 2048;

/// Minimum key size, in bits, for a key used to verify signatures.
pub const DEFAULT_MINIMUM_KEY_SIZE_FOR_VERIFYING: usize = 1024;

/// Minimum key strength required when constructing a signature provider.
///
/// The floors are consulted only while a provider is being constructed. Hosts
/// typically embed this in their own settings; fields omitted from a settings
/// file fall back to the defaults.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[cfg_attr(feature = "json_schema", derive(JsonSchema))]
#[serde(default)]
pub struct KeySizePolicy {
    /// Minimum key size in bits for a provider that creates signatures.
    ///
    /// The default value is 2048.
    pub minimum_key_size_for_signing: usize,

    /// Minimum key size in bits for any provider, including providers that
    /// create signatures.
    ///
    /// The default value is 1024.
    pub minimum_key_size_for_verifying: usize,
}

impl KeySizePolicy {
    /// Return a copy of this policy with a different signing floor.
    pub fn with_minimum_key_size_for_signing(mut self, bits: usize) -> Self {
        self.minimum_key_size_for_signing = bits;
        self
    }

    /// Return a copy of this policy with a different verifying floor.
    pub fn with_minimum_key_size_for_verifying(mut self, bits: usize) -> Self {
        self.minimum_key_size_for_verifying = bits;
        self
    }

    /// Return an error if the floors contradict each other.
    ///
    /// Signing providers are held to both floors, so a verifying floor above
    /// the signing floor silently raises the signing requirement.
    pub fn validate(&self) -> Result<(), KeySizePolicyError> {
        if self.minimum_key_size_for_verifying > self.minimum_key_size_for_signing {
            return Err(KeySizePolicyError::VerifyingFloorAboveSigningFloor {
                signing: self.minimum_key_size_for_signing,
                verifying: self.minimum_key_size_for_verifying,
            });
        }

        Ok(())
    }
}

impl Default for KeySizePolicy {
    fn default() -> Self {
        Self {
            minimum_key_size_for_signing: DEFAULT_MINIMUM_KEY_SIZE_FOR_SIGNING,
            minimum_key_size_for_verifying: DEFAULT_MINIMUM_KEY_SIZE_FOR_VERIFYING,
        }
    }
}

/// Describes errors that can be identified when checking a [`KeySizePolicy`].
#[derive(Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum KeySizePolicyError {
    /// The verifying floor is larger than the signing floor.
    #[error("minimum key size for verifying ({verifying} bits) exceeds minimum key size for signing ({signing} bits)")]
    VerifyingFloorAboveSigningFloor {
        /// Configured signing floor.
        signing: usize,

        /// Configured verifying floor.
        verifying: usize,
    },
}
