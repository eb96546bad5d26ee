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

use std::{fmt, str::FromStr};

#[cfg(feature = "json_schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::hash::HashAlgorithm;

const RSA_SHA1: &str = "http://www.w3.org/2000/09/xmldsig#rsa-sha1";
const RSA_SHA256: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256";
const RSA_SHA384: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha384";
const RSA_SHA512: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha512";

/// Describes the RSA signature algorithms a token signature provider can use.
///
/// Each algorithm is identified by its XML-DSig URI. Identifiers are matched
/// exactly: no case folding or other normalization is applied.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "json_schema", derive(JsonSchema))]
pub enum SignatureAlgorithm {
    /// RSASSA-PKCS1-v1_5 using SHA-1
    #[serde(rename = "http://www.w3.org/2000/09/xmldsig#rsa-sha1")]
    RsaSha1,

    /// RSASSA-PKCS1-v1_5 using SHA-256
    #[serde(rename = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256")]
    RsaSha256,

    /// RSASSA-PKCS1-v1_5 using SHA-384
    #[serde(rename = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha384")]
    RsaSha384,

    /// RSASSA-PKCS1-v1_5 using SHA-512
    #[serde(rename = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha512")]
    RsaSha512,
}

impl SignatureAlgorithm {
    /// Return every supported algorithm.
    pub fn all() -> [Self; 4] {
        [Self::RsaSha1, Self::RsaSha256, Self::RsaSha384, Self::RsaSha512]
    }

    /// Return the identifier URI for this algorithm.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RsaSha1 => RSA_SHA1,
            Self::RsaSha256 => RSA_SHA256,
            Self::RsaSha384 => RSA_SHA384,
            Self::RsaSha512 => RSA_SHA512,
        }
    }

    /// Return the hash function this algorithm signs with.
    pub fn hash_alg(&self) -> HashAlgorithm {
        match self {
            Self::RsaSha1 => HashAlgorithm::Sha1,
            Self::RsaSha256 => HashAlgorithm::Sha256,
            Self::RsaSha384 => HashAlgorithm::Sha384,
            Self::RsaSha512 => HashAlgorithm::Sha512,
        }
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = UnknownAlgorithmError;

    fn from_str(alg: &str) -> Result<Self, Self::Err> {
        match alg {
            RSA_SHA1 => Ok(Self::RsaSha1),
            RSA_SHA256 => Ok(Self::RsaSha256),
            RSA_SHA384 => Ok(Self::RsaSha384),
            RSA_SHA512 => Ok(Self::RsaSha512),
            _ => Err(UnknownAlgorithmError(alg.to_owned())),
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq)]
/// This error is thrown when converting from a string to
/// [`SignatureAlgorithm`] if the algorithm identifier is unrecognized.
pub struct UnknownAlgorithmError(pub String);

impl fmt::Display for UnknownAlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "UnknownAlgorithmError({})", self.0)
    }
}

impl std::error::Error for UnknownAlgorithmError {}
