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

//! This module binds the `rsa` crate's RSASSA-PKCS1-v1_5 implementation to
//! this crate's [`SignatureProvider`] trait.
//!
//! [`SignatureProvider`]: crate::raw_signature::SignatureProvider

mod asymmetric_signature_provider;
pub use asymmetric_signature_provider::{AsymmetricSignatureProvider, Ownership};
