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

use crate::raw_signature::{KeySizePolicy, KeySizePolicyError};

#[test]
fn defaults() {
    let policy = KeySizePolicy::default();

    assert_eq!(policy.minimum_key_size_for_signing, 2048);
    assert_eq!(policy.minimum_key_size_for_verifying, 1024);
    assert!(policy.validate().is_ok());
}

#[test]
fn partial_settings_fall_back_to_defaults() {
    let policy: KeySizePolicy =
        serde_json::from_str(r#"{"minimum_key_size_for_signing": 3072}"#).unwrap();

    assert_eq!(policy.minimum_key_size_for_signing, 3072);
    assert_eq!(policy.minimum_key_size_for_verifying, 1024);

    let policy: KeySizePolicy = serde_json::from_str("{}").unwrap();
    assert_eq!(policy, KeySizePolicy::default());
}

#[test]
fn builders() {
    let policy = KeySizePolicy::default()
        .with_minimum_key_size_for_signing(4096)
        .with_minimum_key_size_for_verifying(2048);

    assert_eq!(policy.minimum_key_size_for_signing, 4096);
    assert_eq!(policy.minimum_key_size_for_verifying, 2048);
}

#[test]
fn verifying_floor_above_signing_floor() {
    let policy = KeySizePolicy::default().with_minimum_key_size_for_verifying(4096);

    assert_eq!(
        policy.validate(),
        Err(KeySizePolicyError::VerifyingFloorAboveSigningFloor {
            signing: 2048,
            verifying: 4096,
        })
    );
}
