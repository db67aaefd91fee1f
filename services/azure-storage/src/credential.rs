// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use blobsign_core::time::DateTime;
use blobsign_core::utils::Redact;
use blobsign_core::SigningCredential;
use std::fmt::{Debug, Formatter};

/// Credential enum for the supported Azure Storage authentication methods.
#[derive(Clone)]
pub enum Credential {
    /// Shared Key authentication with account name and key
    SharedKey {
        /// Azure storage account name.
        account_name: String,
        /// Azure storage account key, base64 encoded.
        account_key: String,
    },
    /// Bearer token for OAuth authentication
    ///
    /// A token always travels together with the expiry it was issued with.
    BearerToken {
        /// Bearer token.
        token: String,
        /// Expiration time for this credential.
        expires_on: DateTime,
    },
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::SharedKey {
                account_name,
                account_key,
            } => f
                .debug_struct("Credential::SharedKey")
                .field("account_name", account_name)
                .field("account_key", &Redact::from(account_key))
                .finish(),
            Credential::BearerToken { token, expires_on } => f
                .debug_struct("Credential::BearerToken")
                .field("token", &Redact::from(token))
                .field("expires_on", expires_on)
                .finish(),
        }
    }
}

impl SigningCredential for Credential {
    fn is_valid_at(&self, now: DateTime) -> bool {
        match self {
            Credential::SharedKey {
                account_name,
                account_key,
            } => !account_name.is_empty() && !account_key.is_empty(),
            Credential::BearerToken { token, expires_on } => !token.is_empty() && *expires_on > now,
        }
    }
}

impl Credential {
    /// Create a new credential with shared key authentication.
    pub fn with_shared_key(account_name: &str, account_key: &str) -> Self {
        Self::SharedKey {
            account_name: account_name.to_string(),
            account_key: account_key.to_string(),
        }
    }

    /// Create a new credential with bearer token authentication.
    pub fn with_bearer_token(bearer_token: &str, expires_on: DateTime) -> Self {
        Self::BearerToken {
            token: bearer_token.to_string(),
            expires_on,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone, Utc};

    #[test]
    fn test_bearer_token_validity_is_strict() {
        let expires_on = Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap();
        let cred = Credential::with_bearer_token("abc", expires_on);

        assert!(cred.is_valid_at(expires_on - TimeDelta::try_seconds(1).unwrap()));
        assert!(!cred.is_valid_at(expires_on));
        assert!(!Credential::with_bearer_token("", expires_on)
            .is_valid_at(expires_on - TimeDelta::try_hours(1).unwrap()));
    }

    #[test]
    fn test_shared_key_validity() {
        let now = Utc::now();
        assert!(Credential::with_shared_key("acct", "a2V5").is_valid_at(now));
        assert!(!Credential::with_shared_key("acct", "").is_valid_at(now));
    }

    #[test]
    fn test_debug_redacts_token() {
        let cred = Credential::with_bearer_token(
            "eyJ0eXAiOiJKV1QiLCJhbGciOiJSUzI1NiJ9",
            Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap(),
        );

        let s = format!("{cred:?}");
        assert!(s.contains("eyJ0***"));
        assert!(!s.contains("JSUzI1NiJ9"));
    }
}
