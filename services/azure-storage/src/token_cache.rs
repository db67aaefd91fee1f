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

use crate::{Credential, RequestSigner};
use blobsign_core::time::{now, DateTime};
use blobsign_core::{Context, Error, ProvideCredential, Result, Signer};
use http::request::Parts;

/// TokenCache hands out bearer tokens for Azure Storage and fetches a new one only when needed.
///
/// The cached token is reused while its expiry is strictly later than the given instant. A
/// caller that finds no valid token fetches one through the provider. Concurrent callers wait
/// for that fetch and share its result, so at most one request to the token endpoint is in
/// flight per cache.
///
/// Fetching suspends the caller until the [`blobsign_core::HttpSend`] on the context returns.
/// Timeouts are whatever that client is configured with.
///
/// Clones share the same cached token.
#[derive(Clone, Debug)]
pub struct TokenCache {
    signer: Signer<Credential>,
}

impl TokenCache {
    /// Create a new token cache backed by the given provider.
    pub fn new(ctx: Context, provider: impl ProvideCredential<Credential = Credential>) -> Self {
        Self {
            signer: Signer::new(ctx, provider, RequestSigner::new()),
        }
    }

    /// Return `Bearer <token>` for a token valid at `now`.
    ///
    /// A failed fetch leaves the cache as it was, the next call tries again.
    pub async fn get_bearer_token(&self, now: DateTime) -> Result<String> {
        match self.signer.credential_at(now).await? {
            Credential::BearerToken { token, .. } => Ok(format!("Bearer {token}")),
            Credential::SharedKey { .. } => Err(Error::credential_invalid(
                "provider returned a shared key where a bearer token is required",
            )),
        }
    }

    /// Forget the cached token, the next call fetches a new one.
    pub fn clear_token(&self) {
        self.signer.reset();
    }

    /// Set `Authorization` on the request with a token valid now.
    pub async fn sign(&self, req: &mut Parts) -> Result<()> {
        self.sign_at(req, now()).await
    }

    /// Set `Authorization` on the request with a token valid at `now`.
    pub async fn sign_at(&self, req: &mut Parts, now: DateTime) -> Result<()> {
        self.signer.sign_at(req, now).await
    }
}
