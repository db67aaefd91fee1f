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

use crate::time::{now, DateTime};
use crate::{Context, Error, ProvideCredential, Result, SignRequest, SigningCredential};
use log::debug;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Signer is the main struct used to sign the request.
///
/// It keeps the last credential returned by the provider and only asks the provider again
/// once that credential is no longer valid, or after [`Signer::reset`].
///
/// The credential is stored as one value behind a lock, so readers never observe a token
/// paired with the expiry of another one. Loading is serialized: callers that find the cache
/// invalid at the same time wait for the first load and then reuse its result.
#[derive(Clone, Debug)]
pub struct Signer<K: SigningCredential> {
    ctx: Context,
    loader: Arc<dyn ProvideCredential<Credential = K>>,
    builder: Arc<dyn SignRequest<Credential = K>>,
    credential: Arc<Mutex<Option<K>>>,
    refresh: Arc<async_lock::Mutex<()>>,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer.
    pub fn new(
        ctx: Context,
        loader: impl ProvideCredential<Credential = K>,
        builder: impl SignRequest<Credential = K>,
    ) -> Self {
        Self {
            ctx,

            loader: Arc::new(loader),
            builder: Arc::new(builder),
            credential: Arc::new(Mutex::new(None)),
            refresh: Arc::new(async_lock::Mutex::new(())),
        }
    }

    /// Signing request.
    pub async fn sign(&self, req: &mut http::request::Parts) -> Result<()> {
        self.sign_at(req, now()).await
    }

    /// Signing request, treating `now` as the current time for credential validity.
    pub async fn sign_at(&self, req: &mut http::request::Parts, now: DateTime) -> Result<()> {
        let cred = self.credential_at(now).await?;

        self.builder.sign_request(&self.ctx, req, &cred).await
    }

    /// Return the cached credential if it is valid at `now`, otherwise load a new one.
    ///
    /// The provider is awaited without any timeout of its own. Dropping the returned future
    /// cancels the load and leaves the cache untouched.
    pub async fn credential_at(&self, now: DateTime) -> Result<K> {
        if let Some(cred) = self.cached(now) {
            return Ok(cred);
        }

        let _guard = self.refresh.lock().await;
        // Another caller may have finished loading while we were waiting.
        if let Some(cred) = self.cached(now) {
            return Ok(cred);
        }

        debug!("credential is absent or no longer valid, loading a new one");
        let cred = self
            .loader
            .provide_credential(&self.ctx)
            .await?
            .ok_or_else(|| Error::config_invalid("credential provider is not configured"))?;

        *self.lock() = Some(cred.clone());
        Ok(cred)
    }

    /// Drop the cached credential so the next call loads a fresh one.
    pub fn reset(&self) {
        *self.lock() = None;
    }

    fn cached(&self, now: DateTime) -> Option<K> {
        let cred = self.lock().clone();
        cred.filter(|cred| cred.is_valid_at(now))
    }

    fn lock(&self) -> MutexGuard<'_, Option<K>> {
        // The value is always replaced as a whole, a poisoned lock still holds a consistent one.
        self.credential
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
