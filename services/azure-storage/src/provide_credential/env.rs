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

use async_trait::async_trait;
use blobsign_core::{Context, ProvideCredential, Result};

use crate::{Config, Credential};

/// Load a shared key credential from environment variables.
///
/// - `AZBLOB_ACCOUNT_NAME` or `AZURE_STORAGE_ACCOUNT_NAME`
/// - `AZBLOB_ACCOUNT_KEY` or `AZURE_STORAGE_ACCOUNT_KEY`
#[derive(Debug, Default, Clone)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new env credential provider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let config = Config::default().from_env(ctx);

        match (config.account_name, config.account_key) {
            (Some(account_name), Some(account_key)) => Ok(Some(Credential::with_shared_key(
                &account_name,
                &account_key,
            ))),
            _ => Ok(None),
        }
    }
}
