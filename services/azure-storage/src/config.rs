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

use blobsign_core::utils::Redact;
use blobsign_core::Context;
use std::fmt::{Debug, Formatter};

use crate::constants::*;

/// Config carries all the configuration for Azure Storage authorization.
#[derive(Clone, Default)]
#[cfg_attr(test, derive(PartialEq))]
pub struct Config {
    /// `account_name` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZBLOB_ACCOUNT_NAME`] or [`AZURE_STORAGE_ACCOUNT_NAME`]
    pub account_name: Option<String>,
    /// `account_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZBLOB_ACCOUNT_KEY`] or [`AZURE_STORAGE_ACCOUNT_KEY`]
    pub account_key: Option<String>,
    /// `tenant_id` value will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_TENANT_ID`]
    pub tenant_id: Option<String>,
    /// `client_id` value will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_CLIENT_ID`]
    pub client_id: Option<String>,
    /// `client_secret` value will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_CLIENT_SECRET`]
    pub client_secret: Option<String>,
    /// `authority_host` value will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_AUTHORITY_HOST`]
    ///
    /// Token requests fall back to `https://login.microsoftonline.com` when unset.
    pub authority_host: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("account_name", &self.account_name)
            .field("account_key", &self.account_key.as_ref().map(Redact::from))
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(Redact::from),
            )
            .field("authority_host", &self.authority_host)
            .finish()
    }
}

impl Config {
    /// Fill every unset field from the environment of `ctx`.
    ///
    /// Empty environment values are ignored.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        let get = |keys: &[&str]| ctx.env_var_first(keys);

        self.account_name = self
            .account_name
            .or_else(|| get(&[AZBLOB_ACCOUNT_NAME, AZURE_STORAGE_ACCOUNT_NAME]));
        self.account_key = self
            .account_key
            .or_else(|| get(&[AZBLOB_ACCOUNT_KEY, AZURE_STORAGE_ACCOUNT_KEY]));
        self.tenant_id = self.tenant_id.or_else(|| get(&[AZURE_TENANT_ID]));
        self.client_id = self.client_id.or_else(|| get(&[AZURE_CLIENT_ID]));
        self.client_secret = self.client_secret.or_else(|| get(&[AZURE_CLIENT_SECRET]));
        self.authority_host = self.authority_host.or_else(|| get(&[AZURE_AUTHORITY_HOST]));

        self
    }
}
