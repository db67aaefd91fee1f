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

//! Azure Storage request authorization.
//!
//! This crate produces `Authorization` header values for Azure Blob Storage and ADLS Gen2:
//! - Shared Key signing, see [`sign_shared_key`] and [`RequestSigner`]
//! - Bearer tokens from the OAuth2 client credentials flow, cached by [`TokenCache`]
//!
//! # Example
//!
//! ```rust,no_run
//! use blobsign_azure_storage::{ClientSecretCredentialProvider, TokenCache};
//! use blobsign_core::time::now;
//! use blobsign_core::{Context, OsEnv, Result};
//! use blobsign_http_send_reqwest::ReqwestHttpSend;
//!
//! # async fn example() -> Result<()> {
//! let ctx = Context::new()
//!     .with_http_send(ReqwestHttpSend::default())
//!     .with_env(OsEnv);
//!
//! let provider = ClientSecretCredentialProvider::new()
//!     .with_tenant_id("my-tenant")
//!     .with_client_id("my-client")
//!     .with_client_secret("my-secret");
//! let cache = TokenCache::new(ctx, provider);
//!
//! // `Bearer eyJ0...`
//! let authorization = cache.get_bearer_token(now()).await?;
//!
//! // The storage service answered 401, force a new token next time.
//! cache.clear_token();
//! # Ok(())
//! # }
//! ```

mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod sign_request;
pub use sign_request::{
    canonicalize_headers, canonicalize_resource, sign_shared_key, string_to_sign, RequestSigner,
    SharedKeyFields,
};

mod token_cache;
pub use token_cache::TokenCache;

mod provide_credential;
pub use provide_credential::*;

#[cfg(test)]
mod test_utils;
