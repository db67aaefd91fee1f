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

//! Tests against the real Azure endpoints, enabled by `BLOBSIGN_AZURE_STORAGE_TEST=on`.

use blobsign_azure_storage::{ClientSecretCredentialProvider, TokenCache};
use blobsign_core::time::now;
use blobsign_core::{Context, OsEnv};
use blobsign_http_send_reqwest::ReqwestHttpSend;
use log::warn;
use std::env;

fn is_test_enabled() -> bool {
    env::var("BLOBSIGN_AZURE_STORAGE_TEST").unwrap_or_default() == "on"
}

#[tokio::test]
async fn test_client_secret_token() {
    crate::init_logger();
    let _ = dotenv::dotenv();

    if !is_test_enabled() {
        warn!("BLOBSIGN_AZURE_STORAGE_TEST is not set, skipped");
        return;
    }
    if env::var("AZURE_CLIENT_SECRET").unwrap_or_default().is_empty() {
        warn!("AZURE_CLIENT_SECRET is not set, skipped");
        return;
    }

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let cache = TokenCache::new(ctx, ClientSecretCredentialProvider::new());

    let first = cache.get_bearer_token(now()).await.unwrap();
    let second = cache.get_bearer_token(now()).await.unwrap();

    assert!(first.starts_with("Bearer eyJ"));
    assert_eq!(first, second);
}
