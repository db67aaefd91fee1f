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

use crate::TokenEndpoint;
use blobsign_azure_storage::{ClientSecretCredentialProvider, TokenCache};
use blobsign_core::time::from_unix_timestamp;
use blobsign_core::{Context, ErrorKind, StaticEnv};
use http::StatusCode;
use pretty_assertions::assert_eq;
use std::time::Duration;

const EXPIRES_ON: i64 = 1_700_000_000;

fn token_cache(endpoint: &TokenEndpoint) -> TokenCache {
    crate::init_logger();

    let ctx = Context::new()
        .with_http_send(endpoint.clone())
        .with_env(
            StaticEnv::default()
                .with_var("AZURE_TENANT_ID", "tenant")
                .with_var("AZURE_CLIENT_ID", "client")
                .with_var("AZURE_CLIENT_SECRET", "secret"),
        );
    TokenCache::new(ctx, ClientSecretCredentialProvider::new())
}

#[tokio::test]
async fn test_token_lifecycle() {
    let endpoint = TokenEndpoint::default()
        .with_token("first", EXPIRES_ON)
        .with_token("second", EXPIRES_ON + 3600)
        .with_token("third", EXPIRES_ON + 3600);
    let cache = token_cache(&endpoint);

    let before = from_unix_timestamp(EXPIRES_ON - 1).unwrap();
    let after = from_unix_timestamp(EXPIRES_ON + 1).unwrap();

    assert_eq!(cache.get_bearer_token(before).await.unwrap(), "Bearer first");
    assert_eq!(cache.get_bearer_token(before).await.unwrap(), "Bearer first");
    assert_eq!(endpoint.calls(), 1);

    assert_eq!(cache.get_bearer_token(after).await.unwrap(), "Bearer second");
    assert_eq!(cache.get_bearer_token(after).await.unwrap(), "Bearer second");
    assert_eq!(endpoint.calls(), 2);

    cache.clear_token();
    assert_eq!(cache.get_bearer_token(after).await.unwrap(), "Bearer third");
    assert_eq!(endpoint.calls(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_tasks_trigger_one_fetch() {
    let endpoint = TokenEndpoint::default()
        .with_delay(Duration::from_millis(100))
        .with_token("shared", EXPIRES_ON);
    let cache = token_cache(&endpoint);
    let now = from_unix_timestamp(EXPIRES_ON - 600).unwrap();

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let cache = cache.clone();
            tokio::spawn(async move { cache.get_bearer_token(now).await })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap(), "Bearer shared");
    }
    assert_eq!(endpoint.calls(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_clear_token_during_fetch() {
    let endpoint = TokenEndpoint::default()
        .with_delay(Duration::from_millis(50))
        .with_token("t1", EXPIRES_ON)
        .with_token("t2", EXPIRES_ON);
    let cache = token_cache(&endpoint);
    let now = from_unix_timestamp(EXPIRES_ON - 600).unwrap();

    let first = {
        let cache = cache.clone();
        tokio::spawn(async move { cache.get_bearer_token(now).await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    cache.clear_token();

    // Waits for the fetch already in flight and reuses its token.
    let second = cache.get_bearer_token(now).await.unwrap();
    let first = first.await.unwrap().unwrap();

    assert_eq!(first, "Bearer t1");
    assert_eq!(second, "Bearer t1");
    assert_eq!(endpoint.calls(), 1);

    cache.clear_token();
    assert_eq!(cache.get_bearer_token(now).await.unwrap(), "Bearer t2");
    assert_eq!(endpoint.calls(), 2);
}

#[tokio::test]
async fn test_rejected_credentials() {
    let endpoint = TokenEndpoint::default().with_response(
        StatusCode::UNAUTHORIZED,
        r#"{"error":"invalid_client","error_description":"AADSTS7000215: Invalid client secret provided."}"#,
    );
    let cache = token_cache(&endpoint);

    let err = cache
        .get_bearer_token(from_unix_timestamp(EXPIRES_ON).unwrap())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
    assert!(err.is_authentication_error());
    assert!(err.to_string().contains("401"));
}

#[tokio::test]
async fn test_malformed_token_response() {
    let endpoint = TokenEndpoint::default()
        .with_response(StatusCode::OK, r#"{"token_type":"Bearer","expires_on":"1700000000"}"#);
    let cache = token_cache(&endpoint);

    let err = cache
        .get_bearer_token(from_unix_timestamp(0).unwrap())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
}
