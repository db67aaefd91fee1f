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

//! Sign a few blob requests with Shared Key, then with a bearer token.
//!
//! Shared Key uses `AZURE_STORAGE_ACCOUNT_NAME` and `AZURE_STORAGE_ACCOUNT_KEY`, the bearer
//! token uses `AZURE_TENANT_ID`, `AZURE_CLIENT_ID` and `AZURE_CLIENT_SECRET`. Without them the
//! example signs with a demo key and skips the token.

use blobsign_azure_storage::{
    ClientSecretCredentialProvider, Config, Credential, EnvCredentialProvider, RequestSigner,
    StaticCredentialProvider, TokenCache,
};
use blobsign_core::time::now;
use blobsign_core::{Context, OsEnv, Result, Signer};
use blobsign_http_send_reqwest::ReqwestHttpSend;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

const DEMO_ACCOUNT: &str = "devstoreaccount1";
const DEMO_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let config = Config::default().from_env(&ctx);

    let account = config
        .account_name
        .clone()
        .unwrap_or_else(|| DEMO_ACCOUNT.to_string());
    let signer: Signer<Credential> = if config.account_key.is_some() {
        Signer::new(ctx.clone(), EnvCredentialProvider::new(), RequestSigner::new())
    } else {
        println!("No account key found, signing with the demo key");
        Signer::new(
            ctx.clone(),
            StaticCredentialProvider::new_shared_key(&account, DEMO_KEY),
            RequestSigner::new(),
        )
    };

    let blob = utf8_percent_encode("reports/2024 q1.csv", NON_ALPHANUMERIC);
    for url in [
        format!("https://{account}.blob.core.windows.net/?comp=list"),
        format!("https://{account}.blob.core.windows.net/data?restype=container&comp=list&prefix=reports%2F"),
        format!("https://{account}.blob.core.windows.net/data/{blob}"),
    ] {
        let mut parts = http::Request::get(&url)
            .header("x-ms-version", "2021-08-06")
            .body(())?
            .into_parts()
            .0;
        signer.sign(&mut parts).await?;

        println!("GET {url}");
        println!("  x-ms-date: {:?}", parts.headers["x-ms-date"]);
        println!("  authorization: {:?}", parts.headers["authorization"]);
    }

    if config.client_secret.is_none() {
        println!("No client secret found, skipping bearer token");
        return Ok(());
    }

    let cache = TokenCache::new(ctx, ClientSecretCredentialProvider::from_config(&config));
    let token = cache.get_bearer_token(now()).await?;
    println!("bearer token acquired: {}...", &token[..token.len().min(16)]);

    Ok(())
}
