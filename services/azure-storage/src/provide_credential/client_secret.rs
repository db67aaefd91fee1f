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

use crate::constants::*;
use crate::{Config, Credential};
use async_trait::async_trait;
use blobsign_core::time::{from_unix_timestamp, DateTime};
use blobsign_core::utils::Redact;
use blobsign_core::{Context, Error, ProvideCredential, Result};
use log::debug;
use serde::Deserialize;
use std::fmt::{Debug, Formatter};

/// Load credential from Azure Client Secret.
///
/// This loader implements the OAuth2 client credentials flow against the Microsoft identity
/// platform v1 endpoint, exchanging a client id and client secret for an access token scoped
/// to Azure Storage.
///
/// Values not set on the provider are taken from `AZURE_TENANT_ID`, `AZURE_CLIENT_ID`,
/// `AZURE_CLIENT_SECRET` and `AZURE_AUTHORITY_HOST`. If any of tenant id, client id or client
/// secret is still missing, the provider returns `Ok(None)`.
///
/// The request is not retried, and it is bounded only by the [`blobsign_core::HttpSend`]
/// configured on the context.
///
/// Reference: <https://learn.microsoft.com/en-us/azure/active-directory/develop/v2-oauth2-client-creds-grant-flow>
#[derive(Default, Clone)]
pub struct ClientSecretCredentialProvider {
    tenant_id: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    authority_host: Option<String>,
}

impl Debug for ClientSecretCredentialProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSecretCredentialProvider")
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

impl ClientSecretCredentialProvider {
    /// Create a new client secret loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client secret loader from config.
    pub fn from_config(config: &Config) -> Self {
        Self {
            tenant_id: config.tenant_id.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            authority_host: config.authority_host.clone(),
        }
    }

    /// Set the Azure tenant ID.
    pub fn with_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    /// Set the Azure client ID.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set the Azure client secret.
    pub fn with_client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Set the authority host URL.
    pub fn with_authority_host(mut self, authority_host: impl Into<String>) -> Self {
        self.authority_host = Some(authority_host.into());
        self
    }
}

#[async_trait]
impl ProvideCredential for ClientSecretCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let config = Config {
            tenant_id: self.tenant_id.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            authority_host: self.authority_host.clone(),
            ..Default::default()
        }
        .from_env(ctx);

        let (Some(tenant_id), Some(client_id), Some(client_secret)) =
            (config.tenant_id, config.client_id, config.client_secret)
        else {
            return Ok(None);
        };
        if tenant_id.is_empty() || client_id.is_empty() || client_secret.is_empty() {
            return Ok(None);
        }

        let authority_host = config
            .authority_host
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| AZURE_PUBLIC_CLOUD.to_string());

        let (token, expires_on) = get_client_secret_token(
            &tenant_id,
            &client_id,
            &client_secret,
            &authority_host,
            ctx,
        )
        .await?;

        Ok(Some(Credential::with_bearer_token(&token, expires_on)))
    }
}

#[derive(Deserialize)]
struct ClientSecretTokenResponse {
    expires_on: Option<ExpiresOn>,
    /// Every other field, `access_token` is matched from here without regard to case.
    #[serde(flatten)]
    fields: serde_json::Map<String, serde_json::Value>,
}

/// The v1 endpoint sends `expires_on` as a string holding epoch seconds, accept numbers too.
#[derive(Deserialize)]
#[serde(untagged)]
enum ExpiresOn {
    Number(i64),
    Text(String),
}

impl ExpiresOn {
    fn to_datetime(&self) -> Result<DateTime> {
        let secs = match self {
            ExpiresOn::Number(v) => *v,
            ExpiresOn::Text(v) => v.trim().parse::<i64>().map_err(|e| {
                Error::authentication_failed(format!("expires_on '{v}' is not an integer"))
                    .with_source(e)
            })?,
        };

        from_unix_timestamp(secs).map_err(|e| {
            Error::authentication_failed("expires_on is out of range").with_source(e)
        })
    }
}

/// Parse the token endpoint response into the access token and its expiry.
fn parse_token_response(body: &[u8]) -> Result<(String, DateTime)> {
    let resp: ClientSecretTokenResponse = serde_json::from_slice(body).map_err(|e| {
        Error::authentication_failed("failed to parse client secret response").with_source(e)
    })?;

    let token = resp
        .fields
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("access_token"))
        .and_then(|(_, v)| v.as_str())
        .ok_or_else(|| {
            Error::authentication_failed("client secret response has no access_token")
        })?;
    let expires_on = resp
        .expires_on
        .ok_or_else(|| Error::authentication_failed("client secret response has no expires_on"))?
        .to_datetime()?;

    Ok((token.to_string(), expires_on))
}

async fn get_client_secret_token(
    tenant_id: &str,
    client_id: &str,
    client_secret: &str,
    authority_host: &str,
    ctx: &Context,
) -> Result<(String, DateTime)> {
    let url = format!(
        "{}/{}/oauth2/token",
        authority_host.trim_end_matches('/'),
        tenant_id
    );

    let body = form_urlencoded::Serializer::new(String::new())
        .append_pair("grant_type", "client_credentials")
        .append_pair("client_id", client_id)
        .append_pair("client_secret", client_secret)
        .append_pair("resource", STORAGE_RESOURCE)
        .finish();

    let req = http::Request::builder()
        .method(http::Method::POST)
        .uri(&url)
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(bytes::Bytes::from(body))
        .map_err(|e| {
            Error::config_invalid(format!("failed to build token request for {url}"))
                .with_source(e)
        })?;

    debug!("requesting access token from {url} for client {client_id}");
    let resp = ctx.http_send(req).await.map_err(|e| {
        Error::authentication_failed("failed to send client secret request").with_source(e)
    })?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = String::from_utf8_lossy(resp.body());
        return Err(Error::authentication_failed(format!(
            "client secret request failed with status {status}: {body}"
        )));
    }

    let (token, expires_on) = parse_token_response(resp.body())?;
    debug!("access token acquired, expires on {expires_on}");

    Ok((token, expires_on))
}
