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
use crate::Credential;
use async_trait::async_trait;
use blobsign_core::hash::{base64_decode, base64_hmac_sha256};
use blobsign_core::time::{format_http_date, now, parse_http_date, DateTime};
use blobsign_core::{Context, Error, Result, SignRequest, SigningRequest};
use http::header::{self, HeaderName};
use http::request::Parts;
use http::HeaderValue;
use log::debug;
use std::fmt::Write;

/// The fixed set of standard headers covered by a Shared Key signature.
///
/// Every field occupies one line of the string to sign whether it is set or not; an unset
/// field only leaves its line empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedKeyFields {
    /// `Content-Encoding`
    pub content_encoding: Option<String>,
    /// `Content-Language`
    pub content_language: Option<String>,
    /// `Content-Length`
    pub content_length: Option<u64>,
    /// `Content-MD5`
    pub content_md5: Option<String>,
    /// `Content-Type`
    pub content_type: Option<String>,
    /// `Date`
    pub date: Option<DateTime>,
    /// `If-Modified-Since`
    pub if_modified_since: Option<DateTime>,
    /// `If-Match`
    pub if_match: Option<String>,
    /// `If-None-Match`
    pub if_none_match: Option<String>,
    /// `If-Unmodified-Since`
    pub if_unmodified_since: Option<DateTime>,
    /// `Range`
    pub range: Option<String>,
}

impl SharedKeyFields {
    /// Read the fields from the headers of a request.
    ///
    /// `Content-Length: 0` is treated as absent, the service expects an empty line for requests
    /// without a body.
    pub fn from_request(req: &SigningRequest) -> Result<Self> {
        let text = |name: &HeaderName| -> Result<Option<String>> {
            Ok(req.header_get(name)?.map(str::to_string))
        };
        let date = |name: &HeaderName| -> Result<Option<DateTime>> {
            req.header_get(name)?.map(parse_http_date).transpose()
        };

        let content_length = match req.header_get(&header::CONTENT_LENGTH)? {
            None | Some("0") => None,
            Some(v) => Some(v.trim().parse::<u64>().map_err(|e| {
                Error::request_invalid(format!("content-length '{v}' is not a number"))
                    .with_source(e)
            })?),
        };

        Ok(SharedKeyFields {
            content_encoding: text(&header::CONTENT_ENCODING)?,
            content_language: text(&header::CONTENT_LANGUAGE)?,
            content_length,
            content_md5: text(&HeaderName::from_static(CONTENT_MD5))?,
            content_type: text(&header::CONTENT_TYPE)?,
            date: date(&header::DATE)?,
            if_modified_since: date(&header::IF_MODIFIED_SINCE)?,
            if_match: text(&header::IF_MATCH)?,
            if_none_match: text(&header::IF_NONE_MATCH)?,
            if_unmodified_since: date(&header::IF_UNMODIFIED_SINCE)?,
            range: text(&header::RANGE)?,
        })
    }
}

/// RequestSigner that implement Azure Storage Shared Key Authorization.
///
/// - [Authorize with Shared Key](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key)
///
/// Bearer credentials are applied as `Authorization: Bearer <token>`.
#[derive(Debug)]
pub struct RequestSigner {
    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new builder for Azure Storage signer.
    pub fn new() -> Self {
        Self { time: None }
    }

    /// Specify the time used for the `x-ms-date` header.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }
}

impl Default for RequestSigner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        credential: &Self::Credential,
    ) -> Result<()> {
        // The service rejects requests that carry neither `x-ms-date` nor `Date`.
        if !req.headers.contains_key(X_MS_DATE) && !req.headers.contains_key(header::DATE) {
            let now_time = self.time.unwrap_or_else(now);
            req.headers
                .insert(X_MS_DATE, format_http_date(now_time).parse()?);
        }

        let authorization = match credential {
            Credential::SharedKey {
                account_name,
                account_key,
            } => {
                let signing_req = SigningRequest::build(req)?;
                let fields = SharedKeyFields::from_request(&signing_req)?;
                sign_shared_key(&signing_req, &fields, account_name, account_key)?
            }
            Credential::BearerToken { token, .. } => format!("Bearer {token}"),
        };

        let mut value: HeaderValue = authorization.parse()?;
        value.set_sensitive(true);
        req.headers.insert(header::AUTHORIZATION, value);

        Ok(())
    }
}

/// Compute the `Authorization` header value for Shared Key authorization.
///
/// Returns `SharedKey <account_name>:<signature>`. This is a pure function of its inputs.
pub fn sign_shared_key(
    req: &SigningRequest,
    fields: &SharedKeyFields,
    account_name: &str,
    account_key: &str,
) -> Result<String> {
    let string_to_sign = string_to_sign(req, fields, account_name)?;
    let key = base64_decode(account_key)?;
    let signature = base64_hmac_sha256(&key, string_to_sign.as_bytes());

    Ok(format!("SharedKey {account_name}:{signature}"))
}

/// Construct string to sign
///
/// ## Format
///
/// ```text
/// VERB + "\n" +
/// Content-Encoding + "\n" +
/// Content-Language + "\n" +
/// Content-Length + "\n" +
/// Content-MD5 + "\n" +
/// Content-Type + "\n" +
/// Date + "\n" +
/// If-Modified-Since + "\n" +
/// If-Match + "\n" +
/// If-None-Match + "\n" +
/// If-Unmodified-Since + "\n" +
/// Range + "\n" +
/// CanonicalizedHeaders + "\n" +
/// CanonicalizedResource;
/// ```
///
/// ## Reference
///
/// - [Blob, Queue, and File Services (Shared Key authorization)](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key)
pub fn string_to_sign(
    req: &SigningRequest,
    fields: &SharedKeyFields,
    account_name: &str,
) -> Result<String> {
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    let date = |v: &Option<DateTime>| v.map(format_http_date).unwrap_or_default();

    let mut s = String::with_capacity(256);

    writeln!(&mut s, "{}", req.method.as_str())?;
    writeln!(&mut s, "{}", text(&fields.content_encoding))?;
    writeln!(&mut s, "{}", text(&fields.content_language))?;
    writeln!(
        &mut s,
        "{}",
        fields
            .content_length
            .map(|v| v.to_string())
            .unwrap_or_default()
    )?;
    writeln!(&mut s, "{}", text(&fields.content_md5))?;
    writeln!(&mut s, "{}", text(&fields.content_type))?;
    writeln!(&mut s, "{}", date(&fields.date))?;
    writeln!(&mut s, "{}", date(&fields.if_modified_since))?;
    writeln!(&mut s, "{}", text(&fields.if_match))?;
    writeln!(&mut s, "{}", text(&fields.if_none_match))?;
    writeln!(&mut s, "{}", date(&fields.if_unmodified_since))?;
    writeln!(&mut s, "{}", text(&fields.range))?;
    writeln!(&mut s, "{}", canonicalize_headers(req)?)?;
    write!(&mut s, "{}", canonicalize_resource(req, account_name))?;

    debug!("string to sign: {}", &s);

    Ok(s)
}

/// Render every `x-ms-` header as `name:value`, sorted by name and joined with `\n`.
///
/// ## Reference
///
/// - [Constructing the canonicalized headers string](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key#constructing-the-canonicalized-headers-string)
pub fn canonicalize_headers(req: &SigningRequest) -> Result<String> {
    Ok(SigningRequest::pairs_to_string(
        req.header_to_vec_with_prefix(X_MS_PREFIX)?,
        ":",
        "\n",
    ))
}

/// `/<account><path>` followed by one `\n<name>:<value>` line per query parameter.
///
/// Repeated names share one line with their values joined by `,`. Parameters with an empty
/// name are not signed.
///
/// ## Reference
///
/// - [Constructing the canonicalized resource string](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key#constructing-the-canonicalized-resource-string)
pub fn canonicalize_resource(req: &SigningRequest, account_name: &str) -> String {
    let mut s = format!("/{}{}", account_name, req.path);

    for (k, v) in req.query_to_vec_grouped() {
        s.push('\n');
        s.push_str(&k);
        s.push(':');
        s.push_str(&v);
    }

    s
}
