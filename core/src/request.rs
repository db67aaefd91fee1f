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

use std::collections::BTreeMap;

use http::header::HeaderName;
use http::HeaderMap;
use http::Method;

use crate::{Error, Result};

/// Signing view of a request.
///
/// Built once from `http::request::Parts` and never mutated afterwards, so the same value can
/// be signed any number of times with identical results.
#[derive(Debug, Clone)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP path, exactly as it appears in the uri (still percent encoded).
    pub path: String,
    /// HTTP query parameters, percent decoded with `+` treated as space.
    pub query: Vec<(String, String)>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing request from http::request::Parts.
    pub fn build(parts: &http::request::Parts) -> Result<Self> {
        let path = match parts.uri.path() {
            "" => "/".to_string(),
            v => v.to_string(),
        };

        Ok(SigningRequest {
            method: parts.method.clone(),
            path,
            query: parts
                .uri
                .query()
                .map(|v| {
                    form_urlencoded::parse(v.as_bytes())
                        .map(|(k, v)| (k.into_owned(), v.into_owned()))
                        .collect()
                })
                .unwrap_or_default(),
            headers: parts.headers.clone(),
        })
    }

    /// Query parameters with one entry per distinct name, sorted by name.
    ///
    /// Values of repeated names are joined with `,` in the order they appear. Parameters without
    /// a name are dropped.
    pub fn query_to_vec_grouped(&self) -> Vec<(String, String)> {
        let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (k, v) in self.query.iter().filter(|(k, _)| !k.is_empty()) {
            grouped.entry(k.as_str()).or_default().push(v.as_str());
        }

        grouped
            .into_iter()
            .map(|(k, vs)| (k.to_string(), vs.join(",")))
            .collect()
    }

    /// Get the single value of a header.
    ///
    /// - Returns `Ok(None)` if header not found.
    /// - Returns an error if the header carries more than one value or is not visible ASCII.
    pub fn header_get(&self, key: &HeaderName) -> Result<Option<&str>> {
        let mut values = self.headers.get_all(key).iter();
        let Some(value) = values.next() else {
            return Ok(None);
        };
        if values.next().is_some() {
            return Err(Error::request_invalid(format!(
                "header {key} must have exactly one value"
            )));
        }

        Ok(Some(value.to_str()?))
    }

    /// Get header value by name.
    ///
    /// Returns empty string if header not found.
    #[inline]
    pub fn header_get_or_default(&self, key: &HeaderName) -> Result<&str> {
        Ok(self.header_get(key)?.unwrap_or_default())
    }

    /// Get headers with given prefix.
    ///
    /// Every matching header must carry exactly one value.
    pub fn header_to_vec_with_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>> {
        self.headers
            .keys()
            // Filter all header that starts with prefix
            .filter(|k| k.as_str().starts_with(prefix))
            .map(|k| {
                let v = self.header_get_or_default(k)?;
                Ok((k.as_str().to_string(), v.to_string()))
            })
            .collect()
    }

    /// Convert pairs to string sorted by name.
    ///
    /// ```shell
    /// [(c, d), (a, b)] => "a:b\nc:d"
    /// ```
    pub fn pairs_to_string(mut pairs: Vec<(String, String)>, sep: &str, join: &str) -> String {
        let mut s = String::with_capacity(16);

        // Sort via name, byte by byte.
        pairs.sort();

        for (idx, (k, v)) in pairs.into_iter().enumerate() {
            if idx != 0 {
                s.push_str(join);
            }

            s.push_str(&k);
            s.push_str(sep);
            s.push_str(&v);
        }

        s
    }
}
