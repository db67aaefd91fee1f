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

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use blobsign_azure_storage::{
    sign_shared_key, string_to_sign, RequestSigner, SharedKeyFields, StaticCredentialProvider,
};
use blobsign_core::{Context, Signer, SigningRequest};
use chrono::{TimeZone, Utc};
use hmac::{Hmac, Mac};
use pretty_assertions::assert_eq;
use sha2::Sha256;

const ACCOUNT: &str = "myaccount";
const ACCOUNT_KEY: &str = "AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8=";

fn expected_authorization(lines: &[&str]) -> String {
    let key = STANDARD.decode(ACCOUNT_KEY).unwrap();
    let mut mac = Hmac::<Sha256>::new_from_slice(&key).unwrap();
    mac.update(lines.join("\n").as_bytes());
    let signature = STANDARD.encode(mac.finalize().into_bytes());

    format!("SharedKey {ACCOUNT}:{signature}")
}

fn signer() -> Signer<blobsign_azure_storage::Credential> {
    let time = Utc.with_ymd_and_hms(1994, 11, 15, 8, 12, 31).unwrap();
    Signer::new(
        Context::new(),
        StaticCredentialProvider::new_shared_key(ACCOUNT, ACCOUNT_KEY),
        RequestSigner::new().with_time(time),
    )
}

#[tokio::test]
async fn test_put_block() {
    crate::init_logger();

    let mut parts = http::Request::put(
        "https://myaccount.blob.core.windows.net/mycontainer/my%20blob.txt?timeout=30&comp=block&blockid=AAAA",
    )
    .header("content-type", "text/plain")
    .header("content-length", "11")
    .header("x-ms-version", "2021-08-06")
    .header("x-ms-blob-type", "BlockBlob")
    .body(())
    .unwrap()
    .into_parts()
    .0;

    signer().sign(&mut parts).await.unwrap();

    let expected = expected_authorization(&[
        "PUT",
        "",
        "",
        "11",
        "",
        "text/plain",
        "",
        "",
        "",
        "",
        "",
        "",
        "x-ms-blob-type:BlockBlob",
        "x-ms-date:Tue, 15 Nov 1994 08:12:31 GMT",
        "x-ms-version:2021-08-06",
        "/myaccount/mycontainer/my%20blob.txt",
        "blockid:AAAA",
        "comp:block",
        "timeout:30",
    ]);
    assert_eq!(parts.headers["x-ms-date"], "Tue, 15 Nov 1994 08:12:31 GMT");
    assert_eq!(parts.headers["authorization"], expected.as_str());
}

#[tokio::test]
async fn test_list_blobs_with_repeated_query() {
    let mut parts = http::Request::get(
        "https://myaccount.blob.core.windows.net/mycontainer?restype=container&comp=list&include=snapshots&include=metadata&prefix=a%2Fb",
    )
    .header("x-ms-version", "2021-08-06")
    .header("date", "Tue, 15 Nov 1994 08:12:31 GMT")
    .body(())
    .unwrap()
    .into_parts()
    .0;

    signer().sign(&mut parts).await.unwrap();

    // `Date` is signed in its own line and no `x-ms-date` is added.
    let expected = expected_authorization(&[
        "GET",
        "",
        "",
        "",
        "",
        "",
        "Tue, 15 Nov 1994 08:12:31 GMT",
        "",
        "",
        "",
        "",
        "",
        "x-ms-version:2021-08-06",
        "/myaccount/mycontainer",
        "comp:list",
        "include:snapshots,metadata",
        "prefix:a/b",
        "restype:container",
    ]);
    assert!(!parts.headers.contains_key("x-ms-date"));
    assert_eq!(parts.headers["authorization"], expected.as_str());
}

#[test]
fn test_sign_shared_key_with_explicit_fields() {
    let parts = http::Request::put("https://myaccount.blob.core.windows.net/mycontainer/empty")
        .header("x-ms-date", "Tue, 15 Nov 1994 08:12:31 GMT")
        .body(())
        .unwrap()
        .into_parts()
        .0;
    let req = SigningRequest::build(&parts).unwrap();
    let fields = SharedKeyFields {
        content_length: Some(0),
        range: Some("bytes=0-9".to_string()),
        ..Default::default()
    };

    let lines = [
        "PUT",
        "",
        "",
        "0",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        "bytes=0-9",
        "x-ms-date:Tue, 15 Nov 1994 08:12:31 GMT",
        "/myaccount/mycontainer/empty",
    ];
    assert_eq!(
        string_to_sign(&req, &fields, ACCOUNT).unwrap(),
        lines.join("\n")
    );

    let first = sign_shared_key(&req, &fields, ACCOUNT, ACCOUNT_KEY).unwrap();
    let second = sign_shared_key(&req, &fields, ACCOUNT, ACCOUNT_KEY).unwrap();
    assert_eq!(first, expected_authorization(&lines));
    assert_eq!(first, second);
}
