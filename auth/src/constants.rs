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

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Headers used by the bce-auth-v1 scheme.
pub const X_BCE_DATE: &str = "x-bce-date";
pub const X_BCE_SECURITY_TOKEN: &str = "x-bce-security-token";
pub const X_BCE_PREFIX: &str = "x-bce-";

// Env values used for credential resolution.
pub const BCE_ACCESS_KEY_ID: &str = "BCE_ACCESS_KEY_ID";
pub const BCE_SECRET_ACCESS_KEY: &str = "BCE_SECRET_ACCESS_KEY";
pub const BCE_SESSION_TOKEN: &str = "BCE_SESSION_TOKEN";
pub const BCE_PROFILE: &str = "BCE_PROFILE";
pub const BCE_CREDENTIALS_FILE: &str = "BCE_CREDENTIALS_FILE";

/// AsciiSet for the canonical URI encoding rule:
///
/// - URI encode every byte except the unreserved characters: 'A'-'Z',
///   'a'-'z', '0'-'9', '-', '.', '_', and '~'.
pub static BCE_QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Same rule as [`BCE_QUERY_ENCODE_SET`] but preserving `/`, used for the
/// canonical path.
pub static BCE_PATH_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
