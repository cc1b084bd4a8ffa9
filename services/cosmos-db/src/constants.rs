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

// Headers used in cosmos db requests and responses.
pub const X_MS_DATE: &str = "x-ms-date";
pub const X_MS_VERSION: &str = "x-ms-version";
pub const X_MS_CONTINUATION: &str = "x-ms-continuation";
pub const X_MS_MAX_ITEM_COUNT: &str = "x-ms-max-item-count";
pub const X_MS_DOCUMENTDB_ISQUERY: &str = "x-ms-documentdb-isquery";
pub const X_MS_DOCUMENTDB_QUERY_ENABLECROSSPARTITION: &str =
    "x-ms-documentdb-query-enablecrosspartition";
pub const X_MS_DOCUMENTDB_PARTITIONKEY: &str = "x-ms-documentdb-partitionkey";
pub const X_MS_DOCUMENTDB_IS_UPSERT: &str = "x-ms-documentdb-is-upsert";

/// REST API version sent with every request.
pub const API_VERSION: &str = "2020-11-05";

pub const CONTENT_TYPE_QUERY_JSON: &str = "application/query+json";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Boolean header values are spelled the way the service documents them.
pub const HEADER_TRUE: &str = "True";

// Master key token fields.
pub const MASTER_TOKEN_TYPE: &str = "master";
pub const MASTER_TOKEN_VERSION: &str = "1.0";

// Resource types.
pub const RESOURCE_DOCS: &str = "docs";

// Env values used by cosmos db config.
pub const COSMOS_ENDPOINT_URI: &str = "COSMOS_ENDPOINT_URI";
pub const COSMOS_MASTER_KEY: &str = "COSMOS_MASTER_KEY";
pub const COSMOS_DATABASE: &str = "COSMOS_DATABASE";
pub const ENDPOINT_URI: &str = "ENDPOINT_URI";
pub const MASTER_KEY: &str = "MASTER_KEY";
pub const DATABASE: &str = "DATABASE";

/// AsciiSet used for the authorization token and for document ids in the path.
///
/// - Encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', and '~'.
pub static COSMOS_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
