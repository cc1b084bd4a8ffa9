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

use cosmos_rest_core::utils::Redact;
use cosmos_rest_core::SigningCredential;
use std::fmt::{Debug, Formatter};

/// Credential that holds the account master key.
///
/// The key is kept in its base64 form; it's decoded when a request is signed so
/// a malformed key surfaces as a credential error on first use.
#[derive(Clone, Default)]
pub struct Credential {
    /// Base64 encoded master key of the Cosmos DB account.
    pub master_key: String,
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("master_key", &Redact::from(&self.master_key))
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.master_key.is_empty()
    }
}

impl Credential {
    /// Create a new credential with the given master key.
    pub fn with_master_key(master_key: impl Into<String>) -> Self {
        Self {
            master_key: master_key.into(),
        }
    }
}
