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

use cloudauth_core::utils::Redact;
use cloudauth_core::{Error, Result};
use std::fmt::{Debug, Formatter};

/// Credential holds the static key pair and the signing scope.
///
/// It is read-only once handed to a provider.
#[derive(Default, Clone)]
pub struct Credential {
    /// Access key id for aws services.
    pub access_key_id: String,
    /// Secret access key for aws services.
    pub secret_access_key: String,
    /// Session token for temporary (STS) credentials.
    pub session_token: Option<String>,
    /// Region the requests are signed for, like `us-east-1`.
    pub region: String,
    /// Service the requests are signed for, like `s3`.
    pub service: String,
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("session_token", &Redact::from(&self.session_token))
            .field("region", &self.region)
            .field("service", &self.service)
            .finish()
    }
}

impl Credential {
    /// Create a credential for the given scope.
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
            region: region.into(),
            service: service.into(),
        }
    }

    /// Attach a session token.
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Check that every field needed for signing is present.
    ///
    /// Region and service become path segments of the credential scope,
    /// so they must not contain `/`.
    pub fn validate(&self) -> Result<()> {
        if self.access_key_id.is_empty() {
            return Err(Error::config_invalid("access_key_id is required"));
        }
        if self.secret_access_key.is_empty() {
            return Err(Error::config_invalid("secret_access_key is required"));
        }
        for (name, value) in [("region", &self.region), ("service", &self.service)] {
            if value.is_empty() {
                return Err(Error::config_invalid(format!("{name} is required")));
            }
            if value.contains('/') || value.chars().any(char::is_whitespace) {
                return Err(Error::config_invalid(format!(
                    "{name} must not contain '/' or whitespace: {value}"
                )));
            }
        }
        if matches!(&self.session_token, Some(token) if token.is_empty()) {
            return Err(Error::config_invalid("session_token must not be empty"));
        }
        Ok(())
    }
}
