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

//! Tokio-based file reading implementation for cloudauth.
//!
//! This crate provides `TokioFileRead`, an async file reader that implements
//! the `FileRead` trait from `cloudauth_core` using Tokio's file system operations.
//! The Google provider uses it to load service account key files.
//!
//! ## Example
//!
//! ```no_run
//! use cloudauth_core::Context;
//! use cloudauth_file_read_tokio::TokioFileRead;
//!
//! #[tokio::main]
//! async fn main() {
//!     let ctx = Context::new().with_file_read(TokioFileRead);
//!
//!     match ctx.file_read("/path/to/service-account.json").await {
//!         Ok(content) => println!("Read {} bytes", content.len()),
//!         Err(e) => eprintln!("Failed to read file: {}", e),
//!     }
//! }
//! ```

use async_trait::async_trait;
use cloudauth_core::{Error, FileRead, Result};

/// Tokio-based implementation of the `FileRead` trait.
///
/// This struct provides async file reading capabilities using Tokio's
/// file system operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileRead;

#[async_trait]
impl FileRead for TokioFileRead {
    async fn file_read(&self, path: &str) -> Result<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .map_err(|e| Error::unexpected(format!("failed to read file {path}")).with_source(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_read_existing_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"{\"client_email\":\"a@b\"}").unwrap();

        let content = TokioFileRead
            .file_read(f.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(content, b"{\"client_email\":\"a@b\"}");
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let err = TokioFileRead
            .file_read(path.to_str().unwrap())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }
}
