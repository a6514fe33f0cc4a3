// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Per-profile vault handle.
//!
//! A [`CredentialVault`] owns the decrypted contents of one vault file. The
//! read side serves that plaintext through [`std::io::Read`] with a cursor
//! that only moves forward. The write side hands plaintext to a
//! [`PlaintextSink`], which either re-encrypts it into the vault file or runs
//! the assume-role pipeline, and keeps the resulting credentials.
//!
//! ```text
//! vault file --engine--> body --read--> plaintext --write(sink)--> credentials
//! ```

use std::future::Future;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use crate::engine::Engine;
use crate::errors::VaultError;
use crate::models::AwsCredentials;

/// Consumes plaintext written to a vault and produces the credentials to keep.
pub trait PlaintextSink {
    fn accept(
        &self,
        vault_path: &Path,
        plaintext: &[u8],
    ) -> impl Future<Output = Result<AwsCredentials, VaultError>>;
}

/// Result of [`CredentialVault::write`].
///
/// `consumed` is always the full input length, whether or not the
/// downstream work succeeded.
#[derive(Debug)]
pub struct Written {
    pub consumed: usize,
    pub result: Result<(), VaultError>,
}

impl Written {
    pub fn into_result(self) -> Result<usize, VaultError> {
        self.result.map(|_| self.consumed)
    }
}

pub struct CredentialVault {
    path: PathBuf,
    body: Zeroizing<Vec<u8>>,
    cursor: usize,
    credentials: Option<AwsCredentials>,
}

impl CredentialVault {
    /// An empty vault for `path`, used when creating a vault file.
    pub fn new(path: PathBuf) -> Self {
        Self::from_plaintext(path, Vec::new())
    }

    /// A vault whose read side serves `body`.
    pub fn from_plaintext(path: PathBuf, body: Vec<u8>) -> Self {
        Self {
            path,
            body: Zeroizing::new(body),
            cursor: 0,
            credentials: None,
        }
    }

    /// Reads the vault file and decrypts it in full through `engine`.
    #[tracing::instrument(skip(engine))]
    pub async fn open<E: Engine>(path: PathBuf, engine: &E) -> Result<Self, VaultError> {
        let ciphertext = tokio::fs::read(&path).await?;

        tracing::debug!("[vault] decrypting {} bytes", ciphertext.len());

        let plaintext = engine.decrypt(&ciphertext).await?;

        Ok(Self::from_plaintext(path, plaintext))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes not yet read.
    pub fn remaining(&self) -> usize {
        self.body.len().saturating_sub(self.cursor)
    }

    pub fn credentials(&self) -> Option<&AwsCredentials> {
        self.credentials.as_ref()
    }

    /// Hands the credentials to the caller, leaving the vault empty.
    pub fn take_credentials(&mut self) -> Option<AwsCredentials> {
        self.credentials.take()
    }

    /// Passes `plaintext` to `sink` and stores the credentials it returns.
    ///
    /// On failure the previously held credentials are kept and the error is
    /// returned in [`Written::result`].
    pub async fn write<S: PlaintextSink>(&mut self, sink: &S, plaintext: &[u8]) -> Written {
        let consumed = plaintext.len();

        let result = match sink.accept(&self.path, plaintext).await {
            Ok(credentials) => {
                self.credentials = Some(credentials);
                Ok(())
            }
            Err(err) => {
                tracing::debug!("[vault] write failed: {}", err);
                Err(err)
            }
        };

        Written { consumed, result }
    }
}

impl Read for CredentialVault {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.body.get(self.cursor..).unwrap_or_default();
        let n = remaining.len().min(buf.len());

        buf[..n].copy_from_slice(&remaining[..n]);
        self.cursor += n;

        Ok(n)
    }
}
