// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Write-side sinks for [`CredentialVault::write`](crate::vault::CredentialVault::write).
//!
//! - [`AssumeRolePipeline`]: parse the decrypted credentials, load the
//!   profile config and exchange them for role credentials
//! - [`Reencrypt`]: validate credentials and store them encrypted in the
//!   vault file

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::constants::CREDENTIAL_SOURCE_VERSION;
use crate::engine::Engine;
use crate::errors::VaultError;
use crate::exchange::{AssumeRoleExchanger, ExchangeService};
use crate::models::AwsCredentials;
use crate::profile_config::load_profile_config;
use crate::vault::PlaintextSink;

pub struct AssumeRolePipeline<S> {
    profile: String,
    config_path: PathBuf,
    exchanger: AssumeRoleExchanger<S>,
    skip_assume_role: bool,
}

impl<S: ExchangeService> AssumeRolePipeline<S> {
    pub fn new(profile: String, config_path: PathBuf, exchanger: AssumeRoleExchanger<S>) -> Self {
        Self {
            profile,
            config_path,
            exchanger,
            skip_assume_role: false,
        }
    }

    /// Emit the decrypted credentials without loading config or exchanging.
    pub fn skip_assume_role(mut self, skip: bool) -> Self {
        self.skip_assume_role = skip;
        self
    }

    pub fn exchanger(&self) -> &AssumeRoleExchanger<S> {
        &self.exchanger
    }
}

impl<S: ExchangeService> PlaintextSink for AssumeRolePipeline<S> {
    #[tracing::instrument(skip(self, plaintext), fields(profile = %self.profile))]
    async fn accept(
        &self,
        vault_path: &Path,
        plaintext: &[u8],
    ) -> Result<AwsCredentials, VaultError> {
        let source = AwsCredentials::from_slice(plaintext)?;

        if self.skip_assume_role {
            tracing::debug!("[pipeline] skipping assume role");
            return Ok(source);
        }

        if !source.is_complete() {
            tracing::warn!("[pipeline] vault credentials are missing an access key or secret");
        }

        let config = load_profile_config(&self.config_path, &self.profile)?.with_source(source);

        self.exchanger.exchange(config).await
    }
}

/// Encrypts credential JSON into the vault file.
pub struct Reencrypt<'a, E> {
    engine: &'a E,
    recipients: Vec<String>,
}

impl<'a, E: Engine> Reencrypt<'a, E> {
    pub fn new(engine: &'a E, recipients: Vec<String>) -> Self {
        Self { engine, recipients }
    }
}

impl<E: Engine> PlaintextSink for Reencrypt<'_, E> {
    /// Stores the normalized JSON of the parsed credentials, so unknown
    /// fields are dropped and a missing `Version` becomes the current one.
    #[tracing::instrument(skip(self, plaintext))]
    async fn accept(
        &self,
        vault_path: &Path,
        plaintext: &[u8],
    ) -> Result<AwsCredentials, VaultError> {
        let mut credentials = AwsCredentials::from_slice(plaintext)?;
        if !credentials.is_complete() {
            return Err(VaultError::Parse(
                "AccessKeyId and SecretAccessKey are required".to_string(),
            ));
        }
        if credentials.version == 0 {
            credentials.version = CREDENTIAL_SOURCE_VERSION;
        }

        let normalized = zeroize::Zeroizing::new(credentials.to_json()?);
        let ciphertext = self
            .engine
            .encrypt(normalized.as_bytes(), &self.recipients)
            .await?;

        write_vault_file(vault_path, &ciphertext).await?;

        tracing::info!("[pipeline] stored credentials in {:?}", vault_path);

        Ok(credentials)
    }
}

/// Replaces the vault file at `path` through a temporary file in the same
/// directory, so a failed write leaves the previous file intact.
async fn write_vault_file(path: &Path, contents: &[u8]) -> Result<(), VaultError> {
    let path = path.to_path_buf();
    let contents = contents.to_vec();

    tokio::task::spawn_blocking(move || replace_file(&path, &contents))
        .await
        .map_err(|err| VaultError::Io(err.to_string()))?
}

fn replace_file(path: &Path, contents: &[u8]) -> Result<(), VaultError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(dir)?;

    // rename keeps the temporary file's mode, not the replaced file's
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(std::fs::Permissions::from_mode(crate::constants::VAULT_FILE_MODE))?;
    }

    file.write_all(contents)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|err| VaultError::from(err.error))?;

    Ok(())
}
