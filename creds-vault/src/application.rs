// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! The two commands of the binary, wired against an [`Engine`].
//!
//! - [`Application::get`]: profile, vault file, decrypt, assume role,
//!   `credential_process` JSON
//! - [`Application::store`]: profile, vault file (created if missing),
//!   validate, encrypt

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use zeroize::Zeroizing;

use crate::configuration::{GetOptions, StoreOptions};
use crate::engine::Engine;
use crate::errors::VaultError;
use crate::exchange::{AssumeRoleExchanger, ExchangeService, MfaTokenProvider};
use crate::paths;
use crate::pipeline::{AssumeRolePipeline, Reencrypt};
use crate::profile::resolve_profile;
use crate::vault::CredentialVault;

type EnvLookup = Box<dyn Fn(&str) -> Option<String>>;

pub struct Application<E> {
    vault_dir: PathBuf,
    engine: E,
    env: EnvLookup,
}

impl<E: Engine> Application<E> {
    /// Creates the vault directory if missing.
    pub fn build(vault_dir: PathBuf, engine: E) -> Result<Self, VaultError> {
        paths::ensure_vault_dir(&vault_dir)?;

        tracing::debug!("[application] vault directory {:?}", vault_dir);

        Ok(Self {
            vault_dir,
            engine,
            env: Box::new(|key| std::env::var(key).ok()),
        })
    }

    /// Replaces the process environment for profile lookup.
    pub fn with_env<F>(mut self, env: F) -> Self
    where
        F: Fn(&str) -> Option<String> + 'static,
    {
        self.env = Box::new(env);
        self
    }

    pub fn vault_dir(&self) -> &Path {
        &self.vault_dir
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    fn resolve_profile(&self, argument: Option<&str>) -> Result<String, VaultError> {
        resolve_profile(argument, &self.env)
    }

    /// Decrypts the profile's vault file and returns the credentials to print.
    ///
    /// `connect` builds the exchange service for the resolved profile.
    #[tracing::instrument(skip_all)]
    pub async fn get<S, C>(
        &self,
        options: &GetOptions,
        connect: C,
        token_provider: Option<Arc<dyn MfaTokenProvider>>,
    ) -> Result<Zeroizing<String>, VaultError>
    where
        S: ExchangeService,
        C: FnOnce(&str) -> S,
    {
        let profile = self.resolve_profile(options.profile.as_deref())?;
        let path = paths::vault_file_path(&self.vault_dir, &profile, || {
            self.resolve_profile(None)
        })?;

        let mut vault = CredentialVault::open(path, &self.engine).await?;
        let mut plaintext = Zeroizing::new(Vec::with_capacity(vault.remaining()));
        vault.read_to_end(&mut plaintext)?;

        let config_path = paths::config_file_path(options.config_file.as_deref())?;
        let exchanger = AssumeRoleExchanger::new(
            connect(&profile),
            token_provider,
            Duration::from_secs(options.duration_seconds),
        );
        let pipeline = AssumeRolePipeline::new(profile, config_path, exchanger)
            .skip_assume_role(options.skip_assume_role);

        vault.write(&pipeline, &plaintext).await.into_result()?;

        let credentials = vault
            .take_credentials()
            .ok_or(VaultError::MissingSourceCredential)?;

        Ok(Zeroizing::new(credentials.to_json()?))
    }

    /// Encrypts `plaintext` into the profile's vault file, replacing any
    /// existing one. Returns the number of bytes consumed.
    #[tracing::instrument(skip_all)]
    pub async fn store(&self, options: &StoreOptions, plaintext: &[u8]) -> Result<usize, VaultError> {
        let profile = self.resolve_profile(options.profile.as_deref())?;
        let path = match paths::vault_file_path(&self.vault_dir, &profile, || {
            self.resolve_profile(None)
        }) {
            Ok(path) => {
                tracing::warn!("[application] replacing {:?}", path);
                path
            }
            Err(VaultError::VaultFileNotFound(path)) => path,
            Err(err) => return Err(err),
        };

        let mut vault = CredentialVault::new(path);
        let sink = Reencrypt::new(&self.engine, options.recipient.clone());
        let consumed = vault.write(&sink, plaintext).await.into_result()?;

        tracing::debug!("[application] encrypted {} bytes for {}", consumed, profile);

        Ok(consumed)
    }
}
