// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Filesystem locations.
//!
//! ```text
//! <home>/.aws/config                  AWS CLI config (or $AWS_CONFIG_FILE)
//! <home>/.aws/creds-vault/            vault directory, mode 0700
//! <home>/.aws/creds-vault/<profile>   encrypted credentials for one profile
//! <home>/.aws/creds-vault/vault.log   encryption engine diagnostics, mode 0640
//! ```

use std::path::{Component, Path, PathBuf};

use crate::constants::{DEFAULT_CONFIG_FILE, VAULT_DIR, VAULT_LOG_FILE};
use crate::errors::VaultError;

pub fn home_dir() -> Result<PathBuf, VaultError> {
    dirs::home_dir().ok_or(VaultError::HomeDirNotFound)
}

pub fn vault_dir() -> Result<PathBuf, VaultError> {
    Ok(home_dir()?.join(VAULT_DIR))
}

/// Creates the vault directory (and parents) if missing.
///
/// An existing directory keeps its permissions.
pub fn ensure_vault_dir(dir: &Path) -> Result<(), VaultError> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(crate::constants::VAULT_DIR_MODE);
    }

    builder.create(dir)?;

    Ok(())
}

/// Joins `profile` onto the vault directory.
///
/// An empty `profile` is resolved through `resolve`. When the file does not
/// exist the computed path is returned inside [`VaultError::VaultFileNotFound`]
/// so callers that create vault files can still use it.
pub fn vault_file_path<R>(dir: &Path, profile: &str, resolve: R) -> Result<PathBuf, VaultError>
where
    R: FnOnce() -> Result<String, VaultError>,
{
    let profile = match profile {
        "" => resolve()?,
        profile => profile.to_string(),
    };

    // a profile must name a file directly inside the vault directory
    let mut components = Path::new(&profile).components();
    if !matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) {
        return Err(VaultError::InvalidProfile(profile));
    }

    let path = dir.join(&profile);
    if !path.exists() {
        return Err(VaultError::VaultFileNotFound(path));
    }

    Ok(path)
}

/// `override_path` comes from `AWS_CONFIG_FILE`.
pub fn config_file_path(override_path: Option<&Path>) -> Result<PathBuf, VaultError> {
    match override_path {
        Some(path) if !path.as_os_str().is_empty() => Ok(path.to_path_buf()),
        _ => Ok(home_dir()?.join(DEFAULT_CONFIG_FILE)),
    }
}

pub fn vault_log_path(dir: &Path) -> PathBuf {
    dir.join(VAULT_LOG_FILE)
}
