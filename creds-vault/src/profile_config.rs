// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Role assumption settings from the AWS CLI config file.
//!
//! ```ini
//! [profile dev]
//! role_arn = arn:aws:iam::123456789012:role/Developer
//! role_session_name = alice
//! external_id = 7f3c
//! mfa_serial = arn:aws:iam::123456789012:mfa/alice
//! duration_seconds = 3600
//! ```
//!
//! A profile is looked up as `[profile <name>]` first and then `[<name>]`.
//! A missing section or key yields the empty value; only an unreadable file
//! is an error.

use std::path::Path;

use ini::{Ini, ParseOption, Properties};

use crate::constants::{
    DEFAULT_ROLE_SESSION_NAME, KEY_DURATION_SECONDS, KEY_EXTERNAL_ID, KEY_MFA_SERIAL,
    KEY_ROLE_ARN, KEY_ROLE_SESSION_NAME,
};
use crate::errors::VaultError;
use crate::models::ProfileConfig;

/// Loads the settings for `profile` from the config file at `path`.
///
/// # Errors
///
/// Returns [`VaultError::ConfigFileNotFound`] if the file cannot be read or
/// parsed.
#[tracing::instrument]
pub fn load_profile_config(path: &Path, profile: &str) -> Result<ProfileConfig, VaultError> {
    let options = ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..Default::default()
    };
    let ini = Ini::load_from_file_opt(path, options).map_err(|err| {
        tracing::debug!("[config] unable to load {:?}: {}", path, err);
        VaultError::ConfigFileNotFound(path.to_path_buf())
    })?;

    let section = ini
        .section(Some(format!("profile {profile}")))
        .or_else(|| ini.section(Some(profile)));

    let Some(section) = section else {
        tracing::debug!("[config] no section for profile {}", profile);
        return Ok(ProfileConfig::default());
    };

    let duration_seconds = value(section, KEY_DURATION_SECONDS).and_then(|raw| {
        raw.parse::<i32>()
            .inspect_err(|_| tracing::warn!("[config] ignoring {} = {:?}", KEY_DURATION_SECONDS, raw))
            .ok()
    });

    Ok(ProfileConfig {
        session_name: value(section, KEY_ROLE_SESSION_NAME)
            .unwrap_or_else(|| DEFAULT_ROLE_SESSION_NAME.to_string()),
        role_arn: value(section, KEY_ROLE_ARN).unwrap_or_default(),
        external_id: value(section, KEY_EXTERNAL_ID),
        mfa_serial: value(section, KEY_MFA_SERIAL),
        duration_seconds,
        source: None,
    })
}

fn value(section: &Properties, key: &str) -> Option<String> {
    section
        .get(key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
