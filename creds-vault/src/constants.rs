// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::time::Duration;

/// Version field of the `credential_process` output format.
pub const CREDENTIAL_SOURCE_VERSION: i32 = 1;

pub const VAULT_DIR: &str = ".aws/creds-vault";
pub const VAULT_LOG_FILE: &str = "vault.log";
pub const DEFAULT_CONFIG_FILE: &str = ".aws/config";

pub const PROFILE_ENV: &str = "AWS_PROFILE";
pub const DEFAULT_PROFILE_ENV: &str = "AWS_DEFAULT_PROFILE";

#[cfg(unix)]
pub const VAULT_DIR_MODE: u32 = 0o700;
#[cfg(unix)]
pub const VAULT_FILE_MODE: u32 = 0o600;
#[cfg(unix)]
pub const VAULT_LOG_MODE: u32 = 0o640;

pub const DEFAULT_ENGINE: &str = "gpg";
pub const ENGINE_DECRYPT_ARG: &str = "--decrypt";
pub const ENGINE_ENCRYPT_ARG: &str = "--encrypt";
pub const ENGINE_RECIPIENT_ARG: &str = "--recipient";

pub const DEFAULT_ROLE_SESSION_NAME: &str = "creds-vault-session";
/// Matches the default lifetime of an STS `AssumeRole` session (15 minutes)
pub const DEFAULT_DURATION: Duration = Duration::from_secs(900);
pub const DEFAULT_REGION: &str = "us-east-1";
pub const CREDENTIAL_PROVIDER_NAME: &str = "creds-vault";

// Profile config keys
pub const KEY_ROLE_SESSION_NAME: &str = "role_session_name";
pub const KEY_ROLE_ARN: &str = "role_arn";
pub const KEY_EXTERNAL_ID: &str = "external_id";
pub const KEY_MFA_SERIAL: &str = "mfa_serial";
pub const KEY_DURATION_SECONDS: &str = "duration_seconds";
