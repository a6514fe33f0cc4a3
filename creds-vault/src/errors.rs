// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::path::PathBuf;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum VaultError {
    #[error("unable to determine AWS config profile")]
    ProfileNotFound,
    #[error("invalid profile name {0:?}")]
    InvalidProfile(String),
    #[error("unable to determine home directory")]
    HomeDirNotFound,
    #[error("unable to find vault file {0:?}")]
    VaultFileNotFound(PathBuf),
    #[error("unable to read AWS config file {0:?}")]
    ConfigFileNotFound(PathBuf),
    #[error("unable to find {0} in PATH")]
    EngineNotFound(String),
    #[error("encryption engine failed ({status}): {1}", status = exit_status(.0))]
    EngineFailed(Option<i32>, String),
    #[error("unable to parse credentials: {0}")]
    Parse(String),
    #[error("unable to serialize credentials: {0}")]
    Serialize(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("assume role with MFA requires a token provider")]
    MfaTokenProviderMissing,
    #[error("unable to read MFA token code: {0}")]
    MfaTokenCode(String),
    #[error("no source credentials to assume role with")]
    MissingSourceCredential,
    #[error("assume role failed: {0}")]
    Exchange(String),
}

fn exit_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "killed by signal".to_string(),
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(source: serde_json::Error) -> Self {
        tracing::error!("{:?}", source);
        VaultError::Parse(source.to_string())
    }
}

impl From<std::io::Error> for VaultError {
    fn from(source: std::io::Error) -> Self {
        tracing::error!("{:?}", source);
        VaultError::Io(source.to_string())
    }
}
