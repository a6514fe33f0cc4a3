// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::constants::{DEFAULT_DURATION, DEFAULT_ENGINE};

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct VaultOptions {
    #[command(subcommand)]
    pub command: Option<Command>,
    #[command(flatten)]
    pub get: GetOptions,
    #[command(flatten)]
    pub engine: EngineOptions,
    #[arg(long, global = true, default_value = "false", env("CREDS_VAULT_LOG_JSON"), action = ArgAction::SetTrue)]
    pub log_json: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Encrypt credential JSON read from stdin into the profile's vault file
    Store(StoreOptions),
}

/// Print `credential_process` JSON for a profile.
#[derive(Debug, Clone, Args)]
pub struct GetOptions {
    /// Profile name; defaults to $AWS_PROFILE, then $AWS_DEFAULT_PROFILE
    pub profile: Option<String>,
    #[arg(long, env("AWS_CONFIG_FILE"))]
    pub config_file: Option<PathBuf>,
    #[arg(long, default_value = "false", env("CREDS_VAULT_SKIP_ASSUME_ROLE"), action = ArgAction::SetTrue)]
    pub skip_assume_role: bool,
    #[arg(long, default_value_t = DEFAULT_DURATION.as_secs(), env("CREDS_VAULT_DURATION_SECONDS"))]
    pub duration_seconds: u64,
    #[arg(long, value_enum, default_value_t = MfaPrompt::Auto, env("CREDS_VAULT_MFA_PROMPT"))]
    pub mfa_prompt: MfaPrompt,
}

#[derive(Debug, Clone, Args)]
pub struct StoreOptions {
    /// Profile name; defaults to $AWS_PROFILE, then $AWS_DEFAULT_PROFILE
    pub profile: Option<String>,
    /// Key ID to encrypt for; repeatable
    #[arg(long, short, env("CREDS_VAULT_RECIPIENTS"), value_delimiter = ',')]
    pub recipient: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct EngineOptions {
    #[arg(long = "engine", global = true, default_value = DEFAULT_ENGINE, env("CREDS_VAULT_ENGINE"))]
    pub name: String,
    /// Extra argument passed to the engine before its command; repeatable
    #[arg(long = "engine-arg", global = true, env("CREDS_VAULT_ENGINE_ARGS"), value_delimiter = ',', allow_hyphen_values = true)]
    pub args: Vec<String>,
    /// Append the engine's stderr to vault.log
    #[arg(long = "engine-log", global = true, default_value = "false", env("CREDS_VAULT_ENGINE_LOG"), action = ArgAction::SetTrue)]
    pub log: bool,
}

/// Source of MFA token codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MfaPrompt {
    /// Prompt on the terminal when stdin is one
    Auto,
    Stdin,
    /// Never prompt; profiles with `mfa_serial` fail
    #[value(name = "none")]
    Disabled,
}

impl Default for VaultOptions {
    fn default() -> Self {
        VaultOptions {
            command: None,
            get: GetOptions {
                profile: None,
                config_file: None,
                skip_assume_role: false,
                duration_seconds: DEFAULT_DURATION.as_secs(),
                mfa_prompt: MfaPrompt::Auto,
            },
            engine: EngineOptions {
                name: DEFAULT_ENGINE.to_string(),
                args: Vec::new(),
                log: false,
            },
            log_json: false,
        }
    }
}
