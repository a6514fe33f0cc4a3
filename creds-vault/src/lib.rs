// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! # Creds Vault
//!
//! An AWS CLI `credential_process` backed by encrypted vault files.
//!
//! Long-lived access keys are stored per profile in
//! `~/.aws/creds-vault/<profile>`, encrypted by an external engine (GnuPG by
//! default). On each invocation the vault file is decrypted, optionally
//! exchanged for temporary role credentials through STS `AssumeRole`, and
//! printed in the `credential_process` JSON shape.
//!
//! ## Architecture
//!
//! ```text
//! profile -> vault file -> engine --decrypt -> CredentialVault
//!                                                   |
//!                                   AssumeRolePipeline (write side)
//!                                     +-> ~/.aws/config (role_arn, mfa_serial, ...)
//!                                     +-> STS AssumeRole (optional MFA code)
//!                                                   |
//!                                               stdout JSON
//! ```
//!
//! ## Modules
//!
//! - [`application`]: the get and store commands
//! - [`configuration`]: CLI argument parsing with clap
//! - [`constants`]: file names, modes and defaults
//! - [`engine`]: external encryption engine subprocess
//! - [`errors`]: error taxonomy
//! - [`exchange`]: assume-role exchange, STS client and MFA token providers
//! - [`models`]: credential and profile config types
//! - [`paths`]: vault, config and log file locations
//! - [`pipeline`]: write-side sinks (assume role, re-encrypt)
//! - [`profile`]: profile selection from arguments and environment
//! - [`profile_config`]: AWS config file parsing
//! - [`vault`]: per-profile vault handle
//!
//! ## Usage
//!
//! ```bash
//! # ~/.aws/config
//! # [profile dev]
//! # credential_process = creds-vault dev
//! # role_arn = arn:aws:iam::123456789012:role/Developer
//!
//! echo '{"AccessKeyId":"AKIA...","SecretAccessKey":"..."}' \
//!     | creds-vault store --recipient alice@example.com dev
//! creds-vault dev
//! ```
//!
//! ## Security Considerations
//!
//! - Secrets never reach log output; `Debug` impls redact them
//! - Decrypted buffers and credentials are zeroized on drop
//! - The vault directory is created `0700` and vault files `0600`
//! - The engine's stderr is the only engine output written to `vault.log`

pub mod application;
pub mod configuration;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod exchange;
pub mod models;
pub mod paths;
pub mod pipeline;
pub mod profile;
pub mod profile_config;
pub mod vault;
