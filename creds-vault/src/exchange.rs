// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Assume-role exchange.
//!
//! [`AssumeRoleExchanger`] trades the long-lived vault credentials for
//! temporary credentials of the role named in the profile config. The remote
//! call goes through an [`ExchangeService`] ([`StsExchangeService`] in
//! production) and the one-time MFA code, when the profile has an
//! `mfa_serial`, comes from the [`MfaTokenProvider`] handed to the exchanger
//! at construction.
//!
//! # Flow
//!
//! 1. No `role_arn`: the source credentials are returned unchanged
//! 2. `mfa_serial` without a token provider: [`VaultError::MfaTokenProviderMissing`]
//! 3. Ask the provider for a code (may block on interactive input)
//! 4. One `AssumeRole` call, never retried
//! 5. Stamp the output format version and fill in a missing expiration

use std::fmt;
use std::future::Future;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use aws_credential_types::Credentials;
use aws_sdk_sts::config::Region;
use aws_sdk_sts::error::DisplayErrorContext;
use chrono::{DateTime, Utc};

use crate::constants::{CREDENTIAL_SOURCE_VERSION, DEFAULT_REGION};
use crate::errors::VaultError;
use crate::models::{AwsCredentials, ProfileConfig};

/// Supplies one-time MFA codes.
pub trait MfaTokenProvider: Send + Sync {
    fn token_code(&self, mfa_serial: &str) -> Result<String, VaultError>;
}

/// Prompts on stderr and reads a code from stdin.
pub struct StdinTokenProvider;

impl MfaTokenProvider for StdinTokenProvider {
    fn token_code(&self, mfa_serial: &str) -> Result<String, VaultError> {
        let mut stderr = io::stderr().lock();
        write!(stderr, "MFA token code for {mfa_serial}: ")
            .and_then(|_| stderr.flush())
            .map_err(|err| VaultError::MfaTokenCode(err.to_string()))?;

        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|err| VaultError::MfaTokenCode(err.to_string()))?;

        match line.trim() {
            "" => Err(VaultError::MfaTokenCode("no token code entered".to_string())),
            code => Ok(code.to_string()),
        }
    }
}

/// Parameters of one `AssumeRole` call.
#[derive(Clone, PartialEq)]
pub struct AssumeRoleInput {
    pub role_arn: String,
    pub session_name: String,
    pub external_id: Option<String>,
    pub serial_number: Option<String>,
    pub token_code: Option<String>,
    pub duration_seconds: i32,
}

impl fmt::Debug for AssumeRoleInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssumeRoleInput")
            .field("role_arn", &self.role_arn)
            .field("session_name", &self.session_name)
            .field("external_id", &self.external_id)
            .field("serial_number", &self.serial_number)
            .field("token_code", &self.token_code.as_ref().map(|_| "[REDACTED]"))
            .field("duration_seconds", &self.duration_seconds)
            .finish()
    }
}

/// The remote role-assumption service.
pub trait ExchangeService {
    fn assume_role(
        &self,
        source: &AwsCredentials,
        input: &AssumeRoleInput,
    ) -> impl Future<Output = Result<AwsCredentials, VaultError>>;
}

impl<T: ExchangeService> ExchangeService for &T {
    fn assume_role(
        &self,
        source: &AwsCredentials,
        input: &AssumeRoleInput,
    ) -> impl Future<Output = Result<AwsCredentials, VaultError>> {
        (**self).assume_role(source, input)
    }
}

/// AWS STS `AssumeRole`.
///
/// The region comes from the standard AWS region chain for `profile`,
/// falling back to [`DEFAULT_REGION`].
#[derive(Debug, Clone, Default)]
pub struct StsExchangeService {
    profile: Option<String>,
}

impl StsExchangeService {
    pub fn new(profile: Option<String>) -> Self {
        Self { profile }
    }
}

impl ExchangeService for StsExchangeService {
    #[tracing::instrument(skip(self, source))]
    async fn assume_role(
        &self,
        source: &AwsCredentials,
        input: &AssumeRoleInput,
    ) -> Result<AwsCredentials, VaultError> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(Credentials::from(source));
        if let Some(profile) = &self.profile {
            loader = loader.profile_name(profile);
        }
        let sdk_config = loader.load().await;

        let mut sts_config = aws_sdk_sts::config::Builder::from(&sdk_config);
        if sdk_config.region().is_none() {
            tracing::debug!("[sts] no region configured, using {}", DEFAULT_REGION);
            sts_config = sts_config.region(Region::new(DEFAULT_REGION));
        }
        let client = aws_sdk_sts::Client::from_conf(sts_config.build());

        let output = client
            .assume_role()
            .role_arn(&input.role_arn)
            .role_session_name(&input.session_name)
            .duration_seconds(input.duration_seconds)
            .set_external_id(input.external_id.clone())
            .set_serial_number(input.serial_number.clone())
            .set_token_code(input.token_code.clone())
            .send()
            .await
            .map_err(|err| VaultError::Exchange(DisplayErrorContext(&err).to_string()))?;

        let credentials = output
            .credentials()
            .ok_or_else(|| VaultError::Exchange("response contained no credentials".to_string()))?;
        let expiration = credentials.expiration();

        Ok(AwsCredentials {
            version: CREDENTIAL_SOURCE_VERSION,
            access_key_id: credentials.access_key_id().to_string(),
            secret_access_key: credentials.secret_access_key().to_string(),
            session_token: credentials.session_token().to_string(),
            expiration: DateTime::from_timestamp(expiration.secs(), expiration.subsec_nanos()),
        })
    }
}

pub struct AssumeRoleExchanger<S> {
    service: S,
    token_provider: Option<Arc<dyn MfaTokenProvider>>,
    duration: Duration,
}

impl<S: ExchangeService> AssumeRoleExchanger<S> {
    /// `duration` applies unless the profile sets `duration_seconds`.
    pub fn new(
        service: S,
        token_provider: Option<Arc<dyn MfaTokenProvider>>,
        duration: Duration,
    ) -> Self {
        Self {
            service,
            token_provider,
            duration,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Exchanges `config.source` for temporary credentials of `config.role_arn`.
    ///
    /// # Errors
    ///
    /// - [`VaultError::MissingSourceCredential`] - `config.source` is unset
    /// - [`VaultError::MfaTokenProviderMissing`] - `mfa_serial` set but no provider
    /// - [`VaultError::MfaTokenCode`] - the provider could not supply a code
    /// - any error of the exchange service, unmodified
    #[tracing::instrument(skip(self, config), fields(role_arn = %config.role_arn))]
    pub async fn exchange(&self, mut config: ProfileConfig) -> Result<AwsCredentials, VaultError> {
        let source = config
            .source
            .take()
            .ok_or(VaultError::MissingSourceCredential)?;

        if config.role_arn.is_empty() {
            tracing::debug!("[exchange] no role_arn, using vault credentials");
            return Ok(source);
        }

        let token_code = match &config.mfa_serial {
            Some(serial) => Some(self.token_code(serial).await?),
            None => None,
        };

        let duration_seconds = config
            .duration_seconds
            .unwrap_or_else(|| i32::try_from(self.duration.as_secs()).unwrap_or(i32::MAX));

        let input = AssumeRoleInput {
            role_arn: config.role_arn,
            session_name: config.session_name,
            external_id: config.external_id,
            serial_number: config.mfa_serial,
            token_code,
            duration_seconds,
        };

        let mut credentials = self.service.assume_role(&source, &input).await?;

        credentials.version = CREDENTIAL_SOURCE_VERSION;
        if credentials.expiration.is_none() {
            credentials.expiration =
                Some(Utc::now() + chrono::Duration::seconds(i64::from(duration_seconds)));
        }

        tracing::debug!(
            "[exchange] assumed {}, expires {:?}",
            input.role_arn,
            credentials.expiration
        );

        Ok(credentials)
    }

    async fn token_code(&self, serial: &str) -> Result<String, VaultError> {
        let provider = self
            .token_provider
            .clone()
            .ok_or(VaultError::MfaTokenProviderMissing)?;
        let serial = serial.to_string();

        // the provider may block on a terminal prompt
        tokio::task::spawn_blocking(move || provider.token_code(&serial))
            .await
            .map_err(|err| VaultError::MfaTokenCode(err.to_string()))?
    }
}
