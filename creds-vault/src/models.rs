// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Credential and profile types.
//!
//! [`AwsCredentials`] is both the decrypted vault content and the
//! `credential_process` output. Its JSON shape is fixed by the AWS CLI:
//!
//! ```json
//! {
//!   "Version": 1,
//!   "AccessKeyId": "AKIA...",
//!   "SecretAccessKey": "...",
//!   "SessionToken": "...",
//!   "Expiration": "2026-10-19T12:00:00Z"
//! }
//! ```
//!
//! `SessionToken` is omitted when empty and `Expiration` when absent.

use std::fmt;

use aws_credential_types::Credentials;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use zeroize::ZeroizeOnDrop;

use crate::constants::{CREDENTIAL_PROVIDER_NAME, DEFAULT_ROLE_SESSION_NAME};
use crate::errors::VaultError;

#[derive(Clone, Default, PartialEq, Serialize, Deserialize, ZeroizeOnDrop)]
pub struct AwsCredentials {
    #[serde(rename = "Version", default)]
    pub version: i32,

    #[serde(rename = "AccessKeyId", default, deserialize_with = "string_or_null")]
    pub access_key_id: String,

    #[serde(rename = "SecretAccessKey", default, deserialize_with = "string_or_null")]
    pub secret_access_key: String,

    #[serde(
        rename = "SessionToken",
        default,
        deserialize_with = "string_or_null",
        skip_serializing_if = "String::is_empty"
    )]
    pub session_token: String,

    #[serde(
        rename = "Expiration",
        default,
        with = "expiration",
        skip_serializing_if = "Option::is_none"
    )]
    #[zeroize(skip)]
    pub expiration: Option<DateTime<Utc>>,
}

// Custom Debug implementation to prevent accidental logging of sensitive data
impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("version", &self.version)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field("session_token", &"[REDACTED]")
            .field("expiration", &self.expiration)
            .finish()
    }
}

impl AwsCredentials {
    /// Parses decrypted vault content.
    ///
    /// Unknown fields are ignored and missing fields take their empty value;
    /// nothing is validated here.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, VaultError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Serializes into the `credential_process` JSON shape.
    pub fn to_json(&self) -> Result<String, VaultError> {
        serde_json::to_string(self).map_err(|err| VaultError::Serialize(err.to_string()))
    }

    /// Both the access key and the secret are present.
    pub fn is_complete(&self) -> bool {
        !self.access_key_id.is_empty() && !self.secret_access_key.is_empty()
    }

    /// Temporary credentials carry a session token.
    pub fn is_temporary(&self) -> bool {
        !self.session_token.is_empty()
    }
}

impl From<&AwsCredentials> for Credentials {
    fn from(credential: &AwsCredentials) -> Self {
        let token = match credential.session_token.as_str() {
            "" => None,
            token => Some(token.to_string()),
        };

        Credentials::new(
            credential.access_key_id.clone(),
            credential.secret_access_key.clone(),
            token,
            credential.expiration.map(Into::into),
            CREDENTIAL_PROVIDER_NAME,
        )
    }
}

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// RFC3339 timestamps where an empty string or `null` means "no expiration".
mod expiration {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(expiration) => {
                serializer.serialize_str(&expiration.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => DateTime::parse_from_rfc3339(value)
                .map(|expiration| Some(expiration.with_timezone(&Utc)))
                .map_err(de::Error::custom),
        }
    }
}

/// Role assumption parameters for one profile.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileConfig {
    pub session_name: String,
    /// Empty when the profile does not assume a role.
    pub role_arn: String,
    pub external_id: Option<String>,
    /// Presence switches the exchange to the MFA code path.
    pub mfa_serial: Option<String>,
    pub duration_seconds: Option<i32>,
    pub source: Option<AwsCredentials>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        ProfileConfig {
            session_name: DEFAULT_ROLE_SESSION_NAME.to_string(),
            role_arn: String::new(),
            external_id: None,
            mfa_serial: None,
            duration_seconds: None,
            source: None,
        }
    }
}

impl ProfileConfig {
    pub fn with_source(mut self, source: AwsCredentials) -> Self {
        self.source = Some(source);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_credential_types::provider::ProvideCredentials;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use serde_json::json;

    fn long_lived() -> AwsCredentials {
        AwsCredentials {
            version: 1,
            access_key_id: "AKIAEXAMPLE".to_string(),
            secret_access_key: "abc".to_string(),
            session_token: String::new(),
            expiration: None,
        }
    }

    #[test]
    fn test_parse_empty_optionals() {
        let raw = br#"{"Version":1,"AccessKeyId":"AKIAEXAMPLE","SecretAccessKey":"abc","SessionToken":"","Expiration":""}"#;
        let credentials = AwsCredentials::from_slice(raw).unwrap();
        assert_eq!(credentials, long_lived());
        assert!(!credentials.is_temporary());
    }

    #[test]
    fn test_serialize_omits_empty_optionals() {
        let value: serde_json::Value =
            serde_json::from_str(&long_lived().to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({"Version": 1, "AccessKeyId": "AKIAEXAMPLE", "SecretAccessKey": "abc"})
        );
    }

    #[test]
    fn test_serialize_temporary() {
        let mut credentials = long_lived();
        credentials.session_token = "token".to_string();
        credentials.expiration = Some(Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap());

        let value: serde_json::Value =
            serde_json::from_str(&credentials.to_json().unwrap()).unwrap();
        assert_eq!(value["SessionToken"], "token");
        assert_eq!(value["Expiration"], "2026-10-19T12:00:00Z");
    }

    #[test]
    fn test_parse_ignores_unknown_and_missing_fields() {
        let raw = br#"{"AccessKeyId":"AKIAEXAMPLE","Region":"eu-west-1"}"#;
        let credentials = AwsCredentials::from_slice(raw).unwrap();
        assert_eq!(credentials.version, 0);
        assert_eq!(credentials.access_key_id, "AKIAEXAMPLE");
        assert!(credentials.secret_access_key.is_empty());
        assert!(!credentials.is_complete());
    }

    #[test]
    fn test_parse_null_fields() {
        let raw = br#"{"Version":1,"AccessKeyId":"a","SecretAccessKey":"b","SessionToken":null,"Expiration":null}"#;
        let credentials = AwsCredentials::from_slice(raw).unwrap();
        assert!(credentials.session_token.is_empty());
        assert!(credentials.expiration.is_none());
    }

    #[test]
    fn test_parse_offset_expiration() {
        let raw = br#"{"AccessKeyId":"a","SecretAccessKey":"b","SessionToken":"t","Expiration":"2026-10-19T14:00:00+02:00"}"#;
        let credentials = AwsCredentials::from_slice(raw).unwrap();
        assert_eq!(
            credentials.expiration,
            Some(Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_malformed() {
        let err = AwsCredentials::from_slice(b"not json").unwrap_err();
        assert!(matches!(err, VaultError::Parse(_)));

        let err = AwsCredentials::from_slice(br#"{"Expiration":"tomorrow"}"#).unwrap_err();
        assert!(matches!(err, VaultError::Parse(_)));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut credentials = long_lived();
        credentials.session_token = "session-secret".to_string();
        let debug = format!("{credentials:?}");
        assert!(!debug.contains("abc"));
        assert!(!debug.contains("session-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn test_static_credentials_handle() {
        let static_credentials = Credentials::from(&long_lived());
        let provided = static_credentials.provide_credentials().await.unwrap();
        assert_eq!(provided.access_key_id(), "AKIAEXAMPLE");
        assert_eq!(provided.secret_access_key(), "abc");
        assert!(provided.session_token().is_none());
    }

    #[test]
    fn test_profile_config_default_session_name() {
        let config = ProfileConfig::default();
        assert_eq!(config.session_name, DEFAULT_ROLE_SESSION_NAME);
        assert!(config.role_arn.is_empty());
        assert!(config.source.is_none());
    }

    proptest! {
        #[test]
        fn prop_json_roundtrip(
            version in 0i32..4,
            access_key_id in "[A-Z0-9]{1,20}",
            secret_access_key in "[A-Za-z0-9/+]{1,40}",
            session_token in "[A-Za-z0-9/+=]{0,64}",
            expiration_secs in proptest::option::of(0i64..4_102_444_800),
            expiration_nanos in 0u32..1_000_000_000,
        ) {
            let expiration = expiration_secs
                .map(|secs| DateTime::from_timestamp(secs, expiration_nanos).unwrap());
            let credentials = AwsCredentials {
                version,
                access_key_id,
                secret_access_key,
                session_token,
                expiration,
            };

            let json = credentials.to_json().unwrap();
            let value: serde_json::Value = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(value.get("SessionToken").is_some(), !credentials.session_token.is_empty());
            prop_assert_eq!(value.get("Expiration").is_some(), credentials.expiration.is_some());

            let parsed = AwsCredentials::from_slice(json.as_bytes()).unwrap();
            prop_assert_eq!(parsed, credentials);
        }
    }
}
