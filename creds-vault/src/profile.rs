// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Selects the AWS profile for this invocation.
//!
//! The first non-empty value wins:
//!
//! 1. the positional profile argument
//! 2. `AWS_PROFILE`
//! 3. `AWS_DEFAULT_PROFILE`
//!
//! There is no fallback to `default`.

use crate::constants::{DEFAULT_PROFILE_ENV, PROFILE_ENV};
use crate::errors::VaultError;

/// Resolves the profile name. `env` looks up an environment variable.
pub fn resolve_profile<F>(argument: Option<&str>, env: F) -> Result<String, VaultError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(profile) = argument.filter(|p| !p.is_empty()) {
        return Ok(profile.to_string());
    }

    [PROFILE_ENV, DEFAULT_PROFILE_ENV]
        .into_iter()
        .filter_map(|key| env(key))
        .find(|profile| !profile.is_empty())
        .ok_or(VaultError::ProfileNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_argument_wins() {
        let env = env_of(&[("AWS_PROFILE", "B"), ("AWS_DEFAULT_PROFILE", "C")]);
        assert_eq!(resolve_profile(Some("A"), env).unwrap(), "A");
    }

    #[test]
    fn test_aws_profile_before_default_profile() {
        let env = env_of(&[("AWS_PROFILE", "B"), ("AWS_DEFAULT_PROFILE", "C")]);
        assert_eq!(resolve_profile(None, env).unwrap(), "B");
    }

    #[test]
    fn test_default_profile_fallback() {
        let env = env_of(&[("AWS_DEFAULT_PROFILE", "C")]);
        assert_eq!(resolve_profile(None, env).unwrap(), "C");
    }

    #[test]
    fn test_empty_values_are_skipped() {
        let env = env_of(&[("AWS_PROFILE", ""), ("AWS_DEFAULT_PROFILE", "C")]);
        assert_eq!(resolve_profile(Some(""), env).unwrap(), "C");
    }

    #[test]
    fn test_nothing_set() {
        let err = resolve_profile(None, env_of(&[])).unwrap_err();
        assert_eq!(err, VaultError::ProfileNotFound);
    }
}
