// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! External encryption engine.
//!
//! Vault files are opaque to this crate: they are piped through an external
//! program (GnuPG by default) located on `PATH`.
//!
//! ```text
//! <engine> [extra args] --decrypt                        stdin: ciphertext  stdout: plaintext
//! <engine> [extra args] --encrypt --recipient <id>...    stdin: plaintext   stdout: ciphertext
//! ```
//!
//! A non-zero exit status is reported as [`VaultError::EngineFailed`] with the
//! engine's stderr, or with a pointer to the vault log file when stderr is
//! redirected there.

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::constants::{ENGINE_DECRYPT_ARG, ENGINE_ENCRYPT_ARG, ENGINE_RECIPIENT_ARG};
use crate::errors::VaultError;

/// Decrypts and encrypts opaque byte streams.
pub trait Engine {
    fn decrypt(&self, ciphertext: &[u8]) -> impl Future<Output = Result<Vec<u8>, VaultError>>;

    fn encrypt(
        &self,
        plaintext: &[u8],
        recipients: &[String],
    ) -> impl Future<Output = Result<Vec<u8>, VaultError>>;
}

/// Runs an engine executable as a subprocess.
#[derive(Debug, Clone)]
pub struct GpgEngine {
    program: PathBuf,
    args: Vec<String>,
    stderr_log: Option<PathBuf>,
}

impl GpgEngine {
    /// Finds `name` on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::EngineNotFound`] if no executable matches.
    pub fn locate(name: &str, args: Vec<String>) -> Result<Self, VaultError> {
        let program =
            which::which(name).map_err(|_| VaultError::EngineNotFound(name.to_string()))?;

        tracing::debug!("[engine] using {:?}", program);

        Ok(Self {
            program,
            args,
            stderr_log: None,
        })
    }

    /// Appends the engine's stderr to `path` instead of capturing it.
    pub fn with_stderr_log(mut self, path: PathBuf) -> Self {
        self.stderr_log = Some(path);
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    #[tracing::instrument(skip(self, input))]
    async fn run(&self, command: &[&str], input: &[u8]) -> Result<Vec<u8>, VaultError> {
        let stderr = match &self.stderr_log {
            Some(path) => Stdio::from(open_log(path)?),
            None => Stdio::piped(),
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .args(command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(stderr)
            .kill_on_drop(true)
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| VaultError::Io("engine stdin unavailable".to_string()))?;

        // stdin is fed while stdout drains, so large payloads cannot deadlock
        let feed = async move {
            let result = stdin.write_all(input).await;
            drop(stdin);
            result
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output?;

        if !output.status.success() {
            let message = match &self.stderr_log {
                Some(path) => format!("see {}", path.display()),
                None => String::from_utf8_lossy(output.stderr.as_slice())
                    .trim()
                    .to_string(),
            };
            return Err(VaultError::EngineFailed(output.status.code(), message));
        }

        // the engine may succeed without reading all of its input
        if let Err(err) = fed
            && err.kind() != ErrorKind::BrokenPipe
        {
            return Err(err.into());
        }

        tracing::trace!("[engine] produced {} bytes", output.stdout.len());

        Ok(output.stdout)
    }
}

impl Engine for GpgEngine {
    async fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, VaultError> {
        self.run(&[ENGINE_DECRYPT_ARG], ciphertext).await
    }

    async fn encrypt(&self, plaintext: &[u8], recipients: &[String]) -> Result<Vec<u8>, VaultError> {
        let mut command = vec![ENGINE_ENCRYPT_ARG];
        for recipient in recipients {
            command.push(ENGINE_RECIPIENT_ARG);
            command.push(recipient.as_str());
        }
        self.run(&command, plaintext).await
    }
}

fn open_log(path: &Path) -> Result<std::fs::File, VaultError> {
    let mut options = std::fs::OpenOptions::new();
    options.create(true).append(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(crate::constants::VAULT_LOG_MODE);
    }

    Ok(options.open(path)?)
}
