// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

#![recursion_limit = "256"]

use std::io::{IsTerminal, Read};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use creds_vault::application::Application;
use creds_vault::configuration::{Command, MfaPrompt, VaultOptions};
use creds_vault::engine::GpgEngine;
use creds_vault::exchange::{MfaTokenProvider, StdinTokenProvider, StsExchangeService};
use creds_vault::paths;
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let options = VaultOptions::parse();

    init_tracing(options.log_json);

    tracing::debug!("[creds-vault] {:?}", &options);

    match run(options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("creds-vault: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(json: bool) {
    // stdout carries the credential JSON, so logs go to stderr
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .without_time()
        .with_target(false);

    if json {
        builder.json().with_current_span(false).init();
    } else {
        builder.init();
    }
}

async fn run(options: VaultOptions) -> Result<()> {
    let vault_dir = paths::vault_dir()?;

    let mut engine = GpgEngine::locate(&options.engine.name, options.engine.args)?;
    if options.engine.log {
        engine = engine.with_stderr_log(paths::vault_log_path(&vault_dir));
    }

    let app = Application::build(vault_dir, engine)
        .context("unable to create the vault directory")?;

    match options.command {
        Some(Command::Store(store)) => {
            let mut plaintext = Zeroizing::new(Vec::new());
            std::io::stdin()
                .read_to_end(&mut plaintext)
                .context("unable to read credentials from stdin")?;

            app.store(&store, &plaintext).await?;
        }
        None => {
            let output = app
                .get(
                    &options.get,
                    |profile| StsExchangeService::new(Some(profile.to_string())),
                    token_provider(options.get.mfa_prompt),
                )
                .await?;

            println!("{}", output.as_str());
        }
    }

    Ok(())
}

fn token_provider(prompt: MfaPrompt) -> Option<Arc<dyn MfaTokenProvider>> {
    let enabled = match prompt {
        MfaPrompt::Auto => std::io::stdin().is_terminal(),
        MfaPrompt::Stdin => true,
        MfaPrompt::Disabled => false,
    };

    enabled.then(|| Arc::new(StdinTokenProvider) as Arc<dyn MfaTokenProvider>)
}
