// SPDX-FileCopyrightText: 2026 Reverie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `reverie account` command implementations.
//!
//! Accounts live in the durable store's deployment, in a separate
//! collection. Passwords are read without echo and never logged.

use std::time::Duration;

use colored::Colorize;

use reverie_auth::MongoAuth;
use reverie_config::model::ReverieConfig;
use reverie_core::{AuthService, ReverieError};

/// Builds the auth service from configuration. Accounts require the
/// durable store to be configured.
fn auth_service(config: &ReverieConfig) -> Result<MongoAuth, ReverieError> {
    let uri = config.memory.durable_uri.as_deref().ok_or_else(|| {
        ReverieError::Auth(
            "accounts require a durable store; set [memory] durable_uri".to_string(),
        )
    })?;
    Ok(MongoAuth::new(
        uri,
        &config.memory.database,
        &config.auth.users_collection,
        Duration::from_secs(config.memory.connect_timeout_secs),
    ))
}

/// Run `reverie account create`: prompt for a password twice and
/// register the account.
pub async fn run_create(config: &ReverieConfig, username: &str) -> Result<(), ReverieError> {
    let auth = auth_service(config)?;

    let password = rpassword::prompt_password("password: ")
        .map_err(|e| ReverieError::Auth(format!("failed to read password: {e}")))?;
    let confirm = rpassword::prompt_password("confirm password: ")
        .map_err(|e| ReverieError::Auth(format!("failed to read password: {e}")))?;
    if password != confirm {
        return Err(ReverieError::Auth("passwords do not match".to_string()));
    }

    if auth.create_user(username, &password).await? {
        println!("account {} created", username.bold());
    } else {
        println!("account {} already exists", username.bold());
    }
    Ok(())
}

/// Run `reverie account login`: verify credentials and report the
/// outcome.
pub async fn run_login(config: &ReverieConfig, username: &str) -> Result<(), ReverieError> {
    let auth = auth_service(config)?;

    let password = rpassword::prompt_password("password: ")
        .map_err(|e| ReverieError::Auth(format!("failed to read password: {e}")))?;

    match auth.authenticate(username, &password).await? {
        Some(identity) => {
            println!("logged in as {}", identity.username.bold().green());
            Ok(())
        }
        None => {
            eprintln!("{}", "invalid username or password".red());
            std::process::exit(1);
        }
    }
}
