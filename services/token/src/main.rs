use anyhow::Context;
use platform_token::{AuthenticateOptions, Authenticator, Config, TokenIssuer};
use serde::Serialize;
use tracing::info;

#[derive(Serialize)]
struct TokenOutput {
    access_token: String,
    expires_in: u64,
}

fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    rust_common::init_tracing(&config.tracing).context("Failed to initialize tracing")?;

    info!(instance = %config.locator, "Starting platform token");

    let authenticator = Authenticator::new(TokenIssuer::new(config.identity, config.policy));

    let issued = if config.token_superuser {
        authenticator.generate_superuser_token()?
    } else {
        let mut options = AuthenticateOptions::new();
        options.user_id = config.token_user_id;
        authenticator.generate_access_token(&options)?
    };

    let output = TokenOutput {
        access_token: issued.token,
        expires_in: issued.expires_in,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
