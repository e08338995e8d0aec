use std::env;

use thiserror::Error;

use crate::infrastructure::mailer::MailConfig;
use crate::infrastructure::stripe::StripeConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{0} must be a valid number")]
    Invalid(&'static str),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub stripe: StripeConfig,
    pub webhook_secret: String,
    pub webhook_tolerance_secs: i64,
    /// `None` means notifications are only logged.
    pub mail: Option<MailConfig>,
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Missing(key))
}

fn or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = or_default("PORT", "8080")
            .parse()
            .map_err(|_| ConfigError::Invalid("PORT"))?;
        let webhook_tolerance_secs = or_default("WEBHOOK_TOLERANCE_SECS", "300")
            .parse()
            .map_err(|_| ConfigError::Invalid("WEBHOOK_TOLERANCE_SECS"))?;

        let mail = env::var("MAIL_API_URL").ok().map(|api_url| MailConfig {
            api_url,
            api_token: env::var("MAIL_API_TOKEN").ok(),
            from: or_default("MAIL_FROM", "hello@elindorcandle.com"),
            shop_recipients: split_list(&or_default("SHOP_NOTIFY_RECIPIENTS", "")),
        });

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            host: or_default("HOST", "0.0.0.0"),
            port,
            stripe: StripeConfig {
                secret_key: required("STRIPE_SECRET")?,
                api_base: or_default("STRIPE_API_BASE", "https://api.stripe.com"),
                success_url: or_default(
                    "CHECKOUT_SUCCESS_URL",
                    "http://localhost:3000/success?session_id={CHECKOUT_SESSION_ID}",
                ),
                cancel_url: or_default("CHECKOUT_CANCEL_URL", "http://localhost:3000/cancel"),
            },
            webhook_secret: required("STRIPE_WEBHOOK_SECRET")?,
            webhook_tolerance_secs,
            mail,
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
