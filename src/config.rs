use std::env;
use std::time::Duration;

use chrono::Utc;
use log::{error, warn};

use crate::error::TokenError;

/// Fixed pause between poll cycles.
pub const RETRY_PERIOD: Duration = Duration::from_secs(600);

pub const PRACTICUM_TOKEN_VAR: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";
const START_FROM_VAR: &str = "START_FROM";

/// Where the poll cursor starts on a fresh process.
///
/// `Beginning` replays the whole homework history (`from_date=0`) and is the
/// default - missing a verdict is worse than repeating one. `Now` skips
/// straight to events after startup; select it with `START_FROM=now`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StartFrom {
    Beginning,
    Now,
}

impl StartFrom {
    pub fn initial_cursor(&self) -> i64 {
        match self {
            StartFrom::Beginning => 0,
            StartFrom::Now => Utc::now().timestamp(),
        }
    }
}

/// Secrets and knobs, read from the environment once at startup and passed
/// by reference from there on.
#[derive(Clone, Debug)]
pub struct Config {
    pub practicum_token: String,
    pub telegram_token: String,
    pub chat_id: String,
    pub start_from: StartFrom,
}

impl Config {
    /// Reads configuration from the environment.
    ///
    /// # Behavior
    /// - Each missing or empty secret is reported individually by
    ///   `check_tokens` before the whole load fails, so a broken deployment
    ///   names all its holes at once.
    /// - `START_FROM` is optional; anything other than `beginning`/`now`
    ///   falls back to the default with a warning.
    pub fn from_env() -> Result<Config, TokenError> {
        let practicum_token = env::var(PRACTICUM_TOKEN_VAR).ok();
        let telegram_token = env::var(TELEGRAM_TOKEN_VAR).ok();
        let chat_id = env::var(TELEGRAM_CHAT_ID_VAR).ok();

        if !check_tokens(&[
            (PRACTICUM_TOKEN_VAR, &practicum_token),
            (TELEGRAM_TOKEN_VAR, &telegram_token),
            (TELEGRAM_CHAT_ID_VAR, &chat_id),
        ]) {
            return Err(TokenError);
        }

        // check_tokens passed, so all three are Some and non-empty.
        let (Some(practicum_token), Some(telegram_token), Some(chat_id)) =
            (practicum_token, telegram_token, chat_id)
        else {
            return Err(TokenError);
        };

        let start_from = match env::var(START_FROM_VAR).ok().as_deref() {
            Some("now") => StartFrom::Now,
            Some("beginning") | None => StartFrom::Beginning,
            Some(other) => {
                warn!("Unrecognized {START_FROM_VAR}={other}, defaulting to beginning");
                StartFrom::Beginning
            }
        };

        Ok(Config {
            practicum_token,
            telegram_token,
            chat_id,
            start_from,
        })
    }
}

/// True iff every required value is present and non-empty.
/// Logs one line per missing value - the log crate has no level above
/// error, so critical configuration faults land there.
pub fn check_tokens(tokens: &[(&str, &Option<String>)]) -> bool {
    let mut ok = true;
    for (name, value) in tokens {
        match value {
            Some(v) if !v.is_empty() => {}
            _ => {
                error!("Missing required environment variable: {name}");
                ok = false;
            }
        }
    }
    ok
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    #[test]
    fn check_tokens_accepts_full_set() {
        let a = var("ya_...");
        let b = var("123:abc");
        let c = var("424242");
        assert!(check_tokens(&[("A", &a), ("B", &b), ("C", &c)]));
    }

    #[test]
    fn check_tokens_rejects_missing_value() {
        let a = var("ya_...");
        let b = None;
        let c = var("424242");
        assert!(!check_tokens(&[("A", &a), ("B", &b), ("C", &c)]));
    }

    #[test]
    fn check_tokens_rejects_empty_value() {
        let a = var("");
        let b = var("123:abc");
        let c = var("424242");
        assert!(!check_tokens(&[("A", &a), ("B", &b), ("C", &c)]));
    }

    #[test]
    fn beginning_replays_full_history() {
        assert_eq!(StartFrom::Beginning.initial_cursor(), 0);
    }

    #[test]
    fn now_starts_in_the_present() {
        assert!(StartFrom::Now.initial_cursor() > 0);
    }
}
