use anyhow::{Result, bail};
use std::env;

pub const DEFAULT_API_URL: &str = "https://api.deepseek.com/v1/chat/completions";
const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 30;

const TELEGRAM_BOT_TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";
const API_KEY_VAR: &str = "DEEPSEEK_API_KEY";

/// Runtime settings, built once at startup and shared read-only.
#[derive(Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub api_key: String,
    pub api_url: String,
    pub model_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|key| env::var(key).ok())
    }

    fn from_env_with(mut get_var: impl FnMut(&str) -> Option<String>) -> Result<Self> {
        let telegram_bot_token = parse_secret(get_var(TELEGRAM_BOT_TOKEN_VAR).as_deref());
        let api_key = parse_secret(get_var(API_KEY_VAR).as_deref());

        let missing: Vec<&str> = [
            (TELEGRAM_BOT_TOKEN_VAR, telegram_bot_token.is_none()),
            (API_KEY_VAR, api_key.is_none()),
        ]
        .into_iter()
        .filter(|(_, is_missing)| *is_missing)
        .map(|(name, _)| name)
        .collect();

        let (Some(telegram_bot_token), Some(api_key)) = (telegram_bot_token, api_key) else {
            bail!(
                "Please set {} and {} as environment variables (missing: {}).",
                TELEGRAM_BOT_TOKEN_VAR,
                API_KEY_VAR,
                missing.join(", ")
            );
        };

        Ok(Self {
            telegram_bot_token,
            api_key,
            api_url: parse_api_url(get_var("DEEPSEEK_API_URL").as_deref()),
            model_timeout_secs: parse_model_timeout_secs(
                get_var("MODEL_TIMEOUT_SECS").as_deref(),
            ),
        })
    }
}

fn parse_secret(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn parse_api_url(raw: Option<&str>) -> String {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_API_URL)
        .to_string()
}

fn parse_model_timeout_secs(raw: Option<&str>) -> u64 {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_MODEL_TIMEOUT_SECS)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{
        Config, DEFAULT_API_URL, DEFAULT_MODEL_TIMEOUT_SECS, parse_api_url,
        parse_model_timeout_secs, parse_secret,
    };

    fn config_from_pairs(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        Config::from_env_with(|key| vars.get(key).cloned())
    }

    #[test]
    fn from_env_uses_defaults_for_optional_values() {
        let cfg = config_from_pairs(&[
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("DEEPSEEK_API_KEY", "sk-test"),
        ])
        .expect("config should load");

        assert_eq!(cfg.telegram_bot_token, "123:abc");
        assert_eq!(cfg.api_key, "sk-test");
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.model_timeout_secs, DEFAULT_MODEL_TIMEOUT_SECS);
    }

    #[test]
    fn from_env_reads_configured_values() {
        let cfg = config_from_pairs(&[
            ("TELEGRAM_BOT_TOKEN", " 123:abc "),
            ("DEEPSEEK_API_KEY", "sk-test"),
            ("DEEPSEEK_API_URL", "http://localhost:8080/v1/chat/completions"),
            ("MODEL_TIMEOUT_SECS", "12"),
        ])
        .expect("config should load");

        assert_eq!(cfg.telegram_bot_token, "123:abc");
        assert_eq!(cfg.api_url, "http://localhost:8080/v1/chat/completions");
        assert_eq!(cfg.model_timeout_secs, 12);
    }

    #[test]
    fn from_env_fails_when_both_credentials_are_missing() {
        let err = match config_from_pairs(&[]) {
            Ok(_) => panic!("config without credentials should fail"),
            Err(err) => err,
        };
        let msg = format!("{err:#}");

        assert!(msg.contains("TELEGRAM_BOT_TOKEN"), "unexpected message: {msg}");
        assert!(msg.contains("DEEPSEEK_API_KEY"), "unexpected message: {msg}");
    }

    #[test]
    fn from_env_names_only_the_missing_credential() {
        let err = match config_from_pairs(&[
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("DEEPSEEK_API_KEY", "   "),
        ]) {
            Ok(_) => panic!("blank api key should fail"),
            Err(err) => err,
        };
        let msg = format!("{err:#}");

        assert!(
            msg.contains("(missing: DEEPSEEK_API_KEY)"),
            "unexpected message: {msg}"
        );
    }

    #[test]
    fn parse_secret_rejects_missing_or_blank_values() {
        assert_eq!(parse_secret(None), None);
        assert_eq!(parse_secret(Some("  ")), None);
        assert_eq!(parse_secret(Some(" key ")), Some("key".to_string()));
    }

    #[test]
    fn parse_api_url_falls_back_to_default() {
        assert_eq!(parse_api_url(None), DEFAULT_API_URL);
        assert_eq!(parse_api_url(Some("")), DEFAULT_API_URL);
        assert_eq!(parse_api_url(Some("http://proxy/v1")), "http://proxy/v1");
    }

    #[test]
    fn parse_model_timeout_secs_uses_default_for_missing_or_invalid_values() {
        assert_eq!(parse_model_timeout_secs(None), DEFAULT_MODEL_TIMEOUT_SECS);
        assert_eq!(
            parse_model_timeout_secs(Some("not-a-number")),
            DEFAULT_MODEL_TIMEOUT_SECS
        );
        assert_eq!(
            parse_model_timeout_secs(Some("0")),
            DEFAULT_MODEL_TIMEOUT_SECS
        );
    }

    #[test]
    fn parse_model_timeout_secs_accepts_positive_integer() {
        assert_eq!(parse_model_timeout_secs(Some("  45  ")), 45);
    }
}
