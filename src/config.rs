use std::fmt;

use anyhow::bail;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_TWIML_URL: &str =
    "https://handler.twilio.com/twiml/EHca3729a5f618dc0a1f247d78f36bfd8c";
const DEFAULT_API_BASE: &str = "https://api.twilio.com";

/// Everything the hook needs, read once at startup and never mutated.
#[derive(Clone)]
pub struct Config {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
    pub to_number: String,
    pub may_i_answer: String,
    pub port: u16,
    pub twiml_url: String,
    pub api_base: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Required values that
    /// are missing or empty fail with the name of the variable.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> anyhow::Result<String> {
            match lookup(key) {
                Some(value) if !value.is_empty() => Ok(value),
                _ => bail!("Please set {}", key),
            }
        };

        let account_sid = required("TWILIO_ACCOUNT_SID")?;
        let auth_token = required("TWILIO_AUTH_TOKEN")?;
        let from_number = required("TWILIO_FROM_NUMBER")?;
        let to_number = required("TWILIO_TO_NUMBER")?;
        let may_i_answer = required("MAY_I_ANSWER")?;

        let port: u16 = lookup("CALLMOM_PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let twiml_url =
            lookup("CALLMOM_TWIML_URL").unwrap_or_else(|| DEFAULT_TWIML_URL.to_string());
        let api_base = lookup("TWILIO_API_BASE")
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            account_sid,
            auth_token,
            from_number,
            to_number,
            may_i_answer,
            port,
            twiml_url,
            api_base,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .field("from_number", &self.from_number)
            .field("to_number", &self.to_number)
            .field("may_i_answer", &"<redacted>")
            .field("port", &self.port)
            .field("twiml_url", &self.twiml_url)
            .field("api_base", &self.api_base)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;

    use super::*;

    pub(crate) fn full_env() -> HashMap<&'static str, String> {
        HashMap::from([
            ("TWILIO_ACCOUNT_SID", "AC123".to_string()),
            ("TWILIO_AUTH_TOKEN", "sekrit-token".to_string()),
            ("TWILIO_FROM_NUMBER", "+15550001111".to_string()),
            ("TWILIO_TO_NUMBER", "+15552223333".to_string()),
            ("MAY_I_ANSWER", "please".to_string()),
        ])
    }

    fn load(env: &HashMap<&'static str, String>) -> anyhow::Result<Config> {
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn loads_required_values_and_defaults() {
        let config = load(&full_env()).unwrap();
        assert_eq!(config.account_sid, "AC123");
        assert_eq!(config.to_number, "+15552223333");
        assert_eq!(config.may_i_answer, "please");
        assert_eq!(config.port, 5000);
        assert_eq!(config.twiml_url, DEFAULT_TWIML_URL);
        assert_eq!(config.api_base, "https://api.twilio.com");
    }

    #[test]
    fn each_missing_variable_is_named() {
        for key in [
            "TWILIO_ACCOUNT_SID",
            "TWILIO_AUTH_TOKEN",
            "TWILIO_FROM_NUMBER",
            "TWILIO_TO_NUMBER",
            "MAY_I_ANSWER",
        ] {
            let mut env = full_env();
            env.remove(key);
            let err = load(&env).unwrap_err();
            assert_eq!(err.to_string(), format!("Please set {}", key));
        }
    }

    #[test]
    fn empty_secret_is_rejected() {
        let mut env = full_env();
        env.insert("MAY_I_ANSWER", String::new());
        assert!(load(&env).is_err());
    }

    #[test]
    fn optional_overrides() {
        let mut env = full_env();
        env.insert("CALLMOM_PORT", "8080".to_string());
        env.insert("TWILIO_API_BASE", "http://localhost:9999/".to_string());
        let config = load(&env).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.api_base, "http://localhost:9999");

        env.insert("CALLMOM_PORT", "not-a-port".to_string());
        assert_eq!(load(&env).unwrap().port, 5000);
    }

    #[test]
    fn debug_hides_secrets() {
        let rendered = format!("{:?}", load(&full_env()).unwrap());
        assert!(!rendered.contains("sekrit"));
        assert!(!rendered.contains("please"));
        assert!(rendered.contains("AC123"));
    }
}
