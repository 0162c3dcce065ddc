use std::{collections::HashMap, env};

use config::{ConfigError, Map, Source, Value, ValueKind};

pub const ENV_PREFIX: &str = "quill--";
pub const ENV_SEPARATOR: &str = "--";

/// Environment source with `QUILL--SECTION--SNAKE_CASE_KEY` variables mapped to `section.camelCaseKey`.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    extra_conversion: HashMap<String, String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed spelling for a key segment instead of the camelCase conversion, ex. `MS` -> `Ms`.
    pub fn with_conversion(mut self, segment: &str, key: &str) -> Self {
        self.extra_conversion.insert(segment.to_lowercase(), key.to_owned());
        self
    }

    fn convert_key_case(&self, key: &str) -> String {
        key.split('_')
            .enumerate()
            .map(|(i, s)| {
                if let Some(key) = self.extra_conversion.get(s) {
                    key.to_string()
                } else if i == 0 {
                    s.to_lowercase()
                } else {
                    let mut chars = s.chars();
                    chars
                        .next()
                        .map(|c| c.to_uppercase().collect::<String>())
                        .unwrap_or_default()
                        + &chars.as_str().to_lowercase()
                }
            })
            .collect()
    }

    /// Map an environment variable name to a config key, `None` if it is not a client setting.
    pub fn config_key(&self, env_key: &str) -> Option<String> {
        let key = env_key.to_lowercase();
        let key = key.strip_prefix(ENV_PREFIX)?;
        Some(
            key.split(ENV_SEPARATOR)
                .map(|k| self.convert_key_case(k))
                .collect::<Vec<_>>()
                .join("."),
        )
    }
}

impl Source for Environment {
    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new((*self).clone())
    }

    fn collect(&self) -> Result<Map<String, Value>, ConfigError> {
        let uri: String = "environment".into();

        let mut m = Map::new();
        for (env_key, value) in env::vars() {
            // empty variables are treated as unset
            if value.is_empty() {
                continue;
            }
            if let Some(key) = self.config_key(&env_key) {
                log::debug!("Reading env {} as {}...", env_key, key);
                m.insert(key, Value::new(Some(&uri), ValueKind::String(value)));
            }
        }

        log::trace!("Environment: {:#?}", m);
        Ok(m)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use quill_test::test;

    #[test]
    fn env_keys_are_mapped_to_camel_case_paths() {
        let env = Environment::new();
        assert_eq!(
            env.config_key("QUILL--CART--MAX_QUANTITY").as_deref(),
            Some("cart.maxQuantity")
        );
        assert_eq!(
            env.config_key("QUILL--COORDINATOR--PERSIST_TIMEOUT_MS").as_deref(),
            Some("coordinator.persistTimeoutMs")
        );
        assert_eq!(env.config_key("PATH"), None);
    }

    #[test]
    fn extra_conversion_overrides_segments() {
        let env = Environment::new().with_conversion("ttl", "TTL");
        assert_eq!(env.config_key("QUILL--TOAST--TTL_MS").as_deref(), Some("toast.TTLMs"));
    }
}
