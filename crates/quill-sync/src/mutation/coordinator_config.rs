use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_PERSIST_TIMEOUT_MS: u64 = 5_000;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct CoordinatorConfig {
    /// Time limit of a persist request, expiry counts as a failure. `null` disables the limit.
    pub persist_timeout_ms: Option<u64>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            persist_timeout_ms: Some(DEFAULT_PERSIST_TIMEOUT_MS),
        }
    }
}

impl CoordinatorConfig {
    pub fn with_persist_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.persist_timeout_ms = timeout.map(|t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn persist_timeout(&self) -> Option<Duration> {
        self.persist_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use quill_test::test;

    #[test]
    fn missing_timeout_uses_default() {
        let cfg: CoordinatorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.persist_timeout(), Some(Duration::from_millis(DEFAULT_PERSIST_TIMEOUT_MS)));
    }

    #[test]
    fn null_timeout_disables_limit() {
        let cfg: CoordinatorConfig = serde_json::from_str(r#"{"persistTimeoutMs": null}"#).unwrap();
        assert_eq!(cfg.persist_timeout(), None);

        let cfg: CoordinatorConfig = serde_json::from_str(r#"{"persistTimeoutMs": 250}"#).unwrap();
        assert_eq!(cfg.persist_timeout(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn oversized_timeout_saturates() {
        let cfg = CoordinatorConfig::default().with_persist_timeout(Some(Duration::MAX));
        assert_eq!(cfg.persist_timeout_ms, Some(u64::MAX));

        let cfg = CoordinatorConfig::default().with_persist_timeout(Some(Duration::from_millis(1_500)));
        assert_eq!(cfg.persist_timeout_ms, Some(1_500));
        assert_eq!(cfg.with_persist_timeout(None).persist_timeout(), None);
    }
}
