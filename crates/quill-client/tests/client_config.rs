use quill_client::config::ClientConfig;
use quill_test::test;
use std::{env, time::Duration};

const CONFIG_ROOT: &str = "./tests/client_configs";

#[test(serial = "env")]
fn test_defaults_without_file() {
    let cfg = ClientConfig::load(None).unwrap();
    assert_eq!(cfg, ClientConfig::default());
    assert_eq!(cfg.coordinator.persist_timeout(), Some(Duration::from_secs(5)));
    assert_eq!(cfg.cart.max_quantity, 99);
    assert_eq!(cfg.toast.ttl(), Duration::from_secs(4));
}

#[test(serial = "env")]
fn test_file_overrides_defaults() {
    let cfg = ClientConfig::load(Some(format!("{CONFIG_ROOT}/client.json").into())).unwrap();
    log::debug!("{cfg:#?}");

    assert_eq!(cfg.coordinator.persist_timeout(), Some(Duration::from_millis(2500)));
    assert_eq!(cfg.cart.max_quantity, 20);
    assert_eq!(cfg.toast.ttl_ms, 4_000);
}

#[test(serial = "env")]
fn test_env_overrides_file() {
    env::set_var("QUILL--CART--MAX_QUANTITY", "12");
    env::set_var("QUILL--TOAST--TTL_MS", "750");

    let cfg = ClientConfig::load(Some(format!("{CONFIG_ROOT}/client.json").into()));

    env::remove_var("QUILL--CART--MAX_QUANTITY");
    env::remove_var("QUILL--TOAST--TTL_MS");

    let cfg = cfg.unwrap();
    assert_eq!(cfg.cart.max_quantity, 12);
    assert_eq!(cfg.toast.ttl_ms, 750);
    assert_eq!(cfg.coordinator.persist_timeout_ms, Some(2500));
}

#[test(serial = "env")]
fn test_missing_file_is_an_error() {
    assert!(ClientConfig::load(Some(format!("{CONFIG_ROOT}/missing.json").into())).is_err());
}
