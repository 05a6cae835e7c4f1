#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::HashMap;

use visitrack_server::config::{self, ServerConfig};

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
server:
  prot: 4000 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "INVALID_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.server.host, "0.0.0.0");
    assert_eq!(cfg.server.port, 3000);
    assert_eq!(cfg.cors.max_age_secs, 3600);
}

#[test]
fn rejects_unsupported_version_and_bad_host() {
    assert!(config::load_from_str("version: 2\n").is_err());
    assert!(config::load_from_str("version: 1\nserver:\n  host: \"not a host\"\n").is_err());
    assert!(config::load_from_str("version: 1\ncors:\n  max_age_secs: 90000\n").is_err());
}

#[test]
fn port_defaults_to_3000_without_env() {
    let cfg = ServerConfig::default().apply_env(env(&[])).unwrap();
    assert_eq!(cfg.listen_addr().unwrap().port(), 3000);
}

#[test]
fn port_env_overrides_file() {
    let cfg = config::load_from_str("version: 1\nserver:\n  port: 4000\n").unwrap();
    let cfg = cfg.apply_env(env(&[("PORT", "8081")])).unwrap();
    assert_eq!(cfg.server.port, 8081);
}

#[test]
fn invalid_port_env_is_an_error() {
    for raw in ["abc", "70000", "-1"] {
        let err = ServerConfig::default()
            .apply_env(env(&[("PORT", raw)]))
            .expect_err("must fail");
        assert!(err.to_string().contains("PORT"), "{err}");
    }
}

#[test]
fn empty_port_env_falls_back_to_default() {
    let cfg = ServerConfig::default().apply_env(env(&[("PORT", "")])).unwrap();
    assert_eq!(cfg.server.port, 3000);
}
