#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use plural_gate::config;
use plural_gate_core::protocol::host::Hook;

#[test]
fn ok_minimal_config_uses_defaults() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.gatekeeper.service_url, "http://app-service:9000/check");
    assert_eq!(cfg.gatekeeper.bot_id, "@plural_bot:localhost");
    assert_eq!(cfg.gatekeeper.proxy_sender_prefix, "@_plural_");
    assert_eq!(cfg.gatekeeper.oracle_timeout(), Duration::from_secs(2));
    assert_eq!(cfg.host.api_version, 1);
    assert!(cfg.host.hooks.is_empty());
}

#[test]
fn full_config() {
    let ok = r#"
version: 1
gatekeeper:
  service_url: "https://oracle.internal/check"
  bot_id: "@pk:example.org"
  oracle_timeout_ms: 750
sidecar:
  listen: "0.0.0.0:9100"
host:
  api_version: 1
  hooks: [check_event_allowed, check_visibility_can_see_event, on_new_event]
  homeserver_url: "http://synapse:8008"
  as_token: "secret"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.gatekeeper.oracle_timeout(), Duration::from_millis(750));
    assert!(cfg.host.descriptor().offers(Hook::CheckVisibilityCanSeeEvent));
    assert!(cfg.gatekeeper.bot_identity().is_bot("@pk:example.org"));
    assert_eq!(cfg.sidecar.listen, "0.0.0.0:9100");
}

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
gatekeeper:
  service_urll: "http://x/check" # typo should fail
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "BAD_REQUEST");
}

#[test]
fn unknown_hook_name_fails() {
    let bad = "version: 1\nhost:\n  hooks: [check_everything]\n";
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "BAD_REQUEST");
}

#[test]
fn oracle_timeout_is_capped() {
    for ms in [0, 2001, 30000] {
        let bad = format!("version: 1\ngatekeeper:\n  oracle_timeout_ms: {ms}\n");
        let err = config::load_from_str(&bad).expect_err("must fail");
        assert_eq!(err.code().as_str(), "BAD_REQUEST", "timeout {ms}");
    }
}

#[test]
fn bot_id_must_be_a_user_id() {
    let bad = "version: 1\ngatekeeper:\n  bot_id: \"plural_bot\"\n";
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "BAD_REQUEST");
}

#[test]
fn urls_must_be_http() {
    for bad in [
        "version: 1\ngatekeeper:\n  service_url: \"ftp://oracle/check\"\n",
        "version: 1\nhost:\n  homeserver_url: \"not a url\"\n",
    ] {
        let err = config::load_from_str(bad).expect_err("must fail");
        assert_eq!(err.code().as_str(), "BAD_REQUEST");
    }
}

#[test]
fn unsupported_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.code().as_str(), "UNSUPPORTED_VERSION");
}
