//! Payload normalizer vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;

use serde::Deserialize;
use serde_json::Value;

use plural_gate_core::{normalize, BotIdentity, Event};

#[derive(Debug, Deserialize)]
struct NormalizeVector {
    description: String,
    event: Event,
    expect: Option<Value>,
}

fn load(name: &str) -> NormalizeVector {
    let s = fs::read_to_string(format!("tests/vectors/{name}")).unwrap();
    serde_json::from_str(&s).unwrap_or_else(|e| panic!("bad vector {name}: {e}"))
}

fn bot() -> BotIdentity {
    BotIdentity::new("@plural_bot:localhost", "@_plural_")
}

fn check(name: &str) {
    let v = load(name);
    let got = normalize(&v.event, &bot()).map(|r| serde_json::to_value(r).unwrap());
    assert_eq!(got, v.expect, "{name}: {}", v.description);
}

#[test]
fn plain_text_message() {
    check("message_text.json");
}

#[test]
fn message_without_id() {
    check("message_no_id.json");
}

#[test]
fn non_text_msgtype() {
    check("message_image.json");
}

#[test]
fn encrypted_message() {
    check("encrypted.json");
}

#[test]
fn bot_sender() {
    check("bot_sender.json");
}

#[test]
fn ghost_sender() {
    check("ghost_sender.json");
}

#[test]
fn state_event() {
    check("state_event.json");
}
