//! Tests for ButtonEncoder and KeyBinding

use super::{Button, ButtonEncoder, ButtonMask, KeyBinding};
use crate::test_utils::FakeEngine;

#[test]
fn test_bit_order() {
    let bits: Vec<u8> = Button::ALL.iter().map(|b| b.mask().bits()).collect();
    assert_eq!(bits, vec![1, 2, 4, 8, 16, 32, 64, 128]);
}

#[test]
fn test_button_names_match_serde() {
    for button in Button::ALL {
        let text = toml::Value::try_from(button).expect("serialize");
        assert_eq!(text.as_str(), Some(button.name()));
    }
}

#[test]
fn test_key_down_sets_bit() {
    let mut encoder = ButtonEncoder::new(KeyBinding::default());
    assert!(encoder.on_key_down("j"));
    assert_eq!(encoder.current_mask(), ButtonMask::A);
    assert_eq!(encoder.current_mask().bits(), 0b0000_0001);
}

#[test]
fn test_repeated_key_down_is_idempotent() {
    let mut encoder = ButtonEncoder::new(KeyBinding::default());
    encoder.on_key_down("j");
    encoder.on_key_down("j");
    assert_eq!(encoder.current_mask(), ButtonMask::A);
}

#[test]
fn test_key_up_of_unset_bit_is_noop() {
    let mut encoder = ButtonEncoder::new(KeyBinding::default());
    encoder.on_key_down("k");
    assert!(encoder.on_key_up("ArrowUp"));
    assert_eq!(encoder.current_mask(), ButtonMask::B);
}

#[test]
fn test_unknown_key_ignored() {
    let mut encoder = ButtonEncoder::new(KeyBinding::default());
    assert!(!encoder.on_key_down("q"));
    assert!(!encoder.on_key_up("q"));
    assert_eq!(encoder.current_mask(), ButtonMask::empty());
}

#[test]
fn test_both_cases_share_a_bit() {
    let mut encoder = ButtonEncoder::new(KeyBinding::default());
    encoder.on_key_down("J");
    encoder.on_key_up("j");
    assert_eq!(encoder.current_mask(), ButtonMask::empty());
}

#[test]
fn test_all_buttons_held() {
    let mut encoder = ButtonEncoder::new(KeyBinding::default());
    for key in ["j", "k", "Enter", "Shift", "w", "s", "a", "d"] {
        assert!(encoder.on_key_down(key));
    }
    assert_eq!(encoder.current_mask(), ButtonMask::all());
    assert_eq!(encoder.current_mask().bits(), 0xFF);
}

#[test]
fn test_publish_forwards_mask() {
    let mut encoder = ButtonEncoder::new(KeyBinding::default());
    let mut engine = FakeEngine::default();

    encoder.on_key_down("ArrowRight");
    encoder.publish(&mut engine);
    encoder.publish(&mut engine);

    assert_eq!(engine.masks, vec![ButtonMask::RIGHT, ButtonMask::RIGHT]);
}

#[test]
fn test_set_binding_clears_mask() {
    let mut encoder = ButtonEncoder::new(KeyBinding::default());
    encoder.on_key_down("Enter");

    encoder.set_binding(KeyBinding::from_pairs([("Space", Button::Start)]));

    assert_eq!(encoder.current_mask(), ButtonMask::empty());
    assert!(!encoder.on_key_down("Enter"));
    assert!(encoder.on_key_down("Space"));
    assert_eq!(encoder.binding().len(), 1);
}

#[test]
fn test_release_all() {
    let mut encoder = ButtonEncoder::new(KeyBinding::default());
    encoder.on_key_down("a");
    encoder.on_key_down("k");
    encoder.release_all();
    assert_eq!(encoder.current_mask(), ButtonMask::empty());
}

#[test]
fn test_default_binding_covers_every_button() {
    let binding = KeyBinding::default();
    for button in Button::ALL {
        assert!(!binding.keys_for(button).is_empty(), "{} unbound", button.name());
    }
    assert_eq!(binding.keys_for(Button::A), vec!["J", "j"]);
}

#[test]
fn test_from_pairs_later_wins() {
    let binding = KeyBinding::from_pairs([("x", Button::A), ("x", Button::B)]);
    assert_eq!(binding.get("x"), Some(Button::B));
    assert_eq!(binding.len(), 1);
}

#[test]
fn test_key_binding_roundtrip() {
    let binding = KeyBinding::default();

    let toml_str = toml::to_string(&binding).expect("serialize");
    assert!(toml_str.contains("ArrowUp"));
    assert!(toml_str.contains("Enter"));

    let parsed: KeyBinding = toml::from_str(&toml_str).expect("deserialize");
    assert_eq!(parsed, binding);
}
