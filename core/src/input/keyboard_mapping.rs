//! Key identifier to button mapping

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::Button;

/// Maps host key identifiers (DOM `KeyboardEvent.key` values) to buttons.
///
/// Lookups are exact: `"j"` and `"J"` are separate entries, which is why the
/// default binding lists both cases for letter keys. A binding is never edited
/// in place once handed to an encoder; remapping swaps the whole table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBinding {
    keys: HashMap<String, Button>,
}

impl KeyBinding {
    /// Build a binding from `(key, button)` pairs. Later pairs win.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Button)>,
        K: Into<String>,
    {
        Self {
            keys: pairs.into_iter().map(|(k, b)| (k.into(), b)).collect(),
        }
    }

    /// Look up the button bound to `key`
    pub fn get(&self, key: &str) -> Option<Button> {
        self.keys.get(key).copied()
    }

    /// Keys bound to `button`, sorted for stable display
    pub fn keys_for(&self, button: Button) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .keys
            .iter()
            .filter(|&(_, &b)| b == button)
            .map(|(k, _)| k.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for KeyBinding {
    fn default() -> Self {
        Self::from_pairs([
            ("j", Button::A),
            ("J", Button::A),
            ("k", Button::B),
            ("K", Button::B),
            ("Enter", Button::Start),
            ("Shift", Button::Select),
            ("ArrowUp", Button::Up),
            ("w", Button::Up),
            ("W", Button::Up),
            ("ArrowDown", Button::Down),
            ("s", Button::Down),
            ("S", Button::Down),
            ("ArrowLeft", Button::Left),
            ("a", Button::Left),
            ("A", Button::Left),
            ("ArrowRight", Button::Right),
            ("d", Button::Right),
            ("D", Button::Right),
        ])
    }
}
