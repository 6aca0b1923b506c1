//! Button mask state for one session

use crate::engine::Engine;

use super::{ButtonMask, KeyBinding};

/// Folds key transitions into a [`ButtonMask`].
///
/// Unrecognized keys are ignored. Setting and clearing bits are idempotent,
/// so auto-repeated key-down events need no filtering.
#[derive(Debug, Clone, Default)]
pub struct ButtonEncoder {
    binding: KeyBinding,
    mask: ButtonMask,
}

impl ButtonEncoder {
    /// Create an encoder with an empty mask
    pub fn new(binding: KeyBinding) -> Self {
        Self {
            binding,
            mask: ButtonMask::empty(),
        }
    }

    /// Handle a key press. Returns `true` if the key is bound.
    pub fn on_key_down(&mut self, key: &str) -> bool {
        match self.binding.get(key) {
            Some(button) => {
                self.mask.insert(button.mask());
                true
            }
            None => false,
        }
    }

    /// Handle a key release. Returns `true` if the key is bound.
    pub fn on_key_up(&mut self, key: &str) -> bool {
        match self.binding.get(key) {
            Some(button) => {
                self.mask.remove(button.mask());
                true
            }
            None => false,
        }
    }

    /// Currently held buttons
    pub fn current_mask(&self) -> ButtonMask {
        self.mask
    }

    /// Forward the mask to the engine, whether or not it changed
    pub fn publish<E: Engine + ?Sized>(&self, engine: &mut E) {
        engine.update_buttons(self.mask);
    }

    /// Replace the whole binding table.
    ///
    /// The mask is cleared: a key held under the old table has no release
    /// path under the new one.
    pub fn set_binding(&mut self, binding: KeyBinding) {
        tracing::debug!(keys = binding.len(), "key binding replaced");
        self.binding = binding;
        self.mask = ButtonMask::empty();
    }

    /// Drop every held button (focus loss)
    pub fn release_all(&mut self) {
        self.mask = ButtonMask::empty();
    }

    pub fn binding(&self) -> &KeyBinding {
        &self.binding
    }
}
