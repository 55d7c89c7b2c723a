use std::collections::HashMap;

use interpreter::Local;
use log::trace;

#[derive(Debug, Default)]
struct Frame {
    names: HashMap<String, usize>,
    declared: Vec<usize>,
}

/// Tracks which identifiers are locally bound at the current point of the
/// traversal. Every binding gets its own slot; names that are not bound in
/// any open frame are model-bound.
#[derive(Debug, Default)]
pub struct ScopeTracker {
    frames: Vec<Frame>,
    slots: usize,
}

impl ScopeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self) {
        self.frames.push(Frame::default());
    }

    /// Closes the innermost frame, returning the slots declared in it.
    pub fn pop(&mut self) -> Vec<usize> {
        self.frames
            .pop()
            .map(|frame| frame.declared)
            .unwrap_or_default()
    }

    /// Total slots handed out so far.
    pub fn slot_count(&self) -> usize {
        self.slots
    }

    /// Searches the open frames from the innermost outwards.
    pub fn resolve(&self, name: &str) -> Option<Local> {
        let local = self.frames.iter().rev().find_map(|frame| {
            frame.names.get(name).map(|slot| Local {
                slot: *slot,
                name: name.to_string(),
            })
        });
        match &local {
            Some(local) => trace!("`{name}` is local (slot {})", local.slot),
            None => trace!("`{name}` is model-bound"),
        }
        local
    }

    /// Introduces a fresh binding in the innermost frame, shadowing any
    /// binding of the same name further out.
    pub fn declare(&mut self, name: &str) -> Local {
        let slot = self.slots;
        self.slots += 1;
        if self.frames.is_empty() {
            self.push();
        }
        if let Some(frame) = self.frames.last_mut() {
            frame.names.insert(name.to_string(), slot);
            frame.declared.push(slot);
        }
        Local {
            slot,
            name: name.to_string(),
        }
    }

    /// Reuses the visible binding of `name` or declares a new one. The flag
    /// is `true` when a new binding was created.
    pub fn bind(&mut self, name: &str) -> (Local, bool) {
        match self.resolve(name) {
            Some(local) => (local, false),
            None => (self.declare(name), true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbound_names_are_model_bound() {
        let mut scope = ScopeTracker::new();
        scope.push();
        assert_eq!(scope.resolve("x"), None);
        let x = scope.declare("x");
        assert_eq!(scope.resolve("x"), Some(x));
    }

    #[test]
    fn inner_frames_see_outer_bindings_until_popped() {
        let mut scope = ScopeTracker::new();
        scope.push();
        let (outer, created) = scope.bind("x");
        assert!(created);

        scope.push();
        let (inner, created) = scope.bind("x");
        assert!(!created);
        assert_eq!(inner, outer);

        let y = scope.declare("y");
        assert_eq!(scope.pop(), vec![y.slot]);
        assert_eq!(scope.resolve("y"), None);
        assert_eq!(scope.resolve("x"), Some(outer));
    }

    #[test]
    fn declare_shadows() {
        let mut scope = ScopeTracker::new();
        scope.push();
        let outer = scope.declare("i");
        scope.push();
        let inner = scope.declare("i");
        assert_ne!(inner.slot, outer.slot);
        assert_eq!(scope.resolve("i"), Some(inner));
        scope.pop();
        assert_eq!(scope.resolve("i"), Some(outer));
        assert_eq!(scope.slot_count(), 2);
    }
}
