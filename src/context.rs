// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshcut Team

//! Context lifecycle and ownership.
//!
//! Contexts live in a process-global, generation-checked arena, so a
//! released handle is detected as stale instead of aliasing a new
//! context. The global lock is held only long enough to clone out the
//! per-context `Arc`; each context then serializes its own calls on its
//! own mutex, so operations on distinct contexts never contend.

use std::sync::{Arc, LazyLock, Mutex};

use slotmap::{new_key_type, SlotMap};

use crate::component::ConnectedComponent;
use crate::diagnostics::{DebugCallback, DebugFilter};
use crate::error::Error;
use crate::flags::{ComponentType, ContextFlags, DebugSeverity, DebugSource, DebugType};

new_key_type! {
    pub(crate) struct ContextKey;
    pub(crate) struct ComponentKey;
}

/// Opaque handle to a context. `Copy`, cheap, and safe to hold after the
/// context is released: stale use fails with `InvalidValue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ContextHandle(pub(crate) ContextKey);

/// Opaque handle to a connected component. Carries its owning context,
/// so use against a different context is detected rather than silently
/// touching the wrong registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ComponentHandle {
    pub(crate) context: ContextKey,
    pub(crate) key: ComponentKey,
}

/// Mutable state owned by one context.
pub(crate) struct ContextState {
    pub flags: ContextFlags,
    pub callback: Option<DebugCallback>,
    pub filter: DebugFilter,
    components: SlotMap<ComponentKey, ConnectedComponent>,
    /// Component keys in creation order; enumeration order is stable.
    order: Vec<ComponentKey>,
}

impl ContextState {
    fn new(flags: ContextFlags) -> Self {
        ContextState {
            flags,
            callback: None,
            filter: DebugFilter::default(),
            components: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    /// Registers one engine artifact, preserving creation order.
    pub(crate) fn register(&mut self, component: ConnectedComponent) -> ComponentKey {
        let key = self.components.insert(component);
        self.order.push(key);
        key
    }

    pub(crate) fn component(&self, key: ComponentKey) -> Option<&ConnectedComponent> {
        self.components.get(key)
    }

    /// Handles of components matching the filter, in creation order.
    pub(crate) fn matching(
        &self,
        context: ContextKey,
        filter: ComponentType,
    ) -> Vec<ComponentHandle> {
        self.order
            .iter()
            .filter(|key| {
                self.components
                    .get(**key)
                    .is_some_and(|c| filter.intersects(c.component_type()))
            })
            .map(|key| ComponentHandle {
                context,
                key: *key,
            })
            .collect()
    }

    pub(crate) fn release_all(&mut self) {
        self.components.clear();
        self.order.clear();
    }

    /// Releases exactly the given components. Fails before touching
    /// anything if any handle is foreign or stale.
    pub(crate) fn release(
        &mut self,
        context: ContextKey,
        handles: &[ComponentHandle],
    ) -> Result<(), Error> {
        for (index, handle) in handles.iter().enumerate() {
            if handle.context != context || !self.components.contains_key(handle.key) {
                return Err(Error::Parameter(format!(
                    "connected component handle at index {index} not owned by this context"
                )));
            }
        }
        for handle in handles {
            self.components.remove(handle.key);
        }
        self.order.retain(|key| self.components.contains_key(*key));
        Ok(())
    }

    /// Forwards a diagnostic event to the registered callback if the
    /// filter lets it through.
    pub(crate) fn emit_debug(
        &self,
        source: DebugSource,
        ty: DebugType,
        severity: DebugSeverity,
        message: &str,
    ) {
        if let Some(callback) = &self.callback {
            if self.filter.allows(source, ty, severity) {
                callback(source, ty, severity, message);
            }
        }
    }
}

type Registry = SlotMap<ContextKey, Arc<Mutex<ContextState>>>;

static REGISTRY: LazyLock<Mutex<Registry>> = LazyLock::new(|| Mutex::new(SlotMap::with_key()));

fn registry() -> std::sync::MutexGuard<'static, Registry> {
    // A poisoned registry lock means a panic escaped a context operation;
    // the state itself is still usable for handle bookkeeping.
    REGISTRY.lock().unwrap_or_else(|e| e.into_inner())
}

pub(crate) fn create(flags: ContextFlags) -> ContextHandle {
    let key = registry().insert(Arc::new(Mutex::new(ContextState::new(flags))));
    ContextHandle(key)
}

/// Resolves a handle to its context, or fails with the stale/invalid
/// handle diagnostic.
pub(crate) fn lookup(handle: ContextHandle) -> Result<Arc<Mutex<ContextState>>, Error> {
    registry()
        .get(handle.0)
        .cloned()
        .ok_or_else(|| Error::Parameter("context handle invalid (released or never created)".into()))
}

/// Removes the context, dropping every component it owns.
pub(crate) fn destroy(handle: ContextHandle) -> Result<(), Error> {
    registry()
        .remove(handle.0)
        .map(|_| ())
        .ok_or_else(|| Error::Parameter("context handle invalid (released or never created)".into()))
}
