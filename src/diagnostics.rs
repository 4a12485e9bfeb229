// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshcut Team

//! Per-thread diagnostic log and debug-event filtering.
//!
//! Every entry point clears the calling thread's log buffer on entry and
//! writes the failure message there (if any) before returning. The buffer
//! belongs to exactly one thread; no other thread ever reads or writes it.

use std::cell::RefCell;

use ahash::AHashSet;

use crate::flags::{DebugSeverity, DebugSource, DebugType};

thread_local! {
    static API_LOG: RefCell<String> = const { RefCell::new(String::new()) };
}

/// Clears the calling thread's diagnostic buffer. Runs at entry to every
/// public call.
pub(crate) fn clear_api_log() {
    API_LOG.with(|log| log.borrow_mut().clear());
}

pub(crate) fn set_api_log(message: &str) {
    API_LOG.with(|log| {
        let mut log = log.borrow_mut();
        log.clear();
        log.push_str(message);
    });
}

/// Returns the diagnostic message of the last failed call made by the
/// calling thread, or an empty string if the last call succeeded.
pub fn last_api_log() -> String {
    API_LOG.with(|log| log.borrow().clone())
}

/// Callback invoked for diagnostic events that pass the context's filter.
/// State that the C-style API would pass through an opaque user pointer is
/// carried by closure capture instead.
pub type DebugCallback = Box<dyn Fn(DebugSource, DebugType, DebugSeverity, &str) + Send + Sync>;

const SOURCES: [DebugSource; 1] = [DebugSource::KERNEL];
const TYPES: [DebugType; 3] = [DebugType::DEPRECATED, DebugType::ERROR, DebugType::OTHER];
const SEVERITIES: [DebugSeverity; 4] = [
    DebugSeverity::HIGH,
    DebugSeverity::MEDIUM,
    DebugSeverity::LOW,
    DebugSeverity::NOTIFICATION,
];

/// Which (source, type, severity) combinations are forwarded to the
/// registered callback. Stored as the set of enabled concrete atoms so
/// that toggling e.g. `(KERNEL, ERROR, ALL)` composes with earlier
/// toggles instead of overwriting them.
pub(crate) struct DebugFilter {
    enabled: AHashSet<(u32, u32, u32)>,
}

impl Default for DebugFilter {
    fn default() -> Self {
        let mut filter = DebugFilter {
            enabled: AHashSet::new(),
        };
        filter.set(DebugSource::ALL, DebugType::ALL, DebugSeverity::ALL, true);
        filter
    }
}

impl DebugFilter {
    /// Enables or disables every concrete combination covered by the
    /// given (possibly `ALL`-valued) selectors.
    pub(crate) fn set(
        &mut self,
        source: DebugSource,
        ty: DebugType,
        severity: DebugSeverity,
        enabled: bool,
    ) {
        for s in SOURCES.iter().filter(|s| source.contains(**s)) {
            for t in TYPES.iter().filter(|t| ty.contains(**t)) {
                for v in SEVERITIES.iter().filter(|v| severity.contains(**v)) {
                    let atom = (s.bits(), t.bits(), v.bits());
                    if enabled {
                        self.enabled.insert(atom);
                    } else {
                        self.enabled.remove(&atom);
                    }
                }
            }
        }
    }

    /// Whether an event with the given concrete attributes passes.
    pub(crate) fn allows(
        &self,
        source: DebugSource,
        ty: DebugType,
        severity: DebugSeverity,
    ) -> bool {
        self.enabled
            .contains(&(source.bits(), ty.bits(), severity.bits()))
    }
}
