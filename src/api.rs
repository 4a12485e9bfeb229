// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshcut Team

//! Public entry points.
//!
//! Every function here follows the same discipline: clear the calling
//! thread's diagnostic buffer, run the ordered parameter checks, then do
//! the work, all inside one boundary wrapper that converts any failure
//! (typed error or caught panic) into a [`ResultCode`], mirrors the
//! message to the thread log and stderr, and forwards a matching debug
//! event to the context's callback. Nothing else ever crosses the
//! boundary.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::context::{self, ComponentHandle, ContextHandle, ContextState};
use crate::diagnostics::{self, DebugCallback};
use crate::engine::MeshView;
use crate::error::{Error, ResultCode};
use crate::flags::{
    ComponentData, ComponentType, ContextFlags, ContextInfo, DebugSeverity, DebugSource,
    DebugType, DispatchFlags,
};
use crate::query;

/// Recovers the context lock even after a panic poisoned it; the
/// boundary has already turned that panic into a result code.
fn lock(state: &Arc<Mutex<ContextState>>) -> MutexGuard<'_, ContextState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("caught panic: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("caught panic: {s}")
    } else {
        "caught panic of unknown type".into()
    }
}

/// The single exit path for every entry point. `entry` names the call in
/// the stderr line; `ctx` (when resolvable) receives the debug event.
fn boundary<T>(
    entry: &str,
    ctx: Option<ContextHandle>,
    f: impl FnOnce() -> Result<T, Error>,
) -> Result<T, ResultCode> {
    diagnostics::clear_api_log();

    let outcome = panic::catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|payload| Err(Error::Unclassified(panic_message(payload))));

    match outcome {
        Ok(value) => Ok(value),
        Err(err) => {
            let message = err.to_string();
            diagnostics::set_api_log(&message);
            eprintln!("{entry}(...) -> {message}");
            if let Some(handle) = ctx {
                if let Ok(state) = context::lookup(handle) {
                    lock(&state).emit_debug(
                        DebugSource::KERNEL,
                        DebugType::ERROR,
                        DebugSeverity::HIGH,
                        &message,
                    );
                }
            }
            Err(ResultCode::from(&err))
        }
    }
}

/// Creates a new context. The flags are recorded and can be read back
/// through [`get_context_info`].
pub fn create_context(flags: ContextFlags) -> Result<ContextHandle, ResultCode> {
    boundary("create_context", None, || Ok(context::create(flags)))
}

/// Registers the diagnostic callback for a context, replacing any
/// previous registration. Events are delivered on whichever thread
/// triggers them.
pub fn set_debug_callback(
    ctx: ContextHandle,
    callback: DebugCallback,
) -> Result<(), ResultCode> {
    boundary("set_debug_callback", Some(ctx), || {
        let state = context::lookup(ctx)?;
        lock(&state).callback = Some(callback);
        Ok(())
    })
}

/// Enables or disables forwarding of diagnostic events matching
/// `(source, ty, severity)`. Each selector must be a documented member
/// of its set; out-of-set values fail before any filter state changes.
///
/// A rejected control call reports through the result code, thread log
/// and stderr only; it is not routed back through the debug channel it
/// was configuring.
pub fn set_debug_filter(
    ctx: ContextHandle,
    source: DebugSource,
    ty: DebugType,
    severity: DebugSeverity,
    enabled: bool,
) -> Result<(), ResultCode> {
    boundary("set_debug_filter", None, || {
        let state = context::lookup(ctx)?;
        if !(source == DebugSource::ALL || source == DebugSource::KERNEL) {
            return Err(Error::Parameter(format!(
                "invalid debug source value ({:#x})",
                source.bits()
            )));
        }
        if !(ty == DebugType::ALL
            || ty == DebugType::DEPRECATED
            || ty == DebugType::ERROR
            || ty == DebugType::OTHER)
        {
            return Err(Error::Parameter(format!(
                "invalid debug type value ({:#x})",
                ty.bits()
            )));
        }
        if !(severity == DebugSeverity::ALL
            || severity == DebugSeverity::HIGH
            || severity == DebugSeverity::MEDIUM
            || severity == DebugSeverity::LOW
            || severity == DebugSeverity::NOTIFICATION)
        {
            return Err(Error::Parameter(format!(
                "invalid debug severity value ({:#x})",
                severity.bits()
            )));
        }
        lock(&state).filter.set(source, ty, severity, enabled);
        Ok(())
    })
}

/// Queries a context property through the two-phase protocol: pass
/// `None` to learn the required byte size, then a buffer of exactly that
/// size to read the data. Only [`ContextInfo::CONTEXT_FLAGS`] is defined
/// today; the call shape admits future ids.
pub fn get_context_info(
    ctx: ContextHandle,
    info: ContextInfo,
    mem: Option<&mut [u8]>,
) -> Result<u64, ResultCode> {
    boundary("get_context_info", Some(ctx), || {
        let state = context::lookup(ctx)?;
        if info != ContextInfo::CONTEXT_FLAGS {
            return Err(Error::Parameter(format!(
                "invalid info query id ({:#x})",
                info.bits()
            )));
        }
        let guard = lock(&state);
        query::two_phase(mem, std::mem::size_of::<u32>() as u64, |buf| {
            buf.copy_from_slice(&guard.flags.bits().to_ne_bytes());
            Ok(())
        })
    })
}

/// Cuts `src` with `cut` and registers the resulting connected
/// components on the context.
///
/// The twelve documented precondition checks run strictly in order; the
/// first failure short-circuits and no engine work happens. On any
/// failure the context's component set is left untouched.
///
/// Concurrent calls are safe: calls on the same context serialize on its
/// internal lock, calls on distinct contexts proceed independently.
pub fn dispatch(
    ctx: ContextHandle,
    flags: DispatchFlags,
    src: &MeshView<'_>,
    cut: &MeshView<'_>,
) -> Result<(), ResultCode> {
    boundary("dispatch", Some(ctx), || {
        let state = context::lookup(ctx)?;
        if flags.is_empty() {
            return Err(Error::Parameter("dispatch flags unspecified".into()));
        }
        if flags.contains(DispatchFlags::REQUIRE_THROUGH_CUTS)
            && flags.contains(DispatchFlags::FILTER_FRAGMENT_LOCATION_UNDEFINED)
        {
            // Rejecting partial cuts while keeping their fragments is
            // contradictory.
            return Err(Error::Parameter(
                "use of mutually-exclusive flags: REQUIRE_THROUGH_CUTS & \
                 FILTER_FRAGMENT_LOCATION_UNDEFINED"
                    .into(),
            ));
        }
        if !flags
            .intersects(DispatchFlags::VERTEX_ARRAY_FLOAT | DispatchFlags::VERTEX_ARRAY_DOUBLE)
        {
            return Err(Error::Parameter(
                "dispatch vertex array type unspecified".into(),
            ));
        }
        if src.vertices.is_none() {
            return Err(Error::Parameter(
                "source-mesh vertex-position array undefined".into(),
            ));
        }
        if src.vertex_count() < 3 {
            return Err(Error::Parameter("invalid source-mesh vertex count".into()));
        }
        if src.face_indices.is_none() {
            return Err(Error::Parameter(
                "source-mesh face-index array undefined".into(),
            ));
        }
        if src.face_count() < 1 {
            return Err(Error::Parameter("invalid source-mesh face count".into()));
        }
        if cut.vertices.is_none() {
            return Err(Error::Parameter(
                "cut-mesh vertex-position array undefined".into(),
            ));
        }
        if cut.vertex_count() < 3 {
            return Err(Error::Parameter("invalid cut-mesh vertex count".into()));
        }
        if cut.face_indices.is_none() {
            return Err(Error::Parameter(
                "cut-mesh face-index array undefined".into(),
            ));
        }
        if cut.face_count() < 1 {
            return Err(Error::Parameter("invalid cut-mesh face count".into()));
        }

        let mut guard = lock(&state);
        crate::dispatch::run(&mut guard, flags, src, cut)
    })
}

/// Enumerates components matching `type_filter`, in creation order.
///
/// Two-phase: with `out = None` the matching count is returned; with a
/// slice, up to `out.len()` handles are written and the number written
/// is returned.
pub fn get_connected_components(
    ctx: ContextHandle,
    type_filter: ComponentType,
    out: Option<&mut [ComponentHandle]>,
) -> Result<u32, ResultCode> {
    boundary("get_connected_components", Some(ctx), || {
        let state = context::lookup(ctx)?;
        if type_filter.is_empty() {
            return Err(Error::Parameter("invalid component type filter (0)".into()));
        }
        let matching = lock(&state).matching(ctx.0, type_filter);
        match out {
            None => Ok(matching.len() as u32),
            Some(slice) => {
                let written = slice.len().min(matching.len());
                slice[..written].copy_from_slice(&matching[..written]);
                Ok(written as u32)
            }
        }
    })
}

/// Reads one data buffer of a component through the two-phase protocol.
/// `query` must name exactly one buffer; map queries require the
/// corresponding `INCLUDE_*_MAP` dispatch flag to have been set.
pub fn get_component_data(
    ctx: ContextHandle,
    component: ComponentHandle,
    query: ComponentData,
    mem: Option<&mut [u8]>,
) -> Result<u64, ResultCode> {
    boundary("get_component_data", Some(ctx), || {
        let state = context::lookup(ctx)?;
        let guard = lock(&state);
        if component.context != ctx.0 {
            return Err(Error::Parameter(
                "connected component handle not owned by this context".into(),
            ));
        }
        let comp = guard.component(component.key).ok_or_else(|| {
            Error::Parameter("connected component handle invalid (released)".into())
        })?;
        if query.is_empty() {
            return Err(Error::Parameter("component data query unspecified (0)".into()));
        }
        query::two_phase(mem, comp.data_size(query)?, |buf| {
            comp.write_data(query, buf)
        })
    })
}

/// Releases connected components owned by the context.
///
/// `None` releases every component the context owns. `Some(list)`
/// releases exactly the listed handles, all of which must be owned by
/// `ctx`. `Some(&[])` is a contract violation: an explicit list with
/// nothing in it is never valid.
pub fn release_connected_components(
    ctx: ContextHandle,
    handles: Option<&[ComponentHandle]>,
) -> Result<(), ResultCode> {
    boundary("release_connected_components", Some(ctx), || {
        let state = context::lookup(ctx)?;
        let mut guard = lock(&state);
        match handles {
            None => {
                guard.release_all();
                Ok(())
            }
            Some([]) => Err(Error::Parameter(
                "empty connected-component list; pass None to release all".into(),
            )),
            Some(list) => guard.release(ctx.0, list),
        }
    })
}

/// Releases the context and every connected component it still owns.
/// The handle is stale afterwards; a second release fails.
pub fn release_context(ctx: ContextHandle) -> Result<(), ResultCode> {
    boundary("release_context", None, || context::destroy(ctx))
}
