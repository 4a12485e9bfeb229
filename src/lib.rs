// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshcut Team

//! Meshcut
//!
//! A context-scoped, handle-based front end for a mesh-cutting kernel.
//! Callers create a [`ContextHandle`], dispatch a source and a cut mesh
//! with operation flags, then enumerate the resulting connected
//! components (fragments, patches, seams) and read their data through a
//! two-phase size-then-fill query protocol.
//!
//! Failures never escape an entry point as anything but a
//! [`ResultCode`]; the message of the last failed call on the current
//! thread is available from [`last_api_log`], is written to stderr, and
//! is forwarded to the context's debug callback when one is registered.
//!
//! ```
//! use meshcut::{
//!     create_context, dispatch, get_connected_components, release_context, ComponentType,
//!     ContextFlags, DispatchFlags, MeshView,
//! };
//!
//! # fn main() -> Result<(), meshcut::ResultCode> {
//! let ctx = create_context(ContextFlags::empty())?;
//!
//! // One triangle cut by another: enough to exercise the pipeline.
//! let src_vertices: [f32; 9] = [0.0, 0.0, -1.0, 2.0, 0.0, -1.0, 1.0, 0.0, 2.0];
//! let src_faces: [u32; 3] = [0, 1, 2];
//! let cut_vertices: [f32; 9] = [-5.0, -5.0, 0.0, 5.0, -5.0, 0.0, 0.0, 5.0, 0.0];
//! let cut_faces: [u32; 3] = [0, 1, 2];
//!
//! dispatch(
//!     ctx,
//!     DispatchFlags::VERTEX_ARRAY_FLOAT,
//!     &MeshView::triangles_f32(&src_vertices, &src_faces),
//!     &MeshView::triangles_f32(&cut_vertices, &cut_faces),
//! )?;
//!
//! let count = get_connected_components(ctx, ComponentType::ALL, None)?;
//! assert!(count > 0);
//! release_context(ctx)?;
//! # Ok(())
//! # }
//! ```

mod api;
mod component;
mod context;
mod diagnostics;
mod dispatch;
pub mod engine;
mod error;
mod flags;
mod query;

pub use api::{
    create_context, dispatch, get_component_data, get_connected_components, get_context_info,
    release_connected_components, release_context, set_debug_callback, set_debug_filter,
};
pub use context::{ComponentHandle, ContextHandle};
pub use diagnostics::{last_api_log, DebugCallback};
pub use engine::{MeshView, VertexSlice};
pub use error::ResultCode;
pub use flags::{
    ComponentData, ComponentType, ContextFlags, ContextInfo, DebugSeverity, DebugSource,
    DebugType, DispatchFlags,
};
