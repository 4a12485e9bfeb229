// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshcut Team

//! Dispatch orchestration: validated request in, registered components
//! out.
//!
//! The engine runs to completion before anything is registered, so an
//! engine failure leaves the context's component set exactly as it was
//! (the caller-observable state is all-or-nothing).

use crate::component::ConnectedComponent;
use crate::context::ContextState;
use crate::engine::{self, EngineInput, IndexedMesh, MeshView};
use crate::error::Error;
use crate::flags::DispatchFlags;

pub(crate) fn run(
    state: &mut ContextState,
    flags: DispatchFlags,
    src: &MeshView<'_>,
    cut: &MeshView<'_>,
) -> Result<(), Error> {
    let input = EngineInput {
        flags,
        src: IndexedMesh::from_view(src, "source-mesh")?,
        cut: IndexedMesh::from_view(cut, "cut-mesh")?,
    };

    let artifacts = engine::cut(&input)?;

    // Registration is infallible, so atomicity holds: either the whole
    // artifact set lands in the registry or the error above kept it out.
    for artifact in artifacts {
        state.register(ConnectedComponent::from(artifact));
    }
    Ok(())
}
