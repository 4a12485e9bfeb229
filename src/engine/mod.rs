// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshcut Team

//! The cutting engine collaborator.
//!
//! The front end hands the engine a fully validated [`EngineInput`] and
//! gets back a list of [`Artifact`]s (or a typed failure). Everything the
//! caller can observe about the engine flows through that contract; the
//! cutting strategy behind it is replaceable.
//!
//! The engine shipped here cuts the source mesh with the supporting plane
//! of the cut mesh's first face. See [`plane_cut`].

mod mesh;
mod plane_cut;

pub use mesh::{IndexedMesh, MeshView, VertexSlice};

pub(crate) use plane_cut::cut;

use crate::flags::DispatchFlags;

/// Validated input to one cutting run.
#[derive(Debug)]
pub(crate) struct EngineInput {
    pub flags: DispatchFlags,
    pub src: IndexedMesh,
    pub cut: IndexedMesh,
}

/// Which side of the cut surface a fragment lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FragmentLocation {
    Above,
    Below,
}

/// Category of one engine output artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArtifactKind {
    Fragment(FragmentLocation),
    Patch,
    Seam,
}

/// One discrete output of a cutting run, not yet wrapped in a handle.
#[derive(Debug)]
pub(crate) struct Artifact {
    pub kind: ArtifactKind,
    pub mesh: IndexedMesh,
    /// Input vertex per output vertex, `u32::MAX` for vertices born on
    /// the cut. Present only when the dispatch asked for it.
    pub vertex_map: Option<Vec<u32>>,
    /// Input face per output face, `u32::MAX` for faces born on the cut.
    pub face_map: Option<Vec<u32>>,
}
