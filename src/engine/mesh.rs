// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshcut Team

//! Mesh representations at the engine boundary.
//!
//! Callers hand in borrowed flat buffers ([`MeshView`]); the engine works
//! on an owned indexed polygon mesh ([`IndexedMesh`]). The conversion is
//! where the engine's input contract is enforced: index ranges, face
//! arities and buffer-length consistency.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Vertex coordinates as the caller supplies them: a flat `x y z x y z …`
/// sequence in one of the two supported precisions.
#[derive(Debug, Clone, Copy)]
pub enum VertexSlice<'a> {
    /// 32-bit float coordinates.
    Float32(&'a [f32]),
    /// 64-bit double coordinates.
    Float64(&'a [f64]),
}

impl VertexSlice<'_> {
    fn scalar_count(&self) -> usize {
        match self {
            VertexSlice::Float32(s) => s.len(),
            VertexSlice::Float64(s) => s.len(),
        }
    }
}

/// Borrowed description of one input mesh for a dispatch call.
///
/// `None` fields model absent buffers. A missing `face_sizes` buffer
/// means every face is a triangle. Vertex and face counts are derived
/// from the buffers, never passed separately.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshView<'a> {
    /// Vertex positions, three scalars per vertex.
    pub vertices: Option<VertexSlice<'a>>,
    /// Flat list of vertex indices, one run per face.
    pub face_indices: Option<&'a [u32]>,
    /// Vertex count of each face; `None` means all triangles.
    pub face_sizes: Option<&'a [u32]>,
}

impl<'a> MeshView<'a> {
    /// Convenience constructor for an all-triangle `f32` mesh.
    pub fn triangles_f32(vertices: &'a [f32], face_indices: &'a [u32]) -> Self {
        MeshView {
            vertices: Some(VertexSlice::Float32(vertices)),
            face_indices: Some(face_indices),
            face_sizes: None,
        }
    }

    /// Convenience constructor for an all-triangle `f64` mesh.
    pub fn triangles_f64(vertices: &'a [f64], face_indices: &'a [u32]) -> Self {
        MeshView {
            vertices: Some(VertexSlice::Float64(vertices)),
            face_indices: Some(face_indices),
            face_sizes: None,
        }
    }

    /// Number of vertices described by the vertex buffer.
    pub fn vertex_count(&self) -> u32 {
        self.vertices
            .map(|v| (v.scalar_count() / 3) as u32)
            .unwrap_or(0)
    }

    /// Number of faces described by the index and size buffers.
    pub fn face_count(&self) -> u32 {
        match (self.face_sizes, self.face_indices) {
            (Some(sizes), _) => sizes.len() as u32,
            (None, Some(indices)) => (indices.len() / 3) as u32,
            (None, None) => 0,
        }
    }
}

/// Owned polygon mesh used inside the engine and stored on connected
/// components. Positions are always `f64`; the precision the caller
/// dispatched with only affects how data queries read them back out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexedMesh {
    /// Vertex positions.
    pub positions: Vec<Point3<f64>>,
    /// Flat face index list.
    pub face_indices: Vec<u32>,
    /// Vertex count of each face.
    pub face_sizes: Vec<u32>,
}

impl IndexedMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.face_sizes.len()
    }

    /// Iterates over faces as index slices.
    pub fn faces(&self) -> impl Iterator<Item = &[u32]> {
        FaceIter {
            indices: &self.face_indices,
            sizes: &self.face_sizes,
            face: 0,
            offset: 0,
        }
    }

    /// Appends one face given its vertex indices.
    pub fn push_face(&mut self, indices: &[u32]) {
        self.face_indices.extend_from_slice(indices);
        self.face_sizes.push(indices.len() as u32);
    }

    /// Builds an owned mesh from caller buffers, enforcing the engine's
    /// input contract. Violations are engine argument errors.
    pub(crate) fn from_view(view: &MeshView<'_>, label: &str) -> Result<IndexedMesh, Error> {
        let vertices = view
            .vertices
            .ok_or_else(|| Error::EngineArgument(format!("{label} vertex buffer missing")))?;
        let indices = view
            .face_indices
            .ok_or_else(|| Error::EngineArgument(format!("{label} face-index buffer missing")))?;

        if vertices.scalar_count() % 3 != 0 {
            return Err(Error::EngineArgument(format!(
                "{label} vertex buffer length {} is not a multiple of 3",
                vertices.scalar_count()
            )));
        }
        let vertex_count = (vertices.scalar_count() / 3) as u32;

        let face_sizes: Vec<u32> = match view.face_sizes {
            Some(sizes) => {
                if let Some(bad) = sizes.iter().find(|s| **s < 3) {
                    return Err(Error::EngineArgument(format!(
                        "{label} face size {bad} below minimum of 3"
                    )));
                }
                let total: usize = sizes.iter().map(|s| *s as usize).sum();
                if total != indices.len() {
                    return Err(Error::EngineArgument(format!(
                        "{label} face sizes sum to {total} but index buffer holds {}",
                        indices.len()
                    )));
                }
                sizes.to_vec()
            }
            None => {
                if indices.len() % 3 != 0 {
                    return Err(Error::EngineArgument(format!(
                        "{label} index buffer length {} is not a multiple of 3 \
                         (no face-size buffer given)",
                        indices.len()
                    )));
                }
                vec![3; indices.len() / 3]
            }
        };

        if let Some(bad) = indices.iter().find(|i| **i >= vertex_count) {
            return Err(Error::EngineArgument(format!(
                "{label} face index {bad} out of range (vertex count {vertex_count})"
            )));
        }

        let mut positions = Vec::new();
        positions
            .try_reserve_exact(vertex_count as usize)
            .map_err(|e| Error::EngineRuntime(format!("{label} vertex allocation failed: {e}")))?;
        match vertices {
            VertexSlice::Float32(s) => {
                for v in s.chunks_exact(3) {
                    positions.push(Point3::new(v[0] as f64, v[1] as f64, v[2] as f64));
                }
            }
            VertexSlice::Float64(s) => {
                for v in s.chunks_exact(3) {
                    positions.push(Point3::new(v[0], v[1], v[2]));
                }
            }
        }

        Ok(IndexedMesh {
            positions,
            face_indices: indices.to_vec(),
            face_sizes,
        })
    }

    /// Cheap structural invariant check on engine output.
    pub(crate) fn check_invariants(&self) -> Result<(), Error> {
        let total: usize = self.face_sizes.iter().map(|s| *s as usize).sum();
        if total != self.face_indices.len() {
            return Err(Error::EngineInternal(format!(
                "component mesh face sizes sum to {total} but index buffer holds {}",
                self.face_indices.len()
            )));
        }
        let vertex_count = self.positions.len() as u32;
        if self.face_indices.iter().any(|i| *i >= vertex_count) {
            return Err(Error::EngineInternal(
                "component mesh face index out of range".into(),
            ));
        }
        Ok(())
    }
}

struct FaceIter<'a> {
    indices: &'a [u32],
    sizes: &'a [u32],
    face: usize,
    offset: usize,
}

impl<'a> Iterator for FaceIter<'a> {
    type Item = &'a [u32];

    fn next(&mut self) -> Option<&'a [u32]> {
        let size = *self.sizes.get(self.face)? as usize;
        let face = &self.indices[self.offset..self.offset + size];
        self.face += 1;
        self.offset += size;
        Some(face)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_view_counts() {
        let vertices = [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let indices = [0u32, 1, 2];
        let view = MeshView::triangles_f32(&vertices, &indices);
        assert_eq!(view.vertex_count(), 3);
        assert_eq!(view.face_count(), 1);
    }

    #[test]
    fn from_view_defaults_to_triangles() {
        let vertices = [0.0f64; 18];
        let indices = [0u32, 1, 2, 3, 4, 5];
        let view = MeshView::triangles_f64(&vertices, &indices);
        let mesh = IndexedMesh::from_view(&view, "source-mesh").unwrap();
        assert_eq!(mesh.face_sizes, vec![3, 3]);
        assert_eq!(mesh.faces().count(), 2);
    }

    #[test]
    fn from_view_rejects_out_of_range_index() {
        let vertices = [0.0f32; 9];
        let indices = [0u32, 1, 7];
        let view = MeshView::triangles_f32(&vertices, &indices);
        let err = IndexedMesh::from_view(&view, "source-mesh").unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn from_view_rejects_inconsistent_face_sizes() {
        let vertices = [0.0f32; 12];
        let indices = [0u32, 1, 2, 3];
        let sizes = [3u32, 3];
        let view = MeshView {
            vertices: Some(VertexSlice::Float32(&vertices)),
            face_indices: Some(&indices),
            face_sizes: Some(&sizes),
        };
        assert!(IndexedMesh::from_view(&view, "cut-mesh").is_err());
    }

    #[test]
    fn face_iter_respects_mixed_arities() {
        let mut mesh = IndexedMesh {
            positions: vec![Point3::origin(); 5],
            ..Default::default()
        };
        mesh.push_face(&[0, 1, 2, 3]);
        mesh.push_face(&[0, 3, 4]);
        let faces: Vec<&[u32]> = mesh.faces().collect();
        assert_eq!(faces, vec![&[0u32, 1, 2, 3][..], &[0u32, 3, 4][..]]);
    }
}
