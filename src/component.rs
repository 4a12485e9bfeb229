// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshcut Team

//! Connected-component payloads and their data queries.
//!
//! A component owns the buffers one engine artifact produced. Data leaves
//! through the two-phase byte protocol: each query id has a required size
//! and a fill routine, shared through [`crate::query`].

use crate::engine::{Artifact, ArtifactKind, FragmentLocation, IndexedMesh};
use crate::error::Error;
use crate::flags::{ComponentData, ComponentType};

/// One registered artifact of a dispatch, owned by exactly one context.
pub(crate) struct ConnectedComponent {
    pub kind: ArtifactKind,
    pub mesh: IndexedMesh,
    pub vertex_map: Option<Vec<u32>>,
    pub face_map: Option<Vec<u32>>,
}

impl From<Artifact> for ConnectedComponent {
    fn from(artifact: Artifact) -> Self {
        ConnectedComponent {
            kind: artifact.kind,
            mesh: artifact.mesh,
            vertex_map: artifact.vertex_map,
            face_map: artifact.face_map,
        }
    }
}

impl ConnectedComponent {
    /// The single type bit this component carries.
    pub(crate) fn component_type(&self) -> ComponentType {
        match self.kind {
            ArtifactKind::Fragment(FragmentLocation::Above)
            | ArtifactKind::Fragment(FragmentLocation::Below) => ComponentType::FRAGMENT,
            ArtifactKind::Patch => ComponentType::PATCH,
            ArtifactKind::Seam => ComponentType::SEAM,
        }
    }

    /// Byte size required by `query`, the size-probe half of the
    /// protocol.
    pub(crate) fn data_size(&self, query: ComponentData) -> Result<u64, Error> {
        let size = if query == ComponentData::VERTEX_FLOAT {
            self.mesh.vertex_count() as u64 * 3 * 4
        } else if query == ComponentData::VERTEX_DOUBLE {
            self.mesh.vertex_count() as u64 * 3 * 8
        } else if query == ComponentData::VERTEX_COUNT || query == ComponentData::FACE_COUNT {
            4
        } else if query == ComponentData::FACE {
            self.mesh.face_indices.len() as u64 * 4
        } else if query == ComponentData::FACE_SIZE {
            self.mesh.face_sizes.len() as u64 * 4
        } else if query == ComponentData::VERTEX_MAP {
            self.require_vertex_map()?.len() as u64 * 4
        } else if query == ComponentData::FACE_MAP {
            self.require_face_map()?.len() as u64 * 4
        } else {
            return Err(Error::Parameter(format!(
                "invalid component data query ({:#x})",
                query.bits()
            )));
        };
        Ok(size)
    }

    /// Fill half of the protocol. `buf` has already been checked to be
    /// exactly [`data_size`](Self::data_size) bytes long.
    pub(crate) fn write_data(&self, query: ComponentData, buf: &mut [u8]) -> Result<(), Error> {
        if query == ComponentData::VERTEX_FLOAT {
            let scalars = self
                .mesh
                .positions
                .iter()
                .flat_map(|p| [p.x as f32, p.y as f32, p.z as f32]);
            for (chunk, scalar) in buf.chunks_exact_mut(4).zip(scalars) {
                chunk.copy_from_slice(&scalar.to_ne_bytes());
            }
        } else if query == ComponentData::VERTEX_DOUBLE {
            let scalars = self.mesh.positions.iter().flat_map(|p| [p.x, p.y, p.z]);
            for (chunk, scalar) in buf.chunks_exact_mut(8).zip(scalars) {
                chunk.copy_from_slice(&scalar.to_ne_bytes());
            }
        } else if query == ComponentData::VERTEX_COUNT {
            buf.copy_from_slice(&(self.mesh.vertex_count() as u32).to_ne_bytes());
        } else if query == ComponentData::FACE_COUNT {
            buf.copy_from_slice(&(self.mesh.face_count() as u32).to_ne_bytes());
        } else if query == ComponentData::FACE {
            write_u32s(buf, &self.mesh.face_indices);
        } else if query == ComponentData::FACE_SIZE {
            write_u32s(buf, &self.mesh.face_sizes);
        } else if query == ComponentData::VERTEX_MAP {
            write_u32s(buf, self.require_vertex_map()?);
        } else if query == ComponentData::FACE_MAP {
            write_u32s(buf, self.require_face_map()?);
        } else {
            return Err(Error::Parameter(format!(
                "invalid component data query ({:#x})",
                query.bits()
            )));
        }
        Ok(())
    }

    fn require_vertex_map(&self) -> Result<&Vec<u32>, Error> {
        self.vertex_map.as_ref().ok_or_else(|| {
            Error::EngineArgument(
                "vertex map not available; dispatch with INCLUDE_VERTEX_MAP".into(),
            )
        })
    }

    fn require_face_map(&self) -> Result<&Vec<u32>, Error> {
        self.face_map.as_ref().ok_or_else(|| {
            Error::EngineArgument("face map not available; dispatch with INCLUDE_FACE_MAP".into())
        })
    }
}

fn write_u32s(buf: &mut [u8], values: &[u32]) {
    for (chunk, value) in buf.chunks_exact_mut(4).zip(values) {
        chunk.copy_from_slice(&value.to_ne_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn sample() -> ConnectedComponent {
        let mut mesh = IndexedMesh {
            positions: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            ..Default::default()
        };
        mesh.push_face(&[0, 1, 2]);
        ConnectedComponent {
            kind: ArtifactKind::Patch,
            mesh,
            vertex_map: None,
            face_map: Some(vec![7]),
        }
    }

    #[test]
    fn sizes_match_element_counts() {
        let c = sample();
        assert_eq!(c.data_size(ComponentData::VERTEX_FLOAT).unwrap(), 36);
        assert_eq!(c.data_size(ComponentData::VERTEX_DOUBLE).unwrap(), 72);
        assert_eq!(c.data_size(ComponentData::FACE).unwrap(), 12);
        assert_eq!(c.data_size(ComponentData::FACE_SIZE).unwrap(), 4);
        assert_eq!(c.data_size(ComponentData::VERTEX_COUNT).unwrap(), 4);
    }

    #[test]
    fn vertex_float_round_trips() {
        let c = sample();
        let mut buf = vec![0u8; 36];
        c.write_data(ComponentData::VERTEX_FLOAT, &mut buf).unwrap();
        let x1 = f32::from_ne_bytes(buf[12..16].try_into().unwrap());
        assert_eq!(x1, 1.0);
    }

    #[test]
    fn missing_map_is_an_argument_error() {
        let c = sample();
        let err = c.data_size(ComponentData::VERTEX_MAP).unwrap_err();
        assert!(matches!(err, Error::EngineArgument(_)));
        assert_eq!(c.data_size(ComponentData::FACE_MAP).unwrap(), 4);
    }

    #[test]
    fn unknown_query_id_is_rejected() {
        let c = sample();
        let bogus = ComponentData::from_bits_retain(1 << 20);
        assert!(matches!(c.data_size(bogus), Err(Error::Parameter(_))));
    }
}
