// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshcut Team

//! Plane-based cutting engine.
//!
//! The cut surface is the supporting plane of the cut mesh's first face
//! (Newell normal). Each source face is clipped against that plane on
//! both sides; severed faces contribute chords that are stitched into
//! closed intersection loops. Artifacts:
//!
//! - one fragment per non-empty side (above / below);
//! - one patch per closed intersection loop, fan triangulated;
//! - one seam: the fully split source mesh with loop vertices shared.
//!
//! A plane that misses the source mesh produces no artifacts.

use ahash::{AHashMap, AHashSet};
use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use super::mesh::IndexedMesh;
use super::{Artifact, ArtifactKind, EngineInput, FragmentLocation};
use crate::error::Error;
use crate::flags::DispatchFlags;

/// Tolerance for classifying a point as lying on the plane.
const EPS: f64 = 1e-9;

struct Plane {
    normal: Vector3<f64>,
    d: f64,
}

impl Plane {
    fn signed_distance(&self, p: &Point3<f64>) -> f64 {
        self.normal.dot(&p.coords) + self.d
    }
}

/// Supporting plane of the cut mesh's first face, via Newell's method so
/// non-convex and slightly warped faces still yield a usable normal.
fn supporting_plane(cut: &IndexedMesh) -> Result<Plane, Error> {
    let face = cut
        .faces()
        .next()
        .ok_or_else(|| Error::EngineArgument("cut mesh has no faces".into()))?;

    let mut normal: Vector3<f64> = Vector3::zeros();
    for k in 0..face.len() {
        let a = &cut.positions[face[k] as usize];
        let b = &cut.positions[face[(k + 1) % face.len()] as usize];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    let len = normal.norm();
    if len < EPS {
        return Err(Error::EngineArgument(
            "cut-mesh first face is degenerate, no cutting plane".into(),
        ));
    }
    let normal = normal / len;
    let d = -normal.dot(&cut.positions[face[0] as usize].coords);
    Ok(Plane { normal, d })
}

/// Identity of an output vertex, used to share vertices between clipped
/// faces. Intersection vertices are keyed by the source edge they were
/// born on, so both faces sharing that edge reuse the same vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum VertexId {
    Input(u32),
    Cut(u32, u32), // ordered (min, max) endpoints of the severed edge
}

#[derive(Debug, Clone, Copy)]
struct ClipVertex {
    id: VertexId,
    pos: Point3<f64>,
    on_plane: bool,
}

/// Per-face clipping result.
struct ClippedFace {
    face: u32,
    above: Vec<ClipVertex>,
    below: Vec<ClipVertex>,
    /// Oriented chords along the above polygon's winding; endpoints lie
    /// on the plane. Adjacent faces chain these into loops.
    chords: Vec<(ClipVertex, ClipVertex)>,
}

/// Intersection point of a severed edge, computed from the lower-index
/// endpoint so both incident faces get bit-identical positions.
fn edge_intersection(
    i: u32,
    j: u32,
    pi: &Point3<f64>,
    pj: &Point3<f64>,
    di: f64,
    dj: f64,
) -> ClipVertex {
    let (lo, hi, plo, phi, dlo, dhi) = if i < j {
        (i, j, pi, pj, di, dj)
    } else {
        (j, i, pj, pi, dj, di)
    };
    let t = dlo / (dlo - dhi);
    ClipVertex {
        id: VertexId::Cut(lo, hi),
        pos: plo + (phi - plo) * t,
        on_plane: true,
    }
}

fn clip_side(polygon: &[(u32, Point3<f64>, f64)], keep_above: bool) -> Vec<ClipVertex> {
    let n = polygon.len();
    let mut out = Vec::with_capacity(n + 2);
    for k in 0..n {
        let (i, pi, di) = polygon[k];
        let (j, pj, dj) = polygon[(k + 1) % n];
        let keep = if keep_above { di >= -EPS } else { di <= EPS };
        if keep {
            out.push(ClipVertex {
                id: VertexId::Input(i),
                pos: pi,
                on_plane: di.abs() <= EPS,
            });
        }
        // A chord vertex appears only on a strict sign change; edges that
        // merely touch the plane reuse the on-plane input vertex.
        if (di > EPS && dj < -EPS) || (di < -EPS && dj > EPS) {
            out.push(edge_intersection(i, j, &pi, &pj, di, dj));
        }
    }
    out
}

fn clip_face(face_index: u32, face: &[u32], src: &IndexedMesh, dists: &[f64]) -> ClippedFace {
    let polygon: Vec<(u32, Point3<f64>, f64)> = face
        .iter()
        .map(|i| (*i, src.positions[*i as usize], dists[*i as usize]))
        .collect();

    let any_above = polygon.iter().any(|(_, _, d)| *d > EPS);
    let any_below = polygon.iter().any(|(_, _, d)| *d < -EPS);

    let whole = |poly: &[(u32, Point3<f64>, f64)]| -> Vec<ClipVertex> {
        poly.iter()
            .map(|(i, p, d)| ClipVertex {
                id: VertexId::Input(*i),
                pos: *p,
                on_plane: d.abs() <= EPS,
            })
            .collect()
    };

    if !any_below {
        // Entirely above (faces lying in the plane count as above).
        return ClippedFace {
            face: face_index,
            above: whole(&polygon),
            below: Vec::new(),
            chords: Vec::new(),
        };
    }
    if !any_above {
        return ClippedFace {
            face: face_index,
            above: Vec::new(),
            below: whole(&polygon),
            chords: Vec::new(),
        };
    }

    let above = clip_side(&polygon, true);
    let below = clip_side(&polygon, false);

    // Chords are the edges of the above polygon whose endpoints both lie
    // on the plane, oriented by the face winding.
    let mut chords = Vec::new();
    let n = above.len();
    for k in 0..n {
        let a = above[k];
        let b = above[(k + 1) % n];
        if a.on_plane && b.on_plane && a.id != b.id {
            chords.push((a, b));
        }
    }

    ClippedFace {
        face: face_index,
        above,
        below,
        chords,
    }
}

/// Accumulates clipped polygons into a mesh, sharing vertices by id.
struct MeshBuilder {
    mesh: IndexedMesh,
    vertex_map: Vec<u32>,
    face_map: Vec<u32>,
    index_of: AHashMap<VertexId, u32>,
}

impl MeshBuilder {
    fn new() -> Self {
        MeshBuilder {
            mesh: IndexedMesh::default(),
            vertex_map: Vec::new(),
            face_map: Vec::new(),
            index_of: AHashMap::new(),
        }
    }

    fn vertex(&mut self, v: &ClipVertex) -> u32 {
        if let Some(index) = self.index_of.get(&v.id) {
            return *index;
        }
        let index = self.mesh.positions.len() as u32;
        self.mesh.positions.push(v.pos);
        self.vertex_map.push(match v.id {
            VertexId::Input(i) => i,
            VertexId::Cut(_, _) => u32::MAX,
        });
        self.index_of.insert(v.id, index);
        index
    }

    fn face(&mut self, polygon: &[ClipVertex], birth_face: u32) {
        let indices: Vec<u32> = polygon.iter().map(|v| self.vertex(v)).collect();
        self.mesh.push_face(&indices);
        self.face_map.push(birth_face);
    }

    fn is_empty(&self) -> bool {
        self.mesh.face_count() == 0
    }

    fn into_artifact(self, kind: ArtifactKind, flags: DispatchFlags) -> Artifact {
        Artifact {
            kind,
            mesh: self.mesh,
            vertex_map: flags
                .contains(DispatchFlags::INCLUDE_VERTEX_MAP)
                .then_some(self.vertex_map),
            face_map: flags
                .contains(DispatchFlags::INCLUDE_FACE_MAP)
                .then_some(self.face_map),
        }
    }
}

/// Stitches oriented chords into closed loops. Open chains (cuts that
/// run off an open boundary of the source mesh) yield no patch.
fn closed_loops(chords: &[(ClipVertex, ClipVertex)]) -> Vec<Vec<Point3<f64>>> {
    let mut successor: AHashMap<VertexId, ClipVertex> = AHashMap::new();
    let mut position: AHashMap<VertexId, Point3<f64>> = AHashMap::new();
    for (a, b) in chords {
        successor.insert(a.id, *b);
        position.insert(a.id, a.pos);
        position.insert(b.id, b.pos);
    }

    let mut loops = Vec::new();
    let mut visited: AHashSet<VertexId> = AHashSet::new();
    for start in successor.keys().copied().collect::<Vec<_>>() {
        if visited.contains(&start) {
            continue;
        }
        let mut chain = vec![start];
        visited.insert(start);
        let mut closed = false;
        let mut current = start;
        while let Some(next) = successor.get(&current) {
            if next.id == start {
                closed = true;
                break;
            }
            if !visited.insert(next.id) {
                break;
            }
            chain.push(next.id);
            current = next.id;
        }
        if closed && chain.len() >= 3 {
            loops.push(chain.iter().map(|id| position[id]).collect());
        }
    }
    loops
}

fn patch_artifact(loop_points: Vec<Point3<f64>>, flags: DispatchFlags) -> Artifact {
    let vertex_count = loop_points.len();
    let mut mesh = IndexedMesh {
        positions: loop_points,
        ..Default::default()
    };
    for k in 1..vertex_count - 1 {
        mesh.push_face(&[0, k as u32, k as u32 + 1]);
    }
    let face_count = mesh.face_count();
    Artifact {
        kind: ArtifactKind::Patch,
        mesh,
        vertex_map: flags
            .contains(DispatchFlags::INCLUDE_VERTEX_MAP)
            .then(|| vec![u32::MAX; vertex_count]),
        face_map: flags
            .contains(DispatchFlags::INCLUDE_FACE_MAP)
            .then(|| vec![u32::MAX; face_count]),
    }
}

fn location_kept(flags: DispatchFlags, location: FragmentLocation) -> bool {
    if !flags.intersects(DispatchFlags::FILTER_FRAGMENT_LOCATION_ALL) {
        return true;
    }
    match location {
        FragmentLocation::Above => flags.contains(DispatchFlags::FILTER_FRAGMENT_LOCATION_ABOVE),
        FragmentLocation::Below => flags.contains(DispatchFlags::FILTER_FRAGMENT_LOCATION_BELOW),
    }
}

/// Runs one cutting operation. See the module docs for artifact
/// semantics.
pub(crate) fn cut(input: &EngineInput) -> Result<Vec<Artifact>, Error> {
    let plane = supporting_plane(&input.cut)?;
    let dists: Vec<f64> = input
        .src
        .positions
        .iter()
        .map(|p| plane.signed_distance(p))
        .collect();

    let faces: Vec<&[u32]> = input.src.faces().collect();
    let clipped: Vec<ClippedFace> = faces
        .par_iter()
        .enumerate()
        .map(|(index, face)| clip_face(index as u32, face, &input.src, &dists))
        .collect();

    let severed = clipped.iter().any(|c| !c.chords.is_empty());
    let any_above = clipped.iter().any(|c| c.above.len() >= 3);
    let any_below = clipped.iter().any(|c| c.below.len() >= 3);
    if !severed && (!any_above || !any_below) {
        // The plane misses the source mesh: nothing was cut.
        return Ok(Vec::new());
    }

    let mut above = MeshBuilder::new();
    let mut below = MeshBuilder::new();
    let mut seam = MeshBuilder::new();
    let mut chords = Vec::new();
    for c in &clipped {
        if c.above.len() >= 3 {
            above.face(&c.above, c.face);
            seam.face(&c.above, c.face);
        }
        if c.below.len() >= 3 {
            below.face(&c.below, c.face);
            seam.face(&c.below, c.face);
        }
        chords.extend_from_slice(&c.chords);
    }

    let mut artifacts = Vec::new();
    if !above.is_empty() && location_kept(input.flags, FragmentLocation::Above) {
        artifacts.push(above.into_artifact(
            ArtifactKind::Fragment(FragmentLocation::Above),
            input.flags,
        ));
    }
    if !below.is_empty() && location_kept(input.flags, FragmentLocation::Below) {
        artifacts.push(below.into_artifact(
            ArtifactKind::Fragment(FragmentLocation::Below),
            input.flags,
        ));
    }
    for loop_points in closed_loops(&chords) {
        artifacts.push(patch_artifact(loop_points, input.flags));
    }
    artifacts.push(seam.into_artifact(ArtifactKind::Seam, input.flags));

    for artifact in &artifacts {
        artifact.mesh.check_invariants()?;
    }
    Ok(artifacts)
}
