// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshcut Team

//! Flag and identifier words used by the public API.
//!
//! All of these are deliberately open bit words rather than closed enums:
//! the validation layer's job includes rejecting out-of-set values, which
//! must therefore be representable (`from_bits_retain`). The documented
//! member sets below are the only values the API accepts.

use bitflags::bitflags;

bitflags! {
    /// Context creation flags. Reserved today; echoed back by
    /// [`ContextInfo::CONTEXT_FLAGS`](crate::ContextInfo::CONTEXT_FLAGS).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ContextFlags: u32 {
        /// Enable verbose diagnostic reporting for this context.
        const DEBUG = 1 << 0;
    }
}

bitflags! {
    /// Identifier of a context property queried through the two-phase
    /// info protocol. Exactly one bit must be set per query.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ContextInfo: u32 {
        /// The flags the context was created with (one `u32`).
        const CONTEXT_FLAGS = 1 << 0;
    }
}

bitflags! {
    /// Dispatch operation flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DispatchFlags: u32 {
        /// Source and cut vertex buffers hold `f32` coordinates.
        const VERTEX_ARRAY_FLOAT = 1 << 0;
        /// Source and cut vertex buffers hold `f64` coordinates.
        const VERTEX_ARRAY_DOUBLE = 1 << 1;
        /// Reject cuts that do not pass all the way through the source
        /// mesh. Mutually exclusive with
        /// [`FILTER_FRAGMENT_LOCATION_UNDEFINED`](Self::FILTER_FRAGMENT_LOCATION_UNDEFINED).
        const REQUIRE_THROUGH_CUTS = 1 << 2;
        /// Record, for every output vertex, the input vertex it came
        /// from (`u32::MAX` for vertices born on the cut).
        const INCLUDE_VERTEX_MAP = 1 << 3;
        /// Record, for every output face, the input face it came from.
        const INCLUDE_FACE_MAP = 1 << 4;
        /// Keep fragments above the cut surface.
        const FILTER_FRAGMENT_LOCATION_ABOVE = 1 << 5;
        /// Keep fragments below the cut surface.
        const FILTER_FRAGMENT_LOCATION_BELOW = 1 << 6;
        /// Keep fragments whose location relative to the cut surface is
        /// undefined (partial cuts). Mutually exclusive with
        /// [`REQUIRE_THROUGH_CUTS`](Self::REQUIRE_THROUGH_CUTS).
        const FILTER_FRAGMENT_LOCATION_UNDEFINED = 1 << 7;
    }
}

impl DispatchFlags {
    /// The fragment-location filter bits. When any of these is present,
    /// only fragments with a matching location are registered.
    pub const FILTER_FRAGMENT_LOCATION_ALL: Self = Self::FILTER_FRAGMENT_LOCATION_ABOVE
        .union(Self::FILTER_FRAGMENT_LOCATION_BELOW)
        .union(Self::FILTER_FRAGMENT_LOCATION_UNDEFINED);
}

bitflags! {
    /// Connected-component type tags. A concrete component carries
    /// exactly one bit; enumeration filters may combine them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ComponentType: u32 {
        /// A piece of the source mesh severed by the cut.
        const FRAGMENT = 1 << 0;
        /// A cap filling a cross-section left by the cut.
        const PATCH = 1 << 1;
        /// The source mesh with the cut path embedded in its topology.
        const SEAM = 1 << 2;
    }
}

impl ComponentType {
    /// Filter matching every component type.
    pub const ALL: Self = Self::FRAGMENT.union(Self::PATCH).union(Self::SEAM);
}

bitflags! {
    /// Identifier of a component data buffer queried through the
    /// two-phase protocol. Exactly one bit must be set per query.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ComponentData: u32 {
        /// Vertex positions as `f32` triples.
        const VERTEX_FLOAT = 1 << 0;
        /// Vertex positions as `f64` triples.
        const VERTEX_DOUBLE = 1 << 1;
        /// Number of vertices (one `u32`).
        const VERTEX_COUNT = 1 << 2;
        /// Flat face index list (`u32` per entry).
        const FACE = 1 << 3;
        /// Per-face vertex counts (`u32` per face).
        const FACE_SIZE = 1 << 4;
        /// Number of faces (one `u32`).
        const FACE_COUNT = 1 << 5;
        /// Per-vertex input-vertex map; requires
        /// [`DispatchFlags::INCLUDE_VERTEX_MAP`].
        const VERTEX_MAP = 1 << 6;
        /// Per-face input-face map; requires
        /// [`DispatchFlags::INCLUDE_FACE_MAP`].
        const FACE_MAP = 1 << 7;
    }
}

bitflags! {
    /// Origin of a diagnostic event. Accepted values: `KERNEL`, `ALL`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DebugSource: u32 {
        /// The cutting kernel and its front end.
        const KERNEL = 1 << 0;
    }
}

impl DebugSource {
    /// Every source.
    pub const ALL: Self = Self::KERNEL;
}

bitflags! {
    /// Category of a diagnostic event. Accepted values: `DEPRECATED`,
    /// `ERROR`, `OTHER`, `ALL`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DebugType: u32 {
        /// Use of a deprecated behavior.
        const DEPRECATED = 1 << 0;
        /// A failed call.
        const ERROR = 1 << 1;
        /// Anything else.
        const OTHER = 1 << 2;
    }
}

impl DebugType {
    /// Every category.
    pub const ALL: Self = Self::DEPRECATED.union(Self::ERROR).union(Self::OTHER);
}

bitflags! {
    /// Severity of a diagnostic event. Accepted values: `HIGH`,
    /// `MEDIUM`, `LOW`, `NOTIFICATION`, `ALL`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DebugSeverity: u32 {
        /// Errors and undefined behavior.
        const HIGH = 1 << 0;
        /// Performance warnings and suspicious input.
        const MEDIUM = 1 << 1;
        /// Redundant or wasteful usage.
        const LOW = 1 << 2;
        /// Informational messages.
        const NOTIFICATION = 1 << 3;
    }
}

impl DebugSeverity {
    /// Every severity.
    pub const ALL: Self = Self::HIGH
        .union(Self::MEDIUM)
        .union(Self::LOW)
        .union(Self::NOTIFICATION);
}
