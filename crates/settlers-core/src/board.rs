//! Entity and value types shared by every part of the engine.
//!
//! This module contains:
//! - Resource and terrain categories
//! - Tiles (coordinate, terrain, production token, boundary vertices)
//! - Pieces placed by players: structures on vertices and roads on edges
//!
//! Relationships between entities are plain integer ids into the arenas held
//! by [`crate::topology::Topology`]; nothing here owns anything else.

use crate::hex::CubeCoord;
use serde::{Deserialize, Serialize};

/// Player identifier (seat index, 0-3)
pub type PlayerId = u8;

/// Index of a tile in the topology (0-18)
pub type TileId = usize;

/// Index of a vertex in the topology (0-53)
pub type VertexId = usize;

/// Index of an edge in the topology (0-71)
pub type EdgeId = usize;

/// Token carried by the desert; it never matches a roll
pub const DESERT_TOKEN: u8 = 0;

/// Resources produced by terrain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Resource {
    Lumber,
    Wool,
    Grain,
    Brick,
    Ore,
}

impl Resource {
    /// All resource types
    pub const ALL: [Resource; 5] = [
        Resource::Lumber,
        Resource::Wool,
        Resource::Grain,
        Resource::Brick,
        Resource::Ore,
    ];
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Resource::Lumber => "lumber",
            Resource::Wool => "wool",
            Resource::Grain => "grain",
            Resource::Brick => "brick",
            Resource::Ore => "ore",
        };
        f.write_str(name)
    }
}

/// Terrain of a hex tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Forest,
    Pasture,
    Fields,
    Hills,
    Mountains,
    /// Produces nothing and carries [`DESERT_TOKEN`]
    Desert,
}

impl Terrain {
    /// All terrains, in the order used by the generator's quota table
    pub const ALL: [Terrain; 6] = [
        Terrain::Forest,
        Terrain::Pasture,
        Terrain::Fields,
        Terrain::Hills,
        Terrain::Mountains,
        Terrain::Desert,
    ];

    /// The resource this terrain produces, if any
    pub fn resource(&self) -> Option<Resource> {
        match self {
            Terrain::Forest => Some(Resource::Lumber),
            Terrain::Pasture => Some(Resource::Wool),
            Terrain::Fields => Some(Resource::Grain),
            Terrain::Hills => Some(Resource::Brick),
            Terrain::Mountains => Some(Resource::Ore),
            Terrain::Desert => None,
        }
    }

    /// Position of this terrain in [`Terrain::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// A single hex tile on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub coord: CubeCoord,
    pub terrain: Terrain,
    /// Roll that triggers production (2-12, [`DESERT_TOKEN`] for the desert)
    pub token: u8,
    /// Boundary vertices in rotational order; consecutive entries (wrapping
    /// from the last back to the first) are joined by an edge
    pub vertices: [VertexId; 6],
}

impl Tile {
    pub fn new(
        id: TileId,
        coord: CubeCoord,
        terrain: Terrain,
        token: u8,
        vertices: [VertexId; 6],
    ) -> Self {
        Self {
            id,
            coord,
            terrain,
            token,
            vertices,
        }
    }

    /// Get the resource this tile produces, if any
    pub fn resource(&self) -> Option<Resource> {
        self.terrain.resource()
    }

    /// The six boundary edges as vertex pairs, in boundary order
    pub fn boundary_pairs(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        (0..6).map(move |i| (self.vertices[i], self.vertices[(i + 1) % 6]))
    }
}

/// Kind of structure standing on a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    /// The basic structure, placed on an empty vertex
    Settlement,
    /// The upgraded structure, replaces a settlement
    City,
}

/// Fixed per-kind attributes of a structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructureTraits {
    pub victory_points: u32,
    /// Resources received per matching production
    pub multiplier: u32,
    pub upgradeable: bool,
}

/// Indexed by `StructureKind as usize`
const STRUCTURE_TRAITS: [StructureTraits; 2] = [
    // Settlement
    StructureTraits {
        victory_points: 1,
        multiplier: 1,
        upgradeable: true,
    },
    // City
    StructureTraits {
        victory_points: 2,
        multiplier: 2,
        upgradeable: false,
    },
];

impl StructureKind {
    pub const fn traits(self) -> StructureTraits {
        STRUCTURE_TRAITS[self as usize]
    }
}

/// A structure owned by a player. Upgrading replaces the value rather than
/// mutating it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Structure {
    pub owner: PlayerId,
    pub kind: StructureKind,
}

impl Structure {
    pub const fn settlement(owner: PlayerId) -> Self {
        Self {
            owner,
            kind: StructureKind::Settlement,
        }
    }

    pub const fn city(owner: PlayerId) -> Self {
        Self {
            owner,
            kind: StructureKind::City,
        }
    }

    pub const fn victory_points(&self) -> u32 {
        self.kind.traits().victory_points
    }

    pub const fn multiplier(&self) -> u32 {
        self.kind.traits().multiplier
    }

    pub const fn is_upgradeable(&self) -> bool {
        self.kind.traits().upgradeable
    }

    /// The structure that replaces this one on upgrade, if there is one
    pub fn upgraded(&self) -> Option<Structure> {
        self.is_upgradeable().then(|| Structure::city(self.owner))
    }
}

/// A road (connector) occupying an edge. Roads are fungible, so only the
/// owner is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Road {
    pub owner: PlayerId,
}

impl Road {
    pub const fn new(owner: PlayerId) -> Self {
        Self { owner }
    }
}
