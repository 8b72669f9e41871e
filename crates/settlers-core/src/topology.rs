//! The board graph: tiles, vertices and edges.
//!
//! A [`Topology`] is a single owning arena. Tiles, vertices and edges live in
//! flat vectors indexed by their id, and every relationship between them
//! (tile boundaries, edge endpoints, adjacency, occupancy) is expressed as
//! ids into those vectors.
//!
//! The graph is fixed once built. Only the occupancy of vertices and edges
//! changes afterwards, through [`Vertex::set_structure`] and
//! [`Edge::set_road`], which the game orchestrator calls after validating a
//! placement.

use crate::board::{EdgeId, PlayerId, Road, Structure, Tile, TileId, VertexId};
use crate::hex::CubeCoord;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use thiserror::Error;

/// Number of tiles on a standard board
pub const TILE_COUNT: usize = 19;

/// Number of vertices on a standard board
pub const VERTEX_COUNT: usize = 54;

/// Number of edges on a standard board
pub const EDGE_COUNT: usize = 72;

/// Reasons a set of tiles cannot form a valid board.
///
/// These indicate an inconsistent layout table or a generator bug, never a
/// runtime condition of play.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    #[error("expected {expected} tiles, found {found}")]
    TileCount { expected: usize, found: usize },

    #[error("tile at position {position} has id {id}")]
    TileIdMismatch { position: usize, id: TileId },

    #[error("tiles {first} and {second} share coordinate {coord}")]
    DuplicateCoord {
        first: TileId,
        second: TileId,
        coord: CubeCoord,
    },

    #[error("tile {tile} lists vertex {vertex}, outside 0..{VERTEX_COUNT}")]
    VertexOutOfRange { tile: TileId, vertex: VertexId },

    #[error("tile {tile} lists vertex {vertex} more than once")]
    DuplicateVertex { tile: TileId, vertex: VertexId },

    #[error("vertex {vertex} does not lie on any tile")]
    OrphanVertex { vertex: VertexId },

    #[error("expected {expected} edges, derived {found}")]
    EdgeCount { expected: usize, found: usize },

    #[error("expected {expected} {label} tiles, found {found}")]
    TerrainQuota {
        label: String,
        expected: usize,
        found: usize,
    },

    #[error("token {token} appears {found} times, expected {expected}")]
    TokenQuota {
        token: u8,
        expected: usize,
        found: usize,
    },

    #[error("tile {tile} carries token {token}, which does not fit its terrain")]
    MisplacedToken { tile: TileId, token: u8 },
}

/// An intersection of up to three tiles. Holds at most one structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vertex {
    pub id: VertexId,
    structure: Option<Structure>,
    adjacent_vertices: BTreeSet<VertexId>,
    adjacent_tiles: BTreeSet<TileId>,
}

impl Vertex {
    fn new(id: VertexId) -> Self {
        Self {
            id,
            structure: None,
            adjacent_vertices: BTreeSet::new(),
            adjacent_tiles: BTreeSet::new(),
        }
    }

    /// The structure standing here, if any
    pub fn structure(&self) -> Option<Structure> {
        self.structure
    }

    pub fn is_occupied(&self) -> bool {
        self.structure.is_some()
    }

    /// Owner of the structure standing here, if any
    pub fn owner(&self) -> Option<PlayerId> {
        self.structure.map(|s| s.owner)
    }

    /// Place or replace the structure on this vertex (assumes validation
    /// already done)
    pub fn set_structure(&mut self, structure: Structure) {
        self.structure = Some(structure);
    }

    /// Vertices joined to this one by an edge
    pub fn adjacent_vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.adjacent_vertices.iter().copied()
    }

    /// Tiles whose boundary contains this vertex
    pub fn adjacent_tiles(&self) -> impl Iterator<Item = TileId> + '_ {
        self.adjacent_tiles.iter().copied()
    }

    pub fn is_adjacent_to(&self, other: VertexId) -> bool {
        self.adjacent_vertices.contains(&other)
    }
}

/// A side shared by one or two tiles, joining two distinct vertices. Holds at
/// most one road.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub id: EdgeId,
    endpoints: [VertexId; 2],
    road: Option<Road>,
}

impl Edge {
    fn new(id: EdgeId, a: VertexId, b: VertexId) -> Self {
        Self {
            id,
            endpoints: [a, b],
            road: None,
        }
    }

    /// Both endpoints, in discovery order
    pub fn endpoints(&self) -> [VertexId; 2] {
        self.endpoints
    }

    /// Whether this edge joins `a` and `b`, in either order
    pub fn connects(&self, a: VertexId, b: VertexId) -> bool {
        let [x, y] = self.endpoints;
        (x == a && y == b) || (x == b && y == a)
    }

    /// Whether `vertex` is one of the endpoints
    pub fn touches(&self, vertex: VertexId) -> bool {
        self.endpoints.contains(&vertex)
    }

    /// The endpoint opposite `vertex`, or `None` if `vertex` is not on this edge
    pub fn other_endpoint(&self, vertex: VertexId) -> Option<VertexId> {
        match self.endpoints {
            [a, b] if a == vertex => Some(b),
            [a, b] if b == vertex => Some(a),
            _ => None,
        }
    }

    /// Whether the two edges share an endpoint
    pub fn is_adjacent_to(&self, other: &Edge) -> bool {
        self.id != other.id && other.endpoints.iter().any(|v| self.touches(*v))
    }

    pub fn road(&self) -> Option<Road> {
        self.road
    }

    pub fn is_occupied(&self) -> bool {
        self.road.is_some()
    }

    pub fn owner(&self) -> Option<PlayerId> {
        self.road.map(|r| r.owner)
    }

    /// Place a road on this edge (assumes validation already done)
    pub fn set_road(&mut self, road: Road) {
        self.road = Some(road);
    }
}

/// The complete board graph for one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topology {
    tiles: Vec<Tile>,
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
}

impl Topology {
    /// Build a topology from fully assigned tiles.
    ///
    /// Edges are derived by walking every tile boundary and adding each
    /// unordered vertex pair the first time it is seen, so edge ids follow
    /// discovery order. Vertex and tile adjacency are then derived from the
    /// finished edge list and the tile boundaries.
    pub fn from_tiles(tiles: Vec<Tile>) -> Result<Self, TopologyError> {
        check_tiles(&tiles)?;

        let mut vertices: Vec<Vertex> = (0..VERTEX_COUNT).map(Vertex::new).collect();
        let mut edges: Vec<Edge> = Vec::with_capacity(EDGE_COUNT);
        let mut seen: HashMap<(VertexId, VertexId), EdgeId> = HashMap::new();

        for tile in &tiles {
            for (a, b) in tile.boundary_pairs() {
                let key = (a.min(b), a.max(b));
                if !seen.contains_key(&key) {
                    let id = edges.len();
                    seen.insert(key, id);
                    edges.push(Edge::new(id, a, b));
                }
            }
        }

        if edges.len() != EDGE_COUNT {
            return Err(TopologyError::EdgeCount {
                expected: EDGE_COUNT,
                found: edges.len(),
            });
        }

        for edge in &edges {
            let [a, b] = edge.endpoints;
            vertices[a].adjacent_vertices.insert(b);
            vertices[b].adjacent_vertices.insert(a);
        }
        for tile in &tiles {
            for &v in &tile.vertices {
                vertices[v].adjacent_tiles.insert(tile.id);
            }
        }

        if let Some(orphan) = vertices.iter().find(|v| v.adjacent_tiles.is_empty()) {
            return Err(TopologyError::OrphanVertex { vertex: orphan.id });
        }

        Ok(Self {
            tiles,
            vertices,
            edges,
        })
    }

    // ==================== Query Methods ====================

    /// Find the tile at cube coordinates `(q, s, r)`
    pub fn tile_at(&self, q: i32, s: i32, r: i32) -> Option<&Tile> {
        let coord = CubeCoord::from_cube(q, s, r)?;
        self.tiles.iter().find(|t| t.coord == coord)
    }

    /// Get a tile by id
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id)
    }

    /// Get a vertex by id
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id)
    }

    /// Get a vertex by id for occupancy updates
    pub fn vertex_mut(&mut self, id: VertexId) -> Option<&mut Vertex> {
        self.vertices.get_mut(id)
    }

    /// Get an edge by id
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// Get an edge by id for occupancy updates
    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(id)
    }

    /// Find the edge joining two vertices, in either order
    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.connects(a, b))
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edges having `vertex` as an endpoint
    pub fn edges_at(&self, vertex: VertexId) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter(move |e| e.touches(vertex))
    }

    /// Vertices holding a structure owned by `player`
    pub fn structures_of(&self, player: PlayerId) -> impl Iterator<Item = &Vertex> + '_ {
        self.vertices
            .iter()
            .filter(move |v| v.owner() == Some(player))
    }

    /// Edges holding a road owned by `player`
    pub fn roads_of(&self, player: PlayerId) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter(move |e| e.owner() == Some(player))
    }

    /// Victory points from the structures `player` has on the board
    pub fn victory_points(&self, player: PlayerId) -> u32 {
        self.structures_of(player)
            .filter_map(|v| v.structure())
            .map(|s| s.victory_points())
            .sum()
    }
}

/// Structural checks on the tile list, before any edge is derived
fn check_tiles(tiles: &[Tile]) -> Result<(), TopologyError> {
    if tiles.len() != TILE_COUNT {
        return Err(TopologyError::TileCount {
            expected: TILE_COUNT,
            found: tiles.len(),
        });
    }

    let mut coords: HashMap<CubeCoord, TileId> = HashMap::new();
    for (position, tile) in tiles.iter().enumerate() {
        if tile.id != position {
            return Err(TopologyError::TileIdMismatch {
                position,
                id: tile.id,
            });
        }
        if let Some(&first) = coords.get(&tile.coord) {
            return Err(TopologyError::DuplicateCoord {
                first,
                second: tile.id,
                coord: tile.coord,
            });
        }
        coords.insert(tile.coord, tile.id);

        let mut seen = HashSet::new();
        for &vertex in &tile.vertices {
            if vertex >= VERTEX_COUNT {
                return Err(TopologyError::VertexOutOfRange {
                    tile: tile.id,
                    vertex,
                });
            }
            if !seen.insert(vertex) {
                return Err(TopologyError::DuplicateVertex {
                    tile: tile.id,
                    vertex,
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Terrain;
    use crate::generator::STANDARD_LAYOUT;
    use pretty_assertions::assert_eq;

    /// Standard layout with every tile as hills on token 5; quotas are the
    /// generator's concern, not the topology's
    fn plain_tiles() -> Vec<Tile> {
        STANDARD_LAYOUT
            .iter()
            .enumerate()
            .map(|(id, (coord, vertices))| Tile::new(id, *coord, Terrain::Hills, 5, *vertices))
            .collect()
    }

    fn plain_topology() -> Topology {
        Topology::from_tiles(plain_tiles()).unwrap()
    }

    #[test]
    fn test_standard_layout_counts() {
        let topology = plain_topology();
        assert_eq!(topology.tiles().len(), TILE_COUNT);
        assert_eq!(topology.vertices().len(), VERTEX_COUNT);
        assert_eq!(topology.edges().len(), EDGE_COUNT);
    }

    #[test]
    fn test_edges_follow_discovery_order() {
        let topology = plain_topology();
        // Tile 0 is walked first, so its boundary yields edges 0-5
        assert_eq!(topology.edge(0).unwrap().endpoints(), [0, 1]);
        assert_eq!(topology.edge(5).unwrap().endpoints(), [5, 0]);
        // Tile 1 starts at vertex 6, which tile 0 does not touch
        assert_eq!(topology.edge(6).unwrap().endpoints(), [6, 7]);
    }

    #[test]
    fn test_lookup_out_of_range_is_none() {
        let topology = plain_topology();
        assert!(topology.vertex(VERTEX_COUNT).is_none());
        assert!(topology.edge(EDGE_COUNT).is_none());
        assert!(topology.tile(TILE_COUNT).is_none());
        assert!(topology.vertex(VERTEX_COUNT - 1).is_some());
        assert!(topology.edge(EDGE_COUNT - 1).is_some());
    }

    #[test]
    fn test_tile_at() {
        let topology = plain_topology();
        assert_eq!(topology.tile_at(0, 0, 0).map(|t| t.id), Some(0));
        assert_eq!(topology.tile_at(0, 1, -1).map(|t| t.id), Some(1));
        assert_eq!(topology.tile_at(1, 1, -2).map(|t| t.id), Some(18));
        // Off the board
        assert!(topology.tile_at(3, -3, 0).is_none());
        // Not a cube coordinate at all
        assert!(topology.tile_at(1, 1, 1).is_none());
    }

    #[test]
    fn test_find_edge_is_symmetric() {
        let topology = plain_topology();
        for a in 0..VERTEX_COUNT {
            for b in 0..VERTEX_COUNT {
                let forward = topology.find_edge(a, b).map(|e| e.id);
                let backward = topology.find_edge(b, a).map(|e| e.id);
                assert_eq!(forward, backward, "find_edge({a}, {b})");
            }
        }
    }

    #[test]
    fn test_find_edge_missing_pair() {
        let topology = plain_topology();
        assert!(topology.find_edge(0, 0).is_none());
        // 0 and 3 are opposite corners of tile 0
        assert!(topology.find_edge(0, 3).is_none());
        assert!(topology.find_edge(0, 999).is_none());
    }

    #[test]
    fn test_vertex_adjacency_is_symmetric_and_matches_edges() {
        let topology = plain_topology();
        for vertex in topology.vertices() {
            for other in vertex.adjacent_vertices() {
                assert!(topology.vertex(other).unwrap().is_adjacent_to(vertex.id));
                assert!(topology.find_edge(vertex.id, other).is_some());
            }
            let degree = vertex.adjacent_vertices().count();
            assert!((2..=3).contains(&degree), "vertex {} has degree {degree}", vertex.id);
        }
    }

    #[test]
    fn test_vertex_tiles_match_tile_boundaries() {
        let topology = plain_topology();
        for vertex in topology.vertices() {
            let from_tiles: BTreeSet<TileId> = topology
                .tiles()
                .iter()
                .filter(|t| t.vertices.contains(&vertex.id))
                .map(|t| t.id)
                .collect();
            let recorded: BTreeSet<TileId> = vertex.adjacent_tiles().collect();
            assert_eq!(recorded, from_tiles);
            assert!((1..=3).contains(&recorded.len()));
        }
    }

    #[test]
    fn test_edge_occupancy_and_helpers() {
        let mut topology = plain_topology();
        let edge = topology.find_edge(1, 2).unwrap().id;
        assert_eq!(topology.edge(edge).unwrap().other_endpoint(1), Some(2));
        assert_eq!(topology.edge(edge).unwrap().other_endpoint(7), None);

        topology.edge_mut(edge).unwrap().set_road(Road::new(2));
        assert_eq!(topology.edge(edge).unwrap().owner(), Some(2));
        assert_eq!(topology.roads_of(2).count(), 1);
        assert_eq!(topology.edges_at(1).count(), 3);
    }

    #[test]
    fn test_victory_points_follow_structures() {
        let mut topology = plain_topology();
        topology.vertex_mut(0).unwrap().set_structure(Structure::settlement(1));
        topology.vertex_mut(10).unwrap().set_structure(Structure::city(1));
        topology.vertex_mut(20).unwrap().set_structure(Structure::settlement(2));
        assert_eq!(topology.victory_points(1), 3);
        assert_eq!(topology.victory_points(2), 1);
        assert_eq!(topology.victory_points(0), 0);
    }

    #[test]
    fn test_rejects_wrong_tile_count() {
        let mut tiles = plain_tiles();
        tiles.pop();
        assert_eq!(
            Topology::from_tiles(tiles),
            Err(TopologyError::TileCount {
                expected: TILE_COUNT,
                found: TILE_COUNT - 1
            })
        );
    }

    #[test]
    fn test_rejects_duplicate_vertex_in_tile() {
        let mut tiles = plain_tiles();
        tiles[4].vertices[1] = tiles[4].vertices[0];
        assert!(matches!(
            Topology::from_tiles(tiles),
            Err(TopologyError::DuplicateVertex { tile: 4, .. })
        ));
    }

    #[test]
    fn test_rejects_vertex_out_of_range() {
        let mut tiles = plain_tiles();
        tiles[2].vertices[3] = VERTEX_COUNT;
        assert!(matches!(
            Topology::from_tiles(tiles),
            Err(TopologyError::VertexOutOfRange { tile: 2, .. })
        ));
    }

    #[test]
    fn test_rejects_inconsistent_boundary() {
        let mut tiles = plain_tiles();
        // Reordering a boundary invents edges that no neighbor shares
        tiles[0].vertices = [0, 2, 1, 3, 4, 5];
        assert!(matches!(
            Topology::from_tiles(tiles),
            Err(TopologyError::EdgeCount { .. })
        ));
    }

    #[test]
    fn test_rejects_duplicate_coordinate() {
        let mut tiles = plain_tiles();
        tiles[5].coord = tiles[0].coord;
        assert!(matches!(
            Topology::from_tiles(tiles),
            Err(TopologyError::DuplicateCoord {
                first: 0,
                second: 5,
                ..
            })
        ));
    }

    #[test]
    fn test_serializes_for_board_dumps() {
        let mut topology = plain_topology();
        topology.vertex_mut(0).unwrap().set_structure(Structure::city(1));

        let value = serde_json::to_value(&topology).unwrap();
        assert_eq!(value["tiles"].as_array().unwrap().len(), TILE_COUNT);
        assert_eq!(value["edges"].as_array().unwrap().len(), EDGE_COUNT);
        assert_eq!(value["edges"][0]["endpoints"], serde_json::json!([0, 1]));
        assert_eq!(value["vertices"][0]["adjacent_vertices"], serde_json::json!([1, 5, 20]));
        assert_eq!(value["vertices"][0]["structure"]["kind"], "City");
        assert!(value["vertices"][1]["structure"].is_null());
    }
}
