//! Randomized board generation.
//!
//! The board geometry is a constant: 19 hex slots, each with the six vertex
//! ids that bound it. Only terrain and tokens are random. Both are assigned
//! by rejection sampling against fixed quotas, which realizes a random
//! permutation of the quota multiset.
//!
//! Sampling has no iteration cap. With these quotas it terminates with
//! probability 1 and in practice within a handful of draws per tile.

use crate::board::{Terrain, Tile, VertexId, DESERT_TOKEN};
use crate::hex::CubeCoord;
use crate::topology::{Topology, TopologyError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Tiles per terrain, in [`Terrain::ALL`] order:
/// Forest(4), Pasture(4), Fields(4), Hills(3), Mountains(3), Desert(1)
pub const TERRAIN_QUOTA: [usize; 6] = [4, 4, 4, 3, 3, 1];

/// Tiles per token value, indexed by the value itself (0-12).
///
/// 0 is the desert sentinel and is never drawn; 1 and 7 have no quota, so
/// draws of them are always rejected.
pub const TOKEN_QUOTA: [usize; 13] = [0, 0, 1, 2, 2, 2, 2, 0, 2, 2, 2, 2, 1];

/// Largest token value drawn (draws cover 1..=12)
const MAX_TOKEN: u8 = 12;

const fn at(q: i32, s: i32, r: i32) -> CubeCoord {
    assert!(q + s + r == 0, "layout coordinate is not a cube coordinate");
    CubeCoord::new(q, r)
}

/// Board geometry: for each tile slot, its coordinate and its boundary
/// vertices in rotational order. Neighboring slots list their shared
/// vertices so that walking all boundaries yields exactly 72 edges.
pub const STANDARD_LAYOUT: [(CubeCoord, [VertexId; 6]); 19] = [
    (at(0, 0, 0), [0, 1, 2, 3, 4, 5]),
    (at(0, 1, -1), [6, 7, 8, 9, 2, 1]),
    (at(-1, 1, 0), [2, 9, 10, 11, 12, 3]),
    (at(-1, 0, 1), [4, 3, 12, 13, 14, 15]),
    (at(0, -1, 1), [16, 5, 4, 15, 17, 18]),
    (at(1, -1, 0), [19, 20, 0, 5, 16, 21]),
    (at(1, 0, -1), [22, 23, 6, 1, 0, 20]),
    (at(0, 2, -2), [24, 25, 26, 27, 8, 7]),
    (at(-1, 2, -1), [8, 27, 28, 29, 10, 9]),
    (at(-2, 2, 0), [10, 29, 30, 31, 32, 11]),
    (at(-2, 1, 1), [12, 11, 32, 33, 34, 13]),
    (at(-2, 0, 2), [14, 13, 34, 35, 36, 37]),
    (at(-1, -1, 2), [17, 15, 14, 37, 38, 39]),
    (at(0, -2, 2), [40, 18, 17, 39, 41, 42]),
    (at(1, -2, 1), [43, 21, 16, 18, 40, 44]),
    (at(2, -2, 0), [45, 46, 19, 21, 43, 47]),
    (at(2, -1, -1), [48, 49, 22, 20, 19, 46]),
    (at(2, 0, -2), [50, 51, 52, 23, 22, 49]),
    (at(1, 1, -2), [52, 53, 24, 7, 6, 23]),
];

/// Something that can produce a fresh board for a game
pub trait BoardGenerator {
    fn generate(&mut self) -> Result<Topology, TopologyError>;
}

/// Generates boards on the standard layout with random terrain and tokens
pub struct RandomBoardGenerator {
    rng: StdRng,
}

impl RandomBoardGenerator {
    /// Generator seeded from process entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Generator whose boards are reproducible for a given seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw terrains until one with quota left comes up
    fn draw_terrain(&mut self, placed: &mut [usize; 6]) -> Terrain {
        loop {
            let index = self.rng.gen_range(0..Terrain::ALL.len());
            if placed[index] < TERRAIN_QUOTA[index] {
                placed[index] += 1;
                return Terrain::ALL[index];
            }
        }
    }

    /// Draw token values from 1-12 until one with quota left comes up
    fn draw_token(&mut self, placed: &mut [usize; 13]) -> u8 {
        loop {
            let token = self.rng.gen_range(1..=MAX_TOKEN);
            let index = token as usize;
            if placed[index] < TOKEN_QUOTA[index] {
                placed[index] += 1;
                return token;
            }
        }
    }
}

impl Default for RandomBoardGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(&mut self) -> Result<Topology, TopologyError> {
        let mut terrains_placed = [0usize; 6];
        let mut tokens_placed = [0usize; 13];
        let mut tiles = Vec::with_capacity(STANDARD_LAYOUT.len());

        for (id, (coord, vertices)) in STANDARD_LAYOUT.iter().enumerate() {
            let terrain = self.draw_terrain(&mut terrains_placed);
            let token = if terrain == Terrain::Desert {
                DESERT_TOKEN
            } else {
                self.draw_token(&mut tokens_placed)
            };
            tiles.push(Tile::new(id, *coord, terrain, token, *vertices));
        }

        let topology = Topology::from_tiles(tiles)?;
        check_quotas(&topology)?;

        if let Some(desert) = topology.tiles().iter().find(|t| t.terrain == Terrain::Desert) {
            debug!(desert = desert.id, coord = %desert.coord, "generated board");
        }
        Ok(topology)
    }
}

/// Generate a board, reproducibly when a seed is given
pub fn generate(seed: Option<u64>) -> Result<Topology, TopologyError> {
    match seed {
        Some(seed) => RandomBoardGenerator::with_seed(seed).generate(),
        None => RandomBoardGenerator::new().generate(),
    }
}

/// Check that terrain and token counts match the quotas exactly and that
/// only the desert carries the sentinel token
pub fn check_quotas(topology: &Topology) -> Result<(), TopologyError> {
    let mut terrains = [0usize; 6];
    let mut tokens = [0usize; 13];

    for tile in topology.tiles() {
        terrains[tile.terrain.index()] += 1;

        let is_desert = tile.terrain == Terrain::Desert;
        let token_ok = if is_desert {
            tile.token == DESERT_TOKEN
        } else {
            tile.token <= MAX_TOKEN && TOKEN_QUOTA[tile.token as usize] > 0
        };
        if !token_ok {
            return Err(TopologyError::MisplacedToken {
                tile: tile.id,
                token: tile.token,
            });
        }
        if !is_desert {
            tokens[tile.token as usize] += 1;
        }
    }

    let counts = terrains.iter().zip(&TERRAIN_QUOTA);
    for (terrain, (&found, &expected)) in Terrain::ALL.iter().zip(counts) {
        if found != expected {
            return Err(TopologyError::TerrainQuota {
                label: format!("{terrain:?}"),
                expected,
                found,
            });
        }
    }

    for (token, (&found, &expected)) in tokens.iter().zip(&TOKEN_QUOTA).enumerate() {
        if found != expected {
            return Err(TopologyError::TokenQuota {
                token: token as u8,
                expected,
                found,
            });
        }
    }

    Ok(())
}
