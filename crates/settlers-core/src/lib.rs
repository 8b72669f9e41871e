//! Settlers - the board and rules core of a hex-grid settlement game
//!
//! This crate provides the game logic, including:
//! - A fixed board graph of 19 tiles, 54 vertices and 72 edges
//! - Random board generation under terrain and token quotas
//! - Placement rules for settlements, cities and roads
//! - Resource production for a dice roll
//! - A turn orchestrator and random bot players driving a full game
//!
//! # Modules
//!
//! - [`hex`]: Cube coordinates for tiles
//! - [`board`]: Tiles, terrains, resources and the pieces placed on the board
//! - [`topology`]: The board graph and its lookups
//! - [`generator`]: Terrain and token assignment
//! - [`validator`]: Placement predicates
//! - [`production`]: What a roll pays out
//! - [`dice`], [`player`], [`bank`]: Turn collaborators
//! - [`game`]: Game state machine
//! - [`bot`]: Random players

pub mod actions;
pub mod bank;
pub mod board;
pub mod bot;
pub mod dice;
pub mod game;
pub mod generator;
pub mod hex;
pub mod player;
pub mod production;
pub mod topology;
pub mod validator;

// Re-export commonly used types
pub use actions::{GameAction, GameEvent};
pub use bank::{Bank, BankError, CostTable, PieceKind};
pub use board::{
    EdgeId, PlayerId, Resource, Road, Structure, StructureKind, Terrain, Tile, TileId, VertexId,
};
pub use bot::Bot;
pub use dice::{Dice, TriggerSource};
pub use game::{Game, GameError, GamePhase, GameSettings, SetupPlacing};
pub use generator::{generate, BoardGenerator, RandomBoardGenerator};
pub use hex::CubeCoord;
pub use player::{Player, PlayerColor, ResourceHand};
pub use production::{produce, Production};
pub use topology::{Edge, Topology, TopologyError, Vertex};
pub use validator::{PlacementValidator, StandardValidator};
