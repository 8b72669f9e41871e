//! Core game state machine.
//!
//! [`Game`] owns the board, the players and the collaborators that decide
//! what happens each turn. All mutation goes through
//! [`Game::apply_action`], which checks an action against the same rules
//! [`Game::valid_actions`] enumerates before touching any state.

use crate::actions::{GameAction, GameEvent};
use crate::bank::{Bank, BankError, CostTable, PieceKind};
use crate::board::{EdgeId, PlayerId, Road, Structure, VertexId};
use crate::dice::{Dice, TriggerSource, DIE_SIDES};
use crate::generator;
use crate::player::Player;
use crate::production::produce;
use crate::topology::{Topology, TopologyError};
use crate::validator::{PlacementValidator, StandardValidator};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Victory points needed to win
pub const VICTORY_POINTS_TO_WIN: u32 = 10;

/// Hand size at which a player may no longer pass while a build is open
pub const MUST_BUILD_HAND_SIZE: u32 = 7;

pub const MIN_PLAYERS: u8 = 2;
pub const MAX_PLAYERS: u8 = 4;

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Initial placement phase
    Setup {
        /// Which of the current player's two settlements (1 or 2)
        round: u8,
        /// What we're currently placing
        placing: SetupPlacing,
    },

    /// Before rolling dice at start of turn
    PreRoll,

    /// After rolling: build one piece or pass
    MainPhase,

    /// Game is over
    Finished { winner: PlayerId },
}

/// What we're placing during setup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetupPlacing {
    Settlement,
    Road,
}

/// Errors that can occur when creating a game or applying actions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("A game needs {MIN_PLAYERS}-{MAX_PLAYERS} players, got {0}")]
    InvalidPlayerCount(u8),

    #[error("Round limit must be at least 1")]
    InvalidRoundLimit,

    #[error("Not your turn")]
    NotYourTurn,

    #[error("Invalid action for current phase")]
    InvalidPhase,

    #[error("Invalid placement location")]
    InvalidLocation,

    #[error("Cannot pass while a placement or build is available")]
    MustBuild,

    #[error("Game is over")]
    GameOver,

    #[error(transparent)]
    Bank(#[from] BankError),

    #[error(transparent)]
    Topology(#[from] TopologyError),
}

/// Options fixed for the lifetime of a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    pub players: u8,
    /// Rounds after which the leader wins; `None` plays until someone
    /// reaches the target
    pub max_rounds: Option<u32>,
    pub costs: CostTable,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            players: MAX_PLAYERS,
            max_rounds: None,
            costs: CostTable::standard(),
        }
    }
}

/// The complete game state
pub struct Game {
    topology: Topology,
    players: Vec<Player>,
    bank: Bank,
    validator: Box<dyn PlacementValidator>,
    dice: Box<dyn TriggerSource>,
    current_player: PlayerId,
    phase: GamePhase,
    /// Round number, 0 during setup and counting from 1 afterwards
    round: u32,
    max_rounds: Option<u32>,
    last_roll: Option<u32>,
    /// Setup phase tracking: which settlement was just placed
    setup_settlement: Option<VertexId>,
}

impl Game {
    /// Create a game on `topology`, rolling with `dice`
    pub fn new(
        topology: Topology,
        settings: GameSettings,
        dice: Box<dyn TriggerSource>,
    ) -> Result<Self, GameError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&settings.players) {
            return Err(GameError::InvalidPlayerCount(settings.players));
        }
        if settings.max_rounds == Some(0) {
            return Err(GameError::InvalidRoundLimit);
        }

        Ok(Self {
            topology,
            players: (0..settings.players).map(Player::new).collect(),
            bank: Bank::new(settings.costs),
            validator: Box::new(StandardValidator),
            dice,
            current_player: 0,
            phase: GamePhase::Setup {
                round: 1,
                placing: SetupPlacing::Settlement,
            },
            round: 0,
            max_rounds: settings.max_rounds,
            last_roll: None,
            setup_settlement: None,
        })
    }

    /// Create a game on a freshly generated board. With a seed both the
    /// board and the dice are reproducible.
    pub fn seeded(settings: GameSettings, seed: Option<u64>) -> Result<Self, GameError> {
        let topology = generator::generate(seed)?;
        let dice: Box<dyn TriggerSource> = match seed {
            Some(seed) => Box::new(Dice::with_seed(seed.wrapping_add(1))),
            None => Box::new(Dice::new()),
        };
        Self::new(topology, settings, dice)
    }

    /// Replace the placement rules
    pub fn with_validator(mut self, validator: impl PlacementValidator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    // ==================== Query Methods ====================

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Get a player by ID
    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id as usize)
    }

    pub fn bank(&self) -> &Bank {
        &self.bank
    }

    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn last_roll(&self) -> Option<u32> {
        self.last_roll
    }

    /// Victory points of a player, read from the board
    pub fn victory_points(&self, player: PlayerId) -> u32 {
        self.topology.victory_points(player)
    }

    /// Victory points of every player in seat order
    pub fn scores(&self) -> Vec<(PlayerId, u32)> {
        self.players
            .iter()
            .map(|p| (p.id, self.victory_points(p.id)))
            .collect()
    }

    /// Check if the game is finished
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, GamePhase::Finished { .. })
    }

    /// Get the winner if the game is finished
    pub fn winner(&self) -> Option<PlayerId> {
        match self.phase {
            GamePhase::Finished { winner } => Some(winner),
            _ => None,
        }
    }

    // ==================== Legal Moves ====================

    /// Get all currently valid actions for a player
    pub fn valid_actions(&self, player: PlayerId) -> Vec<GameAction> {
        if player != self.current_player || self.is_finished() {
            return Vec::new();
        }

        let mut actions = Vec::new();
        match self.phase {
            GamePhase::Finished { .. } => {}

            GamePhase::Setup { placing, .. } => {
                match placing {
                    SetupPlacing::Settlement => actions.extend(
                        self.setup_settlement_sites(player)
                            .map(GameAction::PlaceInitialSettlement),
                    ),
                    SetupPlacing::Road => actions
                        .extend(self.setup_road_sites(player).map(GameAction::PlaceInitialRoad)),
                }
                // A step with nowhere legal to go is skipped
                if actions.is_empty() {
                    actions.push(GameAction::Pass);
                }
            }

            GamePhase::PreRoll => actions.push(GameAction::RollDice),

            GamePhase::MainPhase => {
                actions = self.build_actions(player);
                if !self.must_build(player, &actions) {
                    actions.push(GameAction::Pass);
                }
            }
        }
        actions
    }

    /// Every build `player` could make right now
    fn build_actions(&self, player: PlayerId) -> Vec<GameAction> {
        let Some(state) = self.get_player(player) else {
            return Vec::new();
        };
        let mut actions = Vec::new();

        if self.bank.can_afford(state, PieceKind::Settlement) {
            actions.extend(
                self.topology
                    .vertices()
                    .iter()
                    .map(|v| v.id)
                    .filter(|&v| self.is_settlement_site(player, v))
                    .map(GameAction::BuildSettlement),
            );
        }
        if self.bank.can_afford(state, PieceKind::City) {
            actions.extend(
                self.topology
                    .structures_of(player)
                    .map(|v| v.id)
                    .filter(|&v| self.validator.can_upgrade_to_city(&self.topology, v, player))
                    .map(GameAction::BuildCity),
            );
        }
        if self.bank.can_afford(state, PieceKind::Road) {
            actions.extend(
                self.topology
                    .edges()
                    .iter()
                    .map(|e| e.id)
                    .filter(|&e| self.is_road_site(player, e))
                    .map(GameAction::BuildRoad),
            );
        }
        actions
    }

    fn must_build(&self, player: PlayerId, builds: &[GameAction]) -> bool {
        !builds.is_empty()
            && self
                .get_player(player)
                .is_some_and(|p| p.resources.total() >= MUST_BUILD_HAND_SIZE)
    }

    fn setup_settlement_sites(&self, player: PlayerId) -> impl Iterator<Item = VertexId> + '_ {
        self.topology
            .vertices()
            .iter()
            .map(|v| v.id)
            .filter(move |&v| self.validator.can_place_settlement(&self.topology, v, player, true))
    }

    /// Free edges at the settlement just placed
    fn setup_road_sites(&self, player: PlayerId) -> impl Iterator<Item = EdgeId> + '_ {
        self.setup_settlement.into_iter().flat_map(move |settlement| {
            self.topology
                .edges_at(settlement)
                .map(|e| e.id)
                .filter(move |&e| self.validator.can_place_road(&self.topology, e, player, true))
        })
    }

    fn is_settlement_site(&self, player: PlayerId, vertex: VertexId) -> bool {
        self.validator
            .can_place_settlement(&self.topology, vertex, player, false)
            && self.validator.touches_own_road(&self.topology, vertex, player)
    }

    fn is_road_site(&self, player: PlayerId, edge: EdgeId) -> bool {
        self.validator.can_place_road(&self.topology, edge, player, false)
            && self.validator.extends_network(&self.topology, edge, player)
    }

    // ==================== Applying Actions ====================

    /// Validate and apply an action, returning what happened
    pub fn apply_action(
        &mut self,
        player: PlayerId,
        action: GameAction,
    ) -> Result<Vec<GameEvent>, GameError> {
        if self.is_finished() {
            return Err(GameError::GameOver);
        }
        if player != self.current_player {
            return Err(GameError::NotYourTurn);
        }
        debug!(player, ?action, phase = ?self.phase, "applying action");

        let mut events = Vec::new();
        match action {
            // ==================== Setup Phase ====================
            GameAction::PlaceInitialSettlement(vertex) => {
                let GamePhase::Setup {
                    round,
                    placing: SetupPlacing::Settlement,
                } = self.phase
                else {
                    return Err(GameError::InvalidPhase);
                };
                if !self
                    .validator
                    .can_place_settlement(&self.topology, vertex, player, true)
                {
                    return Err(GameError::InvalidLocation);
                }

                let state = self
                    .players
                    .get_mut(player as usize)
                    .ok_or(GameError::NotYourTurn)?;
                self.bank.take_setup_piece(state, PieceKind::Settlement)?;
                self.place_structure(vertex, Structure::settlement(player))?;
                self.setup_settlement = Some(vertex);
                self.phase = GamePhase::Setup {
                    round,
                    placing: SetupPlacing::Road,
                };

                events.push(GameEvent::SettlementBuilt {
                    player,
                    vertex,
                    setup: true,
                });
            }

            GameAction::PlaceInitialRoad(edge) => {
                if !matches!(
                    self.phase,
                    GamePhase::Setup {
                        placing: SetupPlacing::Road,
                        ..
                    }
                ) {
                    return Err(GameError::InvalidPhase);
                }
                // Road must connect to just-placed settlement
                let settlement = self.setup_settlement.ok_or(GameError::InvalidPhase)?;
                let touches = self
                    .topology
                    .edge(edge)
                    .is_some_and(|e| e.touches(settlement));
                if !touches || !self.validator.can_place_road(&self.topology, edge, player, true) {
                    return Err(GameError::InvalidLocation);
                }

                let state = self
                    .players
                    .get_mut(player as usize)
                    .ok_or(GameError::NotYourTurn)?;
                self.bank.take_setup_piece(state, PieceKind::Road)?;
                self.place_road(edge, Road::new(player))?;

                events.push(GameEvent::RoadBuilt {
                    player,
                    edge,
                    setup: true,
                });
                self.advance_setup(&mut events);
            }

            // ==================== Dice Rolling ====================
            GameAction::RollDice => {
                if self.phase != GamePhase::PreRoll {
                    return Err(GameError::InvalidPhase);
                }

                let total = self.dice.roll_two(DIE_SIDES);
                self.last_roll = Some(total);
                events.push(GameEvent::DiceRolled { player, total });

                let production = u8::try_from(total)
                    .map(|roll| produce(&self.topology, roll))
                    .unwrap_or_default();
                for item in &production {
                    if let Some(owner) = self.players.get_mut(item.player as usize) {
                        owner.resources.add(item.resource, item.amount);
                    }
                }
                if !production.is_empty() {
                    events.push(GameEvent::ResourcesProduced { production });
                }

                self.phase = GamePhase::MainPhase;
            }

            // ==================== Building ====================
            GameAction::BuildSettlement(vertex) => {
                self.require_main_phase()?;
                if !self.is_settlement_site(player, vertex) {
                    return Err(GameError::InvalidLocation);
                }

                let state = self
                    .players
                    .get_mut(player as usize)
                    .ok_or(GameError::NotYourTurn)?;
                self.bank.commit(state, PieceKind::Settlement)?;
                self.place_structure(vertex, Structure::settlement(player))?;

                events.push(GameEvent::SettlementBuilt {
                    player,
                    vertex,
                    setup: false,
                });
                self.end_turn(&mut events);
            }

            GameAction::BuildCity(vertex) => {
                self.require_main_phase()?;
                let city = self
                    .topology
                    .vertex(vertex)
                    .and_then(|v| v.structure())
                    .and_then(|s| s.upgraded())
                    .filter(|_| {
                        self.validator
                            .can_upgrade_to_city(&self.topology, vertex, player)
                    })
                    .ok_or(GameError::InvalidLocation)?;

                let state = self
                    .players
                    .get_mut(player as usize)
                    .ok_or(GameError::NotYourTurn)?;
                self.bank.commit(state, PieceKind::City)?;
                self.place_structure(vertex, city)?;

                events.push(GameEvent::CityBuilt { player, vertex });
                self.end_turn(&mut events);
            }

            GameAction::BuildRoad(edge) => {
                self.require_main_phase()?;
                if !self.is_road_site(player, edge) {
                    return Err(GameError::InvalidLocation);
                }

                let state = self
                    .players
                    .get_mut(player as usize)
                    .ok_or(GameError::NotYourTurn)?;
                self.bank.commit(state, PieceKind::Road)?;
                self.place_road(edge, Road::new(player))?;

                events.push(GameEvent::RoadBuilt {
                    player,
                    edge,
                    setup: false,
                });
                self.end_turn(&mut events);
            }

            GameAction::Pass => match self.phase {
                GamePhase::Setup { placing, .. } => {
                    let open = match placing {
                        SetupPlacing::Settlement => self.setup_settlement_sites(player).next(),
                        SetupPlacing::Road => self.setup_road_sites(player).next(),
                    };
                    if open.is_some() {
                        return Err(GameError::MustBuild);
                    }
                    events.push(GameEvent::Passed { player });
                    self.advance_setup(&mut events);
                }
                GamePhase::MainPhase => {
                    if self.must_build(player, &self.build_actions(player)) {
                        return Err(GameError::MustBuild);
                    }
                    events.push(GameEvent::Passed { player });
                    self.end_turn(&mut events);
                }
                _ => return Err(GameError::InvalidPhase),
            },
        }

        Ok(events)
    }

    fn require_main_phase(&self) -> Result<(), GameError> {
        if self.phase == GamePhase::MainPhase {
            Ok(())
        } else {
            Err(GameError::InvalidPhase)
        }
    }

    fn place_structure(&mut self, vertex: VertexId, structure: Structure) -> Result<(), GameError> {
        self.topology
            .vertex_mut(vertex)
            .ok_or(GameError::InvalidLocation)?
            .set_structure(structure);
        Ok(())
    }

    fn place_road(&mut self, edge: EdgeId, road: Road) -> Result<(), GameError> {
        self.topology
            .edge_mut(edge)
            .ok_or(GameError::InvalidLocation)?
            .set_road(road);
        Ok(())
    }

    /// Move setup on: second settlement for the same player, then the next
    /// seat, then the first turn
    fn advance_setup(&mut self, events: &mut Vec<GameEvent>) {
        let GamePhase::Setup { round, .. } = self.phase else {
            return;
        };
        self.setup_settlement = None;

        if round == 1 {
            self.phase = GamePhase::Setup {
                round: 2,
                placing: SetupPlacing::Settlement,
            };
            return;
        }

        let next = self.current_player + 1;
        if (next as usize) < self.players.len() {
            self.current_player = next;
            self.phase = GamePhase::Setup {
                round: 1,
                placing: SetupPlacing::Settlement,
            };
        } else {
            self.current_player = 0;
            self.round = 1;
            self.phase = GamePhase::PreRoll;
            events.push(GameEvent::SetupCompleted);
        }
    }

    /// Hand the turn to the next seat, closing the round and possibly the
    /// game on the way
    fn end_turn(&mut self, events: &mut Vec<GameEvent>) {
        if let Some(winner) = self.first_at_target() {
            self.finish(winner, false, events);
            return;
        }

        let next = self.current_player + 1;
        if (next as usize) < self.players.len() {
            self.current_player = next;
            self.phase = GamePhase::PreRoll;
            return;
        }

        events.push(GameEvent::RoundCompleted {
            round: self.round,
            victory_points: self.scores(),
        });
        if self.max_rounds.is_some_and(|limit| self.round >= limit) {
            let leader = self.leader();
            self.finish(leader, true, events);
            return;
        }
        self.round += 1;
        self.current_player = 0;
        self.phase = GamePhase::PreRoll;
    }

    /// Earliest seat holding enough points to win
    fn first_at_target(&self) -> Option<PlayerId> {
        self.players
            .iter()
            .map(|p| p.id)
            .find(|&id| self.victory_points(id) >= VICTORY_POINTS_TO_WIN)
    }

    /// Player with the most points, earliest seat on ties
    fn leader(&self) -> PlayerId {
        let mut best = (0, 0);
        for (id, vp) in self.scores() {
            if vp > best.1 {
                best = (id, vp);
            }
        }
        best.0
    }

    fn finish(&mut self, winner: PlayerId, by_round_limit: bool, events: &mut Vec<GameEvent>) {
        let victory_points = self.victory_points(winner);
        debug!(winner, victory_points, by_round_limit, "game finished");
        self.phase = GamePhase::Finished { winner };
        events.push(GameEvent::GameWon {
            winner,
            victory_points,
            by_round_limit,
        });
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("players", &self.players)
            .field("current_player", &self.current_player)
            .field("phase", &self.phase)
            .field("round", &self.round)
            .field("max_rounds", &self.max_rounds)
            .field("last_roll", &self.last_roll)
            .finish_non_exhaustive()
    }
}
