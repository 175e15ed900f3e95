use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::engine::Direction;
use crate::error::{Error, Result};
use crate::heuristics::{evaluate, EvalWeights};
use crate::live::LiveGame;
use crate::state::GameState;

/// Plies searched when no depth is given.
pub const DEFAULT_DEPTH: u32 = 3;
/// Fraction of a reversing move's score magnitude taken off as a penalty.
pub const DEFAULT_REVERSE_PENALTY: f64 = 0.1;

/// Parameters of one move decision.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// Plies simulated below the current state, counting the player's move.
    pub depth: u32,
    /// Seed for the frightened-ghost RNG. `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Damping applied to the move that reverses the player's facing.
    pub reverse_penalty: f64,
    pub weights: EvalWeights,
}

impl SearchConfig {
    pub fn new(depth: u32) -> Self {
        SearchConfig {
            depth,
            seed: None,
            reverse_penalty: DEFAULT_REVERSE_PENALTY,
            weights: EvalWeights::default(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_weights(mut self, weights: EvalWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_reverse_penalty(mut self, reverse_penalty: f64) -> Self {
        self.reverse_penalty = reverse_penalty;
        self
    }

    /// The RNG a search with this config draws from.
    pub fn rng(&self) -> SmallRng {
        match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig::new(DEFAULT_DEPTH)
    }
}

/// Score of one root move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveScore {
    pub direction: Direction,
    /// Best leaf value reachable after this move.
    pub score: f64,
    /// `score` after reverse damping; this is what move selection compares.
    pub adjusted: f64,
}

/// Best evaluation reachable from `state` within `depth` plies.
///
/// Every ply is a player move followed by the ghosts' reply, so the only
/// choice point is the player's and the search maximises at every level.
/// Depth 1 or less, a terminal state, or a boxed-in player is evaluated as a
/// leaf. Each child is built, searched and dropped before the next, so no
/// more than one child per level is alive at a time.
pub fn minimax<R: Rng + ?Sized>(state: &GameState, depth: u32, weights: &EvalWeights, rng: &mut R) -> f64 {
    if depth <= 1 || !state.is_alive() {
        return evaluate(state, weights);
    }

    let mut best: Option<f64> = None;
    for dir in Direction::ALL {
        if let Some(child) = state.advance(dir, rng) {
            let value = minimax(&child, depth - 1, weights, rng);
            best = Some(best.map_or(value, |b| b.max(value)));
        }
    }
    best.unwrap_or_else(|| evaluate(state, weights))
}

/// Scores every legal first move from `root`, in the order up, down, left, right.
///
/// A move that turns the player straight around has its score pushed down by
/// `reverse_penalty` times its magnitude. Infinite scores are left alone.
pub fn score_moves(root: &GameState, config: &SearchConfig) -> Vec<MoveScore> {
    let mut rng = config.rng();
    let reverse = root.player().facing.map(Direction::opposite);

    root.enumerate_children(&mut rng)
        .into_iter()
        .map(|(direction, child)| {
            let score = minimax(&child, config.depth, &config.weights, &mut rng);
            let adjusted = if Some(direction) == reverse && score.is_finite() {
                score - config.reverse_penalty * score.abs()
            } else {
                score
            };
            debug!(%direction, score, adjusted, "scored move");
            MoveScore {
                direction,
                score,
                adjusted,
            }
        })
        .collect()
}

/// Picks the best move from an existing snapshot.
///
/// Ties go to the earliest direction in up, down, left, right order.
///
/// # Errors
/// `Error::NoLegalMove` if every direction is blocked.
pub fn best_move(root: &GameState, config: &SearchConfig) -> Result<Direction> {
    let mut best: Option<MoveScore> = None;
    for candidate in score_moves(root, config) {
        if best.map_or(true, |b| candidate.adjusted > b.adjusted) {
            best = Some(candidate);
        }
    }
    let chosen = best.ok_or(Error::NoLegalMove)?;
    debug!(direction = %chosen.direction, score = chosen.adjusted, depth = config.depth, "chose move");
    Ok(chosen.direction)
}

/// Snapshots the live game and picks the player's next move with the given settings.
///
/// # Errors
/// Any snapshot error from [`GameState::from_live`], or
/// `Error::NoLegalMove` if the player is boxed in.
pub fn choose_move_with<G: LiveGame + ?Sized>(live: &G, config: &SearchConfig) -> Result<Direction> {
    let root = GameState::from_live(live)?;
    best_move(&root, config)
}

/// Snapshots the live game and picks the player's next move with a `depth`-ply search.
///
/// # Examples
/// ```
/// use ghost_chase_ai::engine::Direction;
/// use ghost_chase_ai::solver::choose_move;
/// use ghost_chase_ai::utils::scenario_from_str_array;
///
/// let state = scenario_from_str_array(&[
///     "#########",
///     "#  P.   #",
///     "#########",
///     "#R#K#C#O#",
///     "#########",
/// ]).unwrap();
/// // eating the last pellet wins outright
/// assert_eq!(choose_move(&state, 2).unwrap(), Direction::Right);
/// ```
pub fn choose_move<G: LiveGame + ?Sized>(live: &G, depth: u32) -> Result<Direction> {
    choose_move_with(live, &SearchConfig::new(depth))
}
