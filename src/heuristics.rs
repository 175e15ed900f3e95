use crate::engine::{manhattan, Maze, TilePos, TileState};
use crate::state::{GameState, Outcome};

/// Tunable coefficients of the static evaluator.
///
/// Only the shape matters: a closer threat scores much worse, nearer food
/// scores better, eating something this ply scores better still.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EvalWeights {
    /// Reward for eating a plain pellet this ply.
    pub pellet_reward: f64,
    /// Reward for eating a power pellet this ply.
    pub power_pellet_reward: f64,
    /// Reward for eating a bonus fruit this ply.
    pub fruit_reward: f64,
    /// Threats at this Manhattan distance or closer get the steep penalty.
    pub danger_radius: i32,
    /// Steep penalty per tile inside `danger_radius`.
    pub danger_penalty: f64,
    /// Threats at this distance or closer (but outside `danger_radius`) get the mild penalty.
    pub caution_radius: i32,
    /// Mild penalty per tile inside `caution_radius`.
    pub caution_penalty: f64,
    /// Penalty per tile of distance to the nearest remaining food.
    pub food_distance_weight: f64,
}

impl Default for EvalWeights {
    fn default() -> Self {
        EvalWeights {
            pellet_reward: 10.0,
            power_pellet_reward: 50.0,
            fruit_reward: 100.0,
            danger_radius: 2,
            danger_penalty: 400.0,
            caution_radius: 7,
            caution_penalty: 15.0,
            food_distance_weight: 2.0,
        }
    }
}

impl EvalWeights {
    /// Reward for the tile the player consumed on its last step.
    ///
    /// # Arguments
    /// * `consumed`: The tile state the player's last step consumed, if any.
    ///
    /// # Returns
    /// The reward as `f64`; `0.0` for anything that is not food.
    pub fn consumption_reward(&self, consumed: Option<TileState>) -> f64 {
        match consumed {
            Some(TileState::Pellet) => self.pellet_reward,
            Some(TileState::PowerPellet) => self.power_pellet_reward,
            Some(TileState::Fruit) => self.fruit_reward,
            _ => 0.0,
        }
    }

    /// Penalty for the nearest threat standing `distance` tiles away.
    ///
    /// Inside `danger_radius` the penalty grows by `danger_penalty` per tile
    /// closer, between the two radii by `caution_penalty` per tile, and is zero
    /// beyond `caution_radius`.
    ///
    /// # Arguments
    /// * `distance`: Manhattan distance from the player to the nearest threat.
    ///
    /// # Returns
    /// A non-negative penalty, never smaller for a closer threat.
    pub fn threat_penalty(&self, distance: i32) -> f64 {
        let caution_span = (self.caution_radius - self.danger_radius).max(0) as f64;
        if distance <= self.danger_radius {
            // the steep zone sits on top of the whole mild zone so the penalty stays monotonic
            let steps = (self.danger_radius - distance + 1) as f64;
            self.danger_penalty * steps + self.caution_penalty * caution_span
        } else if distance <= self.caution_radius {
            self.caution_penalty * (self.caution_radius - distance + 1) as f64
        } else {
            0.0
        }
    }
}

/// Distance to the nearest tile that still holds food, found by scanning
/// outward from `from` in rings of increasing Manhattan radius.
///
/// The scan stops at the first ring containing a pellet, power pellet or
/// fruit. Walls are not taken into account, so this is a greedy pull toward
/// food rather than a path length.
///
/// # Arguments
/// * `maze`: The maze to scan.
/// * `from`: The tile to scan outward from (normally the player's tile).
///
/// # Returns
/// `Some(radius)` of the first ring with food, or `None` if the maze holds none.
pub fn nearest_food_distance(maze: &Maze, from: TilePos) -> Option<i32> {
    let max_radius = maze.width() + maze.height();
    (0..=max_radius).find(|&radius| {
        ring(from, radius).any(|tile| maze.get_tile_state(tile).is_consumable())
    })
}

/// Tiles at exactly Manhattan distance `radius` from `center`.
fn ring(center: TilePos, radius: i32) -> impl Iterator<Item = TilePos> {
    (-radius..=radius).flat_map(move |dx| {
        let dy = radius - dx.abs();
        let tile_a = (center.0 + dx, center.1 + dy);
        let tile_b = (center.0 + dx, center.1 - dy);
        std::iter::once(tile_a).chain((dy != 0).then_some(tile_b))
    })
}

/// Manhattan distance from the player to the closest ghost that can kill it.
///
/// # Returns
/// `None` if every ghost is frightened or eaten.
pub fn nearest_threat_distance(state: &GameState) -> Option<i32> {
    let player = state.player().tile;
    state
        .ghosts()
        .iter()
        .filter(|g| g.mode.is_lethal())
        .map(|g| manhattan(g.tile, player))
        .min()
}

/// Scores `state` from the player's point of view; larger is better.
///
/// - A lost state scores `f64::NEG_INFINITY`, a won state `f64::INFINITY`.
/// - Otherwise the score is the reward for what the player just ate, minus
///   the threat penalty for the nearest dangerous ghost, minus the distance
///   to the nearest food times `food_distance_weight`.
///
/// # Arguments
/// * `state`: The leaf state to evaluate.
/// * `weights`: The coefficients to use.
///
/// # Examples
/// ```
/// use ghost_chase_ai::heuristics::{evaluate, EvalWeights};
/// use ghost_chase_ai::utils::scenario_from_str_array;
///
/// let state = scenario_from_str_array(&[
///     "##########",
///     "#P .....R#",
///     "##########",
///     "#K#C#O####",
///     "##########",
/// ]).unwrap();
/// let score = evaluate(&state, &EvalWeights::default());
/// assert!(score.is_finite());
/// assert!(score < 0.0);
/// ```
pub fn evaluate(state: &GameState, weights: &EvalWeights) -> f64 {
    match state.outcome() {
        Outcome::Lose => return f64::NEG_INFINITY,
        Outcome::Win => return f64::INFINITY,
        Outcome::Alive => {}
    }

    let mut score = weights.consumption_reward(state.maze().last_consumed());

    if let Some(distance) = nearest_threat_distance(state) {
        score -= weights.threat_penalty(distance);
    }

    if let Some(distance) = nearest_food_distance(state.maze(), state.player().tile) {
        score -= weights.food_distance_weight * distance as f64;
    }

    score
}
