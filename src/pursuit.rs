//! Ghost pursuit policy.
//!
//! Two halves:
//! - target selection: one `TargetStrategy` per ghost identity for chase
//!   mode, overridden by the ghost's mode (scatter corner, house entrance...);
//! - next-tile selection: `next_move_tile`, the greedy one-step pathfinder
//!   every ghost uses to approach its target.
//!
//! Everything here is deterministic except the frightened branch of
//! `next_move_tile`, which draws from the caller's RNG.
use rand::seq::SliceRandom;
use rand::Rng;

use crate::actors::{
    GhostMode, GhostName, GhostSnapshot, PlayerSnapshot, GHOST_HOUSE_ENTRANCE,
    GHOST_HOUSE_INTERIOR,
};
use crate::engine::{distance_squared, offset, offset_by, Direction, Maze, TilePos, TileState};

/// How far ahead of the player the ambushing ghost aims.
pub const AMBUSH_LOOKAHEAD: i32 = 4;
/// Squared radius (8 tiles) inside which the threshold-flee ghost gives up the chase.
pub const FLEE_RADIUS_SQUARED: i32 = 64;

/// Chase-mode targeting rule. Each ghost identity uses exactly one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetStrategy {
    /// Aim at the player's tile.
    Direct,
    /// Aim a few tiles ahead of the player.
    Ambush,
    /// Aim at the reflection of the reference ghost through the player.
    Flank,
    /// Chase from afar, retreat home when close.
    ThresholdFlee,
}

impl TargetStrategy {
    pub fn for_ghost(name: GhostName) -> TargetStrategy {
        match name {
            GhostName::Blinky => TargetStrategy::Direct,
            GhostName::Pinky => TargetStrategy::Ambush,
            GhostName::Inky => TargetStrategy::Flank,
            GhostName::Clyde => TargetStrategy::ThresholdFlee,
        }
    }

    /// Chase target for `ghost` given what the ghosts can see this ply.
    pub fn target(self, ghost: &GhostSnapshot, view: &PursuitView) -> TilePos {
        match self {
            TargetStrategy::Direct => target_direct(&view.player),
            TargetStrategy::Ambush => target_ambush(&view.player),
            TargetStrategy::Flank => target_flank(view.player.tile, view.reference_tile),
            TargetStrategy::ThresholdFlee => {
                target_threshold_flee(view.player.tile, ghost.tile, ghost.name.home_corner())
            }
        }
    }
}

/// What a ghost may read about the rest of the game when picking a target.
///
/// Captured once at the start of a ply, before any ghost moves, so every
/// ghost sees the same positions regardless of update order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PursuitView {
    pub player: PlayerSnapshot,
    /// Tile of the Direct-strategy ghost, used by the Flank strategy.
    pub reference_tile: TilePos,
    /// Mode a ghost resumes once it has left the house.
    pub resume_mode: GhostMode,
}

pub fn target_direct(player: &PlayerSnapshot) -> TilePos {
    player.tile
}

/// Four tiles ahead of the player. A player with no facing yet is targeted directly.
pub fn target_ambush(player: &PlayerSnapshot) -> TilePos {
    match player.facing {
        Some(facing) => offset_by(player.tile, facing, AMBUSH_LOOKAHEAD),
        None => player.tile,
    }
}

/// Reflects `reference` through `player`, with the vertical component of the
/// player-minus-reference vector negated.
///
/// # Examples
/// ```
/// use ghost_chase_ai::pursuit::target_flank;
/// // horizontal component mirrors, vertical component flips sign
/// assert_eq!(target_flank((3, 3), (5, 5)), (1, 5));
/// assert_eq!(target_flank((3, 3), (5, 3)), (1, 3));
/// ```
pub fn target_flank(player: TilePos, reference: TilePos) -> TilePos {
    let dx = player.0 - reference.0;
    let dy = -(player.1 - reference.1);
    (player.0 + dx, player.1 + dy)
}

/// Player's tile while at least 8 tiles away, otherwise the ghost's home corner.
pub fn target_threshold_flee(player: TilePos, own: TilePos, home_corner: TilePos) -> TilePos {
    if distance_squared(own, player) < FLEE_RADIUS_SQUARED {
        home_corner
    } else {
        player
    }
}

/// Applies mode arrival transitions to `ghost`, then returns its target.
///
/// Transitions are checked in sequence so a ghost can move through several on
/// one tile: eaten eyes at the entrance start joining, joining ghosts at the
/// interior start leaving, leaving ghosts at the entrance resume
/// `view.resume_mode` and turn around.
pub fn update_mode_and_target(ghost: &mut GhostSnapshot, view: &PursuitView) -> TilePos {
    if ghost.mode == GhostMode::EatenInvisible {
        ghost.mode = GhostMode::Eaten;
    }
    if ghost.mode == GhostMode::Eaten && ghost.tile == GHOST_HOUSE_ENTRANCE {
        ghost.mode = GhostMode::HouseJoining;
    }
    if ghost.mode == GhostMode::HouseJoining && ghost.tile == GHOST_HOUSE_INTERIOR {
        ghost.mode = GhostMode::HouseLeaving;
    }
    if ghost.mode == GhostMode::HouseLeaving && ghost.tile == GHOST_HOUSE_ENTRANCE {
        ghost.mode = view.resume_mode;
        ghost.facing = ghost.facing.map(Direction::opposite);
    }

    match ghost.mode {
        GhostMode::Scatter => ghost.name.home_corner(),
        GhostMode::Chase => TargetStrategy::for_ghost(ghost.name).target(ghost, view),
        // random walk; the target is never consulted
        GhostMode::Frightened => ghost.tile,
        GhostMode::EatenInvisible | GhostMode::Eaten | GhostMode::HouseLeaving => {
            GHOST_HOUSE_ENTRANCE
        }
        GhostMode::HouseJoining | GhostMode::HouseInside => GHOST_HOUSE_INTERIOR,
    }
}

/// Whether a ghost in `mode` may step onto a tile in `state`.
pub fn ghost_can_enter(state: TileState, mode: GhostMode) -> bool {
    if state.is_solid() {
        return false;
    }
    state != TileState::Gate || mode.may_cross_gate()
}

/// Picks the tile a ghost at `from` moves to next.
///
/// 1. Every direction except straight back is a candidate (all four when
///    `facing` is `None`).
/// 2. Candidates whose tile the ghost cannot enter are dropped.
/// 3. With no candidate left the ghost turns around. If even that tile is
///    blocked, or the ghost has no facing, it stays where it is.
/// 4. Frightened ghosts pick uniformly at random among the candidates.
/// 5. Otherwise the candidate closest to `target` (squared Euclidean distance)
///    wins, ties broken in the order up, left, down, right.
///
/// # Examples
/// ```
/// use ghost_chase_ai::actors::GhostMode;
/// use ghost_chase_ai::engine::Direction;
/// use ghost_chase_ai::pursuit::next_move_tile;
/// use ghost_chase_ai::utils::maze_from_str_array;
/// use rand::rngs::SmallRng;
/// use rand::SeedableRng;
///
/// let maze = maze_from_str_array(&[
///     "#####",
///     "#   #",
///     "#####",
/// ]).unwrap();
/// let mut rng = SmallRng::seed_from_u64(0);
/// // heading right along a corridor, the target behind is ignored
/// let next = next_move_tile((2, 1), Some(Direction::Right), (1, 1), &maze, GhostMode::Chase, &mut rng);
/// assert_eq!(next, (3, 1));
/// ```
pub fn next_move_tile<R: Rng + ?Sized>(
    from: TilePos,
    facing: Option<Direction>,
    target: TilePos,
    maze: &Maze,
    mode: GhostMode,
    rng: &mut R,
) -> TilePos {
    let reverse = facing.map(Direction::opposite);

    let candidates: Vec<TilePos> = Direction::PURSUIT_PRIORITY
        .into_iter()
        .filter(|&dir| Some(dir) != reverse)
        .map(|dir| offset(from, dir))
        .filter(|&tile| ghost_can_enter(maze.get_tile_state(tile), mode))
        .collect();

    if candidates.is_empty() {
        return match reverse {
            Some(back) => {
                let behind = offset(from, back);
                if ghost_can_enter(maze.get_tile_state(behind), mode) {
                    behind
                } else {
                    from
                }
            }
            None => from,
        };
    }

    if mode.is_frightened() {
        // candidates is non-empty, choose cannot fail
        return *candidates.choose(rng).unwrap_or(&from);
    }

    // min_by_key keeps the first minimum, which preserves the priority order
    candidates
        .into_iter()
        .min_by_key(|&tile| distance_squared(tile, target))
        .unwrap_or(from)
}

/// Advances one ghost by a single tile: mode transitions, targeting, movement.
///
/// Returns the target the ghost steered toward.
pub fn step_ghost<R: Rng + ?Sized>(
    ghost: &mut GhostSnapshot,
    view: &PursuitView,
    maze: &Maze,
    rng: &mut R,
) -> TilePos {
    let target = update_mode_and_target(ghost, view);
    let next = next_move_tile(ghost.tile, ghost.facing, target, maze, ghost.mode, rng);
    ghost.move_to(next);
    target
}
