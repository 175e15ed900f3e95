//! Self-play: the search against the ghosts over a whole game.
//!
//! The rules applied here belong to the game loop, not to the search. The
//! search only ever sees one snapshot at a time and never switches modes,
//! releases ghosts or eats them.
use tracing::{debug, info};

use crate::actors::{GhostMode, GhostName};
use crate::engine::{Direction, TileState};
use crate::error::{Error, Result};
use crate::solver::{best_move, SearchConfig};
use crate::state::{GameState, Outcome};

/// Turns ghosts stay frightened after the player eats a power pellet.
pub const FRIGHTENED_TURNS: u32 = 24;

/// Scatter/chase switches of the classic game, keyed by the turn they happen
/// on. The clock does not run while ghosts are frightened.
pub const CLASSIC_MODE_SCHEDULE: [(u32, GhostMode); 8] = [
    (0, GhostMode::Scatter),
    (28, GhostMode::Chase),
    (108, GhostMode::Scatter),
    (136, GhostMode::Chase),
    (216, GhostMode::Scatter),
    (236, GhostMode::Chase),
    (316, GhostMode::Scatter),
    (336, GhostMode::Chase),
];

/// Turns on which the ghosts waiting in the house are let out.
pub const CLASSIC_RELEASES: [(u32, GhostName); 2] = [(30, GhostName::Inky), (90, GhostName::Clyde)];

/// Game-loop rules for one match.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchRules {
    pub max_turns: u32,
    pub frightened_turns: u32,
    pub mode_schedule: Vec<(u32, GhostMode)>,
    pub releases: Vec<(u32, GhostName)>,
}

impl MatchRules {
    /// No schedule and no releases: ghosts keep whatever mode they start in.
    pub fn new(max_turns: u32) -> Self {
        MatchRules {
            max_turns,
            frightened_turns: FRIGHTENED_TURNS,
            mode_schedule: Vec::new(),
            releases: Vec::new(),
        }
    }

    /// The classic game's timings.
    pub fn classic(max_turns: u32) -> Self {
        MatchRules {
            mode_schedule: CLASSIC_MODE_SCHEDULE.to_vec(),
            releases: CLASSIC_RELEASES.to_vec(),
            ..MatchRules::new(max_turns)
        }
    }
}

/// How a match ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchReport {
    /// `Outcome::Alive` if the turn limit was reached.
    pub outcome: Outcome,
    pub turns: u32,
    pub pellets_eaten: u32,
    pub ghosts_eaten: u32,
}

/// Sends every frightened ghost standing on the player's tile back to the house.
///
/// Returns how many were caught.
pub fn eat_frightened_ghosts(state: &mut GameState) -> u32 {
    let player = state.player().tile;
    let mut eaten = 0;
    for name in GhostName::ALL {
        let ghost = state.ghost_mut(name);
        if ghost.tile == player && ghost.mode.is_frightened() {
            ghost.mode = GhostMode::EatenInvisible;
            eaten += 1;
        }
    }
    eaten
}

/// Plays `state` to the end with the search choosing every move.
///
/// With a seed in `config`, the whole match is reproducible: the ghosts'
/// own random moves draw from an RNG seeded with it, and each decision
/// searches with a seed derived from it and the turn number.
///
/// `on_turn` is called after every turn with the turn number (from 1), the
/// move played and the resulting state.
///
/// # Errors
/// `Error::NoLegalMove` if the player ends up boxed in.
pub fn play_match<F>(
    mut state: GameState,
    config: &SearchConfig,
    rules: &MatchRules,
    mut on_turn: F,
) -> Result<MatchReport>
where
    F: FnMut(u32, Direction, &GameState),
{
    let mut rng = config.rng();
    let start_pellets = state.maze().remaining_pellets();
    let mut turns = 0;
    let mut mode_clock = 0;
    let mut frightened_left = 0;
    let mut ghosts_eaten = 0;

    while turns < rules.max_turns && state.is_alive() {
        if frightened_left == 0 {
            if let Some(&(_, mode)) = rules.mode_schedule.iter().find(|(at, _)| *at == mode_clock) {
                debug!(turn = turns, ?mode, "mode switch");
                state.set_ghost_mode(mode);
            }
            mode_clock += 1;
        }
        for &(_, name) in rules.releases.iter().filter(|(at, _)| *at == turns) {
            if state.ghost_mut(name).release_from_house() {
                debug!(turn = turns, ghost = %name, "released from house");
            }
        }

        let turn_config = match config.seed {
            Some(seed) => config.clone().with_seed(seed.wrapping_add(u64::from(turns) + 1)),
            None => config.clone(),
        };
        let direction = best_move(&state, &turn_config)?;
        // a frightened ghost the player walks into is caught before it can move off
        state = state.step_player(direction).ok_or(Error::NoLegalMove)?;
        ghosts_eaten += eat_frightened_ghosts(&mut state);
        if state.is_alive() {
            state.move_ghosts(&mut rng);
        }
        turns += 1;

        if state.maze().last_consumed() == Some(TileState::PowerPellet) {
            state.set_ghost_mode(GhostMode::Frightened);
            frightened_left = rules.frightened_turns;
        } else if frightened_left > 0 {
            frightened_left -= 1;
            if frightened_left == 0 {
                let resume = state.resume_mode();
                state.set_ghost_mode(resume);
            }
        }
        ghosts_eaten += eat_frightened_ghosts(&mut state);

        on_turn(turns, direction, &state);
    }

    let report = MatchReport {
        outcome: state.outcome(),
        turns,
        pellets_eaten: start_pellets - state.maze().remaining_pellets(),
        ghosts_eaten,
    };
    info!(
        outcome = ?report.outcome,
        turns = report.turns,
        pellets = report.pellets_eaten,
        ghosts = report.ghosts_eaten,
        "match finished"
    );
    Ok(report)
}
