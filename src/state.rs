//! Game state snapshots and the one-ply transition used by the search.
//!
//! A `GameState` is a plain value: the search clones it into every branch
//! before mutating, so no two branches ever share a maze or an actor.
use std::fmt;

use rand::Rng;
use tracing::trace;

use crate::actors::{GhostMode, GhostName, GhostSnapshot, PlayerSnapshot};
use crate::engine::{offset, Direction, Maze};
use crate::error::{Error, Result};
use crate::pursuit::{step_ghost, PursuitView};

/// Terminal classification of a state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    Alive,
    /// Every pellet has been eaten.
    Win,
    /// The player shares a tile with a lethal ghost (see `GhostMode::is_lethal`).
    Lose,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        self != Outcome::Alive
    }
}

/// Everything the simulation needs for one ply: player, maze and all four ghosts.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GameState {
    player: PlayerSnapshot,
    maze: Maze,
    /// Indexed by `GhostName::index`.
    ghosts: [GhostSnapshot; 4],
    /// Scatter or chase: the mode ghosts return to after leaving the house.
    resume_mode: GhostMode,
}

impl GameState {
    /// Builds a state from exactly one snapshot per ghost identity.
    ///
    /// # Errors
    /// `Error::DuplicateGhost` if an identity appears twice,
    /// `Error::MissingGhost` if one is absent.
    pub fn new(
        player: PlayerSnapshot,
        maze: Maze,
        ghosts: impl IntoIterator<Item = GhostSnapshot>,
        resume_mode: GhostMode,
    ) -> Result<Self> {
        let mut slots: [Option<GhostSnapshot>; 4] = [None; 4];
        for ghost in ghosts {
            let slot = &mut slots[ghost.name.index()];
            if slot.is_some() {
                return Err(Error::DuplicateGhost(ghost.name));
            }
            *slot = Some(ghost);
        }

        let mut resolved = Vec::with_capacity(4);
        for name in GhostName::ALL {
            resolved.push(slots[name.index()].ok_or(Error::MissingGhost(name))?);
        }
        let ghosts: [GhostSnapshot; 4] = [resolved[0], resolved[1], resolved[2], resolved[3]];

        Ok(GameState {
            player,
            maze,
            ghosts,
            resume_mode,
        })
    }

    pub fn player(&self) -> &PlayerSnapshot {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerSnapshot {
        &mut self.player
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    /// All ghosts in update order.
    pub fn ghosts(&self) -> &[GhostSnapshot] {
        &self.ghosts
    }

    pub fn ghost(&self, name: GhostName) -> &GhostSnapshot {
        &self.ghosts[name.index()]
    }

    pub fn ghost_mut(&mut self, name: GhostName) -> &mut GhostSnapshot {
        &mut self.ghosts[name.index()]
    }

    pub fn resume_mode(&self) -> GhostMode {
        self.resume_mode
    }

    /// Switches every ghost to `mode` the way the live game does.
    ///
    /// Scatter and chase also become the mode ghosts resume after the house.
    /// Ghosts that are eaten or in the house ignore the switch.
    pub fn set_ghost_mode(&mut self, mode: GhostMode) {
        if matches!(mode, GhostMode::Scatter | GhostMode::Chase) {
            self.resume_mode = mode;
        }
        for ghost in self.ghosts.iter_mut() {
            ghost.set_mode(mode);
        }
    }

    /// Classifies the state. A cleared maze wins even if a ghost is on the player.
    pub fn outcome(&self) -> Outcome {
        if self.maze.remaining_pellets() == 0 {
            Outcome::Win
        } else if self
            .ghosts
            .iter()
            .any(|g| g.tile == self.player.tile && g.mode.is_lethal())
        {
            Outcome::Lose
        } else {
            Outcome::Alive
        }
    }

    pub fn is_alive(&self) -> bool {
        self.outcome() == Outcome::Alive
    }

    /// Simulates one ply: the player steps in `direction`, then every ghost moves once.
    ///
    /// Terminal states are returned unchanged. Returns `None` when the
    /// destination is out of bounds, a wall or the ghost-house gate. If the
    /// player's own step ends the game (a ghost's tile or the last pellet) the
    /// ghosts do not move.
    ///
    /// `self` is never modified; the returned state is an independent copy.
    ///
    /// # Examples
    /// ```
    /// use ghost_chase_ai::engine::{Direction, TileState};
    /// use ghost_chase_ai::utils::scenario_from_str_array;
    /// use rand::rngs::SmallRng;
    /// use rand::SeedableRng;
    ///
    /// let state = scenario_from_str_array(&[
    ///     "#######",
    ///     "#P..  #",
    ///     "#######",
    ///     "#R#K#C#",
    ///     "#O#####",
    ///     "#######",
    /// ]).unwrap();
    /// let mut rng = SmallRng::seed_from_u64(0);
    /// assert!(state.advance(Direction::Up, &mut rng).is_none());
    /// let next = state.advance(Direction::Right, &mut rng).unwrap();
    /// assert_eq!(next.player().tile, (2, 1));
    /// assert_eq!(next.maze().get_tile_state((2, 1)), TileState::Empty);
    /// assert_eq!(next.maze().remaining_pellets(), 1);
    /// ```
    pub fn advance<R: Rng + ?Sized>(&self, direction: Direction, rng: &mut R) -> Option<GameState> {
        let mut next = self.step_player(direction)?;
        if next.is_alive() {
            next.move_ghosts(rng);
        }
        Some(next)
    }

    /// The player half of [`GameState::advance`]: moves the player and
    /// consumes the destination tile, leaving every ghost where it is.
    ///
    /// Same contract as `advance` for blocked directions and terminal states.
    /// A game loop uses this to resolve collisions between the two halves.
    pub fn step_player(&self, direction: Direction) -> Option<GameState> {
        if !self.is_alive() {
            return Some(self.clone());
        }

        let destination = offset(self.player.tile, direction);
        if self.maze.get_tile_state(destination).blocks_player() {
            return None;
        }

        let mut next = self.clone();
        next.player.move_to(destination);
        next.maze.consume_tile(destination);
        Some(next)
    }

    /// The ghost half of [`GameState::advance`]: moves every ghost once, in identity order.
    ///
    /// Targets read positions from before any ghost moves, so the Flank ghost
    /// sees the reference ghost where it stood at the start of the ply.
    pub fn move_ghosts<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let view = PursuitView {
            player: self.player,
            reference_tile: self.ghosts[GhostName::Blinky.index()].tile,
            resume_mode: self.resume_mode,
        };
        for ghost in self.ghosts.iter_mut() {
            let from = ghost.tile;
            let target = step_ghost(ghost, &view, &self.maze, rng);
            trace!(ghost = %ghost.name, ?from, to = ?ghost.tile, ?target, mode = ?ghost.mode, "ghost step");
        }
    }

    /// Every legal one-ply successor, keyed by the direction that produced it.
    ///
    /// Directions are tried in the order up, down, left, right; blocked
    /// directions are left out, so a player boxed in on all sides has no children.
    pub fn enumerate_children<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<(Direction, GameState)> {
        Direction::ALL
            .into_iter()
            .filter_map(|dir| self.advance(dir, rng).map(|child| (dir, child)))
            .collect()
    }
}

impl fmt::Display for GameState {
    /// Renders the maze with ghost markers and `P` for the player on top.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut overlay: Vec<_> = self
            .ghosts
            .iter()
            .map(|g| (g.tile, g.name.marker()))
            .collect();
        overlay.push((self.player.tile, 'P'));
        write!(f, "{}", self.maze.to_string_with_overlay(&overlay))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TileState;
    use crate::utils::scenario_from_str_array;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    // Pinky, Inky and Clyde sealed away below the play area.
    const PARKED: [&str; 3] = ["#K#C#O###", "#########", "#########"];

    fn scenario(top: &[&str]) -> GameState {
        let rows: Vec<&str> = top.iter().chain(PARKED.iter()).copied().collect();
        scenario_from_str_array(&rows).unwrap()
    }

    #[test]
    fn test_new_requires_every_ghost_once() {
        let state = scenario(&["#########", "#P.....R#", "#########"]);
        let player = *state.player();
        let maze = state.maze().clone();

        let three: Vec<_> = state.ghosts()[..3].to_vec();
        assert_eq!(
            GameState::new(player, maze.clone(), three, GhostMode::Chase),
            Err(Error::MissingGhost(GhostName::Clyde))
        );

        let mut five = state.ghosts().to_vec();
        five.push(*state.ghost(GhostName::Inky));
        assert_eq!(
            GameState::new(player, maze, five, GhostMode::Chase),
            Err(Error::DuplicateGhost(GhostName::Inky))
        );
    }

    #[test]
    fn test_win_when_no_pellets_left() {
        let mut state = scenario(&["#########", "#P     R#", "#########"]);
        assert_eq!(state.maze().remaining_pellets(), 0);
        assert_eq!(state.outcome(), Outcome::Win);

        // a ghost on the player does not matter once the maze is cleared
        state.ghost_mut(GhostName::Blinky).tile = state.player().tile;
        assert_eq!(state.outcome(), Outcome::Win);
    }

    #[test]
    fn test_lose_only_to_non_frightened_ghost() {
        let mut state = scenario(&["#########", "#P.....R#", "#########"]);
        assert_eq!(state.outcome(), Outcome::Alive);

        let player_tile = state.player().tile;
        state.ghost_mut(GhostName::Blinky).tile = player_tile;
        assert_eq!(state.outcome(), Outcome::Lose);

        state.ghost_mut(GhostName::Blinky).mode = GhostMode::Frightened;
        assert_eq!(state.outcome(), Outcome::Alive);
    }

    #[test]
    fn test_blocked_directions_yield_no_child() {
        let state = scenario(&[
            "#########",
            "#P.....R#",
            "#-#######",
            "#########",
        ]);
        let mut rng = rng();
        assert!(state.advance(Direction::Up, &mut rng).is_none());
        assert!(state.advance(Direction::Left, &mut rng).is_none());
        assert!(state.advance(Direction::Down, &mut rng).is_none(), "gate is closed to the player");
        assert!(state.advance(Direction::Right, &mut rng).is_some());
    }

    #[test]
    fn test_out_of_bounds_yields_no_child() {
        let state = scenario(&["P......R#", "#########"]);
        let mut rng = rng();
        assert!(state.advance(Direction::Up, &mut rng).is_none());
        assert!(state.advance(Direction::Left, &mut rng).is_none());
    }

    #[test]
    fn test_advance_consumes_and_moves_ghosts_once() {
        let state = scenario(&["#########", "#P.....R#", "#########"]);
        let mut rng = rng();
        let next = state.advance(Direction::Right, &mut rng).unwrap();

        assert_eq!(next.player().tile, (2, 1));
        assert_eq!(next.player().facing, Some(Direction::Right));
        assert_eq!(next.maze().remaining_pellets(), state.maze().remaining_pellets() - 1);
        assert_eq!(next.maze().get_tile_state((2, 1)), TileState::Empty);
        assert_eq!(next.maze().last_consumed(), Some(TileState::Pellet));
        assert_eq!(next.ghost(GhostName::Blinky).tile, (6, 1));
        // sealed ghosts cannot move
        assert_eq!(next.ghost(GhostName::Pinky).tile, state.ghost(GhostName::Pinky).tile);
    }

    #[test]
    fn test_advance_leaves_parent_untouched() {
        let state = scenario(&["#########", "#P.....R#", "#########"]);
        let before = state.clone();
        let mut rng = rng();
        let _ = state.advance(Direction::Right, &mut rng);
        let _ = state.enumerate_children(&mut rng);
        assert_eq!(state, before);
    }

    #[test]
    fn test_stepping_onto_ghost_ends_ply() {
        let state = scenario(&["#########", "#   PR..#", "#########"]);
        let mut rng = rng();
        let next = state.advance(Direction::Right, &mut rng).unwrap();
        assert_eq!(next.outcome(), Outcome::Lose);
        assert_eq!(next.ghost(GhostName::Blinky).tile, (5, 1), "ghosts do not move after a fatal step");
    }

    #[test]
    fn test_eating_last_pellet_wins_before_ghosts_move() {
        let state = scenario(&["#########", "#P.R    #", "#########"]);
        let mut rng = rng();
        let next = state.advance(Direction::Right, &mut rng).unwrap();
        assert_eq!(next.outcome(), Outcome::Win);
        assert_eq!(next.ghost(GhostName::Blinky).tile, (3, 1));
    }

    #[test]
    fn test_ghost_catches_player() {
        let state = scenario(&["#########", "#P. R...#", "#########"]);
        let mut rng = rng();
        let next = state.advance(Direction::Right, &mut rng).unwrap();
        assert_eq!(next.ghost(GhostName::Blinky).tile, (3, 1));
        assert_eq!(next.outcome(), Outcome::Alive);
        let next = next.advance(Direction::Right, &mut rng).unwrap();
        assert_eq!(next.outcome(), Outcome::Lose);
    }

    #[test]
    fn test_step_player_leaves_ghosts_in_place() {
        let state = scenario(&["#########", "#P.....R#", "#########"]);
        let stepped = state.step_player(Direction::Right).unwrap();
        assert_eq!(stepped.player().tile, (2, 1));
        assert_eq!(stepped.maze().last_consumed(), Some(TileState::Pellet));
        assert_eq!(stepped.ghosts(), state.ghosts());
        assert!(state.step_player(Direction::Up).is_none());

        let mut split = stepped;
        split.move_ghosts(&mut rng());
        assert_eq!(Some(split), state.advance(Direction::Right, &mut rng()));
    }

    #[test]
    fn test_terminal_states_are_absorbing() {
        let mut state = scenario(&["#########", "#P.....R#", "#########"]);
        state.ghost_mut(GhostName::Blinky).tile = state.player().tile;
        let mut rng = rng();
        for dir in Direction::ALL {
            assert_eq!(state.advance(dir, &mut rng), Some(state.clone()));
        }
    }

    #[test]
    fn test_boxed_in_player_has_no_children() {
        let state = scenario(&[
            "#########",
            "##.#...R#",
            "#.P######",
            "##-######",
        ]);
        let mut rng = rng();
        let walled = scenario(&[
            "#########",
            "##P#...R#",
            "#########",
        ]);
        assert!(walled.enumerate_children(&mut rng).is_empty());
        let dirs: Vec<_> = state.enumerate_children(&mut rng).into_iter().map(|(d, _)| d).collect();
        assert_eq!(dirs, vec![Direction::Up, Direction::Left]);
    }

    #[test]
    fn test_set_ghost_mode_updates_resume_mode() {
        let mut state = scenario(&["#########", "#P.....R#", "#########"]);
        state.set_ghost_mode(GhostMode::Scatter);
        assert_eq!(state.resume_mode(), GhostMode::Scatter);
        assert!(state.ghosts().iter().all(|g| g.mode == GhostMode::Scatter));
        state.set_ghost_mode(GhostMode::Frightened);
        assert_eq!(state.resume_mode(), GhostMode::Scatter);
        assert!(state.ghosts().iter().all(|g| g.mode == GhostMode::Frightened));
    }

    #[test]
    fn test_display_draws_actors() {
        let state = scenario(&["#########", "#P.....R#", "#########"]);
        let drawn = format!("{}", state);
        let first_rows: Vec<&str> = drawn.lines().take(4).collect();
        assert_eq!(first_rows, vec!["#########", "#P.....R#", "#########", "#K#C#O###"]);
    }
}
