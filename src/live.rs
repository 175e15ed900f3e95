//! Read-only view of a running game, and the snapshot built from it.
//!
//! The search never holds on to the live game. `GameState::from_live` copies
//! everything it needs once per decision; after that the live game may
//! change freely without affecting the snapshot, and vice versa.
use crate::actors::{GhostMode, GhostName, GhostSnapshot, PlayerSnapshot};
use crate::engine::{Direction, Maze, TilePos, TileState};
use crate::error::{Error, Result};
use crate::state::GameState;

/// A ghost as the live game exposes it.
pub trait LiveGhost {
    fn name(&self) -> GhostName;
    fn tile(&self) -> TilePos;
    /// Direction of the ghost's last move, if it has moved.
    fn facing(&self) -> Option<Direction>;
    fn mode(&self) -> GhostMode;
}

/// The live maze, read through numeric tile codes.
pub trait LiveMaze {
    fn width(&self) -> i32;
    fn height(&self) -> i32;
    /// Numeric code of the tile at `tile`; -1 outside the grid.
    fn tile_code(&self, tile: TilePos) -> i8;
    fn remaining_pellets(&self) -> u32;
}

/// Everything the search reads from the running game.
pub trait LiveGame {
    type Ghost: LiveGhost;
    type Maze: LiveMaze;

    fn player_tile(&self) -> TilePos;
    fn player_facing(&self) -> Option<Direction>;
    fn ghosts(&self) -> &[Self::Ghost];
    fn maze(&self) -> &Self::Maze;
    /// The game-wide scatter or chase mode ghosts fall back to.
    fn ghost_mode(&self) -> GhostMode;
}

/// Copies a live maze tile by tile.
///
/// The pellet counter is taken from the live maze rather than recounted.
///
/// # Errors
/// `Error::InvalidTileCode` for a code outside -1..=7, or any error of
/// [`Maze::from_tiles`].
pub fn maze_from_live<M: LiveMaze + ?Sized>(live: &M) -> Result<Maze> {
    let (width, height) = (live.width(), live.height());
    let mut tiles = Vec::with_capacity((width.max(0) * height.max(0)) as usize);
    for y in 0..height {
        for x in 0..width {
            let code = live.tile_code((x, y));
            let state = TileState::from_code(code).ok_or(Error::InvalidTileCode { code, x, y })?;
            tiles.push(state);
        }
    }
    Ok(Maze::from_tiles(width, height, tiles)?.with_remaining_pellets(live.remaining_pellets()))
}

impl GameState {
    /// Takes a snapshot of a running game.
    ///
    /// # Errors
    /// Fails if the maze holds an unknown tile code or the live game does not
    /// expose exactly one ghost per identity.
    pub fn from_live<G: LiveGame + ?Sized>(live: &G) -> Result<GameState> {
        let maze = maze_from_live(live.maze())?;
        let ghosts = live
            .ghosts()
            .iter()
            .map(|g| GhostSnapshot::new(g.name(), g.tile(), g.facing(), g.mode()));
        GameState::new(
            PlayerSnapshot::new(live.player_tile(), live.player_facing()),
            maze,
            ghosts,
            live.ghost_mode(),
        )
    }
}

impl LiveGhost for GhostSnapshot {
    fn name(&self) -> GhostName {
        self.name
    }

    fn tile(&self) -> TilePos {
        self.tile
    }

    fn facing(&self) -> Option<Direction> {
        self.facing
    }

    fn mode(&self) -> GhostMode {
        self.mode
    }
}

impl LiveMaze for Maze {
    fn width(&self) -> i32 {
        Maze::width(self)
    }

    fn height(&self) -> i32 {
        Maze::height(self)
    }

    fn tile_code(&self, tile: TilePos) -> i8 {
        self.get_tile_state(tile).code()
    }

    fn remaining_pellets(&self) -> u32 {
        Maze::remaining_pellets(self)
    }
}

/// A snapshot can stand in for the live game, which is how the bundled
/// self-play binaries drive the search.
impl LiveGame for GameState {
    type Ghost = GhostSnapshot;
    type Maze = Maze;

    fn player_tile(&self) -> TilePos {
        self.player().tile
    }

    fn player_facing(&self) -> Option<Direction> {
        self.player().facing
    }

    fn ghosts(&self) -> &[GhostSnapshot] {
        GameState::ghosts(self)
    }

    fn maze(&self) -> &Maze {
        GameState::maze(self)
    }

    fn ghost_mode(&self) -> GhostMode {
        self.resume_mode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::scenario_from_str_array;

    struct Actor {
        name: GhostName,
        tile: TilePos,
        mode: GhostMode,
    }

    impl LiveGhost for Actor {
        fn name(&self) -> GhostName {
            self.name
        }
        fn tile(&self) -> TilePos {
            self.tile
        }
        fn facing(&self) -> Option<Direction> {
            Some(Direction::Left)
        }
        fn mode(&self) -> GhostMode {
            self.mode
        }
    }

    struct Grid {
        codes: Vec<Vec<i8>>,
        pellets: u32,
    }

    impl LiveMaze for Grid {
        fn width(&self) -> i32 {
            self.codes[0].len() as i32
        }
        fn height(&self) -> i32 {
            self.codes.len() as i32
        }
        fn tile_code(&self, (x, y): TilePos) -> i8 {
            self.codes
                .get(y as usize)
                .and_then(|row| row.get(x as usize))
                .copied()
                .unwrap_or(-1)
        }
        fn remaining_pellets(&self) -> u32 {
            self.pellets
        }
    }

    struct Arcade {
        grid: Grid,
        actors: Vec<Actor>,
    }

    impl LiveGame for Arcade {
        type Ghost = Actor;
        type Maze = Grid;

        fn player_tile(&self) -> TilePos {
            (1, 1)
        }
        fn player_facing(&self) -> Option<Direction> {
            Some(Direction::Right)
        }
        fn ghosts(&self) -> &[Actor] {
            &self.actors
        }
        fn maze(&self) -> &Grid {
            &self.grid
        }
        fn ghost_mode(&self) -> GhostMode {
            GhostMode::Scatter
        }
    }

    fn arcade(codes: Vec<Vec<i8>>) -> Arcade {
        let actors = GhostName::ALL
            .into_iter()
            .enumerate()
            .map(|(i, name)| Actor {
                name,
                tile: (i as i32 + 1, 2),
                mode: GhostMode::Chase,
            })
            .collect();
        Arcade {
            grid: Grid { codes, pellets: 57 },
            actors,
        }
    }

    #[test]
    fn test_from_live_copies_everything() {
        let live = arcade(vec![
            vec![0, 0, 0, 0, 0, 0],
            vec![0, 1, 2, 3, 5, 0],
            vec![0, 1, 1, 1, 1, 0],
            vec![0, 0, 4, 4, 0, 0],
        ]);
        let state = GameState::from_live(&live).unwrap();

        assert_eq!(state.player().tile, (1, 1));
        assert_eq!(state.player().facing, Some(Direction::Right));
        assert_eq!(state.resume_mode(), GhostMode::Scatter);
        assert_eq!(state.maze().get_tile_state((3, 1)), TileState::PowerPellet);
        assert_eq!(state.maze().get_tile_state((4, 1)), TileState::Fruit);
        assert_eq!(state.maze().get_tile_state((2, 3)), TileState::Gate);
        // the live counter wins over a recount of the copied tiles
        assert_eq!(state.maze().remaining_pellets(), 57);

        let inky = state.ghost(GhostName::Inky);
        assert_eq!(inky.tile, (3, 2));
        assert_eq!(inky.facing, Some(Direction::Left));
        assert_eq!(inky.mode, GhostMode::Chase);
    }

    #[test]
    fn test_from_live_rejects_unknown_codes() {
        let live = arcade(vec![vec![0, 0, 0], vec![0, 9, 0], vec![0, 1, 0]]);
        assert_eq!(
            GameState::from_live(&live).unwrap_err(),
            Error::InvalidTileCode { code: 9, x: 1, y: 1 }
        );
    }

    #[test]
    fn test_from_live_requires_every_ghost() {
        let mut live = arcade(vec![vec![1, 1, 1], vec![1, 1, 1], vec![1, 1, 1]]);
        live.actors.retain(|a| a.name != GhostName::Pinky);
        assert_eq!(
            GameState::from_live(&live).unwrap_err(),
            Error::MissingGhost(GhostName::Pinky)
        );
    }

    #[test]
    fn test_snapshot_is_independent_of_source() {
        let source = scenario_from_str_array(&[
            "#########",
            "#P.. ..R#",
            "#K#C#O###",
            "#########",
        ])
        .unwrap();
        let mut copy = GameState::from_live(&source).unwrap();
        assert_eq!(copy, source);

        copy.ghost_mut(GhostName::Blinky).tile = (5, 1);
        copy.set_ghost_mode(GhostMode::Frightened);
        assert_eq!(source.ghost(GhostName::Blinky).mode, GhostMode::Chase);
        assert_eq!(source.ghost(GhostName::Blinky).tile, (7, 1));
    }
}
