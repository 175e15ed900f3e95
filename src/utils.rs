use crate::actors::{GhostMode, GhostName, GhostSnapshot, PlayerSnapshot};
use crate::engine::{Maze, TilePos, TileState, MAZE_HEIGHT, MAZE_WIDTH};
use crate::error::{Error, Result};
use crate::state::GameState;

/// The classic arcade maze, 28 x 31 tiles, in the format read by [`maze_from_str_array`].
///
/// The two gate tiles sit at (13, 12) and (14, 12). The side tunnel on row 14
/// runs off the grid and does not wrap.
pub const CLASSIC_MAZE: [&str; MAZE_HEIGHT as usize] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "     #.##### ## #####.#     ",
    "     #.##          ##.#     ",
    "     #.## ###--### ##.#     ",
    "######.## #      # ##.######",
    "      .   #      #   .      ",
    "######.## #      # ##.######",
    "     #.## ######## ##.#     ",
    "     #.##          ##.#     ",
    "     #.## ######## ##.#     ",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......  .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];

/// Where the player starts in the classic maze.
pub const CLASSIC_PLAYER_START: TilePos = (13, 23);

/// Maps one maze character to its tile state. Inverse of [`TileState::to_char`].
fn tile_from_char(ch: char) -> Option<TileState> {
    match ch {
        '#' => Some(TileState::Wall),
        ' ' => Some(TileState::Empty),
        '.' => Some(TileState::Pellet),
        'o' => Some(TileState::PowerPellet),
        '-' => Some(TileState::Gate),
        'f' => Some(TileState::Fruit),
        '6' => Some(TileState::Reserved6),
        '7' => Some(TileState::Reserved7),
        _ => None,
    }
}

/// Parses an array of string slices into a `Maze`.
///
/// Each string slice is one row, starting from the top (y = 0). Every row must
/// have the same number of characters; that number becomes the maze width.
///
/// Valid characters for tiles are:
/// - '#': `TileState::Wall`
/// - ' ': `TileState::Empty`
/// - '.': `TileState::Pellet`
/// - 'o': `TileState::PowerPellet`
/// - '-': `TileState::Gate`
/// - 'f': `TileState::Fruit`
/// - '6', '7': the reserved markers
///
/// # Arguments
/// * `s`: A slice of string slices (`&[&str]`) representing the rows of the maze.
///
/// # Returns
/// * `Ok(Maze)` with its pellet counter set to the number of pellets and power pellets.
/// * `Err(Error)` if:
///     - `s` is empty or its rows are empty (`Error::EmptyMaze`).
///     - A row's length differs from the first row's (`Error::RaggedRow`).
///     - An unrecognized character is encountered (`Error::UnrecognizedCharacter`).
///
/// # Examples
/// ```
/// use ghost_chase_ai::engine::TileState;
/// use ghost_chase_ai::utils::maze_from_str_array;
///
/// let maze = maze_from_str_array(&[
///     "#####",
///     "#.o-#",
///     "#####",
/// ]).unwrap();
/// assert_eq!(maze.width(), 5);
/// assert_eq!(maze.height(), 3);
/// assert_eq!(maze.get_tile_state((1, 1)), TileState::Pellet);
/// assert_eq!(maze.get_tile_state((3, 1)), TileState::Gate);
/// assert_eq!(maze.remaining_pellets(), 2);
///
/// assert!(maze_from_str_array(&["#X#"]).is_err());
/// assert!(maze_from_str_array(&["###", "##"]).is_err());
/// ```
pub fn maze_from_str_array(s: &[&str]) -> Result<Maze> {
    parse_grid(s, |_, _, _| Ok(false))
}

/// Parses a maze with actors drawn on it into a complete `GameState`.
///
/// On top of the characters accepted by [`maze_from_str_array`]:
/// - 'P': the player
/// - 'R', 'K', 'C', 'O': Blinky, Pinky, Inky and Clyde
///
/// Actors stand on empty floor. The player has no facing yet; every ghost
/// starts in chase mode with no facing, and chase is the resume mode.
///
/// # Returns
/// * `Ok(GameState)` if the maze parses and contains exactly one player and
///   one marker per ghost.
/// * `Err(Error)` for any maze error, or `MissingPlayer`, `DuplicatePlayer`,
///   `MissingGhost`, `DuplicateGhost`.
///
/// # Examples
/// ```
/// use ghost_chase_ai::actors::GhostName;
/// use ghost_chase_ai::utils::scenario_from_str_array;
///
/// let state = scenario_from_str_array(&[
///     "#########",
///     "#P....R #",
///     "#K#C#O###",
///     "#########",
/// ]).unwrap();
/// assert_eq!(state.player().tile, (1, 1));
/// assert_eq!(state.ghost(GhostName::Blinky).tile, (6, 1));
/// assert_eq!(state.ghost(GhostName::Clyde).tile, (5, 2));
/// assert_eq!(state.maze().remaining_pellets(), 4);
/// ```
pub fn scenario_from_str_array(s: &[&str]) -> Result<GameState> {
    let mut player: Option<TilePos> = None;
    let mut ghosts: Vec<GhostSnapshot> = Vec::with_capacity(4);

    let maze = parse_grid(s, |ch, x, y| {
        if ch == 'P' {
            if player.replace((x, y)).is_some() {
                return Err(Error::DuplicatePlayer);
            }
            return Ok(true);
        }
        match GhostName::from_marker(ch) {
            Some(name) => {
                if ghosts.iter().any(|g| g.name == name) {
                    return Err(Error::DuplicateGhost(name));
                }
                ghosts.push(GhostSnapshot::new(name, (x, y), None, GhostMode::Chase));
                Ok(true)
            }
            None => Ok(false),
        }
    })?;

    let player = player.ok_or(Error::MissingPlayer)?;
    GameState::new(PlayerSnapshot::new(player, None), maze, ghosts, GhostMode::Chase)
}

/// Shared row walker. `actor` is offered every character first; when it
/// claims one the tile underneath is empty floor.
fn parse_grid<F>(s: &[&str], mut actor: F) -> Result<Maze>
where
    F: FnMut(char, i32, i32) -> Result<bool>,
{
    let width = s.first().map(|row| row.chars().count()).unwrap_or(0);
    if width == 0 {
        return Err(Error::EmptyMaze);
    }

    let mut tiles = Vec::with_capacity(width * s.len());
    for (r, row_str) in s.iter().enumerate() {
        let found = row_str.chars().count();
        if found != width {
            return Err(Error::RaggedRow {
                row: r,
                expected: width,
                found,
            });
        }

        for (c, ch) in row_str.chars().enumerate() {
            if actor(ch, c as i32, r as i32)? {
                tiles.push(TileState::Empty);
                continue;
            }
            let tile = tile_from_char(ch).ok_or(Error::UnrecognizedCharacter {
                character: ch,
                row: r,
                col: c,
            })?;
            tiles.push(tile);
        }
    }

    Maze::from_tiles(width as i32, s.len() as i32, tiles)
}

/// The opening position of a classic game.
///
/// Blinky waits outside the house in scatter mode, Pinky is on its way out,
/// Inky and Clyde wait inside until released.
pub fn classic_state() -> Result<GameState> {
    let maze = maze_from_str_array(&CLASSIC_MAZE)?;
    debug_assert_eq!((maze.width(), maze.height()), (MAZE_WIDTH, MAZE_HEIGHT));

    let ghosts = [
        GhostSnapshot::at_spawn(GhostName::Blinky, GhostMode::Scatter),
        GhostSnapshot::at_spawn(GhostName::Pinky, GhostMode::HouseLeaving),
        GhostSnapshot::at_spawn(GhostName::Inky, GhostMode::HouseInside),
        GhostSnapshot::at_spawn(GhostName::Clyde, GhostMode::HouseInside),
    ];
    GameState::new(
        PlayerSnapshot::new(CLASSIC_PLAYER_START, None),
        maze,
        ghosts,
        GhostMode::Scatter,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actors::{GHOST_HOUSE_ENTRANCE, GHOST_HOUSE_INTERIOR};

    #[test]
    fn test_maze_from_str_array_valid() {
        let maze = maze_from_str_array(&["#.o #", "#-f67"]).unwrap();
        assert_eq!(maze.get_tile_state((0, 0)), TileState::Wall);
        assert_eq!(maze.get_tile_state((2, 0)), TileState::PowerPellet);
        assert_eq!(maze.get_tile_state((3, 0)), TileState::Empty);
        assert_eq!(maze.get_tile_state((2, 1)), TileState::Fruit);
        assert_eq!(maze.get_tile_state((3, 1)), TileState::Reserved6);
        assert_eq!(maze.get_tile_state((4, 1)), TileState::Reserved7);
        assert_eq!(maze.remaining_pellets(), 2);
    }

    #[test]
    fn test_maze_from_str_array_invalid_char() {
        let result = maze_from_str_array(&["#.X#"]);
        assert_eq!(
            result.unwrap_err(),
            Error::UnrecognizedCharacter {
                character: 'X',
                row: 0,
                col: 2
            }
        );
    }

    #[test]
    fn test_maze_from_str_array_ragged_rows() {
        let result = maze_from_str_array(&["####", "#..#", "###"]);
        assert_eq!(
            result.unwrap_err(),
            Error::RaggedRow {
                row: 2,
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn test_maze_from_str_array_empty_input() {
        let rows: [&str; 0] = [];
        assert_eq!(maze_from_str_array(&rows).unwrap_err(), Error::EmptyMaze);
        assert_eq!(maze_from_str_array(&["", ""]).unwrap_err(), Error::EmptyMaze);
    }

    #[test]
    fn test_maze_display_round_trips() {
        let rows = ["#####", "#.o #", "#-f6#", "#####"];
        let maze = maze_from_str_array(&rows).unwrap();
        assert_eq!(maze.to_string(), rows.join("\n"));
    }

    #[test]
    fn test_scenario_actors_stand_on_floor() {
        let state = scenario_from_str_array(&[
            "#########",
            "#P....R #",
            "#K#C#O###",
            "#########",
        ])
        .unwrap();
        assert_eq!(state.maze().get_tile_state((1, 1)), TileState::Empty);
        assert_eq!(state.maze().get_tile_state((6, 1)), TileState::Empty);
        assert_eq!(state.player().facing, None);
        for ghost in state.ghosts() {
            assert_eq!(ghost.mode, GhostMode::Chase);
            assert_eq!(ghost.facing, None);
        }
        assert_eq!(state.resume_mode(), GhostMode::Chase);
    }

    #[test]
    fn test_scenario_marker_errors() {
        let no_player = scenario_from_str_array(&["#R#K#C#O#"]);
        assert_eq!(no_player.unwrap_err(), Error::MissingPlayer);

        let two_players = scenario_from_str_array(&["#PP#R#K#C#O#"]);
        assert_eq!(two_players.unwrap_err(), Error::DuplicatePlayer);

        let no_clyde = scenario_from_str_array(&["#P#R#K#C#"]);
        assert_eq!(no_clyde.unwrap_err(), Error::MissingGhost(GhostName::Clyde));

        let two_inkys = scenario_from_str_array(&["#P#R#K#C#C#O#"]);
        assert_eq!(two_inkys.unwrap_err(), Error::DuplicateGhost(GhostName::Inky));
    }

    #[test]
    fn test_classic_maze_shape() {
        assert!(CLASSIC_MAZE.iter().all(|row| row.len() == MAZE_WIDTH as usize));
        let state = classic_state().unwrap();
        let maze = state.maze();
        assert_eq!(maze.width(), MAZE_WIDTH);
        assert_eq!(maze.height(), MAZE_HEIGHT);
        assert_eq!(maze.get_tile_state((13, 12)), TileState::Gate);
        assert_eq!(maze.get_tile_state((14, 12)), TileState::Gate);
        assert_eq!(maze.get_tile_state(GHOST_HOUSE_ENTRANCE), TileState::Empty);
        assert_eq!(maze.get_tile_state(GHOST_HOUSE_INTERIOR), TileState::Empty);
        assert_eq!(maze.get_tile_state(CLASSIC_PLAYER_START), TileState::Empty);
        assert!(maze.remaining_pellets() > 200);
    }

    #[test]
    fn test_classic_state_ghosts() {
        let state = classic_state().unwrap();
        for name in GhostName::ALL {
            let ghost = state.ghost(name);
            assert_eq!(ghost.tile, name.spawn_tile());
            assert_eq!(state.maze().get_tile_state(ghost.tile), TileState::Empty);
        }
        assert_eq!(state.ghost(GhostName::Blinky).mode, GhostMode::Scatter);
        assert_eq!(state.ghost(GhostName::Inky).mode, GhostMode::HouseInside);
        assert_eq!(state.resume_mode(), GhostMode::Scatter);
    }
}
