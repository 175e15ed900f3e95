//! Grid world model for the maze.
//!
//! This module defines the fundamental pieces every other module reads:
//! - `TileState`: the closed set of tile classifications (codes -1 through 7).
//! - `Direction`: the four movement directions with their unit offsets.
//! - `TilePos` helpers: offsets, squared Euclidean and Manhattan distances.
//! - `Maze`: a mutable copy of the tile array with pellet bookkeeping.
use std::fmt;

use crate::error::{Error, Result};

/// A tile coordinate `(x, y)`. `x` grows to the right, `y` grows downward.
///
/// Coordinates are signed because targets may lie outside the maze
/// (the top home corners sit above row 0).
pub type TilePos = (i32, i32);

/// Width of the classic maze, in tiles.
pub const MAZE_WIDTH: i32 = 28;
/// Height of the classic maze, in tiles.
pub const MAZE_HEIGHT: i32 = 31;

/// Classification of a single tile.
///
/// Each variant corresponds to one of the numeric tile codes used by the live
/// game, see [`TileState::code`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileState {
    /// Any coordinate outside the grid (code -1).
    OutOfBounds,
    /// Solid wall (code 0).
    Wall,
    /// Walkable floor with nothing left on it (code 1).
    Empty,
    /// Food pellet (code 2).
    Pellet,
    /// Power pellet (code 3).
    PowerPellet,
    /// Ghost-house gate (code 4). Only ghosts entering or leaving the house pass.
    Gate,
    /// Bonus fruit (code 5).
    Fruit,
    /// Reserved marker (code 6), never walkable.
    Reserved6,
    /// Reserved marker (code 7), never walkable.
    Reserved7,
}

impl TileState {
    /// Converts a numeric tile code into a `TileState`.
    ///
    /// Returns `None` for codes outside -1..=7.
    ///
    /// # Examples
    /// ```
    /// use ghost_chase_ai::engine::TileState;
    /// assert_eq!(TileState::from_code(2), Some(TileState::Pellet));
    /// assert_eq!(TileState::from_code(-1), Some(TileState::OutOfBounds));
    /// assert_eq!(TileState::from_code(9), None);
    /// ```
    pub fn from_code(code: i8) -> Option<Self> {
        match code {
            -1 => Some(TileState::OutOfBounds),
            0 => Some(TileState::Wall),
            1 => Some(TileState::Empty),
            2 => Some(TileState::Pellet),
            3 => Some(TileState::PowerPellet),
            4 => Some(TileState::Gate),
            5 => Some(TileState::Fruit),
            6 => Some(TileState::Reserved6),
            7 => Some(TileState::Reserved7),
            _ => None,
        }
    }

    /// The numeric code of this tile state.
    pub fn code(self) -> i8 {
        match self {
            TileState::OutOfBounds => -1,
            TileState::Wall => 0,
            TileState::Empty => 1,
            TileState::Pellet => 2,
            TileState::PowerPellet => 3,
            TileState::Gate => 4,
            TileState::Fruit => 5,
            TileState::Reserved6 => 6,
            TileState::Reserved7 => 7,
        }
    }

    /// Character used when rendering the maze as text.
    pub fn to_char(self) -> char {
        match self {
            TileState::OutOfBounds => '?',
            TileState::Wall => '#',
            TileState::Empty => ' ',
            TileState::Pellet => '.',
            TileState::PowerPellet => 'o',
            TileState::Gate => '-',
            TileState::Fruit => 'f',
            TileState::Reserved6 => '6',
            TileState::Reserved7 => '7',
        }
    }

    /// Tiles nobody may ever enter: out of bounds, walls and the reserved markers.
    pub fn is_solid(self) -> bool {
        matches!(
            self,
            TileState::OutOfBounds | TileState::Wall | TileState::Reserved6 | TileState::Reserved7
        )
    }

    /// Tiles the player may not step onto. The player never enters the ghost house.
    pub fn blocks_player(self) -> bool {
        matches!(
            self,
            TileState::OutOfBounds | TileState::Wall | TileState::Gate
        )
    }

    /// Tiles that change to `Empty` when the player steps on them.
    pub fn is_consumable(self) -> bool {
        matches!(
            self,
            TileState::Pellet | TileState::PowerPellet | TileState::Fruit
        )
    }

    /// Tiles counted by the remaining-pellet counter. Fruit is not.
    pub fn is_pellet(self) -> bool {
        matches!(self, TileState::Pellet | TileState::PowerPellet)
    }
}

/// One of the four movement directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Order in which the search enumerates moves and breaks score ties.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Order in which ghosts break distance ties (the arcade tie-break).
    pub const PURSUIT_PRIORITY: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Right,
    ];

    /// Unit offset `(dx, dy)` for this direction. Up is negative `y`.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

/// The tile one step from `tile` in direction `dir`.
pub fn offset(tile: TilePos, dir: Direction) -> TilePos {
    let (dx, dy) = dir.delta();
    (tile.0 + dx, tile.1 + dy)
}

/// `tile` shifted `steps` tiles in direction `dir`.
pub fn offset_by(tile: TilePos, dir: Direction, steps: i32) -> TilePos {
    let (dx, dy) = dir.delta();
    (tile.0 + dx * steps, tile.1 + dy * steps)
}

pub fn distance_squared(a: TilePos, b: TilePos) -> i32 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    dx * dx + dy * dy
}

pub fn manhattan(a: TilePos, b: TilePos) -> i32 {
    (a.0 - b.0).abs() + (a.1 - b.1).abs()
}

/// Facing implied by moving from `src` to `dest`.
///
/// Horizontal movement wins when both components differ. Returns `None` when
/// the two tiles are the same.
///
/// # Examples
/// ```
/// use ghost_chase_ai::engine::{facing_between, Direction};
/// assert_eq!(facing_between((3, 3), (2, 3)), Some(Direction::Left));
/// assert_eq!(facing_between((3, 3), (3, 4)), Some(Direction::Down));
/// assert_eq!(facing_between((3, 3), (3, 3)), None);
/// ```
pub fn facing_between(src: TilePos, dest: TilePos) -> Option<Direction> {
    let dx = dest.0 - src.0;
    let dy = dest.1 - src.1;
    if dx != 0 {
        Some(if dx < 0 { Direction::Left } else { Direction::Right })
    } else if dy != 0 {
        Some(if dy > 0 { Direction::Down } else { Direction::Up })
    } else {
        None
    }
}

/// A mutable copy of the maze used for simulation.
///
/// The maze owns its tile array and the remaining-pellet counter. Cloning a
/// `Maze` is a full deep copy; snapshots never share tiles.
///
/// It also remembers the state of the most recently consumed tile. That value
/// describes only the latest [`Maze::consume_tile`] call.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Maze {
    width: i32,
    height: i32,
    tiles: Vec<TileState>,
    remaining_pellets: u32,
    last_consumed: Option<TileState>,
}

impl Maze {
    /// Creates a maze from a row-major tile array.
    ///
    /// The remaining-pellet counter starts at the number of `Pellet` and
    /// `PowerPellet` tiles. `OutOfBounds` entries are stored as walls.
    ///
    /// # Errors
    /// `Error::EmptyMaze` if either dimension is zero, `Error::RaggedRow` if
    /// `tiles.len()` does not match `width * height`.
    pub fn from_tiles(width: i32, height: i32, tiles: Vec<TileState>) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(Error::EmptyMaze);
        }
        let expected = (width * height) as usize;
        if tiles.len() != expected {
            return Err(Error::RaggedRow {
                row: tiles.len() / width as usize,
                expected,
                found: tiles.len(),
            });
        }
        let tiles: Vec<TileState> = tiles
            .into_iter()
            .map(|t| if t == TileState::OutOfBounds { TileState::Wall } else { t })
            .collect();
        let remaining_pellets = tiles.iter().filter(|t| t.is_pellet()).count() as u32;
        Ok(Maze {
            width,
            height,
            tiles,
            remaining_pellets,
            last_consumed: None,
        })
    }

    /// Overrides the remaining-pellet counter, e.g. with the live game's own count.
    pub fn with_remaining_pellets(mut self, remaining_pellets: u32) -> Self {
        self.remaining_pellets = remaining_pellets;
        self
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn remaining_pellets(&self) -> u32 {
        self.remaining_pellets
    }

    /// State of the tile consumed by the latest `consume_tile` call, if any.
    pub fn last_consumed(&self) -> Option<TileState> {
        self.last_consumed
    }

    pub fn in_bounds(&self, tile: TilePos) -> bool {
        (0..self.width).contains(&tile.0) && (0..self.height).contains(&tile.1)
    }

    fn index(&self, tile: TilePos) -> usize {
        (tile.1 * self.width + tile.0) as usize
    }

    /// Returns the state of `tile`, or `TileState::OutOfBounds` outside the grid.
    pub fn get_tile_state(&self, tile: TilePos) -> TileState {
        if !self.in_bounds(tile) {
            return TileState::OutOfBounds;
        }
        self.tiles[self.index(tile)]
    }

    /// Consumes whatever is on `tile`.
    ///
    /// Pellets, power pellets and fruit become `Empty`; pellets and power
    /// pellets also decrement the remaining-pellet counter. Any other tile is
    /// left untouched. Returns the state the tile had before the call, which is
    /// also remembered as [`Maze::last_consumed`].
    ///
    /// # Examples
    /// ```
    /// use ghost_chase_ai::engine::{Maze, TileState};
    /// let mut maze = Maze::from_tiles(2, 1, vec![TileState::Pellet, TileState::Empty]).unwrap();
    /// assert_eq!(maze.remaining_pellets(), 1);
    /// assert_eq!(maze.consume_tile((0, 0)), TileState::Pellet);
    /// assert_eq!(maze.remaining_pellets(), 0);
    /// assert_eq!(maze.consume_tile((0, 0)), TileState::Empty);
    /// assert_eq!(maze.remaining_pellets(), 0);
    /// ```
    pub fn consume_tile(&mut self, tile: TilePos) -> TileState {
        let state = self.get_tile_state(tile);
        if state.is_consumable() {
            let idx = self.index(tile);
            self.tiles[idx] = TileState::Empty;
            if state.is_pellet() {
                self.remaining_pellets = self.remaining_pellets.saturating_sub(1);
            }
        }
        self.last_consumed = Some(state);
        state
    }

    /// Renders the maze with characters drawn over selected tiles.
    ///
    /// Later entries in `overlay` win when two share a tile. Overlay entries
    /// outside the grid are ignored.
    pub fn to_string_with_overlay(&self, overlay: &[(TilePos, char)]) -> String {
        let mut rows: Vec<Vec<char>> = (0..self.height)
            .map(|y| {
                (0..self.width)
                    .map(|x| self.get_tile_state((x, y)).to_char())
                    .collect()
            })
            .collect();

        for &(tile, ch) in overlay {
            if self.in_bounds(tile) {
                rows[tile.1 as usize][tile.0 as usize] = ch;
            }
        }

        rows.into_iter()
            .map(|row| row.into_iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_with_overlay(&[]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::maze_from_str_array;

    #[test]
    fn test_tile_codes_are_stable() {
        for code in -1..=7i8 {
            let state = TileState::from_code(code).unwrap();
            assert_eq!(state.code(), code);
        }
        assert_eq!(TileState::from_code(8), None);
        assert_eq!(TileState::from_code(-2), None);
    }

    #[test]
    fn test_traversal_classes() {
        assert!(TileState::Wall.is_solid());
        assert!(TileState::Reserved6.is_solid());
        assert!(TileState::Reserved7.is_solid());
        assert!(!TileState::Gate.is_solid());
        assert!(TileState::Gate.blocks_player());
        assert!(!TileState::Fruit.blocks_player());
        assert!(TileState::Fruit.is_consumable());
        assert!(!TileState::Fruit.is_pellet());
    }

    #[test]
    fn test_direction_opposites() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            let (dx, dy) = dir.delta();
            let (ox, oy) = dir.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn test_offsets_and_distances() {
        assert_eq!(offset((5, 5), Direction::Up), (5, 4));
        assert_eq!(offset_by((5, 5), Direction::Left, 4), (1, 5));
        assert_eq!(distance_squared((0, 0), (3, 4)), 25);
        assert_eq!(manhattan((0, 0), (3, -4)), 7);
    }

    #[test]
    fn test_out_of_bounds_is_sentinel() {
        let maze = maze_from_str_array(&["..", ".."]).unwrap();
        assert_eq!(maze.get_tile_state((-1, 0)), TileState::OutOfBounds);
        assert_eq!(maze.get_tile_state((0, -1)), TileState::OutOfBounds);
        assert_eq!(maze.get_tile_state((2, 0)), TileState::OutOfBounds);
        assert_eq!(maze.get_tile_state((0, 2)), TileState::OutOfBounds);
        assert_eq!(maze.get_tile_state((1, 1)), TileState::Pellet);
    }

    #[test]
    fn test_consume_power_pellet_once() {
        let mut maze = maze_from_str_array(&["o.", "  "]).unwrap();
        assert_eq!(maze.remaining_pellets(), 2);

        maze.consume_tile((0, 0));
        assert_eq!(maze.remaining_pellets(), 1);
        assert_eq!(maze.get_tile_state((0, 0)), TileState::Empty);
        assert_eq!(maze.last_consumed(), Some(TileState::PowerPellet));

        maze.consume_tile((0, 0));
        assert_eq!(maze.remaining_pellets(), 1);
        assert_eq!(maze.last_consumed(), Some(TileState::Empty));
    }

    #[test]
    fn test_consume_fruit_keeps_pellet_count() {
        let mut maze = maze_from_str_array(&["f."]).unwrap();
        assert_eq!(maze.remaining_pellets(), 1);
        assert_eq!(maze.consume_tile((0, 0)), TileState::Fruit);
        assert_eq!(maze.remaining_pellets(), 1);
        assert_eq!(maze.get_tile_state((0, 0)), TileState::Empty);
    }

    #[test]
    fn test_consume_wall_is_noop() {
        let mut maze = maze_from_str_array(&["#.", "-."]).unwrap();
        let before = maze.clone();
        maze.consume_tile((0, 0));
        maze.consume_tile((0, 1));
        maze.consume_tile((9, 9));
        assert_eq!(maze.remaining_pellets(), before.remaining_pellets());
        assert_eq!(maze.get_tile_state((0, 0)), TileState::Wall);
        assert_eq!(maze.get_tile_state((0, 1)), TileState::Gate);
        assert_eq!(maze.last_consumed(), Some(TileState::OutOfBounds));
    }

    #[test]
    fn test_from_tiles_rejects_bad_lengths() {
        assert_eq!(Maze::from_tiles(0, 3, vec![]), Err(Error::EmptyMaze));
        assert!(Maze::from_tiles(2, 2, vec![TileState::Empty; 3]).is_err());
    }

    #[test]
    fn test_display_with_overlay() {
        let maze = maze_from_str_array(&["#..#", "#o #"]).unwrap();
        assert_eq!(format!("{}", maze), "#..#\n#o #");
        let drawn = maze.to_string_with_overlay(&[((1, 0), 'P'), ((2, 1), 'R'), ((7, 7), 'X')]);
        assert_eq!(drawn, "#P.#\n#oR#");
    }
}
