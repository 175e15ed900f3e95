//! Lightweight copies of the player and the ghosts.
//!
//! Snapshots are plain values. The search clones them freely and never
//! touches the live game's actors.
use std::fmt;

use crate::engine::{facing_between, Direction, TilePos};

/// Tile just above the ghost-house gate. Eaten ghosts head here first.
pub const GHOST_HOUSE_ENTRANCE: TilePos = (13, 11);
/// Tile inside the ghost house that eaten ghosts must reach before leaving.
pub const GHOST_HOUSE_INTERIOR: TilePos = (13, 14);

/// The four fixed ghost identities, in the order they are advanced each ply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GhostName {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

impl GhostName {
    pub const ALL: [GhostName; 4] = [
        GhostName::Blinky,
        GhostName::Pinky,
        GhostName::Inky,
        GhostName::Clyde,
    ];

    /// Position of this ghost in [`GhostName::ALL`].
    pub fn index(self) -> usize {
        match self {
            GhostName::Blinky => 0,
            GhostName::Pinky => 1,
            GhostName::Inky => 2,
            GhostName::Clyde => 3,
        }
    }

    /// The corner this ghost retreats to in scatter mode. Two corners lie above the maze.
    pub fn home_corner(self) -> TilePos {
        match self {
            GhostName::Blinky => (25, -4),
            GhostName::Pinky => (2, -4),
            GhostName::Inky => (27, 31),
            GhostName::Clyde => (0, 31),
        }
    }

    /// Starting tile in the classic maze.
    pub fn spawn_tile(self) -> TilePos {
        match self {
            GhostName::Blinky => GHOST_HOUSE_ENTRANCE,
            GhostName::Pinky => GHOST_HOUSE_INTERIOR,
            GhostName::Inky => (11, 14),
            GhostName::Clyde => (15, 14),
        }
    }

    /// Marker used in scenario text and board renders: the ghost's colour initial.
    pub fn marker(self) -> char {
        match self {
            GhostName::Blinky => 'R',
            GhostName::Pinky => 'K',
            GhostName::Inky => 'C',
            GhostName::Clyde => 'O',
        }
    }

    pub fn from_marker(ch: char) -> Option<GhostName> {
        GhostName::ALL.into_iter().find(|g| g.marker() == ch)
    }
}

impl fmt::Display for GhostName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GhostName::Blinky => "Blinky",
            GhostName::Pinky => "Pinky",
            GhostName::Inky => "Inky",
            GhostName::Clyde => "Clyde",
        };
        f.write_str(name)
    }
}

/// A ghost's behaviour mode. Mirrors the live game's mode enumeration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GhostMode {
    Scatter,
    Chase,
    Frightened,
    /// Just eaten; becomes `Eaten` on the next update.
    EatenInvisible,
    /// Eyes returning to the house entrance.
    Eaten,
    HouseJoining,
    HouseInside,
    HouseLeaving,
}

impl GhostMode {
    /// Frightened ghosts move randomly and cannot kill the player.
    pub fn is_frightened(self) -> bool {
        self == GhostMode::Frightened
    }

    /// Whether touching the player in this mode ends the game.
    ///
    /// Frightened ghosts and eaten ghosts on their way through the house are harmless.
    pub fn is_lethal(self) -> bool {
        !matches!(
            self,
            GhostMode::Frightened
                | GhostMode::EatenInvisible
                | GhostMode::Eaten
                | GhostMode::HouseJoining
                | GhostMode::HouseLeaving
        )
    }

    /// Only ghosts moving into or out of the house may cross the gate.
    pub fn may_cross_gate(self) -> bool {
        matches!(self, GhostMode::HouseJoining | GhostMode::HouseLeaving)
    }

    /// Modes that ignore the game's scatter/chase/frightened switches.
    pub fn ignores_mode_switch(self) -> bool {
        matches!(
            self,
            GhostMode::EatenInvisible
                | GhostMode::Eaten
                | GhostMode::HouseJoining
                | GhostMode::HouseInside
                | GhostMode::HouseLeaving
        )
    }
}

/// Player position and facing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlayerSnapshot {
    pub tile: TilePos,
    pub facing: Option<Direction>,
}

impl PlayerSnapshot {
    pub fn new(tile: TilePos, facing: Option<Direction>) -> Self {
        PlayerSnapshot { tile, facing }
    }

    /// Moves the player and recomputes its facing from the tile delta.
    pub fn move_to(&mut self, tile: TilePos) {
        if let Some(facing) = facing_between(self.tile, tile) {
            self.facing = Some(facing);
        }
        self.tile = tile;
    }
}

/// A copy of one ghost's public state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GhostSnapshot {
    pub name: GhostName,
    pub tile: TilePos,
    /// `None` until the ghost has moved at least once (e.g. at spawn).
    pub facing: Option<Direction>,
    pub mode: GhostMode,
}

impl GhostSnapshot {
    pub fn new(name: GhostName, tile: TilePos, facing: Option<Direction>, mode: GhostMode) -> Self {
        GhostSnapshot {
            name,
            tile,
            facing,
            mode,
        }
    }

    /// A ghost standing on its classic spawn tile.
    pub fn at_spawn(name: GhostName, mode: GhostMode) -> Self {
        GhostSnapshot::new(name, name.spawn_tile(), None, mode)
    }

    /// Moves the ghost, keeping its facing when it stays in place.
    pub fn move_to(&mut self, tile: TilePos) {
        if let Some(facing) = facing_between(self.tile, tile) {
            self.facing = Some(facing);
        }
        self.tile = tile;
    }

    /// Applies a game-wide mode switch.
    ///
    /// Eaten ghosts and ghosts in a house-transit mode keep their mode.
    /// Otherwise a change of mode turns the ghost around.
    ///
    /// # Examples
    /// ```
    /// use ghost_chase_ai::actors::{GhostMode, GhostName, GhostSnapshot};
    /// use ghost_chase_ai::engine::Direction;
    ///
    /// let mut ghost = GhostSnapshot::new(GhostName::Pinky, (3, 3), Some(Direction::Left), GhostMode::Chase);
    /// ghost.set_mode(GhostMode::Frightened);
    /// assert_eq!(ghost.mode, GhostMode::Frightened);
    /// assert_eq!(ghost.facing, Some(Direction::Right));
    /// ```
    pub fn set_mode(&mut self, mode: GhostMode) {
        if self.mode.ignores_mode_switch() || self.mode == mode {
            return;
        }
        self.mode = mode;
        self.facing = self.facing.map(Direction::opposite);
    }

    /// Lets a ghost waiting inside the house start leaving it.
    ///
    /// Returns `false` if the ghost was not waiting inside.
    pub fn release_from_house(&mut self) -> bool {
        if self.mode != GhostMode::HouseInside {
            return false;
        }
        self.mode = GhostMode::HouseLeaving;
        true
    }
}
