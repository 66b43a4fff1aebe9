//! Maze grids, cell kinds, and the level template catalog.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell position on the maze grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    /// X coordinate (column).
    pub x: u16,
    /// Y coordinate (row).
    pub y: u16,
}

impl GridPos {
    /// Create a new grid position.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Kind of a maze cell.
///
/// Discriminants match the numeric encoding used by the template
/// authoring format (path 0, wall 1, gate 2, start 3, end 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CellKind {
    /// Open corridor cell.
    Path = 0,
    /// Impassable wall cell.
    Wall = 1,
    /// Gate cell; passable only once its challenge is solved.
    Gate = 2,
    /// The player's spawn cell.
    Start = 3,
    /// The level exit cell.
    End = 4,
}

impl CellKind {
    /// Check whether this cell kind can ever be occupied.
    ///
    /// Gates count as walkable here; whether a specific gate actually
    /// admits the player depends on its unlock state.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        !matches!(self, CellKind::Wall)
    }

    /// The glyph used in template rows and ASCII renders.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            CellKind::Path => '.',
            CellKind::Wall => '#',
            CellKind::Gate => 'G',
            CellKind::Start => 'S',
            CellKind::End => 'E',
        }
    }

    /// Parse a template glyph.
    #[must_use]
    pub const fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' => Some(CellKind::Path),
            '#' => Some(CellKind::Wall),
            'G' => Some(CellKind::Gate),
            'S' => Some(CellKind::Start),
            'E' => Some(CellKind::End),
            _ => None,
        }
    }
}

/// Error raised while parsing a maze template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The template has no rows or no columns.
    Empty,
    /// A row's length differs from the first row's.
    Ragged {
        /// Zero-based index of the offending row.
        row: usize,
    },
    /// A character that is not a known cell glyph.
    UnknownGlyph {
        /// The offending character.
        glyph: char,
        /// Column of the character.
        x: usize,
        /// Row of the character.
        y: usize,
    },
    /// No start cell in the template.
    MissingStart,
    /// No end cell in the template.
    MissingEnd,
    /// More than one start cell.
    DuplicateStart,
    /// More than one end cell.
    DuplicateEnd,
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::Empty => write!(f, "template has no cells"),
            LayoutError::Ragged { row } => {
                write!(f, "row {row} has a different length than row 0")
            }
            LayoutError::UnknownGlyph { glyph, x, y } => {
                write!(f, "unknown cell glyph {glyph:?} at ({x}, {y})")
            }
            LayoutError::MissingStart => write!(f, "template has no start cell"),
            LayoutError::MissingEnd => write!(f, "template has no end cell"),
            LayoutError::DuplicateStart => write!(f, "template has more than one start cell"),
            LayoutError::DuplicateEnd => write!(f, "template has more than one end cell"),
        }
    }
}

impl std::error::Error for LayoutError {}

/// An immutable maze grid for one level.
///
/// Cells are stored in row-major order. A layout is parsed once from
/// template rows and never mutated; per-level mutable state (gate
/// unlocks, player position) lives outside the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeLayout {
    width: u16,
    height: u16,
    cells: Vec<CellKind>,
    start: GridPos,
    end: GridPos,
}

impl MazeLayout {
    /// Parse a template from glyph rows.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] if the rows are empty or ragged,
    /// contain an unknown glyph, or do not contain exactly one start
    /// and one end cell.
    pub fn parse(rows: &[&str]) -> Result<Self, LayoutError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.chars().count());
        if width == 0 || height == 0 {
            return Err(LayoutError::Empty);
        }

        let mut cells = Vec::with_capacity(width * height);
        let mut start = None;
        let mut end = None;

        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(LayoutError::Ragged { row: y });
            }
            for (x, glyph) in row.chars().enumerate() {
                let kind = CellKind::from_glyph(glyph)
                    .ok_or(LayoutError::UnknownGlyph { glyph, x, y })?;
                let pos = GridPos::new(x as u16, y as u16);
                match kind {
                    CellKind::Start => {
                        if start.replace(pos).is_some() {
                            return Err(LayoutError::DuplicateStart);
                        }
                    }
                    CellKind::End => {
                        if end.replace(pos).is_some() {
                            return Err(LayoutError::DuplicateEnd);
                        }
                    }
                    _ => {}
                }
                cells.push(kind);
            }
        }

        Ok(Self {
            width: width as u16,
            height: height as u16,
            cells,
            start: start.ok_or(LayoutError::MissingStart)?,
            end: end.ok_or(LayoutError::MissingEnd)?,
        })
    }

    /// Grid width in cells.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The player spawn position.
    #[must_use]
    pub const fn start(&self) -> GridPos {
        self.start
    }

    /// The level exit position.
    #[must_use]
    pub const fn end(&self) -> GridPos {
        self.end
    }

    /// Check if a position is within grid bounds.
    #[must_use]
    pub const fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    fn pos_to_index(&self, pos: GridPos) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(usize::from(pos.y) * usize::from(self.width) + usize::from(pos.x))
        } else {
            None
        }
    }

    /// The cell kind at a position, or `None` out of bounds.
    #[must_use]
    pub fn get(&self, pos: GridPos) -> Option<CellKind> {
        self.pos_to_index(pos).map(|idx| self.cells[idx])
    }

    /// Iterate over all positions and cell kinds in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (GridPos, CellKind)> + '_ {
        self.cells.iter().enumerate().map(|(idx, kind)| {
            let x = (idx % usize::from(self.width)) as u16;
            let y = (idx / usize::from(self.width)) as u16;
            (GridPos::new(x, y), *kind)
        })
    }

    /// Positions of all gate cells in row-major order.
    #[must_use]
    pub fn gate_positions(&self) -> Vec<GridPos> {
        self.iter()
            .filter(|(_, kind)| *kind == CellKind::Gate)
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Number of gate cells in the grid.
    #[must_use]
    pub fn gate_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|kind| **kind == CellKind::Gate)
            .count()
    }
}

/// Template rows for the built-in levels.
///
/// Three hand-drawn mazes; the catalog cycles through them as the
/// level counter grows.
const BUILTIN_TEMPLATES: [&[&str]; 3] = [
    &[
        "###########",
        "#S...#....#",
        "####.#.##.#",
        "#....G..#.#",
        "#.#####.#.#",
        "#.......#G#",
        "###.#####.#",
        "#.........#",
        "#.###G###.#",
        "#........E#",
        "###########",
    ],
    &[
        "###########",
        "#S.#......#",
        "#..#.####.#",
        "#.##....#.#",
        "#..G.##.G.#",
        "####.#..#.#",
        "#....#.##.#",
        "#.####....#",
        "#...G####.#",
        "###......E#",
        "###########",
    ],
    &[
        "###########",
        "#S..G...#.#",
        "###.###.#.#",
        "#.....#...#",
        "#.###.G.#.#",
        "#.#...###.#",
        "#.#.#.....#",
        "#...####G.#",
        "###.....#.#",
        "#...###..E#",
        "###########",
    ],
];

/// The fixed set of level templates, selected cyclically by level.
#[derive(Debug, Clone)]
pub struct LayoutCatalog {
    prototypes: Vec<MazeLayout>,
}

impl LayoutCatalog {
    /// Build a catalog from template rows.
    ///
    /// # Errors
    ///
    /// Returns the first [`LayoutError`] encountered while parsing.
    pub fn from_rows(templates: &[&[&str]]) -> Result<Self, LayoutError> {
        let prototypes = templates
            .iter()
            .map(|rows| MazeLayout::parse(rows))
            .collect::<Result<Vec<_>, _>>()?;
        if prototypes.is_empty() {
            return Err(LayoutError::Empty);
        }
        Ok(Self { prototypes })
    }

    /// Build the catalog of built-in templates.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] if a built-in template is malformed,
    /// which the test suite rules out.
    pub fn builtin() -> Result<Self, LayoutError> {
        Self::from_rows(&BUILTIN_TEMPLATES)
    }

    /// Number of templates in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    /// Check whether the catalog has no templates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }

    /// The zero-based template index used for a level.
    #[must_use]
    pub fn template_index(&self, level: u32) -> usize {
        (level.max(1) as usize - 1) % self.prototypes.len()
    }

    /// Select the layout for a level.
    ///
    /// Selection is cyclic over the catalog. Each call returns an
    /// independent copy so callers never alias the prototype grid.
    #[must_use]
    pub fn layout_for_level(&self, level: u32) -> MazeLayout {
        self.prototypes[self.template_index(level)].clone()
    }
}
