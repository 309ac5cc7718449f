//! Go board representation.
//!
//! The board is a 1D array with a one-point padding border on every side, so
//! neighbor lookups never need bounds checks: a neighbor of a playable point
//! is either playable or [`Stone::Offboard`].
//!
//! Point indices use the layout `y * stride + x` with `stride = size + 2` and
//! `x, y` in `1..=size`. Row `y = 1` is the bottom row (`A1` is the bottom-left
//! corner). Hosts that render the board top-down can use the `(i, j)` scheme
//! instead, where `i = size - y` and `j = x - 1`: row 0 is the topmost row and
//! column 0 the leftmost column.
//!
//! Mutation goes through [`crate::moves`]; this module only owns the data and
//! the read-only queries (groups, liberties, eyes, rendering).

use std::fmt::{self, Write as _};

use crate::constants::{COLUMN_LETTERS, DEFAULT_KOMI, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use crate::error::{Error, Result};

/// A point on the board, represented as an index into the padded 1D array.
pub type Point = usize;

/// Player color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// Returns the opponent's color.
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Lowercase name, as used in messages.
    pub fn name(self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::White => "white",
        }
    }

    /// Index for per-color arrays.
    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Color::Black => 0,
            Color::White => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Contents of a grid cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Stone {
    #[default]
    Empty,
    Black,
    White,
    /// Padding around the playable area.
    Offboard,
}

impl Stone {
    /// The color of the stone, if the cell holds one.
    #[inline]
    pub fn color(self) -> Option<Color> {
        match self {
            Stone::Black => Some(Color::Black),
            Stone::White => Some(Color::White),
            Stone::Empty | Stone::Offboard => None,
        }
    }

    fn glyph(self) -> char {
        match self {
            Stone::Black => 'X',
            Stone::White => 'O',
            Stone::Empty => '.',
            Stone::Offboard => ' ',
        }
    }
}

impl From<Color> for Stone {
    fn from(color: Color) -> Self {
        match color {
            Color::Black => Stone::Black,
            Color::White => Stone::White,
        }
    }
}

/// Target of a move: a board point or one of the two sentinels.
///
/// The sentinels never index the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Coord {
    Pass,
    Resign,
    Point(Point),
}

impl Coord {
    /// True for the pass sentinel.
    #[inline]
    pub fn is_pass(self) -> bool {
        self == Coord::Pass
    }

    /// True for the resign sentinel.
    #[inline]
    pub fn is_resign(self) -> bool {
        self == Coord::Resign
    }

    /// The board point, unless this is a sentinel.
    #[inline]
    pub fn point(self) -> Option<Point> {
        match self {
            Coord::Point(pt) => Some(pt),
            Coord::Pass | Coord::Resign => None,
        }
    }
}

/// An immutable (coordinate, color) pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub coord: Coord,
    pub color: Color,
}

impl Move {
    /// `color` plays at `coord`.
    pub fn new(coord: Coord, color: Color) -> Self {
        Self { coord, color }
    }

    /// `color` passes.
    pub fn pass(color: Color) -> Self {
        Self::new(Coord::Pass, color)
    }

    /// `color` resigns.
    pub fn resign(color: Color) -> Self {
        Self::new(Coord::Resign, color)
    }
}

/// A Go position: the grid plus the bits of history the rules need.
///
/// Cloning is a deep copy; the clone is fully independent of the original.
/// Equality compares only the size and the grid contents, not the history.
#[derive(Clone, Debug)]
pub struct Board {
    size: usize,
    stride: usize,
    pub(crate) grid: Vec<Stone>,
    /// Number of moves played, passes and resignations included
    pub(crate) moves: usize,
    pub(crate) last_move: Option<Move>,
    pub(crate) last_move2: Option<Move>,
    /// Forbidden ko retake: point and the color that may not play there
    pub(crate) ko: Option<Move>,
    pub(crate) captures: [u32; 2],
    komi: f32,
}

impl Board {
    /// Create an empty board of `size` x `size` playable points.
    ///
    /// # Errors
    /// [`Error::Config`] if `size` is outside `MIN_BOARD_SIZE..=MAX_BOARD_SIZE`.
    pub fn new(size: usize) -> Result<Self> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(Error::Config(format!(
                "unsupported board size {size} (supported: {MIN_BOARD_SIZE}-{MAX_BOARD_SIZE})"
            )));
        }
        let stride = size + 2;
        let mut board = Board {
            size,
            stride,
            grid: vec![Stone::Offboard; stride * stride],
            moves: 0,
            last_move: None,
            last_move2: None,
            ko: None,
            captures: [0; 2],
            komi: DEFAULT_KOMI,
        };
        board.clear();
        Ok(board)
    }

    /// Reset to the empty position, keeping size and komi.
    pub fn clear(&mut self) {
        for y in 0..self.stride {
            for x in 0..self.stride {
                let on_board = (1..=self.size).contains(&x) && (1..=self.size).contains(&y);
                self.grid[y * self.stride + x] = if on_board {
                    Stone::Empty
                } else {
                    Stone::Offboard
                };
            }
        }
        self.moves = 0;
        self.last_move = None;
        self.last_move2 = None;
        self.ko = None;
        self.captures = [0; 2];
    }

    /// Playable width and height.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Points added to White's score.
    pub fn komi(&self) -> f32 {
        self.komi
    }

    /// Replaces the komi; stones are untouched.
    pub fn set_komi(&mut self, komi: f32) {
        self.komi = komi;
    }

    /// Number of moves played so far.
    pub fn moves(&self) -> usize {
        self.moves
    }

    /// Most recent move, if any.
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// The move before [`Board::last_move`].
    pub fn last_move2(&self) -> Option<Move> {
        self.last_move2
    }

    /// The point `color` may not play at because it would retake a ko.
    pub fn ko(&self) -> Option<Move> {
        self.ko
    }

    /// Stones captured by `color` so far.
    pub fn captures(&self, color: Color) -> u32 {
        self.captures[color.index()]
    }

    /// Color to move: the opponent of the last mover, Black on a fresh board.
    pub fn to_play(&self) -> Color {
        self.last_move.map_or(Color::Black, |m| m.color.other())
    }

    /// Length of the padded grid; every [`Point`] is below this.
    #[inline]
    pub(crate) fn grid_len(&self) -> usize {
        self.grid.len()
    }

    /// Contents of `pt`. Indices outside the grid read as [`Stone::Offboard`].
    #[inline]
    pub fn at(&self, pt: Point) -> Stone {
        self.grid.get(pt).copied().unwrap_or(Stone::Offboard)
    }

    /// Contents at row `i` (0 = top), column `j` (0 = left).
    pub fn at_ij(&self, i: usize, j: usize) -> Stone {
        self.point_ij(i, j).map_or(Stone::Offboard, |pt| self.at(pt))
    }

    /// Point at column `x`, row `y` (both 1-based, `y = 1` at the bottom).
    pub fn point_xy(&self, x: usize, y: usize) -> Option<Point> {
        if (1..=self.size).contains(&x) && (1..=self.size).contains(&y) {
            Some(y * self.stride + x)
        } else {
            None
        }
    }

    /// Point at row `i` (0 = top), column `j` (0 = left).
    pub fn point_ij(&self, i: usize, j: usize) -> Option<Point> {
        if i < self.size && j < self.size {
            self.point_xy(j + 1, self.size - i)
        } else {
            None
        }
    }

    /// `(x, y)` of a playable point.
    #[inline]
    pub fn xy(&self, pt: Point) -> (usize, usize) {
        (pt % self.stride, pt / self.stride)
    }

    /// `(i, j)` of a playable point. Inverse of [`Board::point_ij`].
    pub fn ij(&self, pt: Point) -> (usize, usize) {
        let (x, y) = self.xy(pt);
        (self.size - y, x - 1)
    }

    /// All playable points in ascending index order (row by row from the bottom).
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.grid.len()).filter(move |&pt| self.grid[pt] != Stone::Offboard)
    }

    /// Number of empty playable points.
    pub fn empty_count(&self) -> usize {
        self.grid.iter().filter(|&&s| s == Stone::Empty).count()
    }

    /// `(i, j)` of every stone of `color`, in scan order.
    pub fn stones(&self, color: Color) -> Vec<(usize, usize)> {
        let stone = Stone::from(color);
        self.points()
            .filter(|&pt| self.grid[pt] == stone)
            .map(|pt| self.ij(pt))
            .collect()
    }

    /// The 4 orthogonal neighbors (N, E, S, W) of a playable point.
    #[inline]
    pub fn neighbors(&self, pt: Point) -> [Point; 4] {
        [pt + self.stride, pt + 1, pt - self.stride, pt - 1]
    }

    /// The 4 diagonal neighbors (NE, SE, SW, NW) of a playable point.
    #[inline]
    pub fn diagonal_neighbors(&self, pt: Point) -> [Point; 4] {
        [
            pt + self.stride + 1,
            pt - self.stride + 1,
            pt - self.stride - 1,
            pt + self.stride - 1,
        ]
    }

    /// Distance (0-indexed) from the nearest board edge.
    pub fn line_height(&self, pt: Point) -> usize {
        let (x, y) = self.xy(pt);
        (x - 1).min(y - 1).min(self.size - x).min(self.size - y)
    }

    /// Collect all stones in the group containing `start`.
    ///
    /// Uses flood-fill to find all connected stones of the same color and
    /// appends them to `out`. Returns the number of stones found.
    pub(crate) fn collect_group(&self, start: Point, out: &mut Vec<Point>) -> usize {
        let color = self.grid[start];
        let mut stack = vec![start];
        let mut visited = vec![false; self.grid.len()];
        let mut count = 0;

        while let Some(pt) = stack.pop() {
            if visited[pt] {
                continue;
            }
            visited[pt] = true;
            out.push(pt);
            count += 1;
            for n in self.neighbors(pt) {
                if !visited[n] && self.grid[n] == color {
                    stack.push(n);
                }
            }
        }
        count
    }

    /// Count the distinct liberties (empty adjacent points) of the group at `start`.
    pub fn group_liberties(&self, start: Point) -> usize {
        let color = self.grid[start];
        if color.color().is_none() {
            return 0;
        }
        let mut stack = vec![start];
        let mut visited = vec![false; self.grid.len()];
        let mut libs = 0;

        while let Some(pt) = stack.pop() {
            if visited[pt] {
                continue;
            }
            visited[pt] = true;
            for n in self.neighbors(pt) {
                match self.grid[n] {
                    Stone::Empty if !visited[n] => {
                        visited[n] = true;
                        libs += 1;
                    }
                    c if c == color && !visited[n] => stack.push(n),
                    _ => {}
                }
            }
        }
        libs
    }

    /// Check if a point is "eyeish" (every on-board neighbor holds a stone of one color).
    ///
    /// Returns the surrounding color. This may also hold for false eyes.
    pub fn is_eyeish(&self, pt: Point) -> Option<Color> {
        let mut eyecolor = None;
        for n in self.neighbors(pt) {
            match self.grid[n] {
                Stone::Offboard => continue,
                Stone::Empty => return None,
                stone => match eyecolor {
                    None => eyecolor = stone.color(),
                    Some(c) if Some(c) != stone.color() => return None,
                    Some(_) => {}
                },
            }
        }
        eyecolor
    }

    /// Check if a point is a true eye.
    ///
    /// A true eye is eyeish and has at most one opponent stone on its
    /// diagonals in the center, none at the edge.
    pub fn is_eye(&self, pt: Point) -> Option<Color> {
        let eyecolor = self.is_eyeish(pt)?;
        let falsecolor = Stone::from(eyecolor.other());
        let mut at_edge = false;
        let mut false_count = 0;

        for d in self.diagonal_neighbors(pt) {
            match self.grid[d] {
                Stone::Offboard => at_edge = true,
                s if s == falsecolor => false_count += 1,
                _ => {}
            }
        }

        let tolerance = if at_edge { 0 } else { 1 };
        if false_count > tolerance {
            return None;
        }
        Some(eyecolor)
    }

    /// Parse a coordinate string (`D4`, `pass`, `resign`).
    ///
    /// Columns use letters A-Z skipping I; rows count from 1 at the bottom.
    pub fn parse_coord(&self, s: &str) -> Result<Coord> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("pass") {
            return Ok(Coord::Pass);
        }
        if s.eq_ignore_ascii_case("resign") {
            return Ok(Coord::Resign);
        }

        let invalid = || Error::InvalidCoordinate(s.to_string());
        let mut chars = s.chars();
        let col_char = chars.next().ok_or_else(invalid)?.to_ascii_uppercase();
        let x = COLUMN_LETTERS
            .iter()
            .position(|&c| c as char == col_char)
            .ok_or_else(invalid)?
            + 1;
        let y: usize = chars.as_str().parse().map_err(|_| invalid())?;

        self.point_xy(x, y).map(Coord::Point).ok_or_else(invalid)
    }

    /// Convert a coordinate to a string (e.g. `D4`, `pass`).
    pub fn coord_to_string(&self, coord: Coord) -> String {
        match coord {
            Coord::Pass => "pass".into(),
            Coord::Resign => "resign".into(),
            Coord::Point(pt) => {
                let (x, y) = self.xy(pt);
                format!("{}{y}", COLUMN_LETTERS[x - 1] as char)
            }
        }
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.grid == other.grid
    }
}

impl Eq for Board {}

impl fmt::Display for Board {
    /// Grid with column letters and row numbers, trimmed at both ends.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letters: String = COLUMN_LETTERS[..self.size]
            .iter()
            .map(|&c| format!("{} ", c as char))
            .collect();

        let mut out = String::new();
        writeln!(
            out,
            "Move: {}  Komi: {:.1}  Captures B: {} W: {}",
            self.moves,
            self.komi,
            self.captures(Color::Black),
            self.captures(Color::White)
        )?;
        writeln!(out, "    {}", letters.trim_end())?;
        for y in (1..=self.size).rev() {
            write!(out, "{y:>3} ")?;
            for x in 1..=self.size {
                out.push(self.grid[y * self.stride + x].glyph());
                out.push(' ');
            }
            writeln!(out, "{y}")?;
        }
        write!(out, "    {}", letters.trim_end())?;

        f.write_str(out.trim())
    }
}
