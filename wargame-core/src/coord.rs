//! Square board geometry with row/column coordinates

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Row labels (row 0 = 'A')
const ROW_LABELS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Column labels (col 0 = '0')
const COL_LABELS: &str = "0123456789abcdef";

/// Error decoding coordinate or move text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseCoordError {
    #[error("expected {expected} characters, got {got}")]
    WrongLength { expected: usize, got: usize },

    #[error("invalid row label '{0}'")]
    BadRow(char),

    #[error("invalid column label '{0}'")]
    BadCol(char),
}

/// Board cell coordinate
///
/// Signed so that neighbours of edge cells can be represented
/// (and then rejected by `Game::is_valid_coord`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: i8,
    pub col: i8,
}

impl Coord {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Row label, '?' when outside A-Z
    pub fn row_char(&self) -> char {
        usize::try_from(self.row)
            .ok()
            .and_then(|r| ROW_LABELS.chars().nth(r))
            .unwrap_or('?')
    }

    /// Column label, '?' when outside 0-f
    pub fn col_char(&self) -> char {
        usize::try_from(self.col)
            .ok()
            .and_then(|c| COL_LABELS.chars().nth(c))
            .unwrap_or('?')
    }

    /// Manhattan distance between two cells
    pub fn manhattan(&self, other: Coord) -> i32 {
        (self.row as i32 - other.row as i32).abs() + (self.col as i32 - other.col as i32).abs()
    }

    /// Orthogonal neighbours: up, left, down, right
    pub fn iter_adjacent(&self) -> impl Iterator<Item = Coord> {
        let Coord { row, col } = *self;
        [
            Coord::new(row - 1, col),
            Coord::new(row, col - 1),
            Coord::new(row + 1, col),
            Coord::new(row, col + 1),
        ]
        .into_iter()
    }

    /// All cells of the square of radius `dist` centred here (row-major, centre included)
    pub fn iter_range(&self, dist: i8) -> impl Iterator<Item = Coord> {
        let Coord { row, col } = *self;
        (row - dist..=row + dist)
            .flat_map(move |r| (col - dist..=col + dist).map(move |c| Coord::new(r, c)))
    }

    /// Decode a coordinate, returning `None` on malformed text
    pub fn parse(s: &str) -> Option<Coord> {
        s.parse().ok()
    }

    fn from_chars(row: char, col: char) -> Result<Coord, ParseCoordError> {
        let row_idx = ROW_LABELS
            .find(row.to_ascii_uppercase())
            .ok_or(ParseCoordError::BadRow(row))?;
        let col_idx = COL_LABELS
            .find(col.to_ascii_lowercase())
            .ok_or(ParseCoordError::BadCol(col))?;
        Ok(Coord::new(row_idx as i8, col_idx as i8))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row_char(), self.col_char())
    }
}

impl FromStr for Coord {
    type Err = ParseCoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars = strip_separators(s);
        match chars.as_slice() {
            [row, col] => Coord::from_chars(*row, *col),
            _ => Err(ParseCoordError::WrongLength {
                expected: 2,
                got: chars.len(),
            }),
        }
    }
}

/// A move (source, destination) or a rectangular area
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoordPair {
    pub src: Coord,
    pub dst: Coord,
}

impl CoordPair {
    pub const fn new(src: Coord, dst: Coord) -> Self {
        Self { src, dst }
    }

    pub const fn from_quad(row0: i8, col0: i8, row1: i8, col1: i8) -> Self {
        Self::new(Coord::new(row0, col0), Coord::new(row1, col1))
    }

    /// Rectangle covering a whole `dim x dim` board
    pub const fn from_dim(dim: i8) -> Self {
        Self::from_quad(0, 0, dim - 1, dim - 1)
    }

    /// Every cell of the rectangle `src..=dst`, row-major
    pub fn iter_rectangle(&self) -> impl Iterator<Item = Coord> {
        let CoordPair { src, dst } = *self;
        (src.row..=dst.row).flat_map(move |r| (src.col..=dst.col).map(move |c| Coord::new(r, c)))
    }

    /// Decode a move, returning `None` on malformed text
    pub fn parse(s: &str) -> Option<CoordPair> {
        s.parse().ok()
    }
}

impl fmt::Display for CoordPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.src, self.dst)
    }
}

impl FromStr for CoordPair {
    type Err = ParseCoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars = strip_separators(s);
        match chars.as_slice() {
            [r0, c0, r1, c1] => Ok(CoordPair::new(
                Coord::from_chars(*r0, *c0)?,
                Coord::from_chars(*r1, *c1)?,
            )),
            _ => Err(ParseCoordError::WrongLength {
                expected: 4,
                got: chars.len(),
            }),
        }
    }
}

fn strip_separators(s: &str) -> Vec<char> {
    s.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_display() {
        assert_eq!(Coord::new(0, 0).to_string(), "A0");
        assert_eq!(Coord::new(3, 2).to_string(), "D2");
        assert_eq!(Coord::new(25, 15).to_string(), "Zf");
        assert_eq!(Coord::new(-1, 16).to_string(), "??");
    }

    #[test]
    fn test_parse_move() {
        let mv = CoordPair::parse("A3D2").unwrap();
        assert_eq!(mv, CoordPair::from_quad(0, 3, 3, 2));

        // Separators and case are ignored
        assert_eq!(CoordPair::parse(" a3, d2 "), Some(mv));
        assert_eq!(CoordPair::parse("A3-D2"), Some(mv));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(CoordPair::parse("A3D"), None);
        assert_eq!(CoordPair::parse("A3D2E"), None);
        assert_eq!(
            "A3DZ".parse::<CoordPair>(),
            Err(ParseCoordError::BadCol('Z'))
        );
        assert_eq!("13D2".parse::<CoordPair>(), Err(ParseCoordError::BadRow('1')));
        assert_eq!(Coord::parse("B"), None);
    }

    #[test]
    fn test_adjacent_order() {
        let adj: Vec<_> = Coord::new(2, 2).iter_adjacent().collect();
        assert_eq!(
            adj,
            vec![
                Coord::new(1, 2),
                Coord::new(2, 1),
                Coord::new(3, 2),
                Coord::new(2, 3),
            ]
        );
    }

    #[test]
    fn test_range_and_rectangle() {
        let range: Vec<_> = Coord::new(1, 1).iter_range(1).collect();
        assert_eq!(range.len(), 9);
        assert_eq!(range[0], Coord::new(0, 0));
        assert_eq!(range[4], Coord::new(1, 1));

        let rect: Vec<_> = CoordPair::from_dim(5).iter_rectangle().collect();
        assert_eq!(rect.len(), 25);
        assert_eq!(rect[5], Coord::new(1, 0));
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(Coord::new(0, 0).manhattan(Coord::new(2, 3)), 5);
        assert_eq!(Coord::new(4, 4).manhattan(Coord::new(4, 3)), 1);
    }
}
