use crate::connect4::player::PlayerNum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_HEIGHT: usize = 6;
pub const DEFAULT_WIDTH: usize = 7;

#[derive(Error, Debug, PartialEq)]
pub enum BoardError {
    #[error("Board dimensions must be nonzero, got {height} rows x {width} columns")]
    ZeroDimension { height: usize, width: usize },
    #[error("Cannot place at row {row}, column {column}: cell is occupied or out of range")]
    InvalidMove { row: usize, column: usize },
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq)]
pub enum BoardSpace {
    Empty,
    Piece { player_num: PlayerNum },
    OutOfBounds,
}

impl BoardSpace {
    pub fn is_piece(&self, num: PlayerNum) -> bool {
        matches!(self, BoardSpace::Piece { player_num } if *player_num == num)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, BoardSpace::Empty)
    }
}

// Row 0 is the top of the grid; pieces fall toward row height - 1.
// This cannot be an array because dimensions are chosen at game start.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Board(Vec<Vec<BoardSpace>>);

impl Board {
    pub fn new(height: usize, width: usize) -> Result<Self, BoardError> {
        if height == 0 || width == 0 {
            return Err(BoardError::ZeroDimension { height, width });
        }
        Ok(Board(vec![vec![BoardSpace::Empty; width]; height]))
    }

    pub fn height(&self) -> usize {
        self.0.len()
    }

    pub fn width(&self) -> usize {
        self.0[0].len()
    }

    // Need to take signed integers because win runs may reach out-of-bounds
    pub fn get_space(&self, x: i32, y: i32) -> BoardSpace {
        self.try_get_space(x, y).unwrap_or(BoardSpace::OutOfBounds)
    }

    fn try_get_space(&self, x: i32, y: i32) -> Option<BoardSpace> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;

        let row = self.0.get(y)?;
        let space = row.get(x)?;
        Some(*space)
    }

    /// Given a column, find the row its next piece would land in.
    /// Returns None when the column is full, which is a normal outcome
    /// rather than an error.
    pub fn lowest_open_row(&self, column: usize) -> Option<usize> {
        (0..self.height())
            .rev()
            .find(|&row| matches!(self.0[row].get(column), Some(BoardSpace::Empty)))
    }

    /// Occupy a single cell. Cells are write-once: placing onto an occupied
    /// or out-of-range cell is an InvalidMove.
    pub fn place(
        &mut self,
        row: usize,
        column: usize,
        player_num: PlayerNum,
    ) -> Result<(), BoardError> {
        match self.0.get_mut(row).and_then(|r| r.get_mut(column)) {
            Some(space @ BoardSpace::Empty) => {
                *space = BoardSpace::Piece { player_num };
                Ok(())
            }
            _ => Err(BoardError::InvalidMove { row, column }),
        }
    }

    /// Check every cell for a four-in-a-row starting there: horizontal,
    /// vertical, diagonal down-right, diagonal down-left. Runs that reach
    /// past the edge read OutOfBounds and never match.
    pub fn check_for_win(&self, num: PlayerNum) -> bool {
        let height = self.height() as i32;
        let width = self.width() as i32;
        for y in 0..height {
            for x in 0..width {
                let horiz = [(x, y), (x + 1, y), (x + 2, y), (x + 3, y)];
                let vert = [(x, y), (x, y + 1), (x, y + 2), (x, y + 3)];
                let diag_dr = [(x, y), (x + 1, y + 1), (x + 2, y + 2), (x + 3, y + 3)];
                let diag_dl = [(x, y), (x - 1, y + 1), (x - 2, y + 2), (x - 3, y + 3)];
                if self.run_matches(&horiz, num)
                    || self.run_matches(&vert, num)
                    || self.run_matches(&diag_dr, num)
                    || self.run_matches(&diag_dl, num)
                {
                    return true;
                }
            }
        }
        false
    }

    fn run_matches(&self, run: &[(i32, i32); 4], num: PlayerNum) -> bool {
        run.iter().all(|&(x, y)| self.get_space(x, y).is_piece(num))
    }

    pub fn is_full(&self) -> bool {
        self.0.iter().all(|row| row.iter().all(|s| !s.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drop_piece(board: &mut Board, column: usize, num: PlayerNum) -> usize {
        let row = board.lowest_open_row(column).unwrap();
        board.place(row, column, num).unwrap();
        row
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(DEFAULT_HEIGHT, DEFAULT_WIDTH).unwrap();
        for y in 0..DEFAULT_HEIGHT {
            for x in 0..DEFAULT_WIDTH {
                assert_eq!(board.get_space(x as i32, y as i32), BoardSpace::Empty);
            }
        }
        assert!(!board.is_full());
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert_eq!(
            Board::new(0, 7),
            Err(BoardError::ZeroDimension {
                height: 0,
                width: 7
            })
        );
        assert_eq!(
            Board::new(6, 0),
            Err(BoardError::ZeroDimension {
                height: 6,
                width: 0
            })
        );
    }

    #[test]
    fn test_get_space_out_of_bounds() {
        let board = Board::new(6, 7).unwrap();
        assert_eq!(board.get_space(-1, 0), BoardSpace::OutOfBounds);
        assert_eq!(board.get_space(0, -1), BoardSpace::OutOfBounds);
        assert_eq!(board.get_space(7, 0), BoardSpace::OutOfBounds);
        assert_eq!(board.get_space(0, 6), BoardSpace::OutOfBounds);
    }

    #[test]
    fn test_lowest_open_row_starts_at_bottom() {
        let board = Board::new(6, 7).unwrap();
        assert_eq!(board.lowest_open_row(3), Some(5));
    }

    #[test]
    fn test_lowest_open_row_stacks_upward() {
        let mut board = Board::new(6, 7).unwrap();
        assert_eq!(drop_piece(&mut board, 3, PlayerNum::P1), 5);
        assert_eq!(drop_piece(&mut board, 3, PlayerNum::P2), 4);
        assert_eq!(board.lowest_open_row(3), Some(3));
    }

    #[test]
    fn test_full_column_has_no_open_row() {
        let mut board = Board::new(6, 7).unwrap();
        for _ in 0..6 {
            drop_piece(&mut board, 0, PlayerNum::P1);
        }
        assert_eq!(board.lowest_open_row(0), None);
    }

    #[test]
    fn test_out_of_range_column_has_no_open_row() {
        let board = Board::new(6, 7).unwrap();
        assert_eq!(board.lowest_open_row(7), None);
    }

    #[test]
    fn test_cells_are_write_once() {
        let mut board = Board::new(6, 7).unwrap();
        board.place(5, 0, PlayerNum::P1).unwrap();
        assert_eq!(
            board.place(5, 0, PlayerNum::P2),
            Err(BoardError::InvalidMove { row: 5, column: 0 })
        );
        assert!(board.get_space(0, 5).is_piece(PlayerNum::P1));
    }

    #[test]
    fn test_place_out_of_range_fails() {
        let mut board = Board::new(6, 7).unwrap();
        assert_eq!(
            board.place(6, 0, PlayerNum::P1),
            Err(BoardError::InvalidMove { row: 6, column: 0 })
        );
        assert_eq!(
            board.place(0, 7, PlayerNum::P1),
            Err(BoardError::InvalidMove { row: 0, column: 7 })
        );
    }

    #[test]
    fn test_horizontal_win() {
        let mut board = Board::new(6, 7).unwrap();
        for column in 0..4 {
            drop_piece(&mut board, column, PlayerNum::P1);
        }
        assert!(board.check_for_win(PlayerNum::P1));
        assert!(!board.check_for_win(PlayerNum::P2));
    }

    #[test]
    fn test_vertical_win() {
        let mut board = Board::new(6, 7).unwrap();
        for _ in 0..4 {
            drop_piece(&mut board, 2, PlayerNum::P2);
        }
        assert!(board.check_for_win(PlayerNum::P2));
        assert!(!board.check_for_win(PlayerNum::P1));
    }

    #[test]
    fn test_diagonal_down_left_win() {
        let mut board = Board::new(6, 7).unwrap();
        // P1 on the (5,0) (4,1) (3,2) (2,3) diagonal, P2 as filler below
        for (column, fillers) in [(0, 0), (1, 1), (2, 2), (3, 3)] {
            for _ in 0..fillers {
                drop_piece(&mut board, column, PlayerNum::P2);
            }
            drop_piece(&mut board, column, PlayerNum::P1);
        }
        assert!(board.check_for_win(PlayerNum::P1));
        assert!(!board.check_for_win(PlayerNum::P2));
    }

    #[test]
    fn test_diagonal_down_right_win() {
        let mut board = Board::new(6, 7).unwrap();
        for (column, fillers) in [(6, 0), (5, 1), (4, 2), (3, 3)] {
            for _ in 0..fillers {
                drop_piece(&mut board, column, PlayerNum::P2);
            }
            drop_piece(&mut board, column, PlayerNum::P1);
        }
        assert!(board.check_for_win(PlayerNum::P1));
        assert!(!board.check_for_win(PlayerNum::P2));
    }

    #[test]
    fn test_three_in_a_row_is_not_a_win() {
        let mut board = Board::new(6, 7).unwrap();
        for column in 0..3 {
            drop_piece(&mut board, column, PlayerNum::P1);
        }
        assert!(!board.check_for_win(PlayerNum::P1));
    }

    // Column bounds must come from the width, not the height: on a board
    // wider than it is tall, a run near the right edge still counts.
    #[test]
    fn test_win_beyond_height_columns_on_wide_board() {
        let mut board = Board::new(2, 8).unwrap();
        for column in 4..8 {
            drop_piece(&mut board, column, PlayerNum::P1);
        }
        assert!(board.check_for_win(PlayerNum::P1));
    }

    #[test]
    fn test_is_full() {
        let mut board = Board::new(2, 2).unwrap();
        drop_piece(&mut board, 0, PlayerNum::P1);
        drop_piece(&mut board, 0, PlayerNum::P2);
        drop_piece(&mut board, 1, PlayerNum::P2);
        assert!(!board.is_full());
        drop_piece(&mut board, 1, PlayerNum::P1);
        assert!(board.is_full());
    }

    #[test]
    fn test_full_board_without_win() {
        let mut board = Board::new(6, 7).unwrap();
        // Two-wide stripes shifted every row never line up four of a kind
        for row in 0..6 {
            for column in 0..7 {
                let num = if (column / 2 + row) % 2 == 0 {
                    PlayerNum::P1
                } else {
                    PlayerNum::P2
                };
                board.place(row, column, num).unwrap();
            }
        }
        assert!(board.is_full());
        assert!(!board.check_for_win(PlayerNum::P1));
        assert!(!board.check_for_win(PlayerNum::P2));
    }
}
