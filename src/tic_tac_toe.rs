use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Empty cells in board strings and canonical keys.
pub const EMPTY_CHAR: char = '*';

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Spot {
    Empty,
    Filled(Mark),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    InProgress,
    Won(Mark),
    Draw,
    QuitByUser,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        self != Status::InProgress
    }
}

/// A 3x3 board together with the seating of the two players.
///
/// Seats only hold letters, so a cloned board used for lookahead shares
/// player identity with the live game without sharing any mutable state.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    spots: [Spot; 9],
    move_count: usize,
    last_move: Option<usize>,
    remaining_moves: Vec<usize>,
    seats: [Mark; 2],
    turn: usize,
    user_quit: bool,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            spots: [Spot::Empty; 9],
            move_count: 0,
            last_move: None,
            remaining_moves: (0..9).collect(),
            seats: [Mark::X, Mark::O],
            turn: 0,
            user_quit: false,
        }
    }

    /// Seats two players by letter. `first` is on turn.
    pub fn set_players(&mut self, first: Mark, second: Mark) {
        self.seats = [first, second];
        self.turn = 0;
    }

    pub fn players(&self) -> [Mark; 2] {
        self.seats
    }

    /// Letter of the player on turn, without passing the turn.
    pub fn to_move(&self) -> Mark {
        self.seats[self.turn]
    }

    /// Returns the letter of the player on turn and passes the turn.
    pub fn next(&mut self) -> Mark {
        let mark = self.seats[self.turn];
        self.turn = 1 - self.turn;
        mark
    }

    /// Places `mark` at `location` if it is on the board and empty.
    /// Returns false and leaves the board untouched otherwise.
    pub fn apply_move(&mut self, location: usize, mark: Mark) -> bool {
        if location > 8 || self.spots[location] != Spot::Empty {
            return false;
        }

        self.spots[location] = Spot::Filled(mark);
        self.move_count += 1;
        self.last_move = Some(location);
        self.remaining_moves.retain(|&cell| cell != location);
        true
    }

    pub fn is_game_won(&self, mark: Mark) -> bool {
        LINES
            .iter()
            .any(|line| line.iter().all(|&i| self.spots[i] == Spot::Filled(mark)))
    }

    pub fn is_game_draw(&self) -> bool {
        self.move_count >= 9
    }

    pub fn is_game_over(&self) -> bool {
        self.status().is_terminal()
    }

    pub fn status(&self) -> Status {
        if self.is_game_won(Mark::X) {
            Status::Won(Mark::X)
        } else if self.is_game_won(Mark::O) {
            Status::Won(Mark::O)
        } else if self.user_quit {
            Status::QuitByUser
        } else if self.is_game_draw() {
            Status::Draw
        } else {
            Status::InProgress
        }
    }

    // Check if there's a winner
    pub fn winner(&self) -> Option<Mark> {
        match self.status() {
            Status::Won(mark) => Some(mark),
            _ => None,
        }
    }

    pub fn quit(&mut self) {
        self.user_quit = true;
    }

    pub fn user_quit(&self) -> bool {
        self.user_quit
    }

    pub fn spots(&self) -> &[Spot; 9] {
        &self.spots
    }

    pub fn move_count(&self) -> usize {
        self.move_count
    }

    pub fn last_move(&self) -> Option<usize> {
        self.last_move
    }

    pub fn remaining_moves(&self) -> &[usize] {
        &self.remaining_moves
    }

    /// Nine-character key with `letter` written as `L` and the opponent as `T`,
    /// so one value table serves a learner playing either letter.
    pub fn key(&self, letter: Mark) -> String {
        self.spots
            .iter()
            .map(|spot| match spot {
                Spot::Empty => EMPTY_CHAR,
                Spot::Filled(mark) if *mark == letter => 'L',
                Spot::Filled(_) => 'T',
            })
            .collect()
    }

    /// Large ASCII-art drawing of the board.
    pub fn render(&self) -> String {
        const LETTER_X: [&str; 7] = [
            "  X     X  ",
            "   X   X   ",
            "    X X    ",
            "     X     ",
            "    X X    ",
            "   X   X   ",
            "  X     X  ",
        ];
        const LETTER_O: [&str; 7] = [
            "   OOOOO   ",
            "  O     O  ",
            "  O     O  ",
            "  O     O  ",
            "  O     O  ",
            "  O     O  ",
            "   OOOOO   ",
        ];
        let blank = " ".repeat(11);
        let spacer = format!("{blank}@{blank}@{blank}");

        let mut lines = vec![spacer.clone()];
        for (row_index, row) in self.spots.chunks(3).enumerate() {
            for glyph_line in 0..7 {
                let cells: Vec<&str> = row
                    .iter()
                    .map(|spot| match spot {
                        Spot::Filled(Mark::X) => LETTER_X[glyph_line],
                        Spot::Filled(Mark::O) => LETTER_O[glyph_line],
                        Spot::Empty => blank.as_str(),
                    })
                    .collect();
                lines.push(cells.join("@"));
            }
            if row_index != 2 {
                lines.push(spacer.clone());
                lines.push("@".repeat(35));
                lines.push(spacer.clone());
            }
        }
        lines.push(spacer);
        lines.join("\n")
    }
}

impl FromStr for Board {
    type Err = Error;

    /// Parses nine cells of `X`, `O` and `*` (or `.`) in row-major order.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.trim().chars().collect();
        if chars.len() != 9 {
            return Err(Error::InvalidBoard {
                board: s.to_string(),
                reason: format!("expected 9 cells, got {}", chars.len()),
            });
        }

        let mut board = Board::new();
        for (location, c) in chars.into_iter().enumerate() {
            let mark = match c {
                'X' | 'x' => Mark::X,
                'O' | 'o' => Mark::O,
                '*' | '.' => continue,
                other => {
                    return Err(Error::InvalidBoard {
                        board: s.to_string(),
                        reason: format!("unexpected character '{other}' at {location}"),
                    })
                }
            };
            board.apply_move(location, mark);
        }
        board.last_move = None;
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.spots.chunks(3) {
            for spot in row {
                let symbol = match spot {
                    Spot::Empty => ".",
                    Spot::Filled(Mark::X) => "X",
                    Spot::Filled(Mark::O) => "O",
                };
                write!(f, "{} ", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn test_new() {
        let board = Board::new();
        assert_eq!(board.spots(), &[Spot::Empty; 9]);
        assert_eq!(board.move_count(), 0);
        assert_eq!(board.last_move(), None);
        assert_eq!(board.remaining_moves(), &[0, 1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(board.status(), Status::InProgress);
    }

    #[test]
    fn test_apply_move() {
        let mut board = Board::new();
        assert!(board.apply_move(4, Mark::X));
        assert_eq!(board.spots()[4], Spot::Filled(Mark::X));
        assert_eq!(board.move_count(), 1);
        assert_eq!(board.last_move(), Some(4));
        assert!(!board.remaining_moves().contains(&4));

        let before = board.clone();
        assert!(!board.apply_move(4, Mark::O));
        assert!(!board.apply_move(9, Mark::O));
        assert_eq!(board, before);
    }

    #[test]
    fn test_move_count_tracks_filled_cells() {
        let mut board = Board::new();
        let moves = [4, 0, 8, 2, 6, 3, 5, 1, 7];
        let mut mark = Mark::X;
        for &cell in &moves {
            assert!(board.apply_move(cell, mark));
            let filled = board.spots().iter().filter(|s| **s != Spot::Empty).count();
            assert_eq!(board.move_count(), filled);
            assert_eq!(board.move_count(), 9 - board.remaining_moves().len());
            mark = mark.opponent();
        }
    }

    #[test]
    fn test_every_line_wins() {
        for line in LINES {
            for mark in [Mark::X, Mark::O] {
                let mut board = Board::new();
                for cell in line {
                    board.apply_move(cell, mark);
                }
                assert!(board.is_game_won(mark), "line {line:?}");
                assert!(!board.is_game_won(mark.opponent()));
                assert_eq!(board.status(), Status::Won(mark));
            }
        }
    }

    #[test]
    fn test_no_false_wins() {
        assert_eq!(board("XOXXOOOXX").status(), Status::Draw);
        assert_eq!(board("XO*OX****").winner(), None);
        assert_eq!(board("XXOOOXXXO").winner(), None);
    }

    #[test]
    fn test_winning_move_ends_game() {
        let mut board = board("XX*OO****");
        board.set_players(Mark::X, Mark::O);
        assert_eq!(board.next(), Mark::X);
        assert!(board.apply_move(2, Mark::X));
        assert_eq!(board.status(), Status::Won(Mark::X));
        assert!(board.is_game_over());
        assert_eq!(board.winner(), Some(Mark::X));
    }

    #[test]
    fn test_quit_ends_game_without_winner() {
        let mut board = Board::new();
        board.apply_move(0, Mark::X);
        board.quit();
        assert!(board.is_game_over());
        assert_eq!(board.status(), Status::QuitByUser);
        assert_eq!(board.winner(), None);
    }

    #[test]
    fn test_next_alternates_seats() {
        let mut board = Board::new();
        board.set_players(Mark::O, Mark::X);
        assert_eq!(board.to_move(), Mark::O);
        assert_eq!(board.next(), Mark::O);
        assert_eq!(board.next(), Mark::X);
        assert_eq!(board.next(), Mark::O);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut board = board("X***O****");
        board.set_players(Mark::O, Mark::X);
        let mut copy = board.clone();
        assert!(copy.apply_move(8, Mark::X));
        assert_eq!(board.spots()[8], Spot::Empty);
        assert_eq!(copy.move_count(), board.move_count() + 1);
        assert_eq!(copy.players(), board.players());
    }

    #[test]
    fn test_key() {
        let board = board("XO*X*O***");
        assert_eq!(board.key(Mark::X), "LT*L*T***");
        assert_eq!(board.key(Mark::O), "TL*T*L***");

        let swapped = self::board("OX*O*X***");
        assert_eq!(board.key(Mark::X), swapped.key(Mark::O));
    }

    #[test]
    fn test_parse_errors() {
        assert!("XO".parse::<Board>().is_err());
        assert!("XO*X*O**Z".parse::<Board>().is_err());
    }

    #[test]
    fn test_render() {
        let rendered = board("X***O****").render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 1 + 3 * 7 + 2 * 3 + 1);
        assert!(lines.iter().all(|line| line.len() == 35));
        assert_eq!(lines[1], format!("  X     X  @{0}@{0}", " ".repeat(11)));
        assert_eq!(lines[9], "@".repeat(35));
        assert_eq!(lines[11], format!("{0}@   OOOOO   @{0}", " ".repeat(11)));
    }

    #[test]
    fn test_display() {
        let board = board("X***O***X");
        assert_eq!(board.to_string(), "X . . \n. O . \n. . X \n");
    }
}
