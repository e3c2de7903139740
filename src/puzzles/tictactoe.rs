//! Tic-tac-toe against an exhaustive minimax opponent.
//!
//! The engine plays X (the maximizer) and the human plays O.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::minimax::{GameTree, Turn, TwoPlayerGame};
use crate::puzzles::ConfigError;

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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn for_turn(turn: Turn) -> Mark {
        match turn {
            Turn::Max => Mark::X,
            Turn::Min => Mark::O,
        }
    }
}

/// A cell coordinate, row-major from the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

impl Square {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    fn index(self) -> usize {
        self.row as usize * 3 + self.col as usize
    }

    fn from_index(index: usize) -> Self {
        Self::new((index / 3) as u8, (index % 3) as u8)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl FromStr for Square {
    type Err = ConfigError;

    /// Parses `row col` (0-indexed), as typed at the prompt.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let parse_error = || ConfigError::Parse {
            input: input.to_string(),
            message: "expected two numbers between 0 and 2".to_string(),
        };
        let numbers: Vec<u8> = input
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<u8>().map_err(|_| parse_error()))
            .collect::<Result<_, _>>()?;
        match numbers.as_slice() {
            [row, col] if *row < 3 && *col < 3 => Ok(Square::new(*row, *col)),
            _ => Err(parse_error()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [Option<Mark>; 9],
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, square: Square) -> Option<Mark> {
        self.cells[square.index()]
    }

    /// Copy of the board with `mark` placed on `square`.
    pub fn with(&self, square: Square, mark: Mark) -> Board {
        let mut next = *self;
        next.cells[square.index()] = Some(mark);
        next
    }

    pub fn winner(&self) -> Option<Mark> {
        LINES.iter().find_map(|&[a, b, c]| match self.cells[a] {
            Some(mark) if self.cells[b] == Some(mark) && self.cells[c] == Some(mark) => Some(mark),
            _ => None,
        })
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Empty squares in row-major order.
    pub fn empty_squares(&self) -> impl Iterator<Item = Square> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(index, _)| Square::from_index(index))
    }
}

impl FromStr for Board {
    type Err = ConfigError;

    /// Parses nine cells of `X`, `O` or `_`, ignoring whitespace and `/`.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let symbols: Vec<char> = input.chars().filter(|c| !c.is_whitespace() && *c != '/').collect();
        if symbols.len() != 9 {
            return Err(ConfigError::Parse {
                input: input.to_string(),
                message: format!("expected 9 cells, got {}", symbols.len()),
            });
        }

        let mut board = Board::empty();
        for (index, symbol) in symbols.into_iter().enumerate() {
            board.cells[index] = match symbol {
                'X' | 'x' => Some(Mark::X),
                'O' | 'o' => Some(Mark::O),
                '_' | '.' => None,
                other => {
                    return Err(ConfigError::Parse {
                        input: input.to_string(),
                        message: format!("unexpected cell '{other}'"),
                    })
                }
            };
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(3) {
            let symbols: Vec<&str> = row
                .iter()
                .map(|cell| match cell {
                    Some(Mark::X) => "X",
                    Some(Mark::O) => "O",
                    None => "_",
                })
                .collect();
            writeln!(f, "{}", symbols.join(" "))?;
        }
        Ok(())
    }
}

/// Tic-tac-toe rules: X maximizes, O minimizes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TicTacToe;

impl TwoPlayerGame for TicTacToe {
    type Board = Board;
    type Move = Square;

    fn terminal_score(&self, board: &Board) -> Option<i32> {
        match board.winner() {
            Some(Mark::X) => Some(1),
            Some(Mark::O) => Some(-1),
            None if board.is_full() => Some(0),
            None => None,
        }
    }

    fn moves(&self, board: &Board, turn: Turn) -> Vec<(Square, Board)> {
        let mark = Mark::for_turn(turn);
        board
            .empty_squares()
            .map(|square| (square, board.with(square, mark)))
            .collect()
    }
}

/// How an interactive game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOutcome {
    ComputerWins,
    HumanWins,
    Draw,
    /// Input ended before the game finished.
    Abandoned,
}

/// Drive a game between a human reading from `input` and the engine.
///
/// The human plays O. Each human move is a `row col` line; malformed or
/// illegal moves are reported and asked for again.
pub fn play_interactive<R: BufRead, W: Write>(
    start: Board,
    computer_first: bool,
    mut input: R,
    mut output: W,
) -> io::Result<GameOutcome> {
    let first = if computer_first { Turn::Max } else { Turn::Min };
    let mut tree = GameTree::build(TicTacToe, start, first);
    info!(positions = tree.len(), "game tree ready");
    let mut current = tree.root();

    loop {
        write!(output, "\n{}", tree.node(current).board)?;

        if let Some(score) = tree.outcome(current) {
            let outcome = match score {
                1 => GameOutcome::ComputerWins,
                -1 => GameOutcome::HumanWins,
                _ => GameOutcome::Draw,
            };
            let message = match outcome {
                GameOutcome::ComputerWins => "Computer (X) wins!",
                GameOutcome::HumanWins => "You (O) win!",
                _ => "It's a draw!",
            };
            writeln!(output, "{message}")?;
            return Ok(outcome);
        }

        if tree.node(current).turn == Turn::Max {
            let Some(next) = tree.choose_move(current) else {
                return Ok(GameOutcome::Draw);
            };
            let node = tree.node(next);
            debug!(score = ?node.score, "computer move selected");
            if let Some(square) = node.mv {
                writeln!(output, "Computer plays {square}")?;
            }
            current = next;
            continue;
        }

        write!(output, "Enter your move (row col, 0-indexed): ")?;
        output.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(GameOutcome::Abandoned);
        }

        let square = match line.trim().parse::<Square>() {
            Ok(square) => square,
            Err(err) => {
                writeln!(output, "Invalid move: {err}. Try again.")?;
                continue;
            }
        };
        match tree.play(current, &square) {
            Ok(next) => current = next,
            Err(_) => writeln!(output, "Square {square} is taken. Try again.")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_completing_line_backs_up_win() {
        // X holds (0,0) and (0,1); (0,2) completes the top row.
        let board: Board = "XX_/OO_/___".parse().unwrap();
        let mut tree = GameTree::build(TicTacToe, board, Turn::Max);
        let root = tree.root();

        let winning = tree.play(root, &Square::new(0, 2)).unwrap();
        assert_eq!(tree.node(winning).score, Some(1));
        assert!(tree.node(winning).children.is_empty());

        let choice = tree.choose_move(root).unwrap();
        assert_eq!(tree.node(choice).mv, Some(Square::new(0, 2)));
        assert_eq!(tree.node(root).score, Some(1));
    }

    #[test]
    fn test_won_position_backs_up_win_with_empty_cells() {
        let board: Board = "XXX/OO_/___".parse().unwrap();
        let tree = GameTree::build(TicTacToe, board, Turn::Min);
        let root = tree.root();
        assert_eq!(tree.node(root).score, Some(1));
        assert!(tree.node(root).children.is_empty());
        assert_eq!(tree.evaluate(root), Some(1));
    }

    #[test]
    fn test_blocks_opponent_line() {
        // O threatens the middle row; X must take (1,2).
        let board: Board = "X__/OO_/X__".parse().unwrap();
        let mut tree = GameTree::build(TicTacToe, board, Turn::Max);
        let root = tree.root();
        let choice = tree.choose_move(root).unwrap();
        assert_eq!(tree.node(choice).mv, Some(Square::new(1, 2)));
        assert_eq!(tree.node(choice).score, Some(0));
    }

    #[test]
    fn test_occupied_square_is_invalid() {
        let board: Board = "X__/___/___".parse().unwrap();
        let mut tree = GameTree::build(TicTacToe, board, Turn::Min);
        let root = tree.root();
        assert!(tree.play(root, &Square::new(0, 0)).is_err());
    }

    #[test]
    fn test_parse_square_and_board() {
        assert_eq!("1 2".parse::<Square>().unwrap(), Square::new(1, 2));
        assert_eq!("2,0".parse::<Square>().unwrap(), Square::new(2, 0));
        assert!("3 0".parse::<Square>().is_err());
        assert!("1".parse::<Square>().is_err());
        assert!("XX".parse::<Board>().is_err());
        assert!("XXQ/___/___".parse::<Board>().is_err());

        let board: Board = "X_O/___/__X".parse().unwrap();
        assert_eq!(board.to_string(), "X _ O\n_ _ _\n_ _ X\n");
        assert_eq!(board.empty_squares().count(), 6);
    }

    #[test]
    fn test_interactive_game_where_human_blunders() {
        // O to move; X threatens both the top row and the diagonal.
        let board: Board = "XX_/_X_/OO_".parse().unwrap();
        let input = Cursor::new("9 9\n0 0\n1 0\n");
        let mut output = Vec::new();

        let outcome = play_interactive(board, false, input, &mut output).unwrap();
        assert_eq!(outcome, GameOutcome::ComputerWins);

        let transcript = String::from_utf8(output).unwrap();
        assert!(transcript.contains("Invalid move"));
        assert!(transcript.contains("is taken"));
        assert!(transcript.contains("Computer (X) wins!"));
    }

    #[test]
    fn test_interactive_game_abandoned_on_eof() {
        let board: Board = "X__/___/___".parse().unwrap();
        let outcome = play_interactive(board, false, Cursor::new(""), Vec::new()).unwrap();
        assert_eq!(outcome, GameOutcome::Abandoned);
    }
}
