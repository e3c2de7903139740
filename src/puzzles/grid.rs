//! Shortest path across a square grid with impassable water cells.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::plan::Plan;
use crate::problem::{Cost, InformedProblem, SearchProblem};
use crate::puzzles::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn manhattan(self, other: Cell) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

impl FromStr for Cell {
    type Err = ConfigError;

    /// Parses `row,col`.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let parse_error = |message: &str| ConfigError::Parse {
            input: input.to_string(),
            message: message.to_string(),
        };
        let (row, col) = input
            .split_once(',')
            .ok_or_else(|| parse_error("expected ROW,COL"))?;
        let row = row.trim().parse().map_err(|_| parse_error("row is not a number"))?;
        let col = col.trim().parse().map_err(|_| parse_error("column is not a number"))?;
        Ok(Cell { row, col })
    }
}

/// Neighbour directions in the order they are enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Left, Direction::Right, Direction::Up, Direction::Down];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridMove {
    pub direction: Direction,
    pub to: Cell,
}

impl fmt::Display for GridMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "move {:?} to {}", self.direction, self.to)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub size: usize,
    pub source: Cell,
    pub destination: Cell,
    pub water: Vec<Cell>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 3,
            source: Cell::new(0, 0),
            destination: Cell::new(2, 2),
            water: Vec::new(),
        }
    }
}

/// Validated grid with unit step cost and a Manhattan-distance heuristic.
#[derive(Debug, Clone)]
pub struct GridPath {
    size: usize,
    source: Cell,
    destination: Cell,
    water: HashSet<Cell>,
}

impl GridPath {
    pub fn new(config: &GridConfig) -> Result<Self, ConfigError> {
        let size = config.size;
        let in_bounds = |cell: Cell| -> Result<Cell, ConfigError> {
            if cell.row < size && cell.col < size {
                Ok(cell)
            } else {
                Err(ConfigError::OutOfBounds {
                    row: cell.row,
                    col: cell.col,
                    size,
                })
            }
        };

        let source = in_bounds(config.source)?;
        let destination = in_bounds(config.destination)?;
        let water = config
            .water
            .iter()
            .map(|&cell| in_bounds(cell))
            .collect::<Result<HashSet<_>, _>>()?;

        for (endpoint, cell) in [("source", source), ("destination", destination)] {
            if water.contains(&cell) {
                return Err(ConfigError::BlockedEndpoint {
                    endpoint,
                    row: cell.row,
                    col: cell.col,
                });
            }
        }

        Ok(Self {
            size,
            source,
            destination,
            water,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_water(&self, cell: Cell) -> bool {
        self.water.contains(&cell)
    }

    fn neighbour(&self, cell: Cell, direction: Direction) -> Option<Cell> {
        let (dr, dc) = direction.delta();
        let row = cell.row.checked_add_signed(dr)?;
        let col = cell.col.checked_add_signed(dc)?;
        (row < self.size && col < self.size).then(|| Cell::new(row, col))
    }

    /// Draw the grid: `~` water, `S` source, `D` destination, `*` path.
    pub fn render(&self, plan: &Plan<Cell, GridMove>) -> String {
        let path: HashSet<Cell> = plan.states().copied().collect();
        let mut out = String::new();
        for row in 0..self.size {
            let line: Vec<&str> = (0..self.size)
                .map(|col| {
                    let cell = Cell::new(row, col);
                    if cell == self.source {
                        "S"
                    } else if cell == self.destination {
                        "D"
                    } else if self.is_water(cell) {
                        "~"
                    } else if path.contains(&cell) {
                        "*"
                    } else {
                        "."
                    }
                })
                .collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
        out
    }
}

impl SearchProblem for GridPath {
    type State = Cell;
    type Action = GridMove;

    fn initial_state(&self) -> Cell {
        self.source
    }

    fn is_goal(&self, state: &Cell) -> bool {
        *state == self.destination
    }

    /// Water cells are impassable, so moves into them are never produced.
    fn successors(&self, state: &Cell) -> Vec<(GridMove, Cell)> {
        Direction::ALL
            .into_iter()
            .filter_map(|direction| {
                let to = self.neighbour(*state, direction)?;
                (!self.is_water(to)).then_some((GridMove { direction, to }, to))
            })
            .collect()
    }
}

impl InformedProblem for GridPath {
    fn heuristic(&self, state: &Cell) -> Cost {
        state.manhattan(self.destination) as Cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::informed::best_first;
    use crate::problem::verify_plan;
    use crate::uninformed::breadth_first;

    #[test]
    fn test_open_three_by_three() {
        let grid = GridPath::new(&GridConfig::default()).unwrap();
        let solution = best_first(&grid).unwrap();
        assert_eq!(solution.plan.len(), 4);
        assert_eq!(solution.cost, 4);
        assert_eq!(*solution.plan.final_state(), Cell::new(2, 2));
        assert!(verify_plan(&grid, &solution.plan).unwrap());
    }

    #[test]
    fn test_routes_around_water() {
        // Wall across the middle row with a gap on the right.
        let config = GridConfig {
            size: 3,
            source: Cell::new(0, 0),
            destination: Cell::new(2, 0),
            water: vec![Cell::new(1, 0), Cell::new(1, 1)],
        };
        let grid = GridPath::new(&config).unwrap();
        let solution = best_first(&grid).unwrap();
        assert_eq!(solution.cost, 6);
        assert!(solution.plan.states().all(|cell| !grid.is_water(*cell)));

        let bfs = breadth_first(&grid).unwrap();
        assert_eq!(bfs.plan.len(), 6);
    }

    #[test]
    fn test_walled_off_destination_is_exhausted() {
        let config = GridConfig {
            size: 3,
            source: Cell::new(0, 0),
            destination: Cell::new(2, 2),
            water: vec![Cell::new(1, 2), Cell::new(2, 1)],
        };
        let grid = GridPath::new(&config).unwrap();
        assert!(best_first(&grid).unwrap_err().is_exhausted());
    }

    #[test]
    fn test_corner_has_two_neighbours() {
        let grid = GridPath::new(&GridConfig::default()).unwrap();
        let moves: Vec<Direction> = grid
            .successors(&Cell::new(0, 0))
            .into_iter()
            .map(|(mv, _)| mv.direction)
            .collect();
        assert_eq!(moves, vec![Direction::Right, Direction::Down]);
    }

    #[test]
    fn test_rejects_bad_config() {
        let outside = GridConfig {
            destination: Cell::new(3, 0),
            ..GridConfig::default()
        };
        assert!(matches!(GridPath::new(&outside), Err(ConfigError::OutOfBounds { .. })));

        let flooded = GridConfig {
            water: vec![Cell::new(0, 0)],
            ..GridConfig::default()
        };
        assert!(matches!(GridPath::new(&flooded), Err(ConfigError::BlockedEndpoint { .. })));
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!("2, 1".parse::<Cell>().unwrap(), Cell::new(2, 1));
        assert!("2".parse::<Cell>().is_err());
        assert!("a,1".parse::<Cell>().is_err());
    }

    #[test]
    fn test_render_marks_path() {
        let config = GridConfig {
            water: vec![Cell::new(1, 1)],
            ..GridConfig::default()
        };
        let grid = GridPath::new(&config).unwrap();
        let solution = best_first(&grid).unwrap();
        let picture = grid.render(&solution.plan);
        assert_eq!(picture.lines().count(), 3);
        assert!(picture.starts_with('S'));
        assert!(picture.contains('~'));
        assert_eq!(picture.matches('*').count(), 3);
    }
}
