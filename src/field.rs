use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rand::Rng;
use thiserror::Error;

use crate::cell::Cell;
use crate::config::{ConfigError, validate_defect_ratio};
use crate::neighborhood::{Bounds, Neighborhood};
use crate::strategy::Strategy;

/// Reasons a field could not be constructed or loaded.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("failed to read field file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("field input is empty; expected a `rows cols` line")]
    MissingDimensions,
    #[error("bad dimensions line {0:?}; expected two positive integers `rows cols`")]
    InvalidDimensions(String),
    #[error("field must have at least one row and one column (got {rows}x{cols})")]
    EmptyDimensions { rows: usize, cols: usize },
    #[error("expected {expected} rows but found {found}")]
    MissingRows { expected: usize, found: usize },
    #[error("row {row} has {found} cells, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("invalid strategy {found:?} at row {row}, column {col}; expected C or D")]
    InvalidStrategy { row: usize, col: usize, found: char },
    #[error("unexpected content after the last row on line {line}")]
    TrailingContent { line: usize },
    #[error("a {rows}x{cols} field has too many cells to store")]
    TooLarge { rows: usize, cols: usize },
    #[error("expected {expected} strategies for the field, got {found}")]
    CellCount { expected: usize, found: usize },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

// Largest cell count a `Vec<Cell>` can hold.
const MAX_CELLS: usize = isize::MAX as usize / std::mem::size_of::<Cell>();

/// Number of cells in a `rows x cols` field, rejecting empty and oversized
/// dimensions before anything is allocated.
fn cell_count(rows: usize, cols: usize) -> Result<usize, FieldError> {
    if rows == 0 || cols == 0 {
        return Err(FieldError::EmptyDimensions { rows, cols });
    }
    rows.checked_mul(cols)
        .filter(|&count| count <= MAX_CELLS)
        .ok_or(FieldError::TooLarge { rows, cols })
}

/// A fixed-size grid of agents addressed by `(row, col)`.
///
/// Cells are stored row-major. Dimensions are fixed at construction and are
/// always at least 1x1.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    bounds: Bounds,
    cells: Vec<Cell>,
}

impl Field {
    /// Builds a field from row-major strategies. Scores start at zero and no
    /// previous strategy is recorded.
    pub fn from_strategies(
        rows: usize,
        cols: usize,
        strategies: Vec<Strategy>,
    ) -> Result<Self, FieldError> {
        let expected = cell_count(rows, cols)?;
        if strategies.len() != expected {
            return Err(FieldError::CellCount {
                expected,
                found: strategies.len(),
            });
        }
        Ok(Field {
            bounds: Bounds::new(rows, cols),
            cells: strategies.into_iter().map(Cell::new).collect(),
        })
    }

    /// Fills a field with the given strategy.
    pub fn uniform(rows: usize, cols: usize, strategy: Strategy) -> Result<Self, FieldError> {
        let count = cell_count(rows, cols)?;
        Field::from_strategies(rows, cols, vec![strategy; count])
    }

    /// Generates a field where each cell defects with probability `defect_ratio`,
    /// which must lie in `[0, 1]`.
    pub fn random<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        defect_ratio: f64,
        rng: &mut R,
    ) -> Result<Self, FieldError> {
        let p = validate_defect_ratio(defect_ratio)?;
        let count = cell_count(rows, cols)?;
        let strategies = (0..count)
            .map(|_| {
                if rng.random_bool(p) {
                    Strategy::Defect
                } else {
                    Strategy::Cooperate
                }
            })
            .collect();
        Field::from_strategies(rows, cols, strategies)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FieldError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| FieldError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        text.parse()
    }

    pub fn rows(&self) -> usize {
        self.bounds.rows
    }

    pub fn cols(&self) -> usize {
        self.bounds.cols
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        if row < self.bounds.rows && col < self.bounds.cols {
            self.cells.get(self.bounds.index(row, col))
        } else {
            None
        }
    }

    pub fn strategy(&self, row: usize, col: usize) -> Option<Strategy> {
        self.get(row, col).map(|cell| cell.strategy)
    }

    pub fn score(&self, row: usize, col: usize) -> Option<f64> {
        self.get(row, col).map(|cell| cell.score)
    }

    pub fn neighborhood(&self, row: usize, col: usize) -> Neighborhood {
        self.bounds.neighborhood(row, col)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Iterates `(row, col, cell)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Cell)> + '_ {
        self.cells.iter().enumerate().map(move |(i, cell)| {
            let (row, col) = self.bounds.position(i);
            (row, col, cell)
        })
    }

    pub fn strategies(&self) -> Vec<Strategy> {
        self.cells.iter().map(|cell| cell.strategy).collect()
    }

    pub fn count(&self, strategy: Strategy) -> usize {
        self.cells.iter().filter(|c| c.strategy == strategy).count()
    }
}

impl FromStr for Field {
    type Err = FieldError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim_end()))
            .skip_while(|(_, line)| line.is_empty());

        let (_, header) = lines.next().ok_or(FieldError::MissingDimensions)?;
        let (rows, cols) = parse_dimensions(header)?;
        let count = cell_count(rows, cols)?;

        // The header is untrusted; the body can never hold more cells than it has bytes.
        let mut strategies = Vec::with_capacity(count.min(text.len()));
        for row in 0..rows {
            let (_, line) = lines.next().ok_or(FieldError::MissingRows {
                expected: rows,
                found: row,
            })?;
            let found = line.chars().count();
            if found != cols {
                return Err(FieldError::RowLength {
                    row,
                    expected: cols,
                    found,
                });
            }
            for (col, c) in line.chars().enumerate() {
                let strategy = Strategy::from_char(c)
                    .ok_or(FieldError::InvalidStrategy { row, col, found: c })?;
                strategies.push(strategy);
            }
        }

        if let Some((line, _)) = lines.find(|(_, line)| !line.is_empty()) {
            return Err(FieldError::TrailingContent { line });
        }

        Field::from_strategies(rows, cols, strategies)
    }
}

fn parse_dimensions(header: &str) -> Result<(usize, usize), FieldError> {
    let invalid = || FieldError::InvalidDimensions(header.to_string());
    let mut parts = header.split_whitespace();
    let rows = parts.next().ok_or_else(invalid)?;
    let cols = parts.next().ok_or_else(invalid)?;
    if parts.next().is_some() {
        return Err(invalid());
    }
    let rows = rows.parse::<usize>().map_err(|_| invalid())?;
    let cols = cols.parse::<usize>().map_err(|_| invalid())?;
    Ok((rows, cols))
}

/// Writes the field in the same text format the loader reads.
impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.rows(), self.cols())?;
        for row in self.cells.chunks(self.bounds.cols) {
            for cell in row {
                write!(f, "{}", cell.strategy)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
