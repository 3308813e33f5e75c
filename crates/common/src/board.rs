use std::fmt;

use rand::Rng;
use tracing::{debug, trace};

use crate::{
    cell::Cell,
    error::{Error, Result},
    world::Generation,
};

pub const ALIVE: char = '*';
pub const DEAD: char = ' ';

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub column: usize,
    pub row: usize,
}

impl Position {
    pub fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }
}

/// A toroidal grid of cells.
///
/// Cells live in one row-major buffer. Neighbors are not stored; they are
/// derived from a position with wrap-around arithmetic whenever needed.
#[derive(Debug, Clone)]
pub struct Board {
    columns: usize,
    rows: usize,
    cell_size: usize,
    cells: Vec<Cell>,
    alive_count: usize,
    generation: Generation,
}

impl Board {
    /// Builds a `width / cell_size` by `height / cell_size` board and seeds it
    /// with the thread rng.
    pub fn new(width: usize, height: usize, cell_size: usize, live_density: f64) -> Result<Self> {
        Self::with_rng(
            width,
            height,
            cell_size,
            live_density,
            &mut rand::thread_rng(),
        )
    }

    pub fn with_rng<R>(
        width: usize,
        height: usize,
        cell_size: usize,
        live_density: f64,
        rng: &mut R,
    ) -> Result<Self>
    where
        R: Rng + ?Sized,
    {
        let (columns, rows) = dimensions(width, height, cell_size)?;
        validate_density(live_density)?;

        let mut board = Self {
            columns,
            rows,
            cell_size,
            cells: vec![Cell::default(); columns * rows],
            alive_count: 0,
            generation: Generation::zero(),
        };
        debug!(columns, rows, cell_size, "created board");
        board.randomize_with(live_density, rng);
        Ok(board)
    }

    /// Builds a board from a `[row][column]` matrix with a cell size of one.
    pub fn from_matrix(matrix: Vec<Vec<bool>>) -> Result<Self> {
        let columns = check_shape(&matrix)?;
        let rows = matrix.len();
        let cells: Vec<Cell> = matrix.into_iter().flatten().map(Cell::new).collect();
        let alive_count = cells.iter().filter(|cell| cell.is_alive()).count();
        debug!(columns, rows, alive_count, "loaded board");
        Ok(Self {
            columns,
            rows,
            cell_size: 1,
            cells,
            alive_count,
            generation: Generation::zero(),
        })
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_size(&self) -> usize {
        self.cell_size
    }

    pub fn width(&self) -> usize {
        self.columns * self.cell_size
    }

    pub fn height(&self) -> usize {
        self.rows * self.cell_size
    }

    pub fn alive_count(&self) -> usize {
        self.alive_count
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn cell(&self, position: Position) -> Option<&Cell> {
        let index = self.cell_index(position)?;
        self.cells.get(index)
    }

    pub fn is_alive(&self, position: Position) -> bool {
        self.cell(position).map_or(false, Cell::is_alive)
    }

    pub fn set(&mut self, position: Position, alive: bool) -> Option<()> {
        let index = self.cell_index(position)?;
        let cell = &mut self.cells[index];
        match (cell.is_alive(), alive) {
            (false, true) => self.alive_count += 1,
            (true, false) => self.alive_count -= 1,
            _ => {}
        }
        cell.set_alive(alive);
        Some(())
    }

    pub fn randomize(&mut self, live_density: f64) {
        self.randomize_with(live_density, &mut rand::thread_rng());
    }

    /// Sets every cell alive with probability `live_density`.
    pub fn randomize_with<R>(&mut self, live_density: f64, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let mut alive_count = 0;
        for cell in &mut self.cells {
            let alive = rng.gen::<f64>() < live_density;
            cell.set_alive(alive);
            alive_count += usize::from(alive);
        }
        self.alive_count = alive_count;
        self.generation = Generation::zero();
        debug!(live_density, alive_count, "randomized board");
    }

    /// The eight neighbors of `position` in the order
    /// `[nw, n, ne, w, e, sw, s, se]`, wrapping at every edge.
    pub fn neighbors(&self, position: Position) -> [Position; 8] {
        let Position { column, row } = position;
        let left = if column > 0 { column - 1 } else { self.columns - 1 };
        let right = if column < self.columns - 1 { column + 1 } else { 0 };
        let top = if row > 0 { row - 1 } else { self.rows - 1 };
        let bottom = if row < self.rows - 1 { row + 1 } else { 0 };

        [
            Position::new(left, top),
            Position::new(column, top),
            Position::new(right, top),
            Position::new(left, row),
            Position::new(right, row),
            Position::new(left, bottom),
            Position::new(column, bottom),
            Position::new(right, bottom),
        ]
    }

    fn live_neighbors(&self, position: Position) -> u8 {
        self.neighbors(position)
            .iter()
            .filter(|neighbor| self.is_alive(**neighbor))
            .count() as u8
    }

    /// Moves every cell forward one generation.
    pub fn advance(&mut self) {
        // every cell must stage its next state before any cell applies it
        for index in 0..self.cells.len() {
            let live_neighbors = self.live_neighbors(self.position_of(index));
            self.cells[index].determine_next_state(live_neighbors);
        }

        let mut alive_count = 0;
        for cell in &mut self.cells {
            alive_count += usize::from(cell.apply_next_state());
        }
        self.alive_count = alive_count;
        self.generation.increment_self();
        trace!(generation = self.generation.get(), alive_count, "advanced board");
    }

    /// Row-major `[row][column]` copy of the current state.
    pub fn to_matrix(&self) -> Vec<Vec<bool>> {
        self.cells
            .chunks(self.columns)
            .map(|row| row.iter().map(Cell::is_alive).collect())
            .collect()
    }

    /// One line per row, one character per column.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity((self.columns + 1) * self.rows);
        for row in self.cells.chunks(self.columns) {
            out.extend(row.iter().map(symbol));
            out.push('\n');
        }
        out
    }

    /// Like [`Board::render`], but each cell becomes a
    /// `cell_size x cell_size` block.
    pub fn render_scaled(&self) -> String {
        let mut out = String::with_capacity(self.width() * self.height() + self.height());
        for row in self.cells.chunks(self.columns) {
            let line: String = row
                .iter()
                .flat_map(|cell| std::iter::repeat(symbol(cell)).take(self.cell_size))
                .collect();
            for _ in 0..self.cell_size {
                out.push_str(&line);
                out.push('\n');
            }
        }
        out
    }

    fn cell_index(&self, position: Position) -> Option<usize> {
        if position.column >= self.columns || position.row >= self.rows {
            return None;
        }
        let row_index = self.columns.checked_mul(position.row)?;
        row_index.checked_add(position.column)
    }

    fn position_of(&self, index: usize) -> Position {
        Position::new(index % self.columns, index / self.columns)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn symbol(cell: &Cell) -> char {
    if cell.is_alive() {
        ALIVE
    } else {
        DEAD
    }
}

/// Returns the column count of a non-empty rectangular matrix.
pub(crate) fn check_shape(matrix: &[Vec<bool>]) -> Result<usize> {
    let columns = matrix.first().map_or(0, Vec::len);
    if columns == 0 {
        return Err(Error::MalformedInput("board is empty".to_string()));
    }
    if let Some((index, row)) = matrix
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() != columns)
    {
        return Err(Error::MalformedInput(format!(
            "row {} has {} cells, expected {}",
            index + 1,
            row.len(),
            columns
        )));
    }
    Ok(columns)
}

/// Columns and rows for a `width x height` area split into `cell_size`
/// squares, rejecting anything that would not make a valid grid.
pub(crate) fn dimensions(width: usize, height: usize, cell_size: usize) -> Result<(usize, usize)> {
    if cell_size == 0 {
        return Err(Error::Configuration("cell size must be at least 1".to_string()));
    }
    if width % cell_size != 0 || height % cell_size != 0 {
        return Err(Error::Configuration(format!(
            "{}x{} is not divisible by cell size {}",
            width, height, cell_size
        )));
    }
    let (columns, rows) = (width / cell_size, height / cell_size);
    if columns == 0 || rows == 0 {
        return Err(Error::Configuration(format!(
            "{}x{} with cell size {} leaves no cells",
            width, height, cell_size
        )));
    }
    let fits = columns
        .checked_mul(rows)
        .and_then(|cells| cells.checked_mul(std::mem::size_of::<Cell>()))
        .map_or(false, |bytes| bytes <= isize::MAX as usize);
    if !fits {
        return Err(Error::Configuration(format!(
            "{}x{} cells is too large for a board",
            columns, rows
        )));
    }
    Ok((columns, rows))
}

pub(crate) fn validate_density(live_density: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&live_density) {
        return Err(Error::Configuration(format!(
            "live density {} is outside 0..=1",
            live_density
        )));
    }
    Ok(())
}
