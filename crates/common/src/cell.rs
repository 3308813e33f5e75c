/// A single cell of the board.
///
/// The next state is staged in `alive_next` and only becomes visible once
/// [`Cell::apply_next_state`] runs, so a whole generation can be computed
/// from one consistent snapshot.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Cell {
    alive: bool,
    alive_next: bool,
}

impl Cell {
    pub fn new(alive: bool) -> Self {
        Self {
            alive,
            alive_next: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub(crate) fn set_alive(&mut self, alive: bool) {
        self.alive = alive;
    }

    /// Stages the next state from the number of live neighbors.
    pub fn determine_next_state(&mut self, live_neighbors: u8) {
        self.alive_next = match (self.alive, live_neighbors) {
            (true, 2) | (true, 3) => true, // survival
            (false, 3) => true,            // birth
            _ => false,
        };
    }

    /// Commits the staged state and returns it.
    pub fn apply_next_state(&mut self) -> bool {
        self.alive = self.alive_next;
        self.alive
    }
}
