/// Number of generations a board has advanced since it was built.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Generation(pub u32);

impl Generation {
    pub fn zero() -> Self {
        Self(0)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn increment_self(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

impl Default for Generation {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
