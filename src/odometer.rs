/// Mixed-radix counter over `digits` positions, each running `1..=max`.
///
/// Walks the Cartesian product in row-major order: the last position turns
/// fastest and the walk ends when the first position overflows.
#[derive(Debug, Clone)]
pub struct Odometer {
    digits: Vec<usize>,
    max: usize,
    exhausted: bool,
}

impl Odometer {
    /// Starts at the all-ones reading. With no positions or `max == 0` the
    /// product is empty and the odometer starts out exhausted.
    pub fn new(positions: usize, max: usize) -> Self {
        Self { digits: vec![1; positions], max, exhausted: positions == 0 || max == 0 }
    }

    /// The current reading, or `None` once every combination has been seen.
    pub fn current(&self) -> Option<&[usize]> {
        if self.exhausted {
            None
        } else {
            Some(self.digits.as_slice())
        }
    }

    /// Steps to the next reading. Returns `false` when the walk is over.
    pub fn advance(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        for digit in self.digits.iter_mut().rev() {
            if *digit < self.max {
                *digit += 1;
                return true;
            }
            *digit = 1;
        }
        self.exhausted = true;
        false
    }
}
