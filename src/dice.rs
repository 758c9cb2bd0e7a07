/// Walks every possible sequence of rolls, one sequence per call to
/// [`DeterministicDice::next`].  Each roll starts at the bottom of its range;
/// `next` bumps the most recent roll that still has room and drops the rest.
#[derive(Debug, Default)]
pub struct DeterministicDice {
    initialized: bool,
    index: usize,
    data: Vec<(u64, u64, u64)>,
}

impl DeterministicDice {
    pub fn new() -> Self {
        Self::default()
    }

    /// The rolls made during the current sequence
    pub fn key(&self) -> Vec<u64> {
        self.data.iter().map(|v| v.2).collect()
    }

    /// Advances to the next sequence, returning `false` once every
    /// combination has been visited
    pub fn next(&mut self) -> bool {
        if !self.initialized {
            self.initialized = true;
            true
        } else {
            while let Some((lo, hi, mut v)) = self.data.pop() {
                v += 1;
                if v >= hi {
                    continue;
                } else {
                    self.data.push((lo, hi, v));
                    break;
                }
            }
            self.index = 0;
            !self.data.is_empty()
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Source of uniform rolls over a half-open range
pub trait Dice {
    fn roll(&mut self, range: std::ops::Range<u64>) -> u64;
}

impl<R: rand::Rng> Dice for R {
    fn roll(&mut self, range: std::ops::Range<u64>) -> u64 {
        rand::Rng::gen_range(self, range)
    }
}

impl Dice for DeterministicDice {
    fn roll(&mut self, range: std::ops::Range<u64>) -> u64 {
        let out = if let Some((lo, hi, v)) = self.data.get(self.index) {
            assert!(*lo == range.start);
            assert!(*hi == range.end);
            assert!(*v >= range.start);
            assert!(*v < range.end);
            *v
        } else {
            self.data.push((range.start, range.end, range.start));
            range.start
        };
        self.index += 1;
        out
    }
}
