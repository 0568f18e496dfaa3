use crate::TILE_COUNT;
use rand::{
    Rng,
    SeedableRng,
    rngs::StdRng,
    seq::SliceRandom,
};

/// Order in which the tick driver visits the tiles during one roll.
///
/// Always a permutation of `0..TILE_COUNT`; the only ways to build one are
/// [`RollCycle::from_order`], which validates, and [`Shuffler`] implementations,
/// which shuffle the identity order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RollCycle([usize; TILE_COUNT]);

impl RollCycle {
    pub fn identity() -> Self {
        RollCycle(std::array::from_fn(|i| i))
    }

    /// Returns `None` unless `order` holds every tile index exactly once.
    pub fn from_order(order: [usize; TILE_COUNT]) -> Option<Self> {
        let mut seen = [false; TILE_COUNT];
        for &idx in &order {
            if idx >= TILE_COUNT || seen[idx] {
                return None;
            }
            seen[idx] = true;
        }
        Some(RollCycle(order))
    }

    /// Tile at `cursor`, wrapping around the end of the cycle.
    pub fn at(&self, cursor: usize) -> usize {
        self.0[cursor % TILE_COUNT]
    }

    pub fn order(&self) -> &[usize; TILE_COUNT] {
        &self.0
    }
}

impl Default for RollCycle {
    fn default() -> Self {
        Self::identity()
    }
}

pub trait Shuffler {
    /// produce a fresh cycle for the next roll
    fn shuffle(&mut self) -> RollCycle;
}

/// Fisher-Yates over the identity order, driven by any `rand` generator.
#[derive(Debug)]
pub struct RngShuffler<R = StdRng> {
    rng: R,
}

impl RngShuffler<StdRng> {
    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> RngShuffler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Shuffler for RngShuffler<R> {
    fn shuffle(&mut self) -> RollCycle {
        let mut order = RollCycle::identity().0;
        order.shuffle(&mut self.rng);
        RollCycle(order)
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    #[test]
    fn from_order__rejects_repeated_index() {
        assert!(RollCycle::from_order([0, 1, 2, 3, 4, 5, 6, 7, 7]).is_none());
    }

    #[test]
    fn from_order__rejects_out_of_range_index() {
        assert!(RollCycle::from_order([0, 1, 2, 3, 4, 5, 6, 7, 9]).is_none());
    }

    #[test]
    fn from_order__accepts_permutation() {
        let order = [8, 7, 6, 5, 4, 3, 2, 1, 0];
        let cycle = RollCycle::from_order(order).unwrap();
        assert_eq!(cycle.order(), &order);
    }

    #[test]
    fn at__wraps_past_the_last_slot() {
        let cycle = RollCycle::from_order([3, 1, 4, 0, 5, 2, 6, 8, 7]).unwrap();
        assert_eq!(cycle.at(0), 3);
        assert_eq!(cycle.at(8), 7);
        assert_eq!(cycle.at(9), 3);
        assert_eq!(cycle.at(19), 1);
    }

    #[test]
    fn shuffle__same_seed_gives_same_sequence() {
        let mut a = RngShuffler::from_seed(42);
        let mut b = RngShuffler::from_seed(42);
        for _ in 0..10 {
            assert_eq!(a.shuffle(), b.shuffle());
        }
    }

    #[test]
    fn shuffle__output_is_a_valid_cycle() {
        let mut shuffler = RngShuffler::from_seed(7);
        for _ in 0..100 {
            let cycle = shuffler.shuffle();
            assert!(RollCycle::from_order(*cycle.order()).is_some());
        }
    }
}
