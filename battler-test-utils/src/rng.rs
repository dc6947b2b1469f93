use std::any::Any;

use ahash::{
    HashMap,
    HashMapExt,
};
use battler_engine::{
    battle::CoreBattle,
    rng::{
        PseudoRandomNumberGenerator,
        RealPseudoRandomNumberGenerator,
    },
};

/// A random number generator whose values can be replaced at chosen points in the sequence.
///
/// The underlying generator is always rolled, so replacing a value never shifts the values after
/// it.
pub struct ControlledRandomNumberGenerator {
    drawn: usize,
    overrides: HashMap<usize, u64>,
    inner: RealPseudoRandomNumberGenerator,
}

impl ControlledRandomNumberGenerator {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            drawn: 0,
            overrides: HashMap::new(),
            inner: RealPseudoRandomNumberGenerator::new(seed),
        }
    }

    /// How many values have been drawn so far.
    pub fn sequence_count(&self) -> usize {
        self.drawn
    }

    /// Replaces the value drawn at an absolute position. The first value drawn is `1`.
    pub fn insert_fake_value(&mut self, position: usize, value: u64) {
        self.overrides.insert(position, value);
    }

    /// Replaces values relative to the current position: `1` is the next value drawn.
    pub fn insert_fake_values_relative_to_sequence_count<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = (usize, u64)>,
    {
        let drawn = self.drawn;
        self.overrides.extend(
            values
                .into_iter()
                .map(|(offset, value)| (drawn + offset, value)),
        );
    }
}

impl PseudoRandomNumberGenerator for ControlledRandomNumberGenerator {
    fn initial_seed(&self) -> u64 {
        self.inner.initial_seed()
    }

    fn next(&mut self) -> u64 {
        let real = self.inner.next();
        self.drawn += 1;
        self.overrides.remove(&self.drawn).unwrap_or(real)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// The battle's generator, if the battle was built with a [`ControlledRandomNumberGenerator`].
pub fn get_controlled_rng_for_battle(
    battle: &mut CoreBattle,
) -> Option<&mut ControlledRandomNumberGenerator> {
    battle
        .prng_mut()
        .as_any_mut()
        .downcast_mut::<ControlledRandomNumberGenerator>()
}

#[cfg(test)]
mod rng_test {
    use battler_engine::rng::{
        PseudoRandomNumberGenerator,
        RealPseudoRandomNumberGenerator,
    };
    use pretty_assertions::assert_eq;

    use crate::ControlledRandomNumberGenerator;

    #[test]
    fn replaces_only_chosen_values() {
        let mut real = RealPseudoRandomNumberGenerator::new(Some(7));
        let mut controlled = ControlledRandomNumberGenerator::new(Some(7));
        controlled.insert_fake_values_relative_to_sequence_count([(2, 99)]);
        let expected = (0..3).map(|_| real.next()).collect::<Vec<_>>();
        let got = (0..3).map(|_| controlled.next()).collect::<Vec<_>>();
        assert_eq!(got, vec![expected[0], 99, expected[2]]);
        assert_eq!(controlled.sequence_count(), 3);
    }
}
