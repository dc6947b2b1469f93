use crate::rng::PseudoRandomNumberGenerator;

/// Returns whether a random event with probability `numerator / denominator` occurs.
pub fn chance(
    prng: &mut dyn PseudoRandomNumberGenerator,
    numerator: u64,
    denominator: u64,
) -> bool {
    prng.next().rem_euclid(denominator.max(1)) < numerator
}

/// Returns a random integer in the range `[min, max)`.
///
/// An empty range returns `min` without consuming a value.
pub fn range(prng: &mut dyn PseudoRandomNumberGenerator, min: u64, max: u64) -> u64 {
    if max <= min {
        return min;
    }
    prng.next().rem_euclid(max - min) + min
}

/// Returns a random element from the given slice.
pub fn sample_slice<'a, T>(
    prng: &mut dyn PseudoRandomNumberGenerator,
    slice: &'a [T],
) -> Option<&'a T> {
    match slice.len() {
        0 => None,
        1 => slice.first(),
        len => slice.get(range(prng, 0, len as u64) as usize),
    }
}

/// Fisher-Yates shuffle.
pub fn shuffle<T>(prng: &mut dyn PseudoRandomNumberGenerator, items: &mut [T]) {
    let len = items.len() as u64;
    for start in 0..len.saturating_sub(1) {
        let next = range(prng, start, len);
        items.swap(start as usize, next as usize);
    }
}
