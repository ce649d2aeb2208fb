//! Fisher-Yates shuffling, in place and out of place.
//!
//! Both variants produce a uniformly random permutation: each of the n!
//! orderings is equally likely, given an independent uniform source.
//!
//! Reference: Knuth (1997), *TAOCP* Vol. 2, §3.4.2, Algorithm P.

use crate::random::{index_below, UniformSource};

/// Fisher-Yates (Durstenfeld) in-place shuffle.
///
/// Iterates `i` from `n - 1` down to `1`, swapping position `i` with a
/// uniformly chosen `j` in `0..=i`. Performs exactly `n - 1` draws and swaps,
/// none for `n <= 1`. Returns the slice it was given.
///
/// # Complexity
/// Time: O(n), Space: O(1)
///
/// # Examples
/// ```
/// use u_sampling::random::create_rng;
/// use u_sampling::shuffle::shuffle_in_place;
/// let mut v = vec![1, 2, 3, 4, 5];
/// let mut rng = create_rng(42);
/// shuffle_in_place(&mut v, &mut rng);
/// // v is now a permutation of [1, 2, 3, 4, 5]
/// v.sort();
/// assert_eq!(v, vec![1, 2, 3, 4, 5]);
/// ```
pub fn shuffle_in_place<'a, T, S>(slice: &'a mut [T], source: &mut S) -> &'a mut [T]
where
    S: UniformSource + ?Sized,
{
    let n = slice.len();
    if n <= 1 {
        return slice;
    }
    for i in (1..n).rev() {
        let j = index_below(source, i + 1);
        slice.swap(i, j);
    }
    slice
}

/// Out-of-place shuffle that consumes its input.
///
/// Repeatedly picks a uniformly random element from the shrinking working
/// set, removes it, and appends it to a new vector. Exactly `n` draws.
///
/// # Complexity
/// Time: O(n), Space: O(n)
///
/// # Examples
/// ```
/// use u_sampling::random::create_rng;
/// use u_sampling::shuffle::shuffled;
/// let mut rng = create_rng(3);
/// let out = shuffled(vec!["cat", "dog", "fish"], &mut rng);
/// assert_eq!(out.len(), 3);
/// ```
pub fn shuffled<T, S>(items: Vec<T>, source: &mut S) -> Vec<T>
where
    S: UniformSource + ?Sized,
{
    let mut working = items;
    let mut out = Vec::with_capacity(working.len());
    while !working.is_empty() {
        let j = index_below(source, working.len());
        // Order within the working set does not matter; every remaining
        // element stays equally likely to be drawn next.
        out.push(working.swap_remove(j));
    }
    out
}

/// Out-of-place shuffle of a borrowed slice.
///
/// The caller's slice is left untouched; elements are cloned first.
///
/// # Examples
/// ```
/// use u_sampling::random::create_rng;
/// use u_sampling::shuffle::shuffled_from;
/// let original = [10, 20, 30, 40];
/// let mut rng = create_rng(8);
/// let mut out = shuffled_from(&original, &mut rng);
/// out.sort();
/// assert_eq!(out, original);
/// ```
pub fn shuffled_from<T, S>(items: &[T], source: &mut S) -> Vec<T>
where
    T: Clone,
    S: UniformSource + ?Sized,
{
    shuffled(items.to_vec(), source)
}

/// Returns a shuffled index permutation of `[0, n)`.
///
/// Useful when you need to iterate over data in random order without
/// moving or cloning it.
///
/// # Complexity
/// Time: O(n), Space: O(n)
///
/// # Examples
/// ```
/// use u_sampling::random::create_rng;
/// use u_sampling::shuffle::shuffled_indices;
/// let mut rng = create_rng(42);
/// let indices = shuffled_indices(5, &mut rng);
/// let mut sorted = indices.clone();
/// sorted.sort();
/// assert_eq!(sorted, vec![0, 1, 2, 3, 4]);
/// ```
pub fn shuffled_indices<S: UniformSource + ?Sized>(n: usize, source: &mut S) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    shuffle_in_place(&mut indices, source);
    indices
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use crate::random::testing::ScriptedSource;
    use std::collections::HashMap;

    /// Chi-square statistic of observed counts against a uniform expectation.
    fn chi_square(counts: &HashMap<Vec<u8>, u32>, categories: usize, trials: u32) -> f64 {
        let expected = trials as f64 / categories as f64;
        let observed: f64 = counts
            .values()
            .map(|&c| (c as f64 - expected).powi(2) / expected)
            .sum();
        // Categories never observed contribute `expected` each.
        observed + (categories - counts.len()) as f64 * expected
    }

    #[test]
    fn test_in_place_preserves_elements() {
        let mut v = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let mut rng = create_rng(123);
        shuffle_in_place(&mut v, &mut rng);
        v.sort();
        assert_eq!(v, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_in_place_returns_same_slice() {
        let mut v = vec!['a', 'b', 'c', 'd'];
        let addr = v.as_ptr();
        let mut rng = create_rng(5);
        let out = shuffle_in_place(&mut v, &mut rng);
        assert_eq!(out.as_ptr(), addr);
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn test_in_place_empty() {
        let mut v: Vec<i32> = vec![];
        let mut src = ScriptedSource::new(&[0.5]);
        assert!(shuffle_in_place(&mut v, &mut src).is_empty());
        assert_eq!(src.calls, 0);
    }

    #[test]
    fn test_in_place_single() {
        let mut v = vec![42];
        let mut src = ScriptedSource::new(&[0.5]);
        shuffle_in_place(&mut v, &mut src);
        assert_eq!(v, vec![42]);
        assert_eq!(src.calls, 0);
    }

    #[test]
    fn test_in_place_draw_count() {
        let mut v: Vec<usize> = (0..7).collect();
        let mut src = ScriptedSource::new(&[0.3, 0.9, 0.1]);
        shuffle_in_place(&mut v, &mut src);
        assert_eq!(src.calls, 6);
    }

    #[test]
    fn test_in_place_scripted_swaps() {
        // i=2: j=floor(0.0*3)=0 -> [c,b,a]; i=1: j=floor(0.0*2)=0 -> [b,c,a]
        let mut v = vec!['a', 'b', 'c'];
        let mut src = ScriptedSource::new(&[0.0]);
        shuffle_in_place(&mut v, &mut src);
        assert_eq!(v, vec!['b', 'c', 'a']);

        // Draws just below 1 always pick j=i: identity.
        let mut v = vec!['a', 'b', 'c'];
        let mut src = ScriptedSource::new(&[0.999]);
        shuffle_in_place(&mut v, &mut src);
        assert_eq!(v, vec!['a', 'b', 'c']);
    }

    #[test]
    fn test_in_place_actually_shuffles() {
        // With 10 elements, probability of identity permutation is 1/10! ≈ 2.8e-7
        let original = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let mut v = original.clone();
        let mut rng = create_rng(42);
        shuffle_in_place(&mut v, &mut rng);
        assert_ne!(v, original, "shuffle should change order (probabilistic)");
    }

    #[test]
    fn test_in_place_uniform_over_permutations() {
        let mut rng = create_rng(31337);
        let trials = 60_000;
        let mut counts: HashMap<Vec<u8>, u32> = HashMap::new();
        for _ in 0..trials {
            let mut v = vec![0_u8, 1, 2];
            shuffle_in_place(&mut v, &mut rng);
            *counts.entry(v).or_insert(0) += 1;
        }
        assert_eq!(counts.len(), 6);
        // df = 5, critical value at alpha = 0.001 is 20.515
        let stat = chi_square(&counts, 6, trials);
        assert!(stat < 20.515, "chi-square {stat} too large: {counts:?}");
    }

    #[test]
    fn test_shuffled_uniform_over_permutations() {
        let mut rng = create_rng(4242);
        let trials = 60_000;
        let mut counts: HashMap<Vec<u8>, u32> = HashMap::new();
        for _ in 0..trials {
            let v = shuffled(vec![0_u8, 1, 2], &mut rng);
            *counts.entry(v).or_insert(0) += 1;
        }
        assert_eq!(counts.len(), 6);
        let stat = chi_square(&counts, 6, trials);
        assert!(stat < 20.515, "chi-square {stat} too large: {counts:?}");
    }

    #[test]
    fn test_shuffled_draw_count() {
        let mut src = ScriptedSource::new(&[0.25]);
        let out = shuffled(vec![1, 2, 3, 4], &mut src);
        assert_eq!(src.calls, 4);
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn test_shuffled_scripted_order() {
        // working [a,b,c,d], j=floor(0.0*4)=0 -> a, working [d,b,c]
        // j=0 -> d, working [c,b]; j=0 -> c; then b
        let mut src = ScriptedSource::new(&[0.0]);
        let out = shuffled(vec!['a', 'b', 'c', 'd'], &mut src);
        assert_eq!(out, vec!['a', 'd', 'c', 'b']);
    }

    #[test]
    fn test_shuffled_empty_and_single() {
        let mut rng = create_rng(0);
        assert!(shuffled(Vec::<i32>::new(), &mut rng).is_empty());
        assert_eq!(shuffled(vec!["only"], &mut rng), vec!["only"]);
    }

    #[test]
    fn test_shuffled_from_leaves_input() {
        let original = vec![String::from("x"), String::from("y"), String::from("z")];
        let retained = original.clone();
        let mut rng = create_rng(11);
        let mut out = shuffled_from(&original, &mut rng);
        assert_eq!(original, retained);
        // The output owns fresh allocations, not the caller's strings.
        for (a, b) in out.iter().zip(&original) {
            assert_ne!(a.as_ptr(), b.as_ptr());
        }
        out.sort();
        assert_eq!(out, retained);
    }

    #[test]
    fn test_shuffled_indices() {
        let mut rng = create_rng(42);
        let indices = shuffled_indices(10, &mut rng);
        assert_eq!(indices.len(), 10);
        let mut sorted = indices.clone();
        sorted.sort();
        assert_eq!(sorted, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_works_with_dyn_source() {
        let mut rng = create_rng(6);
        let source: &mut dyn UniformSource = &mut rng;
        let mut v = vec![1, 2, 3];
        shuffle_in_place(&mut v, source);
        v.sort();
        assert_eq!(v, vec![1, 2, 3]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn shuffle_in_place_is_permutation(
            seed in 0_u64..10000,
            data in proptest::collection::vec(0_i32..1000, 0..50),
        ) {
            let mut shuffled = data.clone();
            let mut rng = create_rng(seed);
            shuffle_in_place(&mut shuffled, &mut rng);
            let mut sorted_orig = data.clone();
            let mut sorted_shuf = shuffled;
            sorted_orig.sort();
            sorted_shuf.sort();
            prop_assert_eq!(sorted_orig, sorted_shuf);
        }

        #[test]
        fn shuffled_is_permutation(
            seed in 0_u64..10000,
            data in proptest::collection::vec(0_i32..1000, 0..50),
        ) {
            let mut rng = create_rng(seed);
            let mut out = shuffled(data.clone(), &mut rng);
            let mut sorted_orig = data;
            sorted_orig.sort();
            out.sort();
            prop_assert_eq!(sorted_orig, out);
        }
    }
}
