//! Random sampling without replacement.
//!
//! [`pick_some`] draws `count` distinct elements from a sequence by taking a
//! prefix of a uniformly random permutation. A count of exactly 1 returns the
//! bare element rather than a one-element vector; see [`Pick`].
//!
//! # Validation order
//!
//! After shuffling, a request is resolved in this order:
//!
//! 1. `count == n`: the whole permutation (this includes `n == 0`).
//! 2. `count > n` or `count < 1`: [`SampleError::CountOutOfRange`].
//! 3. `count == 1`: [`Pick::One`].
//! 4. fractional or NaN `count`: [`SampleError::NonIntegerCount`].
//! 5. otherwise the first `count` elements.
//!
//! The range check precedes the integer check, so `0.5` and `7.5` report
//! out of range while `2.5` (on five elements) reports a non-integer count.

use crate::error::SampleError;
use crate::random::UniformSource;
use crate::shuffle::shuffled;

/// A requested sample size.
///
/// Stored as `f64` so that negative and fractional requests can be expressed
/// and rejected. Every integer type and both float types convert into it.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SampleCount(f64);

impl SampleCount {
    /// The raw requested value.
    pub fn get(self) -> f64 {
        self.0
    }

    fn is_integer(self) -> bool {
        self.0.is_finite() && self.0.fract() == 0.0
    }
}

macro_rules! impl_count_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for SampleCount {
                fn from(value: $t) -> Self {
                    SampleCount(value as f64)
                }
            }
        )*
    };
}

impl_count_from!(f64, f32, i32, i64, u32, u64, usize);

/// The result of a sample: a single element or several.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pick<T> {
    /// Returned when exactly one element was requested.
    One(T),
    /// Returned for every other valid count, including the full sequence.
    Many(Vec<T>),
}

impl<T> Pick<T> {
    /// Number of elements picked.
    pub fn len(&self) -> usize {
        match self {
            Pick::One(_) => 1,
            Pick::Many(items) => items.len(),
        }
    }

    /// Returns `true` if nothing was picked (only possible from an empty input).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The single element, if this is [`Pick::One`].
    pub fn into_one(self) -> Option<T> {
        match self {
            Pick::One(item) => Some(item),
            Pick::Many(_) => None,
        }
    }

    /// Flattens either form into a vector.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Pick::One(item) => vec![item],
            Pick::Many(items) => items,
        }
    }
}

/// Draws `count` distinct elements uniformly without replacement.
///
/// The input is consumed; keep a copy if it is still needed.
///
/// # Errors
/// - [`SampleError::CountOutOfRange`] if `count < 1` or `count > n`
///   (unless `count == n`).
/// - [`SampleError::NonIntegerCount`] if `count` is in range but fractional.
///
/// # Complexity
/// Time: O(n) for the full shuffle, Space: O(n)
///
/// # Examples
/// ```
/// use u_sampling::random::create_rng;
/// use u_sampling::sample::{pick_some, Pick};
/// let mut rng = create_rng(42);
/// let animals = vec!["cat", "dog", "fish", "spider", "bee"];
///
/// let two = pick_some(animals.clone(), 2, &mut rng).unwrap();
/// assert_eq!(two.len(), 2);
///
/// let one = pick_some(animals.clone(), 1, &mut rng).unwrap();
/// assert!(matches!(one, Pick::One(_)));
///
/// assert!(pick_some(animals, 6, &mut rng).is_err());
/// ```
pub fn pick_some<T, C, S>(items: Vec<T>, count: C, source: &mut S) -> Result<Pick<T>, SampleError>
where
    C: Into<SampleCount>,
    S: UniformSource + ?Sized,
{
    let count = count.into();
    let n = items.len();
    let mut pool = shuffled(items, source);
    let requested = count.get();

    if requested == n as f64 {
        return Ok(Pick::Many(pool));
    }
    if requested > n as f64 || requested < 1.0 {
        tracing::debug!(count = requested, len = n, "sample count out of range");
        return Err(SampleError::CountOutOfRange {
            count: requested,
            len: n,
        });
    }
    if requested == 1.0 {
        return Ok(Pick::One(pool.swap_remove(0)));
    }
    if !count.is_integer() {
        tracing::debug!(count = requested, "sample count is not an integer");
        return Err(SampleError::NonIntegerCount { count: requested });
    }

    // 1 < requested < n and integral, so the cast is exact.
    pool.truncate(requested as usize);
    Ok(Pick::Many(pool))
}

/// Draws a single uniformly random element.
///
/// Equivalent to [`pick_some`] with a count of 1.
///
/// # Errors
/// [`SampleError::CountOutOfRange`] if `items` is empty.
///
/// # Examples
/// ```
/// use u_sampling::random::create_rng;
/// use u_sampling::sample::pick_one;
/// let mut rng = create_rng(1);
/// assert_eq!(pick_one(vec!["only"], &mut rng), Ok("only"));
/// assert!(pick_one(Vec::<u8>::new(), &mut rng).is_err());
/// ```
pub fn pick_one<T, S>(items: Vec<T>, source: &mut S) -> Result<T, SampleError>
where
    S: UniformSource + ?Sized,
{
    let n = items.len();
    match pick_some(items, 1, source)? {
        Pick::One(item) => Ok(item),
        // Count 1 equals n only when n == 1, which yields the full shuffle.
        Pick::Many(mut all) => all.pop().ok_or(SampleError::CountOutOfRange {
            count: 1.0,
            len: n,
        }),
    }
}

// ============================================================================
// Tests
// ============================================================================
