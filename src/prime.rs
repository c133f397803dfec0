//! Prime table sizing for hash indexes.
//!
//! Capacities come from a curated ascending table of primes `p` where
//! `p - 1` is not a multiple of [`HASH_PRIME`]. Above the table the search
//! falls back to scanning odd candidates.

/// Multiplier whose multiples are excluded from `p - 1`.
pub const HASH_PRIME: usize = 101;

/// Largest capacity ever handed out. Prime.
pub const MAX_PRIME_LENGTH: usize = 0x7FEF_FFFD;

/// Curated table; roughly 1.2× apart.
const PRIMES: [usize; 72] = [
    3, 7, 11, 17, 23, 29, 37, 47, 59, 71, 89, 107, 131, 163, 197, 239, 293, 353, 431, 521, 631,
    761, 919, 1103, 1327, 1597, 1931, 2333, 2801, 3371, 4049, 4861, 5839, 7013, 8419, 10103,
    12143, 14591, 17519, 21023, 25229, 30293, 36353, 43627, 52361, 62851, 75431, 90523, 108631,
    130363, 156437, 187751, 225307, 270371, 324449, 389357, 467237, 560689, 672827, 807403,
    968897, 1162687, 1395263, 1674319, 2009191, 2411033, 2893249, 3471899, 4166287, 4999559,
    5999471, 7199369,
];

/// Trial division up to `√n`.
#[must_use]
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let limit = n.isqrt();
    (3..=limit).step_by(2).all(|divisor| n % divisor != 0)
}

/// Smallest table size `>= min`, capped at [`MAX_PRIME_LENGTH`].
///
/// Past the curated table, returns the first odd prime `p >= min` with
/// `(p - 1) % HASH_PRIME != 0`. The result is always prime.
#[must_use]
pub fn next_prime(min: usize) -> usize {
    let pos = PRIMES.partition_point(|&p| p < min);
    if let Some(&p) = PRIMES.get(pos) {
        return p;
    }
    let mut candidate = min | 1;
    while candidate < MAX_PRIME_LENGTH {
        if is_prime(candidate) && (candidate - 1) % HASH_PRIME != 0 {
            return candidate;
        }
        candidate += 2;
    }
    MAX_PRIME_LENGTH
}

/// Growth target for a table of `old` capacity: the next size at least
/// double, capped at [`MAX_PRIME_LENGTH`].
///
/// Returns `MAX_PRIME_LENGTH` itself once `old` has reached it, so callers
/// must treat a result `<= old` as "cannot grow".
#[must_use]
pub fn expand(old: usize) -> usize {
    let doubled = old.saturating_mul(2);
    if doubled >= MAX_PRIME_LENGTH {
        return MAX_PRIME_LENGTH;
    }
    next_prime(doubled)
}

/// Largest prime `<= max`, if any.
#[must_use]
pub fn prev_prime(max: usize) -> Option<usize> {
    (2..=max).rev().find(|&n| is_prime(n))
}
