//! Uniform random draws without replacement.

use crate::error::DrawError;
use crate::model::Card;
use rand::Rng;

/// Parse the draw-count input. Anything but a positive integer is rejected.
pub fn parse_draw_count(input: &str) -> Result<usize, DrawError> {
    match input.trim().parse::<usize>() {
        Ok(0) | Err(_) => Err(DrawError::InvalidCount),
        Ok(n) => Ok(n),
    }
}

/// Check a requested count against the pool size.
pub fn validate_draw(pool_len: usize, count: usize) -> Result<usize, DrawError> {
    if count == 0 {
        Err(DrawError::InvalidCount)
    } else if pool_len == 0 {
        Err(DrawError::EmptyPool)
    } else if count > pool_len {
        Err(DrawError::ExceedsPool { max: pool_len })
    } else {
        Ok(count)
    }
}

/// Pick `count` distinct positions of a `len`-element sequence.
///
/// Each round removes a uniformly chosen entry from the remaining positions,
/// so every ordered selection is equally likely.
pub fn sample_indices<R: Rng>(len: usize, count: usize, rng: &mut R) -> Vec<usize> {
    let mut remaining: Vec<usize> = (0..len).collect();
    let mut picked = Vec::with_capacity(count.min(len));
    for _ in 0..count {
        if remaining.is_empty() {
            break;
        }
        let i = rng.random_range(0..remaining.len());
        picked.push(remaining.remove(i));
    }
    picked
}

/// Draw `count` distinct cards from `pool`. The pool itself is not touched.
pub fn draw<R: Rng>(
    pool: &[Card],
    count: usize,
    rng: &mut R,
) -> Result<Vec<Card>, DrawError> {
    let count = validate_draw(pool.len(), count)?;
    Ok(sample_indices(pool.len(), count, rng)
        .into_iter()
        .map(|i| pool[i].clone())
        .collect())
}
