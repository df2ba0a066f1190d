use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::PipelineError;

/// Seeded when `seed` is given, otherwise drawn from OS entropy.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Draw exactly `amount` items uniformly without replacement.
///
/// Picked items keep their relative input order. Fails rather than returning
/// a short sample.
pub fn sample<T, R: Rng + ?Sized>(
    items: Vec<T>,
    amount: usize,
    rng: &mut R,
) -> Result<Vec<T>, PipelineError> {
    if items.len() < amount {
        return Err(PipelineError::SampleSize {
            requested: amount,
            available: items.len(),
        });
    }
    let mut picked = rand::seq::index::sample(rng, items.len(), amount).into_vec();
    picked.sort_unstable();

    let mut wanted = picked.into_iter().peekable();
    let mut out = Vec::with_capacity(amount);
    for (i, item) in items.into_iter().enumerate() {
        if wanted.peek() == Some(&i) {
            out.push(item);
            wanted.next();
        }
    }
    Ok(out)
}
