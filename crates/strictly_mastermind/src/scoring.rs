//! Duplicate-safe match scoring.

use super::types::{SEQL, Score, Sequence};
use tracing::instrument;

/// Compares `guess` against `secret`.
///
/// Exact matches are taken first. Each remaining guess position then claims
/// the lowest-indexed secret position holding the same digit that nothing
/// has claimed yet. Every position on either side counts at most once, so
/// repeated symbols are never double counted.
///
/// Both sequences are expected to be valid; the result for other digits is
/// still well formed but meaningless.
#[instrument(ret)]
pub fn score(secret: &Sequence, guess: &Sequence) -> Score {
    let secret = secret.digits();
    let guess = guess.digits();
    let mut secret_used = [false; SEQL];
    let mut guess_used = [false; SEQL];
    let mut exact = 0u8;
    let mut approximate = 0u8;

    for i in 0..SEQL {
        if guess[i] == secret[i] {
            exact += 1;
            secret_used[i] = true;
            guess_used[i] = true;
        }
    }

    for i in (0..SEQL).filter(|&i| !guess_used[i]) {
        let claim = (0..SEQL).find(|&j| !secret_used[j] && secret[j] == guess[i]);
        if let Some(j) = claim {
            approximate += 1;
            secret_used[j] = true;
        }
    }

    Score::new(exact, approximate)
}
