//! Random word removal.
//!
//! For `n` tokens the sampler performs `n / 10` draws of a uniformly random
//! position. Draw `i` replaces the token at the drawn position with
//! `Token::Marker(i)` and records the removed word under key `i`. A draw that
//! lands on a position already replaced by an earlier draw is skipped, so
//! fewer words may be removed and the record keys may have holes.

use std::collections::BTreeMap;

use rand::Rng;

use crate::tokenize::Token;

/// Average number of tokens per removal.
pub const WORDS_PER_REMOVAL: usize = 10;

/// Words removed from one paragraph, keyed by removal slot.
pub type RemovalRecord = BTreeMap<usize, String>;

/// Removes a random sample of tokens, replacing them with markers.
///
/// # Example
///
/// ```rust
/// use lacuna_core::sampler::sample;
/// use lacuna_core::tokenize::tokenize;
///
/// let mut tokens = tokenize("one two three four five six seven eight nine ten").unwrap();
/// let removed = sample(&mut tokens, &mut rand::rng());
///
/// assert_eq!(removed.len(), 1);
/// assert_eq!(tokens.iter().filter(|t| t.is_marker()).count(), 1);
/// ```
pub fn sample<R: Rng + ?Sized>(tokens: &mut [Token], rng: &mut R) -> RemovalRecord {
    sample_with(tokens, |len| rng.random_range(0..len))
}

/// Removes tokens at the positions returned by `draw`.
///
/// `draw` receives the token count and must return an index below it.
pub fn sample_with<F>(tokens: &mut [Token], mut draw: F) -> RemovalRecord
where
    F: FnMut(usize) -> usize,
{
    let len = tokens.len();
    let mut removed = RemovalRecord::new();

    for slot in 0..len / WORDS_PER_REMOVAL {
        let index = draw(len);
        let Some(token) = tokens.get_mut(index) else {
            continue;
        };
        if token.is_marker() {
            continue;
        }

        let original = std::mem::replace(token, Token::Marker(slot));
        removed.insert(slot, original.to_string());
    }

    removed
}
