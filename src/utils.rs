//! Utility functions for the MENACE crate

use crate::ports::DrawSource;

/// Calculate Shannon entropy (natural log) of a probability distribution.
///
/// Zero probabilities contribute nothing.
///
/// ```
/// use matchbox_menace::utils::shannon_entropy;
///
/// let entropy = shannon_entropy(vec![0.5, 0.5]);
/// assert!((entropy - std::f64::consts::LN_2).abs() < 1e-9);
/// ```
pub fn shannon_entropy<I>(probabilities: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    probabilities
        .into_iter()
        .filter(|&p| p > 0.0)
        .map(|p| -p * p.ln())
        .sum()
}

/// Entropy of a weight vector after normalizing it.
///
/// Returns 0.0 when the total weight is not positive.
pub fn entropy_from_weights<I>(weights: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let weights: Vec<f64> = weights.into_iter().collect();
    let total: f64 = weights.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return 0.0;
    }
    shannon_entropy(weights.into_iter().map(|w| w / total))
}

/// Draw one item with probability proportional to its integer weight.
///
/// A single ticket in `0..total` is taken from `draws` and the items are
/// walked in slice order, subtracting each weight until the ticket falls
/// inside one. Returns `None` for an empty slice or a zero total weight.
///
/// ```
/// use matchbox_menace::{adapters::ScriptedDraws, utils::weighted_sample};
///
/// let mut draws = ScriptedDraws::new(vec![4]);
/// // tickets 0..3 pick position 1, 3..5 pick position 7
/// assert_eq!(weighted_sample(&mut draws, &[(1, 3), (7, 2)]), Some(7));
/// ```
pub fn weighted_sample<D>(draws: &mut D, items: &[(usize, u32)]) -> Option<usize>
where
    D: DrawSource + ?Sized,
{
    let total = items
        .iter()
        .try_fold(0u32, |acc, &(_, weight)| acc.checked_add(weight))?;
    if total == 0 {
        return None;
    }

    let mut ticket = draws.draw_below(total);
    for &(item, weight) in items {
        if ticket < weight {
            return Some(item);
        }
        ticket -= weight;
    }

    items.iter().rev().find(|(_, w)| *w > 0).map(|&(item, _)| item)
}
