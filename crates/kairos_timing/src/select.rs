//! Ranking paths by cumulative delay.

use crate::path::Path;
use serde::Serialize;

/// Which end of the delay ranking to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Largest delay first (setup analysis).
    Longest,
    /// Smallest delay first (hold analysis).
    Shortest,
}

/// Returns the `n` paths with the most extreme delay in `direction`.
///
/// The sort is stable, so equal delays keep enumeration order. Asking for
/// more paths than exist returns all of them.
pub fn select_paths<'p, 'c>(
    paths: &'p [Path<'c>],
    n: usize,
    direction: Direction,
) -> Vec<&'p Path<'c>> {
    let mut ranked: Vec<(f64, &'p Path<'c>)> = paths.iter().map(|p| (p.delay(), p)).collect();
    match direction {
        Direction::Longest => ranked.sort_by(|a, b| b.0.total_cmp(&a.0)),
        Direction::Shortest => ranked.sort_by(|a, b| a.0.total_cmp(&b.0)),
    }
    ranked.into_iter().take(n).map(|(_, path)| path).collect()
}
