//! The hidden polynomial.
//!
//! A `RootFunction` is `f(x) = (x - r_1)(x - r_2)...(x - r_n)` for a sorted
//! list of integer roots drawn from a bounded domain. It is immutable once
//! created; each round gets a new one.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::GameRng;

/// Inline capacity for the root list. Default settings draw at most 9 roots.
pub type Roots = SmallVec<[i64; 16]>;

/// Polynomial with integer roots, evaluated as a product of linear factors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootFunction {
    roots: Roots,
    lower_bound: i64,
    upper_bound: i64,
}

impl RootFunction {
    /// Draw `num_roots` independent uniform roots in `[lower_bound, upper_bound]`.
    ///
    /// Duplicates are allowed. Roots are stored in ascending order.
    pub fn create(num_roots: u32, lower_bound: i64, upper_bound: i64, rng: &mut GameRng) -> Self {
        let roots = (0..num_roots).map(|_| rng.gen_range_i64(lower_bound..=upper_bound));
        Self::from_roots(roots, lower_bound, upper_bound)
    }

    /// Build a function from known roots.
    pub fn from_roots(roots: impl IntoIterator<Item = i64>, lower_bound: i64, upper_bound: i64) -> Self {
        let mut roots: Roots = roots.into_iter().collect();
        roots.sort_unstable();
        Self {
            roots,
            lower_bound,
            upper_bound,
        }
    }

    /// Roots in ascending order, duplicates included.
    #[must_use]
    pub fn roots(&self) -> &[i64] {
        &self.roots
    }

    #[must_use]
    pub fn lower_bound(&self) -> i64 {
        self.lower_bound
    }

    #[must_use]
    pub fn upper_bound(&self) -> i64 {
        self.upper_bound
    }

    /// Whether `x` lies inside the guessing domain.
    #[must_use]
    pub fn in_domain(&self, x: i64) -> bool {
        (self.lower_bound..=self.upper_bound).contains(&x)
    }

    /// `f(x)`, the product of `(x - root)` over every root.
    ///
    /// Settings validation keeps `|f(x)|` inside `i128` for in-domain `x`;
    /// outside that the product saturates.
    #[must_use]
    pub fn evaluate(&self, x: i64) -> i128 {
        self.roots.iter().fold(1i128, |product, &root| {
            product.saturating_mul(i128::from(x) - i128::from(root))
        })
    }
}
