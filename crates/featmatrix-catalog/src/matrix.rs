//! Combination enumeration.
//!
//! The matrix proper is a mixed-radix counter: one digit per independent
//! flag (radix 2) followed by one digit per alternative group (radix
//! `choices + 1`), digit `0` meaning "absent". The first digit varies slowest.

use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

use crate::catalog::FlagCatalog;
use crate::combination::{Combination, CombinationKind};

/// Which axes of the catalog are expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixScope {
    /// Independent flags only; every alternative group stays absent.
    #[default]
    Reduced,
    /// Every independent flag and every alternative group.
    Full,
}

/// Lazy, exact-size iterator over the combinations of a catalog.
///
/// Yields the baseline smoke combination first, then every matrix tuple in
/// counter order. Not restartable; call [`FlagCatalog::matrix`] again for a
/// fresh pass.
#[derive(Debug, Clone)]
pub struct Matrix<'a> {
    catalog: &'a FlagCatalog,
    radices: Vec<usize>,
    digits: Vec<usize>,
    baseline_pending: bool,
    remaining: usize,
}

impl<'a> Matrix<'a> {
    pub(crate) fn new(catalog: &'a FlagCatalog, scope: MatrixScope) -> Self {
        let independent = std::iter::repeat_n(2, catalog.independent().len());
        let groups = catalog.groups().iter().map(|g| match scope {
            MatrixScope::Full => g.len() + 1,
            MatrixScope::Reduced => 1,
        });
        let radices: Vec<usize> = independent.chain(groups).collect();
        let remaining = catalog.combination_count(scope) - 1;

        tracing::debug!(?scope, axes = radices.len(), combinations = remaining + 1, "enumerating feature matrix");

        Self { catalog, digits: vec![0; radices.len()], radices, baseline_pending: true, remaining }
    }

    fn baseline_tokens(&self) -> Vec<String> {
        self.catalog.baseline().iter().map(|f| f.as_str().to_owned()).collect()
    }

    fn decode(&self) -> Combination {
        let mut tokens = self.baseline_tokens();
        let split = self.catalog.independent().len();

        for (flag, &digit) in self.catalog.independent().iter().zip(&self.digits[..split]) {
            if digit == 1 {
                tokens.push(flag.as_str().to_owned());
            }
        }
        for (group, &digit) in self.catalog.groups().iter().zip(&self.digits[split..]) {
            if let Some(choice) = digit.checked_sub(1).and_then(|i| group.choices().get(i)) {
                tokens.push(choice.as_str().to_owned());
            }
        }

        Combination::new(CombinationKind::Matrix, tokens)
    }

    fn advance(&mut self) {
        for (digit, &radix) in self.digits.iter_mut().zip(&self.radices).rev() {
            *digit += 1;
            if *digit < radix {
                return;
            }
            *digit = 0;
        }
    }
}

impl Iterator for Matrix<'_> {
    type Item = Combination;

    fn next(&mut self) -> Option<Combination> {
        if self.baseline_pending {
            self.baseline_pending = false;
            return Some(Combination::new(CombinationKind::Baseline, self.baseline_tokens()));
        }
        if self.remaining == 0 {
            return None;
        }
        let combination = self.decode();
        self.remaining -= 1;
        self.advance();
        Some(combination)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.remaining + usize::from(self.baseline_pending);
        (len, Some(len))
    }
}

impl ExactSizeIterator for Matrix<'_> {}

impl FusedIterator for Matrix<'_> {}
