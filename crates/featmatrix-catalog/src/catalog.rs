//! The static description of what a feature-matrix run must test.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Section};
use crate::flag::{Choice, Flag};
use crate::matrix::{Matrix, MatrixScope};

/// Catalog as written in configuration, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogSpec {
    /// Flags present in every combination.
    pub baseline: Vec<String>,
    /// Flags toggled on and off independently.
    pub independent: Vec<String>,
    /// Alternative groups; each inner list holds mutually exclusive choices.
    pub groups: Vec<Vec<String>>,
}

/// Mutually exclusive choices; at most one is active per combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternativeGroup {
    choices: Vec<Choice>,
}

impl AlternativeGroup {
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}

/// Validated, immutable flag catalog.
///
/// Invariant: no flag name is declared in more than one of baseline,
/// independent and the alternative groups, and none is repeated inside
/// baseline or independent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagCatalog {
    baseline: Vec<Flag>,
    independent: Vec<Flag>,
    groups: Vec<AlternativeGroup>,
    full_len: usize,
}

impl FlagCatalog {
    /// Validate a raw catalog.
    pub fn new(spec: &CatalogSpec) -> Result<Self, CatalogError> {
        let mut seen: HashMap<String, Section> = HashMap::new();

        let mut claim = |flag: &Flag, section: Section| -> Result<(), CatalogError> {
            if let Some(first) = seen.insert(flag.as_str().to_owned(), section) {
                return Err(CatalogError::DuplicateFlag {
                    flag: flag.as_str().to_owned(),
                    first,
                    second: section,
                });
            }
            Ok(())
        };

        let mut baseline = Vec::with_capacity(spec.baseline.len());
        for raw in &spec.baseline {
            let flag = Flag::parse(raw, Section::Baseline)?;
            claim(&flag, Section::Baseline)?;
            baseline.push(flag);
        }

        let mut independent = Vec::with_capacity(spec.independent.len());
        for raw in &spec.independent {
            let flag = Flag::parse(raw, Section::Independent)?;
            claim(&flag, Section::Independent)?;
            independent.push(flag);
        }

        let mut groups = Vec::with_capacity(spec.groups.len());
        for (index, raw_group) in spec.groups.iter().enumerate() {
            let section = Section::Group(index);
            let mut choices: Vec<Choice> = Vec::with_capacity(raw_group.len());
            let mut component_sets: Vec<BTreeSet<String>> = Vec::new();
            let mut group_flags: BTreeSet<Flag> = BTreeSet::new();

            for raw in raw_group {
                let choice = Choice::parse(raw, section)?;
                let components: BTreeSet<String> =
                    choice.flags().iter().map(|f| f.as_str().to_owned()).collect();
                if components.len() != choice.flags().len() {
                    // "a,a" inside one bundle
                    let flag = first_repeat(choice.flags()).unwrap_or_default();
                    return Err(CatalogError::DuplicateFlag { flag, first: section, second: section });
                }
                if component_sets.contains(&components) {
                    return Err(CatalogError::DuplicateChoice { choice: raw.clone(), section });
                }
                component_sets.push(components);
                group_flags.extend(choice.flags().iter().cloned());
                choices.push(choice);
            }

            for flag in &group_flags {
                claim(flag, section)?;
            }
            groups.push(AlternativeGroup { choices });
        }

        let full_len = matrix_len(independent.len(), groups.iter().map(AlternativeGroup::len))
            .and_then(|n| n.checked_add(1))
            .ok_or(CatalogError::MatrixTooLarge {
                independent: independent.len(),
                groups: groups.len(),
            })?;

        tracing::debug!(
            baseline = baseline.len(),
            independent = independent.len(),
            groups = groups.len(),
            combinations = full_len,
            "validated flag catalog"
        );

        Ok(Self { baseline, independent, groups, full_len })
    }

    pub fn baseline(&self) -> &[Flag] {
        &self.baseline
    }

    pub fn independent(&self) -> &[Flag] {
        &self.independent
    }

    pub fn groups(&self) -> &[AlternativeGroup] {
        &self.groups
    }

    /// Number of combinations [`Self::matrix`] yields for `scope`, baseline
    /// smoke run included.
    pub fn combination_count(&self, scope: MatrixScope) -> usize {
        match scope {
            MatrixScope::Full => self.full_len,
            // Bounded by the full count, which was checked at construction.
            MatrixScope::Reduced => (1usize << self.independent.len()) + 1,
        }
    }

    /// Lazily enumerate the combinations to test, baseline first.
    pub fn matrix(&self, scope: MatrixScope) -> Matrix<'_> {
        Matrix::new(self, scope)
    }
}

/// `2^k * prod(g_i + 1)`, or `None` on overflow.
fn matrix_len(independent: usize, group_sizes: impl Iterator<Item = usize>) -> Option<usize> {
    let mut len = 1usize.checked_shl(u32::try_from(independent).ok()?)?;
    for size in group_sizes {
        len = len.checked_mul(size.checked_add(1)?)?;
    }
    Some(len)
}

fn first_repeat(flags: &[Flag]) -> Option<String> {
    let mut seen = BTreeSet::new();
    flags.iter().find(|f| !seen.insert(f.as_str())).map(|f| f.as_str().to_owned())
}
