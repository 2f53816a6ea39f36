//! Active-source filter: which definitions take part in an evaluation.

use crate::definition::QueryDefinition;
use crate::source::RemoteSource;

/// Enabled subset of a definition list, in list order.
pub struct ActiveSources<'d, 'a, K, E> {
    /// Sources of the enabled definitions, for a scheduler that must await
    /// them.
    pub sources: Vec<&'a dyn RemoteSource<Error = E>>,
    /// The enabled definitions themselves, for the validation pass.
    pub active: Vec<&'d QueryDefinition<'a, K, E>>,
}

/// Stable partition of `defs` into the definitions that participate.
///
/// Disabled definitions are dropped from both views.
pub fn filter_active<'d, 'a, K, E>(
    defs: &'d [QueryDefinition<'a, K, E>],
) -> ActiveSources<'d, 'a, K, E> {
    let active: Vec<_> = defs.iter().filter(|def| def.is_enabled()).collect();
    let sources = active.iter().map(|def| def.source()).collect();
    ActiveSources { sources, active }
}

impl<'d, 'a, K, E> ActiveSources<'d, 'a, K, E> {
    pub fn keys(&self) -> impl Iterator<Item = &'d K> + '_ {
        self.active.iter().map(|&def| def.key())
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// No active source is still waiting for its first load.
    pub fn is_settled(&self) -> bool {
        !self.sources.iter().any(|source| source.is_pending())
    }

    pub fn readiness(&self) -> Readiness {
        Readiness::observe(self.sources.iter().copied())
    }
}

/// Aggregate fetch state over a set of sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readiness {
    /// Every source holds data (vacuously true for no sources).
    pub has_data: bool,
    /// At least one source is pending.
    pub is_pending: bool,
    /// At least one source is fetching.
    pub is_fetching: bool,
}

impl Readiness {
    pub fn observe<'s, S>(sources: impl IntoIterator<Item = &'s S>) -> Self
    where
        S: RemoteSource + ?Sized + 's,
    {
        sources.into_iter().fold(
            Readiness {
                has_data: true,
                is_pending: false,
                is_fetching: false,
            },
            |acc, source| Readiness {
                has_data: acc.has_data && source.has_data(),
                is_pending: acc.is_pending || source.is_pending(),
                is_fetching: acc.is_fetching || source.is_fetching(),
            },
        )
    }

    /// Whether a loading directive must be reported instead of validating.
    ///
    /// Pending always blocks. A fetch in flight blocks only with
    /// `loader_on_fetch` and only while some source has never delivered data;
    /// otherwise cached data is validated while the refresh runs.
    pub fn blocks(&self, loader_on_fetch: bool) -> bool {
        self.is_pending || (loader_on_fetch && self.is_fetching && !self.has_data)
    }
}
