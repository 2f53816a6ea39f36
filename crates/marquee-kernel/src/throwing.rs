//! Throw-style multi-source loading.
//!
//! For call sites nested deep enough that a shared boundary presents
//! errors: failures come back as `Err` and travel up with `?`.

use crate::definition::QueryDefinition;
use crate::error::LoadError;
use crate::fold::{LoadingPolicy, Raise, fold};
use crate::outcome::{Loadable, ValidRecord};

/// Evaluate `defs`, raising the first failure in list order.
///
/// Loading is not a failure and is returned as `Ok(Loadable::Loading)`: any
/// source pending, or any fetch in flight while some source has never
/// delivered data. There is no stale-while-revalidate switch here; the
/// loader always shows until every source has data once.
pub fn evaluate_or_throw<K, E>(
    defs: &[QueryDefinition<'_, K, E>],
) -> Result<Loadable<ValidRecord<K>>, LoadError<E>>
where
    K: Ord + Clone,
    E: Clone,
{
    fold(
        defs,
        LoadingPolicy {
            loader_on_fetch: true,
        },
        Raise,
    )
}
