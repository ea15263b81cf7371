//! Exclusion of catalog entries by name substring.

use crate::domain::{Catalog, RepositoryDescriptor, SkipReason};

/// First exclusion entry contained in `name` (case-sensitive)
pub fn matching_exclusion<'a>(name: &str, excluded: &'a [String]) -> Option<&'a str> {
    excluded
        .iter()
        .map(String::as_str)
        .find(|pattern| !pattern.is_empty() && name.contains(pattern))
}

/// Drop every entry whose name contains an excluded substring.
///
/// Returns the remaining catalog and the dropped descriptors with the
/// reason each was skipped.
pub fn apply_exclusions(
    catalog: Catalog,
    excluded: &[String],
) -> (Catalog, Vec<(RepositoryDescriptor, SkipReason)>) {
    let (kept, dropped) = catalog.partition(|d| matching_exclusion(&d.name, excluded).is_none());

    let skipped = dropped
        .into_iter()
        .map(|descriptor| {
            let pattern = matching_exclusion(&descriptor.name, excluded)
                .unwrap_or_default()
                .to_string();
            (descriptor, SkipReason::Excluded { pattern })
        })
        .collect();

    (kept, skipped)
}
