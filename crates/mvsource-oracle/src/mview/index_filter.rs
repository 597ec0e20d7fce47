use mvsource_core::IndexInfo;

/// Remove the index Oracle created for the primary key of a materialized
/// view, so its DDL is not generated twice.
///
/// Only the first entry whose name matches exactly is removed and returned.
/// Nothing happens if `synthetic_index_name` is `None` or no entry matches.
pub fn filter_synthetic_index(
    indexes: &mut Vec<IndexInfo>,
    synthetic_index_name: Option<&str>,
) -> Option<IndexInfo> {
    let name = synthetic_index_name?;
    let Some(position) = indexes.iter().position(|index| index.name == name) else {
        tracing::debug!(index = name, "primary key index not in index list");
        return None;
    };
    tracing::debug!(index = name, "skipping primary key index");
    Some(indexes.remove(position))
}
