use promo_types::Snapshot;
use tracing::info;

/// Copy into `higher` every root of `lower_cur` that `higher` lacks.
///
/// Run before diffing when the higher environment has never received some
/// services; those roots then diff as already promoted instead of added.
/// Returns the copied root names, sorted.
pub fn seed_missing_roots(higher: &mut Snapshot, lower_cur: &Snapshot) -> Vec<String> {
    let mut seeded = Vec::new();
    for (root, doc) in lower_cur.iter() {
        if !higher.contains(root) {
            higher.insert(root, doc.clone());
            seeded.push(root.to_string());
        }
    }
    if !seeded.is_empty() {
        info!(roots = ?seeded, "seeded missing roots into higher snapshot");
    }
    seeded
}
