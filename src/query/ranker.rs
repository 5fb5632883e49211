use serde::Serialize;

use crate::geo::distance_m;
use crate::query::Snapshot;

pub const DEFAULT_MAX_DISTANCE_M: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct Neighbor {
    pub name: String,
    pub distance_m: f64,
}

/// Everyone in `snapshot` within `max_distance_m` of `target`, nearest
/// first, ties broken by name.
///
/// Returns nothing when `target` itself is missing from the snapshot. That
/// is indistinguishable from "no neighbors" here; callers that care check
/// [`Snapshot::contains`] first.
pub fn rank_proximity(snapshot: &Snapshot, target: &str, max_distance_m: f64) -> Vec<Neighbor> {
    let Some(origin) = snapshot.get(target) else {
        return Vec::new();
    };

    let mut neighbors: Vec<Neighbor> = snapshot
        .iter()
        .filter(|(name, _)| *name != target)
        .map(|(name, position)| Neighbor {
            name: name.to_string(),
            distance_m: distance_m(origin, position),
        })
        .filter(|n| n.distance_m <= max_distance_m)
        .collect();

    neighbors.sort_by(|a, b| {
        a.distance_m
            .total_cmp(&b.distance_m)
            .then_with(|| a.name.cmp(&b.name))
    });

    neighbors
}
