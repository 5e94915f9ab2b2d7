//! Rack topology
//!
//! Spreads a datacenter's nodes across its racks.

/// Split `node_count` nodes across `rack_count` racks.
///
/// Counts differ by at most one and the surplus goes to the first racks, so
/// `split_racks(13, 5)` is `[3, 3, 3, 2, 2]`. A `rack_count` of zero yields an
/// empty split.
pub fn split_racks(node_count: usize, rack_count: usize) -> Vec<usize> {
    if rack_count == 0 {
        return Vec::new();
    }

    let nodes_per_rack = node_count / rack_count;
    let extra_nodes = node_count % rack_count;

    (0..rack_count)
        .map(|rack_idx| {
            if rack_idx < extra_nodes {
                nodes_per_rack + 1
            } else {
                nodes_per_rack
            }
        })
        .collect()
}
