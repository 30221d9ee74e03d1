use std::f32::consts::TAU;

use petgraph::visit::EdgeRef;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::graph::AddressGraph;

/// Fixed iteration count for the force-directed layout.
const SPRING_ITERATIONS: usize = 20;
/// Optimal-distance constant for the force-directed layout.
const SPRING_K: f32 = 0.3;
/// Floor on pairwise distance so coincident nodes cannot divide by zero.
const MIN_SEPARATION: f32 = 1e-4;

/// Node placement strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    Spring,
    Circular,
    Random,
}

impl Layout {
    /// Map a selector string to a layout. Unrecognized selectors fall back
    /// to random placement.
    pub fn from_selector(selector: &str) -> Self {
        match selector {
            "spring" => Self::Spring,
            "circular" => Self::Circular,
            _ => Self::Random,
        }
    }
}

/// Compute unit-square positions (both coordinates in [-1, 1]) for every
/// node, indexed by `NodeIndex::index()`.
pub(super) fn compute(
    layout: Layout,
    network: &AddressGraph,
    distinguished: &str,
    seed: u64,
) -> Vec<[f32; 2]> {
    match layout {
        Layout::Spring => spring(network, seed),
        Layout::Circular => circular(network, distinguished),
        Layout::Random => random(network, seed),
    }
}

fn random(network: &AddressGraph, seed: u64) -> Vec<[f32; 2]> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..network.node_count())
        .map(|_| [rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)])
        .collect()
}

/// Nodes evenly on the unit ring; the distinguished address, when present,
/// is pinned to the geometric center.
fn circular(network: &AddressGraph, distinguished: &str) -> Vec<[f32; 2]> {
    let n = network.node_count();
    let mut positions: Vec<[f32; 2]> = (0..n)
        .map(|i| {
            let angle = TAU * i as f32 / n as f32;
            [angle.cos(), angle.sin()]
        })
        .collect();

    if let Some(index) = network.node_index(distinguished) {
        positions[index.index()] = [0.0, 0.0];
    }
    positions
}

/// Fruchterman–Reingold force-directed placement with a fixed iteration
/// count and linear cooling. Parallel edges pull proportionally harder
/// because each contributes its own attraction pass.
fn spring(network: &AddressGraph, seed: u64) -> Vec<[f32; 2]> {
    let n = network.node_count();
    if n == 0 {
        return Vec::new();
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut positions: Vec<[f32; 2]> = (0..n)
        .map(|_| [rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)])
        .collect();

    let mut temperature = 0.1_f32;
    let cooling = temperature / (SPRING_ITERATIONS as f32 + 1.0);

    for _ in 0..SPRING_ITERATIONS {
        let mut displacement = vec![[0.0_f32; 2]; n];

        // Repulsion between every node pair.
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = positions[i][0] - positions[j][0];
                let dy = positions[i][1] - positions[j][1];
                let dist = (dx * dx + dy * dy).sqrt().max(MIN_SEPARATION);
                let force = SPRING_K * SPRING_K / dist;
                let (ux, uy) = (dx / dist, dy / dist);
                displacement[i][0] += ux * force;
                displacement[i][1] += uy * force;
                displacement[j][0] -= ux * force;
                displacement[j][1] -= uy * force;
            }
        }

        // Attraction along every edge. A self-loop exerts no pull.
        for edge in network.inner().edge_references() {
            let s = edge.source().index();
            let t = edge.target().index();
            if s == t {
                continue;
            }
            let dx = positions[s][0] - positions[t][0];
            let dy = positions[s][1] - positions[t][1];
            let dist = (dx * dx + dy * dy).sqrt().max(MIN_SEPARATION);
            let force = dist * dist / SPRING_K;
            let (ux, uy) = (dx / dist, dy / dist);
            displacement[s][0] -= ux * force;
            displacement[s][1] -= uy * force;
            displacement[t][0] += ux * force;
            displacement[t][1] += uy * force;
        }

        // Move each node along its displacement, capped by the current
        // temperature.
        for i in 0..n {
            let len = (displacement[i][0] * displacement[i][0]
                + displacement[i][1] * displacement[i][1])
                .sqrt();
            if len > 0.0 {
                let step = len.min(temperature);
                positions[i][0] += displacement[i][0] / len * step;
                positions[i][1] += displacement[i][1] / len * step;
            }
        }
        temperature -= cooling;
    }

    rescale_to_unit(positions)
}

/// Center positions on their mean and scale the largest coordinate onto
/// the unit square.
fn rescale_to_unit(mut positions: Vec<[f32; 2]>) -> Vec<[f32; 2]> {
    if positions.is_empty() {
        return positions;
    }

    let n = positions.len() as f32;
    let cx = positions.iter().map(|p| p[0]).sum::<f32>() / n;
    let cy = positions.iter().map(|p| p[1]).sum::<f32>() / n;

    let mut extent = 0.0_f32;
    for p in &mut positions {
        p[0] -= cx;
        p[1] -= cy;
        extent = extent.max(p[0].abs()).max(p[1].abs());
    }
    if extent > 0.0 {
        for p in &mut positions {
            p[0] /= extent;
            p[1] /= extent;
        }
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_network;
    use crate::test_util::{make_row, make_table};

    fn sample_network() -> AddressGraph {
        build_network(&make_table(vec![
            make_row("a", "b", 1.0, 0, "2019-11-29 16:25:57"),
            make_row("b", "c", 2.0, 1, "2019-11-29 16:25:58"),
            make_row("c", "d", 3.0, 2, "2019-11-29 16:25:59"),
            make_row("d", "a", 4.0, 3, "2019-11-29 16:26:00"),
        ]))
        .expect("network must build")
    }

    #[test]
    fn selector_maps_known_names_and_falls_back_to_random() {
        assert_eq!(Layout::from_selector("spring"), Layout::Spring);
        assert_eq!(Layout::from_selector("circular"), Layout::Circular);
        assert_eq!(Layout::from_selector("shell"), Layout::Random);
        assert_eq!(Layout::from_selector(""), Layout::Random);
    }

    #[test]
    fn all_layouts_stay_in_the_unit_square() {
        let network = sample_network();
        for layout in [Layout::Spring, Layout::Circular, Layout::Random] {
            let positions = compute(layout, &network, "b", 7);
            assert_eq!(positions.len(), network.node_count());
            for p in positions {
                assert!(p[0].is_finite() && p[1].is_finite());
                assert!((-1.0..=1.0).contains(&p[0]), "{layout:?} x out of range");
                assert!((-1.0..=1.0).contains(&p[1]), "{layout:?} y out of range");
            }
        }
    }

    #[test]
    fn circular_pins_the_distinguished_address_to_center() {
        let network = sample_network();
        let positions = compute(Layout::Circular, &network, "c", 7);
        let c = network.node_index("c").expect("c must be interned");
        assert_eq!(positions[c.index()], [0.0, 0.0]);
    }

    #[test]
    fn circular_without_distinguished_keeps_everyone_on_the_ring() {
        let network = sample_network();
        let positions = compute(Layout::Circular, &network, "not-in-graph", 7);
        for p in positions {
            let norm = (p[0] * p[0] + p[1] * p[1]).sqrt();
            assert!((norm - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn seeded_layouts_are_deterministic() {
        let network = sample_network();
        for layout in [Layout::Spring, Layout::Random] {
            let first = compute(layout, &network, "b", 42);
            let second = compute(layout, &network, "b", 42);
            assert_eq!(first, second, "{layout:?} must be repeatable");
        }
    }

    #[test]
    fn different_seeds_move_random_placement() {
        let network = sample_network();
        let first = compute(Layout::Random, &network, "b", 1);
        let second = compute(Layout::Random, &network, "b", 2);
        assert_ne!(first, second);
    }

    #[test]
    fn spring_handles_a_single_node() {
        let network = build_network(&make_table(vec![make_row(
            "a",
            "a",
            1.0,
            0,
            "2019-11-29 16:25:57",
        )]))
        .expect("network must build");
        let positions = compute(Layout::Spring, &network, "a", 7);
        assert_eq!(positions.len(), 1);
        assert!(positions[0][0].is_finite() && positions[0][1].is_finite());
    }
}
