//! Network rendering: layout, emphasis, and PNG rasterization.
//!
//! The renderer turns an [`AddressGraph`] into a single raster artifact.
//! One address is distinguished: it and every edge touching it draw in the
//! warning color, everything else stays neutral. A distinguished address
//! that is absent from the network renders nothing specially.

mod layout;
mod raster;

pub use layout::Layout;

use std::path::PathBuf;

use image::RgbImage;
use petgraph::visit::EdgeRef;
use tracing::info;

use crate::error::CoreError;
use crate::graph::AddressGraph;

pub mod colors {
    use image::Rgb;

    /// Warning accent for the distinguished node and its incident edges.
    pub const WARNING: Rgb<u8> = Rgb([220, 38, 38]);
    /// Neutral edge stroke.
    pub const NEUTRAL_EDGE: Rgb<u8> = Rgb([17, 17, 17]);
    /// Neutral node fill.
    pub const NEUTRAL_NODE: Rgb<u8> = Rgb([22, 163, 74]);
    pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
}

const EMPHASIZED_STROKE: u32 = 9;
const NEUTRAL_STROKE: u32 = 1;
/// Node radius grows linearly with total degree.
const NODE_RADIUS_PER_DEGREE: f32 = 4.0;
const MIN_NODE_RADIUS: f32 = 4.0;
/// Canvas-sanity cap; a hub node must not blot out the whole image.
const MAX_NODE_RADIUS: f32 = 48.0;

/// Rendering options, passed in explicitly at construction.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Blank border around the drawable area, in pixels.
    pub margin: u32,
    pub layout: Layout,
    /// Artifact path; overwritten on every render.
    pub output_path: PathBuf,
    /// Seed for the randomized layouts, fixed so repeated runs compare.
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 1200,
            margin: 48,
            layout: Layout::default(),
            output_path: PathBuf::from("visualizations/graph.png"),
            seed: 0x5eed,
        }
    }
}

pub struct NetworkRenderer {
    config: RenderConfig,
}

impl NetworkRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Rasterize `network` and write the PNG artifact, returning its path.
    pub fn render(
        &self,
        network: &AddressGraph,
        distinguished: &str,
    ) -> Result<PathBuf, CoreError> {
        let positions =
            layout::compute(self.config.layout, network, distinguished, self.config.seed);
        let mut img = RgbImage::from_pixel(
            self.config.width,
            self.config.height,
            colors::BACKGROUND,
        );

        // Edges first so nodes draw on top of their endpoints.
        for edge in network.inner().edge_references() {
            let from = network.address(edge.source());
            let to = network.address(edge.target());
            let (stroke, color) = if edge_emphasized(from, to, distinguished) {
                (EMPHASIZED_STROKE, colors::WARNING)
            } else {
                (NEUTRAL_STROKE, colors::NEUTRAL_EDGE)
            };
            raster::draw_line(
                &mut img,
                self.to_pixel(positions[edge.source().index()]),
                self.to_pixel(positions[edge.target().index()]),
                stroke,
                color,
            );
        }

        for index in network.inner().node_indices() {
            let color = if network.address(index) == distinguished {
                colors::WARNING
            } else {
                colors::NEUTRAL_NODE
            };
            raster::fill_disc(
                &mut img,
                self.to_pixel(positions[index.index()]),
                node_radius(network.degree(index)),
                color,
            );
        }

        if let Some(parent) = self.config.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        img.save(&self.config.output_path)?;
        info!(
            path = %self.config.output_path.display(),
            nodes = network.node_count(),
            edges = network.edge_count(),
            "wrote network image"
        );

        Ok(self.config.output_path.clone())
    }

    /// Map unit-square coordinates into the margined canvas. The y axis
    /// flips because image rows grow downward.
    fn to_pixel(&self, position: [f32; 2]) -> [i32; 2] {
        let usable_w = self.config.width.saturating_sub(2 * self.config.margin) as f32;
        let usable_h = self.config.height.saturating_sub(2 * self.config.margin) as f32;
        let x = self.config.margin as f32 + (position[0] + 1.0) / 2.0 * usable_w;
        let y = self.config.margin as f32 + (1.0 - (position[1] + 1.0) / 2.0) * usable_h;
        [x.round() as i32, y.round() as i32]
    }
}

/// Per-edge emphasis rule: emphasized when either endpoint is the
/// distinguished address, regardless of direction.
pub fn edge_emphasized(from: &str, to: &str, distinguished: &str) -> bool {
    from == distinguished || to == distinguished
}

fn node_radius(degree: usize) -> i32 {
    (degree as f32 * NODE_RADIUS_PER_DEGREE).clamp(MIN_NODE_RADIUS, MAX_NODE_RADIUS) as i32
}
