//! 2D nodal mesh in the discontinuous element-local numbering.
//!
//! The solution vector `u` stores one value per *element-local* node, so
//! nodes shared geometrically by neighboring elements appear once per
//! element. The mesh records, for every element edge:
//! - the global indices of its nodes (into `u`'s numbering),
//! - the node offsets inside the owning element,
//! - the outward unit normal and the edge length,
//! - either the matching node indices in the neighboring element (interior
//!   edge, aligned node-by-node) or the physical-group name (boundary edge).
//!
//! Mesh ingestion from files is a collaborator concern; this module only
//! carries the queries the flux assembly and the time integrator need.
//! [`NodalMesh2D::uniform_rectangle`] provides the structured-quad instance
//! used by tests and demos.
//!
//! Face convention (counter-clockwise around a quad):
//! - Face 0 (bottom): local nodes 0 -> 1
//! - Face 1 (right):  local nodes 1 -> 2
//! - Face 2 (top):    local nodes 2 -> 3
//! - Face 3 (left):   local nodes 3 -> 0

use std::collections::BTreeSet;

/// One element of the mesh, as a contiguous range of global nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Element2D {
    /// Offset of the element's first node in the global numbering.
    pub offset: usize,
    /// Number of nodes the element owns.
    pub n_nodes: usize,
}

impl Element2D {
    /// Global index of local node `local`.
    #[inline]
    pub fn node(&self, local: usize) -> usize {
        self.offset + local
    }
}

/// One side of a mesh edge, owned by a single element.
///
/// Interior edges appear twice in [`NodalMesh2D::edges`], once per adjacent
/// element, each time with that element's outward normal.
#[derive(Clone, Debug)]
pub struct EdgeSide {
    /// Element owning this side.
    pub element: usize,
    /// Global node indices along the edge.
    pub nodes: [usize; 2],
    /// Node offsets inside the owning element.
    pub offset_in_elm: [usize; 2],
    /// Physical coordinates of the edge nodes.
    pub coords: [(f64, f64); 2],
    /// Outward unit normal of the owning element.
    pub normal: (f64, f64),
    /// Edge length.
    pub length: f64,
    /// Matching global node indices in the neighboring element, aligned
    /// with `nodes`. `None` for boundary edges.
    pub neighbor_nodes: Option<[usize; 2]>,
    /// Physical-group name, set on boundary edges only.
    pub group: Option<String>,
}

impl EdgeSide {
    /// Whether this side lies on the domain boundary.
    pub fn is_boundary(&self) -> bool {
        self.neighbor_nodes.is_none()
    }
}

/// 2D mesh in discontinuous nodal numbering.
#[derive(Clone, Debug)]
pub struct NodalMesh2D {
    /// Coordinates of every global node.
    pub coords: Vec<(f64, f64)>,
    /// Elements as (offset, node-count) ranges over the global numbering.
    pub elements: Vec<Element2D>,
    /// Every element edge (interior edges listed once per side).
    pub edges: Vec<EdgeSide>,
}

impl NodalMesh2D {
    /// Total number of solution nodes.
    pub fn n_nodes(&self) -> usize {
        self.coords.len()
    }

    /// Number of elements.
    pub fn n_elements(&self) -> usize {
        self.elements.len()
    }

    /// Names of all physical groups referenced by boundary edges.
    pub fn boundary_groups(&self) -> BTreeSet<&str> {
        self.edges
            .iter()
            .filter_map(|edge| edge.group.as_deref())
            .collect()
    }

    /// Uniform structured quad mesh of `[x0, x1] x [y0, y1]`, every boundary
    /// edge tagged with `group`.
    ///
    /// Elements are bilinear quads with four nodes each, numbered
    /// counter-clockwise from the bottom-left corner.
    pub fn uniform_rectangle(
        x0: f64,
        x1: f64,
        y0: f64,
        y1: f64,
        nx: usize,
        ny: usize,
        group: &str,
    ) -> Self {
        assert!(nx > 0 && ny > 0, "need at least one element per direction");
        assert!(x1 > x0 && y1 > y0, "invalid domain bounds");

        let dx = (x1 - x0) / nx as f64;
        let dy = (y1 - y0) / ny as f64;
        let n_elements = nx * ny;

        let mut coords = Vec::with_capacity(4 * n_elements);
        let mut elements = Vec::with_capacity(n_elements);
        let mut edges = Vec::with_capacity(4 * n_elements);

        for j in 0..ny {
            for i in 0..nx {
                let k = j * nx + i;
                let offset = 4 * k;
                let (xl, xr) = (x0 + i as f64 * dx, x0 + (i + 1) as f64 * dx);
                let (yb, yt) = (y0 + j as f64 * dy, y0 + (j + 1) as f64 * dy);

                // Counter-clockwise corners.
                let corner = [(xl, yb), (xr, yb), (xr, yt), (xl, yt)];
                coords.extend_from_slice(&corner);
                elements.push(Element2D { offset, n_nodes: 4 });

                // Per face: local node pair, outward normal, length, and the
                // neighboring element with its matching local node pair.
                let faces: [([usize; 2], (f64, f64), f64, Option<(usize, [usize; 2])>); 4] = [
                    ([0, 1], (0.0, -1.0), dx, (j > 0).then(|| (k - nx, [3, 2]))),
                    ([1, 2], (1.0, 0.0), dy, (i + 1 < nx).then(|| (k + 1, [0, 3]))),
                    ([2, 3], (0.0, 1.0), dx, (j + 1 < ny).then(|| (k + nx, [1, 0]))),
                    ([3, 0], (-1.0, 0.0), dy, (i > 0).then(|| (k - 1, [2, 1]))),
                ];

                for (locals, normal, length, neighbor) in faces {
                    let neighbor_nodes =
                        neighbor.map(|(kn, remote)| [4 * kn + remote[0], 4 * kn + remote[1]]);
                    let tag = neighbor_nodes.is_none().then(|| group.to_string());
                    edges.push(EdgeSide {
                        element: k,
                        nodes: [offset + locals[0], offset + locals[1]],
                        offset_in_elm: locals,
                        coords: [corner[locals[0]], corner[locals[1]]],
                        normal,
                        length,
                        neighbor_nodes,
                        group: tag,
                    });
                }
            }
        }

        Self {
            coords,
            elements,
            edges,
        }
    }
}
