//! Output collaborator interface.
//!
//! The integrator emits snapshots on a fixed cadence: one named view per
//! requested quantity, each snapshot carrying the step index, the physical
//! time and one value array per mesh element (sized to that element's node
//! count; `vField` views carry three values per node). A single `write`
//! call after the last step asks the sink to persist everything it
//! accumulated. Serialization formats are the sink's concern, not the
//! core's.

use log::info;
use nalgebra::DVector;
use thiserror::Error;

use crate::config::ProblemType;
use crate::mesh::NodalMesh2D;

/// Failure reported by an output sink.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("unknown view \"{view}\"")]
    UnknownView { view: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Destination of the solver's snapshots.
pub trait ResultSink {
    /// Register a named view before any data is added to it.
    fn add_view(&mut self, name: &str) -> Result<(), OutputError>;

    /// Append one snapshot to a view. `data` holds one value array per mesh
    /// element.
    fn add_step(
        &mut self,
        view: &str,
        step: usize,
        time: f64,
        data: Vec<Vec<f64>>,
    ) -> Result<(), OutputError>;

    /// Persist everything accumulated so far (called once, after the last
    /// step).
    fn write(&mut self) -> Result<(), OutputError>;
}

/// One stored snapshot of a [`MemorySink`] view.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub step: usize,
    pub time: f64,
    /// One value array per mesh element.
    pub data: Vec<Vec<f64>>,
}

/// A named view of a [`MemorySink`].
#[derive(Clone, Debug, Default)]
pub struct View {
    pub name: String,
    pub snapshots: Vec<Snapshot>,
}

/// In-memory sink keeping every snapshot, for tests and library embedding.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub views: Vec<View>,
    pub written: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The view named `name`, if registered.
    pub fn view(&self, name: &str) -> Option<&View> {
        self.views.iter().find(|view| view.name == name)
    }
}

impl ResultSink for MemorySink {
    fn add_view(&mut self, name: &str) -> Result<(), OutputError> {
        if self.view(name).is_none() {
            self.views.push(View {
                name: name.to_string(),
                snapshots: Vec::new(),
            });
        }
        Ok(())
    }

    fn add_step(
        &mut self,
        view: &str,
        step: usize,
        time: f64,
        data: Vec<Vec<f64>>,
    ) -> Result<(), OutputError> {
        let entry = self
            .views
            .iter_mut()
            .find(|candidate| candidate.name == view)
            .ok_or_else(|| OutputError::UnknownView {
                view: view.to_string(),
            })?;
        entry.snapshots.push(Snapshot { step, time, data });
        Ok(())
    }

    fn write(&mut self) -> Result<(), OutputError> {
        self.written = true;
        info!(
            "results written: {} views, {} snapshots",
            self.views.len(),
            self.views.iter().map(|v| v.snapshots.len()).sum::<usize>()
        );
        Ok(())
    }
}

/// Emit one snapshot of every selected quantity to `sink`.
///
/// The derived quantities follow the problem type: the first unknown is the
/// scalar view (H, p' or the transported scalar), `u`/`v` are primitive
/// velocities (momentum over depth for nonlinear shallow water, the raw
/// unknowns for the linear systems), `sKE` is the specific kinetic energy
/// and `vField` packs (u, v, 0) per node.
pub fn write_snapshot(
    problem: ProblemType,
    outputs: &[String],
    mesh: &NodalMesh2D,
    u: &[DVector<f64>],
    step: usize,
    time: f64,
    sink: &mut dyn ResultSink,
) -> Result<(), OutputError> {
    for quantity in outputs {
        let data = element_data(problem, quantity, mesh, u);
        sink.add_step(quantity, step, time, data)?;
    }
    Ok(())
}

/// Primitive velocity components at node `i`.
fn velocity(problem: ProblemType, u: &[DVector<f64>], i: usize) -> (f64, f64) {
    match problem {
        ProblemType::Shallow => {
            let h = u[0][i].max(1e-12);
            (u[1][i] / h, u[2][i] / h)
        }
        ProblemType::ShallowLin | ProblemType::AcousticLin => (u[1][i], u[2][i]),
        ProblemType::Transport => (0.0, 0.0),
    }
}

fn element_data(
    problem: ProblemType,
    quantity: &str,
    mesh: &NodalMesh2D,
    u: &[DVector<f64>],
) -> Vec<Vec<f64>> {
    mesh.elements
        .iter()
        .map(|element| {
            let nodes = element.offset..element.offset + element.n_nodes;
            match quantity {
                // scalar views of the first unknown
                "H" | "p'" => nodes.map(|i| u[0][i]).collect(),
                "u" if problem == ProblemType::Transport => nodes.map(|i| u[0][i]).collect(),
                "u" | "u'" => nodes.map(|i| velocity(problem, u, i).0).collect(),
                "v" | "v'" => nodes.map(|i| velocity(problem, u, i).1).collect(),
                "sKE" | "sKE'" => nodes
                    .map(|i| {
                        let (vx, vy) = velocity(problem, u, i);
                        0.5 * (vx * vx + vy * vy)
                    })
                    .collect(),
                "vField" | "vField'" => nodes
                    .flat_map(|i| {
                        let (vx, vy) = velocity(problem, u, i);
                        [vx, vy, 0.0]
                    })
                    .collect(),
                // the registry rejects anything else at load time
                _ => Vec::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn mesh_1x1() -> NodalMesh2D {
        NodalMesh2D::uniform_rectangle(0.0, 1.0, 0.0, 1.0, 1, 1, "Border")
    }

    #[test]
    fn test_memory_sink_roundtrip() {
        let mut sink = MemorySink::new();
        sink.add_view("H").unwrap();
        sink.add_step("H", 0, 0.0, vec![vec![1.0; 4]]).unwrap();
        sink.add_step("H", 5, 0.5, vec![vec![2.0; 4]]).unwrap();
        sink.write().unwrap();

        let view = sink.view("H").unwrap();
        assert_eq!(view.snapshots.len(), 2);
        assert_eq!(view.snapshots[1].step, 5);
        assert!(sink.written);
    }

    #[test]
    fn test_unknown_view_is_reported() {
        let mut sink = MemorySink::new();
        assert!(sink.add_step("missing", 0, 0.0, vec![]).is_err());
    }

    #[test]
    fn test_shallow_derived_quantities() {
        let mesh = mesh_1x1();
        // H = 2 everywhere, Hu = 4, Hv = -2 => u = 2, v = -1, sKE = 2.5
        let u = vec![
            DVector::from_element(4, 2.0),
            DVector::from_element(4, 4.0),
            DVector::from_element(4, -2.0),
        ];
        let mut sink = MemorySink::new();
        for name in ["H", "u", "v", "sKE", "vField"] {
            sink.add_view(name).unwrap();
        }
        let outputs: Vec<String> = ["H", "u", "v", "sKE", "vField"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        write_snapshot(ProblemType::Shallow, &outputs, &mesh, &u, 3, 0.3, &mut sink).unwrap();

        assert_relative_eq!(sink.view("H").unwrap().snapshots[0].data[0][0], 2.0);
        assert_relative_eq!(sink.view("u").unwrap().snapshots[0].data[0][0], 2.0);
        assert_relative_eq!(sink.view("v").unwrap().snapshots[0].data[0][0], -1.0);
        assert_relative_eq!(sink.view("sKE").unwrap().snapshots[0].data[0][0], 2.5);
        // vField holds 3 values per node
        assert_eq!(sink.view("vField").unwrap().snapshots[0].data[0].len(), 12);
    }

    #[test]
    fn test_transport_scalar_view() {
        let mesh = mesh_1x1();
        let u = vec![DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0])];
        let mut sink = MemorySink::new();
        sink.add_view("u").unwrap();
        write_snapshot(
            ProblemType::Transport,
            &["u".to_string()],
            &mesh,
            &u,
            0,
            0.0,
            &mut sink,
        )
        .unwrap();
        assert_eq!(
            sink.view("u").unwrap().snapshots[0].data[0],
            vec![1.0, 2.0, 3.0, 4.0]
        );
    }
}
