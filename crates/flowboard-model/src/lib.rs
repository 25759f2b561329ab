//! Flowboard Model
//!
//! This crate contains the serializable sequence and layout types for
//! flowboard, plus the pure transformations the editor applies to them:
//!
//! - [`Sequence`] / [`Step`]: an identified, ordered list of workflow steps.
//! - [`LayoutMap`]: step id → canvas position.
//! - [`connect_steps`]: infer missing sequential links (auto-connection).
//! - [`to_graph`]: adapt a sequence + layout into renderable nodes and edges.
//! - [`arrange`]: compute a depth-ranked arrangement for a step list.
//!
//! Everything here is pure and idempotent - no I/O, no shared mutable state.
//! The editor crate owns all stateful concerns.

mod arrange;
mod connect;
mod graph;
mod layout;
mod sequence;

pub use arrange::arrange;
pub use connect::connect_steps;
pub use graph::{FlowGraph, GraphEdge, GraphNode, to_graph};
pub use layout::{LayoutMap, Position, PositionEdit};
pub use sequence::{Sequence, SequenceMeta, Step, StepKind};
