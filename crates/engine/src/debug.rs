//! Visual-debug sink (§6): an optional collector of traces useful for
//! visualising a query's recursion. The engine never depends on a concrete
//! renderer — callers that want to draw the traces own that dependency.

use nalgebra::Vector3;

/// Collects visualisation traces during a query. All methods default to a
/// no-op so implementors only override what they render.
pub trait DebugSink {
    fn add_stabbing_line(&mut self, _a: Vector3<f64>, _b: Vector3<f64>) {}
    fn add_extremal_stabbing_line(&mut self, _a: Vector3<f64>, _b: Vector3<f64>) {}
    fn add_sampling_line(&mut self, _a: Vector3<f64>, _b: Vector3<f64>) {}
    fn add_removed_edge(&mut self, _a: Vector3<f64>, _b: Vector3<f64>) {}
    fn add_removed_triangle(&mut self, _v0: Vector3<f64>, _v1: Vector3<f64>, _v2: Vector3<f64>) {}
}

/// A sink that discards everything; the default when no caller-supplied
/// sink is given.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullDebugSink;

impl DebugSink for NullDebugSink {}
