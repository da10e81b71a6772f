//! Derive new traces from a selection by scalar or reference arithmetic.
//!
//! Every operation is two-phase. [`plan`] checks the selection, splits it
//! into x-compatible and incompatible traces and computes the derived data
//! without touching the set. [`AlgebraPlan::apply`] then hides the sources,
//! appends the derived traces and redraws. Callers that have to ask the user
//! about incompatible traces do so between the two phases.

use log::{debug, warn};

use super::set::{Bounds, TraceSet};
use super::{TraceBatch, Visibility};
use crate::config::StyleConfig;
use crate::data::range::nearest_index;
use crate::error::TraceError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    /// `y + k`
    AddScalar(f64),
    /// `y * k`; a factor of zero does nothing.
    MulScalar(f64),
    /// `y - y_ref` against the trace at the given index.
    ReferenceTo(usize),
    /// Subtract each trace's own value at the sample nearest to `x`.
    InternalReference(f64),
}

impl Operation {
    /// Suffix appended to the names of derived traces.
    pub fn suffix(&self) -> String {
        match *self {
            Operation::AddScalar(k) if k < 0.0 => format!(" (-{})", k.abs()),
            Operation::AddScalar(k) => format!(" (+{k})"),
            Operation::MulScalar(k) => format!(" (x{k})"),
            Operation::ReferenceTo(_) => " (Diff)".to_string(),
            Operation::InternalReference(_) => " (-Ref)".to_string(),
        }
    }
}

/// What to do when part of the selection is not x-compatible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncompatiblePolicy {
    /// Ignore the incompatible traces and derive the rest.
    Proceed,
    Abort,
}

/// Result of a committed operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlgebraOutcome {
    /// Number of traces appended.
    pub derived: usize,
    /// Number of selected traces skipped as incompatible.
    pub incompatible: usize,
    /// Bounds of the surface after the redraw.
    pub bounds: Option<Bounds>,
}

/// Derived traces ready to be committed.
#[derive(Debug, Clone, PartialEq)]
pub struct AlgebraPlan {
    operation: Operation,
    /// Style seeds of the selected traces. Seeds stay valid when other
    /// traces are removed, indices do not.
    sources: Vec<u64>,
    derived: TraceBatch,
    incompatible: usize,
}

impl AlgebraPlan {
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Number of selected traces left out for not sharing the reference x axis.
    pub fn incompatible_count(&self) -> usize {
        self.incompatible
    }

    pub fn derived(&self) -> &TraceBatch {
        &self.derived
    }

    /// Hide every source trace, append the derived traces and redraw.
    ///
    /// Sources are found again by seed, so traces added or removed since
    /// planning do not matter. Nothing is changed if a source is gone.
    pub fn apply(self, set: &mut TraceSet, style: &StyleConfig) -> Result<AlgebraOutcome, TraceError> {
        let sources = self
            .sources
            .iter()
            .map(|&seed| set.index_of_seed(seed).ok_or(TraceError::SourceRemoved { seed }))
            .collect::<Result<Vec<usize>, _>>()?;
        let appended = set.append_batch(self.derived)?;
        set.set_visibility(&sources, Visibility::Hidden)?;
        debug!(
            "{:?}: hid {} source(s), appended {}",
            self.operation,
            sources.len(),
            appended.len()
        );
        Ok(AlgebraOutcome {
            derived: appended.len(),
            incompatible: self.incompatible,
            bounds: set.redraw_all(style),
        })
    }
}

/// Compute the derived traces for `selection` (in the caller's order).
///
/// Returns `Ok(None)` when there is nothing to do: an empty selection or a
/// multiplication by zero.
pub fn plan(
    set: &TraceSet,
    selection: &[usize],
    operation: Operation,
) -> Result<Option<AlgebraPlan>, TraceError> {
    if selection.is_empty() || operation == Operation::MulScalar(0.0) {
        return Ok(None);
    }
    set.check_indices(selection)?;

    let suffix = operation.suffix();
    let mut derived = TraceBatch::default();
    let mut incompatible = 0;

    if let Operation::InternalReference(x_ref) = operation {
        for &i in selection {
            let trace = set.trace(i)?;
            let offset = nearest_index(trace.x(), x_ref)
                .map(|k| trace.y()[k])
                .unwrap_or(0.0);
            let y = trace.y().iter().map(|v| v - offset).collect();
            derived.push(format!("{}{suffix}", trace.name()), trace.x().to_vec(), y);
        }
    } else {
        let reference = match operation {
            Operation::ReferenceTo(r) => set.trace(r)?,
            _ => set.trace(selection[0])?,
        };
        for &i in selection {
            let trace = set.trace(i)?;
            if !reference.is_x_compatible(trace) {
                incompatible += 1;
                continue;
            }
            let y = trace
                .y()
                .iter()
                .zip(reference.y())
                .map(|(&v, &r)| match operation {
                    Operation::AddScalar(k) => v + k,
                    Operation::MulScalar(k) => v * k,
                    _ => v - r,
                })
                .collect();
            derived.push(format!("{}{suffix}", trace.name()), reference.x().to_vec(), y);
        }
    }

    if incompatible > 0 {
        warn!("{operation:?}: {incompatible} selected trace(s) have different x-axis points");
    }
    Ok(Some(AlgebraPlan {
        operation,
        sources: selection
            .iter()
            .filter_map(|&i| set.get(i))
            .map(|t| t.style_seed())
            .collect(),
        derived,
        incompatible,
    }))
}

/// Plan and apply in one step, resolving incompatible traces with `policy`.
///
/// With [`IncompatiblePolicy::Abort`] an incompatible selection fails with
/// [`TraceError::IncompatibleAxis`] and leaves the set untouched.
pub fn apply(
    set: &mut TraceSet,
    selection: &[usize],
    operation: Operation,
    policy: IncompatiblePolicy,
    style: &StyleConfig,
) -> Result<Option<AlgebraOutcome>, TraceError> {
    let Some(plan) = plan(set, selection, operation)? else {
        return Ok(None);
    };
    if plan.incompatible > 0 && policy == IncompatiblePolicy::Abort {
        return Err(TraceError::IncompatibleAxis {
            count: plan.incompatible,
        });
    }
    plan.apply(set, style).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::Surface;

    fn set_with(traces: &[(&str, Vec<f64>, Vec<f64>)]) -> TraceSet {
        let mut set = TraceSet::new(Surface::Traces);
        let mut batch = TraceBatch::default();
        for (name, x, y) in traces {
            batch.push(*name, x.clone(), y.clone());
        }
        set.append_batch(batch).unwrap();
        set
    }

    fn sample() -> TraceSet {
        set_with(&[
            ("a", vec![0.0, 1.0, 2.0], vec![1.0, 2.0, 3.0]),
            ("b", vec![0.0, 1.0, 2.0], vec![4.0, 5.0, 6.0]),
            ("c", vec![0.0, 1.0, 2.5], vec![7.0, 8.0, 9.0]),
        ])
    }

    fn style() -> StyleConfig {
        StyleConfig::default()
    }

    #[test]
    fn suffixes() {
        assert_eq!(Operation::AddScalar(2.5).suffix(), " (+2.5)");
        assert_eq!(Operation::AddScalar(-3.0).suffix(), " (-3)");
        assert_eq!(Operation::AddScalar(0.0).suffix(), " (+0)");
        assert_eq!(Operation::MulScalar(2.0).suffix(), " (x2)");
        assert_eq!(Operation::ReferenceTo(0).suffix(), " (Diff)");
        assert_eq!(Operation::InternalReference(1.0).suffix(), " (-Ref)");
    }

    #[test]
    fn add_scalar_hides_sources_and_appends() {
        let mut set = sample();
        let outcome = apply(
            &mut set,
            &[0, 1],
            Operation::AddScalar(10.0),
            IncompatiblePolicy::Abort,
            &style(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(outcome.derived, 2);
        assert!(outcome.bounds.is_some());
        assert_eq!(set.len(), 5);
        assert_eq!(set.get(0).unwrap().visibility(), Visibility::Hidden);
        assert_eq!(set.get(1).unwrap().visibility(), Visibility::Hidden);
        assert_eq!(set.get(2).unwrap().visibility(), Visibility::Line);
        let derived = set.get(3).unwrap();
        assert_eq!(derived.name(), "a (+10)");
        assert_eq!(derived.y(), &[11.0, 12.0, 13.0]);
        assert_eq!(set.get(4).unwrap().y(), &[14.0, 15.0, 16.0]);
    }

    #[test]
    fn add_zero_still_executes() {
        let mut set = sample();
        apply(
            &mut set,
            &[0],
            Operation::AddScalar(0.0),
            IncompatiblePolicy::Abort,
            &style(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(set.len(), 4);
        assert_eq!(set.get(3).unwrap().y(), set.get(0).unwrap().y());
        assert_eq!(set.get(3).unwrap().name(), "a (+0)");
    }

    #[test]
    fn mul_zero_is_strict_noop() {
        let mut set = sample();
        let before: Vec<_> = set.iter().cloned().collect();
        let outcome = apply(
            &mut set,
            &[0, 1],
            Operation::MulScalar(0.0),
            IncompatiblePolicy::Proceed,
            &style(),
        )
        .unwrap();
        assert!(outcome.is_none());
        let after: Vec<_> = set.iter().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn incompatible_selection_reports_count() {
        let set = sample();
        let plan = plan(&set, &[0, 1, 2], Operation::MulScalar(2.0))
            .unwrap()
            .unwrap();
        assert_eq!(plan.incompatible_count(), 1);
        assert_eq!(plan.derived().len(), 2);
        assert_eq!(plan.derived().names, vec!["a (x2)", "b (x2)"]);
    }

    #[test]
    fn abort_leaves_set_untouched() {
        let mut set = sample();
        let err = apply(
            &mut set,
            &[0, 2],
            Operation::MulScalar(2.0),
            IncompatiblePolicy::Abort,
            &style(),
        )
        .unwrap_err();
        assert_eq!(err, TraceError::IncompatibleAxis { count: 1 });
        assert_eq!(set.len(), 3);
        assert!(set.iter().all(|t| t.visibility() == Visibility::Line));
    }

    #[test]
    fn proceed_hides_all_selected_but_derives_compatible_only() {
        let mut set = sample();
        let outcome = apply(
            &mut set,
            &[0, 2],
            Operation::MulScalar(2.0),
            IncompatiblePolicy::Proceed,
            &style(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(outcome.incompatible, 1);
        assert_eq!(set.len(), 4);
        assert_eq!(set.get(2).unwrap().visibility(), Visibility::Hidden);
        assert_eq!(set.get(3).unwrap().y(), &[2.0, 4.0, 6.0]);
    }

    #[test]
    fn plan_follows_sources_after_removal() {
        let mut set = sample();
        let plan = plan(&set, &[1], Operation::AddScalar(1.0)).unwrap().unwrap();
        set.remove_range(0, 1).unwrap();

        plan.apply(&mut set, &style()).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.get(0).unwrap().name(), "b");
        assert_eq!(set.get(0).unwrap().visibility(), Visibility::Hidden);
        assert_eq!(set.get(1).unwrap().visibility(), Visibility::Line);
        assert_eq!(set.get(2).unwrap().name(), "b (+1)");
    }

    #[test]
    fn plan_fails_when_a_source_is_gone() {
        let mut set = sample();
        let plan = plan(&set, &[0, 1], Operation::AddScalar(1.0)).unwrap().unwrap();
        set.remove_range(1, 1).unwrap();
        let before: Vec<_> = set.iter().cloned().collect();

        let err = plan.apply(&mut set, &style()).unwrap_err();
        assert!(matches!(err, TraceError::SourceRemoved { .. }));
        let after: Vec<_> = set.iter().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn reference_to_subtracts_reference() {
        let mut set = sample();
        apply(
            &mut set,
            &[1, 2],
            Operation::ReferenceTo(0),
            IncompatiblePolicy::Proceed,
            &style(),
        )
        .unwrap();
        assert_eq!(set.len(), 4);
        let diff = set.get(3).unwrap();
        assert_eq!(diff.name(), "b (Diff)");
        assert_eq!(diff.y(), &[3.0, 3.0, 3.0]);
        // The reference itself is not part of the selection and stays visible.
        assert_eq!(set.get(0).unwrap().visibility(), Visibility::Line);
    }

    #[test]
    fn reference_out_of_range() {
        let set = sample();
        assert_eq!(
            plan(&set, &[0], Operation::ReferenceTo(5)).unwrap_err(),
            TraceError::IndexOutOfRange { index: 5, len: 3 }
        );
    }

    #[test]
    fn internal_reference_is_per_trace() {
        let mut set = sample();
        let plan = plan(&set, &[0, 2], Operation::InternalReference(2.4))
            .unwrap()
            .unwrap();
        assert_eq!(plan.incompatible_count(), 0);
        plan.apply(&mut set, &style()).unwrap();
        assert_eq!(set.get(3).unwrap().y(), &[-2.0, -1.0, 0.0]);
        assert_eq!(set.get(4).unwrap().name(), "c (-Ref)");
        assert_eq!(set.get(4).unwrap().y(), &[-2.0, -1.0, 0.0]);
        assert_eq!(set.get(4).unwrap().x(), &[0.0, 1.0, 2.5]);
    }

    #[test]
    fn empty_selection_is_noop() {
        let set = sample();
        assert!(plan(&set, &[], Operation::AddScalar(1.0)).unwrap().is_none());
    }

    #[test]
    fn out_of_range_selection_fails_before_mutation() {
        let mut set = sample();
        let err = apply(
            &mut set,
            &[0, 7],
            Operation::AddScalar(1.0),
            IncompatiblePolicy::Proceed,
            &style(),
        )
        .unwrap_err();
        assert!(matches!(err, TraceError::IndexOutOfRange { index: 7, .. }));
        assert_eq!(set.len(), 3);
    }
}
