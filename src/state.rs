use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::analysis::svd;
use crate::config::{Settings, StyleConfig};
use crate::data::collection::FileCollection;
use crate::data::loader::load_file;
use crate::data::model::{Axis, RawFile};
use crate::data::projection::{project, ProjectedRow, Projection};
use crate::data::range::{self, RangeMode};
use crate::error::{CommandError, ParseError, SessionError};
use crate::trace::algebra::{self, AlgebraPlan, Operation};
use crate::trace::export::{self, ExportPlan};
use crate::trace::{Bounds, Surface, TraceBatch, TraceSet, Visibility};
use crate::view::{PlotCommand, ViewSettings};

// ---------------------------------------------------------------------------
// Per-surface state
// ---------------------------------------------------------------------------

/// One plot surface: its traces, the selected rows of its trace table and
/// its axis view.
#[derive(Debug, Clone)]
pub struct SurfaceState {
    pub traces: TraceSet,
    pub selection: BTreeSet<usize>,
    pub view: ViewSettings,
}

impl SurfaceState {
    fn new(surface: Surface) -> Self {
        Self {
            traces: TraceSet::new(surface),
            selection: BTreeSet::new(),
            view: ViewSettings::default(),
        }
    }

    fn selected(&self) -> Vec<usize> {
        self.selection.iter().copied().collect()
    }

    /// Redraw with `style` and move the view onto the new bounds.
    fn refresh(&mut self, style: &StyleConfig) -> Option<Bounds> {
        let bounds = self.traces.redraw_all(style);
        self.view.auto_range(bounds);
        bounds
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Files added by [`AppState::import_paths`] and the ones that were skipped.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub loaded: Vec<usize>,
    pub failed: Vec<(PathBuf, ParseError)>,
}

/// What happened to a request that may need the user's confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Nothing to do (empty selection, zero factor...).
    NoOp,
    Applied,
    /// Parked in [`AppState::pending`] until confirmed or cancelled.
    NeedsConfirmation { incompatible: usize },
}

/// An action waiting for proceed/abort because part of the selection does
/// not share the reference x axis.
#[derive(Debug, Clone)]
pub enum PendingAction {
    Algebra {
        surface: Surface,
        plan: AlgebraPlan,
    },
    Export {
        surface: Surface,
        plan: ExportPlan,
        path: PathBuf,
    },
}

impl PendingAction {
    pub fn incompatible_count(&self) -> usize {
        match self {
            PendingAction::Algebra { plan, .. } => plan.incompatible_count(),
            PendingAction::Export { plan, .. } => plan.incompatible_count(),
        }
    }

    /// Message for the proceed/abort prompt.
    pub fn message(&self) -> String {
        let verb = match self {
            PendingAction::Algebra { .. } => "modifying",
            PendingAction::Export { .. } => "saving",
        };
        format!(
            "Found {} selected dataset(s) with different x-axis points. \
             They will be ignored when {verb} data.",
            self.incompatible_count()
        )
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full session state, independent of rendering.
pub struct AppState {
    pub files: FileCollection,

    /// File whose projection is shown (None until a file is imported).
    pub current_file: Option<usize>,

    /// Axis the current file is projected along.
    pub axis: Axis,

    /// Cached projection of the current file.
    projection: Option<Projection>,

    /// Selected rows of the projection.
    pub projection_selection: BTreeSet<usize>,

    surfaces: [SurfaceState; 2],

    /// Surface shown in the plot area.
    pub active: Surface,

    /// Style, SVD and range defaults.
    pub settings: Settings,

    /// Action awaiting a proceed/abort answer.
    pub pending: Option<PendingAction>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            files: FileCollection::new(),
            current_file: None,
            axis: Axis::default(),
            projection: None,
            projection_selection: BTreeSet::new(),
            surfaces: [
                SurfaceState::new(Surface::Traces),
                SurfaceState::new(Surface::Spectra),
            ],
            active: Surface::Traces,
            settings,
            pending: None,
            status_message: None,
        }
    }

    pub fn surface(&self, surface: Surface) -> &SurfaceState {
        &self.surfaces[surface.index()]
    }

    pub fn surface_mut(&mut self, surface: Surface) -> &mut SurfaceState {
        &mut self.surfaces[surface.index()]
    }

    pub fn projection(&self) -> Option<&Projection> {
        self.projection.as_ref()
    }

    // ---- Files ----

    /// Parse every path; failures are logged, reported and skipped. The first
    /// newly loaded file becomes the current one.
    pub fn import_paths(&mut self, paths: &[PathBuf]) -> ImportReport {
        let mut report = ImportReport::default();
        for path in paths {
            match load_file(path) {
                Ok(raw) => report.loaded.push(self.files.add(raw)),
                Err(e) => {
                    warn!("Skipping {}: {e}", path.display());
                    report.failed.push((path.clone(), e));
                }
            }
        }

        if let Some(&first) = report.loaded.first() {
            self.select_file(first);
            self.settings.last_directory = paths[0].parent().map(Path::to_path_buf);
        }
        self.status_message = match report.failed.as_slice() {
            [] => None,
            [(path, e)] => Some(format!("Could not import {}: {e}", path.display())),
            failed => Some(format!("Could not import {} files", failed.len())),
        };
        info!(
            "Imported {} file(s), skipped {}",
            report.loaded.len(),
            report.failed.len()
        );
        report
    }

    /// Add an already parsed file without changing the current one.
    pub fn add_file(&mut self, raw: RawFile) -> usize {
        let index = self.files.add(raw);
        if self.current_file.is_none() {
            self.select_file(index);
        }
        index
    }

    pub fn select_file(&mut self, index: usize) {
        if index < self.files.len() {
            self.current_file = Some(index);
            self.refresh_projection();
        }
    }

    pub fn remove_current_file(&mut self) {
        let Some(index) = self.current_file else {
            return;
        };
        self.files.remove(index);
        self.current_file = match self.files.len() {
            0 => None,
            len => Some(index.min(len - 1)),
        };
        self.refresh_projection();
    }

    /// Switch between selecting wavelengths and selecting time points.
    pub fn toggle_axis(&mut self) {
        if self.projection.is_none() {
            return;
        }
        self.axis = self.axis.toggle();
        self.refresh_projection();
    }

    fn refresh_projection(&mut self) {
        self.projection = self
            .current_file
            .and_then(|i| self.files.get(i))
            .map(|raw| project(raw, self.axis));
        self.projection_selection.clear();
    }

    // ---- Projection selection ----

    /// Add the rows nearest to a linear/log range to the selection. Returns
    /// the number of target points, or `None` if the range was rejected.
    pub fn range_select(&mut self, from: f64, to: f64, steps: usize, mode: RangeMode) -> Option<usize> {
        let labels = self.projection.as_ref()?.label_values();
        let indices = range::select(&labels, from, to, steps, mode)?;
        self.projection_selection.extend(indices.iter().copied());
        Some(indices.len())
    }

    /// Add rows to the selection; indices past the projection are ignored.
    pub fn select_projection_rows(&mut self, indices: &[usize]) {
        let len = self.projection.as_ref().map_or(0, Projection::len);
        self.projection_selection
            .extend(indices.iter().copied().filter(|&i| i < len));
    }

    pub fn toggle_projection_row(&mut self, index: usize) {
        if !self.projection_selection.remove(&index) {
            self.projection_selection.insert(index);
        }
    }

    fn selected_rows(&self) -> Vec<&ProjectedRow> {
        let Some(projection) = &self.projection else {
            return Vec::new();
        };
        self.projection_selection
            .iter()
            .filter_map(|&i| projection.row(i))
            .collect()
    }

    // ---- Adding traces ----

    /// Plot the selected projection rows of the current file.
    pub fn add_selected_to_plot(&mut self) -> Result<usize, SessionError> {
        let file = self.current_file.ok_or(SessionError::NoFile)?;
        let mut batch = TraceBatch::default();
        for row in self.selected_rows() {
            batch.push(format!("File{file}: {}", row.label), row.x.clone(), row.y.clone());
        }
        self.append_to(self.axis.surface(), batch)
    }

    /// Like [`add_selected_to_plot`](Self::add_selected_to_plot), and also
    /// plot the rows with exactly the same label from every other file.
    pub fn add_from_all_files(&mut self) -> Result<usize, SessionError> {
        let file = self.current_file.ok_or(SessionError::NoFile)?;
        let tag = self.axis.tag();
        let others: Vec<(usize, Projection)> = self
            .files
            .iter()
            .enumerate()
            .filter(|&(k, _)| k != file)
            .map(|(k, raw)| (k, project(raw, self.axis)))
            .collect();

        let mut batch = TraceBatch::default();
        for row in self.selected_rows() {
            let value = row.label.value;
            batch.push(format!("File{file}: {tag}={value}"), row.x.clone(), row.y.clone());
            for (k, other) in &others {
                if let Some(r) = other.find_label(value).and_then(|i| other.row(i)) {
                    batch.push(format!("File{k}: {tag}={value}"), r.x.clone(), r.y.clone());
                }
            }
        }
        self.append_to(self.axis.surface(), batch)
    }

    /// SVD of the selected projection rows. Right singular vectors go to the
    /// projection's own surface, left ones to the other surface.
    ///
    /// Returns the number of components kept; `Ok(None)` when `components`
    /// is zero.
    pub fn run_svd(&mut self, components: usize, scale: bool) -> Result<Option<usize>, SessionError> {
        let file = self.current_file.ok_or(SessionError::NoFile)?;
        let rows = self.selected_rows();
        let matrix: Vec<Vec<f64>> = rows.iter().map(|r| r.y.clone()).collect();
        let row_axis: Vec<f64> = rows.iter().map(|r| r.label.value).collect();
        let column_axis: Vec<f64> = rows.first().map(|r| r.x.clone()).unwrap_or_default();

        let Some(mut result) = svd::analyze(&matrix, components)? else {
            return Ok(None);
        };
        if scale {
            result = result.scaled();
        }
        let kept = result.components();
        if kept < components {
            self.settings.svd_components = kept;
        }

        let prefix = format!("SVD{file}");
        let own = self.axis.surface();
        self.append_to(own.other(), result.column_traces(&prefix, &row_axis))?;
        self.append_to(own, result.row_traces(&prefix, &column_axis))?;
        Ok(Some(kept))
    }

    fn append_to(&mut self, surface: Surface, batch: TraceBatch) -> Result<usize, SessionError> {
        let style = self.settings.style;
        let state = self.surface_mut(surface);
        let added = state.traces.append_batch(batch)?.len();
        state.refresh(&style);
        self.active = surface;
        Ok(added)
    }

    // ---- Trace table ----

    pub fn select_all_traces(&mut self) {
        let surface = self.surface_mut(self.active);
        surface.selection = (0..surface.traces.len()).collect();
    }

    pub fn select_no_traces(&mut self) {
        self.surface_mut(self.active).selection.clear();
    }

    pub fn toggle_trace(&mut self, index: usize) {
        let selection = &mut self.surface_mut(self.active).selection;
        if !selection.remove(&index) {
            selection.insert(index);
        }
    }

    /// Draw the selected traces as lines, as scatter or not at all.
    pub fn set_selected_visibility(&mut self, visibility: Visibility) -> Result<(), SessionError> {
        let style = self.settings.style;
        let surface = self.surface_mut(self.active);
        let selected = surface.selected();
        surface.traces.set_visibility(&selected, visibility)?;
        surface.traces.redraw_all(&style);
        Ok(())
    }

    pub fn remove_selected_traces(&mut self) -> Result<bool, SessionError> {
        let style = self.settings.style;
        let surface = self.surface_mut(self.active);
        let selected = surface.selected();
        let removed = surface.traces.remove_indices(&selected)?;
        surface.selection.clear();
        if removed {
            surface.refresh(&style);
        }
        Ok(removed)
    }

    /// Drop every trace of the active surface and start over.
    pub fn reset_surface(&mut self) {
        let surface = self.active;
        *self.surface_mut(surface) = SurfaceState::new(surface);
        if let Some(PendingAction::Algebra { surface: s, .. } | PendingAction::Export { surface: s, .. }) =
            &self.pending
        {
            if *s == surface {
                self.pending = None;
            }
        }
    }

    // ---- Algebra and export ----

    /// Run `operation` on the selection of the active surface.
    pub fn request_algebra(&mut self, operation: Operation) -> Result<Request, SessionError> {
        let surface = self.active;
        let state = self.surface(surface);
        let Some(plan) = algebra::plan(&state.traces, &state.selected(), operation)? else {
            return Ok(Request::NoOp);
        };
        let pending = PendingAction::Algebra { surface, plan };
        self.park_or_commit(pending)
    }

    /// Save the selected traces of the active surface to `path`.
    pub fn request_export(&mut self, path: PathBuf) -> Result<Request, SessionError> {
        let surface = self.active;
        let state = self.surface(surface);
        let Some(plan) = export::plan(&state.traces, &state.selected())? else {
            return Ok(Request::NoOp);
        };
        let pending = PendingAction::Export {
            surface,
            plan,
            path,
        };
        self.park_or_commit(pending)
    }

    fn park_or_commit(&mut self, action: PendingAction) -> Result<Request, SessionError> {
        let incompatible = action.incompatible_count();
        if incompatible > 0 {
            self.status_message = Some(action.message());
            self.pending = Some(action);
            return Ok(Request::NeedsConfirmation { incompatible });
        }
        self.commit(action)?;
        Ok(Request::Applied)
    }

    /// Proceed with the pending action, ignoring incompatible traces.
    pub fn confirm_pending(&mut self) -> Result<Request, SessionError> {
        match self.pending.take() {
            Some(action) => {
                self.status_message = None;
                self.commit(action)?;
                Ok(Request::Applied)
            }
            None => Ok(Request::NoOp),
        }
    }

    pub fn cancel_pending(&mut self) {
        if self.pending.take().is_some() {
            self.status_message = None;
        }
    }

    fn commit(&mut self, action: PendingAction) -> Result<(), SessionError> {
        match action {
            PendingAction::Algebra { surface, plan } => {
                info!("Applying {:?} to {surface}", plan.operation());
                let style = self.settings.style;
                let state = self.surface_mut(surface);
                let outcome = plan.apply(&mut state.traces, &style)?;
                state.selection.clear();
                state.view.auto_range(outcome.bounds);
            }
            PendingAction::Export { plan, path, .. } => {
                plan.write_file(&path)?;
                self.settings.last_directory = path.parent().map(Path::to_path_buf);
            }
        }
        Ok(())
    }

    // ---- Style and view ----

    /// Apply a new style to every surface.
    pub fn set_style(&mut self, style: StyleConfig) {
        self.settings.style = style;
        for surface in &mut self.surfaces {
            surface.traces.redraw_all(&style);
        }
    }

    /// Redraw the active surface and fit the view to its traces.
    pub fn auto_range(&mut self) -> Option<Bounds> {
        let style = self.settings.style;
        self.surface_mut(self.active).refresh(&style)
    }

    /// Parse and apply one command to the active surface's view.
    ///
    /// Spectra are always drawn on a linear wavelength axis.
    pub fn apply_plot_command(&mut self, text: &str) -> Result<(), SessionError> {
        let command: PlotCommand = text.parse()?;
        if self.active == Surface::Spectra && command == PlotCommand::XScale(true) {
            return Err(CommandError::BadArguments {
                command: "xscale",
                expected: "'linear' for spectra",
            }
            .into());
        }
        let style = self.settings.style;
        let surface = self.surface_mut(self.active);
        let bounds = surface.traces.redraw_all(&style);
        surface.view.apply(command, bounds);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::FileFormat;
    use crate::error::TraceError;

    fn raw(name: &str, t: &[f64], w: &[f64]) -> RawFile {
        let z = t
            .iter()
            .map(|&ti| w.iter().map(|&wi| ti * 10.0 + wi / 100.0).collect())
            .collect();
        RawFile::new(name, FileFormat::KinTek, t.to_vec(), w.to_vec(), z).unwrap()
    }

    fn state_with_two_files() -> AppState {
        let mut state = AppState::default();
        state.add_file(raw("a", &[0.0, 1.0, 2.0], &[400.0, 500.0, 600.0]));
        state.add_file(raw("b", &[0.0, 1.0, 2.0, 3.0], &[500.0, 700.0]));
        state
    }

    fn names(state: &AppState, surface: Surface) -> Vec<String> {
        state
            .surface(surface)
            .traces
            .iter()
            .map(|t| t.name().to_string())
            .collect()
    }

    #[test]
    fn first_file_becomes_current() {
        let state = state_with_two_files();
        assert_eq!(state.current_file, Some(0));
        assert_eq!(state.projection().unwrap().len(), 3);
    }

    #[test]
    fn add_selected_names_and_surface() {
        let mut state = state_with_two_files();
        state.projection_selection.extend([0, 2]);
        assert_eq!(state.add_selected_to_plot().unwrap(), 2);
        assert_eq!(state.active, Surface::Traces);
        assert_eq!(names(&state, Surface::Traces), vec!["File0: 400 nm", "File0: 600 nm"]);
        assert!(state.surface(Surface::Traces).view.limits.is_some());

        state.toggle_axis();
        assert!(state.projection_selection.is_empty());
        state.projection_selection.insert(1);
        state.add_selected_to_plot().unwrap();
        assert_eq!(state.active, Surface::Spectra);
        assert_eq!(names(&state, Surface::Spectra), vec!["File0: 1 s"]);
    }

    #[test]
    fn add_from_all_files_matches_exact_labels() {
        let mut state = state_with_two_files();
        state.projection_selection.extend([0, 1]);
        assert_eq!(state.add_from_all_files().unwrap(), 3);
        assert_eq!(
            names(&state, Surface::Traces),
            vec!["File0: l=400", "File0: l=500", "File1: l=500"]
        );
        let other = state.surface(Surface::Traces).traces.get(2).unwrap();
        assert_eq!(other.x(), &[0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn range_select_unions_into_selection() {
        let mut state = state_with_two_files();
        state.projection_selection.insert(1);
        assert_eq!(state.range_select(400.0, 600.0, 2, RangeMode::Linear), Some(2));
        assert_eq!(
            state.projection_selection.iter().copied().collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(state.range_select(0.0, 600.0, 2, RangeMode::Log), None);
    }

    #[test]
    fn svd_fills_both_surfaces_and_clamps() {
        let mut state = state_with_two_files();
        state.projection_selection.extend([0, 1]);
        assert_eq!(state.run_svd(5, true).unwrap(), Some(2));
        assert_eq!(state.settings.svd_components, 2);

        let traces = &state.surface(Surface::Traces).traces;
        let spectra = &state.surface(Surface::Spectra).traces;
        assert_eq!(traces.len(), 2);
        assert_eq!(spectra.len(), 2);
        // Right vectors run over time, left vectors over the selected wavelengths.
        assert_eq!(traces.get(0).unwrap().x(), &[0.0, 1.0, 2.0]);
        assert_eq!(spectra.get(0).unwrap().x(), &[400.0, 500.0]);
        assert!(traces.get(0).unwrap().name().starts_with("SVD0 : eig="));
    }

    #[test]
    fn svd_without_selection_is_empty_matrix() {
        let mut state = state_with_two_files();
        assert!(matches!(
            state.run_svd(2, false),
            Err(SessionError::Svd(crate::error::SvdError::EmptyMatrix))
        ));
        state.projection_selection.insert(0);
        assert_eq!(state.run_svd(0, false).unwrap(), None);
    }

    #[test]
    fn incompatible_algebra_waits_for_confirmation() {
        let mut state = state_with_two_files();
        state.projection_selection.extend([0, 1]);
        state.add_from_all_files().unwrap();
        state.select_all_traces();

        let request = state.request_algebra(Operation::AddScalar(1.0)).unwrap();
        assert_eq!(request, Request::NeedsConfirmation { incompatible: 1 });
        assert_eq!(state.surface(Surface::Traces).traces.len(), 3);

        state.cancel_pending();
        assert!(state.pending.is_none());
        assert_eq!(state.surface(Surface::Traces).traces.len(), 3);

        state.request_algebra(Operation::AddScalar(1.0)).unwrap();
        assert_eq!(state.confirm_pending().unwrap(), Request::Applied);
        let set = &state.surface(Surface::Traces).traces;
        assert_eq!(set.len(), 5);
        assert!((0..3).all(|i| set.get(i).unwrap().visibility() == Visibility::Hidden));
        assert!(state.surface(Surface::Traces).selection.is_empty());
    }

    /// Traces: [File0 l=500, File1 l=500, File0 400 nm, File0 600 nm] with
    /// a parked AddScalar on traces 1 and 2.
    fn parked_algebra() -> AppState {
        let mut state = state_with_two_files();
        state.projection_selection.insert(1);
        state.add_from_all_files().unwrap();
        state.projection_selection.clear();
        state.projection_selection.extend([0, 2]);
        state.add_selected_to_plot().unwrap();

        state.toggle_trace(1);
        state.toggle_trace(2);
        let request = state.request_algebra(Operation::AddScalar(1.0)).unwrap();
        assert_eq!(request, Request::NeedsConfirmation { incompatible: 1 });
        state
    }

    #[test]
    fn confirm_after_removing_other_trace_hides_only_sources() {
        let mut state = parked_algebra();
        state.select_no_traces();
        state.toggle_trace(0);
        assert!(state.remove_selected_traces().unwrap());

        assert_eq!(state.confirm_pending().unwrap(), Request::Applied);
        let shown: Vec<(String, Visibility)> = state
            .surface(Surface::Traces)
            .traces
            .iter()
            .map(|t| (t.name().to_string(), t.visibility()))
            .collect();
        assert_eq!(
            shown,
            vec![
                ("File1: l=500".to_string(), Visibility::Hidden),
                ("File0: 400 nm".to_string(), Visibility::Hidden),
                ("File0: 600 nm".to_string(), Visibility::Line),
                ("File1: l=500 (+1)".to_string(), Visibility::Line),
            ]
        );
    }

    #[test]
    fn confirm_after_removing_a_source_changes_nothing() {
        let mut state = parked_algebra();
        state.select_no_traces();
        state.toggle_trace(1);
        state.remove_selected_traces().unwrap();
        let before: Vec<_> = state.surface(Surface::Traces).traces.iter().cloned().collect();

        assert!(matches!(
            state.confirm_pending(),
            Err(SessionError::Trace(TraceError::SourceRemoved { .. }))
        ));
        assert!(state.pending.is_none());
        let after: Vec<_> = state.surface(Surface::Traces).traces.iter().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn compatible_algebra_applies_directly() {
        let mut state = state_with_two_files();
        state.projection_selection.extend([0, 1]);
        state.add_selected_to_plot().unwrap();
        state.select_all_traces();
        assert_eq!(
            state.request_algebra(Operation::MulScalar(2.0)).unwrap(),
            Request::Applied
        );
        assert_eq!(state.surface(Surface::Traces).traces.len(), 4);
        assert_eq!(
            state.request_algebra(Operation::MulScalar(2.0)).unwrap(),
            Request::NoOp
        );
    }

    #[test]
    fn remove_selected_traces_keeps_order() {
        let mut state = state_with_two_files();
        state.projection_selection.extend([0, 1, 2]);
        state.add_selected_to_plot().unwrap();
        state.toggle_trace(1);
        assert!(state.remove_selected_traces().unwrap());
        assert_eq!(names(&state, Surface::Traces), vec!["File0: 400 nm", "File0: 600 nm"]);
        assert!(!state.remove_selected_traces().unwrap());
    }

    #[test]
    fn visibility_out_of_range_is_reported() {
        let mut state = state_with_two_files();
        state.toggle_trace(4);
        assert!(matches!(
            state.set_selected_visibility(Visibility::Hidden),
            Err(SessionError::Trace(TraceError::IndexOutOfRange { .. }))
        ));
    }

    #[test]
    fn remove_current_file_moves_selection() {
        let mut state = state_with_two_files();
        state.select_file(1);
        state.remove_current_file();
        assert_eq!(state.current_file, Some(0));
        state.remove_current_file();
        assert_eq!(state.current_file, None);
        assert!(state.projection().is_none());
        assert!(matches!(state.add_selected_to_plot(), Err(SessionError::NoFile)));
    }

    #[test]
    fn reset_surface_clears_traces() {
        let mut state = state_with_two_files();
        state.projection_selection.insert(0);
        state.add_selected_to_plot().unwrap();
        state.reset_surface();
        assert!(state.surface(Surface::Traces).traces.is_empty());
        assert!(state.surface(Surface::Traces).view.limits.is_none());
    }

    #[test]
    fn plot_commands_reach_the_active_view() {
        let mut state = state_with_two_files();
        state.apply_plot_command("grid off").unwrap();
        assert!(!state.surface(Surface::Traces).view.grid);
        assert!(matches!(
            state.apply_plot_command("import os"),
            Err(SessionError::Command(_))
        ));

        state.active = Surface::Spectra;
        assert!(state.apply_plot_command("xscale log").is_err());
        assert!(!state.surface(Surface::Spectra).view.x_log);
        state.apply_plot_command("yscale log").unwrap();
        assert!(state.surface(Surface::Spectra).view.y_log);
    }

    #[test]
    fn select_projection_rows_ignores_out_of_range() {
        let mut state = state_with_two_files();
        state.select_projection_rows(&[2, 7, 0]);
        assert_eq!(
            state.projection_selection.iter().copied().collect::<Vec<_>>(),
            vec![0, 2]
        );
    }

    #[test]
    fn style_change_redraws_every_surface() {
        let mut state = state_with_two_files();
        state.projection_selection.insert(0);
        state.add_selected_to_plot().unwrap();
        let style = StyleConfig {
            line_width: 4.0,
            ..StyleConfig::default()
        };
        state.set_style(style);
        let item = &state.surface(Surface::Traces).traces.draw_list()[0];
        assert_eq!(item.style, crate::trace::DrawStyle::Line { width: 4.0 });
    }
}
