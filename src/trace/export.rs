use std::io::Write;
use std::path::Path;

use log::{info, warn};

use super::set::TraceSet;
use super::Surface;
use crate::error::{ExportError, TraceError};

// ---------------------------------------------------------------------------
// Export plan
// ---------------------------------------------------------------------------

/// Traces sharing one x axis, ready to be written as tab-delimited text.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPlan {
    surface: Surface,
    x: Vec<f64>,
    /// `(name, y)` per exported trace, in selection order.
    columns: Vec<(String, Vec<f64>)>,
    incompatible: usize,
}

/// Collect the selected traces that share the x axis of the first one.
///
/// Names lose their whitespace so that every header cell stays one token.
/// Returns `Ok(None)` for an empty selection.
pub fn plan(set: &TraceSet, selection: &[usize]) -> Result<Option<ExportPlan>, TraceError> {
    let Some(&first) = selection.first() else {
        return Ok(None);
    };
    set.check_indices(selection)?;

    let reference = set.trace(first)?;
    let mut columns = Vec::with_capacity(selection.len());
    let mut incompatible = 0;
    for &i in selection {
        let trace = set.trace(i)?;
        if reference.is_x_compatible(trace) {
            columns.push((strip_whitespace(trace.name()), trace.y().to_vec()));
        } else {
            incompatible += 1;
        }
    }
    if incompatible > 0 {
        warn!("export: {incompatible} selected trace(s) have different x-axis points");
    }

    Ok(Some(ExportPlan {
        surface: set.surface(),
        x: reference.x().to_vec(),
        columns,
        incompatible,
    }))
}

fn strip_whitespace(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

impl ExportPlan {
    pub fn incompatible_count(&self) -> usize {
        self.incompatible
    }

    pub fn trace_count(&self) -> usize {
        self.columns.len()
    }

    /// Write the traces to `out`.
    ///
    /// * Traces surface: header `Time` + names, then one row per x value.
    /// * Spectra surface: header `Time` + x values, then one row per trace,
    ///   ordered by the numeric value of the names (lexically if any name
    ///   is not a number).
    pub fn write_to<W: Write>(&self, out: W) -> Result<(), ExportError> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(out);

        match self.surface {
            Surface::Traces => {
                let header = std::iter::once("Time".to_string())
                    .chain(self.columns.iter().map(|(name, _)| name.clone()));
                writer.write_record(header)?;
                for (k, x) in self.x.iter().enumerate() {
                    let row = std::iter::once(x.to_string())
                        .chain(self.columns.iter().map(|(_, y)| y[k].to_string()));
                    writer.write_record(row)?;
                }
            }
            Surface::Spectra => {
                let header = std::iter::once("Time".to_string())
                    .chain(self.x.iter().map(|x| x.to_string()));
                writer.write_record(header)?;
                for i in self.row_order() {
                    let (name, y) = &self.columns[i];
                    let row = std::iter::once(name.clone()).chain(y.iter().map(|v| v.to_string()));
                    writer.write_record(row)?;
                }
            }
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_file(&self, path: &Path) -> Result<(), ExportError> {
        let file = std::fs::File::create(path)?;
        self.write_to(std::io::BufWriter::new(file))?;
        info!(
            "Exported {} trace(s) from {} to {}",
            self.columns.len(),
            self.surface,
            path.display()
        );
        Ok(())
    }

    /// Row order for the spectra layout.
    fn row_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.columns.len()).collect();
        let numeric: Option<Vec<f64>> = self
            .columns
            .iter()
            .map(|(name, _)| name.parse::<f64>().ok())
            .collect();
        match numeric {
            Some(values) => order.sort_by(|&a, &b| values[a].total_cmp(&values[b])),
            None => order.sort_by(|&a, &b| self.columns[a].0.cmp(&self.columns[b].0)),
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::TraceBatch;

    fn export(set: &TraceSet, selection: &[usize]) -> String {
        let plan = plan(set, selection).unwrap().unwrap();
        let mut out = Vec::new();
        plan.write_to(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn time_traces_layout() {
        let mut set = TraceSet::new(Surface::Traces);
        let mut batch = TraceBatch::default();
        batch.push("A", vec![0.0, 1.0, 2.0], vec![1.0, 2.0, 3.0]);
        batch.push("B", vec![0.0, 1.0, 2.0], vec![4.0, 5.0, 6.0]);
        set.append_batch(batch).unwrap();

        assert_eq!(export(&set, &[0, 1]), "Time\tA\tB\n0\t1\t4\n1\t2\t5\n2\t3\t6\n");
    }

    #[test]
    fn names_lose_whitespace_and_incompatible_are_skipped() {
        let mut set = TraceSet::new(Surface::Traces);
        let mut batch = TraceBatch::default();
        batch.push("File0: 450 nm", vec![0.0, 0.5], vec![0.25, 0.5]);
        batch.push("other", vec![0.0, 0.6], vec![1.0, 1.0]);
        set.append_batch(batch).unwrap();

        let plan = plan(&set, &[0, 1]).unwrap().unwrap();
        assert_eq!(plan.incompatible_count(), 1);
        assert_eq!(plan.trace_count(), 1);
        assert_eq!(export(&set, &[0, 1]), "Time\tFile0:450nm\n0\t0.25\n0.5\t0.5\n");
    }

    #[test]
    fn spectra_rows_sorted_numerically() {
        let mut set = TraceSet::new(Surface::Spectra);
        let mut batch = TraceBatch::default();
        batch.push("10", vec![400.0, 500.0], vec![1.0, 2.0]);
        batch.push("2", vec![400.0, 500.0], vec![3.0, 4.0]);
        set.append_batch(batch).unwrap();

        assert_eq!(export(&set, &[0, 1]), "Time\t400\t500\n2\t3\t4\n10\t1\t2\n");
    }

    #[test]
    fn spectra_rows_fall_back_to_lexical_order() {
        let mut set = TraceSet::new(Surface::Spectra);
        let mut batch = TraceBatch::default();
        batch.push("b", vec![400.0], vec![1.0]);
        batch.push("10", vec![400.0], vec![2.0]);
        batch.push("a", vec![400.0], vec![3.0]);
        set.append_batch(batch).unwrap();

        assert_eq!(export(&set, &[0, 1, 2]), "Time\t400\n10\t2\na\t3\nb\t1\n");
    }

    #[test]
    fn empty_selection_exports_nothing() {
        let set = TraceSet::new(Surface::Traces);
        assert!(plan(&set, &[]).unwrap().is_none());
        assert!(plan(&set, &[0]).is_err());
    }
}
