use super::model::{Axis, AxisLabel, RawFile};

// ---------------------------------------------------------------------------
// Projection – selectable 1-D curves of one raw file
// ---------------------------------------------------------------------------

/// One selectable curve: the label it is selected by and its `(x, y)` data.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedRow {
    pub label: AxisLabel,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// A raw file viewed along one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    axis: Axis,
    rows: Vec<ProjectedRow>,
}

/// Project `file` along `axis`.
///
/// * [`Axis::ByWavelength`]: row `i` is the time trace at wavelength `w[i]`.
/// * [`Axis::ByTime`]: row `i` is the spectrum at time `t[i]`.
pub fn project(file: &RawFile, axis: Axis) -> Projection {
    let (labels, x) = match axis {
        Axis::ByWavelength => (file.wavelengths(), file.times()),
        Axis::ByTime => (file.times(), file.wavelengths()),
    };
    let z = file.matrix();

    let rows = labels
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let y = match axis {
                Axis::ByWavelength => z.iter().map(|row| row[i]).collect(),
                Axis::ByTime => z[i].clone(),
            };
            ProjectedRow {
                label: AxisLabel { axis, value },
                x: x.to_vec(),
                y,
            }
        })
        .collect();

    Projection { axis, rows }
}

impl Projection {
    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn rows(&self) -> &[ProjectedRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&ProjectedRow> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Label values in row order, for range selection.
    pub fn label_values(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.label.value).collect()
    }

    /// Index of the first row whose label equals `value` exactly.
    pub fn find_label(&self, value: f64) -> Option<usize> {
        self.rows.iter().position(|r| r.label.value == value)
    }
}
