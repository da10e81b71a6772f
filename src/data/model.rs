use std::fmt;

use crate::error::TraceError;
use crate::trace::Surface;

// ---------------------------------------------------------------------------
// FileFormat – which on-disk layout a RawFile came from
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Whitespace/tab-delimited matrix (`.txt`).
    KinTek,
    /// Comma-delimited matrix (`.csv`).
    ProDataCsv,
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::KinTek => write!(f, "KinTek"),
            FileFormat::ProDataCsv => write!(f, "ProDataCSV"),
        }
    }
}

// ---------------------------------------------------------------------------
// RawFile – one imported experiment
// ---------------------------------------------------------------------------

/// One stopped-flow experiment: a matrix indexed by time (rows) and
/// wavelength (columns). Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFile {
    name: String,
    format: FileFormat,
    /// Time axis, one entry per matrix row.
    t: Vec<f64>,
    /// Wavelength axis, one entry per matrix column.
    w: Vec<f64>,
    /// Absorbance matrix, `z[time][wavelength]`.
    z: Vec<Vec<f64>>,
}

impl RawFile {
    /// Build a raw file, checking that the matrix shape matches both axes.
    pub fn new(
        name: impl Into<String>,
        format: FileFormat,
        t: Vec<f64>,
        w: Vec<f64>,
        z: Vec<Vec<f64>>,
    ) -> Result<Self, TraceError> {
        if z.len() != t.len() {
            return Err(TraceError::DimensionMismatch(format!(
                "{} time points but {} matrix rows",
                t.len(),
                z.len()
            )));
        }
        if let Some((i, row)) = z.iter().enumerate().find(|(_, row)| row.len() != w.len()) {
            return Err(TraceError::DimensionMismatch(format!(
                "matrix row {i} has {} values but there are {} wavelengths",
                row.len(),
                w.len()
            )));
        }
        Ok(RawFile {
            name: name.into(),
            format,
            t,
            w,
            z,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    pub fn times(&self) -> &[f64] {
        &self.t
    }

    pub fn wavelengths(&self) -> &[f64] {
        &self.w
    }

    pub fn matrix(&self) -> &[Vec<f64>] {
        &self.z
    }

    /// `(rows, columns)` of the matrix, i.e. `(len(t), len(w))`.
    pub fn shape(&self) -> (usize, usize) {
        (self.t.len(), self.w.len())
    }
}

// ---------------------------------------------------------------------------
// Axis – which coordinate the user selects curves by
// ---------------------------------------------------------------------------

/// Selection axis of a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    /// Select wavelengths; each row is a time trace.
    #[default]
    ByWavelength,
    /// Select time points; each row is a spectrum.
    ByTime,
}

impl Axis {
    pub fn toggle(self) -> Self {
        match self {
            Axis::ByWavelength => Axis::ByTime,
            Axis::ByTime => Axis::ByWavelength,
        }
    }

    /// Unit of the selectable labels.
    pub fn unit(self) -> &'static str {
        match self {
            Axis::ByWavelength => "nm",
            Axis::ByTime => "s",
        }
    }

    /// Short tag used in cross-file trace names (`l=` / `t=`).
    pub fn tag(self) -> char {
        match self {
            Axis::ByWavelength => 'l',
            Axis::ByTime => 't',
        }
    }

    /// Plot surface that curves projected along this axis belong to.
    pub fn surface(self) -> Surface {
        match self {
            Axis::ByWavelength => Surface::Traces,
            Axis::ByTime => Surface::Spectra,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Axis::ByWavelength => "Wavelengths",
            Axis::ByTime => "Timepoints",
        }
    }
}

/// A selectable coordinate together with the axis it lives on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisLabel {
    pub axis: Axis,
    pub value: f64,
}

impl fmt::Display for AxisLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.axis.unit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_ragged_matrix() {
        let err = RawFile::new(
            "bad",
            FileFormat::KinTek,
            vec![0.0, 1.0],
            vec![400.0, 500.0],
            vec![vec![1.0, 2.0], vec![3.0]],
        )
        .unwrap_err();
        assert!(matches!(err, TraceError::DimensionMismatch(_)));
    }

    #[test]
    fn new_rejects_row_count_mismatch() {
        let err = RawFile::new("bad", FileFormat::KinTek, vec![0.0], vec![400.0], vec![])
            .unwrap_err();
        assert!(matches!(err, TraceError::DimensionMismatch(_)));
    }

    #[test]
    fn axis_toggle_is_an_involution() {
        for axis in [Axis::ByWavelength, Axis::ByTime] {
            assert_eq!(axis.toggle().toggle(), axis);
            assert_ne!(axis.toggle(), axis);
        }
    }

    #[test]
    fn label_display_carries_unit() {
        let label = AxisLabel {
            axis: Axis::ByWavelength,
            value: 450.0,
        };
        assert_eq!(label.to_string(), "450 nm");
        let label = AxisLabel {
            axis: Axis::ByTime,
            value: 0.25,
        };
        assert_eq!(label.to_string(), "0.25 s");
    }
}
