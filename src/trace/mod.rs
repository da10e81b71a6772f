/// Trace layer: plot surfaces and the curves shown on them.
///
/// ```text
///   Projection rows ──► TraceBatch ──► TraceSet::append
///                                          │
///        algebra::plan ◄── selection ──────┤
///        export::plan  ◄── selection ──────┤
///                                          ▼
///                           redraw_all(style) → draw list + bounds
/// ```

pub mod algebra;
pub mod export;
pub mod set;

use std::fmt;

pub use set::{Bounds, DrawItem, DrawStyle, TraceSet};

// ---------------------------------------------------------------------------
// Surface – one of the two plot contexts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Surface {
    /// Time-indexed curves (kinetic traces).
    #[default]
    Traces,
    /// Wavelength-indexed curves (spectra).
    Spectra,
}

impl Surface {
    pub const ALL: [Surface; 2] = [Surface::Traces, Surface::Spectra];

    pub fn index(self) -> usize {
        match self {
            Surface::Traces => 0,
            Surface::Spectra => 1,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Surface::Traces => Surface::Spectra,
            Surface::Spectra => Surface::Traces,
        }
    }

    pub fn x_axis_label(self) -> &'static str {
        match self {
            Surface::Traces => "Time (s)",
            Surface::Spectra => "Wavelength (nm)",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Surface::Traces => write!(f, "Time Traces"),
            Surface::Spectra => write!(f, "Spectra"),
        }
    }
}

// ---------------------------------------------------------------------------
// Trace
// ---------------------------------------------------------------------------

/// How a trace is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Line,
    Scatter,
    Hidden,
}

/// A named `(x, y)` curve. The data never changes after creation; derived
/// curves are always new traces.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    name: String,
    x: Vec<f64>,
    y: Vec<f64>,
    visibility: Visibility,
    style_seed: u64,
}

impl Trace {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn style_seed(&self) -> u64 {
        self.style_seed
    }

    /// Exact elementwise equality of the x axes.
    pub fn is_x_compatible(&self, other: &Trace) -> bool {
        x_compatible(&self.x, &other.x)
    }
}

/// Two x axes are compatible when they have the same length and every
/// sample compares equal.
pub fn x_compatible(a: &[f64], b: &[f64]) -> bool {
    a == b
}

// ---------------------------------------------------------------------------
// TraceBatch – traces waiting to be appended
// ---------------------------------------------------------------------------

/// Parallel name/x/y columns for [`TraceSet::append`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraceBatch {
    pub names: Vec<String>,
    pub xs: Vec<Vec<f64>>,
    pub ys: Vec<Vec<f64>>,
}

impl TraceBatch {
    pub fn push(&mut self, name: impl Into<String>, x: Vec<f64>, y: Vec<f64>) {
        self.names.push(name.into());
        self.xs.push(x);
        self.ys.push(y);
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
