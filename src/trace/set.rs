use std::ops::Range;

use eframe::egui::Color32;
use log::debug;

use super::{Surface, Trace, TraceBatch, Visibility};
use crate::color::color_for_seed;
use crate::config::StyleConfig;
use crate::error::TraceError;

/// Fraction of the data span added on each side of the bounding box.
const BOUNDS_MARGIN: f64 = 0.05;

/// Half-width used when all visible samples share one coordinate.
const FLAT_SPAN_PAD: f64 = 0.5;

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// Axis-aligned data bounds of a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

// ---------------------------------------------------------------------------
// Draw list – what the renderer paints after `redraw_all`
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawStyle {
    Line { width: f32 },
    Scatter { radius: f32 },
}

/// One rendered trace, in legend order.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    /// Index of the trace in its set.
    pub index: usize,
    pub name: String,
    pub color: Color32,
    pub style: DrawStyle,
    pub points: Vec<[f64; 2]>,
}

// ---------------------------------------------------------------------------
// TraceSet
// ---------------------------------------------------------------------------

/// Ordered traces of one plot surface.
#[derive(Debug, Clone, Default)]
pub struct TraceSet {
    surface: Surface,
    traces: Vec<Trace>,
    next_seed: u64,
    draw_list: Vec<DrawItem>,
}

impl TraceSet {
    pub fn new(surface: Surface) -> Self {
        Self {
            surface,
            ..Default::default()
        }
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn len(&self) -> usize {
        self.traces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Trace> {
        self.traces.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trace> {
        self.traces.iter()
    }

    /// Entries produced by the last [`redraw_all`](Self::redraw_all).
    pub fn draw_list(&self) -> &[DrawItem] {
        &self.draw_list
    }

    /// Look up a trace, failing with `IndexOutOfRange`.
    pub fn trace(&self, index: usize) -> Result<&Trace, TraceError> {
        self.traces.get(index).ok_or(TraceError::IndexOutOfRange {
            index,
            len: self.traces.len(),
        })
    }

    /// Current index of the trace created with `seed`.
    pub fn index_of_seed(&self, seed: u64) -> Option<usize> {
        self.traces.iter().position(|t| t.style_seed == seed)
    }

    /// Fail on the first index that does not address a trace.
    pub fn check_indices(&self, indices: &[usize]) -> Result<(), TraceError> {
        match indices.iter().find(|&&i| i >= self.traces.len()) {
            Some(&index) => Err(TraceError::IndexOutOfRange {
                index,
                len: self.traces.len(),
            }),
            None => Ok(()),
        }
    }

    /// Append one trace per name, all line-visible, in order.
    ///
    /// Every length is checked before anything is appended.
    pub fn append(
        &mut self,
        names: Vec<String>,
        xs: Vec<Vec<f64>>,
        ys: Vec<Vec<f64>>,
    ) -> Result<Range<usize>, TraceError> {
        if names.len() != xs.len() || names.len() != ys.len() {
            return Err(TraceError::DimensionMismatch(format!(
                "{} names, {} x sequences, {} y sequences",
                names.len(),
                xs.len(),
                ys.len()
            )));
        }
        if let Some(i) = (0..xs.len()).find(|&i| xs[i].len() != ys[i].len()) {
            return Err(TraceError::DimensionMismatch(format!(
                "trace {i} has {} x values but {} y values",
                xs[i].len(),
                ys[i].len()
            )));
        }

        let start = self.traces.len();
        for ((name, x), y) in names.into_iter().zip(xs).zip(ys) {
            let style_seed = self.next_seed;
            self.next_seed += 1;
            self.traces.push(Trace {
                name,
                x,
                y,
                visibility: Visibility::Line,
                style_seed,
            });
        }
        debug!(
            "{}: appended {} trace(s)",
            self.surface,
            self.traces.len() - start
        );
        Ok(start..self.traces.len())
    }

    pub fn append_batch(&mut self, batch: TraceBatch) -> Result<Range<usize>, TraceError> {
        self.append(batch.names, batch.xs, batch.ys)
    }

    /// Remove `count` traces starting at `start`. Returns whether anything
    /// was removed.
    pub fn remove_range(&mut self, start: usize, count: usize) -> Result<bool, TraceError> {
        let end = start
            .checked_add(count)
            .filter(|&end| end <= self.traces.len())
            .ok_or(TraceError::IndexOutOfRange {
                index: start.saturating_add(count.saturating_sub(1)),
                len: self.traces.len(),
            })?;
        self.traces.drain(start..end);
        if count > 0 {
            debug!("{}: removed traces {start}..{end}", self.surface);
        }
        Ok(count > 0)
    }

    /// Remove every listed trace. Indices are applied from highest to lowest
    /// so earlier ones stay valid; duplicates are ignored.
    pub fn remove_indices(&mut self, indices: &[usize]) -> Result<bool, TraceError> {
        self.check_indices(indices)?;
        let mut sorted = indices.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();

        let mut removed_any = false;
        for index in sorted {
            removed_any |= self.remove_range(index, 1)?;
        }
        Ok(removed_any)
    }

    /// Set the visibility of every listed trace.
    pub fn set_visibility(
        &mut self,
        indices: &[usize],
        visibility: Visibility,
    ) -> Result<(), TraceError> {
        self.check_indices(indices)?;
        for &i in indices {
            self.traces[i].visibility = visibility;
        }
        Ok(())
    }

    /// Bounding box of every non-hidden trace, padded by a small margin.
    pub fn recompute_bounds(&self) -> Option<Bounds> {
        let mut points = self
            .traces
            .iter()
            .filter(|t| t.visibility != Visibility::Hidden)
            .flat_map(|t| t.x.iter().copied().zip(t.y.iter().copied()))
            .filter(|(x, y)| x.is_finite() && y.is_finite());

        let (x0, y0) = points.next()?;
        let (mut x_min, mut x_max, mut y_min, mut y_max) = (x0, x0, y0, y0);
        for (x, y) in points {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }

        let (x_min, x_max) = pad(x_min, x_max);
        let (y_min, y_max) = pad(y_min, y_max);
        Some(Bounds {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    /// Rebuild the draw list in insertion order with `style`, then return
    /// the new bounds.
    pub fn redraw_all(&mut self, style: &StyleConfig) -> Option<Bounds> {
        let stride = style.marker_stride.max(1);
        self.draw_list = self
            .traces
            .iter()
            .enumerate()
            .filter_map(|(index, trace)| {
                let points = trace.x.iter().zip(&trace.y).map(|(&x, &y)| [x, y]);
                let (style, points) = match trace.visibility {
                    Visibility::Hidden => return None,
                    Visibility::Line => (
                        DrawStyle::Line {
                            width: style.line_width,
                        },
                        points.collect(),
                    ),
                    Visibility::Scatter => (
                        DrawStyle::Scatter {
                            radius: style.marker_radius(),
                        },
                        points.step_by(stride).collect(),
                    ),
                };
                Some(DrawItem {
                    index,
                    name: trace.name.clone(),
                    color: color_for_seed(trace.style_seed),
                    style,
                    points,
                })
            })
            .collect();
        self.recompute_bounds()
    }
}

fn pad(min: f64, max: f64) -> (f64, f64) {
    let span = max - min;
    if span > 0.0 {
        (min - span * BOUNDS_MARGIN, max + span * BOUNDS_MARGIN)
    } else {
        (min - FLAT_SPAN_PAD, max + FLAT_SPAN_PAD)
    }
}
