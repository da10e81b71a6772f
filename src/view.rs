use std::str::FromStr;

use crate::error::CommandError;
use crate::trace::Bounds;

/// Smallest positive limit used when a log axis would otherwise include zero.
pub const LOG_EPSILON: f64 = 1e-4;

// ---------------------------------------------------------------------------
// ViewSettings – axis state of one plot surface
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ViewSettings {
    /// Visible window; `None` until the first auto range.
    pub limits: Option<Bounds>,
    pub x_log: bool,
    pub y_log: bool,
    pub grid: bool,
    pub legend: bool,
    /// Set when `limits` changed and the renderer has not applied them yet.
    limits_changed: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            limits: None,
            x_log: false,
            y_log: false,
            grid: true,
            legend: true,
            limits_changed: false,
        }
    }
}

impl ViewSettings {
    /// Replace the limits with fresh data bounds; `None` keeps the old ones.
    pub fn auto_range(&mut self, bounds: Option<Bounds>) {
        if let Some(b) = bounds {
            self.set_limits(b);
        }
    }

    /// Set the visible window, keeping each axis ordered.
    pub fn set_limits(&mut self, b: Bounds) {
        let (x_min, x_max) = ordered(b.x_min, b.x_max);
        let (y_min, y_max) = ordered(b.y_min, b.y_max);
        self.limits = Some(Bounds {
            x_min,
            x_max,
            y_min,
            y_max,
        });
        self.limits_changed = true;
    }

    pub fn set_x_limits(&mut self, min: f64, max: f64) {
        let b = self.limits.unwrap_or(Bounds {
            x_min: min,
            x_max: max,
            y_min: 0.0,
            y_max: 1.0,
        });
        self.set_limits(Bounds {
            x_min: min,
            x_max: max,
            ..b
        });
    }

    pub fn set_y_limits(&mut self, min: f64, max: f64) {
        let b = self.limits.unwrap_or(Bounds {
            x_min: 0.0,
            x_max: 1.0,
            y_min: min,
            y_max: max,
        });
        self.set_limits(Bounds {
            y_min: min,
            y_max: max,
            ..b
        });
    }

    /// Switch the x axis scale. A log axis straddling zero starts at
    /// [`LOG_EPSILON`] instead.
    pub fn set_x_log(&mut self, on: bool) {
        self.x_log = on;
        if let Some(b) = self.limits.filter(|b| on && b.x_min < 0.0 && b.x_max > 0.0) {
            self.set_x_limits(LOG_EPSILON, b.x_max);
        }
    }

    pub fn set_y_log(&mut self, on: bool) {
        self.y_log = on;
        if let Some(b) = self.limits.filter(|b| on && b.y_min < 0.0 && b.y_max > 0.0) {
            self.set_y_limits(LOG_EPSILON, b.y_max);
        }
    }

    /// Limits not yet handed to the renderer.
    pub fn take_changed_limits(&mut self) -> Option<Bounds> {
        if std::mem::take(&mut self.limits_changed) {
            self.limits
        } else {
            None
        }
    }

    /// Apply a parsed command. `data_bounds` is used by `autoscale`.
    pub fn apply(&mut self, command: PlotCommand, data_bounds: Option<Bounds>) {
        match command {
            PlotCommand::XLim(min, max) => self.set_x_limits(min, max),
            PlotCommand::YLim(min, max) => self.set_y_limits(min, max),
            PlotCommand::XScale(log) => self.set_x_log(log),
            PlotCommand::YScale(log) => self.set_y_log(log),
            PlotCommand::Grid(on) => self.grid = on,
            PlotCommand::Legend(on) => self.legend = on,
            PlotCommand::Autoscale => self.auto_range(data_bounds),
        }
    }
}

/// Keep `min < max`, nudging `max` past `min` when they are out of order.
fn ordered(min: f64, max: f64) -> (f64, f64) {
    if min < max {
        (min, max)
    } else {
        (min, min + LOG_EPSILON)
    }
}

// ---------------------------------------------------------------------------
// PlotCommand – allowlisted axis commands
// ---------------------------------------------------------------------------

/// One line of the plot command box, e.g. `xlim 0 10` or `yscale log`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlotCommand {
    XLim(f64, f64),
    YLim(f64, f64),
    /// `true` for log scale.
    XScale(bool),
    YScale(bool),
    Grid(bool),
    Legend(bool),
    Autoscale,
}

impl FromStr for PlotCommand {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let keyword = words.next().ok_or(CommandError::Empty)?.to_ascii_lowercase();
        let args: Vec<&str> = words.collect();

        let command = match keyword.as_str() {
            "xlim" => {
                let (min, max) = two_numbers("xlim", &args)?;
                PlotCommand::XLim(min, max)
            }
            "ylim" => {
                let (min, max) = two_numbers("ylim", &args)?;
                PlotCommand::YLim(min, max)
            }
            "xscale" => PlotCommand::XScale(scale("xscale", &args)?),
            "yscale" => PlotCommand::YScale(scale("yscale", &args)?),
            "grid" => PlotCommand::Grid(switch("grid", &args)?),
            "legend" => PlotCommand::Legend(switch("legend", &args)?),
            "autoscale" if args.is_empty() => PlotCommand::Autoscale,
            "autoscale" => {
                return Err(CommandError::BadArguments {
                    command: "autoscale",
                    expected: "no arguments",
                })
            }
            _ => return Err(CommandError::Unknown(keyword.clone())),
        };
        Ok(command)
    }
}

fn two_numbers(command: &'static str, args: &[&str]) -> Result<(f64, f64), CommandError> {
    let bad = CommandError::BadArguments {
        command,
        expected: "two numbers",
    };
    match args {
        [a, b] => match (a.parse::<f64>(), b.parse::<f64>()) {
            (Ok(a), Ok(b)) if a.is_finite() && b.is_finite() => Ok((a, b)),
            _ => Err(bad),
        },
        _ => Err(bad),
    }
}

fn scale(command: &'static str, args: &[&str]) -> Result<bool, CommandError> {
    match args {
        [s] if s.eq_ignore_ascii_case("log") => Ok(true),
        [s] if s.eq_ignore_ascii_case("linear") => Ok(false),
        _ => Err(CommandError::BadArguments {
            command,
            expected: "'linear' or 'log'",
        }),
    }
}

fn switch(command: &'static str, args: &[&str]) -> Result<bool, CommandError> {
    match args {
        [s] if s.eq_ignore_ascii_case("on") => Ok(true),
        [s] if s.eq_ignore_ascii_case("off") => Ok(false),
        _ => Err(CommandError::BadArguments {
            command,
            expected: "'on' or 'off'",
        }),
    }
}
