//! Link curves.
//!
//! Every link is a two-point curve from the parent marker to the child marker. Output follows
//! the `d3-shape` link generators, with path numbers rounded to 3 decimals.

use crate::error::{Error, Result};
use crate::svg::util::fmt_path_into;
use arbor_core::Point;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Curve {
    /// Horizontal cubic bump; tangents are horizontal at both ends.
    #[default]
    BumpX,
    /// Vertical cubic bump; tangents are vertical at both ends.
    BumpY,
    Linear,
    /// Horizontal step at the midpoint.
    Step,
    /// Vertical segment first, then horizontal.
    StepBefore,
    /// Horizontal segment first, then vertical.
    StepAfter,
}

impl Curve {
    pub fn as_str(self) -> &'static str {
        match self {
            Curve::BumpX => "bumpX",
            Curve::BumpY => "bumpY",
            Curve::Linear => "linear",
            Curve::Step => "step",
            Curve::StepBefore => "stepBefore",
            Curve::StepAfter => "stepAfter",
        }
    }

    /// SVG path data from `source` to `target`.
    pub fn link_path(self, source: Point, target: Point) -> String {
        let mut out = String::with_capacity(48);
        self.link_path_into(&mut out, source, target);
        out
    }

    pub fn link_path_into(self, out: &mut String, source: Point, target: Point) {
        let (x0, y0) = (source.x, source.y);
        let (x1, y1) = (target.x, target.y);
        emit_cmd_pair(out, 'M', x0, y0);
        match self {
            Curve::BumpX => {
                let mx = (x0 + x1) / 2.0;
                emit_cmd_cubic(out, mx, y0, mx, y1, x1, y1);
            }
            Curve::BumpY => {
                let my = (y0 + y1) / 2.0;
                emit_cmd_cubic(out, x0, my, x1, my, x1, y1);
            }
            Curve::Linear => emit_cmd_pair(out, 'L', x1, y1),
            Curve::Step => {
                let mx = (x0 + x1) / 2.0;
                emit_cmd_pair(out, 'L', mx, y0);
                emit_cmd_pair(out, 'L', mx, y1);
                emit_cmd_pair(out, 'L', x1, y1);
            }
            Curve::StepBefore => {
                emit_cmd_pair(out, 'L', x0, y1);
                emit_cmd_pair(out, 'L', x1, y1);
            }
            Curve::StepAfter => {
                emit_cmd_pair(out, 'L', x1, y0);
                emit_cmd_pair(out, 'L', x1, y1);
            }
        }
    }
}

impl FromStr for Curve {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim();
        let key = key.strip_prefix("curve").unwrap_or(key);
        match key.to_ascii_lowercase().as_str() {
            "bumpx" | "bump-x" => Ok(Curve::BumpX),
            "bumpy" | "bump-y" => Ok(Curve::BumpY),
            "linear" => Ok(Curve::Linear),
            "step" => Ok(Curve::Step),
            "stepbefore" | "step-before" => Ok(Curve::StepBefore),
            "stepafter" | "step-after" => Ok(Curve::StepAfter),
            _ => Err(Error::UnknownCurve {
                name: s.to_string(),
            }),
        }
    }
}

fn emit_cmd_pair(out: &mut String, cmd: char, x: f64, y: f64) {
    out.push(cmd);
    fmt_path_into(out, x);
    out.push(',');
    fmt_path_into(out, y);
}

fn emit_cmd_cubic(out: &mut String, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
    out.push('C');
    for (i, v) in [x1, y1, x2, y2, x, y].into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        fmt_path_into(out, v);
    }
}
