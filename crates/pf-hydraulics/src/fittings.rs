//! Fitting loss aggregation.
//!
//! A segment carries a list of fittings; each fitting's K-factor comes from
//! a pluggable loss model (Crane-style L/D equivalents by default). The
//! aggregator also normalizes the list: whenever a segment's end diameter
//! differs from its main diameter beyond tolerance, an inlet/outlet swage
//! fitting is auto-inserted, and stale auto-inserted swages are removed.

use serde::{Deserialize, Serialize};

use pf_core::numeric::geometry_tolerance;

use crate::error::{HydraulicsError, HydraulicsResult};
use crate::friction::friction_factor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FittingKind {
    Elbow90,
    Elbow45,
    TeeThrough,
    TeeBranch,
    GateValve,
    GlobeValve,
    CheckValve,
    BallValve,
    ButterflyValve,
    InletSwage,
    OutletSwage,
    /// User-supplied fixed K; `k_each` is taken as given.
    Custom,
}

impl FittingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FittingKind::Elbow90 => "90 deg elbow",
            FittingKind::Elbow45 => "45 deg elbow",
            FittingKind::TeeThrough => "tee (through)",
            FittingKind::TeeBranch => "tee (branch)",
            FittingKind::GateValve => "gate valve",
            FittingKind::GlobeValve => "globe valve",
            FittingKind::CheckValve => "check valve",
            FittingKind::BallValve => "ball valve",
            FittingKind::ButterflyValve => "butterfly valve",
            FittingKind::InletSwage => "inlet swage",
            FittingKind::OutletSwage => "outlet swage",
            FittingKind::Custom => "custom",
        }
    }
}

/// One fitting entry on a segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fitting {
    pub kind: FittingKind,
    pub count: u32,
    /// K-factor per fitting (derived, except for `Custom`).
    #[serde(default)]
    pub k_each: f64,
    /// k_each * count (derived).
    #[serde(default)]
    pub k_total: f64,
    /// True when inserted by swage normalization rather than the user.
    #[serde(default)]
    pub auto: bool,
}

impl Fitting {
    pub fn new(kind: FittingKind, count: u32) -> Self {
        Self {
            kind,
            count,
            k_each: 0.0,
            k_total: 0.0,
            auto: false,
        }
    }

    pub fn custom(k_each: f64, count: u32) -> Self {
        Self {
            kind: FittingKind::Custom,
            count,
            k_each,
            k_total: 0.0,
            auto: false,
        }
    }
}

/// Geometry and flow context a loss model needs.
#[derive(Debug, Clone, Copy)]
pub struct FittingContext {
    /// Main inner diameter, m.
    pub diameter: f64,
    /// Inlet-end diameter when swaged, m.
    pub inlet_diameter: Option<f64>,
    /// Outlet-end diameter when swaged, m.
    pub outlet_diameter: Option<f64>,
    /// Absolute roughness / diameter.
    pub rel_roughness: f64,
    /// Reynolds number of the main pipe flow.
    pub reynolds: f64,
}

impl FittingContext {
    /// The aggregator needs positive diameter and Reynolds number to
    /// produce meaningful K-factors.
    pub fn is_sufficient(&self) -> bool {
        self.diameter > 0.0 && self.reynolds > 0.0
    }
}

/// K-factor source, keyed by fitting kind and flow context.
///
/// The default implementation is `CraneFittingModel`; an external fitting
/// database can stand in behind this trait.
pub trait FittingLossModel {
    fn k_factor(&self, fitting: &Fitting, ctx: &FittingContext) -> HydraulicsResult<f64>;
}

/// Crane TP-410-style model: K = f_T * (L/D) with fully-turbulent friction
/// factor, plus sudden contraction/expansion correlations for swages.
#[derive(Debug, Clone, Copy, Default)]
pub struct CraneFittingModel;

impl CraneFittingModel {
    /// Equivalent length ratio L/D for each fitting kind.
    fn length_ratio(kind: FittingKind) -> Option<f64> {
        match kind {
            FittingKind::Elbow90 => Some(30.0),
            FittingKind::Elbow45 => Some(16.0),
            FittingKind::TeeThrough => Some(20.0),
            FittingKind::TeeBranch => Some(60.0),
            FittingKind::GateValve => Some(8.0),
            FittingKind::GlobeValve => Some(340.0),
            FittingKind::CheckValve => Some(100.0),
            FittingKind::BallValve => Some(3.0),
            FittingKind::ButterflyValve => Some(45.0),
            _ => None,
        }
    }

    /// Fully-turbulent friction factor for the L/D method.
    fn fully_turbulent_f(rel_roughness: f64) -> HydraulicsResult<f64> {
        // Evaluated at a Reynolds number high enough that f no longer
        // depends on it; floor the roughness so smooth pipe stays finite.
        let (f, _) = friction_factor(1e8, rel_roughness.max(1e-6))?;
        Ok(f)
    }

    /// Sudden contraction/expansion K from the diameter change.
    fn swage_k(d_from: f64, d_to: f64) -> f64 {
        if d_from <= 0.0 || d_to <= 0.0 {
            return 0.0;
        }
        let beta = d_from.min(d_to) / d_from.max(d_to);
        let one_minus_b2 = 1.0 - beta * beta;
        if d_from > d_to {
            // Contraction
            0.5 * one_minus_b2
        } else {
            // Expansion (Borda-Carnot)
            one_minus_b2 * one_minus_b2
        }
    }
}

impl FittingLossModel for CraneFittingModel {
    fn k_factor(&self, fitting: &Fitting, ctx: &FittingContext) -> HydraulicsResult<f64> {
        match fitting.kind {
            FittingKind::Custom => Ok(fitting.k_each),
            FittingKind::InletSwage => {
                let d_in = ctx.inlet_diameter.ok_or(HydraulicsError::InsufficientInput {
                    what: "inlet diameter",
                })?;
                Ok(Self::swage_k(d_in, ctx.diameter))
            }
            FittingKind::OutletSwage => {
                let d_out = ctx
                    .outlet_diameter
                    .ok_or(HydraulicsError::InsufficientInput {
                        what: "outlet diameter",
                    })?;
                Ok(Self::swage_k(ctx.diameter, d_out))
            }
            kind => {
                let ratio = Self::length_ratio(kind).ok_or(HydraulicsError::UnknownFitting {
                    kind: kind.as_str(),
                })?;
                Ok(Self::fully_turbulent_f(ctx.rel_roughness)? * ratio)
            }
        }
    }
}

/// Result of aggregating a fitting list.
#[derive(Debug, Clone, PartialEq)]
pub struct FittingAggregation {
    /// Normalized list with per-fitting K filled in (or zeroed).
    pub fittings: Vec<Fitting>,
    /// Sum of k_each * count; `None` when context was insufficient
    /// (indeterminate, distinct from a legitimate zero).
    pub total_k: Option<f64>,
}

/// Normalize the fitting list against the segment's end diameters:
/// insert an inlet/outlet swage where an end diameter differs from the
/// main diameter beyond tolerance, and drop auto-inserted swages whose
/// geometry no longer warrants them. User-added swages are left alone.
pub fn normalize_swages(
    fittings: &[Fitting],
    diameter: f64,
    inlet_diameter: Option<f64>,
    outlet_diameter: Option<f64>,
) -> Vec<Fitting> {
    let tol = geometry_tolerance(diameter);
    let differs = |end: Option<f64>| match end {
        Some(d) if d > 0.0 && diameter > 0.0 => (d - diameter).abs() > tol,
        _ => false,
    };
    let need_inlet = differs(inlet_diameter);
    let need_outlet = differs(outlet_diameter);

    let mut out: Vec<Fitting> = fittings
        .iter()
        .filter(|f| {
            // Drop stale auto-inserted swages; keep everything user-made.
            if !f.auto {
                return true;
            }
            match f.kind {
                FittingKind::InletSwage => need_inlet,
                FittingKind::OutletSwage => need_outlet,
                _ => true,
            }
        })
        .copied()
        .collect();

    let has = |list: &[Fitting], kind: FittingKind| list.iter().any(|f| f.kind == kind);
    if need_inlet && !has(&out, FittingKind::InletSwage) {
        out.push(Fitting {
            auto: true,
            ..Fitting::new(FittingKind::InletSwage, 1)
        });
    }
    if need_outlet && !has(&out, FittingKind::OutletSwage) {
        out.push(Fitting {
            auto: true,
            ..Fitting::new(FittingKind::OutletSwage, 1)
        });
    }
    out
}

/// Normalize, look up per-fitting K-factors, and sum the total fitting K.
///
/// Fittings with count = 0 keep zeroed K without being dropped. When the
/// context is insufficient all K-factors reset to zero and the total is
/// reported indeterminate (`None`).
pub fn aggregate_fittings(
    fittings: &[Fitting],
    ctx: &FittingContext,
    model: &dyn FittingLossModel,
) -> FittingAggregation {
    let mut list = normalize_swages(
        fittings,
        ctx.diameter,
        ctx.inlet_diameter,
        ctx.outlet_diameter,
    );

    if !ctx.is_sufficient() {
        for f in &mut list {
            if f.kind != FittingKind::Custom {
                f.k_each = 0.0;
            }
            f.k_total = 0.0;
        }
        return FittingAggregation {
            fittings: list,
            total_k: None,
        };
    }

    let mut total = 0.0;
    let mut all_resolved = true;
    for f in &mut list {
        if f.count == 0 {
            f.k_each = 0.0;
            f.k_total = 0.0;
            continue;
        }
        match model.k_factor(f, ctx) {
            Ok(k) => {
                f.k_each = k;
                f.k_total = k * f.count as f64;
                total += f.k_total;
            }
            Err(err) => {
                tracing::warn!(fitting = f.kind.as_str(), %err, "fitting K lookup failed");
                f.k_each = 0.0;
                f.k_total = 0.0;
                all_resolved = false;
            }
        }
    }

    FittingAggregation {
        fittings: list,
        total_k: if all_resolved { Some(total) } else { None },
    }
}
