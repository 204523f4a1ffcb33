//! Segment Hydraulics Calculator.
//!
//! `recalculate_segment` is the sole writer of a segment's derived results.
//! It dispatches on the segment variant, aggregates resistance
//! (pipe-length K, fitting K, user K, safety factor), and computes the
//! pressure-drop breakdown plus inlet/outlet state summaries. Any missing
//! or non-positive required input degrades to cleared results, never to a
//! silent zero.

use pf_core::units::constants::G0_MPS2;
use pf_fluids::{FluidContext, PipeState};
use pf_hydraulics::{
    AdiabaticPipeFlow, CompressibleSolver, CraneFittingModel, FittingContext, FittingLossModel,
    GasSolveInput, HydraulicsError, HydraulicsResult, IsothermalPipeFlow, cv_from_pressure_drop,
    flow_area, friction_factor, mean_velocity, orifice_k, orifice_pressure_drop,
    pressure_drop_from_cv, reynolds_number,
};

use crate::model::{GasFlowModel, OrificeInput, Segment, SegmentKind, ValveInput};
use crate::results::{DropBreakdown, PressureDropResults, ResultSummary};

/// Pluggable physics models used by the calculator.
///
/// Defaults are the built-in Crane fitting model and the isothermal/Fanno
/// gas solvers; an external fitting database or gas solver can stand in.
pub struct HydraulicModels {
    pub fittings: Box<dyn FittingLossModel + Send + Sync>,
    pub isothermal: Box<dyn CompressibleSolver + Send + Sync>,
    pub adiabatic: Box<dyn CompressibleSolver + Send + Sync>,
}

impl Default for HydraulicModels {
    fn default() -> Self {
        Self {
            fittings: Box::new(CraneFittingModel),
            isothermal: Box::new(IsothermalPipeFlow),
            adiabatic: Box::new(AdiabaticPipeFlow),
        }
    }
}

impl HydraulicModels {
    fn gas_solver(&self, model: GasFlowModel) -> &dyn CompressibleSolver {
        match model {
            GasFlowModel::Isothermal => self.isothermal.as_ref(),
            GasFlowModel::Adiabatic => self.adiabatic.as_ref(),
        }
    }
}

/// Recalculate a segment's derived results from its current inputs.
///
/// Pure: returns a new segment, never mutates the input. On insufficient
/// data the returned segment has `results`/`summary` cleared. `ctx` is
/// `None` when no fluid or mass flow could be resolved for the segment;
/// a pipeline with a user-specified drop still yields results then.
pub fn recalculate_segment(
    segment: &Segment,
    ctx: Option<&FluidContext>,
    models: &HydraulicModels,
) -> Segment {
    let mut seg = segment.with_cleared_results();
    match compute(&mut seg, ctx, models) {
        Ok((results, summary)) => {
            seg.results = Some(results);
            seg.summary = summary;
        }
        Err(err) => {
            tracing::debug!(segment = %seg.id, %err, "segment hydraulics undefined");
        }
    }
    seg
}

fn compute(
    seg: &mut Segment,
    ctx: Option<&FluidContext>,
    models: &HydraulicModels,
) -> HydraulicsResult<(PressureDropResults, Option<ResultSummary>)> {
    let missing_ctx = HydraulicsError::InsufficientInput {
        what: "fluid context",
    };
    match seg.kind {
        SegmentKind::Pipeline {
            gas_model,
            user_drop,
        } => {
            let user_drop_si = user_drop.map(|q| q.si());
            let attempt = match ctx {
                Some(ctx) if ctx.fluid.is_gas() => compute_gas_pipeline(seg, ctx, models, gas_model),
                Some(ctx) => {
                    compute_liquid_pipeline(seg, ctx, models, user_drop_si.unwrap_or(0.0))
                }
                None => Err(missing_ctx),
            };
            match (attempt, user_drop_si) {
                (Ok(out), _) => Ok(out),
                // The user-specified drop does not depend on the hydraulic
                // context; it stays applicable when friction cannot be
                // computed (pure-graph segments).
                (Err(_), Some(dp_user)) => Ok(user_drop_only(seg, dp_user)),
                (Err(err), None) => Err(err),
            }
        }
        SegmentKind::ControlValve { input } => {
            compute_control_valve(seg, ctx.ok_or(missing_ctx)?, input)
        }
        SegmentKind::Orifice { beta, input } => {
            compute_orifice(seg, ctx.ok_or(missing_ctx)?, beta, input)
        }
    }
}

/// Boundary pressure/temperature in SI, when pushed by propagation.
fn boundary_si(seg: &Segment) -> (Option<f64>, Option<f64>) {
    (
        seg.boundary.pressure.map(|q| q.si()),
        seg.boundary.temperature.map(|q| q.si()),
    )
}

/// Friction context shared by the pipeline and orifice paths.
struct PipeFlow {
    diameter: f64,
    rel_roughness: f64,
    rho: f64,
    velocity: f64,
    reynolds: f64,
    friction: f64,
    regime: pf_hydraulics::FlowRegime,
    mdot: f64,
}

fn resolve_pipe_flow(seg: &Segment, ctx: &FluidContext) -> HydraulicsResult<PipeFlow> {
    let diameter = seg
        .geometry
        .diameter
        .map(|q| q.si())
        .filter(|d| *d > 0.0)
        .ok_or(HydraulicsError::InsufficientInput { what: "diameter" })?;

    let (p_in, t_in) = boundary_si(seg);
    let rho = ctx
        .fluid
        .density_at(p_in.unwrap_or(0.0), t_in.unwrap_or(0.0))?;
    let mu = ctx.fluid.viscosity_si()?;
    let mdot = ctx.mass_flow_si()?;

    let velocity = mean_velocity(mdot, rho, diameter)?;
    let reynolds = reynolds_number(rho, velocity, diameter, mu)?;
    let rel_roughness = seg
        .geometry
        .roughness
        .map(|q| q.si())
        .filter(|r| *r > 0.0)
        .map(|r| r / diameter)
        .unwrap_or(0.0);
    let (friction, regime) = friction_factor(reynolds, rel_roughness)?;

    Ok(PipeFlow {
        diameter,
        rel_roughness,
        rho,
        velocity,
        reynolds,
        friction,
        regime,
        mdot,
    })
}

/// Aggregate fitting K and normalize the segment's fitting list in place.
fn resolve_fitting_k(
    seg: &mut Segment,
    flow: &PipeFlow,
    model: &dyn FittingLossModel,
) -> HydraulicsResult<f64> {
    let fctx = FittingContext {
        diameter: flow.diameter,
        inlet_diameter: seg.geometry.inlet_diameter.map(|q| q.si()),
        outlet_diameter: seg.geometry.outlet_diameter.map(|q| q.si()),
        rel_roughness: flow.rel_roughness,
        reynolds: flow.reynolds,
    };
    let agg = pf_hydraulics::fittings::aggregate_fittings(&seg.fittings, &fctx, model);
    seg.fittings = agg.fittings;
    agg.total_k
        .ok_or(HydraulicsError::InsufficientInput { what: "fitting K" })
}

/// f L/D; zero for a missing or zero length.
fn pipe_length_k(seg: &Segment, flow: &PipeFlow) -> f64 {
    match seg.geometry.length.map(|q| q.si()) {
        Some(l) if l > 0.0 => flow.friction * l / flow.diameter,
        _ => 0.0,
    }
}

fn compute_liquid_pipeline(
    seg: &mut Segment,
    ctx: &FluidContext,
    models: &HydraulicModels,
    user_drop_si: f64,
) -> HydraulicsResult<(PressureDropResults, Option<ResultSummary>)> {
    let flow = resolve_pipe_flow(seg, ctx)?;
    let fitting_k = resolve_fitting_k(seg, &flow, models.fittings.as_ref())?;
    let plk = pipe_length_k(seg, &flow);
    let total_k = (plk + fitting_k + seg.user_k) * seg.piping_fitting_safety_factor;

    let dyn_pressure = 0.5 * flow.rho * flow.velocity * flow.velocity;
    let dp_friction = total_k * dyn_pressure;

    let dz = seg.geometry.elevation_change.map(|q| q.si()).unwrap_or(0.0);
    let dp_elevation = flow.rho * G0_MPS2 * dz;

    let equivalent_length = if flow.friction > 0.0 && total_k > 0.0 {
        Some(total_k * flow.diameter / flow.friction)
    } else {
        None
    };
    let per_unit_length = equivalent_length.map(|l| dp_friction / l);

    let total = dp_friction + dp_elevation + user_drop_si;

    let results = PressureDropResults {
        pipe_length_k: Some(plk),
        fitting_k: Some(fitting_k),
        user_k: seg.user_k,
        safety_factor: seg.piping_fitting_safety_factor,
        total_k: Some(total_k),
        reynolds: Some(flow.reynolds),
        friction_factor: Some(flow.friction),
        regime: Some(flow.regime),
        drops: DropBreakdown {
            friction_and_fitting: Some(dp_friction),
            elevation: dp_elevation,
            control_valve: 0.0,
            orifice: 0.0,
            user_specified: user_drop_si,
            total,
            per_unit_length,
        },
        ..Default::default()
    };

    let summary = incompressible_summary(seg, &flow, total);
    Ok((results, summary))
}

fn compute_gas_pipeline(
    seg: &mut Segment,
    ctx: &FluidContext,
    models: &HydraulicModels,
    gas_model: GasFlowModel,
) -> HydraulicsResult<(PressureDropResults, Option<ResultSummary>)> {
    let (p_in, t_in) = boundary_si(seg);
    let p_in = p_in.ok_or(HydraulicsError::InsufficientInput {
        what: "boundary pressure",
    })?;
    let t_in = t_in.ok_or(HydraulicsError::InsufficientInput {
        what: "boundary temperature",
    })?;

    let flow = resolve_pipe_flow(seg, ctx)?;
    let fitting_k = resolve_fitting_k(seg, &flow, models.fittings.as_ref())?;
    let plk = pipe_length_k(seg, &flow);
    let total_k = (plk + fitting_k + seg.user_k) * seg.piping_fitting_safety_factor;

    let (molar_mass, z_factor, gamma) = match ctx.fluid {
        pf_fluids::Fluid::Gas {
            molar_mass,
            z_factor,
            heat_capacity_ratio,
            ..
        } => (molar_mass.si(), z_factor, heat_capacity_ratio),
        pf_fluids::Fluid::Liquid { .. } => {
            return Err(HydraulicsError::NonPhysical {
                what: "gas model requested for a liquid",
            });
        }
    };

    let length = seg
        .geometry
        .length
        .map(|q| q.si())
        .filter(|l| *l > 0.0)
        .unwrap_or(0.0);

    // The solver takes f L/D and an extra-K term separately; hand it the
    // aggregate resistance minus the unscaled pipe contribution so the sum
    // matches the safety-factored total K exactly.
    let input = GasSolveInput {
        inlet_pressure: p_in,
        inlet_temperature: t_in,
        mass_flow: flow.mdot,
        diameter: flow.diameter,
        length,
        friction_factor: flow.friction,
        total_k: (total_k - plk).max(0.0),
        molar_mass,
        z_factor,
        heat_capacity_ratio: gamma,
    };
    let solution = models.gas_solver(gas_model).solve(&input)?;

    let dp_total = (solution.inlet.pressure - solution.outlet.pressure).abs();
    let per_unit_length = if length > 0.0 {
        Some(dp_total / length)
    } else {
        None
    };

    let results = PressureDropResults {
        pipe_length_k: Some(plk),
        fitting_k: Some(fitting_k),
        user_k: seg.user_k,
        safety_factor: seg.piping_fitting_safety_factor,
        total_k: Some(total_k),
        reynolds: Some(flow.reynolds),
        friction_factor: Some(flow.friction),
        regime: Some(flow.regime),
        drops: DropBreakdown {
            friction_and_fitting: Some(dp_total),
            elevation: 0.0,
            control_valve: 0.0,
            orifice: 0.0,
            user_specified: 0.0,
            total: dp_total,
            per_unit_length,
        },
        gas_critical_pressure: solution.critical_pressure,
        ..Default::default()
    };

    let sound_in = ctx.fluid.speed_of_sound(solution.inlet.temperature)?;
    let sound_out = ctx.fluid.speed_of_sound(solution.outlet.temperature)?;
    let summary = ResultSummary {
        inlet: PipeState::from_flow(
            solution.inlet.pressure,
            solution.inlet.temperature,
            solution.inlet.density,
            solution.inlet.velocity,
            Some(solution.inlet.mach),
            Some(sound_in),
        ),
        outlet: PipeState::from_flow(
            solution.outlet.pressure,
            solution.outlet.temperature,
            solution.outlet.density,
            solution.outlet.velocity,
            Some(solution.outlet.mach),
            Some(sound_out),
        ),
    };

    Ok((results, Some(summary)))
}

/// Degraded pipeline result when only the user-specified drop is known.
fn user_drop_only(seg: &Segment, dp_user: f64) -> (PressureDropResults, Option<ResultSummary>) {
    let results = PressureDropResults {
        user_k: seg.user_k,
        safety_factor: seg.piping_fitting_safety_factor,
        drops: DropBreakdown {
            user_specified: dp_user,
            total: dp_user,
            ..Default::default()
        },
        ..Default::default()
    };
    (results, None)
}

fn compute_control_valve(
    seg: &mut Segment,
    ctx: &FluidContext,
    input: ValveInput,
) -> HydraulicsResult<(PressureDropResults, Option<ResultSummary>)> {
    let (p_in, t_in) = boundary_si(seg);
    let rho = ctx
        .fluid
        .density_at(p_in.unwrap_or(0.0), t_in.unwrap_or(0.0))?;
    let mdot = ctx.mass_flow_si()?;
    let q = mdot / rho;

    let (dp, cv) = match input {
        ValveInput::FromPressureDrop { pressure_drop } => {
            let dp = pressure_drop.si();
            let cv = cv_from_pressure_drop(q, dp, rho)?;
            (dp, cv)
        }
        ValveInput::FromFlowCoefficient { cv } => {
            let dp = pressure_drop_from_cv(q, cv, rho)?;
            (dp, cv)
        }
    };

    let results = PressureDropResults {
        user_k: seg.user_k,
        safety_factor: seg.piping_fitting_safety_factor,
        drops: DropBreakdown {
            control_valve: dp,
            total: dp,
            ..Default::default()
        },
        control_valve_cv: Some(cv),
        ..Default::default()
    };

    // Velocity for the summary needs a line diameter; fall back to zero
    // when the valve has none.
    let velocity = seg
        .geometry
        .diameter
        .map(|d| d.si())
        .filter(|d| *d > 0.0)
        .map(|d| q / flow_area(d))
        .unwrap_or(0.0);
    let summary = match (p_in, t_in) {
        (Some(p), Some(t)) => Some(ResultSummary {
            inlet: PipeState::from_flow(p, t, rho, velocity, None, None),
            outlet: PipeState::from_flow(p - dp, t, rho, velocity, None, None),
        }),
        _ => None,
    };

    Ok((results, summary))
}

fn compute_orifice(
    seg: &mut Segment,
    ctx: &FluidContext,
    beta: f64,
    input: OrificeInput,
) -> HydraulicsResult<(PressureDropResults, Option<ResultSummary>)> {
    let flow = resolve_pipe_flow(seg, ctx)?;
    let dyn_pressure = 0.5 * flow.rho * flow.velocity * flow.velocity;

    let (k, dp) = match input {
        OrificeInput::FromCorrelation => {
            let k = orifice_k(beta, flow.reynolds)?;
            let dp = orifice_pressure_drop(k, flow.rho, flow.velocity)?;
            (k, dp)
        }
        OrificeInput::FromPressureDrop { pressure_drop } => {
            if !(beta > 0.0 && beta < 1.0) {
                return Err(HydraulicsError::NonPhysical { what: "beta ratio" });
            }
            let dp = pressure_drop.si();
            if dyn_pressure <= 0.0 {
                return Err(HydraulicsError::InsufficientInput {
                    what: "dynamic pressure",
                });
            }
            (dp / dyn_pressure, dp)
        }
    };

    let results = PressureDropResults {
        user_k: seg.user_k,
        safety_factor: seg.piping_fitting_safety_factor,
        reynolds: Some(flow.reynolds),
        friction_factor: Some(flow.friction),
        regime: Some(flow.regime),
        drops: DropBreakdown {
            orifice: dp,
            total: dp,
            ..Default::default()
        },
        orifice_k: Some(k),
        ..Default::default()
    };

    let summary = incompressible_summary(seg, &flow, dp);
    Ok((results, summary))
}

/// Inlet/outlet summary for incompressible segments; needs a pushed
/// boundary condition, otherwise `None`.
fn incompressible_summary(seg: &Segment, flow: &PipeFlow, dp_total: f64) -> Option<ResultSummary> {
    let (p_in, t_in) = boundary_si(seg);
    match (p_in, t_in) {
        (Some(p), Some(t)) => Some(ResultSummary {
            inlet: PipeState::from_flow(p, t, flow.rho, flow.velocity, None, None),
            outlet: PipeState::from_flow(p - dp_total, t, flow.rho, flow.velocity, None, None),
        }),
        _ => None,
    }
}
