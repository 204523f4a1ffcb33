//! Network data model: nodes, segments, tagged segment variants.
//!
//! Raw fields are user input; `results`/`summary` are derived and owned by
//! the segment calculator, `boundary` and downstream node pressures by the
//! propagation engine. Derived state is always regenerated as a whole.

use serde::{Deserialize, Serialize};

use pf_core::quantity::{LengthQty, MassRateQty, PressureQty, TemperatureQty};
use pf_fluids::Fluid;
use pf_hydraulics::Fitting;

use crate::results::{PressureDropResults, ResultSummary};

/// A junction or endpoint in the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<PressureQty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<TemperatureQty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fluid: Option<Fluid>,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            pressure: None,
            temperature: None,
            fluid: None,
        }
    }

    /// Human-readable reference: the label when set, the id otherwise.
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

/// Which endpoint is the hydraulic inlet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Inlet at `from`.
    #[default]
    Forward,
    /// Inlet at `to`.
    Backward,
}

/// Segment geometry; everything optional until the user fills it in.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter: Option<LengthQty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<LengthQty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roughness: Option<LengthQty>,
    /// Outlet elevation minus inlet elevation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_change: Option<LengthQty>,
    /// End diameter at the inlet when the segment is swaged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inlet_diameter: Option<LengthQty>,
    /// End diameter at the outlet when the segment is swaged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outlet_diameter: Option<LengthQty>,
}

/// Inlet condition last pushed into the segment by propagation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Boundary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<PressureQty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<TemperatureQty>,
}

/// Compressible model selection for gas pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GasFlowModel {
    #[default]
    Isothermal,
    Adiabatic,
}

/// Which control-valve field drives the calculation; the other one is
/// recomputed into the derived results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ValveInput {
    FromPressureDrop { pressure_drop: PressureQty },
    FromFlowCoefficient { cv: f64 },
}

/// Orifice input mode: derive the drop from the plate correlation, or take
/// a user-imposed drop and back out the plate K.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum OrificeInput {
    FromCorrelation,
    FromPressureDrop { pressure_drop: PressureQty },
}

/// Per-variant payload. A segment is exactly one of these; the variants
/// carry only the fields that exist for that type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SegmentKind {
    Pipeline {
        #[serde(default)]
        gas_model: GasFlowModel,
        /// Extra drop added verbatim after unit conversion.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        user_drop: Option<PressureQty>,
    },
    ControlValve {
        input: ValveInput,
    },
    Orifice {
        /// Bore diameter / pipe diameter, in (0, 1).
        beta: f64,
        input: OrificeInput,
    },
}

impl Default for SegmentKind {
    fn default() -> Self {
        SegmentKind::Pipeline {
            gas_model: GasFlowModel::default(),
            user_drop: None,
        }
    }
}

fn default_safety_factor() -> f64 {
    1.0
}

/// A pipeline, control valve or orifice connecting two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub direction: Direction,
    #[serde(flatten)]
    pub kind: SegmentKind,
    #[serde(default)]
    pub geometry: Geometry,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fittings: Vec<Fitting>,
    #[serde(default)]
    pub user_k: f64,
    #[serde(default = "default_safety_factor")]
    pub piping_fitting_safety_factor: f64,
    /// Mass flow carried by this segment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass_flow: Option<MassRateQty>,
    #[serde(default)]
    pub boundary: Boundary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<PressureDropResults>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<ResultSummary>,
}

impl Segment {
    pub fn new(id: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            direction: Direction::default(),
            kind: SegmentKind::default(),
            geometry: Geometry::default(),
            fittings: Vec::new(),
            user_k: 0.0,
            piping_fitting_safety_factor: 1.0,
            mass_flow: None,
            boundary: Boundary::default(),
            results: None,
            summary: None,
        }
    }

    /// Node id at the hydraulic inlet.
    pub fn inlet_node(&self) -> &str {
        match self.direction {
            Direction::Forward => &self.from,
            Direction::Backward => &self.to,
        }
    }

    /// Node id at the hydraulic outlet.
    pub fn outlet_node(&self) -> &str {
        match self.direction {
            Direction::Forward => &self.to,
            Direction::Backward => &self.from,
        }
    }

    /// A segment is outgoing from a node when that node is its hydraulic
    /// inlet.
    pub fn is_outgoing_from(&self, node_id: &str) -> bool {
        self.inlet_node() == node_id
    }

    /// Copy with derived results cleared; used when inputs change and on
    /// calculation failure so no stale derived state survives.
    pub fn with_cleared_results(&self) -> Self {
        let mut seg = self.clone();
        seg.results = None;
        seg.summary = None;
        seg
    }
}

/// Immutable snapshot of the whole network.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Network {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl Network {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn segment(&self, id: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    /// Segments whose hydraulic inlet is the given node.
    pub fn segments_from<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Segment> + 'a {
        self.segments
            .iter()
            .filter(move |s| s.is_outgoing_from(node_id))
    }
}
