//! End-to-end propagation over realistic networks.

use pf_core::quantity::{
    DensityUnit, LengthUnit, MassRateUnit, MolarMassUnit, PressureUnit, Qty, TemperatureUnit,
    ViscosityUnit,
};
use pf_fluids::Fluid;
use pf_hydraulics::{Fitting, FittingKind, FlowRegime};
use pf_network::{
    GasFlowModel, Geometry, HydraulicModels, Network, Node, Segment, SegmentKind,
    propagate_pressure, validate_network,
};

fn water() -> Fluid {
    Fluid::Liquid {
        density: Qty::new(998.0, DensityUnit::KilogramPerCubicMeter),
        viscosity: Qty::new(1.0, ViscosityUnit::Centipoise),
    }
}

fn methane() -> Fluid {
    Fluid::Gas {
        molar_mass: Qty::new(16.04, MolarMassUnit::GramPerMole),
        z_factor: 0.98,
        heat_capacity_ratio: 1.31,
        viscosity: Qty::new(1.1e-5, ViscosityUnit::PascalSecond),
    }
}

fn node(id: &str, pressure_kpa: Option<f64>, fluid: Option<Fluid>) -> Node {
    let mut n = Node::new(id);
    n.pressure = pressure_kpa.map(|p| Qty::new(p, PressureUnit::Kilopascal));
    n.temperature = Some(Qty::new(15.0, TemperatureUnit::Celsius));
    n.fluid = fluid;
    n
}

fn water_pipe(id: &str, from: &str, to: &str, length_m: f64) -> Segment {
    let mut seg = Segment::new(id, from, to);
    seg.geometry = Geometry {
        diameter: Some(Qty::new(100.0, LengthUnit::Millimeter)),
        length: Some(Qty::new(length_m, LengthUnit::Meter)),
        roughness: Some(Qty::new(4.5e-5, LengthUnit::Meter)),
        ..Default::default()
    };
    seg.mass_flow = Some(Qty::new(4.0, MassRateUnit::KilogramPerSecond));
    seg
}

fn pressure_si(net_nodes: &[Node], id: &str) -> f64 {
    net_nodes
        .iter()
        .find(|n| n.id == id)
        .unwrap()
        .pressure
        .unwrap()
        .si()
}

#[test]
fn liquid_chain_pressure_is_strictly_decreasing() {
    let mut p1 = water_pipe("p1", "src", "j1", 50.0);
    p1.fittings = vec![Fitting::new(FittingKind::Elbow90, 2)];
    let p2 = water_pipe("p2", "j1", "j2", 80.0);

    let net = Network {
        nodes: vec![
            node("src", Some(300.0), Some(water())),
            node("j1", None, Some(water())),
            node("j2", None, Some(water())),
        ],
        segments: vec![p1, p2],
    };
    validate_network(&net).unwrap();

    let out = propagate_pressure(&net, "src", &HydraulicModels::default()).unwrap();
    assert!(out.warnings.is_empty(), "warnings: {:?}", out.warnings);

    let p_src = pressure_si(&out.nodes, "src");
    let p_j1 = pressure_si(&out.nodes, "j1");
    let p_j2 = pressure_si(&out.nodes, "j2");
    assert!(p_src > p_j1 && p_j1 > p_j2, "{p_src} {p_j1} {p_j2}");

    for seg in &out.segments {
        let r = seg.results.as_ref().unwrap();
        assert_eq!(r.regime, Some(FlowRegime::Turbulent));
        // Aggregate K identity holds on every propagated segment.
        let expect =
            (r.pipe_length_k.unwrap() + r.fitting_k.unwrap() + r.user_k) * r.safety_factor;
        assert!((r.total_k.unwrap() - expect).abs() < 1e-12);
    }

    // The longer second leg drops more per the same diameter and flow.
    assert!((p_j1 - p_j2) > (p_src - p_j1));
}

#[test]
fn missing_length_is_inferred_from_endpoint_pressures() {
    // 300 kPa -> 250 kPa, segment length unknown.
    let mut seg = water_pipe("p1", "src", "dst", 1.0);
    seg.geometry.length = None;

    let net = Network {
        nodes: vec![
            node("src", Some(300.0), Some(water())),
            node("dst", Some(250.0), None),
        ],
        segments: vec![seg],
    };

    let out = propagate_pressure(&net, "src", &HydraulicModels::default()).unwrap();
    assert!(
        out.warnings
            .iter()
            .any(|w| w.contains("estimated missing length")),
        "warnings: {:?}",
        out.warnings
    );

    let seg = &out.segments[0];
    let length = seg.geometry.length.unwrap().si();
    assert!(length > 0.0, "length = {length}");

    // With the estimated length the propagated pressure lands on the
    // known target value, in the target's own unit.
    let dst = out.nodes.iter().find(|n| n.id == "dst").unwrap();
    let q = dst.pressure.unwrap();
    assert_eq!(q.unit, PressureUnit::Kilopascal);
    assert!((q.si() - 250_000.0).abs() < 1.0, "p = {} Pa", q.si());
}

#[test]
fn inference_skipped_when_target_pressure_is_higher() {
    // Required drop is negative: no forward solution, length stays unset
    // and the segment drop degrades to zero-with-warning.
    let mut seg = water_pipe("p1", "src", "dst", 1.0);
    seg.geometry.length = None;

    let net = Network {
        nodes: vec![
            node("src", Some(250.0), Some(water())),
            node("dst", Some(300.0), None),
        ],
        segments: vec![seg],
    };

    let out = propagate_pressure(&net, "src", &HydraulicModels::default()).unwrap();
    assert!(out.segments[0].geometry.length.is_none());
    assert!(
        !out.warnings
            .iter()
            .any(|w| w.contains("estimated missing length"))
    );
}

#[test]
fn gas_chain_reports_mach_and_critical_pressure() {
    let mut p1 = Segment::new("g1", "src", "mid");
    p1.geometry = Geometry {
        diameter: Some(Qty::new(100.0, LengthUnit::Millimeter)),
        length: Some(Qty::new(200.0, LengthUnit::Meter)),
        roughness: Some(Qty::new(4.5e-5, LengthUnit::Meter)),
        ..Default::default()
    };
    p1.mass_flow = Some(Qty::new(0.5, MassRateUnit::KilogramPerSecond));
    let mut p2 = p1.clone();
    p2.id = "g2".into();
    p2.from = "mid".into();
    p2.to = "end".into();

    let mut src = node("src", Some(500.0), Some(methane()));
    src.temperature = Some(Qty::new(288.15, TemperatureUnit::Kelvin));
    let net = Network {
        nodes: vec![src, node("mid", None, Some(methane())), node("end", None, Some(methane()))],
        segments: vec![p1, p2],
    };

    let out = propagate_pressure(&net, "src", &HydraulicModels::default()).unwrap();
    assert!(out.warnings.is_empty(), "warnings: {:?}", out.warnings);

    let p_src = pressure_si(&out.nodes, "src");
    let p_mid = pressure_si(&out.nodes, "mid");
    let p_end = pressure_si(&out.nodes, "end");
    assert!(p_src > p_mid && p_mid > p_end);

    for seg in &out.segments {
        let r = seg.results.as_ref().unwrap();
        assert!(r.gas_critical_pressure.unwrap() > 0.0);
        let s = seg.summary.as_ref().unwrap();
        assert!(s.outlet.mach.unwrap() > s.inlet.mach.unwrap());
        assert!(s.outlet.mach.unwrap() < 1.0);
    }

    // Isothermal model: downstream node temperature equals the source's.
    let mid = out.nodes.iter().find(|n| n.id == "mid").unwrap();
    assert!((mid.temperature.unwrap().si() - 288.15).abs() < 1e-9);
}

#[test]
fn yaml_network_end_to_end() {
    let yaml = r#"
nodes:
  - id: feed
    label: Feed header
    pressure: { value: 5.0, unit: bar }
    temperature: { value: 20.0, unit: celsius }
    fluid:
      phase: liquid
      density: { value: 998.0, unit: kilogram_per_cubic_meter }
      viscosity: { value: 1.0, unit: centipoise }
  - id: mid
    fluid:
      phase: liquid
      density: { value: 998.0, unit: kilogram_per_cubic_meter }
      viscosity: { value: 1.0, unit: centipoise }
  - id: drain
segments:
  - id: fcv
    from: feed
    to: mid
    type: control_valve
    input:
      mode: from_flow_coefficient
      cv: 30.0
    mass_flow: { value: 4.0, unit: kilogram_per_second }
  - id: line
    from: mid
    to: drain
    type: pipeline
    geometry:
      diameter: { value: 100.0, unit: millimeter }
      length: { value: 40.0, unit: meter }
      roughness: { value: 0.045, unit: millimeter }
    mass_flow: { value: 4.0, unit: kilogram_per_second }
"#;
    let net: Network = serde_yaml::from_str(yaml).unwrap();
    validate_network(&net).unwrap();

    let out = propagate_pressure(&net, "feed", &HydraulicModels::default()).unwrap();
    assert!(out.warnings.is_empty(), "warnings: {:?}", out.warnings);

    let p_feed = pressure_si(&out.nodes, "feed");
    let p_mid = pressure_si(&out.nodes, "mid");
    let p_drain = pressure_si(&out.nodes, "drain");
    assert!(p_feed > p_mid && p_mid > p_drain);

    let valve = out.segments.iter().find(|s| s.id == "fcv").unwrap();
    let r = valve.results.as_ref().unwrap();
    assert_eq!(r.control_valve_cv, Some(30.0));
    assert!(r.drops.control_valve > 0.0);

    // The drain inherits the feed temperature through the chain.
    let drain = out.nodes.iter().find(|n| n.id == "drain").unwrap();
    assert!((drain.temperature.unwrap().si() - 293.15).abs() < 1e-9);
}

#[test]
fn swaged_segment_gains_auto_fittings_during_propagation() {
    let mut seg = water_pipe("p1", "src", "dst", 20.0);
    seg.geometry.inlet_diameter = Some(Qty::new(150.0, LengthUnit::Millimeter));
    seg.geometry.outlet_diameter = Some(Qty::new(80.0, LengthUnit::Millimeter));

    let net = Network {
        nodes: vec![
            node("src", Some(400.0), Some(water())),
            node("dst", None, None),
        ],
        segments: vec![seg],
    };

    let out = propagate_pressure(&net, "src", &HydraulicModels::default()).unwrap();
    let seg = &out.segments[0];
    let kinds: Vec<_> = seg.fittings.iter().map(|f| f.kind).collect();
    assert!(kinds.contains(&FittingKind::InletSwage));
    assert!(kinds.contains(&FittingKind::OutletSwage));
    assert!(seg.fittings.iter().all(|f| f.auto));
    assert!(seg.results.as_ref().unwrap().fitting_k.unwrap() > 0.0);
}

#[test]
fn adiabatic_segment_cools_downstream_node() {
    let mut seg = Segment::new("g1", "src", "dst");
    seg.kind = SegmentKind::Pipeline {
        gas_model: GasFlowModel::Adiabatic,
        user_drop: None,
    };
    seg.geometry = Geometry {
        diameter: Some(Qty::new(100.0, LengthUnit::Millimeter)),
        length: Some(Qty::new(200.0, LengthUnit::Meter)),
        roughness: Some(Qty::new(4.5e-5, LengthUnit::Meter)),
        ..Default::default()
    };
    seg.mass_flow = Some(Qty::new(0.5, MassRateUnit::KilogramPerSecond));

    let mut src = node("src", Some(500.0), Some(methane()));
    src.temperature = Some(Qty::new(288.15, TemperatureUnit::Kelvin));
    let net = Network {
        nodes: vec![src, node("dst", None, None)],
        segments: vec![seg],
    };

    let out = propagate_pressure(&net, "src", &HydraulicModels::default()).unwrap();
    let dst = out.nodes.iter().find(|n| n.id == "dst").unwrap();
    assert!(dst.temperature.unwrap().si() < 288.15);
}
