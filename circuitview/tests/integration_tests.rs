//! Integration tests for the CircuitView library

use circuitview::prelude::*;
use circuitview::style::{Color, NET_COLOR};
use circuitview::{export_filename, write_export, CircuitSummary, NormalizeError, SchemaShape};
use serde_json::Value;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn read_fixture(name: &str) -> Value {
    let content = std::fs::read_to_string(fixture_path(name)).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[test]
fn test_open_flat_circuit() {
    let view = CircuitView::open(&fixture_path("flat_circuit.json")).unwrap();

    assert_eq!(view.payload.shape(), SchemaShape::Flat);
    assert_eq!(view.stats.component_count, 8);
    assert_eq!(view.stats.net_count, 9);
    assert_eq!(view.stats.link_count, 26);
    assert_eq!(view.stats.island_count, 1);
    assert!(view.stats.isolated_nodes.is_empty());
}

#[test]
fn test_open_typed_circuit() {
    let view = CircuitView::open(&fixture_path("typed_circuit.json")).unwrap();

    assert_eq!(view.payload.shape(), SchemaShape::Typed);
    assert_eq!(view.graph.nodes().len(), 7);
    assert_eq!(view.graph.links().len(), 6);
    assert_eq!(view.stats.component_count, 3);

    let m0 = view.graph.node("M0").unwrap();
    assert_eq!(m0.group, NodeGroup::Component);
    assert_eq!(m0.node_type.as_deref(), Some("nfet"));

    // No subtype: the type itself is used
    let vdd = view.graph.node("vdd!").unwrap();
    assert_eq!(vdd.group, NodeGroup::Net);
    assert_eq!(vdd.node_type.as_deref(), Some("SUPPLY"));
}

#[test]
fn test_unrecognized_fixture() {
    let err = CircuitView::open(&fixture_path("unrecognized.json")).unwrap_err();
    assert!(matches!(err, NormalizeError::UnrecognizedSchema));
}

#[test]
fn test_dangling_fixture_names_offender() {
    let err = CircuitView::open(&fixture_path("dangling.json")).unwrap_err();
    match err {
        NormalizeError::DanglingReference { from, missing, pin, .. } => {
            assert_eq!(from, "M0");
            assert_eq!(missing, "missing_net");
            assert_eq!(pin.as_deref(), Some("G"));
        }
        other => panic!("expected dangling reference, got {other}"),
    }
}

#[test]
fn test_load_payload_wrapper() {
    assert!(circuitview::load_payload(&fixture_path("flat_circuit.json")).is_ok());
    assert!(circuitview::load_payload(&fixture_path("no_such_file.json")).is_err());
}

#[test]
fn test_matched_pairs_share_colors() {
    let view = CircuitView::open(&fixture_path("flat_circuit.json")).unwrap();
    let color = |id: &str| view.style_of(id).unwrap().color;

    assert_eq!(color("M1"), color("M2"));
    assert_eq!(color("M3"), color("M4"));
    assert_ne!(color("M1"), color("M3"));
    assert!(matches!(color("M1"), Color::Hsl { .. }));
    assert_eq!(color("M5"), Color::Hex("#4f8ef7"));
    assert_eq!(color("tail"), Color::Hex(NET_COLOR));
}

#[test]
fn test_inspector_formats_rows() {
    let view = CircuitView::open(&fixture_path("flat_circuit.json")).unwrap();
    let policy = DetailPolicy::default();

    let rows = |id: &str| -> Vec<(String, String)> {
        view.detail(id, &policy)
            .unwrap()
            .parameters
            .into_iter()
            .map(|r| (r.key, r.display))
            .collect()
    };

    assert_eq!(
        rows("M1"),
        vec![
            ("l".to_string(), "4.5000e-8 m".to_string()),
            ("nfin".to_string(), "4".to_string()),
            ("w".to_string(), "1.20e-7".to_string()),
        ]
    );
    assert_eq!(rows("CL"), vec![("c".to_string(), "2.5 fF".to_string())]);
    assert_eq!(rows("VDD"), vec![("dc".to_string(), "1.80 V".to_string())]);
}

#[test]
fn test_rin_hidden_in_detail_but_exported() {
    let view = CircuitView::open(&fixture_path("flat_circuit.json")).unwrap();

    let hidden = view.detail("RIN0", &DetailPolicy::default()).unwrap();
    assert!(hidden.parameters.is_empty());

    let all = view.detail("RIN0", &DetailPolicy::show_all()).unwrap();
    let displays: Vec<&str> = all.parameters.iter().map(|r| r.display.as_str()).collect();
    assert_eq!(displays, vec!["1.0 kΩ", "1.0 Ω"]);

    let dir = tempfile::tempdir().unwrap();
    let path = write_export(&view.payload, dir.path()).unwrap();
    let exported: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(exported["components"]["RIN0"]["parameters"]["r"], 1000);
}

#[test]
fn test_export_is_verbatim() {
    for (fixture, expected_name) in [
        ("flat_circuit.json", "five_t_ota.json"),
        ("typed_circuit.json", "common_source.json"),
    ] {
        let view = CircuitView::open(&fixture_path(fixture)).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let path = view.export_to(dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), expected_name);

        let exported: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(exported, read_fixture(fixture));
    }
    assert_eq!(export_filename(None), "circuit.json");
}

#[test]
fn test_specs_panel() {
    let flat = CircuitView::open(&fixture_path("flat_circuit.json")).unwrap();
    assert_eq!(flat.summary.temperature_c, Some(27.0));
    assert_eq!(flat.summary.fet_count, Some(5));
    let specs: Vec<&str> = flat.summary.perf_specs.iter().map(|r| r.display.as_str()).collect();
    assert_eq!(specs, vec!["38.200", "1.45e+8", "62.500", "2.40e-4"]);

    let typed = CircuitView::open(&fixture_path("typed_circuit.json")).unwrap();
    assert_eq!(typed.summary.filename.as_deref(), Some("common_source.scs"));
    assert_eq!(typed.summary.temperature_c, Some(85.0));

    let bare = CircuitPayload::from_value(serde_json::json!({"components": {}, "nets": {}})).unwrap();
    assert!(CircuitSummary::from_payload(&bare).is_empty());
}

#[test]
fn test_session_over_fixtures() {
    let session = Session::default();
    let flat = CircuitPayload::from_path(&fixture_path("flat_circuit.json")).unwrap();
    let first = session.load(flat).unwrap();

    session.select(Some("RIN0")).unwrap();
    let detail = session.selected_detail().unwrap();
    assert!(detail.parameters.is_empty());
    assert_eq!(detail.connections.len(), 2);

    let typed = CircuitPayload::from_path(&fixture_path("typed_circuit.json")).unwrap();
    let second = session.load(typed).unwrap();
    assert_ne!(first, second);
    assert!(session.selected_detail().is_none());
}
