//! End-to-end tests from description text to netlist.

use bddlay_diagnostics::{codes, DiagnosticSink, Severity};
use bddlay_netlist::{load_netlist, Coord, ParseError, Target, TransistorId, TransistorKind};
use bddlay_source::SourceText;

fn load(text: &str) -> (Result<bddlay_netlist::Netlist, ParseError>, DiagnosticSink) {
    let source = SourceText::new("input.bdd", text.to_string());
    let sink = DiagnosticSink::new();
    let result = load_netlist(&source, &sink).map(|(_, netlist)| netlist);
    (result, sink)
}

fn raw(ids: &[TransistorId]) -> Vec<u32> {
    ids.iter().map(|id| id.as_raw()).collect()
}

#[test]
fn root_switch_with_two_leaf_switches() {
    let (result, sink) = load("[(0,1)]\n[(-2,-1)],[(-2,-1)]\n[0,1]\n");
    let netlist = result.unwrap();
    assert!(sink.is_empty());

    assert_eq!(netlist.len(), 6);
    let t = netlist.transistors();
    assert_eq!(t[0].target, Target::Node(Coord::new(1, 0)));
    assert_eq!(t[1].target, Target::Node(Coord::new(1, 1)));
    for leaf in &t[2..] {
        assert_eq!(leaf.kind, TransistorKind::LeafSwitch);
        assert!(leaf.target.is_terminal());
    }
    assert_eq!(t[2].target.to_string(), "OUTPUT_1");
    assert_eq!(t[3].target.to_string(), "OUTPUT_0");

    // The root's two transistors share their source; each layer-1 node joins
    // its driver with both of its own transistors.
    let nets: Vec<Vec<u32>> = netlist.nets().iter().map(|n| raw(&n.members)).collect();
    assert_eq!(nets, vec![vec![0, 1], vec![0, 2, 3], vec![1, 4, 5]]);
}

#[test]
fn every_net_has_at_least_two_distinct_members() {
    let (result, _) = load("[(0,1)]\n[(0,1),(1,2)]\n[(-1,-2)],[-1],[(-2,-1)]\n[0,1,2]");
    let netlist = result.unwrap();
    for net in netlist.nets() {
        assert!(net.len() >= 2);
        let mut members = raw(&net.members);
        members.sort_unstable();
        members.dedup();
        assert_eq!(members.len(), net.len());
    }
}

#[test]
fn ids_are_contiguous() {
    let (result, _) = load("[(0,1)]\n[(0,1),(1,2)]\n[(-1,-2)],[-1],[(-2,-1)]\n[0,1,2]");
    let netlist = result.unwrap();
    // 2 + 4 + (2 + 1 + 2)
    assert_eq!(netlist.len(), 11);
    for (i, t) in netlist.transistors().iter().enumerate() {
        assert_eq!(t.id.index(), i);
    }
}

#[test]
fn unrecognized_node_lowers_count() {
    let (result, sink) = load("[(0,1), (0,1,2)]\n[-1],[-2]\n[0,1]");
    let netlist = result.unwrap();
    assert_eq!(netlist.len(), 4);
    let warnings: Vec<_> = sink
        .diagnostics()
        .into_iter()
        .filter(|d| d.severity == Severity::Warning)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code, codes::UNRECOGNIZED_NODE_SHAPE);
}

#[test]
fn malformed_input_is_fatal() {
    let (result, _) = load("[(0,1)\n[0]");
    assert!(matches!(result, Err(ParseError::MalformedLiteral { line: 1, .. })));
}

#[test]
fn loads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("design.bdd");
    std::fs::write(&path, "[(0,1)]\n[-1],[-2]\n[0,1]\n").unwrap();

    let source = SourceText::load(&path).unwrap();
    let sink = DiagnosticSink::new();
    let (structure, netlist) = load_netlist(&source, &sink).unwrap();
    assert_eq!(structure.layers.len(), 2);
    assert_eq!(netlist.len(), 4);
    assert_eq!(netlist.leaf_transistors().count(), 2);
}
