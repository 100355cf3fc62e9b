//! Integration tests for replacing subgraphs

use netform_foundation::{NetDef, OperatorDef};
use netform_graph::Graph;

/// `Conv -> Relu -> Pool`, with an external input and output.
fn chain() -> NetDef {
    NetDef::new("chain")
        .with_external_inputs(["X", "W"])
        .with_external_outputs(["P"])
        .with_op(OperatorDef::new("Conv").with_inputs(["X", "W"]).with_outputs(["C"]))
        .with_op(OperatorDef::new("Relu").with_inputs(["C"]).with_outputs(["R"]))
        .with_op(OperatorDef::new("Pool").with_inputs(["R"]).with_outputs(["P"]))
}

#[test]
fn boundary_blobs_of_chain() {
    let graph = Graph::from_net(&chain());

    assert_eq!(graph.subgraph_inputs(&[0, 1]).unwrap(), vec!["X", "W"]);
    assert_eq!(graph.subgraph_outputs(&[0, 1]).unwrap(), vec!["R"]);
    assert_eq!(graph.subgraph_outputs(&[1, 2]).unwrap(), vec!["P"]);
    assert!(graph.subgraph_inputs(&[5]).is_err());
}

#[test]
fn replaced_chain_exports_in_dependency_order() {
    let mut graph = Graph::from_net(&chain());
    let fused = OperatorDef::new("ConvRelu")
        .with_inputs(["X", "W"])
        .with_outputs(["R"]);

    let index = graph.replace_subgraph(&[0, 1], fused).unwrap();
    assert_eq!(index, 3);
    assert_eq!(graph.active_count(), 2);
    assert!(graph.node(2).unwrap().has_parent_via(index, "R"));

    let out = graph.to_net().unwrap();
    assert_eq!(out.op_types(), vec!["ConvRelu", "Pool"]);
    assert_eq!(out.external_outputs, vec!["P".to_string()]);
}

#[test]
fn replacement_drops_edges_for_blobs_it_no_longer_writes() {
    let mut graph = Graph::from_net(&chain());
    let op = OperatorDef::new("Other").with_inputs(["C"]).with_outputs(["Q"]);

    let index = graph.replace_subgraph(&[1], op).unwrap();
    assert!(graph.node(index).unwrap().has_parent_via(0, "C"));
    assert!(graph.node(2).unwrap().parents.keys().all(|&p| p != index));
}

#[test]
fn failed_replace_leaves_graph_untouched() {
    let mut graph = Graph::from_net(&chain());
    assert!(graph.replace_subgraph(&[0, 9], OperatorDef::new("X")).is_err());
    assert_eq!(graph.size(), 3);
    assert_eq!(graph.active_count(), 3);
}
