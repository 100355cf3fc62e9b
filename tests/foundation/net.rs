//! Integration tests for network descriptions

use netform_foundation::{NetDef, OperatorDef};

#[test]
fn builder_collects_ops_in_order() {
    let net = NetDef::new("n")
        .with_external_inputs(["X"])
        .with_external_outputs(["Y"])
        .with_op(OperatorDef::new("Conv").with_inputs(["X"]).with_outputs(["C"]))
        .with_op(OperatorDef::new("Relu").with_inputs(["C"]).with_outputs(["Y"]));

    assert_eq!(net.name, "n");
    assert_eq!(net.op_types(), vec!["Conv", "Relu"]);
    assert_eq!(net.external_inputs, vec!["X".to_string()]);
    assert_eq!(net.external_outputs, vec!["Y".to_string()]);
}

#[test]
fn operator_blob_queries() {
    let op = OperatorDef::new("Sum")
        .with_name("sum")
        .with_inputs(["A", "B"])
        .with_outputs(["S"])
        .with_arg("broadcast", "1");

    assert!(op.reads("A"));
    assert!(!op.reads("S"));
    assert!(op.writes("S"));
    assert_eq!(op.args.get("broadcast").map(String::as_str), Some("1"));
}

#[test]
fn default_net_is_empty() {
    let net = NetDef::default();
    assert!(net.ops.is_empty());
    assert!(net.op_types().is_empty());
}
