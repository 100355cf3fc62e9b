//! Integration tests for the built-in fusion transforms.

use netform_engine::{
    FuseSequence, MatchStrategy, Transformer, TransformerConfig, apply_transform,
};
use netform_foundation::{ErrorKind, NetDef, OperatorDef};

/// Two residual blocks: `Conv -> Relu -> Conv -> Sum(skip) -> Relu`.
fn residual_net() -> NetDef {
    let mut net = NetDef::new("residual").with_external_inputs(["X0", "W"]);
    for i in 0..2 {
        let x = format!("X{i}");
        net = net
            .with_op(
                OperatorDef::new("Conv")
                    .with_name(format!("conv{i}a"))
                    .with_inputs([x.clone(), "W".to_string()])
                    .with_outputs([format!("A{i}")]),
            )
            .with_op(
                OperatorDef::new("Relu")
                    .with_name(format!("relu{i}a"))
                    .with_inputs([format!("A{i}")])
                    .with_outputs([format!("B{i}")]),
            )
            .with_op(
                OperatorDef::new("Conv")
                    .with_name(format!("conv{i}b"))
                    .with_inputs([format!("B{i}"), "W".to_string()])
                    .with_outputs([format!("C{i}")]),
            )
            .with_op(
                OperatorDef::new("Sum")
                    .with_inputs([format!("C{i}"), x])
                    .with_outputs([format!("S{i}")]),
            )
            .with_op(
                OperatorDef::new("Relu")
                    .with_inputs([format!("S{i}")])
                    .with_outputs([format!("X{}", i + 1)]),
            );
    }
    net.with_external_outputs(["X2"])
}

#[test]
fn conv_relu_fuses_inside_residual_blocks() {
    let out = apply_transform("fuse_conv_relu", &residual_net()).unwrap();

    assert_eq!(
        out.op_types(),
        vec!["ConvRelu", "Conv", "Sum", "Relu", "ConvRelu", "Conv", "Sum", "Relu"]
    );
    assert_eq!(out.ops[0].name, "conv0a+relu0a");
    assert_eq!(out.ops[0].outputs, vec!["B0"]);
    assert_eq!(out.external_outputs, vec!["X2".to_string()]);
}

#[test]
fn connected_and_ordered_agree_on_chains() {
    let net = residual_net();
    let fuse = || Box::new(FuseSequence::new("fuse_conv_relu", ["Conv", "Relu"], "ConvRelu"));

    let ordered = Transformer::new(fuse()).apply_to(&net).unwrap();
    let connected = Transformer::new(fuse())
        .with_config(TransformerConfig::new().with_strategy(MatchStrategy::Connected))
        .apply_to(&net)
        .unwrap();
    assert_eq!(ordered, connected);
}

#[test]
fn passes_compose() {
    let net = NetDef::new("mlp")
        .with_external_inputs(["X", "W1", "W2"])
        .with_external_outputs(["Y"])
        .with_op(OperatorDef::new("FC").with_inputs(["X", "W1"]).with_outputs(["H"]))
        .with_op(OperatorDef::new("Relu").with_inputs(["H"]).with_outputs(["R"]))
        .with_op(OperatorDef::new("FC").with_inputs(["R", "W2"]).with_outputs(["Z"]))
        .with_op(OperatorDef::new("Relu").with_inputs(["Z"]).with_outputs(["Y"]));

    let once = apply_transform("fuse_conv_relu", &net).unwrap();
    assert_eq!(once, net);

    let fused = apply_transform("fuse_fc_relu", &once).unwrap();
    assert_eq!(fused.op_types(), vec!["FCRelu", "FCRelu"]);
    assert_eq!(fused.ops[1].inputs, vec!["R", "W2"]);
    assert_eq!(fused.ops[1].outputs, vec!["Y"]);
}

#[test]
fn longer_patterns_fuse_whole_chains() {
    let net = NetDef::new("triple")
        .with_op(OperatorDef::new("Conv").with_inputs(["X"]).with_outputs(["A"]))
        .with_op(OperatorDef::new("BatchNorm").with_inputs(["A"]).with_outputs(["B"]))
        .with_op(OperatorDef::new("Relu").with_inputs(["B"]).with_outputs(["C"]));
    let fuse = FuseSequence::new("fuse_cbr", ["Conv", "BatchNorm", "Relu"], "ConvBnRelu");

    let out = Transformer::new(Box::new(fuse)).apply_to(&net).unwrap();
    assert_eq!(out.op_types(), vec!["ConvBnRelu"]);
    assert_eq!(out.ops[0].inputs, vec!["X"]);
    assert_eq!(out.ops[0].outputs, vec!["C"]);
}

#[test]
fn unknown_transform_key() {
    let err = apply_transform("fuse_everything", &residual_net()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownTransform(_)));
}

#[test]
fn fused_op_reads_inputs_before_they_are_overwritten() {
    let net = NetDef::new("overwrite_input")
        .with_external_inputs(["X", "W"])
        .with_external_outputs(["P"])
        .with_op(OperatorDef::new("Conv").with_inputs(["X", "W"]).with_outputs(["C"]))
        .with_op(OperatorDef::new("Relu").with_inputs(["C"]).with_outputs(["R"]))
        .with_op(OperatorDef::new("Fill").with_outputs(["X"]))
        .with_op(OperatorDef::new("Pool").with_inputs(["R", "X"]).with_outputs(["P"]));

    let out = apply_transform("fuse_conv_relu", &net).unwrap();
    assert_eq!(out.op_types(), vec!["ConvRelu", "Fill", "Pool"]);
}

#[test]
fn fused_op_keeps_its_place_among_writers() {
    let net = NetDef::new("overwrite_output")
        .with_external_outputs(["P"])
        .with_op(OperatorDef::new("Conv").with_outputs(["C"]))
        .with_op(OperatorDef::new("Relu").with_inputs(["C"]).with_outputs(["A"]))
        .with_op(OperatorDef::new("Fill").with_outputs(["A"]))
        .with_op(OperatorDef::new("Pool").with_inputs(["A"]).with_outputs(["P"]));

    let out = apply_transform("fuse_conv_relu", &net).unwrap();
    assert_eq!(out.op_types(), vec!["ConvRelu", "Fill", "Pool"]);
    assert_eq!(out.ops[1].outputs, vec!["A"]);
}
