//! End-to-end transform pipelines through the runtime session.

use netform::engine::{MatchStrategy, Transform, TransformRegistry, TransformerConfig};
use netform::foundation::{ErrorKind, NetDef, NodeIndex, OperatorDef, Result};
use netform::graph::Graph;
use netform::runtime::Session;

/// Removes `Identity` ops by rewiring their consumers to read the input blob.
struct DropIdentity;

impl Transform for DropIdentity {
    fn name(&self) -> &str {
        "drop_identity"
    }

    fn strategy(&self) -> MatchStrategy {
        MatchStrategy::OrderedByPosition
    }

    fn accept(&self, graph: &Graph, subgraph: &[NodeIndex], candidate: NodeIndex) -> bool {
        subgraph.is_empty()
            && graph.node(candidate).is_ok_and(|node| {
                node.op_type() == "Identity"
                    && node.op.inputs.len() == 1
                    && node.op.outputs.len() == 1
            })
    }

    fn validate(&self, graph: &Graph, subgraph: &[NodeIndex]) -> bool {
        subgraph.len() == 1
            && graph.node(subgraph[0]).is_ok_and(|node| {
                !graph.external_outputs().contains(&node.op.outputs[0])
            })
    }

    fn rewrite(&self, matched: &[NodeIndex], graph: &mut Graph) -> Result<()> {
        let index = matched[0];
        let node = graph.node(index)?.clone();
        let (from, to) = (node.op.inputs[0].clone(), node.op.outputs[0].clone());

        for &child in node.children.keys() {
            if !graph.is_active(child) {
                continue;
            }
            for blob in &mut graph.node_mut(child)?.op.inputs {
                if *blob == to {
                    blob.clone_from(&from);
                }
            }
            graph.remove_edge(index, child)?;
            for &parent in node.parents.keys() {
                graph.add_edge(parent, child, &from)?;
            }
        }
        graph.deactivate(index)
    }
}

fn net() -> NetDef {
    NetDef::new("pipeline")
        .with_external_inputs(["X", "W"])
        .with_external_outputs(["Y"])
        .with_op(OperatorDef::new("Conv").with_inputs(["X", "W"]).with_outputs(["C"]))
        .with_op(OperatorDef::new("Identity").with_inputs(["C"]).with_outputs(["I"]))
        .with_op(OperatorDef::new("Relu").with_inputs(["I"]).with_outputs(["R"]))
        .with_op(OperatorDef::new("FC").with_inputs(["R", "W"]).with_outputs(["F"]))
        .with_op(OperatorDef::new("Relu").with_inputs(["F"]).with_outputs(["Y"]))
}

fn registry() -> TransformRegistry {
    let mut registry = TransformRegistry::with_builtins();
    registry
        .register("drop_identity", || Box::new(DropIdentity))
        .unwrap();
    registry
}

#[test]
fn custom_transform_enables_builtin_fusion() {
    let mut session = Session::new(net()).with_registry(registry());

    let blocked = session.apply("fuse_conv_relu").unwrap();
    assert_eq!(blocked.applied, 0);

    session
        .apply_all(["drop_identity", "fuse_conv_relu", "fuse_fc_relu"])
        .unwrap();

    let out = session.net();
    assert_eq!(out.op_types(), vec!["ConvRelu", "FCRelu"]);
    assert_eq!(out.ops[0].inputs, vec!["X", "W"]);
    assert_eq!(out.ops[1].inputs, vec!["R", "W"]);
    assert_eq!(out.ops[1].outputs, vec!["Y"]);
    assert_eq!(session.history().len(), 4);
}

#[test]
fn strategy_override_reaches_every_pass() {
    let mut session = Session::new(net())
        .with_registry(registry())
        .with_config(TransformerConfig::new().with_strategy(MatchStrategy::Unrestricted));

    let summaries = session
        .apply_all(["drop_identity", "fuse_conv_relu"])
        .unwrap();
    assert!(summaries.iter().all(|s| s.strategy == MatchStrategy::Unrestricted));
    assert_eq!(summaries[1].applied, 1);
}

#[test]
fn failing_pass_stops_the_sequence() {
    let mut session = Session::new(net());
    let err = session
        .apply_all(["fuse_conv_relu", "drop_identity", "fuse_fc_relu"])
        .unwrap_err();

    assert!(matches!(err.kind, ErrorKind::UnknownTransform(ref k) if k == "drop_identity"));
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.net(), &net());
}

#[test]
fn registry_lists_builtins_and_custom() {
    let registry = registry();
    assert_eq!(
        registry.keys().collect::<Vec<_>>(),
        vec!["drop_identity", "fuse_conv_relu", "fuse_fc_relu"]
    );
}
