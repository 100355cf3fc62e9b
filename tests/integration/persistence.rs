//! Saving, loading, and transforming networks on disk.

use netform::engine::apply_transform;
use netform::foundation::{ErrorKind, NetDef, OperatorDef};
use netform::runtime::{Session, from_bytes, load_from_file, save_to_file, to_bytes};

fn net() -> NetDef {
    NetDef::new("persisted")
        .with_external_inputs(["X", "W"])
        .with_external_outputs(["R"])
        .with_op(
            OperatorDef::new("Conv")
                .with_name("conv")
                .with_inputs(["X", "W"])
                .with_outputs(["C"])
                .with_arg("pad", "1"),
        )
        .with_op(
            OperatorDef::new("Relu")
                .with_name("relu")
                .with_inputs(["C"])
                .with_outputs(["R"]),
        )
}

#[test]
fn transformed_net_survives_a_file_round_trip() {
    let path = std::env::temp_dir().join("netform_persistence_test.msgpack");
    save_to_file(&net(), &path).unwrap();

    let mut session = Session::new(load_from_file(&path).unwrap());
    session.apply("fuse_conv_relu").unwrap();
    save_to_file(session.net(), &path).unwrap();

    let restored = load_from_file(&path).unwrap();
    assert_eq!(restored.op_types(), vec!["ConvRelu"]);
    assert_eq!(restored.ops[0].name, "conv+relu");
    assert_eq!(restored.ops[0].args.get("pad").map(String::as_str), Some("1"));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn bytes_round_trip_preserves_transform_result() {
    let fused = apply_transform("fuse_conv_relu", &net()).unwrap();
    let restored = from_bytes(&to_bytes(&fused).unwrap()).unwrap();
    assert_eq!(restored, fused);
}

#[test]
fn truncated_bytes_are_rejected() {
    let bytes = to_bytes(&net()).unwrap();
    let err = from_bytes(&bytes[..bytes.len() / 2]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SerializationError(_)));
}
