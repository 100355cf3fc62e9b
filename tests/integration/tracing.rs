//! Tracing transform passes across the session and debug layers.

use netform::debug::{JsonFormatter, TraceEvent, TraceFormatter, Tracer, TracerConfig};
use netform::foundation::{NetDef, OperatorDef};
use netform::runtime::Session;

/// Two Conv-Relu chains, one of which shares its intermediate blob.
fn net() -> NetDef {
    NetDef::new("traced")
        .with_op(OperatorDef::new("Conv").with_inputs(["X"]).with_outputs(["A"]))
        .with_op(OperatorDef::new("Relu").with_inputs(["A"]).with_outputs(["B"]))
        .with_op(OperatorDef::new("Conv").with_inputs(["B"]).with_outputs(["C"]))
        .with_op(OperatorDef::new("Relu").with_inputs(["C"]).with_outputs(["D"]))
        .with_op(OperatorDef::new("Sum").with_inputs(["C", "D"]).with_outputs(["E"]))
}

fn traced_session() -> Session {
    Session::new(net()).with_tracer(Tracer::new(TracerConfig::new().enabled()))
}

#[test]
fn pass_events_reflect_the_report() {
    let mut session = traced_session();
    let summary = session.apply("fuse_conv_relu").unwrap();
    assert_eq!(summary.applied, 1);

    let buffer = session.tracer().buffer();
    assert_eq!(buffer.by_event_type("match-found").len(), 1);
    assert_eq!(buffer.by_event_type("match-applied").len(), 1);
    assert!(buffer.by_event_type("match-skipped").is_empty());

    let stats = buffer.by_event_type("search-stats");
    assert_eq!(stats.len(), 1);
    assert!(matches!(
        stats[0].event,
        TraceEvent::SearchStats { candidates_accepted, .. } if candidates_accepted >= 2
    ));
}

#[test]
fn filtered_tracer_keeps_only_boundaries() {
    let tracer = Tracer::new(
        TracerConfig::new()
            .enabled()
            .filter_events(vec!["pass-start".to_string(), "pass-end".to_string()]),
    );
    let mut session = Session::new(net()).with_tracer(tracer);
    session.apply_all(["fuse_conv_relu", "fuse_fc_relu"]).unwrap();

    let buffer = session.tracer().buffer();
    assert_eq!(buffer.len(), 4);
    assert!(buffer.iter().all(|r| r.event.is_pass_boundary()));
    assert_eq!(buffer.passes(), vec![1, 2]);
}

#[test]
fn json_output_lists_every_record() {
    let mut session = traced_session();
    session.apply("fuse_conv_relu").unwrap();

    let records: Vec<_> = session.tracer().buffer().iter().collect();
    let json = JsonFormatter::new().format_many(&records);
    assert!(json.starts_with("[{\"id\":0,\"pass\":1,"));
    assert_eq!(json.matches("\"type\":").count(), records.len());
}

#[test]
fn disabled_tracer_records_nothing() {
    let mut session = Session::new(net());
    session.apply("fuse_conv_relu").unwrap();
    assert!(session.tracer().buffer().is_empty());
}
