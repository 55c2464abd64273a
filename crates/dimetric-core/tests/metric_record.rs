//! Metric record behaviour outside the vector set.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use dimetric_core::{sanitize, Dimensions, Metric, MetricKind};

const SAMPLES: [&str; 8] = [
    "",
    "cpu.total.user",
    "a=b",
    "host:port",
    "==::==",
    "k=v:w=x",
    "héllo:wörld",
    "-already-clean-",
];

#[test]
fn sanitize_strips_reserved_and_is_idempotent() {
    for s in SAMPLES {
        let once = sanitize(s);
        assert!(!once.contains('='), "input={s}");
        assert!(!once.contains(':'), "input={s}");
        assert_eq!(sanitize(&once), once, "input={s}");
        assert_eq!(once.chars().count(), s.chars().count(), "input={s}");
    }
}

#[test]
fn new_is_an_empty_gauge() {
    for s in SAMPLES {
        let m = Metric::new(s);
        assert_eq!(m.kind, MetricKind::Gauge);
        assert_eq!(m.value, 0.0);
        assert!(m.dimensions().is_empty());
        assert_eq!(m.name(), sanitize(s));
    }
}

#[test]
fn defaults_win_and_own_only_keys_survive() {
    let m = Metric::new("load")
        .with_dimension("host", "web-1")
        .with_dimension("dc", "ams");

    let mut defaults = Dimensions::new();
    defaults.insert("host".into(), "override".into());
    defaults.insert("env".into(), "prod".into());

    let merged = m.get_dimensions(&defaults);
    assert_eq!(merged.len(), 3);
    assert_eq!(merged["host"], "override");
    assert_eq!(merged["dc"], "ams");
    assert_eq!(merged["env"], "prod");
}

#[test]
fn missing_dimension_is_none() {
    let m = Metric::new("x");
    assert_eq!(m.get_dimension_value("missing", &Dimensions::new()), None);
}

#[test]
fn builder_helpers_set_fields() {
    let m = Metric::new("cpu.total.user")
        .with_kind(MetricKind::CumulativeCounter)
        .with_value(12.5)
        .with_dimension("core:x", "1");
    assert_eq!(m.kind, MetricKind::CumulativeCounter);
    assert_eq!(m.value, 12.5);
    assert_eq!(m.dimensions().get("core-x").map(String::as_str), Some("1"));
}

#[test]
fn serializes_with_type_field() {
    let m = Metric::new("requests")
        .with_kind(MetricKind::Counter)
        .with_value(3.0)
        .with_dimension("route", "/a");
    let v = serde_json::to_value(&m).unwrap();
    assert_eq!(v["name"], "requests");
    assert_eq!(v["type"], "counter");
    assert_eq!(v["value"], 3.0);
    assert_eq!(v["dimensions"]["route"], "/a");
}

#[test]
fn deserialize_goes_through_sanitization() {
    let s = r#"{"name":"a=b","type":"cumcounter","value":1.5,"dimensions":{"k:1":"v=2"}}"#;
    let m: Metric = serde_json::from_str(s).unwrap();
    assert_eq!(m.name(), "a-b");
    assert_eq!(m.kind, MetricKind::CumulativeCounter);
    assert_eq!(m.value, 1.5);
    assert_eq!(m.dimensions().get("k-1").map(String::as_str), Some("v-2"));
}

#[test]
fn deserialize_fills_defaults_and_keeps_unknown_kind() {
    let m: Metric = serde_json::from_str(r#"{"name":"n"}"#).unwrap();
    assert_eq!(m, Metric::new("n"));

    let m: Metric = serde_json::from_str(r#"{"name":"n","type":"timer"}"#).unwrap();
    assert_eq!(m.kind, MetricKind::Other("timer".into()));
    assert_eq!(serde_json::to_value(&m).unwrap()["type"], "timer");
}

#[test]
fn dimension_value_agrees_with_merged_view() {
    let m = Metric::new("disk.io")
        .with_dimension("host", "web-1")
        .with_dimension("device", "sda")
        .with_dimension("mount", "/data");

    let mut defaults = Dimensions::new();
    defaults.insert("host".into(), "override".into());
    defaults.insert("region".into(), "eu-1".into());

    let merged = m.get_dimensions(&defaults);
    assert_eq!(merged.len(), 4);
    for (k, v) in &merged {
        assert_eq!(m.get_dimension_value(k, &defaults).as_ref(), Some(v), "key={k}");
    }

    // record-only keys still resolve while defaults are non-empty
    assert_eq!(m.get_dimension_value("device", &defaults).as_deref(), Some("sda"));
    assert_eq!(m.get_dimension_value("mount", &defaults).as_deref(), Some("/data"));
    assert_eq!(m.get_dimension_value("absent", &defaults), None);
}
