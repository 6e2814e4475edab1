//! Binder tests: host values against a resolved schema, checked at the
//! upload-command level.

use glslbind_lang::{
    parse, sync_all, sync_variable, Payload, Schema, Severity, Value, Variables,
};

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn schema(src: &str) -> Schema {
    parse(&format!("uniform vec2 resolution;\n{src}"))
        .unwrap_or_else(|errs| panic!("parse failed: {errs:#?}"))
}

fn circle(x: f32, y: f32, radius: f32) -> Value {
    Value::record([
        ("center", Value::record([("x", x.into()), ("y", y.into())])),
        ("radius", radius.into()),
    ])
}

// ─── Struct and array traversal ──────────────────────────────────────────────

#[test]
fn struct_expands_to_field_writes() {
    let s = schema("struct Circle { vec2 center; float radius; };\nuniform Circle c1;");
    let vars = Variables::from_iter([("c1", circle(0.1, 0.2, 0.5))]);

    let report = sync_variable("c1", &vars, &s);
    let paths: Vec<&str> = report.writes.iter().map(|w| w.path.as_str()).collect();
    assert_eq!(paths, vec!["c1.center", "c1.radius"]);
    assert_eq!(report.writes[1].payload, Payload::Float(0.5));
}

#[test]
fn depth_two_array_uploads_exactly_the_flattened_leaf_count() {
    // struct containing a struct field, inside a length-2 array
    let s = schema(
        "struct Circle { vec2 center; float radius; };\n\
         struct Player { Circle circle; bool visible; };\n\
         uniform Player players[2];",
    );
    let player = |x: f32| Value::record([
        ("circle", circle(x, x, 1.0)),
        ("visible", true.into()),
    ]);
    let vars = Variables::from_iter([("players", Value::list([player(0.0), player(1.0)]))]);

    let report = sync_variable("players", &vars, &s);
    assert!(report.issues.is_empty());

    let paths: Vec<&str> = report.writes.iter().map(|w| w.path.as_str()).collect();
    assert_eq!(paths, vec![
        "players[0].circle.center",
        "players[0].circle.radius",
        "players[0].visible",
        "players[1].circle.center",
        "players[1].circle.radius",
        "players[1].visible",
    ]);
    // every leaf path distinct
    let mut unique = paths.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), paths.len());
}

#[test]
fn shorter_host_array_syncs_only_whats_present() {
    let s = schema("struct Circle { vec2 center; float radius; };\nuniform Circle cs[4];");
    let vars = Variables::from_iter([("cs", Value::list([circle(0.0, 0.0, 1.0)]))]);

    let report = sync_variable("cs", &vars, &s);
    assert!(report.issues.is_empty());
    let paths: Vec<&str> = report.writes.iter().map(|w| w.path.as_str()).collect();
    assert_eq!(paths, vec!["cs[0].center", "cs[0].radius"]);
}

#[test]
fn missing_field_aborts_that_element_but_not_siblings() {
    let s = schema("struct Circle { vec2 center; float radius; };\nuniform Circle cs[2];");
    let broken = Value::record([("center", Value::record([("x", 0.0.into()), ("y", 0.0.into())]))]);
    let vars = Variables::from_iter([("cs", Value::list([broken, circle(1.0, 2.0, 3.0)]))]);

    let report = sync_variable("cs", &vars, &s);
    let paths: Vec<&str> = report.writes.iter().map(|w| w.path.as_str()).collect();
    // cs[0].radius missing → cs[0] stops after center, cs[1] fully syncs
    assert_eq!(paths, vec!["cs[0].center", "cs[1].center", "cs[1].radius"]);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].severity, Severity::Warning);
    assert!(report.issues[0].message.contains("radius"));
}

#[test]
fn field_order_follows_declaration_order() {
    let s = schema("struct S { float z; float a; float m; };\nuniform S s;");
    let vars = Variables::from_iter([("s", Value::record([
        ("a", 1.0.into()), ("m", 2.0.into()), ("z", 3.0.into()),
    ]))]);
    let report = sync_variable("s", &vars, &s);
    let paths: Vec<&str> = report.writes.iter().map(|w| w.path.as_str()).collect();
    assert_eq!(paths, vec!["s.z", "s.a", "s.m"]);
}

// ─── Vector shape tolerance ──────────────────────────────────────────────────

#[test]
fn all_four_shapes_upload_identical_components() {
    let s = schema("uniform vec3 v;");
    let shapes = [
        Value::list([0.1f32.into(), 0.2f32.into(), 0.3f32.into()]),
        Value::record([("x", 0.1.into()), ("y", 0.2.into()), ("z", 0.3.into())]),
        Value::record([("s", 0.1.into()), ("t", 0.2.into()), ("p", 0.3.into())]),
        Value::record([("r", 0.1.into()), ("g", 0.2.into()), ("b", 0.3.into())]),
    ];
    let expected: Vec<Payload> = shapes.iter().map(|v| {
        let vars = Variables::from_iter([("v", v.clone())]);
        let mut report = sync_variable("v", &vars, &s);
        assert!(report.issues.is_empty(), "shape rejected: {v:?}");
        report.writes.pop().unwrap().payload
    }).collect();
    assert!(expected.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn unrecognized_shape_skips_leaf_but_not_siblings() {
    let s = schema("uniform vec3 bad;\nuniform float good;");
    let vars = Variables::from_iter([
        ("bad", Value::record([("foo", 1.0.into())])),
        ("good", 0.5f32.into()),
    ]);
    let report = sync_all(&vars, &s);
    assert_eq!(report.writes.len(), 1);
    assert_eq!(report.writes[0].path, "good");
    assert!(report.issues.iter().any(|i| i.severity == Severity::Error));
}

#[test]
fn ivec_uploads_int_components() {
    let s = schema("uniform ivec2 iv;");
    let vars = Variables::from_iter([("iv", Value::record([("x", 5.into()), ("y", 3.into())]))]);
    let report = sync_variable("iv", &vars, &s);
    assert_eq!(report.writes[0].payload, Payload::IntVec { arity: 2, v: [5, 3, 0, 0] });
}

#[test]
fn bvec_uploads_through_int_entry_points() {
    let s = schema("uniform bvec3 bv;");
    let vars = Variables::from_iter([("bv", Value::list([
        true.into(), false.into(), true.into(),
    ]))]);
    let report = sync_variable("bv", &vars, &s);
    assert_eq!(report.writes[0].payload, Payload::IntVec { arity: 3, v: [1, 0, 1, 0] });
}

// ─── sync_all ────────────────────────────────────────────────────────────────

#[test]
fn sync_all_visits_schema_order_and_is_idempotent() {
    let s = schema("uniform float a;\nuniform vec4 color;\nuniform int n;");
    let vars = Variables::from_iter([
        ("a", 1.0f32.into()),
        ("color", Value::record([
            ("x", 1.0.into()), ("y", 1.0.into()), ("z", 1.0.into()), ("w", 1.0.into()),
        ])),
        ("n", 7.into()),
    ]);
    let first = sync_all(&vars, &s);
    let second = sync_all(&vars, &s);

    let paths: Vec<&str> = first.writes.iter().map(|w| w.path.as_str()).collect();
    assert_eq!(paths, vec!["a", "color", "n"]);
    // unchanged values → identical command stream
    assert_eq!(first, second);
}

#[test]
fn missing_variable_does_not_block_the_rest() {
    let s = schema("uniform float present;\nuniform float absent;\nuniform float also;");
    let vars = Variables::from_iter([
        ("present", 1.0f32.into()),
        ("also", 2.0f32.into()),
    ]);
    let report = sync_all(&vars, &s);
    let paths: Vec<&str> = report.writes.iter().map(|w| w.path.as_str()).collect();
    assert_eq!(paths, vec!["present", "also"]);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].severity, Severity::Warning);
}

// ─── Color-flip scenario ──────────────────────────────────────────────────────

#[test]
fn white_to_yellow_color_flip() {
    let s = schema("uniform vec4 color;");
    let white = Variables::from_iter([("color", Value::record([
        ("x", 1.0.into()), ("y", 1.0.into()), ("z", 1.0.into()), ("w", 1.0.into()),
    ]))]);
    let report = sync_variable("color", &white, &s);
    assert_eq!(report.writes[0].payload,
        Payload::FloatVec { arity: 4, v: [1.0, 1.0, 1.0, 1.0] });

    let yellow = Variables::from_iter([("color", Value::record([
        ("x", 1.0.into()), ("y", 1.0.into()), ("z", 0.0.into()), ("w", 1.0.into()),
    ]))]);
    let report = sync_variable("color", &yellow, &s);
    assert_eq!(report.writes[0].payload,
        Payload::FloatVec { arity: 4, v: [1.0, 1.0, 0.0, 1.0] });
}

// ─── Typed flat arrays ───────────────────────────────────────────────────────

#[test]
fn typed_arrays_for_scalar_and_vector_arrays() {
    let s = schema("uniform int iarray4[4];\nuniform vec2 v2arr5[5];");
    let vars = Variables::from_iter([
        ("iarray4", vec![0i32, 1, 2, 3].into()),
        ("v2arr5", vec![0.5f32, 0.0, 1.5, 1.0, 2.5, 2.0, 3.5, 3.0, 4.5, 4.0].into()),
    ]);
    let report = sync_all(&vars, &s);
    assert_eq!(report.writes[0].payload,
        Payload::IntArray { components: 1, data: vec![0, 1, 2, 3] });
    assert_eq!(report.writes[1].payload, Payload::FloatArray {
        components: 2,
        data: vec![0.5, 0.0, 1.5, 1.0, 2.5, 2.0, 3.5, 3.0, 4.5, 4.0],
    });
}

#[test]
fn bool_array_uploads_as_ints() {
    let s = schema("uniform bool barray4[4];");
    let vars = Variables::from_iter([("barray4", Value::list([
        true.into(), true.into(), true.into(), false.into(),
    ]))]);
    let report = sync_variable("barray4", &vars, &s);
    assert_eq!(report.writes[0].payload,
        Payload::IntArray { components: 1, data: vec![1, 1, 1, 0] });
}
