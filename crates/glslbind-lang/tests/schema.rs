//! Schema extraction tests.
//!
//! Each test feeds raw shader text through the public `parse()` API and
//! checks one extraction or validation rule. Error codes: D001–D002,
//! R001–R005.

use glslbind_lang::{parse, Error, ErrorCode, ScalarKind, Schema, TypeDesc};

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn ok(src: &str) -> Schema {
    parse(src).unwrap_or_else(|errs| {
        panic!("expected parse to succeed, got errors: {errs:#?}");
    })
}

fn err(src: &str) -> Vec<Error> {
    match parse(src) {
        Ok(_) => panic!("expected parse to fail but it succeeded"),
        Err(e) => e,
    }
}

fn has(errs: &[Error], code: ErrorCode) -> bool {
    errs.iter().any(|e| e.code == code)
}

const HEADER: &str = "uniform vec2 resolution;\n";

fn with_header(src: &str) -> String {
    format!("{HEADER}{src}")
}

// ─── resolution contract ─────────────────────────────────────────────────────

#[test]
fn r003_missing_resolution_is_fatal() {
    let errs = err("uniform vec4 color;\nvoid main (void) {}\n");
    assert!(has(&errs, ErrorCode::R003));
}

#[test]
fn r005_mistyped_resolution_is_fatal() {
    let errs = err("uniform vec3 resolution;\n");
    assert!(has(&errs, ErrorCode::R005));
}

#[test]
fn resolution_is_removed_from_the_schema() {
    let schema = ok(HEADER);
    assert!(schema.get("resolution").is_none());
    assert_eq!(schema.uniforms.len(), 0);
}

#[test]
fn precision_qualified_resolution_accepted() {
    ok("uniform highp vec2 resolution;\n");
}

// ─── descriptor extraction ───────────────────────────────────────────────────

#[test]
fn every_primitive_keyword() {
    let schema = ok(&with_header(
        "uniform bool b;\nuniform int i;\nuniform float f;\n\
         uniform vec3 v;\nuniform ivec2 iv;\nuniform bvec4 bv;\n\
         uniform mat3 m;\nuniform sampler2D t;\n",
    ));
    assert_eq!(schema.get("b"), Some(&TypeDesc::Scalar(ScalarKind::Bool)));
    assert_eq!(schema.get("i"), Some(&TypeDesc::Scalar(ScalarKind::Int)));
    assert_eq!(schema.get("f"), Some(&TypeDesc::Scalar(ScalarKind::Float)));
    assert_eq!(schema.get("v"), Some(&TypeDesc::Vector(ScalarKind::Float, 3)));
    assert_eq!(schema.get("iv"), Some(&TypeDesc::Vector(ScalarKind::Int, 2)));
    assert_eq!(schema.get("bv"), Some(&TypeDesc::Vector(ScalarKind::Bool, 4)));
    assert_eq!(schema.get("m"), Some(&TypeDesc::Matrix(3)));
    assert_eq!(schema.get("t"), Some(&TypeDesc::Sampler2D));
}

#[test]
fn declaration_order_preserved() {
    let schema = ok(&with_header("uniform float a;\nuniform float z;\nuniform float m;\n"));
    let names: Vec<&str> = schema.names().collect();
    assert_eq!(names, vec!["a", "z", "m"]);
}

#[test]
fn struct_uniform() {
    let schema = ok(&with_header(
        "struct Circle { vec2 center; highp float radius; };\nuniform Circle c1;\n",
    ));
    assert_eq!(schema.get("c1"), Some(&TypeDesc::Struct("Circle".into())));
    let def = schema.structs.get("Circle").unwrap();
    assert_eq!(def.fields[0].ty, TypeDesc::Vector(ScalarKind::Float, 2));
    assert_eq!(def.field("radius").unwrap().ty, TypeDesc::Scalar(ScalarKind::Float));
}

#[test]
fn nested_struct_uniform() {
    let schema = ok(&with_header(
        "struct Circle { vec2 center; float radius; };\n\
         struct Player { Circle circle; bool visible; };\n\
         uniform Player p1;\n",
    ));
    let player = schema.structs.get("Player").unwrap();
    assert_eq!(player.fields[0].ty, TypeDesc::Struct("Circle".into()));
}

#[test]
fn forward_struct_reference() {
    let schema = ok(&with_header(
        "struct Player { Circle circle; };\n\
         struct Circle { vec2 center; float radius; };\n\
         uniform Player p1;\n",
    ));
    assert!(schema.structs.get("Circle").is_some());
}

#[test]
fn array_of_struct() {
    let schema = ok(&with_header(
        "struct Circle { vec2 center; float radius; };\nuniform Circle cs[2];\n",
    ));
    assert_eq!(
        schema.get("cs"),
        Some(&TypeDesc::Array(Box::new(TypeDesc::Struct("Circle".into())), 2)),
    );
}

#[test]
fn unknown_type_kept_as_opaque() {
    let schema = ok(&with_header("uniform Widget w;\n"));
    assert_eq!(schema.get("w"), Some(&TypeDesc::Opaque("Widget".into())));
}

// ─── array lengths and defines ───────────────────────────────────────────────

#[test]
fn define_driven_length_equals_literal() {
    let by_define = ok(&with_header("#define LIGHTS 4\nuniform vec3 lights[LIGHTS];\n"));
    let by_literal = ok(&with_header("uniform vec3 lights[4];\n"));
    assert_eq!(by_define.get("lights"), by_literal.get("lights"));
}

#[test]
fn define_used_in_struct_field() {
    let schema = ok(&with_header(
        "#define CELLS 16\nstruct Grid { float cells[CELLS]; };\nuniform Grid g;\n",
    ));
    let grid = schema.structs.get("Grid").unwrap();
    assert_eq!(
        grid.fields[0].ty,
        TypeDesc::Array(Box::new(TypeDesc::Scalar(ScalarKind::Float)), 16),
    );
}

#[test]
fn commented_define_still_resolves_as_length() {
    let schema = ok(&with_header(
        "#define LIGHTS 4 // point lights\nuniform vec3 lights[LIGHTS];\n",
    ));
    assert_eq!(
        schema.get("lights"),
        Some(&TypeDesc::Array(Box::new(TypeDesc::Vector(ScalarKind::Float, 3)), 4)),
    );
}

#[test]
fn r001_unknown_length_symbol() {
    let errs = err(&with_header("uniform vec3 lights[LIGHTS];\n"));
    assert!(has(&errs, ErrorCode::R001));
}

#[test]
fn r002_non_integer_length_value() {
    let errs = err(&with_header("#define LIGHTS lots\nuniform vec3 lights[LIGHTS];\n"));
    assert!(has(&errs, ErrorCode::R002));
}

#[test]
fn last_define_occurrence_wins() {
    let schema = ok(&with_header("#define N 2\n#define N 8\nuniform float xs[N];\n"));
    assert_eq!(
        schema.get("xs"),
        Some(&TypeDesc::Array(Box::new(TypeDesc::Scalar(ScalarKind::Float)), 8)),
    );
}

// ─── cycles ──────────────────────────────────────────────────────────────────

#[test]
fn r004_self_referential_struct() {
    let errs = err(&with_header("struct Node { float v; Node next; };\nuniform Node n;\n"));
    assert!(has(&errs, ErrorCode::R004));
}

#[test]
fn r004_mutual_cycle_reported_once() {
    let errs = err(&with_header(
        "struct A { B b; };\nstruct B { A a; };\nuniform A a;\n",
    ));
    let cycles = errs.iter().filter(|e| e.code == ErrorCode::R004).count();
    assert_eq!(cycles, 1);
}

#[test]
fn diamond_reference_is_not_a_cycle() {
    ok(&with_header(
        "struct Leaf { float v; };\n\
         struct L { Leaf leaf; };\n\
         struct R { Leaf leaf; };\n\
         struct Root { L l; R r; };\n\
         uniform Root root;\n",
    ));
}

// ─── scan errors surface through parse ───────────────────────────────────────

#[test]
fn d001_unterminated_struct() {
    let errs = err(&with_header("struct Bad { vec2 a;\n"));
    assert!(has(&errs, ErrorCode::D001));
}

// ─── leaf expansion ──────────────────────────────────────────────────────────

#[test]
fn leaf_paths_for_nested_struct_array() {
    let schema = ok(&with_header(
        "struct Circle { vec2 center; float radius; };\n\
         struct Player { Circle circle; bool visible; };\n\
         uniform Player players[2];\n",
    ));
    let paths: Vec<String> = schema.leaf_paths().into_iter().map(|(p, _)| p).collect();
    assert_eq!(paths, vec![
        "players[0].circle.center",
        "players[0].circle.radius",
        "players[0].visible",
        "players[1].circle.center",
        "players[1].circle.radius",
        "players[1].visible",
    ]);
}

#[test]
fn primitive_array_is_one_leaf() {
    let schema = ok(&with_header("uniform float farray[5];\nuniform vec2 pts[3];\n"));
    let paths: Vec<String> = schema.leaf_paths().into_iter().map(|(p, _)| p).collect();
    assert_eq!(paths, vec!["farray", "pts"]);
}

#[test]
fn leaf_paths_are_unique() {
    let schema = ok(&with_header(
        "struct Circle { vec2 center; float radius; };\n\
         uniform Circle cs[3];\nuniform vec4 color;\nuniform sampler2D tex;\n",
    ));
    let paths: Vec<String> = schema.leaf_paths().into_iter().map(|(p, _)| p).collect();
    let mut deduped = paths.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(paths.len(), deduped.len());
}

// ─── whole-header smoke test ─────────────────────────────────────────────────

#[test]
fn full_fragment_header() {
    let schema = ok(
        "#ifdef GL_ES\n\
         precision mediump float;\n\
         #endif\n\
         const vec4 red = vec4(1.0,0.0,0.0,1.0);\n\
         uniform vec2 resolution;\n\
         uniform bool b1;\n\
         uniform highp int i2;\n\
         uniform lowp float f1;\n\
         uniform ivec2 iv2;\n\
         uniform bool barray4[4];\n\
         uniform vec2 v2arr5[5];\n\
         struct Circle { vec2 center; highp float radius; };\n\
         struct Player {Circle circle;bool visible;} ;\n\
         uniform Circle c2array[2];\n\
         uniform Player p1;\n\
         uniform sampler2D yellow16x16;\n\
         void main (void) {}\n",
    );
    assert_eq!(schema.uniforms.len(), 9);
    assert_eq!(
        schema.get("barray4"),
        Some(&TypeDesc::Array(Box::new(TypeDesc::Scalar(ScalarKind::Bool)), 4)),
    );
    assert_eq!(
        schema.get("c2array"),
        Some(&TypeDesc::Array(Box::new(TypeDesc::Struct("Circle".into())), 2)),
    );
    assert_eq!(schema.get("yellow16x16"), Some(&TypeDesc::Sampler2D));
}
