pub mod descriptor;
pub mod registry;

pub use descriptor::{ScalarKind, TypeDesc};
pub use registry::{Field, Schema, StructDef, StructTable};

use std::collections::HashSet;

use crate::error::{Error, ErrorCode};
use crate::scan::{DefineTable, LenToken, RawDecl, ScanOutput};

/// The one uniform the engine drives itself (from the canvas size).
pub const RESOLUTION: &str = "resolution";

// ─── Entry point ─────────────────────────────────────────────────────────────

/// Resolve raw scanner output into a typed schema:
/// 1. collect struct definitions (array lengths resolved through defines)
/// 2. resolve top-level uniforms the same way
/// 3. validate — cyclic structs, required `vec2 resolution`
///
/// `resolution` is checked, then removed: it is driven by the viewport,
/// not by user variables.
pub fn resolve(scan: ScanOutput) -> Result<Schema, Vec<Error>> {
    let mut errors: Vec<Error> = Vec::new();

    let struct_names: HashSet<String> =
        scan.structs.iter().map(|s| s.name.clone()).collect();

    // ── Pass 1: struct definitions ────────────────────────────────────────────
    let mut structs = StructTable::default();
    for raw in &scan.structs {
        let mut fields = Vec::new();
        for field in &raw.fields {
            match resolve_decl(field, &struct_names, &scan.defines) {
                Ok(ty) => fields.push(Field { name: field.name.clone(), ty }),
                Err(e) => errors.push(e),
            }
        }
        structs.insert(StructDef { name: raw.name.clone(), fields });
    }

    // ── Pass 2: uniforms ──────────────────────────────────────────────────────
    let mut uniforms: Vec<(String, TypeDesc)> = Vec::new();
    for raw in &scan.uniforms {
        match resolve_decl(raw, &struct_names, &scan.defines) {
            Ok(ty) => {
                // one declaration per name; re-scan of the same line wins last
                uniforms.retain(|(n, _)| n != &raw.name);
                uniforms.push((raw.name.clone(), ty));
            }
            Err(e) => errors.push(e),
        }
    }

    // ── Pass 3: validation ────────────────────────────────────────────────────
    errors.extend(check_cycles(&structs));

    match uniforms.iter().position(|(n, _)| n == RESOLUTION) {
        Some(i) => {
            let (_, ty) = uniforms.remove(i);
            if ty != TypeDesc::Vector(ScalarKind::Float, 2) {
                errors.push(Error::new(ErrorCode::R005, 0,
                    format!("`{RESOLUTION}` must be declared `vec2`, found `{ty}`")));
            }
        }
        None => errors.push(Error::new(ErrorCode::R003, 0,
            format!("you must declare `uniform vec2 {RESOLUTION};` in your shader"))),
    }

    if errors.is_empty() {
        Ok(Schema { uniforms, structs })
    } else {
        Err(errors)
    }
}

// ─── Declaration resolution ──────────────────────────────────────────────────

fn resolve_decl(
    raw: &RawDecl,
    struct_names: &HashSet<String>,
    defines: &DefineTable,
) -> Result<TypeDesc, Error> {
    let base = TypeDesc::primitive(&raw.type_name).unwrap_or_else(|| {
        if struct_names.contains(&raw.type_name) {
            TypeDesc::Struct(raw.type_name.clone())
        } else {
            // deferred: binding a value to it is a runtime error
            TypeDesc::Opaque(raw.type_name.clone())
        }
    });

    match &raw.array_len {
        None => Ok(base),
        Some(token) => {
            let len = resolve_len(token, defines, &raw.name, raw.line)?;
            Ok(TypeDesc::Array(Box::new(base), len))
        }
    }
}

fn resolve_len(
    token: &LenToken,
    defines: &DefineTable,
    name: &str,
    line: usize,
) -> Result<usize, Error> {
    match token {
        LenToken::Literal(n) => Ok(*n),
        LenToken::Symbol(sym) => {
            let value = defines.get(sym).ok_or_else(|| {
                Error::new(ErrorCode::R001, line,
                    format!("array length `{sym}` of `{name}` is not a #define"))
            })?;
            value.trim().parse::<usize>().map_err(|_| {
                Error::new(ErrorCode::R002, line,
                    format!("array length `{sym}` of `{name}` is `{value}`, not an integer"))
            })
        }
    }
}

// ─── Cycle detection ─────────────────────────────────────────────────────────

/// DFS over struct references. A cyclic definition would make the upload
/// walk recurse forever, so it fails the schema build — one error per cycle.
fn check_cycles(structs: &StructTable) -> Vec<Error> {
    let mut errors = Vec::new();
    let mut done: HashSet<String> = HashSet::new();

    for def in structs.iter() {
        if done.contains(&def.name) {
            continue;
        }
        let mut stack: Vec<String> = Vec::new();
        visit(structs, &def.name, &mut stack, &mut done, &mut errors);
    }
    errors
}

fn visit(
    structs: &StructTable,
    name: &str,
    stack: &mut Vec<String>,
    done: &mut HashSet<String>,
    errors: &mut Vec<Error>,
) {
    if let Some(at) = stack.iter().position(|n| n == name) {
        let cycle = stack[at..].join(" -> ");
        errors.push(Error::new(ErrorCode::R004, 0,
            format!("cyclic struct definition: {cycle} -> {name}")));
        return;
    }
    if done.contains(name) {
        return;
    }
    stack.push(name.to_string());
    if let Some(def) = structs.get(name) {
        for field in &def.fields {
            if let Some(referenced) = field.ty.struct_name() {
                visit(structs, referenced, stack, done, errors);
            }
        }
    }
    stack.pop();
    done.insert(name.to_string());
}
