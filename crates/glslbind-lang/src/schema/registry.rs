//! Resolved schema — the typed view of everything the scanner extracted.

use crate::schema::descriptor::TypeDesc;

// ─── Struct table ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: TypeDesc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDef {
    pub name: String,
    /// Declaration order — preserved for diagnostics and leaf expansion.
    pub fields: Vec<Field>,
}

impl StructDef {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructTable {
    defs: Vec<StructDef>,
}

impl StructTable {
    pub fn insert(&mut self, def: StructDef) {
        // redeclaration keeps the first definition, matching uniform scan order
        if self.get(&def.name).is_none() {
            self.defs.push(def);
        }
    }

    pub fn get(&self, name: &str) -> Option<&StructDef> {
        self.defs.iter().find(|d| d.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StructDef> {
        self.defs.iter()
    }
}

// ─── Schema ──────────────────────────────────────────────────────────────────

/// Uniform schema: every top-level uniform except the reserved `resolution`
/// entry, in declaration order, plus the struct table they reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub uniforms: Vec<(String, TypeDesc)>,
    pub structs: StructTable,
}

impl Schema {
    pub fn get(&self, name: &str) -> Option<&TypeDesc> {
        self.uniforms.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.uniforms.iter().map(|(n, _)| n.as_str())
    }

    /// Visit every leaf Binding Path in declaration order, depth-first.
    ///
    /// Expansion rules:
    ///   • struct            → one path per field (`base.field`)
    ///   • array of struct   → per index per field (`base[i].field`)
    ///   • array of anything else → ONE leaf at the base path (the whole
    ///     array is uploaded with a single `*v` call at `base[0]`'s location)
    ///   • scalar / vector / matrix / sampler / opaque → leaf
    pub fn for_each_leaf(&self, f: &mut impl FnMut(&str, &TypeDesc)) {
        for (name, desc) in &self.uniforms {
            self.rec_leaf(name, desc, f);
        }
    }

    fn rec_leaf(&self, path: &str, desc: &TypeDesc, f: &mut impl FnMut(&str, &TypeDesc)) {
        match desc {
            TypeDesc::Struct(sname) => {
                if let Some(def) = self.structs.get(sname) {
                    for field in &def.fields {
                        self.rec_leaf(&format!("{path}.{}", field.name), &field.ty, f);
                    }
                }
            }
            TypeDesc::Array(inner, len) => {
                if let TypeDesc::Struct(sname) = inner.as_ref() {
                    if let Some(def) = self.structs.get(sname) {
                        for i in 0..*len {
                            for field in &def.fields {
                                self.rec_leaf(&format!("{path}[{i}].{}", field.name), &field.ty, f);
                            }
                        }
                    }
                } else {
                    f(path, desc);
                }
            }
            _ => f(path, desc),
        }
    }

    /// Owned snapshot of the leaf expansion. Handy for location binding
    /// and assertions; prefer `for_each_leaf` on hot paths.
    pub fn leaf_paths(&self) -> Vec<(String, TypeDesc)> {
        let mut leaves = Vec::new();
        self.for_each_leaf(&mut |path, desc| leaves.push((path.to_string(), desc.clone())));
        leaves
    }
}
