//! Binding Location Table: leaf Binding Path → compiled-program location.

use std::collections::HashMap;

use glow::HasContext;
use glslbind_lang::Schema;

/// Built once per compiled program from the schema's leaf expansion and
/// discarded wholesale on recompilation. Paths the driver optimized out
/// simply have no entry; uploads to them become no-ops.
#[derive(Debug, Default)]
pub struct LocationTable {
    map: HashMap<String, glow::NativeUniformLocation>,
}

impl LocationTable {
    pub fn build(gl: &glow::Context, program: glow::NativeProgram, schema: &Schema) -> Self {
        let mut map = HashMap::new();
        schema.for_each_leaf(&mut |path, _| {
            let loc = unsafe { gl.get_uniform_location(program, path) };
            if let Some(loc) = loc {
                map.insert(path.to_string(), loc);
            }
        });
        Self { map }
    }

    pub fn get(&self, path: &str) -> Option<&glow::NativeUniformLocation> {
        self.map.get(path)
    }
}
