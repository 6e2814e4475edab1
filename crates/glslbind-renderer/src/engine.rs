//! The top-level engine facade: owns the GL context handle, the fragment
//! schema, the host variables, and the current program.

use std::sync::Arc;

use glslbind_lang::{
    BindReport, Schema, Severity, Value, Variables, parse, sync_all, sync_variable,
};

use crate::error::RenderError;
use crate::program::{Program, VERTEX_SHADER};

/// One fragment shader wired to a set of host variables.
///
/// Construction compiles the program and performs a full initial sync.
/// After that, call [`Glsl::set`] and [`Glsl::sync`] as values change, and
/// [`Glsl::render`] once per frame.
pub struct Glsl {
    gl: Arc<glow::Context>,
    schema: Schema,
    variables: Variables,
    program: Program,
    width: i32,
    height: i32,
}

impl Glsl {
    pub fn new(
        gl: Arc<glow::Context>,
        fragment_src: &str,
        variables: Variables,
    ) -> Result<Self, RenderError> {
        let schema = parse(fragment_src).map_err(RenderError::Schema)?;
        for name in schema.names() {
            if !variables.contains(name) {
                log::warn!("uniform '{name}' has no initial value");
            }
        }
        let program = Program::load(&gl, VERTEX_SHADER, fragment_src, &schema)?;
        let mut engine = Self {
            gl,
            schema,
            variables,
            program,
            width: 0,
            height: 0,
        };
        engine.sync_all();
        Ok(engine)
    }

    /// Replace the fragment shader, keeping the current variables. The old
    /// program survives if the new one fails to build.
    pub fn reload(&mut self, fragment_src: &str) -> Result<(), RenderError> {
        let schema = parse(fragment_src).map_err(RenderError::Schema)?;
        let program = Program::load(&self.gl, VERTEX_SHADER, fragment_src, &schema)?;
        self.program.destroy(&self.gl);
        self.program = program;
        self.schema = schema;
        if self.width > 0 && self.height > 0 {
            self.program.set_resolution(&self.gl, self.width, self.height);
        }
        self.sync_all();
        Ok(())
    }

    /// Store a host value. Takes effect on the next [`Glsl::sync`] of that
    /// variable.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.variables.set(name, value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Re-upload the named uniforms from the current host values.
    pub fn sync(&mut self, names: &[&str]) {
        let mut report = BindReport::default();
        for name in names {
            report.merge(sync_variable(name, &self.variables, &self.schema));
        }
        self.apply(report);
    }

    /// Re-upload every declared uniform.
    pub fn sync_all(&mut self) {
        let report = sync_all(&self.variables, &self.schema);
        self.apply(report);
    }

    pub fn set_resolution(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
        self.program.set_resolution(&self.gl, width, height);
    }

    pub fn render(&self) {
        self.program.draw(&self.gl);
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn destroy(&mut self) {
        self.program.destroy(&self.gl);
    }

    fn apply(&mut self, report: BindReport) {
        for issue in &report.issues {
            match issue.severity {
                Severity::Warning => log::warn!("{}", issue.message),
                Severity::Error => log::error!("{}", issue.message),
            }
        }
        self.program.bind(&self.gl);
        for write in &report.writes {
            self.program.apply(&self.gl, write);
        }
    }
}
