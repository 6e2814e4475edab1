use std::sync::{Arc, Mutex};
use std::time::Instant;

use eframe::egui::{self, Color32, RichText};
use eframe::egui_glow;
use glslbind_lang::{Value, Variables};
use glslbind_renderer::Glsl;

const FRAGMENT: &str = r#"#define BALLS 3

struct Ball {
  vec2 center;
  float radius;
  vec3 color;
};

uniform vec2 resolution;
uniform float time;
uniform Ball balls[BALLS];
uniform sampler2D grain;

varying vec2 texCoord;

void main () {
  vec2 p = texCoord * resolution;
  vec3 color = vec3(0.04, 0.05, 0.09);
  for (int i = 0; i < BALLS; ++i) {
    float d = distance(p, balls[i].center);
    float r = balls[i].radius;
    float glow = 1.0 - smoothstep(r * 0.2, r, d);
    color += balls[i].color * glow * (0.8 + 0.2 * sin(time + float(i)));
  }
  color += (texture2D(grain, texCoord).r - 0.5) * 0.06;
  gl_FragColor = vec4(color, 1.0);
}
"#;

fn main() -> Result<(), eframe::Error> {
    env_logger::init();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([900.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "glslbind demo",
        options,
        Box::new(|cc| Ok(Box::new(App::new(cc)?))),
    )
}

// ─── App state ────────────────────────────────────────────────────────────────

/// Everything the paint callback touches. GL work only happens inside the
/// callback, where the context is guaranteed current.
struct Shared {
    engine: Glsl,
    pending: Option<String>,
    status: Option<String>,
    size: (i32, i32),
}

struct App {
    shared: Arc<Mutex<Shared>>,
    source: String,
    start: Instant,
}

impl App {
    fn new(
        cc: &eframe::CreationContext<'_>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let gl = cc.gl.clone().ok_or("this demo needs the glow backend")?;

        let variables = Variables::from_iter([
            ("time", Value::Float(0.0)),
            ("balls", balls_at(0.0, 900.0, 600.0)),
            ("grain", grain_texture()),
        ]);
        let engine = Glsl::new(gl, FRAGMENT, variables)?;

        Ok(Self {
            shared: Arc::new(Mutex::new(Shared {
                engine,
                pending: None,
                status: None,
                size: (0, 0),
            })),
            source: FRAGMENT.to_string(),
            start: Instant::now(),
        })
    }
}

impl Shared {
    fn frame(&mut self, t: f32, width: i32, height: i32) {
        if let Some(src) = self.pending.take() {
            self.status = self.engine.reload(&src).err().map(|e| e.to_string());
        }
        if (width, height) != self.size {
            self.size = (width, height);
            self.engine.set_resolution(width, height);
        }
        self.engine.set("time", t);
        self.engine.set("balls", balls_at(t, width as f32, height as f32));
        self.engine.sync(&["time", "balls"]);
        self.engine.render();
    }
}

// ─── Demo variables ───────────────────────────────────────────────────────────

fn balls_at(t: f32, width: f32, height: f32) -> Value {
    let colors = [(0.9, 0.3, 0.2), (0.2, 0.7, 0.9), (0.9, 0.8, 0.3)];
    let radius = width.min(height) * 0.35;
    Value::list(colors.iter().enumerate().map(|(i, &(r, g, b))| {
        let phase = t * 0.6 + i as f32 * std::f32::consts::TAU / 3.0;
        Value::record([
            (
                "center",
                Value::record([
                    ("x", (width * 0.5 + phase.cos() * width * 0.25).into()),
                    ("y", (height * 0.5 + phase.sin() * height * 0.25).into()),
                ]),
            ),
            ("radius", radius.into()),
            (
                "color",
                Value::record([("r", r.into()), ("g", g.into()), ("b", b.into())]),
            ),
        ])
    }))
}

/// 64×64 monochrome xorshift noise.
fn grain_texture() -> Value {
    let (w, h) = (64, 64);
    let mut pixels = Vec::with_capacity((w * h * 4) as usize);
    let mut state: u32 = 0x9e37_79b9;
    for _ in 0..w * h {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let v = (state & 0xff) as u8;
        pixels.extend_from_slice(&[v, v, v, 255]);
    }
    Value::image(w, h, pixels)
}

// ─── UI ───────────────────────────────────────────────────────────────────────

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::Window::new("fragment shader")
            .default_width(440.0)
            .show(ctx, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut self.source)
                        .font(egui::TextStyle::Monospace)
                        .desired_width(f32::INFINITY)
                        .desired_rows(24),
                );
                if ui.button("reload").clicked() {
                    self.shared.lock().unwrap().pending = Some(self.source.clone());
                }
                if let Some(err) = &self.shared.lock().unwrap().status {
                    ui.label(RichText::new(err).monospace().color(Color32::from_rgb(220, 80, 80)));
                } else {
                    ui.label(RichText::new("✓  compiled").color(Color32::from_rgb(80, 200, 80)));
                }
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let (rect, _) =
                    ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());
                let shared = self.shared.clone();
                let t = self.start.elapsed().as_secs_f32();
                ui.painter().add(egui::PaintCallback {
                    rect,
                    callback: Arc::new(egui_glow::CallbackFn::new(move |info, _painter| {
                        let vp = info.viewport_in_pixels();
                        shared.lock().unwrap().frame(t, vp.width_px, vp.height_px);
                    })),
                });
            });

        ctx.request_repaint();
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.shared.lock().unwrap().engine.destroy();
    }
}
