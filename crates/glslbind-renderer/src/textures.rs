//! Texture unit allocation and pixel upload for sampler uniforms.

use std::collections::HashMap;

use glow::HasContext;
use glslbind_lang::ImageData;

#[derive(Debug)]
struct TextureSlot {
    unit: u32,
    texture: Option<glow::NativeTexture>,
    size: (i32, i32),
}

/// Per-program sampler state: each sampler Binding Path gets a unit index
/// the first time it is seen, stable until the program is recompiled.
/// Units and texture objects are invalidated together on reload — unit
/// bindings are meaningless against a stale program.
#[derive(Debug, Default)]
pub struct TextureUnits {
    counter: u32,
    slots: HashMap<String, TextureSlot>,
}

impl TextureUnits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stable unit index for `path`; assigns the next free unit on first use.
    pub fn allocate(&mut self, path: &str) -> u32 {
        if let Some(slot) = self.slots.get(path) {
            return slot.unit;
        }
        let unit = self.counter;
        self.counter += 1;
        self.slots.insert(path.to_string(), TextureSlot { unit, texture: None, size: (0, 0) });
        unit
    }

    /// Every (unit, texture) pair that has pixels uploaded. Slots that were
    /// allocated but never uploaded to are skipped.
    fn bindings(&self) -> impl Iterator<Item = (u32, glow::NativeTexture)> + '_ {
        self.slots.values().filter_map(|s| s.texture.map(|t| (s.unit, t)))
    }

    /// Re-bind every uploaded texture to its unit. Unit bindings are global
    /// GL state; anything else drawing between frames (the egui mesh painter
    /// does) rebinds them, so this runs before every draw.
    pub fn rebind(&self, gl: &glow::Context) {
        for (unit, texture) in self.bindings() {
            unsafe {
                gl.active_texture(glow::TEXTURE0 + unit);
                gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            }
        }
    }

    /// Upload pixels for `path` and point `loc` at its unit.
    ///
    /// Re-uploads of unchanged dimensions go through `tex_sub_image_2d`,
    /// keeping the already-configured filtering and wrap state; a size
    /// change reallocates storage.
    pub fn upload(
        &mut self,
        gl: &glow::Context,
        path: &str,
        image: &ImageData,
        loc: Option<&glow::NativeUniformLocation>,
    ) {
        let unit = self.allocate(path);
        let slot = self.slots.get_mut(path).expect("slot exists after allocate");
        let size = (image.width, image.height);

        unsafe {
            gl.active_texture(glow::TEXTURE0 + unit);
            match slot.texture {
                Some(texture) if slot.size == size => {
                    gl.bind_texture(glow::TEXTURE_2D, Some(texture));
                    gl.tex_sub_image_2d(
                        glow::TEXTURE_2D,
                        0,
                        0,
                        0,
                        image.width,
                        image.height,
                        glow::RGBA,
                        glow::UNSIGNED_BYTE,
                        glow::PixelUnpackData::Slice(&image.pixels),
                    );
                }
                _ => {
                    if let Some(old) = slot.texture.take() {
                        gl.delete_texture(old);
                    }
                    let texture = match gl.create_texture() {
                        Ok(t) => t,
                        Err(e) => {
                            log::error!("create_texture failed for '{path}': {e}");
                            return;
                        }
                    };
                    gl.bind_texture(glow::TEXTURE_2D, Some(texture));
                    gl.tex_parameter_i32(
                        glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
                    gl.tex_parameter_i32(
                        glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
                    gl.tex_parameter_i32(
                        glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
                    gl.tex_parameter_i32(
                        glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
                    gl.tex_image_2d(
                        glow::TEXTURE_2D,
                        0,
                        glow::RGBA as i32,
                        image.width,
                        image.height,
                        0,
                        glow::RGBA,
                        glow::UNSIGNED_BYTE,
                        Some(&image.pixels),
                    );
                    slot.texture = Some(texture);
                    slot.size = size;
                }
            }
            gl.uniform_1_i32(loc, unit as i32);
        }
    }

    /// Drop GPU textures and forget all assignments. Required on program
    /// reload before any further upload.
    pub fn reset(&mut self, gl: &glow::Context) {
        for (_, slot) in self.slots.drain() {
            if let Some(texture) = slot.texture {
                unsafe { gl.delete_texture(texture) };
            }
        }
        self.counter = 0;
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
