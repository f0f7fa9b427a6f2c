//! Hand material description.
//!
//! Backends turn a [`HandMaterialDesc`] into whatever material/texture
//! objects they use. The default hand skin is a translucent white whose
//! alpha ramps up along the finger, so fingertips read solid while the
//! knuckles fade out.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transparency {
    Opaque,
    Blend,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandMaterialDesc {
    pub transparency: Transparency,
    /// Render queue offset relative to the backend's default queue.
    pub queue_offset: i32,
    /// Square texture edge in texels.
    pub texture_size: u32,
    /// Row-major RGBA8, `texture_size * texture_size` entries, row 0 at v = 0.
    pub texels: Vec<[u8; 4]>,
    /// Clamp addressing instead of wrap.
    pub clamp: bool,
}

/// Alpha keys of the default gradient: (v, alpha).
const ALPHA_KEYS: [(f32, f32); 3] = [(0.0, 0.0), (0.2, 0.0), (0.9, 1.0)];

const DEFAULT_TEXTURE_SIZE: u32 = 16;

impl HandMaterialDesc {
    /// Blend transparency, queue offset -10, 16x16 clamped gradient.
    pub fn default_hand() -> Self {
        let size = DEFAULT_TEXTURE_SIZE;
        let mut texels = Vec::with_capacity((size * size) as usize);
        for y in 0..size {
            let v = y as f32 / (size - 1) as f32;
            let alpha = (gradient_alpha(v) * 255.0).round() as u8;
            for _ in 0..size {
                texels.push([255, 255, 255, alpha]);
            }
        }
        Self {
            transparency: Transparency::Blend,
            queue_offset: -10,
            texture_size: size,
            texels,
            clamp: true,
        }
    }

    /// Texel at column `x`, row `y`.
    pub fn texel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.texture_size || y >= self.texture_size {
            return None;
        }
        self.texels
            .get((y * self.texture_size + x) as usize)
            .copied()
    }
}

/// Piecewise-linear alpha at `v`, clamped to the first/last key.
pub fn gradient_alpha(v: f32) -> f32 {
    let (first_v, first_a) = ALPHA_KEYS[0];
    if v <= first_v {
        return first_a;
    }
    for pair in ALPHA_KEYS.windows(2) {
        let (v0, a0) = pair[0];
        let (v1, a1) = pair[1];
        if v <= v1 {
            let t = if v1 > v0 { (v - v0) / (v1 - v0) } else { 1.0 };
            return a0 + (a1 - a0) * t;
        }
    }
    ALPHA_KEYS[ALPHA_KEYS.len() - 1].1
}
