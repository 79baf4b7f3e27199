use bevy::prelude::*;
use bevy::render::render_resource::{AsBindGroup, ShaderType};
use bevy::shader::ShaderRef;

#[derive(ShaderType, Debug, Clone, Copy, PartialEq)]
pub struct EarthUniforms {
    /// Sun direction in Earth's local frame
    pub sun_direction: Vec3,
    pub pollution_level: f32,
    pub pollution_tint: Vec3,
}

#[derive(ShaderType, Debug, Clone, Copy, PartialEq)]
pub struct AtmosphereUniforms {
    pub sun_direction: Vec3,
    pub pollution_level: f32,
    pub pollution_color: Vec3,
    pub rim_power: f32,
}

#[derive(ShaderType, Debug, Clone, Copy, PartialEq)]
pub struct MoonUniforms {
    pub sun_direction: Vec3,
    pub night_brightness: f32,
}

#[derive(ShaderType, Debug, Clone, Copy, PartialEq)]
pub struct StarfieldUniforms {
    /// Wall-clock seconds
    pub time: f32,
    pub base_intensity: f32,
    pub twinkle_depth: f32,
    // WebGL2 wants uniform blocks padded to 16 bytes
    pub _padding: f32,
}

/// Day/night Earth with clouds, tinted by pollution.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct EarthMaterial {
    #[uniform(0)]
    pub uniforms: EarthUniforms,
    #[texture(1)]
    #[sampler(2)]
    pub day: Handle<Image>,
    #[texture(3)]
    #[sampler(4)]
    pub night: Handle<Image>,
    #[texture(5)]
    #[sampler(6)]
    pub normal: Handle<Image>,
    #[texture(7)]
    #[sampler(8)]
    pub specular: Handle<Image>,
    #[texture(9)]
    #[sampler(10)]
    pub clouds: Handle<Image>,
}

impl Material for EarthMaterial {
    fn fragment_shader() -> ShaderRef {
        "shaders/earth.wgsl".into()
    }
}

/// Rim-lit shell drawn from the inside with additive blending.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct AtmosphereMaterial {
    #[uniform(0)]
    pub uniforms: AtmosphereUniforms,
}

impl Material for AtmosphereMaterial {
    fn fragment_shader() -> ShaderRef {
        "shaders/atmosphere.wgsl".into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Add
    }
}

#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct MoonMaterial {
    #[uniform(0)]
    pub uniforms: MoonUniforms,
    #[texture(1)]
    #[sampler(2)]
    pub color: Handle<Image>,
    #[texture(3)]
    #[sampler(4)]
    pub normal: Handle<Image>,
}

impl Material for MoonMaterial {
    fn fragment_shader() -> ShaderRef {
        "shaders/moon.wgsl".into()
    }
}

/// Point stars; per-star blink parameters travel in the vertex color.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct StarfieldMaterial {
    #[uniform(0)]
    pub uniforms: StarfieldUniforms,
}

impl Default for StarfieldMaterial {
    fn default() -> Self {
        Self {
            uniforms: StarfieldUniforms {
                time: 0.0,
                base_intensity: 0.7,
                twinkle_depth: 0.3,
                _padding: 0.0,
            },
        }
    }
}

impl Material for StarfieldMaterial {
    fn fragment_shader() -> ShaderRef {
        "shaders/starfield.wgsl".into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Add
    }
}
