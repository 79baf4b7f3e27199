use crate::core::state::SessionState;
use crate::planet::StartupError;
use crate::planet::resources::GlobeSettings;
use bevy::asset::{LoadState, RenderAssetUsages};
use bevy::image::ImageLoaderSettings;
use bevy::log::{info, warn};
use bevy::platform::collections::HashMap;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use globecore::{TextureBatch, TextureManifest, TextureRole};

pub struct LoadingPlugin;

impl Plugin for LoadingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            OnEnter(SessionState::Loading),
            start_texture_loads.pipe(crate::planet::lifecycle::report_startup_failure),
        )
        .add_systems(
            Update,
            track_texture_loads
                .run_if(in_state(SessionState::Loading))
                .run_if(resource_exists::<TextureLoads>),
        );
    }
}

/// Loads in flight; removed once every slot has resolved.
#[derive(Resource)]
pub struct TextureLoads(pub TextureBatch<Handle<Image>>);

/// Every texture role resolved to a handle, placeholders included.
#[derive(Resource, Debug, Clone)]
pub struct GlobeTextures {
    handles: HashMap<TextureRole, Handle<Image>>,
    placeholder: Handle<Image>,
}

impl GlobeTextures {
    pub fn get(&self, role: TextureRole) -> Handle<Image> {
        self.handles.get(&role).cloned().unwrap_or_else(|| self.placeholder.clone())
    }

    pub fn handles(&self) -> impl Iterator<Item = &Handle<Image>> {
        self.handles.values().chain(std::iter::once(&self.placeholder))
    }
}

/// 1x1 transparent texture standing in for anything that failed to load.
pub fn placeholder_image() -> Image {
    Image::new_fill(
        Extent3d {
            width: 1,
            height: 1,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        &[0, 0, 0, 0],
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    )
}

fn start_texture_loads(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    settings: Res<GlobeSettings>,
) -> Result<(), StartupError> {
    let manifest = TextureManifest::from_entries(&settings.assets.textures)?;

    // All loads start together; completion order does not matter
    let handles: Vec<Handle<Image>> = manifest
        .paths(&settings.assets.texture_root)
        .into_iter()
        .map(|path| {
            asset_server.load_with_settings(path, |loader: &mut ImageLoaderSettings| {
                loader.is_srgb = true;
            })
        })
        .collect();

    info!("Loading {} textures", handles.len());
    commands.insert_resource(TextureLoads(TextureBatch::new(&manifest, handles)));
    Ok(())
}

fn track_texture_loads(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut loads: ResMut<TextureLoads>,
    mut images: ResMut<Assets<Image>>,
) {
    // Read ECS state
    let states: Vec<(usize, Option<LoadState>)> = loads
        .0
        .pending()
        .map(|(index, handle)| (index, asset_server.get_load_state(handle.id())))
        .collect();

    for (index, state) in states {
        match state {
            Some(LoadState::Loaded) => loads.0.mark_loaded(index),
            Some(LoadState::Failed(err)) => {
                warn!("Texture load failed: {}", err);
                loads.0.mark_failed(index);
            }
            _ => {}
        }
    }

    if !loads.0.is_complete() {
        return;
    }

    let failed = loads.0.failed_count();
    let placeholder = images.add(placeholder_image());
    let handles = loads
        .0
        .clone()
        .finish(placeholder.clone())
        .into_iter()
        .map(|texture| (texture.role, texture.handle))
        .collect();

    info!("Textures resolved ({} placeholders)", failed);
    commands.remove_resource::<TextureLoads>();
    commands.insert_resource(GlobeTextures { handles, placeholder });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_transparent_srgb_pixel() {
        let image = placeholder_image();
        assert_eq!(image.width(), 1);
        assert_eq!(image.height(), 1);
        assert_eq!(image.texture_descriptor.format, TextureFormat::Rgba8UnormSrgb);
        assert_eq!(image.data.as_deref(), Some(&[0u8, 0, 0, 0][..]));
    }

    #[test]
    fn test_missing_role_falls_back_to_placeholder() {
        let placeholder = Handle::<Image>::default();
        let textures = GlobeTextures {
            handles: HashMap::default(),
            placeholder: placeholder.clone(),
        };
        assert_eq!(textures.get(TextureRole::MoonNormal), placeholder);
    }
}
