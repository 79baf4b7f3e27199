// disable console on windows for release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use bevy::DefaultPlugins;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::window::{PresentMode, PrimaryWindow, WindowResolution};
use bevy::winit::WinitWindows;
use globecore::GlobeConfig;
use globecore::config::DEFAULT_CONFIG_PATH;
use pollution_globe::{CANVAS_SELECTOR, GlobePlugin};
use winit::window::Icon;

const WRITE_CONFIG_FLAG: &str = "--write-default-config";
const ICON_SIZE: u32 = 64;

/// How the config was obtained; reported once logging is up.
enum ConfigOutcome {
    Loaded,
    Missing,
    Invalid(String),
    Builtin,
}

fn main() {
    if std::env::args().any(|arg| arg == WRITE_CONFIG_FLAG) {
        match GlobeConfig::default().save_to_file(DEFAULT_CONFIG_PATH) {
            Ok(()) => println!("Wrote {}", DEFAULT_CONFIG_PATH),
            Err(err) => eprintln!("Could not write {}: {}", DEFAULT_CONFIG_PATH, err),
        }
        return;
    }

    let (config, outcome) = load_config();
    let log_plugin = LogPlugin {
        level: config.logging.level.parse().unwrap_or(bevy::log::Level::INFO),
        filter: config.logging.filter.clone(),
        ..default()
    };

    App::new()
        .insert_resource(ClearColor(Color::BLACK))
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Pollution Globe".into(),
                        resolution: WindowResolution::new(1280, 800),
                        present_mode: PresentMode::AutoVsync,
                        canvas: Some(CANVAS_SELECTOR.into()),
                        fit_canvas_to_parent: true,
                        prevent_default_event_handling: true,
                        ..default()
                    }),
                    close_when_requested: false,
                    ..default()
                })
                .set(log_plugin),
        )
        .add_plugins(GlobePlugin { config })
        .add_systems(Startup, (move || report_config(&outcome), set_window_icon))
        .run();
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config() -> (GlobeConfig, ConfigOutcome) {
    use globecore::ConfigError;

    match GlobeConfig::load_from_file(DEFAULT_CONFIG_PATH) {
        Ok(config) => (config, ConfigOutcome::Loaded),
        Err(ConfigError::Read(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            (GlobeConfig::default(), ConfigOutcome::Missing)
        }
        Err(err) => (GlobeConfig::default(), ConfigOutcome::Invalid(err.to_string())),
    }
}

#[cfg(target_arch = "wasm32")]
fn load_config() -> (GlobeConfig, ConfigOutcome) {
    (GlobeConfig::default(), ConfigOutcome::Builtin)
}

fn report_config(outcome: &ConfigOutcome) {
    match outcome {
        ConfigOutcome::Loaded => info!("Config loaded from {}", DEFAULT_CONFIG_PATH),
        ConfigOutcome::Missing => info!("No {} found, using defaults", DEFAULT_CONFIG_PATH),
        ConfigOutcome::Invalid(err) => error!("{}; using defaults", err),
        ConfigOutcome::Builtin => info!("Using built-in config"),
    }
}

/// Small blue planet with a dark rim, drawn at startup.
fn globe_icon() -> image::RgbaImage {
    let center = (ICON_SIZE as f32 - 1.0) / 2.0;
    let radius = ICON_SIZE as f32 / 2.0 - 2.0;
    image::RgbaImage::from_fn(ICON_SIZE, ICON_SIZE, |x, y| {
        let dx = x as f32 - center;
        let dy = y as f32 - center;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance > radius {
            return image::Rgba([0, 0, 0, 0]);
        }
        // Lit from the upper left
        let shade = 1.0 - ((dx + dy) / (2.0 * radius) + 0.5).clamp(0.0, 1.0) * 0.6;
        let rim = if distance > radius - 3.0 { 0.6 } else { 1.0 };
        let channel = |base: f32| (base * shade * rim * 255.0) as u8;
        image::Rgba([channel(0.25), channel(0.55), channel(0.95), 255])
    })
}

fn set_window_icon(windows: Option<NonSend<WinitWindows>>, primary_window: Query<Entity, With<PrimaryWindow>>) {
    let Some(windows) = windows else {
        return;
    };
    let Ok(primary_entity) = primary_window.single() else {
        return;
    };
    let Some(primary) = windows.get_window(primary_entity) else {
        return;
    };
    let image = globe_icon();
    let (width, height) = image.dimensions();
    match Icon::from_rgba(image.into_raw(), width, height) {
        Ok(icon) => primary.set_window_icon(Some(icon)),
        Err(err) => warn!("Window icon rejected: {}", err),
    }
}
