pub mod appearance;
pub mod config;
pub mod constants;
pub mod destruction;
pub mod lifecycle;
pub mod orbit;
pub mod simulation;
pub mod source;
pub mod starfield;
pub mod textures;
pub mod tier;
pub mod viewport;

pub use appearance::{Appearance, AppearanceMode, AppearanceRules};
pub use config::{ConfigError, GlobeConfig};
pub use lifecycle::{LifecycleError, SessionLifecycle};
pub use simulation::{FrameReport, GlobeSimulation, SimulationEvent, SurfaceUniforms};
pub use source::{FilePollutionStore, MemoryPollutionSource, PollutionSource, StorageError};
pub use textures::{ColorSpace, ManifestError, ResolvedTexture, TextureBatch, TextureManifest, TextureRole};
pub use tier::{PollutionLevel, PollutionTier, select_tier};
