pub mod limits;
pub mod manifest;
pub mod registry;

pub use limits::VanillaLimits;
pub use manifest::{RegistryManifest, StaticRegistry, BUILTIN_PACK, PLACEHOLDER_NAME};
pub use registry::{ContentRef, ContentRegistry, EquipCategory};
