//! Toolchain stages.

mod compile;
mod resources;
mod schemas;
mod translate;

pub use compile::CompilePhase;
pub use resources::{RESOURCE_PREFIX, ResourcesPhase, render_manifest};
pub use schemas::SchemasPhase;
pub use translate::TranslatePhase;
