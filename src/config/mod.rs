mod snapshot;

pub use snapshot::{RenderConfig, RenderSnapshot};
