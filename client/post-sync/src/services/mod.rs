/// Business logic layer
pub mod sync;

pub use sync::{PostSyncStore, PublishStage};
