mod change;
mod error;
mod reset;
mod viewer_store;


pub use change::{ChannelSettingChange, ViewerSettingChange, ViewerSettingKey};
pub use error::{Result, StoreError};
pub use reset::{
    LoadGeneration, ResetCoordinator, ResetKind, ResetOutcome, ResetTarget, needs_reload,
};
pub use viewer_store::{StoreEvent, SubscriptionId, ViewerStore};
