use std::collections::BTreeMap;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::model::{
    ChannelState, ViewMode, ViewerChannelSetting, ViewerState, default_channel_settings,
};

use super::ViewerStore;

/// Tags a volume load. Channel-loaded signals carrying a generation older
/// than a pending reset belong to a load that started before the reset and
/// are ignored for it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct LoadGeneration(pub u64);

/// State a reset returns to. Channel settings are resolved against the
/// channel names present at reset time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetTarget {
    pub viewer: ViewerState,
    pub channel_settings: Vec<ViewerChannelSetting>,
}

impl ResetTarget {
    pub fn new(viewer: ViewerState, channel_settings: Vec<ViewerChannelSetting>) -> Self {
        Self {
            viewer,
            channel_settings,
        }
    }

    /// Built-in state: default viewer settings with the leading channels
    /// shown.
    pub fn application_default() -> Self {
        Self::new(ViewerState::default(), default_channel_settings())
    }

    pub fn channel_states(&self, names: &[String]) -> Vec<ChannelState> {
        names
            .iter()
            .enumerate()
            .map(|(index, name)| ChannelState::initial(name, index, &self.channel_settings))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetKind {
    /// The state the viewer was first configured with.
    Saved,
    /// Built-in application defaults.
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetOutcome {
    pub reload_required: bool,
    /// Generation the caller must tag the reload with; `None` when no reload
    /// is needed.
    pub generation: Option<LoadGeneration>,
    /// Channels whose settings wait for their data.
    pub pending_channels: Vec<usize>,
}

/// True when moving from `current` to `target` changes which data is loaded:
/// entering or leaving the single-slice XY mode, another timestep, or another
/// z-slice while in XY.
pub fn needs_reload(current: &ViewerState, target: &ViewerState) -> bool {
    let view_mode_changed = current.view_mode != target.view_mode
        && (current.view_mode == ViewMode::XY || target.view_mode == ViewMode::XY);
    let time_changed = current.time != target.time;
    let slice_changed = target.view_mode == ViewMode::XY && current.slice.z != target.slice.z;
    view_mode_changed || time_changed || slice_changed
}

#[derive(Debug, Clone, PartialEq)]
struct PendingChannel {
    generation: LoadGeneration,
    state: ChannelState,
}

/// Resets the store to the saved or default state, deferring channel
/// settings until their data has reloaded when the reset changes what is
/// loaded.
#[derive(Debug, Clone)]
pub struct ResetCoordinator {
    saved: ResetTarget,
    default: ResetTarget,
    pending: BTreeMap<usize, PendingChannel>,
    generation: LoadGeneration,
}

impl Default for ResetCoordinator {
    fn default() -> Self {
        Self::new(ResetTarget::application_default())
    }
}

impl ResetCoordinator {
    pub fn new(saved: ResetTarget) -> Self {
        Self {
            saved,
            default: ResetTarget::application_default(),
            pending: BTreeMap::new(),
            generation: LoadGeneration::default(),
        }
    }

    pub fn saved(&self) -> &ResetTarget {
        &self.saved
    }

    pub fn set_saved(&mut self, saved: ResetTarget) {
        self.saved = saved;
    }

    pub fn target(&self, kind: ResetKind) -> &ResetTarget {
        match kind {
            ResetKind::Saved => &self.saved,
            ResetKind::Default => &self.default,
        }
    }

    pub fn current_generation(&self) -> LoadGeneration {
        self.generation
    }

    /// Starts a new load generation. Every volume load should be tagged with
    /// one so that late signals from superseded loads can be told apart.
    pub fn begin_load(&mut self) -> LoadGeneration {
        self.generation = LoadGeneration(self.generation.0 + 1);
        self.generation
    }

    pub fn pending_channels(&self) -> Vec<usize> {
        self.pending.keys().copied().collect()
    }

    pub fn is_pending(&self, index: usize) -> bool {
        self.pending.contains_key(&index)
    }

    pub fn reset(&mut self, store: &mut ViewerStore, kind: ResetKind) -> ResetOutcome {
        let target = self.target(kind).clone();
        let channel_states = target.channel_states(&store.channel_names());
        let reload_required = needs_reload(store.viewer(), &target.viewer);
        store.replace_viewer_state(target.viewer);

        if !reload_required {
            self.pending.clear();
            store.set_channel_states(channel_states);
            return ResetOutcome {
                reload_required,
                generation: None,
                pending_channels: Vec::new(),
            };
        }

        let generation = self.begin_load();
        info!(
            "{kind:?} reset needs a reload; deferring {} channels until generation {} loads",
            channel_states.len(),
            generation.0
        );
        self.pending = channel_states
            .into_iter()
            .enumerate()
            .map(|(index, state)| (index, PendingChannel { generation, state }))
            .collect();
        ResetOutcome {
            reload_required,
            generation: Some(generation),
            pending_channels: self.pending_channels(),
        }
    }

    /// Applies the pending settings of channel `index` once data from
    /// `generation` (or a later load) has arrived. Returns whether anything
    /// was applied.
    pub fn on_channel_loaded(
        &mut self,
        store: &mut ViewerStore,
        index: usize,
        generation: LoadGeneration,
    ) -> bool {
        let Some(pending) = self.pending.get(&index) else {
            return false;
        };
        if generation < pending.generation {
            debug!(
                "channel {index} loaded from stale generation {} (waiting for {})",
                generation.0, pending.generation.0
            );
            return false;
        }
        let Some(pending) = self.pending.remove(&index) else {
            return false;
        };
        match store.replace_channel_state(index, pending.state) {
            Ok(()) => true,
            Err(error) => {
                warn!("dropping deferred reset for channel {index}: {error}");
                false
            }
        }
    }
}
