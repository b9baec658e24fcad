use std::fmt;

use log::{debug, warn};

use crate::model::{
    ChannelState, ISOVALUE_MAX, LEVELS_MAX, RenderMode, SLIDER_MAX, ViewMode,
    ViewerChannelSetting, ViewerState, control_points_to_ramp, is_canonical_ramp,
    ramp_to_control_points, sort_control_points,
};

use super::{ChannelSettingChange, Result, StoreError, ViewerSettingChange, ViewerSettingKey};

/// What changed, as reported to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Viewer(ViewerSettingKey),
    ViewerReplaced,
    Channel { index: usize },
    ChannelsReplaced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StoreEvent)>;

/// Owns the global viewer settings and the per-channel settings.
///
/// All mutation goes through the methods below, in call order; each call sees
/// the result of the previous one.
pub struct ViewerStore {
    viewer: ViewerState,
    channels: Vec<ChannelState>,
    revision: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl fmt::Debug for ViewerStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewerStore")
            .field("viewer", &self.viewer)
            .field("channels", &self.channels)
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for ViewerStore {
    fn default() -> Self {
        Self::new(ViewerState::default(), Vec::new())
    }
}

impl ViewerStore {
    pub fn new(mut viewer: ViewerState, channels: Vec<ChannelState>) -> Self {
        viewer.enforce_invariants();
        Self {
            viewer,
            channels,
            revision: 0,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn viewer(&self) -> &ViewerState {
        &self.viewer
    }

    pub fn channels(&self) -> &[ChannelState] {
        &self.channels
    }

    pub fn channel(&self, index: usize) -> Option<&ChannelState> {
        self.channels.get(index)
    }

    pub fn channel_names(&self) -> Vec<String> {
        self.channels.iter().map(|channel| channel.name.clone()).collect()
    }

    /// Bumped on every effective change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&StoreEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, event: StoreEvent) {
        self.revision += 1;
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }

    /// Applies one global change through its handler. Returns `false` when
    /// the handler left the state untouched (including rejected changes).
    pub fn change_viewer_setting(&mut self, change: ViewerSettingChange) -> bool {
        let key = change.key();
        let next = apply_viewer_change(&self.viewer, change);
        if next == self.viewer {
            return false;
        }
        self.viewer = next;
        self.notify(StoreEvent::Viewer(key));
        true
    }

    pub fn replace_viewer_state(&mut self, mut viewer: ViewerState) {
        viewer.enforce_invariants();
        if viewer != self.viewer {
            self.viewer = viewer;
            self.notify(StoreEvent::ViewerReplaced);
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.channels.len() {
            return Err(StoreError::ChannelIndexOutOfRange {
                index,
                len: self.channels.len(),
            });
        }
        Ok(())
    }

    /// Replaces one field of one channel. An index past the end is an error;
    /// the channel list never grows implicitly.
    pub fn change_channel_setting(
        &mut self,
        index: usize,
        change: ChannelSettingChange,
    ) -> Result<()> {
        self.check_index(index)?;
        let channel = &mut self.channels[index];
        let before = channel.clone();
        apply_channel_change(channel, change);
        if *channel != before {
            self.notify(StoreEvent::Channel { index });
        }
        Ok(())
    }

    /// Applies the same change to several channels. Nothing is applied if
    /// any index is out of range.
    pub fn change_channel_settings(
        &mut self,
        indices: &[usize],
        change: ChannelSettingChange,
    ) -> Result<()> {
        for index in indices {
            self.check_index(*index)?;
        }
        for index in indices {
            self.change_channel_setting(*index, change.clone())?;
        }
        Ok(())
    }

    pub fn replace_channel_state(&mut self, index: usize, state: ChannelState) -> Result<()> {
        self.check_index(index)?;
        if self.channels[index] != state {
            self.channels[index] = state;
            self.notify(StoreEvent::Channel { index });
        }
        Ok(())
    }

    pub fn set_channel_states(&mut self, channels: Vec<ChannelState>) {
        if channels != self.channels {
            self.channels = channels;
            self.notify(StoreEvent::ChannelsReplaced);
        }
    }

    /// Called when a volume arrives. The channel list is rebuilt from
    /// `initial_settings` only when the channel names differ from the ones
    /// held; otherwise the current settings carry over. Returns whether a
    /// rebuild happened.
    pub fn set_channel_names(
        &mut self,
        names: &[String],
        initial_settings: &[ViewerChannelSetting],
    ) -> bool {
        let unchanged = names.len() == self.channels.len()
            && names
                .iter()
                .zip(&self.channels)
                .all(|(name, channel)| *name == channel.name);
        if unchanged {
            return false;
        }
        debug!("rebuilding settings for {} channels", names.len());
        let channels = names
            .iter()
            .enumerate()
            .map(|(index, name)| ChannelState::initial(name, index, initial_settings))
            .collect();
        self.channels = channels;
        self.notify(StoreEvent::ChannelsReplaced);
        true
    }

    /// Moves a channel between ramp and control-point editing.
    ///
    /// Leaving control-point mode keeps only the ramp; a hand-edited control
    /// point list is lost once the user comes back. That downgrade is kept
    /// for link compatibility but logged.
    pub fn switch_transfer_function_mode(
        &mut self,
        index: usize,
        use_control_points: bool,
    ) -> Result<()> {
        self.check_index(index)?;
        let channel = &self.channels[index];
        if channel.use_control_points == use_control_points {
            return Ok(());
        }
        let mut next = channel.clone();
        if use_control_points {
            next.control_points = ramp_to_control_points(channel.ramp);
        } else {
            next.ramp = control_points_to_ramp(&channel.control_points);
            if !is_canonical_ramp(&channel.control_points) {
                warn!(
                    "channel {index} ({}): {} control points reduced to ramp {:?}",
                    channel.name,
                    channel.control_points.len(),
                    next.ramp
                );
            }
        }
        next.use_control_points = use_control_points;
        self.replace_channel_state(index, next)
    }
}

/// Produces the complete next state for one change. Cross-field rules live
/// here: path tracing excludes autorotation and the planar view modes.
fn apply_viewer_change(state: &ViewerState, change: ViewerSettingChange) -> ViewerState {
    let mut next = state.clone();
    match change {
        ViewerSettingChange::ViewMode(view_mode) => {
            next.view_mode = view_mode;
            if view_mode != ViewMode::ThreeD && next.render_mode == RenderMode::PathTrace {
                next.render_mode = RenderMode::Volumetric;
            }
        }
        ViewerSettingChange::RenderMode(render_mode) => {
            if render_mode == RenderMode::PathTrace && next.view_mode != ViewMode::ThreeD {
                debug!("path tracing is only available in 3D view");
                return next;
            }
            next.render_mode = render_mode;
            if render_mode == RenderMode::PathTrace {
                next.autorotate = false;
            }
        }
        ViewerSettingChange::Autorotate(autorotate) => {
            next.autorotate = autorotate && state.render_mode != RenderMode::PathTrace;
        }
        ViewerSettingChange::ImageType(image_type) => next.image_type = image_type,
        ViewerSettingChange::ShowAxes(show) => next.show_axes = show,
        ViewerSettingChange::ShowBoundingBox(show) => next.show_bounding_box = show,
        ViewerSettingChange::BoundingBoxColor(color) => next.bounding_box_color = color,
        ViewerSettingChange::BackgroundColor(color) => next.background_color = color,
        ViewerSettingChange::MaskAlpha(value) => next.mask_alpha = value.clamp(0.0, SLIDER_MAX),
        ViewerSettingChange::Brightness(value) => next.brightness = value.clamp(0.0, SLIDER_MAX),
        ViewerSettingChange::Density(value) => next.density = value.clamp(0.0, SLIDER_MAX),
        ViewerSettingChange::Levels(levels) => {
            next.levels = levels.map(|level| level.clamp(0.0, LEVELS_MAX));
        }
        ViewerSettingChange::InterpolationEnabled(enabled) => next.interpolation_enabled = enabled,
        ViewerSettingChange::Region(partial) => next.region = state.region.merged(&partial),
        ViewerSettingChange::Slice(partial) => next.slice = state.slice.merged(&partial),
        ViewerSettingChange::Time(time) => next.time = time,
        ViewerSettingChange::CameraState(partial) => {
            next.camera_state = Some(state.effective_camera().merged(&partial));
        }
    }
    next
}

fn apply_channel_change(channel: &mut ChannelState, change: ChannelSettingChange) {
    match change {
        ChannelSettingChange::VolumeEnabled(enabled) => channel.volume_enabled = enabled,
        ChannelSettingChange::IsosurfaceEnabled(enabled) => channel.isosurface_enabled = enabled,
        ChannelSettingChange::Isovalue(value) => channel.isovalue = value.clamp(0.0, ISOVALUE_MAX),
        ChannelSettingChange::Opacity(value) => channel.opacity = value.clamp(0.0, 1.0),
        ChannelSettingChange::Color(color) => channel.color = color,
        ChannelSettingChange::ColorizeEnabled(enabled) => channel.colorize_enabled = enabled,
        ChannelSettingChange::ColorizeAlpha(value) => {
            channel.colorize_alpha = value.clamp(0.0, 1.0);
        }
        ChannelSettingChange::UseControlPoints(enabled) => channel.use_control_points = enabled,
        ChannelSettingChange::ControlPoints(mut points) => {
            sort_control_points(&mut points);
            channel.control_points = points;
            channel.lut = None;
        }
        ChannelSettingChange::Ramp(ramp) => {
            channel.ramp = ramp;
            channel.lut = None;
        }
        ChannelSettingChange::Lut(lut) => channel.lut = lut,
    }
}
