use log::{debug, warn};

use crate::model::{ChannelMatcher, LutSetting, ViewerChannelSetting};

use super::LegacyChannelParams;
use super::format::parse_hex_color;
use super::lut::parse_lut_bound;

fn split_list(value: Option<&str>) -> Vec<&str> {
    value
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Reads the deprecated `ch`, `luts` and `colors` keys.
///
/// `ch` lists the channel indices to enable; `luts` holds one `min,max` pair
/// and `colors` one hex color per listed channel. Without `ch`, the lists
/// address channels `0, 1, 2, ...` and leave their enabled state alone.
/// Length mismatches are logged; surplus entries are ignored and missing
/// ones leave that field unspecified.
pub fn parse_legacy_channels(params: &LegacyChannelParams) -> Vec<ViewerChannelSetting> {
    let listed = split_list(params.ch.as_deref())
        .into_iter()
        .filter_map(|raw| match raw.parse::<usize>() {
            Ok(index) => Some(index),
            Err(_) => {
                debug!("ignoring legacy channel index `{raw}`");
                None
            }
        })
        .collect::<Vec<_>>();
    let luts = split_list(params.luts.as_deref());
    let colors = split_list(params.colors.as_deref());

    let lut_pairs = luts.len() / 2;
    let count = if params.ch.is_some() {
        listed.len()
    } else {
        lut_pairs.max(colors.len())
    };
    if !luts.is_empty() && (luts.len() % 2 != 0 || lut_pairs != count) {
        warn!(
            "legacy `luts` has {} values for {count} channels; expected {}",
            luts.len(),
            count * 2
        );
    }
    if !colors.is_empty() && colors.len() != count {
        warn!(
            "legacy `colors` has {} entries for {count} channels",
            colors.len()
        );
    }

    (0..count)
        .map(|position| {
            let index = listed.get(position).copied().unwrap_or(position);
            let mut setting = ViewerChannelSetting::new(ChannelMatcher::Index(index));
            if params.ch.is_some() {
                setting.volume_enabled = Some(true);
            }
            if position < lut_pairs {
                setting.lut = match (
                    parse_lut_bound(luts[position * 2]),
                    parse_lut_bound(luts[position * 2 + 1]),
                ) {
                    (Some(min), Some(max)) => Some(LutSetting::Range { min, max }),
                    _ => None,
                };
            }
            setting.color = colors.get(position).and_then(|color| parse_hex_color(color));
            setting
        })
        .collect()
}
