use log::debug;

use crate::model::{
    AxisRange, CameraState, LEVELS_MAX, PartialCameraState, PartialRegion, PartialSlice,
    PartialViewerState, Region, SLIDER_MAX, Slice, Vec3, ViewMode, ViewerState,
};

use super::ViewerStateParams;
use super::format::{
    color_array_to_hex, format_default_float, join_floats, parse_bool, parse_float,
    parse_float_list, parse_hex_color, parse_int, serialize_bool,
};
use super::key_value::{object_to_key_value_list, parse_key_value_list};

const CAMERA_POSITION: &str = "pos";
const CAMERA_TARGET: &str = "tar";
const CAMERA_UP: &str = "up";
const CAMERA_ORTHO_SCALE: &str = "ort";
const CAMERA_FOV: &str = "fov";

const MAX_FOV_DEGREES: f64 = 180.0;

/// Share links name the axis being looked down, not the plane on screen.
pub fn view_mode_to_url(view_mode: ViewMode) -> &'static str {
    match view_mode {
        ViewMode::ThreeD => "3D",
        ViewMode::XY => "Z",
        ViewMode::XZ => "Y",
        ViewMode::YZ => "X",
    }
}

/// Unrecognized values fall back to 3D.
pub fn parse_url_view_mode(value: &str) -> ViewMode {
    match value.trim().to_ascii_uppercase().as_str() {
        "Z" => ViewMode::XY,
        "Y" => ViewMode::XZ,
        "X" => ViewMode::YZ,
        _ => ViewMode::ThreeD,
    }
}

/// `x1:x2,y1:y2,z1:z2`, each bound in `[0, 1]`.
pub fn parse_region(value: Option<&str>) -> Option<PartialRegion> {
    let value = value?;
    let axes = value
        .split(',')
        .map(|axis| {
            let (min, max) = axis.split_once(':')?;
            let min = parse_float(Some(min), 0.0, 1.0)?;
            let max = parse_float(Some(max), 0.0, 1.0)?;
            Some(AxisRange::new(min, max))
        })
        .collect::<Option<Vec<_>>>();
    match axes.as_deref() {
        Some([x, y, z]) => Some(PartialRegion {
            x: Some(*x),
            y: Some(*y),
            z: Some(*z),
        }),
        _ => {
            debug!("ignoring malformed region `{value}`");
            None
        }
    }
}

pub fn serialize_region(region: &Region) -> String {
    region
        .axes()
        .iter()
        .map(|axis| join_floats(&[axis.min, axis.max], ":"))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn parse_slice(value: Option<&str>) -> Option<PartialSlice> {
    match parse_float_list(value, 3, 0.0, 1.0)?.as_slice() {
        [x, y, z] => Some(PartialSlice {
            x: Some(*x),
            y: Some(*y),
            z: Some(*z),
        }),
        _ => None,
    }
}

pub fn serialize_slice(slice: &Slice) -> String {
    join_floats(&slice.as_array(), ",")
}

fn parse_vec3(value: Option<&str>) -> Option<Vec3> {
    let coordinates = value?
        .split(':')
        .map(|part| parse_float(Some(part), f64::MIN, f64::MAX))
        .collect::<Option<Vec<_>>>()?;
    match coordinates.as_slice() {
        [x, y, z] => Some([*x, *y, *z]),
        _ => None,
    }
}

/// Parses the nested `cam` list. Vector coordinates are colon-separated so
/// they do not collide with the list's own commas.
pub fn parse_camera_state(value: Option<&str>) -> Option<PartialCameraState> {
    let entries = parse_key_value_list(value?);
    let get = |key: &str| entries.get(key).map(String::as_str);
    let camera = PartialCameraState {
        position: parse_vec3(get(CAMERA_POSITION)),
        target: parse_vec3(get(CAMERA_TARGET)),
        up: parse_vec3(get(CAMERA_UP)),
        ortho_scale: parse_float(get(CAMERA_ORTHO_SCALE), 0.0, f64::MAX),
        fov: parse_float(get(CAMERA_FOV), 0.0, MAX_FOV_DEGREES),
    };
    (!camera.is_empty()).then_some(camera)
}

/// With `remove_defaults`, sub-keys equal to `view_mode`'s default camera are
/// left out; `None` once nothing is left.
pub fn serialize_camera_state(
    camera: &CameraState,
    view_mode: ViewMode,
    remove_defaults: bool,
) -> Option<String> {
    let defaults = CameraState::default_for(view_mode);
    let mut entries: Vec<(&str, String)> = Vec::new();
    let vectors = [
        (CAMERA_POSITION, camera.position, defaults.position),
        (CAMERA_TARGET, camera.target, defaults.target),
        (CAMERA_UP, camera.up, defaults.up),
    ];
    for (key, value, default) in vectors {
        if !remove_defaults || value != default {
            entries.push((key, join_floats(&value, ":")));
        }
    }
    let scalars = [
        (CAMERA_ORTHO_SCALE, camera.ortho_scale, defaults.ortho_scale),
        (CAMERA_FOV, camera.fov, defaults.fov),
    ];
    for (key, value, default) in scalars {
        if !remove_defaults || value != default {
            entries.push((key, format_default_float(value)));
        }
    }
    (!entries.is_empty()).then(|| object_to_key_value_list(entries))
}

/// Decodes each global key independently. Garbage yields `None` for that
/// field only; defaults are applied by the caller.
pub fn deserialize_viewer_state(params: &ViewerStateParams) -> PartialViewerState {
    PartialViewerState {
        view_mode: params.view.as_deref().map(parse_url_view_mode),
        render_mode: params.mode.as_deref().and_then(|mode| mode.parse().ok()),
        image_type: params.image.as_deref().and_then(|image| image.parse().ok()),
        show_axes: parse_bool(params.axes.as_deref()),
        show_bounding_box: parse_bool(params.bb.as_deref()),
        bounding_box_color: params.bbcol.as_deref().and_then(parse_hex_color),
        background_color: params.bgcol.as_deref().and_then(parse_hex_color),
        autorotate: parse_bool(params.rot.as_deref()),
        mask_alpha: parse_int(params.mask.as_deref(), 0, SLIDER_MAX as i64).map(|v| v as f64),
        brightness: parse_float(params.bright.as_deref(), 0.0, SLIDER_MAX),
        density: parse_float(params.dens.as_deref(), 0.0, SLIDER_MAX),
        levels: parse_float_list(params.lvl.as_deref(), 3, 0.0, LEVELS_MAX)
            .and_then(|levels| <[f64; 3]>::try_from(levels).ok()),
        interpolation_enabled: parse_bool(params.interp.as_deref()),
        region: parse_region(params.reg.as_deref()),
        slice: parse_slice(params.slice.as_deref()),
        time: parse_int(params.t.as_deref(), 0, i64::from(u32::MAX)).map(|t| t as u32),
        camera_state: parse_camera_state(params.cam.as_deref()),
    }
}

/// Encodes every field; with `remove_defaults`, fields equal to
/// [`ViewerState::default`] are skipped to keep links short.
pub fn serialize_viewer_state(state: &ViewerState, remove_defaults: bool) -> ViewerStateParams {
    let defaults = ViewerState::default();
    let keep = |differs: bool| !remove_defaults || differs;
    let mut params = ViewerStateParams::default();

    if keep(state.view_mode != defaults.view_mode) {
        params.view = Some(view_mode_to_url(state.view_mode).to_string());
    }
    if keep(state.render_mode != defaults.render_mode) {
        params.mode = Some(state.render_mode.as_str().to_string());
    }
    if keep(state.mask_alpha != defaults.mask_alpha) {
        params.mask = Some(format_default_float(state.mask_alpha));
    }
    if keep(state.image_type != defaults.image_type) {
        params.image = Some(state.image_type.as_str().to_string());
    }
    if keep(state.show_axes != defaults.show_axes) {
        params.axes = Some(serialize_bool(state.show_axes).to_string());
    }
    if keep(state.show_bounding_box != defaults.show_bounding_box) {
        params.bb = Some(serialize_bool(state.show_bounding_box).to_string());
    }
    if keep(state.bounding_box_color != defaults.bounding_box_color) {
        params.bbcol = Some(color_array_to_hex(state.bounding_box_color));
    }
    if keep(state.background_color != defaults.background_color) {
        params.bgcol = Some(color_array_to_hex(state.background_color));
    }
    if keep(state.autorotate != defaults.autorotate) {
        params.rot = Some(serialize_bool(state.autorotate).to_string());
    }
    if keep(state.brightness != defaults.brightness) {
        params.bright = Some(format_default_float(state.brightness));
    }
    if keep(state.density != defaults.density) {
        params.dens = Some(format_default_float(state.density));
    }
    if keep(state.levels != defaults.levels) {
        params.lvl = Some(join_floats(&state.levels, ","));
    }
    if keep(state.interpolation_enabled != defaults.interpolation_enabled) {
        params.interp = Some(serialize_bool(state.interpolation_enabled).to_string());
    }
    if keep(state.region != defaults.region) {
        params.reg = Some(serialize_region(&state.region));
    }
    if keep(state.slice != defaults.slice) {
        params.slice = Some(serialize_slice(&state.slice));
    }
    if keep(state.time != defaults.time) {
        params.t = Some(state.time.to_string());
    }
    params.cam = state
        .camera_state
        .and_then(|camera| serialize_camera_state(&camera, state.view_mode, remove_defaults));
    params
}
