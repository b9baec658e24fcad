use std::collections::BTreeMap;

use approx::assert_relative_eq;

use crate::model::{
    AxisRange, CameraState, ChannelMatcher, ChannelState, ControlPoint, ImageType, LutBound,
    LutSetting, Region, RenderMode, Slice, ViewMode, ViewerState, WHITE,
};

use super::{
    UrlParams, color_array_to_hex, deserialize_url_params, format_float, object_to_key_value_list,
    parse_bool, parse_camera_state, parse_channel_setting, parse_control_points, parse_float,
    parse_hex_color, parse_int, parse_key_value_list, parse_lut, parse_region,
    parse_url_view_mode, serialize_camera_state, serialize_channel_state,
    serialize_control_points, serialize_lut, serialize_region, serialize_viewer_url_params,
    view_mode_to_url,
};

#[test]
fn format_float_limits_significant_digits() {
    assert_eq!(format_float(1.3999999999999999, 5), "1.4");
    assert_eq!(format_float(123456.0, 3), "123456");
    assert_eq!(format_float(0.123456789, 5), "0.12346");
    assert_eq!(format_float(-2.5, 5), "-2.5");
    assert_eq!(format_float(-0.0, 5), "0");
    assert_eq!(format_float(85.0, 5), "85");
}

#[test]
fn hex_colors_roundtrip_and_reject_garbage() {
    for color in [[0, 0, 0], [255, 0, 128], [17, 34, 51], [255, 255, 255]] {
        assert_eq!(parse_hex_color(&color_array_to_hex(color)), Some(color));
    }
    assert_eq!(color_array_to_hex([255, 0, 128]), "ff0080");
    assert_eq!(parse_hex_color("1"), Some(WHITE));
    assert_eq!(parse_hex_color("#00FF00"), Some([0, 255, 0]));
    assert_eq!(parse_hex_color("fff"), None);
    assert_eq!(parse_hex_color("zzzzzz"), None);
}

#[test]
fn scalar_parsers_distinguish_missing_from_zero() {
    assert_eq!(parse_float(None, 0.0, 1.0), None);
    assert_eq!(parse_float(Some("abc"), 0.0, 1.0), None);
    assert_eq!(parse_float(Some("NaN"), 0.0, 1.0), None);
    assert_eq!(parse_float(Some("1.5"), 0.0, 1.0), Some(1.0));
    assert_eq!(parse_float(Some("0"), 0.0, 1.0), Some(0.0));
    assert_eq!(parse_int(Some("3.7"), 0, 10), Some(3));
    assert_eq!(parse_int(Some("-4"), 0, 10), Some(0));
    assert_eq!(parse_bool(Some("1")), Some(true));
    assert_eq!(parse_bool(Some("0")), Some(false));
    assert_eq!(parse_bool(Some("yes")), None);
    assert_eq!(parse_bool(None), None);
}

#[test]
fn key_value_list_roundtrips_reserved_characters() {
    let mut map = BTreeMap::new();
    map.insert("pos".to_string(), "1:2:3".to_string());
    map.insert("name".to_string(), "a,b & c%".to_string());
    map.insert("col".to_string(), "ff0000".to_string());
    let encoded = object_to_key_value_list(&map);
    assert!(encoded.contains("pos:1:2:3"));
    assert_eq!(parse_key_value_list(&encoded), map);
}

#[test]
fn key_value_list_splits_at_first_colon_and_trims() {
    let parsed = parse_key_value_list(" pos : 1:2:3,ven:1,broken,:orphan");
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed["pos"], "1:2:3");
    assert_eq!(parsed["ven"], "1");
    assert!(parse_key_value_list("").is_empty());
    assert_eq!(
        object_to_key_value_list([("col", "ff0000"), ("ven", "1")]),
        "col:ff0000,ven:1"
    );
}

#[test]
fn control_points_roundtrip_with_white_shorthand() {
    let points = vec![
        ControlPoint::new(0.0, 0.0),
        ControlPoint {
            x: 50.5,
            opacity: 0.25,
            color: [255, 0, 0],
        },
        ControlPoint::new(255.0, 1.0),
    ];
    let encoded = serialize_control_points(&points);
    assert_eq!(encoded, "0:0:1:50.5:0.25:ff0000:255:1:1");
    assert_eq!(parse_control_points(&encoded), Some(points));
}

#[test]
fn legacy_control_points_are_sorted() {
    let parsed = parse_control_points("255:1:1,0:0:1,128:0.5:00ff00").expect("legacy format");
    let xs = parsed.iter().map(|point| point.x).collect::<Vec<_>>();
    assert_eq!(xs, vec![0.0, 128.0, 255.0]);
    assert_eq!(parsed[1].color, [0, 255, 0]);
}

#[test]
fn malformed_control_point_fields_use_fallbacks() {
    let parsed = parse_control_points(".:.:1").expect("matches shape");
    assert_eq!(parsed, vec![ControlPoint::new(0.0, 1.0)]);
    assert_eq!(parse_control_points("hello"), None);
    assert_eq!(parse_control_points("0:0:red"), None);
}

#[test]
fn lut_shorthand_parses_each_bound_kind() {
    assert_eq!(parse_lut("autoij"), Some(LutSetting::AutoIJ));
    assert_eq!(parse_lut("AutoIJ"), Some(LutSetting::AutoIJ));
    let lut = parse_lut("p50:m150").expect("lut");
    assert_eq!(
        lut,
        LutSetting::Range {
            min: LutBound::Percentile(50.0),
            max: LutBound::Median(150.0),
        }
    );
    assert_eq!(serialize_lut(&lut), "p50:m150");
    assert_eq!(
        parse_lut("0:255.5"),
        Some(LutSetting::Range {
            min: LutBound::Absolute(0.0),
            max: LutBound::Absolute(255.5),
        })
    );
    assert_eq!(parse_lut("p50"), None);
    assert_eq!(parse_lut("q1:q2"), None);
}

#[test]
fn view_mode_uses_axis_looked_down() {
    assert_eq!(view_mode_to_url(ViewMode::XY), "Z");
    assert_eq!(view_mode_to_url(ViewMode::XZ), "Y");
    assert_eq!(view_mode_to_url(ViewMode::YZ), "X");
    assert_eq!(parse_url_view_mode("z"), ViewMode::XY);
    assert_eq!(parse_url_view_mode("X"), ViewMode::YZ);
    assert_eq!(parse_url_view_mode("3d"), ViewMode::ThreeD);
    assert_eq!(parse_url_view_mode("sideways"), ViewMode::ThreeD);
}

#[test]
fn region_parsing_orders_bounds_and_rejects_short_lists() {
    let region = parse_region(Some("0.1:0.9,0:1,0.5:0.2")).expect("region");
    assert_eq!(region.z, Some(AxisRange { min: 0.2, max: 0.5 }));
    assert_eq!(parse_region(Some("0:1,0:1")), None);
    assert_eq!(parse_region(Some("0:1,0:x,0:1")), None);
    assert_eq!(serialize_region(&Region::default()), "0:1,0:1,0:1");
}

#[test]
fn camera_state_elides_view_mode_defaults() {
    let camera = CameraState::default_for(ViewMode::ThreeD);
    assert_eq!(serialize_camera_state(&camera, ViewMode::ThreeD, true), None);
    assert_eq!(
        serialize_camera_state(&camera, ViewMode::ThreeD, false).as_deref(),
        Some("pos:0:0:5,tar:0:0:0,up:0:1:0,ort:0.5,fov:20")
    );
    let zoomed = CameraState { fov: 45.0, ..camera };
    assert_eq!(
        serialize_camera_state(&zoomed, ViewMode::ThreeD, true).as_deref(),
        Some("fov:45")
    );

    let parsed = parse_camera_state(Some("pos:1:2:3,fov:30,up:bad")).expect("camera");
    assert_eq!(parsed.position, Some([1.0, 2.0, 3.0]));
    assert_eq!(parsed.fov, Some(30.0));
    assert_eq!(parsed.up, None);
    assert_eq!(parse_camera_state(Some("nothing:here")), None);
}

#[test]
fn share_link_decodes_with_invariants_restored() {
    let params = UrlParams::from_query("?view=Z&mode=pathtrace&mask=80&c0=ven:1,col:ff0000");
    let config = deserialize_url_params(&params);
    let state = config.viewer.apply_to(&ViewerState::default());
    assert_eq!(state.view_mode, ViewMode::XY);
    assert_eq!(state.render_mode, RenderMode::Volumetric);
    assert_eq!(state.mask_alpha, 80.0);

    assert_eq!(config.channels.len(), 1);
    let channel = ChannelState::initial("DNA", 0, &config.channels);
    assert!(channel.volume_enabled);
    assert_eq!(channel.color, [255, 0, 0]);
}

#[test]
fn garbage_fields_decode_as_unspecified() {
    let params = UrlParams::from_query("mask=abc&lvl=1,2&bright=90&t=-3&image=tile");
    let partial = deserialize_url_params(&params).viewer;
    assert_eq!(partial.mask_alpha, None);
    assert_eq!(partial.levels, None);
    assert_eq!(partial.image_type, None);
    assert_eq!(partial.brightness, Some(90.0));
    assert_eq!(partial.time, Some(0));
}

#[test]
fn remove_defaults_keeps_only_changed_keys() {
    let state = ViewerState {
        brightness: 85.0,
        ..ViewerState::default()
    };
    let params = serialize_viewer_url_params(&state, &[ChannelState::new("DNA", 0)], true);
    assert_eq!(params.to_query(), "bright=85");
}

#[test]
fn viewer_state_survives_a_share_link() {
    let state = ViewerState {
        view_mode: ViewMode::XZ,
        render_mode: RenderMode::MaxProject,
        image_type: ImageType::FullField,
        show_axes: true,
        show_bounding_box: true,
        bounding_box_color: [255, 0, 0],
        background_color: [10, 20, 30],
        autorotate: true,
        mask_alpha: 20.0,
        brightness: 85.5,
        density: 12.25,
        levels: [10.0, 100.0, 200.0],
        interpolation_enabled: false,
        region: Region {
            x: AxisRange::new(0.25, 0.75),
            ..Region::default()
        },
        slice: Slice {
            x: 0.5,
            y: 0.25,
            z: 0.75,
        },
        time: 3,
        camera_state: Some(CameraState {
            position: [1.5, -2.0, 3.0],
            ..CameraState::default_for(ViewMode::XZ)
        }),
    };
    let query = serialize_viewer_url_params(&state, &[], false).to_query();
    let decoded = deserialize_url_params(&UrlParams::from_query(&query));
    assert_eq!(decoded.viewer.apply_to(&ViewerState::default()), state);
}

#[test]
fn channel_state_survives_a_share_link() {
    let mut state = ChannelState::new("Membrane", 1);
    state.volume_enabled = true;
    state.isosurface_enabled = true;
    state.isovalue = 100.0;
    state.opacity = 0.5;
    state.color = [12, 34, 56];
    state.colorize_enabled = true;
    state.colorize_alpha = 0.75;
    state.use_control_points = true;
    state.ramp = [10.0, 200.0];
    state.control_points = vec![
        ControlPoint::new(0.0, 0.0),
        ControlPoint {
            x: 64.5,
            opacity: 0.3,
            color: [0, 0, 255],
        },
        ControlPoint::new(255.0, 1.0),
    ];
    let block = serialize_channel_state(1, &state, false);
    let setting = parse_channel_setting(1, &block);
    assert_eq!(setting.matcher, ChannelMatcher::Index(1));
    let restored = setting.apply_to(&ChannelState::new("Membrane", 1));
    assert_eq!(restored, state);
    assert_relative_eq!(restored.control_points[1].opacity, 0.3);

    assert_eq!(
        serialize_channel_state(1, &ChannelState::new("Membrane", 1), true),
        ""
    );
}

#[test]
fn legacy_channel_keys_apply_without_channel_blocks() {
    let params = UrlParams::from_query("ch=0,2&luts=0,255,10,p99&colors=ff0000,00ff00");
    let channels = deserialize_url_params(&params).channels;
    assert_eq!(channels.len(), 2);
    assert_eq!(channels[0].matcher, ChannelMatcher::Index(0));
    assert_eq!(channels[0].volume_enabled, Some(true));
    assert_eq!(channels[0].color, Some([255, 0, 0]));
    assert_eq!(channels[1].matcher, ChannelMatcher::Index(2));
    assert_eq!(
        channels[1].lut,
        Some(LutSetting::Range {
            min: LutBound::Absolute(10.0),
            max: LutBound::Percentile(99.0),
        })
    );

    let mixed = UrlParams::from_query("ch=0,2&c1=ven:1");
    let channels = deserialize_url_params(&mixed).channels;
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0].matcher, ChannelMatcher::Index(1));
}

#[test]
fn url_params_keep_data_sources_and_unknown_keys() {
    let params = UrlParams::from_url(
        "https://viewer.example/?url=https%3A%2F%2Fx.org%2Fa.zarr,https%3A%2F%2Fy.org%2Fb.tif&foo=bar&dataset=aics&id=42",
    )
    .expect("url");
    let config = deserialize_url_params(&params);
    assert_eq!(
        config.data_urls,
        vec!["https://x.org/a.zarr".to_string(), "https://y.org/b.tif".to_string()]
    );
    let catalog = config.catalog.expect("catalog");
    assert_eq!(catalog.dataset, "aics");
    assert_eq!(catalog.id, "42");
    assert_eq!(params.extra.get("foo").map(String::as_str), Some("bar"));
    assert!(params.to_query().ends_with("&foo=bar"));
    assert!(UrlParams::from_url("not a url").is_err());
}

#[test]
fn to_url_replaces_the_query() {
    let params = UrlParams::from_query("bright=85&reg=0:1,0:0.5,0:1");
    let url = params
        .to_url("https://viewer.example/app?old=1")
        .expect("url");
    assert_eq!(url, "https://viewer.example/app?bright=85&reg=0:1,0:0.5,0:1");
}

#[test]
fn bare_queries_may_carry_urls_in_their_values() {
    let params = UrlParams::from_url_or_query("url=https://a.org/x.zarr&view=Z").expect("query");
    assert_eq!(params.url.as_deref(), Some("https://a.org/x.zarr"));
    assert_eq!(params.viewer.view.as_deref(), Some("Z"));

    let prefixed = UrlParams::from_url_or_query("?bright=85").expect("query");
    assert_eq!(prefixed.viewer.bright.as_deref(), Some("85"));

    let full = UrlParams::from_url_or_query("https://viewer.example/?view=X&bright=85")
        .expect("url");
    assert_eq!(full.viewer.view.as_deref(), Some("X"));
    assert!(UrlParams::from_url_or_query("").expect("empty").viewer.is_empty());
    assert!(UrlParams::from_url_or_query("https://[::1").is_err());
}

#[test]
fn empty_control_point_list_survives_a_share_link() {
    assert_eq!(parse_control_points(""), Some(Vec::new()));

    let mut state = ChannelState::new("DNA", 0);
    state.use_control_points = true;
    state.control_points.clear();
    let block = serialize_channel_state(0, &state, true);
    assert!(block.contains("cps:"));
    let restored = parse_channel_setting(0, &block).apply_to(&ChannelState::new("DNA", 0));
    assert!(restored.control_points.is_empty());
    assert_eq!(restored, state);
}

#[test]
fn lut_shorthand_stays_on_the_channel_until_encoded() {
    let setting = parse_channel_setting(0, "ven:1,lut:p50:p99");
    let state = setting.apply_to(&ChannelState::new("DNA", 0));
    let lut = LutSetting::Range {
        min: LutBound::Percentile(50.0),
        max: LutBound::Percentile(99.0),
    };
    assert_eq!(state.lut, Some(lut));
    assert_eq!(serialize_channel_state(0, &state, true), "lut:p50:p99,ven:1");

    let edited = parse_channel_setting(0, "rmp:10:20").apply_to(&state);
    assert_eq!(edited.lut, None);
    assert_eq!(edited.ramp, [10.0, 20.0]);
}
