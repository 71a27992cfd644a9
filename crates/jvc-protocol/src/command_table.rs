//! Static command table.
//!
//! Every known command, grouped by command code and group prefix. Groups
//! sharing the same wire bytes (the three picture mode generations, and the
//! status queries that reuse an operation's command code) are told apart by
//! packet type, payload length and, as a last resort, the projector model.
//!
//! Command names, prefixes and descriptions follow the D-ILA remote control
//! guide.

use crate::model::{PICTURE_MODE_V1_MODELS, PICTURE_MODE_V2_MODELS, PICTURE_MODE_V3_MODELS};

/// Where a command's response map comes from.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ResponseSource {
    None,
    Table(&'static [(&'static [u8], &'static str)]),
    /// Built from the model list: payload to comma-separated model names.
    ModelStatus,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct CommandDef {
    pub name: &'static str,
    pub prefix: &'static [u8],
    pub description: &'static str,
    pub response: ResponseSource,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct GroupDef {
    pub name: &'static str,
    /// Two-byte command code followed by the group prefix.
    pub code_and_prefix: &'static [u8],
    pub commands: &'static [CommandDef],
    pub payload_length: Option<usize>,
    pub response_payload_length: Option<usize>,
    pub models: &'static [&'static str],
}

const fn cmd(name: &'static str, prefix: &'static [u8], description: &'static str) -> CommandDef {
    CommandDef {
        name,
        prefix,
        description,
        response: ResponseSource::None,
    }
}

const fn query(
    description: &'static str,
    response: ResponseSource,
) -> CommandDef {
    CommandDef {
        name: "query",
        prefix: b"",
        description,
        response,
    }
}

const fn group(
    name: &'static str,
    code_and_prefix: &'static [u8],
    commands: &'static [CommandDef],
) -> GroupDef {
    GroupDef {
        name,
        code_and_prefix,
        commands,
        payload_length: Some(0),
        response_payload_length: Some(0),
        models: &[],
    }
}

const fn status_group(
    name: &'static str,
    code: &'static [u8],
    commands: &'static [CommandDef],
    response_payload_length: usize,
) -> GroupDef {
    GroupDef {
        response_payload_length: Some(response_payload_length),
        ..group(name, code, commands)
    }
}

const fn model_group(
    name: &'static str,
    code_and_prefix: &'static [u8],
    commands: &'static [CommandDef],
    models: &'static [&'static str],
) -> GroupDef {
    GroupDef {
        models,
        ..group(name, code_and_prefix, commands)
    }
}

// ============================================================================
// Response maps
// ============================================================================

pub(crate) const POWER_STATUS_MAP: &[(&[u8], &str)] = &[
    (b"\x30", "Standby"),
    (b"\x31", "On"),
    (b"\x32", "Cooling"),
    // Not in the guide; observed on real hardware.
    (b"\x33", "Warming"),
    (b"\x34", "Emergency"),
];

pub(crate) const INPUT_STATUS_MAP: &[(&[u8], &str)] = &[
    (b"\x30", "S-Video"),
    (b"\x31", "Video"),
    (b"\x32", "Component"),
    (b"\x33", "PC"),
    (b"\x36", "HDMI 1"),
    (b"\x37", "HDMI 2"),
];

pub(crate) const GAMMA_TABLE_STATUS_MAP: &[(&[u8], &str)] = &[
    (b"\x30", "Normal"),
    (b"\x31", "A"),
    (b"\x32", "B"),
    (b"\x33", "C"),
    (b"\x34", "Custom 1"),
    (b"\x35", "Custom 2"),
    (b"\x36", "Custom 3"),
];

pub(crate) const GAMMA_VALUE_STATUS_MAP: &[(&[u8], &str)] = &[
    (b"\x30", "1.8"),
    (b"\x31", "1.9"),
    (b"\x32", "2.0"),
    (b"\x33", "2.1"),
    (b"\x34", "2.2"),
    (b"\x35", "2.3"),
    (b"\x36", "2.4"),
    (b"\x37", "2.5"),
    (b"\x38", "2.6"),
];

pub(crate) const SOURCE_STATUS_MAP: &[(&[u8], &str)] = &[
    (b"\x00", "JVC Logo"),
    (b"\x30", "No Signal"),
    (b"\x31", "Signal OK"),
];

// ============================================================================
// Operation commands
// ============================================================================

const POWER: &[CommandDef] = &[
    cmd("on", b"\x31", "Power - On"),
    cmd("off", b"\x30", "Power - Off"),
];

const SET_INPUT: &[CommandDef] = &[
    cmd("hdmi_1", b"\x36", "Input - HDMI 1"),
    cmd("hdmi_2", b"\x37", "Input - HDMI 2"),
    cmd("component", b"\x32", "Input - Component"),
    cmd("s_video", b"\x30", "Input - S-Video"),
    cmd("video", b"\x31", "Input - Video"),
    cmd("pc", b"\x33", "Input - PC"),
    cmd("next", b"\x2B", "Input + (Go to next highest input)"),
    cmd("previous", b"\x2D", "Input - (Go to next lowest input)"),
];

const TEST_PATTERN: &[CommandDef] = &[
    cmd("off", b"\x30", "Test Pattern - Off"),
    cmd("colour_bars", b"\x31", "Test Pattern - Colour Bars"),
    cmd("stair_step_black_and_white", b"\x36", "Test Pattern - Stair step (black and white)"),
    cmd("stair_step_red", b"\x37", "Test Pattern - Stair step (red)"),
    cmd("stair_step_green", b"\x38", "Test Pattern - Stair step (green)"),
    cmd("stair_step_blue", b"\x39", "Test Pattern - Stair step (blue)"),
    cmd("crosshatch_green", b"\x41", "Test Pattern - Crosshatch (green)"),
];

const GAMMA: &[CommandDef] = &[
    cmd("normal", b"\x30", "Gamma - Normal"),
    cmd("a", b"\x31", "Gamma - A"),
    cmd("b", b"\x32", "Gamma - B"),
    cmd("c", b"\x33", "Gamma - C"),
    cmd("d", b"\x37", "Gamma - D"),
    cmd("custom_1", b"\x34", "Gamma - Custom 1"),
    cmd("custom_2", b"\x35", "Gamma - Custom 2"),
    cmd("custom_3", b"\x36", "Gamma - Custom 3"),
];

const GAMMA_VALUE: &[CommandDef] = &[
    cmd("1_8", b"\x30", "Gamma Correction Value - 1.8"),
    cmd("1_9", b"\x31", "Gamma Correction Value - 1.9"),
    cmd("2_0", b"\x32", "Gamma Correction Value - 2.0"),
    cmd("2_1", b"\x33", "Gamma Correction Value - 2.1"),
    cmd("2_2", b"\x34", "Gamma Correction Value - 2.2 (Default)"),
    cmd("2_3", b"\x35", "Gamma Correction Value - 2.3"),
    cmd("2_4", b"\x36", "Gamma Correction Value - 2.4"),
    cmd("2_5", b"\x37", "Gamma Correction Value - 2.5"),
    cmd("2_6", b"\x38", "Gamma Correction Value - 2.6"),
];

const OFF_TIMER: &[CommandDef] = &[
    cmd("off", b"\x30", "Off Timer - Off"),
    cmd("1_hour", b"\x31", "Off Timer - Set 1 hour"),
    cmd("2_hours", b"\x32", "Off Timer - Set 2 hours"),
    cmd("3_hours", b"\x33", "Off Timer - Set 3 hours"),
    cmd("4_hours", b"\x34", "Off Timer - Set 4 hours"),
];

const LAMP_POWER: &[CommandDef] = &[
    cmd("normal", b"\x30", "Lamp Power - Normal"),
    cmd("high", b"\x31", "Lamp Power - High"),
];

const INFRARED_REMOTE_CODE: &[CommandDef] = &[
    cmd("a", b"\x30", "Remote Code - A - hex code 73"),
    cmd("b", b"\x31", "Remote Code - B - hex code 63"),
];

const TRIGGER_OUTPUT_SET: &[CommandDef] = &[
    cmd("off", b"\x30", "Trigger - Off"),
    cmd("on_power", b"\x31", "Trigger - On (Power)"),
    cmd("on_anamorphic", b"\x32", "Trigger - On (Anamorphic)"),
];

const CLEAR_MOTION_DRIVE: &[CommandDef] = &[
    cmd("off", b"\x30", "Clear Motion Drive - Off"),
    cmd("mode_1", b"\x31", "Clear Motion Drive - Mode 1 (Low - HD550/950/990)"),
    cmd("mode_2", b"\x32", "Clear Motion Drive - Mode 2 (High - HD550/950/990)"),
    cmd("mode_3", b"\x33", "Clear Motion Drive - Mode 3 (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("mode_4", b"\x34", "Clear Motion Drive - Mode 4 (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("inverse_telecine", b"\x35", "Clear Motion Drive - Inverse Telecine (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
];

const ANAMORPHIC: &[CommandDef] = &[
    cmd("off", b"\x30", "Anamorphic - Off"),
    cmd("a", b"\x31", "Anamorphic - A"),
    cmd("b", b"\x32", "Anamorphic - B"),
];

const PICTURE_MODE_V1: &[CommandDef] = &[
    cmd("film", b"\x30\x30", "Picture Mode - Film"),
    cmd("cinema", b"\x30\x31", "Picture Mode - Cinema"),
    cmd("animation", b"\x30\x32", "Picture Mode - Animation"),
    cmd("natural", b"\x30\x33", "Picture Mode - Natural"),
    cmd("stage", b"\x30\x34", "Picture Mode - Stage"),
    cmd("thx", b"\x30\x36", "Picture Mode - THX (X70/X90/RS55/65)"),
    cmd("3d", b"\x30\x42", "Picture Mode - 3D"),
    cmd("user_1", b"\x30\x43", "Picture Mode - User 1"),
    cmd("user_2", b"\x30\x44", "Picture Mode - User 2"),
    cmd("user_3", b"\x30\x45", "Picture Mode - User 3"),
    cmd("user_4", b"\x30\x46", "Picture Mode - User 4"),
    cmd("user_5", b"\x31\x30", "Picture Mode - User 5"),
];

const PICTURE_MODE_V2: &[CommandDef] = &[
    cmd("film", b"\x30", "Picture Mode - Film"),
    cmd("cinema", b"\x31", "Picture Mode - Cinema"),
    cmd("animation", b"\x32", "Picture Mode - Animation"),
    cmd("natural", b"\x33", "Picture Mode - Natural"),
    cmd("stage", b"\x34", "Picture Mode - Stage"),
    cmd("3d", b"\x45", "Picture Mode - 3D"),
    cmd("user_1", b"\x36", "Picture Mode - User 1"),
    cmd("user_2", b"\x37", "Picture Mode - User 2"),
    cmd("thx", b"\x39", "Picture Mode - THX (X7/X9/RS50/60)"),
];

const PICTURE_MODE_V3: &[CommandDef] = &[
    cmd("cinema_1", b"\x30", "Picture Mode - Cinema 1"),
    cmd("cinema_2", b"\x31", "Picture Mode - Cinema 2"),
    cmd("cinema_3", b"\x32", "Picture Mode - Cinema 3"),
    cmd("natural", b"\x33", "Picture Mode - Natural"),
    cmd("stage", b"\x34", "Picture Mode - Stage"),
    cmd("user_1", b"\x36", "Picture Mode - User 1"),
    cmd("user_2", b"\x37", "Picture Mode - User 2"),
    cmd("thx", b"\x39", "Picture Mode - THX (HD750/950/990/RS20/25/35)"),
];

const COLOUR_PROFILE: &[CommandDef] = &[
    cmd("off", b"\x30\x30", "Colour Profile - Off"),
    cmd("film_1", b"\x30\x31", "Colour Profile - Film 1 (in Film mode)"),
    cmd("film_2", b"\x30\x32", "Colour Profile - Film 2 (in Film mode)"),
    cmd("standard", b"\x30\x33", "Colour Profile - Standard (in Cinema, Natural, Stage & 3D modes)"),
    cmd("cinema_1", b"\x30\x34", "Colour Profile - Cinema 1 (in Cinema mode)"),
    cmd("cinema_2", b"\x30\x35", "Colour Profile - Cinema 2 (in Cinema mode)"),
    cmd("anime_1", b"\x30\x36", "Colour Profile - Anime 1 (in Animation mode)"),
    cmd("anime_2", b"\x30\x37", "Colour Profile - Anime 2 (in Animation mode)"),
    cmd("video", b"\x30\x38", "Colour Profile - Video (in Natural mode)"),
    cmd("vivid", b"\x30\x39", "Colour Profile - Vivid (in Natural & 3D modes)"),
    cmd("adobe", b"\x31\x41", "Colour Profile - Adobe (in Natural mode)"),
    cmd("stage", b"\x31\x42", "Colour Profile - Stage (in Stage mode)"),
    cmd("3d", b"\x31\x43", "Colour Profile - 3D (in 3D mode)"),
    cmd("thx", b"\x31\x44", "Colour Profile - THX (in THX mode)"),
];

const G_3D_FORMAT: &[CommandDef] = &[
    cmd("off", b"\x30", "3D Format - Off (2D)"),
    cmd("auto", b"\x31", "3D Format - Auto"),
    cmd("frame_packing", b"\x32", "3D Format - Frame Packing"),
    cmd("side_by_side", b"\x33", "3D Format - Side by Side"),
    cmd("top_and_bottom", b"\x34", "3D Format - Top and Bottom"),
];

const G_2D_TO_3D_CONVERSION: &[CommandDef] = &[
    cmd("off", b"\x30", "2D to 3D Conversion - Off"),
    cmd("on", b"\x31", "2D to 3D Conversion - On"),
];

const G_3D_SUBTITLE_CORRECTION: &[CommandDef] = &[
    cmd("off", b"\x31", "3D Subtitle Correction - Off"),
    cmd("on", b"\x30", "3D Subtitle Correction - On"),
];

const LENS_MEMORY: &[CommandDef] = &[
    cmd("save_1", b"\x53\x30", "Lens Memory Save - Memory 1"),
    cmd("save_2", b"\x53\x31", "Lens Memory Save - Memory 2"),
    cmd("save_3", b"\x53\x32", "Lens Memory Save - Memory 3"),
    cmd("select_1", b"\x4C\x30", "Lens Memory Select - Memory 1"),
    cmd("select_2", b"\x4C\x31", "Lens Memory Select - Memory 2"),
    cmd("select_3", b"\x4C\x32", "Lens Memory Select - Memory 3"),
];

const TEST_COMMAND: &[CommandDef] = &[
    cmd("null_command", b"\x00", "Null Command (to check communication)"),
];

const REMOTE_CONTROL: &[CommandDef] = &[
    cmd("3d_setting", b"\x44\x35", "3D Setting - Direct access to 3D Setting menu (X30/X70/X90/RS45/55/65)"),
    cmd("3d_format_next", b"\x44\x36", "3D Format - Cycles through all available 3D formats (X30/X70/X90/RS45/55/65)"),
    cmd("advanced_picture_adjust", b"\x37\x33", "Advanced - Direct access to Picture Adjust > Advanced menu (HD550/950/990/X3/X7/X9/ X30/X70/X90/RS15/25/35/40/50/60/45/55/65)"),
    cmd("anamorphic_off", b"\x32\x34", "Anamorphic - Off (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65) Vertical Stretch - Off (HD350/750/950/990/RS10/20/25/35)"),
    cmd("vertical_stretch_off", b"\x32\x34", "Vertical Stretch - Off (HD350/550/750/950/990/RS10/15/20/25/35) Anamorphic - Off (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("anamorphic_a", b"\x32\x33", "Anamorphic - A (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65) Vertical Stretch - On (HD350/750/950/990/RS10/20/25/35)"),
    cmd("vertical_stretch_on", b"\x32\x33", "Vertical Stretch - On (HD350/550/750/950/990/RS10/15/20/25/35) Anamorphic - A (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("anamorphic_b", b"\x32\x42", "Anamorphic - B (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("anamorphic_next", b"\x43\x35", "Anamorphic - Cycles through Off/A/B (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("aspect_16_9", b"\x32\x36", "Aspect - 16:9"),
    cmd("aspect_4_3", b"\x32\x35", "Aspect - 4:3"),
    cmd("aspect_zoom", b"\x32\x37", "Aspect - Zoom"),
    cmd("aspect_auto", b"\x41\x45", "Aspect (PC) - Auto (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("aspect_pc_full", b"\x42\x30", "Aspect (PC) - Full (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("aspect_pc_just", b"\x41\x46", "Aspect (PC) - Just (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("aspect_up", b"\x37\x37", "Aspect + (cycles through all available modes)"),
    cmd("auto_align", b"\x31\x33", "Auto Align (PC input on HD750/950/990/X7/X9/ X70/X90/RS20/25/35/50/60/55/65)"),
    cmd("auto_lens_centre", b"\x43\x39", "Auto Lens Centre (X3/X7/X9/X70/X90/RS50/60/45/55/65)"),
    cmd("back", b"\x30\x33", "Back - Steps backwards through menus and removes any OSD messages"),
    cmd("bnr_off", b"\x31\x30", "BNR (Block Noise Reduction) - Off"),
    cmd("bnr_on", b"\x30\x46", "BNR (Block Noise Reduction) - On"),
    cmd("bright_level_down", b"\x41\x33", "Bright Level - (X7/X9/X70/X90/RS50/60/55/65)"),
    cmd("bright_level_up", b"\x41\x32", "Bright Level + (X7/X9/X70/X90/RS50/60/55/65)"),
    cmd("brightness_down", b"\x37\x42", "Brightness \u{2013}"),
    cmd("brightness_up", b"\x37\x41", "Brightness +"),
    cmd("brightness_adj", b"\x30\x39", "Brightness Adj. (Adjustment Bar On/Off toggle)"),
    cmd("cec_off", b"\x35\x37", "CEC - Off"),
    cmd("cec_on", b"\x35\x36", "CEC - On"),
    cmd("cmd_next", b"\x38\x41", "Clear Motion Drive - Cycles through: Off/ Mode 1/Mode 2/Mode 3/Mode 4/Inverse Telecine (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("cmd_off", b"\x34\x37", "Clear Motion Drive - Off (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("cmd_mode_1", b"\x43\x45", "Clear Motion Drive - Mode 1 (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("cmd_mode_2", b"\x43\x46", "Clear Motion Drive - Mode 2 (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("cmd_mode_3", b"\x34\x38", "Clear Motion Drive - Mode 3 (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("cmd_mode_4", b"\x34\x39", "Clear Motion Drive - Mode 4 (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("cmd_inverse_telecine", b"\x34\x41", "Clear Motion Drive - Inverse Telecine (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("colour_down", b"\x37\x44", "Colour \u{2013}"),
    cmd("colour_up", b"\x37\x43", "Colour +"),
    cmd("colour_adj", b"\x31\x35", "Colour Adj. (Adjustment Bar On/Off toggle)"),
    cmd("colour_management_off", b"\x36\x30", "Colour Management - Off (HD750/950/990/ X7/X9/RS20/25/35/50/60/55/65)"),
    cmd("colour_management_custom_1", b"\x36\x31", "Colour Management - Custom 1 (HD750/950/ 990/X7/X9/RS20/25/35/50/60/55/65)"),
    cmd("colour_management_custom_2", b"\x36\x32", "Colour Management - Custom 2 (HD750/950/ 990/X7/X9/RS20/25/35/50/60/55/65)"),
    cmd("colour_management_custom_3", b"\x36\x33", "Colour Management - Custom 3 (HD750/950/ 990/X7/X9/RS20/25/35/50/60/55/65)"),
    cmd("colour_management_next", b"\x38\x39", "Colour Management - Cycles through: Off/ Custom 1/Custom 2/Custom 3 (X7/X9/X70/X90/RS50/60/55/65)"),
    cmd("colour_profile_next", b"\x38\x38", "Colour Profile - Cycles through all available Colour Profiles (X7/X9/X79/X90/RS50/60/55/65)"),
    cmd("colour_space_next", b"\x43\x44", "Colour Space - Cycles through Standard/ Wide 1/Wide 2 (X3/X30/RS40/RS45)"),
    cmd("colour_temp_5800k", b"\x34\x45", "Colour Temp. - 5800K (HD350/550/750/950/990/RS10/15/20/25/35)"),
    cmd("colour_temp_6500k", b"\x34\x46", "Colour Temp. - 6500K"),
    cmd("colour_temp_7500k", b"\x35\x30", "Colour Temp. - 7500K (HD350/550/750/950/990/RS10/15/20/25/35)"),
    cmd("colour_temp_9300k", b"\x35\x31", "Colour Temp. - 9300K (HD350/550/750/950/990/RS10/15/20/25/35)"),
    cmd("colour_temp_custom_1", b"\x35\x33", "Colour Temp. - Custom 1"),
    cmd("colour_temp_custom_2", b"\x35\x34", "Colour Temp. - Custom 2"),
    cmd("colour_temp_custom_3", b"\x35\x35", "Colour Temp. - Custom 3"),
    cmd("colour_temp_high_bright", b"\x35\x32", "Colour Temp. - High Bright (HD350/550/750/ 950/990/X3/X30/RS10/15/20/25/35/40/45)"),
    cmd("colour_temp_next", b"\x37\x36", "Colour Temp. + (cycles through all options)"),
    cmd("colour_temperature_gain_blue_down", b"\x39\x31", "Colour Temperature Gain Blue \u{2013} (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("colour_temperature_gain_blue_up", b"\x39\x30", "Colour Temperature Gain Blue + (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("colour_temperature_gain_green_down", b"\x38\x46", "Colour Temperature Gain Green \u{2013} (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("colour_temperature_gain_green_up", b"\x38\x45", "Colour Temperature Gain Green + (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("colour_temperature_gain_red_down", b"\x38\x44", "Colour Temperature Gain Red \u{2013} (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("colour_temperature_gain_red_up", b"\x38\x43", "Colour Temperature Gain Red + (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("colour_temperature_offset_blue_down", b"\x39\x37", "Colour Temperature Offset Blue \u{2013} (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("colour_temperature_offset_blue_up", b"\x39\x36", "Colour Temperature Offset Blue + (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("colour_temperature_offset_green_down", b"\x39\x35", "Colour Temperature Offset Green \u{2013} (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("colour_temperature_offset_green_up", b"\x39\x34", "Colour Temperature Offset Green + (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("colour_temperature_offset_red_down", b"\x39\x33", "Colour Temperature Offset Red \u{2013} (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("colour_temperature_offset_red_up", b"\x39\x32", "Colour Temperature Offset Red + (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("contrast_down", b"\x37\x39", "Contrast \u{2013}"),
    cmd("contrast_up", b"\x37\x38", "Contrast +"),
    cmd("contrast_adj", b"\x30\x41", "Contrast Adj. (Adjustment Bar On/Off toggle)"),
    cmd("cti_off", b"\x35\x43", "CTI (Colour Transient Improvement) - Off (HD350/550/750/950/990/RS10/15/20/25/35)"),
    cmd("cti_low", b"\x35\x44", "CTI (Colour Transient Improvement) - Low (HD350/550/750/950/990/RS10/15/20/25/35)"),
    cmd("cti_middle", b"\x35\x45", "CTI (Colour Transient Improvement) - Middle (HD350/550/750/950/990/RS10/15/20/25/35)"),
    cmd("cti_high", b"\x35\x46", "CTI (Colour Transient improvement) - High (HD350/550/750/950/990/RS10/15/20/25/35)"),
    cmd("cursor_down", b"\x30\x32", "Cursor Down \u{25bc}"),
    cmd("cursor_left", b"\x33\x36", "Cursor Left \u{25c4}"),
    cmd("cursor_right", b"\x33\x34", "Cursor Right \u{25ba}"),
    cmd("cursor_up", b"\x30\x31", "Cursor Up \u{25b2}"),
    cmd("dark_level_down", b"\x41\x35", "Dark Level \u{2013} (X7/X9/X70/X90/RS50/60/55/65)"),
    cmd("dark_level_up", b"\x41\x34", "Dark Level + (X7/X9/X70/X90/RS50/60/55/65)"),
    cmd("detail_enhance_down", b"\x31\x32", "Detail Enhance \u{2013}"),
    cmd("detail_enhance_up", b"\x31\x31", "Detail Enhance +"),
    cmd("picture_tone_blue_down", b"\x41\x31", "Picture Tone Blue \u{2013} (X7/X9/RS50/60 - Film Mode Only) (X70/X90/RS55/65 - All Modes)"),
    cmd("picture_tone_blue_up", b"\x41\x30", "Picture Tone Blue + (X7/X9/RS50/60 - Film Mode Only) (X70/X90/RS55/65 - All Modes)"),
    cmd("picture_tone_green_down", b"\x39\x46", "Picture Tone Green \u{2013} (X7/X9/RS50/60 - Film Mode Only) (X70/X90/RS55/65 - All Modes)"),
    cmd("picture_tone_green_up", b"\x39\x45", "Picture Tone Green + (X7/X9/RS50/60 - Film Mode Only) (X70/X90/RS55/65 - All Modes)"),
    cmd("picture_tone_red_down", b"\x39\x44", "Picture Tone Red \u{2013} (X7/X9/RS50/60 - Film Mode Only) (X70/X90/RS55/65 - All Modes)"),
    cmd("picture_tone_red_up", b"\x39\x43", "Picture Tone Red + (X7/X9/RS50/60 - Film Mode Only) (X70/X90/RS55/65 - All Modes)"),
    cmd("picture_tone_white_down", b"\x39\x42", "Picture Tone White \u{2013} (X7/X9/RS50/60 - Film Mode Only) (X70/X90/RS55/65 - All Modes)"),
    cmd("picture_tone_white_up", b"\x39\x41", "Picture Tone White + (X7/X9/RS50/60 - Film Mode Only) (X70/X90/RS55/65 - All Modes)"),
    cmd("gamma_a", b"\x33\x39", "Gamma - A"),
    cmd("gamma_b", b"\x33\x41", "Gamma - B"),
    cmd("gamma_c", b"\x33\x42", "Gamma - C"),
    cmd("gamma_custom_1", b"\x33\x43", "Gamma - Custom 1"),
    cmd("gamma_custom_2", b"\x33\x44", "Gamma - Custom 2"),
    cmd("gamma_custom_3", b"\x33\x45", "Gamma - Custom 3"),
    cmd("gamma_d", b"\x33\x46", "Gamma - D (HD550/950/990/X3/X7/X9/ X30/X70/X90/RS15/25/35/40/50/60/45/55/65)"),
    cmd("gamma_normal", b"\x33\x38", "Gamma - Normal"),
    cmd("gamma_next", b"\x37\x35", "Gamma + (cycles through all options)"),
    cmd("hide_off", b"\x44\x31", "Hide - Off (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("hide_on", b"\x44\x30", "Hide - On (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("hide", b"\x31\x44", "Hide (On/Off toggle)"),
    cmd("horizontal_position_down", b"\x41\x42", "Horizontal Position \u{2013} (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("horizontal_position_up", b"\x41\x41", "Horizontal Position + (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("information", b"\x37\x34", "Information (displays Information tab of menu)"),
    cmd("input_component", b"\x34\x44", "Input - Component"),
    cmd("input_hdmi_1", b"\x37\x30", "Input - HDMI 1"),
    cmd("input_hdmi_2", b"\x37\x31", "Input - HDMI 2"),
    cmd("input_pc", b"\x34\x36", "Input - PC (HD750/950/990/X7/X9/X70/X90 RS20/25/35/50/60/55/65)"),
    cmd("input_s_video", b"\x34\x43", "Input - S-Video (HD350/550/750/950/990)"),
    cmd("input_video", b"\x34\x42", "Input - Video (HD350/550/750/950/990)"),
    cmd("input_next", b"\x30\x38", "Input + (cycles through all available inputs)"),
    cmd("isf_day", b"\x36\x34", "ISF - Day (X7/X9/X70/X90/RS50/60/55/65)"),
    cmd("isf_night", b"\x36\x35", "ISF - Night (X7/X9/X70/X90/RS50/60/55/65)"),
    cmd("isf_off", b"\x35\x41", "ISF - Off (HD950/990/X7/X9/X70/X90/ RS25/35/50/60/55/65)"),
    cmd("isf_on", b"\x35\x42", "ISF - On (HD950/990/X7/X9/X70/X90/ RS25/35/50/60/55/65)"),
    cmd("keystone_correction_horizontal_down", b"\x34\x31", "Keystone Correction Horizontal \u{2013}"),
    cmd("keystone_correction_horizontal_up", b"\x34\x30", "Keystone Correction Horizontal +"),
    cmd("keystone_correction_vertical_down", b"\x31\x43", "Keystone Correction Vertical \u{2013}"),
    cmd("keystone_correction_vertical_up", b"\x31\x42", "Keystone Correction Vertical +"),
    cmd("lens_aperture_1", b"\x32\x38", "Lens Aperture - 1 (HD350/HD550)"),
    cmd("lens_aperture_2", b"\x32\x39", "Lens Aperture - 2 (HD350/HD550)"),
    cmd("lens_aperture_3", b"\x32\x41", "Lens Aperture - 3 (HD350/HD550)"),
    cmd("lens_aperture_down", b"\x31\x46", "Lens Aperture \u{2013} If Lens Aperture Gauge is not displayed - displays gauge. If Lens Aperture Gauge is already displayed - Lens Aperture is decreased (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("lens_aperture_up", b"\x31\x45", "Lens Aperture + If Lens Aperture Gauge is not displayed - displays gauge. If Lens Aperture Gauge is already displayed - Lens Aperture is increased (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("lens_aperture_adj", b"\x32\x30", "Lens Aperture Adj. (HD350/750/950/990/ RS10/20/25/35 - Adjustment Bar On/Off toggle) (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65 - Displays Adjustment Bar) (HD550/RS15 - Cycles through all options)"),
    cmd("lens_control_next", b"\x33\x30", "Lens Control (cycles through all options)"),
    cmd("lens_focus_down", b"\x33\x32", "Lens Focus \u{2013}"),
    cmd("lens_focus_up", b"\x33\x31", "Lens Focus +"),
    cmd("lens_memory_next", b"\x44\x34", "Lens Memory - Cycles through Lens Memory Pages: Select/Save/Name Edit (X30/X70/X90/RS45/55/65)"),
    cmd("lens_memory_1", b"\x44\x38", "Lens Memory 1 (X30/X70/X90/RS45/55/65)"),
    cmd("lens_memory_2", b"\x44\x39", "Lens Memory 2 (X30/X70/X90/RS45/55/65)"),
    cmd("lens_memory_3", b"\x44\x41", "Lens Memory 3 (X30/X70/X90/RS45/55/65)"),
    cmd("lens_shift_down", b"\x32\x32", "Lens Shift - Down"),
    cmd("lens_shift_left", b"\x34\x34", "Lens Shift - Left"),
    cmd("lens_shift_right", b"\x34\x33", "Lens Shift - Right"),
    cmd("lens_shift_up", b"\x32\x31", "Lens Shift - Up"),
    cmd("lens_zoom_in", b"\x33\x35", "Lens Zoom - In"),
    cmd("lens_zoom_out", b"\x33\x37", "Lens Zoom - Out"),
    cmd("mask_bottom_down", b"\x42\x38", "Mask Bottom \u{2013} (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("mask_bottom_up", b"\x42\x37", "Mask Bottom + (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("mask_left_down", b"\x42\x32", "Mask Left \u{2013} (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("mask_left_up", b"\x42\x31", "Mask Left + (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("mask_right_down", b"\x42\x34", "Mask Right \u{2013} (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("mask_right_up", b"\x42\x33", "Mask Right + (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("mask_top_down", b"\x42\x36", "Mask Top \u{2013} (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("mask_top_up", b"\x42\x35", "Mask Top + (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("menu", b"\x32\x45", "Menu (On/Off toggle)"),
    cmd("menu_position", b"\x34\x32", "Menu Position (HD550/950/990/X3/X7/X9/ X30/X70/X90/RS15/25/35/40/50/60/45/55/65)"),
    cmd("mnr_down", b"\x30\x45", "MNR (Mosquito Noise Reduction) \u{2013}"),
    cmd("mnr_up", b"\x30\x44", "MNR (Mosquito Noise Reduction) +"),
    cmd("nr", b"\x31\x38", "NR (toggles display of RNR/MNR) (HD350/550/750/950/990/RS10/15/20/25/35)"),
    cmd("ok", b"\x32\x46", "OK (to accept currently selected option)"),
    cmd("phase_down", b"\x41\x39", "Phase (PC Input) \u{2013} (X7/X9/X70/X90/RS50/60/55/65)"),
    cmd("phase_up", b"\x41\x38", "Phase (PC Input) + (X7/X9/X70/X90/RS50/60/55/65)"),
    cmd("picture_adjust", b"\x37\x32", "Picture Adjust (HD550/750/990/X3/X7/X9/ X30/X70/X90/RS15/25/35/40/50/60/45/55/65)"),
    cmd("picture_mode_3d", b"\x38\x37", "Picture Mode - 3D (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("picture_mode_cinema_1", b"\x36\x39", "Picture Mode - Cinema 1 (X3/X7/X9/X30/X70/ X90/RS40/50/60/45/55/65 - Film Mode)"),
    cmd("picture_mode_cinema_2", b"\x36\x38", "Picture Mode - Cinema 2 (X3/X7/X9/X30/X70/ X90/RS40/50/60/45/55/65 - Cinema Mode)"),
    cmd("picture_mode_cinema_3", b"\x36\x36", "Picture Mode - Cinema 3 (HD550/750/990/ RS15/25/35) (X3/X7/X9/X30/X70/X90/ RS40/50/60/45/55/65 - Animation Mode)"),
    cmd("picture_mode_dynamic", b"\x36\x42", "Picture Mode - Dynamic (HD350/550/750/950/990)"),
    cmd("picture_mode_natural", b"\x36\x41", "Picture Mode - Natural"),
    cmd("picture_mode_stage", b"\x36\x37", "Picture Mode - Stage"),
    cmd("picture_mode_thx", b"\x36\x46", "Picture Mode - THX (HD750/950/990/X7/X9/ X70/X90/RS20/25/35/50/60/55/65)"),
    cmd("picture_mode_user_1", b"\x36\x43", "Picture Mode - User 1"),
    cmd("picture_mode_user_2", b"\x36\x44", "Picture Mode - User 2"),
    cmd("picture_mode_user_3", b"\x36\x45", "Picture Mode - User 3 (HD550/750/950/990/ X3/X30/RS20/25/35/40/45)"),
    cmd("picture_mode_user_4", b"\x43\x41", "Picture Mode - User 4 (X30/X70/X90/RS45/55/65)"),
    cmd("picture_mode_user_5", b"\x43\x42", "Picture Mode - User 5 (X30/X70/X90/RS45/55/65)"),
    cmd("pixel_shift_horizontal_blue_down", b"\x42\x45", "Pixel Shift - Horizontal Blue \u{2013} (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("pixel_shift_horizontal_blue_up", b"\x42\x44", "Pixel Shift - Horizontal Blue + (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("pixel_shift_horizontal_green_down", b"\x42\x43", "Pixel Shift - Horizontal Green \u{2013} (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("pixel_shift_horizontal_green_up", b"\x42\x42", "Pixel Shift - Horizontal Green + (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("pixel_shift_horizontal_red_down", b"\x42\x41", "Pixel Shift - Horizontal Red \u{2013} (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("pixel_shift_horizontal_red_up", b"\x42\x39", "Pixel Shift - Horizontal Red + (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("pixel_shift_vertical_blue_down", b"\x43\x34", "Pixel Shift - Vertical Blue \u{2013} (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("pixel_shift_vertical_blue_up", b"\x43\x33", "Pixel Shift - Vertical Blue + (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("pixel_shift_vertical_green_down", b"\x43\x32", "Pixel Shift - Vertical Green \u{2013} (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("pixel_shift_vertical_green_up", b"\x43\x31", "Pixel Shift - Vertical Green + (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("pixel_shift_vertical_red_down", b"\x43\x30", "Pixel Shift - Vertical Red \u{2013} (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("pixel_shift_vertical_red_up", b"\x42\x46", "Pixel Shift - Vertical Red + (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("power_off", b"\x30\x36", "Power - Off (send twice with short delay between to switch off)"),
    cmd("power_on", b"\x30\x35", "Power - On"),
    cmd("rnr_down", b"\x30\x43", "RNR (Random Noise Reduction) \u{2013}"),
    cmd("rnr_up", b"\x30\x42", "RNR (Random Noise Reduction) +"),
    cmd("screen_adjust_off", b"\x38\x30", "Screen Adjust - Off (X3/X30/RS40/45)"),
    cmd("screen_adjust_a", b"\x38\x31", "Screen Adjust - A (X3/X30/RS40/45)"),
    cmd("screen_adjust_b", b"\x38\x32", "Screen Adjust - B (X3/X30/RS40/45)"),
    cmd("screen_adjust_c", b"\x38\x33", "Screen Adjust - C (X3/X30/RS40/45)"),
    cmd("sharpness_down", b"\x37\x46", "Sharpness \u{2013}"),
    cmd("sharpness_up", b"\x37\x45", "Sharpness +"),
    cmd("sharpness_adj", b"\x31\x34", "Sharpness Adj. (Adjustment Bar On/Off toggle)"),
    cmd("shutter_close", b"\x31\x39", "Shutter - Close (HD550/950/990/X3/X7/X9/ X30/X70/X90/RS15/25/35/40/50/60/45/55/65)"),
    cmd("shutter_open", b"\x31\x41", "Shutter - Open (HD550/950/990/X3/X7/X9/ X30/X70/X90/RS15/25/35/40/50/60/45/55/65)"),
    cmd("shutter_off", b"\x32\x44", "Shutter - Off - Un-synchronises shutter with \u{201c}Hide\u{201d} function (HD550/950/990/X3/X7/X9/ X30/X70/X90/RS15/25/35/40/50/60/45/55/65)"),
    cmd("shutter_on", b"\x32\x43", "Shutter - On - Synchronises shutter with \u{201c}Hide\u{201d} function (HD550/950/990/X3/X7/X9/ X30/X70/X90/RS15/25/35/40/50/60/45/55/65)"),
    cmd("test_pattern_next", b"\x35\x39", "Test Pattern (cycles through all patterns) (HD350/550/750/950/990/RS10/15/20/25/35)"),
    cmd("thx_bright", b"\x38\x35", "THX - Bright (X7/X9/X70/X90/RS50/60/55/65)"),
    cmd("thx_dark", b"\x38\x36", "THX - Dark (X7/X9/X70/X90/RS50/60/55/65)"),
    cmd("thx_off", b"\x43\x37", "THX - Off (X7/X9/X70/X90/RS50/60/55/65)"),
    cmd("thx_on", b"\x43\x38", "THX - On (X7/X9/X70/X90/RS50/60/55/65)"),
    cmd("tint_down", b"\x39\x39", "Tint \u{2013} (X3/X7/X9/X30/X70/X90/RS40/ 50/60/45/55/65)"),
    cmd("tint_up", b"\x39\x38", "Tint + (X3/X7/X9/X30/X70/X90/RS40/ 50/60/45/55/65)"),
    cmd("tint_adj", b"\x31\x36", "Tint Adj. (Adjustment Bar On/Off toggle)"),
    cmd("tracking_down", b"\x41\x37", "Tracking \u{2013} (PC Input) (X7/X9/X70/X90/RS50/60/55/65)"),
    cmd("tracking_up", b"\x41\x36", "Tracking + (PC Input) (X7/X9/X70/X90/RS50/60/55/65)"),
    cmd("user_next", b"\x44\x37", "User - Cycles through User 1 - User 5 Picture Modes (X30/X70/X90/RS45/55/65)"),
    cmd("vertical_position_down", b"\x41\x44", "Vertical Position \u{2013} (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
    cmd("vertical_position_up", b"\x41\x43", "Vertical Position + (X3/X7/X9/X30/X70/X90/RS40/50/60/45/55/65)"),
];

// ============================================================================
// Status queries
// ============================================================================

const POWER_STATUS: &[CommandDef] = &[query(
    "Query Power status",
    ResponseSource::Table(POWER_STATUS_MAP),
)];

const INPUT_STATUS: &[CommandDef] = &[query(
    "Query current video input",
    ResponseSource::Table(INPUT_STATUS_MAP),
)];

const GAMMA_TABLE_STATUS: &[CommandDef] = &[query(
    "Query current gamma table selection",
    ResponseSource::Table(GAMMA_TABLE_STATUS_MAP),
)];

const GAMMA_VALUE_STATUS: &[CommandDef] = &[query(
    "Query current gamma value",
    ResponseSource::Table(GAMMA_VALUE_STATUS_MAP),
)];

const SOURCE_STATUS: &[CommandDef] = &[query(
    "Query current video source status",
    ResponseSource::Table(SOURCE_STATUS_MAP),
)];

const MODEL_STATUS: &[CommandDef] = &[query(
    "Query current model code",
    ResponseSource::ModelStatus,
)];

/// All command groups, in resolution priority order.
pub(crate) const GROUPS: &[GroupDef] = &[
    group("power", b"PW", POWER),
    group("set_input", b"IP", SET_INPUT),
    group("test_pattern", b"TS", TEST_PATTERN),
    group("gamma", b"GT", GAMMA),
    group("gamma_value", b"GP", GAMMA_VALUE),
    group("off_timer", b"FUOT", OFF_TIMER),
    group("lamp_power", b"PMLP", LAMP_POWER),
    group("infrared_remote_code", b"SURC", INFRARED_REMOTE_CODE),
    group("trigger_output_set", b"FUTR", TRIGGER_OUTPUT_SET),
    group("clear_motion_drive", b"PMCM", CLEAR_MOTION_DRIVE),
    group("anamorphic", b"INVS", ANAMORPHIC),
    model_group("picture_mode_v1", b"PMPM", PICTURE_MODE_V1, PICTURE_MODE_V1_MODELS),
    model_group("picture_mode_v2", b"PMPM", PICTURE_MODE_V2, PICTURE_MODE_V2_MODELS),
    model_group("picture_mode_v3", b"PMPM", PICTURE_MODE_V3, PICTURE_MODE_V3_MODELS),
    group("colour_profile", b"PMPR", COLOUR_PROFILE),
    group("3d_format", b"IS3D", G_3D_FORMAT),
    group("2d_to_3d_conversion", b"IS3C", G_2D_TO_3D_CONVERSION),
    group("3d_subtitle_correction", b"IS3T", G_3D_SUBTITLE_CORRECTION),
    group("lens_memory", b"INM", LENS_MEMORY),
    group("test_command", b"\x01\x00", TEST_COMMAND),
    group("remote_control", b"RC73", REMOTE_CONTROL),
    status_group("power_status", b"PW", POWER_STATUS, 1),
    status_group("input_status", b"IP", INPUT_STATUS, 1),
    status_group("gamma_table_status", b"GT", GAMMA_TABLE_STATUS, 1),
    status_group("gamma_value_status", b"GP", GAMMA_VALUE_STATUS, 1),
    status_group("source_status", b"SC", SOURCE_STATUS, 1),
    status_group("model_status", b"MD", MODEL_STATUS, 14),
];
