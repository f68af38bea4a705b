//! Tracking-event vocabulary and the lookup tables built on it.

pub const TRACK_IMPRESSION: &str = "impression";
pub const TRACK_CLICK: &str = "click";
pub const TRACK_START: &str = "start";
pub const TRACK_FIRST_QUARTILE: &str = "firstQuartile";
pub const TRACK_MIDPOINT: &str = "midpoint";
pub const TRACK_THIRD_QUARTILE: &str = "thirdQuartile";
pub const TRACK_COMPLETE: &str = "complete";
pub const TRACK_MUTE: &str = "mute";
pub const TRACK_UNMUTE: &str = "unmute";
pub const TRACK_PAUSE: &str = "pause";
pub const TRACK_REWIND: &str = "rewind";
pub const TRACK_RESUME: &str = "resume";
pub const TRACK_FULLSCREEN: &str = "fullscreen";
pub const TRACK_EXPAND: &str = "expand";
pub const TRACK_COLLAPSE: &str = "collapse";
pub const TRACK_CLOSE: &str = "close";
pub const TRACK_VIEWABLE: &str = "viewable";

/// Every tracking event name, in player lifecycle order
pub static TRACKING_EVENTS: [&str; 17] = [
    TRACK_IMPRESSION,
    TRACK_CLICK,
    TRACK_START,
    TRACK_FIRST_QUARTILE,
    TRACK_MIDPOINT,
    TRACK_THIRD_QUARTILE,
    TRACK_COMPLETE,
    TRACK_MUTE,
    TRACK_UNMUTE,
    TRACK_PAUSE,
    TRACK_REWIND,
    TRACK_RESUME,
    TRACK_FULLSCREEN,
    TRACK_EXPAND,
    TRACK_COLLAPSE,
    TRACK_CLOSE,
    TRACK_VIEWABLE,
];

/// Short names used by vendor trackers for the player events they report
static VENDOR_ALIASES: [(&str, &str); 15] = [
    (TRACK_CLICK, TRACK_CLICK),
    (TRACK_START, TRACK_START),
    (TRACK_FIRST_QUARTILE, "q1"),
    (TRACK_MIDPOINT, "q2"),
    (TRACK_THIRD_QUARTILE, "q3"),
    (TRACK_COMPLETE, "end"),
    (TRACK_MUTE, TRACK_MUTE),
    (TRACK_UNMUTE, TRACK_UNMUTE),
    (TRACK_PAUSE, TRACK_PAUSE),
    (TRACK_REWIND, TRACK_REWIND),
    (TRACK_RESUME, TRACK_RESUME),
    (TRACK_FULLSCREEN, TRACK_FULLSCREEN),
    (TRACK_EXPAND, TRACK_EXPAND),
    (TRACK_COLLAPSE, TRACK_COLLAPSE),
    (TRACK_CLOSE, TRACK_CLOSE),
];

/// Container short names and their MIME types
static MIME_TYPES: [(&str, &str); 3] = [
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    ("mpg", "video/mpeg"),
];

/// The vendor alias of a tracking event, `None` for events vendors don't report
pub fn vendor_alias(event: &str) -> Option<&'static str> {
    VENDOR_ALIASES
        .iter()
        .find(|(name, _)| *name == event)
        .map(|(_, alias)| *alias)
}

/// The MIME type for a container short name such as `mp4`
pub fn mime_type(format: &str) -> Option<&'static str> {
    MIME_TYPES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(format))
        .map(|(_, mime)| *mime)
}
