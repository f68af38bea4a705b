use serde::{Deserialize, Serialize};
use std::fmt;

pub use crate::extension::{Extension, ExtensionPayload};

/// A string that is always written inside a CDATA section
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
pub struct CdataString(pub String);

impl CdataString {
    pub fn new(value: impl Into<String>) -> Self {
        CdataString(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for CdataString {
    fn from(value: &str) -> Self {
        CdataString(value.to_string())
    }
}

impl From<String> for CdataString {
    fn from(value: String) -> Self {
        CdataString(value)
    }
}

impl fmt::Display for CdataString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How an [`Offset`] is expressed on the wire
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum OffsetKind {
    /// `HH:MM:SS` or `HH:MM:SS.mmm`
    Absolute,
    /// `n%`
    Percent,
}

/// A time position within a creative, either a timestamp or a percentage.
///
/// The value is kept exactly as read so it round-trips unchanged.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
pub struct Offset(pub String);

impl Offset {
    pub fn new(value: impl Into<String>) -> Self {
        Offset(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> OffsetKind {
        if self.0.trim_end().ends_with('%') {
            OffsetKind::Percent
        } else {
            OffsetKind::Absolute
        }
    }
}

/// A duration in `HH:MM:SS[.mmm]` form, kept verbatim
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
pub struct Duration(pub String);

impl Duration {
    pub fn new(value: impl Into<String>) -> Self {
        Duration(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Represents a VAST document (Video Ad Serving Template)
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Vast {
    /// The VAST version (expected "2.0" or "3.0")
    pub version: String,

    /// The Ad elements within the VAST document, in document order
    pub ads: Vec<Ad>,

    /// URIs the player requests upon receiving a "no ad" response
    pub errors: Vec<CdataString>,
}

/// Represents an Ad within a VAST document
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Ad {
    /// The ad ID
    pub id: Option<String>,

    /// The ad sequence number (for ad pods)
    pub sequence: Option<u32>,

    /// The in-line or wrapper ad details. `None` only for malformed input, which
    /// validation rejects.
    pub body: Option<AdBody>,
}

/// The two mutually exclusive kinds of ad
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub enum AdBody {
    InLine(InLine),
    Wrapper(Wrapper),
}

impl Ad {
    pub fn inline(inline: InLine) -> Self {
        Ad {
            body: Some(AdBody::InLine(inline)),
            ..Ad::default()
        }
    }

    pub fn wrapper(wrapper: Wrapper) -> Self {
        Ad {
            body: Some(AdBody::Wrapper(wrapper)),
            ..Ad::default()
        }
    }

    pub fn as_inline(&self) -> Option<&InLine> {
        match &self.body {
            Some(AdBody::InLine(inline)) => Some(inline),
            _ => None,
        }
    }

    pub fn as_inline_mut(&mut self) -> Option<&mut InLine> {
        match &mut self.body {
            Some(AdBody::InLine(inline)) => Some(inline),
            _ => None,
        }
    }

    pub fn as_wrapper(&self) -> Option<&Wrapper> {
        match &self.body {
            Some(AdBody::Wrapper(wrapper)) => Some(wrapper),
            _ => None,
        }
    }

    pub fn as_wrapper_mut(&mut self) -> Option<&mut Wrapper> {
        match &mut self.body {
            Some(AdBody::Wrapper(wrapper)) => Some(wrapper),
            _ => None,
        }
    }
}

/// Represents an InLine ad, which contains all the media files and tracking information
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct InLine {
    /// The ad system name and version
    pub ad_system: Option<AdSystem>,

    /// The ad title
    pub ad_title: CdataString,

    /// Impression tracking URLs
    pub impressions: Vec<Impression>,

    /// MRC viewable impression URLs
    pub viewable_impressions: Vec<Viewable>,

    /// Creative elements
    pub creatives: Vec<Creative>,

    /// The description of the ad
    pub description: Option<CdataString>,

    /// The advertiser name
    pub advertiser: Option<String>,

    /// The survey URL
    pub survey: Option<CdataString>,

    /// Error tracking URLs
    pub errors: Vec<CdataString>,

    /// Pricing information
    pub pricing: Option<Pricing>,

    /// Extensions
    pub extensions: Vec<Extension>,
}

/// Represents a Wrapper ad, which references another VAST document
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Wrapper {
    /// The ad system name and version
    pub ad_system: Option<AdSystem>,

    /// The URL of the next VAST document
    pub vast_ad_tag_uri: CdataString,

    /// Impression tracking URLs
    pub impressions: Vec<Impression>,

    /// MRC viewable impression URLs
    pub viewable_impressions: Vec<Viewable>,

    /// Error tracking URLs
    pub errors: Vec<CdataString>,

    /// Creative elements carrying the wrapper's own trackers
    pub creatives: Vec<CreativeWrapper>,

    /// Extensions
    pub extensions: Vec<Extension>,

    pub fallback_on_no_ad: Option<bool>,
    pub allow_multiple_ads: Option<bool>,
    pub follow_additional_wrappers: Option<bool>,
}

/// Represents the ad system information
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct AdSystem {
    /// The ad system name
    pub name: String,

    /// The ad system version
    pub version: Option<String>,
}

/// Represents an impression tracking URL
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Impression {
    /// The impression ID
    pub id: Option<String>,

    /// The impression tracking URL
    pub uri: String,
}

impl Impression {
    pub fn new(uri: impl Into<String>) -> Self {
        Impression { id: None, uri: uri.into() }
    }
}

/// Represents a viewable impression URL inside `<ViewableImpression>`
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Viewable {
    pub id: Option<String>,
    pub uri: String,
}

impl Viewable {
    pub fn new(uri: impl Into<String>) -> Self {
        Viewable { id: None, uri: uri.into() }
    }
}

/// Represents pricing information
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Pricing {
    /// The pricing model (e.g., "cpm", "cpc", etc.)
    pub model: String,

    /// The ISO-4217 currency (e.g., "USD", "EUR", etc.)
    pub currency: String,

    /// The price value
    pub value: String,
}

/// Represents a creative element
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Creative {
    /// The creative ID
    pub id: Option<String>,

    /// The creative sequence number
    pub sequence: Option<u32>,

    /// The creative ad ID
    pub ad_id: Option<String>,

    /// The creative API framework
    pub api_framework: Option<String>,

    /// Linear, companion or non-linear payload
    pub body: Option<CreativeBody>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub enum CreativeBody {
    Linear(Linear),
    CompanionAds(CompanionAds),
    NonLinearAds(NonLinearAds),
}

impl Creative {
    pub fn linear(linear: Linear) -> Self {
        Creative {
            body: Some(CreativeBody::Linear(linear)),
            ..Creative::default()
        }
    }

    pub fn as_linear(&self) -> Option<&Linear> {
        match &self.body {
            Some(CreativeBody::Linear(linear)) => Some(linear),
            _ => None,
        }
    }

    pub fn as_linear_mut(&mut self) -> Option<&mut Linear> {
        match &mut self.body {
            Some(CreativeBody::Linear(linear)) => Some(linear),
            _ => None,
        }
    }
}

/// A creative inside a Wrapper, carrying only trackers for the wrapped ad
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct CreativeWrapper {
    pub id: Option<String>,
    pub sequence: Option<u32>,
    pub ad_id: Option<String>,
    pub body: Option<CreativeWrapperBody>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub enum CreativeWrapperBody {
    Linear(LinearWrapper),
    /// Companion ads carry the same fields in a wrapper as in an inline ad
    CompanionAds(CompanionAds),
    NonLinearAds(NonLinearAdsWrapper),
}

/// Represents a linear ad
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Linear {
    /// When the skip control may be shown
    pub skip_offset: Option<Offset>,

    /// The duration of the ad
    pub duration: Duration,

    pub ad_parameters: Option<AdParameters>,

    /// Industry icons such as AdChoices
    pub icons: Vec<Icon>,

    /// Tracking events
    pub tracking_events: Vec<Tracking>,

    /// Video clicks
    pub video_clicks: Option<VideoClicks>,

    /// Media files
    pub media_files: Vec<MediaFile>,
}

/// A linear creative inside a Wrapper
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct LinearWrapper {
    pub icons: Vec<Icon>,
    pub tracking_events: Vec<Tracking>,
    pub video_clicks: Option<VideoClicks>,
}

/// Progressive-download delivery of a media file
pub const DELIVERY_PROGRESSIVE: &str = "progressive";

/// Represents a media file
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct MediaFile {
    /// The media file ID
    pub id: Option<String>,

    /// The media file delivery type ("progressive" or "streaming")
    pub delivery: String,

    /// The media file MIME type
    pub mime_type: String,

    /// The media file codec
    pub codec: Option<String>,

    /// The media file bitrate in Kbps
    pub bitrate: Option<Bitrate>,

    /// The media file width
    pub width: u32,

    /// The media file height
    pub height: u32,

    pub scalable: Option<bool>,
    pub maintain_aspect_ratio: Option<bool>,

    /// The API framework for interactive media
    pub api_framework: Option<String>,

    /// The media file URL
    pub uri: String,
}

/// Bitrate of an encoded media file, in Kbps
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub enum Bitrate {
    Fixed(u32),
    Adaptive { min: u32, max: u32 },
}

/// Represents video click-through, click-tracking and custom click URLs
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct VideoClicks {
    pub click_throughs: Vec<VideoClick>,
    pub click_trackings: Vec<VideoClick>,
    pub custom_clicks: Vec<VideoClick>,
}

/// A click URL for a linear creative
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct VideoClick {
    pub id: Option<String>,
    pub uri: String,
}

impl VideoClick {
    pub fn new(uri: impl Into<String>) -> Self {
        VideoClick { id: None, uri: uri.into() }
    }
}

/// Represents a tracking event
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Tracking {
    /// The event type (e.g., "start", "firstQuartile", "midpoint", "thirdQuartile", "complete", etc.)
    pub event: String,

    /// The time at which the URL is pinged, required for "progress"
    pub offset: Option<Offset>,

    /// The tracking URL
    pub uri: String,
}

impl Tracking {
    pub fn new(event: impl Into<String>, uri: impl Into<String>) -> Self {
        Tracking {
            event: event.into(),
            offset: None,
            uri: uri.into(),
        }
    }
}

/// Represents companion ads
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct CompanionAds {
    /// Which companions must be shown: "all", "any" or "none"
    pub required: Option<String>,

    /// The companion ads
    pub companions: Vec<Companion>,
}

/// Represents a companion ad
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Companion {
    /// The companion ID
    pub id: Option<String>,

    /// Pixel dimensions of the companion slot
    pub width: u32,
    pub height: u32,

    /// Pixel dimensions of the companion asset
    pub asset_width: Option<u32>,
    pub asset_height: Option<u32>,

    /// Pixel dimensions in the expanded state
    pub expanded_width: Option<u32>,
    pub expanded_height: Option<u32>,

    pub api_framework: Option<String>,

    /// Used to match the companion to publisher placement areas
    pub ad_slot_id: Option<String>,

    /// The companion click-through URL
    pub click_through: Option<CdataString>,

    /// URLs pinged when the companion is clicked
    pub click_trackings: Vec<CdataString>,

    pub alt_text: Option<String>,

    /// Companion tracking events
    pub tracking_events: Vec<Tracking>,

    pub ad_parameters: Option<AdParameters>,

    /// The static, HTML or iframe payload
    pub resource: Option<Resource>,
}

/// Represents non-linear ads
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct NonLinearAds {
    pub tracking_events: Vec<Tracking>,

    /// The non-linear ads
    pub non_linears: Vec<NonLinear>,
}

/// Non-linear ads inside a Wrapper
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct NonLinearAdsWrapper {
    pub tracking_events: Vec<Tracking>,
    pub non_linears: Vec<NonLinearWrapper>,
}

/// Represents a non-linear ad
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct NonLinear {
    /// The non-linear ID
    pub id: Option<String>,

    /// The non-linear width
    pub width: u32,

    /// The non-linear height
    pub height: u32,

    /// The non-linear expanded width
    pub expanded_width: Option<u32>,

    /// The non-linear expanded height
    pub expanded_height: Option<u32>,

    /// The non-linear scalable flag
    pub scalable: Option<bool>,

    /// The non-linear maintain aspect ratio flag
    pub maintain_aspect_ratio: Option<bool>,

    /// Suggested display time, typically for an animation to complete
    pub min_suggested_duration: Option<Duration>,

    pub api_framework: Option<String>,

    /// URLs pinged when the ad is clicked
    pub click_trackings: Vec<CdataString>,

    /// The non-linear click-through URL
    pub click_through: Option<CdataString>,

    pub ad_parameters: Option<AdParameters>,

    /// The static, HTML or iframe payload
    pub resource: Option<Resource>,
}

/// A non-linear ad inside a Wrapper
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct NonLinearWrapper {
    pub id: Option<String>,
    pub width: u32,
    pub height: u32,
    pub expanded_width: Option<u32>,
    pub expanded_height: Option<u32>,
    pub scalable: Option<bool>,
    pub maintain_aspect_ratio: Option<bool>,
    pub min_suggested_duration: Option<Duration>,
    pub api_framework: Option<String>,
    pub tracking_events: Vec<Tracking>,
    pub click_trackings: Vec<CdataString>,
}

/// Icon for advertising industry initiatives like AdChoices
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Icon {
    /// The industry initiative the icon supports
    pub program: String,

    pub width: u32,
    pub height: u32,

    /// Pixels, or "left"/"right"
    pub x_position: String,

    /// Pixels, or "top"/"bottom"
    pub y_position: String,

    pub offset: Option<Offset>,
    pub duration: Option<Duration>,
    pub api_framework: Option<String>,
    pub click_through: Option<CdataString>,
    pub click_trackings: Vec<CdataString>,
    pub resource: Option<Resource>,
}

/// The payload of a companion, non-linear or icon creative
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub enum Resource {
    /// URL to a static file, such as an image
    Static(StaticResource),
    /// URL source for an iframe
    IFrame(CdataString),
    /// Inline HTML
    Html(HtmlResource),
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct StaticResource {
    /// MIME type of the static resource
    pub creative_type: Option<String>,
    pub uri: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct HtmlResource {
    pub xml_encoded: bool,
    pub html: String,
}

/// Arbitrary data passed to the creative
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct AdParameters {
    pub xml_encoded: bool,
    pub parameters: String,
}

/// Entries that are nothing more than a URI plus optional attributes
pub(crate) trait UriEntry {
    fn uri(&self) -> &str;
    fn uri_mut(&mut self) -> &mut String;
}

macro_rules! uri_entry {
    ($($ty:ty => $field:tt),* $(,)?) => {
        $(
            impl UriEntry for $ty {
                fn uri(&self) -> &str {
                    &self.$field
                }

                fn uri_mut(&mut self) -> &mut String {
                    &mut self.$field
                }
            }
        )*
    };
}

uri_entry! {
    CdataString => 0,
    Impression => uri,
    Viewable => uri,
    VideoClick => uri,
    Tracking => uri,
    MediaFile => uri,
}
