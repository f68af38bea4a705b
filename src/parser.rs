use crate::error::{Result, VastError};
use crate::extension;
use crate::models::*;
use log::{debug, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::str::from_utf8;

pub(crate) type XmlReader<'a> = Reader<&'a [u8]>;

/// Parse a VAST XML string into a Vast struct
pub fn parse_vast(xml: &str) -> Result<Vast> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    // Look for the VAST element
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"VAST" => {
                return parse_vast_element(&mut reader, &e, false);
            }
            Event::Empty(e) if e.name().as_ref() == b"VAST" => {
                return parse_vast_element(&mut reader, &e, true);
            }
            Event::Eof => return Err(VastError::MissingField("VAST".to_string())),
            _ => (),
        }
    }
}

fn parse_vast_element<'a>(
    reader: &mut XmlReader<'a>,
    start: &BytesStart<'a>,
    empty: bool,
) -> Result<Vast> {
    let attrs = Attrs::read(start)?;
    let mut vast = Vast {
        version: attrs.string("version").unwrap_or_default(),
        ads: Vec::new(),
        errors: Vec::new(),
    };

    if vast.version.is_empty() {
        warn!("VAST element has no version attribute");
    }

    if empty {
        return Ok(vast);
    }

    while let Some((e, empty)) = next_child(reader, b"VAST")? {
        match e.name().as_ref() {
            b"Ad" => vast.ads.push(parse_ad_element(reader, &e, empty)?),
            b"Error" => vast.errors.push(read_cdata(reader, empty)?),
            _ => skip_element(reader, &e, empty)?,
        }
    }

    debug!("Parsed VAST {} with {} ads", vast.version, vast.ads.len());
    Ok(vast)
}

/// Parse a single Ad element
fn parse_ad_element<'a>(reader: &mut XmlReader<'a>, start: &BytesStart<'a>, empty: bool) -> Result<Ad> {
    let attrs = Attrs::read(start)?;
    let mut ad = Ad {
        id: attrs.string("id"),
        sequence: attrs.number("sequence"),
        body: None,
    };

    if empty {
        return Ok(ad);
    }

    // Parse InLine or Wrapper; a Wrapper takes precedence when both are present
    while let Some((e, empty)) = next_child(reader, b"Ad")? {
        match e.name().as_ref() {
            b"InLine" => {
                let inline = parse_inline_element(reader, empty)?;
                match ad.body {
                    Some(AdBody::Wrapper(_)) => warn!("Ad {:?} has both InLine and Wrapper, keeping Wrapper", ad.id),
                    _ => ad.body = Some(AdBody::InLine(inline)),
                }
            }
            b"Wrapper" => {
                let wrapper = parse_wrapper_element(reader, &e, empty)?;
                if matches!(ad.body, Some(AdBody::InLine(_))) {
                    warn!("Ad {:?} has both InLine and Wrapper, keeping Wrapper", ad.id);
                }
                ad.body = Some(AdBody::Wrapper(wrapper));
            }
            _ => skip_element(reader, &e, empty)?,
        }
    }

    Ok(ad)
}

/// Parse an InLine element
fn parse_inline_element(reader: &mut XmlReader, empty: bool) -> Result<InLine> {
    let mut inline = InLine::default();
    if empty {
        return Ok(inline);
    }

    while let Some((e, empty)) = next_child(reader, b"InLine")? {
        match e.name().as_ref() {
            b"AdSystem" => inline.ad_system = Some(parse_ad_system(reader, &e, empty)?),
            b"AdTitle" => inline.ad_title = read_cdata(reader, empty)?,
            b"Impression" => inline.impressions.push(parse_impression(reader, &e, empty)?),
            b"ViewableImpression" => {
                if !empty {
                    inline.viewable_impressions = parse_viewables(reader)?;
                }
            }
            b"Creatives" => {
                if !empty {
                    inline.creatives = parse_creatives(reader)?;
                }
            }
            b"Description" => inline.description = Some(read_cdata(reader, empty)?),
            b"Advertiser" => inline.advertiser = Some(read_element_text(reader, empty)?),
            b"Survey" => inline.survey = Some(read_cdata(reader, empty)?),
            b"Error" => inline.errors.push(read_cdata(reader, empty)?),
            b"Pricing" => inline.pricing = Some(parse_pricing(reader, &e, empty)?),
            b"Extensions" => {
                if !empty {
                    inline.extensions = parse_extensions(reader)?;
                }
            }
            _ => skip_element(reader, &e, empty)?,
        }
    }

    Ok(inline)
}

/// Parse a Wrapper element
fn parse_wrapper_element<'a>(reader: &mut XmlReader<'a>, start: &BytesStart<'a>, empty: bool) -> Result<Wrapper> {
    let attrs = Attrs::read(start)?;
    let mut wrapper = Wrapper {
        fallback_on_no_ad: attrs.flag("fallbackOnNoAd"),
        allow_multiple_ads: attrs.flag("allowMultipleAds"),
        follow_additional_wrappers: attrs.flag("followAdditionalWrappers"),
        ..Wrapper::default()
    };
    if empty {
        return Ok(wrapper);
    }

    while let Some((e, empty)) = next_child(reader, b"Wrapper")? {
        match e.name().as_ref() {
            b"AdSystem" => wrapper.ad_system = Some(parse_ad_system(reader, &e, empty)?),
            b"VASTAdTagURI" => wrapper.vast_ad_tag_uri = read_cdata(reader, empty)?,
            b"Impression" => wrapper.impressions.push(parse_impression(reader, &e, empty)?),
            b"ViewableImpression" => {
                if !empty {
                    wrapper.viewable_impressions = parse_viewables(reader)?;
                }
            }
            b"Error" => wrapper.errors.push(read_cdata(reader, empty)?),
            b"Creatives" => {
                if !empty {
                    wrapper.creatives = parse_creative_wrappers(reader)?;
                }
            }
            b"Extensions" => {
                if !empty {
                    wrapper.extensions = parse_extensions(reader)?;
                }
            }
            _ => skip_element(reader, &e, empty)?,
        }
    }

    Ok(wrapper)
}

/// Attributes of a start tag, read once and looked up by name
pub(crate) struct Attrs {
    items: Vec<(String, String)>,
}

impl Attrs {
    pub(crate) fn read(start: &BytesStart) -> Result<Self> {
        let mut items = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = from_utf8(attr.key.as_ref())?.to_string();
            let value = attr.unescape_value()?.into_owned();
            items.push((key, value));
        }
        Ok(Attrs { items })
    }

    pub(crate) fn get(&self, key: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn string(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }

    /// Numeric attribute; values that do not parse are ignored
    pub(crate) fn number(&self, key: &str) -> Option<u32> {
        self.get(key).and_then(|v| v.trim().parse::<u32>().ok())
    }

    pub(crate) fn flag(&self, key: &str) -> Option<bool> {
        match self.get(key).map(str::trim) {
            Some("true") | Some("1") => Some(true),
            Some("false") | Some("0") => Some(false),
            _ => None,
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Read the next child element of `parent`.
///
/// Returns the start tag and whether it was self-closing, or `None` once the
/// parent's end tag is reached.
pub(crate) fn next_child<'a>(
    reader: &mut XmlReader<'a>,
    parent: &[u8],
) -> Result<Option<(BytesStart<'a>, bool)>> {
    loop {
        match reader.read_event()? {
            Event::Start(e) => return Ok(Some((e, false))),
            Event::Empty(e) => return Ok(Some((e, true))),
            Event::End(e) if e.name().as_ref() == parent => return Ok(None),
            Event::Eof => return Err(unexpected_eof(parent)),
            _ => (),
        }
    }
}

fn unexpected_eof(parent: &[u8]) -> VastError {
    VastError::Other(format!(
        "Unexpected end of file inside <{}>",
        String::from_utf8_lossy(parent)
    ))
}

/// Helper function to read the text content of an XML element, from text nodes
/// and CDATA sections alike
pub(crate) fn read_element_text(reader: &mut XmlReader, empty: bool) -> Result<String> {
    let mut text = String::new();
    if empty {
        return Ok(text);
    }

    loop {
        match reader.read_event()? {
            Event::Text(e) => text.push_str(&e.unescape()?),
            Event::CData(e) => text.push_str(from_utf8(&e)?),
            Event::Start(e) => {
                // nested markup is not part of the text value
                reader.read_to_end(e.name())?;
            }
            Event::End(_) => break,
            Event::Eof => return Err(unexpected_eof(b"text")),
            _ => (),
        }
    }

    Ok(text)
}

fn read_cdata(reader: &mut XmlReader, empty: bool) -> Result<CdataString> {
    read_element_text(reader, empty).map(CdataString)
}

/// Helper function to skip an XML element and all its children
pub(crate) fn skip_element(reader: &mut XmlReader, start: &BytesStart, empty: bool) -> Result<()> {
    if !empty {
        debug!("Skipping <{}>", String::from_utf8_lossy(start.name().as_ref()));
        reader.read_to_end(start.name())?;
    }
    Ok(())
}

/// Parse AdSystem element
fn parse_ad_system<'a>(reader: &mut XmlReader<'a>, start: &BytesStart<'a>, empty: bool) -> Result<AdSystem> {
    let attrs = Attrs::read(start)?;
    Ok(AdSystem {
        version: attrs.string("version"),
        name: read_element_text(reader, empty)?,
    })
}

/// Parse Impression element
fn parse_impression<'a>(reader: &mut XmlReader<'a>, start: &BytesStart<'a>, empty: bool) -> Result<Impression> {
    let attrs = Attrs::read(start)?;
    Ok(Impression {
        id: attrs.string("id"),
        uri: read_element_text(reader, empty)?,
    })
}

/// Parse the Viewable children of a ViewableImpression element
fn parse_viewables(reader: &mut XmlReader) -> Result<Vec<Viewable>> {
    let mut viewables = Vec::new();
    while let Some((e, empty)) = next_child(reader, b"ViewableImpression")? {
        match e.name().as_ref() {
            b"Viewable" => {
                let attrs = Attrs::read(&e)?;
                viewables.push(Viewable {
                    id: attrs.string("id"),
                    uri: read_element_text(reader, empty)?,
                });
            }
            _ => skip_element(reader, &e, empty)?,
        }
    }
    Ok(viewables)
}

/// Parse Pricing element
fn parse_pricing<'a>(reader: &mut XmlReader<'a>, start: &BytesStart<'a>, empty: bool) -> Result<Pricing> {
    let attrs = Attrs::read(start)?;
    Ok(Pricing {
        model: attrs.string("model").unwrap_or_default(),
        currency: attrs.string("currency").unwrap_or_default(),
        value: read_element_text(reader, empty)?,
    })
}

/// Parse Extensions element
fn parse_extensions(reader: &mut XmlReader) -> Result<Vec<Extension>> {
    let mut extensions = Vec::new();
    while let Some((e, empty)) = next_child(reader, b"Extensions")? {
        match e.name().as_ref() {
            b"Extension" => extensions.push(extension::parse_extension(reader, &e, empty)?),
            _ => skip_element(reader, &e, empty)?,
        }
    }
    Ok(extensions)
}

/// Parse Creatives element
fn parse_creatives(reader: &mut XmlReader) -> Result<Vec<Creative>> {
    let mut creatives = Vec::new();
    while let Some((e, empty)) = next_child(reader, b"Creatives")? {
        match e.name().as_ref() {
            b"Creative" => creatives.push(parse_creative(reader, &e, empty)?),
            _ => skip_element(reader, &e, empty)?,
        }
    }
    Ok(creatives)
}

/// Rank of a creative payload when an element carries more than one
fn creative_rank(name: &[u8]) -> u8 {
    match name {
        b"Linear" => 3,
        b"NonLinearAds" => 2,
        b"CompanionAds" => 1,
        _ => 0,
    }
}

/// Parse Creative element
fn parse_creative<'a>(reader: &mut XmlReader<'a>, start: &BytesStart<'a>, empty: bool) -> Result<Creative> {
    let attrs = Attrs::read(start)?;
    let mut creative = Creative {
        id: attrs.string("id"),
        sequence: attrs.number("sequence"),
        ad_id: attrs.string("AdID").or_else(|| attrs.string("adId")),
        api_framework: attrs.string("apiFramework"),
        body: None,
    };
    if empty {
        return Ok(creative);
    }

    let mut rank = 0;
    while let Some((e, empty)) = next_child(reader, b"Creative")? {
        let body = match e.name().as_ref() {
            b"Linear" => CreativeBody::Linear(parse_linear(reader, &e, empty)?),
            b"CompanionAds" => CreativeBody::CompanionAds(parse_companion_ads(reader, &e, empty)?),
            b"NonLinearAds" => CreativeBody::NonLinearAds(parse_non_linear_ads(reader, empty)?),
            _ => {
                skip_element(reader, &e, empty)?;
                continue;
            }
        };

        let next_rank = creative_rank(e.name().as_ref());
        if next_rank > rank {
            if rank > 0 {
                warn!("Creative {:?} has more than one payload", creative.id);
            }
            rank = next_rank;
            creative.body = Some(body);
        }
    }

    Ok(creative)
}

/// Parse the Creatives element of a Wrapper
fn parse_creative_wrappers(reader: &mut XmlReader) -> Result<Vec<CreativeWrapper>> {
    let mut creatives = Vec::new();
    while let Some((e, empty)) = next_child(reader, b"Creatives")? {
        match e.name().as_ref() {
            b"Creative" => creatives.push(parse_creative_wrapper(reader, &e, empty)?),
            _ => skip_element(reader, &e, empty)?,
        }
    }
    Ok(creatives)
}

fn parse_creative_wrapper<'a>(
    reader: &mut XmlReader<'a>,
    start: &BytesStart<'a>,
    empty: bool,
) -> Result<CreativeWrapper> {
    let attrs = Attrs::read(start)?;
    let mut creative = CreativeWrapper {
        id: attrs.string("id"),
        sequence: attrs.number("sequence"),
        ad_id: attrs.string("AdID").or_else(|| attrs.string("adId")),
        body: None,
    };
    if empty {
        return Ok(creative);
    }

    let mut rank = 0;
    while let Some((e, empty)) = next_child(reader, b"Creative")? {
        let body = match e.name().as_ref() {
            b"Linear" => CreativeWrapperBody::Linear(parse_linear_wrapper(reader, empty)?),
            b"CompanionAds" => {
                CreativeWrapperBody::CompanionAds(parse_companion_ads(reader, &e, empty)?)
            }
            b"NonLinearAds" => {
                CreativeWrapperBody::NonLinearAds(parse_non_linear_ads_wrapper(reader, empty)?)
            }
            _ => {
                skip_element(reader, &e, empty)?;
                continue;
            }
        };

        let next_rank = creative_rank(e.name().as_ref());
        if next_rank > rank {
            rank = next_rank;
            creative.body = Some(body);
        }
    }

    Ok(creative)
}

/// Parse Linear element
fn parse_linear<'a>(reader: &mut XmlReader<'a>, start: &BytesStart<'a>, empty: bool) -> Result<Linear> {
    let attrs = Attrs::read(start)?;
    let mut linear = Linear {
        skip_offset: attrs.string("skipoffset").map(Offset),
        ..Linear::default()
    };
    if empty {
        return Ok(linear);
    }

    while let Some((e, empty)) = next_child(reader, b"Linear")? {
        match e.name().as_ref() {
            b"Duration" => linear.duration = Duration(read_element_text(reader, empty)?),
            b"AdParameters" => linear.ad_parameters = Some(parse_ad_parameters(reader, &e, empty)?),
            b"Icons" => linear.icons = parse_icons(reader, empty)?,
            b"TrackingEvents" => {
                if !empty {
                    linear.tracking_events = parse_tracking_events(reader, b"TrackingEvents")?;
                }
            }
            b"VideoClicks" => linear.video_clicks = Some(parse_video_clicks(reader, empty)?),
            b"MediaFiles" => {
                if !empty {
                    linear.media_files = parse_media_files(reader)?;
                }
            }
            _ => skip_element(reader, &e, empty)?,
        }
    }

    Ok(linear)
}

fn parse_linear_wrapper(reader: &mut XmlReader, empty: bool) -> Result<LinearWrapper> {
    let mut linear = LinearWrapper::default();
    if empty {
        return Ok(linear);
    }

    while let Some((e, empty)) = next_child(reader, b"Linear")? {
        match e.name().as_ref() {
            b"Icons" => linear.icons = parse_icons(reader, empty)?,
            b"TrackingEvents" => {
                if !empty {
                    linear.tracking_events = parse_tracking_events(reader, b"TrackingEvents")?;
                }
            }
            b"VideoClicks" => linear.video_clicks = Some(parse_video_clicks(reader, empty)?),
            _ => skip_element(reader, &e, empty)?,
        }
    }

    Ok(linear)
}

/// Parse MediaFiles element
fn parse_media_files(reader: &mut XmlReader) -> Result<Vec<MediaFile>> {
    let mut media_files = Vec::new();
    while let Some((e, empty)) = next_child(reader, b"MediaFiles")? {
        match e.name().as_ref() {
            b"MediaFile" => media_files.push(parse_media_file(reader, &e, empty)?),
            _ => skip_element(reader, &e, empty)?,
        }
    }
    Ok(media_files)
}

/// Parse MediaFile element
fn parse_media_file<'a>(reader: &mut XmlReader<'a>, start: &BytesStart<'a>, empty: bool) -> Result<MediaFile> {
    let attrs = Attrs::read(start)?;

    let bitrate = match (attrs.number("bitrate"), attrs.number("minBitrate"), attrs.number("maxBitrate")) {
        (Some(bitrate), _, _) => Some(Bitrate::Fixed(bitrate)),
        (None, None, None) => None,
        (None, min, max) => Some(Bitrate::Adaptive {
            min: min.unwrap_or_default(),
            max: max.unwrap_or_default(),
        }),
    };

    Ok(MediaFile {
        id: attrs.string("id"),
        delivery: attrs.string("delivery").unwrap_or_default(),
        mime_type: attrs.string("type").unwrap_or_default(),
        codec: attrs.string("codec"),
        bitrate,
        width: attrs.number("width").unwrap_or_default(),
        height: attrs.number("height").unwrap_or_default(),
        scalable: attrs.flag("scalable"),
        maintain_aspect_ratio: attrs.flag("maintainAspectRatio"),
        api_framework: attrs.string("apiFramework"),
        uri: read_element_text(reader, empty)?,
    })
}

/// Parse VideoClicks element
fn parse_video_clicks(reader: &mut XmlReader, empty: bool) -> Result<VideoClicks> {
    let mut video_clicks = VideoClicks::default();
    if empty {
        return Ok(video_clicks);
    }

    while let Some((e, empty)) = next_child(reader, b"VideoClicks")? {
        let list = match e.name().as_ref() {
            b"ClickThrough" => &mut video_clicks.click_throughs,
            b"ClickTracking" => &mut video_clicks.click_trackings,
            b"CustomClick" => &mut video_clicks.custom_clicks,
            _ => {
                skip_element(reader, &e, empty)?;
                continue;
            }
        };
        let attrs = Attrs::read(&e)?;
        list.push(VideoClick {
            id: attrs.string("id"),
            uri: read_element_text(reader, empty)?,
        });
    }

    Ok(video_clicks)
}

/// Parse a list of Tracking elements up to the end of `parent`
pub(crate) fn parse_tracking_events(reader: &mut XmlReader, parent: &[u8]) -> Result<Vec<Tracking>> {
    let mut tracking_events = Vec::new();
    while let Some((e, empty)) = next_child(reader, parent)? {
        match e.name().as_ref() {
            b"Tracking" => tracking_events.push(parse_tracking_event(reader, &e, empty)?),
            _ => skip_element(reader, &e, empty)?,
        }
    }
    Ok(tracking_events)
}

/// Parse Tracking element
fn parse_tracking_event<'a>(reader: &mut XmlReader<'a>, start: &BytesStart<'a>, empty: bool) -> Result<Tracking> {
    let attrs = Attrs::read(start)?;
    Ok(Tracking {
        event: attrs.string("event").unwrap_or_default(),
        offset: attrs.string("offset").map(Offset),
        uri: read_element_text(reader, empty)?,
    })
}

fn parse_ad_parameters<'a>(reader: &mut XmlReader<'a>, start: &BytesStart<'a>, empty: bool) -> Result<AdParameters> {
    let attrs = Attrs::read(start)?;
    Ok(AdParameters {
        xml_encoded: attrs.flag("xmlEncoded").unwrap_or(false),
        parameters: read_element_text(reader, empty)?,
    })
}

/// Parse one of the StaticResource, IFrameResource or HTMLResource elements
fn parse_resource<'a>(
    reader: &mut XmlReader<'a>,
    start: &BytesStart<'a>,
    empty: bool,
) -> Result<Option<Resource>> {
    let attrs = Attrs::read(start)?;
    let resource = match start.name().as_ref() {
        b"StaticResource" => Resource::Static(StaticResource {
            creative_type: attrs.string("creativeType"),
            uri: read_element_text(reader, empty)?,
        }),
        b"IFrameResource" => Resource::IFrame(read_cdata(reader, empty)?),
        b"HTMLResource" => Resource::Html(HtmlResource {
            xml_encoded: attrs.flag("xmlEncoded").unwrap_or(false),
            html: read_element_text(reader, empty)?,
        }),
        _ => return Ok(None),
    };
    Ok(Some(resource))
}

fn is_resource(name: &[u8]) -> bool {
    matches!(name, b"StaticResource" | b"IFrameResource" | b"HTMLResource")
}

/// Parse CompanionAds element
fn parse_companion_ads<'a>(reader: &mut XmlReader<'a>, start: &BytesStart<'a>, empty: bool) -> Result<CompanionAds> {
    let attrs = Attrs::read(start)?;
    let mut companion_ads = CompanionAds {
        required: attrs.string("required"),
        companions: Vec::new(),
    };
    if empty {
        return Ok(companion_ads);
    }

    while let Some((e, empty)) = next_child(reader, b"CompanionAds")? {
        match e.name().as_ref() {
            b"Companion" => companion_ads.companions.push(parse_companion(reader, &e, empty)?),
            _ => skip_element(reader, &e, empty)?,
        }
    }

    Ok(companion_ads)
}

fn parse_companion<'a>(reader: &mut XmlReader<'a>, start: &BytesStart<'a>, empty: bool) -> Result<Companion> {
    let attrs = Attrs::read(start)?;
    let mut companion = Companion {
        id: attrs.string("id"),
        width: attrs.number("width").unwrap_or_default(),
        height: attrs.number("height").unwrap_or_default(),
        asset_width: attrs.number("assetWidth"),
        asset_height: attrs.number("assetHeight"),
        expanded_width: attrs.number("expandedWidth"),
        expanded_height: attrs.number("expandedHeight"),
        api_framework: attrs.string("apiFramework"),
        ad_slot_id: attrs.string("adSlotId"),
        ..Companion::default()
    };
    if empty {
        return Ok(companion);
    }

    while let Some((e, empty)) = next_child(reader, b"Companion")? {
        match e.name().as_ref() {
            b"CompanionClickThrough" => companion.click_through = Some(read_cdata(reader, empty)?),
            b"CompanionClickTracking" => companion.click_trackings.push(read_cdata(reader, empty)?),
            b"AltText" => companion.alt_text = Some(read_element_text(reader, empty)?),
            b"TrackingEvents" => {
                if !empty {
                    companion.tracking_events = parse_tracking_events(reader, b"TrackingEvents")?;
                }
            }
            b"AdParameters" => companion.ad_parameters = Some(parse_ad_parameters(reader, &e, empty)?),
            name if is_resource(name) => companion.resource = parse_resource(reader, &e, empty)?,
            _ => skip_element(reader, &e, empty)?,
        }
    }

    Ok(companion)
}

/// Parse NonLinearAds element
fn parse_non_linear_ads(reader: &mut XmlReader, empty: bool) -> Result<NonLinearAds> {
    let mut non_linear_ads = NonLinearAds::default();
    if empty {
        return Ok(non_linear_ads);
    }

    while let Some((e, empty)) = next_child(reader, b"NonLinearAds")? {
        match e.name().as_ref() {
            b"TrackingEvents" => {
                if !empty {
                    non_linear_ads.tracking_events = parse_tracking_events(reader, b"TrackingEvents")?;
                }
            }
            b"NonLinear" => non_linear_ads.non_linears.push(parse_non_linear(reader, &e, empty)?),
            _ => skip_element(reader, &e, empty)?,
        }
    }

    Ok(non_linear_ads)
}

fn parse_non_linear<'a>(reader: &mut XmlReader<'a>, start: &BytesStart<'a>, empty: bool) -> Result<NonLinear> {
    let attrs = Attrs::read(start)?;
    let mut non_linear = NonLinear {
        id: attrs.string("id"),
        width: attrs.number("width").unwrap_or_default(),
        height: attrs.number("height").unwrap_or_default(),
        expanded_width: attrs.number("expandedWidth"),
        expanded_height: attrs.number("expandedHeight"),
        scalable: attrs.flag("scalable"),
        maintain_aspect_ratio: attrs.flag("maintainAspectRatio"),
        min_suggested_duration: attrs.string("minSuggestedDuration").map(Duration),
        api_framework: attrs.string("apiFramework"),
        ..NonLinear::default()
    };
    if empty {
        return Ok(non_linear);
    }

    while let Some((e, empty)) = next_child(reader, b"NonLinear")? {
        match e.name().as_ref() {
            b"NonLinearClickTracking" => non_linear.click_trackings.push(read_cdata(reader, empty)?),
            b"NonLinearClickThrough" => non_linear.click_through = Some(read_cdata(reader, empty)?),
            b"AdParameters" => non_linear.ad_parameters = Some(parse_ad_parameters(reader, &e, empty)?),
            name if is_resource(name) => non_linear.resource = parse_resource(reader, &e, empty)?,
            _ => skip_element(reader, &e, empty)?,
        }
    }

    Ok(non_linear)
}

fn parse_non_linear_ads_wrapper(reader: &mut XmlReader, empty: bool) -> Result<NonLinearAdsWrapper> {
    let mut non_linear_ads = NonLinearAdsWrapper::default();
    if empty {
        return Ok(non_linear_ads);
    }

    while let Some((e, empty)) = next_child(reader, b"NonLinearAds")? {
        match e.name().as_ref() {
            b"TrackingEvents" => {
                if !empty {
                    non_linear_ads.tracking_events = parse_tracking_events(reader, b"TrackingEvents")?;
                }
            }
            b"NonLinear" => non_linear_ads
                .non_linears
                .push(parse_non_linear_wrapper(reader, &e, empty)?),
            _ => skip_element(reader, &e, empty)?,
        }
    }

    Ok(non_linear_ads)
}

fn parse_non_linear_wrapper<'a>(
    reader: &mut XmlReader<'a>,
    start: &BytesStart<'a>,
    empty: bool,
) -> Result<NonLinearWrapper> {
    let attrs = Attrs::read(start)?;
    let mut non_linear = NonLinearWrapper {
        id: attrs.string("id"),
        width: attrs.number("width").unwrap_or_default(),
        height: attrs.number("height").unwrap_or_default(),
        expanded_width: attrs.number("expandedWidth"),
        expanded_height: attrs.number("expandedHeight"),
        scalable: attrs.flag("scalable"),
        maintain_aspect_ratio: attrs.flag("maintainAspectRatio"),
        min_suggested_duration: attrs.string("minSuggestedDuration").map(Duration),
        api_framework: attrs.string("apiFramework"),
        ..NonLinearWrapper::default()
    };
    if empty {
        return Ok(non_linear);
    }

    while let Some((e, empty)) = next_child(reader, b"NonLinear")? {
        match e.name().as_ref() {
            b"TrackingEvents" => {
                if !empty {
                    non_linear.tracking_events = parse_tracking_events(reader, b"TrackingEvents")?;
                }
            }
            b"NonLinearClickTracking" => non_linear.click_trackings.push(read_cdata(reader, empty)?),
            _ => skip_element(reader, &e, empty)?,
        }
    }

    Ok(non_linear)
}

/// Parse Icons element
fn parse_icons(reader: &mut XmlReader, empty: bool) -> Result<Vec<Icon>> {
    let mut icons = Vec::new();
    if empty {
        return Ok(icons);
    }

    while let Some((e, empty)) = next_child(reader, b"Icons")? {
        match e.name().as_ref() {
            b"Icon" => icons.push(parse_icon(reader, &e, empty)?),
            _ => skip_element(reader, &e, empty)?,
        }
    }

    Ok(icons)
}

fn parse_icon<'a>(reader: &mut XmlReader<'a>, start: &BytesStart<'a>, empty: bool) -> Result<Icon> {
    let attrs = Attrs::read(start)?;
    let mut icon = Icon {
        program: attrs.string("program").unwrap_or_default(),
        width: attrs.number("width").unwrap_or_default(),
        height: attrs.number("height").unwrap_or_default(),
        x_position: attrs.string("xPosition").unwrap_or_default(),
        y_position: attrs.string("yPosition").unwrap_or_default(),
        offset: attrs.string("offset").map(Offset),
        duration: attrs.string("duration").map(Duration),
        api_framework: attrs.string("apiFramework"),
        ..Icon::default()
    };
    if empty {
        return Ok(icon);
    }

    while let Some((e, empty)) = next_child(reader, b"Icon")? {
        match e.name().as_ref() {
            b"IconClicks" => {
                if empty {
                    continue;
                }
                while let Some((click, empty)) = next_child(reader, b"IconClicks")? {
                    match click.name().as_ref() {
                        b"IconClickThrough" => icon.click_through = Some(read_cdata(reader, empty)?),
                        b"IconClickTracking" => icon.click_trackings.push(read_cdata(reader, empty)?),
                        _ => skip_element(reader, &click, empty)?,
                    }
                }
            }
            name if is_resource(name) => icon.resource = parse_resource(reader, &e, empty)?,
            _ => skip_element(reader, &e, empty)?,
        }
    }

    Ok(icon)
}
