use crate::error::Result;
use crate::extension;
use crate::models::*;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

pub(crate) type XmlWriter = Writer<Vec<u8>>;

/// Serialize a VAST document to compact XML
pub fn to_xml(vast: &Vast) -> Result<String> {
    render(vast, false)
}

/// Serialize a VAST document to XML indented by two spaces
pub fn to_xml_pretty(vast: &Vast) -> Result<String> {
    render(vast, true)
}

impl Vast {
    pub fn to_xml(&self) -> Result<String> {
        to_xml(self)
    }
}

pub(crate) fn new_writer(pretty: bool) -> XmlWriter {
    if pretty {
        Writer::new_with_indent(Vec::new(), b' ', 2)
    } else {
        Writer::new(Vec::new())
    }
}

fn render(vast: &Vast, pretty: bool) -> Result<String> {
    let mut w = new_writer(pretty);
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_vast(&mut w, vast)?;

    let bytes = w.into_inner();
    Ok(String::from_utf8(bytes).map_err(|e| e.utf8_error())?)
}

fn write_vast(w: &mut XmlWriter, vast: &Vast) -> Result<()> {
    let mut start = BytesStart::new("VAST");
    push_str(&mut start, "version", Some(vast.version.as_str()));
    open(w, start)?;

    for ad in &vast.ads {
        write_ad(w, ad)?;
    }
    for error in &vast.errors {
        write_cdata(w, BytesStart::new("Error"), error.as_str())?;
    }

    close(w, "VAST")
}

fn write_ad(w: &mut XmlWriter, ad: &Ad) -> Result<()> {
    let mut start = BytesStart::new("Ad");
    push_str(&mut start, "id", ad.id.as_deref());
    push_num(&mut start, "sequence", ad.sequence);
    open(w, start)?;

    match &ad.body {
        Some(AdBody::InLine(inline)) => write_inline(w, inline)?,
        Some(AdBody::Wrapper(wrapper)) => write_wrapper(w, wrapper)?,
        None => (),
    }

    close(w, "Ad")
}

fn write_inline(w: &mut XmlWriter, inline: &InLine) -> Result<()> {
    open(w, BytesStart::new("InLine"))?;

    if let Some(ad_system) = &inline.ad_system {
        write_ad_system(w, ad_system)?;
    }
    write_cdata(w, BytesStart::new("AdTitle"), inline.ad_title.as_str())?;
    write_impressions(w, &inline.impressions)?;
    write_viewables(w, &inline.viewable_impressions)?;

    if !inline.creatives.is_empty() {
        open(w, BytesStart::new("Creatives"))?;
        for creative in &inline.creatives {
            write_creative(w, creative)?;
        }
        close(w, "Creatives")?;
    }

    if let Some(description) = &inline.description {
        write_cdata(w, BytesStart::new("Description"), description.as_str())?;
    }
    if let Some(advertiser) = &inline.advertiser {
        write_text(w, BytesStart::new("Advertiser"), advertiser)?;
    }
    if let Some(survey) = &inline.survey {
        write_cdata(w, BytesStart::new("Survey"), survey.as_str())?;
    }
    for error in &inline.errors {
        write_cdata(w, BytesStart::new("Error"), error.as_str())?;
    }
    if let Some(pricing) = &inline.pricing {
        let mut start = BytesStart::new("Pricing");
        start.push_attribute(("model", pricing.model.as_str()));
        start.push_attribute(("currency", pricing.currency.as_str()));
        write_cdata(w, start, &pricing.value)?;
    }
    write_extensions(w, &inline.extensions)?;

    close(w, "InLine")
}

fn write_wrapper(w: &mut XmlWriter, wrapper: &Wrapper) -> Result<()> {
    let mut start = BytesStart::new("Wrapper");
    push_flag(&mut start, "fallbackOnNoAd", wrapper.fallback_on_no_ad);
    push_flag(&mut start, "allowMultipleAds", wrapper.allow_multiple_ads);
    push_flag(&mut start, "followAdditionalWrappers", wrapper.follow_additional_wrappers);
    open(w, start)?;

    if let Some(ad_system) = &wrapper.ad_system {
        write_ad_system(w, ad_system)?;
    }
    write_cdata(w, BytesStart::new("VASTAdTagURI"), wrapper.vast_ad_tag_uri.as_str())?;
    write_impressions(w, &wrapper.impressions)?;
    write_viewables(w, &wrapper.viewable_impressions)?;
    for error in &wrapper.errors {
        write_cdata(w, BytesStart::new("Error"), error.as_str())?;
    }

    if !wrapper.creatives.is_empty() {
        open(w, BytesStart::new("Creatives"))?;
        for creative in &wrapper.creatives {
            write_creative_wrapper(w, creative)?;
        }
        close(w, "Creatives")?;
    }
    write_extensions(w, &wrapper.extensions)?;

    close(w, "Wrapper")
}

fn write_ad_system(w: &mut XmlWriter, ad_system: &AdSystem) -> Result<()> {
    let mut start = BytesStart::new("AdSystem");
    push_str(&mut start, "version", ad_system.version.as_deref());
    write_cdata(w, start, &ad_system.name)
}

fn write_impressions(w: &mut XmlWriter, impressions: &[Impression]) -> Result<()> {
    for impression in impressions {
        let mut start = BytesStart::new("Impression");
        push_str(&mut start, "id", impression.id.as_deref());
        write_cdata(w, start, &impression.uri)?;
    }
    Ok(())
}

fn write_viewables(w: &mut XmlWriter, viewables: &[Viewable]) -> Result<()> {
    if viewables.is_empty() {
        return Ok(());
    }
    open(w, BytesStart::new("ViewableImpression"))?;
    for viewable in viewables {
        let mut start = BytesStart::new("Viewable");
        push_str(&mut start, "id", viewable.id.as_deref());
        write_cdata(w, start, &viewable.uri)?;
    }
    close(w, "ViewableImpression")
}

fn write_extensions(w: &mut XmlWriter, extensions: &[Extension]) -> Result<()> {
    if extensions.is_empty() {
        return Ok(());
    }
    open(w, BytesStart::new("Extensions"))?;
    for ext in extensions {
        extension::write_extension(w, ext)?;
    }
    close(w, "Extensions")
}

fn write_creative(w: &mut XmlWriter, creative: &Creative) -> Result<()> {
    let mut start = BytesStart::new("Creative");
    push_str(&mut start, "id", creative.id.as_deref());
    push_num(&mut start, "sequence", creative.sequence);
    push_str(&mut start, "AdID", creative.ad_id.as_deref());
    push_str(&mut start, "apiFramework", creative.api_framework.as_deref());
    open(w, start)?;

    match &creative.body {
        Some(CreativeBody::Linear(linear)) => write_linear(w, linear)?,
        Some(CreativeBody::CompanionAds(companion_ads)) => write_companion_ads(w, companion_ads)?,
        Some(CreativeBody::NonLinearAds(non_linear_ads)) => write_non_linear_ads(w, non_linear_ads)?,
        None => (),
    }

    close(w, "Creative")
}

fn write_creative_wrapper(w: &mut XmlWriter, creative: &CreativeWrapper) -> Result<()> {
    let mut start = BytesStart::new("Creative");
    push_str(&mut start, "id", creative.id.as_deref());
    push_num(&mut start, "sequence", creative.sequence);
    push_str(&mut start, "AdID", creative.ad_id.as_deref());
    open(w, start)?;

    match &creative.body {
        Some(CreativeWrapperBody::Linear(linear)) => {
            open(w, BytesStart::new("Linear"))?;
            write_icons(w, &linear.icons)?;
            write_tracking_events(w, "TrackingEvents", &linear.tracking_events)?;
            if let Some(video_clicks) = &linear.video_clicks {
                write_video_clicks(w, video_clicks)?;
            }
            close(w, "Linear")?;
        }
        Some(CreativeWrapperBody::CompanionAds(companion_ads)) => write_companion_ads(w, companion_ads)?,
        Some(CreativeWrapperBody::NonLinearAds(non_linear_ads)) => {
            open(w, BytesStart::new("NonLinearAds"))?;
            write_tracking_events(w, "TrackingEvents", &non_linear_ads.tracking_events)?;
            for non_linear in &non_linear_ads.non_linears {
                write_non_linear_wrapper(w, non_linear)?;
            }
            close(w, "NonLinearAds")?;
        }
        None => (),
    }

    close(w, "Creative")
}

fn write_linear(w: &mut XmlWriter, linear: &Linear) -> Result<()> {
    let mut start = BytesStart::new("Linear");
    push_str(&mut start, "skipoffset", linear.skip_offset.as_ref().map(Offset::as_str));
    open(w, start)?;

    write_text(w, BytesStart::new("Duration"), linear.duration.as_str())?;
    if let Some(ad_parameters) = &linear.ad_parameters {
        write_ad_parameters(w, ad_parameters)?;
    }
    write_icons(w, &linear.icons)?;
    write_tracking_events(w, "TrackingEvents", &linear.tracking_events)?;
    if let Some(video_clicks) = &linear.video_clicks {
        write_video_clicks(w, video_clicks)?;
    }

    if !linear.media_files.is_empty() {
        open(w, BytesStart::new("MediaFiles"))?;
        for media_file in &linear.media_files {
            write_media_file(w, media_file)?;
        }
        close(w, "MediaFiles")?;
    }

    close(w, "Linear")
}

fn write_media_file(w: &mut XmlWriter, media_file: &MediaFile) -> Result<()> {
    let mut start = BytesStart::new("MediaFile");
    push_str(&mut start, "id", media_file.id.as_deref());
    start.push_attribute(("delivery", media_file.delivery.as_str()));
    start.push_attribute(("type", media_file.mime_type.as_str()));
    push_str(&mut start, "codec", media_file.codec.as_deref());
    match media_file.bitrate {
        Some(Bitrate::Fixed(bitrate)) => push_num(&mut start, "bitrate", Some(bitrate)),
        Some(Bitrate::Adaptive { min, max }) => {
            push_num(&mut start, "minBitrate", Some(min));
            push_num(&mut start, "maxBitrate", Some(max));
        }
        None => (),
    }
    push_num(&mut start, "width", Some(media_file.width));
    push_num(&mut start, "height", Some(media_file.height));
    push_flag(&mut start, "scalable", media_file.scalable);
    push_flag(&mut start, "maintainAspectRatio", media_file.maintain_aspect_ratio);
    push_str(&mut start, "apiFramework", media_file.api_framework.as_deref());
    write_cdata(w, start, &media_file.uri)
}

fn write_video_clicks(w: &mut XmlWriter, video_clicks: &VideoClicks) -> Result<()> {
    open(w, BytesStart::new("VideoClicks"))?;
    for (name, clicks) in [
        ("ClickThrough", &video_clicks.click_throughs),
        ("ClickTracking", &video_clicks.click_trackings),
        ("CustomClick", &video_clicks.custom_clicks),
    ] {
        for click in clicks {
            let mut start = BytesStart::new(name);
            push_str(&mut start, "id", click.id.as_deref());
            write_cdata(w, start, &click.uri)?;
        }
    }
    close(w, "VideoClicks")
}

/// Write `<{wrapper}><Tracking .../>...</{wrapper}>`, nothing when the list is empty
pub(crate) fn write_tracking_events(w: &mut XmlWriter, wrapper: &str, tracking: &[Tracking]) -> Result<()> {
    if tracking.is_empty() {
        return Ok(());
    }
    open(w, BytesStart::new(wrapper))?;
    for event in tracking {
        let mut start = BytesStart::new("Tracking");
        start.push_attribute(("event", event.event.as_str()));
        push_str(&mut start, "offset", event.offset.as_ref().map(Offset::as_str));
        write_cdata(w, start, &event.uri)?;
    }
    close(w, wrapper)
}

fn write_ad_parameters(w: &mut XmlWriter, ad_parameters: &AdParameters) -> Result<()> {
    let mut start = BytesStart::new("AdParameters");
    if ad_parameters.xml_encoded {
        push_flag(&mut start, "xmlEncoded", Some(true));
    }
    write_cdata(w, start, &ad_parameters.parameters)
}

fn write_icons(w: &mut XmlWriter, icons: &[Icon]) -> Result<()> {
    if icons.is_empty() {
        return Ok(());
    }
    open(w, BytesStart::new("Icons"))?;
    for icon in icons {
        let mut start = BytesStart::new("Icon");
        start.push_attribute(("program", icon.program.as_str()));
        push_num(&mut start, "width", Some(icon.width));
        push_num(&mut start, "height", Some(icon.height));
        start.push_attribute(("xPosition", icon.x_position.as_str()));
        start.push_attribute(("yPosition", icon.y_position.as_str()));
        push_str(&mut start, "offset", icon.offset.as_ref().map(Offset::as_str));
        push_str(&mut start, "duration", icon.duration.as_ref().map(Duration::as_str));
        push_str(&mut start, "apiFramework", icon.api_framework.as_deref());
        open(w, start)?;

        if let Some(resource) = &icon.resource {
            write_resource(w, resource)?;
        }
        if icon.click_through.is_some() || !icon.click_trackings.is_empty() {
            open(w, BytesStart::new("IconClicks"))?;
            if let Some(click_through) = &icon.click_through {
                write_cdata(w, BytesStart::new("IconClickThrough"), click_through.as_str())?;
            }
            for click_tracking in &icon.click_trackings {
                write_cdata(w, BytesStart::new("IconClickTracking"), click_tracking.as_str())?;
            }
            close(w, "IconClicks")?;
        }

        close(w, "Icon")?;
    }
    close(w, "Icons")
}

fn write_resource(w: &mut XmlWriter, resource: &Resource) -> Result<()> {
    match resource {
        Resource::Static(static_resource) => {
            let mut start = BytesStart::new("StaticResource");
            push_str(&mut start, "creativeType", static_resource.creative_type.as_deref());
            write_cdata(w, start, &static_resource.uri)
        }
        Resource::IFrame(uri) => write_cdata(w, BytesStart::new("IFrameResource"), uri.as_str()),
        Resource::Html(html) => {
            let mut start = BytesStart::new("HTMLResource");
            if html.xml_encoded {
                push_flag(&mut start, "xmlEncoded", Some(true));
            }
            write_cdata(w, start, &html.html)
        }
    }
}

fn write_companion_ads(w: &mut XmlWriter, companion_ads: &CompanionAds) -> Result<()> {
    let mut start = BytesStart::new("CompanionAds");
    push_str(&mut start, "required", companion_ads.required.as_deref());
    open(w, start)?;

    for companion in &companion_ads.companions {
        let mut start = BytesStart::new("Companion");
        push_str(&mut start, "id", companion.id.as_deref());
        push_num(&mut start, "width", Some(companion.width));
        push_num(&mut start, "height", Some(companion.height));
        push_num(&mut start, "assetWidth", companion.asset_width);
        push_num(&mut start, "assetHeight", companion.asset_height);
        push_num(&mut start, "expandedWidth", companion.expanded_width);
        push_num(&mut start, "expandedHeight", companion.expanded_height);
        push_str(&mut start, "apiFramework", companion.api_framework.as_deref());
        push_str(&mut start, "adSlotId", companion.ad_slot_id.as_deref());
        open(w, start)?;

        if let Some(resource) = &companion.resource {
            write_resource(w, resource)?;
        }
        if let Some(ad_parameters) = &companion.ad_parameters {
            write_ad_parameters(w, ad_parameters)?;
        }
        if let Some(alt_text) = &companion.alt_text {
            write_text(w, BytesStart::new("AltText"), alt_text)?;
        }
        if let Some(click_through) = &companion.click_through {
            write_cdata(w, BytesStart::new("CompanionClickThrough"), click_through.as_str())?;
        }
        for click_tracking in &companion.click_trackings {
            write_cdata(w, BytesStart::new("CompanionClickTracking"), click_tracking.as_str())?;
        }
        write_tracking_events(w, "TrackingEvents", &companion.tracking_events)?;

        close(w, "Companion")?;
    }

    close(w, "CompanionAds")
}

fn write_non_linear_ads(w: &mut XmlWriter, non_linear_ads: &NonLinearAds) -> Result<()> {
    open(w, BytesStart::new("NonLinearAds"))?;
    write_tracking_events(w, "TrackingEvents", &non_linear_ads.tracking_events)?;

    for non_linear in &non_linear_ads.non_linears {
        let mut start = BytesStart::new("NonLinear");
        push_str(&mut start, "id", non_linear.id.as_deref());
        push_num(&mut start, "width", Some(non_linear.width));
        push_num(&mut start, "height", Some(non_linear.height));
        push_num(&mut start, "expandedWidth", non_linear.expanded_width);
        push_num(&mut start, "expandedHeight", non_linear.expanded_height);
        push_flag(&mut start, "scalable", non_linear.scalable);
        push_flag(&mut start, "maintainAspectRatio", non_linear.maintain_aspect_ratio);
        push_str(
            &mut start,
            "minSuggestedDuration",
            non_linear.min_suggested_duration.as_ref().map(Duration::as_str),
        );
        push_str(&mut start, "apiFramework", non_linear.api_framework.as_deref());
        open(w, start)?;

        if let Some(resource) = &non_linear.resource {
            write_resource(w, resource)?;
        }
        if let Some(ad_parameters) = &non_linear.ad_parameters {
            write_ad_parameters(w, ad_parameters)?;
        }
        if let Some(click_through) = &non_linear.click_through {
            write_cdata(w, BytesStart::new("NonLinearClickThrough"), click_through.as_str())?;
        }
        for click_tracking in &non_linear.click_trackings {
            write_cdata(w, BytesStart::new("NonLinearClickTracking"), click_tracking.as_str())?;
        }

        close(w, "NonLinear")?;
    }

    close(w, "NonLinearAds")
}

fn write_non_linear_wrapper(w: &mut XmlWriter, non_linear: &NonLinearWrapper) -> Result<()> {
    let mut start = BytesStart::new("NonLinear");
    push_str(&mut start, "id", non_linear.id.as_deref());
    push_num(&mut start, "width", Some(non_linear.width));
    push_num(&mut start, "height", Some(non_linear.height));
    push_num(&mut start, "expandedWidth", non_linear.expanded_width);
    push_num(&mut start, "expandedHeight", non_linear.expanded_height);
    push_flag(&mut start, "scalable", non_linear.scalable);
    push_flag(&mut start, "maintainAspectRatio", non_linear.maintain_aspect_ratio);
    push_str(
        &mut start,
        "minSuggestedDuration",
        non_linear.min_suggested_duration.as_ref().map(Duration::as_str),
    );
    push_str(&mut start, "apiFramework", non_linear.api_framework.as_deref());
    open(w, start)?;

    write_tracking_events(w, "TrackingEvents", &non_linear.tracking_events)?;
    for click_tracking in &non_linear.click_trackings {
        write_cdata(w, BytesStart::new("NonLinearClickTracking"), click_tracking.as_str())?;
    }

    close(w, "NonLinear")
}

fn push_str(start: &mut BytesStart, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        start.push_attribute((key, value));
    }
}

fn push_num(start: &mut BytesStart, key: &str, value: Option<u32>) {
    if let Some(value) = value {
        start.push_attribute((key, value.to_string().as_str()));
    }
}

fn push_flag(start: &mut BytesStart, key: &str, value: Option<bool>) {
    if let Some(value) = value {
        start.push_attribute((key, if value { "true" } else { "false" }));
    }
}

fn open(w: &mut XmlWriter, start: BytesStart) -> Result<()> {
    w.write_event(Event::Start(start))?;
    Ok(())
}

fn close(w: &mut XmlWriter, name: &str) -> Result<()> {
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// `<name ...><![CDATA[text]]></name>`
///
/// A `]]>` inside `text` is split across two adjacent sections, which readers
/// join back together.
fn write_cdata(w: &mut XmlWriter, start: BytesStart, text: &str) -> Result<()> {
    let end = start.to_end().into_owned();
    w.write_event(Event::Start(start))?;
    let mut rest = text;
    while let Some(pos) = rest.find("]]>") {
        let (head, tail) = rest.split_at(pos + 2);
        w.write_event(Event::CData(BytesCData::new(head)))?;
        rest = tail;
    }
    w.write_event(Event::CData(BytesCData::new(rest)))?;
    w.write_event(Event::End(end))?;
    Ok(())
}

/// `<name ...>escaped text</name>`
fn write_text(w: &mut XmlWriter, start: BytesStart, text: &str) -> Result<()> {
    let end = start.to_end().into_owned();
    w.write_event(Event::Start(start))?;
    w.write_event(Event::Text(BytesText::new(text)))?;
    w.write_event(Event::End(end))?;
    Ok(())
}

/// `<name ...>raw</name>` with `raw` copied as-is, already valid markup
pub(crate) fn write_raw_element(w: &mut XmlWriter, start: BytesStart, raw: &str) -> Result<()> {
    let end = start.to_end().into_owned();
    w.write_event(Event::Start(start))?;
    w.write_event(Event::Text(BytesText::from_escaped(raw)))?;
    w.write_event(Event::End(end))?;
    Ok(())
}
