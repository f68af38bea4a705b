mod fixtures;

use fixtures::*;
use pretty_assertions::assert_eq;
use vast_normalizer::models::*;
use vast_normalizer::{parse_vast, to_xml_pretty, VastError};

#[test]
fn test_parses_inline_sample() {
    ensure_env_logger_initialized();
    let vast = parse_vast(&read_sample(inline_sample())).unwrap();

    assert_eq!(vast.version, "3.0");
    assert_eq!(vast.ads.len(), 1);
    assert_eq!(vast.ads[0].id.as_deref(), Some("20001"));
    assert_eq!(vast.ads[0].sequence, Some(1));

    let inline = vast.ads[0].as_inline().unwrap();
    assert_eq!(
        inline.ad_system,
        Some(AdSystem {
            name: "Acme Ad Server".to_string(),
            version: Some("4.2".to_string()),
        })
    );
    assert_eq!(inline.ad_title.as_str(), "Summer Launch 30s");
    assert_eq!(inline.impressions.len(), 2);
    assert_eq!(inline.impressions[1].uri, "");
    assert_eq!(inline.viewable_impressions.len(), 1);
    assert_eq!(inline.advertiser.as_deref(), Some("Acme"));
    assert_eq!(
        inline.errors,
        vec![CdataString::from("http://track.acme.example/error?code=[ERRORCODE]")]
    );
    assert_eq!(inline.pricing.as_ref().unwrap().value, "12.50");

    let creative = &inline.creatives[0];
    assert_eq!(creative.ad_id.as_deref(), Some("summer-30"));

    let linear = creative.as_linear().unwrap();
    assert_eq!(linear.skip_offset, Some(Offset::new("00:00:05")));
    assert_eq!(linear.duration.as_str(), "00:00:30");
    assert_eq!(linear.tracking_events.len(), 4);
    assert_eq!(
        linear.tracking_events[2].offset.as_ref().map(Offset::kind),
        Some(OffsetKind::Percent)
    );

    let media = &linear.media_files;
    assert_eq!(media.len(), 3);
    assert_eq!(media[0].bitrate, Some(Bitrate::Fixed(4500)));
    assert_eq!(media[0].scalable, Some(true));
    assert_eq!(media[1].bitrate, Some(Bitrate::Adaptive { min: 800, max: 1500 }));
    assert_eq!(media[2].uri, "http://cdn.acme.example/summer_vertical.mp4");
}

#[test]
fn test_parses_both_extension_shapes() {
    ensure_env_logger_initialized();
    let vast = parse_vast(&read_sample(inline_sample())).unwrap();
    let extensions = &vast.ads[0].as_inline().unwrap().extensions;

    assert_eq!(extensions.len(), 2);

    assert_eq!(extensions[0].r#type, "tracker");
    assert_eq!(extensions[0].name, "moat");
    assert_eq!(
        extensions[0].custom_tracking(),
        &[Tracking::new("midpoint", "https://px.moat.example/q2")]
    );
    assert_eq!(extensions[0].data(), "");

    assert_eq!(extensions[1].r#type, "waterfall");
    assert_eq!(extensions[1].attributes["fallback_index"], "0");
    assert_eq!(extensions[1].data(), r#"<Waterfall><Step order="1"/></Waterfall>"#);
    assert!(extensions[1].custom_tracking().is_empty());
}

#[test]
fn test_parses_wrapper_sample() {
    ensure_env_logger_initialized();
    let vast = parse_vast(&read_sample(wrapper_sample())).unwrap();

    assert!(vast.ads[0].as_inline().is_none());
    let wrapper = vast.ads[0].as_wrapper().unwrap();
    assert_eq!(wrapper.vast_ad_tag_uri.as_str(), "http://ads.next.example/vast?id=42");
    assert_eq!(wrapper.fallback_on_no_ad, Some(true));
    assert_eq!(wrapper.follow_additional_wrappers, Some(false));
    assert_eq!(wrapper.allow_multiple_ads, None);
    assert_eq!(wrapper.impressions.len(), 2);

    let Some(CreativeWrapperBody::Linear(linear)) = &wrapper.creatives[0].body else {
        panic!("expected a linear wrapper creative");
    };
    assert_eq!(linear.tracking_events.len(), 1);
}

#[test]
fn test_validation_reports_the_failing_media() {
    ensure_env_logger_initialized();
    let mut vast = parse_vast(&read_sample(sample_with_a_bad_media_width())).unwrap();

    let err = vast.validate().unwrap_err();
    assert!(matches!(err, VastError::BadAd { index: 0, .. }));
    assert_eq!(err.to_string(), "bad ad[0] bad creative[0] bad media[1] empty width");
}

#[test]
fn test_validation_filters_dead_entries() {
    ensure_env_logger_initialized();
    let mut vast = parse_vast(&read_sample(inline_sample())).unwrap();
    vast.validate().unwrap();

    let inline = vast.ads[0].as_inline().unwrap();
    assert_eq!(inline.impressions.len(), 1);
    assert_eq!(inline.impressions[0].id.as_deref(), Some("primary"));

    let linear = inline.creatives[0].as_linear().unwrap();
    let events: Vec<&str> = linear.tracking_events.iter().map(|t| t.event.as_str()).collect();
    assert_eq!(events, vec!["start", "firstQuartile", "progress"]);
}

#[test]
fn test_samples_survive_a_round_trip() {
    ensure_env_logger_initialized();
    for path in [inline_sample(), wrapper_sample()] {
        let vast = parse_vast(&read_sample(path)).unwrap();
        let xml = to_xml_pretty(&vast).unwrap();
        assert_eq!(parse_vast(&xml).unwrap(), vast);
    }
}
