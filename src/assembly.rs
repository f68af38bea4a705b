//! Mutators used to decorate a parsed document before it is served again.
//!
//! They all act on the first ad. A document without ads is left alone.

use crate::models::*;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// The ad server identity written into `<AdSystem>`
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct DisplayManager {
    pub name: String,
    /// Written as the InLine advertiser
    pub title: String,
    pub ver: String,
}

impl Vast {
    fn first_ad(&mut self) -> Option<&mut AdBody> {
        let body = self.ads.first_mut().and_then(|ad| ad.body.as_mut());
        if body.is_none() {
            warn!("Document has no ad to update");
        }
        body
    }

    pub fn set_display_manager(&mut self, info: &DisplayManager) {
        let ad_system = AdSystem {
            name: info.name.clone(),
            version: Some(info.ver.clone()).filter(|v| !v.is_empty()),
        };
        match self.first_ad() {
            Some(AdBody::Wrapper(wrapper)) => wrapper.ad_system = Some(ad_system),
            Some(AdBody::InLine(inline)) => {
                inline.ad_system = Some(ad_system);
                inline.advertiser = Some(info.title.clone());
            }
            None => (),
        }
    }

    /// Document-level error URIs
    pub fn add_error(&mut self, errors: impl IntoIterator<Item = CdataString>) {
        self.errors.extend(errors);
    }

    /// Append trackers to every linear, or else non-linear, creative of the first ad
    pub fn add_tracking(&mut self, tracking: &[Tracking]) {
        match self.first_ad() {
            Some(AdBody::Wrapper(wrapper)) => {
                for creative in &mut wrapper.creatives {
                    match &mut creative.body {
                        Some(CreativeWrapperBody::Linear(linear)) => {
                            linear.tracking_events.extend_from_slice(tracking)
                        }
                        Some(CreativeWrapperBody::NonLinearAds(non_linear_ads)) => {
                            non_linear_ads.tracking_events.extend_from_slice(tracking)
                        }
                        _ => (),
                    }
                }
            }
            Some(AdBody::InLine(inline)) => {
                for creative in &mut inline.creatives {
                    match &mut creative.body {
                        Some(CreativeBody::Linear(linear)) => {
                            linear.tracking_events.extend_from_slice(tracking)
                        }
                        Some(CreativeBody::NonLinearAds(non_linear_ads)) => {
                            non_linear_ads.tracking_events.extend_from_slice(tracking)
                        }
                        _ => (),
                    }
                }
            }
            None => (),
        }
    }

    /// Append click trackers to the linear creatives of an InLine ad
    pub fn add_click_tracking(&mut self, clicks: &[VideoClick]) {
        match self.first_ad() {
            Some(AdBody::InLine(inline)) => {
                for linear in inline.creatives.iter_mut().filter_map(Creative::as_linear_mut) {
                    linear
                        .video_clicks
                        .get_or_insert_with(VideoClicks::default)
                        .click_trackings
                        .extend_from_slice(clicks);
                }
            }
            Some(AdBody::Wrapper(_)) => debug!("Click tracking is not added to wrapper ads"),
            None => (),
        }
    }

    pub fn add_impression(&mut self, impressions: &[Impression]) {
        match self.first_ad() {
            Some(AdBody::Wrapper(wrapper)) => wrapper.impressions.extend_from_slice(impressions),
            Some(AdBody::InLine(inline)) => inline.impressions.extend_from_slice(impressions),
            None => (),
        }
    }

    pub fn add_viewable(&mut self, viewables: &[Viewable]) {
        match self.first_ad() {
            Some(AdBody::Wrapper(wrapper)) => wrapper.viewable_impressions.extend_from_slice(viewables),
            Some(AdBody::InLine(inline)) => inline.viewable_impressions.extend_from_slice(viewables),
            None => (),
        }
    }

    pub fn clear_extensions(&mut self) {
        match self.first_ad() {
            Some(AdBody::Wrapper(wrapper)) => wrapper.extensions.clear(),
            Some(AdBody::InLine(inline)) => inline.extensions.clear(),
            None => (),
        }
    }

    /// Append extensions, skipping those without a type
    pub fn add_extensions(&mut self, extensions: impl IntoIterator<Item = Extension>) {
        let Some(body) = self.first_ad() else {
            return;
        };
        let target = match body {
            AdBody::Wrapper(wrapper) => &mut wrapper.extensions,
            AdBody::InLine(inline) => &mut inline.extensions,
        };
        for extension in extensions {
            if extension.r#type.is_empty() {
                debug!("Skipping extension without a type");
                continue;
            }
            target.push(extension);
        }
    }

    /// Make `click` the only click-through of every linear creative of an InLine ad
    pub fn set_click_through(&mut self, click: VideoClick) {
        if let Some(AdBody::InLine(inline)) = self.first_ad() {
            for linear in inline.creatives.iter_mut().filter_map(Creative::as_linear_mut) {
                linear.video_clicks.get_or_insert_with(VideoClicks::default).click_throughs =
                    vec![click.clone()];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn inline_vast() -> Vast {
        Vast {
            version: "3.0".to_string(),
            ads: vec![Ad::inline(InLine {
                creatives: vec![
                    Creative::linear(Linear::default()),
                    Creative {
                        body: Some(CreativeBody::NonLinearAds(NonLinearAds::default())),
                        ..Creative::default()
                    },
                    Creative {
                        body: Some(CreativeBody::CompanionAds(CompanionAds::default())),
                        ..Creative::default()
                    },
                ],
                ..InLine::default()
            })],
            ..Vast::default()
        }
    }

    fn wrapper_vast() -> Vast {
        Vast {
            version: "3.0".to_string(),
            ads: vec![Ad::wrapper(Wrapper {
                creatives: vec![CreativeWrapper {
                    body: Some(CreativeWrapperBody::Linear(LinearWrapper::default())),
                    ..CreativeWrapper::default()
                }],
                ..Wrapper::default()
            })],
            ..Vast::default()
        }
    }

    #[test]
    fn display_manager_sets_ad_system() {
        let info = DisplayManager {
            name: "adserver".to_string(),
            title: "Acme".to_string(),
            ver: "2.1".to_string(),
        };

        let mut vast = inline_vast();
        vast.set_display_manager(&info);
        let inline = vast.ads[0].as_inline().unwrap();
        assert_eq!(
            inline.ad_system,
            Some(AdSystem { name: "adserver".to_string(), version: Some("2.1".to_string()) })
        );
        assert_eq!(inline.advertiser.as_deref(), Some("Acme"));

        let mut vast = wrapper_vast();
        vast.set_display_manager(&info);
        assert_eq!(vast.ads[0].as_wrapper().unwrap().ad_system.as_ref().unwrap().name, "adserver");
    }

    #[test]
    fn tracking_goes_to_linear_and_non_linear() {
        let mut vast = inline_vast();
        vast.add_tracking(&[Tracking::new("start", "https://t.example/s")]);

        let inline = vast.ads[0].as_inline().unwrap();
        assert_eq!(inline.creatives[0].as_linear().unwrap().tracking_events.len(), 1);
        let Some(CreativeBody::NonLinearAds(non_linear_ads)) = &inline.creatives[1].body else {
            panic!("expected non-linear ads");
        };
        assert_eq!(non_linear_ads.tracking_events.len(), 1);
    }

    #[test]
    fn tracking_goes_to_wrapper_creatives() {
        let mut vast = wrapper_vast();
        vast.add_tracking(&[Tracking::new("complete", "https://t.example/c")]);

        let wrapper = vast.ads[0].as_wrapper().unwrap();
        let Some(CreativeWrapperBody::Linear(linear)) = &wrapper.creatives[0].body else {
            panic!("expected a linear wrapper creative");
        };
        assert_eq!(linear.tracking_events, vec![Tracking::new("complete", "https://t.example/c")]);
    }

    #[test]
    fn click_tracking_skips_wrappers() {
        let mut vast = wrapper_vast();
        vast.add_click_tracking(&[VideoClick::new("https://t.example/click")]);
        assert_eq!(vast, wrapper_vast());

        let mut vast = inline_vast();
        vast.add_click_tracking(&[VideoClick::new("https://t.example/click")]);
        let linear = vast.ads[0].as_inline().unwrap().creatives[0].as_linear().unwrap();
        assert_eq!(linear.video_clicks.as_ref().unwrap().click_trackings.len(), 1);
    }

    #[test]
    fn click_through_is_replaced() {
        let mut vast = inline_vast();
        vast.set_click_through(VideoClick::new("https://a.example"));
        vast.set_click_through(VideoClick::new("https://b.example"));

        let linear = vast.ads[0].as_inline().unwrap().creatives[0].as_linear().unwrap();
        assert_eq!(
            linear.video_clicks.as_ref().unwrap().click_throughs,
            vec![VideoClick::new("https://b.example")]
        );
    }

    #[test]
    fn extensions_without_type_are_skipped() {
        let mut vast = inline_vast();
        vast.add_extensions(vec![
            Extension::with_data("", "<Ignored/>"),
            Extension::with_data("waterfall", "<Step/>"),
        ]);
        assert_eq!(vast.ads[0].as_inline().unwrap().extensions.len(), 1);

        vast.clear_extensions();
        assert!(vast.ads[0].as_inline().unwrap().extensions.is_empty());
    }

    #[test]
    fn impressions_and_errors_are_appended() {
        let mut vast = wrapper_vast();
        vast.add_impression(&[Impression::new("https://i.example")]);
        vast.add_viewable(&[Viewable::new("https://v.example")]);
        vast.add_error([CdataString::from("https://e.example")]);

        let wrapper = vast.ads[0].as_wrapper().unwrap();
        assert_eq!(wrapper.impressions.len(), 1);
        assert_eq!(wrapper.viewable_impressions.len(), 1);
        assert_eq!(vast.errors.len(), 1);
    }

    #[test]
    fn empty_document_is_left_alone() {
        let mut vast = Vast::default();
        vast.add_impression(&[Impression::new("https://i.example")]);
        vast.add_tracking(&[Tracking::new("start", "https://t.example")]);
        vast.clear_extensions();
        assert_eq!(vast, Vast::default());
    }
}
