//! Structural validation and dead-entry filtering.
//!
//! Validation fails fast: the first structural or leaf-field problem is returned,
//! wrapped with the index of every list it was found in (`bad ad[0] bad creative[1]
//! bad media[2] empty width`). Entries with an empty URI are not errors; they are
//! dropped from their list.

use crate::error::{Result, VastError};
use crate::models::*;
use log::debug;

/// Build a new list holding only the entries with a non-empty URI, in order
fn keep_with_uri<T: UriEntry>(items: Vec<T>) -> Vec<T> {
    let before = items.len();
    let kept: Vec<T> = items.into_iter().filter(|item| !item.uri().is_empty()).collect();
    if kept.len() != before {
        debug!("Dropped {} entries with an empty URI", before - kept.len());
    }
    kept
}

/// Same as [`keep_with_uri`], then trims the surviving URIs. A whitespace-only
/// entry is kept and ends up empty.
fn keep_trimmed<T: UriEntry>(items: Vec<T>) -> Vec<T> {
    keep_with_uri(items)
        .into_iter()
        .map(|mut item| {
            let uri = item.uri_mut();
            *uri = uri.trim().to_string();
            item
        })
        .collect()
}

impl Vast {
    /// Validate the document, filtering empty trackers in place
    pub fn validate(&mut self) -> Result<()> {
        if self.ads.is_empty() {
            return Err(VastError::EmptyAds);
        }

        for (i, ad) in self.ads.iter_mut().enumerate() {
            ad.validate().map_err(|e| VastError::bad_ad(i, e))?;
        }

        Ok(())
    }
}

impl Ad {
    pub fn validate(&mut self) -> Result<()> {
        match &mut self.body {
            Some(AdBody::Wrapper(wrapper)) => wrapper.validate(),
            Some(AdBody::InLine(inline)) => inline.validate(),
            None => Err(VastError::EmptyInlineAndWrapper),
        }
    }
}

impl InLine {
    pub fn validate(&mut self) -> Result<()> {
        if self.creatives.is_empty() {
            return Err(VastError::EmptyCreative);
        }

        for (i, creative) in self.creatives.iter_mut().enumerate() {
            creative.validate().map_err(|e| VastError::bad_creative(i, e))?;
        }

        self.impressions = keep_trimmed(std::mem::take(&mut self.impressions));
        self.errors = keep_trimmed(std::mem::take(&mut self.errors));
        self.viewable_impressions = keep_trimmed(std::mem::take(&mut self.viewable_impressions));

        Ok(())
    }
}

impl Wrapper {
    /// Drop empty impressions. Creatives of a wrapper are not checked and URIs
    /// are kept untrimmed.
    pub fn validate(&mut self) -> Result<()> {
        self.impressions = keep_with_uri(std::mem::take(&mut self.impressions));
        self.viewable_impressions = keep_with_uri(std::mem::take(&mut self.viewable_impressions));
        Ok(())
    }
}

impl Creative {
    /// Companion-only creatives are rejected like empty ones
    pub fn validate(&mut self) -> Result<()> {
        match &mut self.body {
            Some(CreativeBody::Linear(linear)) => linear.validate(),
            Some(CreativeBody::NonLinearAds(non_linear_ads)) => non_linear_ads.validate(),
            Some(CreativeBody::CompanionAds(_)) | None => Err(VastError::EmptyLinearNonLinear),
        }
    }
}

impl NonLinearAds {
    pub fn validate(&mut self) -> Result<()> {
        Ok(())
    }
}

impl Linear {
    pub fn validate(&mut self) -> Result<()> {
        if self.media_files.is_empty() {
            return Err(VastError::EmptyMedia);
        }

        for (i, media_file) in self.media_files.iter().enumerate() {
            media_file.validate().map_err(|e| VastError::bad_media(i, e))?;
        }

        self.tracking_events = keep_with_uri(std::mem::take(&mut self.tracking_events));
        for (i, tracking) in self.tracking_events.iter().enumerate() {
            tracking.validate().map_err(|e| VastError::bad_track(i, e))?;
        }

        if let Some(video_clicks) = &mut self.video_clicks {
            video_clicks.validate()?;
        }

        Ok(())
    }
}

impl MediaFile {
    pub fn validate(&self) -> Result<()> {
        if self.uri.is_empty() {
            return Err(VastError::EmptyUri);
        }
        if self.mime_type.is_empty() {
            return Err(VastError::EmptyType);
        }
        if self.width == 0 {
            return Err(VastError::EmptyWidth);
        }
        if self.height == 0 {
            return Err(VastError::EmptyHeight);
        }
        Ok(())
    }
}

impl VideoClicks {
    /// Each list is filtered on its own; a list left with nothing is written as
    /// no elements at all
    pub fn validate(&mut self) -> Result<()> {
        self.click_throughs = keep_with_uri(std::mem::take(&mut self.click_throughs));
        self.click_trackings = keep_with_uri(std::mem::take(&mut self.click_trackings));
        self.custom_clicks = keep_with_uri(std::mem::take(&mut self.custom_clicks));
        Ok(())
    }
}

impl Tracking {
    pub fn validate(&self) -> Result<()> {
        if self.event.is_empty() {
            return Err(VastError::EmptyEvent);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn media(uri: &str, mime_type: &str, width: u32, height: u32) -> MediaFile {
        MediaFile {
            delivery: DELIVERY_PROGRESSIVE.to_string(),
            mime_type: mime_type.to_string(),
            width,
            height,
            uri: uri.to_string(),
            ..MediaFile::default()
        }
    }

    fn inline_with(linear: Linear) -> InLine {
        InLine {
            creatives: vec![Creative::linear(linear)],
            ..InLine::default()
        }
    }

    fn valid_linear() -> Linear {
        Linear {
            duration: Duration::new("00:00:30"),
            media_files: vec![media("https://cdn.example/a.mp4", "video/mp4", 1280, 720)],
            ..Linear::default()
        }
    }

    #[test]
    fn empty_document_is_rejected() {
        let mut vast = Vast::default();
        assert_eq!(vast.validate().unwrap_err().to_string(), "empty ads");
    }

    #[test]
    fn ad_without_body_is_rejected() {
        let mut vast = Vast {
            ads: vec![Ad::default()],
            ..Vast::default()
        };
        assert_eq!(vast.validate().unwrap_err().to_string(), "bad ad[0] empty inline and wrapper");
    }

    #[test]
    fn errors_carry_index_chain() {
        let mut linear = valid_linear();
        linear.media_files.push(media("https://cdn.example/b.mp4", "video/mp4", 0, 720));
        let mut vast = Vast {
            ads: vec![Ad::inline(inline_with(valid_linear())), Ad::inline(inline_with(linear))],
            ..Vast::default()
        };

        let err = vast.validate().unwrap_err();
        assert_eq!(err.to_string(), "bad ad[1] bad creative[0] bad media[1] empty width");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn media_checks_run_in_order() {
        assert_eq!(media("", "", 0, 0).validate().unwrap_err().to_string(), "empty uri");
        assert_eq!(media("u", "", 0, 0).validate().unwrap_err().to_string(), "empty type");
        assert_eq!(media("u", "t", 0, 0).validate().unwrap_err().to_string(), "empty width");
        assert_eq!(media("u", "t", 1, 0).validate().unwrap_err().to_string(), "empty height");
        assert!(media("u", "t", 1, 1).validate().is_ok());
    }

    #[test]
    fn inline_without_creatives_is_rejected() {
        let mut inline = InLine::default();
        assert!(matches!(inline.validate(), Err(VastError::EmptyCreative)));
    }

    #[test]
    fn companion_only_creative_is_rejected() {
        let mut creative = Creative {
            body: Some(CreativeBody::CompanionAds(CompanionAds::default())),
            ..Creative::default()
        };
        assert!(matches!(creative.validate(), Err(VastError::EmptyLinearNonLinear)));
    }

    #[test]
    fn non_linear_creative_passes() {
        let mut creative = Creative {
            body: Some(CreativeBody::NonLinearAds(NonLinearAds::default())),
            ..Creative::default()
        };
        assert!(creative.validate().is_ok());
    }

    #[test]
    fn inline_filters_and_trims() {
        let mut inline = inline_with(valid_linear());
        inline.impressions = vec![
            Impression::new("  https://t.example/a\n"),
            Impression::new(""),
        ];
        inline.errors = vec![CdataString::from(""), CdataString::from(" https://t.example/e ")];
        inline.viewable_impressions = vec![Viewable::new(""), Viewable::new("https://t.example/v")];

        inline.validate().unwrap();
        assert_eq!(inline.impressions, vec![Impression::new("https://t.example/a")]);
        assert_eq!(inline.errors, vec![CdataString::from("https://t.example/e")]);
        assert_eq!(inline.viewable_impressions, vec![Viewable::new("https://t.example/v")]);
    }

    #[test]
    fn whitespace_only_entries_are_trimmed_not_dropped() {
        let mut inline = inline_with(valid_linear());
        inline.impressions = vec![Impression::new("   "), Impression::new(" http://a ")];
        inline.errors = vec![CdataString::from("\t")];

        inline.validate().unwrap();
        assert_eq!(
            inline.impressions,
            vec![Impression::new(""), Impression::new("http://a")]
        );
        assert_eq!(inline.errors, vec![CdataString::from("")]);
    }

    #[test]
    fn wrapper_filters_without_trimming() {
        let mut wrapper = Wrapper {
            impressions: vec![Impression::new(""), Impression::new(" https://t.example/a ")],
            viewable_impressions: vec![Viewable::new("")],
            ..Wrapper::default()
        };
        wrapper.validate().unwrap();
        assert_eq!(wrapper.impressions, vec![Impression::new(" https://t.example/a ")]);
        assert!(wrapper.viewable_impressions.is_empty());
    }

    #[test]
    fn linear_drops_empty_tracking_before_checking_events() {
        let mut linear = valid_linear();
        linear.tracking_events = vec![
            Tracking::new("", ""),
            Tracking::new("start", "https://t.example/s"),
        ];
        linear.validate().unwrap();
        assert_eq!(linear.tracking_events.len(), 1);

        linear.tracking_events.push(Tracking::new("", "https://t.example/x"));
        assert_eq!(linear.validate().unwrap_err().to_string(), "bad track[1] empty event");
    }

    #[test]
    fn linear_without_media_is_rejected() {
        let mut linear = Linear::default();
        assert!(matches!(linear.validate(), Err(VastError::EmptyMedia)));
    }

    #[test]
    fn video_clicks_collapse_to_empty() {
        let mut clicks = VideoClicks {
            click_throughs: vec![VideoClick::new("")],
            click_trackings: vec![VideoClick::new("https://t.example/c"), VideoClick::new("")],
            custom_clicks: vec![],
        };
        clicks.validate().unwrap();
        assert!(clicks.click_throughs.is_empty());
        assert_eq!(clicks.click_trackings, vec![VideoClick::new("https://t.example/c")]);
        assert!(clicks.custom_clicks.is_empty());
    }
}
