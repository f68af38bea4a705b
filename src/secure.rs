//! Scheme rewriting for every URI the player will request.

use crate::models::*;
use log::debug;

const SCHEMES: [&str; 2] = ["https:", "http:"];
const STRIPPED: [char; 3] = [' ', '\n', '\t'];

/// Rewrite `url` to use `https://` when `secure` is set, `http://` otherwise.
///
/// Spaces, newlines and tabs anywhere in the value are removed, then one leading `http:` or
/// `https:` (any case) and one leading `//` are stripped before the scheme is
/// prepended. Applying it twice gives the same result as applying it once.
pub fn secure_url(url: &str, secure: bool) -> String {
    let compact: String = url.chars().filter(|c| !STRIPPED.contains(c)).collect();

    let mut rest = compact.as_str();
    for scheme in SCHEMES {
        if rest.get(..scheme.len()).is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme)) {
            rest = &rest[scheme.len()..];
            break;
        }
    }
    let rest = rest.strip_prefix("//").unwrap_or(rest);

    let scheme = if secure { "https://" } else { "http://" };
    format!("{scheme}{rest}")
}

fn rewrite<T: UriEntry>(items: &mut [T], secure: bool) {
    for item in items {
        let uri = item.uri_mut();
        *uri = secure_url(uri, secure);
    }
}

impl Vast {
    /// Rewrite document errors and every ad's URIs to the requested scheme
    pub fn set_secure(&mut self, secure: bool) {
        debug!("Rewriting URIs with secure={secure}");
        rewrite(&mut self.errors, secure);
        for ad in &mut self.ads {
            ad.set_secure(secure);
        }
    }
}

impl Ad {
    pub fn set_secure(&mut self, secure: bool) {
        match &mut self.body {
            Some(AdBody::InLine(inline)) => inline.set_secure(secure),
            Some(AdBody::Wrapper(wrapper)) => wrapper.set_secure(secure),
            None => (),
        }
    }
}

impl InLine {
    pub fn set_secure(&mut self, secure: bool) {
        for creative in &mut self.creatives {
            creative.set_secure(secure);
        }
        rewrite(&mut self.viewable_impressions, secure);
        rewrite(&mut self.impressions, secure);
        rewrite(&mut self.errors, secure);
    }
}

impl Wrapper {
    /// Only ad-level URIs; the creatives and the ad tag URI are left as they are
    pub fn set_secure(&mut self, secure: bool) {
        rewrite(&mut self.viewable_impressions, secure);
        rewrite(&mut self.impressions, secure);
        rewrite(&mut self.errors, secure);
    }
}

impl Creative {
    pub fn set_secure(&mut self, secure: bool) {
        match &mut self.body {
            Some(CreativeBody::Linear(linear)) => {
                rewrite(&mut linear.tracking_events, secure);
                if let Some(video_clicks) = &mut linear.video_clicks {
                    rewrite(&mut video_clicks.click_trackings, secure);
                    rewrite(&mut video_clicks.click_throughs, secure);
                }
                rewrite(&mut linear.media_files, secure);
            }
            Some(CreativeBody::NonLinearAds(non_linear_ads)) => {
                rewrite(&mut non_linear_ads.tracking_events, secure);
            }
            Some(CreativeBody::CompanionAds(_)) | None => (),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rewrites_any_scheme() {
        assert_eq!(secure_url("http://a.example/x", true), "https://a.example/x");
        assert_eq!(secure_url("HTTPS://a.example/x", false), "http://a.example/x");
        assert_eq!(secure_url("//a.example/x", true), "https://a.example/x");
        assert_eq!(secure_url("a.example/x", true), "https://a.example/x");
    }

    #[test]
    fn strips_whitespace() {
        assert_eq!(
            secure_url("\n\t http://a.example/x?y=1 \n", true),
            "https://a.example/x?y=1"
        );
        assert_eq!(secure_url("http://a.example/ x", true), "https://a.example/x");
    }

    #[test]
    fn other_characters_are_kept() {
        assert_eq!(secure_url("http://a.example/x\r", true), "https://a.example/x\r");
        assert_eq!(secure_url("http://a.example/\u{a0}x", true), "https://a.example/\u{a0}x");
    }

    #[test]
    fn keeps_inner_slashes() {
        assert_eq!(
            secure_url("https://a.example/r?u=https://b.example//p", false),
            "http://a.example/r?u=https://b.example//p"
        );
    }

    #[test]
    fn is_idempotent() {
        for url in ["http://a.example", " //a.example/p ", "HtTp://a.example", ""] {
            for secure in [true, false] {
                let once = secure_url(url, secure);
                assert_eq!(secure_url(&once, secure), once);
            }
        }
    }

    #[test]
    fn walks_inline_tree() {
        let linear = Linear {
            tracking_events: vec![Tracking::new("start", "http://t.example/s")],
            video_clicks: Some(VideoClicks {
                click_throughs: vec![VideoClick::new("http://c.example")],
                click_trackings: vec![VideoClick::new("//ct.example")],
                custom_clicks: vec![VideoClick::new("http://custom.example")],
            }),
            media_files: vec![MediaFile {
                uri: "http://cdn.example/a.mp4".to_string(),
                ..MediaFile::default()
            }],
            ..Linear::default()
        };
        let mut vast = Vast {
            errors: vec![CdataString::from("http://e.example")],
            ads: vec![Ad::inline(InLine {
                impressions: vec![Impression::new("http://i.example")],
                viewable_impressions: vec![Viewable::new("http://v.example")],
                errors: vec![CdataString::from("http://ie.example")],
                creatives: vec![Creative::linear(linear)],
                ..InLine::default()
            })],
            ..Vast::default()
        };

        vast.set_secure(true);

        assert_eq!(vast.errors[0].as_str(), "https://e.example");
        let inline = vast.ads[0].as_inline().unwrap();
        assert_eq!(inline.impressions[0].uri, "https://i.example");
        assert_eq!(inline.viewable_impressions[0].uri, "https://v.example");
        assert_eq!(inline.errors[0].as_str(), "https://ie.example");

        let linear = inline.creatives[0].as_linear().unwrap();
        assert_eq!(linear.tracking_events[0].uri, "https://t.example/s");
        assert_eq!(linear.media_files[0].uri, "https://cdn.example/a.mp4");
        let clicks = linear.video_clicks.as_ref().unwrap();
        assert_eq!(clicks.click_throughs[0].uri, "https://c.example");
        assert_eq!(clicks.click_trackings[0].uri, "https://ct.example");
        assert_eq!(clicks.custom_clicks[0].uri, "http://custom.example");
    }

    #[test]
    fn wrapper_creatives_are_untouched() {
        let mut wrapper = Wrapper {
            vast_ad_tag_uri: CdataString::from("http://next.example/vast"),
            impressions: vec![Impression::new("http://i.example")],
            creatives: vec![CreativeWrapper {
                body: Some(CreativeWrapperBody::Linear(LinearWrapper {
                    tracking_events: vec![Tracking::new("start", "http://t.example")],
                    ..LinearWrapper::default()
                })),
                ..CreativeWrapper::default()
            }],
            ..Wrapper::default()
        };

        wrapper.set_secure(true);

        assert_eq!(wrapper.impressions[0].uri, "https://i.example");
        assert_eq!(wrapper.vast_ad_tag_uri.as_str(), "http://next.example/vast");
        let Some(CreativeWrapperBody::Linear(linear)) = &wrapper.creatives[0].body else {
            panic!("expected a linear wrapper creative");
        };
        assert_eq!(linear.tracking_events[0].uri, "http://t.example");
    }
}
