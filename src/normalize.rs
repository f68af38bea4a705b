use crate::constants;
use crate::error::Result;
use crate::models::Vast;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target player dimensions in pixels
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl FromStr for Size {
    type Err = String;

    /// Parse `WIDTHxHEIGHT`, e.g. `1280x720`
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (width, height) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|e| format!("bad dimension {v:?}: {e}"))
        };
        Ok(Size {
            width: parse(width)?,
            height: parse(height)?,
        })
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Which normalization steps to run after validation
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(default)]
pub struct NormalizeOptions {
    /// Rewrite URIs to `https://` (`true`) or `http://` (`false`)
    pub secure: Option<bool>,

    /// Accepted media formats, as MIME types or short names such as `mp4`
    pub formats: Vec<String>,

    /// Pick the single media file closest to this size
    pub size: Option<Size>,
}

impl NormalizeOptions {
    /// Requested formats with short names expanded to MIME types
    pub fn mime_types(&self) -> Vec<String> {
        self.formats
            .iter()
            .map(|f| constants::mime_type(f).map_or_else(|| f.clone(), str::to_string))
            .collect()
    }
}

/// Validate `vast`, then apply the requested rewrites and media filters in place
pub fn normalize(vast: &mut Vast, options: &NormalizeOptions) -> Result<()> {
    vast.validate()?;
    debug!("Validated {} ads", vast.ads.len());

    if let Some(secure) = options.secure {
        vast.set_secure(secure);
    }

    if !options.formats.is_empty() {
        let mime_types = options.mime_types();
        debug!("Filtering media by {:?}", mime_types);
        vast.filter_format(mime_types.as_slice())?;
    }

    if let Some(size) = options.size {
        debug!("Filtering media by size {size}");
        vast.filter_size(size.width, size.height)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VastError;
    use crate::models::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Vast {
        let media = |mime_type: &str, width: u32, height: u32| MediaFile {
            delivery: DELIVERY_PROGRESSIVE.to_string(),
            mime_type: mime_type.to_string(),
            width,
            height,
            uri: format!("http://cdn.example/{width}x{height}"),
            ..MediaFile::default()
        };

        Vast {
            version: "3.0".to_string(),
            ads: vec![Ad::inline(InLine {
                impressions: vec![Impression::new("http://i.example"), Impression::new("")],
                creatives: vec![Creative::linear(Linear {
                    duration: Duration::new("00:00:15"),
                    media_files: vec![
                        media("video/webm", 1280, 720),
                        media("video/mp4", 640, 360),
                        media("video/mp4", 1920, 1080),
                    ],
                    ..Linear::default()
                })],
                ..InLine::default()
            })],
            ..Vast::default()
        }
    }

    #[test]
    fn parses_size() {
        assert_eq!("1280x720".parse::<Size>(), Ok(Size { width: 1280, height: 720 }));
        assert_eq!("720X1280".parse::<Size>(), Ok(Size { width: 720, height: 1280 }));
        assert!("1280".parse::<Size>().is_err());
        assert!("ax720".parse::<Size>().is_err());
    }

    #[test]
    fn options_default_from_empty_json() {
        let options: NormalizeOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, NormalizeOptions::default());

        let options: NormalizeOptions =
            serde_json::from_str(r#"{"secure": true, "formats": ["mp4"]}"#).unwrap();
        assert_eq!(options.secure, Some(true));
        assert_eq!(options.mime_types(), vec!["video/mp4".to_string()]);
    }

    #[test]
    fn unknown_format_names_are_kept() {
        let options = NormalizeOptions {
            formats: vec!["webm".to_string(), "video/x-flv".to_string()],
            ..NormalizeOptions::default()
        };
        assert_eq!(options.mime_types(), vec!["video/webm", "video/x-flv"]);
    }

    #[test]
    fn runs_every_step() {
        let mut vast = sample();
        let options = NormalizeOptions {
            secure: Some(true),
            formats: vec!["mp4".to_string()],
            size: Some(Size { width: 1280, height: 720 }),
        };

        normalize(&mut vast, &options).unwrap();

        let inline = vast.ads[0].as_inline().unwrap();
        assert_eq!(inline.impressions, vec![Impression::new("https://i.example")]);
        let media_files = &inline.creatives[0].as_linear().unwrap().media_files;
        assert_eq!(media_files.len(), 1);
        assert_eq!(media_files[0].mime_type, "video/mp4");
        assert_eq!(media_files[0].uri, "https://cdn.example/640x360");
        assert_eq!((media_files[0].width, media_files[0].height), (1280, 720));
    }

    #[test]
    fn validation_failure_stops_the_pipeline() {
        let mut vast = Vast::default();
        let err = normalize(&mut vast, &NormalizeOptions::default()).unwrap_err();
        assert!(matches!(err, VastError::EmptyAds));
    }

    #[test]
    fn empty_options_only_validate() {
        let mut vast = sample();
        normalize(&mut vast, &NormalizeOptions::default()).unwrap();
        let inline = vast.ads[0].as_inline().unwrap();
        assert_eq!(inline.impressions[0].uri, "http://i.example");
        assert_eq!(inline.creatives[0].as_linear().unwrap().media_files.len(), 3);
    }
}
