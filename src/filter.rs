//! Media selection on the first linear creative of the first ad.

use crate::error::{Result, VastError};
use crate::models::*;
use log::debug;
use std::cmp::Ordering;

impl Vast {
    /// The media list the filters operate on
    fn first_media_files(&mut self) -> Result<&mut Vec<MediaFile>> {
        let ad = self.ads.first_mut().ok_or(VastError::EmptyAds)?;
        let inline = ad.as_inline_mut().ok_or(VastError::NotInline)?;
        let linear = inline
            .creatives
            .first_mut()
            .and_then(Creative::as_linear_mut)
            .ok_or(VastError::NoLinear)?;
        Ok(&mut linear.media_files)
    }

    /// Keep only media files whose MIME type is one of `formats`, in document order
    pub fn filter_format<S: AsRef<str>>(&mut self, formats: &[S]) -> Result<()> {
        let media_files = self.first_media_files()?;

        let kept: Vec<MediaFile> = media_files
            .iter()
            .filter(|m| formats.iter().any(|f| f.as_ref() == m.mime_type))
            .cloned()
            .collect();

        debug!("Format filter kept {} of {} media files", kept.len(), media_files.len());
        if kept.is_empty() {
            return Err(VastError::EmptyMediaByFormat);
        }

        *media_files = kept;
        Ok(())
    }

    /// Replace the media list with the single file closest to `width`x`height`.
    ///
    /// Only files with the same orientation as the target are candidates. Among
    /// them the one whose pixel area deviates least, in percent, from the target
    /// area wins; the first one wins a tie. The winner is advertised with the
    /// target dimensions.
    pub fn filter_size(&mut self, width: u32, height: u32) -> Result<()> {
        let media_files = self.first_media_files()?;

        let target = orientation(width, height);
        let candidates: Vec<&MediaFile> = media_files
            .iter()
            .filter(|m| target != Ordering::Equal && orientation(m.width, m.height) == target)
            .collect();

        let target_area = area(width, height);
        let mut best = *candidates.first().ok_or(VastError::EmptyMediaBySize)?;
        for &candidate in &candidates {
            if deviation(candidate, target_area) < deviation(best, target_area) {
                best = candidate;
            }
        }

        debug!(
            "Size filter picked {}x{} out of {} candidates for {}x{}",
            best.width,
            best.height,
            candidates.len(),
            width,
            height
        );

        let chosen = MediaFile {
            width,
            height,
            ..best.clone()
        };
        *media_files = vec![chosen];
        Ok(())
    }
}

/// Landscape is `Greater`, portrait is `Less`, square is `Equal`
fn orientation(width: u32, height: u32) -> Ordering {
    width.cmp(&height)
}

fn area(width: u32, height: u32) -> f64 {
    f64::from(width) * f64::from(height)
}

/// Absolute percentage difference between a file's area and the target area
fn deviation(media_file: &MediaFile, target_area: f64) -> f64 {
    (area(media_file.width, media_file.height) * 100.0 / target_area - 100.0).abs()
}
