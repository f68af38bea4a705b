use thiserror::Error;

/// Errors that can occur when reading, writing, validating or normalizing VAST documents
#[derive(Error, Debug)]
pub enum VastError {
    #[error("Failed to parse XML: {0}")]
    XmlParseError(#[from] quick_xml::Error),

    #[error("Malformed XML attribute: {0}")]
    XmlAttrError(#[from] quick_xml::events::attributes::AttrError),

    #[error("Invalid UTF-8 in XML: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),

    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("empty ads")]
    EmptyAds,

    #[error("bad ad[{index}] {source}")]
    BadAd { index: usize, source: Box<VastError> },

    #[error("empty inline and wrapper")]
    EmptyInlineAndWrapper,

    #[error("empty creative")]
    EmptyCreative,

    #[error("bad creative[{index}] {source}")]
    BadCreative { index: usize, source: Box<VastError> },

    #[error("empty linear/nonlinear")]
    EmptyLinearNonLinear,

    #[error("empty media")]
    EmptyMedia,

    #[error("bad media[{index}] {source}")]
    BadMedia { index: usize, source: Box<VastError> },

    #[error("bad track[{index}] {source}")]
    BadTrack { index: usize, source: Box<VastError> },

    #[error("empty event")]
    EmptyEvent,

    #[error("empty uri")]
    EmptyUri,

    #[error("empty type")]
    EmptyType,

    #[error("empty width")]
    EmptyWidth,

    #[error("empty height")]
    EmptyHeight,

    #[error("not inline")]
    NotInline,

    #[error("no linear creative")]
    NoLinear,

    #[error("empty media by format")]
    EmptyMediaByFormat,

    #[error("empty media by size")]
    EmptyMediaBySize,

    #[error("Unknown error: {0}")]
    Other(String),
}

impl VastError {
    pub(crate) fn bad_ad(index: usize, err: VastError) -> Self {
        VastError::BadAd { index, source: Box::new(err) }
    }

    pub(crate) fn bad_creative(index: usize, err: VastError) -> Self {
        VastError::BadCreative { index, source: Box::new(err) }
    }

    pub(crate) fn bad_media(index: usize, err: VastError) -> Self {
        VastError::BadMedia { index, source: Box::new(err) }
    }

    pub(crate) fn bad_track(index: usize, err: VastError) -> Self {
        VastError::BadTrack { index, source: Box::new(err) }
    }
}

pub type Result<T> = std::result::Result<T, VastError>;
