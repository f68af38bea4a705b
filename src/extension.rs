//! Vendor `<Extension>` elements.
//!
//! An extension carries either a list of custom trackers or an opaque blob of
//! XML, never both. The wire element takes one of two shapes depending on which
//! payload is populated:
//!
//! ```xml
//! <Extension type="tracker" name="vendor">
//!   <CustomTracking><Tracking event="start"><![CDATA[https://t.example/s]]></Tracking></CustomTracking>
//! </Extension>
//!
//! <Extension type="waterfall" fallback_index="0"><Vendor>raw xml</Vendor></Extension>
//! ```

use crate::error::Result;
use crate::models::Tracking;
use crate::parser::{self, Attrs, XmlReader};
use crate::writer::{self, XmlWriter};
use log::debug;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute names owned by [`Extension`] itself rather than its attribute bag
const RESERVED_ATTRIBUTES: [&str; 2] = ["type", "name"];

/// Represents arbitrary XML provided by the platform to extend the VAST response,
/// or a set of custom trackers
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Extension {
    /// The extension type
    pub r#type: String,

    /// The extension name
    pub name: String,

    /// Extra attributes written on the `<Extension>` start tag
    pub attributes: BTreeMap<String, String>,

    /// Trackers or raw XML
    pub payload: ExtensionPayload,
}

/// The two mutually exclusive extension payloads
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub enum ExtensionPayload {
    /// `<CustomTracking><Tracking .../>...</CustomTracking>`
    CustomTracking(Vec<Tracking>),
    /// Inner XML, kept verbatim
    Data(String),
}

impl Default for ExtensionPayload {
    fn default() -> Self {
        ExtensionPayload::Data(String::new())
    }
}

impl Extension {
    pub fn with_tracking(r#type: impl Into<String>, tracking: Vec<Tracking>) -> Self {
        Extension {
            r#type: r#type.into(),
            name: String::new(),
            attributes: BTreeMap::new(),
            payload: ExtensionPayload::CustomTracking(tracking),
        }
    }

    pub fn with_data(r#type: impl Into<String>, data: impl Into<String>) -> Self {
        Extension {
            r#type: r#type.into(),
            name: String::new(),
            attributes: BTreeMap::new(),
            payload: ExtensionPayload::Data(data.into()),
        }
    }

    /// The custom trackers, empty when the extension carries data
    pub fn custom_tracking(&self) -> &[Tracking] {
        match &self.payload {
            ExtensionPayload::CustomTracking(tracking) => tracking,
            ExtensionPayload::Data(_) => &[],
        }
    }

    /// The raw inner XML, empty when the extension carries trackers
    pub fn data(&self) -> &str {
        match &self.payload {
            ExtensionPayload::Data(data) => data,
            ExtensionPayload::CustomTracking(_) => "",
        }
    }
}

/// Everything a decoded `<Extension>` element may hold, before the payload is chosen
struct RawExtension {
    r#type: String,
    name: String,
    custom_tracking: Vec<Tracking>,
    data: String,
}

impl RawExtension {
    /// Keep the trackers when there are any, otherwise the raw data
    fn into_extension(self, attributes: BTreeMap<String, String>) -> Extension {
        let payload = if self.custom_tracking.is_empty() {
            ExtensionPayload::Data(self.data)
        } else {
            ExtensionPayload::CustomTracking(self.custom_tracking)
        };

        Extension {
            r#type: self.r#type,
            name: self.name,
            attributes,
            payload,
        }
    }
}

/// The element shape chosen when writing an extension
enum WireShape<'a> {
    Tracking(&'a [Tracking]),
    Data(&'a str),
}

impl<'a> WireShape<'a> {
    fn of(extension: &'a Extension) -> Self {
        match &extension.payload {
            ExtensionPayload::CustomTracking(tracking) if !tracking.is_empty() => {
                WireShape::Tracking(tracking)
            }
            ExtensionPayload::CustomTracking(_) => WireShape::Data(""),
            ExtensionPayload::Data(data) => WireShape::Data(data),
        }
    }
}

/// Decode an `<Extension>` element whose start tag has just been read
pub(crate) fn parse_extension<'a>(
    reader: &mut XmlReader<'a>,
    start: &BytesStart<'a>,
    empty: bool,
) -> Result<Extension> {
    let attrs = Attrs::read(start)?;

    // The inner markup is kept byte for byte, surrounding whitespace included.
    let data = if empty {
        String::new()
    } else {
        reader.trim_text(false);
        let inner = reader.read_text(start.name());
        reader.trim_text(true);
        inner?.into_owned()
    };

    let raw = RawExtension {
        r#type: attrs.string("type").unwrap_or_default(),
        name: attrs.string("name").unwrap_or_default(),
        custom_tracking: parse_custom_tracking(&data)?,
        data,
    };

    let attributes = attrs
        .iter()
        .filter(|(key, _)| !RESERVED_ATTRIBUTES.contains(key))
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();

    if !raw.custom_tracking.is_empty() {
        debug!(
            "Extension {:?} carries {} custom trackers",
            raw.r#type,
            raw.custom_tracking.len()
        );
    }

    Ok(raw.into_extension(attributes))
}

/// Look for a top-level `<CustomTracking>` list inside the extension's inner XML
fn parse_custom_tracking(inner: &str) -> Result<Vec<Tracking>> {
    let mut reader = Reader::from_str(inner);
    reader.trim_text(true);

    let mut tracking = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"CustomTracking" => {
                tracking.extend(parser::parse_tracking_events(&mut reader, b"CustomTracking")?);
            }
            Event::Start(e) => {
                reader.read_to_end(e.name())?;
            }
            Event::Eof => break,
            _ => (),
        }
    }

    Ok(tracking)
}

/// Encode an extension using the shape matching its payload
pub(crate) fn write_extension(w: &mut XmlWriter, extension: &Extension) -> Result<()> {
    let mut start = BytesStart::new("Extension");
    if !extension.r#type.is_empty() {
        start.push_attribute(("type", extension.r#type.as_str()));
    }
    if !extension.name.is_empty() {
        start.push_attribute(("name", extension.name.as_str()));
    }
    for (key, value) in &extension.attributes {
        if RESERVED_ATTRIBUTES.contains(&key.as_str()) {
            continue;
        }
        start.push_attribute((key.as_str(), value.as_str()));
    }

    match WireShape::of(extension) {
        WireShape::Tracking(tracking) => {
            let end = start.to_end().into_owned();
            w.write_event(Event::Start(start))?;
            writer::write_tracking_events(w, "CustomTracking", tracking)?;
            w.write_event(Event::End(end))?;
        }
        WireShape::Data("") => {
            w.write_event(Event::Empty(start))?;
        }
        WireShape::Data(data) => writer::write_raw_element(w, start, data)?,
    }

    Ok(())
}
