//! XML serialization for CoT events.

use crate::event::{CotEvent, Detail};
use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::escape::escape;
use std::fmt::Write;

/// Formats a timestamp the way TAK clients expect: ISO-8601 with
/// millisecond precision and a `Z` suffix.
pub fn cot_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serializes an event to XML text.
///
/// Detail tags, attributes, and text are caller-supplied free text and are
/// escaped; the remaining fields are plugin-controlled and written as-is.
pub fn serialize_event(event: &CotEvent) -> String {
    let mut xml = String::new();

    writeln!(xml, r#"<?xml version="1.0" encoding="UTF-8"?>"#).unwrap();

    write!(
        xml,
        r#"<event version="2.0" uid="{}" type="{}" time="{}" start="{}" stale="{}" how="{}">"#,
        escape(event.uid.as_str()),
        escape(event.event_type.as_str()),
        cot_timestamp(&event.time),
        cot_timestamp(&event.start),
        cot_timestamp(&event.stale),
        escape(event.how.as_str()),
    )
    .unwrap();

    if let Some(ref point) = event.point {
        write!(
            xml,
            r#"<point lat="{}" lon="{}" hae="{}" ce="{}" le="{}"/>"#,
            escape(point.lat.as_str()),
            escape(point.lon.as_str()),
            escape(point.hae.as_str()),
            escape(point.ce.as_str()),
            escape(point.le.as_str()),
        )
        .unwrap();
    }

    if let Some(ref detail) = event.detail {
        serialize_detail(&mut xml, detail);
    }

    write!(xml, "</event>").unwrap();
    xml
}

fn serialize_detail(xml: &mut String, detail: &Detail) {
    write!(xml, "<detail>").unwrap();

    for entry in &detail.entries {
        write!(xml, "<{}", escape(entry.tag.as_str())).unwrap();
        for (name, value) in &entry.attributes {
            write!(
                xml,
                r#" {}="{}""#,
                escape(name.as_str()),
                escape(value.as_str())
            )
            .unwrap();
        }

        match entry.text {
            Some(ref text) => {
                write!(xml, ">{}</{}>", escape(text.as_str()), escape(entry.tag.as_str()))
                    .unwrap();
            }
            None => {
                write!(xml, "/>").unwrap();
            }
        }
    }

    write!(xml, "</detail>").unwrap();
}
