//! CoT event structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel TAK clients special-case for "value unknown".
///
/// The literal string must survive serialization byte-exact, which is why
/// point fields are strings rather than floats (a float would render as
/// `9999999`).
pub const UNKNOWN: &str = "9999999.0";

/// Default CoT type: atom, friendly, ground, unit, combat.
pub const DEFAULT_EVENT_TYPE: &str = "a-f-G-U-C";

/// Default how: human, estimated.
pub const DEFAULT_HOW: &str = "h-e";

/// A single Cursor on Target event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CotEvent {
    /// Unique identifier for this event
    pub uid: String,
    /// CoT type, a hierarchical taxonomy string (e.g. "a-f-G-U-C")
    #[serde(rename = "type")]
    pub event_type: String,
    /// How the event was generated (e.g. "h-e" for human-entered)
    pub how: String,
    /// Event start time
    pub start: DateTime<Utc>,
    /// Event timestamp; mirrors the stale time on the wire
    pub time: DateTime<Utc>,
    /// Time at which the event becomes invalid
    pub stale: DateTime<Utc>,
    /// Optional geographic location
    pub point: Option<Point>,
    /// Optional detail section; at most one per event
    pub detail: Option<Detail>,
}

impl CotEvent {
    /// Creates an event with default type and how.
    ///
    /// Any string is accepted as `uid`; no uniqueness or taxonomy checks
    /// are performed.
    pub fn new(
        start: DateTime<Utc>,
        stale: DateTime<Utc>,
        uid: impl Into<String>,
    ) -> Self {
        Self {
            uid: uid.into(),
            event_type: DEFAULT_EVENT_TYPE.to_string(),
            how: DEFAULT_HOW.to_string(),
            start,
            time: stale,
            stale,
            point: None,
            detail: None,
        }
    }

    /// Sets the CoT type.
    pub fn with_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    /// Sets the how field.
    pub fn with_how(mut self, how: impl Into<String>) -> Self {
        self.how = how.into();
        self
    }

    /// Attaches a point child, replacing any existing one.
    pub fn set_point(&mut self, point: Point) -> &mut Self {
        self.point = Some(point);
        self
    }

    /// Builder-style variant of [`set_point`](Self::set_point).
    pub fn with_point(mut self, point: Point) -> Self {
        self.point = Some(point);
        self
    }

    /// Appends a named sub-element to the event's detail section.
    ///
    /// The detail container is created on first use and reused afterwards;
    /// an event can never own more than one.
    pub fn add_detail(
        &mut self,
        tag: impl Into<String>,
        attributes: Vec<(String, String)>,
        text: Option<String>,
    ) -> &mut Self {
        self.detail
            .get_or_insert_with(Detail::default)
            .entries
            .push(DetailEntry {
                tag: tag.into(),
                attributes,
                text,
            });
        self
    }

    /// Returns true if the event owns a detail container.
    pub fn has_detail(&self) -> bool {
        self.detail.is_some()
    }
}

/// Geographic point with accuracy metrics.
///
/// Every field is a decimal string; unspecified fields carry the
/// [`UNKNOWN`] sentinel, never zero and never absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    /// Latitude in decimal degrees
    pub lat: String,
    /// Longitude in decimal degrees
    pub lon: String,
    /// Circular error in meters
    pub ce: String,
    /// Height above ellipsoid in meters
    pub hae: String,
    /// Linear error in meters
    pub le: String,
}

impl Default for Point {
    fn default() -> Self {
        Self {
            lat: UNKNOWN.to_string(),
            lon: UNKNOWN.to_string(),
            ce: UNKNOWN.to_string(),
            hae: UNKNOWN.to_string(),
            le: UNKNOWN.to_string(),
        }
    }
}

impl Point {
    /// Creates a point at the given position with unknown accuracy.
    pub fn new(lat: impl ToString, lon: impl ToString) -> Self {
        Self {
            lat: lat.to_string(),
            lon: lon.to_string(),
            ..Default::default()
        }
    }

    /// Creates a point with every field specified.
    pub fn with_accuracy(
        lat: impl ToString,
        lon: impl ToString,
        ce: impl ToString,
        hae: impl ToString,
        le: impl ToString,
    ) -> Self {
        Self {
            lat: lat.to_string(),
            lon: lon.to_string(),
            ce: ce.to_string(),
            hae: hae.to_string(),
            le: le.to_string(),
        }
    }
}

/// The detail section: named sub-elements with attribute maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Detail {
    /// Sub-elements in insertion order
    pub entries: Vec<DetailEntry>,
}

/// One named sub-element under `<detail>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailEntry {
    /// Element tag name
    pub tag: String,
    /// Attributes in insertion order
    pub attributes: Vec<(String, String)>,
    /// Optional text content
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_times() -> (DateTime<Utc>, DateTime<Utc>) {
        let start = Utc::now();
        (start, start + Duration::minutes(5))
    }

    #[test]
    fn test_new_event_defaults() {
        let (start, stale) = sample_times();
        let event = CotEvent::new(start, stale, "test-1");

        assert_eq!(event.uid, "test-1");
        assert_eq!(event.event_type, "a-f-G-U-C");
        assert_eq!(event.how, "h-e");
        assert_eq!(event.start, start);
        assert_eq!(event.time, stale);
        assert_eq!(event.stale, stale);
        assert!(event.point.is_none());
        assert!(event.detail.is_none());
    }

    #[test]
    fn test_builder_overrides() {
        let (start, stale) = sample_times();
        let event = CotEvent::new(start, stale, "track-9")
            .with_type("a-h-A-M-F")
            .with_how("m-g");

        assert_eq!(event.event_type, "a-h-A-M-F");
        assert_eq!(event.how, "m-g");
    }

    #[test]
    fn test_point_defaults_to_sentinel() {
        let point = Point::default();
        assert_eq!(point.lat, UNKNOWN);
        assert_eq!(point.lon, UNKNOWN);
        assert_eq!(point.ce, UNKNOWN);
        assert_eq!(point.hae, UNKNOWN);
        assert_eq!(point.le, UNKNOWN);
    }

    #[test]
    fn test_point_specified_values_verbatim() {
        let point = Point::new(37.7749, -122.4194);
        assert_eq!(point.lat, "37.7749");
        assert_eq!(point.lon, "-122.4194");
        assert_eq!(point.hae, UNKNOWN);

        let full = Point::with_accuracy("37.0", "-122.0", 10.0, 100.5, 5.0);
        assert_eq!(full.ce, "10");
        assert_eq!(full.hae, "100.5");
    }

    #[test]
    fn test_add_detail_reuses_single_container() {
        let (start, stale) = sample_times();
        let mut event = CotEvent::new(start, stale, "detail-test");

        event.add_detail(
            "contact",
            vec![("callsign".to_string(), "Alpha-1".to_string())],
            None,
        );
        event.add_detail("remarks", vec![], Some("on station".to_string()));

        let detail = event.detail.as_ref().unwrap();
        assert_eq!(detail.entries.len(), 2);
        assert_eq!(detail.entries[0].tag, "contact");
        assert_eq!(detail.entries[1].text.as_deref(), Some("on station"));
    }
}
