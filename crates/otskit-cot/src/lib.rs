//! Cursor on Target (CoT) event construction for TAK plugins.
//!
//! CoT is the XML wire format TAK clients exchange for position and event
//! reporting. Plugins build one [`CotEvent`] per outgoing message, serialize
//! it with [`serialize_event`], and hand the text to the host for
//! distribution; events are transient and never persisted.
//!
//! This crate only builds and serializes events. It does not parse CoT,
//! validate type taxonomies, or check uid uniqueness.
//!
//! # Example
//!
//! ```rust
//! use chrono::{Duration, Utc};
//! use otskit_cot::{serialize_event, CotEvent, Point};
//!
//! let now = Utc::now();
//! let mut event = CotEvent::new(now, now + Duration::minutes(5), "unit-42");
//! event.set_point(Point::new(37.7749, -122.4194));
//! event.add_detail(
//!     "contact",
//!     vec![("callsign".to_string(), "Alpha-1".to_string())],
//!     None,
//! );
//!
//! let xml = serialize_event(&event);
//! assert!(xml.contains(r#"uid="unit-42""#));
//! ```

pub mod event;
pub mod serializer;

pub use event::{CotEvent, Detail, DetailEntry, Point, DEFAULT_EVENT_TYPE, DEFAULT_HOW, UNKNOWN};
pub use serializer::{cot_timestamp, serialize_event};
