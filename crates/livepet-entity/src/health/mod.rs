//! Owner health data exposed read-only through share grants.

pub mod alert;
pub mod document;
pub mod record;
pub mod vital;

pub use alert::{Alert, AlertStatus};
pub use document::Document;
pub use record::{HealthRecord, NewHealthRecord, SHARE_EVENT_RECORD_TYPE};
pub use vital::Vital;
