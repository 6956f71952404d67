//! Data models for TickMyPax

pub mod archive_record;
pub mod import_report;
pub mod passenger_record;
pub mod stats;
pub mod tour;
pub mod user;

// Re-export commonly used types
pub use archive_record::ArchivePassengerRecord;
pub use import_report::ImportReport;
pub use passenger_record::{CheckInStatus, NewPassengerRecord, PassengerRecord};
pub use stats::{GuideStats, TourStats};
pub use tour::{Passenger, Tour, TourWithPassengers};
pub use user::{Role, User, UserClaims};
