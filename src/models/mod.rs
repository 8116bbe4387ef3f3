//! Data models for ParkPass

pub mod map;
pub mod park;
pub mod status;
pub mod user;
pub mod visit;

// Re-export commonly used types
pub use map::{MapMarker, MapView};
pub use park::{Park, ParkFilter, ParkShort};
pub use status::{ParkDisplayState, ParkStatus, ProgressView, Summary};
pub use user::UserClaims;
pub use visit::{UpsertOutcome, UpsertResult, Visit, VisitShort, VisitWrite};
