//! Patient feature schema and canonical layout.

pub mod layout;
pub mod record;

pub use layout::{
    layout_hash, LayoutInfo, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION, TARGET_COLUMN,
};
pub use record::PatientRecord;
