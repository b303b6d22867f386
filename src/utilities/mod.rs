// Utilities module
// Helper functions shared by controls, rendering and the builder

pub mod format;
pub mod patterns;

pub use format::{canonical_color, canonical_date, canonical_time, format_number, hex_color, parse_color};
pub use patterns::{matches_pattern, AcceptFilter};
