//! Integration tests for the drawplan planning engine
//!
//! Tests are organized by topic:
//! - `reference_data` - Reference table validation and lookups
//! - `planning` - End-to-end planner behavior across strategies
//! - `properties` - Property-based checks of the tax and planning laws
