//! Identifier generation for yard entities

use uuid::Uuid;

/// Fresh opaque identifier for a yard, layer, container, door or field
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
