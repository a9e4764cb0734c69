use serde::{Deserialize, Serialize};

/// An order header. `id` is unique within a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Order {
    pub id: i32,
    pub label: String,
}

impl Order {
    pub fn new(id: i32, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }

    /// Order with the label format used by generated datasets.
    pub fn numbered(id: i32) -> Self {
        Self::new(id, format!("Number {id}"))
    }
}
