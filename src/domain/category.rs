use serde::Deserialize;

/// Hierarchy level of one category as reported by the commerce backend.
///
/// Root categories sit at level 1. `level` is optional because the backend may omit it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryLevel {
    pub uid: String,
    #[serde(default)]
    pub level: Option<u32>,
}

impl CategoryLevel {
    pub fn new(uid: impl Into<String>, level: Option<u32>) -> Self {
        Self {
            uid: uid.into(),
            level,
        }
    }
}
