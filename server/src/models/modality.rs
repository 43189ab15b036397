use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::models::document::{require_non_empty, Document};
use crate::services::policy::Resource;

/// A sport or activity offered by the gym. Names are not unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modality {
    pub name: String,
    pub active: bool,
}

impl Document for Modality {
    const COLLECTION: &'static str = "modalities";
    const RESOURCE: Resource = Resource::Modality;
    const SINGULAR: &'static str = "modality";
    const PLURAL: &'static str = "modalities";
    const LABEL: &'static str = "Modality";

    fn validate(&self) -> AppResult<()> {
        require_non_empty("name", &self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_active_is_required() {
        assert!(serde_json::from_value::<Modality>(json!({"name": "Yoga"})).is_err());

        let modality: Modality = serde_json::from_value(json!({"name": "Yoga", "active": false})).unwrap();
        assert!(!modality.active);
    }

    #[test]
    fn test_blank_name_is_invalid() {
        let modality = Modality {
            name: "".to_string(),
            active: true,
        };
        assert!(modality.validate().is_err());
    }
}
