// ── Content entity ──
//
// The subset of a content entity that decides micro site membership.
// A missing key means the entity type does not carry that field.

use serde::{Deserialize, Deserializer, Serialize};

use super::site::SiteId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntity {
    pub entity_type: String,
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,

    /// Main site reference. Only the first entry counts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<Vec<SiteId>>,

    /// Secondary site references.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_sites: Option<Vec<SiteId>>,

    /// Published on all micro sites (field storage variant).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_sites_all: Option<bool>,

    /// Published on all micro sites (base field variant).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_all: Option<bool>,

    /// Also published on the master host. A present but empty value is false.
    #[serde(
        default,
        deserialize_with = "present_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub include_master: Option<bool>,
}

impl ContentEntity {
    pub fn cache_tag(&self) -> String {
        format!("{}:{}", self.entity_type, self.id)
    }
}

fn present_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(Option::<bool>::deserialize(deserializer)?.unwrap_or(false)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_include_master_is_absent() {
        let entity: ContentEntity =
            serde_json::from_str(r#"{"entity_type":"node","id":"1"}"#).unwrap();
        assert_eq!(entity.include_master, None);
        assert_eq!(entity.cache_tag(), "node:1");
    }

    #[test]
    fn null_include_master_is_false() {
        let entity: ContentEntity =
            serde_json::from_str(r#"{"entity_type":"node","id":"1","include_master":null}"#)
                .unwrap();
        assert_eq!(entity.include_master, Some(false));
    }
}
