//! Wire and in-memory data model: catalog entries, pack manifests and cards.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A non-negative count from a number or numeric string. Anything else
/// decodes as `None` instead of failing the whole record.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(count_from_value))
}

fn count_from_value(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= f64::from(u32::MAX))
                .map(|f| f as u64)
        })?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(n).ok()
}

/// One entry of `packs/packs.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackConfig {
    pub id: String,
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default)]
    pub name_for_checkbox: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl PackConfig {
    /// Folder under `packs/`, `None` when missing or blank.
    pub fn folder(&self) -> Option<&str> {
        self.folder.as_deref().filter(|f| !f.trim().is_empty())
    }

    /// Checkbox label, falling back to the pack id.
    pub fn label(&self) -> &str {
        self.name_for_checkbox
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.id)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }
}

/// `_packinfo.json` inside a pack folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub files: Vec<ManifestFile>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestFile {
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub sub_pack_name: Option<String>,
}

impl ManifestFile {
    pub fn path(&self) -> Option<&str> {
        self.file.as_deref().filter(|f| !f.is_empty())
    }

    pub fn sub_pack(&self) -> &str {
        self.sub_pack_name.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    #[serde(default)]
    pub skill_name: Option<String>,
    #[serde(default)]
    pub skill_description: Option<String>,
}

/// A single card record. The pack fields are not part of the data files;
/// they are attached by the pool builder through [`Card::tagged`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub faction: Option<String>,
    #[serde(default)]
    pub faction2: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub health: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub starting_health: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub initial_armor: Option<u32>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub parent_pack_name: String,
    #[serde(default)]
    pub sub_pack_name: String,
    #[serde(default)]
    pub display_pack: String,
}

impl Card {
    /// Attach pack provenance, deriving `display_pack` from both names.
    pub fn tagged(mut self, parent: &str, sub: &str) -> Self {
        self.display_pack = display_pack_name(parent, sub);
        self.parent_pack_name = parent.to_string();
        self.sub_pack_name = sub.to_string();
        self
    }
}

/// `"{parent} - {sub}"`, or just `parent` when `sub` is empty.
pub fn display_pack_name(parent: &str, sub: &str) -> String {
    if sub.is_empty() {
        parent.to_string()
    } else {
        format!("{} - {}", parent, sub)
    }
}

/// The aggregate of all cards from the selected packs, in pack-then-file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pool {
    pub cards: Vec<Card>,
    /// Parent display names of every pack whose manifest loaded, first-seen order.
    pub packs: Vec<String>,
}

impl Pool {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
