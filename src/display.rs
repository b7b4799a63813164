//! Text shown for cards and statuses.
//!
//! Everything here is plain data so the components only have to place it.

use crate::model::{Card, Pool};
use crate::state::PoolStatus;

pub const UNKNOWN: &str = "?";
pub const PLACEHOLDER: &str = "...";
pub const NO_SKILLS: &str = "该武将无特殊技能。";
pub const UNKNOWN_SKILL_NAME: &str = "未知技能";
pub const UNKNOWN_SKILL_DESCRIPTION: &str = "暂无技能描述";

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Health as shown on a card.
///
/// `max` is the card's maximum health; `current` its starting health. When
/// they differ the result is `"current/max"`, otherwise just `max`.
pub fn format_health(current: Option<u32>, max: Option<u32>) -> String {
    match max {
        None => UNKNOWN.to_string(),
        Some(max) => match current {
            Some(current) if current != max => format!("{}/{}", current, max),
            _ => max.to_string(),
        },
    }
}

/// `"faction"` or `"faction / faction2"`.
pub fn faction_text(card: &Card, unknown: &str) -> String {
    let primary = non_blank(card.faction.as_deref()).unwrap_or(unknown);
    match non_blank(card.faction2.as_deref()) {
        Some(second) => format!("{} / {}", primary, second.trim()),
        None => primary.to_string(),
    }
}

/// Alt text for a card portrait.
pub fn image_alt(card: Option<&Card>) -> String {
    match card.and_then(|c| non_blank(c.name.as_deref())) {
        Some(name) => format!("{} 武将图片", name),
        None => "武将图片".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillLine {
    pub name: String,
    pub description: String,
}

/// Everything the detail panel shows for one card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDisplay {
    /// Value for the `data-faction` attribute; empty for the placeholder.
    pub faction_key: String,
    pub name: String,
    pub faction: String,
    pub gender: String,
    pub health: String,
    /// `Some` only when the card starts with armor.
    pub armor: Option<String>,
    pub pack: String,
    pub image: Option<String>,
    pub image_alt: String,
    pub skills: Vec<SkillLine>,
    /// Text shown instead of the skill list when it is empty.
    pub skills_note: Option<&'static str>,
}

impl CardDisplay {
    /// Render `card`, or the neutral placeholder when there is none.
    pub fn render(card: Option<&Card>) -> Self {
        let Some(card) = card else {
            return Self {
                faction_key: String::new(),
                name: UNKNOWN.into(),
                faction: format!("势力: {}", UNKNOWN),
                gender: format!("性别: {}", UNKNOWN),
                health: format!("体力: {}", UNKNOWN),
                armor: None,
                pack: String::new(),
                image: None,
                image_alt: image_alt(None),
                skills: Vec::new(),
                skills_note: Some(PLACEHOLDER),
            };
        };

        let skills: Vec<SkillLine> = card
            .skills
            .iter()
            .map(|s| SkillLine {
                name: non_blank(s.skill_name.as_deref())
                    .unwrap_or(UNKNOWN_SKILL_NAME)
                    .to_string(),
                description: non_blank(s.skill_description.as_deref())
                    .unwrap_or(UNKNOWN_SKILL_DESCRIPTION)
                    .to_string(),
            })
            .collect();

        Self {
            faction_key: non_blank(card.faction.as_deref()).unwrap_or("").to_string(),
            name: non_blank(card.name.as_deref()).unwrap_or(UNKNOWN).to_string(),
            faction: format!("势力: {}", faction_text(card, UNKNOWN)),
            gender: format!(
                "性别: {}",
                non_blank(card.gender.as_deref()).unwrap_or(UNKNOWN)
            ),
            health: format!(
                "体力: {}",
                format_health(card.starting_health, card.health)
            ),
            armor: card
                .initial_armor
                .filter(|a| *a > 0)
                .map(|a| a.to_string()),
            pack: if card.display_pack.is_empty() {
                String::new()
            } else {
                format!("({})", card.display_pack)
            },
            image: non_blank(card.image.as_deref()).map(String::from),
            image_alt: image_alt(Some(card)),
            skills_note: skills.is_empty().then_some(NO_SKILLS),
            skills,
        }
    }
}

/// One tile in the selection carousel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselItem {
    pub name: String,
    pub caption: String,
    pub image: Option<String>,
    pub image_alt: String,
}

impl CarouselItem {
    pub fn render(card: &Card) -> Self {
        let pack = if card.display_pack.is_empty() {
            "未知包"
        } else {
            &card.display_pack
        };
        Self {
            name: non_blank(card.name.as_deref()).unwrap_or("未知名称").to_string(),
            caption: format!("{} ({})", faction_text(card, "？"), pack),
            image: non_blank(card.image.as_deref()).map(String::from),
            image_alt: image_alt(Some(card)),
        }
    }
}

/// Line shown under the pack selector.
pub fn pool_status_text(status: &PoolStatus, pool: &Pool) -> String {
    match status {
        PoolStatus::LoadingCatalog => "正在加载扩展包列表...".into(),
        PoolStatus::CatalogFailed => "加载扩展包列表失败。".into(),
        PoolStatus::Building => "正在构建卡池...".into(),
        PoolStatus::EmptySelection => "请至少选择一个扩展包！".into(),
        PoolStatus::Ready => format!(
            "当前卡池共 {} 名武将 (来自: {})",
            pool.len(),
            pool.packs.join(", ")
        ),
        PoolStatus::NoCards => "加载完成，但未找到有效的武将数据。".into(),
        PoolStatus::Cancelled => "卡池构建已取消。".into(),
        PoolStatus::Failed(message) => format!("构建卡池失败: {}", message),
    }
}

/// Message shown in place of the pack list when the catalog did not load.
pub fn catalog_error_text(message: &str) -> String {
    format!("错误：无法加载扩展包列表 ({})。", message)
}

pub const EMPTY_CATALOG: &str = "未能加载扩展包列表。";

/// `(label, title)` for the lock button.
pub fn lock_labels(locked: bool) -> (&'static str, &'static str) {
    if locked {
        ("锁定", "解锁卡牌")
    } else {
        ("解锁", "锁定卡牌")
    }
}
