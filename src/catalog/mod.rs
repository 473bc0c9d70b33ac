/*
 * VGC Team Generator - Catalog Module
 * 开发心理过程:
 * 1. 候选配置在启动时加载一次，之后只读
 * 2. 种族分组键在加载时建立索引，抽样时按组取成员
 */

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub mod loader;

pub use loader::*;

/// 单个值或候选列表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(value) => std::slice::from_ref(value),
            OneOrMany::Many(values) => values,
        }
    }

    pub fn is_choice(&self) -> bool {
        matches!(self, OneOrMany::Many(_))
    }
}

/// 招式槽位：固定招式或候选集合(候选本身可再嵌套一层)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MoveSlot {
    Fixed(String),
    Choice(Vec<MoveSlot>),
}

impl MoveSlot {
    pub fn fixed(&self) -> Option<&str> {
        match self {
            MoveSlot::Fixed(name) => Some(name),
            MoveSlot::Choice(_) => None,
        }
    }

    fn is_well_formed(&self) -> bool {
        match self {
            MoveSlot::Fixed(name) => !name.trim().is_empty(),
            MoveSlot::Choice(options) => {
                !options.is_empty() && options.iter().all(MoveSlot::is_well_formed)
            }
        }
    }
}

/// 角色三元组 (类别, 子类别, 细节)
///
/// 数据文件中写成 1~3 个字符串的列表，例如 `[offense, weather, sun]`。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct RoleTuple {
    pub category: String,
    pub subcategory: Option<String>,
    pub detail: Option<String>,
}

impl RoleTuple {
    pub fn new(category: &str, subcategory: Option<&str>, detail: Option<&str>) -> Self {
        Self {
            category: category.to_string(),
            subcategory: subcategory.map(str::to_string),
            detail: detail.map(str::to_string),
        }
    }

    /// 按位置取值，越界或缺省返回None
    pub fn get(&self, position: usize) -> Option<&str> {
        match position {
            0 => Some(&self.category),
            1 => self.subcategory.as_deref(),
            2 => self.detail.as_deref(),
            _ => None,
        }
    }
}

impl TryFrom<Vec<String>> for RoleTuple {
    type Error = String;

    fn try_from(parts: Vec<String>) -> Result<Self, Self::Error> {
        if parts.is_empty() || parts.len() > 3 {
            return Err(format!("role must have 1 to 3 entries, got {}", parts.len()));
        }

        let mut parts = parts.into_iter();
        Ok(Self {
            category: parts.next().unwrap_or_default(),
            subcategory: parts.next(),
            detail: parts.next(),
        })
    }
}

impl From<RoleTuple> for Vec<String> {
    fn from(role: RoleTuple) -> Self {
        std::iter::once(role.category)
            .chain(role.subcategory)
            .chain(role.detail)
            .collect()
    }
}

impl fmt::Display for RoleTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.category)?;
        if let Some(subcategory) = &self.subcategory {
            write!(f, "/{}", subcategory)?;
        }
        if let Some(detail) = &self.detail {
            write!(f, "/{}", detail)?;
        }
        Ok(())
    }
}

fn default_weight() -> f64 {
    1.0
}

/// 目录中的一条候选配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    #[serde(rename = "pokemon")]
    pub identity: String,
    pub item: OneOrMany<String>,
    pub ability: OneOrMany<String>,
    #[serde(rename = "spread")]
    pub loadout: OneOrMany<String>,
    #[serde(rename = "moves")]
    pub slots: Vec<MoveSlot>,
    #[serde(default)]
    pub roles: Vec<RoleTuple>,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl CandidateRecord {
    /// 种族分组键：截断第一个 `-` 之后的形态后缀
    pub fn group_key(&self) -> &str {
        group_key_of(&self.identity)
    }

    pub(crate) fn check(&self) -> Result<(), String> {
        if self.identity.trim().is_empty() {
            return Err("empty pokemon name".to_string());
        }
        if self.item.as_slice().is_empty() {
            return Err("empty item alternatives".to_string());
        }
        if self.ability.as_slice().is_empty() {
            return Err("empty ability alternatives".to_string());
        }
        if self.loadout.as_slice().is_empty() {
            return Err("empty spread alternatives".to_string());
        }
        if self.slots.len() < crate::constants::MOVES_PER_POKEMON {
            return Err(format!("only {} move slots", self.slots.len()));
        }
        if !self.slots.iter().all(MoveSlot::is_well_formed) {
            return Err("empty move alternative".to_string());
        }
        if !(self.weight.is_finite() && self.weight > 0.0) {
            return Err(format!("weight must be positive, got {}", self.weight));
        }
        Ok(())
    }
}

pub fn group_key_of(identity: &str) -> &str {
    match identity.split_once('-') {
        Some((head, tail)) if !tail.is_empty() => head,
        _ => identity,
    }
}

/// 能被要求(Requirement)检验的对象：候选配置与已生成的配置都满足
pub trait RoleBearer {
    fn roles(&self) -> &[RoleTuple];
    /// 尚未确定的道具候选；已生成的配置只有一个
    fn item_options(&self) -> &[String];
}

impl RoleBearer for CandidateRecord {
    fn roles(&self) -> &[RoleTuple] {
        &self.roles
    }

    fn item_options(&self) -> &[String] {
        self.item.as_slice()
    }
}

/// 只读候选目录
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<CandidateRecord>,
    groups: IndexMap<String, Vec<usize>>,
}

impl Catalog {
    pub fn new(records: Vec<CandidateRecord>) -> Self {
        let mut groups: IndexMap<String, Vec<usize>> = IndexMap::new();
        for (index, record) in records.iter().enumerate() {
            groups
                .entry(record.group_key().to_string())
                .or_default()
                .push(index);
        }

        Self { records, groups }
    }

    pub fn records(&self) -> &[CandidateRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&CandidateRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// 按首次出现顺序列出全部分组键
    pub fn group_keys(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// 某个分组下的全部 (下标, 配置)
    pub fn members<'a>(
        &'a self,
        group: &str,
    ) -> impl Iterator<Item = (usize, &'a CandidateRecord)> + 'a {
        self.groups
            .get(group)
            .map(|indices| indices.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |&index| (index, &self.records[index]))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// 测试用配置：四个固定招式，单一道具
    pub fn record(identity: &str, item: &str, roles: &[&[&str]]) -> CandidateRecord {
        CandidateRecord {
            identity: identity.to_string(),
            item: OneOrMany::One(item.to_string()),
            ability: OneOrMany::One("Pressure".to_string()),
            loadout: OneOrMany::One("EVs: 252 HP / 252 Def / 4 SpD\nBold Nature".to_string()),
            slots: ["Protect", "Tackle", "Growl", "Rest"]
                .iter()
                .map(|name| MoveSlot::Fixed(format!("{} ({})", name, identity)))
                .collect(),
            roles: roles
                .iter()
                .map(|parts| {
                    RoleTuple::new(
                        parts[0],
                        parts.get(1).copied(),
                        parts.get(2).copied(),
                    )
                })
                .collect(),
            weight: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::record;
    use super::*;

    #[test]
    fn test_group_key() {
        assert_eq!(group_key_of("Calyrex-Shadow"), "Calyrex");
        assert_eq!(group_key_of("Urshifu-Rapid-Strike"), "Urshifu");
        assert_eq!(group_key_of("Incineroar"), "Incineroar");
        assert_eq!(group_key_of("Odd-"), "Odd-");
    }

    #[test]
    fn test_role_tuple_parsing() {
        let role: RoleTuple = serde_yaml::from_str("[offense, weather, sun]").unwrap();
        assert_eq!(role, RoleTuple::new("offense", Some("weather"), Some("sun")));
        assert_eq!(role.get(2), Some("sun"));
        assert_eq!(role.get(3), None);
        assert_eq!(role.to_string(), "offense/weather/sun");

        let short: RoleTuple = serde_yaml::from_str("[restricted]").unwrap();
        assert_eq!(short.subcategory, None);

        assert!(serde_yaml::from_str::<RoleTuple>("[]").is_err());
        assert!(serde_yaml::from_str::<RoleTuple>("[a, b, c, d]").is_err());
    }

    #[test]
    fn test_record_parsing() {
        let yaml = r#"
pokemon: Whimsicott
item: [Focus Sash, Mental Herb]
ability: Prankster
spread: |
  EVs: 252 HP / 4 Def / 252 Spe
  Timid Nature
moves:
  - Tailwind
  - Moonblast
  - [Encore, [Taunt, Helping Hand]]
  - Protect
roles:
  - [support]
  - [speed, tailwind]
"#;
        let record: CandidateRecord = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(record.identity, "Whimsicott");
        assert!(record.item.is_choice());
        assert_eq!(record.item.as_slice().len(), 2);
        assert_eq!(record.ability.as_slice(), ["Prankster".to_string()]);
        assert_eq!(record.weight, 1.0);
        assert_eq!(record.slots[0].fixed(), Some("Tailwind"));
        assert_eq!(
            record.slots[2],
            MoveSlot::Choice(vec![
                MoveSlot::Fixed("Encore".to_string()),
                MoveSlot::Choice(vec![
                    MoveSlot::Fixed("Taunt".to_string()),
                    MoveSlot::Fixed("Helping Hand".to_string()),
                ]),
            ])
        );
        assert!(record.check().is_ok());
    }

    #[test]
    fn test_record_check() {
        let mut bad = record("Amoonguss", "Sitrus Berry", &[&["support"]]);
        bad.weight = 0.0;
        assert!(bad.check().is_err());

        let mut short = record("Amoonguss", "Sitrus Berry", &[&["support"]]);
        short.slots.truncate(3);
        assert!(short.check().is_err());

        let mut empty = record("Amoonguss", "Sitrus Berry", &[&["support"]]);
        empty.item = OneOrMany::Many(Vec::new());
        assert!(empty.check().is_err());
    }

    #[test]
    fn test_catalog_groups() {
        let catalog = Catalog::new(vec![
            record("Calyrex-Shadow", "Focus Sash", &[&["restricted"]]),
            record("Incineroar", "Sitrus Berry", &[&["support"]]),
            record("Calyrex-Ice", "Weakness Policy", &[&["restricted"]]),
        ]);

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.group_count(), 2);
        assert_eq!(
            catalog.group_keys().collect::<Vec<_>>(),
            vec!["Calyrex", "Incineroar"]
        );

        let members: Vec<usize> = catalog.members("Calyrex").map(|(i, _)| i).collect();
        assert_eq!(members, vec![0, 2]);
        assert_eq!(catalog.members("Missingno").count(), 0);
    }
}
