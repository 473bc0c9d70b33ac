// 赛制配置表 - 各赛制只在首发规则、第二只禁止级与极巨化门槛上不同
// 配置是数据，由同一个组队流程消费

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::constants::TEAM_SIZE;
use crate::core::error::GeneratorError;
use crate::requirement::Requirement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Series8,
    Series9,
    Series10,
    Series11,
    Series12,
}

impl Format {
    pub const ALL: [Format; 5] = [
        Format::Series8,
        Format::Series9,
        Format::Series10,
        Format::Series11,
        Format::Series12,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Format::Series8 => "VGC 2021 Series 8",
            Format::Series9 => "VGC 2021 Series 9",
            Format::Series10 => "VGC 2021 Series 10",
            Format::Series11 => "VGC 2021 Series 11",
            Format::Series12 => "VGC 2022 Series 12",
        }
    }

    pub fn rules(&self) -> FormatRules {
        use SlotSpec::*;

        let (lead, third, gating) = match self {
            Format::Series8 => (LeadRule::Restricted, Core, Gating::Max),
            Format::Series9 => (LeadRule::OffenseNonRestricted, Core, Gating::Max),
            Format::Series10 => (LeadRule::Restricted, Core, Gating::Nonmax),
            Format::Series11 => (LeadRule::Restricted, Core, Gating::Max),
            Format::Series12 => (LeadRule::Restricted, SecondRestricted, Gating::Max),
        };

        FormatRules {
            format: *self,
            lead,
            slots: [Lead, Partner, third, Core, Balance, Closer],
            gating,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

impl FromStr for Format {
    type Err = GeneratorError;

    /// 接受 `series9`、`9`、`Series 9` 等写法
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        let number = normalized.trim_start_matches("series");

        match number {
            "8" => Ok(Format::Series8),
            "9" => Ok(Format::Series9),
            "10" => Ok(Format::Series10),
            "11" => Ok(Format::Series11),
            "12" => Ok(Format::Series12),
            _ => Err(GeneratorError::Config(format!("Unknown format: {}", s))),
        }
    }
}

/// 首发槽位的要求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadRule {
    Any,
    Restricted,
    OffenseNonRestricted,
}

impl LeadRule {
    pub fn requirement(&self) -> Requirement {
        match self {
            LeadRule::Any => Requirement::none(),
            LeadRule::Restricted => Requirement::restricted(),
            LeadRule::OffenseNonRestricted => Requirement::and(vec![
                Requirement::offense(),
                Requirement::not(Requirement::restricted()),
            ]),
        }
    }
}

/// 极巨化门槛，附加到每个槽位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gating {
    Max,
    Nonmax,
}

impl Gating {
    pub fn requirement(&self) -> Requirement {
        match self {
            Gating::Max => Requirement::max_format(),
            Gating::Nonmax => Requirement::nonmax_format(),
        }
    }

    pub fn allows_dynamax(&self) -> bool {
        matches!(self, Gating::Max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotSpec {
    /// 首发，由 `LeadRule` 决定
    Lead,
    /// 极巨化对象或输出搭档
    Partner,
    Core,
    SecondRestricted,
    /// 补全弱点保险/空间/强化/辅助
    Balance,
    /// 补全天气手/场地手/空间，否则自由选择
    Closer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatRules {
    pub format: Format,
    pub lead: LeadRule,
    pub slots: [SlotSpec; TEAM_SIZE],
    pub gating: Gating,
}

impl FormatRules {
    pub fn restricted_slots(&self) -> usize {
        let extra = self
            .slots
            .iter()
            .filter(|slot| **slot == SlotSpec::SecondRestricted)
            .count();
        let lead = usize::from(self.lead == LeadRule::Restricted);
        lead + extra
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::record;

    #[test]
    fn test_format_table() {
        let s10 = Format::Series10.rules();
        assert_eq!(s10.lead, LeadRule::Restricted);
        assert_eq!(s10.gating, Gating::Nonmax);
        assert_eq!(s10.restricted_slots(), 1);

        let s9 = Format::Series9.rules();
        assert_eq!(s9.lead, LeadRule::OffenseNonRestricted);
        assert_eq!(s9.restricted_slots(), 0);

        let s12 = Format::Series12.rules();
        assert_eq!(s12.slots[2], SlotSpec::SecondRestricted);
        assert_eq!(s12.restricted_slots(), 2);

        for format in Format::ALL {
            let rules = format.rules();
            assert_eq!(rules.slots[0], SlotSpec::Lead);
            assert_eq!(rules.slots[5], SlotSpec::Closer);
        }
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("series9".parse::<Format>().unwrap(), Format::Series9);
        assert_eq!("Series 12".parse::<Format>().unwrap(), Format::Series12);
        assert_eq!("10".parse::<Format>().unwrap(), Format::Series10);
        assert!("series13".parse::<Format>().is_err());
        assert_eq!(Format::Series12.to_string(), "VGC 2022 Series 12");
    }

    #[test]
    fn test_lead_rules() {
        let zacian = record("Zacian", "Rusted Sword", &[&["restricted"], &["offense"]]);
        let urshifu = record("Urshifu", "Focus Sash", &[&["offense"]]);

        assert!(LeadRule::Restricted.requirement().test(&zacian));
        assert!(!LeadRule::Restricted.requirement().test(&urshifu));
        assert!(!LeadRule::OffenseNonRestricted.requirement().test(&zacian));
        assert!(LeadRule::OffenseNonRestricted.requirement().test(&urshifu));
        assert!(LeadRule::Any.requirement().test(&zacian));
    }

    #[test]
    fn test_gating() {
        assert!(Gating::Max.allows_dynamax());
        assert!(!Gating::Nonmax.allows_dynamax());
        let gmax = record("Charizard-Gmax", "Life Orb", &[&["max"]]);
        assert!(!Gating::Nonmax.requirement().test(&gmax));
    }
}
