/*
 * VGC Team Generator - Requirement Algebra
 * 开发心理过程:
 * 1. 要求是带名字的布尔谓词，组合后仍可检查、可打印，便于诊断日志
 * 2. 叶子只有角色匹配与道具条款两种，其余语义规则全部由组合子拼出
 */

use std::fmt;

use crate::catalog::{RoleBearer, RoleTuple};

pub mod rules;

/// 角色模式中的单个位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternElem {
    /// 通配
    Any,
    Exact(String),
    /// 取值属于列表即可
    OneOf(Vec<String>),
}

impl PatternElem {
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            PatternElem::Any => true,
            PatternElem::Exact(expected) => value == Some(expected.as_str()),
            PatternElem::OneOf(options) => {
                value.map_or(false, |value| options.iter().any(|option| option == value))
            }
        }
    }
}

impl From<&str> for PatternElem {
    fn from(value: &str) -> Self {
        PatternElem::Exact(value.to_string())
    }
}

impl From<String> for PatternElem {
    fn from(value: String) -> Self {
        PatternElem::Exact(value)
    }
}

impl From<&String> for PatternElem {
    fn from(value: &String) -> Self {
        PatternElem::Exact(value.clone())
    }
}

impl From<Option<&str>> for PatternElem {
    fn from(value: Option<&str>) -> Self {
        value.map_or(PatternElem::Any, PatternElem::from)
    }
}

impl From<Vec<String>> for PatternElem {
    fn from(values: Vec<String>) -> Self {
        PatternElem::OneOf(values)
    }
}

impl From<&[String]> for PatternElem {
    fn from(values: &[String]) -> Self {
        PatternElem::OneOf(values.to_vec())
    }
}

impl From<&Vec<String>> for PatternElem {
    fn from(values: &Vec<String>) -> Self {
        PatternElem::OneOf(values.clone())
    }
}

impl fmt::Display for PatternElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternElem::Any => write!(f, "*"),
            PatternElem::Exact(value) => write!(f, "{}", value),
            PatternElem::OneOf(options) => write!(f, "[{}]", options.join("|")),
        }
    }
}

/// 按位置匹配角色三元组的模式；长度可以短于三元组
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePattern(pub Vec<PatternElem>);

impl RolePattern {
    pub fn matches(&self, role: &RoleTuple) -> bool {
        self.0
            .iter()
            .enumerate()
            .all(|(position, elem)| elem.matches(role.get(position)))
    }
}

impl From<Vec<PatternElem>> for RolePattern {
    fn from(elems: Vec<PatternElem>) -> Self {
        RolePattern(elems)
    }
}

impl fmt::Display for RolePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "role(")?;
        for (i, elem) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", elem)?;
        }
        write!(f, ")")
    }
}

/// 可组合的候选谓词
#[derive(Debug, Clone, PartialEq)]
pub enum Requirement {
    Role(RolePattern),
    ItemClause(Vec<String>),
    Not(Box<Requirement>),
    And(Vec<Requirement>),
    Or(Vec<Requirement>),
    None,
    /// 语义规则：只附加名字，检验时透明
    Named(String, Box<Requirement>),
}

impl Requirement {
    pub fn role(pattern: impl Into<RolePattern>) -> Self {
        Requirement::Role(pattern.into())
    }

    pub fn item_clause(used_items: &[String]) -> Self {
        Requirement::ItemClause(used_items.to_vec())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(requirement: Requirement) -> Self {
        Requirement::Not(Box::new(requirement))
    }

    pub fn and(requirements: Vec<Requirement>) -> Self {
        Requirement::And(requirements)
    }

    pub fn or(requirements: Vec<Requirement>) -> Self {
        Requirement::Or(requirements)
    }

    pub fn none() -> Self {
        Requirement::None
    }

    pub fn named(name: impl Into<String>, requirement: Requirement) -> Self {
        Requirement::Named(name.into(), Box::new(requirement))
    }

    pub fn test<T: RoleBearer + ?Sized>(&self, subject: &T) -> bool {
        match self {
            Requirement::Role(pattern) => {
                subject.roles().iter().any(|role| pattern.matches(role))
            }
            Requirement::ItemClause(used) => subject
                .item_options()
                .iter()
                .any(|item| !used.contains(item)),
            Requirement::Not(inner) => !inner.test(subject),
            Requirement::And(all) => all.iter().all(|r| r.test(subject)),
            Requirement::Or(any) => any.iter().any(|r| r.test(subject)),
            Requirement::None => true,
            Requirement::Named(_, inner) => inner.test(subject),
        }
    }

    /// 序列中是否存在满足要求的元素
    pub fn test_in<'a, T, I>(&self, items: I) -> bool
    where
        T: RoleBearer + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        items.into_iter().any(|item| self.test(item))
    }

    pub fn count_in<'a, T, I>(&self, items: I) -> usize
    where
        T: RoleBearer + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        items.into_iter().filter(|item| self.test(*item)).count()
    }

    pub fn name(&self) -> String {
        self.to_string()
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, label: &str, items: &[Requirement]) -> fmt::Result {
    write!(f, "{}(", label)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    write!(f, ")")
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Role(pattern) => write!(f, "{}", pattern),
            Requirement::ItemClause(used) => write!(f, "itemClause[{}]", used.join(", ")),
            Requirement::Not(inner) => write!(f, "not({})", inner),
            Requirement::And(all) => write_list(f, "and", all),
            Requirement::Or(any) => write_list(f, "or", any),
            Requirement::None => write!(f, "none"),
            Requirement::Named(name, _) => write!(f, "{}", name),
        }
    }
}

/// 构造角色要求，`_` 表示通配
///
/// ```
/// use vgc_teamgen::role;
/// let sun = role!(_, "weather", "sun");
/// assert_eq!(sun.to_string(), "role(*, weather, sun)");
/// ```
#[macro_export]
macro_rules! role {
    (@elem _) => {
        $crate::requirement::PatternElem::Any
    };
    (@elem $elem:expr) => {
        $crate::requirement::PatternElem::from($elem)
    };
    ($($elem:tt),+ $(,)?) => {
        $crate::requirement::Requirement::role(vec![$($crate::role!(@elem $elem)),+])
    };
}
