// 组队模块 - 聚合查询、槽位抽样、赛制配置表、组队流程、导出与诊断日志

pub mod builder;
pub mod format;
pub mod log;
pub mod queries;
pub mod render;
pub mod selector;

pub use builder::{Team, TeamBuilder};
pub use format::{Format, FormatRules, Gating, LeadRule, SlotSpec};
pub use self::log::GeneratorLog;
pub use render::{PasteRenderer, Renderer};
pub use selector::{DraftState, ResolvedPick, SlotSelector};
