// 生成日志 - 只记录当前槽位使用的要求与被排除的种族，崩溃时连同当前队伍一起输出

use log::debug;

use super::selector::ResolvedPick;
use crate::core::error::GeneratorError;
use crate::requirement::Requirement;

#[derive(Debug, Clone, Default)]
pub struct GeneratorLog {
    exports: Vec<String>,
    set_log: String,
}

impl GeneratorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_set(&mut self, requirement: &Requirement) {
        self.set_log = format!("Generating with req: {}\n\n", requirement);
        debug!("开始生成槽位: {}", requirement);
    }

    pub fn none_found(&mut self, group: &str) {
        self.set_log.push_str(&format!("No sets found for {}\n", group));
        debug!("种族 {} 没有满足要求的配置", group);
    }

    pub fn record_pick(&mut self, pick: &ResolvedPick) {
        self.exports.push(pick.export.clone());
    }

    pub fn set_log(&self) -> &str {
        &self.set_log
    }

    /// 崩溃报告：错误、当前队伍与最后一个槽位的日志
    pub fn crash_report(&self, error: &GeneratorError) -> String {
        format!(
            "Error: {}\n\nCurrent Team:\n{}\n\nGenerator Log:\n{}",
            error,
            self.exports.join("\n\n"),
            self.set_log.trim_end()
        )
    }
}
