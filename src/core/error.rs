// 错误处理系统
// 开发心理：生成器只有一种"预期内"的失败(无候选)，其余都是数据或配置问题

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneratorError {
    /// 当前槽位的要求下没有任何种族还能提供合法配置
    #[error("No candidate satisfies requirement: {requirement}")]
    NoCandidate { requirement: String },

    /// 道具候选全部被道具条款占用
    #[error("No unused item left for {identity}")]
    ItemsExhausted { identity: String },

    #[error("Invalid record {identity}: {reason}")]
    InvalidRecord { identity: String, reason: String },

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type GeneratorResult<T> = Result<T, GeneratorError>;

impl GeneratorError {
    pub fn no_candidate(requirement: impl ToString) -> Self {
        GeneratorError::NoCandidate {
            requirement: requirement.to_string(),
        }
    }

    pub fn invalid_record(identity: &str, reason: impl Into<String>) -> Self {
        GeneratorError::InvalidRecord {
            identity: identity.to_string(),
            reason: reason.into(),
        }
    }

    // 只有无候选可以通过重新生成整支队伍恢复
    pub fn is_recoverable(&self) -> bool {
        matches!(self, GeneratorError::NoCandidate { .. })
    }
}

impl From<serde_yaml::Error> for GeneratorError {
    fn from(error: serde_yaml::Error) -> Self {
        GeneratorError::Catalog(error.to_string())
    }
}

impl From<serde_json::Error> for GeneratorError {
    fn from(error: serde_json::Error) -> Self {
        GeneratorError::Catalog(error.to_string())
    }
}

impl From<toml::de::Error> for GeneratorError {
    fn from(error: toml::de::Error) -> Self {
        GeneratorError::Config(error.to_string())
    }
}

impl From<toml::ser::Error> for GeneratorError {
    fn from(error: toml::ser::Error) -> Self {
        GeneratorError::Config(error.to_string())
    }
}

// 错误创建辅助宏
#[macro_export]
macro_rules! generator_error {
    ($variant:ident, $msg:expr) => {
        $crate::core::error::GeneratorError::$variant($msg.to_string())
    };
    ($variant:ident, $fmt:expr, $($arg:tt)*) => {
        $crate::core::error::GeneratorError::$variant(format!($fmt, $($arg)*))
    };
}
