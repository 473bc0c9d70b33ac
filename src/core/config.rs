/*
* 开发心理过程：
* 1. 生成器配置来自TOML文件，文件不存在时写出默认配置
* 2. 命令行参数覆盖文件中的值，覆盖后重新验证
* 3. 验证失败统一返回 GeneratorError::Config
*/

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use log::{debug, info, LevelFilter};

use crate::constants::{DEFAULT_LEVEL, DEFAULT_MAX_ATTEMPTS, SHINY_RATE};
use crate::core::error::{GeneratorError, GeneratorResult};
use crate::team::format::Format;

pub const DEFAULT_CONFIG_PATH: &str = "config/teamgen.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub format: Format,
    pub level: u8,
    pub shiny_rate: f64,
    /// 打乱输出顺序；关闭后按槽位顺序输出
    pub shuffle: bool,
    pub max_attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// 为空字符串以外的任何路径；`bundled` 表示使用内置配置集
    pub path: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            generation: GenerationConfig::default(),
            catalog: CatalogConfig::default(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            format: Format::Series12,
            level: DEFAULT_LEVEL,
            shiny_rate: SHINY_RATE,
            shuffle: true,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: crate::catalog::BUNDLED_CATALOG.to_string(),
        }
    }
}

/// 命令行中可以覆盖的配置项
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub format: Option<Format>,
    pub catalog: Option<String>,
    pub max_attempts: Option<u32>,
    pub ordered: bool,
    pub verbose: bool,
}

pub struct ConfigManager {
    config: GeneratorConfig,
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: impl Into<PathBuf>) -> GeneratorResult<Self> {
        let config_path = config_path.into();
        let config = Self::load_from_file(&config_path)?;

        Ok(Self {
            config,
            config_path,
        })
    }

    pub fn get_config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn update_config<F>(&mut self, updater: F) -> GeneratorResult<()>
    where
        F: FnOnce(&mut GeneratorConfig),
    {
        let mut updated = self.config.clone();
        updater(&mut updated);
        Self::validate_config(&updated)?;

        Self::save_config_to_file(&updated, &self.config_path)?;
        self.config = updated;

        info!("配置已更新并保存");
        Ok(())
    }

    /// 应用命令行覆盖，不写回文件
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) -> GeneratorResult<()> {
        let mut config = self.config.clone();

        if let Some(format) = overrides.format {
            config.generation.format = format;
        }
        if let Some(path) = &overrides.catalog {
            config.catalog.path = path.clone();
        }
        if let Some(max_attempts) = overrides.max_attempts {
            config.generation.max_attempts = max_attempts;
        }
        if overrides.ordered {
            config.generation.shuffle = false;
        }
        if overrides.verbose {
            config.general.log_level = "debug".to_string();
        }

        Self::validate_config(&config)?;
        self.config = config;
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> GeneratorResult<GeneratorConfig> {
        if !path.exists() {
            info!("配置文件不存在，创建默认配置: {:?}", path);
            let default_config = GeneratorConfig::default();
            Self::save_config_to_file(&default_config, path)?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(path)?;
        let config: GeneratorConfig = toml::from_str(&content).map_err(|e| {
            GeneratorError::Config(format!("解析配置文件失败: {}", e))
        })?;

        Self::validate_config(&config)?;
        info!("成功加载配置文件: {:?}", path);
        Ok(config)
    }

    pub fn save_config_to_file(config: &GeneratorConfig, path: &Path) -> GeneratorResult<()> {
        let content = toml::to_string_pretty(config).map_err(|e| {
            GeneratorError::Config(format!("序列化配置失败: {}", e))
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, content)?;
        debug!("配置已保存到: {:?}", path);
        Ok(())
    }

    pub fn validate_config(config: &GeneratorConfig) -> GeneratorResult<()> {
        if LevelFilter::from_str(&config.general.log_level).is_err() {
            return Err(GeneratorError::Config(format!(
                "无效的日志级别: {} (可选 off/error/warn/info/debug/trace)",
                config.general.log_level
            )));
        }

        let generation = &config.generation;

        if !(0.0..=1.0).contains(&generation.shiny_rate) {
            return Err(GeneratorError::Config("闪光概率必须在0.0-1.0之间".to_string()));
        }

        if generation.level == 0 || generation.level > 100 {
            return Err(GeneratorError::Config("等级必须在1-100之间".to_string()));
        }

        if generation.max_attempts == 0 {
            return Err(GeneratorError::Config("最大尝试次数至少为1".to_string()));
        }

        if config.catalog.path.trim().is_empty() {
            return Err(GeneratorError::Config("配置集路径不能为空".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.generation.level, 50);
        assert_eq!(config.generation.format, Format::Series12);
        assert!(config.generation.shuffle);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_config_serialization() {
        let config = GeneratorConfig::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: GeneratorConfig = toml::from_str(&serialized).unwrap();

        assert_eq!(config, deserialized);
        assert!(serialized.contains("format = \"series12\""));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: GeneratorConfig = toml::from_str("[general]\nlog_level = \"warn\"\n").unwrap();
        assert_eq!(config.general.log_level, "warn");
        assert_eq!(config.generation, GenerationConfig::default());
    }

    #[test]
    fn test_config_validation() {
        let mut config = GeneratorConfig::default();
        assert!(ConfigManager::validate_config(&config).is_ok());

        config.generation.shiny_rate = 1.5;
        assert!(ConfigManager::validate_config(&config).is_err());

        let mut config = GeneratorConfig::default();
        config.generation.level = 0;
        assert!(ConfigManager::validate_config(&config).is_err());

        let mut config = GeneratorConfig::default();
        config.generation.max_attempts = 0;
        assert!(ConfigManager::validate_config(&config).is_err());

        let mut config = GeneratorConfig::default();
        config.catalog.path = "  ".to_string();
        assert!(ConfigManager::validate_config(&config).is_err());

        let mut config = GeneratorConfig::default();
        config.general.log_level = "inof".to_string();
        match ConfigManager::validate_config(&config) {
            Err(GeneratorError::Config(msg)) => assert!(msg.contains("inof")),
            other => panic!("Expected Config error, got {:?}", other),
        }

        config.general.log_level = "TRACE".to_string();
        assert!(ConfigManager::validate_config(&config).is_ok());
    }

    #[test]
    fn test_config_file_operations() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("teamgen.toml");

        // 不存在时写出默认配置
        let manager = ConfigManager::new(&config_path).unwrap();
        assert!(config_path.exists());
        assert_eq!(manager.get_config(), &GeneratorConfig::default());

        let mut config = GeneratorConfig::default();
        config.generation.format = Format::Series9;
        ConfigManager::save_config_to_file(&config, &config_path).unwrap();

        let loaded_config = ConfigManager::load_from_file(&config_path).unwrap();
        assert_eq!(loaded_config.generation.format, Format::Series9);
    }

    #[test]
    fn test_invalid_file_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("teamgen.toml");
        std::fs::write(&config_path, "[generation]\nformat = \"series99\"\n").unwrap();

        assert!(matches!(
            ConfigManager::load_from_file(&config_path),
            Err(GeneratorError::Config(_))
        ));

        std::fs::write(&config_path, "[general]\nlog_level = \"inof\"\n").unwrap();
        assert!(matches!(
            ConfigManager::load_from_file(&config_path),
            Err(GeneratorError::Config(_))
        ));
    }

    #[test]
    fn test_update_and_overrides() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("teamgen.toml");
        let mut manager = ConfigManager::new(&config_path).unwrap();

        manager
            .update_config(|config| config.generation.level = 100)
            .unwrap();
        assert_eq!(ConfigManager::load_from_file(&config_path).unwrap().generation.level, 100);

        assert!(manager.update_config(|config| config.generation.level = 101).is_err());
        assert_eq!(manager.get_config().generation.level, 100);

        manager
            .apply_overrides(&ConfigOverrides {
                format: Some(Format::Series10),
                ordered: true,
                verbose: true,
                ..Default::default()
            })
            .unwrap();
        let config = manager.get_config();
        assert_eq!(config.generation.format, Format::Series10);
        assert!(!config.generation.shuffle);
        assert_eq!(config.general.log_level, "debug");

        // 覆盖不写回文件
        let on_disk = ConfigManager::load_from_file(&config_path).unwrap();
        assert_eq!(on_disk.generation.format, Format::Series12);
    }
}
