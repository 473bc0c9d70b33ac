/*
 * VGC Team Generator - Catalog Loader
 * 开发心理过程:
 * 1. 数据源只在启动时读取一次，按扩展名选择YAML或JSON解析
 * 2. 加载后立即做结构校验，生成器内部不再重复检查
 */

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::{CandidateRecord, Catalog};
use crate::core::error::{GeneratorError, GeneratorResult};
use crate::generator_error;

/// 随程序一起发布的默认配置目录
pub const BUNDLED_SETS: &str = include_str!("../../data/sets.yml");

/// 配置中表示使用内置目录的路径值
pub const BUNDLED_CATALOG: &str = "bundled";

/// 候选目录的数据来源
pub trait CatalogSource {
    fn load(&self) -> GeneratorResult<Catalog>;

    fn describe(&self) -> String;
}

/// 从磁盘文件加载 (.yml / .yaml / .json)
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for FileCatalogSource {
    fn load(&self) -> GeneratorResult<Catalog> {
        if !self.path.exists() {
            return Err(generator_error!(Catalog, "Catalog file not found: {:?}", self.path));
        }

        let content = fs::read_to_string(&self.path)?;
        let records = match self.path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => parse_yaml(&content)?,
            Some("json") => serde_json::from_str::<Vec<CandidateRecord>>(&content).map_err(|e| {
                generator_error!(Catalog, "Invalid JSON in {:?}: {}", self.path, e)
            })?,
            _ => {
                return Err(generator_error!(
                    Catalog,
                    "Unsupported catalog file format: {:?}",
                    self.path
                ));
            }
        };

        let catalog = into_catalog(records)?;
        info!(
            "加载候选目录 {:?}: {} 个配置, {} 个种族",
            self.path,
            catalog.len(),
            catalog.group_count()
        );
        Ok(catalog)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// 内嵌的默认目录
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledCatalogSource;

impl CatalogSource for BundledCatalogSource {
    fn load(&self) -> GeneratorResult<Catalog> {
        let catalog = into_catalog(parse_yaml(BUNDLED_SETS)?)?;
        info!(
            "加载内置候选目录: {} 个配置, {} 个种族",
            catalog.len(),
            catalog.group_count()
        );
        Ok(catalog)
    }

    fn describe(&self) -> String {
        "<bundled sets.yml>".to_string()
    }
}

/// 内存中的配置列表，主要用于测试和嵌入调用
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogSource {
    records: Vec<CandidateRecord>,
}

impl StaticCatalogSource {
    pub fn new(records: Vec<CandidateRecord>) -> Self {
        Self { records }
    }
}

impl CatalogSource for StaticCatalogSource {
    fn load(&self) -> GeneratorResult<Catalog> {
        into_catalog(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("<{} in-memory records>", self.records.len())
    }
}

/// 根据配置中的路径选择数据来源
pub fn source_for(path: &str) -> Box<dyn CatalogSource> {
    if path == BUNDLED_CATALOG {
        Box::new(BundledCatalogSource)
    } else {
        Box::new(FileCatalogSource::new(path))
    }
}

fn parse_yaml(content: &str) -> GeneratorResult<Vec<CandidateRecord>> {
    Ok(serde_yaml::from_str::<Vec<CandidateRecord>>(content)?)
}

fn into_catalog(records: Vec<CandidateRecord>) -> GeneratorResult<Catalog> {
    validate_records(&records)?;
    Ok(Catalog::new(records))
}

/// 结构校验：名称、候选集合、招式数量与权重
pub fn validate_records(records: &[CandidateRecord]) -> GeneratorResult<()> {
    if records.is_empty() {
        return Err(generator_error!(Catalog, "catalog is empty"));
    }

    for record in records {
        record
            .check()
            .map_err(|reason| GeneratorError::invalid_record(&record.identity, reason))?;
    }

    debug!("校验通过: {} 个配置", records.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::record;
    use std::io::Write;
    use tempfile::TempDir;

    const SMALL_YAML: &str = r#"
- pokemon: Incineroar
  item: [Sitrus Berry, Figy Berry]
  ability: Intimidate
  spread: "EVs: 252 HP / 4 Atk / 252 SpD\nCareful Nature"
  moves: [Fake Out, Flare Blitz, Parting Shot, [Knock Off, Snarl]]
  roles:
    - [support]
- pokemon: Rillaboom
  item: Assault Vest
  ability: Grassy Surge
  spread: "EVs: 252 Atk / 252 Spe\nAdamant Nature"
  moves: [Fake Out, Grassy Glide, Wood Hammer, U-turn]
  roles:
    - [offense]
    - [setter, terrain, grassy]
  weight: 2
"#;

    #[test]
    fn test_load_yaml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sets.yml");
        fs::File::create(&path)
            .unwrap()
            .write_all(SMALL_YAML.as_bytes())
            .unwrap();

        let catalog = FileCatalogSource::new(&path).load().unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(1).unwrap().weight, 2.0);
    }

    #[test]
    fn test_load_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sets.json");
        let json = r#"[{
            "pokemon": "Grimmsnarl",
            "item": "Light Clay",
            "ability": "Prankster",
            "spread": "EVs: 252 HP / 252 SpD\nCareful Nature",
            "moves": ["Reflect", "Light Screen", "Spirit Break", ["Thunder Wave", "Fake Out"]],
            "roles": [["support"]]
        }]"#;
        fs::write(&path, json).unwrap();

        let catalog = FileCatalogSource::new(&path).load().unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0).unwrap().group_key(), "Grimmsnarl");
    }

    #[test]
    fn test_load_errors() {
        let dir = TempDir::new().unwrap();

        let missing = FileCatalogSource::new(dir.path().join("missing.yml"));
        assert!(matches!(missing.load(), Err(GeneratorError::Catalog(_))));

        let txt = dir.path().join("sets.txt");
        fs::write(&txt, SMALL_YAML).unwrap();
        assert!(matches!(
            FileCatalogSource::new(&txt).load(),
            Err(GeneratorError::Catalog(_))
        ));

        let broken = dir.path().join("broken.yml");
        fs::write(&broken, "- pokemon: [unterminated").unwrap();
        assert!(FileCatalogSource::new(&broken).load().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_record() {
        let mut bad = record("Amoonguss", "Rocky Helmet", &[&["support"]]);
        bad.weight = -1.0;

        let result = StaticCatalogSource::new(vec![bad]).load();
        match result {
            Err(GeneratorError::InvalidRecord { identity, .. }) => {
                assert_eq!(identity, "Amoonguss")
            }
            other => panic!("Expected InvalidRecord, got {:?}", other),
        }

        assert!(StaticCatalogSource::new(Vec::new()).load().is_err());
    }

    #[test]
    fn test_source_for() {
        assert_eq!(source_for(BUNDLED_CATALOG).describe(), "<bundled sets.yml>");
        assert_eq!(source_for("data/other.json").describe(), "data/other.json");
    }

    #[test]
    fn test_bundled_catalog() {
        let catalog = BundledCatalogSource.load().unwrap();
        assert!(catalog.group_count() >= 12);
        assert!(catalog
            .records()
            .iter()
            .any(|record| record.roles.iter().any(|role| role.category == "restricted")));
    }
}
