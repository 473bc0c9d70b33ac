// VGC随机组队生成器库入口
// 开发心理：候选目录只读共享，每次组队独占自己的选秀状态，便于并行与测试
// 架构：目录 -> 要求代数 -> 槽位抽样 -> 按赛制配置表组队 -> 导出文本

pub mod catalog;
pub mod core;
pub mod requirement;
pub mod team;
pub mod utils;

pub use crate::catalog::{
    BundledCatalogSource, CandidateRecord, Catalog, CatalogSource, FileCatalogSource,
    StaticCatalogSource,
};
pub use crate::core::config::{ConfigManager, GeneratorConfig};
pub use crate::core::error::{GeneratorError, GeneratorResult};
pub use crate::requirement::Requirement;
pub use crate::team::{
    Format, GeneratorLog, PasteRenderer, Renderer, ResolvedPick, SlotSelector, Team, TeamBuilder,
};
pub use crate::utils::random::RandomGenerator;

// 版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = "vgc-teamgen";

// 组队常量
pub mod constants {
    pub const TEAM_SIZE: usize = 6;
    pub const MOVES_PER_POKEMON: usize = 4;
    pub const DEFAULT_LEVEL: u8 = 50;
    pub const SHINY_RATE: f64 = 1.0 / 4096.0;

    /// 候选招式与其余招式重复时的最大重抽次数
    pub const MAX_REROLLS: usize = 64;
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
}

/// 用内置目录按给定种子生成一支队伍
pub fn generate_team(format: Format, seed: u64) -> GeneratorResult<Team> {
    let catalog = BundledCatalogSource.load()?;
    let renderer = PasteRenderer::default();
    let builder = TeamBuilder::new(&catalog, &renderer);
    let mut rng = RandomGenerator::with_seed(seed);

    builder.generate(format, constants::DEFAULT_MAX_ATTEMPTS, &mut rng)
}
