// VGC随机组队命令行入口
// 开发心理：先读配置再初始化日志，生成失败时输出崩溃报告

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use vgc_teamgen::catalog::{source_for, CatalogSource};
use vgc_teamgen::core::config::{ConfigManager, ConfigOverrides, DEFAULT_CONFIG_PATH};
use vgc_teamgen::{Format, GeneratorLog, PasteRenderer, RandomGenerator, TeamBuilder};

#[derive(Parser, Debug)]
#[command(name = "vgc-teamgen", version, about = "Generate random VGC teams in paste format")]
struct Cli {
    /// 赛制
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// 随机种子，省略时随机
    #[arg(short, long)]
    seed: Option<u64>,

    /// 候选配置文件 (.yml/.yaml/.json)，`bundled` 使用内置目录
    #[arg(long)]
    catalog: Option<String>,

    /// 配置文件路径，不存在时写出默认配置
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// 生成队伍数量
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,

    /// 按槽位顺序输出，不打乱
    #[arg(long)]
    ordered: bool,

    /// 整队重试次数上限
    #[arg(long)]
    attempts: Option<u32>,

    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut manager = ConfigManager::new(&cli.config)
        .with_context(|| format!("无法加载配置文件 {:?}", cli.config))?;
    manager.apply_overrides(&ConfigOverrides {
        format: cli.format,
        catalog: cli.catalog.clone(),
        max_attempts: cli.attempts,
        ordered: cli.ordered,
        verbose: cli.verbose,
    })?;
    let config = manager.get_config().clone();

    // 初始化日志系统
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.general.log_level.as_str()),
    )
    .init();

    info!("启动 {} v{}", vgc_teamgen::NAME, vgc_teamgen::VERSION);

    let source = source_for(&config.catalog.path);
    let catalog = source
        .load()
        .with_context(|| format!("无法加载候选目录 {}", source.describe()))?;

    let generation = &config.generation;
    let renderer = PasteRenderer::new(generation.level);
    let builder = TeamBuilder::new(&catalog, &renderer)
        .with_shiny_rate(generation.shiny_rate)
        .with_shuffle(generation.shuffle)
        .with_max_attempts(generation.max_attempts);
    let seed = cli.seed.unwrap_or_else(rand::random);

    info!("赛制: {}, 种子: {}", generation.format, seed);

    if cli.count <= 1 {
        let mut rng = RandomGenerator::with_seed(seed);
        let mut log = GeneratorLog::new();

        match builder.generate_logged(generation.format, generation.max_attempts, &mut rng, &mut log) {
            Ok(team) => println!("{}", team.export()),
            Err(e) => {
                error!("组队失败\n{}", log.crash_report(&e));
                return Err(e).context("生成队伍失败");
            }
        }
        return Ok(());
    }

    let mut failures = 0;
    for (index, result) in builder
        .generate_batch(generation.format, cli.count, seed)
        .into_iter()
        .enumerate()
    {
        match result {
            Ok(team) => {
                println!("=== {} #{} (seed {}) ===\n", team.format, index + 1, team.seed);
                println!("{}\n", team.export());
            }
            Err(e) => {
                error!("第 {} 支队伍生成失败: {}", index + 1, e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} / {} 支队伍生成失败", failures, cli.count);
    }

    Ok(())
}
