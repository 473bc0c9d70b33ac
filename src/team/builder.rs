/*
 * VGC Team Generator - Team Builder
 * 开发心理过程:
 * 1. 所有赛制共用一个组队流程，差异来自 FormatRules
 * 2. 每个槽位根据已选队伍的天气/场地/空间/弱点保险承诺构造要求
 * 3. 无候选时整队重来，由 generate 控制重试次数
 * 4. 批量生成时每支队伍独占自己的选秀状态、日志与随机源
 */

use log::{debug, info, warn};
use rayon::prelude::*;

use super::format::{Format, FormatRules, SlotSpec};
use super::log::GeneratorLog;
use super::queries::{
    find_needed_terrain, find_policy_types, find_terrains, find_weather, needs_setup_support,
    needs_tr_setter, needs_tr_user, needs_weather_setter, support_count,
};
use super::render::Renderer;
use super::selector::{DraftState, ResolvedPick, SlotSelector};
use crate::catalog::Catalog;
use crate::constants::{DEFAULT_MAX_ATTEMPTS, SHINY_RATE, TEAM_SIZE};
use crate::core::error::{GeneratorError, GeneratorResult};
use crate::generator_error;
use crate::requirement::Requirement;
use crate::utils::random::RandomGenerator;

/// 一支完成的队伍
///
/// `requirements[i]` 是选出 `picks[i]` 时生效的要求(不含道具条款)。
#[derive(Debug, Clone)]
pub struct Team {
    pub format: Format,
    pub picks: Vec<ResolvedPick>,
    pub requirements: Vec<Requirement>,
    pub seed: u64,
}

impl Team {
    /// 可直接粘贴到对战模拟器的完整文本
    pub fn export(&self) -> String {
        self.picks
            .iter()
            .map(|pick| pick.export.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// 检查种族条款、道具条款，并用目录中的原始配置重新检验每个槽位的要求
    pub fn verify(&self, catalog: &Catalog) -> GeneratorResult<()> {
        if self.picks.len() != TEAM_SIZE || self.requirements.len() != TEAM_SIZE {
            return Err(generator_error!(
                Catalog,
                "team has {} picks, expected {}",
                self.picks.len(),
                TEAM_SIZE
            ));
        }

        for (i, pick) in self.picks.iter().enumerate() {
            for other in &self.picks[..i] {
                if other.group_key() == pick.group_key() {
                    return Err(GeneratorError::invalid_record(
                        &pick.identity,
                        format!("species clause violated by {}", other.identity),
                    ));
                }
                if other.item == pick.item {
                    return Err(GeneratorError::invalid_record(
                        &pick.identity,
                        format!("item clause violated: {} already held by {}", pick.item, other.identity),
                    ));
                }
            }
        }

        for (pick, requirement) in self.picks.iter().zip(&self.requirements) {
            let record = catalog
                .get(pick.record_index)
                .filter(|record| record.identity == pick.identity)
                .ok_or_else(|| GeneratorError::invalid_record(&pick.identity, "not in catalog"))?;

            if !requirement.test(record) {
                return Err(GeneratorError::invalid_record(
                    &pick.identity,
                    format!("does not satisfy {}", requirement),
                ));
            }
        }

        Ok(())
    }
}

pub struct TeamBuilder<'a> {
    catalog: &'a Catalog,
    renderer: &'a dyn Renderer,
    shiny_rate: f64,
    shuffle: bool,
    max_attempts: u32,
}

impl<'a> TeamBuilder<'a> {
    pub fn new(catalog: &'a Catalog, renderer: &'a dyn Renderer) -> Self {
        Self {
            catalog,
            renderer,
            shiny_rate: SHINY_RATE,
            shuffle: true,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_shiny_rate(mut self, shiny_rate: f64) -> Self {
        self.shiny_rate = shiny_rate;
        self
    }

    /// 关闭后队伍按生成顺序输出，便于看出每只是怎么选出来的
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn build(&self, format: Format, rng: &mut RandomGenerator) -> GeneratorResult<Team> {
        self.build_with_rules(&format.rules(), rng)
    }

    pub fn build_with_rules(
        &self,
        rules: &FormatRules,
        rng: &mut RandomGenerator,
    ) -> GeneratorResult<Team> {
        self.build_logged(rules, rng, &mut GeneratorLog::new())
    }

    /// 单次组队；失败时 `log` 保留崩溃报告需要的内容
    pub fn build_logged(
        &self,
        rules: &FormatRules,
        rng: &mut RandomGenerator,
        log: &mut GeneratorLog,
    ) -> GeneratorResult<Team> {
        let selector = SlotSelector::new(self.catalog, self.renderer, self.shiny_rate);
        let draws_before = rng.get_stats();
        let mut state = DraftState::new(self.catalog);
        let mut picks: Vec<ResolvedPick> = Vec::with_capacity(TEAM_SIZE);
        let mut requirements: Vec<Requirement> = Vec::with_capacity(TEAM_SIZE);
        let gating = rules.gating.requirement();

        for slot in rules.slots.iter() {
            let mut clauses = self.slot_clauses(*slot, rules, &picks, &selector, &state);
            clauses.push(gating.clone());
            let requirement = Requirement::and(clauses);

            let pick = selector.select_one(&requirement, &mut state, rng, log)?;
            picks.push(pick);
            requirements.push(requirement);
        }

        if self.shuffle {
            let mut order: Vec<usize> = (0..picks.len()).collect();
            rng.shuffle(&mut order);
            let mut slots: Vec<Option<(ResolvedPick, Requirement)>> =
                picks.into_iter().zip(requirements).map(Some).collect();
            let (shuffled_picks, shuffled_requirements): (Vec<_>, Vec<_>) = order
                .into_iter()
                .filter_map(|index| slots[index].take())
                .unzip();
            picks = shuffled_picks;
            requirements = shuffled_requirements;
        }

        info!(
            "{} 队伍生成完成: {}",
            rules.format,
            picks
                .iter()
                .map(|pick| pick.identity.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        debug!("随机数统计: {}", rng.get_stats().since(&draws_before));

        Ok(Team {
            format: rules.format,
            picks,
            requirements,
            seed: rng.seed(),
        })
    }

    pub fn generate(
        &self,
        format: Format,
        attempts: u32,
        rng: &mut RandomGenerator,
    ) -> GeneratorResult<Team> {
        self.generate_logged(format, attempts, rng, &mut GeneratorLog::new())
    }

    /// 无候选时重新生成整支队伍，最多 `attempts` 次
    pub fn generate_logged(
        &self,
        format: Format,
        attempts: u32,
        rng: &mut RandomGenerator,
        log: &mut GeneratorLog,
    ) -> GeneratorResult<Team> {
        let rules = format.rules();
        let attempts = attempts.max(1);
        let mut attempt = 1;

        loop {
            *log = GeneratorLog::new();
            match self.build_logged(&rules, rng, log) {
                Ok(team) => return Ok(team),
                Err(e) if e.is_recoverable() && attempt < attempts => {
                    warn!("第 {}/{} 次组队失败，重新生成: {}", attempt, attempts, e);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// 并行生成多支队伍，第 i 支使用种子 `seed + i`
    pub fn generate_batch(
        &self,
        format: Format,
        count: usize,
        seed: u64,
    ) -> Vec<GeneratorResult<Team>> {
        (0..count)
            .into_par_iter()
            .map(|index| {
                let mut rng = RandomGenerator::with_seed(seed.wrapping_add(index as u64));
                self.generate(format, self.max_attempts, &mut rng)
            })
            .collect()
    }

    fn slot_clauses(
        &self,
        slot: SlotSpec,
        rules: &FormatRules,
        picks: &[ResolvedPick],
        selector: &SlotSelector<'_>,
        state: &DraftState,
    ) -> Vec<Requirement> {
        let weather = find_weather(picks);
        let weather = Requirement::weather(weather.as_deref());
        let terrain = Requirement::terrain(&find_terrains(picks));
        let not_restricted = Requirement::not(Requirement::restricted());

        match slot {
            SlotSpec::Lead => vec![rules.lead.requirement()],

            SlotSpec::Partner => {
                let target = if !rules.gating.allows_dynamax()
                    || Requirement::dynamax_role().test_in(picks)
                {
                    Requirement::offense()
                } else {
                    Requirement::dynamax_role()
                };
                vec![
                    target,
                    weather,
                    terrain,
                    Requirement::no_wp_proccers(),
                    not_restricted,
                ]
            }

            SlotSpec::Core => vec![weather, terrain, Requirement::no_wp_proccers(), not_restricted],

            SlotSpec::SecondRestricted => vec![
                weather,
                terrain,
                Requirement::no_wp_proccers(),
                Requirement::restricted(),
            ],

            SlotSpec::Balance => {
                if Requirement::wp_user().test_in(picks) {
                    let proccer = Requirement::wp_proccer(&find_policy_types(picks));

                    if !needs_tr_setter(picks) {
                        return vec![
                            weather,
                            terrain,
                            not_restricted,
                            Requirement::no_tr_setters(),
                            proccer,
                        ];
                    }

                    let both = vec![
                        weather.clone(),
                        terrain.clone(),
                        Requirement::tr_setter(),
                        proccer,
                        not_restricted.clone(),
                    ];
                    let mut lookahead = both.clone();
                    lookahead.push(rules.gating.requirement());
                    if !selector.available(&Requirement::and(lookahead), state).is_empty() {
                        return both;
                    }
                    return vec![weather, terrain, not_restricted, Requirement::tr_setter()];
                }

                let mut clauses = vec![weather, terrain, Requirement::no_wp_proccers(), not_restricted];
                if needs_tr_setter(picks) {
                    clauses.push(Requirement::tr_setter());
                } else if needs_tr_user(picks) {
                    clauses.push(Requirement::tr_user());
                } else if needs_setup_support(picks) {
                    clauses.push(Requirement::setup_support());
                } else if support_count(picks) < 2 {
                    clauses.push(Requirement::support());
                } else {
                    clauses.push(Requirement::no_tr_setters());
                    clauses.push(Requirement::no_additional_tr(picks));
                    clauses.push(Requirement::no_wp_users());
                }
                clauses
            }

            SlotSpec::Closer => {
                let mut clauses = vec![Requirement::no_wp_proccers(), not_restricted];

                if let Some(needed) = needs_weather_setter(picks) {
                    clauses.push(Requirement::weather_setter(&needed));
                    clauses.push(terrain);
                    clauses.push(Requirement::no_tr_setters());
                    clauses.push(Requirement::no_additional_tr(picks));
                } else if let Some(needed) = find_needed_terrain(picks) {
                    clauses.push(Requirement::terrain_setter(&needed));
                    clauses.push(weather);
                    clauses.push(Requirement::no_tr_setters());
                    clauses.push(Requirement::no_additional_tr(picks));
                } else if needs_tr_setter(picks) {
                    clauses.push(Requirement::tr_setter());
                    clauses.push(weather);
                    clauses.push(terrain);
                } else if needs_tr_user(picks) {
                    clauses.push(Requirement::tr_user());
                    clauses.push(weather);
                    clauses.push(terrain);
                } else {
                    clauses.push(Requirement::no_tr_setters());
                    clauses.push(Requirement::no_additional_tr(picks));
                    clauses.push(Requirement::no_additional_weather(picks));
                    clauses.push(Requirement::no_additional_terrains(picks));
                }

                clauses.push(Requirement::no_wp_users());
                clauses
            }
        }
    }
}
