/*
 * VGC Team Generator - Slot Selector
 * 开发心理过程:
 * 1. 两层拒绝抽样：先均匀抽种族，再在该种族满足要求的配置中按权重抽取
 * 2. 失败的种族只从本次尝试的快照中剔除，不影响后续槽位
 * 3. 只有成功时才修改权威的选秀状态(种族条款/道具条款)
 */

use indexmap::IndexSet;
use log::debug;

use super::log::GeneratorLog;
use super::render::Renderer;
use crate::catalog::{group_key_of, CandidateRecord, Catalog, MoveSlot, OneOrMany, RoleBearer, RoleTuple};
use crate::constants::{MAX_REROLLS, MOVES_PER_POKEMON};
use crate::core::error::{GeneratorError, GeneratorResult};
use crate::requirement::Requirement;
use crate::utils::random::RandomGenerator;

/// 一个槽位最终确定的配置
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPick {
    pub identity: String,
    pub item: String,
    pub ability: String,
    pub loadout: String,
    pub moves: Vec<String>,
    pub roles: Vec<RoleTuple>,
    pub shiny: bool,
    /// 来源配置在目录中的下标
    pub record_index: usize,
    pub export: String,
}

impl ResolvedPick {
    pub fn group_key(&self) -> &str {
        group_key_of(&self.identity)
    }
}

impl RoleBearer for ResolvedPick {
    fn roles(&self) -> &[RoleTuple] {
        &self.roles
    }

    fn item_options(&self) -> &[String] {
        std::slice::from_ref(&self.item)
    }
}

/// 一次组队独占的选秀状态
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftState {
    /// 尚未使用的种族(种族条款)
    pub remaining_groups: IndexSet<String>,
    /// 已使用的道具(道具条款)
    pub used_items: Vec<String>,
}

impl DraftState {
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            remaining_groups: catalog.group_keys().map(str::to_string).collect(),
            used_items: Vec::new(),
        }
    }
}

pub struct SlotSelector<'a> {
    catalog: &'a Catalog,
    renderer: &'a dyn Renderer,
    shiny_rate: f64,
}

impl<'a> SlotSelector<'a> {
    pub fn new(catalog: &'a Catalog, renderer: &'a dyn Renderer, shiny_rate: f64) -> Self {
        Self {
            catalog,
            renderer,
            shiny_rate,
        }
    }

    /// 为一个槽位选出满足要求的配置
    ///
    /// 失败时返回 `NoCandidate`，`state` 保持不变。
    pub fn select_one(
        &self,
        requirement: &Requirement,
        state: &mut DraftState,
        rng: &mut RandomGenerator,
        log: &mut GeneratorLog,
    ) -> GeneratorResult<ResolvedPick> {
        let augmented = Requirement::and(vec![
            Requirement::item_clause(&state.used_items),
            requirement.clone(),
        ]);
        log.begin_set(requirement);

        let mut snapshot = state.remaining_groups.clone();

        loop {
            let Some(draw) = rng.index(snapshot.len()) else {
                return Err(GeneratorError::no_candidate(requirement));
            };
            let group = match snapshot.get_index(draw) {
                Some(group) => group.clone(),
                None => return Err(GeneratorError::no_candidate(requirement)),
            };

            let members: Vec<(usize, &CandidateRecord)> = self
                .catalog
                .members(&group)
                .filter(|(_, record)| augmented.test(*record))
                .collect();

            if members.is_empty() {
                log.none_found(&group);
                snapshot.shift_remove_index(draw);
                continue;
            }

            let weights: Vec<f64> = members.iter().map(|(_, record)| record.weight).collect();
            let chosen = rng
                .weighted_index(&weights)
                .ok_or_else(|| GeneratorError::no_candidate(requirement))?;
            let (record_index, record) = members[chosen];

            let pick = self.resolve(record_index, record, &state.used_items, rng)?;

            state.remaining_groups.shift_remove(&group);
            state.used_items.push(pick.item.clone());
            log.record_pick(&pick);
            debug!("选中 {} ({} @ {})", group, pick.identity, pick.item);

            return Ok(pick);
        }
    }

    /// 当前状态下仍然可选的配置
    pub fn available(&self, requirement: &Requirement, state: &DraftState) -> Vec<&'a CandidateRecord> {
        let augmented = Requirement::and(vec![
            Requirement::item_clause(&state.used_items),
            requirement.clone(),
        ]);

        self.catalog
            .records()
            .iter()
            .filter(|record| state.remaining_groups.contains(record.group_key()))
            .filter(|record| augmented.test(*record))
            .collect()
    }

    /// 把配置中的所有候选字段确定下来
    pub fn resolve(
        &self,
        record_index: usize,
        record: &CandidateRecord,
        used_items: &[String],
        rng: &mut RandomGenerator,
    ) -> GeneratorResult<ResolvedPick> {
        let item = match &record.item {
            OneOrMany::One(item) => item.clone(),
            OneOrMany::Many(items) => {
                let unused: Vec<&String> = items
                    .iter()
                    .filter(|item| !used_items.contains(item))
                    .collect();
                rng.choose(&unused)
                    .map(|item| (*item).clone())
                    .ok_or_else(|| GeneratorError::ItemsExhausted {
                        identity: record.identity.clone(),
                    })?
            }
        };

        let ability = pick_one(&record.ability, &record.identity, rng)?;
        let loadout = pick_one(&record.loadout, &record.identity, rng)?;
        let moves = resolve_moves(&record.slots, &record.identity, rng)?;
        let shiny = rng.chance(self.shiny_rate);

        let mut pick = ResolvedPick {
            identity: record.identity.clone(),
            item,
            ability,
            loadout,
            moves,
            roles: record.roles.clone(),
            shiny,
            record_index,
            export: String::new(),
        };
        pick.export = self.renderer.render(&pick);

        Ok(pick)
    }
}

fn pick_one(
    values: &OneOrMany<String>,
    identity: &str,
    rng: &mut RandomGenerator,
) -> GeneratorResult<String> {
    match values {
        OneOrMany::One(value) => Ok(value.clone()),
        OneOrMany::Many(options) => rng
            .choose(options)
            .cloned()
            .ok_or_else(|| GeneratorError::invalid_record(identity, "empty alternatives")),
    }
}

/// 随机删掉多余的招式槽位直到剩四个，再逐个确定候选槽位且不与其余招式重复
fn resolve_moves(
    slots: &[MoveSlot],
    identity: &str,
    rng: &mut RandomGenerator,
) -> GeneratorResult<Vec<String>> {
    let mut choices: Vec<MoveSlot> = slots.to_vec();
    while choices.len() > MOVES_PER_POKEMON {
        if let Some(index) = rng.index(choices.len()) {
            choices.remove(index);
        }
    }

    let mut resolved: Vec<Option<String>> = choices
        .iter()
        .map(|slot| slot.fixed().map(str::to_string))
        .collect();

    for (index, slot) in choices.iter().enumerate() {
        let MoveSlot::Choice(options) = slot else {
            continue;
        };

        let mut attempts = 0;
        let value = loop {
            let candidate = draw_move(options, identity, rng)?;
            let taken = resolved
                .iter()
                .enumerate()
                .any(|(other, name)| other != index && name.as_deref() == Some(candidate.as_str()));
            if !taken {
                break candidate;
            }

            attempts += 1;
            if attempts >= MAX_REROLLS {
                return Err(GeneratorError::invalid_record(
                    identity,
                    "cannot draw a move distinct from the other slots",
                ));
            }
        };
        resolved[index] = Some(value);
    }

    resolved
        .into_iter()
        .collect::<Option<Vec<String>>>()
        .ok_or_else(|| GeneratorError::invalid_record(identity, "unresolved move slot"))
}

fn draw_move(
    options: &[MoveSlot],
    identity: &str,
    rng: &mut RandomGenerator,
) -> GeneratorResult<String> {
    match rng.choose(options) {
        Some(MoveSlot::Fixed(name)) => Ok(name.clone()),
        Some(MoveSlot::Choice(nested)) => draw_move(nested, identity, rng),
        None => Err(GeneratorError::invalid_record(identity, "empty move alternatives")),
    }
}
