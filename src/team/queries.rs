// 队伍聚合查询 - 从已选配置推导天气/场地/空间/弱点保险等承诺
// 每次调用都从头计算，队伍最多六只

use crate::catalog::RoleBearer;
use crate::requirement::Requirement;

/// 第一只声明天气角色的配置所依赖的天气
pub fn find_weather<T: RoleBearer>(picks: &[T]) -> Option<String> {
    for pick in picks {
        if let Some(role) = pick
            .roles()
            .iter()
            .find(|role| role.subcategory.as_deref() == Some("weather"))
        {
            return role.detail.clone();
        }
    }

    None
}

/// 所有场地角色的细节，按出现顺序，允许重复
pub fn find_terrains<T: RoleBearer>(picks: &[T]) -> Vec<String> {
    picks
        .iter()
        .flat_map(|pick| pick.roles().iter())
        .filter(|role| role.subcategory.as_deref() == Some("terrain"))
        .filter_map(|role| role.detail.clone())
        .collect()
}

/// 输出依赖、但还没有任何配置能展开的第一个场地
pub fn find_needed_terrain<T: RoleBearer>(picks: &[T]) -> Option<String> {
    picks
        .iter()
        .flat_map(|pick| pick.roles().iter())
        .filter(|role| {
            role.category == "offense" && role.subcategory.as_deref() == Some("terrain")
        })
        .filter_map(|role| role.detail.as_deref())
        .find(|terrain| !Requirement::terrain_setter(terrain).test_in(picks))
        .map(str::to_string)
}

/// 弱点保险输出需要的触发属性(去重)
pub fn find_policy_types<T: RoleBearer>(picks: &[T]) -> Vec<String> {
    let mut types: Vec<String> = Vec::new();

    for role in picks.iter().flat_map(|pick| pick.roles().iter()) {
        if role.category == "offense" && role.subcategory.as_deref() == Some("policy") {
            if let Some(detail) = &role.detail {
                if !types.contains(detail) {
                    types.push(detail.clone());
                }
            }
        }
    }

    types
}

pub fn support_count<T: RoleBearer>(picks: &[T]) -> usize {
    Requirement::support().count_in(picks)
}

/// 有空间输出却没有空间手
pub fn needs_tr_setter<T: RoleBearer>(picks: &[T]) -> bool {
    Requirement::tr_user().test_in(picks) && !Requirement::tr_setter().test_in(picks)
}

/// 有空间手却没有空间输出
pub fn needs_tr_user<T: RoleBearer>(picks: &[T]) -> bool {
    Requirement::tr_setter().test_in(picks) && !Requirement::tr_user().test_in(picks)
}

pub fn needs_setup_support<T: RoleBearer>(picks: &[T]) -> bool {
    Requirement::setup().test_in(picks) && !Requirement::setup_support().test_in(picks)
}

/// 已确定天气但队伍里没有对应的天气手
pub fn needs_weather_setter<T: RoleBearer>(picks: &[T]) -> Option<String> {
    find_weather(picks).filter(|weather| !Requirement::weather_setter(weather).test_in(picks))
}
