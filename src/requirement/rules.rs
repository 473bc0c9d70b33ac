// 语义规则 - 每个构造函数对应一条赛制/配队规则
// 全部由角色叶子与组合子拼出，并附上便于诊断的名字

use super::Requirement;
use crate::catalog::RoleBearer;
use crate::role;
use crate::team::queries::{find_terrains, find_weather};

impl Requirement {
    /// 禁止级传说
    pub fn restricted() -> Self {
        Requirement::named("restricted", role!("restricted"))
    }

    /// 极巨化对象
    pub fn dynamax_role() -> Self {
        Requirement::named("dynamax", role!("dynamax"))
    }

    pub fn offense() -> Self {
        Requirement::named("offense", role!("offense"))
    }

    pub fn support() -> Self {
        Requirement::named("support", role!("support"))
    }

    /// 强化型输出
    pub fn setup() -> Self {
        Requirement::named("setup", role!("offense", "setup"))
    }

    /// 为强化型输出提供掩护的辅助
    pub fn setup_support() -> Self {
        Requirement::named("setupSupport", role!("support", "setup"))
    }

    /// 未确定天气时不限制；确定后只允许同一天气或与天气无关的配置
    pub fn weather(weather: Option<&str>) -> Self {
        match weather {
            Some(weather) => Requirement::named(
                format!("weather({})", weather),
                Requirement::or(vec![
                    role!(_, "weather", weather),
                    Requirement::not(role!(_, "weather")),
                ]),
            ),
            None => Requirement::named("weather(*)", Requirement::none()),
        }
    }

    /// 与天气相同的规则，但允许同时确定多个场地
    pub fn terrain(terrains: &[String]) -> Self {
        if terrains.is_empty() {
            return Requirement::named("terrain(*)", Requirement::none());
        }

        Requirement::named(
            format!("terrain({})", terrains.join(", ")),
            Requirement::or(vec![
                role!(_, "terrain", terrains),
                Requirement::not(role!(_, "terrain")),
            ]),
        )
    }

    pub fn weather_setter(weather: &str) -> Self {
        Requirement::named(
            format!("weatherSetter({})", weather),
            role!("speed", "weather", weather),
        )
    }

    pub fn terrain_setter(terrain: &str) -> Self {
        Requirement::named(
            format!("terrainSetter({})", terrain),
            role!("setter", "terrain", terrain),
        )
    }

    pub fn tr_setter() -> Self {
        Requirement::named("trSetter", role!("speed", "trickroom"))
    }

    pub fn tr_user() -> Self {
        Requirement::named("trUser", role!("offense", "trickroom"))
    }

    pub fn wp_user() -> Self {
        Requirement::named("wpUser", role!("offense", "policy"))
    }

    /// 能触发指定属性弱点保险的辅助
    pub fn wp_proccer(types: &[String]) -> Self {
        Requirement::named(
            format!("wpProccer({})", types.join(", ")),
            role!("support", "policy", types),
        )
    }

    pub fn no_tr_setters() -> Self {
        Requirement::named("noTRSetters", Requirement::not(role!("speed", "trickroom")))
    }

    pub fn no_tr_users() -> Self {
        Requirement::named("noTRUsers", Requirement::not(role!("offense", "trickroom")))
    }

    pub fn no_wp_proccers() -> Self {
        Requirement::named("noWPProccers", Requirement::not(role!("support", "policy")))
    }

    pub fn no_wp_users() -> Self {
        Requirement::named("noWPUsers", Requirement::not(role!("offense", "policy")))
    }

    /// 队伍里没有空间手时不再加入空间输出
    pub fn no_additional_tr<T: RoleBearer>(team: &[T]) -> Self {
        if Requirement::tr_setter().test_in(team) {
            Requirement::named("noAdditionalTR", Requirement::none())
        } else {
            Requirement::named("noAdditionalTR", Requirement::no_tr_users())
        }
    }

    /// 之后不会再补天气手：已有天气则沿用，否则不接受依赖天气的输出
    pub fn no_additional_weather<T: RoleBearer>(team: &[T]) -> Self {
        match find_weather(team) {
            Some(weather) => Requirement::named(
                "noAdditionalWeather",
                Requirement::weather(Some(weather.as_str())),
            ),
            None => Requirement::named(
                "noAdditionalWeather",
                Requirement::not(role!("offense", "weather")),
            ),
        }
    }

    pub fn no_additional_terrains<T: RoleBearer>(team: &[T]) -> Self {
        let terrains = find_terrains(team);
        if terrains.is_empty() {
            Requirement::named(
                "noAdditionalTerrains",
                Requirement::not(role!("offense", "terrain")),
            )
        } else {
            Requirement::named("noAdditionalTerrains", Requirement::terrain(&terrains))
        }
    }

    /// 极巨化赛制：排除只适用于非极巨化赛制的配置
    pub fn max_format() -> Self {
        Requirement::named("maxFormat", Requirement::not(role!("nonmax")))
    }

    pub fn nonmax_format() -> Self {
        Requirement::named("nonmaxFormat", Requirement::not(role!("max")))
    }
}
