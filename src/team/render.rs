// 导出文本渲染 - 与对战模拟器的粘贴格式逐字一致

use super::selector::ResolvedPick;

/// 把生成好的配置变成展示文本
pub trait Renderer: Send + Sync {
    fn render(&self, pick: &ResolvedPick) -> String;
}

/// Showdown 粘贴格式
#[derive(Debug, Clone, Copy)]
pub struct PasteRenderer {
    pub level: u8,
}

impl PasteRenderer {
    pub fn new(level: u8) -> Self {
        Self { level }
    }
}

impl Default for PasteRenderer {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_LEVEL)
    }
}

impl Renderer for PasteRenderer {
    fn render(&self, pick: &ResolvedPick) -> String {
        let mut lines = vec![
            format!("{} @ {}", pick.identity, pick.item),
            format!("Ability: {}", pick.ability),
            format!("Level: {}", self.level),
        ];

        if pick.shiny {
            lines.push("Shiny: Yes".to_string());
        }

        lines.extend(pick.loadout.trim().lines().map(|line| line.trim().to_string()));
        lines.extend(pick.moves.iter().map(|name| format!("- {}", name)));

        lines.join("\n")
    }
}
