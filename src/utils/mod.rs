// 工具模块 - 可设种子的随机源

pub mod random;

pub use random::{RandomGenerator, RandomStats};
