/*
* 开发心理过程：
* 1. 所有随机抽取都经过同一个可设定种子的生成器，测试与问题复现都依赖这一点
* 2. 权重选择按"累计权重超过抽样值"的方式遍历，等权时退化为均匀选择
*/

use std::fmt;

use rand::{Rng, SeedableRng};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

/// 可复现的随机数生成器
#[derive(Debug, Clone)]
pub struct RandomGenerator {
    rng: ChaCha8Rng,
    seed: u64,
    stats: RandomStats,
}

/// 抽取次数统计，组队完成后以debug级别输出
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RandomStats {
    pub unit: u64,
    pub index: u64,
    pub weighted: u64,
    pub shuffle: u64,
}

#[derive(Debug, Clone, Copy)]
enum DrawKind {
    Unit,
    Index,
    Weighted,
    Shuffle,
}

impl RandomStats {
    pub fn total(&self) -> u64 {
        self.unit + self.index + self.weighted + self.shuffle
    }

    /// 自 `earlier` 以来新增的抽取
    pub fn since(&self, earlier: &RandomStats) -> RandomStats {
        RandomStats {
            unit: self.unit.saturating_sub(earlier.unit),
            index: self.index.saturating_sub(earlier.index),
            weighted: self.weighted.saturating_sub(earlier.weighted),
            shuffle: self.shuffle.saturating_sub(earlier.shuffle),
        }
    }
}

impl fmt::Display for RandomStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} 次抽取 (下标 {}, 权重 {}, 浮点 {}, 打乱 {})",
            self.total(),
            self.index,
            self.weighted,
            self.unit,
            self.shuffle
        )
    }
}

impl RandomGenerator {
    /// 使用随机种子创建
    pub fn new() -> Self {
        Self::with_seed(rand::random::<u64>())
    }

    /// 使用指定种子创建
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            stats: RandomStats::default(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn record(&mut self, kind: DrawKind) {
        let counter = match kind {
            DrawKind::Unit => &mut self.stats.unit,
            DrawKind::Index => &mut self.stats.index,
            DrawKind::Weighted => &mut self.stats.weighted,
            DrawKind::Shuffle => &mut self.stats.shuffle,
        };
        *counter += 1;
    }

    /// [0, 1) 之间的浮点数
    pub fn unit_f64(&mut self) -> f64 {
        self.record(DrawKind::Unit);
        self.rng.gen::<f64>()
    }

    /// 基于概率检查
    pub fn chance(&mut self, probability: f64) -> bool {
        self.unit_f64() < probability.clamp(0.0, 1.0)
    }

    /// 均匀抽取 [0, len) 中的下标，空集合返回None
    pub fn index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }

        self.record(DrawKind::Index);
        Some(self.rng.gen_range(0..len))
    }

    /// 从切片中随机选择一个元素
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        self.index(items.len()).map(|index| &items[index])
    }

    /// 基于权重选择下标
    ///
    /// 在 [0, 总权重) 中抽样，再顺序累加权重，第一个累计值超过抽样值的元素胜出。
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        if weights.is_empty() {
            return None;
        }

        let total_weight: f64 = weights.iter().sum();
        if !(total_weight > 0.0) {
            return None;
        }

        self.record(DrawKind::Weighted);
        let target = self.rng.gen_range(0.0..total_weight);

        let mut running = 0.0;
        for (index, weight) in weights.iter().enumerate() {
            running += weight;
            if running > target {
                return Some(index);
            }
        }

        // 浮点误差兜底
        Some(weights.len() - 1)
    }

    /// 随机打乱切片
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        self.record(DrawKind::Shuffle);
        items.shuffle(&mut self.rng);
    }

    pub fn get_stats(&self) -> RandomStats {
        self.stats
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_generator() {
        let mut rng = RandomGenerator::with_seed(12345);

        let val1 = rng.index(10).unwrap();
        assert!(val1 < 10);

        let val2 = rng.unit_f64();
        assert!((0.0..1.0).contains(&val2));

        // 测试可重现性
        let mut rng2 = RandomGenerator::with_seed(12345);
        assert_eq!(rng2.index(10), Some(val1));
    }

    #[test]
    fn test_empty_inputs() {
        let mut rng = RandomGenerator::with_seed(1);
        let empty: [u8; 0] = [];

        assert_eq!(rng.index(0), None);
        assert_eq!(rng.choose(&empty), None);
        assert_eq!(rng.weighted_index(&[]), None);
        assert_eq!(rng.weighted_index(&[0.0, 0.0]), None);
    }

    #[test]
    fn test_weighted_choice() {
        let mut rng = RandomGenerator::with_seed(54321);
        let weights = [1.0, 1.0, 2.0];
        let mut counts = [0u32; 3];

        for _ in 0..10_000 {
            counts[rng.weighted_index(&weights).unwrap()] += 1;
        }

        // 第三个元素大约占一半
        let heavy = counts[2] as f64 / 10_000.0;
        assert!((heavy - 0.5).abs() < 0.03, "heavy share was {}", heavy);
        assert!(counts[0] > 2000 && counts[1] > 2000);
    }

    #[test]
    fn test_weighted_single_item() {
        let mut rng = RandomGenerator::with_seed(7);
        for _ in 0..100 {
            assert_eq!(rng.weighted_index(&[3.5]), Some(0));
        }
    }

    #[test]
    fn test_shuffle() {
        let mut rng = RandomGenerator::with_seed(98765);
        let mut items = vec![1, 2, 3, 4, 5, 6];

        rng.shuffle(&mut items);
        items.sort();

        assert_eq!(items, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_probability() {
        let mut rng = RandomGenerator::with_seed(11111);

        assert!(!rng.chance(0.0));
        assert!(rng.chance(1.0));

        let hits = (0..10_000).filter(|_| rng.chance(0.25)).count();
        assert!((2200..2800).contains(&hits));
    }

    #[test]
    fn test_stats() {
        let mut rng = RandomGenerator::with_seed(3);
        rng.index(4);
        let before = rng.get_stats();
        rng.unit_f64();
        rng.weighted_index(&[1.0, 2.0]);
        rng.shuffle(&mut [1, 2]);
        // 空集合不计数
        rng.index(0);

        let stats = rng.get_stats();
        assert_eq!(stats.total(), 4);
        assert_eq!(stats.index, 1);

        let delta = stats.since(&before);
        assert_eq!(delta.total(), 3);
        assert_eq!(delta.index, 0);
        assert_eq!(delta.to_string(), "3 次抽取 (下标 0, 权重 1, 浮点 1, 打乱 1)");
    }
}
