//! TLB 统计信息

use std::fmt;

use serde::{Deserialize, Serialize};

/// 单次访问的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessOutcome {
    /// 页面在 TLB 中
    Hit,
    /// 页面从未进入过 TLB
    ColdMiss,
    /// 页面曾进入 TLB，之后被驱逐
    CapacityMiss,
}

impl AccessOutcome {
    pub fn is_hit(self) -> bool {
        self == AccessOutcome::Hit
    }

    pub fn is_miss(self) -> bool {
        !self.is_hit()
    }
}

/// TLB 统计快照
///
/// 任意时刻都满足 `hits + misses == accesses` 与
/// `cold_misses + capacity_misses == misses`。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlbStats {
    pub accesses: u64,
    pub hits: u64,
    pub misses: u64,
    pub cold_misses: u64,
    pub capacity_misses: u64,
}

impl TlbStats {
    /// 记录一次访问结果
    pub(crate) fn record(&mut self, outcome: AccessOutcome) {
        self.accesses += 1;
        match outcome {
            AccessOutcome::Hit => self.hits += 1,
            AccessOutcome::ColdMiss => {
                self.misses += 1;
                self.cold_misses += 1;
            }
            AccessOutcome::CapacityMiss => {
                self.misses += 1;
                self.capacity_misses += 1;
            }
        }
    }

    /// 命中率（百分比），无访问时为 0
    pub fn hit_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.hits as f64 / self.accesses as f64 * 100.0
        }
    }

    /// 缺失率（百分比），无访问时为 0
    pub fn miss_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.misses as f64 / self.accesses as f64 * 100.0
        }
    }
}

impl fmt::Display for TlbStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Accesses: {}", self.accesses)?;
        writeln!(f, "Hits: {}", self.hits)?;
        writeln!(f, "Misses: {}", self.misses)?;
        writeln!(f, "  Cold Misses: {}", self.cold_misses)?;
        writeln!(f, "  Capacity Misses: {}", self.capacity_misses)?;
        write!(f, "Hit Rate: {:.2}%", self.hit_rate())
    }
}
