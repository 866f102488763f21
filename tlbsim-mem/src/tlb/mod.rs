//! TLB (Translation Lookaside Buffer) 模块
//!
//! - LRU TLB：全相联、严格 LRU 替换的模拟引擎
//! - 统计：访问/命中/缺失计数，缺失按冷缺失与容量缺失分类

pub mod lru_tlb;
pub mod stats;

// 重新导出主要类型
pub use lru_tlb::{LruTlb, SeenPages, TlbConfig};
pub use stats::{AccessOutcome, TlbStats};
