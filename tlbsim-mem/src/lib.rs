//! tlbsim-mem: TLB 模拟引擎
//!
//! 全相联、LRU 替换的 TLB 模拟，统计命中/缺失并将缺失细分为
//! 冷缺失（首次访问页面）和容量缺失（页面曾被驱逐后再次访问）。

pub mod page;
pub mod tlb;

// ============================================================================
// 常量
// ============================================================================

/// 默认页大小：4KB
pub const DEFAULT_PAGE_SIZE: u64 = 4096;
/// 默认 TLB 条目数
pub const DEFAULT_TLB_CAPACITY: usize = 64;

/// Guest 虚拟地址
pub type GuestAddr = u64;

/// 页号（地址除以页大小）
pub type PageNumber = u64;

pub use page::PageSize;
pub use tlb::{AccessOutcome, LruTlb, SeenPages, TlbConfig, TlbStats};
pub use tlbsim_error::ConfigError;
