//! 全相联 LRU TLB 模拟引擎

use std::num::NonZeroUsize;

use lru::LruCache;
use rustc_hash::{FxBuildHasher, FxHashSet};
use serde::Serialize;
use tlbsim_error::ConfigError;

use super::stats::{AccessOutcome, TlbStats};
use crate::page::PageSize;
use crate::{GuestAddr, PageNumber};

/// 曾进入过 TLB 的全部页号
pub type SeenPages = FxHashSet<PageNumber>;

/// TLB 配置（构造后不可变）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TlbConfig {
    /// 条目数（至少 1）
    pub capacity: NonZeroUsize,
    /// 页大小
    pub page_size: PageSize,
}

impl TlbConfig {
    /// 校验并创建配置：容量为 0 或页大小为 0 都会被拒绝
    pub fn new(capacity: usize, page_size: u64) -> Result<Self, ConfigError> {
        let capacity = NonZeroUsize::new(capacity).ok_or(ConfigError::ZeroCapacity)?;
        let page_size = PageSize::new(page_size)?;
        Ok(Self {
            capacity,
            page_size,
        })
    }
}

impl Default for TlbConfig {
    fn default() -> Self {
        Self {
            capacity: NonZeroUsize::new(crate::DEFAULT_TLB_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            page_size: PageSize::default(),
        }
    }
}

/// 全相联 LRU TLB
///
/// 驻留页与 LRU 顺序保存在同一个 [`LruCache`] 中（哈希表 + 双向链表），
/// 查找、移到队首、弹出最久未用条目都是 O(1)，两者不会出现不一致。
/// 已见页面集合只增不减，仅用于区分冷缺失与容量缺失。
///
/// 引擎是单线程同步设计；多线程驱动时每个线程应持有独立实例，
/// 或在外部加锁。
pub struct LruTlb {
    config: TlbConfig,
    /// 驻留页号，最近使用在前
    resident: LruCache<PageNumber, (), FxBuildHasher>,
    seen_pages: SeenPages,
    stats: TlbStats,
}

impl LruTlb {
    /// 创建一个新的 TLB，指定容量（条目数）与页大小（字节）
    pub fn new(capacity: usize, page_size: u64) -> Result<Self, ConfigError> {
        Ok(Self::with_config(TlbConfig::new(capacity, page_size)?))
    }

    pub fn with_config(config: TlbConfig) -> Self {
        log::debug!(
            "Creating LRU TLB with capacity: {} entries, page size: {}",
            config.capacity,
            config.page_size
        );
        Self {
            config,
            // 容量由 submit 显式维护，避免按容量预分配
            resident: LruCache::unbounded_with_hasher(FxBuildHasher),
            seen_pages: SeenPages::default(),
            stats: TlbStats::default(),
        }
    }

    /// 提交一次地址访问
    ///
    /// 命中时把页面移到最近使用位置；缺失时先分类（冷/容量），
    /// TLB 已满则驱逐最久未用的页面，再把新页面插入到最近使用位置。
    pub fn submit(&mut self, addr: GuestAddr) -> AccessOutcome {
        let page = self.config.page_size.page_number(addr);

        // get 会同时更新 LRU 顺序
        if self.resident.get(&page).is_some() {
            self.stats.record(AccessOutcome::Hit);
            return AccessOutcome::Hit;
        }

        let outcome = if self.seen_pages.insert(page) {
            AccessOutcome::ColdMiss
        } else {
            AccessOutcome::CapacityMiss
        };
        self.stats.record(outcome);

        // LRU 驱逐：先驱逐再插入，插入后条目数不超过容量
        if self.resident.len() >= self.config.capacity.get()
            && let Some((victim, ())) = self.resident.pop_lru()
        {
            log::trace!(
                "Evicting page {:#x} (base {:#x}) for page {:#x}",
                victim,
                self.config.page_size.page_base(victim),
                page
            );
        }

        self.resident.put(page, ());
        outcome
    }

    /// 获取统计快照
    pub fn stats(&self) -> TlbStats {
        self.stats
    }

    /// 已见页面集合（只读）
    pub fn seen_pages(&self) -> &SeenPages {
        &self.seen_pages
    }

    pub fn config(&self) -> &TlbConfig {
        &self.config
    }
}
