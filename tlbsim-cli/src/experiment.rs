//! 实验运行器
//!
//! 每次实验构造一个全新的 TLB，把工作负载的地址流逐个提交给它，
//! 最后读出统计信息与已见页面集合。

use std::fmt;
use std::time::Instant;

use serde::Serialize;
use tlbsim_error::SimResult;
use tlbsim_mem::{LruTlb, SeenPages, TlbStats};

use crate::config::ExperimentConfig;

/// 实验结果
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentReport {
    /// 实验配置
    pub config: ExperimentConfig,
    /// 统计快照
    pub stats: TlbStats,
    /// 不同页面数
    pub distinct_pages: usize,
    /// 已见页面集合，用于跨实验比较
    #[serde(skip)]
    pub seen_pages: SeenPages,
}

impl ExperimentReport {
    /// 两次实验共同访问过的页面数
    pub fn shared_pages(&self, other: &ExperimentReport) -> usize {
        let (small, large) = if self.seen_pages.len() <= other.seen_pages.len() {
            (&self.seen_pages, &other.seen_pages)
        } else {
            (&other.seen_pages, &self.seen_pages)
        };
        small.iter().filter(|&page| large.contains(page)).count()
    }
}

impl fmt::Display for ExperimentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Experiment: {}", self.config)?;
        writeln!(f, "{}", self.stats)?;
        write!(f, "Distinct Pages: {}", self.distinct_pages)
    }
}

/// 运行一次实验
pub fn run_experiment(config: &ExperimentConfig) -> SimResult<ExperimentReport> {
    let tlb_config = config.tlb_config()?;
    let stream = config.workload.stream(config.base_address)?;

    log::info!("Starting experiment: {}", config);
    let start = Instant::now();

    let mut tlb = LruTlb::with_config(tlb_config);
    for addr in stream {
        tlb.submit(addr);
    }

    let stats = tlb.stats();
    log::info!(
        "Experiment finished in {:?}: {} accesses, hit rate {:.2}%",
        start.elapsed(),
        stats.accesses,
        stats.hit_rate()
    );

    let seen_pages = tlb.seen_pages().clone();
    Ok(ExperimentReport {
        config: *config,
        stats,
        distinct_pages: seen_pages.len(),
        seen_pages,
    })
}

/// 按顺序运行多次实验，遇到第一个错误即停止
pub fn run_all(configs: &[ExperimentConfig]) -> SimResult<Vec<ExperimentReport>> {
    configs.iter().map(run_experiment).collect()
}

/// 默认实验组：64 项 TLB、4KB 页下，先遍历 1024x1024 矩阵，再遍历 512x512 矩阵
pub fn default_experiments() -> Vec<ExperimentConfig> {
    vec![
        ExperimentConfig::row_major(1024, 64, 4096),
        ExperimentConfig::row_major(512, 64, 4096),
    ]
}
