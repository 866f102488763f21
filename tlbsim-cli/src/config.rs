//! 实验配置

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tlbsim_error::{ConfigError, SimError, SimResult};
use tlbsim_mem::{DEFAULT_PAGE_SIZE, DEFAULT_TLB_CAPACITY, GuestAddr, TlbConfig};

use crate::workload::Workload;

/// 默认基地址（页对齐）
pub const DEFAULT_BASE_ADDRESS: GuestAddr = 0x1000_0000;

/// 单次实验的配置
///
/// 可以从 TOML 文件加载，缺省字段取默认值：
///
/// ```toml
/// capacity = 64
/// page_size = 4096
/// base_address = 0x10000000
///
/// [workload]
/// kind = "row-major"
/// dim = 1024
/// element_size = 4
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExperimentConfig {
    /// TLB 条目数
    pub capacity: usize,
    /// 页大小（字节）
    pub page_size: u64,
    /// 工作负载的起始地址
    pub base_address: GuestAddr,
    /// 地址生成策略
    pub workload: Workload,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_TLB_CAPACITY,
            page_size: DEFAULT_PAGE_SIZE,
            base_address: DEFAULT_BASE_ADDRESS,
            workload: Workload::default(),
        }
    }
}

impl ExperimentConfig {
    /// 矩阵行主序遍历实验
    pub fn row_major(dim: u64, capacity: usize, page_size: u64) -> Self {
        Self {
            capacity,
            page_size,
            workload: Workload::RowMajor {
                dim,
                element_size: crate::workload::DEFAULT_ELEMENT_SIZE,
            },
            ..Self::default()
        }
    }

    /// 从 TOML 文本解析
    pub fn from_toml_str(text: &str) -> SimResult<Self> {
        toml::from_str(text).map_err(|e| SimError::from(ConfigError::Parse(e.to_string())))
    }

    /// 从 TOML 文件加载
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// 引擎配置（校验容量与页大小）
    pub fn tlb_config(&self) -> Result<TlbConfig, ConfigError> {
        TlbConfig::new(self.capacity, self.page_size)
    }
}

impl fmt::Display for ExperimentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, TLB with {} entries, {}-byte pages, base {:#x}",
            self.workload, self.capacity, self.page_size, self.base_address
        )
    }
}
