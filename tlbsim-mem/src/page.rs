//! 页号计算

use std::fmt;
use std::num::NonZeroU64;

use serde::Serialize;
use tlbsim_error::ConfigError;

use crate::{GuestAddr, PageNumber};

/// 页大小（字节，非零）
///
/// 页大小不要求是 2 的幂；是 2 的幂时用移位代替除法，结果相同。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PageSize {
    bytes: NonZeroU64,
    /// 页大小为 2 的幂时的移位数
    #[serde(skip)]
    shift: Option<u32>,
}

impl PageSize {
    /// 创建页大小，0 字节会被拒绝
    pub fn new(bytes: u64) -> Result<Self, ConfigError> {
        let bytes = NonZeroU64::new(bytes).ok_or(ConfigError::ZeroPageSize)?;
        let shift = bytes
            .is_power_of_two()
            .then(|| bytes.trailing_zeros());
        Ok(Self { bytes, shift })
    }

    /// 页大小（字节）
    #[inline]
    pub fn bytes(&self) -> u64 {
        self.bytes.get()
    }

    /// 地址所在页号：`addr / page_size`
    #[inline]
    pub fn page_number(&self, addr: GuestAddr) -> PageNumber {
        match self.shift {
            Some(shift) => addr >> shift,
            None => addr / self.bytes,
        }
    }

    /// 页起始地址（仅用于日志显示，溢出时饱和）
    pub fn page_base(&self, page: PageNumber) -> GuestAddr {
        page.saturating_mul(self.bytes.get())
    }
}

impl Default for PageSize {
    fn default() -> Self {
        // 4KB
        Self {
            bytes: NonZeroU64::new(crate::DEFAULT_PAGE_SIZE).unwrap_or(NonZeroU64::MIN),
            shift: Some(12),
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bytes", self.bytes)
    }
}
