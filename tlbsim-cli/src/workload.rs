//! 访存模式：根据工作负载生成有序的虚拟地址流

use std::fmt;

use serde::{Deserialize, Serialize};
use tlbsim_error::{ConfigError, SimResult, WorkloadError};
use tlbsim_mem::GuestAddr;

/// `int` 元素大小
pub const DEFAULT_ELEMENT_SIZE: u64 = 4;
/// 默认矩阵维度
pub const DEFAULT_MATRIX_DIM: u64 = 1024;

fn default_element_size() -> u64 {
    DEFAULT_ELEMENT_SIZE
}

/// 地址生成策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Workload {
    /// 逐行遍历 `dim x dim` 矩阵：(i, j) 位于 `base + (i * dim + j) * element_size`
    RowMajor {
        dim: u64,
        #[serde(default = "default_element_size")]
        element_size: u64,
    },
    /// 逐列遍历同一矩阵
    ColumnMajor {
        dim: u64,
        #[serde(default = "default_element_size")]
        element_size: u64,
    },
    /// `count` 个地址，间隔 `stride` 字节
    Strided { count: u64, stride: u64 },
}

impl Default for Workload {
    fn default() -> Self {
        Workload::RowMajor {
            dim: DEFAULT_MATRIX_DIM,
            element_size: DEFAULT_ELEMENT_SIZE,
        }
    }
}

/// 遍历顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Order {
    Linear { step: u64 },
    ColumnMajor { dim: u64, element_size: u64 },
}

impl Workload {
    /// 访问次数
    pub fn len(&self) -> u128 {
        match *self {
            Workload::RowMajor { dim, .. } | Workload::ColumnMajor { dim, .. } => {
                u128::from(dim) * u128::from(dim)
            }
            Workload::Strided { count, .. } => u128::from(count),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Workload::RowMajor { dim, element_size }
            | Workload::ColumnMajor { dim, element_size } => {
                if dim == 0 {
                    return Err(ConfigError::ZeroMatrixDim);
                }
                if element_size == 0 {
                    return Err(ConfigError::ZeroElementSize);
                }
            }
            Workload::Strided { stride, .. } => {
                if stride == 0 {
                    return Err(ConfigError::ZeroStride);
                }
            }
        }
        Ok(())
    }

    /// 最后一个地址相对 base 的偏移
    fn last_offset(&self) -> u128 {
        let len = self.len();
        if len == 0 {
            return 0;
        }
        let step = match *self {
            Workload::RowMajor { element_size, .. } | Workload::ColumnMajor { element_size, .. } => {
                element_size
            }
            Workload::Strided { stride, .. } => stride,
        };
        (len - 1) * u128::from(step)
    }

    /// 从 `base` 开始生成地址流
    ///
    /// 地址流惰性生成；整个地址范围必须落在 64 位地址空间内。
    pub fn stream(&self, base: GuestAddr) -> SimResult<AddressStream> {
        self.validate()?;

        let span = self.last_offset();
        if u128::from(base) + span > u128::from(u64::MAX) {
            return Err(WorkloadError::AddressOverflow { base, span }.into());
        }

        let order = match *self {
            Workload::RowMajor { element_size, .. } => Order::Linear { step: element_size },
            Workload::ColumnMajor { dim, element_size } => {
                Order::ColumnMajor { dim, element_size }
            }
            Workload::Strided { stride, .. } => Order::Linear { step: stride },
        };

        // span 未溢出时 len - 1 <= span，len 可以用 u64 表示
        let len = u64::try_from(self.len()).map_err(|_| WorkloadError::AddressOverflow { base, span })?;

        Ok(AddressStream {
            base,
            order,
            next: 0,
            len,
        })
    }
}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Workload::RowMajor { dim, element_size } => {
                write!(f, "row-major {dim}x{dim} matrix ({element_size}-byte elements)")
            }
            Workload::ColumnMajor { dim, element_size } => {
                write!(f, "column-major {dim}x{dim} matrix ({element_size}-byte elements)")
            }
            Workload::Strided { count, stride } => {
                write!(f, "{count} accesses with a {stride}-byte stride")
            }
        }
    }
}

/// 工作负载的地址流
#[derive(Debug, Clone)]
pub struct AddressStream {
    base: GuestAddr,
    order: Order,
    next: u64,
    len: u64,
}

impl AddressStream {
    fn offset(&self, k: u64) -> u64 {
        match self.order {
            Order::Linear { step } => k * step,
            Order::ColumnMajor { dim, element_size } => {
                let (col, row) = (k / dim, k % dim);
                (row * dim + col) * element_size
            }
        }
    }
}

impl Iterator for AddressStream {
    type Item = GuestAddr;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.len {
            return None;
        }
        let addr = self.base + self.offset(self.next);
        self.next += 1;
        Some(addr)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.next;
        match usize::try_from(remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tlbsim_error::SimError;

    #[test]
    fn test_row_major_addresses() {
        let w = Workload::RowMajor {
            dim: 3,
            element_size: 4,
        };
        let addrs: Vec<_> = w.stream(0x1000).expect("valid workload").collect();
        assert_eq!(addrs.len(), 9);
        assert_eq!(addrs[0], 0x1000);
        assert_eq!(addrs[1], 0x1004);
        assert_eq!(addrs[3], 0x1000 + 3 * 4);
        assert_eq!(addrs[8], 0x1000 + 8 * 4);
    }

    #[test]
    fn test_column_major_addresses() {
        let w = Workload::ColumnMajor {
            dim: 3,
            element_size: 4,
        };
        let addrs: Vec<_> = w.stream(0).expect("valid workload").collect();
        // (0,0) (1,0) (2,0) (0,1) ...
        assert_eq!(addrs, vec![0, 12, 24, 4, 16, 28, 8, 20, 32]);
    }

    #[test]
    fn test_strided_addresses() {
        let w = Workload::Strided {
            count: 4,
            stride: 0x1000,
        };
        let addrs: Vec<_> = w.stream(0x10).expect("valid workload").collect();
        assert_eq!(addrs, vec![0x10, 0x1010, 0x2010, 0x3010]);
    }

    #[test]
    fn test_empty_strided_stream() {
        let w = Workload::Strided {
            count: 0,
            stride: 8,
        };
        assert!(w.is_empty());
        assert_eq!(w.stream(u64::MAX).expect("valid workload").count(), 0);
    }

    #[test]
    fn test_zero_sizes_rejected() {
        let zero_dim = Workload::RowMajor {
            dim: 0,
            element_size: 4,
        };
        assert!(matches!(
            zero_dim.stream(0),
            Err(SimError::Configuration {
                source: ConfigError::ZeroMatrixDim,
                ..
            })
        ));

        let zero_elem = Workload::ColumnMajor {
            dim: 4,
            element_size: 0,
        };
        assert!(matches!(
            zero_elem.stream(0),
            Err(SimError::Configuration {
                source: ConfigError::ZeroElementSize,
                ..
            })
        ));

        let zero_stride = Workload::Strided {
            count: 4,
            stride: 0,
        };
        assert!(matches!(
            zero_stride.stream(0),
            Err(SimError::Configuration {
                source: ConfigError::ZeroStride,
                ..
            })
        ));
    }

    #[test]
    fn test_overflow_rejected() {
        let w = Workload::Strided {
            count: 3,
            stride: 8,
        };
        // 最后一个地址恰好是 u64::MAX
        assert!(w.stream(u64::MAX - 16).is_ok());
        assert!(matches!(
            w.stream(u64::MAX - 15),
            Err(SimError::Workload {
                source: WorkloadError::AddressOverflow { span: 16, .. },
                ..
            })
        ));

        let huge = Workload::RowMajor {
            dim: u64::MAX,
            element_size: 4,
        };
        assert!(huge.stream(0).is_err());
    }

    #[test]
    fn test_exact_size_hint() {
        let w = Workload::RowMajor {
            dim: 10,
            element_size: 4,
        };
        let mut stream = w.stream(0).expect("valid workload");
        assert_eq!(stream.size_hint(), (100, Some(100)));
        stream.next();
        assert_eq!(stream.size_hint(), (99, Some(99)));
    }

    #[test]
    fn test_toml_round_trip_defaults() {
        let w: Workload = toml::from_str("kind = \"column-major\"\ndim = 8\n").expect("parse");
        assert_eq!(
            w,
            Workload::ColumnMajor {
                dim: 8,
                element_size: DEFAULT_ELEMENT_SIZE
            }
        );
    }
}
