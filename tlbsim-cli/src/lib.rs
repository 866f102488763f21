//! TLB 模拟实验工具
//!
//! 本模块提供：
//! - 实验配置（TOML 文件或命令行参数）
//! - 工作负载地址流生成（行主序/列主序矩阵遍历、固定步长）
//! - 实验运行与结果报告

pub mod config;
pub mod experiment;
pub mod workload;

pub use config::{DEFAULT_BASE_ADDRESS, ExperimentConfig};
pub use experiment::{ExperimentReport, default_experiments, run_all, run_experiment};
pub use workload::{AddressStream, Workload};
