//! TLB 模拟器命令行入口
//!
//! 不带参数时运行默认实验组；指定配置文件或任意实验参数时运行单次实验，
//! 命令行参数覆盖配置文件中的值。

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use tlbsim_cli::workload::{DEFAULT_ELEMENT_SIZE, DEFAULT_MATRIX_DIM};
use tlbsim_cli::{ExperimentConfig, ExperimentReport, Workload, default_experiments, run_all};

/// 影响实验配置的参数
const EXPERIMENT_ARGS: &[&str] = &[
    "config",
    "capacity",
    "page-size",
    "base",
    "workload",
    "dim",
    "element-size",
    "count",
    "stride",
];

fn build_cli() -> Command {
    Command::new("tlbsim")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Fully-associative LRU TLB simulator")
        .arg(
            Arg::new("config")
                .long("config")
                .short('f')
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Experiment configuration file (TOML)"),
        )
        .arg(
            Arg::new("capacity")
                .long("capacity")
                .short('c')
                .value_name("ENTRIES")
                .value_parser(value_parser!(usize))
                .help("TLB capacity in entries"),
        )
        .arg(
            Arg::new("page-size")
                .long("page-size")
                .short('p')
                .value_name("BYTES")
                .value_parser(value_parser!(u64))
                .help("Page size in bytes"),
        )
        .arg(
            Arg::new("base")
                .long("base")
                .value_name("ADDR")
                .value_parser(parse_address)
                .help("Base virtual address of the workload (decimal or 0x-prefixed hex)"),
        )
        .arg(
            Arg::new("workload")
                .long("workload")
                .short('w')
                .value_name("KIND")
                .value_parser(["row-major", "column-major", "strided"])
                .help("Address generation strategy"),
        )
        .arg(
            Arg::new("dim")
                .long("dim")
                .value_name("N")
                .value_parser(value_parser!(u64))
                .help("Matrix dimension for row-major / column-major workloads"),
        )
        .arg(
            Arg::new("element-size")
                .long("element-size")
                .value_name("BYTES")
                .value_parser(value_parser!(u64))
                .help("Matrix element size in bytes"),
        )
        .arg(
            Arg::new("count")
                .long("count")
                .value_name("N")
                .value_parser(value_parser!(u64))
                .help("Number of accesses for the strided workload"),
        )
        .arg(
            Arg::new("stride")
                .long("stride")
                .value_name("BYTES")
                .value_parser(value_parser!(u64))
                .help("Stride in bytes for the strided workload"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print reports as JSON"),
        )
}

fn parse_address(s: &str) -> Result<u64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => s.replace('_', "").parse(),
    };
    parsed.map_err(|e| format!("invalid address `{s}`: {e}"))
}

/// 根据参数调整工作负载；未指定 `--workload` 时保留原类型，只覆盖对应字段
fn apply_workload_overrides(current: Workload, matches: &ArgMatches) -> Workload {
    let dim = matches.get_one::<u64>("dim").copied();
    let element_size = matches.get_one::<u64>("element-size").copied();
    let count = matches.get_one::<u64>("count").copied();
    let stride = matches.get_one::<u64>("stride").copied();

    let (cur_dim, cur_elem) = match current {
        Workload::RowMajor { dim, element_size } | Workload::ColumnMajor { dim, element_size } => {
            (dim, element_size)
        }
        Workload::Strided { .. } => (DEFAULT_MATRIX_DIM, DEFAULT_ELEMENT_SIZE),
    };
    let (cur_count, cur_stride) = match current {
        Workload::Strided { count, stride } => (count, stride),
        _ => (DEFAULT_MATRIX_DIM, tlbsim_mem::DEFAULT_PAGE_SIZE),
    };

    let kind = matches
        .get_one::<String>("workload")
        .map(String::as_str)
        .unwrap_or(match current {
            Workload::RowMajor { .. } => "row-major",
            Workload::ColumnMajor { .. } => "column-major",
            Workload::Strided { .. } => "strided",
        });

    match kind {
        "column-major" => Workload::ColumnMajor {
            dim: dim.unwrap_or(cur_dim),
            element_size: element_size.unwrap_or(cur_elem),
        },
        "strided" => Workload::Strided {
            count: count.unwrap_or(cur_count),
            stride: stride.unwrap_or(cur_stride),
        },
        _ => Workload::RowMajor {
            dim: dim.unwrap_or(cur_dim),
            element_size: element_size.unwrap_or(cur_elem),
        },
    }
}

fn experiment_from_args(matches: &ArgMatches) -> Result<ExperimentConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ExperimentConfig::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => ExperimentConfig::default(),
    };

    if let Some(&capacity) = matches.get_one::<usize>("capacity") {
        config.capacity = capacity;
    }
    if let Some(&page_size) = matches.get_one::<u64>("page-size") {
        config.page_size = page_size;
    }
    if let Some(&base) = matches.get_one::<u64>("base") {
        config.base_address = base;
    }
    config.workload = apply_workload_overrides(config.workload, matches);

    Ok(config)
}

fn print_reports(reports: &[ExperimentReport], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(reports)?);
        return Ok(());
    }

    for report in reports {
        println!();
        println!("{report}");
    }

    if let [first, second] = reports {
        println!();
        println!(
            "Seen pages: {} vs {} ({} shared)",
            first.distinct_pages,
            second.distinct_pages,
            first.shared_pages(second)
        );
    }
    Ok(())
}

fn run(matches: &ArgMatches) -> Result<()> {
    let custom = EXPERIMENT_ARGS
        .iter()
        .any(|id| matches.value_source(id).is_some());

    let configs = if custom {
        vec![experiment_from_args(matches)?]
    } else {
        default_experiments()
    };

    let reports = run_all(&configs)?;
    print_reports(&reports, matches.get_flag("json"))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = build_cli().get_matches();
    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
