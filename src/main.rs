// ==========================================
// 内控管理分析系统 - 命令行入口
// ==========================================
// 用法: vehicle-audit <人员明细> <资源员工> <出勤记录> <工单明细>
//       [--config 规则配置.json] [--out 结果.csv]
// ==========================================

use std::path::PathBuf;
use std::process::ExitCode;
use vehicle_audit::engine::{AuditPipeline, PipelineInput};
use vehicle_audit::{export, logging, RuleConfig};

struct CliArgs {
    input: PipelineInput,
    config_path: Option<PathBuf>,
    out_path: PathBuf,
}

fn parse_args() -> Result<CliArgs, String> {
    let mut positional = Vec::new();
    let mut config_path = None;
    let mut out_path = PathBuf::from("结果.csv");

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let value = args.next().ok_or("--config 需要一个文件路径")?;
                config_path = Some(PathBuf::from(value));
            }
            "--out" => {
                let value = args.next().ok_or("--out 需要一个文件路径")?;
                out_path = PathBuf::from(value);
            }
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    if positional.len() != 4 {
        return Err(format!(
            "需要 4 个数据源文件(人员明细/资源员工/出勤记录/工单明细), 实际提供 {} 个",
            positional.len()
        ));
    }

    let mut it = positional.into_iter();
    let input = PipelineInput {
        personnel_path: it.next().expect("已校验长度"),
        employee_path: it.next().expect("已校验长度"),
        attendance_path: it.next().expect("已校验长度"),
        work_order_path: it.next().expect("已校验长度"),
    };

    Ok(CliArgs {
        input,
        config_path,
        out_path,
    })
}

fn run() -> anyhow::Result<()> {
    let args = parse_args().map_err(|msg| anyhow::anyhow!(msg))?;

    tracing::info!("==================================================");
    tracing::info!("{}", vehicle_audit::APP_NAME);
    tracing::info!("系统版本: {}", vehicle_audit::VERSION);
    tracing::info!("==================================================");

    // 规则配置: 未提供配置文件时取默认值
    let config = match &args.config_path {
        Some(path) => {
            tracing::info!("加载规则配置: {}", path.display());
            RuleConfig::load_from_file(path)?
        }
        None => RuleConfig::default(),
    };

    let pipeline = AuditPipeline::new(config);
    let result = pipeline.run(&args.input)?;

    export::write_reconciled_csv(&args.out_path, &result.reconciled)?;
    tracing::info!("结果已保存到: {}", args.out_path.display());

    // 每核查列统计摘要
    for (column, stats) in &result.statistics {
        tracing::info!(
            column = column.as_str(),
            total = stats.total,
            normal = stats.normal,
            abnormal = stats.abnormal,
            "核查统计"
        );
    }

    Ok(())
}

fn main() -> ExitCode {
    // 初始化日志系统
    logging::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("运行失败: {err}");
            ExitCode::FAILURE
        }
    }
}
