// apps/sg_cli/src/main.rs

//! SphereGrid 命令行界面
//!
//! 读取、检查与转换球面非结构网格文件。

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// SphereGrid 球面网格命令行工具
#[derive(Parser)]
#[command(name = "sg_cli")]
#[command(author = "SphereGrid Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Spherical unstructured mesh tools (Exodus / SCRIP / ICON)", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 显示网格信息
    Info(commands::info::InfoArgs),
    /// 验证网格
    Validate(commands::validate::ValidateArgs),
    /// 转换网格格式
    Convert(commands::convert::ConvertArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // 执行命令
    match cli.command {
        Commands::Info(args) => commands::info::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Convert(args) => commands::convert::execute(args),
    }
}
