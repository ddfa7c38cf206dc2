// apps/sg_cli/src/commands/convert.rs

//! 格式转换命令
//!
//! 读取任意方言，写出 Exodus 或 SCRIP；容器由输出扩展名决定。

use super::{load_config, read_options};
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use sg_io::OutputFormat;
use std::path::PathBuf;
use tracing::info;

/// 输出方言
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    /// Exodus 多块
    Exodus,
    /// SCRIP
    Scrip,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Exodus => OutputFormat::Exodus,
            FormatArg::Scrip => OutputFormat::Scrip,
        }
    }
}

/// 转换参数
#[derive(Args)]
pub struct ConvertArgs {
    /// 输入网格文件
    pub input: PathBuf,

    /// 输出网格文件 (.nc / .g / .exo / .json)
    pub output: PathBuf,

    /// 输出方言
    #[arg(short, long, value_enum, default_value = "exodus")]
    pub format: FormatArg,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// SCRIP 输入不合并重合节点
    #[arg(long)]
    pub keep_coincident: bool,

    /// 写出前验证网格
    #[arg(long)]
    pub validate: bool,
}

/// 执行转换命令
pub fn execute(args: ConvertArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mut opts = read_options(&config);
    if args.keep_coincident {
        opts.remove_coincident_nodes = false;
    }

    let mesh = sg_io::read_mesh_with(&args.input, &opts)
        .with_context(|| format!("无法读取网格 {}", args.input.display()))?;

    if args.validate {
        mesh.validate_with(&config.tolerance)
            .with_context(|| format!("网格 {} 验证失败", args.input.display()))?;
    }

    let format = OutputFormat::from(args.format);
    sg_io::write_mesh(&mesh, &args.output, format)
        .with_context(|| format!("无法写出 {}", args.output.display()))?;

    info!(
        "转换完成: {} -> {} ({:?}, 节点 {}, 单元 {})",
        args.input.display(),
        args.output.display(),
        format,
        mesh.n_nodes(),
        mesh.n_faces()
    );
    Ok(())
}
