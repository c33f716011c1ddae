use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use file_searcher::{completion_message, Config, ErrorLogger, Logger, LoggerTrait, Scanner, SearchSummary};

/// 递归查找目录中包含指定文本的行，并把结果写成 JSON
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// 要搜索的文本（默认取配置文件中的 term）
    term: Option<String>,

    /// 要搜索的目录路径
    path: Option<PathBuf>,

    /// 忽略大小写
    #[clap(short, long, conflicts_with = "case_sensitive")]
    ignore_case: bool,

    /// 区分大小写
    #[clap(short = 's', long)]
    case_sensitive: bool,

    /// 只搜索以这些后缀结尾的文件，可重复或用逗号分隔 (例如 ".py,.md")
    #[clap(short = 'e', long = "ext", value_delimiter = ',')]
    extensions: Vec<String>,

    /// 搜索所有文件，忽略扩展名过滤
    #[clap(short, long, conflicts_with = "extensions")]
    all_files: bool,

    /// 结果 JSON 文件路径
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// 配置文件路径 (默认使用程序同级目录下的 config.toml)
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// 将最终生效的配置写回配置文件
    #[clap(long)]
    write_config: bool,

    /// 启用调试日志和错误日志，日志文件保存到当前目录
    #[clap(long)]
    log: bool,

    /// 遵循 .gitignore 规则，默认情况下会搜索所有文件
    #[clap(long)]
    respect_gitignore: bool,

    /// 不显示进度
    #[clap(long)]
    no_progress: bool,
}

/// 命令行参数覆盖配置文件中的值
fn apply_args(config: &mut Config, args: &Args) {
    if let Some(term) = &args.term {
        config.search.term = term.clone();
    }
    if let Some(path) = &args.path {
        config.search.directory = path.to_string_lossy().into_owned();
    }

    if args.ignore_case {
        config.search.ignore_case = true;
    } else if args.case_sensitive {
        config.search.ignore_case = false;
    }

    if args.all_files {
        config.search.extensions.clear();
    } else if !args.extensions.is_empty() {
        config.search.extensions = args.extensions.clone();
    }

    if let Some(output) = &args.output {
        config.search.output = output.to_string_lossy().into_owned();
    }

    if args.log {
        config.logging.enabled = true;
    }
    if args.respect_gitignore {
        config.walk.respect_gitignore = true;
    }
    if args.no_progress {
        config.walk.show_progress = false;
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => Config::default_config_path()?,
    };

    let mut config = Config::load_or_default(&config_path)?;
    apply_args(&mut config, &args);
    config.validate().context("配置无效")?;

    if args.write_config {
        config.save_to_file(&config_path)?;
        println!("已写入配置文件: {}", config_path.display());
    }

    // 初始化日志记录器
    let logger = Arc::new(Logger::new(config.logging.enabled)?);
    let error_logger = Arc::new(ErrorLogger::new(config.logging.enabled)?);
    if logger.is_enabled() {
        println!("日志文件已创建: {}", logger.log_path().display());
    }

    let search = config.to_search_config();

    println!("在 {} 中搜索: {}", search.directory().display(), search.term());
    println!("忽略大小写: {}", search.ignore_case());
    if search.extensions().is_empty() {
        println!("扩展名过滤: 无");
    } else {
        println!("扩展名过滤: {}", search.extensions().join(", "));
    }
    println!("结果文件: {}", search.output_path().display());
    println!("遵循 .gitignore 规则: {}", search.walk_options().respect_gitignore);
    println!();

    let mut scanner = Scanner::new(search)
        .with_logger(logger.clone())
        .with_error_logger(Arc::clone(&error_logger));

    let report = scanner.run_report().context("搜索失败")?;

    println!("{}", completion_message(&report.output_path));
    SearchSummary::from(&report).print()?;
    error_logger.print_error_summary();

    Ok(())
}
