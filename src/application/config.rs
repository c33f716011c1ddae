use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::WalkOptions;

use super::SearchConfig;

/// 应用程序配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 搜索相关配置
    pub search: SearchSettings,
    /// 目录遍历配置
    pub walk: WalkSettings,
    /// 日志配置
    pub logging: LoggingSettings,
}

/// 搜索配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// 搜索的根目录
    pub directory: String,
    /// 要查找的字面量文本
    pub term: String,
    /// 是否忽略大小写
    pub ignore_case: bool,
    /// 文件名后缀白名单，为空表示搜索所有文件
    pub extensions: Vec<String>,
    /// 结果 JSON 文件路径
    pub output: String,
}

/// 遍历配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkSettings {
    /// 是否遵循 .gitignore 规则
    pub respect_gitignore: bool,
    /// 是否显示进度
    pub show_progress: bool,
}

/// 日志配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// 是否写调试日志和错误日志
    pub enabled: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            term: "TODO".to_string(),
            ignore_case: true,
            extensions: vec![".py".to_string(), ".md".to_string()],
            output: "todo_matches.json".to_string(),
        }
    }
}

impl Default for WalkSettings {
    fn default() -> Self {
        Self {
            respect_gitignore: false,
            show_progress: true,
        }
    }
}

impl Config {
    /// 从配置文件加载配置，文件不存在时使用默认配置
    pub fn load_or_default(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// 从文件加载配置
    pub fn load_from_file(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("无法读取配置文件: {}", config_path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("无法解析配置文件: {}", config_path.display()))?;

        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("无法创建配置目录: {}", parent.display()))?;
            }
        }

        let content = toml::to_string_pretty(self)
            .context("无法序列化配置")?;

        fs::write(config_path, content)
            .with_context(|| format!("无法写入配置文件: {}", config_path.display()))?;

        Ok(())
    }

    /// 获取配置文件的默认路径（程序所在目录下的 config.toml）
    pub fn default_config_path() -> Result<PathBuf> {
        let exe_path = std::env::current_exe()
            .context("无法获取程序路径")?;

        let exe_dir = exe_path.parent()
            .context("无法获取程序目录")?;

        Ok(exe_dir.join("config.toml"))
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.search.term.is_empty() {
            anyhow::bail!("term 不能为空");
        }

        if self.search.output.trim().is_empty() {
            anyhow::bail!("output 不能为空");
        }

        let mut seen = HashSet::new();
        for ext in &self.search.extensions {
            if ext.is_empty() {
                anyhow::bail!("extensions 中不能有空字符串");
            }
            if !seen.insert(ext.as_str()) {
                anyhow::bail!("extensions 中有重复项: {}", ext);
            }
        }

        Ok(())
    }

    /// 转换为一次扫描使用的参数
    pub fn to_search_config(&self) -> SearchConfig {
        SearchConfig::new(&self.search.directory, self.search.term.clone())
            .with_ignore_case(self.search.ignore_case)
            .with_extensions(self.search.extensions.clone())
            .with_output_path(&self.search.output)
            .with_walk_options(WalkOptions {
                respect_gitignore: self.walk.respect_gitignore,
                show_progress: self.walk.show_progress,
            })
    }
}
