//! Novel Desk CLI
//!
//! 组合根：加载配置、初始化日志、组装 DeskState，并决定会话失效时如何"跳转到登录"

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;

use novel_desk::application::ports::NavigatorPort;
use novel_desk::config::{load_config, load_config_from_path, print_config, AppConfig};
use novel_desk::domain::{DetectionKey, ModelStatus, ProgressSnapshot, ProjectId};
use novel_desk::infrastructure::DeskState;

#[derive(Debug, Parser)]
#[command(name = "novel-desk", version, about = "Client for the novel drafting backend")]
struct Cli {
    /// 配置文件路径（默认搜索 config.toml / config.local.toml）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run AI detection on a chapter
    Detect {
        project: String,
        chapter: u32,
        /// Read the text to analyze from a file instead of the selected version
        #[arg(long)]
        text_file: Option<PathBuf>,
        /// Server-side timeout in seconds
        #[arg(long)]
        timeout: Option<f64>,
    },
    /// Fetch the latest detection result
    Latest { project: String, chapter: u32 },
    /// Show multi-model generation progress
    Progress {
        project: String,
        chapter: u32,
        /// Keep polling until no model is active
        #[arg(long)]
        watch: bool,
    },
    /// Ask the server to stop one model's generation
    Stop {
        project: String,
        chapter: u32,
        model_key: String,
    },
    /// List novel projects
    Novels,
    /// List vector ingestion status
    Vectors {
        /// Show per-chapter status for one project
        project: Option<String>,
    },
}

/// CLI 中的"跳转到登录"：提示用户重新配置 token
struct CliLoginPrompt;

impl NavigatorPort for CliLoginPrompt {
    fn to_login(&self) {
        eprintln!("Session expired. Obtain a new token and set NOVEL_DESK_AUTH__TOKEN.");
    }
}

fn init_tracing(config: &AppConfig) {
    let log_filter = format!("{},novel_desk={}", config.log.level, config.log.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn project_id(raw: &str) -> anyhow::Result<ProjectId> {
    ProjectId::new(raw).map_err(|e| anyhow::anyhow!("{}", e))
}

/// 是否仍有模型在进行中（调用方的派生判断，快照本身不提供）
fn any_model_active(snapshot: &ProgressSnapshot) -> bool {
    snapshot.models().iter().any(|m| {
        matches!(
            m.status,
            ModelStatus::Pending | ModelStatus::Generating | ModelStatus::Stopping
        )
    })
}

async fn run(cli: Cli, config: AppConfig, state: DeskState) -> anyhow::Result<()> {
    match cli.command {
        Command::Detect {
            project,
            chapter,
            text_file,
            timeout,
        } => {
            let key = DetectionKey::new(project_id(&project)?, chapter);
            let text = match text_file {
                Some(path) => Some(tokio::fs::read_to_string(&path).await?),
                None => None,
            };
            let timeout = timeout.or(config.detection.timeout_secs);
            let record = state.detections.run_detection(&key, text, timeout).await?;
            print_json(&record)
        }
        Command::Latest { project, chapter } => {
            let key = DetectionKey::new(project_id(&project)?, chapter);
            let record = state.detections.fetch_latest(&key).await?;
            print_json(&record)
        }
        Command::Progress {
            project,
            chapter,
            watch,
        } => {
            let project = project_id(&project)?;
            let interval = Duration::from_millis(config.progress.poll_interval_ms);
            loop {
                let fetched = state
                    .generation
                    .fetch_generation_progress(&project, chapter)
                    .await;
                match fetched {
                    Ok(snapshot) => {
                        print_json(&snapshot)?;
                        if !watch || !any_model_active(&snapshot) {
                            return Ok(());
                        }
                    }
                    // 轮询中的临时失败不终止观察
                    Err(e) if watch && e.is_recoverable() => {
                        tracing::warn!(error = %e, "Progress poll failed, retrying");
                    }
                    Err(e) => return Err(e.into()),
                }
                tokio::time::sleep(interval).await;
            }
        }
        Command::Stop {
            project,
            chapter,
            model_key,
        } => {
            state
                .generation
                .stop_model_generation(&project_id(&project)?, chapter, &model_key)
                .await?;
            println!("Stop requested for {}", model_key);
            Ok(())
        }
        Command::Novels => print_json(&state.novels.list_novels().await?),
        Command::Vectors { project: None } => print_json(&state.vectors.list_projects().await?),
        Command::Vectors {
            project: Some(project),
        } => print_json(&state.vectors.list_chapters(&project_id(&project)?).await?),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = match cli.config.as_deref() {
        Some(path) => load_config_from_path(Some(path)),
        None => load_config(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);
    print_config(&config);

    let state = DeskState::from_config(&config, Arc::new(CliLoginPrompt))?;
    if !state.auth.is_authenticated() {
        tracing::warn!("No auth token configured, requests will be sent unauthenticated");
    }

    run(cli, config, state).await
}
