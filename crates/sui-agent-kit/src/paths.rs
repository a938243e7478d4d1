use directories::ProjectDirs;
use eyre::ContextCompat as _;
use std::path::PathBuf;

const APP_NAME: &str = "sui-agent-kit";
const LOG_FILE_NAME: &str = "sui-agent-kit.log.jsonl";

#[derive(Debug, Clone)]
pub struct KitPaths {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
    pub log_file: PathBuf,
}

impl KitPaths {
    pub fn discover() -> eyre::Result<Self> {
        // Test/CI override knobs.
        if let (Ok(data_dir), Ok(config_dir)) = (
            std::env::var("SUI_AGENT_DATA_DIR"),
            std::env::var("SUI_AGENT_CONFIG_DIR"),
        ) {
            return Ok(Self::at(PathBuf::from(config_dir), PathBuf::from(data_dir)));
        }

        // macOS: ~/Library/Application Support/sui-agent-kit
        // Linux: ~/.config/sui-agent-kit
        // Windows: %APPDATA%\\sui-agent-kit
        let proj = ProjectDirs::from("", "", APP_NAME).context("failed to resolve project dirs")?;
        Ok(Self::at(
            proj.config_dir().to_path_buf(),
            proj.data_dir().to_path_buf(),
        ))
    }

    fn at(config_dir: PathBuf, data_dir: PathBuf) -> Self {
        let log_file = data_dir.join(LOG_FILE_NAME);
        Self {
            config_dir,
            data_dir,
            log_file,
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }
}
