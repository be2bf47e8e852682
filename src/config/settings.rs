use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub export: ExportSettings,
    #[serde(default)]
    pub source: SourceSettings,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ExportSettings {
    pub output_dir: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SourceSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_sheet_name() -> String {
    "Report".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}
