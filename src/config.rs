use crate::error::{ReportError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_PATH: &str =
    "Indicadores_de_Cobertura_en_el_Servicio_de_Agua_Potable_en_el_Departamento_de_Cusco_2016_2019.csv";
pub const DEFAULT_CONFIG_PATH: &str = "coverage_report.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_path: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: DEFAULT_DATA_PATH.into(),
            output_dir: ".".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    data_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
}

impl Settings {
    /// Defaults, then the TOML file (if present), then `COVERAGE_*` variables.
    pub fn load(config_path: &Path) -> Result<Self> {
        let mut settings = Settings::default();

        if config_path.exists() {
            let raw = std::fs::read_to_string(config_path)
                .map_err(|e| ReportError::io(config_path, e))?;
            settings.apply_toml(&raw).map_err(|source| ReportError::Config {
                path: config_path.to_path_buf(),
                source,
            })?;
        }

        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    fn apply_toml(&mut self, raw: &str) -> std::result::Result<(), toml::de::Error> {
        let file_cfg: FileSettings = toml::from_str(raw)?;
        if let Some(v) = file_cfg.data_path {
            self.data_path = v;
        }
        if let Some(v) = file_cfg.output_dir {
            self.output_dir = v;
        }
        Ok(())
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("COVERAGE_DATA_PATH") {
            self.data_path = v.into();
        }
        if let Some(v) = var("COVERAGE_OUTPUT_DIR") {
            self.output_dir = v.into();
        }
    }
}
