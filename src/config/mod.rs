mod column;
mod settings;

pub use column::{Column, ColumnCatalog, ColumnKind};
pub use settings::{Config, ExportSettings, SourceSettings};

use crate::error::{CarteraError, Result};
use directories::ProjectDirs;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.cartera/)
pub fn config_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "cartera") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.cartera/
    let home = dirs_home().ok_or_else(|| {
        CarteraError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".cartera"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Resolve the export output directory: ~ is expanded, relative paths are
/// anchored at the config directory.
pub fn resolve_output_dir(output_dir: &str, config_dir: &Path) -> PathBuf {
    let expanded = expand_path(output_dir);
    if expanded.is_absolute() {
        expanded
    } else {
        config_dir.join(expanded)
    }
}

/// Load the main config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(CarteraError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| CarteraError::ConfigParse { path, source: e })
}

/// Load columns.toml into the column catalog
pub fn load_columns(config_dir: &Path) -> Result<ColumnCatalog> {
    let path = config_dir.join("columns.toml");
    if !path.exists() {
        return Err(CarteraError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    let columns: HashMap<String, Column> =
        toml::from_str(&content).map_err(|e| CarteraError::ConfigParse { path, source: e })?;
    Ok(ColumnCatalog::new(columns))
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[export]
output_dir = "~/.cartera/exports"
delimiter = ","        # CSV field separator (single character)
sheet_name = "Report"  # XLSX worksheet name

[source]
timeout_secs = 10      # HTTP timeout for URL row sources
"#;

/// Template content for columns.toml
pub const COLUMNS_TEMPLATE: &str = r#"# Column catalog: descriptions and semantic kinds used for display and
# export headers. Keys not listed here fall back to the raw column key.
#
# kind is one of: "text" (default), "number", "date"

[suc_cod]
description = "Sucursal"

[anx_cod]
description = "Anexo"

[ter_nit]
description = "NIT"

[ter_raz]
description = "Razon Social"

[clc_cod]
description = "Clase"

[doc_num]
description = "Documento No."

[doc_fec]
description = "Fecha"
kind = "date"

[mov_det]
description = "Detalle"

[anf_vcto]
description = "Vence el"
kind = "date"

[sal_can]
description = "Saldo"
kind = "number"

[valor_inicial]
description = "Valor Inicial"
kind = "number"

[debitos]
description = "Debitos"
kind = "number"

[creditos]
description = "Creditos"
kind = "number"

[saldo]
description = "Saldo"
kind = "number"

[sin_vencer]
description = "Sin Vencer"
kind = "number"

[dias_1_30]
description = "1-30 Dias"
kind = "number"

[dias_31_90]
description = "31-90 Dias"
kind = "number"

[dias_91_180]
description = "91-180 Dias"
kind = "number"

[dias_181_360]
description = "181-360 Dias"
kind = "number"

[mas_360]
description = "Mas 360 Dias"
kind = "number"

[total]
description = "Total"
kind = "number"
"#;
