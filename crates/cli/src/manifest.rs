use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MANIFEST_NAME: &str = "slashopt.json";

/// Command-line declarations read from `slashopt.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Display name for the usage line. Falls back to the running executable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<char>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiters: Option<Vec<char>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionDecl>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<ArgumentDecl>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionDecl {
    /// Pipe-separated aliases, e.g. `a|abc`.
    pub keys: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help: String,

    /// Meta value; present iff the option takes `=value`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default)]
    pub multiple: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentDecl {
    pub name: String,

    #[serde(default)]
    pub optional: bool,

    #[serde(default)]
    pub multiple: bool,
}

impl Manifest {
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("manifest not found: {}", path.display());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse manifest JSON: {}", path.display()))
    }

    /// The manifest `init` writes: one of each declaration kind.
    pub fn sample() -> Self {
        Self {
            command: Some("MyCommand".to_string()),
            prefix: None,
            delimiters: None,
            options: vec![
                OptionDecl {
                    keys: "a|abc".to_string(),
                    help: "The abc option.".to_string(),
                    ..Default::default()
                },
                OptionDecl {
                    keys: "n|count".to_string(),
                    help: "Number of items.".to_string(),
                    value: Some("N".to_string()),
                    ..Default::default()
                },
                OptionDecl {
                    keys: "v|verbose".to_string(),
                    help: "Increase verbosity.".to_string(),
                    multiple: true,
                    ..Default::default()
                },
            ],
            arguments: vec![
                ArgumentDecl {
                    name: "VALUE".to_string(),
                    ..Default::default()
                },
                ArgumentDecl {
                    name: "EXTRA".to_string(),
                    optional: true,
                    multiple: true,
                },
            ],
        }
    }
}

/// Write [`Manifest::sample`] into `project_dir`. Never overwrites.
pub fn write_default_manifest(project_dir: &Path) -> Result<PathBuf> {
    let dest = project_dir.join(DEFAULT_MANIFEST_NAME);
    if dest.exists() {
        bail!("{} already exists in {}", DEFAULT_MANIFEST_NAME, project_dir.display());
    }

    let bytes =
        serde_json::to_vec_pretty(&Manifest::sample()).context("failed to serialize manifest")?;
    let mut out = String::from_utf8(bytes).context("manifest is not valid UTF-8")?;
    out.push('\n');

    let tmp = dest.with_extension("tmp");
    fs::write(&tmp, out.as_bytes())
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, &dest)
        .with_context(|| format!("failed to move {} into place", dest.display()))?;
    Ok(dest)
}
