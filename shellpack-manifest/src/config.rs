//! Optional project configuration (`shellpack.toml`).

use std::{collections::BTreeMap, path::Path};

use serde::Deserialize;

use crate::{Error, Result, SourceContext};

/// File name of the optional project configuration.
pub const CONFIG_FILE: &str = "shellpack.toml";

/// Logical names of every external tool shellpack may invoke.
pub const KNOWN_TOOLS: &[&str] = &[
    "npm",
    "pnpm",
    "yarn",
    "node",
    "tsc",
    "npx",
    "msgfmt",
    "glib-compile-resources",
    "glib-compile-schemas",
    "zip",
    "gnome-extensions",
    "busctl",
];

/// Root of `shellpack.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(default)]
    pub build: BuildConfig,

    /// Executable overrides keyed by logical tool name.
    #[serde(default)]
    pub tools: BTreeMap<String, String>,
}

/// `[build]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct BuildConfig {
    /// Prefer the bundler over the plain compiler.
    #[serde(default)]
    pub use_esbuild: bool,
}

impl ProjectConfig {
    /// Load `<root>/shellpack.toml`, falling back to defaults when absent.
    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        let path = root.as_ref().join(CONFIG_FILE);
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_str_with_filename(&content, &path.display().to_string()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(Box::new(Error::Io { path, source: e })),
        }
    }

    /// Parse configuration text with a custom filename for error reporting.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        let ctx = SourceContext::new(content, filename);
        let config: ProjectConfig = toml::from_str(content).map_err(|e| ctx.toml_error(e))?;

        if let Some(name) = config
            .tools
            .keys()
            .find(|name| !KNOWN_TOOLS.contains(&name.as_str()))
        {
            return Err(ctx.unknown_tool_error(name.as_str()));
        }

        Ok(config)
    }

    /// Executable to run for a logical tool name.
    pub fn tool<'a>(&'a self, name: &'a str) -> &'a str {
        self.tools.get(name).map(String::as_str).unwrap_or(name)
    }
}
