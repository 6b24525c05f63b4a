use crate::codec::Format;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub default_format: Format,
    pub log_level: String,
    pub todo_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_format: Format::Json,
            log_level: "info".to_string(),
            todo_file: None,
        }
    }
}

// Every key is optional so a partial file only overrides what it names.
#[derive(Deserialize, Default)]
struct FileConfig {
    default_format: Option<String>,
    log_level: Option<String>,
    todo_file: Option<PathBuf>,
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("todo-record").join("config.toml"))
}

impl Config {
    /// Defaults, then `config.toml`, then `TODO_FORMAT` / `TODO_LOG` / `TODO_FILE`.
    pub fn load() -> Result<Config> {
        dotenv::dotenv().ok();

        let mut config = Config::default();
        if let Some(path) = config_path() {
            config.merge_file(&path)?;
        }
        config.merge_vars(|key| env::var(key).ok())?;
        Ok(config)
    }

    fn merge_file(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let contents = fs::read_to_string(path)?;
        self.merge_toml(&contents).map_err(|err| match err {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    fn merge_toml(&mut self, contents: &str) -> Result<()> {
        let file: FileConfig =
            toml::from_str(contents).map_err(|err| Error::Config(err.to_string()))?;
        if let Some(format) = file.default_format {
            self.default_format = format.parse()?;
        }
        if let Some(level) = file.log_level {
            self.log_level = level;
        }
        if file.todo_file.is_some() {
            self.todo_file = file.todo_file;
        }
        Ok(())
    }

    fn merge_vars(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(format) = var("TODO_FORMAT") {
            self.default_format = format.parse()?;
        }
        if let Some(level) = var("TODO_LOG") {
            self.log_level = level;
        }
        if let Some(file) = var("TODO_FILE") {
            self.todo_file = Some(PathBuf::from(file));
        }
        Ok(())
    }

    /// The file to operate on when none is given on the command line.
    pub fn default_todo_file(&self) -> PathBuf {
        self.todo_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("todos.{}", self.default_format)))
    }
}
