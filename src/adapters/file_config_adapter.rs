//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(|e| std::io::Error::other(e))?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> Result<i64, String> {
        match self.config.get(section, key) {
            Some(value) => value
                .trim()
                .parse::<i64>()
                .map_err(|_| format!("{value:?} is not a whole number")),
            None => Ok(default),
        }
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> Result<bool, String> {
        match self.config.get(section, key) {
            Some(value) => Self::parse_bool(value.trim())
                .ok_or_else(|| format!("{value:?} is not a boolean (expected true/false, yes/no or 1/0)")),
            None => Ok(default),
        }
    }
}
