use anyhow::{anyhow, Result};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    File,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown store backend {:?}", other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub store_backend: StoreBackend,
    pub store_path: PathBuf,
    pub post_max_chars: usize,
    pub min_password_len: usize,
    pub wheel_segments: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_backend: StoreBackend::Memory,
            store_path: PathBuf::from("./data"),
            post_max_chars: 500,
            min_password_len: 6,
            wheel_segments: 6,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let wheel_segments: usize = env_or_parse("WHEEL_SEGMENTS", "6")?;
        if wheel_segments == 0 {
            return Err(anyhow!("invalid WHEEL_SEGMENTS: must be at least 1"));
        }

        Ok(Self {
            store_backend: env_or_parse("STORE_BACKEND", "file")?,
            store_path: PathBuf::from(env_or("STORE_PATH", "./data")),
            post_max_chars: env_or_parse("POST_MAX_CHARS", "500")?,
            min_password_len: env_or_parse("MIN_PASSWORD_LEN", "6")?,
            wheel_segments,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_parse<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    let value = std::env::var(key).unwrap_or_else(|_| default.to_string());
    value
        .parse::<T>()
        .map_err(|err| anyhow!("invalid {}: {}", key, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_names() {
        assert_eq!("file".parse::<StoreBackend>(), Ok(StoreBackend::File));
        assert_eq!("memory".parse::<StoreBackend>(), Ok(StoreBackend::Memory));
        assert!("sqlite".parse::<StoreBackend>().is_err());
    }
}
