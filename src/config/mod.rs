pub mod log;

use crate::provider::volumes::BASE_URL;
use config;
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;

/// API 요청의 기본 타임아웃 시간(초)
const DEFAULT_TIMEOUT_SECONDS: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct Api {
    base_url: String,

    /// 요청 타임아웃(초). 0으로 설정하면 타임아웃을 걸지 않는다.
    timeout_seconds: Option<u64>,
}

impl Api {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_seconds {
            None | Some(0) => None,
            Some(s) => Some(Duration::from_secs(s)),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    api: Api,
    #[serde(default)]
    logger: log::Config,
}

impl AppConfig {
    pub fn api(&self) -> &Api {
        &self.api
    }

    pub fn logger(&self) -> &log::Config {
        &self.logger
    }
}

/// 실행 환경에 따라 .env 파일을 로드한다.
pub fn load_dotenv() {
    let env_filename = env::var("RUN_MODE")
        .map(|env| format!(".env.{}", env))
        .unwrap_or_else(|_| ".env".into());

    dotenvy::from_filename(env_filename).ok();
}

/// `config/{RUN_MODE}.json`에서 설정을 읽는다. 파일이 없으면 기본값을 사용한다.
pub fn load_config() -> Result<AppConfig, config::ConfigError> {
    let env = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
    load_config_from(Path::new("config"), &env)
}

pub fn load_config_from(dir: &Path, env: &str) -> Result<AppConfig, config::ConfigError> {
    let config = config::Config::builder()
        .set_default("api.base_url", BASE_URL)?
        .set_default("api.timeout_seconds", DEFAULT_TIMEOUT_SECONDS)?
        .add_source(config::File::from(dir.join(format!("{}.json", env))).required(false))
        .build()?;

    config.try_deserialize()
}
