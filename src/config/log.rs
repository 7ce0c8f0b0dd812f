use serde::Deserialize;
use std::fmt;
use std::fmt::{Display, Formatter};
use time::macros::format_description;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogConfigError {
    InvalidLevel(String),
    InvalidRotation(String),
    Appender(String),
    AlreadyInitialized(String),
}

impl Display for LogConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LogConfigError::InvalidLevel(level) => write!(
                f, "로그 레벨(level)은 \"TRACE\", \"DEBUG\", \"INFO\", \"WARN\", \"ERROR\"만 가능 합니다. (입력: {})", level
            ),
            LogConfigError::InvalidRotation(rotation) => write!(
                f, "로깅 파일 로테이션(rotation)은 \"DAILY\", \"HOURLY\", \"MINUTELY\", \"NEVER\"만 가능 합니다. (입력: {})", rotation
            ),
            LogConfigError::Appender(message) => write!(f, "로그 파일 생성 실패: {}", message),
            LogConfigError::AlreadyInitialized(message) => write!(f, "로거가 이미 설정 되어 있습니다: {}", message),
        }
    }
}

impl std::error::Error for LogConfigError {}

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// 로그 파일을 저장할 디렉토리로 `name`과 함께 설정 되어야 파일에 로그가 기록 된다.
    /// 설정 되지 않을 시 stderr에만 출력한다.
    dir: Option<String>,
    name: Option<String>,

    /// 최대 로그 파일 개수로 로그 파일이 설정한 개수보다 커질 경우 기존의 로그파일들은 삭제 된다.
    /// 설정 되지 않을 시 로그 파일은 삭제 되지 않는다.
    keep: Option<usize>,

    /// 파일과 stderr에 출력할 로그의 레벨로 지정된 로그 레벨 이상만 로깅된다.
    /// 설정하지 않을시 기본값은 WARN으로 설정 된다. 응답 JSON은 stdout으로 출력 됨으로 로그와 섞이지 않는다.
    ///
    /// 이 값은 [`tracing::Level`]로 변환 됨으로 자세한 사항은 해당 파일을 확인
    level: Option<String>,

    /// 로깅 파일이 분리 되는 기간으로 .log 파일 하나 당 설정된 기간 동안 로그가 기록 된다.
    /// 설정 되지 않을시 기본값은 DAILY로 설정된다.
    ///
    /// 이 값은 [`rolling::Rotation`]으로 변환 됨으로 자세한 사항은 해당 파일을 확인
    rotation: Option<String>,
}

impl Config {
    pub fn dir(&self) -> Option<&str> {
        self.dir.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn level(&self) -> Option<&str> {
        self.level.as_deref()
    }
}

/// 전역 로거를 설정한다.
///
/// 파일 로깅이 설정된 경우 반환된 [`WorkerGuard`]가 살아있는 동안에만 로그가 파일로 기록 됨으로
/// 프로그램 종료 시까지 보관해야 한다.
pub fn set_global_logging_config(c: &Config) -> Result<Option<WorkerGuard>, LogConfigError> {
    let level = match &c.level {
        Some(level) => parse_level(level)?,
        None => tracing::Level::WARN,
    };

    let (writer, guard) = match (&c.dir, &c.name) {
        (Some(dir), Some(name)) => {
            let rotation = match &c.rotation {
                Some(rotation) => parse_rotation(rotation)?,
                None => rolling::Rotation::DAILY,
            };

            let mut file_appender = rolling::RollingFileAppender::builder()
                .filename_prefix(name.clone())
                .filename_suffix("log")
                .rotation(rotation);

            if let Some(keep) = c.keep {
                file_appender = file_appender.max_log_files(keep);
            }

            let file_appender = file_appender.build(dir.clone())
                .map_err(|e| LogConfigError::Appender(e.to_string()))?;

            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            (BoxMakeWriter::new(std::io::stderr.and(non_blocking)), Some(guard))
        }
        _ => (BoxMakeWriter::new(std::io::stderr), None),
    };

    tracing_subscriber::fmt()
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_current_span(true)
        .with_span_list(true)
        .with_timer(LocalTime::new(format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]")))
        .with_max_level(level)
        .with_writer(writer)
        .try_init()
        .map_err(|e| LogConfigError::AlreadyInitialized(e.to_string()))?;

    Ok(guard)
}

fn parse_rotation(s: &str) -> Result<rolling::Rotation, LogConfigError> {
    match s {
        "DAILY" => Ok(rolling::Rotation::DAILY),
        "HOURLY" => Ok(rolling::Rotation::HOURLY),
        "MINUTELY" => Ok(rolling::Rotation::MINUTELY),
        "NEVER" => Ok(rolling::Rotation::NEVER),
        _ => Err(LogConfigError::InvalidRotation(s.to_owned())),
    }
}

fn parse_level(l: &str) -> Result<tracing::Level, LogConfigError> {
    match l {
        "TRACE" => Ok(tracing::Level::TRACE),
        "DEBUG" => Ok(tracing::Level::DEBUG),
        "INFO" => Ok(tracing::Level::INFO),
        "WARN" => Ok(tracing::Level::WARN),
        "ERROR" => Ok(tracing::Level::ERROR),
        _ => Err(LogConfigError::InvalidLevel(l.to_owned())),
    }
}
