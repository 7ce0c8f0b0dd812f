use crate::provider::volumes::OptionValue;
use std::fmt;
use std::fmt::Formatter;

pub mod config;
pub mod provider;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    InvalidArgument(String),
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentError::InvalidArgument(message) => write!(f, "Invalid argument: {}", message),
        }
    }
}

impl std::error::Error for ArgumentError {}

/// 커맨드라인의 `key=value` 형식 선택 매개변수를 파싱한다.
/// 값의 타입은 [`OptionValue`]의 규칙에 따라 추론한다.
pub fn parse_option(s: &str) -> Result<(String, OptionValue), ArgumentError> {
    let (key, value) = s.split_once('=')
        .ok_or_else(|| ArgumentError::InvalidArgument(format!("expected key=value: {}", s)))?;

    if key.is_empty() {
        return Err(ArgumentError::InvalidArgument(format!("empty option name: {}", s)));
    }

    let value = match value.parse::<OptionValue>() {
        Ok(value) => value,
        Err(never) => match never {},
    };

    Ok((key.to_owned(), value))
}
