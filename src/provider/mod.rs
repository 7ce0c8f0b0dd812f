use std::fmt;
use std::fmt::{Display, Formatter};

pub mod http;
pub mod query;
pub mod volumes;

/// 원격 API 호출 중 HTTP 계층에서 발생한 실패
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    /// 2xx 범위 밖의 상태 코드를 응답 받음
    Status(u16),
    /// 연결 실패, 타임아웃 등 응답을 받지 못함
    Network(String),
}

impl Display for TransportFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TransportFailure::Status(status) => write!(f, "HTTP status {}", status),
            TransportFailure::Network(message) => write!(f, "network failure, {}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    MissingRequiredParameter(String), // 필수 매개변수가 누락됨
    InvalidParameter(String),         // 허용 목록에 없는 선택 매개변수
    InvalidBaseUrl(String),
    Transport(TransportFailure),
    Decode(String),
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::MissingRequiredParameter(name) => write!(f, "Parameter '{}' is required", name),
            ClientError::InvalidParameter(name) => write!(f, "Parameter '{}' not valid", name),
            ClientError::InvalidBaseUrl(url) => write!(f, "Invalid base url: {}", url),
            ClientError::Transport(failure) => write!(f, "Request failed: {}", failure),
            ClientError::Decode(message) => write!(f, "Response parse failed: {}", message),
        }
    }
}

impl std::error::Error for ClientError {}

/// 원격 API가 돌려준 가공되지 않은 응답
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP GET 요청을 실제로 전송하는 트레이트
///
/// 구현체는 상태 코드와 관계 없이 응답을 그대로 반환해야 하며, 상태 코드 검사와
/// 본문 해석은 호출하는 쪽에서 담당한다. 응답 자체를 받지 못한 경우에만
/// [`TransportFailure::Network`]로 실패한다.
pub trait Transport {
    fn get(&self, url: &str, query: &[(String, String)]) -> Result<RawResponse, ClientError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str, query: &[(String, String)]) -> Result<RawResponse, ClientError> {
        (**self).get(url, query)
    }
}
