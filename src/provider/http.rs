use crate::provider::{ClientError, RawResponse, Transport, TransportFailure};
use reqwest::{blocking, Url};
use std::time::Duration;
use tracing::debug;

/// `reqwest` 블로킹 클라이언트로 요청을 전송하는 기본 [`Transport`]
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, ClientError> {
        Self::with_timeout(None)
    }

    /// 요청 타임아웃을 지정하여 생성한다. `None`일 경우 `reqwest`의 기본값을 따른다.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = blocking::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build()
            .map_err(|e| ClientError::Transport(TransportFailure::Network(format!("클라이언트 생성 실패: {}", e))))?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, query: &[(String, String)]) -> Result<RawResponse, ClientError> {
        let url = build_url(url, query)?;
        debug!("GET {}", url);

        let response = self.client.get(url)
            .send()
            .map_err(|e| ClientError::Transport(TransportFailure::Network(e.to_string())))?;
        let status = response.status().as_u16();
        let body = response.bytes()
            .map_err(|e| ClientError::Transport(TransportFailure::Network(e.to_string())))?;

        Ok(RawResponse::new(status, body.to_vec()))
    }
}

/// 쿼리 파라미터를 퍼센트 인코딩하여 URL에 붙인다.
fn build_url(url: &str, query: &[(String, String)]) -> Result<Url, ClientError> {
    let mut url = Url::parse(url)
        .map_err(|_| ClientError::InvalidBaseUrl(url.to_owned()))?;

    // 파라미터가 없을 때 빈 `?`가 붙지 않도록 한다.
    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            pairs.append_pair(key, value);
        }
    }

    Ok(url)
}
