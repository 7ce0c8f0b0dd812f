use crate::config::Api;
use crate::provider::http::HttpTransport;
use crate::provider::{ClientError, Transport, TransportFailure};
use reqwest::Url;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use tracing::{debug, warn};

/// Google Books API 기본 URL
pub const BASE_URL: &'static str = "https://www.googleapis.com/books/v1";

/// 단권 조회(`/volumes/{volumeId}`)에서 허용하는 선택 매개변수
///
/// - `partner`: 파트너 ID로 결과를 브랜딩
/// - `projection`: 반환할 필드 범위 (`full`, `lite`)
/// - `source`: 요청 발신자를 식별하는 문자열
///
/// See: https://developers.google.com/books/docs/v1/reference/volumes/get
pub const VOLUME_GET_PARAMETERS: [&'static str; 3] = ["partner", "projection", "source"];

/// 도서 검색(`/volumes`)에서 허용하는 선택 매개변수
///
/// See: https://developers.google.com/books/docs/v1/reference/volumes/list
pub const VOLUME_LIST_PARAMETERS: [&'static str; 12] = [
    "download",
    "filter",
    "langRestrict",
    "libraryRestrict",
    "maxResults",
    "orderBy",
    "partner",
    "printType",
    "projection",
    "showPreorders",
    "source",
    "startIndex",
];

/// 선택 매개변수 값
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Text(String),
    Integer(i64),
    Bool(bool),
}

impl Display for OptionValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Text(text) => write!(f, "{}", text),
            OptionValue::Integer(n) => write!(f, "{}", n),
            OptionValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// 문자열에서 값의 타입을 추론한다. 정수, `true`/`false` 순으로 시도하며 나머지는 문자열로 취급한다.
impl FromStr for OptionValue {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(n) = s.parse::<i64>() {
            return Ok(OptionValue::Integer(n));
        }
        match s {
            "true" => Ok(OptionValue::Bool(true)),
            "false" => Ok(OptionValue::Bool(false)),
            _ => Ok(OptionValue::Text(s.to_owned())),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_owned())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Text(value)
    }
}

impl From<i32> for OptionValue {
    fn from(value: i32) -> Self {
        OptionValue::Integer(value as i64)
    }
}

impl From<u32> for OptionValue {
    fn from(value: u32) -> Self {
        OptionValue::Integer(value as i64)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Integer(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

/// 선택 매개변수 이름과 값. 직렬화 순서를 고정하기 위해 `BTreeMap`을 사용한다.
pub type Options = BTreeMap<String, OptionValue>;

/// 단권 조회 응답으로 API가 반환한 JSON 객체를 그대로 담는다.
pub type VolumeResponse = Map<String, Value>;

/// 검색 응답. API 규약상 `totalItems`와 `items`를 포함하지만 별도로 검사하지 않는다.
pub type ListResponse = Map<String, Value>;

/// Google Books 볼륨 API 클라이언트
///
/// 불변 상태만 가지므로 전송 계층이 허용하는 한 여러 스레드에서 동시에 호출할 수 있다.
#[derive(Debug, Clone)]
pub struct Client<T: Transport = HttpTransport> {
    base_url: String,
    transport: T,
}

impl Client<HttpTransport> {
    pub fn new() -> Result<Self, ClientError> {
        Ok(Self::with_transport(HttpTransport::new()?))
    }

    /// 설정 파일의 API 항목(기본 URL, 타임아웃)으로 클라이언트를 생성한다.
    pub fn from_config(api: &Api) -> Result<Self, ClientError> {
        let transport = HttpTransport::with_timeout(api.timeout())?;
        Ok(Self::with_base_url(api.base_url(), transport))
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(transport: T) -> Self {
        Self::with_base_url(BASE_URL, transport)
    }

    pub fn with_base_url<S: Into<String>>(base_url: S, transport: T) -> Self {
        Self { base_url: base_url.into(), transport }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 볼륨 ID로 단권 정보를 조회한다.
    ///
    /// `options`의 키는 [`VOLUME_GET_PARAMETERS`]에 속해야 하며, 그렇지 않을 경우 요청을 보내지 않고
    /// [`ClientError::InvalidParameter`]를 반환한다.
    pub fn fetch_volume(&self, volume_id: &str, options: &Options) -> Result<VolumeResponse, ClientError> {
        if volume_id.is_empty() {
            return Err(ClientError::MissingRequiredParameter("volumeId".to_string()));
        }
        validate_options(options, &VOLUME_GET_PARAMETERS)?;

        let url = self.endpoint(&["volumes", volume_id])?;
        let params = options.iter()
            .map(|(key, value)| (key.clone(), value.to_string()))
            .collect();

        self.dispatch(url, params)
    }

    /// 전문 검색 쿼리로 도서를 검색한다.
    ///
    /// 쿼리에는 `intitle:`, `inauthor:` 같은 필드 한정 키워드를 포함할 수 있으며 해석은 API 서버가 한다.
    /// `q`는 허용 목록에 없으므로 `options`로 덮어쓸 수 없다.
    pub fn search_volumes(&self, query: &str, options: &Options) -> Result<ListResponse, ClientError> {
        validate_options(options, &VOLUME_LIST_PARAMETERS)?;

        let url = self.endpoint(&["volumes"])?;
        let mut params = Vec::with_capacity(options.len() + 1);
        params.push(("q".to_string(), query.to_string()));
        params.extend(options.iter().map(|(key, value)| (key.clone(), value.to_string())));

        self.dispatch(url, params)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.clone()))?;

        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    fn dispatch(&self, url: Url, params: Vec<(String, String)>) -> Result<Map<String, Value>, ClientError> {
        debug!("Request {} (params: {:?})", url, params);

        let response = self.transport.get(url.as_str(), &params)?;
        if !response.is_success() {
            warn!("HTTP 오류: {} (URL: {})", response.status, url);
            return Err(ClientError::Transport(TransportFailure::Status(response.status)));
        }

        serde_json::from_slice::<Map<String, Value>>(&response.body)
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

/// 모든 키가 허용 목록에 정확히 일치하는지 검사한다. 부분 문자열 일치는 허용하지 않는다.
fn validate_options(options: &Options, allowed: &[&str]) -> Result<(), ClientError> {
    match options.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(ClientError::InvalidParameter(key.clone())),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn options(entries: &[(&str, OptionValue)]) -> Options {
        entries.iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[rstest]
    #[case("partner")]
    #[case("projection")]
    #[case("source")]
    fn get_allows_listed_names(#[case] key: &str) {
        let opts = options(&[(key, "x".into())]);
        assert_eq!(validate_options(&opts, &VOLUME_GET_PARAMETERS), Ok(()));
    }

    #[rstest]
    #[case("")]
    #[case("partne")]
    #[case("project")]
    #[case("r projection")]
    #[case("Projection")]
    #[case("maxResults")]
    fn get_rejects_anything_but_whole_names(#[case] key: &str) {
        let opts = options(&[(key, "x".into())]);
        assert_eq!(
            validate_options(&opts, &VOLUME_GET_PARAMETERS),
            Err(ClientError::InvalidParameter(key.to_string()))
        );
    }

    #[rstest]
    #[case("")]
    #[case("q")]
    #[case("max")]
    #[case("orderBy partner")]
    #[case("startindex")]
    fn list_rejects_anything_but_whole_names(#[case] key: &str) {
        let opts = options(&[(key, "x".into())]);
        assert_eq!(
            validate_options(&opts, &VOLUME_LIST_PARAMETERS),
            Err(ClientError::InvalidParameter(key.to_string()))
        );
    }

    #[test]
    fn list_allows_every_listed_name() {
        let opts: Options = VOLUME_LIST_PARAMETERS.iter()
            .map(|k| (k.to_string(), OptionValue::Text("x".to_string())))
            .collect();
        assert_eq!(validate_options(&opts, &VOLUME_LIST_PARAMETERS), Ok(()));
    }

    #[test]
    fn first_invalid_key_is_reported() {
        let opts = options(&[
            ("projection", "full".into()),
            ("aaa", "x".into()),
            ("zzz", "x".into()),
        ]);
        assert_eq!(
            validate_options(&opts, &VOLUME_GET_PARAMETERS),
            Err(ClientError::InvalidParameter("aaa".to_string()))
        );
    }

    #[test]
    fn option_values_serialize_as_plain_text() {
        assert_eq!(OptionValue::from("full").to_string(), "full");
        assert_eq!(OptionValue::from(5).to_string(), "5");
        assert_eq!(OptionValue::from(-1).to_string(), "-1");
        assert_eq!(OptionValue::from(true).to_string(), "true");
        assert_eq!(OptionValue::from(false).to_string(), "false");
    }

    #[test]
    fn option_value_type_is_inferred() {
        assert_eq!("40".parse::<OptionValue>(), Ok(OptionValue::Integer(40)));
        assert_eq!("-1".parse::<OptionValue>(), Ok(OptionValue::Integer(-1)));
        assert_eq!("true".parse::<OptionValue>(), Ok(OptionValue::Bool(true)));
        assert_eq!("free-ebooks".parse::<OptionValue>(), Ok(OptionValue::Text("free-ebooks".to_string())));
    }

    #[test]
    fn endpoint_appends_segments_to_base_path() {
        let client = Client::with_transport(NoopTransport);
        let url = client.endpoint(&["volumes", "abc123"]).unwrap();
        assert_eq!(url.as_str(), "https://www.googleapis.com/books/v1/volumes/abc123");
    }

    #[test]
    fn endpoint_ignores_trailing_slash_on_base() {
        let client = Client::with_base_url("http://localhost:8080/books/v1/", NoopTransport);
        let url = client.endpoint(&["volumes"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/books/v1/volumes");
    }

    #[test]
    fn endpoint_escapes_volume_id_as_one_segment() {
        let client = Client::with_transport(NoopTransport);
        let url = client.endpoint(&["volumes", "a/b"]).unwrap();
        assert_eq!(url.as_str(), "https://www.googleapis.com/books/v1/volumes/a%2Fb");
    }

    #[test]
    fn unusable_base_url_is_rejected() {
        let client = Client::with_base_url("mailto:someone@example.com", NoopTransport);
        assert_eq!(
            client.endpoint(&["volumes"]).unwrap_err(),
            ClientError::InvalidBaseUrl("mailto:someone@example.com".to_string())
        );
    }

    #[test]
    fn http_client_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Client<HttpTransport>>();
    }

    struct NoopTransport;

    impl Transport for NoopTransport {
        fn get(&self, _url: &str, _query: &[(String, String)]) -> Result<crate::provider::RawResponse, ClientError> {
            unreachable!("no request expected")
        }
    }
}
