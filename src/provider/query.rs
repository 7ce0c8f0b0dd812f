use std::fmt;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// 알 수 없는 검색 키워드
    UnknownKeyword(String),
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::UnknownKeyword(name) => write!(f, "Unknown search keyword: {}", name),
        }
    }
}

impl std::error::Error for QueryError {}

/// 특정 필드에 한정하여 검색하기 위한 키워드
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Keyword {
    /// 제목
    InTitle,
    /// 저자
    InAuthor,
    /// 출판사
    InPublisher,
    /// 카테고리
    Subject,
    /// ISBN
    Isbn,
    /// 미국 의회도서관 제어번호
    Lccn,
    /// OCLC 번호
    Oclc,
}

impl Keyword {
    pub fn token(&self) -> &'static str {
        match self {
            Keyword::InTitle => "intitle",
            Keyword::InAuthor => "inauthor",
            Keyword::InPublisher => "inpublisher",
            Keyword::Subject => "subject",
            Keyword::Isbn => "isbn",
            Keyword::Lccn => "lccn",
            Keyword::Oclc => "oclc",
        }
    }
}

impl TryFrom<&str> for Keyword {
    type Error = QueryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "intitle" => Ok(Keyword::InTitle),
            "inauthor" => Ok(Keyword::InAuthor),
            "inpublisher" => Ok(Keyword::InPublisher),
            "subject" => Ok(Keyword::Subject),
            "isbn" => Ok(Keyword::Isbn),
            "lccn" => Ok(Keyword::Lccn),
            "oclc" => Ok(Keyword::Oclc),
            _ => Err(QueryError::UnknownKeyword(value.to_owned())),
        }
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// 자유 검색어와 키워드 한정 조건을 조합한 전문 검색 쿼리
///
/// ```
/// use book_volume_rust::provider::query::{Keyword, SearchQuery};
///
/// let query = SearchQuery::new("flowers")
///     .with(Keyword::InAuthor, "keyes");
/// assert_eq!(query.to_string(), "flowers inauthor:keyes");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    terms: String,
    scoped: Vec<(Keyword, String)>,
}

impl SearchQuery {
    pub fn new<S: Into<String>>(terms: S) -> Self {
        Self { terms: terms.into(), scoped: Vec::new() }
    }

    pub fn with<S: Into<String>>(mut self, keyword: Keyword, value: S) -> Self {
        self.scoped.push((keyword, value.into()));
        self
    }

    pub fn terms(&self) -> &str {
        &self.terms
    }

    pub fn scoped(&self) -> &[(Keyword, String)] {
        &self.scoped
    }

    pub fn is_empty(&self) -> bool {
        self.terms.trim().is_empty() && self.scoped.is_empty()
    }
}

impl Display for SearchQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let terms = self.terms.trim();
        let mut first = terms.is_empty();
        if !first {
            write!(f, "{}", terms)?;
        }

        for (keyword, value) in &self.scoped {
            if first {
                first = false;
            } else {
                write!(f, " ")?;
            }
            write!(f, "{}:{}", keyword, value)?;
        }

        Ok(())
    }
}

impl From<SearchQuery> for String {
    fn from(query: SearchQuery) -> Self {
        query.to_string()
    }
}
