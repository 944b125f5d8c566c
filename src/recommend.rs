// Recommendation service: turns a genre keyword or a school subject into a
// prompt, hands it to a text model and returns the answer. `recommend_text`
// is the fail-soft entry point used by the screen: it always yields
// something printable.

use crate::error::ServiceError;
use tracing::{debug, warn};

/// Fixed genre set offered in the menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Business,
    Fiction,
    NonFiction,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Business, Category::Fiction, Category::NonFiction];

    pub fn label(self) -> &'static str {
        match self {
            Category::Business => "경제경영",
            Category::Fiction => "소설",
            Category::NonFiction => "비문학",
        }
    }
}

/// One model query. Lives only as long as the call that uses it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecommendationRequest {
    Genre { category: Category, keyword: String },
    Workbook { subject: String },
}

impl RecommendationRequest {
    pub fn prompt(&self) -> String {
        match self {
            RecommendationRequest::Genre { category, keyword } => format!(
                "[{genre}] 장르에서 '{keyword}' 키워드를 주제로 한 책 10권을 추천해줘. \
                 유명한 책보다는 다양한 책을 포함해줘. \
                 간결하게 알려줘야하니 쪼금씩만 설명하고 문장 하나가 길어지면 중간에 띄어쓰기를 넣어.\n\
                 각 책은 다음 형식으로 출력해줘:\n\
                 제목 (저자)\n\
                 요약 설명 간단히\n",
                genre = category.label(),
                keyword = keyword.trim(),
            ),
            RecommendationRequest::Workbook { subject } => format!(
                "'{subject}' 과목에 대한 추천 문제집 5권을 알려줘. \
                 간결하게 알려줘야하니 쪼금씩만 설명하고 문장 하나가 길어지면 중간에 띄어쓰기를 넣어.\n\
                 각 책은 다음 형식으로 출력해줘:\n\
                 제목 (출판사)\n\
                 설명 한 줄\n",
                subject = subject.trim(),
            ),
        }
    }
}

/// Text-generation collaborator: one prompt in, one completion out.
pub trait TextModel {
    fn generate(&self, prompt: &str) -> Result<String, ServiceError>;
}

impl<T: TextModel + ?Sized> TextModel for &T {
    fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        (**self).generate(prompt)
    }
}

pub struct Recommender<M> {
    model: M,
}

impl<M: TextModel> Recommender<M> {
    pub fn new(model: M) -> Self {
        Recommender { model }
    }

    /// Issue exactly one model call for the request.
    pub fn recommend(&self, req: &RecommendationRequest) -> Result<String, ServiceError> {
        debug!(?req, "requesting recommendation");
        self.model.generate(&req.prompt())
    }

    /// Same as `recommend`, but a failure becomes the displayable
    /// `에러 발생: ...` text instead of an error.
    pub fn recommend_text(&self, req: &RecommendationRequest) -> String {
        match self.recommend(req) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "recommendation failed");
                failure_text(&e)
            }
        }
    }
}

pub fn failure_text(err: &ServiceError) -> String {
    format!("에러 발생: {}", err)
}
