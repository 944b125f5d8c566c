// Menu controller: every user interaction is an explicit `Action`, the
// controller answers with an `Outcome`, and `render` turns that outcome
// into the text shown on screen. Nothing is kept between actions except
// the clients and the random source.

use crate::recommend::{Category, RecommendationRequest, Recommender, TextModel};
use crate::reviews::{pick_random, Review, ReviewInputError, ReviewStore};
use rand::Rng;
use tracing::warn;

pub const SAVED_MESSAGE: &str = "리뷰가 성공적으로 저장되었습니다.";
pub const MISSING_FIELD_WARNING: &str = "책 제목과 감상평을 입력해주세요.";
pub const NO_REVIEWS_INFO: &str = "아직 등록된 리뷰가 없습니다.";

/// Top-level menu, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuItem {
    Genre(Category),
    Workbook,
    WriteReview,
    ViewReview,
}

impl MenuItem {
    pub const ALL: [MenuItem; 6] = [
        MenuItem::Genre(Category::Business),
        MenuItem::Genre(Category::Fiction),
        MenuItem::Genre(Category::NonFiction),
        MenuItem::Workbook,
        MenuItem::WriteReview,
        MenuItem::ViewReview,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Genre(c) => c.label(),
            MenuItem::Workbook => "문제집 추천",
            MenuItem::WriteReview => "리뷰쓰기",
            MenuItem::ViewReview => "리뷰 보기",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Recommend { category: Category, keyword: String },
    Workbook { subject: String },
    SubmitReview { title: String, review: String, rating: i32 },
    ShowReview,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Empty input: nothing was called, nothing to show.
    Nothing,
    Recommendation { heading: &'static str, text: String },
    Saved,
    Warning(String),
    Error(String),
    Info(String),
    Review(Review),
}

pub struct Controller<M, S, R> {
    recommender: Recommender<M>,
    store: S,
    rng: R,
}

impl<M, S, R> Controller<M, S, R>
where
    M: TextModel,
    S: ReviewStore,
    R: Rng,
{
    pub fn new(model: M, store: S, rng: R) -> Self {
        Controller {
            recommender: Recommender::new(model),
            store,
            rng,
        }
    }

    pub fn handle(&mut self, action: Action) -> Outcome {
        match action {
            Action::Recommend { category, keyword } => {
                if keyword.trim().is_empty() {
                    return Outcome::Nothing;
                }
                let req = RecommendationRequest::Genre { category, keyword };
                Outcome::Recommendation {
                    heading: "추천 결과",
                    text: self.recommender.recommend_text(&req),
                }
            }
            Action::Workbook { subject } => {
                if subject.trim().is_empty() {
                    return Outcome::Nothing;
                }
                let req = RecommendationRequest::Workbook { subject };
                Outcome::Recommendation {
                    heading: "추천 문제집",
                    text: self.recommender.recommend_text(&req),
                }
            }
            Action::SubmitReview { title, review, rating } => self.submit(&title, &review, rating),
            Action::ShowReview => self.show_random(),
        }
    }

    fn submit(&mut self, title: &str, review: &str, rating: i32) -> Outcome {
        let review = match Review::new(title, review, rating) {
            Ok(r) => r,
            Err(ReviewInputError::MissingField) => {
                return Outcome::Warning(MISSING_FIELD_WARNING.into())
            }
            Err(ReviewInputError::RatingOutOfRange(n)) => {
                return Outcome::Warning(format!("별점은 1~5 사이여야 합니다 ({})", n))
            }
        };
        match self.store.insert(&review) {
            Ok(()) => Outcome::Saved,
            Err(e) => {
                warn!(error = %e, "review insert failed");
                Outcome::Error(format!("저장 실패: {}", e))
            }
        }
    }

    fn show_random(&mut self) -> Outcome {
        let reviews = match self.store.list_all() {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "review fetch failed");
                return Outcome::Error(format!("리뷰를 불러오지 못했습니다: {}", e));
            }
        };
        match pick_random(&reviews, &mut self.rng) {
            Some(r) => Outcome::Review(r.clone()),
            None => Outcome::Info(NO_REVIEWS_INFO.into()),
        }
    }
}

/// Screen text for an outcome.
pub fn render(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Nothing => String::new(),
        Outcome::Recommendation { heading, text } => format!("## {}\n\n{}", heading, text),
        Outcome::Saved => SAVED_MESSAGE.to_string(),
        Outcome::Warning(msg) | Outcome::Error(msg) | Outcome::Info(msg) => msg.clone(),
        Outcome::Review(r) => format!(
            "### {}\n**별점:** {}\n**감상평:**\n{}",
            r.title,
            r.stars(),
            r.review
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct FakeModel {
        calls: Cell<usize>,
        fail: bool,
    }

    impl TextModel for FakeModel {
        fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                Err(ServiceError::Decode("bad json".into()))
            } else {
                Ok(format!("answer to: {}", prompt.lines().next().unwrap_or("")))
            }
        }
    }

    #[derive(Default)]
    struct FakeStore {
        rows: RefCell<Vec<Review>>,
        inserts: Cell<usize>,
        lists: Cell<usize>,
        fail: bool,
    }

    impl ReviewStore for FakeStore {
        fn insert(&self, review: &Review) -> Result<(), ServiceError> {
            self.inserts.set(self.inserts.get() + 1);
            if self.fail {
                return Err(ServiceError::Api {
                    status: 401,
                    message: "Invalid API key".into(),
                });
            }
            self.rows.borrow_mut().push(review.clone());
            Ok(())
        }

        fn list_all(&self) -> Result<Vec<Review>, ServiceError> {
            self.lists.set(self.lists.get() + 1);
            if self.fail {
                return Err(ServiceError::Decode("connection reset".into()));
            }
            Ok(self.rows.borrow().clone())
        }
    }

    fn controller<'a>(
        model: &'a FakeModel,
        store: &'a FakeStore,
    ) -> Controller<&'a FakeModel, &'a FakeStore, StdRng> {
        Controller::new(model, store, StdRng::seed_from_u64(1))
    }

    #[test]
    fn genre_recommendation_calls_model_once() {
        let (model, store) = (FakeModel::default(), FakeStore::default());
        let out = controller(&model, &store).handle(Action::Recommend {
            category: Category::NonFiction,
            keyword: "철학".into(),
        });
        assert_eq!(model.calls.get(), 1);
        match out {
            Outcome::Recommendation { heading, text } => {
                assert_eq!(heading, "추천 결과");
                assert!(text.contains("[비문학]"));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn model_failure_still_renders_text() {
        let model = FakeModel { fail: true, ..Default::default() };
        let store = FakeStore::default();
        let out = controller(&model, &store).handle(Action::Workbook { subject: "과학".into() });
        assert_eq!(
            out,
            Outcome::Recommendation {
                heading: "추천 문제집",
                text: "에러 발생: unexpected response: bad json".into(),
            }
        );
        assert_eq!(model.calls.get(), 1);
    }

    #[test]
    fn empty_keyword_or_subject_makes_no_call() {
        let (model, store) = (FakeModel::default(), FakeStore::default());
        let mut c = controller(&model, &store);
        let a = c.handle(Action::Recommend {
            category: Category::Business,
            keyword: "  ".into(),
        });
        let b = c.handle(Action::Workbook { subject: String::new() });
        assert_eq!((a, b), (Outcome::Nothing, Outcome::Nothing));
        assert_eq!(model.calls.get(), 0);
        assert_eq!(render(&Outcome::Nothing), "");
    }

    #[test]
    fn missing_title_or_review_writes_nothing() {
        let (model, store) = (FakeModel::default(), FakeStore::default());
        let mut c = controller(&model, &store);
        for (title, review) in [("", "재밌다"), ("데미안", "")] {
            let out = c.handle(Action::SubmitReview {
                title: title.into(),
                review: review.into(),
                rating: 4,
            });
            assert_eq!(out, Outcome::Warning(MISSING_FIELD_WARNING.into()));
        }
        assert_eq!(store.inserts.get(), 0);
    }

    #[test]
    fn valid_review_is_inserted_once() {
        let (model, store) = (FakeModel::default(), FakeStore::default());
        let out = controller(&model, &store).handle(Action::SubmitReview {
            title: "데미안".into(),
            review: "다시 읽고 싶다".into(),
            rating: 5,
        });
        assert_eq!(out, Outcome::Saved);
        assert_eq!(store.inserts.get(), 1);
        assert_eq!(
            store.rows.borrow()[0],
            Review {
                title: "데미안".into(),
                review: "다시 읽고 싶다".into(),
                rating: 5,
            }
        );
        assert_eq!(render(&out), SAVED_MESSAGE);
    }

    #[test]
    fn store_write_failure_shows_error_text() {
        let model = FakeModel::default();
        let store = FakeStore { fail: true, ..Default::default() };
        let out = controller(&model, &store).handle(Action::SubmitReview {
            title: "t".into(),
            review: "r".into(),
            rating: 2,
        });
        assert_eq!(out, Outcome::Error("저장 실패: 401: Invalid API key".into()));
        assert_eq!(store.inserts.get(), 1);
    }

    #[test]
    fn empty_collection_shows_info() {
        let (model, store) = (FakeModel::default(), FakeStore::default());
        let out = controller(&model, &store).handle(Action::ShowReview);
        assert_eq!(out, Outcome::Info(NO_REVIEWS_INFO.into()));
    }

    #[test]
    fn empty_collection_draws_no_random_number() {
        let (model, store) = (FakeModel::default(), FakeStore::default());
        let mut used = StdRng::seed_from_u64(5);
        let mut untouched = StdRng::seed_from_u64(5);
        let out = Controller::new(&model, &store, &mut used).handle(Action::ShowReview);
        assert_eq!(out, Outcome::Info(NO_REVIEWS_INFO.into()));
        assert_eq!(store.lists.get(), 1);
        assert_eq!(used.random::<u64>(), untouched.random::<u64>());
    }

    #[test]
    fn out_of_range_rating_warns_in_korean_without_writing() {
        let (model, store) = (FakeModel::default(), FakeStore::default());
        let out = controller(&model, &store).handle(Action::SubmitReview {
            title: "데미안".into(),
            review: "좋다".into(),
            rating: 9,
        });
        assert_eq!(out, Outcome::Warning("별점은 1~5 사이여야 합니다 (9)".into()));
        assert_eq!(store.inserts.get(), 0);
    }

    #[test]
    fn recommendation_renders_heading_and_text() {
        let out = Outcome::Recommendation {
            heading: "추천 결과",
            text: "1. 책 (저자)".into(),
        };
        assert_eq!(render(&out), "## 추천 결과\n\n1. 책 (저자)");
    }

    #[test]
    fn read_failure_shows_error_text() {
        let model = FakeModel::default();
        let store = FakeStore { fail: true, ..Default::default() };
        let out = controller(&model, &store).handle(Action::ShowReview);
        match out {
            Outcome::Error(msg) => {
                assert!(msg.starts_with("리뷰를 불러오지 못했습니다: "));
                assert!(msg.contains("connection reset"));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn show_another_refetches_each_time() {
        let (model, store) = (FakeModel::default(), FakeStore::default());
        store.rows.borrow_mut().extend([
            Review { title: "a".into(), review: "x".into(), rating: 1 },
            Review { title: "b".into(), review: "y".into(), rating: 5 },
        ]);
        let mut c = controller(&model, &store);
        for _ in 0..3 {
            match c.handle(Action::ShowReview) {
                Outcome::Review(r) => assert!(r.title == "a" || r.title == "b"),
                other => panic!("unexpected outcome {:?}", other),
            }
        }
        assert_eq!(store.lists.get(), 3);
    }

    #[test]
    fn review_renders_title_stars_and_text() {
        let out = Outcome::Review(Review {
            title: "코스모스".into(),
            review: "우주가 가깝게 느껴진다".into(),
            rating: 3,
        });
        assert_eq!(
            render(&out),
            "### 코스모스\n**별점:** ⭐⭐⭐\n**감상평:**\n우주가 가깝게 느껴진다"
        );
    }

    #[test]
    fn menu_has_six_options_in_order() {
        let labels: Vec<_> = MenuItem::ALL.iter().map(|m| m.label()).collect();
        assert_eq!(labels, ["경제경영", "소설", "비문학", "문제집 추천", "리뷰쓰기", "리뷰 보기"]);
    }
}
