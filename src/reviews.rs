// Review store: the `Review` row, the client-side checks applied before a
// write, and a blocking client for the Supabase `reviews` table through its
// PostgREST interface.

use crate::error::ServiceError;
use rand::Rng;
use reqwest::blocking::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const REVIEWS_TABLE: &str = "reviews";

/// A user review. Row id and timestamps belong to the store and are
/// dropped when rows are read back.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub title: String,
    pub review: String,
    pub rating: i32,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReviewInputError {
    #[error("title and review are required")]
    MissingField,
    #[error("rating {0} is outside 1..=5")]
    RatingOutOfRange(i32),
}

impl Review {
    /// Apply the presence and range checks done before any write.
    pub fn new(title: &str, review: &str, rating: i32) -> Result<Self, ReviewInputError> {
        let (title, review) = (title.trim(), review.trim());
        if title.is_empty() || review.is_empty() {
            return Err(ReviewInputError::MissingField);
        }
        if !(1..=5).contains(&rating) {
            return Err(ReviewInputError::RatingOutOfRange(rating));
        }
        Ok(Review {
            title: title.to_string(),
            review: review.to_string(),
            rating,
        })
    }

    pub fn stars(&self) -> String {
        stars(self.rating)
    }
}

/// One star per rating point.
pub fn stars(rating: i32) -> String {
    "⭐".repeat(usize::try_from(rating).unwrap_or(0))
}

/// Uniform pick over the fetched rows. No random number is drawn when
/// there is nothing to pick from.
pub fn pick_random<'a, R: Rng + ?Sized>(reviews: &'a [Review], rng: &mut R) -> Option<&'a Review> {
    if reviews.is_empty() {
        return None;
    }
    reviews.get(rng.random_range(0..reviews.len()))
}

/// Row-store collaborator for the reviews collection.
pub trait ReviewStore {
    fn insert(&self, review: &Review) -> Result<(), ServiceError>;
    fn list_all(&self) -> Result<Vec<Review>, ServiceError>;
}

impl<T: ReviewStore + ?Sized> ReviewStore for &T {
    fn insert(&self, review: &Review) -> Result<(), ServiceError> {
        (**self).insert(review)
    }

    fn list_all(&self) -> Result<Vec<Review>, ServiceError> {
        (**self).list_all()
    }
}

/// Blocking PostgREST client for a Supabase project.
#[derive(Clone)]
pub struct SupabaseStore {
    client: Client,
    base_url: String,
    key: String,
}

impl SupabaseStore {
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Result<Self, ServiceError> {
        let client = Client::builder().build()?;
        Ok(SupabaseStore {
            client,
            base_url: url.into().trim_end_matches('/').to_string(),
            key: key.into(),
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, REVIEWS_TABLE)
    }

    /// Attach the project key both as `apikey` and as a bearer token,
    /// which is what the Supabase gateway expects for anon/service keys.
    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.key).bearer_auth(&self.key)
    }
}

fn postgrest_message(v: &serde_json::Value) -> Option<&str> {
    v["message"].as_str()
}

fn check(res: reqwest::blocking::Response) -> Result<reqwest::blocking::Response, ServiceError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let txt = res.text().unwrap_or_default();
    Err(ServiceError::from_body(status.as_u16(), &txt, postgrest_message))
}

impl ReviewStore for SupabaseStore {
    fn insert(&self, review: &Review) -> Result<(), ServiceError> {
        debug!(title = %review.title, rating = review.rating, "inserting review");
        let res = self
            .authed(self.client.post(self.table_url()))
            .header("Prefer", "return=minimal")
            .json(review)
            .send()?;
        check(res)?;
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<Review>, ServiceError> {
        debug!("fetching all reviews");
        let res = self
            .authed(self.client.get(self.table_url()))
            .query(&[("select", "*")])
            .send()?;
        let txt = check(res)?.text()?;
        serde_json::from_str(&txt).map_err(|e| ServiceError::Decode(e.to_string()))
    }
}
