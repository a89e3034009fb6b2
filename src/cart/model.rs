use serde::{Deserialize, Serialize};

/// A movie as submitted by the frontend, plus the quantity the user wants.
///
/// Text fields keep the difference between `null`, missing and `""` so the
/// record goes back out exactly as it came in. Two movies are the same cart
/// entry only if every field matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Movie {
    pub id: i32,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub quantity: i32,
}

impl Movie {
    #[cfg(test)]
    pub(crate) fn new(id: i32, title: &str, quantity: i32) -> Self {
        Self {
            id,
            title: Some(title.to_string()),
            quantity,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddToCartRequest {
    pub movie: Movie,
}
