use std::sync::Arc;

use tracing::debug;

use crate::session::{SessionId, SessionResult, SessionStore};
use super::model::Movie;

/// Session attribute the cart is stored under.
pub const CART_ATTRIBUTE: &str = "cart";

/// Cart operations on top of session storage. Each call is one
/// read-modify-write of the session's `cart` attribute.
#[derive(Clone)]
pub struct CartService {
    sessions: Arc<dyn SessionStore>,
}

impl CartService {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }

    /// Appends `movie` unless an identical entry is already present.
    /// Returns the movie as submitted either way.
    pub async fn add_to_cart(&self, session: &SessionId, movie: Movie) -> SessionResult<Movie> {
        let mut cart = self.get_cart(session).await?;
        if !cart.contains(&movie) {
            cart.push(movie.clone());
            self.store_cart(session, &cart).await?;
            debug!(session = %session, movie_id = movie.id, size = cart.len(), "Added movie to cart");
        } else {
            debug!(session = %session, movie_id = movie.id, "Movie already in cart");
        }
        Ok(movie)
    }

    /// Removes every entry with this id, whatever its other fields are.
    pub async fn remove_from_cart(&self, session: &SessionId, movie_id: i32) -> SessionResult<()> {
        let mut cart = self.get_cart(session).await?;
        let before = cart.len();
        cart.retain(|movie| movie.id != movie_id);
        if cart.len() != before {
            self.store_cart(session, &cart).await?;
        }
        debug!(session = %session, movie_id, removed = before - cart.len(), "Removed movie from cart");
        Ok(())
    }

    pub async fn cart_contents(&self, session: &SessionId) -> SessionResult<Vec<Movie>> {
        self.get_cart(session).await
    }

    pub async fn empty_cart(&self, session: &SessionId) -> SessionResult<()> {
        self.store_cart(session, &[]).await?;
        debug!(session = %session, "Emptied cart");
        Ok(())
    }

    /// Loads the cart, creating an empty one in the session on first use.
    async fn get_cart(&self, session: &SessionId) -> SessionResult<Vec<Movie>> {
        match self.sessions.get_attribute(session, CART_ATTRIBUTE).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => {
                self.store_cart(session, &[]).await?;
                Ok(Vec::new())
            }
        }
    }

    async fn store_cart(&self, session: &SessionId, cart: &[Movie]) -> SessionResult<()> {
        let value = serde_json::to_value(cart)?;
        self.sessions.set_attribute(session, CART_ATTRIBUTE, value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemorySessionStore, SessionError};
    use std::time::Duration;

    async fn setup() -> (CartService, Arc<MemorySessionStore>, SessionId) {
        let store = Arc::new(MemorySessionStore::new(Duration::from_secs(1800)));
        let session = store.create().await;
        (CartService::new(store.clone()), store, session)
    }

    #[tokio::test]
    async fn test_new_session_has_empty_cart() {
        let (cart, store, session) = setup().await;

        assert!(cart.cart_contents(&session).await.unwrap().is_empty());
        // First access leaves an empty cart behind in the session.
        assert_eq!(
            store.get_attribute(&session, CART_ATTRIBUTE).await.unwrap(),
            Some(serde_json::json!([]))
        );
    }

    #[tokio::test]
    async fn test_add_identical_movie_twice() {
        let (cart, _, session) = setup().await;
        let movie = Movie::new(1, "A", 1);

        let returned = cart.add_to_cart(&session, movie.clone()).await.unwrap();
        assert_eq!(returned, movie);
        let returned = cart.add_to_cart(&session, movie.clone()).await.unwrap();
        assert_eq!(returned, movie);

        assert_eq!(cart.cart_contents(&session).await.unwrap(), vec![movie]);
    }

    #[tokio::test]
    async fn test_same_id_different_fields_are_separate_entries() {
        let (cart, _, session) = setup().await;

        cart.add_to_cart(&session, Movie::new(1, "A", 1)).await.unwrap();
        cart.add_to_cart(&session, Movie::new(1, "A", 2)).await.unwrap();

        assert_eq!(cart.cart_contents(&session).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_null_and_empty_text_are_different_entries() {
        let (cart, _, session) = setup().await;
        let no_poster = Movie::new(1, "A", 1);
        let empty_poster = Movie {
            poster_path: Some(String::new()),
            ..Movie::new(1, "A", 1)
        };

        let echoed = cart.add_to_cart(&session, no_poster.clone()).await.unwrap();
        assert_eq!(echoed.poster_path, None);
        cart.add_to_cart(&session, empty_poster.clone()).await.unwrap();

        assert_eq!(cart.cart_contents(&session).await.unwrap(), vec![no_poster, empty_poster]);
    }

    #[tokio::test]
    async fn test_insertion_order_is_kept() {
        let (cart, _, session) = setup().await;

        for (id, title) in [(3, "C"), (1, "A"), (2, "B")] {
            cart.add_to_cart(&session, Movie::new(id, title, 1)).await.unwrap();
        }

        let ids: Vec<i32> = cart.cart_contents(&session).await.unwrap().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_remove_by_id() {
        let (cart, _, session) = setup().await;
        cart.add_to_cart(&session, Movie::new(1, "A", 1)).await.unwrap();
        cart.add_to_cart(&session, Movie::new(2, "B", 1)).await.unwrap();

        cart.remove_from_cart(&session, 1).await.unwrap();
        assert_eq!(cart.cart_contents(&session).await.unwrap(), vec![Movie::new(2, "B", 1)]);

        // Unknown id is a no-op.
        cart.remove_from_cart(&session, 99).await.unwrap();
        assert_eq!(cart.cart_contents(&session).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_cart_is_idempotent() {
        let (cart, _, session) = setup().await;

        cart.empty_cart(&session).await.unwrap();
        assert!(cart.cart_contents(&session).await.unwrap().is_empty());

        cart.add_to_cart(&session, Movie::new(1, "A", 1)).await.unwrap();
        cart.empty_cart(&session).await.unwrap();
        cart.empty_cart(&session).await.unwrap();
        assert!(cart.cart_contents(&session).await.unwrap().is_empty());
    }

    // Adding dedups on the whole record while removal matches on id only.
    #[tokio::test]
    async fn test_add_and_remove_match_differently() {
        let (cart, _, session) = setup().await;
        let a = Movie::new(1, "A", 1);
        let b = Movie::new(1, "B", 1);

        cart.add_to_cart(&session, a.clone()).await.unwrap();
        assert_eq!(cart.cart_contents(&session).await.unwrap(), vec![a.clone()]);

        cart.add_to_cart(&session, a.clone()).await.unwrap();
        assert_eq!(cart.cart_contents(&session).await.unwrap(), vec![a.clone()]);

        cart.add_to_cart(&session, b.clone()).await.unwrap();
        assert_eq!(cart.cart_contents(&session).await.unwrap(), vec![a, b]);

        cart.remove_from_cart(&session, 1).await.unwrap();
        assert!(cart.cart_contents(&session).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_carts_are_isolated_per_session() {
        let (cart, store, first) = setup().await;
        let second = store.create().await;

        cart.add_to_cart(&first, Movie::new(1, "A", 1)).await.unwrap();

        assert_eq!(cart.cart_contents(&first).await.unwrap().len(), 1);
        assert!(cart.cart_contents(&second).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_session_is_an_error() {
        let (cart, _, _) = setup().await;
        let missing = SessionId::from("gone");

        assert!(matches!(
            cart.cart_contents(&missing).await,
            Err(SessionError::NotFound(_))
        ));
    }
}
