use std::sync::{Arc, RwLock};

use railway_shared::Masked;

/// Holds at most one access token, shared by every clone of the client.
#[derive(Clone, Default)]
pub struct TokenStore {
    token: Arc<RwLock<Option<Masked<String>>>>,
}

impl TokenStore {
    pub fn get(&self) -> Option<Masked<String>> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn set(&self, token: Masked<String>) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token);
    }

    pub fn clear(&self) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_token_replaced_and_cleared() {
        let store = TokenStore::default();
        let shared = store.clone();

        store.set(Masked::from("first"));
        store.set(Masked::from("second"));
        assert_eq!(shared.get().unwrap().expose(), "second");

        shared.clear();
        assert!(store.get().is_none());
    }
}
