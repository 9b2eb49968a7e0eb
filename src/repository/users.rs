//! Users repository

use super::{decode_snapshot, stamp_create, stamp_update, Doc};
use crate::{
    error::{AppError, AppResult},
    models::user::{UpdateUser, User},
    store::{collections, to_document, DocId, Filter, SharedStore},
};

#[derive(Clone)]
pub struct UsersRepository {
    store: SharedStore,
}

impl UsersRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Create a user document
    pub async fn create(&self, user: &User) -> AppResult<DocId> {
        let mut fields = to_document(user)?;
        stamp_create(&mut fields);
        let id = self.store.insert(collections::USERS, fields).await?;
        Ok(id)
    }

    /// Get a user by document id
    pub async fn get(&self, id: &DocId) -> AppResult<Doc<User>> {
        let doc = self
            .store
            .get(collections::USERS, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;
        super::decode(collections::USERS, doc)
            .ok_or_else(|| AppError::Internal(format!("User {} is malformed", id)))
    }

    /// Look a user up by Kennung, the reference every other collection uses
    pub async fn find_by_kennung(&self, kennung: &str) -> AppResult<Option<Doc<User>>> {
        let filter = Filter::new().field_eq("kennung", kennung);
        let snapshot = self.store.list(collections::USERS, filter).await?;
        let mut docs: Vec<Doc<User>> = decode_snapshot(collections::USERS, snapshot);
        Ok(if docs.is_empty() {
            None
        } else {
            Some(docs.swap_remove(0))
        })
    }

    /// List all users, sorted by name
    pub async fn list(&self) -> AppResult<Vec<Doc<User>>> {
        let snapshot = self.store.list(collections::USERS, Filter::all()).await?;
        let mut docs: Vec<Doc<User>> = decode_snapshot(collections::USERS, snapshot);
        docs.sort_by(|a, b| a.data.name.cmp(&b.data.name));
        Ok(docs)
    }

    /// Apply an update payload
    pub async fn update(&self, id: &DocId, data: &UpdateUser) -> AppResult<()> {
        let mut patch = to_document(data)?;
        stamp_update(&mut patch);
        self.store.update(collections::USERS, id, patch).await?;
        Ok(())
    }

    /// Delete a user
    pub async fn delete(&self, id: &DocId) -> AppResult<()> {
        self.store.delete(collections::USERS, id).await?;
        Ok(())
    }
}
