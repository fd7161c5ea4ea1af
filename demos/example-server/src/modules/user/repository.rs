use crate::modules::user::domain::User;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct UserRepository {
    users: RwLock<BTreeMap<u64, User>>,
    next_id: AtomicU64,
}

impl UserRepository {
    pub async fn find_by_id(&self, id: u64) -> Option<User> {
        self.users.read().await.get(&id).cloned()
    }

    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        self.users
            .read()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned()
    }

    pub async fn insert(&self, name: String, email: String) -> User {
        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            name,
            email,
        };
        self.users.write().await.insert(user.id, user.clone());
        user
    }
}
