use models::User;
use tokio::sync::RwLock;
use tracing::debug;

/// Append-only user list owned by the users worker.
#[derive(Default)]
pub struct UsersService {
    users: RwLock<Vec<User>>,
}

impl UsersService {
    pub fn new() -> Self { Self::default() }

    pub async fn create(&self, user: User) {
        let mut users = self.users.write().await;
        users.push(user);
        debug!(count = users.len(), "user appended");
    }

    /// Snapshot of all users in insertion order.
    pub async fn find_all(&self) -> Vec<User> {
        self.users.read().await.clone()
    }
}
