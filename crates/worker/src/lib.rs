//! Users microservice: answers `create_user` and `get_users` over the
//! message transport.

use std::sync::Arc;

use anyhow::Context;
use configs::AppConfig;
use models::User;
use serde_json::{json, Value};
use service::UsersService;
use tracing::info;
use transport::{MessageRouter, MessageServer};

pub fn create_user_pattern() -> Value {
    json!({"cmd": "create_user"})
}

pub fn get_users_pattern() -> Value {
    json!({"cmd": "get_users"})
}

pub fn build_router(users: Arc<UsersService>) -> MessageRouter {
    let for_create = Arc::clone(&users);
    MessageRouter::new()
        .route(&create_user_pattern(), move |data| {
            let users = Arc::clone(&for_create);
            async move {
                let user: User = serde_json::from_value(data).context("malformed user payload")?;
                info!(email = %user.email, "create_user");
                users.create(user).await;
                Ok::<_, anyhow::Error>(json!({"status": "User created successfully"}))
            }
        })
        .route(&get_users_pattern(), move |_| {
            let users = Arc::clone(&users);
            async move {
                let all = users.find_all().await;
                Ok::<_, anyhow::Error>(serde_json::to_value(all)?)
            }
        })
}

/// Public entry: serve the users worker on `worker.host:worker.port`.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let users = Arc::new(UsersService::new());
    let server = MessageServer::bind(cfg.worker.addr(), build_router(users)).await?;
    server.run_until(std::future::pending()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use transport::normalize_pattern;

    #[tokio::test]
    async fn create_then_list_users() -> anyhow::Result<()> {
        let router = build_router(Arc::new(UsersService::new()));
        let create = normalize_pattern(&create_user_pattern());
        let list = normalize_pattern(&get_users_pattern());

        let reply = router
            .dispatch(&create, json!({"name": "Test User", "email": "test@example.com"}))
            .await
            .map_err(anyhow::Error::msg)?;
        assert_eq!(reply, json!({"status": "User created successfully"}));

        let users = router.dispatch(&list, json!({})).await.map_err(anyhow::Error::msg)?;
        assert_eq!(users, json!([{"name": "Test User", "email": "test@example.com"}]));
        Ok(())
    }

    #[tokio::test]
    async fn malformed_user_is_a_handler_error() {
        let router = build_router(Arc::new(UsersService::new()));
        let create = normalize_pattern(&create_user_pattern());

        let err = router.dispatch(&create, json!({"name": 5})).await;
        assert_eq!(err, Err("malformed user payload".to_string()));

        let users = router.dispatch(&normalize_pattern(&get_users_pattern()), json!({})).await;
        assert_eq!(users, Ok(json!([])));
    }
}
