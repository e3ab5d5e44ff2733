use axum::extract::{Path, State};
use axum::response::Response;
use models::{Cat, CreateCatDto, UpdateCatDto};
use service::ServiceError;

use crate::envelope::respond;
use crate::pipes::ValidatedJson;
use crate::routes::guard::ServerState;

/// Path ids arrive as text and are compared numerically, so `1`, `1.0` and
/// `1e0` all name cat 1. Anything that is not an integral number in `i32`
/// range matches no cat.
fn parse_id(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<i32>() {
        return Some(id);
    }
    let n: f64 = raw.parse().ok()?;
    (n.is_finite() && n.fract() == 0.0 && n >= i32::MIN as f64 && n <= i32::MAX as f64)
        .then_some(n as i32)
}

async fn find_existing(state: &ServerState, raw_id: &str) -> Result<(i32, Cat), ServiceError> {
    let id = parse_id(raw_id).ok_or_else(|| ServiceError::not_found("Cat"))?;
    let cat = state
        .cats
        .find_one(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Cat"))?;
    Ok((id, cat))
}

/// `POST /cats`
pub async fn create(
    State(state): State<ServerState>,
    ValidatedJson(dto): ValidatedJson<CreateCatDto>,
) -> Response {
    let result = state.cats.create(Cat::from(dto.clone())).await.map(|_| dto);
    respond("Cat created successfully", "Failed to create cat", result)
}

/// `GET /cats`
pub async fn find_all(State(state): State<ServerState>) -> Response {
    let result = state.cats.find_all().await;
    respond("Cats retrieved successfully", "Failed to retrieve cats", result)
}

/// `GET /cats/:id`
pub async fn find_one(State(state): State<ServerState>, Path(id): Path<String>) -> Response {
    let result = find_existing(&state, &id).await.map(|(_, cat)| cat);
    respond("Cat retrieved successfully", "Failed to retrieve cat", result)
}

/// `PUT /cats/:id`: answers with the record as stored after the merge.
///
/// Only `name`, `age` and `breed` are merged. Unknown body keys and a body
/// `id` are dropped by the typed patch, so the stored id never changes.
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<UpdateCatDto>,
) -> Response {
    let result = async {
        let (id, _) = find_existing(&state, &id).await?;
        state.cats.update(id, &patch).await?;
        state.cats.find_one(id).await
    }
    .await;
    respond("Cat updated successfully", "Failed to update cat", result)
}

/// `DELETE /cats/:id`: answers with the record as it was before removal.
pub async fn remove(State(state): State<ServerState>, Path(id): Path<String>) -> Response {
    let result = async {
        let (id, cat) = find_existing(&state, &id).await?;
        state.cats.remove(id).await?;
        Ok::<_, ServiceError>(cat)
    }
    .await;
    respond("Cat removed successfully", "Failed to remove cat", result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_rejects_non_integral_values() {
        assert_eq!(parse_id("1"), Some(1));
        assert_eq!(parse_id(" 42 "), Some(42));
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id("1.5"), None);
        assert_eq!(parse_id("inf"), None);
        assert_eq!(parse_id("3000000000"), None);
    }

    #[test]
    fn parse_id_compares_numerically() {
        assert_eq!(parse_id("1.0"), Some(1));
        assert_eq!(parse_id("1e0"), Some(1));
        assert_eq!(parse_id("+7"), Some(7));
    }
}
