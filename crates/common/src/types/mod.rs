use serde::Serialize;

/// Body of the `/health` endpoint exposed by every HTTP service.
#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}
