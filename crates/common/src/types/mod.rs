use serde::Serialize;

/// Body of the `/health` endpoint.
#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
    /// Name of the record store backing the service (`file` or `table`).
    pub backend: String,
}
