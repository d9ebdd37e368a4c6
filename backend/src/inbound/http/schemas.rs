//! Response bodies shared by several handlers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Acknowledgement returned by deletions and registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SuccessResponse {
    /// Always `true`.
    #[schema(example = true)]
    pub success: bool,
}

impl SuccessResponse {
    /// The only value handlers return.
    pub const OK: Self = Self { success: true };
}
