use axum::{http::StatusCode, routing::any, Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

/// Routes the bundled UI calls but the backend never implemented. They are
/// answered explicitly instead of falling through to the 404 handler.
const STUB_ROUTES: &[&str] = &[
    "/pdf/compress",
    "/pdf/merge",
    "/pdf/split",
    "/pdf/rotate",
    "/pdf/sign",
    "/pdf/annotate",
    "/pdf/edit",
    "/pdf/view",
    "/pdf/delete-pages",
    "/pdf/request-signatures",
    "/convert/images-to-pdf",
    "/convert/pdf-to-images",
    "/convert/pdf-to-word",
    "/convert/word-to-pdf",
];

pub fn router() -> Router<AppState> {
    let mut router = Router::new();
    for path in STUB_ROUTES {
        router = router.route(path, any(not_implemented));
    }
    router
}

async fn not_implemented() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_IMPLEMENTED,
        Json(json!({ "ok": false, "message": "not implemented" })),
    )
}
