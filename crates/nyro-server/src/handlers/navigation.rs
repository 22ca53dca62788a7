//! Navigation API endpoint.
//!
//! Returns the documentation sidebar as JSON.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use nyro_site::Navigation;
use serde::Serialize;

use crate::state::AppState;

/// Response for GET /api/navigation.
#[derive(Serialize)]
pub(crate) struct NavigationResponse {
    /// Sidebar sections in display order.
    sections: Navigation,
}

/// Handle GET /api/navigation.
pub(crate) async fn get_navigation(State(state): State<Arc<AppState>>) -> Json<NavigationResponse> {
    Json(NavigationResponse {
        sections: state.site.navigation().clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_response_serialization() {
        let response = NavigationResponse {
            sections: Navigation::builtin(),
        };

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["sections"][0]["title"], "Introduction");
        assert_eq!(json["sections"][0]["items"][0]["path"], "/docs/overview");
        assert_eq!(json["sections"][0]["items"][0]["icon"], "book-open");
    }
}
