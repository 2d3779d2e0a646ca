//! Server registry handlers.

use actix_web::{HttpResponse, web};

use postdrop_shared::dto::ServersResponse;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/servers
pub async fn list_servers(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let servers = state.storage.get_servers_list().await?;
    Ok(HttpResponse::Ok().json(ServersResponse { servers }))
}
