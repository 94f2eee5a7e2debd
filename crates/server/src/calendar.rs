//! Availability calendar API endpoints

use api_types::calendar::{CalendarQuery, UnavailableDatesResponse};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

pub async fn unavailable_dates(
    _: Extension<user::Model>,
    State(state): State<ServerState>,
    Path(item_id): Path<Uuid>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<UnavailableDatesResponse>, ServerError> {
    let today = Utc::now().date_naive();
    let dates = state
        .engine
        .unavailable_dates(item_id, query.from, query.to, today)
        .await?;

    Ok(Json(UnavailableDatesResponse { dates }))
}
