//--------------------------------------------------------------------------------------------------
// FUNCTIONS
//--------------------------------------------------------------------------------------------------
// | Name                     | Description                             | Return Type         |
// |--------------------------|-----------------------------------------|---------------------|
// | health                   | Liveness probe                          | Response            |
// | get_order_by_id          | Fetch one order                         | ApiResult<Response> |
// | get_all_orders           | Fetch every order                       | ApiResult<Response> |
// | create_order             | Persist a new order                     | ApiResult<Response> |
// | delete_order_by_id       | Remove an order                         | ApiResult<Response> |
// | update_order_pay_status  | Move the payment track                  | ApiResult<Response> |
// | update_order_ship_status | Move the shipment track                 | ApiResult<Response> |
// | update_order             | Full overwrite of mutable fields        | ApiResult<Response> |
//--------------------------------------------------------------------------------------------------

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::info;

use super::{
    AppState,
    ApiResult,
    dto::{
        OrderIdResponse, OrderInfo, PayStatusRequest, ShipStatusRequest, StatusResponse,
        decode_pay_status, decode_ship_status,
    },
};

/// Liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Fetches a single order by identifier.
pub async fn get_order_by_id(
    Extension(state): Extension<Arc<AppState>>,
    Path(order_id): Path<i64>,
) -> ApiResult<Response> {
    let order = state.order_service.find_order_by_id(order_id).await?;
    let response = OrderInfo::from(order);
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Fetches every stored order.
pub async fn get_all_orders(
    Extension(state): Extension<Arc<AppState>>,
) -> ApiResult<Response> {
    let orders = state.order_service.find_all_orders().await?;
    let response: Vec<OrderInfo> = orders.into_iter().map(OrderInfo::from).collect();
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Persists a new order and returns the storage-assigned identifier.
pub async fn create_order(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<OrderInfo>,
) -> ApiResult<Response> {
    let order = request.try_into_new_order()?;
    let order_id = state.order_service.add_order(order).await?;
    info!(order_id, "order created");
    let response = OrderIdResponse { order_id };
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// Hard-deletes an order.
pub async fn delete_order_by_id(
    Extension(state): Extension<Arc<AppState>>,
    Path(order_id): Path<i64>,
) -> ApiResult<Response> {
    state.order_service.delete_order(order_id).await?;
    info!(order_id, "order deleted");
    let response = StatusResponse {
        msg: "order deleted".to_string(),
    };
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Moves the payment track of an order.
pub async fn update_order_pay_status(
    Extension(state): Extension<Arc<AppState>>,
    Path(order_id): Path<i64>,
    Json(request): Json<PayStatusRequest>,
) -> ApiResult<Response> {
    let status = decode_pay_status(request.pay_status)?;
    state
        .order_service
        .update_pay_status(order_id, status)
        .await?;
    info!(order_id, pay_status = request.pay_status, "pay status updated");
    let response = StatusResponse {
        msg: "pay status updated".to_string(),
    };
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Moves the shipment track of an order.
pub async fn update_order_ship_status(
    Extension(state): Extension<Arc<AppState>>,
    Path(order_id): Path<i64>,
    Json(request): Json<ShipStatusRequest>,
) -> ApiResult<Response> {
    let status = decode_ship_status(request.ship_status)?;
    state
        .order_service
        .update_ship_status(order_id, status)
        .await?;
    info!(order_id, ship_status = request.ship_status, "ship status updated");
    let response = StatusResponse {
        msg: "ship status updated".to_string(),
    };
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Full overwrite of an order's mutable fields.
pub async fn update_order(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<OrderInfo>,
) -> ApiResult<Response> {
    let order = request.try_into_existing_order()?;
    let order_id = order.id;
    state.order_service.update_order(order).await?;
    info!(order_id, "order updated");
    let response = StatusResponse {
        msg: "order updated".to_string(),
    };
    Ok((StatusCode::OK, Json(response)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::domain::services::{MockOrderService, OrderServiceError};
    use crate::outbounds::repository::RepositoryError;

    #[tokio::test]
    async fn delete_propagates_not_found_unmodified() {
        let mut service = MockOrderService::new();
        service.expect_delete_order().returning(|order_id| {
            Err(OrderServiceError::Storage(RepositoryError::NotFound {
                id: order_id,
            }))
        });
        let state = Arc::new(AppState::new(Arc::new(service)));

        let err = delete_order_by_id(Extension(state), Path(77))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_does_not_touch_service_on_bad_status_code() {
        // No expectations set: any service call would panic the mock.
        let service = MockOrderService::new();
        let state = Arc::new(AppState::new(Arc::new(service)));

        let dto = OrderInfo {
            id: None,
            user_id: 1,
            product_id: 1,
            price: rust_decimal::Decimal::ONE,
            pay_status: 9,
            ship_status: 0,
            created_at: None,
            updated_at: None,
        };
        let err = create_order(Extension(state), Json(dto)).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
