use actix_web::{web, HttpResponse};
use log::{debug, info};
use shared::dtos::fragment_response::{FragmentResponse, HealthResponse};

use crate::{
    error::{ApiError, ApiResult},
    params::{ParamError, RawFragmentQuery},
    perform_fragment, WorkerState,
};

pub async fn health(state: web::Data<WorkerState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        name: state.name.clone(),
    })
}

/// `GET /mandelbrot?min_re=..&min_im=..&max_re=..&max_im=..&col_count=..&row_count=..&max_iter=..`
pub async fn mandelbrot(
    state: web::Data<WorkerState>,
    query: web::Query<RawFragmentQuery>,
) -> ApiResult<web::Json<FragmentResponse>> {
    fulfil(&state, query.into_inner()).await
}

/// `GET /mandelbrot/{min_re}/{min_im}/{max_re}/{max_im}/{col_count}/{row_count}/{max_iter}`,
/// kept for dispatchers that still embed the parameters in the path.
pub async fn mandelbrot_path(
    state: web::Data<WorkerState>,
    path: web::Path<RawFragmentQuery>,
) -> ApiResult<web::Json<FragmentResponse>> {
    fulfil(&state, path.into_inner()).await
}

async fn fulfil(state: &WorkerState, raw: RawFragmentQuery) -> ApiResult<web::Json<FragmentResponse>> {
    debug!("Fragment request received: {:?}", raw);
    let query = raw.parse()?;

    let points = query.points();
    if points > state.max_points {
        return Err(ParamError::TooLarge {
            points,
            limit: state.max_points,
        }
        .into());
    }

    // keep the kernel off the async workers
    let response = web::block(move || perform_fragment(&query))
        .await
        .map_err(|e| ApiError::Internal(format!("Kernel task failed: {}", e)))?;

    info!(
        "Fragment computed: re [{}, {}] x {} cols, im [{}, {}] x {} rows",
        response.c_real.min,
        response.c_real.max,
        query.col_count,
        response.c_imag.min,
        response.c_imag.max,
        query.row_count
    );
    Ok(web::Json(response))
}
