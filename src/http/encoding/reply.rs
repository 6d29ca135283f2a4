use super::error::AuthRejection;
use warp::reply::{Reply, Response};
use warp::Rejection;

pub fn json_encode(
    value: Result<impl serde::Serialize, impl Into<AuthRejection>>,
) -> Result<impl Reply, Rejection> {
    value
        .map(|v| warp::reply::json(&v))
        .map_err(|e| warp::reject::custom::<AuthRejection>(e.into()))
}

pub fn accept<T, E>(result: Result<T, E>) -> Result<T, Rejection>
where
    E: Into<AuthRejection>,
{
    result.map_err(|e| warp::reject::custom(e.into()))
}

pub fn reply<T, E>(result: Result<T, E>) -> Result<Response, Rejection>
where
    T: Reply,
    E: Into<AuthRejection>,
{
    result
        .map(|t| t.into_response())
        .map_err(|e| warp::reject::custom(e.into()))
}
