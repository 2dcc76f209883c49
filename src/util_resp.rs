use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use hypertext::Rendered;

pub fn see_other_ok(r: Redirect) -> StandardResponse {
    Ok(SuccessResponse::SeeOther(r))
}

pub fn bad_request(html: Rendered<String>) -> StandardResponse {
    Err(FailureResponse::BadRequest(html))
}

pub fn success(html: Rendered<String>) -> StandardResponse {
    Ok(SuccessResponse::Success(html))
}

pub fn unauthorized(html: Rendered<String>) -> StandardResponse {
    Err(FailureResponse::Unauthorized(html))
}

pub fn forbidden(html: Rendered<String>) -> StandardResponse {
    Err(FailureResponse::Forbidden(html))
}

pub fn server_error(html: Rendered<String>) -> StandardResponse {
    Err(FailureResponse::ServerError(html))
}

pub type StandardResponse = Result<SuccessResponse, FailureResponse>;

pub enum SuccessResponse {
    Success(Rendered<String>),
    SeeOther(Redirect),
}

#[derive(Debug)]
pub enum FailureResponse {
    BadRequest(Rendered<String>),
    Unauthorized(Rendered<String>),
    Forbidden(Rendered<String>),
    ServerError(Rendered<String>),
}

impl IntoResponse for SuccessResponse {
    fn into_response(self) -> Response {
        match self {
            SuccessResponse::Success(html) => {
                Html(html.into_inner()).into_response()
            }
            SuccessResponse::SeeOther(redirect) => redirect.into_response(),
        }
    }
}

impl IntoResponse for FailureResponse {
    fn into_response(self) -> Response {
        let (status, html) = match self {
            FailureResponse::BadRequest(html) => (StatusCode::BAD_REQUEST, html),
            FailureResponse::Unauthorized(html) => {
                (StatusCode::UNAUTHORIZED, html)
            }
            FailureResponse::Forbidden(html) => (StatusCode::FORBIDDEN, html),
            FailureResponse::ServerError(html) => {
                (StatusCode::INTERNAL_SERVER_ERROR, html)
            }
        };
        (status, Html(html.into_inner())).into_response()
    }
}
