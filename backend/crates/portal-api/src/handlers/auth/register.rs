//! POST /api/v1/users/register
//!
//! Accepts JSON or multipart/form-data. The multipart form may carry a
//! `coverImage` file part next to the text fields.

use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{web, FromRequest, HttpRequest, HttpResponse};
use portal_configs::UploadSettings;

use crate::error::{ApiError, ApiResult};
use crate::handlers::respond;
use crate::models::{RegisterRequest, UserInfo};
use crate::multipart::{is_multipart, MultipartForm};
use crate::services::AccountService;

pub async fn register_handler(
    req: HttpRequest,
    payload: web::Payload,
    accounts: web::Data<AccountService>,
    uploads: web::Data<UploadSettings>,
) -> ApiResult<HttpResponse> {
    let mut payload = payload.into_inner();

    let (request, cover) = if is_multipart(req.headers()) {
        let multipart = Multipart::new(req.headers(), payload);
        let mut form = MultipartForm::read(multipart, &uploads).await?;
        let text = |name: &str| form.field(name).map(str::to_string);
        let request = RegisterRequest {
            fullname: text("fullname"),
            email: text("email"),
            username: text("username"),
            password: text("password"),
            mobile_number: text("mobileNumber"),
            birth_date: text("birthDate"),
        };
        let cover = form.take_file("coverImage");
        form.discard().await;
        (request, cover)
    } else {
        let json = web::Json::<RegisterRequest>::from_request(&req, &mut payload)
            .await
            .map_err(|e| ApiError::bad_request(e.to_string()))?;
        (json.into_inner(), None)
    };

    let user = accounts.register(request, cover).await?;
    Ok(respond(StatusCode::CREATED, UserInfo::from(&user), "User registered successfully"))
}
