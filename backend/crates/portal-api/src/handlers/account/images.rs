//! PATCH /api/v1/users/profile-image and /api/v1/users/cover-image
//!
//! multipart/form-data with a single file part named `profileImage` or
//! `coverImage`.

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use portal_auth::AuthenticatedUser;
use portal_configs::UploadSettings;

use crate::error::ApiResult;
use crate::handlers::ok;
use crate::models::UserInfo;
use crate::multipart::MultipartForm;
use crate::services::{AccountService, ImageSlot};

pub async fn update_profile_image_handler(
    user: AuthenticatedUser,
    payload: Multipart,
    accounts: web::Data<AccountService>,
    uploads: web::Data<UploadSettings>,
) -> ApiResult<HttpResponse> {
    update_image(user, payload, ImageSlot::Profile, &accounts, &uploads).await
}

pub async fn update_cover_image_handler(
    user: AuthenticatedUser,
    payload: Multipart,
    accounts: web::Data<AccountService>,
    uploads: web::Data<UploadSettings>,
) -> ApiResult<HttpResponse> {
    update_image(user, payload, ImageSlot::Cover, &accounts, &uploads).await
}

async fn update_image(
    user: AuthenticatedUser,
    payload: Multipart,
    slot: ImageSlot,
    accounts: &AccountService,
    uploads: &UploadSettings,
) -> ApiResult<HttpResponse> {
    let mut form = MultipartForm::read(payload, uploads).await?;
    let file = form.take_file(slot.field_name());
    form.discard().await;

    let updated = accounts.update_image(&user.user_id, slot, file).await?;
    let message = match slot {
        ImageSlot::Profile => "Profile image updated successfully",
        ImageSlot::Cover => "Cover image updated successfully",
    };
    Ok(ok(UserInfo::from(&updated), message))
}
