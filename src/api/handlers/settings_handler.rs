//! Settings handlers: profile, password and tag preferences.
//!
//! Successful form posts redirect back to their page with a flash notice;
//! rejected ones re-render the page with the errors and status 200.

use axum::{
    extract::{Extension, State},
    response::{IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::CookieJar;

use crate::api::extractors::{FormInput, ValidatedJson};
use crate::api::flash::{self, Flash};
use crate::api::middleware::CurrentAccount;
use crate::api::AppState;
use crate::config::{SETTINGS_PASSWORD_PATH, SETTINGS_PROFILE_PATH};
use crate::domain::{PasswordForm, ProfileForm, Submission, TagForm};
use crate::errors::AppResult;
use crate::types::{Ack, PasswordPage, ProfilePage, TagsPage};

/// Create settings routes
pub fn settings_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(profile_form).post(update_profile))
        .route("/password", get(password_form).post(update_password))
        .route("/tags", get(tags_form))
        .route("/tags/add", post(add_tag))
        .route("/tags/remove", post(remove_tag))
}

/// Show the profile form
#[utoipa::path(
    get,
    path = "/settings/profile",
    tag = "Settings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile form with stored values", body = ProfilePage),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn profile_form(
    Extension(current): Extension<CurrentAccount>,
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<ProfilePage>)> {
    let account = state.settings_service.account(current.id).await?;
    let (jar, message) = flash::take(jar);

    Ok((jar, Json(ProfilePage::new(account).message(message))))
}

/// Submit the profile form
#[utoipa::path(
    post,
    path = "/settings/profile",
    tag = "Settings",
    security(("bearer_auth" = [])),
    request_body(content = ProfileForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Profile saved; redirects to the profile page"),
        (status = 200, description = "Rejected; form re-rendered with errors", body = ProfilePage),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn update_profile(
    Extension(current): Extension<CurrentAccount>,
    State(state): State<AppState>,
    jar: CookieJar,
    FormInput(form): FormInput<ProfileForm>,
) -> AppResult<Response> {
    let submitted = form.clone();

    match state
        .settings_service
        .update_profile(current.id, form)
        .await?
    {
        Submission::Applied(_) => Ok((
            flash::set(jar, Flash::ProfileUpdated),
            Redirect::to(SETTINGS_PROFILE_PATH),
        )
            .into_response()),
        Submission::Rejected(errors) => {
            let account = state.settings_service.account(current.id).await?;
            let page = ProfilePage::with_form(account, submitted).errors(errors);
            Ok(Json(page).into_response())
        }
    }
}

/// Show the password form
#[utoipa::path(
    get,
    path = "/settings/password",
    tag = "Settings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Empty password form", body = PasswordPage),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn password_form(
    Extension(current): Extension<CurrentAccount>,
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<PasswordPage>)> {
    let account = state.settings_service.account(current.id).await?;
    let (jar, message) = flash::take(jar);

    Ok((jar, Json(PasswordPage::new(account).message(message))))
}

/// Submit the password form
#[utoipa::path(
    post,
    path = "/settings/password",
    tag = "Settings",
    security(("bearer_auth" = [])),
    request_body(content = PasswordForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Password changed; redirects to the password page"),
        (status = 200, description = "Rejected; empty form with errors", body = PasswordPage),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn update_password(
    Extension(current): Extension<CurrentAccount>,
    State(state): State<AppState>,
    jar: CookieJar,
    FormInput(form): FormInput<PasswordForm>,
) -> AppResult<Response> {
    match state
        .settings_service
        .update_password(current.id, form)
        .await?
    {
        Submission::Applied(()) => Ok((
            flash::set(jar, Flash::PasswordUpdated),
            Redirect::to(SETTINGS_PASSWORD_PATH),
        )
            .into_response()),
        Submission::Rejected(errors) => {
            let account = state.settings_service.account(current.id).await?;
            Ok(Json(PasswordPage::new(account).errors(errors)).into_response())
        }
    }
}

/// Show the tag preferences
#[utoipa::path(
    get,
    path = "/settings/tags",
    tag = "Settings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Account tags and whitelist", body = TagsPage),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn tags_form(
    Extension(current): Extension<CurrentAccount>,
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<TagsPage>)> {
    let settings = state.settings_service.tag_settings(current.id).await?;
    let (jar, message) = flash::take(jar);

    let page = TagsPage::new(settings.account, settings.tags, settings.whitelist).message(message);
    Ok((jar, Json(page)))
}

/// Add a tag to the account, creating it if unknown
#[utoipa::path(
    post,
    path = "/settings/tags/add",
    tag = "Settings",
    security(("bearer_auth" = [])),
    request_body = TagForm,
    responses(
        (status = 200, description = "Tag associated (idempotent)"),
        (status = 400, description = "Blank tag title"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn add_tag(
    Extension(current): Extension<CurrentAccount>,
    State(state): State<AppState>,
    ValidatedJson(form): ValidatedJson<TagForm>,
) -> AppResult<Ack> {
    state
        .settings_service
        .add_tag(current.id, &form.tag_title)
        .await?;

    Ok(Ack)
}

/// Remove a tag from the account
#[utoipa::path(
    post,
    path = "/settings/tags/remove",
    tag = "Settings",
    security(("bearer_auth" = [])),
    request_body = TagForm,
    responses(
        (status = 200, description = "Tag dissociated; unknown titles are ignored"),
        (status = 400, description = "Blank tag title"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn remove_tag(
    Extension(current): Extension<CurrentAccount>,
    State(state): State<AppState>,
    ValidatedJson(form): ValidatedJson<TagForm>,
) -> AppResult<Ack> {
    state
        .settings_service
        .remove_tag(current.id, &form.tag_title)
        .await?;

    Ok(Ack)
}
