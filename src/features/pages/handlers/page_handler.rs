use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use minijinja::context;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{LoginRequestDto, RegisterRequestDto, UserDto};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::{AuthService, SessionService};
use crate::features::pages::extractor::PageUser;
use crate::features::pages::flash::Flash;
use crate::features::reports::dtos::{ReportForm, ReportResponseDto};
use crate::features::reports::services::{ReportService, SubmissionService};
use crate::shared::templates::PageRenderer;

/// State for page handlers
#[derive(Clone)]
pub struct PageState {
    pub auth_service: Arc<AuthService>,
    pub session_service: Arc<SessionService>,
    pub report_service: Arc<ReportService>,
    pub submission_service: Arc<SubmissionService>,
    pub renderer: Arc<PageRenderer>,
}

impl PageState {
    /// Render a page. A flash taken from the request cookie is consumed.
    fn render(
        &self,
        template: &str,
        user: Option<&AuthenticatedUser>,
        reports: Vec<ReportResponseDto>,
        flash: Option<Flash>,
        flash_from_cookie: bool,
    ) -> Result<Response> {
        let html = self.renderer.render(
            template,
            context! {
                user => user.cloned().map(UserDto::from),
                reports => reports,
                flash => flash,
            },
        )?;

        let mut response = Html(html).into_response();
        if flash_from_cookie {
            response
                .headers_mut()
                .append(header::SET_COOKIE, Flash::clear_cookie());
        }
        Ok(response)
    }

    async fn user_dashboard(
        &self,
        user: &AuthenticatedUser,
        flash: Option<Flash>,
    ) -> Result<Response> {
        let reports = self.report_service.list_by_user(user.id).await?;
        self.render(
            "user_dashboard.html",
            Some(user),
            reports.into_iter().map(ReportResponseDto::from).collect(),
            flash,
            false,
        )
    }
}

fn redirect_with_flash(to: &str, flash: Flash) -> Response {
    ([(header::SET_COOKIE, flash.to_cookie())], Redirect::to(to)).into_response()
}

/// Send visitors to the page for their role
pub async fn home(user: Option<AuthenticatedUser>) -> Redirect {
    match user {
        Some(user) if user.is_mayor() => Redirect::to("/admin"),
        Some(_) => Redirect::to("/dashboard"),
        None => Redirect::to("/login"),
    }
}

pub async fn register_page(
    State(state): State<PageState>,
    headers: HeaderMap,
) -> Result<Response> {
    let flash = Flash::from_headers(&headers);
    let from_cookie = flash.is_some();
    state.render("register.html", None, Vec::new(), flash, from_cookie)
}

pub async fn register_submit(
    State(state): State<PageState>,
    Form(dto): Form<RegisterRequestDto>,
) -> Result<Response> {
    match state.auth_service.register(dto).await {
        Ok(_) => Ok(redirect_with_flash(
            "/login",
            Flash::success("Account created! Please login."),
        )),
        Err(AppError::Conflict(_)) => state.render(
            "register.html",
            None,
            Vec::new(),
            Some(Flash::danger("Username already exists.")),
            false,
        ),
        Err(AppError::BadRequest(message)) | Err(AppError::Validation(message)) => state.render(
            "register.html",
            None,
            Vec::new(),
            Some(Flash::danger(message)),
            false,
        ),
        Err(e) => Err(e),
    }
}

pub async fn login_page(
    State(state): State<PageState>,
    headers: HeaderMap,
) -> Result<Response> {
    let flash = Flash::from_headers(&headers);
    let from_cookie = flash.is_some();
    state.render("login.html", None, Vec::new(), flash, from_cookie)
}

pub async fn login_submit(
    State(state): State<PageState>,
    Form(dto): Form<LoginRequestDto>,
) -> Result<Response> {
    match state.auth_service.login(dto).await {
        Ok(outcome) => Ok((
            [(header::SET_COOKIE, outcome.session.cookie)],
            Redirect::to("/"),
        )
            .into_response()),
        Err(AppError::Unauthorized(_)) | Err(AppError::BadRequest(_)) => state.render(
            "login.html",
            None,
            Vec::new(),
            Some(Flash::danger("Invalid credentials.")),
            false,
        ),
        Err(e) => Err(e),
    }
}

pub async fn logout(PageUser(user): PageUser, State(state): State<PageState>) -> Response {
    tracing::info!("User logged out: {} (id: {})", user.username, user.id);
    (
        [(header::SET_COOKIE, state.session_service.end_cookie())],
        Redirect::to("/login"),
    )
        .into_response()
}

/// Citizen dashboard: submission form and the caller's own reports
pub async fn dashboard(
    PageUser(user): PageUser,
    State(state): State<PageState>,
    headers: HeaderMap,
) -> Result<Response> {
    let flash = Flash::from_headers(&headers);
    let from_cookie = flash.is_some();
    let mut response = state.user_dashboard(&user, flash).await?;
    if from_cookie {
        response
            .headers_mut()
            .append(header::SET_COOKIE, Flash::clear_cookie());
    }
    Ok(response)
}

/// Submit a report from the dashboard form.
///
/// Incomplete forms are ignored and the dashboard is shown again.
pub async fn dashboard_submit(
    PageUser(user): PageUser,
    State(state): State<PageState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Response> {
    let form = match multipart {
        Ok(multipart) => ReportForm::from_multipart(multipart).await?,
        Err(rejection) => {
            tracing::debug!("Dashboard submission is not multipart: {}", rejection);
            ReportForm::default()
        }
    };

    let mut flash = None;
    if let (Some(file), Some(lat), Some(lon)) = (form.file, form.lat, form.lon) {
        if !file.file_name.is_empty() {
            match state
                .submission_service
                .submit(user.id, &file.file_name, &file.data, &lat, &lon)
                .await
            {
                Ok(_) => flash = Some(Flash::success("Report Submitted Successfully!")),
                Err(AppError::BadRequest(message)) => {
                    tracing::warn!("Skipping dashboard submission: {}", message);
                }
                Err(e) => return Err(e),
            }
        }
    }

    state.user_dashboard(&user, flash).await
}

/// Mayor dashboard: reports whose address mentions the mayor's region
pub async fn admin(PageUser(user): PageUser, State(state): State<PageState>) -> Result<Response> {
    if !user.is_mayor() {
        return Ok("Access Denied".into_response());
    }

    let reports = state.report_service.list_by_region(&user.region).await?;
    state.render(
        "mayor_dashboard.html",
        Some(&user),
        reports.into_iter().map(ReportResponseDto::from).collect(),
        None,
        false,
    )
}

/// Resolve from the mayor dashboard; always lands back on `/admin`
pub async fn resolve(
    PageUser(user): PageUser,
    State(state): State<PageState>,
    Path(id): Path<i64>,
) -> Result<Redirect> {
    if user.is_mayor() {
        state.report_service.resolve(id).await?;
    }
    Ok(Redirect::to("/admin"))
}
