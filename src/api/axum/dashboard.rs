//! Doc space and project pages.
//!
//! Every handler resolves the caller's principal and hands it to an action,
//! which runs the access gate. Refusals become [`PageError`]s: forbidden
//! resources redirect to their listing, missing ones render a 404.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use super::error::{AppError, PageError};
use super::middleware::CurrentPrincipal;
use super::routes::DashboardState;
use crate::access::Principal;
use crate::actions::{
    CreateBoardAction, CreateDocPageAction, CreateDocSpaceAction, CreateProjectAction,
    ListDocSpacesAction, ListProjectsAction, ReorderDocPagesAction, ViewDocSpaceAction,
    ViewProjectAction,
};
use crate::api::{
    CreateBoardRequest, CreateDocPageRequest, CreateDocSpaceRequest, CreateProjectRequest,
    ReorderDocPagesRequest,
};
use crate::config::SwiftTasksConfig;
use crate::repository::{DocSpaceRepository, ProfileRepository, ProjectRepository};
use crate::session::SessionProvider;
use crate::SwiftError;

type Caller = Result<CurrentPrincipal, AppError>;

#[derive(Clone, Copy)]
enum Area {
    Docs,
    Projects,
}

impl Area {
    fn error(self, config: &SwiftTasksConfig) -> impl Fn(SwiftError) -> PageError + '_ {
        move |error| PageError {
            error,
            listing: match self {
                Self::Docs => config.routes.docs_listing_path,
                Self::Projects => config.routes.projects_listing_path,
            },
            login: config.routes.login_path,
        }
    }
}

fn principal(caller: Caller) -> Result<Principal, SwiftError> {
    caller.map(CurrentPrincipal::into_inner).map_err(|AppError(e)| e)
}

/// GET /dashboard/docs
pub async fn list_doc_spaces<Sp, P, D, R>(
    State(state): State<DashboardState<Sp, P, D, R>>,
    caller: Caller,
) -> Result<Response, PageError>
where
    Sp: SessionProvider + Clone + 'static,
    P: ProfileRepository + Clone + 'static,
    D: DocSpaceRepository + Clone + 'static,
    R: ProjectRepository + Clone + 'static,
{
    let page = Area::Docs.error(&state.config);
    let principal = principal(caller).map_err(&page)?;

    let spaces = ListDocSpacesAction::new(state.doc_spaces.clone())
        .execute(&principal)
        .await
        .map_err(&page)?;
    Ok(Json(spaces).into_response())
}

/// POST /dashboard/docs
pub async fn create_doc_space<Sp, P, D, R>(
    State(state): State<DashboardState<Sp, P, D, R>>,
    caller: Caller,
    Json(body): Json<CreateDocSpaceRequest>,
) -> Result<Response, PageError>
where
    Sp: SessionProvider + Clone + 'static,
    P: ProfileRepository + Clone + 'static,
    D: DocSpaceRepository + Clone + 'static,
    R: ProjectRepository + Clone + 'static,
{
    let page = Area::Docs.error(&state.config);
    let principal = principal(caller).map_err(&page)?;

    let space = CreateDocSpaceAction::new(state.doc_spaces.clone())
        .execute(&principal, &body)
        .await
        .map_err(&page)?;
    Ok((StatusCode::CREATED, Json(space)).into_response())
}

/// GET /dashboard/docs/{space_id}
pub async fn view_doc_space<Sp, P, D, R>(
    State(state): State<DashboardState<Sp, P, D, R>>,
    Path(space_id): Path<Uuid>,
    caller: Caller,
) -> Result<Response, PageError>
where
    Sp: SessionProvider + Clone + 'static,
    P: ProfileRepository + Clone + 'static,
    D: DocSpaceRepository + Clone + 'static,
    R: ProjectRepository + Clone + 'static,
{
    let page = Area::Docs.error(&state.config);
    let principal = principal(caller).map_err(&page)?;

    let view = ViewDocSpaceAction::new(state.doc_spaces.clone())
        .execute(&principal, space_id)
        .await
        .map_err(&page)?;
    Ok(Json(view).into_response())
}

/// POST /dashboard/docs/{space_id}/pages
pub async fn create_doc_page<Sp, P, D, R>(
    State(state): State<DashboardState<Sp, P, D, R>>,
    Path(space_id): Path<Uuid>,
    caller: Caller,
    Json(body): Json<CreateDocPageRequest>,
) -> Result<Response, PageError>
where
    Sp: SessionProvider + Clone + 'static,
    P: ProfileRepository + Clone + 'static,
    D: DocSpaceRepository + Clone + 'static,
    R: ProjectRepository + Clone + 'static,
{
    let page = Area::Docs.error(&state.config);
    let principal = principal(caller).map_err(&page)?;

    let doc = CreateDocPageAction::new(state.doc_spaces.clone())
        .execute(&principal, space_id, &body)
        .await
        .map_err(&page)?;
    Ok((StatusCode::CREATED, Json(doc)).into_response())
}

/// PUT /dashboard/docs/{space_id}/pages/order
pub async fn reorder_doc_pages<Sp, P, D, R>(
    State(state): State<DashboardState<Sp, P, D, R>>,
    Path(space_id): Path<Uuid>,
    caller: Caller,
    Json(body): Json<ReorderDocPagesRequest>,
) -> Result<Response, PageError>
where
    Sp: SessionProvider + Clone + 'static,
    P: ProfileRepository + Clone + 'static,
    D: DocSpaceRepository + Clone + 'static,
    R: ProjectRepository + Clone + 'static,
{
    let page = Area::Docs.error(&state.config);
    let principal = principal(caller).map_err(&page)?;

    let pages = ReorderDocPagesAction::new(state.doc_spaces.clone())
        .execute(&principal, space_id, &body.page_ids)
        .await
        .map_err(&page)?;
    Ok(Json(pages).into_response())
}

/// GET /dashboard/projects
pub async fn list_projects<Sp, P, D, R>(
    State(state): State<DashboardState<Sp, P, D, R>>,
    caller: Caller,
) -> Result<Response, PageError>
where
    Sp: SessionProvider + Clone + 'static,
    P: ProfileRepository + Clone + 'static,
    D: DocSpaceRepository + Clone + 'static,
    R: ProjectRepository + Clone + 'static,
{
    let page = Area::Projects.error(&state.config);
    let principal = principal(caller).map_err(&page)?;

    let projects = ListProjectsAction::new(state.projects.clone())
        .execute(&principal)
        .await
        .map_err(&page)?;
    Ok(Json(projects).into_response())
}

/// POST /dashboard/projects
pub async fn create_project<Sp, P, D, R>(
    State(state): State<DashboardState<Sp, P, D, R>>,
    caller: Caller,
    Json(body): Json<CreateProjectRequest>,
) -> Result<Response, PageError>
where
    Sp: SessionProvider + Clone + 'static,
    P: ProfileRepository + Clone + 'static,
    D: DocSpaceRepository + Clone + 'static,
    R: ProjectRepository + Clone + 'static,
{
    let page = Area::Projects.error(&state.config);
    let principal = principal(caller).map_err(&page)?;

    let project = CreateProjectAction::new(state.projects.clone())
        .execute(&principal, &body)
        .await
        .map_err(&page)?;
    Ok((StatusCode::CREATED, Json(project)).into_response())
}

/// GET /dashboard/projects/{project_id}
pub async fn view_project<Sp, P, D, R>(
    State(state): State<DashboardState<Sp, P, D, R>>,
    Path(project_id): Path<Uuid>,
    caller: Caller,
) -> Result<Response, PageError>
where
    Sp: SessionProvider + Clone + 'static,
    P: ProfileRepository + Clone + 'static,
    D: DocSpaceRepository + Clone + 'static,
    R: ProjectRepository + Clone + 'static,
{
    let page = Area::Projects.error(&state.config);
    let principal = principal(caller).map_err(&page)?;

    let view = ViewProjectAction::new(state.projects.clone())
        .execute(&principal, project_id)
        .await
        .map_err(&page)?;
    Ok(Json(view).into_response())
}

/// POST /dashboard/projects/{project_id}/boards
pub async fn create_board<Sp, P, D, R>(
    State(state): State<DashboardState<Sp, P, D, R>>,
    Path(project_id): Path<Uuid>,
    caller: Caller,
    Json(body): Json<CreateBoardRequest>,
) -> Result<Response, PageError>
where
    Sp: SessionProvider + Clone + 'static,
    P: ProfileRepository + Clone + 'static,
    D: DocSpaceRepository + Clone + 'static,
    R: ProjectRepository + Clone + 'static,
{
    let page = Area::Projects.error(&state.config);
    let principal = principal(caller).map_err(&page)?;

    let board = CreateBoardAction::new(state.projects.clone())
        .execute(&principal, project_id, &body)
        .await
        .map_err(&page)?;
    Ok((StatusCode::CREATED, Json(board)).into_response())
}
