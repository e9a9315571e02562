use crate::application::{AuthService, CommentService, FollowService, GroupService, PostService};
use crate::domain::comment::CommentPayload;
use crate::domain::follow::CreateFollowRequest;
use crate::domain::post::PostPayload;
use crate::domain::user::{LoginUserRequest, RegisterUserRequest, VerifyTokenRequest};
use crate::domain::permissions::{has_permission, Action};
use crate::domain::DomainError;
use crate::presentation::middleware::requester;
use crate::presentation::pagination::{LimitOffset, PaginationQuery};
use actix_web::{web, HttpRequest, HttpResponse};
use std::sync::Arc;

type HandlerResult = Result<HttpResponse, DomainError>;
type JsonBody<T> = Result<web::Json<T>, actix_web::Error>;

#[derive(serde::Serialize)]
struct TokenResponse {
    access: String,
}

#[derive(serde::Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

fn decoded<T>(body: JsonBody<T>) -> Result<T, DomainError> {
    body.map(web::Json::into_inner)
        .map_err(|err| DomainError::validation(err.to_string()))
}

/// Anonymous writes are refused before the body is looked at.
fn authorized_body<T>(req: &HttpRequest, action: Action, body: JsonBody<T>) -> Result<T, DomainError> {
    has_permission(requester(req), action)?;
    decoded(body)
}

/// Like [`authorized_body`], but a decode failure is handed on to the
/// service, which reports it only after existence and ownership checks.
fn deferred_body<T>(
    req: &HttpRequest,
    action: Action,
    body: JsonBody<T>,
) -> Result<Result<T, DomainError>, DomainError> {
    has_permission(requester(req), action)?;
    Ok(decoded(body))
}

// ============== Auth Handlers ==============

pub async fn register(
    auth_service: web::Data<Arc<AuthService>>,
    body: web::Json<RegisterUserRequest>,
) -> HandlerResult {
    let user = auth_service.register(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}

pub async fn create_token(
    auth_service: web::Data<Arc<AuthService>>,
    body: web::Json<LoginUserRequest>,
) -> HandlerResult {
    let access = auth_service.obtain_token(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(TokenResponse { access }))
}

pub async fn verify_token(
    auth_service: web::Data<Arc<AuthService>>,
    body: web::Json<VerifyTokenRequest>,
) -> HandlerResult {
    auth_service.validate_token(&body.token)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({})))
}

// ============== Post Handlers ==============

pub async fn list_posts(
    req: HttpRequest,
    post_service: web::Data<Arc<PostService>>,
    query: web::Query<PaginationQuery>,
) -> HandlerResult {
    match LimitOffset::from_query(&query) {
        Some(page) => {
            tracing::debug!("Listing posts with limit={}, offset={}", page.limit, page.offset);
            let (posts, total) = post_service.list_posts(Some(page.limit), page.offset).await?;
            Ok(HttpResponse::Ok().json(page.paginate(&req, total, posts)))
        }
        None => {
            let (posts, _) = post_service.list_posts(None, 0).await?;
            Ok(HttpResponse::Ok().json(posts))
        }
    }
}

pub async fn get_post(
    post_service: web::Data<Arc<PostService>>,
    path: web::Path<i64>,
) -> HandlerResult {
    let post = post_service.get_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

pub async fn create_post(
    req: HttpRequest,
    post_service: web::Data<Arc<PostService>>,
    body: JsonBody<PostPayload>,
) -> HandlerResult {
    let body = authorized_body(&req, Action::Create, body)?;
    let post = post_service
        .create_post(requester(&req), body)
        .await?;
    Ok(HttpResponse::Created().json(post))
}

pub async fn update_post(
    req: HttpRequest,
    post_service: web::Data<Arc<PostService>>,
    path: web::Path<i64>,
    body: JsonBody<PostPayload>,
) -> HandlerResult {
    let body = deferred_body(&req, Action::Update, body)?;
    let post = post_service
        .update_post(requester(&req), path.into_inner(), body, false)
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

pub async fn partial_update_post(
    req: HttpRequest,
    post_service: web::Data<Arc<PostService>>,
    path: web::Path<i64>,
    body: JsonBody<PostPayload>,
) -> HandlerResult {
    let body = deferred_body(&req, Action::PartialUpdate, body)?;
    let post = post_service
        .update_post(requester(&req), path.into_inner(), body, true)
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

pub async fn delete_post(
    req: HttpRequest,
    post_service: web::Data<Arc<PostService>>,
    path: web::Path<i64>,
) -> HandlerResult {
    post_service
        .delete_post(requester(&req), path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

// ============== Group Handlers ==============

pub async fn list_groups(group_service: web::Data<Arc<GroupService>>) -> HandlerResult {
    let groups = group_service.list_groups().await?;
    Ok(HttpResponse::Ok().json(groups))
}

pub async fn get_group(
    group_service: web::Data<Arc<GroupService>>,
    path: web::Path<i64>,
) -> HandlerResult {
    let group = group_service.get_group(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(group))
}

// ============== Comment Handlers ==============

pub async fn list_comments(
    comment_service: web::Data<Arc<CommentService>>,
    path: web::Path<i64>,
) -> HandlerResult {
    let comments = comment_service.list_comments(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(comments))
}

pub async fn get_comment(
    comment_service: web::Data<Arc<CommentService>>,
    path: web::Path<(i64, i64)>,
) -> HandlerResult {
    let (post_id, id) = path.into_inner();
    let comment = comment_service.get_comment(post_id, id).await?;
    Ok(HttpResponse::Ok().json(comment))
}

pub async fn create_comment(
    req: HttpRequest,
    comment_service: web::Data<Arc<CommentService>>,
    path: web::Path<i64>,
    body: JsonBody<CommentPayload>,
) -> HandlerResult {
    let body = authorized_body(&req, Action::Create, body)?;
    let comment = comment_service
        .create_comment(requester(&req), path.into_inner(), body)
        .await?;
    Ok(HttpResponse::Created().json(comment))
}

pub async fn update_comment(
    req: HttpRequest,
    comment_service: web::Data<Arc<CommentService>>,
    path: web::Path<(i64, i64)>,
    body: JsonBody<CommentPayload>,
) -> HandlerResult {
    let body = deferred_body(&req, Action::Update, body)?;
    let (post_id, id) = path.into_inner();
    let comment = comment_service
        .update_comment(requester(&req), post_id, id, body, false)
        .await?;
    Ok(HttpResponse::Ok().json(comment))
}

pub async fn partial_update_comment(
    req: HttpRequest,
    comment_service: web::Data<Arc<CommentService>>,
    path: web::Path<(i64, i64)>,
    body: JsonBody<CommentPayload>,
) -> HandlerResult {
    let body = deferred_body(&req, Action::PartialUpdate, body)?;
    let (post_id, id) = path.into_inner();
    let comment = comment_service
        .update_comment(requester(&req), post_id, id, body, true)
        .await?;
    Ok(HttpResponse::Ok().json(comment))
}

pub async fn delete_comment(
    req: HttpRequest,
    comment_service: web::Data<Arc<CommentService>>,
    path: web::Path<(i64, i64)>,
) -> HandlerResult {
    let (post_id, id) = path.into_inner();
    comment_service
        .delete_comment(requester(&req), post_id, id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

// ============== Follow Handlers ==============

pub async fn list_follows(
    req: HttpRequest,
    follow_service: web::Data<Arc<FollowService>>,
    query: web::Query<SearchQuery>,
) -> HandlerResult {
    let follows = follow_service
        .list_follows(requester(&req), query.search.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(follows))
}

pub async fn create_follow(
    req: HttpRequest,
    follow_service: web::Data<Arc<FollowService>>,
    body: JsonBody<CreateFollowRequest>,
) -> HandlerResult {
    let body = authorized_body(&req, Action::Create, body)?;
    let follow = follow_service
        .create_follow(requester(&req), body)
        .await?;
    Ok(HttpResponse::Created().json(follow))
}
