/// Post handlers - feed reads and post creation
use crate::error::Result;
use crate::models::{FeedQueryParams, FeedWindow};
use crate::services::{FeedQueryEngine, ModerationPipeline};
use actix_web::{web, HttpRequest, HttpResponse};
use board_types::CreatePostRequest;

/// `GET /posts?skip&limit&sort`
///
/// Never rejects a query: unusable values fall back to their defaults.
pub async fn get_posts(
    engine: web::Data<FeedQueryEngine>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let params = web::Query::<FeedQueryParams>::from_query(req.query_string())
        .map(web::Query::into_inner)
        .unwrap_or_default();
    let window = FeedWindow::from_params(&params);

    let page = engine.get_page(window).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// `POST /posts`
pub async fn create_post(
    pipeline: web::Data<ModerationPipeline>,
    body: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let post = pipeline.create_post(&body).await?;
    Ok(HttpResponse::Created().json(post))
}
