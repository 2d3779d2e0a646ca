//! Post upload and lookup handlers.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use futures::TryStreamExt;

use postdrop_core::UploadError;
use postdrop_core::domain::{MediaFile, PostSubmission};
use postdrop_shared::dto::UploadResponse;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/posts (also POST /api/upload)
///
/// Multipart form with `title`, `description`, `country`, `city`, `server`
/// text fields and one media file part.
pub async fn upload(state: web::Data<AppState>, payload: Multipart) -> AppResult<HttpResponse> {
    let submission = read_submission(payload).await?;
    let receipt = state.uploader.upload(submission).await?;

    Ok(HttpResponse::Ok().json(UploadResponse::uploaded(receipt.post_id)))
}

/// GET /api/posts/{post_id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let post = state
        .storage
        .get_post_metadata(&post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post".to_string()))?;

    Ok(HttpResponse::Ok().json(post))
}

/// Collect the multipart stream into a submission.
///
/// A part carrying a `filename` parameter, even an empty one, is a file; the
/// first such part is the media file and later ones are drained and dropped.
/// Other parts are read as text fields by name, unknown names are ignored.
/// A body that is not valid multipart is treated like one with nothing in it.
async fn read_submission(mut payload: Multipart) -> AppResult<PostSubmission> {
    let mut submission = PostSubmission::default();

    loop {
        let mut field = match payload.try_next().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::debug!(error = %e, "Unreadable multipart body");
                return Err(UploadError::missing_fields().into());
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let content_type = field.content_type().map(|mime| mime.to_string());

        let mut bytes = Vec::new();
        loop {
            match field.try_next().await {
                Ok(Some(chunk)) => bytes.extend_from_slice(&chunk),
                Ok(None) => break,
                Err(e) => {
                    tracing::debug!(field = %name, error = %e, "Unreadable multipart field");
                    return Err(UploadError::missing_fields().into());
                }
            }
        }

        if filename.is_some() {
            if submission.media.is_none() {
                submission.media = Some(MediaFile {
                    filename,
                    content_type,
                    bytes,
                });
            } else {
                tracing::debug!(field = %name, "Ignoring extra file part");
            }
        } else if PostSubmission::is_text_field(&name) {
            match String::from_utf8(bytes) {
                Ok(value) => {
                    submission.set_text_field(&name, value);
                }
                Err(_) => tracing::debug!(field = %name, "Ignoring non UTF-8 text field"),
            }
        } else {
            tracing::debug!(field = %name, "Ignoring unknown text field");
        }
    }

    Ok(submission)
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test, web};
    use std::sync::Arc;

    use crate::handlers::configure_routes;
    use crate::handlers::test_support::{CountingStorage, MultipartBody};
    use crate::state::AppState;
    use postdrop_core::ports::PostStorage;

    fn full_form() -> MultipartBody {
        MultipartBody::new()
            .text("title", "Harbor")
            .text("description", "Boats at dawn")
            .text("country", "PT")
            .text("city", "Porto")
            .file("media", Some("harbor.jpg"), Some("image/jpeg"), b"\xff\xd8\xff")
    }

    macro_rules! app {
        ($storage:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(AppState::with_storage($storage.clone())))
                    .configure(configure_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_upload_stores_media_and_metadata() {
        let storage = Arc::new(CountingStorage::default());
        let app = app!(storage);

        let req = full_form().into_request("/api/posts").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Post uploaded successfully");
        let post_id = body["postId"].as_str().unwrap().to_string();
        assert!(post_id.chars().all(|c| c.is_ascii_digit()));

        let media = storage
            .inner
            .object(&format!("posts/{post_id}/media/harbor.jpg"))
            .await
            .unwrap();
        assert_eq!(media.bytes, b"\xff\xd8\xff");
        assert_eq!(media.content_type, "image/jpeg");

        let post = storage.get_post_metadata(&post_id).await.unwrap().unwrap();
        assert_eq!(post.id, post_id);
        assert_eq!(post.city, "Porto");
        assert_eq!(post.server, "");
        assert_eq!(post.media_files, vec!["harbor.jpg".to_string()]);
    }

    #[actix_web::test]
    async fn test_missing_required_fields() {
        let forms = [
            MultipartBody::new()
                .text("description", "d")
                .file("media", Some("a.png"), Some("image/png"), b"1"),
            MultipartBody::new()
                .text("title", "t")
                .text("description", "")
                .file("media", Some("a.png"), Some("image/png"), b"1"),
            MultipartBody::new().text("title", "t").text("description", "d"),
        ];

        for form in forms {
            let storage = Arc::new(CountingStorage::default());
            let app = app!(storage);

            let resp = test::call_service(&app, form.into_request("/api/posts").to_request()).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: serde_json::Value = test::read_body_json(resp).await;
            assert_eq!(body, serde_json::json!({ "error": "Missing required fields" }));
            assert_eq!(storage.calls(), 0);
        }
    }

    #[actix_web::test]
    async fn test_non_multipart_body_is_bad_request() {
        let storage = Arc::new(CountingStorage::default());
        let app = app!(storage);

        let req = test::TestRequest::post()
            .uri("/api/upload")
            .set_json(serde_json::json!({ "title": "t", "description": "d" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(storage.calls(), 0);
    }

    #[actix_web::test]
    async fn test_blank_server_does_not_touch_registry() {
        for server in [None, Some(""), Some("   ")] {
            let storage = Arc::new(CountingStorage::default());
            let app = app!(storage);

            let mut form = full_form();
            if let Some(server) = server {
                form = form.text("server", server);
            }
            let resp = test::call_service(&app, form.into_request("/api/posts").to_request()).await;

            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(storage.registry_reads(), 0);
            assert_eq!(storage.registry_writes(), 0);
        }
    }

    #[actix_web::test]
    async fn test_server_is_added_to_sorted_registry() {
        let storage = Arc::new(CountingStorage::default());
        storage
            .inner
            .update_servers_list(&["b".to_string(), "d".to_string()])
            .await
            .unwrap();
        let app = app!(storage);

        for _ in 0..2 {
            let form = full_form().text("server", "a");
            let resp = test::call_service(&app, form.into_request("/api/posts").to_request()).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }

        assert_eq!(storage.registry_reads(), 2);
        assert_eq!(storage.registry_writes(), 2);
        assert_eq!(
            storage.inner.get_servers_list().await.unwrap(),
            vec!["a", "b", "d"]
        );
    }

    #[actix_web::test]
    async fn test_metadata_failure_returns_upload_failed() {
        let storage = Arc::new(CountingStorage::failing_metadata());
        let app = app!(storage);

        let resp = test::call_service(&app, full_form().into_request("/api/posts").to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, serde_json::json!({ "error": "Upload failed" }));

        // The media file was written, then cleaned up.
        assert_eq!(storage.media_writes(), 1);
        assert!(storage.inner.is_empty().await);
    }

    #[actix_web::test]
    async fn test_missing_filename_uses_fallback_name() {
        let storage = Arc::new(CountingStorage::default());
        let app = app!(storage);

        let form = MultipartBody::new()
            .text("title", "t")
            .text("description", "d")
            .file("media", Some(""), None, b"raw");
        let resp = test::call_service(&app, form.into_request("/api/posts").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        let post_id = body["postId"].as_str().unwrap();

        let post = storage.get_post_metadata(post_id).await.unwrap().unwrap();
        let name = &post.media_files[0];
        let digits = name.strip_suffix("-media").unwrap();
        assert!(!digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()));
    }

    #[actix_web::test]
    async fn test_get_post() {
        let storage = Arc::new(CountingStorage::default());
        let app = app!(storage);

        let resp = test::call_service(&app, full_form().into_request("/api/upload").to_request()).await;
        let body: serde_json::Value = test::read_body_json(resp).await;
        let post_id = body["postId"].as_str().unwrap();

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{post_id}"))
            .to_request();
        let post: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(post["id"], post_id);
        assert_eq!(post["title"], "Harbor");
        assert_eq!(post["mediaFiles"][0], "harbor.jpg");

        let req = test::TestRequest::get().uri("/api/posts/404").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_unknown_text_field_is_not_a_file() {
        let storage = Arc::new(CountingStorage::default());
        let app = app!(storage);

        let form = MultipartBody::new()
            .text("title", "t")
            .text("description", "d")
            .text("tags", "cats");
        let resp = test::call_service(&app, form.into_request("/api/posts").to_request()).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, serde_json::json!({ "error": "Missing required fields" }));
        assert_eq!(storage.calls(), 0);
    }

    #[actix_web::test]
    async fn test_unknown_text_field_before_file_is_ignored() {
        let storage = Arc::new(CountingStorage::default());
        let app = app!(storage);

        let form = MultipartBody::new()
            .text("title", "t")
            .text("description", "d")
            .text("tags", "cats")
            .file("media", Some("real.jpg"), Some("image/jpeg"), b"jpeg");
        let resp = test::call_service(&app, form.into_request("/api/posts").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        let post_id = body["postId"].as_str().unwrap();

        let post = storage.get_post_metadata(post_id).await.unwrap().unwrap();
        assert_eq!(post.media_files, vec!["real.jpg".to_string()]);
        let media = storage
            .inner
            .object(&format!("posts/{post_id}/media/real.jpg"))
            .await
            .unwrap();
        assert_eq!(media.bytes, b"jpeg");
    }

    #[actix_web::test]
    async fn test_extra_file_parts_are_ignored() {
        let storage = Arc::new(CountingStorage::default());
        let app = app!(storage);

        let form = full_form().file("second", Some("second.png"), Some("image/png"), b"png");
        let resp = test::call_service(&app, form.into_request("/api/posts").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        let post_id = body["postId"].as_str().unwrap();

        let post = storage.get_post_metadata(post_id).await.unwrap().unwrap();
        assert_eq!(post.media_files, vec!["harbor.jpg".to_string()]);
        assert_eq!(storage.media_writes(), 1);
        assert!(
            storage
                .inner
                .object(&format!("posts/{post_id}/media/second.png"))
                .await
                .is_none()
        );
    }

    #[actix_web::test]
    async fn test_non_utf8_text_field_counts_as_absent() {
        let storage = Arc::new(CountingStorage::default());
        let app = app!(storage);

        let form = MultipartBody::new()
            .raw_text("title", b"\xff\xfe")
            .text("description", "d")
            .file("media", Some("a.png"), Some("image/png"), b"1");
        let resp = test::call_service(&app, form.into_request("/api/posts").to_request()).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, serde_json::json!({ "error": "Missing required fields" }));
        assert_eq!(storage.calls(), 0);
    }
}
