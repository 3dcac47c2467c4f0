//! Notes REST API — owner-scoped CRUD and sharing.
//!
//! Every route here requires an authenticated user; the anonymous
//! public-slug route lives in `public_notes`.

use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::Deserialize;

use crate::AppState;
use crate::validation;

/// Resolve the authenticated user from the request, or the 401 response.
fn require_user(state: &web::Data<AppState>, req: &HttpRequest) -> Result<String, HttpResponse> {
    match state.identity.user_id(req) {
        Some(id) => Ok(id),
        None => Err(HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "Unauthorized"
        }))),
    }
}

fn validation_failed(issues: Vec<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "error": "Validation failed",
        "issues": issues
    }))
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "Not found" }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteBody {
    title: Option<String>,
    content_json: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShareBody {
    is_public: bool,
}

async fn list_notes(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let user_id = match require_user(&data, &req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data.db.list_notes_by_user(&user_id) {
        Ok(notes) => HttpResponse::Ok().json(notes),
        Err(e) => {
            log::error!("Failed to list notes: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to fetch notes"
            }))
        }
    }
}

async fn create_note(
    data: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<NoteBody>,
) -> impl Responder {
    let user_id = match require_user(&data, &req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    if let Err(issues) =
        validation::validate_note_fields(body.title.as_deref(), body.content_json.as_deref())
    {
        return validation_failed(issues);
    }

    match data
        .db
        .create_note(&user_id, body.title.as_deref(), body.content_json.as_deref())
    {
        Ok(note) => HttpResponse::Created().json(note),
        Err(e) => {
            log::error!("Failed to create note: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to create note"
            }))
        }
    }
}

async fn get_note(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    let user_id = match require_user(&data, &req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let note_id = path.into_inner();

    match data.db.get_note_by_id(&user_id, &note_id) {
        Ok(Some(note)) => HttpResponse::Ok().json(note),
        Ok(None) => not_found(),
        Err(e) => {
            log::error!("Failed to fetch note {}: {}", note_id, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to fetch note"
            }))
        }
    }
}

async fn update_note(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<NoteBody>,
) -> impl Responder {
    let user_id = match require_user(&data, &req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let note_id = path.into_inner();

    if let Err(issues) =
        validation::validate_note_fields(body.title.as_deref(), body.content_json.as_deref())
    {
        return validation_failed(issues);
    }

    match data.db.update_note(
        &user_id,
        &note_id,
        body.title.as_deref(),
        body.content_json.as_deref(),
    ) {
        Ok(Some(note)) => HttpResponse::Ok().json(note),
        Ok(None) => not_found(),
        Err(e) => {
            log::error!("Failed to update note {}: {}", note_id, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to update note"
            }))
        }
    }
}

async fn delete_note(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    let user_id = match require_user(&data, &req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let note_id = path.into_inner();

    match data.db.delete_note(&user_id, &note_id) {
        Ok(true) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Ok(false) => not_found(),
        Err(e) => {
            log::error!("Failed to delete note {}: {}", note_id, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to delete note"
            }))
        }
    }
}

async fn share_note(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<ShareBody>,
) -> impl Responder {
    let user_id = match require_user(&data, &req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let note_id = path.into_inner();

    match data.db.set_note_public(&user_id, &note_id, body.is_public) {
        Ok(Some(note)) => HttpResponse::Ok().json(note),
        Ok(None) => not_found(),
        Err(e) => {
            log::error!("Failed to update sharing for note {}: {}", note_id, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to update sharing"
            }))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/notes")
            .service(
                web::resource("")
                    .route(web::get().to(list_notes))
                    .route(web::post().to(create_note)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_note))
                    .route(web::put().to(update_note))
                    .route(web::delete().to(delete_note)),
            )
            .route("/{id}/share", web::post().to(share_note)),
    );
}
