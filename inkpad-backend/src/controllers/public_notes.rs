//! Public note viewing — the one route callable without an identity.

use actix_web::{HttpResponse, Responder, web};

use crate::AppState;

async fn get_public_note(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let slug = path.into_inner();

    match data.db.get_note_by_public_slug(&slug) {
        Ok(Some(note)) => HttpResponse::Ok().json(note),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({ "error": "Not found" })),
        Err(e) => {
            log::error!("Failed to fetch public note: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to fetch note"
            }))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/public-notes").route("/{slug}", web::get().to(get_public_note)));
}
