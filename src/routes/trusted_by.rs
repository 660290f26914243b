use std::path::Path;

use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::startup::TrustedByDirectory;

const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "webp", "svg"];
const PUBLIC_PREFIX: &str = "/trustedby";

#[derive(Serialize, Debug)]
pub struct TrustedByResponse {
    pub logos: Vec<String>,
}

/// Logos shown in the "trusted by" strip. Never fails, an unreadable directory has no logos.
#[tracing::instrument(name = "Listing trusted by logos", skip(directory))]
pub async fn handle_trusted_by(directory: web::Data<TrustedByDirectory>) -> HttpResponse {
    let logos = list_logos(&directory.0).await.unwrap_or_else(|err| {
        tracing::warn!("Failed to list {}: {:?}", directory.0.display(), err);
        Vec::new()
    });

    HttpResponse::Ok().json(TrustedByResponse { logos })
}

async fn list_logos(directory: &Path) -> std::io::Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(directory).await?;
    let mut names = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }

        if let Some(name) = entry.file_name().to_str() {
            if has_allowed_extension(name) {
                names.push(name.to_string());
            }
        }
    }

    names.sort();

    Ok(names
        .into_iter()
        .map(|name| format!("{}/{}", PUBLIC_PREFIX, name))
        .collect())
}

fn has_allowed_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|extension| extension.to_str())
        .map_or(false, |extension| {
            ALLOWED_EXTENSIONS.contains(&extension.to_lowercase().as_str())
        })
}
