//! Fixture photos for the demo pages

use serde::Deserialize;
use tracing::error;

const PHOTOS_JSON: &str = include_str!("../assets/photos.json");

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Photo {
    pub id: u32,
    pub collection: String,
    pub caption: String,
    pub alt: String,
}

impl Photo {
    pub fn full_url(&self) -> String {
        format!("https://picsum.photos/id/{}/1600/1067.jpg", self.id)
    }

    pub fn thumbnail_url(&self) -> String {
        format!("https://picsum.photos/id/{}/320/214.jpg", self.id)
    }

    /// Candidates for `data-srcset`.
    pub fn srcset(&self) -> String {
        format!(
            "https://picsum.photos/id/{0}/800/534.jpg 800w, https://picsum.photos/id/{0}/1600/1067.jpg 1600w",
            self.id
        )
    }
}

pub fn get_photos() -> Vec<Photo> {
    match serde_json::from_str(PHOTOS_JSON) {
        Ok(photos) => photos,
        Err(e) => {
            error!("Invalid photo fixture: {}", e);
            Vec::new()
        }
    }
}

pub fn get_collection(collection: &str) -> Vec<Photo> {
    get_photos()
        .into_iter()
        .filter(|photo| photo.collection == collection)
        .collect()
}
