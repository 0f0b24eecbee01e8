//! Static portfolio pages: four fixed documents plus a public asset directory.

use std::path::{Path, PathBuf};

use axum::{routing::get_service, Router};
use tower_http::services::{ServeDir, ServeFile};

/// Route path and the document it serves from the views directory.
pub(crate) const PAGES: [(&str, &str); 4] = [
    ("/", "layout.html"),
    ("/about", "about.html"),
    ("/projects", "projects.html"),
    ("/experience", "experience.html"),
];

#[derive(Debug, Clone)]
pub(crate) struct SiteDirs {
    pub(crate) views_dir: PathBuf,
    pub(crate) public_dir: PathBuf,
}

impl SiteDirs {
    pub(crate) fn page_path(&self, document: &str) -> PathBuf {
        self.views_dir.join(document)
    }

    pub(crate) fn missing_pages(&self) -> Vec<PathBuf> {
        PAGES
            .iter()
            .map(|(_, document)| self.page_path(document))
            .filter(|path| !Path::new(path).is_file())
            .collect()
    }
}

pub(crate) fn routes<S>(site: &SiteDirs) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let mut router = Router::new();
    for (route, document) in PAGES {
        router = router.route(route, get_service(ServeFile::new(site.page_path(document))));
    }
    router.fallback_service(ServeDir::new(&site.public_dir))
}
