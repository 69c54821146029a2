pub mod books;
pub mod urls;

use std::sync::Arc;

use bookshelf_kernel::{settings::Settings, ModuleRegistry};

use books::store::BookStore;
use urls::normalize::UrlNormalizer;

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, store: Arc<dyn BookStore>, settings: &Settings) {
    registry.register(books::create_module(store));
    registry.register(urls::create_module(UrlNormalizer::new(
        settings.urls.redirect_host.clone(),
    )));
}
