pub mod books;
pub mod upload;

use std::sync::Arc;

use shelf_kernel::ModuleRegistry;

use books::BookService;

/// Register every application module with the registry
pub fn register_all(registry: &mut ModuleRegistry, service: Arc<BookService>) -> anyhow::Result<()> {
    registry.register(books::create_module(service.clone()))?;
    registry.register(upload::create_module(service))?;
    Ok(())
}
