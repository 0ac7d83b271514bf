// ============================================================================
// STORES - Estado de la app con Rc<RefCell> + operaciones async
// ============================================================================

pub mod contact_store;
pub mod session_store;

pub use contact_store::ContactStore;
pub use session_store::SessionStore;
