// ============================================================================
// CONTACTS PWA - CAPA DE ACCESO A DATOS (RUST PURO)
// ============================================================================
// Arquitectura:
// - Models: Estructuras compartidas con el backend
// - Services: SOLO comunicación API (gloo-net en wasm)
// - Stores: Estado de sesión y de contactos con Rc<RefCell>
// - Utils: storage duradero, constantes, helper de teléfonos
// La UI (vistas, formularios, recortador de imagen, router) consume estos
// stores desde afuera.
// ============================================================================

pub mod models;
pub mod services;
pub mod stores;
pub mod utils;

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use crate::services::ApiClient;
#[cfg(target_arch = "wasm32")]
use crate::stores::{ContactStore, SessionStore};
#[cfg(target_arch = "wasm32")]
use crate::utils::storage::LocalStorage;

/// Punto de entrada del módulo wasm: el logging queda listo antes de que
/// la UI construya sus stores
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    init_logging();
    Ok(())
}

/// Inicializar logging en consola del navegador
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("🚀 Contacts PWA - capa de datos inicializada");
}

/// Crear los stores con sus dependencias reales cableadas:
/// ApiClient y SessionStore comparten la celda de token (solo el
/// SessionStore la escribe), el token persistido se siembra al construir.
/// Con sesión persistida, el perfil se restaura en segundo plano.
#[cfg(target_arch = "wasm32")]
pub fn create_stores() -> (
    SessionStore<ApiClient, LocalStorage>,
    ContactStore<ApiClient>,
) {
    let token = Rc::new(RefCell::new(None));
    let api = Rc::new(ApiClient::new(token.clone()));
    let session = SessionStore::new(api.clone(), Rc::new(LocalStorage), token);
    let contacts = ContactStore::new(api);

    if session.is_authenticated() {
        let restore = session.clone();
        wasm_bindgen_futures::spawn_local(async move {
            restore.fetch_current_user().await;
        });
    }

    (session, contacts)
}
