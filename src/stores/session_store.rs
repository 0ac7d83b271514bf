// ============================================================================
// SESSION STORE - Estado de autenticación y ciclo de vida de la sesión
// ============================================================================
// Posee token, usuario, loading y error con Rc<RefCell>. Toda mutación del
// token se refleja en el storage duradero en la misma operación.
// Las operaciones nunca propagan errores: devuelven bool + slot de error.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::models::{AuthResponse, User, UserResponse};
use crate::services::api::{Api, RequestOptions, TokenCell};
use crate::utils::constants::TOKEN_STORAGE_KEY;
use crate::utils::storage::StoragePort;

pub struct SessionStore<A: Api, S: StoragePort> {
    api: Rc<A>,
    storage: Rc<S>,
    token: TokenCell,
    user: Rc<RefCell<Option<User>>>,
    loading: Rc<RefCell<bool>>,
    error: Rc<RefCell<Option<String>>>,
}

impl<A: Api, S: StoragePort> Clone for SessionStore<A, S> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            storage: self.storage.clone(),
            token: self.token.clone(),
            user: self.user.clone(),
            loading: self.loading.clone(),
            error: self.error.clone(),
        }
    }
}

impl<A: Api, S: StoragePort> SessionStore<A, S> {
    /// Crea el store sembrando el token desde el storage duradero.
    /// La celda de token se comparte con el ApiClient (header Authorization).
    pub fn new(api: Rc<A>, storage: Rc<S>, token: TokenCell) -> Self {
        *token.borrow_mut() = storage.get(TOKEN_STORAGE_KEY);

        Self {
            api,
            storage,
            token,
            user: Rc::new(RefCell::new(None)),
            loading: Rc::new(RefCell::new(false)),
            error: Rc::new(RefCell::new(None)),
        }
    }

    /// Iniciar sesión. En fallo el estado de sesión queda intacto,
    /// solo se registra el error.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        self.begin();
        log::info!("🔐 Iniciando sesión para: {}", email);

        let body = serde_json::json!({ "email": email, "password": password });
        let result = self
            .api
            .execute::<AuthResponse>("/auth/login", RequestOptions::post_json(body))
            .await;

        match result {
            Ok(rsp) => {
                self.set_token(Some(rsp.token));
                *self.user.borrow_mut() = Some(rsp.user);
                self.finish(None);
                log::info!("✅ Sesión iniciada");
                true
            }
            Err(e) => {
                log::error!("❌ Error iniciando sesión: {}", e);
                self.finish(Some(e.to_string()));
                false
            }
        }
    }

    /// Registrar usuario; mismo contrato que login
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        password_confirmation: &str,
    ) -> bool {
        self.begin();
        log::info!("📝 Registrando usuario: {}", email);

        let body = serde_json::json!({
            "name": name,
            "email": email,
            "password": password,
            "password_confirmation": password_confirmation,
        });
        let result = self
            .api
            .execute::<AuthResponse>("/auth/register", RequestOptions::post_json(body))
            .await;

        match result {
            Ok(rsp) => {
                self.set_token(Some(rsp.token));
                *self.user.borrow_mut() = Some(rsp.user);
                self.finish(None);
                log::info!("✅ Usuario registrado");
                true
            }
            Err(e) => {
                log::error!("❌ Error registrando usuario: {}", e);
                self.finish(Some(e.to_string()));
                false
            }
        }
    }

    /// Cerrar sesión. El aviso al servidor es best-effort: su fallo se
    /// registra en error pero el logout local es incondicional.
    /// Devuelve si la llamada al servidor tuvo éxito.
    pub async fn logout(&self) -> bool {
        self.begin();
        log::info!("👋 Cerrando sesión");

        let result = self
            .api
            .execute::<serde_json::Value>("/auth/logout", RequestOptions::post())
            .await;

        let server_ok = match result {
            Ok(_) => {
                self.finish(None);
                true
            }
            Err(e) => {
                log::warn!("⚠️ Error en logout del servidor (se ignora): {}", e);
                self.finish(Some(e.to_string()));
                false
            }
        };

        self.set_token(None);
        *self.user.borrow_mut() = None;
        log::info!("✅ Sesión local cerrada");

        server_ok
    }

    /// Cargar el perfil del usuario actual. Sin token es un no-op que
    /// devuelve fallo. Si el backend rechaza el token que teníamos, se
    /// degrada a sesión anónima (logout local forzado).
    pub async fn fetch_current_user(&self) -> bool {
        if self.token.borrow().is_none() {
            return false;
        }

        self.begin();

        let result = self
            .api
            .execute::<UserResponse>("/auth/me", RequestOptions::get())
            .await;

        match result {
            Ok(rsp) => {
                *self.user.borrow_mut() = Some(rsp.data);
                self.finish(None);
                true
            }
            Err(e) => {
                log::warn!("⚠️ Token inválido, cerrando sesión local: {}", e);
                self.set_token(None);
                *self.user.borrow_mut() = None;
                self.finish(Some(e.to_string()));
                false
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.borrow().is_some()
    }

    pub fn get_token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    pub fn get_user(&self) -> Option<User> {
        self.user.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub fn get_error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    /// Única vía de mutación del token: memoria y storage nunca divergen
    fn set_token(&self, token: Option<String>) {
        match &token {
            Some(value) => {
                if let Err(e) = self.storage.set(TOKEN_STORAGE_KEY, value) {
                    log::warn!("⚠️ No se pudo persistir el token: {}", e);
                }
            }
            None => {
                if let Err(e) = self.storage.remove(TOKEN_STORAGE_KEY) {
                    log::warn!("⚠️ No se pudo eliminar el token persistido: {}", e);
                }
            }
        }

        *self.token.borrow_mut() = token;
    }

    fn begin(&self) {
        *self.loading.borrow_mut() = true;
        *self.error.borrow_mut() = None;
    }

    fn finish(&self, error: Option<String>) {
        *self.error.borrow_mut() = error;
        *self.loading.borrow_mut() = false;
    }
}
