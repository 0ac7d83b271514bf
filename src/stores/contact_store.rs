// ============================================================================
// CONTACT STORE - Colección paginada/filtrable de contactos + CRUD
// ============================================================================
// Cada fetch reemplaza la página entera (nunca merge). Un epoch monotónico
// descarta respuestas fuera de orden: solo la última página/filtro pedidos
// pueden llegar a commitearse. Las mutaciones se serializan por id.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use crate::models::{Contact, ContactFields, ContactResponse, ContactsResponse, Pagination};
use crate::services::api::{Api, ImageFile, RequestOptions};

pub struct ContactStore<A: Api> {
    api: Rc<A>,
    contacts: Rc<RefCell<Vec<Contact>>>,
    pagination: Rc<RefCell<Pagination>>,
    search_query: Rc<RefCell<String>>,
    current_contact: Rc<RefCell<Option<Contact>>>,
    loading: Rc<RefCell<bool>>,
    error: Rc<RefCell<Option<String>>>,
    fetch_epoch: Rc<Cell<u64>>,
    pending_ids: Rc<RefCell<HashSet<u32>>>,
}

impl<A: Api> Clone for ContactStore<A> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            contacts: self.contacts.clone(),
            pagination: self.pagination.clone(),
            search_query: self.search_query.clone(),
            current_contact: self.current_contact.clone(),
            loading: self.loading.clone(),
            error: self.error.clone(),
            fetch_epoch: self.fetch_epoch.clone(),
            pending_ids: self.pending_ids.clone(),
        }
    }
}

impl<A: Api> ContactStore<A> {
    pub fn new(api: Rc<A>) -> Self {
        Self {
            api,
            contacts: Rc::new(RefCell::new(Vec::new())),
            pagination: Rc::new(RefCell::new(Pagination::default())),
            search_query: Rc::new(RefCell::new(String::new())),
            current_contact: Rc::new(RefCell::new(None)),
            loading: Rc::new(RefCell::new(false)),
            error: Rc::new(RefCell::new(None)),
            fetch_epoch: Rc::new(Cell::new(0)),
            pending_ids: Rc::new(RefCell::new(HashSet::new())),
        }
    }

    /// Cargar una página de contactos, con filtro opcional.
    /// En éxito reemplaza contacts y pagination por completo; en fallo vacía
    /// contacts y deja pagination/search_query anteriores (viejos pero
    /// consistentes). Una respuesta superada por otro fetch se descarta.
    pub async fn fetch_contacts(&self, page: u32, query: &str) -> bool {
        let epoch = self.fetch_epoch.get().wrapping_add(1);
        self.fetch_epoch.set(epoch);

        self.begin();
        log::info!("📋 Cargando contactos (página {}, filtro {:?})", page, query);

        let mut options = RequestOptions::get().with_query("page", &page.to_string());
        if !query.is_empty() {
            options = options.with_query("q", query);
        }

        let result = self.api.execute::<ContactsResponse>("/contacts", options).await;

        // Respuesta obsoleta: después de este request se pidió otra
        // página/filtro, esa es la única que puede commitear
        if self.fetch_epoch.get() != epoch {
            log::info!("⏭️ Respuesta obsoleta descartada (página {})", page);
            return false;
        }

        match result {
            Ok(rsp) => {
                *self.contacts.borrow_mut() = rsp.data;
                *self.pagination.borrow_mut() = rsp.pagination;
                *self.search_query.borrow_mut() = query.to_string();
                self.finish(None);
                log::info!(
                    "✅ Contactos cargados: {} en página {}",
                    self.contacts.borrow().len(),
                    self.pagination.borrow().current_page
                );
                true
            }
            Err(e) => {
                log::error!("❌ Error cargando contactos: {}", e);
                self.contacts.borrow_mut().clear();
                self.finish(Some(e.to_string()));
                false
            }
        }
    }

    /// Buscar contactos: filtro vacío (o solo espacios) resetea a la página 1
    /// sin filtro; si no, fetch filtrado de página 1
    pub async fn search_contacts(&self, query: &str) -> bool {
        self.fetch_contacts(1, query.trim()).await
    }

    /// Ir a otra página conservando el filtro activo
    pub async fn go_to_page(&self, page: u32) -> bool {
        let query = self.search_query.borrow().clone();
        self.fetch_contacts(page, &query).await
    }

    /// Cargar un contacto para la vista de detalle/edición.
    /// No toca la lista.
    pub async fn get_contact(&self, id: u32) -> Option<Contact> {
        self.begin();

        let endpoint = format!("/contacts/{}", id);
        let result = self
            .api
            .execute::<ContactResponse>(&endpoint, RequestOptions::get())
            .await;

        match result {
            Ok(rsp) => {
                *self.current_contact.borrow_mut() = Some(rsp.data.clone());
                self.finish(None);
                Some(rsp.data)
            }
            Err(e) => {
                log::error!("❌ Error cargando contacto {}: {}", id, e);
                self.finish(Some(e.to_string()));
                None
            }
        }
    }

    /// Crear contacto (multipart, imagen opcional). El registro del servidor
    /// se agrega al final de la lista; los contadores de paginación se
    /// resincronizan recién en el próximo fetch.
    pub async fn create_contact(
        &self,
        fields: &ContactFields,
        image: Option<ImageFile>,
    ) -> Option<Contact> {
        self.begin();
        log::info!("📇 Creando contacto: {}", fields.name);

        let result = self
            .api
            .execute::<ContactResponse>("/contacts", RequestOptions::post_form(fields.to_form(image)))
            .await;

        match result {
            Ok(rsp) => {
                self.contacts.borrow_mut().push(rsp.data.clone());
                self.finish(None);
                log::info!("✅ Contacto creado con id {}", rsp.data.id);
                Some(rsp.data)
            }
            Err(e) => {
                log::error!("❌ Error creando contacto: {}", e);
                self.finish(Some(e.to_string()));
                None
            }
        }
    }

    /// Actualizar contacto (multipart PUT). En éxito reemplaza el elemento
    /// en su misma posición y refresca current_contact si es la misma
    /// entidad; en fallo el registro anterior queda intacto.
    pub async fn update_contact(
        &self,
        id: u32,
        fields: &ContactFields,
        image: Option<ImageFile>,
    ) -> Option<Contact> {
        if !self.begin_mutation(id) {
            return None;
        }

        self.begin();

        let endpoint = format!("/contacts/{}", id);
        let result = self
            .api
            .execute::<ContactResponse>(&endpoint, RequestOptions::put_form(fields.to_form(image)))
            .await;

        self.end_mutation(id);

        match result {
            Ok(rsp) => {
                let updated = rsp.data;
                if let Some(slot) = self.contacts.borrow_mut().iter_mut().find(|c| c.id == id) {
                    *slot = updated.clone();
                }
                {
                    let mut current = self.current_contact.borrow_mut();
                    if current.as_ref().map(|c| c.id) == Some(id) {
                        *current = Some(updated.clone());
                    }
                }
                self.finish(None);
                log::info!("✅ Contacto {} actualizado", id);
                Some(updated)
            }
            Err(e) => {
                log::error!("❌ Error actualizando contacto {}: {}", id, e);
                self.finish(Some(e.to_string()));
                None
            }
        }
    }

    /// Eliminar contacto. En éxito quita exactamente esa entrada y limpia
    /// current_contact si la tenía; en fallo no toca nada.
    pub async fn delete_contact(&self, id: u32) -> bool {
        if !self.begin_mutation(id) {
            return false;
        }

        self.begin();

        let endpoint = format!("/contacts/{}", id);
        let result = self.api.execute::<()>(&endpoint, RequestOptions::delete()).await;

        self.end_mutation(id);

        match result {
            Ok(()) => {
                self.contacts.borrow_mut().retain(|c| c.id != id);
                {
                    let mut current = self.current_contact.borrow_mut();
                    if current.as_ref().map(|c| c.id) == Some(id) {
                        *current = None;
                    }
                }
                self.finish(None);
                log::info!("🗑️ Contacto {} eliminado", id);
                true
            }
            Err(e) => {
                log::error!("❌ Error eliminando contacto {}: {}", id, e);
                self.finish(Some(e.to_string()));
                false
            }
        }
    }

    pub fn has_next_page(&self) -> bool {
        let pagination = self.pagination.borrow();
        pagination.current_page < pagination.last_page
    }

    pub fn has_previous_page(&self) -> bool {
        self.pagination.borrow().current_page > 1
    }

    pub fn get_contacts(&self) -> Vec<Contact> {
        self.contacts.borrow().clone()
    }

    pub fn get_pagination(&self) -> Pagination {
        self.pagination.borrow().clone()
    }

    pub fn get_search_query(&self) -> String {
        self.search_query.borrow().clone()
    }

    pub fn get_current_contact(&self) -> Option<Contact> {
        self.current_contact.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub fn get_error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    /// Guardia por id: rechaza una mutación si ese contacto ya tiene una
    /// operación en vuelo (evita lost updates por ediciones superpuestas)
    fn begin_mutation(&self, id: u32) -> bool {
        if !self.pending_ids.borrow_mut().insert(id) {
            log::warn!("⚠️ Mutación rechazada: contacto {} con operación en vuelo", id);
            *self.error.borrow_mut() =
                Some(format!("Ya hay una operación en curso para el contacto {}", id));
            return false;
        }
        true
    }

    fn end_mutation(&self, id: u32) {
        self.pending_ids.borrow_mut().remove(&id);
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
