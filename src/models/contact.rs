use serde::{Deserialize, Serialize};

use crate::services::api::{FormField, FormValue, ImageFile};

/// Contacto tal como lo devuelve el backend
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct Contact {
    pub id: u32,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Campos editables de un contacto (payload de create/update).
/// `email` ausente significa "no informado"; nunca se envía vacío.
#[derive(Clone, PartialEq, Debug)]
pub struct ContactFields {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

impl ContactFields {
    /// Construye el payload multipart compartido por create y update:
    /// name, phone, email (opcional) e imagen (opcional)
    pub fn to_form(&self, image: Option<ImageFile>) -> Vec<FormField> {
        let mut fields = vec![
            FormField::text("name", &self.name),
            FormField::text("phone", &self.phone),
        ];

        if let Some(ref email) = self.email {
            fields.push(FormField::text("email", email));
        }

        if let Some(image) = image {
            fields.push(FormField {
                name: "image".to_string(),
                value: FormValue::File {
                    filename: image.filename,
                    mime: image.mime,
                    bytes: image.bytes,
                },
            });
        }

        fields
    }
}

/// Metadatos de paginación del listado de contactos
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct Pagination {
    pub total: u32,
    pub per_page: u32,
    pub current_page: u32,
    pub last_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            total: 0,
            per_page: 10,
            current_page: 1,
            last_page: 1,
        }
    }
}

/// Respuesta de GET /contacts (página + metadatos)
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct ContactsResponse {
    pub data: Vec<Contact>,
    pub pagination: Pagination,
}

/// Respuesta con un único contacto (get/create/update)
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct ContactResponse {
    pub data: Contact,
}
