// ============================================================================
// API - Vocabulario de requests y clasificación de respuestas (stateless)
// ============================================================================
// Único punto de traducción entre el transporte HTTP y la taxonomía de
// errores de los stores; los stores nunca inspeccionan respuestas crudas.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Celda compartida con el token de sesión. La escribe únicamente el
/// SessionStore; el ApiClient solo la lee para el header Authorization.
pub type TokenCell = Rc<RefCell<Option<String>>>;

/// Error normalizado de la capa de red
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Fallo de transporte: no hubo respuesta del servidor
    #[error("{0}")]
    Network(String),
    /// Respuesta no-2xx, con el mensaje del servidor si era parseable
    #[error("{message}")]
    Http { status: u16, message: String },
    /// Cuerpo presente pero no es JSON válido
    #[error("{0}")]
    Parse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// Valor de un campo multipart: texto o archivo binario
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File {
        filename: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

/// Campo de un payload multipart
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    pub value: FormValue,
}

impl FormField {
    pub fn text(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: FormValue::Text(value.to_string()),
        }
    }
}

/// Imagen producida por el recortador: un blob binario opaco
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub filename: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    None,
    Json(serde_json::Value),
    Multipart(Vec<FormField>),
}

/// Opciones de un request: método, cuerpo, query y headers del caller
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub body: RequestBody,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    fn with_method(method: Method, body: RequestBody) -> Self {
        Self {
            method,
            body,
            query: Vec::new(),
            headers: Vec::new(),
        }
    }

    pub fn get() -> Self {
        Self::with_method(Method::Get, RequestBody::None)
    }

    pub fn delete() -> Self {
        Self::with_method(Method::Delete, RequestBody::None)
    }

    /// POST sin cuerpo (logout)
    pub fn post() -> Self {
        Self::with_method(Method::Post, RequestBody::None)
    }

    pub fn post_json(value: serde_json::Value) -> Self {
        Self::with_method(Method::Post, RequestBody::Json(value))
    }

    pub fn post_form(fields: Vec<FormField>) -> Self {
        Self::with_method(Method::Post, RequestBody::Multipart(fields))
    }

    pub fn put_form(fields: Vec<FormField>) -> Self {
        Self::with_method(Method::Put, RequestBody::Multipart(fields))
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }
}

/// Ejecutor de requests: el único seam entre stores y transporte.
/// Los stores son genéricos sobre este trait para poder testearse con dobles.
#[allow(async_fn_in_trait)]
pub trait Api {
    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError>;
}

/// Endpoints públicos: login y registro no llevan header Authorization
pub(crate) fn is_public_endpoint(endpoint: &str) -> bool {
    endpoint.starts_with("/auth/login") || endpoint.starts_with("/auth/register")
}

/// Headers efectivos de un request, en orden de aplicación. El transporte
/// hace set de cada uno y el último gana, así los del caller (al final)
/// tienen precedencia sobre los calculados:
/// - Content-Type JSON solo para cuerpos JSON; con multipart fetch pone
///   el suyo con el boundary
/// - Authorization Bearer si hay token y el endpoint no es público
pub(crate) fn computed_headers(
    endpoint: &str,
    options: &RequestOptions,
    token: Option<&str>,
) -> Vec<(String, String)> {
    let mut headers = Vec::new();

    if matches!(options.body, RequestBody::Json(_)) {
        headers.push(("Content-Type".to_string(), "application/json".to_string()));
    }

    if let Some(token) = token {
        if !is_public_endpoint(endpoint) {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }
    }

    headers.extend(options.headers.iter().cloned());
    headers
}

/// Clasifica una respuesta HTTP ya leída (status + cuerpo en texto).
/// - 204/205 o cuerpo vacío -> resultado vacío, sin intentar parsear
/// - 2xx con cuerpo -> JSON o ParseError
/// - no-2xx -> HttpError con el mensaje del servidor si es extraíble
pub(crate) fn classify_response<T: DeserializeOwned>(
    status: u16,
    body: &str,
) -> Result<T, ApiError> {
    if !(200..300).contains(&status) {
        return Err(ApiError::Http {
            status,
            message: error_message(status, body),
        });
    }

    if status == 204 || status == 205 || body.trim().is_empty() {
        return empty_result();
    }

    serde_json::from_str(body)
        .map_err(|e| ApiError::Parse(format!("Error parseando respuesta: {}", e)))
}

fn empty_result<T: DeserializeOwned>() -> Result<T, ApiError> {
    serde_json::from_value(serde_json::Value::Null)
        .map_err(|e| ApiError::Parse(format!("Respuesta vacía inesperada: {}", e)))
}

/// Extrae un mensaje legible del cuerpo de error: primero el campo `error`,
/// después `message`; si no hay JSON o ningún campo, mensaje genérico con el
/// código de estado
fn error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = value.get("error").and_then(|v| v.as_str()) {
            return msg.to_string();
        }
        if let Some(msg) = value.get("message").and_then(|v| v.as_str()) {
            return msg.to_string();
        }
    }

    format!("Error HTTP {}", status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(serde::Deserialize, Debug, PartialEq)]
    struct Payload {
        value: u32,
    }

    #[test]
    fn respuesta_2xx_con_json_se_parsea() {
        let result = classify_response::<Payload>(200, r#"{"value": 7}"#);
        assert_eq!(result.unwrap(), Payload { value: 7 });
    }

    #[test]
    fn status_204_devuelve_resultado_vacio_sin_parsear() {
        // El cuerpo se ignora por completo en 204/205
        let result = classify_response::<()>(204, "esto no es json");
        assert_eq!(result.unwrap(), ());
        let result = classify_response::<()>(205, "");
        assert_eq!(result.unwrap(), ());
    }

    #[test]
    fn cuerpo_vacio_en_2xx_devuelve_resultado_vacio() {
        let result = classify_response::<Option<Payload>>(200, "   ");
        assert_eq!(result.unwrap(), None);
    }

    #[test]
    fn json_invalido_en_2xx_es_parse_error() {
        let result = classify_response::<Payload>(200, "{no-json");
        assert!(matches!(result, Err(ApiError::Parse(_))));
    }

    #[test]
    fn error_http_usa_el_campo_error_antes_que_message() {
        let body = json!({ "error": "Sin permisos", "message": "otro" }).to_string();
        let result = classify_response::<Payload>(403, &body);
        assert_eq!(
            result,
            Err(ApiError::Http {
                status: 403,
                message: "Sin permisos".to_string()
            })
        );
    }

    #[test]
    fn error_http_cae_al_campo_message() {
        let body = json!({ "message": "No encontrado" }).to_string();
        let result = classify_response::<Payload>(404, &body);
        assert_eq!(
            result,
            Err(ApiError::Http {
                status: 404,
                message: "No encontrado".to_string()
            })
        );
    }

    #[test]
    fn error_http_sin_mensaje_usa_el_codigo_de_estado() {
        let result = classify_response::<Payload>(500, "<html>boom</html>");
        assert_eq!(
            result,
            Err(ApiError::Http {
                status: 500,
                message: "Error HTTP 500".to_string()
            })
        );

        // Campo presente pero no string: también cae al genérico
        let body = json!({ "error": { "code": 3 } }).to_string();
        let result = classify_response::<Payload>(422, &body);
        assert_eq!(
            result,
            Err(ApiError::Http {
                status: 422,
                message: "Error HTTP 422".to_string()
            })
        );
    }

    #[test]
    fn content_type_json_solo_para_cuerpos_json() {
        let json_body = RequestOptions::post_json(json!({}));
        assert_eq!(
            computed_headers("/contacts", &json_body, None),
            vec![("Content-Type".to_string(), "application/json".to_string())]
        );

        // Multipart y sin cuerpo: el Content-Type lo decide fetch
        let form = RequestOptions::post_form(vec![]);
        assert!(computed_headers("/contacts", &form, None).is_empty());
        assert!(computed_headers("/contacts", &RequestOptions::get(), None).is_empty());
    }

    #[test]
    fn authorization_bearer_solo_con_token_y_endpoint_privado() {
        let options = RequestOptions::get();

        assert_eq!(
            computed_headers("/contacts", &options, Some("tok-1")),
            vec![("Authorization".to_string(), "Bearer tok-1".to_string())]
        );
        // Endpoint público: nunca viaja el token
        assert!(computed_headers("/auth/login", &options, Some("tok-1")).is_empty());
        // Sin token no hay header aunque el endpoint sea privado
        assert!(computed_headers("/auth/me", &options, None).is_empty());
    }

    #[test]
    fn headers_del_caller_van_al_final_y_tienen_precedencia() {
        let options =
            RequestOptions::post_json(json!({})).with_header("Content-Type", "text/plain");
        let headers = computed_headers("/contacts", &options, Some("tok-1"));

        assert_eq!(
            headers,
            vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Authorization".to_string(), "Bearer tok-1".to_string()),
                ("Content-Type".to_string(), "text/plain".to_string()),
            ]
        );
    }

    #[test]
    fn login_y_registro_son_endpoints_publicos() {
        assert!(is_public_endpoint("/auth/login"));
        assert!(is_public_endpoint("/auth/register"));
        assert!(!is_public_endpoint("/auth/logout"));
        assert!(!is_public_endpoint("/auth/me"));
        assert!(!is_public_endpoint("/contacts"));
    }
}
