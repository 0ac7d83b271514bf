// ============================================================================
// API CLIENT - SOLO COMUNICACIÓN HTTP (Stateless)
// ============================================================================
// NO tiene lógica de negocio: arma el request (headers, query, cuerpo),
// lo envía con gloo-net y normaliza respuesta/errores via classify_response.
// ============================================================================

use gloo_net::http::{Request, RequestBuilder};

use crate::services::api::{
    classify_response, computed_headers, Api, ApiError, FormField, FormValue, Method, RequestBody,
    RequestOptions, TokenCell,
};
use crate::utils::constants::BACKEND_URL;

/// Cliente API sobre fetch - SOLO comunicación HTTP
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    token: TokenCell,
}

impl ApiClient {
    pub fn new(token: TokenCell) -> Self {
        Self::with_base_url(BACKEND_URL, token)
    }

    pub fn with_base_url(base_url: &str, token: TokenCell) -> Self {
        Self {
            base_url: base_url.to_string(),
            token,
        }
    }
}

impl Api for ApiClient {
    async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut builder = match options.method {
            Method::Get => Request::get(&url),
            Method::Post => Request::post(&url),
            Method::Put => Request::put(&url),
            Method::Delete => Request::delete(&url),
        };

        if !options.query.is_empty() {
            builder = builder.query(options.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        builder = self.assemble_headers(builder, endpoint, &options);

        let request = match options.body {
            RequestBody::None => builder.build(),
            RequestBody::Json(value) => {
                let json = serde_json::to_string(&value)
                    .map_err(|e| ApiError::Parse(format!("Error serializando request: {}", e)))?;
                builder.body(json)
            }
            RequestBody::Multipart(ref fields) => builder.body(to_form_data(fields)?),
        }
        .map_err(|e| ApiError::Network(format!("Error construyendo request: {}", e)))?;

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("Error de red: {}", e)))?;

        let status = response.status();
        if status == 204 || status == 205 {
            return classify_response(status, "");
        }

        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("Error leyendo respuesta: {}", e)))?;

        classify_response(status, &text)
    }
}

impl ApiClient {
    /// Aplica los headers que decide computed_headers; header() hace set,
    /// así el orden calculados-primero / caller-último da la precedencia
    fn assemble_headers(
        &self,
        mut builder: RequestBuilder,
        endpoint: &str,
        options: &RequestOptions,
    ) -> RequestBuilder {
        let token = self.token.borrow().clone();
        for (key, value) in computed_headers(endpoint, options, token.as_deref()) {
            builder = builder.header(&key, &value);
        }
        builder
    }
}

/// Convierte el payload multipart a FormData del navegador;
/// los archivos se adjuntan como Blob con su mime type y filename
fn to_form_data(fields: &[FormField]) -> Result<web_sys::FormData, ApiError> {
    let form = web_sys::FormData::new()
        .map_err(|_| ApiError::Network("Error creando FormData".to_string()))?;

    for field in fields {
        match &field.value {
            FormValue::Text(value) => form.append_with_str(&field.name, value),
            FormValue::File {
                filename,
                mime,
                bytes,
            } => {
                let array = js_sys::Uint8Array::from(bytes.as_slice());
                let parts = js_sys::Array::of1(&array);
                let props = web_sys::BlobPropertyBag::new();
                props.set_type(mime);
                let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &props)
                    .map_err(|_| ApiError::Network("Error creando blob de imagen".to_string()))?;
                form.append_with_blob_and_filename(&field.name, &blob, filename)
            }
        }
        .map_err(|_| ApiError::Network("Error armando payload multipart".to_string()))?;
    }

    Ok(form)
}
