// Constantes compartidas

/// URL base del backend
/// Configurada en tiempo de compilación via .env (BACKEND_URL):
/// - Desarrollo: http://localhost:8000/api (por defecto)
pub const BACKEND_URL: &str = match option_env!("BACKEND_URL") {
    Some(url) => url,
    None => "http://localhost:8000/api",
};

/// Clave de localStorage donde se persiste el token de sesión.
/// Si la clave no existe, la sesión es anónima.
pub const TOKEN_STORAGE_KEY: &str = "token";
