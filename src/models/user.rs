use serde::{Deserialize, Serialize};

/// Perfil de usuario autenticado
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Respuesta de login / registro: token + usuario
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Respuesta de GET /auth/me
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct UserResponse {
    pub data: User,
}
