// Helper de teléfonos - utilidades puras de formateo/validación (formato BR)

/// Elimina todo lo que no sea dígito
pub fn sanitize_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Formatea un teléfono para mostrar: (xx) xxxxx-xxxx con 11 dígitos,
/// (xx) xxxx-xxxx con 10; en otro caso devuelve solo los dígitos
pub fn format_phone_display(phone: &str) -> String {
    let cleaned = sanitize_phone(phone);

    match cleaned.len() {
        11 => format!("({}) {}-{}", &cleaned[..2], &cleaned[2..7], &cleaned[7..]),
        10 => format!("({}) {}-{}", &cleaned[..2], &cleaned[2..6], &cleaned[6..]),
        _ => cleaned,
    }
}

/// Un teléfono es válido con entre 10 y 20 dígitos
pub fn validate_phone(phone: &str) -> bool {
    let len = sanitize_phone(phone).len();
    (10..=20).contains(&len)
}
