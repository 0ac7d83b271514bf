use std::env;
use std::fs;
use std::path::Path;

// Expone BACKEND_URL de .env (si existe) como variable de compilación,
// que utils::constants lee con option_env!
fn main() {
    println!("cargo:rerun-if-changed=.env");
    println!("cargo:rerun-if-changed=build.rs");

    // El entorno real tiene prioridad sobre .env
    if env::var("BACKEND_URL").is_ok() {
        return;
    }

    let Ok(contents) = fs::read_to_string(Path::new(".env")) else {
        return;
    };

    for line in contents.lines() {
        if let Some(value) = line.trim().strip_prefix("BACKEND_URL=") {
            println!("cargo:rustc-env=BACKEND_URL={}", value.trim());
            return;
        }
    }
}
