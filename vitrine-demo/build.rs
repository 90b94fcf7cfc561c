use std::path::Path;

fn main() {
    copy_shared_assets();
}

fn copy_shared_assets() {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let shared_css = Path::new(manifest_dir).join("../vitrine-ui/assets/vitrine.css");
    let local_css = Path::new(manifest_dir).join("assets/vitrine.css");

    println!("cargo:rerun-if-changed={}", shared_css.display());

    if shared_css.exists() {
        std::fs::copy(&shared_css, &local_css).expect("Failed to copy vitrine.css from vitrine-ui");
    }
}
