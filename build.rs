// Copies the demo page in `static/` to `dist/`; `wasm-pack build --target web
// --out-dir dist/pkg` then drops the bindings next to it.
use std::io;
use std::path::Path;
use std::fs;

fn copy_dir(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if path.is_dir() {
            copy_dir(&path, &dst_path)?;
        } else {
            fs::copy(&path, &dst_path)?;
        }
    }
    Ok(())
}

fn main() {
    println!("cargo:rerun-if-changed=static");

    let static_dir = Path::new("static");
    if !static_dir.exists() {
        return;
    }
    if let Err(err) = copy_dir(static_dir, Path::new("dist")) {
        println!("cargo:warning=failed to copy static site to dist/: {err}");
    }
}
