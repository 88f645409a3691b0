use std::fs;
use std::io::Read;
use std::path::Path;

const ELF_MAGIC: [u8; 4] = [0x7f, b'E', b'L', b'F'];

/// Decide whether an installed file should get the executable mode.
///
/// ELF magic bytes win regardless of extension; otherwise a file with no
/// extension, or a `.bin`/`.exe` extension, is treated as executable. Any
/// open/read failure (including an empty file) classifies as
/// non-executable, failing toward the more restrictive mode.
///
/// This is a heuristic for choosing a permission mode, not a binary-format
/// parser: PE and Mach-O headers and shebang scripts are not detected.
pub fn is_executable_artifact(path: &Path) -> bool {
    let mut file = match fs::File::open(path) {
        Ok(file) => file,
        Err(_) => return false,
    };

    let mut header = [0u8; 4];
    let read = match file.read(&mut header) {
        Ok(read) => read,
        Err(_) => return false,
    };
    if read == 0 {
        return false;
    }
    if read == header.len() && header == ELF_MAGIC {
        return true;
    }

    match path.extension().and_then(|ext| ext.to_str()) {
        None => true,
        Some(ext) => {
            let ext = ext.to_ascii_lowercase();
            ext == "bin" || ext == "exe"
        }
    }
}
