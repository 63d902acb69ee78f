use std::fs;
use std::io::{self, Read};
use std::path::Path;

pub fn load_script(path: &Path) -> Result<String, io::Error> {
    fs::read_to_string(path)
}

/// Read a message from `path`, or from stdin when `path` is `-`.
pub fn load_message(path: &Path) -> Result<Vec<u8>, io::Error> {
    if path.as_os_str() == "-" {
        let mut raw = Vec::new();
        io::stdin().lock().read_to_end(&mut raw)?;
        return Ok(raw);
    }
    fs::read(path)
}
