use std::path::{Path, PathBuf};

pub const INTAKE_DIR: &str = ".intake";
pub const CONFIG_FILE: &str = "config.yaml";

pub fn intake_dir(root: &Path) -> PathBuf {
    root.join(INTAKE_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    intake_dir(root).join(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_layout() {
        let p = config_path(Path::new("/work"));
        assert_eq!(p, PathBuf::from("/work/.intake/config.yaml"));
    }
}
