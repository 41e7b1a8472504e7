//! Shell-script fixtures for tests that spawn processes

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Write `body` as an executable `/bin/sh` script at `dir/name`.
///
/// The file is written by a short-lived `sh` child, never through a handle
/// in this process: a write handle inherited by a concurrent test's fork
/// makes exec fail with ETXTBSY.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    let mut child = Command::new("/bin/sh")
        .arg("-c")
        .arg(r#"cat > "$1" && chmod 755 "$1""#)
        .arg("sh")
        .arg(&path)
        .stdin(Stdio::piped())
        .spawn()
        .unwrap();

    let mut stdin = child.stdin.take().unwrap();
    stdin
        .write_all(format!("#!/bin/sh\n{body}\n").as_bytes())
        .unwrap();
    drop(stdin);

    assert!(child.wait().unwrap().success(), "failed to write {}", path.display());
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    #[test]
    fn test_write_script() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_script(dir.path(), "hello", "echo hi");

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "#!/bin/sh\necho hi\n");
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);

        let output = Command::new(&path).output().unwrap();
        assert_eq!(String::from_utf8_lossy(&output.stdout), "hi\n");
    }
}
