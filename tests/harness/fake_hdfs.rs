use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tempfile::TempDir;

/// Stand-in for the `hdfs` client that serves `dfs` commands from the local filesystem.
pub struct FakeHdfs {
    pub root: TempDir,
    pub program: PathBuf,
    pub log_file: PathBuf,
}

impl FakeHdfs {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir for fake hdfs");
        let bin_dir = root.path().join("bin");
        fs::create_dir_all(&bin_dir).expect("Failed to create bin dir");
        let log_file = root.path().join("hdfs.log");
        let program = bin_dir.join("hdfs");

        // The target path is always the last argument.
        let script_content = format!(
            r#"#!/bin/sh
echo "$@" >> "{}"

for target; do :; done

if [ "$1" != "dfs" ]; then
    echo "unknown command $1" >&2
    exit 1
fi

case "$2" in
    -ls)
        if [ ! -e "$target" ]; then
            echo "ls: \`$target': No such file or directory" >&2
            exit 1
        fi
        ls -1A "$target" | while read -r name; do
            echo "$target/$name"
        done
        ;;
    -stat)
        stat -c '%F|%s|%Y000' "$target" || exit 1
        ;;
    -rm)
        rm -rf "$target"
        ;;
    -rmdir)
        rmdir "$target" || exit 1
        ;;
    *)
        echo "unsupported dfs option $2" >&2
        exit 1
        ;;
esac

exit 0
"#,
            log_file.to_string_lossy()
        );

        fs::write(&program, script_content).expect("Failed to write hdfs script");

        let mut perms = fs::metadata(&program).expect("Failed to get metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&program, perms).expect("Failed to set permissions");

        Self { root, program, log_file }
    }

    pub fn get_log(&self) -> String {
        fs::read_to_string(&self.log_file).unwrap_or_default()
    }
}
