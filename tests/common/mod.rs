use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::{fixture::ChildPath, prelude::*, TempDir};

pub const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="50" height="50">
  <rect width="50" height="50" fill="#ff0000"/>
</svg>"##;

pub const WIDE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 120 80">
  <rect width="120" height="80" fill="#00ff00"/>
</svg>"##;

pub const MALFORMED: &str = "<svg xmlns=\"http://www.w3.org/2000/svg\"";

pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn write_config(&self, contents: toml::Table) {
        self.dir
            .child("svgpng.toml")
            .write_str(&contents.to_string())
            .unwrap();
    }

    pub fn add_file(&self, file_name: &str, contents: &str) -> ChildPath {
        let file = self.dir.child("input").child(file_name);
        file.write_str(contents).unwrap();
        file
    }

    pub fn output(&self, file_name: &str) -> ChildPath {
        self.dir.child("output").child(file_name)
    }

    pub fn run(&self) -> assert_cmd::Command {
        let mut cmd = cargo_bin_cmd!();
        cmd.current_dir(self.dir.path());
        cmd
    }
}
