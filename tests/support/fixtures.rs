//! Archive, index page, and installer fixtures.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use download_tarball::install::{InstallError, InstallPlan, Installer};
use flate2::Compression;
use flate2::write::GzEncoder;
use zip::write::SimpleFileOptions;

/// Builds a gzip-compressed tarball with `files` under `root/`.
pub fn tarball_bytes(root: &str, files: &[(&str, &[u8])]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, data) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, format!("{root}/{name}"), *data)
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// Builds a zip archive with `files` under `root/`.
pub fn zip_bytes(root: &str, files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in files {
        writer
            .start_file(format!("{root}/{name}"), SimpleFileOptions::default())
            .unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Renders a minimal index page with one anchor per href.
pub fn index_page(hrefs: &[&str]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!("      <a href=\"{href}\">{href}</a>\n"))
        .collect();
    format!("<html>\n  <body>\n    <div id=\"files\">\n{anchors}    </div>\n  </body>\n</html>\n")
}

/// One recorded `Installer::install` call.
#[derive(Debug, Clone)]
pub struct InstallCall {
    pub root: PathBuf,
    pub plan: InstallPlan,
    pub setup_present: bool,
}

/// Records install calls instead of spawning processes.
#[derive(Debug, Default)]
pub struct RecordingInstaller {
    calls: Mutex<Vec<InstallCall>>,
    fail_for: Vec<String>,
}

impl RecordingInstaller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails installs whose root directory name starts with any of `prefixes`.
    pub fn failing_for(prefixes: &[&str]) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_for: prefixes.iter().map(|p| (*p).to_string()).collect(),
        }
    }

    pub fn calls(&self) -> Vec<InstallCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Installer for RecordingInstaller {
    async fn install(&self, plan: &InstallPlan, root: &Path) -> Result<(), InstallError> {
        self.calls.lock().unwrap().push(InstallCall {
            root: root.to_path_buf(),
            plan: plan.clone(),
            setup_present: root.join("setup.py").is_file(),
        });

        let dir_name = root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.fail_for.iter().any(|prefix| dir_name.starts_with(prefix)) {
            return Err(InstallError::BuildFailed {
                command: plan
                    .commands
                    .last()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
                code: Some(1),
            });
        }
        Ok(())
    }
}
