// File Chooser Control
// Button-like control that picks a file matching an accept filter

use std::path::{Path, PathBuf};

use super::file_callback;
use crate::core::{ControlData, ControlEntry, ControlKind, Panel, PanelError, PanelResult, ValueCallback};
use crate::utilities::AcceptFilter;

const FILE_CHOOSER: &[ControlKind] = &[ControlKind::FileChooser];

/// Label used when the caller passes an empty one
pub const DEFAULT_CHOOSER_LABEL: &str = "Choose a file...";

impl Panel {
    pub(crate) fn insert_file_chooser(
        &mut self,
        title: &str,
        label: &str,
        filter: &str,
        callback: Option<ValueCallback>,
    ) -> PanelResult<&mut Self> {
        let label = if label.trim().is_empty() {
            DEFAULT_CHOOSER_LABEL.to_string()
        } else {
            label.to_string()
        };
        let entry = ControlEntry::new(
            title,
            ControlKind::FileChooser,
            ControlData::FileChooser {
                label,
                filter: filter.to_string(),
                chosen: None,
            },
        )
        .with_callback(callback);
        self.register(entry)
    }

    /// Add a file chooser; `filter` is an accept list such as `"*.png, .jpg"` or `"image/*"`
    pub fn add_file_chooser<F>(&mut self, title: &str, label: &str, filter: &str, callback: F) -> PanelResult<&mut Self>
    where
        F: FnMut(&Path) + 'static,
    {
        self.insert_file_chooser(title, label, filter, Some(file_callback(callback)))
    }

    pub fn get_chosen_file(&self, title: &str) -> PanelResult<Option<PathBuf>> {
        match self.control_of(title, FILE_CHOOSER)?.data() {
            ControlData::FileChooser { chosen, .. } => Ok(chosen.clone()),
            _ => unreachable!("file choosers always carry chooser data"),
        }
    }

    /// Parsed accept filter of a chooser
    pub fn accept_filter(&self, title: &str) -> PanelResult<AcceptFilter> {
        match self.control_of(title, FILE_CHOOSER)?.data() {
            ControlData::FileChooser { filter, .. } => Ok(AcceptFilter::parse(filter)),
            _ => unreachable!("file choosers always carry chooser data"),
        }
    }

    /// Record a chosen file; paths the filter rejects fail with `InvalidValue`
    pub fn choose_file<P: AsRef<Path>>(&mut self, title: &str, path: P) -> PanelResult<&mut Self> {
        let path = path.as_ref();
        self.check_accepts(title, path)?;
        let entry = self.control_of_mut(title, FILE_CHOOSER)?;
        if let ControlData::FileChooser { chosen, .. } = &mut entry.data {
            *chosen = Some(path.to_path_buf());
        }
        self.notify(title);
        Ok(self)
    }

    pub(crate) fn check_accepts(&self, title: &str, path: &Path) -> PanelResult<()> {
        if self.accept_filter(title)?.accepts(path) {
            Ok(())
        } else {
            Err(PanelError::invalid_value(
                title,
                format!("{} does not match the accept filter", path.display()),
            ))
        }
    }

    /// Files under `dir` the chooser would accept, sorted
    pub fn list_file_candidates(&self, title: &str, dir: &Path) -> PanelResult<Vec<PathBuf>> {
        let filter = self.accept_filter(title)?;
        if !dir.is_dir() {
            return Err(PanelError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} is not a directory", dir.display()),
            )));
        }

        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !is_hidden(e.path(), dir))
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && filter.accepts(e.path()))
            .map(|e| e.into_path())
            .collect();
        files.sort();
        Ok(files)
    }
}

/// Dot-files and dot-directories below the root are skipped
fn is_hidden(path: &Path, root: &Path) -> bool {
    path != root
        && path
            .file_name()
            .map(|n| n.to_string_lossy().starts_with('.'))
            .unwrap_or(false)
}
