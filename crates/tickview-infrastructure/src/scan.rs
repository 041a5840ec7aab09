use std::fs;
use std::path::{Path, PathBuf};
use tickview_domain::ChartDataError;

pub(crate) fn read_dir(path: &Path) -> Result<Vec<fs::DirEntry>, ChartDataError> {
    let io_error = |source| ChartDataError::Io {
        path: path.display().to_string(),
        source,
    };
    fs::read_dir(path)
        .map_err(io_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_error)
}

/// Every visible file below `dir`, in path order.
pub(crate) fn collect_files(dir: &Path) -> Result<Vec<PathBuf>, ChartDataError> {
    let mut out = Vec::new();
    walk(dir, &mut out)?;
    out.sort();
    Ok(out)
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), ChartDataError> {
    for entry in read_dir(dir)? {
        let path = entry.path();
        if visible_name(&path).is_none() {
            continue;
        }
        if path.is_dir() {
            walk(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

/// File name of `path`, or `None` for hidden and non-UTF-8 names.
pub(crate) fn visible_name(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    if name.starts_with('.') {
        return None;
    }
    Some(name.to_string())
}
