//! Populating the file set: discovery and explicit additions.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::Build;
use crate::config::FindOptions;
use crate::error::{BuildError, Result};
use crate::fileset::EntryKey;
use crate::utils::path::{normalize_path, resolve_path};
use crate::utils::walk::list_files;
use crate::{debug, log};

impl Build {
    /// Discover files and load them into the file set.
    ///
    /// `paths` are added to the search paths first; that change outlives the
    /// call. With `detect`, the dependency finder decides which files are
    /// loaded and `pattern`/`filter` are not consulted. Otherwise the search
    /// root is listed and each path must match `pattern` and not `filter`.
    ///
    /// Relative `root` and `paths` resolve against the pipeline root.
    pub fn find(&mut self, options: &FindOptions) -> Result<&mut Self> {
        for path in &options.paths {
            let path = resolve_path(path, &self.root);
            if !self.search_paths.contains(&path) {
                self.search_paths.push(path);
            }
        }

        let paths = match &options.detect {
            Some(detect) => self.finder.find(detect, &self.search_paths)?,
            None => {
                let root = options
                    .root
                    .as_deref()
                    .map_or_else(|| self.root.clone(), |root| resolve_path(root, &self.root));
                list_files(&root, None, options.rec)
                    .map_err(|err| BuildError::io(&root, err))?
                    .into_iter()
                    .filter(|path| options.accepts(&path.to_string_lossy()))
                    .collect()
            }
        };

        for path in &paths {
            let content = fs::read(path).map_err(|err| BuildError::io(path, err))?;
            debug!("find"; "{}", path.display());
            self.files.insert(EntryKey::rooted(path), content);
        }

        log!("find"; "{} files", paths.len());
        Ok(self)
    }

    /// Discover with the pipeline-level `[find]` settings.
    pub fn find_defaults(&mut self) -> Result<&mut Self> {
        let options = self.config.find.clone();
        self.find(&options)
    }

    /// Add one file under a chosen logical directory.
    ///
    /// The key is `<dir>/<file name>`, where `dir` is `target_dir` if given,
    /// else the file's own directory when it lies under the root, else the
    /// root. Relative paths resolve against the current directory.
    pub fn add(&mut self, path: impl AsRef<Path>, target_dir: Option<&Path>) -> Result<&mut Self> {
        let source = normalize_path(path.as_ref());
        let name = source.file_name().ok_or_else(|| {
            BuildError::io(
                &source,
                io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
            )
        })?;

        let dir = match target_dir {
            Some(dir) => normalize_path(dir),
            None if source.starts_with(&self.root) => source
                .parent()
                .map_or_else(|| self.root.clone(), Path::to_path_buf),
            None => self.root.clone(),
        };
        let key = EntryKey::rooted(dir.join(name));

        let content = fs::read(&source).map_err(|err| BuildError::io(&source, err))?;
        debug!("add"; "{} -> {}", source.display(), key);
        self.files.insert(key, content);
        Ok(self)
    }

    /// Add several files, in order, with the same target directory.
    pub fn add_all<I, P>(&mut self, paths: I, target_dir: Option<&Path>) -> Result<&mut Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        for path in paths {
            self.add(path.into(), target_dir)?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Detect, Pattern};
    use crate::deps::DependencyFinder;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("js/lib")).unwrap();
        fs::create_dir_all(root.join("css")).unwrap();
        fs::write(root.join("js/app.js"), "app").unwrap();
        fs::write(root.join("js/lib/util.js"), "util").unwrap();
        fs::write(root.join("js/app.test.js"), "test").unwrap();
        fs::write(root.join("css/site.css"), "body{}").unwrap();
        fs::write(root.join("README"), "no extension").unwrap();
        dir
    }

    fn keys(build: &Build) -> Vec<PathBuf> {
        build
            .files()
            .sorted_keys()
            .iter()
            .map(|key| key.path().strip_prefix(build.root()).unwrap().to_path_buf())
            .collect()
    }

    #[test]
    fn test_find_default_pattern() {
        let dir = fixture();
        let mut build = Build::new(dir.path()).unwrap();
        build.find(&FindOptions::default()).unwrap();

        assert_eq!(
            keys(&build),
            ["css/site.css", "js/app.js", "js/app.test.js", "js/lib/util.js"].map(PathBuf::from)
        );
        let key = EntryKey::rooted(dir.path().join("css/site.css"));
        assert_eq!(build.files().get(&key), Some(&b"body{}"[..]));
    }

    #[test]
    fn test_find_pattern_and_filter() {
        let dir = fixture();
        let mut build = Build::new(dir.path()).unwrap();
        let options = FindOptions::default()
            .with_pattern(Some(Pattern::new(r"\.js$").unwrap()))
            .with_filter(Some(Pattern::new(r"\.test\.js$").unwrap()));
        build.find(&options).unwrap();

        assert_eq!(keys(&build), ["js/app.js", "js/lib/util.js"].map(PathBuf::from));
    }

    #[test]
    fn test_find_flat_with_root() {
        let dir = fixture();
        let mut build = Build::new(dir.path()).unwrap();
        build
            .find(&FindOptions::default().with_root("js").recursive(false))
            .unwrap();

        assert_eq!(keys(&build), ["js/app.js", "js/app.test.js"].map(PathBuf::from));
    }

    #[test]
    fn test_find_missing_root_is_io_error() {
        let dir = fixture();
        let mut build = Build::new(dir.path()).unwrap();
        let err = build
            .find(&FindOptions::default().with_root("nope"))
            .unwrap_err();
        assert!(matches!(err, BuildError::Io { .. }));
    }

    #[test]
    fn test_find_is_idempotent() {
        let dir = fixture();
        let mut first = Build::new(dir.path()).unwrap();
        first.find_defaults().unwrap();
        let snapshot: Vec<_> = first
            .files()
            .sorted_keys()
            .into_iter()
            .map(|key| (first.files().get(&key).unwrap().to_vec(), key))
            .collect();

        first.find_defaults().unwrap();
        let again: Vec<_> = first
            .files()
            .sorted_keys()
            .into_iter()
            .map(|key| (first.files().get(&key).unwrap().to_vec(), key))
            .collect();
        assert_eq!(snapshot, again);
        assert_eq!(first.search_paths().len(), 1);
    }

    #[test]
    fn test_find_paths_extend_search_paths() {
        let dir = fixture();
        let mut build = Build::new(dir.path()).unwrap();
        let options = FindOptions::default().with_paths(["js/lib", "js/lib"]);
        build.find(&options).unwrap();
        build.find(&options).unwrap();

        assert_eq!(
            build.search_paths(),
            [dir.path().to_path_buf(), dir.path().join("js/lib")]
        );
    }

    /// Returns a fixed list, whatever it is asked for.
    #[derive(Debug)]
    struct FixedFinder(Vec<PathBuf>);

    impl DependencyFinder for FixedFinder {
        fn find(&self, _detect: &Detect, _search_paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_detect_results_are_not_filtered() {
        // Detection is authoritative: pattern and filter only apply to
        // directory listing, never to what the finder returns.
        let dir = fixture();
        let test_file = dir.path().join("js/app.test.js");
        let readme = dir.path().join("README");
        let mut build = Build::new(dir.path())
            .unwrap()
            .with_finder(FixedFinder(vec![test_file.clone(), readme.clone()]));

        let options = FindOptions::default()
            .with_detect(Detect::new(["app"]))
            .with_pattern(Some(Pattern::new(r"\.css$").unwrap()))
            .with_filter(Some(Pattern::new(r"\.test\.js$").unwrap()));
        build.find(&options).unwrap();

        assert_eq!(build.files().len(), 2);
        assert!(build.files().contains(&EntryKey::rooted(&test_file)));
        assert!(build.files().contains(&EntryKey::rooted(&readme)));
    }

    #[test]
    fn test_detect_with_require_finder() {
        let dir = fixture();
        fs::write(dir.path().join("js/main.js"), "require('./app');").unwrap();
        let mut build = Build::new(dir.path()).unwrap();
        build
            .find(
                &FindOptions::default()
                    .with_detect(Detect::new(["main"]))
                    .with_paths(["js"]),
            )
            .unwrap();

        assert_eq!(keys(&build), ["js/app.js", "js/main.js"].map(PathBuf::from));
    }

    #[test]
    fn test_add_out_of_root() {
        let site = fixture();
        let vendor = TempDir::new().unwrap();
        let lib = vendor.path().join("jquery.js");
        fs::write(&lib, "jq").unwrap();

        let mut build = Build::new(site.path()).unwrap();
        build.add(&lib, None).unwrap();
        let key = EntryKey::rooted(site.path().join("jquery.js"));
        assert_eq!(build.files().get(&key), Some(&b"jq"[..]));

        let vendor_dir = site.path().join("js/vendor");
        build.add(&lib, Some(vendor_dir.as_path())).unwrap();
        let key = EntryKey::rooted(site.path().join("js/vendor/jquery.js"));
        assert!(build.files().contains(&key));
    }

    #[test]
    fn test_add_relative_source_and_target() {
        let site = fixture();
        let cwd = std::env::current_dir().unwrap();
        let vendor = tempfile::Builder::new()
            .prefix("kiln-vendor")
            .tempdir_in(&cwd)
            .unwrap();
        fs::write(vendor.path().join("lodash.js"), "lo").unwrap();

        let vendor_name = vendor.path().file_name().unwrap();
        let source = Path::new(vendor_name).join("lodash.js");
        let target = Path::new("out/vendor");

        let mut build = Build::new(site.path()).unwrap();
        build.add(&source, Some(target)).unwrap();

        let key = EntryKey::rooted(cwd.join("out/vendor").join("lodash.js"));
        assert_eq!(build.files().get(&key), Some(&b"lo"[..]));
        assert_eq!(build.files().len(), 1);
    }

    #[test]
    fn test_add_in_root_keeps_directory() {
        let dir = fixture();
        let mut build = Build::new(dir.path()).unwrap();
        build
            .add_all(
                [dir.path().join("js/lib/util.js"), dir.path().join("css/site.css")],
                None,
            )
            .unwrap();

        assert_eq!(keys(&build), ["css/site.css", "js/lib/util.js"].map(PathBuf::from));
    }

    #[test]
    fn test_add_missing_file() {
        let dir = fixture();
        let mut build = Build::new(dir.path()).unwrap();
        let err = build.add(dir.path().join("missing.js"), None).unwrap_err();
        assert!(matches!(err, BuildError::Io { .. }));
        assert!(build.files().is_empty());
    }
}
