//! DOS-style wildcard expansion over a single directory.
//!
//! A filespec is a path whose final component may contain `?` (any
//! single byte) and `*` (zero or more bytes, greedy with
//! backtracking). Earlier components are taken literally. [`Glob`]
//! reads the directory once and yields every entry whose name
//! matches the mask, joined back onto the directory.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("no access to `{0}`")]
  NoAccess(PathBuf),
  #[error("no such file or directory `{0}`")]
  NoSuchFile(PathBuf),
  #[error("filespec has an empty file component")]
  BadParameter,
}

/// What a directory entry turned out to be.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
  Regular,
  Directory,
  Unknown,
}

/// A single match: the entry joined onto the filespec's directory.
#[derive(Clone, Debug)]
pub struct Entry {
  pub path: PathBuf,
  pub kind: EntryKind,
}

/// Match `name` against `mask`. `?` matches any single byte, `*`
/// matches zero or more bytes. Both are matched byte-wise, so the
/// mask applies to whatever encoding the directory uses.
pub fn match_mask(name: &[u8], mask: &[u8]) -> bool {
  let (mut name, mut mask) = (name, mask);
  while let (Some(&n), Some(&m)) = (name.first(), mask.first()) {
    if m == b'*' {
      mask = &mask[1..];
      while !name.is_empty() {
        if match_mask(name, mask) {
          return true;
        }
        name = &name[1..];
      }
      return mask.is_empty();
    } else if n != m && m != b'?' {
      return false;
    }
    name = &name[1..];
    mask = &mask[1..];
  }

  while mask.first() == Some(&b'*') {
    mask = &mask[1..];
  }
  name.is_empty() && mask.is_empty()
}

/// A directory walk filtered by the filespec's final component.
pub struct Glob {
  directory: PathBuf,
  mask: Vec<u8>,
  stream: fs::ReadDir,
}

impl Glob {
  /// Split `filespec` at its last separator and open the directory
  /// half for reading. Fails with [`Error::BadParameter`] when the
  /// file half is empty (`foo/`), and with [`Error::NoAccess`] /
  /// [`Error::NoSuchFile`] when the directory cannot be read.
  pub fn open(filespec: &str) -> Result<Glob> {
    let (directory, mask) = match filespec.rfind('/') {
      Some(slash) => (&filespec[..slash + 1], &filespec[slash + 1..]),
      None => (".", filespec),
    };
    if mask.is_empty() {
      return Err(Error::BadParameter);
    }

    let directory = PathBuf::from(directory);
    let stream = fs::read_dir(&directory).map_err(|e| read_error(e, &directory))?;

    Ok(Glob {
      directory,
      mask: mask.as_bytes().to_vec(),
      stream,
    })
  }
}

impl Iterator for Glob {
  type Item = Result<Entry>;

  fn next(&mut self) -> Option<Self::Item> {
    loop {
      let entry = match self.stream.next()? {
        Ok(entry) => entry,
        Err(e) => return Some(Err(read_error(e, &self.directory))),
      };

      let name = entry.file_name();
      if !match_mask(name.to_string_lossy().as_bytes(), &self.mask) {
        continue;
      }

      let kind = match entry.file_type() {
        Ok(t) if t.is_file() => EntryKind::Regular,
        Ok(t) if t.is_dir() => EntryKind::Directory,
        _ => EntryKind::Unknown,
      };

      return Some(Ok(Entry {
        path: self.directory.join(name),
        kind,
      }));
    }
  }
}

fn read_error(e: std::io::Error, directory: &Path) -> Error {
  match e.kind() {
    std::io::ErrorKind::PermissionDenied => Error::NoAccess(directory.to_path_buf()),
    _ => Error::NoSuchFile(directory.to_path_buf()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn masks() {
    assert!(match_mask(b"zone.conf", b"zone.conf"));
    assert!(match_mask(b"zone.conf", b"*.conf"));
    assert!(match_mask(b"zone.conf", b"zone.*"));
    assert!(match_mask(b"zone.conf", b"*"));
    assert!(match_mask(b"zone.conf", b"z?ne.conf"));
    assert!(match_mask(b"", b"*"));
    assert!(match_mask(b"abc", b"a*b*c"));
    assert!(match_mask(b"abc", b"***"));
    assert!(match_mask(b"a.b.conf", b"*.conf"));

    assert!(!match_mask(b"zone.conf", b"*.con"));
    assert!(!match_mask(b"zone.conf", b"?one"));
    assert!(!match_mask(b"", b"?"));
    assert!(!match_mask(b"abc", b"a*d"));
    assert!(!match_mask(b"abc", b""));
  }

  #[test]
  fn empty_file_component() {
    assert!(matches!(Glob::open("some/dir/"), Err(Error::BadParameter)));
  }

  #[test]
  fn missing_directory() {
    let result = Glob::open("definitely/not/a/real/dir/*.conf");
    assert!(matches!(result, Err(Error::NoSuchFile(_))));
  }

  #[test]
  fn walks_matching_entries() {
    let dir = std::env::temp_dir().join(format!("opal-glob-{}", std::process::id()));
    fs::create_dir_all(dir.join("sub")).unwrap();
    fs::write(dir.join("a.conf"), b"a").unwrap();
    fs::write(dir.join("b.conf"), b"b").unwrap();
    fs::write(dir.join("notes.txt"), b"n").unwrap();

    let filespec = format!("{}/*.conf", dir.display());
    let mut names = Glob::open(&filespec)
      .unwrap()
      .map(|entry| {
        let entry = entry.unwrap();
        assert_eq!(entry.kind, EntryKind::Regular);
        entry.path.file_name().unwrap().to_string_lossy().into_owned()
      })
      .collect::<Vec<_>>();
    names.sort();
    assert_eq!(names, ["a.conf", "b.conf"]);

    let filespec = format!("{}/*", dir.display());
    let all = Glob::open(&filespec).unwrap().count();
    assert_eq!(all, 4);

    fs::remove_dir_all(&dir).unwrap();
  }
}
