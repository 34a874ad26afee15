use crate::Error;
use log::debug;
use rustc_hash::FxHashMap;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use zip::result::ZipError;

/// Where the files of a feed are read from
///
/// Only one stream is open at a time: the stream borrows the source, so it must be
/// dropped before the next file is opened.
pub trait FeedSource {
    /// Opens a file of the feed by its name (e.g. `stops.txt`), `None` if the feed has no such file
    fn open<'a>(&'a mut self, file_name: &str) -> Result<Option<Box<dyn Read + 'a>>, Error>;

    /// hex encoded sha256 of the underlying archive, if any
    fn sha256(&self) -> Option<String> {
        None
    }
}

impl<S: FeedSource + ?Sized> FeedSource for &mut S {
    fn open<'a>(&'a mut self, file_name: &str) -> Result<Option<Box<dyn Read + 'a>>, Error> {
        (**self).open(file_name)
    }

    fn sha256(&self) -> Option<String> {
        (**self).sha256()
    }
}

/// A feed stored as plain files in a directory
#[derive(Debug, Clone)]
pub struct DirectorySource {
    path: PathBuf,
}

impl DirectorySource {
    /// Reads the files of `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_owned(),
        }
    }
}

impl FeedSource for DirectorySource {
    fn open<'a>(&'a mut self, file_name: &str) -> Result<Option<Box<dyn Read + 'a>>, Error> {
        match File::open(self.path.join(file_name)) {
            Ok(file) => Ok(Some(Box::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::NamedFileIO {
                file_name: file_name.to_owned(),
                source: Box::new(e),
            }),
        }
    }
}

/// A feed stored as a zip archive
///
/// The archive is only read on the first call to [FeedSource::open], then kept open
/// and shared by every following file until the source is dropped.
/// Files may be nested in a directory of the archive.
pub struct ArchiveSource<R: Read + Seek> {
    // path of the archive, used in errors
    location: String,
    reader: Option<R>,
    archive: Option<zip::ZipArchive<R>>,
    // file name -> full name of the archive entry
    entries: FxHashMap<String, String>,
    sha256: Option<String>,
}

impl ArchiveSource<BufReader<File>> {
    /// Reads the archive at `path`
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let p = path.as_ref();
        let file = File::open(p).map_err(|e| Error::SourceUnavailable {
            path: p.display().to_string(),
            source: e,
        })?;
        let mut source = Self::new(BufReader::new(file));
        source.location = p.display().to_string();
        Ok(source)
    }
}

impl<R: Read + Seek> ArchiveSource<R> {
    /// Reads the archive from any seekable reader, e.g. a [std::io::Cursor] over downloaded bytes
    pub fn new(reader: R) -> Self {
        Self {
            location: "in-memory archive".to_owned(),
            reader: Some(reader),
            archive: None,
            entries: FxHashMap::default(),
            sha256: None,
        }
    }

    /// Names of all the entries of the archive, once it has been opened
    pub fn files(&self) -> Vec<String> {
        self.archive
            .as_ref()
            .map(|a| a.file_names().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    fn unavailable(&self, source: std::io::Error) -> Error {
        Error::SourceUnavailable {
            path: self.location.clone(),
            source,
        }
    }

    fn archive(&mut self) -> Result<&mut zip::ZipArchive<R>, Error> {
        if let Some(mut reader) = self.reader.take() {
            let mut hasher = Sha256::new();
            std::io::copy(&mut reader, &mut hasher).map_err(|e| self.unavailable(e))?;
            self.sha256 = Some(format!("{:x}", hasher.finalize()));
            reader
                .seek(SeekFrom::Start(0))
                .map_err(|e| self.unavailable(e))?;

            let archive = zip::ZipArchive::new(reader).map_err(|e| match e {
                ZipError::Io(e) => self.unavailable(e),
                e => self.unavailable(std::io::Error::new(ErrorKind::InvalidData, e)),
            })?;
            for full_name in archive.file_names() {
                if full_name.ends_with('/') || full_name.starts_with("__MACOSX") {
                    continue;
                }
                let file_name = Path::new(full_name)
                    .file_name()
                    .and_then(|f| f.to_str())
                    .unwrap_or(full_name);
                self.entries
                    .entry(file_name.to_owned())
                    .or_insert_with(|| full_name.to_owned());
            }
            debug!("archive opened with {} entries", archive.len());
            self.archive = Some(archive);
        }
        let location = self.location.clone();
        self.archive
            .as_mut()
            .ok_or_else(|| Error::SourceUnavailable {
                path: location,
                source: std::io::Error::new(ErrorKind::Other, "the archive could not be opened"),
            })
    }
}

impl<R: Read + Seek> FeedSource for ArchiveSource<R> {
    fn open<'a>(&'a mut self, file_name: &str) -> Result<Option<Box<dyn Read + 'a>>, Error> {
        self.archive()?;
        let entry = match self.entries.get(file_name) {
            Some(entry) => entry.clone(),
            None => return Ok(None),
        };
        match self.archive.as_mut() {
            Some(archive) => {
                let file = archive.by_name(&entry)?;
                Ok(Some(Box::new(file)))
            }
            None => Ok(None),
        }
    }

    fn sha256(&self) -> Option<String> {
        self.sha256.clone()
    }
}
