//! # File I/O Module
//!
//! Encoding-aware reading and atomic writing of source files.
//!
//! A file is read into a [`DecodedFile`]: the decoded text plus a
//! [`FileEnvelope`] recording the byte-order mark, encoding, newline style and
//! shebang seen at read time. Writing re-encodes with the same envelope, so a
//! header insertion changes nothing but the header bytes.

use std::fmt;
use std::fs;
use std::io::{self, Read as _, Write as _};
use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};
use tracing::{debug, trace, warn};

use super::content_transformer::{NewlineStyle, detect_newline_style, extract_shebang};

/// Number of bytes sniffed for null bytes by the binary check.
pub const BINARY_SNIFF_LIMIT: usize = 8 * 1024;

/// Error raised while reading or writing a single file.
///
/// Orchestrators record these per file instead of aborting the batch.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
  /// The OS refused access to the file or its directory.
  #[error("Permission denied: {path}")]
  PermissionDenied {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Any other I/O failure.
  #[error("I/O error on {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// The bytes are not valid in the encoding announced by the BOM.
  #[error("Failed to decode {path} as {encoding}")]
  Decode { path: PathBuf, encoding: TextEncoding },
}

impl FileError {
  /// Wraps an [`io::Error`], splitting out permission failures.
  pub fn from_io(path: &Path, source: io::Error) -> Self {
    let path = path.to_path_buf();
    if source.kind() == io::ErrorKind::PermissionDenied {
      FileError::PermissionDenied { path, source }
    } else {
      FileError::Io { path, source }
    }
  }
}

/// Byte-order mark signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bom {
  Utf8,
  Utf16Le,
  Utf16Be,
  Utf32Le,
  Utf32Be,
}

impl Bom {
  /// UTF-32 signatures come first since `FF FE 00 00` also starts with the
  /// UTF-16LE signature.
  const DETECTION_ORDER: [Bom; 5] = [Bom::Utf32Le, Bom::Utf32Be, Bom::Utf8, Bom::Utf16Le, Bom::Utf16Be];

  /// The signature bytes.
  pub const fn bytes(self) -> &'static [u8] {
    match self {
      Bom::Utf8 => &[0xEF, 0xBB, 0xBF],
      Bom::Utf16Le => &[0xFF, 0xFE],
      Bom::Utf16Be => &[0xFE, 0xFF],
      Bom::Utf32Le => &[0xFF, 0xFE, 0x00, 0x00],
      Bom::Utf32Be => &[0x00, 0x00, 0xFE, 0xFF],
    }
  }

  /// The encoding this signature announces.
  pub const fn encoding(self) -> TextEncoding {
    match self {
      Bom::Utf8 => TextEncoding::Utf8,
      Bom::Utf16Le => TextEncoding::Utf16Le,
      Bom::Utf16Be => TextEncoding::Utf16Be,
      Bom::Utf32Le => TextEncoding::Utf32Le,
      Bom::Utf32Be => TextEncoding::Utf32Be,
    }
  }

  /// Detects a BOM at the start of `bytes`.
  pub fn detect(bytes: &[u8]) -> Option<Bom> {
    Self::DETECTION_ORDER.into_iter().find(|bom| bytes.starts_with(bom.bytes()))
  }
}

/// Text encodings the tool can round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
  #[default]
  Utf8,
  Utf16Le,
  Utf16Be,
  Utf32Le,
  Utf32Be,
}

impl fmt::Display for TextEncoding {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      TextEncoding::Utf8 => "UTF-8",
      TextEncoding::Utf16Le => "UTF-16LE",
      TextEncoding::Utf16Be => "UTF-16BE",
      TextEncoding::Utf32Le => "UTF-32LE",
      TextEncoding::Utf32Be => "UTF-32BE",
    };
    f.write_str(name)
  }
}

impl TextEncoding {
  /// The `encoding_rs` codec for the encodings it decodes.
  fn codec(self) -> Option<&'static Encoding> {
    match self {
      TextEncoding::Utf8 => Some(UTF_8),
      TextEncoding::Utf16Le => Some(UTF_16LE),
      TextEncoding::Utf16Be => Some(UTF_16BE),
      TextEncoding::Utf32Le | TextEncoding::Utf32Be => None,
    }
  }

  /// Strictly decodes `bytes` (BOM already stripped). `None` on any invalid
  /// sequence.
  pub fn decode(self, bytes: &[u8]) -> Option<String> {
    if let Some(codec) = self.codec() {
      return codec
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned());
    }

    if bytes.len() % 4 != 0 {
      return None;
    }
    bytes
      .chunks_exact(4)
      .map(|chunk| {
        let unit = [chunk[0], chunk[1], chunk[2], chunk[3]];
        let value = if self == TextEncoding::Utf32Le {
          u32::from_le_bytes(unit)
        } else {
          u32::from_be_bytes(unit)
        };
        char::from_u32(value)
      })
      .collect()
  }

  /// Encodes `text` without any BOM.
  pub fn encode(self, text: &str) -> Vec<u8> {
    match self {
      TextEncoding::Utf8 => text.as_bytes().to_vec(),
      TextEncoding::Utf16Le => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
      TextEncoding::Utf16Be => text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
      TextEncoding::Utf32Le => text.chars().flat_map(|c| u32::from(c).to_le_bytes()).collect(),
      TextEncoding::Utf32Be => text.chars().flat_map(|c| u32::from(c).to_be_bytes()).collect(),
    }
  }
}

/// Per-file metadata captured at read time and honored at write time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileEnvelope {
  /// BOM found at the start of the file, re-emitted exactly once on write
  pub bom: Option<Bom>,
  /// Encoding used to decode the body
  pub encoding: TextEncoding,
  /// Dominant line terminator
  pub newline: NewlineStyle,
  /// First line, when it starts with `#!`
  pub shebang: Option<String>,
}

impl FileEnvelope {
  /// Encodes `text` with this envelope's encoding, prefixed by its BOM.
  pub fn encode(&self, text: &str) -> Vec<u8> {
    let body = self.encoding.encode(text);
    match self.bom {
      Some(bom) => {
        let mut bytes = Vec::with_capacity(bom.bytes().len() + body.len());
        bytes.extend_from_slice(bom.bytes());
        bytes.extend_from_slice(&body);
        bytes
      }
      None => body,
    }
  }
}

/// A file's decoded text together with its envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFile {
  pub text: String,
  pub envelope: FileEnvelope,
}

/// File I/O operations for the processor.
pub struct FileIO;

impl FileIO {
  /// Decodes raw file bytes.
  ///
  /// The BOM, if any, selects the encoding and is stripped before decoding.
  /// Without a BOM the bytes must be valid UTF-8.
  ///
  /// # Parameters
  ///
  /// * `path` - Path used in error messages
  /// * `bytes` - The complete file contents
  pub fn decode(path: &Path, bytes: &[u8]) -> Result<DecodedFile, FileError> {
    let bom = Bom::detect(bytes);
    let encoding = bom.map(Bom::encoding).unwrap_or_default();
    let body = &bytes[bom.map_or(0, |b| b.bytes().len())..];

    let text = encoding.decode(body).ok_or_else(|| FileError::Decode {
      path: path.to_path_buf(),
      encoding,
    })?;

    let envelope = FileEnvelope {
      bom,
      encoding,
      newline: detect_newline_style(&text),
      shebang: extract_shebang(&text).0.map(str::to_string),
    };
    trace!(
      "Decoded {} as {} (bom: {:?}, newline: {})",
      path.display(),
      encoding,
      bom,
      envelope.newline
    );

    Ok(DecodedFile { text, envelope })
  }

  /// Reads and decodes a whole file.
  ///
  /// # Parameters
  ///
  /// * `path` - Path to the file to read
  ///
  /// # Returns
  ///
  /// The decoded text and its envelope, or a [`FileError`].
  pub fn read_text(path: &Path) -> Result<DecodedFile, FileError> {
    let bytes = fs::read(path).map_err(|e| FileError::from_io(path, e))?;
    Self::decode(path, &bytes)
  }

  /// Checks the first [`BINARY_SNIFF_LIMIT`] bytes for a null byte.
  ///
  /// A file that cannot be opened or read counts as binary.
  pub fn is_binary(path: &Path) -> bool {
    let mut buf = Vec::with_capacity(BINARY_SNIFF_LIMIT);
    let read = fs::File::open(path).and_then(|file| file.take(BINARY_SNIFF_LIMIT as u64).read_to_end(&mut buf));

    match read {
      Ok(_) => buf.contains(&0),
      Err(e) => {
        warn!("Could not read {} for binary detection: {}", path.display(), e);
        true
      }
    }
  }

  /// Atomically replaces `dest` with `bytes`.
  ///
  /// The bytes go to a temporary file named `.<name>.XXXXXX.tmp` in the
  /// destination directory, which is then renamed over `dest`. The temporary
  /// file is removed on any failure.
  ///
  /// # Parameters
  ///
  /// * `dest` - Final path of the file
  /// * `bytes` - Complete new contents
  /// * `permissions_from` - File whose permission bits are copied onto the
  ///   new file, best effort
  pub fn write_atomic(dest: &Path, bytes: &[u8], permissions_from: Option<&Path>) -> Result<(), FileError> {
    let dir = match dest.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent,
      _ => Path::new("."),
    };
    let name = dest
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_default();

    let mut temp = tempfile::Builder::new()
      .prefix(&format!(".{name}."))
      .suffix(".tmp")
      .tempfile_in(dir)
      .map_err(|e| FileError::from_io(dest, e))?;

    temp.write_all(bytes).map_err(|e| FileError::from_io(dest, e))?;
    temp.as_file().sync_all().map_err(|e| FileError::from_io(dest, e))?;

    if let Some(source) = permissions_from {
      match fs::metadata(source) {
        Ok(meta) => {
          if let Err(e) = fs::set_permissions(temp.path(), meta.permissions()) {
            debug!("Could not copy permissions from {}: {}", source.display(), e);
          }
        }
        Err(e) => debug!("Could not stat {} for permissions: {}", source.display(), e),
      }
    }

    temp.persist(dest).map_err(|e| FileError::from_io(dest, e.error))?;
    Ok(())
  }
}
