//! Symbolic locations within the configuration document.
use std::fmt;

/// One step into the document: a mapping key or a sequence index.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

/// A document-rooted path such as `packages.vim.files[2]`.
///
/// Paths are cheap to extend: [`JsonPath::key`] and [`JsonPath::index`]
/// return a new path and leave `self` untouched, so a parser can hand each
/// child its own location.
///
/// # Examples
///
/// ```
/// use dots::config::JsonPath;
///
/// let p = JsonPath::root().key("packages").key("vim").key("requires").index(0);
/// assert_eq!(p.to_string(), "packages.vim.requires[0]");
///
/// let p = JsonPath::root().key("files").key("vim/vimrc");
/// assert_eq!(p.to_string(), "files.\"vim/vimrc\"");
///
/// assert_eq!(JsonPath::root().to_string(), "root object");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonPath {
    segments: Vec<Segment>,
}

impl JsonPath {
    /// The path of the document root.
    #[must_use]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Descend into the mapping entry `key`.
    #[must_use]
    pub fn key(&self, key: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Key(key.to_string()));
        Self { segments }
    }

    /// Descend into sequence element `index`.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Index(index));
        Self { segments }
    }
}

/// Quote keys that would otherwise read as path syntax.
fn quote(key: &str) -> String {
    if key.contains(['.', '/', ' ']) {
        format!("\"{key}\"")
    } else {
        key.to_string()
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("root object");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                // The leading key is printed as-is.
                Segment::Key(key) if i == 0 => f.write_str(key)?,
                Segment::Key(key) => write!(f, ".{}", quote(key))?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}
