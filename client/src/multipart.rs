//! Multipart request bodies for operations that upload files.
//!
//! The transport receives a [`MultipartForm`] whose first field is
//! `operations`, the JSON-encoded document. Callers add the remaining fields,
//! usually a `map` field and one part per file, which
//! [`MultipartForm::uploads`] builds for them.

use std::path::Path;

use gtc_document::Document;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Name of the field carrying the JSON-encoded document.
pub const OPERATIONS_FIELD: &str = "operations";

/// Name of the field mapping file parts to variable paths.
pub const MAP_FIELD: &str = "map";

/// A file sent as one part of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Read a file from disk, naming the part after the file.
    ///
    /// # Errors
    /// Returns any I/O error from reading the file.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(file_name, bytes))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    Text(String),
    File(FileUpload),
}

/// Ordered multipart fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    parts: IndexMap<String, FormPart>,
}

impl MultipartForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the `map` field and one numbered part per file.
    ///
    /// Each entry pairs the variable path the file replaces (e.g.
    /// `variables.avatar`) with the upload itself.
    pub fn uploads<P, I>(files: I) -> Self
    where
        P: Into<String>,
        I: IntoIterator<Item = (P, FileUpload)>,
    {
        let mut map = Map::new();
        let mut form = Self::new();
        let mut files_part = Vec::new();
        for (index, (path, upload)) in files.into_iter().enumerate() {
            let key = index.to_string();
            map.insert(key.clone(), Value::Array(vec![Value::String(path.into())]));
            files_part.push((key, upload));
        }
        form.insert(MAP_FIELD, FormPart::Text(Value::Object(map).to_string()));
        for (key, upload) in files_part {
            form.insert(key, FormPart::File(upload));
        }
        form
    }

    /// Add a text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, FormPart::Text(value.into()));
        self
    }

    /// Add a text field holding `value` encoded as JSON.
    #[must_use]
    pub fn json(mut self, name: impl Into<String>, value: &Value) -> Self {
        self.insert(name, FormPart::Text(value.to_string()));
        self
    }

    /// Add a file field.
    #[must_use]
    pub fn file(mut self, name: impl Into<String>, upload: FileUpload) -> Self {
        self.insert(name, FormPart::File(upload));
        self
    }

    /// Set a field. An existing field keeps its position and takes the new part.
    pub fn insert(&mut self, name: impl Into<String>, part: FormPart) {
        self.parts.insert(name.into(), part);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FormPart> {
        self.parts.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormPart)> {
        self.parts.iter().map(|(name, part)| (name.as_str(), part))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// The form actually sent for `document`: `operations` first, then the
    /// caller's fields. A caller field named `operations` replaces the
    /// generated one.
    #[must_use]
    pub fn for_operation(document: &Document, extra: Self) -> Self {
        let mut form = Self::new();
        form.insert(OPERATIONS_FIELD, FormPart::Text(document.to_json().to_string()));
        for (name, part) in extra.parts {
            form.insert(name, part);
        }
        form
    }
}

impl IntoIterator for MultipartForm {
    type Item = (String, FormPart);
    type IntoIter = indexmap::map::IntoIter<String, FormPart>;

    fn into_iter(self) -> Self::IntoIter {
        self.parts.into_iter()
    }
}
