//! Browser form submissions relayed to the backend.
//!
//! Screens with file inputs post `multipart/form-data`; [`FormPayload`]
//! collects the fields and non-empty files so they can be re-encoded as a
//! multipart body (or a JSON object) for the backend.

use axum::body::Bytes;
use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use reqwest::multipart::{Form, Part};
use serde_json::{Map, Value};

#[derive(Debug, Clone)]
pub struct FilePart {
    pub name: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Ordered text fields plus uploaded files. Repeated names are kept.
#[derive(Debug, Clone, Default)]
pub struct FormPayload {
    fields: Vec<(String, String)>,
    files: Vec<FilePart>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads every part of a multipart request. File inputs left empty by the
    /// browser (no name, no bytes) are dropped.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, MultipartError> {
        let mut payload = Self::new();
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(ToString::to_string) else {
                continue;
            };
            if let Some(file_name) = field.file_name().map(ToString::to_string) {
                let content_type = field.content_type().map(ToString::to_string);
                let data = field.bytes().await?;
                if data.is_empty() {
                    continue;
                }
                payload.files.push(FilePart {
                    name,
                    file_name,
                    content_type,
                    data,
                });
            } else {
                let value = field.text().await?;
                payload.fields.push((name, value));
            }
        }
        Ok(payload)
    }

    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_text(name, value);
        self
    }

    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    #[must_use]
    pub fn file(mut self, file: FilePart) -> Self {
        self.files.push(file);
        self
    }

    /// First raw value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First value for `name`, trimmed, `None` when blank.
    pub fn value(&self, name: &str) -> Option<String> {
        self.get(name)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(ToString::to_string)
    }

    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// Removes every value for `name`, returning them.
    pub fn take(&mut self, name: &str) -> Vec<String> {
        let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.fields)
            .into_iter()
            .partition(|(key, _)| key == name);
        self.fields = kept;
        taken.into_iter().map(|(_, value)| value).collect()
    }

    pub fn has_file(&self, name: &str) -> bool {
        self.files.iter().any(|file| file.name == name)
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn files(&self) -> &[FilePart] {
        &self.files
    }

    /// Drops text fields whose value is blank so optional inputs left empty
    /// do not overwrite backend values with `""`.
    #[must_use]
    pub fn without_blank(mut self) -> Self {
        self.fields.retain(|(_, value)| !value.trim().is_empty());
        self
    }

    /// Text fields as a JSON object; repeated names become arrays. Files are ignored.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (name, value) in &self.fields {
            let value = Value::String(value.clone());
            match map.get_mut(name) {
                Some(Value::Array(values)) => values.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    map.insert(name.clone(), value);
                }
            }
        }
        Value::Object(map)
    }

    /// Re-encodes as a multipart body, guessing a MIME type from the file
    /// name when the browser sent none.
    pub fn into_multipart(self) -> Result<Form, reqwest::Error> {
        let mut form = Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        for file in self.files {
            let mime = file
                .content_type
                .filter(|c| !c.is_empty() && c != "application/octet-stream")
                .unwrap_or_else(|| {
                    mime_guess::from_path(&file.file_name)
                        .first_or_octet_stream()
                        .to_string()
                });
            let part = Part::bytes(file.data.to_vec())
                .file_name(file.file_name)
                .mime_str(&mime)?;
            form = form.part(file.name, part);
        }
        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::FromRequest;
    use axum::http::Request;
    use serde_json::json;

    const BOUNDARY: &str = "XBOUNDARY";

    fn multipart_request(body: &str) -> Request<axum::body::Body> {
        Request::builder()
            .method("POST")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(axum::body::Body::from(body.replace('\n', "\r\n")))
            .unwrap()
    }

    #[tokio::test]
    async fn empty_file_inputs_are_dropped() {
        let body = format!(
            "--{BOUNDARY}\n\
             Content-Disposition: form-data; name=\"name\"\n\
             \n\
             Gates\n\
             --{BOUNDARY}\n\
             Content-Disposition: form-data; name=\"image\"; filename=\"\"\n\
             Content-Type: application/octet-stream\n\
             \n\
             \n\
             --{BOUNDARY}--\n"
        );
        let multipart = Multipart::from_request(multipart_request(&body), &())
            .await
            .unwrap();

        let payload = FormPayload::from_multipart(multipart).await.unwrap();

        assert_eq!(payload.get("name"), Some("Gates"));
        assert!(!payload.has_file("image"));
    }

    #[test]
    fn blank_fields_and_json_shape() {
        let payload = FormPayload::new()
            .text("name", "Railing")
            .text("description", "  ")
            .text("materials", "1")
            .text("materials", "2")
            .without_blank();

        assert_eq!(payload.get("description"), None);
        assert_eq!(
            payload.to_json(),
            json!({ "name": "Railing", "materials": ["1", "2"] })
        );
    }

    #[test]
    fn take_removes_all_values() {
        let mut payload = FormPayload::new()
            .text("remove_images", "3")
            .text("title", "Shed")
            .text("remove_images", "4");
        assert_eq!(payload.take("remove_images"), vec!["3", "4"]);
        assert_eq!(payload.fields().len(), 1);
    }
}
