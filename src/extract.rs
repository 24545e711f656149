//! Thin wrappers over axum's extractors whose rejections render as the
//! JSON error envelope instead of plain text.

use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::ApiError;
use crate::storage::UploadedFile;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct AppQuery<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);

/// Parses a path or body id, naming the resource in the 400 message.
pub fn parse_id(raw: &str, kind: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::BadRequest(format!("Invalid {} ID", kind)))
}

pub fn parse_optional_id(raw: Option<&str>, kind: &str) -> Result<Option<Uuid>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_id(value, kind).map(Some),
    }
}

/// Collected `multipart/form-data` body: text fields and file parts.
#[derive(Debug, Default)]
pub struct FormData {
    fields: Vec<(String, String)>,
    files: Vec<(String, UploadedFile)>,
}

impl FormData {
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = FormData::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await?;
                    form.files.push((
                        name,
                        UploadedFile {
                            file_name: Some(file_name),
                            content_type,
                            bytes: bytes.to_vec(),
                        },
                    ));
                }
                None => {
                    let value = field.text().await?;
                    form.fields.push((name, value));
                }
            }
        }
        Ok(form)
    }

    /// First non-blank value among `names`, trimmed. Aliases cover the
    /// camelCase names older clients send.
    pub fn text(&self, names: &[&str]) -> Option<String> {
        names.iter().find_map(|wanted| {
            self.fields
                .iter()
                .filter(|(name, _)| name == wanted)
                .map(|(_, value)| value.trim())
                .find(|value| !value.is_empty())
                .map(str::to_string)
        })
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        let index = self.files.iter().position(|(field, _)| field == name)?;
        Some(self.files.remove(index).1)
    }

    pub fn int(&self, names: &[&str], label: &str) -> Result<Option<i32>, ApiError> {
        match self.text(names) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<i32>()
                .map(Some)
                .map_err(|_| ApiError::BadRequest(format!("'{}' must be an integer", label))),
        }
    }
}

/// Body of the create endpoints, which take either JSON or a multipart form
/// carrying a file.
pub enum Payload<T> {
    Json(T),
    Form(FormData),
}

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.starts_with("multipart/form-data"))
            .unwrap_or(false);
        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
            return Ok(Payload::Form(FormData::read(multipart).await?));
        }
        let AppJson(body) = AppJson::<T>::from_request(req, state).await?;
        Ok(Payload::Json(body))
    }
}
