use crate::utils::error::{ReorderError, Result};
use reqwest::multipart::{Form, Part};

/// What a form submit should do with one file field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentChange {
    Upload {
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
    /// Leave the existing server-side reference as is.
    Keep,
    Remove,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    Text { name: String, value: String },
    File {
        name: String,
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

impl AttachmentChange {
    pub fn resolve(&self, field: &str) -> Option<FormPart> {
        match self {
            AttachmentChange::Upload {
                file_name,
                mime,
                bytes,
            } => Some(FormPart::File {
                name: field.to_string(),
                file_name: file_name.clone(),
                mime: mime.clone(),
                bytes: bytes.clone(),
            }),
            AttachmentChange::Keep => None,
            AttachmentChange::Remove => Some(FormPart::Text {
                name: format!("{}_remove", field),
                value: "true".to_string(),
            }),
        }
    }
}

/// 送出前一次性解析所有欄位，組成 multipart 請求
pub fn resolve_parts(
    text_fields: &[(String, String)],
    attachments: &[(String, AttachmentChange)],
) -> Vec<FormPart> {
    let text = text_fields.iter().map(|(name, value)| FormPart::Text {
        name: name.clone(),
        value: value.clone(),
    });
    let files = attachments
        .iter()
        .filter_map(|(field, change)| change.resolve(field));
    text.chain(files).collect()
}

pub fn build_form(
    text_fields: &[(String, String)],
    attachments: &[(String, AttachmentChange)],
) -> Result<Form> {
    let mut form = Form::new();
    for part in resolve_parts(text_fields, attachments) {
        form = match part {
            FormPart::Text { name, value } => form.text(name, value),
            FormPart::File {
                name,
                file_name,
                mime,
                bytes,
            } => {
                let part = Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str(&mime)
                    .map_err(|e| ReorderError::InvalidConfigValueError {
                        field: name.clone(),
                        value: mime.clone(),
                        reason: format!("Invalid MIME type: {}", e),
                    })?;
                form.part(name, part)
            }
        };
    }
    Ok(form)
}
