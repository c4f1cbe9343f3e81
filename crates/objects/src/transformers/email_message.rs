use crate::model::{CyboxObject, EmailMessage, FileObject};
use crate::props::optional_str;
use crate::registry::{ObjectTransformer, Transformed};
use anyhow::{bail, Result};
use serde_json::{Map, Value};

/// Email message, the composite case: with attachments it decomposes into
/// the message plus one File object per attachment name, so one authored
/// observable turns into several schema objects. The reconciler mints fresh
/// ids for all of them and rewrites the relation graph accordingly.
pub struct EmailMessageTransformer;

impl ObjectTransformer for EmailMessageTransformer {
    fn process(&self, properties: &Map<String, Value>) -> Result<Transformed> {
        let message = EmailMessage {
            subject: optional_str(properties, "subject").map(str::to_string),
            from: optional_str(properties, "from").map(str::to_string),
            to: optional_str(properties, "to")
                .map(|s| {
                    s.split('\n')
                        .map(str::trim)
                        .filter(|r| !r.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        };

        if message.subject.is_none() && message.from.is_none() && message.to.is_empty() {
            bail!("email observable has no subject, sender or recipient");
        }

        let attachments: Vec<FileObject> = optional_str(properties, "attachments")
            .map(|s| {
                s.split('\n')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(|name| FileObject {
                        file_name: Some(name.to_string()),
                        ..FileObject::default()
                    })
                    .collect()
            })
            .unwrap_or_default();

        if attachments.is_empty() {
            return Ok(Transformed::Single(CyboxObject::EmailMessage(message)));
        }

        let mut objects = vec![CyboxObject::EmailMessage(message)];
        objects.extend(attachments.into_iter().map(CyboxObject::File));
        Ok(Transformed::Multiple(objects))
    }
}
