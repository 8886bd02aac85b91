use crate::config::{ACCEPTED_IMAGE_TYPES, MAX_FILE_SIZE_MB};
use crate::upload::{FileSource, mime_from_file_name};
use async_trait::async_trait;
use dioxus::html::{FileEngine, HasFileData};
use dioxus::prelude::*;
use std::io;
use std::rc::Rc;
use std::sync::Arc;

/// First file of a picker or drop event, read through the host file engine.
///
/// The engine only reports names, so the declared type comes from the
/// extension. An unknown size is treated as 0 here; the encoder re-checks the
/// size after reading.
struct EngineFile {
    engine: Arc<dyn FileEngine>,
    name: String,
    mime_type: &'static str,
    size: u64,
}

impl EngineFile {
    async fn first(engine: Arc<dyn FileEngine>) -> Option<Self> {
        let name = engine.files().into_iter().next()?;
        let size = engine.file_size(&name).await.unwrap_or(0);
        Some(Self {
            mime_type: mime_from_file_name(&name),
            name,
            size,
            engine,
        })
    }
}

#[async_trait(?Send)]
impl FileSource for EngineFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn declared_mime_type(&self) -> &str {
        self.mime_type
    }

    fn size_bytes(&self) -> u64 {
        self.size
    }

    async fn read_bytes(&self) -> io::Result<Vec<u8>> {
        self.engine
            .read_file(&self.name)
            .await
            .ok_or_else(|| io::Error::other(format!("could not read {}", self.name)))
    }
}

fn forward_first_file(engine: Arc<dyn FileEngine>, on_file: EventHandler<Rc<dyn FileSource>>) {
    spawn(async move {
        match EngineFile::first(engine).await {
            Some(file) => on_file.call(Rc::new(file)),
            None => tracing::debug!("file event carried no files"),
        }
    });
}

#[component]
pub fn ImageUploader(
    on_file: EventHandler<Rc<dyn FileSource>>,
    #[props(!optional)] preview_url: Option<String>,
    disabled: bool,
) -> Element {
    let mut dragging = use_signal(|| false);
    let accept = ACCEPTED_IMAGE_TYPES.join(",");

    let zone_class = format!(
        "dropzone{}{}",
        if dragging() { " dragging" } else { "" },
        if disabled { " disabled" } else { "" }
    );

    rsx! {
        label {
            class: "{zone_class}",
            ondragenter: move |evt: DragEvent| {
                evt.prevent_default();
                if !disabled {
                    dragging.set(true);
                }
            },
            ondragover: move |evt: DragEvent| {
                evt.prevent_default();
                if !disabled {
                    dragging.set(true);
                }
            },
            ondragleave: move |evt: DragEvent| {
                evt.prevent_default();
                dragging.set(false);
            },
            ondrop: move |evt: DragEvent| {
                evt.prevent_default();
                dragging.set(false);
                if disabled {
                    return;
                }
                if let Some(engine) = evt.files() {
                    forward_first_file(engine, on_file);
                }
            },
            input {
                class: "hidden",
                r#type: "file",
                accept: "{accept}",
                multiple: false,
                disabled,
                onchange: move |evt: FormEvent| {
                    if let Some(engine) = evt.files() {
                        forward_first_file(engine, on_file);
                    }
                },
            }
            if let Some(url) = preview_url {
                img { class: "preview", src: "{url}", alt: "Selected preview" }
            } else {
                div { class: "upload-prompt",
                    span { class: "upload-icon", "🖼️" }
                    p {
                        span { class: "strong", "Click to upload" }
                        " or drag and drop"
                    }
                    p { class: "text-muted", "PNG, JPG, GIF, WEBP up to {MAX_FILE_SIZE_MB}MB" }
                }
            }
        }
    }
}
