//! Product brief example.
//!
//! Builds the prompt with an async template function and shows output
//! recovery: the offline model answers with plain text that happens to be
//! JSON, so the value is recovered from the raw content and a warning is
//! logged.
//!
//! Run with:
//! ```bash
//! RUST_LOG=prompt_fn=debug cargo run --example product_brief
//! ```
//!
//! Set `OPENAI_API_KEY` to use OpenAI, or enable the `ollama` feature and set
//! `PROMPT_FN_MODEL=ollama:llama3.1` to use a local model.

use prompt_fn::prelude::*;
use prompt_fn::{ContentPart, FinishReason};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// What the brief is about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Product name.
    pub name: String,
    /// Target audience.
    pub audience: String,
    /// Raw feature notes.
    pub features: Vec<String>,
}

/// A short product brief.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brief {
    /// One line pitch.
    pub tagline: String,
    /// Three to five selling points.
    pub highlights: Vec<String>,
}

async fn load_style_guide() -> String {
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    "Write in plain English. No superlatives.".to_string()
}

/// Answers with free text and a truncated finish, so the structured output
/// is missing and has to be recovered.
fn offline_model() -> FunctionModel {
    FunctionModel::new(|request| {
        let brief = serde_json::json!({
            "tagline": "Notes that keep up with your team",
            "highlights": ["Offline first", "Shared notebooks", "Fast search"],
        });
        tracing::debug!(prompt_len = request.prompt.len(), "offline model answering");
        Ok(Generation::new(
            vec![
                ContentPart::reasoning(""),
                ContentPart::text(brief.to_string()),
            ],
            FinishReason::Length,
        ))
    })
    .with_name("offline-brief")
}

fn select_model() -> anyhow::Result<Arc<dyn Model>> {
    if let Ok(id) = std::env::var("PROMPT_FN_MODEL") {
        return Ok(infer_model(&id)?);
    }
    if std::env::var("OPENAI_API_KEY").is_ok() {
        return Ok(infer_model("openai:gpt-4o-mini")?);
    }
    println!("No model configured, using the offline model\n");
    Ok(Arc::new(offline_model()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let brief = PromptBuilder::<Product, Brief>::new("product_brief")
        .description("Drafts a short product brief")
        .input_schema(
            TypedSchema::new()
                .refine("features", "at least one feature is needed", |p: &Product| {
                    !p.features.is_empty()
                })
                .with_validator(|mut p: Product| {
                    p.features.retain(|f| !f.trim().is_empty());
                    Ok(p)
                }),
        )
        .output_schema(
            TypedSchema::new()
                .with_schema(
                    SchemaBuilder::new()
                        .string("tagline", "One line pitch", true)
                        .string_array("highlights", "Three to five selling points", true)
                        .build(),
                )
                .refine("highlights", "expected three to five highlights", |b: &Brief| {
                    (3..=5).contains(&b.highlights.len())
                }),
        )
        .template_async_fn(|p: &Product| {
            let product = p.clone();
            async move {
                let style = load_style_guide().await;
                Ok(format!(
                    "{style}\n\nWrite a brief for {} aimed at {}.\nFeatures:\n- {}",
                    product.name,
                    product.audience,
                    product.features.join("\n- ")
                ))
            }
        })
        .model_arc(select_model()?)
        .build()?;

    let product = Product {
        name: "Jotter".into(),
        audience: "small remote teams".into(),
        features: vec![
            "works offline".into(),
            "".into(),
            "shared notebooks".into(),
            "full text search".into(),
        ],
    };

    let result = brief.call(product).await?;
    println!("{}", result.tagline);
    for highlight in &result.highlights {
        println!("  * {highlight}");
    }

    Ok(())
}
