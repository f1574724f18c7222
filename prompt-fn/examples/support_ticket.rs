//! Support ticket triage example.
//!
//! Renders a minijinja template from the ticket, asks the model for a
//! structured triage and validates it.
//!
//! Run with:
//! ```bash
//! OPENAI_API_KEY=your-key cargo run --example support_ticket
//! ```
//!
//! Without `OPENAI_API_KEY` an offline model answers instead.

use prompt_fn::prelude::*;
use prompt_fn::{ContentPart, FinishReason};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const TRIAGE_TEMPLATE: &str = "\
You triage support tickets for {{ product }}.

Customer: {{ customer }}
Subject: {{ subject }}

{{ body }}

Classify the ticket and suggest the first reply.";

/// An incoming support ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    /// Product the ticket is about.
    pub product: String,
    /// Customer name.
    pub customer: String,
    /// Ticket subject.
    pub subject: String,
    /// Ticket body.
    pub body: String,
}

/// Triage decided by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Triage {
    /// low, medium, high or critical.
    pub severity: String,
    /// Team that should pick the ticket up.
    pub team: String,
    /// Suggested first reply.
    pub reply: String,
}

const SEVERITIES: &[&str] = &["low", "medium", "high", "critical"];

fn offline_model() -> FunctionModel {
    FunctionModel::new(|request| {
        let severity = if request.prompt.contains("down") { "critical" } else { "low" };
        let triage = serde_json::json!({
            "severity": severity,
            "team": "platform",
            "reply": "Thanks for reaching out, we are looking into it.",
        });
        Ok(Generation::from_content(
            vec![ContentPart::text(triage.to_string())],
            FinishReason::Stop,
        ))
    })
    .with_name("offline-triage")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let model: Arc<dyn Model> = if std::env::var("OPENAI_API_KEY").is_ok() {
        infer_model("openai:gpt-4o-mini")?
    } else {
        println!("OPENAI_API_KEY not set, using the offline model\n");
        Arc::new(offline_model())
    };

    let engine = MiniJinjaEngine::new().with_template("triage", TRIAGE_TEMPLATE)?;

    let triage = PromptBuilder::<Ticket, Triage>::new("triage_ticket")
        .description("Classifies a support ticket and drafts a reply")
        .input_schema(
            TypedSchema::new()
                .refine("body", "must not be empty", |t: &Ticket| !t.body.trim().is_empty()),
        )
        .output_schema(
            TypedSchema::new()
                .with_schema(
                    SchemaBuilder::new()
                        .enum_values("severity", "Ticket severity", SEVERITIES, true)
                        .string("team", "Owning team", true)
                        .string("reply", "First reply to the customer", true)
                        .build(),
                )
                .refine("severity", "unknown severity", |t: &Triage| {
                    SEVERITIES.contains(&t.severity.as_str())
                }),
        )
        .template("triage")
        .engine(engine)
        .model_arc(model)
        .build()?;

    let ticket = Ticket {
        product: "Acme Cloud".into(),
        customer: "Ada".into(),
        subject: "Dashboard is down".into(),
        body: "Since this morning the dashboard is down for our whole team.".into(),
    };

    let result = triage.call(ticket).await?;
    println!("Severity: {}", result.severity);
    println!("Team:     {}", result.team);
    println!("Reply:    {}", result.reply);

    // Empty bodies are rejected before the model is called.
    let empty = Ticket {
        product: "Acme Cloud".into(),
        customer: "Grace".into(),
        subject: "?".into(),
        body: "   ".into(),
    };
    match triage.call(empty).await {
        Err(PromptError::Validation(e)) => println!("\nRejected input: {e}"),
        other => println!("\nUnexpected result: {other:?}"),
    }

    Ok(())
}
