// src/main.rs

use std::io::Write;

use chitfund_invoice::{
    config::AppState,
    handlers::InvoiceWidget,
    models::{
        export::ExportStatus,
        invoice::{FieldName, PlanAmount},
    },
    services::markup,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
commands:
  set <field> <value>   edit a form field (fields: see `fields`)
  fields                list the form field names
  reset                 restore the default draft
  show                  print the preview markup
  json                  print the draft and preview as JSON
  plans                 list the plan amount values
  print | download | share | share-text | whatsapp | copy
  status                show whether an export is running
  unmount | mount       drop or recreate the widget state
  quit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let state = AppState::from_env()?;
    tracing::info!("PDF downloads go to {}", state.config.download_dir.display());
    let mut widget = InvoiceWidget::mount(state);
    tracing::info!("Invoice widget ready, type `help` for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));

        match command {
            "" => {}
            "help" => println!("{HELP}"),
            "fields" => {
                for field in FieldName::ALL {
                    println!("  {field}");
                }
            }
            "set" => {
                let (field, value) = rest.split_once(' ').unwrap_or((rest, ""));
                widget.edit(field, value.trim());
            }
            "reset" => widget.reset(),
            "show" => match widget.preview() {
                Some(doc) => println!("{}", markup::render_preview(doc)),
                None => println!("(unmounted)"),
            },
            "json" => match widget.snapshot() {
                Some(snapshot) => println!("{}", serde_json::to_string_pretty(&snapshot)?),
                None => println!("(unmounted)"),
            },
            "plans" => {
                for plan in PlanAmount::ALL {
                    println!("  {:<8} {}", plan.value(), plan.label());
                }
            }
            // Notices already reached the user through the platform.
            "print" => {
                widget.print().await;
            }
            "download" => {
                widget.download_pdf().await;
            }
            "share" => {
                widget.share_pdf().await;
            }
            "share-text" => {
                widget.share_text().await;
            }
            "whatsapp" => {
                widget.share_whatsapp().await;
            }
            "copy" => {
                widget.copy().await;
            }
            "status" => {
                let mounted = if widget.is_mounted() { "mounted" } else { "unmounted" };
                match widget.export_status() {
                    ExportStatus::Idle => println!("{mounted}, idle"),
                    ExportStatus::InProgress(action) => println!("{mounted}, busy: {action}"),
                }
            }
            "unmount" => widget.unmount(),
            "mount" => widget.remount(),
            "quit" | "exit" => break,
            other => println!("unknown command `{other}`, type `help`"),
        }

        prompt()?;
    }

    tracing::info!("Bye");
    Ok(())
}

fn prompt() -> std::io::Result<()> {
    print!("> ");
    std::io::stdout().flush()
}
