use async_trait::async_trait;
use chrono::Utc;
use std::process::{Output, Stdio};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::html::HtmlInvoiceTemplate;
use crate::domain::invoice::{ExportPayload, InvoiceRenderer, RenderError};

/// Styled-HTML backend: lays the invoice out with the HTML template and pipes it
/// through wkhtmltopdf.
pub struct WkHtmlToPdfRenderer {
  template: HtmlInvoiceTemplate,
  wkhtmltopdf_path: String,
}

impl WkHtmlToPdfRenderer {
  pub fn new(
    template: HtmlInvoiceTemplate,
    wkhtmltopdf_path: Option<String>,
  ) -> Self {
    let wkhtmltopdf_path = wkhtmltopdf_path.unwrap_or_else(|| "wkhtmltopdf".to_string());

    Self {
      template,
      wkhtmltopdf_path,
    }
  }

  pub async fn verify_installed(&self) -> Result<(), RenderError> {
    let output = Command::new(&self.wkhtmltopdf_path)
      .arg("--version")
      .output()
      .await
      .map_err(|e| {
        RenderError::Unavailable(format!(
          "wkhtmltopdf not found: {}. Please install wkhtmltopdf.",
          e
        ))
      })?;

    if !output.status.success() {
      return Err(RenderError::Unavailable(
        "wkhtmltopdf is not working correctly".to_string(),
      ));
    }

    Ok(())
  }

  async fn html_to_pdf(&self, html: &str) -> Result<Vec<u8>, RenderError> {
    let mut command = Command::new(&self.wkhtmltopdf_path);
    command.args([
      "--page-size",
      "A4",
      "--margin-top",
      "10mm",
      "--margin-bottom",
      "10mm",
      "--margin-left",
      "10mm",
      "--margin-right",
      "10mm",
      "--encoding",
      "utf-8",
      "--quiet",
      "-",
      "-",
    ]);

    let output = pipe_through(command, html.as_bytes()).await?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(RenderError::Failed(format!("wkhtmltopdf failed: {}", stderr)));
    }

    Ok(output.stdout)
  }
}

/// Runs `command` with `input` on stdin. Stdout and stderr are drained while stdin is
/// still being written, so a chatty child cannot stall on a full pipe.
async fn pipe_through(mut command: Command, input: &[u8]) -> Result<Output, RenderError> {
  let mut child = command
    .stdin(Stdio::piped())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .kill_on_drop(true)
    .spawn()
    .map_err(|e| RenderError::Unavailable(format!("wkhtmltopdf execution failed: {}", e)))?;

  let mut stdin = child
    .stdin
    .take()
    .ok_or_else(|| RenderError::Failed("wkhtmltopdf stdin was not captured".to_string()))?;

  let feed = async move {
    stdin.write_all(input).await.map_err(|e| {
      RenderError::Failed(format!("Failed to stream HTML to wkhtmltopdf: {}", e))
    })?;
    // Dropping stdin closes the pipe and signals end of input.
    drop(stdin);
    Ok::<(), RenderError>(())
  };
  let collect = async {
    child
      .wait_with_output()
      .await
      .map_err(|e| RenderError::Failed(format!("wkhtmltopdf execution failed: {}", e)))
  };

  let ((), output) = tokio::try_join!(feed, collect)?;
  Ok(output)
}

#[async_trait]
impl InvoiceRenderer for WkHtmlToPdfRenderer {
  fn name(&self) -> &'static str {
    "wkhtmltopdf"
  }

  async fn render(&self, payload: &ExportPayload) -> Result<Vec<u8>, RenderError> {
    let document = payload.to_document(Utc::now().date_naive());
    let html = self
      .template
      .render(&document)
      .map_err(|e| RenderError::Template(e.to_string()))?;

    tracing::debug!("Converting {} bytes of invoice HTML to PDF", html.len());
    self.html_to_pdf(&html).await
  }
}
