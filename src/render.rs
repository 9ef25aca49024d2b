use indexmap::IndexMap;
use std::path::Path;

use crate::chart::ChartConfig;
use crate::error::ChartError;

pub const CHARTJS_CDN: &str = "https://cdn.jsdelivr.net/npm/chart.js@4.4.0/dist/chart.umd.min.js";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawingKind {
    /// Executable script drawing into the canvas.
    Script,
    /// Inert JSON payload attached to the canvas.
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drawing {
    pub kind: DrawingKind,
    pub body: String,
}

/// A drawing target on a page, addressed by element id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    id: String,
    drawing: Option<Drawing>,
}

impl Canvas {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            drawing: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn drawing(&self) -> Option<&Drawing> {
        self.drawing.as_ref()
    }

    pub fn is_blank(&self) -> bool {
        self.drawing.is_none()
    }

    pub fn draw(&mut self, drawing: Drawing) {
        self.drawing = Some(drawing);
    }
}

/// The document a chart is rendered into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPage {
    title: String,
    canvases: IndexMap<String, Canvas>,
    error: Option<String>,
}

impl ChartPage {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            canvases: IndexMap::new(),
            error: None,
        }
    }

    pub fn with_canvas(mut self, id: &str) -> Self {
        self.canvases.insert(id.to_string(), Canvas::new(id));
        self
    }

    pub fn canvas(&self, id: &str) -> Option<&Canvas> {
        self.canvases.get(id)
    }

    pub fn canvas_mut(&mut self, id: &str) -> Result<&mut Canvas, ChartError> {
        self.canvases
            .get_mut(id)
            .ok_or_else(|| ChartError::ElementNotFound { id: id.to_string() })
    }

    /// Put the page into a visible error state; the banner replaces charts.
    pub fn show_error(&mut self, msg: &str) {
        self.error = Some(msg.to_string());
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn to_html(&self) -> String {
        let mut body = String::new();
        let mut scripts = String::new();
        match &self.error {
            Some(msg) => {
                body.push_str(&format!(
                    "    <div class=\"error\" role=\"alert\">{}</div>\n",
                    escape_html(msg)
                ));
            }
            None => {
                for canvas in self.canvases.values() {
                    body.push_str(&format!(
                        "    <div class=\"chart-container\"><canvas id=\"{}\"></canvas></div>\n",
                        escape_html(&canvas.id)
                    ));
                    match canvas.drawing() {
                        Some(Drawing { kind: DrawingKind::Script, body: js }) => {
                            scripts.push_str(&format!("<script>\n{}\n</script>\n", js));
                        }
                        Some(Drawing { kind: DrawingKind::Json, body: payload }) => {
                            scripts.push_str(&format!(
                                "<script type=\"application/json\" data-canvas=\"{}\">\n{}\n</script>\n",
                                escape_html(&canvas.id),
                                payload
                            ));
                        }
                        None => {}
                    }
                }
            }
        }

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <script src="{cdn}"></script>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; margin: 2rem; }}
        .chart-container {{ max-width: 1100px; }}
        .error {{ color: #b91c1c; background: #fef2f2; border: 1px solid #fecaca; padding: 1rem; }}
    </style>
</head>
<body>
    <h1>{title}</h1>
{body}{scripts}</body>
</html>
"#,
            title = escape_html(&self.title),
            cdn = CHARTJS_CDN,
            body = body,
            scripts = scripts,
        )
    }

    pub fn write_to(&self, path: &Path) -> Result<(), ChartError> {
        std::fs::write(path, self.to_html()).map_err(|e| ChartError::Output {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// JSON embedded in a `<script>` element must not close it early or switch
/// the HTML parser into an escaped state. These characters only occur inside
/// JSON strings, where the `\u` escapes decode back to the same text.
fn script_safe(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for ch in json.chars() {
        match ch {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            c => out.push(c),
        }
    }
    out
}

/// Draws a chart config into a canvas.
pub trait Renderer {
    fn name(&self) -> &'static str;
    fn render(&self, canvas: &mut Canvas, config: &ChartConfig) -> Result<(), ChartError>;
}

/// Draws with Chart.js: `new Chart(ctx, config)` on the canvas's 2D context.
#[derive(Debug, Clone, Default)]
pub struct ChartJsRenderer;

impl Renderer for ChartJsRenderer {
    fn name(&self) -> &'static str {
        "chartjs"
    }

    fn render(&self, canvas: &mut Canvas, config: &ChartConfig) -> Result<(), ChartError> {
        let id = serde_json::to_string(canvas.id()).map_err(|e| render_error(canvas, e))?;
        let cfg = serde_json::to_string_pretty(&config.to_chartjs())
            .map_err(|e| render_error(canvas, e))?;
        let body = format!(
            "(function() {{\n    var ctx = document.getElementById({}).getContext('2d');\n    new Chart(ctx, {});\n}})();",
            script_safe(&id),
            script_safe(&cfg)
        );
        canvas.draw(Drawing {
            kind: DrawingKind::Script,
            body,
        });
        Ok(())
    }
}

/// Attaches the Chart.js config as JSON instead of drawing it.
#[derive(Debug, Clone, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn name(&self) -> &'static str {
        "json"
    }

    fn render(&self, canvas: &mut Canvas, config: &ChartConfig) -> Result<(), ChartError> {
        let cfg = serde_json::to_string_pretty(&config.to_chartjs())
            .map_err(|e| render_error(canvas, e))?;
        canvas.draw(Drawing {
            kind: DrawingKind::Json,
            body: script_safe(&cfg),
        });
        Ok(())
    }
}

fn render_error(canvas: &Canvas, e: serde_json::Error) -> ChartError {
    ChartError::Output {
        path: format!("#{}", canvas.id()),
        reason: e.to_string(),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    ChartJs,
    Json,
}

impl Backend {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "chartjs" | "chart.js" => Some(Backend::ChartJs),
            "json" => Some(Backend::Json),
            _ => None,
        }
    }

    pub fn build(self) -> Box<dyn Renderer + Send + Sync> {
        match self {
            Backend::ChartJs => Box::new(ChartJsRenderer),
            Backend::Json => Box::new(JsonRenderer),
        }
    }
}
