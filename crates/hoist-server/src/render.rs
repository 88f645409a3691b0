use hoist_core::UpgradeConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

impl MessageKind {
    fn css_class(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Render the single page this service serves: upload form, optional
/// status message, optional run log.
pub fn page(
    config: &UpgradeConfig,
    message: Option<(&str, MessageKind)>,
    log_text: &str,
) -> String {
    let title = escape(&config.title);
    let description = escape(&config.description);
    let accept = escape(&config.accept_types.join(","));

    let message_block = match message {
        Some((text, kind)) => format!(
            r#"<div class="message {}">{}</div>"#,
            kind.css_class(),
            escape(text)
        ),
        None => String::new(),
    };
    let log_block = if log_text.is_empty() {
        String::new()
    } else {
        format!("<pre class=\"log\">{}</pre>", escape(log_text))
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<title>{title}</title>
<meta charset="UTF-8">
<style>
body {{ font-family: sans-serif; margin: 2em auto; max-width: 640px; }}
.message.success {{ color: #155724; background: #d4edda; padding: 1em; }}
.message.error {{ color: #721c24; background: #f8d7da; padding: 1em; }}
.log {{ background: #f5f5f5; padding: 1em; overflow-x: auto; }}
</style>
</head>
<body>
<h1>{title}</h1>
<p>{description} (max {max_mb} MB)</p>
{message_block}
<form action="/upload" method="post" enctype="multipart/form-data">
<input type="file" name="file" accept="{accept}" required>
<input type="submit" value="Upload and upgrade">
</form>
{log_block}
</body>
</html>
"#,
        max_mb = config.max_file_size_mb,
    )
}

pub(crate) fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
