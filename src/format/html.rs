// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Standalone HTML export: the current markup plus a script tag that renders it in a browser.

use std::fmt;

use html_escape::encode_text;

pub const DEFAULT_EXPORT_TITLE: &str = "Sequence Diagram";
pub const MERMAID_CDN_URL: &str = "https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.min.js";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlExportError {
    EmptySource,
}

impl fmt::Display for HtmlExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySource => f.write_str("there is no diagram source to export"),
        }
    }
}

impl std::error::Error for HtmlExportError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlExport {
    pub file_name: String,
    pub document: String,
}

fn is_file_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
        || ('\u{3040}'..='\u{309F}').contains(&ch)
        || ('\u{30A0}'..='\u{30FF}').contains(&ch)
        || ('\u{4E00}'..='\u{9FAF}').contains(&ch)
}

/// File name for an export titled `title`: anything outside ASCII alphanumerics and the kana/CJK
/// ranges becomes `_`.
pub fn export_file_name(title: &str) -> String {
    let stem = title
        .chars()
        .map(|ch| if is_file_name_char(ch) { ch } else { '_' })
        .collect::<String>();
    format!("{stem}.html")
}

/// Builds a self-contained HTML page that renders `source` with Mermaid from a CDN.
///
/// A blank `title` falls back to [`DEFAULT_EXPORT_TITLE`]. Both title and source are HTML-escaped;
/// the browser hands Mermaid the unescaped text content.
pub fn build_html_export(title: &str, source: &str) -> Result<HtmlExport, HtmlExportError> {
    let source = source.trim();
    if source.is_empty() {
        return Err(HtmlExportError::EmptySource);
    }

    let title = match title.trim() {
        "" => DEFAULT_EXPORT_TITLE,
        trimmed => trimmed,
    };
    let escaped_title = encode_text(title);
    let escaped_source = encode_text(source);

    let document = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{escaped_title}</title>
    <script src="{MERMAID_CDN_URL}"></script>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            max-width: 1200px;
            margin: 0 auto;
            padding: 2rem;
            background-color: #f5f5f5;
        }}
        h1 {{
            color: #2c3e50;
            margin-bottom: 2rem;
        }}
        #diagram {{
            background: white;
            padding: 2rem;
            border-radius: 8px;
            box-shadow: 0 2px 8px rgba(0, 0, 0, 0.1);
        }}
    </style>
</head>
<body>
    <h1>{escaped_title}</h1>
    <div id="diagram">
        <pre class="mermaid">
{escaped_source}
        </pre>
    </div>
    <script>
        mermaid.initialize({{
            startOnLoad: true,
            securityLevel: 'strict',
            theme: 'default'
        }});
    </script>
</body>
</html>
"#
    );

    Ok(HtmlExport { file_name: export_file_name(title), document })
}
