// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::io;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{RenderError, Renderer};
use crate::visual::svg::parse_svg;
use crate::visual::VisualDocument;

/// Argument placeholder replaced by the element id on every render.
pub const ELEMENT_ID_PLACEHOLDER: &str = "{element_id}";

/// Renders by piping markup into an external program and reading SVG from its stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRenderer {
    program: String,
    args: Vec<String>,
}

impl CommandRenderer {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into(), args: Vec::new() }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Renderer for CommandRenderer {
    async fn render(&self, source: &str, element_id: &str) -> Result<VisualDocument, RenderError> {
        let program = self.program.clone();
        let mut child = Command::new(&self.program)
            .args(self.args.iter().map(|arg| arg.replace(ELEMENT_ID_PLACEHOLDER, element_id)))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RenderError::Spawn { program: program.clone(), source })?;

        let stdin = child.stdin.take();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(source.as_bytes()).await?;
                stdin.shutdown().await?;
            }
            Ok::<(), io::Error>(())
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output.map_err(|source| RenderError::Io { program: program.clone(), source })?;

        if !output.status.success() {
            return Err(RenderError::Exited {
                program,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        // Renderers may stop reading stdin before EOF.
        if let Err(err) = fed {
            log::debug!("renderer {program:?} closed stdin early: {err}");
        }

        let svg = String::from_utf8(output.stdout)
            .map_err(|_| RenderError::InvalidUtf8 { program: program.clone() })?;
        log::debug!("renderer {program:?} returned {} bytes of SVG", svg.len());
        parse_svg(&svg).map_err(RenderError::from)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::CommandRenderer;
    use crate::sync::{RenderError, Renderer};
    use crate::visual::{Selector, VisualTree};

    #[tokio::test]
    async fn pipes_markup_through_the_program() {
        let renderer = CommandRenderer::new("cat");
        let svg = r#"<svg id="x"><g><text>Alice</text></g></svg>"#;

        let doc = renderer.render(svg, "ignored").await.expect("render");
        let texts = doc.query(&[Selector::tag("text")]);
        assert_eq!(texts.len(), 1);
        assert_eq!(doc.text_content(texts[0]), "Alice");
    }

    #[tokio::test]
    async fn substitutes_the_element_id_into_arguments() {
        let renderer = CommandRenderer::new("sh")
            .with_args(["-c", "cat >/dev/null; printf '<svg id=\"%s\"/>' \"$0\"", "{element_id}"]);

        let doc = renderer.render("sequenceDiagram", "diagram-7").await.expect("render");
        assert_eq!(doc.find_by_id("diagram-7"), Some(doc.root()));
    }

    #[tokio::test]
    async fn reports_failing_and_missing_programs() {
        let failing =
            CommandRenderer::new("sh").with_args(["-c", "cat >/dev/null; echo bad >&2; exit 3"]);
        match failing.render("x", "id").await {
            Err(RenderError::Exited { code, stderr, .. }) => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "bad");
            }
            other => panic!("unexpected {other:?}"),
        }

        let missing = CommandRenderer::new("seqsync-no-such-renderer");
        assert!(matches!(missing.render("x", "id").await, Err(RenderError::Spawn { .. })));

        let garbage = CommandRenderer::new("cat");
        assert!(matches!(garbage.render("not svg", "id").await, Err(RenderError::Svg(_))));
    }
}
