// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Seqsync CLI entrypoint.
//!
//! Every subcommand works on one diagram source file. `edit` prints the rewritten source (or
//! replaces the file with `--in-place`); `match` and `render` print the entity-to-node mapping as
//! JSON.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;

use seqsync::format::html::build_html_export;
use seqsync::format::mermaid::parse_sequence_lines;
use seqsync::matcher::{match_entities, EntityMapping};
use seqsync::model::ParsedDiagram;
use seqsync::ops::{apply_op, MessageForm, ParticipantForm, SourceOp};
use seqsync::store::{
    read_source_file, restore_panel_width, write_source_file, SettingsStore, WriteDurability,
};
use seqsync::sync::{CommandRenderer, SyncConfig, SyncSession, SyncState};
use seqsync::visual::svg::parse_svg;
use seqsync::visual::{Markers, NodeId, VisualDocument};
use serde_json::{json, Value};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} parse <file>\n  {program} edit <file> add-participant <id> [--name <name>] [--position first|last|before-<id>|after-<id>]\n  {program} edit <file> add-message <from> <arrow> <to> <text>\n  {program} edit <file> rename-participant <id> <new-id> [--name <name>]\n  {program} edit <file> delete-participant <id>\n  {program} edit <file> update-message <index> <from> <arrow> <to> <text>\n  {program} edit <file> delete-message <index>\n  {program} match <file> <tree.svg|tree.json> [--markers <markers.json>]\n  {program} render <file> --renderer <program> [--arg <arg>]... [--timeout-ms <ms>] [--markers <markers.json>]\n  {program} export-html <file> [--title <title>] [--out <dir>]\n  {program} panel-width --settings <settings.json> [--set <width>] [--viewport <width>]\n\nedit prints the new source; --in-place replaces the file instead.\nMessage indexes count from 0 in source order. Arrows: ->>, -->>, ->, -->.\nRenderer arguments may contain {{element_id}}; the renderer reads markup on stdin and writes SVG.\n\n--durable-writes opts into slower, best-effort durable persistence (fsync/sync where supported).\nSet RUST_LOG to change log verbosity (default: info)."
    );
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum EditCommand {
    AddParticipant { id: String },
    AddMessage { from: String, arrow: String, to: String, text: String },
    RenameParticipant { id: String, new_id: String },
    DeleteParticipant { id: String },
    UpdateMessage { index: usize, from: String, arrow: String, to: String, text: String },
    DeleteMessage { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CliCommand {
    Parse { file: String },
    Edit { file: String, edit: EditCommand },
    Match { file: String, tree: String },
    Render { file: String },
    ExportHtml { file: String },
    PanelWidth,
}

#[derive(Debug, Default, Clone, PartialEq)]
struct CliOptions {
    command: Option<CliCommand>,
    name: Option<String>,
    position: Option<String>,
    in_place: bool,
    markers: Option<String>,
    renderer: Option<String>,
    renderer_args: Vec<String>,
    timeout_ms: Option<u64>,
    title: Option<String>,
    out_dir: Option<String>,
    settings: Option<String>,
    set_width: Option<f64>,
    viewport: Option<f64>,
    durable_writes: bool,
}

/// `--name`-style arguments. Arrow tokens such as `-->>` are positionals.
fn is_flag(arg: &str) -> bool {
    arg.strip_prefix("--").is_some_and(|rest| rest.starts_with(|ch: char| ch.is_ascii_alphabetic()))
}

fn set_once<T>(slot: &mut Option<T>, value: T) -> Result<(), ()> {
    if slot.is_some() {
        return Err(());
    }
    *slot = Some(value);
    Ok(())
}

fn parse_width(raw: &str) -> Result<f64, ()> {
    let width: f64 = raw.parse().map_err(|_| ())?;
    if width.is_finite() && width > 0.0 {
        Ok(width)
    } else {
        Err(())
    }
}

fn parse_edit(args: &[String]) -> Result<EditCommand, ()> {
    let owned = |index: usize| args[index].clone();
    let index = |raw: &str| raw.parse::<usize>().map_err(|_| ());
    let Some((verb, rest)) = args.split_first() else {
        return Err(());
    };
    let edit = match (verb.as_str(), rest.len()) {
        ("add-participant", 1) => EditCommand::AddParticipant { id: owned(1) },
        ("add-message", 4) => EditCommand::AddMessage {
            from: owned(1),
            arrow: owned(2),
            to: owned(3),
            text: owned(4),
        },
        ("rename-participant", 2) => {
            EditCommand::RenameParticipant { id: owned(1), new_id: owned(2) }
        }
        ("delete-participant", 1) => EditCommand::DeleteParticipant { id: owned(1) },
        ("update-message", 5) => EditCommand::UpdateMessage {
            index: index(&args[1])?,
            from: owned(2),
            arrow: owned(3),
            to: owned(4),
            text: owned(5),
        },
        ("delete-message", 1) => EditCommand::DeleteMessage { index: index(&args[1])? },
        _ => return Err(()),
    };
    Ok(edit)
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();
    let mut positionals = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--name" => set_once(&mut options.name, args.next().ok_or(())?)?,
            "--position" => set_once(&mut options.position, args.next().ok_or(())?)?,
            "--in-place" => {
                if options.in_place {
                    return Err(());
                }
                options.in_place = true;
            }
            "--markers" => set_once(&mut options.markers, args.next().ok_or(())?)?,
            "--renderer" => set_once(&mut options.renderer, args.next().ok_or(())?)?,
            "--arg" => options.renderer_args.push(args.next().ok_or(())?),
            "--timeout-ms" => {
                let raw = args.next().ok_or(())?;
                let millis: u64 = raw.parse().map_err(|_| ())?;
                if millis == 0 {
                    return Err(());
                }
                set_once(&mut options.timeout_ms, millis)?;
            }
            "--title" => set_once(&mut options.title, args.next().ok_or(())?)?,
            "--out" => set_once(&mut options.out_dir, args.next().ok_or(())?)?,
            "--settings" => set_once(&mut options.settings, args.next().ok_or(())?)?,
            "--set" => set_once(&mut options.set_width, parse_width(&args.next().ok_or(())?)?)?,
            "--viewport" => {
                set_once(&mut options.viewport, parse_width(&args.next().ok_or(())?)?)?
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            _ if is_flag(&arg) => return Err(()),
            _ => positionals.push(arg),
        }
    }

    let Some((name, rest)) = positionals.split_first() else {
        return Err(());
    };
    let command = match (name.as_str(), rest) {
        ("parse", [file]) => CliCommand::Parse { file: file.clone() },
        ("edit", [file, edit @ ..]) => {
            CliCommand::Edit { file: file.clone(), edit: parse_edit(edit)? }
        }
        ("match", [file, tree]) => CliCommand::Match { file: file.clone(), tree: tree.clone() },
        ("render", [file]) => CliCommand::Render { file: file.clone() },
        ("export-html", [file]) => CliCommand::ExportHtml { file: file.clone() },
        ("panel-width", []) => CliCommand::PanelWidth,
        _ => return Err(()),
    };

    let edit_verb = match &command {
        CliCommand::Edit { edit, .. } => Some(edit),
        _ => None,
    };
    let takes_name = matches!(
        edit_verb,
        Some(EditCommand::AddParticipant { .. } | EditCommand::RenameParticipant { .. })
    );
    let takes_position = matches!(edit_verb, Some(EditCommand::AddParticipant { .. }));
    if (options.name.is_some() && !takes_name)
        || (options.position.is_some() && !takes_position)
        || (options.in_place && edit_verb.is_none())
    {
        return Err(());
    }

    let is_render = matches!(command, CliCommand::Render { .. });
    if is_render != options.renderer.is_some()
        || (!is_render && (!options.renderer_args.is_empty() || options.timeout_ms.is_some()))
    {
        return Err(());
    }
    if options.markers.is_some() && !matches!(command, CliCommand::Match { .. }) && !is_render {
        return Err(());
    }

    let is_export = matches!(command, CliCommand::ExportHtml { .. });
    if !is_export && (options.title.is_some() || options.out_dir.is_some()) {
        return Err(());
    }

    let is_panel = command == CliCommand::PanelWidth;
    if is_panel != options.settings.is_some()
        || (!is_panel && (options.set_width.is_some() || options.viewport.is_some()))
    {
        return Err(());
    }

    options.command = Some(command);
    Ok(options)
}

fn durability(options: &CliOptions) -> WriteDurability {
    if options.durable_writes {
        WriteDurability::Durable
    } else {
        WriteDurability::BestEffort
    }
}

fn load_markers(path: Option<&str>) -> Result<Markers, Box<dyn Error>> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .map_err(|err| format!("cannot read markers {path:?}: {err}"))?;
            Ok(Markers::from_json(&raw)?)
        }
        None => Ok(Markers::default()),
    }
}

fn load_tree(path: &str) -> Result<VisualDocument, Box<dyn Error>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|err| format!("cannot read tree {path:?}: {err}"))?;
    let is_json = Path::new(path).extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(VisualDocument::from_json(&raw)?)
    } else {
        Ok(parse_svg(&raw)?)
    }
}

fn build_op(
    edit: &EditCommand,
    options: &CliOptions,
    diagram: &ParsedDiagram,
) -> Result<SourceOp, Box<dyn Error>> {
    let participant = |id: &str| {
        diagram.participant(id).cloned().ok_or_else(|| format!("no participant '{id}' declared"))
    };
    let message = |index: usize| {
        diagram.messages().get(index).cloned().ok_or_else(|| {
            format!("no message #{index} ({} messages in source)", diagram.messages().len())
        })
    };
    let name = options.name.clone().unwrap_or_default();

    let op = match edit {
        EditCommand::AddParticipant { id } => ParticipantForm::new(id.as_str(), name)
            .with_position(options.position.clone().unwrap_or_default())
            .into_insert()?,
        EditCommand::AddMessage { from, arrow, to, text } => {
            MessageForm::new(from.as_str(), arrow.as_str(), to.as_str(), text.as_str())
                .into_insert()?
        }
        EditCommand::RenameParticipant { id, new_id } => {
            ParticipantForm::new(new_id.as_str(), name).into_rename(participant(id)?)?
        }
        EditCommand::DeleteParticipant { id } => {
            SourceOp::DeleteParticipant { target: participant(id)? }
        }
        EditCommand::UpdateMessage { index, from, arrow, to, text } => {
            MessageForm::new(from.as_str(), arrow.as_str(), to.as_str(), text.as_str())
                .into_update(message(*index)?)?
        }
        EditCommand::DeleteMessage { index } => SourceOp::DeleteMessage { target: message(*index)? },
    };
    Ok(op)
}

fn node_json(tree: &VisualDocument, node: Option<NodeId>) -> Value {
    match node {
        Some(node) => json!({
            "index": node.index(),
            "tag": tree.tag(node),
            "id": tree.attribute(node, "id"),
        }),
        None => Value::Null,
    }
}

fn mapping_json(
    diagram: &ParsedDiagram,
    tree: &VisualDocument,
    mapping: &EntityMapping<NodeId>,
) -> Value {
    let participants = diagram
        .participants()
        .iter()
        .zip(&mapping.participants)
        .map(|(participant, node)| {
            json!({ "entity": participant, "node": node_json(tree, *node) })
        })
        .collect::<Vec<_>>();
    let messages = diagram
        .messages()
        .iter()
        .zip(&mapping.messages)
        .map(|(message, node)| {
            json!({
                "entity": message,
                "dashed": message.arrow().is_dashed(),
                "filled_head": message.arrow().has_filled_head(),
                "node": node_json(tree, *node),
            })
        })
        .collect::<Vec<_>>();
    json!({
        "participant_strategy": mapping.participant_strategy,
        "message_strategy": mapping.message_strategy,
        "matched": mapping.matched_count(),
        "participants": participants,
        "messages": messages,
    })
}

fn print_json(value: &Value) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(options: CliOptions) -> Result<(), Box<dyn Error>> {
    let Some(command) = options.command.clone() else {
        return Err("no command given".into());
    };

    match command {
        CliCommand::Parse { file } => {
            let source = read_source_file(Path::new(&file), None)?;
            print_json(&serde_json::to_value(parse_sequence_lines(&source))?)
        }
        CliCommand::Edit { file, edit } => {
            let path = Path::new(&file);
            let source = read_source_file(path, None)?;
            let op = build_op(&edit, &options, &parse_sequence_lines(&source))?;
            let result = apply_op(&source, &op)?;
            log::info!("{}: {:?}", op.describe(), result.delta);
            if options.in_place {
                write_source_file(path, &result.text, durability(&options))?;
            } else if result.text.ends_with('\n') {
                print!("{}", result.text);
            } else {
                println!("{}", result.text);
            }
            Ok(())
        }
        CliCommand::Match { file, tree } => {
            let source = read_source_file(Path::new(&file), None)?;
            let diagram = parse_sequence_lines(&source);
            let tree = load_tree(&tree)?;
            let markers = load_markers(options.markers.as_deref())?;
            let mapping = match_entities(&diagram, &tree, &markers);
            print_json(&mapping_json(&diagram, &tree, &mapping))
        }
        CliCommand::Render { file } => {
            let source = read_source_file(Path::new(&file), None)?;
            let program = options.renderer.clone().ok_or("render needs --renderer")?;
            let renderer = CommandRenderer::new(program).with_args(options.renderer_args.clone());
            let mut config = SyncConfig {
                markers: load_markers(options.markers.as_deref())?,
                ..SyncConfig::default()
            };
            if let Some(millis) = options.timeout_ms {
                config.render_timeout = Duration::from_millis(millis);
            }

            let mut session = SyncSession::new(renderer, config);
            session.set_source(source);

            let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
            let state = runtime.block_on(session.render());

            match (state, session.displayed()) {
                (SyncState::Rendered, Some(cycle)) => {
                    print_json(&mapping_json(cycle.diagram(), cycle.tree(), cycle.mapping()))
                }
                _ => {
                    let status = session.status().map(ToString::to_string);
                    Err(status.unwrap_or_else(|| "render failed".to_owned()).into())
                }
            }
        }
        CliCommand::ExportHtml { file } => {
            let source = read_source_file(Path::new(&file), None)?;
            let export = build_html_export(options.title.as_deref().unwrap_or_default(), &source)?;
            let out_dir = PathBuf::from(options.out_dir.as_deref().unwrap_or("."));
            let target = out_dir.join(&export.file_name);
            write_source_file(&target, &export.document, durability(&options))?;
            println!("{}", target.display());
            Ok(())
        }
        CliCommand::PanelWidth => {
            let path = options.settings.clone().ok_or("panel-width needs --settings")?;
            let store = SettingsStore::new(path).with_durability(durability(&options));
            let settings = match options.set_width {
                Some(width) => store.update(|settings| settings.set_panel_width(width))?,
                None => store.load()?,
            };
            let width = match options.viewport {
                Some(viewport) => restore_panel_width(settings.panel_width(), viewport),
                None => settings.panel_width(),
            };
            print_json(&json!({ "panel_width": width }))
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "seqsync".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        run(options)
    })();

    if let Err(err) = result {
        eprintln!("seqsync: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_options, CliCommand, CliOptions, EditCommand};

    fn parse(args: &[&str]) -> Result<CliOptions, ()> {
        parse_options(args.iter().map(|arg| (*arg).to_owned()).collect::<Vec<_>>().into_iter())
    }

    #[test]
    fn rejects_empty_args() {
        parse(&[]).unwrap_err();
    }

    #[test]
    fn parses_parse_command() {
        let options = parse(&["parse", "diagram.mmd"]).expect("parse options");
        assert_eq!(options.command, Some(CliCommand::Parse { file: "diagram.mmd".to_owned() }));
        assert!(!options.durable_writes);
    }

    #[test]
    fn parses_add_participant_with_flags_in_any_order() {
        let options = parse(&[
            "--position",
            "after-A",
            "edit",
            "d.mmd",
            "add-participant",
            "C",
            "--name",
            "Carol",
            "--in-place",
        ])
        .expect("parse options");
        assert_eq!(
            options.command,
            Some(CliCommand::Edit {
                file: "d.mmd".to_owned(),
                edit: EditCommand::AddParticipant { id: "C".to_owned() },
            })
        );
        assert_eq!(options.name.as_deref(), Some("Carol"));
        assert_eq!(options.position.as_deref(), Some("after-A"));
        assert!(options.in_place);
    }

    #[test]
    fn arrows_are_positionals_not_flags() {
        parse(&["edit", "d.mmd", "update-message", "1", "B", "-->>", "A", "--ok"]).unwrap_err();

        let options = parse(&["edit", "d.mmd", "update-message", "1", "B", "-->>", "A", "ok"])
            .expect("parse options");
        assert_eq!(
            options.command,
            Some(CliCommand::Edit {
                file: "d.mmd".to_owned(),
                edit: EditCommand::UpdateMessage {
                    index: 1,
                    from: "B".to_owned(),
                    arrow: "-->>".to_owned(),
                    to: "A".to_owned(),
                    text: "ok".to_owned(),
                },
            })
        );
    }

    #[test]
    fn rejects_wrong_edit_arity_and_bad_indexes() {
        parse(&["edit", "d.mmd", "add-message", "A", "->>", "B"]).unwrap_err();
        parse(&["edit", "d.mmd", "delete-message", "first"]).unwrap_err();
        parse(&["edit", "d.mmd", "shuffle"]).unwrap_err();
        parse(&["edit", "d.mmd"]).unwrap_err();
    }

    #[test]
    fn rejects_flags_that_do_not_apply() {
        parse(&["parse", "d.mmd", "--in-place"]).unwrap_err();
        parse(&["edit", "d.mmd", "delete-participant", "A", "--name", "x"]).unwrap_err();
        parse(&["edit", "d.mmd", "rename-participant", "A", "B", "--position", "first"])
            .unwrap_err();
        parse(&["parse", "d.mmd", "--title", "t"]).unwrap_err();
        parse(&["match", "d.mmd", "t.svg", "--renderer", "mmdc"]).unwrap_err();
        parse(&["export-html", "d.mmd", "--markers", "m.json"]).unwrap_err();
    }

    #[test]
    fn parses_render_with_repeated_args() {
        let options = parse(&[
            "render",
            "d.mmd",
            "--renderer",
            "mmdc",
            "--arg",
            "-i",
            "--arg",
            "-",
            "--timeout-ms",
            "2500",
        ])
        .expect("parse options");
        assert_eq!(options.command, Some(CliCommand::Render { file: "d.mmd".to_owned() }));
        assert_eq!(options.renderer.as_deref(), Some("mmdc"));
        assert_eq!(options.renderer_args, vec!["-i".to_owned(), "-".to_owned()]);
        assert_eq!(options.timeout_ms, Some(2500));
    }

    #[test]
    fn render_requires_a_renderer_and_a_positive_timeout() {
        parse(&["render", "d.mmd"]).unwrap_err();
        parse(&["render", "d.mmd", "--renderer", "mmdc", "--timeout-ms", "0"]).unwrap_err();
    }

    #[test]
    fn parses_panel_width() {
        let options =
            parse(&["panel-width", "--settings", "s.json", "--set", "420", "--viewport", "1000"])
                .expect("parse options");
        assert_eq!(options.command, Some(CliCommand::PanelWidth));
        assert_eq!(options.set_width, Some(420.0));
        assert_eq!(options.viewport, Some(1000.0));

        parse(&["panel-width"]).unwrap_err();
        parse(&["panel-width", "--settings", "s.json", "--set", "-5"]).unwrap_err();
        parse(&["panel-width", "--settings", "s.json", "--viewport", "NaN"]).unwrap_err();
    }

    #[test]
    fn rejects_unknown_and_duplicate_flags() {
        parse(&["parse", "d.mmd", "--nope"]).unwrap_err();
        parse(&["parse", "d.mmd", "--durable-writes", "--durable-writes"]).unwrap_err();
        parse(&["export-html", "d.mmd", "--title", "a", "--title", "b"]).unwrap_err();
        parse(&["match", "d.mmd", "t.svg", "--markers"]).unwrap_err();
    }
}
