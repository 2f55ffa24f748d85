// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

// Line-level op implementations used by `apply_op`.

fn validate_ident(field: &'static str, value: &str) -> Result<(), EditError> {
    validate_mermaid_ident(value).map_err(|reason| EditError::InvalidIdent {
        field,
        value: value.to_owned(),
        reason,
    })
}

fn validate_single_line(field: &'static str, value: &str) -> Result<(), EditError> {
    if is_single_line(value) {
        Ok(())
    } else {
        Err(EditError::MultiLineText { field })
    }
}

/// Display name to write as the `as <name>` clause: only when it says something the id doesn't.
fn effective_alias<'a>(id: &str, display_name: Option<&'a str>) -> Option<&'a str> {
    display_name.map(str::trim).filter(|name| !name.is_empty() && *name != id)
}

fn participant_at(lines: &[String], index: usize) -> Option<Participant> {
    match parse_line(lines.get(index)?, index)? {
        LineEntity::Participant(participant) => Some(participant),
        LineEntity::Message(_) => None,
    }
}

fn message_at(lines: &[String], index: usize) -> Option<Message> {
    match parse_line(lines.get(index)?, index)? {
        LineEntity::Message(message) => Some(message),
        LineEntity::Participant(_) => None,
    }
}

fn ensure_current_participant(lines: &[String], target: &Participant) -> Result<(), EditError> {
    match participant_at(lines, target.origin_line()) {
        Some(current) if current == *target => Ok(()),
        _ => Err(EditError::StaleEntity {
            kind: EntityKind::Participant,
            origin_line: target.origin_line(),
        }),
    }
}

fn ensure_current_message(lines: &[String], target: &Message) -> Result<(), EditError> {
    match message_at(lines, target.origin_line()) {
        Some(current) if current == *target => Ok(()),
        _ => Err(EditError::StaleEntity {
            kind: EntityKind::Message,
            origin_line: target.origin_line(),
        }),
    }
}

fn uses_crlf(lines: &[String]) -> bool {
    lines.iter().any(|line| line.ends_with('\r'))
}

/// Carries the `\r` of a CRLF line over to its replacement.
fn keep_line_ending(mut line: String, old: &str) -> String {
    if old.ends_with('\r') {
        line.push('\r');
    }
    line
}

/// Inserts a freshly written line, matching the document's CRLF endings.
fn insert_line(lines: &mut Vec<String>, index: usize, mut line: String) {
    if uses_crlf(lines) {
        if index < lines.len() {
            line.push('\r');
        } else if let Some(last) = lines.last_mut() {
            if !last.ends_with('\r') {
                last.push('\r');
            }
        }
    }
    lines.insert(index, line);
}

/// Returns the header line index, synthesizing `sequenceDiagram` as line 0 when it is missing.
fn ensure_header(lines: &mut Vec<String>, delta: &mut DeltaBuilder) -> usize {
    if let Some(index) = lines.iter().position(|line| is_header_line(line)) {
        return index;
    }
    insert_line(lines, 0, HEADER.to_owned());
    delta.record_inserted(0);
    0
}

/// End of the document, ignoring trailing blank lines so a final newline stays final.
fn append_index(lines: &[String]) -> usize {
    lines.iter().rposition(|line| !line.trim().is_empty()).map_or(lines.len(), |index| index + 1)
}

fn declarations(lines: &[String]) -> Vec<Participant> {
    (0..lines.len()).filter_map(|index| participant_at(lines, index)).collect()
}

fn insert_participant(
    lines: &mut Vec<String>,
    id: &str,
    display_name: Option<&str>,
    position: &InsertPosition,
    delta: &mut DeltaBuilder,
) -> Result<(), EditError> {
    validate_ident("participant id", id)?;
    if let Some(display_name) = display_name {
        validate_single_line("display name", display_name)?;
    }

    let header_index = ensure_header(lines, delta);
    let declared = declarations(lines);

    let (index, anchor) = match position {
        InsertPosition::First => (header_index + 1, declared.first()),
        InsertPosition::Last => match declared.last() {
            Some(last) => (last.origin_line() + 1, Some(last)),
            None => (header_index + 1, None),
        },
        InsertPosition::Before(anchor_id) | InsertPosition::After(anchor_id) => {
            match declared.iter().find(|participant| participant.id() == anchor_id) {
                Some(anchor) if matches!(position, InsertPosition::Before(_)) => {
                    (anchor.origin_line(), Some(anchor))
                }
                Some(anchor) => (anchor.origin_line() + 1, Some(anchor)),
                None => {
                    log::debug!("insert anchor {anchor_id:?} not declared; appending at the end");
                    (append_index(lines), None)
                }
            }
        }
    };

    if declared.iter().any(|participant| participant.id() == id) {
        log::warn!("participant id {id:?} is declared more than once");
    }

    let indent = anchor.map_or(DEFAULT_INDENT, Participant::indent);
    insert_line(lines, index, participant_line(indent, id, effective_alias(id, display_name)));
    delta.record_inserted(index);
    Ok(())
}

fn insert_message(
    lines: &mut Vec<String>,
    from: &str,
    to: &str,
    arrow: ArrowToken,
    text: &str,
    delta: &mut DeltaBuilder,
) -> Result<(), EditError> {
    validate_ident("message sender", from)?;
    validate_ident("message receiver", to)?;
    validate_single_line("message text", text)?;

    ensure_header(lines, delta);
    let index = append_index(lines);
    insert_line(lines, index, message_line(DEFAULT_INDENT, from, arrow, None, to, text.trim()));
    delta.record_inserted(index);
    Ok(())
}

fn rename_participant(
    lines: &mut [String],
    target: &Participant,
    new_id: &str,
    new_display_name: Option<&str>,
    delta: &mut DeltaBuilder,
) -> Result<(), EditError> {
    validate_ident("participant id", new_id)?;
    if let Some(display_name) = new_display_name {
        validate_single_line("display name", display_name)?;
    }
    ensure_current_participant(lines, target)?;

    let alias = effective_alias(new_id, new_display_name);
    let new_display = alias.unwrap_or(new_id);
    if new_id == target.id() && new_display == target.display_name() {
        return Ok(());
    }

    let old_id = target.id();
    if new_id != old_id
        && declarations(lines).iter().any(|participant| participant.id() == new_id)
    {
        log::warn!("participant id {new_id:?} is declared more than once");
    }

    let origin = target.origin_line();
    let declaration =
        keep_line_ending(participant_line(target.indent(), new_id, alias), &lines[origin]);
    if lines[origin] != declaration {
        lines[origin] = declaration;
        delta.record_rewritten(origin);
    }

    if new_id == old_id {
        return Ok(());
    }

    for index in 0..lines.len() {
        if message_at(lines, index).is_none() {
            continue;
        }
        let Some((from, to)) = message_endpoint_ranges(&lines[index]) else {
            continue;
        };
        let line = &mut lines[index];
        let mut touched = false;
        // Receiver first so the sender's range stays valid.
        for range in [to, from] {
            if line[range.clone()] == *old_id {
                line.replace_range(range, new_id);
                touched = true;
            }
        }
        if touched {
            delta.record_rewritten(index);
        }
    }

    Ok(())
}

fn delete_participant(
    lines: &mut Vec<String>,
    target: &Participant,
    delta: &mut DeltaBuilder,
) -> Result<(), EditError> {
    ensure_current_participant(lines, target)?;

    let doomed = (0..lines.len())
        .filter(|&index| {
            index == target.origin_line()
                || message_at(lines, index).is_some_and(|message| message.references(target.id()))
        })
        .collect::<BTreeSet<_>>();

    let mut index = 0;
    lines.retain(|_| {
        let keep = !doomed.contains(&index);
        index += 1;
        keep
    });
    for removed in doomed {
        delta.record_removed(removed);
    }
    Ok(())
}

fn update_message(
    lines: &mut [String],
    target: &Message,
    from: &str,
    to: &str,
    arrow: ArrowToken,
    text: &str,
    delta: &mut DeltaBuilder,
) -> Result<(), EditError> {
    validate_ident("message sender", from)?;
    validate_ident("message receiver", to)?;
    validate_single_line("message text", text)?;
    ensure_current_message(lines, target)?;

    let origin = target.origin_line();
    let line = message_line(target.indent(), from, arrow, target.activation(), to, text.trim());
    let line = keep_line_ending(line, &lines[origin]);
    if lines[origin] != line {
        lines[origin] = line;
        delta.record_rewritten(origin);
    }
    Ok(())
}

fn delete_message(
    lines: &mut Vec<String>,
    target: &Message,
    delta: &mut DeltaBuilder,
) -> Result<(), EditError> {
    ensure_current_message(lines, target)?;
    lines.remove(target.origin_line());
    delta.record_removed(target.origin_line());
    Ok(())
}
