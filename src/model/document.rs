// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::Serialize;

use super::entity::{Entity, EntityRef, Message, Participant};

/// Snapshot of everything the parser recognized in one version of the source text.
///
/// A snapshot is never patched: any text change produces a new one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ParsedDiagram {
    has_header: bool,
    participants: Vec<Participant>,
    messages: Vec<Message>,
}

impl ParsedDiagram {
    pub fn new(has_header: bool, participants: Vec<Participant>, messages: Vec<Message>) -> Self {
        Self { has_header, participants, messages }
    }

    pub fn has_header(&self) -> bool {
        self.has_header
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn participant(&self, participant_id: &str) -> Option<&Participant> {
        self.participants.iter().find(|participant| participant.id() == participant_id)
    }

    pub fn entity(&self, entity_ref: EntityRef) -> Option<Entity<'_>> {
        match entity_ref {
            EntityRef::Participant(index) => self.participants.get(index).map(Entity::Participant),
            EntityRef::Message(index) => self.messages.get(index).map(Entity::Message),
        }
    }

    /// Every label a renderer may print for a participant (display names and ids).
    pub fn participant_labels(&self) -> impl Iterator<Item = &str> {
        self.participants
            .iter()
            .flat_map(|participant| [participant.display_name(), participant.id()])
    }

    pub fn messages_referencing<'a>(
        &'a self,
        participant_id: &'a str,
    ) -> impl Iterator<Item = &'a Message> + 'a {
        self.messages.iter().filter(move |message| message.references(participant_id))
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty() && self.messages.is_empty()
    }
}
