// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Entities derived from sequence diagram source text.
//!
//! Entities are immutable snapshots tied to one parse of the text; only [`EntityRef`] (kind plus
//! document order) is meaningful across parses.

pub mod document;
pub mod entity;

pub use document::ParsedDiagram;
pub use entity::{
    Activation, ArrowToken, Entity, EntityRef, Message, Participant, UnknownArrowToken,
};
