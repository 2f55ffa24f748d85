// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Line-oriented reading and writing of Mermaid `sequenceDiagram` markup.

mod ident;
pub mod sequence;

pub use ident::{is_single_line, validate_mermaid_ident, MermaidIdentError};
pub use sequence::{
    is_header_line, message_endpoint_ranges, message_line, parse_line, parse_sequence_lines,
    participant_line, split_source_lines, LineEntity, DEFAULT_INDENT, HEADER,
};
