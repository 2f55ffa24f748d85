// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Seqsync: keeps Mermaid sequence diagram text and its rendered picture in step.
//!
//! The text is the single source of truth. [`format::mermaid`] parses it line by line into
//! participants and messages, [`ops`] rewrites exact source lines, [`matcher`] finds each
//! entity's node in whatever tree a renderer produced, [`binder`] routes clicks on those nodes
//! back to entities, and [`sync`] runs the render cycle around all of it.

pub mod binder;
pub mod format;
pub mod matcher;
pub mod model;
pub mod ops;
pub mod store;
pub mod sync;
pub mod ui;
pub mod visual;
