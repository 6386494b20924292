// System-wide static configuration
//
//  Copyright (C) 2014-2022 Ryan Specialty Group, LLC.
//
//  This file is part of tailor.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! System-wide static configuration.
//!
//! This module provides a system-wide configuration.
//! Subsystems should reference these values rather than defining their own
//!   and risk incompatibilities or maintenance issues as requirements
//!   change.
//!
//! By convention,
//!   import this entire module rather than individual members and reference
//!   them as `global::foo` to emphasize their nature and risk.

/// A size capable of representing any byte offset within a single rule
///   string.
///
/// The largest tailorings in the wild
///   (CJK radical-stroke orderings)
///   are a few hundred kilobytes,
///     so this leaves plenty of headroom.
pub type RuleStringSize = u32;

/// Maximum number of characters of pre- and post-context retained by a
///   syntax error,
///     _including_ a reserved slot.
///
/// Errors hold at most one less than this many characters on each side
///   of the offending character.
pub const PARSE_CONTEXT_LEN: usize = 16;

/// Additional capacity allocated beyond the remaining input length for
///   the lexer's token buffer.
///
/// The buffer may grow past the input length because implicit resets
///   seed it with a symbolic anchor that does not appear in the input.
pub const TOKEN_BUF_SLACK: usize = 10;
